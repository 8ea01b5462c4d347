//! Listing gateway adapters.

mod mock;

pub use mock::MockListingGateway;
