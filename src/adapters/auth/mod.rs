//! Auth gateway adapters.

mod mock;

pub use mock::{FetchGate, MockAuthGateway, VERIFICATION_EMAIL_MESSAGE};
