//! Authentication domain types.
//!
//! Identity comes from the auth gateway; the profile is the application's
//! own record keyed by identity id. `UserAccount` is the combined view the
//! rest of the client works with.

mod account;
mod credentials;
mod identity;
mod profile;

pub use account::UserAccount;
pub use credentials::{Credentials, RawSignUp, SignUpRequest};
pub use identity::{AuthError, GatewaySession, Identity};
pub use profile::{CompanyDetails, ProfileRecord, RoleDetails, StudentDetails, UserRole};
