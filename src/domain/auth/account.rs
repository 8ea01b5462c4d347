//! The combined identity + profile view held by the session store.

use serde::{Deserialize, Serialize};

use super::identity::Identity;
use super::profile::{ProfileRecord, UserRole};
use crate::domain::foundation::UserId;

/// An authenticated user as the client sees one: the gateway identity plus
/// the application profile.
///
/// The profile is optional - a missing profile row is a valid (degraded)
/// state, not an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserAccount {
    pub identity: Identity,
    pub profile: Option<ProfileRecord>,
}

impl UserAccount {
    /// Creates an account from identity and an optional profile.
    pub fn new(identity: Identity, profile: Option<ProfileRecord>) -> Self {
        Self { identity, profile }
    }

    /// Creates a profile-less account, as seen right after sign-up before
    /// the profile fetch completes.
    pub fn from_identity(identity: Identity) -> Self {
        Self {
            identity,
            profile: None,
        }
    }

    /// Returns the gateway user id.
    pub fn id(&self) -> &UserId {
        &self.identity.id
    }

    /// Returns the account role, if the profile has been resolved.
    pub fn user_type(&self) -> Option<UserRole> {
        self.profile.as_ref().map(|p| p.user_type())
    }

    /// Returns true for resolved student accounts.
    pub fn is_student(&self) -> bool {
        self.user_type() == Some(UserRole::Student)
    }

    /// Returns true for resolved company accounts.
    pub fn is_company(&self) -> bool {
        self.user_type() == Some(UserRole::Company)
    }

    /// Returns the profile display name, or the email as fallback.
    pub fn display_name(&self) -> &str {
        self.profile
            .as_ref()
            .map(|p| p.full_name.as_str())
            .unwrap_or(&self.identity.email)
    }
}
