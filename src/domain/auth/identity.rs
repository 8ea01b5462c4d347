//! Identity types issued by the auth gateway.
//!
//! These are **domain types** with no provider dependencies - any managed
//! auth backend can populate them through the `AuthGateway` port.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::foundation::UserId;

/// The gateway's authoritative user record.
///
/// Carries only the claims the client actually uses; credential metadata
/// stays inside the gateway.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Identity {
    /// Unique identifier assigned by the auth gateway.
    pub id: UserId,

    /// Email address the account was registered with.
    pub email: String,

    /// Whether the gateway has confirmed the email address.
    pub email_verified: bool,
}

impl Identity {
    /// Creates a new identity record.
    pub fn new(id: UserId, email: impl Into<String>, email_verified: bool) -> Self {
        Self {
            id,
            email: email.into(),
            email_verified,
        }
    }
}

/// A live gateway session as delivered on the push channel.
///
/// Token storage and refresh are the gateway's concern; the client only
/// learns which identity the session belongs to.
#[derive(Debug, Clone, PartialEq)]
pub struct GatewaySession {
    pub identity: Identity,
}

impl GatewaySession {
    /// Creates a session wrapper for an identity.
    pub fn new(identity: Identity) -> Self {
        Self { identity }
    }
}

/// Authentication errors surfaced by the gateway.
///
/// These are **domain-centric** - they describe what went wrong from the
/// client's perspective, not the backend's. Transport failures are surfaced
/// through the same channel because the session store treats them
/// identically.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// The email/password pair was rejected.
    #[error("Invalid login credentials")]
    InvalidCredentials,

    /// An account already exists for this email address.
    #[error("User already registered")]
    DuplicateAccount,

    /// The OAuth redirect could not be started.
    #[error("Could not start {provider} sign-in: {reason}")]
    OAuthInitiation { provider: String, reason: String },

    /// Network or backend failure during a gateway call.
    #[error("Auth service unreachable: {0}")]
    Transport(String),
}

impl AuthError {
    /// Creates a transport error with a message.
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport(message.into())
    }

    /// Creates an OAuth initiation error.
    pub fn oauth_initiation(provider: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::OAuthInitiation {
            provider: provider.into(),
            reason: reason.into(),
        }
    }

    /// Returns true if this is a transient error that may succeed on retry.
    pub fn is_transient(&self) -> bool {
        matches!(self, AuthError::Transport(_))
    }
}
