//! The session snapshot consumed by the route guard and views.
//!
//! Snapshots are immutable values; the session store replaces the current
//! one on every transition. All constructors keep the core invariant:
//! a snapshot reports authenticated only when it carries a user account.

use crate::domain::auth::{Identity, UserAccount};

use super::phase::SessionPhase;

/// Point-in-time view of the client session.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SessionSnapshot {
    phase: SessionPhase,
    user: Option<UserAccount>,
    error: Option<String>,
}

impl SessionSnapshot {
    /// Initial state at process start: session unknown, loading.
    pub fn unknown() -> Self {
        Self::default()
    }

    /// Rest state with no session.
    pub fn unauthenticated() -> Self {
        Self {
            phase: SessionPhase::Unauthenticated,
            user: None,
            error: None,
        }
    }

    /// Rest state for a resolved account.
    pub fn authenticated(account: UserAccount) -> Self {
        Self {
            phase: SessionPhase::Authenticated,
            user: Some(account),
            error: None,
        }
    }

    /// Failed operation: back to the logged-out shape with the message the
    /// UI should render.
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            phase: SessionPhase::Unauthenticated,
            user: None,
            error: Some(message.into()),
        }
    }

    /// Enters `Authenticating` for a new operation, clearing any prior
    /// error. The current user is carried so an already-signed-in view
    /// doesn't flash empty during a re-check.
    pub fn begin_operation(&self) -> Self {
        Self {
            phase: SessionPhase::Authenticating,
            user: self.user.clone(),
            error: None,
        }
    }

    /// Records a pushed gateway session before its profile is resolved.
    /// The identity is visible but the snapshot does not report
    /// authenticated until the profile fetch completes.
    pub fn provisional(identity: Identity) -> Self {
        Self {
            phase: SessionPhase::Authenticating,
            user: Some(UserAccount::from_identity(identity)),
            error: None,
        }
    }

    /// The same snapshot with the error message dropped.
    pub fn without_error(&self) -> Self {
        Self {
            phase: self.phase,
            user: self.user.clone(),
            error: None,
        }
    }

    /// Current lifecycle phase.
    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    /// The signed-in (or provisionally recorded) account, if any.
    pub fn user(&self) -> Option<&UserAccount> {
        self.user.as_ref()
    }

    /// Message from the last failed operation, if any.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// True only in the `Authenticated` rest state, which by construction
    /// always carries a user.
    pub fn is_authenticated(&self) -> bool {
        self.phase == SessionPhase::Authenticated
    }

    /// True while any auth operation or the initial check is outstanding.
    pub fn is_loading(&self) -> bool {
        self.phase.is_loading()
    }
}
