//! Route guard: a pure function of (session state, route policy).
//!
//! The guard is re-evaluated on every session change - pushed gateway
//! events can flip the decision long after a view first rendered, e.g.
//! when an OAuth redirect completes or a token silently expires.

use crate::domain::session::SessionSnapshot;

/// Auth requirement declared on a route.
///
/// Routes require authentication by default; guest-only routes (the auth
/// entry itself) redirect signed-in users away.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoutePolicy {
    pub requires_auth: bool,
}

impl RoutePolicy {
    /// Policy for routes only signed-in users may see.
    pub fn protected() -> Self {
        Self {
            requires_auth: true,
        }
    }

    /// Policy for routes only signed-out users may see (login, sign-up).
    pub fn guest_only() -> Self {
        Self {
            requires_auth: false,
        }
    }
}

impl Default for RoutePolicy {
    fn default() -> Self {
        Self::protected()
    }
}

/// Outcome of a guard evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteDecision {
    /// Session state is still loading; render a neutral indicator and make
    /// no redirect decision yet.
    ShowLoading,

    /// Render the requested view.
    Render,

    /// Send the visitor to the auth entry, remembering where they were
    /// headed so the form can return them there after success.
    RedirectToAuth { to: String, return_to: String },

    /// Send an already-signed-in visitor to the default landing view.
    RedirectToApp { to: String },
}

/// Decision function gating view rendering.
#[derive(Debug, Clone)]
pub struct RouteGuard {
    auth_entry_path: String,
    home_path: String,
}

impl RouteGuard {
    /// Creates a guard with the auth entry path and the default landing
    /// path for authenticated users.
    pub fn new(auth_entry_path: impl Into<String>, home_path: impl Into<String>) -> Self {
        Self {
            auth_entry_path: auth_entry_path.into(),
            home_path: home_path.into(),
        }
    }

    /// Path of the auth entry view.
    pub fn auth_entry_path(&self) -> &str {
        &self.auth_entry_path
    }

    /// Default landing path for signed-in users.
    pub fn home_path(&self) -> &str {
        &self.home_path
    }

    /// Decides what to do for a navigation to `requested_path`.
    ///
    /// Pure and side-effect-free; callers re-run it whenever the session
    /// snapshot changes.
    pub fn decide(
        &self,
        session: &SessionSnapshot,
        policy: RoutePolicy,
        requested_path: &str,
    ) -> RouteDecision {
        if session.is_loading() {
            return RouteDecision::ShowLoading;
        }

        if policy.requires_auth && !session.is_authenticated() {
            return RouteDecision::RedirectToAuth {
                to: self.auth_entry_path.clone(),
                return_to: requested_path.to_string(),
            };
        }

        if !policy.requires_auth && session.is_authenticated() {
            return RouteDecision::RedirectToApp {
                to: self.home_path.clone(),
            };
        }

        RouteDecision::Render
    }
}
