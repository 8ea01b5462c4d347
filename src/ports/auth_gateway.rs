//! Auth gateway port: credential verification and session issuance.
//!
//! The gateway is a managed external service; this port is everything the
//! client core knows about it. Besides the request/response calls there is
//! one push channel: session-changed events arrive out of band (an OAuth
//! redirect completing, a token silently refreshing or expiring) and drive
//! the session store without any polling.

use async_trait::async_trait;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::sync::mpsc;

use crate::domain::auth::{
    AuthError, Credentials, GatewaySession, Identity, ProfileRecord, SignUpRequest,
};
use crate::domain::foundation::UserId;

/// External identity providers supported for redirect-based sign-in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OAuthProvider {
    Google,
}

impl std::fmt::Display for OAuthProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OAuthProvider::Google => write!(f, "google"),
        }
    }
}

/// Outcome of a sign-up call.
///
/// An explicit tag, not a payload-shape check: the gateway either activated
/// the account immediately or parked it behind email verification.
#[derive(Debug, Clone, PartialEq)]
pub enum SignUpOutcome {
    /// The account is active and signed in.
    Active(Identity),

    /// The account exists but the user must confirm their email first.
    /// The message is informational, for the form to display; it is not
    /// an error.
    PendingVerification { message: String },
}

/// One notification on the session push channel.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// A session was established or refreshed for this identity.
    SignedIn(GatewaySession),

    /// The session ended (sign-out, expiry, revocation).
    SignedOut,
}

/// Subscription to the gateway's session-changed push channel.
///
/// Events arrive in the order the gateway emitted them. Dropping the
/// subscription releases it; `recv` then at the gateway's side returns
/// `None` once the gateway itself goes away.
#[derive(Debug)]
pub struct SessionEvents {
    rx: mpsc::UnboundedReceiver<SessionEvent>,
}

impl SessionEvents {
    /// Wraps a receiver handed out by a gateway implementation.
    pub fn new(rx: mpsc::UnboundedReceiver<SessionEvent>) -> Self {
        Self { rx }
    }

    /// Waits for the next session event; `None` when the gateway has
    /// closed the channel.
    pub async fn recv(&mut self) -> Option<SessionEvent> {
        self.rx.recv().await
    }
}

impl futures::Stream for SessionEvents {
    type Item = SessionEvent;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.rx.poll_recv(cx)
    }
}

/// Port for the managed auth backend.
///
/// # Contract
///
/// Implementations must:
/// - Report invalid credentials and duplicate accounts through `AuthError`,
///   never through panics or sentinel values
/// - Return `Ok(None)` from `fetch_profile` when the profile row is
///   missing ("not found" is a degraded success, not an error)
/// - Deliver session events on every subscription, in emission order
#[async_trait]
pub trait AuthGateway: Send + Sync {
    /// Registers a new account and seeds its profile.
    ///
    /// Returns `SignUpOutcome::PendingVerification` when the backend
    /// requires email confirmation before the account becomes active.
    async fn sign_up(&self, request: &SignUpRequest) -> Result<SignUpOutcome, AuthError>;

    /// Verifies an email/password pair and issues a session.
    async fn sign_in(&self, credentials: &Credentials) -> Result<Identity, AuthError>;

    /// Starts a redirect-based OAuth flow.
    ///
    /// On success the call returns immediately; the resulting session (if
    /// the user completes the flow) arrives later as a `SignedIn` event.
    async fn sign_in_with_oauth(
        &self,
        provider: OAuthProvider,
        redirect_target: &str,
    ) -> Result<(), AuthError>;

    /// Ends the current session.
    async fn sign_out(&self) -> Result<(), AuthError>;

    /// Returns the identity of the current session, if one exists.
    async fn current_identity(&self) -> Result<Option<Identity>, AuthError>;

    /// Fetches the profile record for an identity. `Ok(None)` means the
    /// row does not exist.
    async fn fetch_profile(&self, user_id: &UserId) -> Result<Option<ProfileRecord>, AuthError>;

    /// Subscribes to session-changed notifications.
    fn session_events(&self) -> SessionEvents;
}
