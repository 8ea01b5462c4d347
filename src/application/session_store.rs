//! Session store: the client-side authentication state machine.
//!
//! Holds the process-wide session snapshot and is its only writer. Every
//! mutation flows through the transitions defined here, triggered either by
//! a user action (the sign-in/sign-up/sign-out entry points) or by the
//! gateway's pushed session events. Consumers subscribe to the snapshot
//! channel and stay read-only.
//!
//! Interleaved async operations are serialized by outcome, not by blocking:
//! each state-committing operation claims a generation number when it
//! starts, and only the newest generation may write its result. A stale
//! in-flight fetch that loses the race resolves normally for its caller but
//! its state update is discarded.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::domain::auth::{AuthError, Credentials, SignUpRequest, UserAccount};
use crate::domain::session::SessionSnapshot;
use crate::ports::{AuthGateway, OAuthProvider, SessionEvent, SessionEvents, SignUpOutcome};

/// Discriminated result of a sign-up, handed back to the calling form.
///
/// The pending-verification message is informational and travels here, on
/// the success path - never through the snapshot's `error` field.
#[derive(Debug, Clone, PartialEq)]
pub enum SignUpCompletion {
    /// The account is active and the session is established.
    SignedIn(UserAccount),

    /// The account was created but the user must confirm their email
    /// before signing in.
    ConfirmationRequired { message: String },
}

/// Process-wide session state container.
///
/// Create one per process, wrap it in an `Arc`, call
/// [`SessionStore::spawn_session_listener`] once at startup, and kick off
/// the initial session check with [`SessionStore::refresh`]. Views and the
/// route guard consume [`SessionStore::subscribe`].
pub struct SessionStore {
    gateway: Arc<dyn AuthGateway>,
    state: watch::Sender<SessionSnapshot>,
    generation: AtomicU64,
}

impl SessionStore {
    /// Creates a store in the initial `Unknown` (loading) state.
    pub fn new(gateway: Arc<dyn AuthGateway>) -> Self {
        let (state, _) = watch::channel(SessionSnapshot::unknown());
        Self {
            gateway,
            state,
            generation: AtomicU64::new(0),
        }
    }

    /// Subscribes to session snapshots. The receiver always holds the
    /// latest value; the route guard re-evaluates on every change.
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.state.subscribe()
    }

    /// Returns the current snapshot.
    pub fn snapshot(&self) -> SessionSnapshot {
        self.state.borrow().clone()
    }

    /// Signs in with email and password.
    ///
    /// The profile is resolved as part of the operation, so a successful
    /// sign-in always commits a fully resolved account. A missing profile
    /// row still succeeds, with `profile: None`.
    pub async fn sign_in(&self, credentials: &Credentials) -> Result<UserAccount, AuthError> {
        let generation = self.begin_operation();

        let resolved = self.resolve_sign_in(credentials).await;
        match resolved {
            Ok(account) => {
                self.commit_if_current(
                    generation,
                    SessionSnapshot::authenticated(account.clone()),
                );
                Ok(account)
            }
            Err(error) => {
                self.commit_if_current(generation, SessionSnapshot::failed(error.to_string()));
                Err(error)
            }
        }
    }

    /// Registers a new account.
    ///
    /// If the gateway activates the account immediately the session is
    /// established; if it requires email verification the store stays
    /// `Unauthenticated` and the informational message is returned to the
    /// caller.
    pub async fn sign_up(&self, request: &SignUpRequest) -> Result<SignUpCompletion, AuthError> {
        let generation = self.begin_operation();

        match self.gateway.sign_up(request).await {
            Ok(SignUpOutcome::Active(identity)) => {
                match self.gateway.fetch_profile(&identity.id).await {
                    Ok(profile) => {
                        let account = UserAccount::new(identity, profile);
                        self.commit_if_current(
                            generation,
                            SessionSnapshot::authenticated(account.clone()),
                        );
                        Ok(SignUpCompletion::SignedIn(account))
                    }
                    Err(error) => {
                        self.commit_if_current(
                            generation,
                            SessionSnapshot::failed(error.to_string()),
                        );
                        Err(error)
                    }
                }
            }
            Ok(SignUpOutcome::PendingVerification { message }) => {
                self.commit_if_current(generation, SessionSnapshot::unauthenticated());
                Ok(SignUpCompletion::ConfirmationRequired { message })
            }
            Err(error) => {
                self.commit_if_current(generation, SessionSnapshot::failed(error.to_string()));
                Err(error)
            }
        }
    }

    /// Starts a redirect-based OAuth sign-in.
    ///
    /// On success the store is left untouched - the session arrives later
    /// through the push listener once the redirect completes. Only a
    /// failure to even start the flow surfaces as an error.
    pub async fn sign_in_with_oauth(
        &self,
        provider: OAuthProvider,
        redirect_target: &str,
    ) -> Result<(), AuthError> {
        self.clear_error();
        match self
            .gateway
            .sign_in_with_oauth(provider, redirect_target)
            .await
        {
            Ok(()) => Ok(()),
            Err(error) => {
                self.bump_generation();
                self.state
                    .send_replace(SessionSnapshot::failed(error.to_string()));
                Err(error)
            }
        }
    }

    /// Signs out.
    ///
    /// The local session is cleared whether or not the remote call
    /// succeeds - a broken sign-out must never leave the UI stuck
    /// authenticated. Remote failures are logged and swallowed.
    pub async fn sign_out(&self) {
        self.begin_operation();

        if let Err(error) = self.gateway.sign_out().await {
            warn!(%error, "remote sign-out failed; clearing local session anyway");
        }
        self.force_unauthenticated();
    }

    /// Resolves the gateway's current identity and its profile.
    ///
    /// This is both the initial session check and the reaction to a pushed
    /// `SignedIn` event. `Ok(None)` means no session exists. A missing
    /// profile row is a degraded success, not an error.
    ///
    /// Only the newest outstanding operation commits state; a superseded
    /// call still returns its resolved value to its caller.
    pub async fn refresh(&self) -> Result<Option<UserAccount>, AuthError> {
        let generation = self.begin_operation();

        let resolved = self.resolve_current_account().await;
        match resolved {
            Ok(Some(account)) => {
                self.commit_if_current(
                    generation,
                    SessionSnapshot::authenticated(account.clone()),
                );
                Ok(Some(account))
            }
            Ok(None) => {
                self.commit_if_current(generation, SessionSnapshot::unauthenticated());
                Ok(None)
            }
            Err(error) => {
                self.commit_if_current(generation, SessionSnapshot::failed(error.to_string()));
                Err(error)
            }
        }
    }

    /// Drops any displayed error without touching the rest of the state.
    pub fn clear_error(&self) {
        self.state.send_if_modified(|snapshot| {
            if snapshot.error().is_none() {
                return false;
            }
            *snapshot = snapshot.without_error();
            true
        });
    }

    /// Subscribes to the gateway's push channel and drives the store from
    /// it on a background task. Abort the handle at teardown to release
    /// the subscription.
    pub fn spawn_session_listener(self: &Arc<Self>) -> JoinHandle<()> {
        let events = self.gateway.session_events();
        let store = Arc::clone(self);
        tokio::spawn(async move { store.run_session_listener(events).await })
    }

    /// Processes pushed session events in delivery order until the
    /// channel closes.
    ///
    /// A `SignedIn` event records the session provisionally and resolves
    /// the full account; a `SignedOut` event clears the session
    /// immediately. Either way the event claims a fresh generation, so a
    /// profile fetch still in flight for an older event can no longer
    /// write state.
    pub async fn run_session_listener(self: Arc<Self>, mut events: SessionEvents) {
        debug!("session listener started");
        while let Some(event) = events.recv().await {
            match event {
                SessionEvent::SignedIn(session) => {
                    self.bump_generation();
                    self.state
                        .send_replace(SessionSnapshot::provisional(session.identity));
                    if let Err(error) = self.refresh().await {
                        warn!(%error, "failed to resolve pushed session");
                    }
                }
                SessionEvent::SignedOut => self.force_unauthenticated(),
            }
        }
        debug!("session listener stopped: gateway channel closed");
    }

    /// Claims a new generation and enters `Authenticating` with the error
    /// cleared.
    fn begin_operation(&self) -> u64 {
        let generation = self.bump_generation();
        self.state
            .send_replace(self.snapshot().begin_operation());
        generation
    }

    fn bump_generation(&self) -> u64 {
        self.generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Clears the session unconditionally, invalidating every in-flight
    /// operation first.
    fn force_unauthenticated(&self) {
        self.bump_generation();
        self.state.send_replace(SessionSnapshot::unauthenticated());
    }

    /// Writes `next` only if `generation` is still the newest claimed.
    fn commit_if_current(&self, generation: u64, next: SessionSnapshot) -> bool {
        let committed = self.state.send_if_modified(|current| {
            if self.generation.load(Ordering::SeqCst) != generation {
                return false;
            }
            *current = next;
            true
        });
        if !committed {
            debug!(generation, "discarding superseded session update");
        }
        committed
    }

    async fn resolve_sign_in(&self, credentials: &Credentials) -> Result<UserAccount, AuthError> {
        let identity = self.gateway.sign_in(credentials).await?;
        let profile = self.gateway.fetch_profile(&identity.id).await?;
        Ok(UserAccount::new(identity, profile))
    }

    async fn resolve_current_account(&self) -> Result<Option<UserAccount>, AuthError> {
        let identity = match self.gateway.current_identity().await? {
            Some(identity) => identity,
            None => return Ok(None),
        };
        let profile = self.gateway.fetch_profile(&identity.id).await?;
        Ok(Some(UserAccount::new(identity, profile)))
    }
}
