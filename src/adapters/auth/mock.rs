//! Mock auth gateway for testing.
//!
//! Implements the `AuthGateway` port in memory, avoiding the need for the
//! real managed backend. Tests drive the push channel explicitly through
//! `emit_signed_in` / `emit_signed_out`, and can stall profile fetches with
//! `gate_profile_fetches` to exercise supersession ordering.
//!
//! # Panics
//!
//! Methods may panic if internal locks are poisoned. This is acceptable
//! for test code but this adapter should NOT be used in production.
//!
//! # Example
//!
//! ```ignore
//! use internlink::adapters::auth::MockAuthGateway;
//! use internlink::domain::auth::Credentials;
//!
//! let gateway = MockAuthGateway::new()
//!     .with_verified_user("ada@example.com", "secret1", "user-1");
//!
//! let creds = Credentials::new("ada@example.com", "secret1").unwrap();
//! let identity = gateway.sign_in(&creds).await.unwrap();
//! assert_eq!(identity.id.as_str(), "user-1");
//! ```

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, RwLock};

use async_trait::async_trait;
use secrecy::ExposeSecret;
use tokio::sync::{mpsc, oneshot};
use uuid::Uuid;

use crate::domain::auth::{
    AuthError, Credentials, GatewaySession, Identity, ProfileRecord, SignUpRequest, UserRole,
};
use crate::domain::foundation::UserId;
use crate::ports::{AuthGateway, OAuthProvider, SessionEvent, SessionEvents, SignUpOutcome};

/// Message the gateway attaches to a sign-up parked behind email
/// verification.
pub const VERIFICATION_EMAIL_MESSAGE: &str =
    "Please check your email for a verification link to complete your signup.";

#[derive(Debug, Clone)]
struct StoredAccount {
    password: String,
    identity: Identity,
}

#[derive(Default)]
struct GateState {
    enabled: AtomicBool,
    waiters: Mutex<VecDeque<oneshot::Sender<()>>>,
}

/// Test handle that holds gated profile fetches until released.
///
/// While the gate is held, every `fetch_profile` call parks in arrival
/// order. Dropping the gate releases everything so a forgotten release
/// cannot deadlock a test.
pub struct FetchGate {
    state: Arc<GateState>,
}

impl FetchGate {
    /// Number of fetches currently parked at the gate.
    pub fn waiting(&self) -> usize {
        self.state.waiters.lock().unwrap().len()
    }

    /// Releases the oldest parked fetch. Returns false if none was waiting.
    pub fn release_next(&self) -> bool {
        let waiter = self.state.waiters.lock().unwrap().pop_front();
        match waiter {
            Some(tx) => {
                let _ = tx.send(());
                true
            }
            None => false,
        }
    }

    /// Releases the newest parked fetch. Returns false if none was waiting.
    ///
    /// Lets a test resolve fetches in the reverse of their arrival order.
    pub fn release_newest(&self) -> bool {
        let waiter = self.state.waiters.lock().unwrap().pop_back();
        match waiter {
            Some(tx) => {
                let _ = tx.send(());
                true
            }
            None => false,
        }
    }

    /// Releases every parked fetch.
    pub fn release_all(&self) {
        while self.release_next() {}
    }
}

impl Drop for FetchGate {
    fn drop(&mut self) {
        self.state.enabled.store(false, Ordering::SeqCst);
        self.release_all();
    }
}

/// Mock auth gateway for testing.
///
/// Accounts are keyed by email; profiles by user id. The builder methods
/// configure the starting world, the runtime mutators reshape it
/// mid-test.
#[derive(Default)]
pub struct MockAuthGateway {
    accounts: RwLock<HashMap<String, StoredAccount>>,
    profiles: RwLock<HashMap<UserId, ProfileRecord>>,
    current: RwLock<Option<Identity>>,
    require_verification: RwLock<bool>,
    force_error: RwLock<Option<AuthError>>,
    fail_sign_out: RwLock<bool>,
    oauth_requests: Mutex<Vec<(OAuthProvider, String)>>,
    subscribers: Mutex<Vec<mpsc::UnboundedSender<SessionEvent>>>,
    profile_gate: Arc<GateState>,
}

impl MockAuthGateway {
    /// Creates a new empty mock gateway.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an account with an explicit identity.
    pub fn with_account(
        self,
        email: impl Into<String>,
        password: impl Into<String>,
        identity: Identity,
    ) -> Self {
        self.accounts.write().unwrap().insert(
            email.into(),
            StoredAccount {
                password: password.into(),
                identity,
            },
        );
        self
    }

    /// Registers a verified account with the given user id.
    ///
    /// Convenience wrapper for the common case.
    pub fn with_verified_user(
        self,
        email: impl Into<String>,
        password: impl Into<String>,
        user_id: impl Into<String>,
    ) -> Self {
        let email = email.into();
        let identity = Identity::new(UserId::new(user_id.into()).unwrap(), email.clone(), true);
        self.with_account(email, password, identity)
    }

    /// Stores a profile record.
    pub fn with_profile(self, profile: ProfileRecord) -> Self {
        self.profiles
            .write()
            .unwrap()
            .insert(profile.user_id.clone(), profile);
        self
    }

    /// Starts with an established session for the identity.
    pub fn with_current_session(self, identity: Identity) -> Self {
        *self.current.write().unwrap() = Some(identity);
        self
    }

    /// Makes sign-up park new accounts behind email verification.
    pub fn with_pending_verification(self) -> Self {
        *self.require_verification.write().unwrap() = true;
        self
    }

    /// Forces all auth calls to return the specified error.
    pub fn with_error(self, error: AuthError) -> Self {
        *self.force_error.write().unwrap() = Some(error);
        self
    }

    /// Makes only the remote sign-out call fail.
    pub fn with_sign_out_error(self) -> Self {
        *self.fail_sign_out.write().unwrap() = true;
        self
    }

    // === Runtime mutators ===

    /// Clears the forced error and returns to normal operation.
    pub fn clear_error(&self) {
        *self.force_error.write().unwrap() = None;
    }

    /// Replaces the current session at runtime.
    pub fn set_current_identity(&self, identity: Option<Identity>) {
        *self.current.write().unwrap() = identity;
    }

    /// Stores a profile at runtime.
    pub fn add_profile(&self, profile: ProfileRecord) {
        self.profiles
            .write()
            .unwrap()
            .insert(profile.user_id.clone(), profile);
    }

    /// Removes a profile, simulating a missing row.
    pub fn remove_profile(&self, user_id: &UserId) {
        self.profiles.write().unwrap().remove(user_id);
    }

    /// Pushes a signed-in event to every subscriber and records the
    /// session as current.
    pub fn emit_signed_in(&self, identity: Identity) {
        *self.current.write().unwrap() = Some(identity.clone());
        self.broadcast(SessionEvent::SignedIn(GatewaySession::new(identity)));
    }

    /// Pushes a signed-out event to every subscriber and clears the
    /// current session.
    pub fn emit_signed_out(&self) {
        *self.current.write().unwrap() = None;
        self.broadcast(SessionEvent::SignedOut);
    }

    /// Holds all subsequent profile fetches until the returned gate
    /// releases them.
    pub fn gate_profile_fetches(&self) -> FetchGate {
        self.profile_gate.enabled.store(true, Ordering::SeqCst);
        FetchGate {
            state: Arc::clone(&self.profile_gate),
        }
    }

    /// Returns the OAuth initiations recorded so far.
    pub fn oauth_requests(&self) -> Vec<(OAuthProvider, String)> {
        self.oauth_requests.lock().unwrap().clone()
    }

    fn broadcast(&self, event: SessionEvent) {
        self.subscribers
            .lock()
            .unwrap()
            .retain(|tx| tx.send(event.clone()).is_ok());
    }

    fn forced_error(&self) -> Option<AuthError> {
        self.force_error.read().unwrap().clone()
    }

    async fn wait_at_gate(&self) {
        let waiter = if self.profile_gate.enabled.load(Ordering::SeqCst) {
            let (tx, rx) = oneshot::channel();
            self.profile_gate.waiters.lock().unwrap().push_back(tx);
            Some(rx)
        } else {
            None
        };
        if let Some(rx) = waiter {
            let _ = rx.await;
        }
    }
}

#[async_trait]
impl AuthGateway for MockAuthGateway {
    async fn sign_up(&self, request: &SignUpRequest) -> Result<SignUpOutcome, AuthError> {
        if let Some(error) = self.forced_error() {
            return Err(error);
        }
        if self.accounts.read().unwrap().contains_key(request.email()) {
            return Err(AuthError::DuplicateAccount);
        }

        let identity = Identity::new(
            UserId::new(Uuid::new_v4().to_string()).unwrap(),
            request.email(),
            false,
        );
        self.accounts.write().unwrap().insert(
            request.email().to_string(),
            StoredAccount {
                password: request.password().expose_secret().clone(),
                identity: identity.clone(),
            },
        );

        // Seed the profile and role rows the way the backend trigger does.
        let profile = match request.user_type() {
            UserRole::Student => {
                ProfileRecord::new_student(identity.id.clone(), request.full_name())
            }
            UserRole::Company => {
                ProfileRecord::new_company(identity.id.clone(), request.full_name())
            }
        };
        self.profiles
            .write()
            .unwrap()
            .insert(identity.id.clone(), profile);

        if *self.require_verification.read().unwrap() {
            return Ok(SignUpOutcome::PendingVerification {
                message: VERIFICATION_EMAIL_MESSAGE.to_string(),
            });
        }

        *self.current.write().unwrap() = Some(identity.clone());
        Ok(SignUpOutcome::Active(identity))
    }

    async fn sign_in(&self, credentials: &Credentials) -> Result<Identity, AuthError> {
        if let Some(error) = self.forced_error() {
            return Err(error);
        }

        let account = self
            .accounts
            .read()
            .unwrap()
            .get(credentials.email())
            .cloned();
        match account {
            Some(stored) if stored.password == *credentials.password().expose_secret() => {
                *self.current.write().unwrap() = Some(stored.identity.clone());
                Ok(stored.identity)
            }
            _ => Err(AuthError::InvalidCredentials),
        }
    }

    async fn sign_in_with_oauth(
        &self,
        provider: OAuthProvider,
        redirect_target: &str,
    ) -> Result<(), AuthError> {
        if let Some(error) = self.forced_error() {
            return Err(error);
        }
        self.oauth_requests
            .lock()
            .unwrap()
            .push((provider, redirect_target.to_string()));
        Ok(())
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        if *self.fail_sign_out.read().unwrap() {
            return Err(AuthError::transport("sign-out request failed"));
        }
        if let Some(error) = self.forced_error() {
            return Err(error);
        }
        *self.current.write().unwrap() = None;
        Ok(())
    }

    async fn current_identity(&self) -> Result<Option<Identity>, AuthError> {
        if let Some(error) = self.forced_error() {
            return Err(error);
        }
        Ok(self.current.read().unwrap().clone())
    }

    async fn fetch_profile(&self, user_id: &UserId) -> Result<Option<ProfileRecord>, AuthError> {
        self.wait_at_gate().await;
        if let Some(error) = self.forced_error() {
            return Err(error);
        }
        Ok(self.profiles.read().unwrap().get(user_id).cloned())
    }

    fn session_events(&self) -> SessionEvents {
        let (tx, rx) = mpsc::unbounded_channel();
        self.subscribers.lock().unwrap().push(tx);
        SessionEvents::new(rx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_identity(id: &str, email: &str) -> Identity {
        Identity::new(UserId::new(id).unwrap(), email, true)
    }

    #[tokio::test]
    async fn sign_in_returns_identity_for_registered_account() {
        let gateway = MockAuthGateway::new().with_verified_user("ada@example.com", "secret1", "u1");

        let creds = Credentials::new("ada@example.com", "secret1").unwrap();
        let identity = gateway.sign_in(&creds).await.unwrap();

        assert_eq!(identity.id.as_str(), "u1");
        assert_eq!(
            gateway.current_identity().await.unwrap().unwrap().email,
            "ada@example.com"
        );
    }

    #[tokio::test]
    async fn sign_in_rejects_wrong_password() {
        let gateway = MockAuthGateway::new().with_verified_user("ada@example.com", "secret1", "u1");

        let creds = Credentials::new("ada@example.com", "wrong1").unwrap();
        let result = gateway.sign_in(&creds).await;

        assert_eq!(result, Err(AuthError::InvalidCredentials));
        assert!(gateway.current_identity().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn sign_in_rejects_unknown_account() {
        let gateway = MockAuthGateway::new();
        let creds = Credentials::new("who@example.com", "secret1").unwrap();
        assert_eq!(
            gateway.sign_in(&creds).await,
            Err(AuthError::InvalidCredentials)
        );
    }

    #[tokio::test]
    async fn sign_up_activates_account_and_seeds_profile() {
        let gateway = MockAuthGateway::new();
        let request =
            SignUpRequest::new("ada@example.com", "secret1", "Ada Lovelace", UserRole::Student)
                .unwrap();

        let outcome = gateway.sign_up(&request).await.unwrap();
        let identity = match outcome {
            SignUpOutcome::Active(identity) => identity,
            other => panic!("expected active outcome, got {:?}", other),
        };

        let profile = gateway.fetch_profile(&identity.id).await.unwrap().unwrap();
        assert_eq!(profile.full_name, "Ada Lovelace");
        assert_eq!(profile.user_type(), UserRole::Student);
    }

    #[tokio::test]
    async fn sign_up_with_verification_parks_the_account() {
        let gateway = MockAuthGateway::new().with_pending_verification();
        let request =
            SignUpRequest::new("ada@example.com", "secret1", "Ada", UserRole::Student).unwrap();

        let outcome = gateway.sign_up(&request).await.unwrap();

        assert_eq!(
            outcome,
            SignUpOutcome::PendingVerification {
                message: VERIFICATION_EMAIL_MESSAGE.to_string(),
            }
        );
        assert!(gateway.current_identity().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn sign_up_rejects_duplicate_email() {
        let gateway = MockAuthGateway::new().with_verified_user("ada@example.com", "secret1", "u1");
        let request =
            SignUpRequest::new("ada@example.com", "other1", "Ada", UserRole::Student).unwrap();

        assert_eq!(
            gateway.sign_up(&request).await,
            Err(AuthError::DuplicateAccount)
        );
    }

    #[tokio::test]
    async fn fetch_profile_returns_none_for_missing_row() {
        let gateway = MockAuthGateway::new();
        let result = gateway
            .fetch_profile(&UserId::new("ghost").unwrap())
            .await
            .unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn forced_error_overrides_every_call() {
        let gateway = MockAuthGateway::new()
            .with_verified_user("ada@example.com", "secret1", "u1")
            .with_error(AuthError::transport("backend down"));

        let creds = Credentials::new("ada@example.com", "secret1").unwrap();
        assert!(gateway.sign_in(&creds).await.is_err());
        assert!(gateway.current_identity().await.is_err());

        gateway.clear_error();
        assert!(gateway.sign_in(&creds).await.is_ok());
    }

    #[tokio::test]
    async fn oauth_initiation_is_recorded() {
        let gateway = MockAuthGateway::new();
        gateway
            .sign_in_with_oauth(OAuthProvider::Google, "https://app.example.com")
            .await
            .unwrap();

        let requests = gateway.oauth_requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].0, OAuthProvider::Google);
    }

    #[tokio::test]
    async fn emitted_events_reach_every_subscriber() {
        let gateway = MockAuthGateway::new();
        let mut first = gateway.session_events();
        let mut second = gateway.session_events();

        gateway.emit_signed_in(test_identity("u1", "ada@example.com"));
        gateway.emit_signed_out();

        for events in [&mut first, &mut second] {
            assert!(matches!(
                events.recv().await,
                Some(SessionEvent::SignedIn(_))
            ));
            assert!(matches!(events.recv().await, Some(SessionEvent::SignedOut)));
        }
    }

    #[tokio::test]
    async fn gate_parks_fetches_until_released() {
        let gateway = Arc::new(
            MockAuthGateway::new().with_profile(ProfileRecord::new_student(
                UserId::new("u1").unwrap(),
                "Ada",
            )),
        );
        let gate = gateway.gate_profile_fetches();

        let fetching = {
            let gateway = Arc::clone(&gateway);
            tokio::spawn(async move {
                gateway
                    .fetch_profile(&UserId::new("u1").unwrap())
                    .await
                    .unwrap()
            })
        };

        while gate.waiting() == 0 {
            tokio::task::yield_now().await;
        }
        assert!(!fetching.is_finished());

        assert!(gate.release_next());
        let profile = fetching.await.unwrap().unwrap();
        assert_eq!(profile.full_name, "Ada");
    }

    #[tokio::test]
    async fn dropping_the_gate_releases_parked_fetches() {
        let gateway = Arc::new(MockAuthGateway::new());
        let gate = gateway.gate_profile_fetches();

        let fetching = {
            let gateway = Arc::clone(&gateway);
            tokio::spawn(
                async move { gateway.fetch_profile(&UserId::new("u1").unwrap()).await },
            )
        };

        while gate.waiting() == 0 {
            tokio::task::yield_now().await;
        }
        drop(gate);

        assert!(fetching.await.unwrap().unwrap().is_none());
    }
}
