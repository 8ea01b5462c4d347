//! Listing gateway port: catalog reads, saved listings, and applications.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::foundation::{ApplicationId, ListingId, UserId};
use crate::domain::listings::{Application, ApplicationStatus, Listing, ListingFilters};

/// Errors surfaced by the listing backend.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ListingError {
    /// No listing exists with the requested id.
    #[error("Listing not found")]
    ListingNotFound,

    /// No application exists with the requested id.
    #[error("Application not found")]
    ApplicationNotFound,

    /// The backend rejected the request (e.g. duplicate application).
    #[error("Request rejected: {0}")]
    Rejected(String),

    /// Network or backend failure.
    #[error("Listing service unreachable: {0}")]
    Transport(String),
}

impl ListingError {
    /// Creates a transport error with a message.
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport(message.into())
    }

    /// Creates a rejection with a reason.
    pub fn rejected(reason: impl Into<String>) -> Self {
        Self::Rejected(reason.into())
    }

    /// Returns true if this error may succeed on retry.
    pub fn is_transient(&self) -> bool {
        matches!(self, ListingError::Transport(_))
    }
}

/// Port for the managed listing backend.
///
/// # Contract
///
/// Implementations must:
/// - Return listings already filtered by the given criteria and ordered
///   newest first
/// - Return `ListingNotFound` / `ApplicationNotFound` for missing rows
/// - Return `Transport` for transient backend failures
#[async_trait]
pub trait ListingGateway: Send + Sync {
    /// Fetches listings matching the filters, newest first.
    async fn list_listings(&self, filters: &ListingFilters) -> Result<Vec<Listing>, ListingError>;

    /// Fetches a single listing by id.
    async fn get_listing(&self, id: &ListingId) -> Result<Listing, ListingError>;

    /// Submits an application for a listing on behalf of a student.
    async fn submit_application(
        &self,
        listing_id: &ListingId,
        student_id: &UserId,
    ) -> Result<Application, ListingError>;

    /// Fetches the listings a user has saved.
    async fn saved_listings(&self, user_id: &UserId) -> Result<Vec<Listing>, ListingError>;

    /// Saves or unsaves a listing for a user. Idempotent on both sides.
    async fn set_saved(
        &self,
        listing_id: &ListingId,
        user_id: &UserId,
        saved: bool,
    ) -> Result<(), ListingError>;

    /// Fetches a user's applications, newest first.
    async fn applications_for(&self, user_id: &UserId) -> Result<Vec<Application>, ListingError>;

    /// Moves an application to a new review status.
    async fn update_application_status(
        &self,
        id: &ApplicationId,
        status: ApplicationStatus,
    ) -> Result<Application, ListingError>;

    /// Withdraws (removes) an application.
    async fn withdraw_application(&self, id: &ApplicationId) -> Result<(), ListingError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn listing_gateway_trait_is_object_safe_and_send_sync() {
        fn _assert_trait_object(_: &dyn ListingGateway) {}
        fn _assert_arc_send_sync<T: Send + Sync + ?Sized>() {}
        _assert_arc_send_sync::<std::sync::Arc<dyn ListingGateway>>();
    }

    #[test]
    fn only_transport_errors_are_transient() {
        assert!(ListingError::transport("timeout").is_transient());
        assert!(!ListingError::ListingNotFound.is_transient());
        assert!(!ListingError::rejected("duplicate").is_transient());
    }

    #[test]
    fn errors_display_readable_messages() {
        assert_eq!(format!("{}", ListingError::ListingNotFound), "Listing not found");
        assert_eq!(
            format!("{}", ListingError::transport("dns failure")),
            "Listing service unreachable: dns failure"
        );
    }
}
