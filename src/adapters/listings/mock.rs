//! Mock listing gateway for testing.
//!
//! Keeps the catalog, saved listings, and applications in memory and
//! applies the same `ListingFilters` the backend would, so store tests see
//! realistic filtered responses.
//!
//! # Panics
//!
//! Methods may panic if internal locks are poisoned. This is acceptable
//! for test code but this adapter should NOT be used in production.

use std::collections::{HashMap, HashSet};
use std::sync::RwLock;

use async_trait::async_trait;

use crate::domain::foundation::{ApplicationId, ListingId, StateMachine, UserId};
use crate::domain::listings::{Application, ApplicationStatus, Listing, ListingFilters};
use crate::ports::{ListingError, ListingGateway};

/// Mock listing gateway for testing.
#[derive(Default)]
pub struct MockListingGateway {
    listings: RwLock<Vec<Listing>>,
    saved: RwLock<HashMap<UserId, HashSet<ListingId>>>,
    applications: RwLock<Vec<Application>>,
    force_error: RwLock<Option<ListingError>>,
}

impl MockListingGateway {
    /// Creates a new empty mock gateway.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a listing to the catalog.
    pub fn with_listing(self, listing: Listing) -> Self {
        self.listings.write().unwrap().push(listing);
        self
    }

    /// Adds an existing application.
    pub fn with_application(self, application: Application) -> Self {
        self.applications.write().unwrap().push(application);
        self
    }

    /// Forces all calls to return the specified error.
    pub fn with_error(self, error: ListingError) -> Self {
        *self.force_error.write().unwrap() = Some(error);
        self
    }

    /// Clears the forced error.
    pub fn clear_error(&self) {
        *self.force_error.write().unwrap() = None;
    }

    /// Returns the ids a user has saved.
    pub fn saved_ids(&self, user_id: &UserId) -> HashSet<ListingId> {
        self.saved
            .read()
            .unwrap()
            .get(user_id)
            .cloned()
            .unwrap_or_default()
    }

    fn forced_error(&self) -> Option<ListingError> {
        self.force_error.read().unwrap().clone()
    }
}

#[async_trait]
impl ListingGateway for MockListingGateway {
    async fn list_listings(&self, filters: &ListingFilters) -> Result<Vec<Listing>, ListingError> {
        if let Some(error) = self.forced_error() {
            return Err(error);
        }
        Ok(filters.apply(&self.listings.read().unwrap()))
    }

    async fn get_listing(&self, id: &ListingId) -> Result<Listing, ListingError> {
        if let Some(error) = self.forced_error() {
            return Err(error);
        }
        self.listings
            .read()
            .unwrap()
            .iter()
            .find(|listing| listing.id == *id)
            .cloned()
            .ok_or(ListingError::ListingNotFound)
    }

    async fn submit_application(
        &self,
        listing_id: &ListingId,
        student_id: &UserId,
    ) -> Result<Application, ListingError> {
        if let Some(error) = self.forced_error() {
            return Err(error);
        }
        if !self
            .listings
            .read()
            .unwrap()
            .iter()
            .any(|listing| listing.id == *listing_id)
        {
            return Err(ListingError::ListingNotFound);
        }
        let duplicate = self.applications.read().unwrap().iter().any(|app| {
            app.listing_id == *listing_id && app.student_id == *student_id && app.is_open()
        });
        if duplicate {
            return Err(ListingError::rejected("already applied to this listing"));
        }

        let application = Application::new(*listing_id, student_id.clone());
        self.applications
            .write()
            .unwrap()
            .push(application.clone());
        Ok(application)
    }

    async fn saved_listings(&self, user_id: &UserId) -> Result<Vec<Listing>, ListingError> {
        if let Some(error) = self.forced_error() {
            return Err(error);
        }
        let ids = self.saved_ids(user_id);
        Ok(self
            .listings
            .read()
            .unwrap()
            .iter()
            .filter(|listing| ids.contains(&listing.id))
            .cloned()
            .collect())
    }

    async fn set_saved(
        &self,
        listing_id: &ListingId,
        user_id: &UserId,
        saved: bool,
    ) -> Result<(), ListingError> {
        if let Some(error) = self.forced_error() {
            return Err(error);
        }
        let mut map = self.saved.write().unwrap();
        let entry = map.entry(user_id.clone()).or_default();
        if saved {
            entry.insert(*listing_id);
        } else {
            entry.remove(listing_id);
        }
        Ok(())
    }

    async fn applications_for(&self, user_id: &UserId) -> Result<Vec<Application>, ListingError> {
        if let Some(error) = self.forced_error() {
            return Err(error);
        }
        let mut applications: Vec<Application> = self
            .applications
            .read()
            .unwrap()
            .iter()
            .filter(|app| app.student_id == *user_id)
            .cloned()
            .collect();
        applications.sort_by(|a, b| b.applied_at.cmp(&a.applied_at));
        Ok(applications)
    }

    async fn update_application_status(
        &self,
        id: &ApplicationId,
        status: ApplicationStatus,
    ) -> Result<Application, ListingError> {
        if let Some(error) = self.forced_error() {
            return Err(error);
        }
        let mut applications = self.applications.write().unwrap();
        let application = applications
            .iter_mut()
            .find(|app| app.id == *id)
            .ok_or(ListingError::ApplicationNotFound)?;
        application
            .update_status(status)
            .map_err(|err| ListingError::rejected(err.to_string()))?;
        Ok(application.clone())
    }

    async fn withdraw_application(&self, id: &ApplicationId) -> Result<(), ListingError> {
        if let Some(error) = self.forced_error() {
            return Err(error);
        }
        let mut applications = self.applications.write().unwrap();
        let position = applications
            .iter()
            .position(|app| app.id == *id)
            .ok_or(ListingError::ApplicationNotFound)?;
        let application = &applications[position];
        if !application.status.can_transition_to(&ApplicationStatus::Withdrawn) {
            return Err(ListingError::rejected("application already decided"));
        }
        applications.remove(position);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::Timestamp;
    use crate::domain::listings::CompanySummary;

    fn listing(title: &str, location: &str) -> Listing {
        Listing {
            id: ListingId::new(),
            title: title.to_string(),
            description: format!("{} role", title),
            location: location.to_string(),
            employment_type: "remote".to_string(),
            duration: "3 months".to_string(),
            company: CompanySummary::named("Acme Robotics"),
            posted_at: Timestamp::now(),
        }
    }

    fn student() -> UserId {
        UserId::new("student-1").unwrap()
    }

    #[tokio::test]
    async fn list_listings_applies_filters() {
        let gateway = MockListingGateway::new()
            .with_listing(listing("Backend Intern", "Berlin"))
            .with_listing(listing("Frontend Intern", "Hamburg"));

        let filters = ListingFilters {
            location: "berlin".to_string(),
            ..Default::default()
        };
        let result = gateway.list_listings(&filters).await.unwrap();

        assert_eq!(result.len(), 1);
        assert_eq!(result[0].title, "Backend Intern");
    }

    #[tokio::test]
    async fn get_listing_reports_missing_rows() {
        let gateway = MockListingGateway::new();
        assert_eq!(
            gateway.get_listing(&ListingId::new()).await,
            Err(ListingError::ListingNotFound)
        );
    }

    #[tokio::test]
    async fn submit_application_rejects_duplicates() {
        let posting = listing("Backend Intern", "Berlin");
        let listing_id = posting.id;
        let gateway = MockListingGateway::new().with_listing(posting);

        gateway
            .submit_application(&listing_id, &student())
            .await
            .unwrap();
        let second = gateway.submit_application(&listing_id, &student()).await;

        assert!(matches!(second, Err(ListingError::Rejected(_))));
    }

    #[tokio::test]
    async fn save_toggle_round_trips() {
        let posting = listing("Backend Intern", "Berlin");
        let listing_id = posting.id;
        let gateway = MockListingGateway::new().with_listing(posting);

        gateway.set_saved(&listing_id, &student(), true).await.unwrap();
        assert_eq!(gateway.saved_listings(&student()).await.unwrap().len(), 1);

        gateway
            .set_saved(&listing_id, &student(), false)
            .await
            .unwrap();
        assert!(gateway.saved_listings(&student()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn update_status_validates_the_transition() {
        let posting = listing("Backend Intern", "Berlin");
        let listing_id = posting.id;
        let gateway = MockListingGateway::new().with_listing(posting);
        let application = gateway
            .submit_application(&listing_id, &student())
            .await
            .unwrap();

        let skipped = gateway
            .update_application_status(&application.id, ApplicationStatus::Offered)
            .await;
        assert!(matches!(skipped, Err(ListingError::Rejected(_))));

        let reviewed = gateway
            .update_application_status(&application.id, ApplicationStatus::UnderReview)
            .await
            .unwrap();
        assert_eq!(reviewed.status, ApplicationStatus::UnderReview);
    }

    #[tokio::test]
    async fn withdraw_removes_open_applications_only() {
        let posting = listing("Backend Intern", "Berlin");
        let listing_id = posting.id;
        let gateway = MockListingGateway::new().with_listing(posting);
        let application = gateway
            .submit_application(&listing_id, &student())
            .await
            .unwrap();

        gateway
            .update_application_status(&application.id, ApplicationStatus::UnderReview)
            .await
            .unwrap();
        gateway
            .update_application_status(&application.id, ApplicationStatus::Rejected)
            .await
            .unwrap();

        let result = gateway.withdraw_application(&application.id).await;
        assert!(matches!(result, Err(ListingError::Rejected(_))));
    }

    #[tokio::test]
    async fn forced_error_overrides_every_call() {
        let gateway = MockListingGateway::new().with_error(ListingError::transport("down"));
        assert!(gateway
            .list_listings(&ListingFilters::default())
            .await
            .is_err());

        gateway.clear_error();
        assert!(gateway
            .list_listings(&ListingFilters::default())
            .await
            .is_ok());
    }
}
