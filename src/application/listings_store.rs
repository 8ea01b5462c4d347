//! Listings store: client-side catalog, saved listings, and applications.
//!
//! The same thin request-lifecycle shape as the session store: clear the
//! error, delegate to the gateway, fold the outcome into the snapshot, and
//! hand the discriminated result back to the caller. Reads stay in memory -
//! filtering and pagination of the loaded catalog never hit the backend.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::debug;

use crate::domain::foundation::{ApplicationId, ListingId, UserId, ValidationError};
use crate::domain::listings::{
    Application, ApplicationStatus, Listing, ListingFilters, Page, DEFAULT_PAGE_SIZE,
};
use crate::ports::{ListingError, ListingGateway};

/// Point-in-time view of the catalog state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CatalogSnapshot {
    /// Listings as last loaded: filtered by the gateway, newest first.
    pub listings: Vec<Listing>,
    /// The listing opened in a detail view, if any.
    pub current_listing: Option<Listing>,
    /// Listings the user has saved.
    pub saved: Vec<Listing>,
    /// The user's applications, newest first.
    pub applications: Vec<Application>,
    /// Criteria the catalog was loaded with.
    pub filters: ListingFilters,
    /// 1-based page the views are showing.
    pub current_page: usize,
    pub is_loading: bool,
    pub error: Option<String>,
}

impl CatalogSnapshot {
    fn initial() -> Self {
        Self {
            current_page: 1,
            ..Self::default()
        }
    }

    /// Cuts the currently shown page out of the loaded listings.
    pub fn page(&self, per_page: usize) -> Result<Page<Listing>, ValidationError> {
        Page::paginate(self.listings.clone(), self.current_page, per_page)
    }

    /// The currently shown page at the default size.
    pub fn default_page(&self) -> Result<Page<Listing>, ValidationError> {
        self.page(DEFAULT_PAGE_SIZE)
    }

    /// Returns true if the user has saved the given listing.
    pub fn is_saved(&self, listing_id: &ListingId) -> bool {
        self.saved.iter().any(|listing| listing.id == *listing_id)
    }
}

/// Catalog state container over the listing gateway.
pub struct ListingsStore {
    gateway: Arc<dyn ListingGateway>,
    state: watch::Sender<CatalogSnapshot>,
}

impl ListingsStore {
    /// Creates an empty catalog store.
    pub fn new(gateway: Arc<dyn ListingGateway>) -> Self {
        let (state, _) = watch::channel(CatalogSnapshot::initial());
        Self { gateway, state }
    }

    /// Subscribes to catalog snapshots.
    pub fn subscribe(&self) -> watch::Receiver<CatalogSnapshot> {
        self.state.subscribe()
    }

    /// Returns the current snapshot.
    pub fn snapshot(&self) -> CatalogSnapshot {
        self.state.borrow().clone()
    }

    /// Replaces the filter criteria and jumps back to the first page.
    ///
    /// Call [`ListingsStore::load_listings`] afterwards to refresh the
    /// catalog against the new criteria.
    pub fn set_filters(&self, filters: ListingFilters) {
        self.state.send_modify(|snapshot| {
            snapshot.filters = filters;
            snapshot.current_page = 1;
        });
    }

    /// Clears every filter criterion and jumps back to the first page.
    pub fn clear_filters(&self) {
        self.set_filters(ListingFilters::default());
    }

    /// Moves the views to another (1-based) page of the loaded catalog.
    pub fn set_page(&self, page: usize) -> Result<(), ValidationError> {
        if page == 0 {
            return Err(ValidationError::out_of_range("current_page", 1, i32::MAX, 0));
        }
        self.state.send_modify(|snapshot| snapshot.current_page = page);
        Ok(())
    }

    /// Drops any displayed error.
    pub fn clear_error(&self) {
        self.state.send_modify(|snapshot| snapshot.error = None);
    }

    /// Closes the detail view.
    pub fn clear_current_listing(&self) {
        self.state
            .send_modify(|snapshot| snapshot.current_listing = None);
    }

    /// Loads the catalog with the current filters.
    pub async fn load_listings(&self) -> Result<Vec<Listing>, ListingError> {
        let filters = self.snapshot().filters;
        self.begin();
        match self.gateway.list_listings(&filters).await {
            Ok(listings) => {
                debug!(count = listings.len(), "catalog loaded");
                self.state.send_modify(|snapshot| {
                    snapshot.is_loading = false;
                    snapshot.listings = listings.clone();
                    snapshot.error = None;
                });
                Ok(listings)
            }
            Err(error) => {
                self.reject(&error);
                Err(error)
            }
        }
    }

    /// Loads one listing into the detail view.
    pub async fn load_listing(&self, id: &ListingId) -> Result<Listing, ListingError> {
        self.begin();
        match self.gateway.get_listing(id).await {
            Ok(listing) => {
                self.state.send_modify(|snapshot| {
                    snapshot.is_loading = false;
                    snapshot.current_listing = Some(listing.clone());
                    snapshot.error = None;
                });
                Ok(listing)
            }
            Err(error) => {
                self.reject(&error);
                Err(error)
            }
        }
    }

    /// Submits an application; on success it is prepended to the list.
    pub async fn apply_for_listing(
        &self,
        listing_id: &ListingId,
        student_id: &UserId,
    ) -> Result<Application, ListingError> {
        self.begin();
        match self.gateway.submit_application(listing_id, student_id).await {
            Ok(application) => {
                self.state.send_modify(|snapshot| {
                    snapshot.is_loading = false;
                    snapshot.applications.insert(0, application.clone());
                    snapshot.error = None;
                });
                Ok(application)
            }
            Err(error) => {
                self.reject(&error);
                Err(error)
            }
        }
    }

    /// Loads the user's saved listings.
    pub async fn load_saved(&self, user_id: &UserId) -> Result<Vec<Listing>, ListingError> {
        self.begin();
        match self.gateway.saved_listings(user_id).await {
            Ok(saved) => {
                self.state.send_modify(|snapshot| {
                    snapshot.is_loading = false;
                    snapshot.saved = saved.clone();
                    snapshot.error = None;
                });
                Ok(saved)
            }
            Err(error) => {
                self.reject(&error);
                Err(error)
            }
        }
    }

    /// Saves or unsaves a listing, mirroring the change locally.
    ///
    /// On save the listing joins the saved list if the loaded catalog
    /// knows it and it is not already there; on unsave it is removed.
    pub async fn toggle_saved(
        &self,
        listing_id: &ListingId,
        user_id: &UserId,
        save: bool,
    ) -> Result<(), ListingError> {
        self.gateway.set_saved(listing_id, user_id, save).await?;
        self.state.send_modify(|snapshot| {
            if save {
                let known = snapshot
                    .listings
                    .iter()
                    .find(|listing| listing.id == *listing_id)
                    .cloned();
                if let Some(listing) = known {
                    if !snapshot.is_saved(listing_id) {
                        snapshot.saved.push(listing);
                    }
                }
            } else {
                snapshot.saved.retain(|listing| listing.id != *listing_id);
            }
        });
        Ok(())
    }

    /// Loads the user's applications.
    pub async fn load_applications(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<Application>, ListingError> {
        self.begin();
        match self.gateway.applications_for(user_id).await {
            Ok(applications) => {
                self.state.send_modify(|snapshot| {
                    snapshot.is_loading = false;
                    snapshot.applications = applications.clone();
                    snapshot.error = None;
                });
                Ok(applications)
            }
            Err(error) => {
                self.reject(&error);
                Err(error)
            }
        }
    }

    /// Moves an application to a new status, replacing it in place.
    pub async fn update_application_status(
        &self,
        id: &ApplicationId,
        status: ApplicationStatus,
    ) -> Result<Application, ListingError> {
        let updated = self.gateway.update_application_status(id, status).await?;
        self.state.send_modify(|snapshot| {
            if let Some(slot) = snapshot
                .applications
                .iter_mut()
                .find(|app| app.id == updated.id)
            {
                *slot = updated.clone();
            }
        });
        Ok(updated)
    }

    /// Withdraws an application and removes it from the list.
    pub async fn withdraw_application(&self, id: &ApplicationId) -> Result<(), ListingError> {
        self.gateway.withdraw_application(id).await?;
        self.state
            .send_modify(|snapshot| snapshot.applications.retain(|app| app.id != *id));
        Ok(())
    }

    fn begin(&self) {
        self.state.send_modify(|snapshot| {
            snapshot.is_loading = true;
            snapshot.error = None;
        });
    }

    fn reject(&self, error: &ListingError) {
        self.state.send_modify(|snapshot| {
            snapshot.is_loading = false;
            snapshot.error = Some(error.to_string());
        });
    }
}
