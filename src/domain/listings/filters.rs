//! In-memory filtering, ordering, and pagination of loaded listings.

use serde::{Deserialize, Serialize};

use super::listing::Listing;
use crate::domain::foundation::ValidationError;

/// Listings shown per page when the caller does not choose a size.
pub const DEFAULT_PAGE_SIZE: usize = 10;

const MAX_PAGE_SIZE: usize = 100;

/// Search and filter criteria for the catalog.
///
/// Empty fields impose no constraint. Search matches title or description;
/// location matches as a substring; employment type and duration match
/// exactly. All matching is case-insensitive, mirroring the backend's
/// `ilike` semantics so local refinement agrees with a server round-trip.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingFilters {
    #[serde(default)]
    pub search: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub employment_type: String,
    #[serde(default)]
    pub duration: String,
}

impl ListingFilters {
    /// Returns true when no criterion is set.
    pub fn is_empty(&self) -> bool {
        self.search.is_empty()
            && self.location.is_empty()
            && self.employment_type.is_empty()
            && self.duration.is_empty()
    }

    /// Returns true if the listing satisfies every set criterion.
    pub fn matches(&self, listing: &Listing) -> bool {
        if !self.search.is_empty() {
            let needle = self.search.to_lowercase();
            let in_title = listing.title.to_lowercase().contains(&needle);
            let in_description = listing.description.to_lowercase().contains(&needle);
            if !in_title && !in_description {
                return false;
            }
        }

        if !self.location.is_empty()
            && !listing
                .location
                .to_lowercase()
                .contains(&self.location.to_lowercase())
        {
            return false;
        }

        if !self.employment_type.is_empty()
            && !listing
                .employment_type
                .eq_ignore_ascii_case(&self.employment_type)
        {
            return false;
        }

        if !self.duration.is_empty() && !listing.duration.eq_ignore_ascii_case(&self.duration) {
            return false;
        }

        true
    }

    /// Filters a slice of listings and orders the result newest first.
    pub fn apply(&self, listings: &[Listing]) -> Vec<Listing> {
        let mut matched: Vec<Listing> = listings
            .iter()
            .filter(|listing| self.matches(listing))
            .cloned()
            .collect();
        matched.sort_by(|a, b| b.posted_at.cmp(&a.posted_at));
        matched
    }
}

/// One page of results plus the pagination bookkeeping the views render.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// 1-based page number.
    pub current_page: usize,
    pub total_pages: usize,
    pub has_more: bool,
}

impl<T> Page<T> {
    /// Cuts one page out of an already-filtered, already-ordered list.
    ///
    /// `current_page` is 1-based; pages past the end come back empty. An
    /// empty input still has one (empty) page so views always have a page
    /// to stand on.
    pub fn paginate(
        items: Vec<T>,
        current_page: usize,
        per_page: usize,
    ) -> Result<Self, ValidationError> {
        if per_page == 0 || per_page > MAX_PAGE_SIZE {
            return Err(ValidationError::out_of_range(
                "per_page",
                1,
                MAX_PAGE_SIZE as i32,
                per_page as i32,
            ));
        }
        if current_page == 0 {
            return Err(ValidationError::out_of_range(
                "current_page",
                1,
                i32::MAX,
                0,
            ));
        }

        let total_pages = std::cmp::max(1, (items.len() + per_page - 1) / per_page);
        let start = (current_page - 1).saturating_mul(per_page);
        let page_items: Vec<T> = items
            .into_iter()
            .skip(start)
            .take(per_page)
            .collect();

        Ok(Self {
            items: page_items,
            current_page,
            total_pages,
            has_more: current_page < total_pages,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{ListingId, Timestamp};
    use crate::domain::listings::CompanySummary;
    use proptest::prelude::*;

    fn listing(title: &str, location: &str, employment_type: &str, days_old: i64) -> Listing {
        Listing {
            id: ListingId::new(),
            title: title.to_string(),
            description: format!("{} internship posting", title),
            location: location.to_string(),
            employment_type: employment_type.to_string(),
            duration: "3 months".to_string(),
            company: CompanySummary::named("Acme Robotics"),
            posted_at: Timestamp::now().minus_days(days_old),
        }
    }

    fn catalog() -> Vec<Listing> {
        vec![
            listing("Backend Intern", "Berlin", "remote", 3),
            listing("Frontend Intern", "Hamburg", "onsite", 1),
            listing("Data Intern", "Berlin", "hybrid", 7),
        ]
    }

    #[test]
    fn empty_filters_match_everything_newest_first() {
        let filters = ListingFilters::default();
        let result = filters.apply(&catalog());
        assert_eq!(result.len(), 3);
        assert_eq!(result[0].title, "Frontend Intern");
        assert_eq!(result[2].title, "Data Intern");
    }

    #[test]
    fn search_matches_title_and_description_case_insensitively() {
        let filters = ListingFilters {
            search: "BACKEND".to_string(),
            ..Default::default()
        };
        let result = filters.apply(&catalog());
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].title, "Backend Intern");
    }

    #[test]
    fn location_matches_as_substring() {
        let filters = ListingFilters {
            location: "ber".to_string(),
            ..Default::default()
        };
        let result = filters.apply(&catalog());
        assert_eq!(result.len(), 2);
    }

    #[test]
    fn employment_type_matches_exactly() {
        let filters = ListingFilters {
            employment_type: "Remote".to_string(),
            ..Default::default()
        };
        let result = filters.apply(&catalog());
        assert_eq!(result.len(), 1);

        let filters = ListingFilters {
            employment_type: "rem".to_string(),
            ..Default::default()
        };
        assert!(filters.apply(&catalog()).is_empty());
    }

    #[test]
    fn combined_criteria_are_conjunctive() {
        let filters = ListingFilters {
            location: "berlin".to_string(),
            employment_type: "hybrid".to_string(),
            ..Default::default()
        };
        let result = filters.apply(&catalog());
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].title, "Data Intern");
    }

    #[test]
    fn is_empty_reflects_criteria() {
        assert!(ListingFilters::default().is_empty());
        let filters = ListingFilters {
            duration: "3 months".to_string(),
            ..Default::default()
        };
        assert!(!filters.is_empty());
    }

    #[test]
    fn paginate_splits_and_counts_pages() {
        let page = Page::paginate((0..25).collect::<Vec<_>>(), 1, 10).unwrap();
        assert_eq!(page.items, (0..10).collect::<Vec<_>>());
        assert_eq!(page.total_pages, 3);
        assert!(page.has_more);

        let last = Page::paginate((0..25).collect::<Vec<_>>(), 3, 10).unwrap();
        assert_eq!(last.items, (20..25).collect::<Vec<_>>());
        assert!(!last.has_more);
    }

    #[test]
    fn paginate_past_the_end_is_empty() {
        let page = Page::paginate(vec![1, 2, 3], 9, 10).unwrap();
        assert!(page.items.is_empty());
        assert_eq!(page.total_pages, 1);
        assert!(!page.has_more);
    }

    #[test]
    fn empty_input_still_has_one_page() {
        let page = Page::paginate(Vec::<i32>::new(), 1, DEFAULT_PAGE_SIZE).unwrap();
        assert!(page.items.is_empty());
        assert_eq!(page.total_pages, 1);
        assert!(!page.has_more);
    }

    #[test]
    fn paginate_rejects_invalid_sizes() {
        assert!(Page::paginate(vec![1], 1, 0).is_err());
        assert!(Page::paginate(vec![1], 1, 101).is_err());
        assert!(Page::paginate(vec![1], 0, 10).is_err());
    }

    proptest! {
        // Filtering only removes items; it never invents them.
        #[test]
        fn filtered_set_is_subset_of_input(search in "[a-zA-Z ]{0,12}") {
            let filters = ListingFilters { search, ..Default::default() };
            let input = catalog();
            let result = filters.apply(&input);
            prop_assert!(result.len() <= input.len());
            for item in &result {
                prop_assert!(input.iter().any(|l| l.id == item.id));
            }
        }

        // Every page respects the size bound and the has_more flag agrees
        // with the page position.
        #[test]
        fn pages_respect_size_and_bookkeeping(
            len in 0usize..60,
            page in 1usize..8,
            per_page in 1usize..20,
        ) {
            let items: Vec<usize> = (0..len).collect();
            let result = Page::paginate(items, page, per_page).unwrap();
            prop_assert!(result.items.len() <= per_page);
            prop_assert_eq!(result.has_more, page < result.total_pages);
            prop_assert!(result.total_pages >= 1);
        }
    }
}
