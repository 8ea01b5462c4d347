//! Listing records as returned by the listing gateway.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{ListingId, Timestamp};

/// The posting company, embedded in every listing row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanySummary {
    pub company_name: String,
    pub industry: Option<String>,
    pub description: Option<String>,
}

impl CompanySummary {
    /// Creates a summary with just the company name.
    pub fn named(company_name: impl Into<String>) -> Self {
        Self {
            company_name: company_name.into(),
            industry: None,
            description: None,
        }
    }
}

/// One internship posting.
///
/// `employment_type` and `duration` are free-form strings owned by the
/// backend's vocabulary; the client filters on them by exact
/// (case-insensitive) match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Listing {
    pub id: ListingId,
    pub title: String,
    pub description: String,
    pub location: String,
    pub employment_type: String,
    pub duration: String,
    pub company: CompanySummary,
    pub posted_at: Timestamp,
}
