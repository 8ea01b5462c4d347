//! Application-side profile records keyed by identity id.
//!
//! The gateway stores a base profile row plus a role-specific row
//! (student or company); `ProfileRecord` is the merged view the client
//! receives from a profile fetch.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::UserId;

/// Account role chosen at sign-up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Student,
    Company,
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            UserRole::Student => "student",
            UserRole::Company => "company",
        };
        write!(f, "{}", s)
    }
}

/// Student-specific profile fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StudentDetails {
    pub university: Option<String>,
    pub major: Option<String>,
    pub graduation_year: Option<i32>,
}

/// Company-specific profile fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompanyDetails {
    pub company_name: String,
    pub industry: Option<String>,
    pub description: Option<String>,
}

/// Role-specific half of a profile, tagged by the account role.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "user_type", rename_all = "snake_case")]
pub enum RoleDetails {
    Student(StudentDetails),
    Company(CompanyDetails),
}

impl RoleDetails {
    /// Returns the role this detail record belongs to.
    pub fn role(&self) -> UserRole {
        match self {
            RoleDetails::Student(_) => UserRole::Student,
            RoleDetails::Company(_) => UserRole::Company,
        }
    }
}

/// Combined profile and role data for one user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileRecord {
    /// Identity id this profile belongs to.
    pub user_id: UserId,

    /// Display name shown across the app.
    pub full_name: String,

    /// Role-specific fields, merged in the gateway response.
    #[serde(flatten)]
    pub details: RoleDetails,
}

impl ProfileRecord {
    /// Creates a profile record.
    pub fn new(user_id: UserId, full_name: impl Into<String>, details: RoleDetails) -> Self {
        Self {
            user_id,
            full_name: full_name.into(),
            details,
        }
    }

    /// Creates a fresh student profile the way sign-up seeds one.
    pub fn new_student(user_id: UserId, full_name: impl Into<String>) -> Self {
        Self::new(user_id, full_name, RoleDetails::Student(StudentDetails::default()))
    }

    /// Creates a fresh company profile; sign-up uses the display name as
    /// the default company name.
    pub fn new_company(user_id: UserId, full_name: impl Into<String>) -> Self {
        let full_name = full_name.into();
        let details = RoleDetails::Company(CompanyDetails {
            company_name: full_name.clone(),
            ..CompanyDetails::default()
        });
        Self::new(user_id, full_name, details)
    }

    /// Returns the account role recorded on this profile.
    pub fn user_type(&self) -> UserRole {
        self.details.role()
    }
}
