//! Internship applications and their review lifecycle.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::{
    ApplicationId, ListingId, StateMachine, Timestamp, UserId, ValidationError,
};

/// Review status of an application.
///
/// Withdrawal is available to the student until a decision lands; the
/// decided and withdrawn states are final.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    #[default]
    Applied,
    UnderReview,
    Offered,
    Rejected,
    Withdrawn,
}

impl ApplicationStatus {
    /// Returns true while the application is still awaiting a decision.
    pub fn is_open(&self) -> bool {
        matches!(
            self,
            ApplicationStatus::Applied | ApplicationStatus::UnderReview
        )
    }
}

impl StateMachine for ApplicationStatus {
    fn can_transition_to(&self, target: &Self) -> bool {
        use ApplicationStatus::*;
        matches!(
            (self, target),
            (Applied, UnderReview)
                | (Applied, Withdrawn)
                | (UnderReview, Offered)
                | (UnderReview, Rejected)
                | (UnderReview, Withdrawn)
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use ApplicationStatus::*;
        match self {
            Applied => vec![UnderReview, Withdrawn],
            UnderReview => vec![Offered, Rejected, Withdrawn],
            Offered => vec![],
            Rejected => vec![],
            Withdrawn => vec![],
        }
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ApplicationStatus::Applied => "applied",
            ApplicationStatus::UnderReview => "under_review",
            ApplicationStatus::Offered => "offered",
            ApplicationStatus::Rejected => "rejected",
            ApplicationStatus::Withdrawn => "withdrawn",
        };
        write!(f, "{}", s)
    }
}

/// One student's application to one listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Application {
    pub id: ApplicationId,
    pub listing_id: ListingId,
    pub student_id: UserId,
    pub status: ApplicationStatus,
    pub applied_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Application {
    /// Creates a fresh application in the `Applied` state.
    pub fn new(listing_id: ListingId, student_id: UserId) -> Self {
        let now = Timestamp::now();
        Self {
            id: ApplicationId::new(),
            listing_id,
            student_id,
            status: ApplicationStatus::default(),
            applied_at: now,
            updated_at: now,
        }
    }

    /// Moves the application to a new status, validating the transition.
    pub fn update_status(&mut self, status: ApplicationStatus) -> Result<(), ValidationError> {
        self.status = self.status.transition_to(status)?;
        self.updated_at = Timestamp::now();
        Ok(())
    }

    /// Returns true while the application is still awaiting a decision.
    pub fn is_open(&self) -> bool {
        self.status.is_open()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_application() -> Application {
        Application::new(ListingId::new(), UserId::new("student-1").unwrap())
    }

    #[test]
    fn new_applications_start_applied() {
        let application = test_application();
        assert_eq!(application.status, ApplicationStatus::Applied);
        assert!(application.is_open());
    }

    #[test]
    fn review_flow_reaches_offered() {
        let mut application = test_application();
        application
            .update_status(ApplicationStatus::UnderReview)
            .unwrap();
        application.update_status(ApplicationStatus::Offered).unwrap();
        assert_eq!(application.status, ApplicationStatus::Offered);
        assert!(!application.is_open());
    }

    #[test]
    fn cannot_skip_review_to_a_decision() {
        let mut application = test_application();
        assert!(application.update_status(ApplicationStatus::Offered).is_err());
        assert_eq!(application.status, ApplicationStatus::Applied);
    }

    #[test]
    fn withdrawal_is_allowed_until_decided() {
        let mut open = test_application();
        open.update_status(ApplicationStatus::Withdrawn).unwrap();

        let mut reviewed = test_application();
        reviewed
            .update_status(ApplicationStatus::UnderReview)
            .unwrap();
        reviewed
            .update_status(ApplicationStatus::Withdrawn)
            .unwrap();

        let mut decided = test_application();
        decided
            .update_status(ApplicationStatus::UnderReview)
            .unwrap();
        decided.update_status(ApplicationStatus::Rejected).unwrap();
        assert!(decided
            .update_status(ApplicationStatus::Withdrawn)
            .is_err());
    }

    #[test]
    fn decided_and_withdrawn_are_terminal() {
        assert!(ApplicationStatus::Offered.is_terminal());
        assert!(ApplicationStatus::Rejected.is_terminal());
        assert!(ApplicationStatus::Withdrawn.is_terminal());
        assert!(!ApplicationStatus::Applied.is_terminal());
        assert!(!ApplicationStatus::UnderReview.is_terminal());
    }

    #[test]
    fn status_serializes_to_snake_case() {
        assert_eq!(
            serde_json::to_string(&ApplicationStatus::UnderReview).unwrap(),
            "\"under_review\""
        );
        assert_eq!(
            serde_json::to_string(&ApplicationStatus::Applied).unwrap(),
            "\"applied\""
        );
    }
}
