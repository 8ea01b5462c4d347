//! SessionPhase enum for the client authentication lifecycle.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::StateMachine;

/// Lifecycle phase of the client session.
///
/// `Unknown` covers the initial session check at process start; both
/// `Authenticated` and `Unauthenticated` are rest states that re-enter
/// `Authenticating` whenever a new auth operation starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    #[default]
    Unknown,
    Authenticating,
    Authenticated,
    Unauthenticated,
}

impl SessionPhase {
    /// Returns true while an auth operation or the initial check is
    /// outstanding.
    pub fn is_loading(&self) -> bool {
        matches!(self, SessionPhase::Unknown | SessionPhase::Authenticating)
    }

    /// Returns true for the two rest states.
    pub fn is_settled(&self) -> bool {
        matches!(
            self,
            SessionPhase::Authenticated | SessionPhase::Unauthenticated
        )
    }
}

impl StateMachine for SessionPhase {
    fn can_transition_to(&self, target: &Self) -> bool {
        use SessionPhase::*;
        matches!(
            (self, target),
            (Unknown, Authenticating)
                | (Unknown, Unauthenticated)
                | (Authenticating, Authenticated)
                | (Authenticating, Unauthenticated)
                | (Authenticated, Authenticating)
                | (Authenticated, Unauthenticated)
                | (Unauthenticated, Authenticating)
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use SessionPhase::*;
        match self {
            Unknown => vec![Authenticating, Unauthenticated],
            Authenticating => vec![Authenticated, Unauthenticated],
            Authenticated => vec![Authenticating, Unauthenticated],
            Unauthenticated => vec![Authenticating],
        }
    }
}

impl fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SessionPhase::Unknown => "Unknown",
            SessionPhase::Authenticating => "Authenticating",
            SessionPhase::Authenticated => "Authenticated",
            SessionPhase::Unauthenticated => "Unauthenticated",
        };
        write!(f, "{}", s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_unknown() {
        assert_eq!(SessionPhase::default(), SessionPhase::Unknown);
    }

    #[test]
    fn loading_phases_are_unknown_and_authenticating() {
        assert!(SessionPhase::Unknown.is_loading());
        assert!(SessionPhase::Authenticating.is_loading());
        assert!(!SessionPhase::Authenticated.is_loading());
        assert!(!SessionPhase::Unauthenticated.is_loading());
    }

    #[test]
    fn authenticated_is_only_reachable_from_authenticating() {
        use SessionPhase::*;
        for phase in [Unknown, Authenticated, Unauthenticated] {
            assert!(!phase.can_transition_to(&Authenticated));
        }
        assert!(Authenticating.can_transition_to(&Authenticated));
    }

    #[test]
    fn rest_states_can_reenter_authenticating() {
        use SessionPhase::*;
        assert!(Authenticated.can_transition_to(&Authenticating));
        assert!(Unauthenticated.can_transition_to(&Authenticating));
    }

    #[test]
    fn no_phase_is_terminal() {
        use SessionPhase::*;
        for phase in [Unknown, Authenticating, Authenticated, Unauthenticated] {
            assert!(!phase.is_terminal());
        }
    }

    #[test]
    fn can_transition_to_is_consistent_with_valid_transitions() {
        use SessionPhase::*;
        for phase in [Unknown, Authenticating, Authenticated, Unauthenticated] {
            for target in phase.valid_transitions() {
                assert!(
                    phase.can_transition_to(&target),
                    "expected {:?} -> {:?} to be valid",
                    phase,
                    target
                );
            }
        }
    }
}
