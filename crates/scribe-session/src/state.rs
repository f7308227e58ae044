//! Session state machine with validated transitions.
//!
//! Enforces the forward-only conversation lifecycle:
//! - Idle -> Collecting (start, or implicit first message)
//! - Collecting -> ReadyToGenerate (generate trigger freezes the transcript)
//! - Collecting -> Generating (generate trigger, direct)
//! - ReadyToGenerate -> Generating (hand-off to the document assembler)
//! - Generating -> Idle (document delivered, session complete)
//! - Generating -> Collecting (generation failed, transcript kept)
//! - Collecting -> Idle, ReadyToGenerate -> Idle (cancel)

use std::fmt;

/// Position of a session in the collect-then-generate protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionState {
    /// No conversation in progress. Ready to start.
    Idle,
    /// Gathering the feature idea and answers to clarifying questions.
    Collecting,
    /// Transcript frozen, about to hand off to the document assembler.
    ReadyToGenerate,
    /// A generation call is in flight for this session.
    Generating,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionState::Idle => write!(f, "Idle"),
            SessionState::Collecting => write!(f, "Collecting"),
            SessionState::ReadyToGenerate => write!(f, "ReadyToGenerate"),
            SessionState::Generating => write!(f, "Generating"),
        }
    }
}

impl SessionState {
    /// Returns whether a transition from `self` to `target` is valid.
    pub fn can_transition_to(&self, target: &SessionState) -> bool {
        matches!(
            (self, target),
            (SessionState::Idle, SessionState::Collecting)
                | (SessionState::Collecting, SessionState::ReadyToGenerate)
                | (SessionState::Collecting, SessionState::Generating)
                | (SessionState::ReadyToGenerate, SessionState::Generating)
                | (SessionState::Generating, SessionState::Idle)
                // Failed generation falls back to the last stable state.
                | (SessionState::Generating, SessionState::Collecting)
                // Cancel transitions
                | (SessionState::Collecting, SessionState::Idle)
                | (SessionState::ReadyToGenerate, SessionState::Idle)
        )
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_display() {
        assert_eq!(SessionState::Idle.to_string(), "Idle");
        assert_eq!(SessionState::Collecting.to_string(), "Collecting");
        assert_eq!(SessionState::ReadyToGenerate.to_string(), "ReadyToGenerate");
        assert_eq!(SessionState::Generating.to_string(), "Generating");
    }

    #[test]
    fn test_valid_forward_transitions() {
        assert!(SessionState::Idle.can_transition_to(&SessionState::Collecting));
        assert!(SessionState::Collecting.can_transition_to(&SessionState::ReadyToGenerate));
        assert!(SessionState::Collecting.can_transition_to(&SessionState::Generating));
        assert!(SessionState::ReadyToGenerate.can_transition_to(&SessionState::Generating));
        assert!(SessionState::Generating.can_transition_to(&SessionState::Idle));
    }

    #[test]
    fn test_generation_failure_fallback() {
        assert!(SessionState::Generating.can_transition_to(&SessionState::Collecting));
    }

    #[test]
    fn test_cancel_transitions() {
        assert!(SessionState::Collecting.can_transition_to(&SessionState::Idle));
        assert!(SessionState::ReadyToGenerate.can_transition_to(&SessionState::Idle));
    }

    #[test]
    fn test_invalid_transitions() {
        // Cannot skip the collect phase
        assert!(!SessionState::Idle.can_transition_to(&SessionState::ReadyToGenerate));
        assert!(!SessionState::Idle.can_transition_to(&SessionState::Generating));
        assert!(!SessionState::Idle.can_transition_to(&SessionState::Idle));

        // Cannot move backwards into collection from the frozen state
        assert!(!SessionState::ReadyToGenerate.can_transition_to(&SessionState::Collecting));

        // Generating cannot re-freeze
        assert!(!SessionState::Generating.can_transition_to(&SessionState::ReadyToGenerate));

        // No self transitions
        assert!(!SessionState::Collecting.can_transition_to(&SessionState::Collecting));
        assert!(!SessionState::Generating.can_transition_to(&SessionState::Generating));
    }
}
