use crate::gateway::validator::ValidationFailure;
use alloy_primitives::B256;
use chrono::{DateTime, Utc};

/// Lifecycle of one submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowState {
    Idle,
    Validating,
    Submitting,
    AwaitingConfirmation,
    Confirmed,
    Rejected,
    Errored,
}

impl FlowState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            FlowState::Confirmed | FlowState::Rejected | FlowState::Errored
        )
    }

    pub(crate) fn can_advance_to(&self, next: FlowState) -> bool {
        use FlowState::*;
        matches!(
            (*self, next),
            (Idle, Validating)
                | (Validating, Submitting)
                | (Validating, Errored)
                | (Submitting, AwaitingConfirmation)
                | (Submitting, Rejected)
                | (Submitting, Errored)
                | (AwaitingConfirmation, Confirmed)
        )
    }
}

/// The single result of one submission attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutcomeRecord {
    Success { confirmation_ref: B256 },
    ValidationFailure { reason: ValidationFailure },
    RemoteRejection { message: String },
    TransportFailure { message: String },
}

impl OutcomeRecord {
    /// Terminal state this outcome is reached through.
    pub fn terminal_state(&self) -> FlowState {
        match self {
            OutcomeRecord::Success { .. } => FlowState::Confirmed,
            OutcomeRecord::RemoteRejection { .. } => FlowState::Rejected,
            OutcomeRecord::ValidationFailure { .. } | OutcomeRecord::TransportFailure { .. } => {
                FlowState::Errored
            }
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, OutcomeRecord::Success { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub state: FlowState,
    pub outcome: OutcomeRecord,
    pub submitted_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_states_have_no_exit() {
        for state in [FlowState::Confirmed, FlowState::Rejected, FlowState::Errored] {
            assert!(state.is_terminal());
            for next in [
                FlowState::Idle,
                FlowState::Validating,
                FlowState::Submitting,
                FlowState::AwaitingConfirmation,
                FlowState::Confirmed,
                FlowState::Rejected,
                FlowState::Errored,
            ] {
                assert!(!state.can_advance_to(next));
            }
        }
    }

    #[test]
    fn validation_failure_skips_submission() {
        assert!(FlowState::Validating.can_advance_to(FlowState::Errored));
        assert!(!FlowState::Validating.can_advance_to(FlowState::Confirmed));
        assert!(!FlowState::Idle.can_advance_to(FlowState::Submitting));
    }

    #[test]
    fn outcomes_map_to_terminal_states() {
        let success = OutcomeRecord::Success {
            confirmation_ref: B256::ZERO,
        };
        assert_eq!(success.terminal_state(), FlowState::Confirmed);
        assert_eq!(
            OutcomeRecord::RemoteRejection {
                message: "book unavailable".into()
            }
            .terminal_state(),
            FlowState::Rejected
        );
        assert_eq!(
            OutcomeRecord::ValidationFailure {
                reason: ValidationFailure::EmptySearchCriteria
            }
            .terminal_state(),
            FlowState::Errored
        );
    }
}
