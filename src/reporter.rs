use crate::gateway::OutcomeRecord;
use std::time::Duration;

pub const SUCCESS_MESSAGE: &str = "Book borrowed successfully! Check your account for details.";
pub const INVALID_INPUT_MESSAGE: &str = "Please enter valid search criteria and borrow duration.";

/// How long the presentation layer keeps a message on screen.
pub const AUTO_HIDE: Duration = Duration::from_millis(3000);

/// What the presentation layer shows for one outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayMessage {
    pub text: String,
    pub visible: bool,
    pub auto_hide: Duration,
}

pub fn present(outcome: &OutcomeRecord) -> DisplayMessage {
    let text = match outcome {
        OutcomeRecord::Success { .. } => SUCCESS_MESSAGE.to_string(),
        OutcomeRecord::ValidationFailure { .. } => INVALID_INPUT_MESSAGE.to_string(),
        OutcomeRecord::RemoteRejection { message } | OutcomeRecord::TransportFailure { message } => {
            format!("Error: {}", message)
        }
    };

    DisplayMessage {
        text,
        visible: true,
        auto_hide: AUTO_HIDE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::ValidationFailure;
    use alloy_primitives::B256;

    #[test]
    fn fixed_messages() {
        let success = present(&OutcomeRecord::Success {
            confirmation_ref: B256::repeat_byte(1),
        });
        assert_eq!(success.text, SUCCESS_MESSAGE);
        assert!(success.visible);
        assert_eq!(success.auto_hide, Duration::from_millis(3000));

        for reason in [
            ValidationFailure::EmptySearchCriteria,
            ValidationFailure::NonPositiveDuration,
            ValidationFailure::NonNumericDuration,
        ] {
            let shown = present(&OutcomeRecord::ValidationFailure { reason });
            assert_eq!(shown.text, INVALID_INPUT_MESSAGE);
        }
    }

    #[test]
    fn failures_are_prefixed() {
        let rejected = present(&OutcomeRecord::RemoteRejection {
            message: "book unavailable".to_string(),
        });
        assert_eq!(rejected.text, "Error: book unavailable");

        let offline = present(&OutcomeRecord::TransportFailure {
            message: "connection refused".to_string(),
        });
        assert_eq!(offline.text, "Error: connection refused");
    }

    #[test]
    fn presenting_twice_is_identical() {
        let outcome = OutcomeRecord::RemoteRejection {
            message: "unauthorized".to_string(),
        };
        assert_eq!(present(&outcome), present(&outcome));
    }
}
