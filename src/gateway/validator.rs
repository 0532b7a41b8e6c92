use thiserror::Error;

/// Borrow duration used when the form never set one.
pub const DEFAULT_BORROW_DURATION_DAYS: u64 = 7;

// Largest integer an f64 represents exactly.
const MAX_DURATION_DAYS: f64 = 9_007_199_254_740_991.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationFailure {
    #[error("empty search criteria")]
    EmptySearchCriteria,
    #[error("non-positive duration")]
    NonPositiveDuration,
    #[error("non-numeric duration")]
    NonNumericDuration,
}

/// Duration field exactly as the caller's form produced it.
#[derive(Debug, Clone, PartialEq)]
pub enum RawDuration {
    Unset,
    Number(f64),
    Text(String),
}

/// Unvalidated field values for one borrow attempt.
#[derive(Debug, Clone, PartialEq)]
pub struct RawBorrowInput {
    pub title: String,
    pub duration: RawDuration,
}

impl RawBorrowInput {
    pub fn new(title: impl Into<String>, duration: RawDuration) -> Self {
        Self {
            title: title.into(),
            duration,
        }
    }

    pub fn with_days(title: impl Into<String>, days: f64) -> Self {
        Self::new(title, RawDuration::Number(days))
    }

    pub fn with_text(title: impl Into<String>, days: impl Into<String>) -> Self {
        Self::new(title, RawDuration::Text(days.into()))
    }
}

/// Validated borrow parameters. Only `validate` constructs one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BorrowRequest {
    search_criteria: String,
    borrow_duration_days: u64,
}

impl BorrowRequest {
    pub fn search_criteria(&self) -> &str {
        &self.search_criteria
    }

    pub fn borrow_duration_days(&self) -> u64 {
        self.borrow_duration_days
    }
}

/// Turns the raw duration field into a number. Empty text counts as zero.
pub fn coerce_duration(raw: &RawDuration) -> Result<f64, ValidationFailure> {
    match raw {
        RawDuration::Unset => Ok(DEFAULT_BORROW_DURATION_DAYS as f64),
        RawDuration::Number(days) => Ok(*days),
        RawDuration::Text(text) => {
            let text = text.trim();
            if text.is_empty() {
                return Ok(0.0);
            }
            text.parse::<f64>()
                .map_err(|_| ValidationFailure::NonNumericDuration)
        }
    }
}

/// First failing rule wins: search criteria, then duration.
pub fn validate(title: &str, duration_days: f64) -> Result<BorrowRequest, ValidationFailure> {
    let search_criteria = title.trim();
    if search_criteria.is_empty() {
        return Err(ValidationFailure::EmptySearchCriteria);
    }

    let is_positive_integer = duration_days.is_finite()
        && duration_days.fract() == 0.0
        && duration_days > 0.0
        && duration_days <= MAX_DURATION_DAYS;
    if !is_positive_integer {
        return Err(ValidationFailure::NonPositiveDuration);
    }

    Ok(BorrowRequest {
        search_criteria: search_criteria.to_string(),
        borrow_duration_days: duration_days as u64,
    })
}

pub fn validate_raw(input: &RawBorrowInput) -> Result<BorrowRequest, ValidationFailure> {
    if input.title.trim().is_empty() {
        return Err(ValidationFailure::EmptySearchCriteria);
    }
    let duration_days = coerce_duration(&input.duration)?;
    validate(&input.title, duration_days)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_titles_fail_for_any_duration() {
        for title in ["", " ", "\t\n", "   "] {
            for days in [-3.0, 0.0, 1.0, 7.0, 2.5] {
                assert_eq!(
                    validate(title, days),
                    Err(ValidationFailure::EmptySearchCriteria)
                );
            }
        }
    }

    #[test]
    fn non_positive_or_fractional_durations_fail() {
        for days in [0.0, -1.0, -0.0, 0.5, 7.25, f64::NAN, f64::INFINITY, 1e300] {
            assert_eq!(
                validate("Dune", days),
                Err(ValidationFailure::NonPositiveDuration),
                "duration {days}"
            );
        }
    }

    #[test]
    fn valid_input_is_trimmed() {
        let request = validate("  Dune \n", 7.0).unwrap();
        assert_eq!(request.search_criteria(), "Dune");
        assert_eq!(request.borrow_duration_days(), 7);

        let request = validate("the left hand of DARKNESS", 1.0).unwrap();
        assert_eq!(request.search_criteria(), "the left hand of DARKNESS");
        assert_eq!(request.borrow_duration_days(), 1);
    }

    #[test]
    fn failure_reasons_read_plainly() {
        assert_eq!(
            ValidationFailure::EmptySearchCriteria.to_string(),
            "empty search criteria"
        );
        assert_eq!(
            ValidationFailure::NonPositiveDuration.to_string(),
            "non-positive duration"
        );
    }

    #[test]
    fn raw_duration_coercion() {
        assert_eq!(coerce_duration(&RawDuration::Unset), Ok(7.0));
        assert_eq!(coerce_duration(&RawDuration::Text(" 14 ".into())), Ok(14.0));
        assert_eq!(coerce_duration(&RawDuration::Text("".into())), Ok(0.0));
        assert_eq!(
            coerce_duration(&RawDuration::Text("two weeks".into())),
            Err(ValidationFailure::NonNumericDuration)
        );
    }

    #[test]
    fn raw_input_checks_title_before_duration() {
        assert_eq!(
            validate_raw(&RawBorrowInput::with_text("", "abc")),
            Err(ValidationFailure::EmptySearchCriteria)
        );
        assert_eq!(
            validate_raw(&RawBorrowInput::with_text("Dune", "")),
            Err(ValidationFailure::NonPositiveDuration)
        );

        let request = validate_raw(&RawBorrowInput::new("Dune", RawDuration::Unset)).unwrap();
        assert_eq!(request.borrow_duration_days(), DEFAULT_BORROW_DURATION_DAYS);
    }
}
