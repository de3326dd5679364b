//! Pre-export validation.
//!
//! Export and cloud save are gated on this check; failures are reported
//! per-field so the form can highlight the offending input. Everything here
//! is fully recoverable by user correction.

use std::fmt;

use crate::poster::{Field, PosterState};

/// Maximum lengths per field, in characters.
pub const MAX_TITLE: usize = 120;
pub const MAX_DATE: usize = 80;
pub const MAX_TIME: usize = 80;
pub const MAX_VENUE: usize = 80;
pub const MAX_DESCRIPTION: usize = 600;

/// Why a field failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationIssue {
    Required,
    TooLong { max: usize },
}

/// A single field failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldError {
    pub field: Field,
    pub issue: ValidationIssue,
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.issue {
            ValidationIssue::Required => write!(f, "{} is required", self.field.name()),
            ValidationIssue::TooLong { max } => {
                write!(f, "{} must be at most {max} characters", self.field.name())
            }
        }
    }
}

fn max_len(field: Field) -> usize {
    match field {
        Field::Title => MAX_TITLE,
        Field::Date => MAX_DATE,
        Field::Time => MAX_TIME,
        Field::Venue => MAX_VENUE,
        Field::Description => MAX_DESCRIPTION,
    }
}

/// Check a state before export/save.
///
/// Returns every failing field, not just the first, so the form can mark
/// them all in one pass.
pub fn validate(state: &PosterState) -> Result<(), Vec<FieldError>> {
    let mut errors = Vec::new();

    if state.title.trim().is_empty() {
        errors.push(FieldError {
            field: Field::Title,
            issue: ValidationIssue::Required,
        });
    }

    for field in [
        Field::Title,
        Field::Date,
        Field::Time,
        Field::Venue,
        Field::Description,
    ] {
        let max = max_len(field);
        if state.field(field).chars().count() > max {
            errors.push(FieldError {
                field,
                issue: ValidationIssue::TooLong { max },
            });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_state_fails_required_title() {
        let state = PosterState::default();
        let errors = validate(&state).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, Field::Title);
        assert_eq!(errors[0].issue, ValidationIssue::Required);
    }

    #[test]
    fn test_minimal_valid_state() {
        let mut state = PosterState::default();
        state.set_field(Field::Title, "Sunday Service");
        assert!(validate(&state).is_ok());
    }

    #[test]
    fn test_whitespace_title_is_required_failure() {
        let mut state = PosterState::default();
        state.set_field(Field::Title, "   ");
        let errors = validate(&state).unwrap_err();
        assert_eq!(errors[0].issue, ValidationIssue::Required);
    }

    #[test]
    fn test_too_long_fields_all_reported() {
        let mut state = PosterState::default();
        state.set_field(Field::Title, &"x".repeat(MAX_TITLE + 1));
        state.set_field(Field::Venue, &"v".repeat(MAX_VENUE + 1));

        let errors = validate(&state).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(errors
            .iter()
            .any(|e| e.field == Field::Title && e.issue == ValidationIssue::TooLong { max: MAX_TITLE }));
        assert!(errors
            .iter()
            .any(|e| e.field == Field::Venue && e.issue == ValidationIssue::TooLong { max: MAX_VENUE }));
    }

    #[test]
    fn test_length_counts_chars_not_bytes() {
        let mut state = PosterState::default();
        // Multibyte characters up to exactly the limit.
        state.title = "é".repeat(MAX_TITLE);
        assert!(validate(&state).is_ok());
    }

    #[test]
    fn test_error_messages() {
        let required = FieldError {
            field: Field::Title,
            issue: ValidationIssue::Required,
        };
        assert_eq!(required.to_string(), "title is required");

        let too_long = FieldError {
            field: Field::Description,
            issue: ValidationIssue::TooLong { max: 600 },
        };
        assert_eq!(too_long.to_string(), "description must be at most 600 characters");
    }
}
