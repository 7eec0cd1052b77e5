//! Input validation for form fields.
//!
//! These checks run before any query is issued, so a rejected form never
//! reaches the database.

use std::fmt;

/// Validation error types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Value too long.
    TooLong { field: String, max: usize, actual: usize },
    /// Empty value where one is required.
    Empty(String),
    /// Required value not supplied.
    Missing(String),
    /// Numeric value outside its allowed range.
    OutOfRange {
        field: String,
        min: i64,
        max: i64,
        actual: i64,
    },
    /// Text that does not name a known enumerated value.
    UnknownValue { field: String, value: String },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::TooLong { field, max, actual } => {
                write!(f, "{} is too long ({} chars, max {})", field, actual, max)
            }
            ValidationError::Empty(field) => write!(f, "{} cannot be empty", field),
            ValidationError::Missing(field) => write!(f, "{} is required", field),
            ValidationError::OutOfRange {
                field,
                min,
                max,
                actual,
            } => write!(f, "{} must be between {} and {} (got {})", field, min, max, actual),
            ValidationError::UnknownValue { field, value } => {
                write!(f, "Unknown {} '{}'", field, value)
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// Maximum allowed length for a child's name.
pub const MAX_NAME_LENGTH: usize = 100;

/// Maximum allowed length for a single interest or reaction label.
pub const MAX_LABEL_LENGTH: usize = 50;

/// Maximum allowed length for review feedback and custom instructions.
pub const MAX_FEEDBACK_LENGTH: usize = 2000;

/// Youngest supported child age.
pub const MIN_AGE: i64 = 3;

/// Oldest supported child age.
pub const MAX_AGE: i64 = 18;

/// Lowest star rating.
pub const MIN_RATING: i64 = 1;

/// Highest star rating.
pub const MAX_RATING: i64 = 5;

/// Validate an external auth identifier.
pub fn validate_auth_id(auth_id: &str) -> Result<(), ValidationError> {
    if auth_id.trim().is_empty() {
        return Err(ValidationError::Empty("auth id".to_string()));
    }
    Ok(())
}

/// Validate a child's name.
pub fn validate_child_name(name: &str) -> Result<(), ValidationError> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Empty("name".to_string()));
    }

    if name.chars().count() > MAX_NAME_LENGTH {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: MAX_NAME_LENGTH,
            actual: name.chars().count(),
        });
    }

    Ok(())
}

/// Validate a child's age. The profile form requires it.
pub fn validate_age(age: Option<i64>) -> Result<i64, ValidationError> {
    let age = age.ok_or_else(|| ValidationError::Missing("age".to_string()))?;
    check_range("age", age, MIN_AGE, MAX_AGE)?;
    Ok(age)
}

/// Validate a 1–5 star rating.
pub fn validate_rating(rating: i64) -> Result<(), ValidationError> {
    check_range("rating", rating, MIN_RATING, MAX_RATING)
}

/// Validate free-text feedback length.
pub fn validate_feedback(feedback: &str) -> Result<(), ValidationError> {
    check_text_length("feedback", feedback)
}

/// Validate custom generator instructions, held to the feedback limit.
pub fn validate_instructions(instructions: &str) -> Result<(), ValidationError> {
    check_text_length("instructions", instructions)
}

fn check_text_length(field: &str, text: &str) -> Result<(), ValidationError> {
    let len = text.chars().count();
    if len > MAX_FEEDBACK_LENGTH {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: MAX_FEEDBACK_LENGTH,
            actual: len,
        });
    }
    Ok(())
}

/// Validate a single interest or reaction label.
pub fn validate_label(field: &str, label: &str) -> Result<(), ValidationError> {
    let len = label.chars().count();
    if len > MAX_LABEL_LENGTH {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: MAX_LABEL_LENGTH,
            actual: len,
        });
    }
    Ok(())
}

fn check_range(field: &str, value: i64, min: i64, max: i64) -> Result<(), ValidationError> {
    if value < min || value > max {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min,
            max,
            actual: value,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_child_name() {
        assert!(validate_child_name("Alex").is_ok());
        assert!(matches!(
            validate_child_name("   "),
            Err(ValidationError::Empty(_))
        ));
        assert!(matches!(
            validate_child_name(&"x".repeat(101)),
            Err(ValidationError::TooLong { .. })
        ));
    }

    #[test]
    fn test_validate_age() {
        assert_eq!(validate_age(Some(8)), Ok(8));
        assert_eq!(validate_age(Some(3)), Ok(3));
        assert_eq!(validate_age(Some(18)), Ok(18));
        assert!(matches!(validate_age(None), Err(ValidationError::Missing(_))));
        assert!(matches!(
            validate_age(Some(2)),
            Err(ValidationError::OutOfRange { .. })
        ));
        assert!(matches!(
            validate_age(Some(19)),
            Err(ValidationError::OutOfRange { .. })
        ));
    }

    #[test]
    fn test_validate_rating() {
        for rating in 1..=5 {
            assert!(validate_rating(rating).is_ok());
        }
        assert!(validate_rating(0).is_err());
        assert!(validate_rating(6).is_err());
    }

    #[test]
    fn test_validate_instructions() {
        assert!(validate_instructions(&"é".repeat(2000)).is_ok());
        assert!(matches!(
            validate_instructions(&"x".repeat(2001)),
            Err(ValidationError::TooLong { ref field, .. }) if field == "instructions"
        ));
    }

    #[test]
    fn test_validation_error_display() {
        let err = ValidationError::OutOfRange {
            field: "age".to_string(),
            min: 3,
            max: 18,
            actual: 40,
        };
        assert_eq!(err.to_string(), "age must be between 3 and 18 (got 40)");

        let err = ValidationError::Missing("age".to_string());
        assert_eq!(err.to_string(), "age is required");
    }
}
