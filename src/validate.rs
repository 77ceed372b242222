//! Field validation shared by every record type.
//!
//! Validation happens before any store or index mutation. Validators do not
//! mutate their inputs and are deterministic.

use chrono::{DateTime, Utc};
use thiserror::Error;

/// A rejected field value. Surfaced synchronously to the caller that supplied
/// the value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{label} must be {min}-{max} characters, got {actual}")]
    LengthOutOfRange {
        label: &'static str,
        min: usize,
        max: usize,
        actual: usize,
    },

    #[error("{label} must not contain leading or trailing whitespace")]
    SurroundingWhitespace { label: &'static str },

    #[error("{label} is not a valid RFC 3339 timestamp: {value:?}")]
    MalformedDate { label: &'static str, value: String },

    #[error("{label} ({date}) must not be earlier than {floor}")]
    DateTooEarly {
        label: &'static str,
        date: String,
        floor: String,
    },
}

/// Requires `value` to have no surrounding whitespace and a character count
/// within `min..=max`.
pub fn require_within_chars(
    label: &'static str,
    value: &str,
    min: usize,
    max: usize,
) -> Result<(), ValidationError> {
    if value.trim() != value {
        return Err(ValidationError::SurroundingWhitespace { label });
    }
    let actual = value.chars().count();
    if actual < min || actual > max {
        return Err(ValidationError::LengthOutOfRange {
            label,
            min,
            max,
            actual,
        });
    }
    Ok(())
}

/// Requires `date` to be at or after `floor`.
pub fn require_not_before(
    label: &'static str,
    date: DateTime<Utc>,
    floor: DateTime<Utc>,
) -> Result<(), ValidationError> {
    if date < floor {
        return Err(ValidationError::DateTooEarly {
            label,
            date: date.to_rfc3339(),
            floor: floor.to_rfc3339(),
        });
    }
    Ok(())
}

/// Parses an RFC 3339 timestamp into UTC.
pub fn parse_rfc3339(label: &'static str, value: &str) -> Result<DateTime<Utc>, ValidationError> {
    DateTime::parse_from_rfc3339(value)
        .map(|parsed| parsed.with_timezone(&Utc))
        .map_err(|_| ValidationError::MalformedDate {
            label,
            value: value.to_string(),
        })
}
