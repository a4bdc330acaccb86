//! Reusable field-level checks shared by the domain value types.
//!
//! Each helper inspects a single field and reports the first violated rule as
//! a [`ValidationError`] naming that field. Lengths are counted in Unicode
//! scalar values, not bytes.

use crate::domain::types::ValidationError;

/// Unwraps a required value, rejecting `None`.
pub fn not_null<T>(value: Option<T>, field: &'static str) -> Result<T, ValidationError> {
    value.ok_or(ValidationError::Null(field))
}

/// Rejects empty and whitespace-only strings.
pub fn not_empty(value: &str, field: &'static str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::Empty(field))
    } else {
        Ok(())
    }
}

/// Rejects strings shorter than `min` characters.
pub fn min_length(value: &str, min: usize, field: &'static str) -> Result<(), ValidationError> {
    if value.chars().count() < min {
        Err(ValidationError::TooShort { field, min })
    } else {
        Ok(())
    }
}

/// Rejects strings longer than `max` characters.
pub fn max_length(value: &str, max: usize, field: &'static str) -> Result<(), ValidationError> {
    if value.chars().count() > max {
        Err(ValidationError::TooLong { field, max })
    } else {
        Ok(())
    }
}
