//! Strongly-typed value objects used by the category aggregate.
//!
//! The aggregate carries these wrappers instead of raw primitives so that
//! identifiers and text limits are enforced at the boundary. Deserialising a
//! wrapper runs the same checks as constructing it.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

use crate::domain::validation;

/// Minimum number of characters in a category name.
pub const NAME_MIN_LENGTH: usize = 3;
/// Maximum number of characters in a category name.
pub const NAME_MAX_LENGTH: usize = 255;
/// Maximum number of characters in a category description.
pub const DESCRIPTION_MAX_LENGTH: usize = 10_000;

/// Errors produced when a domain invariant is violated.
///
/// Only the first failing rule is ever reported.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A required string was empty or whitespace-only.
    #[error("{0} must not be empty")]
    Empty(&'static str),
    /// A required value was missing.
    #[error("{0} must not be null")]
    Null(&'static str),
    /// A string was shorter than its lower bound.
    #[error("{field} below minimum length")]
    TooShort { field: &'static str, min: usize },
    /// A string was longer than its upper bound.
    #[error("{field} exceeds maximum length")]
    TooLong { field: &'static str, max: usize },
    /// Catch-all for values that cannot be parsed or are out of range.
    #[error("invalid value: {0}")]
    InvalidValue(String),
}

/// Globally unique identifier of a category.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct CategoryId(Uuid);

impl CategoryId {
    /// Generates a fresh random identifier.
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wraps an existing UUID.
    pub const fn from_uuid(value: Uuid) -> Self {
        Self(value)
    }

    /// Returns the raw UUID backing this identifier.
    pub const fn get(self) -> Uuid {
        self.0
    }

    /// Returns `true` for the all-zero UUID.
    pub fn is_nil(self) -> bool {
        self.0.is_nil()
    }
}

impl Display for CategoryId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

impl FromStr for CategoryId {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(value.trim())
            .map(Self)
            .map_err(|e| ValidationError::InvalidValue(format!("category id: {e}")))
    }
}

impl TryFrom<&str> for CategoryId {
    type Error = ValidationError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Uuid> for CategoryId {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl From<CategoryId> for Uuid {
    fn from(value: CategoryId) -> Self {
        value.0
    }
}

fn check_category_name(value: &str) -> Result<(), ValidationError> {
    validation::not_empty(value, "name")?;
    validation::min_length(value, NAME_MIN_LENGTH, "name")?;
    validation::max_length(value, NAME_MAX_LENGTH, "name")
}

fn check_category_description(value: &str) -> Result<(), ValidationError> {
    validation::max_length(value, DESCRIPTION_MAX_LENGTH, "description")
}

/// Generates a validated string wrapper. `$check` runs on every construction.
macro_rules! text_newtype {
    ($name:ident, $doc:expr, $check:path) => {
        #[doc = $doc]
        #[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Validates and wraps the value as-is; no trimming is applied.
            pub fn new<S: Into<String>>(value: S) -> Result<Self, ValidationError> {
                let value = value.into();
                $check(&value)?;
                Ok(Self(value))
            }

            /// Borrow the value as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume the wrapper and return the owned string.
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl std::ops::Deref for $name {
            type Target = str;

            fn deref(&self) -> &Self::Target {
                self.as_str()
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                self.as_str()
            }
        }

        impl TryFrom<String> for $name {
            type Error = ValidationError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl TryFrom<&str> for $name {
            type Error = ValidationError;

            fn try_from(value: &str) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl PartialEq<&str> for $name {
            fn eq(&self, other: &&str) -> bool {
                self.as_str() == *other
            }
        }

        impl PartialEq<$name> for &str {
            fn eq(&self, other: &$name) -> bool {
                *self == other.as_str()
            }
        }
    };
}

text_newtype!(
    CategoryName,
    "Category name: not blank, between 3 and 255 characters.",
    check_category_name
);
text_newtype!(
    CategoryDescription,
    "Category description: at most 10 000 characters, may be empty.",
    check_category_description
);

impl CategoryDescription {
    /// Like [`Self::new`] but rejects a missing value first.
    pub fn from_optional(value: Option<String>) -> Result<Self, ValidationError> {
        Self::new(validation::not_null(value, "description")?)
    }

    /// The empty description.
    pub fn empty() -> Self {
        Self(String::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_keeps_surrounding_whitespace() {
        let name = CategoryName::new(" Drama ").unwrap();
        assert_eq!(name.as_str(), " Drama ");
    }

    #[test]
    fn name_checks_run_in_order() {
        assert_eq!(
            CategoryName::new("   ").unwrap_err(),
            ValidationError::Empty("name")
        );
        assert_eq!(
            CategoryName::new("ab").unwrap_err(),
            ValidationError::TooShort {
                field: "name",
                min: NAME_MIN_LENGTH
            }
        );
        assert_eq!(
            CategoryName::new("a".repeat(256)).unwrap_err(),
            ValidationError::TooLong {
                field: "name",
                max: NAME_MAX_LENGTH
            }
        );
    }

    #[test]
    fn description_allows_empty_and_rejects_missing() {
        assert_eq!(CategoryDescription::new("").unwrap().as_str(), "");
        assert_eq!(
            CategoryDescription::from_optional(None).unwrap_err(),
            ValidationError::Null("description")
        );
        assert_eq!(
            CategoryDescription::new("d".repeat(10_001)).unwrap_err(),
            ValidationError::TooLong {
                field: "description",
                max: DESCRIPTION_MAX_LENGTH
            }
        );
    }

    #[test]
    fn category_id_round_trips_through_text() {
        let id = CategoryId::generate();
        let parsed: CategoryId = id.to_string().parse().unwrap();
        assert_eq!(parsed, id);
        assert!(CategoryId::try_from("not-a-uuid").is_err());
    }

    #[test]
    fn deserializing_a_name_validates_it() {
        let err = serde_json::from_str::<CategoryName>("\"ab\"").unwrap_err();
        assert!(err.to_string().contains("name below minimum length"));
    }
}
