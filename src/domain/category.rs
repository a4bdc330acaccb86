use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::clock::Clock;
use crate::domain::types::{CategoryDescription, CategoryId, CategoryName, ValidationError};

/// Data required to construct a new [`Category`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCategory {
    pub name: String,
    /// `None` is rejected; use an empty string for "no description".
    pub description: Option<String>,
    pub is_active: bool,
}

impl NewCategory {
    /// Active category with the given name and description.
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: Some(description.into()),
            is_active: true,
        }
    }

    pub fn active(mut self, is_active: bool) -> Self {
        self.is_active = is_active;
        self
    }
}

/// Catalog category aggregate.
///
/// Fields are private: every path that sets `name` or `description` goes
/// through the same checks, so a `Category` value is always valid. `id` and
/// `created_at` never change after construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    id: CategoryId,
    name: CategoryName,
    description: CategoryDescription,
    is_active: bool,
    created_at: NaiveDateTime,
}

/// Validates name then description, stopping at the first failure.
fn validate(
    name: String,
    description: Option<String>,
) -> Result<(CategoryName, CategoryDescription), ValidationError> {
    let name = CategoryName::new(name)?;
    let description = CategoryDescription::from_optional(description)?;
    Ok((name, description))
}

impl Category {
    /// Builds a category with a fresh identifier and the clock's current time.
    pub fn new<C>(new: NewCategory, clock: &C) -> Result<Self, ValidationError>
    where
        C: Clock + ?Sized,
    {
        let (name, description) = validate(new.name, new.description)?;
        Ok(Self {
            id: CategoryId::generate(),
            name,
            description,
            is_active: new.is_active,
            created_at: clock.now(),
        })
    }

    /// Rebuilds a previously persisted category, re-running the field checks.
    pub fn restore(
        id: CategoryId,
        name: String,
        description: String,
        is_active: bool,
        created_at: NaiveDateTime,
    ) -> Result<Self, ValidationError> {
        let (name, description) = validate(name, Some(description))?;
        Ok(Self {
            id,
            name,
            description,
            is_active,
            created_at,
        })
    }

    /// Replaces the name and, when given, the description.
    ///
    /// Both values are checked before either is assigned.
    pub fn update(
        &mut self,
        name: impl Into<String>,
        description: Option<String>,
    ) -> Result<(), ValidationError> {
        let name = CategoryName::new(name)?;
        let description = description.map(CategoryDescription::new).transpose()?;

        self.name = name;
        if let Some(description) = description {
            self.description = description;
        }
        Ok(())
    }

    pub fn activate(&mut self) {
        self.is_active = true;
    }

    pub fn deactivate(&mut self) {
        self.is_active = false;
    }

    pub fn id(&self) -> CategoryId {
        self.id
    }

    pub fn name(&self) -> &CategoryName {
        &self.name
    }

    pub fn description(&self) -> &CategoryDescription {
        &self.description
    }

    pub fn is_active(&self) -> bool {
        self.is_active
    }

    pub fn created_at(&self) -> NaiveDateTime {
        self.created_at
    }
}
