use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::category::Category as DomainCategory;
use crate::domain::types::{CategoryId, ValidationError};

/// Diesel model representing the `categories` table.
#[derive(Debug, Clone, Identifiable, Queryable, Selectable, Insertable)]
#[diesel(table_name = crate::schema::categories)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Category {
    /// Lowercase hyphenated UUID.
    pub id: String,
    pub name: String,
    pub description: String,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
}

/// Mutable columns of [`Category`]; `id` and `created_at` never change.
#[derive(Debug, AsChangeset)]
#[diesel(table_name = crate::schema::categories)]
pub struct CategoryChanges<'a> {
    pub name: &'a str,
    pub description: &'a str,
    pub is_active: bool,
}

impl TryFrom<Category> for DomainCategory {
    type Error = ValidationError;

    fn try_from(category: Category) -> Result<Self, Self::Error> {
        DomainCategory::restore(
            category.id.parse::<CategoryId>()?,
            category.name,
            category.description,
            category.is_active,
            category.created_at,
        )
    }
}

impl From<&DomainCategory> for Category {
    fn from(category: &DomainCategory) -> Self {
        Self {
            id: category.id().to_string(),
            name: category.name().to_string(),
            description: category.description().to_string(),
            is_active: category.is_active(),
            created_at: category.created_at(),
        }
    }
}

impl<'a> From<&'a DomainCategory> for CategoryChanges<'a> {
    fn from(category: &'a DomainCategory) -> Self {
        Self {
            name: category.name().as_str(),
            description: category.description().as_str(),
            is_active: category.is_active(),
        }
    }
}
