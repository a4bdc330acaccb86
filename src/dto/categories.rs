use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::category::Category;
use crate::domain::types::CategoryId;
use crate::repository::{SearchOrder, SearchOutput};

/// Page size used when a list request does not specify one.
pub const DEFAULT_PER_PAGE: usize = 15;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateCategoryInput {
    pub name: String,
    /// Missing means empty.
    #[serde(default)]
    pub description: Option<String>,
    /// Missing means active.
    #[serde(default)]
    pub is_active: Option<bool>,
}

impl CreateCategoryInput {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            is_active: None,
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn active(mut self, is_active: bool) -> Self {
        self.is_active = Some(is_active);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GetCategoryInput {
    pub id: CategoryId,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateCategoryInput {
    pub id: CategoryId,
    pub name: String,
    /// `None` keeps the current description.
    pub description: Option<String>,
    /// `None` keeps the current flag.
    pub is_active: Option<bool>,
}

impl UpdateCategoryInput {
    pub fn new(id: CategoryId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            description: None,
            is_active: None,
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn active(mut self, is_active: bool) -> Self {
        self.is_active = Some(is_active);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeleteCategoryInput {
    pub id: CategoryId,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListCategoriesInput {
    pub page: usize,
    pub per_page: usize,
    pub search: String,
    /// Field name to order by; unknown names order by name.
    pub sort: String,
    pub dir: SearchOrder,
}

impl Default for ListCategoriesInput {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: DEFAULT_PER_PAGE,
            search: String::new(),
            sort: String::new(),
            dir: SearchOrder::Asc,
        }
    }
}

/// Category as returned to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryDto {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
}

impl From<Category> for CategoryDto {
    fn from(value: Category) -> Self {
        Self {
            id: value.id().get(),
            name: value.name().to_string(),
            description: value.description().to_string(),
            is_active: value.is_active(),
            created_at: value.created_at(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListCategoriesOutput {
    pub page: usize,
    pub per_page: usize,
    pub total: usize,
    pub items: Vec<CategoryDto>,
}

impl From<SearchOutput<Category>> for ListCategoriesOutput {
    fn from(value: SearchOutput<Category>) -> Self {
        let value = value.map(CategoryDto::from);
        Self {
            page: value.page,
            per_page: value.per_page,
            total: value.total,
            items: value.items,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::category::NewCategory;
    use crate::domain::clock::FixedClock;
    use chrono::DateTime;

    #[test]
    fn dto_serializes_flat_fields() {
        let clock = FixedClock(DateTime::from_timestamp(0, 0).unwrap().naive_utc());
        let category =
            Category::new(NewCategory::new("Horror", "Scary").active(false), &clock).unwrap();
        let id = category.id();

        let json = serde_json::to_value(CategoryDto::from(category)).unwrap();
        assert_eq!(json["id"], id.to_string());
        assert_eq!(json["name"], "Horror");
        assert_eq!(json["description"], "Scary");
        assert_eq!(json["is_active"], false);
    }

    #[test]
    fn create_input_deserializes_with_optional_fields_missing() {
        let input: CreateCategoryInput = serde_json::from_str(r#"{"name":"Drama"}"#).unwrap();
        assert_eq!(input, CreateCategoryInput::new("Drama"));
    }
}
