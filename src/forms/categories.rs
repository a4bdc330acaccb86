use std::borrow::Cow;

use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::types::{CategoryId, ValidationError};
use crate::dto::categories::{
    CreateCategoryInput, DeleteCategoryInput, GetCategoryInput, ListCategoriesInput,
    UpdateCategoryInput,
};
use crate::repository::SearchOrder;

fn validate_category_id(value: &str) -> Result<(), validator::ValidationError> {
    match value.parse::<CategoryId>() {
        Ok(id) if !id.is_nil() => Ok(()),
        _ => Err(validator::ValidationError::new("empty_id")
            .with_message(Cow::Borrowed("'Id' must not be empty."))),
    }
}

fn parse_id(value: &str) -> Result<CategoryId, CategoryFormError> {
    Ok(value.parse::<CategoryId>()?)
}

#[derive(Debug, Error)]
pub enum CategoryFormError {
    #[error("Category form validation failed: {0}")]
    Validation(String),
    #[error("Category form contains invalid data: {0}")]
    TypeConstraint(String),
}

impl From<ValidationErrors> for CategoryFormError {
    fn from(value: ValidationErrors) -> Self {
        Self::Validation(value.to_string())
    }
}

impl From<ValidationError> for CategoryFormError {
    fn from(value: ValidationError) -> Self {
        Self::TypeConstraint(value.to_string())
    }
}

#[derive(Deserialize, Validate)]
pub struct CreateCategoryForm {
    #[validate(length(min = 1))]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub is_active: Option<bool>,
}

impl TryFrom<CreateCategoryForm> for CreateCategoryInput {
    type Error = CategoryFormError;

    fn try_from(value: CreateCategoryForm) -> Result<Self, Self::Error> {
        value.validate()?;
        Ok(Self {
            name: value.name,
            description: value.description,
            is_active: value.is_active,
        })
    }
}

#[derive(Deserialize, Validate)]
pub struct GetCategoryForm {
    #[validate(custom(function = "validate_category_id"))]
    pub id: String,
}

impl TryFrom<GetCategoryForm> for GetCategoryInput {
    type Error = CategoryFormError;

    fn try_from(value: GetCategoryForm) -> Result<Self, Self::Error> {
        value.validate()?;
        Ok(Self {
            id: parse_id(&value.id)?,
        })
    }
}

#[derive(Deserialize, Validate)]
pub struct UpdateCategoryForm {
    #[validate(custom(function = "validate_category_id"))]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub is_active: Option<bool>,
}

impl TryFrom<UpdateCategoryForm> for UpdateCategoryInput {
    type Error = CategoryFormError;

    fn try_from(value: UpdateCategoryForm) -> Result<Self, Self::Error> {
        value.validate()?;
        Ok(Self {
            id: parse_id(&value.id)?,
            // Name and description limits are enforced by the aggregate.
            name: value.name,
            description: value.description,
            is_active: value.is_active,
        })
    }
}

#[derive(Deserialize, Validate)]
pub struct DeleteCategoryForm {
    #[validate(custom(function = "validate_category_id"))]
    pub id: String,
}

impl TryFrom<DeleteCategoryForm> for DeleteCategoryInput {
    type Error = CategoryFormError;

    fn try_from(value: DeleteCategoryForm) -> Result<Self, Self::Error> {
        value.validate()?;
        Ok(Self {
            id: parse_id(&value.id)?,
        })
    }
}

/// Query-string shaped list request; every field is optional.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct ListCategoriesForm {
    #[validate(range(min = 1))]
    pub page: Option<i64>,
    #[validate(range(min = 1))]
    pub per_page: Option<i64>,
    pub search: Option<String>,
    pub sort: Option<String>,
    pub dir: Option<String>,
}

impl TryFrom<ListCategoriesForm> for ListCategoriesInput {
    type Error = CategoryFormError;

    fn try_from(value: ListCategoriesForm) -> Result<Self, Self::Error> {
        value.validate()?;
        let defaults = ListCategoriesInput::default();

        let to_usize = |n: i64| {
            usize::try_from(n).map_err(|e| CategoryFormError::TypeConstraint(e.to_string()))
        };

        Ok(Self {
            page: value.page.map(to_usize).transpose()?.unwrap_or(defaults.page),
            per_page: value
                .per_page
                .map(to_usize)
                .transpose()?
                .unwrap_or(defaults.per_page),
            search: value.search.unwrap_or(defaults.search),
            sort: value.sort.unwrap_or(defaults.sort),
            dir: match value.dir {
                Some(dir) => SearchOrder::try_from(dir.as_str())?,
                None => defaults.dir,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_form_requires_a_name() {
        let form: CreateCategoryForm = serde_json::from_str(r#"{"name":""}"#).unwrap();
        assert!(matches!(
            CreateCategoryInput::try_from(form).unwrap_err(),
            CategoryFormError::Validation(_)
        ));

        let form: CreateCategoryForm =
            serde_json::from_str(r#"{"name":"Drama","is_active":false}"#).unwrap();
        let input = CreateCategoryInput::try_from(form).unwrap();
        assert_eq!(input, CreateCategoryInput::new("Drama").active(false));
    }

    #[test]
    fn get_form_rejects_nil_and_garbage_ids() {
        for id in ["00000000-0000-0000-0000-000000000000", "", "nope"] {
            let form = GetCategoryForm { id: id.to_string() };
            let err = GetCategoryInput::try_from(form).unwrap_err();
            assert!(matches!(err, CategoryFormError::Validation(_)));
            assert!(err.to_string().contains("must not be empty"));
        }
    }

    #[test]
    fn get_form_parses_valid_id() {
        let id = CategoryId::generate();
        let form = GetCategoryForm { id: id.to_string() };
        assert_eq!(GetCategoryInput::try_from(form).unwrap().id, id);
    }

    #[test]
    fn update_form_keeps_optional_fields() {
        let id = CategoryId::generate();
        let form = UpdateCategoryForm {
            id: id.to_string(),
            name: "Thriller".into(),
            description: None,
            is_active: Some(false),
        };
        let input = UpdateCategoryInput::try_from(form).unwrap();
        assert_eq!(input, UpdateCategoryInput::new(id, "Thriller").active(false));
    }

    #[test]
    fn list_form_fills_defaults() {
        let input = ListCategoriesInput::try_from(ListCategoriesForm::default()).unwrap();
        assert_eq!(input, ListCategoriesInput::default());
    }

    #[test]
    fn list_form_rejects_non_positive_paging() {
        for (page, per_page) in [(Some(0), None), (Some(-1), None), (None, Some(0))] {
            let form = ListCategoriesForm {
                page,
                per_page,
                ..Default::default()
            };
            let err = ListCategoriesInput::try_from(form).unwrap_err();
            assert!(matches!(err, CategoryFormError::Validation(_)));
        }
    }

    #[test]
    fn list_form_parses_direction() {
        let form = ListCategoriesForm {
            page: Some(2),
            per_page: Some(5),
            search: Some("Horror".into()),
            sort: Some("createdAt".into()),
            dir: Some("DESC".into()),
        };
        let input = ListCategoriesInput::try_from(form).unwrap();
        assert_eq!(input.page, 2);
        assert_eq!(input.per_page, 5);
        assert_eq!(input.dir, SearchOrder::Desc);

        let form = ListCategoriesForm {
            dir: Some("up".into()),
            ..Default::default()
        };
        assert!(matches!(
            ListCategoriesInput::try_from(form).unwrap_err(),
            CategoryFormError::TypeConstraint(_)
        ));
    }
}
