//! Error conversion glue between the input forms and the service layer.
//!
//! Forms must not depend on service error types, but transport code calling
//! `TryFrom` on a form and then a use case wants a single `?`.

use crate::forms::categories::CategoryFormError;
use crate::services::errors::ServiceError;

impl From<CategoryFormError> for ServiceError {
    fn from(val: CategoryFormError) -> Self {
        ServiceError::Form(val.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dto::categories::GetCategoryInput;
    use crate::forms::categories::GetCategoryForm;

    #[test]
    fn form_errors_become_service_form_errors() {
        let parse = || -> Result<GetCategoryInput, ServiceError> {
            Ok(GetCategoryInput::try_from(GetCategoryForm {
                id: "nope".into(),
            })?)
        };
        assert!(matches!(parse(), Err(ServiceError::Form(_))));
    }
}
