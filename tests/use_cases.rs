#![cfg(feature = "sqlite")]

use codeflix_catalog::domain::clock::{FixedClock, SystemClock};
use codeflix_catalog::dto::categories::{
    CreateCategoryInput, DeleteCategoryInput, GetCategoryInput, ListCategoriesInput,
    UpdateCategoryInput,
};
use codeflix_catalog::forms::categories::{GetCategoryForm, ListCategoriesForm};
use codeflix_catalog::repository::{DieselRepository, SearchOrder};
use codeflix_catalog::services::ServiceError;
use codeflix_catalog::services::categories::{
    create_category, delete_category, get_category, list_categories, update_category,
};
use tokio_util::sync::CancellationToken;

mod common;

#[tokio::test]
async fn category_lifecycle_against_sqlite() {
    let test_db = common::TestDb::new();
    let repo = DieselRepository::new(test_db.pool());
    let cancel = CancellationToken::new();

    let created = create_category(
        CreateCategoryInput::new("Horror").description("Scary movies"),
        &repo,
        &repo,
        &SystemClock,
        &cancel,
    )
    .await
    .unwrap();
    assert!(created.is_active);

    let input = GetCategoryInput::try_from(GetCategoryForm {
        id: created.id.to_string(),
    })
    .unwrap();
    let fetched = get_category(input, &repo, &cancel).await.unwrap();
    assert_eq!(fetched, created);

    let updated = update_category(
        UpdateCategoryInput::new(input.id, "Terror").active(false),
        &repo,
        &repo,
        &cancel,
    )
    .await
    .unwrap();
    assert_eq!(updated.name, "Terror");
    assert_eq!(updated.description, "Scary movies");
    assert!(!updated.is_active);
    assert_eq!(updated.created_at, created.created_at);

    delete_category(DeleteCategoryInput { id: input.id }, &repo, &repo, &cancel)
        .await
        .unwrap();

    let err = get_category(input, &repo, &cancel).await.unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(err.to_string(), format!("Category '{}' not found.", input.id));
}

#[tokio::test]
async fn create_without_description_stores_empty_text() {
    let test_db = common::TestDb::new();
    let repo = DieselRepository::new(test_db.pool());
    let cancel = CancellationToken::new();

    let created = create_category(
        CreateCategoryInput::new("Drama"),
        &repo,
        &repo,
        &FixedClock(common::epoch()),
        &cancel,
    )
    .await
    .unwrap();

    let fetched = get_category(
        GetCategoryInput {
            id: created.id.into(),
        },
        &repo,
        &cancel,
    )
    .await
    .unwrap();
    assert_eq!(fetched.description, "");
    assert_eq!(fetched.created_at, common::epoch());
}

#[tokio::test]
async fn list_from_query_form() {
    let test_db = common::TestDb::new();
    let repo = DieselRepository::new(test_db.pool());
    let cancel = CancellationToken::new();

    for (i, name) in common::SEARCH_FIXTURE.iter().enumerate() {
        create_category(
            CreateCategoryInput::new(*name),
            &repo,
            &repo,
            &FixedClock(common::epoch() + chrono::Duration::seconds(i as i64)),
            &cancel,
        )
        .await
        .unwrap();
    }

    let input = ListCategoriesInput::try_from(ListCategoriesForm {
        page: Some(1),
        per_page: Some(2),
        search: Some("sci-fi".into()),
        sort: Some("name".into()),
        dir: Some("desc".into()),
    })
    .unwrap();
    assert_eq!(input.dir, SearchOrder::Desc);

    let output = list_categories(input, &repo, &cancel).await.unwrap();
    assert_eq!(output.total, 4);
    let names: Vec<&str> = output.items.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, ["Sci-fi Space", "Sci-fi Robots"]);

    let output = list_categories(ListCategoriesInput::default(), &repo, &cancel)
        .await
        .unwrap();
    assert_eq!(output.total, common::SEARCH_FIXTURE.len());
    assert_eq!(output.per_page, 15);
}

#[tokio::test]
async fn invalid_create_leaves_database_untouched() {
    let test_db = common::TestDb::new();
    let repo = DieselRepository::new(test_db.pool());
    let cancel = CancellationToken::new();

    let err = create_category(
        CreateCategoryInput::new("ab"),
        &repo,
        &repo,
        &SystemClock,
        &cancel,
    )
    .await
    .unwrap_err();
    assert!(matches!(err, ServiceError::Validation(_)));
    assert_eq!(err.to_string(), "name below minimum length");

    let output = list_categories(ListCategoriesInput::default(), &repo, &cancel)
        .await
        .unwrap();
    assert_eq!(output.total, 0);
}

#[tokio::test]
async fn cancelled_create_is_rolled_back() {
    let test_db = common::TestDb::new();
    let repo = DieselRepository::new(test_db.pool());
    let cancel = CancellationToken::new();
    cancel.cancel();

    let err = create_category(
        CreateCategoryInput::new("Western"),
        &repo,
        &repo,
        &SystemClock,
        &cancel,
    )
    .await
    .unwrap_err();
    assert!(err.is_cancelled());
    assert_eq!(repo.pending_changes(), 0);

    let output = list_categories(
        ListCategoriesInput::default(),
        &repo,
        &CancellationToken::new(),
    )
    .await
    .unwrap();
    assert_eq!(output.total, 0);
}
