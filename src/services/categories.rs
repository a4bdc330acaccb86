//! Category use cases.
//!
//! Each function handles one request end to end: build or load the
//! aggregate, apply the rule, stage the write, commit. Any failure ends the
//! request; writes staged before it are rolled back.

use std::future::Future;

use tokio_util::sync::CancellationToken;

use crate::domain::category::{Category, NewCategory};
use crate::domain::clock::Clock;
use crate::dto::categories::{
    CategoryDto, CreateCategoryInput, DeleteCategoryInput, GetCategoryInput, ListCategoriesInput,
    ListCategoriesOutput, UpdateCategoryInput,
};
use crate::repository::{
    CategoryReader, CategoryWriter, RepositoryResult, SearchInput, SearchOrderBy, UnitOfWork,
};

use super::ServiceResult;

/// Awaits a staged write and commits it, rolling back if either step fails.
async fn stage_and_commit<U, F>(uow: &U, staged: F, cancel: &CancellationToken) -> ServiceResult<()>
where
    U: UnitOfWork + ?Sized,
    F: Future<Output = RepositoryResult<()>>,
{
    let result = match staged.await {
        Ok(()) => uow.commit(cancel).await,
        Err(e) => Err(e),
    };

    if let Err(e) = result {
        log::warn!("Rolling back category changes: {e}");
        uow.rollback().await;
        return Err(e.into());
    }
    Ok(())
}

/// Creates a category, stores it and returns it with its generated id and
/// timestamp.
pub async fn create_category<R, U, C>(
    input: CreateCategoryInput,
    repo: &R,
    uow: &U,
    clock: &C,
    cancel: &CancellationToken,
) -> ServiceResult<CategoryDto>
where
    R: CategoryWriter + ?Sized,
    U: UnitOfWork + ?Sized,
    C: Clock + ?Sized,
{
    let category = Category::new(
        NewCategory {
            name: input.name,
            description: Some(input.description.unwrap_or_default()),
            is_active: input.is_active.unwrap_or(true),
        },
        clock,
    )?;

    stage_and_commit(uow, repo.insert_category(&category, cancel), cancel).await?;

    log::info!("Created category {}", category.id());
    Ok(CategoryDto::from(category))
}

pub async fn get_category<R>(
    input: GetCategoryInput,
    repo: &R,
    cancel: &CancellationToken,
) -> ServiceResult<CategoryDto>
where
    R: CategoryReader + ?Sized,
{
    let category = repo.get_category(input.id, cancel).await?;
    Ok(CategoryDto::from(category))
}

/// Renames a category, optionally replacing its description, and toggles
/// the active flag only when the requested value differs.
pub async fn update_category<R, U>(
    input: UpdateCategoryInput,
    repo: &R,
    uow: &U,
    cancel: &CancellationToken,
) -> ServiceResult<CategoryDto>
where
    R: CategoryReader + CategoryWriter + ?Sized,
    U: UnitOfWork + ?Sized,
{
    let mut category = repo.get_category(input.id, cancel).await?;
    category.update(input.name, input.description)?;

    match input.is_active {
        Some(true) if !category.is_active() => category.activate(),
        Some(false) if category.is_active() => category.deactivate(),
        _ => {}
    }

    stage_and_commit(uow, repo.update_category(&category, cancel), cancel).await?;

    log::info!("Updated category {}", category.id());
    Ok(CategoryDto::from(category))
}

pub async fn delete_category<R, U>(
    input: DeleteCategoryInput,
    repo: &R,
    uow: &U,
    cancel: &CancellationToken,
) -> ServiceResult<()>
where
    R: CategoryReader + CategoryWriter + ?Sized,
    U: UnitOfWork + ?Sized,
{
    let category = repo.get_category(input.id, cancel).await?;

    stage_and_commit(uow, repo.delete_category(category.id(), cancel), cancel).await?;

    log::info!("Deleted category {}", category.id());
    Ok(())
}

/// Returns one page of categories, in the order the repository produced.
pub async fn list_categories<R>(
    input: ListCategoriesInput,
    repo: &R,
    cancel: &CancellationToken,
) -> ServiceResult<ListCategoriesOutput>
where
    R: CategoryReader + ?Sized,
{
    let search = SearchInput::new(
        input.page,
        input.per_page,
        input.search,
        SearchOrderBy::parse(&input.sort),
        input.dir,
    )?;

    let output = repo.search_categories(&search, cancel).await?;
    Ok(ListCategoriesOutput::from(output))
}
