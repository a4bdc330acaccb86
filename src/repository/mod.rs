#[cfg(feature = "sqlite")]
use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::domain::category::Category;
use crate::domain::types::CategoryId;

pub mod change_set;
pub mod errors;
pub mod memory;
pub mod search;

#[cfg(feature = "sqlite")]
pub mod category;

pub use change_set::{ChangeSet, StagedChange};
pub use errors::{RepositoryError, RepositoryResult};
pub use memory::{InMemoryRepository, InMemoryStore};
pub use search::{SearchInput, SearchOrder, SearchOrderBy, SearchOutput};

#[cfg(feature = "sqlite")]
use crate::db::DbPool;

/// Repository implementation backed by Diesel and SQLite.
///
/// One value is meant to serve one request: clones share the same staged
/// changes, and the same value acts as the request's [`UnitOfWork`]. The
/// underlying `r2d2::Pool` is cheap to clone, so creating one per request is
/// fine.
#[cfg(feature = "sqlite")]
#[derive(Clone)]
pub struct DieselRepository {
    pool: DbPool, // r2d2::Pool is cheap to clone
    changes: Arc<ChangeSet>,
}

#[cfg(feature = "sqlite")]
impl DieselRepository {
    /// Create a new request-scoped repository from an established pool.
    pub fn new(pool: DbPool) -> Self {
        Self {
            pool,
            changes: Arc::new(ChangeSet::new()),
        }
    }

    /// Number of writes waiting for `commit`.
    pub fn pending_changes(&self) -> usize {
        self.changes.len()
    }
}

/// Fails fast when the caller has already given up.
pub(crate) fn ensure_not_cancelled(cancel: &CancellationToken) -> RepositoryResult<()> {
    if cancel.is_cancelled() {
        Err(RepositoryError::Cancelled)
    } else {
        Ok(())
    }
}

/// Read-only operations for category entities.
#[async_trait]
pub trait CategoryReader: Send + Sync {
    /// Fetch a detached copy of a category.
    ///
    /// Fails with [`RepositoryError::NotFound`] when no row has that id.
    /// Changes made to the returned value are only stored through
    /// [`CategoryWriter::update_category`].
    async fn get_category(
        &self,
        id: CategoryId,
        cancel: &CancellationToken,
    ) -> RepositoryResult<Category>;

    /// Return one page of categories. See [`search`] for the exact rules.
    async fn search_categories(
        &self,
        input: &SearchInput,
        cancel: &CancellationToken,
    ) -> RepositoryResult<SearchOutput<Category>>;
}

/// Write operations for category entities.
///
/// Writes are only staged; they become durable when the owning
/// [`UnitOfWork`] commits.
#[async_trait]
pub trait CategoryWriter: Send + Sync {
    /// Stage a new category.
    async fn insert_category(
        &self,
        category: &Category,
        cancel: &CancellationToken,
    ) -> RepositoryResult<()>;

    /// Stage new values for an existing category, keyed by its id.
    async fn update_category(
        &self,
        category: &Category,
        cancel: &CancellationToken,
    ) -> RepositoryResult<()>;

    /// Stage removal of a category.
    async fn delete_category(
        &self,
        id: CategoryId,
        cancel: &CancellationToken,
    ) -> RepositoryResult<()>;
}

/// Atomic commit boundary for the writes made during one request.
#[async_trait]
pub trait UnitOfWork: Send + Sync {
    /// Apply every staged write, or none of them.
    async fn commit(&self, cancel: &CancellationToken) -> RepositoryResult<()>;

    /// Discard staged writes. Safe to call when nothing is staged.
    async fn rollback(&self);
}
