use std::collections::BTreeMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::domain::category::Category;
use crate::domain::types::CategoryId;
use crate::repository::{
    CategoryReader, CategoryWriter, ChangeSet, RepositoryError, RepositoryResult, SearchInput,
    SearchOutput, StagedChange, UnitOfWork, ensure_not_cancelled,
};

/// Durable in-process category storage shared by every request.
///
/// Cloning is cheap and all clones see the same rows.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    rows: Arc<RwLock<BTreeMap<CategoryId, Category>>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with `categories`, bypassing any unit of work.
    pub fn with_categories(categories: impl IntoIterator<Item = Category>) -> Self {
        let rows = categories.into_iter().map(|c| (c.id(), c)).collect();
        Self {
            rows: Arc::new(RwLock::new(rows)),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, BTreeMap<CategoryId, Category>> {
        self.rows.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, BTreeMap<CategoryId, Category>> {
        self.rows.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    pub fn contains(&self, id: CategoryId) -> bool {
        self.read().contains_key(&id)
    }

    pub fn get(&self, id: CategoryId) -> Option<Category> {
        self.read().get(&id).cloned()
    }

    /// Copy of every stored category, ordered by id.
    pub fn snapshot(&self) -> Vec<Category> {
        self.read().values().cloned().collect()
    }

    /// Applies `changes` to a copy of the rows and swaps it in only when every
    /// change succeeded.
    fn apply(&self, changes: Vec<StagedChange>) -> RepositoryResult<()> {
        let mut rows = self.write();
        let mut next = rows.clone();

        for change in changes {
            match change {
                StagedChange::Insert(category) => {
                    let id = category.id();
                    if next.contains_key(&id) {
                        return Err(RepositoryError::ConstraintViolation(format!(
                            "category '{id}' already exists"
                        )));
                    }
                    next.insert(id, category);
                }
                StagedChange::Update(category) => match next.get_mut(&category.id()) {
                    Some(row) => *row = category,
                    None => return Err(RepositoryError::category_not_found(category.id())),
                },
                StagedChange::Delete(id) => {
                    if next.remove(&id).is_none() {
                        return Err(RepositoryError::category_not_found(id));
                    }
                }
            }
        }

        *rows = next;
        Ok(())
    }
}

/// Request-scoped view over an [`InMemoryStore`].
///
/// Acts as both the category repository and the unit of work for one
/// request; clones share the staged changes.
#[derive(Clone)]
pub struct InMemoryRepository {
    store: InMemoryStore,
    changes: Arc<ChangeSet>,
}

impl InMemoryRepository {
    pub fn new(store: InMemoryStore) -> Self {
        Self {
            store,
            changes: Arc::new(ChangeSet::new()),
        }
    }

    pub fn store(&self) -> &InMemoryStore {
        &self.store
    }

    /// Number of writes waiting for `commit`.
    pub fn pending_changes(&self) -> usize {
        self.changes.len()
    }

    fn will_exist(&self, id: CategoryId) -> bool {
        self.changes
            .pending_presence(id)
            .unwrap_or_else(|| self.store.contains(id))
    }
}

#[async_trait]
impl CategoryReader for InMemoryRepository {
    async fn get_category(
        &self,
        id: CategoryId,
        cancel: &CancellationToken,
    ) -> RepositoryResult<Category> {
        ensure_not_cancelled(cancel)?;
        self.store
            .get(id)
            .ok_or_else(|| RepositoryError::category_not_found(id))
    }

    async fn search_categories(
        &self,
        input: &SearchInput,
        cancel: &CancellationToken,
    ) -> RepositoryResult<SearchOutput<Category>> {
        ensure_not_cancelled(cancel)?;
        input.validate()?;
        log::debug!("Searching categories: {input:?}");
        Ok(input.apply(self.store.read().values()))
    }
}

#[async_trait]
impl CategoryWriter for InMemoryRepository {
    async fn insert_category(
        &self,
        category: &Category,
        cancel: &CancellationToken,
    ) -> RepositoryResult<()> {
        ensure_not_cancelled(cancel)?;
        log::debug!("Staging insert of category {}", category.id());
        self.changes.stage(StagedChange::Insert(category.clone()));
        Ok(())
    }

    async fn update_category(
        &self,
        category: &Category,
        cancel: &CancellationToken,
    ) -> RepositoryResult<()> {
        ensure_not_cancelled(cancel)?;
        if !self.will_exist(category.id()) {
            return Err(RepositoryError::category_not_found(category.id()));
        }
        log::debug!("Staging update of category {}", category.id());
        self.changes.stage(StagedChange::Update(category.clone()));
        Ok(())
    }

    async fn delete_category(
        &self,
        id: CategoryId,
        cancel: &CancellationToken,
    ) -> RepositoryResult<()> {
        ensure_not_cancelled(cancel)?;
        if !self.will_exist(id) {
            return Err(RepositoryError::category_not_found(id));
        }
        log::debug!("Staging delete of category {id}");
        self.changes.stage(StagedChange::Delete(id));
        Ok(())
    }
}

#[async_trait]
impl UnitOfWork for InMemoryRepository {
    async fn commit(&self, cancel: &CancellationToken) -> RepositoryResult<()> {
        if cancel.is_cancelled() {
            let discarded = self.changes.clear();
            log::warn!("Commit cancelled, discarded {discarded} staged change(s)");
            return Err(RepositoryError::Cancelled);
        }

        let changes = self.changes.take();
        if changes.is_empty() {
            return Ok(());
        }

        let count = changes.len();
        match self.store.apply(changes) {
            Ok(()) => {
                log::info!("Committed {count} category change(s)");
                Ok(())
            }
            Err(e) => {
                log::error!("Failed to commit category changes: {e}");
                Err(e)
            }
        }
    }

    async fn rollback(&self) {
        let discarded = self.changes.clear();
        if discarded > 0 {
            log::warn!("Rolled back {discarded} staged change(s)");
        }
    }
}
