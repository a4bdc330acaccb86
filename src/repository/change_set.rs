use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::domain::category::Category;
use crate::domain::types::CategoryId;

/// A write waiting for the unit of work to commit it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StagedChange {
    Insert(Category),
    Update(Category),
    Delete(CategoryId),
}

impl StagedChange {
    pub fn id(&self) -> CategoryId {
        match self {
            Self::Insert(category) | Self::Update(category) => category.id(),
            Self::Delete(id) => *id,
        }
    }
}

/// Writes staged during one request, in the order they were made.
///
/// Shared between a repository and its unit of work; nothing here touches
/// durable storage.
#[derive(Debug, Default)]
pub struct ChangeSet {
    changes: Mutex<Vec<StagedChange>>,
}

impl ChangeSet {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<StagedChange>> {
        self.changes.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn stage(&self, change: StagedChange) {
        self.lock().push(change);
    }

    /// Removes and returns every staged change.
    pub fn take(&self) -> Vec<StagedChange> {
        std::mem::take(&mut *self.lock())
    }

    /// Drops every staged change, returning how many there were.
    pub fn clear(&self) -> usize {
        self.take().len()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Whether `id` will exist once the staged changes are applied.
    ///
    /// `None` means no staged change mentions `id`, so durable storage decides.
    pub fn pending_presence(&self, id: CategoryId) -> Option<bool> {
        self.lock()
            .iter()
            .rev()
            .find(|change| change.id() == id)
            .map(|change| !matches!(change, StagedChange::Delete(_)))
    }
}
