use async_trait::async_trait;
use diesel::prelude::*;
use tokio_util::sync::CancellationToken;

use crate::db::DbConnection;
use crate::domain::category::Category;
use crate::domain::types::CategoryId;
use crate::models::category::{Category as DbCategory, CategoryChanges};
use crate::repository::{
    CategoryReader, CategoryWriter, DieselRepository, RepositoryError, RepositoryResult,
    SearchInput, SearchOrder, SearchOrderBy, SearchOutput, StagedChange, UnitOfWork,
    ensure_not_cancelled,
};

/// `LIKE` pattern matching `search` anywhere in the value, with wildcards in
/// `search` taken literally.
fn contains_pattern(search: &str) -> String {
    let mut pattern = String::with_capacity(search.len() + 2);
    pattern.push('%');
    for ch in search.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

fn apply_change(conn: &mut DbConnection, change: &StagedChange) -> RepositoryResult<()> {
    use crate::schema::categories;

    match change {
        StagedChange::Insert(category) => {
            diesel::insert_into(categories::table)
                .values(DbCategory::from(category))
                .execute(conn)?;
        }
        StagedChange::Update(category) => {
            let affected = diesel::update(
                categories::table.filter(categories::id.eq(category.id().to_string())),
            )
            .set(CategoryChanges::from(category))
            .execute(conn)?;
            if affected == 0 {
                return Err(RepositoryError::category_not_found(category.id()));
            }
        }
        StagedChange::Delete(id) => {
            let affected =
                diesel::delete(categories::table.filter(categories::id.eq(id.to_string())))
                    .execute(conn)?;
            if affected == 0 {
                return Err(RepositoryError::category_not_found(*id));
            }
        }
    }
    Ok(())
}

impl DieselRepository {
    /// Run blocking Diesel work on the blocking pool. When `cancel` fires
    /// first, the work is still awaited and `Cancelled` is returned.
    async fn run<T, F>(&self, cancel: &CancellationToken, f: F) -> RepositoryResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut DbConnection) -> RepositoryResult<T> + Send + 'static,
    {
        ensure_not_cancelled(cancel)?;
        let pool = self.pool.clone();
        let mut task = tokio::task::spawn_blocking(move || {
            let mut conn = pool.get()?;
            f(&mut conn)
        });

        tokio::select! {
            joined = &mut task => joined?,
            _ = cancel.cancelled() => {
                // The query cannot be interrupted; wait for it so its connection is
                // back in the pool before the caller sees the cancellation.
                if let Err(e) = task.await {
                    log::warn!("Cancelled query task failed: {e}");
                }
                Err(RepositoryError::Cancelled)
            }
        }
    }

    /// Whether `id` will exist once the staged changes are committed.
    async fn will_exist(&self, id: CategoryId, cancel: &CancellationToken) -> RepositoryResult<bool> {
        if let Some(present) = self.changes.pending_presence(id) {
            return Ok(present);
        }

        let key = id.to_string();
        self.run(cancel, move |conn| {
            use crate::schema::categories;

            let count = categories::table
                .filter(categories::id.eq(key))
                .count()
                .get_result::<i64>(conn)?;
            Ok(count > 0)
        })
        .await
    }
}

#[async_trait]
impl CategoryReader for DieselRepository {
    async fn get_category(
        &self,
        id: CategoryId,
        cancel: &CancellationToken,
    ) -> RepositoryResult<Category> {
        let key = id.to_string();
        let row = self
            .run(cancel, move |conn| {
                use crate::schema::categories;

                let row = categories::table
                    .filter(categories::id.eq(key))
                    .first::<DbCategory>(conn)
                    .optional()?;
                Ok(row)
            })
            .await?;

        match row {
            Some(row) => Ok(Category::try_from(row)?),
            None => Err(RepositoryError::category_not_found(id)),
        }
    }

    async fn search_categories(
        &self,
        input: &SearchInput,
        cancel: &CancellationToken,
    ) -> RepositoryResult<SearchOutput<Category>> {
        input.validate()?;
        log::debug!("Searching categories: {input:?}");

        let input = input.clone();
        self.run(cancel, move |conn| {
            use crate::schema::categories;

            let query_builder = || {
                let mut query = categories::table.into_boxed::<diesel::sqlite::Sqlite>();
                if let Some(search) = input.filter() {
                    query = query.filter(categories::name.like(contains_pattern(search)).escape('\\'));
                }
                query
            };

            // Count and page read the same snapshot.
            conn.transaction::<_, RepositoryError, _>(|conn| {
                let total = query_builder().count().get_result::<i64>(conn)? as usize;

                let ordered = match (input.order_by, input.order) {
                    (SearchOrderBy::Name, SearchOrder::Asc) => {
                        query_builder().order(categories::name.asc())
                    }
                    (SearchOrderBy::Name, SearchOrder::Desc) => {
                        query_builder().order(categories::name.desc())
                    }
                    (SearchOrderBy::Id, SearchOrder::Asc) => query_builder().order(categories::id.asc()),
                    (SearchOrderBy::Id, SearchOrder::Desc) => {
                        query_builder().order(categories::id.desc())
                    }
                    (SearchOrderBy::CreatedAt, SearchOrder::Asc) => {
                        query_builder().order(categories::created_at.asc())
                    }
                    (SearchOrderBy::CreatedAt, SearchOrder::Desc) => {
                        query_builder().order(categories::created_at.desc())
                    }
                };

                let offset = i64::try_from(input.offset()).unwrap_or(i64::MAX);
                let limit = i64::try_from(input.per_page).unwrap_or(i64::MAX);

                let items = ordered
                    .then_order_by(categories::id.asc())
                    .offset(offset)
                    .limit(limit)
                    .load::<DbCategory>(conn)?
                    .into_iter()
                    .map(Category::try_from)
                    .collect::<Result<Vec<Category>, _>>()?;

                Ok(SearchOutput {
                    page: input.page,
                    per_page: input.per_page,
                    total,
                    items,
                })
            })
        })
        .await
    }
}

#[async_trait]
impl CategoryWriter for DieselRepository {
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
        if !self.will_exist(category.id(), cancel).await? {
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
        if !self.will_exist(id, cancel).await? {
            return Err(RepositoryError::category_not_found(id));
        }
        log::debug!("Staging delete of category {id}");
        self.changes.stage(StagedChange::Delete(id));
        Ok(())
    }
}

#[async_trait]
impl UnitOfWork for DieselRepository {
    /// Replays the staged changes inside one SQL transaction.
    ///
    /// Cancellation is checked again just before the transaction commits; once
    /// the commit has started it runs to completion and its real outcome is
    /// returned.
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
        let pool = self.pool.clone();
        let cancel = cancel.clone();
        let result = tokio::task::spawn_blocking(move || {
            let mut conn = pool.get()?;
            conn.transaction::<_, RepositoryError, _>(|conn| {
                for change in &changes {
                    apply_change(conn, change)?;
                }
                if cancel.is_cancelled() {
                    return Err(RepositoryError::Cancelled);
                }
                Ok(())
            })
        })
        .await?;

        match &result {
            Ok(()) => log::info!("Committed {count} category change(s)"),
            Err(RepositoryError::Cancelled) => {
                log::warn!("Commit cancelled, rolled back {count} staged change(s)")
            }
            Err(e) => log::error!("Failed to commit category changes: {e}"),
        }
        result
    }

    async fn rollback(&self) {
        let discarded = self.changes.clear();
        if discarded > 0 {
            log::warn!("Rolled back {discarded} staged change(s)");
        }
    }
}
