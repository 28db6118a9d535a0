//! Store layer
//!
//! Persistence over Postgres via sqlx. The generic [`SoftDeleteStore`] owns
//! the soft-delete visibility rule for every entity; the concrete stores add
//! the domain-specific queries and map generic lookup failures onto typed
//! domain errors.

mod catalog;
mod ledger;
mod page;
mod transactions;

pub use catalog::{CategoryStore, NewCategory, NewProduct, ProductStore};
pub use ledger::LedgerStore;
pub use page::{Page, PageRequest};
pub use transactions::{
    AdminTransactionRow, TransactionDetail, TransactionItemDetail, TransactionStore,
};

use std::marker::PhantomData;

use sqlx::PgPool;

use crate::domain::{OperationContext, SoftDeleteEntity};

/// The single visibility predicate for non-deleted reads. Every "not
/// deleted" query path goes through the generic store, so no call site can
/// forget it.
const NOT_DELETED: &str = "deleted = FALSE";

/// Errors from the generic store. Concrete stores translate `NotFound` into
/// the matching typed domain error.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("row not found: id {0}")]
    NotFound(i64),

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

/// Explicit list ordering; callers pick one instead of relying on the
/// store's natural order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    CreatedDesc,
    IdAsc,
    DisplayOrderAsc,
}

impl SortOrder {
    fn sql(&self) -> &'static str {
        match self {
            SortOrder::CreatedDesc => "created_date DESC",
            SortOrder::IdAsc => "id ASC",
            SortOrder::DisplayOrderAsc => "orders ASC",
        }
    }
}

/// Generic CRUD over an audited entity with a `deleted` flag gating
/// visibility. Every write stamps the modification timestamp and the acting
/// username from the operation context.
#[derive(Debug, Clone)]
pub struct SoftDeleteStore<E> {
    pool: PgPool,
    _entity: PhantomData<E>,
}

impl<E: SoftDeleteEntity> SoftDeleteStore<E> {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            _entity: PhantomData,
        }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Fetch a single non-deleted row by id.
    pub async fn get(&self, id: i64) -> Result<E, StoreError> {
        let sql = format!(
            "SELECT * FROM {} WHERE id = $1 AND {}",
            E::TABLE,
            NOT_DELETED
        );
        let row = sqlx::query_as::<_, E>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.ok_or(StoreError::NotFound(id))
    }

    /// Mark a row deleted and return it. A row that is absent or already
    /// trashed counts as not found, so a second trash of the same id fails
    /// instead of silently succeeding.
    pub async fn trash(&self, id: i64, ctx: &OperationContext) -> Result<E, StoreError> {
        let sql = format!(
            "UPDATE {} SET deleted = TRUE, modified_date = NOW(), last_modified_by = $2 \
             WHERE id = $1 AND {} RETURNING *",
            E::TABLE,
            NOT_DELETED
        );
        let row = sqlx::query_as::<_, E>(&sql)
            .bind(id)
            .bind(&ctx.actor)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(entity) => {
                tracing::debug!(table = E::TABLE, id, actor = %ctx.actor, "row trashed");
                Ok(entity)
            }
            None => Err(StoreError::NotFound(id)),
        }
    }

    /// Trash each id independently; one failure does not affect the others.
    pub async fn trash_list(
        &self,
        ids: &[i64],
        ctx: &OperationContext,
    ) -> Vec<Result<E, StoreError>> {
        let mut results = Vec::with_capacity(ids.len());
        for &id in ids {
            results.push(self.trash(id, ctx).await);
        }
        results
    }

    /// One page of non-deleted rows in the requested order.
    pub async fn list_not_deleted(
        &self,
        request: PageRequest,
        order: SortOrder,
    ) -> Result<Page<E>, StoreError> {
        let sql = format!(
            "SELECT * FROM {} WHERE {} ORDER BY {} LIMIT $1 OFFSET $2",
            E::TABLE,
            NOT_DELETED,
            order.sql()
        );
        let content = sqlx::query_as::<_, E>(&sql)
            .bind(request.limit())
            .bind(request.offset())
            .fetch_all(&self.pool)
            .await?;

        let total = self.count_not_deleted().await?;
        Ok(Page::new(content, request, total))
    }

    /// All non-deleted rows in the requested order.
    pub async fn list_all_not_deleted(&self, order: SortOrder) -> Result<Vec<E>, StoreError> {
        let sql = format!(
            "SELECT * FROM {} WHERE {} ORDER BY {}",
            E::TABLE,
            NOT_DELETED,
            order.sql()
        );
        Ok(sqlx::query_as::<_, E>(&sql).fetch_all(&self.pool).await?)
    }

    pub async fn count_not_deleted(&self) -> Result<i64, StoreError> {
        let sql = format!("SELECT COUNT(*) FROM {} WHERE {}", E::TABLE, NOT_DELETED);
        Ok(sqlx::query_scalar(&sql).fetch_one(&self.pool).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_order_sql() {
        assert_eq!(SortOrder::CreatedDesc.sql(), "created_date DESC");
        assert_eq!(SortOrder::IdAsc.sql(), "id ASC");
        assert_eq!(SortOrder::DisplayOrderAsc.sql(), "orders ASC");
    }

    #[test]
    fn test_store_error_display() {
        let err = StoreError::NotFound(42);
        assert!(err.to_string().contains("42"));
    }
}
