//! Transaction store
//!
//! Persists the purchase aggregate (header + line items) and serves the
//! read-only reporting projections over it. Headers and items are written in
//! the purchase engine's transaction and never updated afterwards.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::{FromRow, PgPool, Postgres, Transaction};

use crate::domain::{
    Locale, LocalizedName, OperationContext, PurchasePlan, PurchaseTransaction, ShopError,
};
use crate::error::{AppError, AppResult};

use super::{Page, PageRequest};

/// A transaction header joined with its owner, for the admin report.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AdminTransactionRow {
    pub id: i64,
    pub user_id: i64,
    pub username: String,
    pub total_amount: Decimal,
    pub created_date: DateTime<Utc>,
}

/// One line of a transaction detail view. The product name is resolved live
/// at read time in the requested locale.
#[derive(Debug, Clone, Serialize)]
pub struct TransactionItemDetail {
    pub product_id: i64,
    pub name: String,
    pub count: i64,
    pub amount: Decimal,
}

/// Full detail view of a committed transaction.
#[derive(Debug, Clone, Serialize)]
pub struct TransactionDetail {
    pub id: i64,
    pub user_id: i64,
    pub total_amount: Decimal,
    pub created_date: DateTime<Utc>,
    pub items: Vec<TransactionItemDetail>,
}

#[derive(Debug, Clone, FromRow)]
struct ItemRow {
    product_id: i64,
    count: i64,
    amount: Decimal,
    #[sqlx(flatten)]
    name: LocalizedName,
}

#[derive(Debug, Clone)]
pub struct TransactionStore {
    pool: PgPool,
}

impl TransactionStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert the header and all line items of a validated purchase plan
    /// within the caller's transaction. Returns the new transaction id.
    pub async fn insert_purchase(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user_id: i64,
        plan: &PurchasePlan,
        ctx: &OperationContext,
    ) -> AppResult<i64> {
        let transaction_id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO transactions (user_id, total_amount, created_by, last_modified_by)
            VALUES ($1, $2, $3, $3)
            RETURNING id
            "#,
        )
        .bind(user_id)
        .bind(plan.total)
        .bind(&ctx.actor)
        .fetch_one(&mut **tx)
        .await?;

        for line in &plan.lines {
            sqlx::query(
                r#"
                INSERT INTO transaction_items (transaction_id, product_id, count, amount, created_by, last_modified_by)
                VALUES ($1, $2, $3, $4, $5, $5)
                "#,
            )
            .bind(transaction_id)
            .bind(line.product_id)
            .bind(line.quantity)
            .bind(line.amount)
            .bind(&ctx.actor)
            .execute(&mut **tx)
            .await?;
        }

        Ok(transaction_id)
    }

    /// A user's transactions, non-deleted, newest first.
    pub async fn user_transactions(
        &self,
        user_id: i64,
        request: PageRequest,
    ) -> AppResult<Page<PurchaseTransaction>> {
        let content: Vec<PurchaseTransaction> = sqlx::query_as(
            r#"
            SELECT * FROM transactions
            WHERE user_id = $1 AND deleted = FALSE
            ORDER BY created_date DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(user_id)
        .bind(request.limit())
        .bind(request.offset())
        .fetch_all(&self.pool)
        .await?;

        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM transactions WHERE user_id = $1 AND deleted = FALSE",
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(Page::new(content, request, total))
    }

    /// All transactions with owner usernames, newest first (admin report).
    pub async fn all_transactions(
        &self,
        request: PageRequest,
    ) -> AppResult<Page<AdminTransactionRow>> {
        let content: Vec<AdminTransactionRow> = sqlx::query_as(
            r#"
            SELECT t.id, t.user_id, u.username, t.total_amount, t.created_date
            FROM transactions t
            JOIN users u ON u.id = t.user_id
            WHERE t.deleted = FALSE
            ORDER BY t.created_date DESC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(request.limit())
        .bind(request.offset())
        .fetch_all(&self.pool)
        .await?;

        let total: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM transactions WHERE deleted = FALSE")
                .fetch_one(&self.pool)
                .await?;

        Ok(Page::new(content, request, total))
    }

    /// Detail view of one transaction. Product names come from the live
    /// product rows, localized for the requested language.
    pub async fn details(&self, id: i64, locale: Locale) -> AppResult<TransactionDetail> {
        let header: Option<PurchaseTransaction> =
            sqlx::query_as("SELECT * FROM transactions WHERE id = $1 AND deleted = FALSE")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        let header =
            header.ok_or_else(|| AppError::domain(ShopError::TransactionNotFound(id), locale))?;

        let rows: Vec<ItemRow> = sqlx::query_as(
            r#"
            SELECT i.product_id, i.count, i.amount, p.name_uz, p.name_ru, p.name_en
            FROM transaction_items i
            JOIN products p ON p.id = i.product_id
            WHERE i.transaction_id = $1 AND i.deleted = FALSE
            ORDER BY i.id ASC
            "#,
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        let items = rows
            .into_iter()
            .map(|row| TransactionItemDetail {
                product_id: row.product_id,
                name: row.name.localized(locale).to_string(),
                count: row.count,
                amount: row.amount,
            })
            .collect();

        Ok(TransactionDetail {
            id: header.id,
            user_id: header.user_id,
            total_amount: header.total_amount,
            created_date: header.created_date,
            items,
        })
    }
}
