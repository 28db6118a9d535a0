//! Ledger store
//!
//! Append-only payment transaction records per user. Entries are written
//! inside the caller's database transaction so a failed balance update never
//! leaves a stray ledger row, and they are immutable once committed.

use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres, Transaction};

use crate::domain::{OperationContext, PaymentEntry, PaymentType};
use crate::error::AppResult;

use super::{Page, PageRequest};

#[derive(Debug, Clone)]
pub struct LedgerStore {
    pool: PgPool,
}

impl LedgerStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Append one ledger entry within the caller's transaction. `amount` is
    /// signed: positive for deposits, negative for withdrawals.
    pub async fn append(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user_id: i64,
        amount: Decimal,
        entry_type: PaymentType,
        ctx: &OperationContext,
    ) -> AppResult<PaymentEntry> {
        let entry: PaymentEntry = sqlx::query_as(
            r#"
            INSERT INTO user_payment_transactions (user_id, amount, entry_type, created_by, last_modified_by)
            VALUES ($1, $2, $3, $4, $4)
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(amount)
        .bind(entry_type.as_str())
        .bind(&ctx.actor)
        .fetch_one(&mut **tx)
        .await?;

        Ok(entry)
    }

    /// Ledger entries for a user, non-deleted, newest first.
    pub async fn history(&self, user_id: i64, request: PageRequest) -> AppResult<Page<PaymentEntry>> {
        let content: Vec<PaymentEntry> = sqlx::query_as(
            r#"
            SELECT * FROM user_payment_transactions
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
            "SELECT COUNT(*) FROM user_payment_transactions WHERE user_id = $1 AND deleted = FALSE",
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(Page::new(content, request, total))
    }
}
