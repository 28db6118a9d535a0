//! Payment Handler
//!
//! Deposits and withdrawals against a user's balance, each paired with
//! exactly one ledger entry in the same database transaction.

use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres, Transaction};

use crate::domain::{
    Amount, Balance, OperationContext, PaymentEntry, PaymentType, ShopError,
};
use crate::error::AppError;
use crate::store::{LedgerStore, Page, PageRequest};

use super::purchase_handler::map_lock_err;
use super::{PaymentCommand, PaymentResult};

/// Handler for balance deposits, withdrawals and payment history.
pub struct PaymentHandler {
    pool: PgPool,
    ledger: LedgerStore,
    lock_timeout_ms: u64,
}

impl PaymentHandler {
    pub fn new(pool: PgPool, lock_timeout_ms: u64) -> Self {
        Self {
            ledger: LedgerStore::new(pool.clone()),
            pool,
            lock_timeout_ms,
        }
    }

    /// Add a strictly positive amount to the user's balance and append a
    /// DEPOSIT ledger entry.
    pub async fn deposit(
        &self,
        user_id: i64,
        command: PaymentCommand,
        ctx: &OperationContext,
    ) -> Result<PaymentResult, AppError> {
        let amount = parse_amount(&command.amount, ctx)?;

        let mut tx = self.pool.begin().await?;
        self.bound_lock_wait(&mut tx).await?;

        let balance = lock_balance(&mut tx, user_id, ctx).await?;
        let updated = balance
            .credit(&amount)
            .map_err(|e| AppError::domain(ShopError::invalid_amount(e.to_string()), ctx.locale))?;

        store_balance(&mut tx, user_id, updated.value(), ctx).await?;
        self.ledger
            .append(&mut tx, user_id, amount.value(), PaymentType::Deposit, ctx)
            .await?;

        tx.commit().await?;

        tracing::info!(user_id, amount = %amount, balance = %updated, "deposit committed");
        Ok(PaymentResult {
            user_id,
            balance: updated.value(),
        })
    }

    /// Subtract a strictly positive amount from the user's balance and
    /// append a WITHDRAW ledger entry with the negated amount. Fails with
    /// InsufficientBalance when the balance does not cover the amount.
    pub async fn withdraw(
        &self,
        user_id: i64,
        command: PaymentCommand,
        ctx: &OperationContext,
    ) -> Result<PaymentResult, AppError> {
        let amount = parse_amount(&command.amount, ctx)?;

        let mut tx = self.pool.begin().await?;
        self.bound_lock_wait(&mut tx).await?;

        let balance = lock_balance(&mut tx, user_id, ctx).await?;
        let updated = balance.debit(&amount).map_err(|_| {
            AppError::domain(
                ShopError::insufficient_balance(amount.value(), balance.value()),
                ctx.locale,
            )
        })?;

        store_balance(&mut tx, user_id, updated.value(), ctx).await?;
        self.ledger
            .append(&mut tx, user_id, -amount.value(), PaymentType::Withdraw, ctx)
            .await?;

        tx.commit().await?;

        tracing::info!(user_id, amount = %amount, balance = %updated, "withdrawal committed");
        Ok(PaymentResult {
            user_id,
            balance: updated.value(),
        })
    }

    /// Payment history for a user, newest first. The user must exist and be
    /// visible.
    pub async fn history(
        &self,
        user_id: i64,
        request: PageRequest,
        ctx: &OperationContext,
    ) -> Result<Page<PaymentEntry>, AppError> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM users WHERE id = $1 AND deleted = FALSE)",
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;
        if !exists {
            return Err(AppError::domain(ShopError::UserNotFound(user_id), ctx.locale));
        }

        self.ledger.history(user_id, request).await
    }

    async fn bound_lock_wait(&self, tx: &mut Transaction<'_, Postgres>) -> Result<(), AppError> {
        sqlx::query(&format!(
            "SET LOCAL lock_timeout = '{}ms'",
            self.lock_timeout_ms
        ))
        .execute(&mut **tx)
        .await?;
        Ok(())
    }
}

fn parse_amount(raw: &str, ctx: &OperationContext) -> Result<Amount, AppError> {
    raw.parse::<Amount>()
        .map_err(|e| AppError::domain(ShopError::invalid_amount(e.to_string()), ctx.locale))
}

/// Lock the user row and return its balance. Missing or trashed users are
/// reported as not found.
async fn lock_balance(
    tx: &mut Transaction<'_, Postgres>,
    user_id: i64,
    ctx: &OperationContext,
) -> Result<Balance, AppError> {
    let balance: Option<Decimal> = sqlx::query_scalar(
        "SELECT balance FROM users WHERE id = $1 AND deleted = FALSE FOR UPDATE",
    )
    .bind(user_id)
    .fetch_optional(&mut **tx)
    .await
    .map_err(map_lock_err)?;

    let balance =
        balance.ok_or_else(|| AppError::domain(ShopError::UserNotFound(user_id), ctx.locale))?;
    Balance::new(balance).map_err(|e| AppError::Internal(format!("corrupt stored balance: {e}")))
}

async fn store_balance(
    tx: &mut Transaction<'_, Postgres>,
    user_id: i64,
    balance: Decimal,
    ctx: &OperationContext,
) -> Result<(), AppError> {
    sqlx::query(
        "UPDATE users SET balance = $2, modified_date = NOW(), last_modified_by = $3 WHERE id = $1",
    )
    .bind(user_id)
    .bind(balance)
    .bind(&ctx.actor)
    .execute(&mut **tx)
    .await
    .map_err(map_lock_err)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Locale;

    #[tokio::test]
    async fn test_negative_deposit_rejected_before_db_access() {
        let pool = PgPool::connect_lazy("postgres://localhost/unreachable").unwrap();
        let handler = PaymentHandler::new(pool, 5000);
        let ctx = OperationContext::new("tester").with_locale(Locale::En);

        for raw in ["-5", "0", "not-a-number", "1.234"] {
            let err = handler
                .deposit(1, PaymentCommand::new(raw), &ctx)
                .await
                .unwrap_err();
            assert!(
                matches!(
                    err,
                    AppError::Domain {
                        source: ShopError::InvalidAmount(_),
                        ..
                    }
                ),
                "amount {raw:?} should be rejected"
            );
        }
    }

    #[tokio::test]
    async fn test_negative_withdraw_rejected_before_db_access() {
        let pool = PgPool::connect_lazy("postgres://localhost/unreachable").unwrap();
        let handler = PaymentHandler::new(pool, 5000);
        let ctx = OperationContext::new("tester");

        let err = handler
            .withdraw(1, PaymentCommand::new("-10"), &ctx)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            AppError::Domain {
                source: ShopError::InvalidAmount(_),
                ..
            }
        ));
    }
}
