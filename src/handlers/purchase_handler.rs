//! Purchase Handler
//!
//! Converts a cart of requested items into a validated, atomic financial and
//! inventory transaction: stock reservation, balance debit and the
//! transaction record, all inside one database transaction.

use sqlx::{PgPool, Postgres, Transaction};

use crate::domain::{OperationContext, PlanItem, Product, PurchasePlan, ShopError, User};
use crate::error::AppError;
use crate::store::TransactionStore;

use super::{PurchaseCommand, PurchaseResult};

/// Handler for multi-item purchases.
pub struct PurchaseHandler {
    pool: PgPool,
    transactions: TransactionStore,
    lock_timeout_ms: u64,
}

impl PurchaseHandler {
    pub fn new(pool: PgPool, lock_timeout_ms: u64) -> Self {
        Self {
            transactions: TransactionStore::new(pool.clone()),
            pool,
            lock_timeout_ms,
        }
    }

    /// Execute the purchase.
    ///
    /// Validation and pricing happen first on locked rows with no writes;
    /// stock decrements, the balance debit and the transaction insert are
    /// applied only after every item and the aggregate balance check have
    /// passed. Any failure rolls the whole transaction back, so stock and
    /// balance are either both updated or both untouched.
    pub async fn execute(
        &self,
        user_id: i64,
        command: PurchaseCommand,
        ctx: &OperationContext,
    ) -> Result<PurchaseResult, AppError> {
        // Reject malformed quantities before touching the database.
        if command.items.is_empty() {
            return Err(AppError::domain(
                ShopError::invalid_amount("purchase must contain at least one item"),
                ctx.locale,
            ));
        }
        if let Some(bad) = command.items.iter().find(|i| i.count <= 0) {
            return Err(AppError::domain(
                ShopError::invalid_amount(format!(
                    "quantity must be positive (got {} for product {})",
                    bad.count, bad.product_id
                )),
                ctx.locale,
            ));
        }

        let mut tx = self.pool.begin().await?;
        self.bound_lock_wait(&mut tx).await?;

        // Lock the user row for the balance check and debit.
        let user: Option<User> =
            sqlx::query_as("SELECT * FROM users WHERE id = $1 AND deleted = FALSE FOR UPDATE")
                .bind(user_id)
                .fetch_optional(&mut *tx)
                .await
                .map_err(map_lock_err)?;
        let user =
            user.ok_or_else(|| AppError::domain(ShopError::UserNotFound(user_id), ctx.locale))?;

        // Lock every requested product in request order so concurrent
        // purchases serialize on the stock counters.
        let mut products: Vec<Product> = Vec::with_capacity(command.items.len());
        for item in &command.items {
            let product: Option<Product> = sqlx::query_as(
                "SELECT * FROM products WHERE id = $1 AND deleted = FALSE FOR UPDATE",
            )
            .bind(item.product_id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(map_lock_err)?;

            let product = product.ok_or_else(|| {
                AppError::domain(ShopError::ProductNotFound(item.product_id), ctx.locale)
            })?;
            products.push(product);
        }

        // Pure validation + pricing; no writes yet.
        let plan_items: Vec<PlanItem<'_>> = products
            .iter()
            .zip(&command.items)
            .map(|(product, item)| PlanItem {
                product,
                quantity: item.count,
            })
            .collect();
        let plan = PurchasePlan::build(user.balance, &plan_items, ctx.locale)
            .map_err(|e| AppError::domain(e, ctx.locale))?;

        // Apply: decrement stock, debit balance, record the transaction.
        for line in &plan.lines {
            sqlx::query(
                "UPDATE products SET count = count - $2, modified_date = NOW(), last_modified_by = $3 \
                 WHERE id = $1",
            )
            .bind(line.product_id)
            .bind(line.quantity)
            .bind(&ctx.actor)
            .execute(&mut *tx)
            .await
            .map_err(map_lock_err)?;
        }

        let new_balance: rust_decimal::Decimal = sqlx::query_scalar(
            "UPDATE users SET balance = balance - $2, modified_date = NOW(), last_modified_by = $3 \
             WHERE id = $1 RETURNING balance",
        )
        .bind(user_id)
        .bind(plan.total)
        .bind(&ctx.actor)
        .fetch_one(&mut *tx)
        .await
        .map_err(map_lock_err)?;

        let transaction_id = self
            .transactions
            .insert_purchase(&mut tx, user_id, &plan, ctx)
            .await?;

        tx.commit().await?;

        tracing::info!(
            user_id,
            transaction_id,
            total = %plan.total,
            items = plan.lines.len(),
            "purchase committed"
        );

        Ok(PurchaseResult {
            transaction_id,
            total_amount: plan.total,
            balance: new_balance,
        })
    }

    /// Lock waits inside the purchase are bounded; hitting the bound
    /// surfaces as a retryable conflict instead of blocking indefinitely.
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

/// Postgres reports a lock-wait timeout as SQLSTATE 55P03.
pub(crate) fn map_lock_err(err: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db) = &err {
        if db.code().as_deref() == Some("55P03") {
            return AppError::LockTimeout;
        }
    }
    err.into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Locale;

    fn handler_input(items: Vec<(i64, i64)>) -> PurchaseCommand {
        PurchaseCommand::new(
            items
                .into_iter()
                .map(|(product_id, count)| super::super::PurchaseItemRequest { product_id, count })
                .collect(),
        )
    }

    #[tokio::test]
    async fn test_empty_cart_rejected_before_db_access() {
        // A disconnected pool: the validation must fail before any query.
        let pool = PgPool::connect_lazy("postgres://localhost/unreachable").unwrap();
        let handler = PurchaseHandler::new(pool, 5000);

        let ctx = OperationContext::new("tester").with_locale(Locale::En);
        let err = handler
            .execute(1, handler_input(vec![]), &ctx)
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

    #[tokio::test]
    async fn test_non_positive_quantity_rejected_before_db_access() {
        let pool = PgPool::connect_lazy("postgres://localhost/unreachable").unwrap();
        let handler = PurchaseHandler::new(pool, 5000);

        let ctx = OperationContext::new("tester");
        for count in [0, -1] {
            let err = handler
                .execute(1, handler_input(vec![(7, count)]), &ctx)
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
}
