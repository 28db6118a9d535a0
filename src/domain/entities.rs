//! Persistent entity row types
//!
//! Every table shares the audited soft-delete base columns: identifier,
//! creation/modification timestamps, creator/modifier attribution and the
//! `deleted` flag gating visibility. Rows map 1:1 onto the tables created by
//! `migrations/0001_init.sql`.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::postgres::PgRow;
use sqlx::FromRow;

use super::LocalizedName;

/// Entities stored with the audited soft-delete base columns. `TABLE` names
/// the backing table for the generic store queries.
pub trait SoftDeleteEntity: for<'r> FromRow<'r, PgRow> + Send + Unpin {
    const TABLE: &'static str;
}

/// A registered shop user. Never hard-deleted, only trashed.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct User {
    pub id: i64,
    pub created_date: DateTime<Utc>,
    pub modified_date: DateTime<Utc>,
    pub created_by: Option<String>,
    pub last_modified_by: Option<String>,
    pub deleted: bool,

    pub fullname: String,
    pub username: String,
    #[serde(skip_serializing)]
    pub password: String,
    pub balance: Decimal,
    pub role: String,
}

impl SoftDeleteEntity for User {
    const TABLE: &'static str = "users";
}

/// A catalog category with an explicit display order.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Category {
    pub id: i64,
    pub created_date: DateTime<Utc>,
    pub modified_date: DateTime<Utc>,
    pub created_by: Option<String>,
    pub last_modified_by: Option<String>,
    pub deleted: bool,

    pub name: String,
    /// Display order; assigned as current-max + 1 when not supplied.
    #[sqlx(rename = "orders")]
    pub order: i64,
    pub description: Option<String>,
}

impl SoftDeleteEntity for Category {
    const TABLE: &'static str = "categories";
}

/// A sellable product with localized name, stock count and unit price.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Product {
    pub id: i64,
    pub created_date: DateTime<Utc>,
    pub modified_date: DateTime<Utc>,
    pub created_by: Option<String>,
    pub last_modified_by: Option<String>,
    pub deleted: bool,

    #[sqlx(flatten)]
    pub name: LocalizedName,
    /// Remaining stock; never negative after a committed operation.
    pub count: i64,
    /// Unit price, fixed-point with 2 decimal places.
    pub price: Decimal,
    pub category_id: i64,
}

impl SoftDeleteEntity for Product {
    const TABLE: &'static str = "products";
}

/// A committed purchase: header row owning its line items. Immutable once
/// created.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PurchaseTransaction {
    pub id: i64,
    pub created_date: DateTime<Utc>,
    pub modified_date: DateTime<Utc>,
    pub created_by: Option<String>,
    pub last_modified_by: Option<String>,
    pub deleted: bool,

    pub user_id: i64,
    /// Sum of the line item amounts.
    pub total_amount: Decimal,
}

impl SoftDeleteEntity for PurchaseTransaction {
    const TABLE: &'static str = "transactions";
}

/// One purchased line: product, quantity and amount at purchase time.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct TransactionItem {
    pub id: i64,
    pub created_date: DateTime<Utc>,
    pub modified_date: DateTime<Utc>,
    pub created_by: Option<String>,
    pub last_modified_by: Option<String>,
    pub deleted: bool,

    pub transaction_id: i64,
    pub product_id: i64,
    pub count: i64,
    /// price × quantity at purchase time.
    pub amount: Decimal,
}

impl SoftDeleteEntity for TransactionItem {
    const TABLE: &'static str = "transaction_items";
}

/// Direction tag of a ledger entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PaymentType {
    Deposit,
    Withdraw,
}

impl PaymentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentType::Deposit => "DEPOSIT",
            PaymentType::Withdraw => "WITHDRAW",
        }
    }
}

/// An immutable, append-only ledger entry recording a balance-affecting
/// event. Amount is signed: positive for deposits, negative for withdrawals.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PaymentEntry {
    pub id: i64,
    pub created_date: DateTime<Utc>,
    pub modified_date: DateTime<Utc>,
    pub created_by: Option<String>,
    pub last_modified_by: Option<String>,
    pub deleted: bool,

    pub user_id: i64,
    pub amount: Decimal,
    pub entry_type: String,
}

impl SoftDeleteEntity for PaymentEntry {
    const TABLE: &'static str = "user_payment_transactions";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_names() {
        assert_eq!(User::TABLE, "users");
        assert_eq!(Category::TABLE, "categories");
        assert_eq!(Product::TABLE, "products");
        assert_eq!(PurchaseTransaction::TABLE, "transactions");
        assert_eq!(TransactionItem::TABLE, "transaction_items");
        assert_eq!(PaymentEntry::TABLE, "user_payment_transactions");
    }

    #[test]
    fn test_payment_type_tags() {
        assert_eq!(PaymentType::Deposit.as_str(), "DEPOSIT");
        assert_eq!(PaymentType::Withdraw.as_str(), "WITHDRAW");
    }
}
