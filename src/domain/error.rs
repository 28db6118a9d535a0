//! Domain Error Types
//!
//! The closed set of business rule violations the shop core can produce.
//! Each variant carries a stable numeric code that the boundary returns to
//! clients alongside a localized message (see `crate::messages`).

use rust_decimal::Decimal;
use thiserror::Error;

/// Domain-specific errors. Independent of the web/infrastructure layer; all
/// of them abort the enclosing database transaction and none crash the
/// process.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ShopError {
    /// Referenced category id absent or soft-deleted
    #[error("Category not found: {0}")]
    CategoryNotFound(i64),

    /// Referenced product id absent or soft-deleted
    #[error("Product not found: {0}")]
    ProductNotFound(i64),

    /// Referenced user id absent or soft-deleted
    #[error("User not found: {0}")]
    UserNotFound(i64),

    /// Requested quantity exceeds available product stock
    #[error("Insufficient stock for product '{product}': requested {requested}, available {available}")]
    InsufficientStock {
        product: String,
        requested: i64,
        available: i64,
    },

    /// Debit amount exceeds current balance
    #[error("Insufficient balance: required {required}, available {available}")]
    InsufficientBalance {
        required: Decimal,
        available: Decimal,
    },

    /// A deposit/withdraw amount or an item quantity is not strictly positive
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    /// Referenced transaction id absent or soft-deleted
    #[error("Transaction not found: {0}")]
    TransactionNotFound(i64),

    /// Reserved for access-control failures; not raised by the current core
    #[error("Unauthorized access")]
    UnauthorizedAccess,
}

impl ShopError {
    /// Stable machine code carried in every error response body.
    pub fn code(&self) -> i32 {
        match self {
            ShopError::CategoryNotFound(_) => 200,
            ShopError::ProductNotFound(_) => 300,
            ShopError::UserNotFound(_) => 400,
            ShopError::TransactionNotFound(_) => 500,
            ShopError::InsufficientStock { .. } => 600,
            ShopError::InsufficientBalance { .. } => 700,
            ShopError::InvalidAmount(_) => 800,
            ShopError::UnauthorizedAccess => 900,
        }
    }

    /// Whether the failure is a missing-entity lookup.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            ShopError::CategoryNotFound(_)
                | ShopError::ProductNotFound(_)
                | ShopError::UserNotFound(_)
                | ShopError::TransactionNotFound(_)
        )
    }

    pub fn insufficient_balance(required: Decimal, available: Decimal) -> Self {
        Self::InsufficientBalance {
            required,
            available,
        }
    }

    pub fn invalid_amount(reason: impl Into<String>) -> Self {
        Self::InvalidAmount(reason.into())
    }
}
