//! Command definitions
//!
//! Commands represent intentions to change the system state, decoupled from
//! the HTTP request shapes.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One requested purchase line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PurchaseItemRequest {
    pub product_id: i64,
    pub count: i64,
}

/// Command to purchase a cart of items for a user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PurchaseCommand {
    pub items: Vec<PurchaseItemRequest>,
}

impl PurchaseCommand {
    pub fn new(items: Vec<PurchaseItemRequest>) -> Self {
        Self { items }
    }

    pub fn single(product_id: i64, count: i64) -> Self {
        Self {
            items: vec![PurchaseItemRequest { product_id, count }],
        }
    }
}

/// Result of a committed purchase.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PurchaseResult {
    pub transaction_id: i64,
    pub total_amount: Decimal,
    /// Balance remaining after the debit.
    pub balance: Decimal,
}

/// Command to deposit or withdraw money. The amount travels as a string so
/// decimal precision survives the JSON boundary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentCommand {
    pub amount: String,
}

impl PaymentCommand {
    pub fn new(amount: impl Into<String>) -> Self {
        Self {
            amount: amount.into(),
        }
    }
}

/// Result of a committed deposit or withdrawal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentResult {
    pub user_id: i64,
    pub balance: Decimal,
}

/// Command to register a new user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterCommand {
    pub fullname: String,
    pub username: String,
    pub password: String,
}

impl RegisterCommand {
    pub fn new(
        fullname: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            fullname: fullname.into(),
            username: username.into(),
            password: password.into(),
        }
    }
}

/// Result of a successful registration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterResult {
    pub id: i64,
    pub username: String,
    pub balance: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_purchase_command_single() {
        let cmd = PurchaseCommand::single(7, 3);
        assert_eq!(cmd.items.len(), 1);
        assert_eq!(cmd.items[0].product_id, 7);
        assert_eq!(cmd.items[0].count, 3);
    }

    #[test]
    fn test_payment_command_amount_is_verbatim() {
        let cmd = PaymentCommand::new("100.50");
        assert_eq!(cmd.amount, "100.50");
    }

    #[test]
    fn test_register_command() {
        let cmd = RegisterCommand::new("Ali Valiyev", "ali", "secret");
        assert_eq!(cmd.username, "ali");
        assert_eq!(cmd.fullname, "Ali Valiyev");
    }
}
