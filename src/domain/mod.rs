//! Domain layer
//!
//! Pure business types and rules: entities, monetary values, locales, the
//! purchase planner and the closed domain error set. Nothing in this module
//! touches the database or the web layer.

mod context;
mod entities;
mod error;
mod locale;
mod money;
mod purchase;

pub use context::OperationContext;
pub use entities::{
    Category, PaymentEntry, PaymentType, Product, PurchaseTransaction, SoftDeleteEntity,
    TransactionItem, User,
};
pub use error::ShopError;
pub use locale::{Locale, LocalizedName};
pub use money::{Amount, AmountError, Balance};
pub use purchase::{PlanItem, PurchaseLine, PurchasePlan};
