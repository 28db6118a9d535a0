//! appshop Library
//!
//! Online-shop backend: catalog, user balances and purchase settlement.
//! Re-exports modules for integration testing and the server binary.

pub mod api;
pub mod config;
pub mod db;
pub mod domain;
pub mod error;
pub mod handlers;
pub mod messages;
pub mod store;

pub use config::Config;
pub use domain::{
    Amount, AmountError, Balance, Locale, LocalizedName, OperationContext, ShopError,
};
pub use error::{AppError, AppResult, BaseMessage};
