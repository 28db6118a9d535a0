//! Command Handlers module
//!
//! Handlers orchestrate one logical operation each: they validate the
//! command, run the store reads and writes inside a single database
//! transaction, and return a typed result or domain error.

mod commands;
mod payment_handler;
mod purchase_handler;
mod register_handler;

pub use commands::*;
pub use payment_handler::PaymentHandler;
pub use purchase_handler::PurchaseHandler;
pub use register_handler::RegisterHandler;
