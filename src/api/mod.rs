//! API module
//!
//! HTTP boundary: routes, request/response DTOs and middleware. Routes
//! translate typed results and domain errors into transport responses; no
//! business decisions are made here.

pub mod middleware;
pub mod routes;

pub use routes::create_router;

use sqlx::PgPool;

/// Shared state handed to every route.
#[derive(Debug, Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub lock_timeout_ms: u64,
}

impl AppState {
    pub fn new(pool: PgPool, lock_timeout_ms: u64) -> Self {
        Self {
            pool,
            lock_timeout_ms,
        }
    }
}
