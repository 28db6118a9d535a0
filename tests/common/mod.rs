//! Common test utilities
//!
//! The integration tests need a Postgres database with the schema from
//! migrations/ applied, reachable through DATABASE_URL.

#![allow(dead_code)]

use rust_decimal::Decimal;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

/// Connect to the test database and truncate all tables for a fresh state.
pub async fn setup_test_db() -> PgPool {
    dotenvy::dotenv().ok();
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set for tests");

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await
        .expect("Failed to connect to DB");

    sqlx::query(
        "TRUNCATE TABLE transaction_items, transactions, user_payment_transactions, products, categories, users CASCADE",
    )
    .execute(&pool)
    .await
    .expect("Failed to clean up DB");

    pool
}

/// Insert a user with the given balance and return its id.
pub async fn seed_user(pool: &PgPool, username: &str, balance: Decimal) -> i64 {
    sqlx::query_scalar(
        r#"
        INSERT INTO users (fullname, username, password, balance)
        VALUES ($1, $1, 'x', $2)
        RETURNING id
        "#,
    )
    .bind(username)
    .bind(balance)
    .fetch_one(pool)
    .await
    .expect("Failed to seed user")
}

/// Insert a category and return its id.
pub async fn seed_category(pool: &PgPool, name: &str, order: i64) -> i64 {
    sqlx::query_scalar(
        "INSERT INTO categories (name, orders) VALUES ($1, $2) RETURNING id",
    )
    .bind(name)
    .bind(order)
    .fetch_one(pool)
    .await
    .expect("Failed to seed category")
}

/// Insert a product and return its id.
pub async fn seed_product(
    pool: &PgPool,
    name_uz: &str,
    count: i64,
    price: Decimal,
    category_id: i64,
) -> i64 {
    sqlx::query_scalar(
        r#"
        INSERT INTO products (name_uz, count, price, category_id)
        VALUES ($1, $2, $3, $4)
        RETURNING id
        "#,
    )
    .bind(name_uz)
    .bind(count)
    .bind(price)
    .bind(category_id)
    .fetch_one(pool)
    .await
    .expect("Failed to seed product")
}

pub async fn product_count(pool: &PgPool, id: i64) -> i64 {
    sqlx::query_scalar("SELECT count FROM products WHERE id = $1")
        .bind(id)
        .fetch_one(pool)
        .await
        .expect("Failed to read product count")
}

pub async fn user_balance(pool: &PgPool, id: i64) -> Decimal {
    sqlx::query_scalar("SELECT balance FROM users WHERE id = $1")
        .bind(id)
        .fetch_one(pool)
        .await
        .expect("Failed to read balance")
}

pub async fn transaction_count(pool: &PgPool) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM transactions")
        .fetch_one(pool)
        .await
        .expect("Failed to count transactions")
}

pub async fn ledger_count(pool: &PgPool, user_id: i64) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM user_payment_transactions WHERE user_id = $1")
        .bind(user_id)
        .fetch_one(pool)
        .await
        .expect("Failed to count ledger entries")
}
