//! Registration Handler
//!
//! Creates a new user with a hashed password and the starting balance.

use rand::RngCore;
use rust_decimal::Decimal;
use sha2::{Digest, Sha256};
use sqlx::PgPool;

use crate::domain::OperationContext;
use crate::error::AppError;

use super::{RegisterCommand, RegisterResult};

/// Every new user starts with this balance.
fn starting_balance() -> Decimal {
    Decimal::from(1_000_000)
}

/// Handler for user registration.
pub struct RegisterHandler {
    pool: PgPool,
}

impl RegisterHandler {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Register a user. The username must be unused among non-deleted users.
    pub async fn execute(
        &self,
        command: RegisterCommand,
        ctx: &OperationContext,
    ) -> Result<RegisterResult, AppError> {
        if command.fullname.trim().is_empty()
            || command.username.trim().is_empty()
            || command.password.is_empty()
        {
            return Err(AppError::InvalidRequest(
                "fullname, username and password must not be blank".to_string(),
            ));
        }

        let taken: bool = sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM users WHERE username = $1 AND deleted = FALSE)",
        )
        .bind(&command.username)
        .fetch_one(&self.pool)
        .await?;

        if taken {
            return Err(AppError::UsernameTaken {
                username: command.username,
                locale: ctx.locale,
            });
        }

        let password_hash = hash_password(&command.password);

        let (id, username, balance): (i64, String, Decimal) = sqlx::query_as(
            r#"
            INSERT INTO users (fullname, username, password, balance, role, created_by, last_modified_by)
            VALUES ($1, $2, $3, $4, 'USER', $5, $5)
            RETURNING id, username, balance
            "#,
        )
        .bind(command.fullname.trim())
        .bind(command.username.trim())
        .bind(&password_hash)
        .bind(starting_balance())
        .bind(&ctx.actor)
        .fetch_one(&self.pool)
        .await?;

        tracing::info!(user_id = id, username = %username, "user registered");
        Ok(RegisterResult {
            id,
            username,
            balance,
        })
    }
}

/// Salted SHA-256 password hash, encoded as `salt$digest` in hex.
fn hash_password(password: &str) -> String {
    let mut salt = [0u8; 16];
    rand::thread_rng().fill_bytes(&mut salt);

    let mut hasher = Sha256::new();
    hasher.update(salt);
    hasher.update(password.as_bytes());
    let digest = hasher.finalize();

    format!("{}${}", hex::encode(salt), hex::encode(digest))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_format() {
        let hash = hash_password("secret");
        let parts: Vec<&str> = hash.split('$').collect();
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[0].len(), 32); // 16 salt bytes in hex
        assert_eq!(parts[1].len(), 64); // sha256 digest in hex
    }

    #[test]
    fn test_hash_is_salted() {
        // Same password, different salt, different hash
        assert_ne!(hash_password("secret"), hash_password("secret"));
    }

    #[test]
    fn test_starting_balance() {
        assert_eq!(starting_balance(), Decimal::from(1_000_000));
    }
}
