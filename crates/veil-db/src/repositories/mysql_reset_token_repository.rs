//! MySQL implementation of the `ResetTokenRepository` trait.

use async_trait::async_trait;
use sqlx::MySqlPool;

use veil_core::domain::reset_token::{NewResetToken, ResetToken, hash_token};
use veil_core::ports::reset_token_repository::{ResetTokenError, ResetTokenRepository};

use super::row_mappers::{RESET_TOKEN_SELECT_COLUMNS, ResetTokenRow};

// Distinct from classify::storage: this port has its own error type. Token
// hashes and plaintext stay out of the message either way.
fn storage_err(op: &str, e: &sqlx::Error) -> ResetTokenError {
    ResetTokenError::Storage(format!("{op}: {e}"))
}

/// MySQL implementation of the `ResetTokenRepository` trait.
pub struct MySqlResetTokenRepository {
    pool: MySqlPool,
}

impl MySqlResetTokenRepository {
    /// Create a new MySQL reset token repository.
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ResetTokenRepository for MySqlResetTokenRepository {
    async fn create(&self, token: &NewResetToken) -> Result<(), ResetTokenError> {
        sqlx::query(
            "INSERT INTO password_reset_tokens (token_hash, user_id, expires_at)
             VALUES (?, ?, ?)",
        )
        .bind(&token.token_hash)
        .bind(token.user_id)
        .bind(token.expires_at)
        .execute(&self.pool)
        .await
        .map_err(|e| storage_err("create reset token", &e))?;

        tracing::debug!(user_id = token.user_id, "created reset token");
        Ok(())
    }

    async fn find_valid(&self, plaintext: &str) -> Result<ResetToken, ResetTokenError> {
        let hash = hash_token(plaintext);
        let query = format!(
            "SELECT {RESET_TOKEN_SELECT_COLUMNS} FROM password_reset_tokens
             WHERE token_hash = ? AND expires_at > UTC_TIMESTAMP(6)"
        );
        sqlx::query_as::<_, ResetTokenRow>(&query)
            .bind(&hash)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| storage_err("find reset token", &e))?
            .map(ResetToken::from)
            .ok_or(ResetTokenError::TokenNotFound)
    }

    async fn consume(&self, plaintext: &str) -> Result<ResetToken, ResetTokenError> {
        let hash = hash_token(plaintext);
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| storage_err("begin consume reset token", &e))?;

        let query = format!(
            "SELECT {RESET_TOKEN_SELECT_COLUMNS} FROM password_reset_tokens
             WHERE token_hash = ? AND expires_at > UTC_TIMESTAMP(6)
             FOR UPDATE"
        );
        let row = sqlx::query_as::<_, ResetTokenRow>(&query)
            .bind(&hash)
            .fetch_optional(&mut *tx)
            .await
            .map_err(|e| storage_err("find reset token", &e))?;

        let Some(row) = row else {
            tx.rollback()
                .await
                .map_err(|e| storage_err("rollback consume reset token", &e))?;
            return Err(ResetTokenError::TokenNotFound);
        };

        sqlx::query("DELETE FROM password_reset_tokens WHERE token_hash = ?")
            .bind(&hash)
            .execute(&mut *tx)
            .await
            .map_err(|e| storage_err("delete reset token", &e))?;

        tx.commit()
            .await
            .map_err(|e| storage_err("commit consume reset token", &e))?;
        tracing::debug!(user_id = row.user_id, "consumed reset token");
        Ok(row.into())
    }

    async fn delete_by_user_id(&self, user_id: i64) -> Result<(), ResetTokenError> {
        sqlx::query("DELETE FROM password_reset_tokens WHERE user_id = ?")
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(|e| storage_err("delete reset tokens by user", &e))?;
        Ok(())
    }

    async fn delete_expired(&self) -> Result<u64, ResetTokenError> {
        let result = sqlx::query(
            "DELETE FROM password_reset_tokens WHERE expires_at < UTC_TIMESTAMP(6)",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| storage_err("sweep expired reset tokens", &e))?;

        let removed = result.rows_affected();
        if removed > 0 {
            tracing::debug!(removed, "swept expired reset tokens");
        }
        Ok(removed)
    }
}
