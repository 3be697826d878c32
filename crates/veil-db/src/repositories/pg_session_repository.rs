//! PostgreSQL implementation of the `SessionRepository` trait.

use async_trait::async_trait;
use sqlx::PgPool;

use veil_core::RepositoryError;
use veil_core::domain::session::{NewSession, Session};
use veil_core::ports::session_repository::SessionRepository;

use super::row_mappers::{SESSION_SELECT_COLUMNS, SessionRow};
use crate::classify::{duplicate_or_storage, storage};

/// PostgreSQL implementation of the `SessionRepository` trait.
pub struct PgSessionRepository {
    pool: PgPool,
}

impl PgSessionRepository {
    /// Create a new PostgreSQL session repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SessionRepository for PgSessionRepository {
    async fn create(&self, session: &NewSession) -> Result<Session, RepositoryError> {
        let query = format!(
            "INSERT INTO sessions (id, user_id, jwt_id, expires_at)
             VALUES ($1, $2, $3, $4)
             RETURNING {SESSION_SELECT_COLUMNS}"
        );
        let row = sqlx::query_as::<_, SessionRow>(&query)
            .bind(&session.id)
            .bind(session.user_id)
            .bind(&session.jwt_id)
            .bind(session.expires_at)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                duplicate_or_storage("create session", &e, &[("jwt_id", &session.jwt_id)])
            })?;

        tracing::debug!(session_id = %session.id, user_id = session.user_id, "created session");
        Ok(row.into())
    }

    async fn get_by_jwt_id(&self, jwt_id: &str) -> Result<Session, RepositoryError> {
        let query = format!("SELECT {SESSION_SELECT_COLUMNS} FROM sessions WHERE jwt_id = $1");
        let row = sqlx::query_as::<_, SessionRow>(&query)
            .bind(jwt_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| storage("get session by jwt id", &e))?
            .ok_or_else(|| RepositoryError::NotFound(format!("session for jwt {jwt_id}")))?;
        Ok(row.into())
    }

    async fn is_valid(&self, jwt_id: &str) -> Result<bool, RepositoryError> {
        sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM sessions WHERE jwt_id = $1 AND expires_at > now())",
        )
        .bind(jwt_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| storage("probe session validity", &e))
    }

    async fn delete(&self, id: &str) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM sessions WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| storage("delete session", &e))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(format!("session {id}")));
        }
        Ok(())
    }

    async fn delete_by_user_id(&self, user_id: i64) -> Result<(), RepositoryError> {
        sqlx::query("DELETE FROM sessions WHERE user_id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(|e| storage("delete sessions by user", &e))?;
        Ok(())
    }

    async fn delete_expired(&self) -> Result<u64, RepositoryError> {
        let result = sqlx::query("DELETE FROM sessions WHERE expires_at < now()")
            .execute(&self.pool)
            .await
            .map_err(|e| storage("sweep expired sessions", &e))?;

        let removed = result.rows_affected();
        if removed > 0 {
            tracing::debug!(removed, "swept expired sessions");
        }
        Ok(removed)
    }
}
