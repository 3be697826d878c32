//! PostgreSQL implementation of the `UserRepository` trait.

use async_trait::async_trait;
use sqlx::PgPool;

use veil_core::RepositoryError;
use veil_core::domain::user::{NewUser, User};
use veil_core::gdpr::mask_email;
use veil_core::ports::user_repository::UserRepository;

use super::row_mappers::{USER_SELECT_COLUMNS, UserRow};
use crate::classify::{duplicate_or_storage, storage};

/// PostgreSQL implementation of the `UserRepository` trait.
///
/// Case-insensitive username/email semantics come from the `lower()` unique
/// indexes; every lookup spells the same `lower()` expression so the index
/// applies.
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    /// Create a new PostgreSQL user repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn create(&self, user: &NewUser) -> Result<User, RepositoryError> {
        let query = format!(
            "INSERT INTO users (username, email, password_hash, salt)
             VALUES ($1, $2, $3, $4)
             RETURNING {USER_SELECT_COLUMNS}"
        );
        let row = sqlx::query_as::<_, UserRow>(&query)
            .bind(&user.username)
            .bind(&user.email)
            .bind(&user.password_hash)
            .bind(&user.salt)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                duplicate_or_storage(
                    "create user",
                    &e,
                    &[("username", &user.username), ("email", &user.email)],
                )
            })?;

        tracing::debug!(user_id = row.id, email = %mask_email(&user.email), "created user");
        Ok(row.into())
    }

    async fn get_by_id(&self, id: i64) -> Result<User, RepositoryError> {
        let query = format!("SELECT {USER_SELECT_COLUMNS} FROM users WHERE id = $1");
        let row = sqlx::query_as::<_, UserRow>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| storage("get user by id", &e))?
            .ok_or_else(|| RepositoryError::NotFound(format!("user {id}")))?;
        Ok(row.into())
    }

    async fn get_by_username(&self, username: &str) -> Result<User, RepositoryError> {
        let query = format!(
            "SELECT {USER_SELECT_COLUMNS} FROM users WHERE lower(username) = lower($1)"
        );
        let row = sqlx::query_as::<_, UserRow>(&query)
            .bind(username)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| storage("get user by username", &e))?
            .ok_or_else(|| RepositoryError::NotFound(format!("user '{username}'")))?;
        Ok(row.into())
    }

    async fn get_by_email(&self, email: &str) -> Result<User, RepositoryError> {
        let query =
            format!("SELECT {USER_SELECT_COLUMNS} FROM users WHERE lower(email) = lower($1)");
        let row = sqlx::query_as::<_, UserRow>(&query)
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| storage("get user by email", &e))?
            .ok_or_else(|| RepositoryError::NotFound(format!("user {}", mask_email(email))))?;
        Ok(row.into())
    }

    async fn exists_by_username(&self, username: &str) -> Result<bool, RepositoryError> {
        sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM users WHERE lower(username) = lower($1))",
        )
        .bind(username)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| storage("probe username", &e))
    }

    async fn exists_by_email(&self, email: &str) -> Result<bool, RepositoryError> {
        sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM users WHERE lower(email) = lower($1))")
            .bind(email)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| storage("probe email", &e))
    }

    async fn update(&self, user: &User) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            "UPDATE users SET username = $1, email = $2, updated_at = now() WHERE id = $3",
        )
        .bind(&user.username)
        .bind(&user.email)
        .bind(user.id)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            duplicate_or_storage(
                "update user",
                &e,
                &[("username", &user.username), ("email", &user.email)],
            )
        })?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(format!("user {}", user.id)));
        }
        Ok(())
    }

    async fn change_password(
        &self,
        id: i64,
        password_hash: &str,
        salt: &str,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            "UPDATE users SET password_hash = $1, salt = $2, updated_at = now() WHERE id = $3",
        )
        .bind(password_hash)
        .bind(salt)
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| storage("change password", &e))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(format!("user {id}")));
        }
        tracing::debug!(user_id = id, "changed password");
        Ok(())
    }

    async fn delete(&self, id: i64) -> Result<(), RepositoryError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| storage("begin delete user", &e))?;

        sqlx::query(
            "DELETE FROM detected_entities
             WHERE document_id IN (SELECT id FROM documents WHERE user_id = $1)",
        )
        .bind(id)
        .execute(&mut *tx)
        .await
        .map_err(|e| storage("delete user document entities", &e))?;

        sqlx::query("DELETE FROM documents WHERE user_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(|e| storage("delete user documents", &e))?;

        sqlx::query("DELETE FROM sessions WHERE user_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(|e| storage("delete user sessions", &e))?;

        sqlx::query("DELETE FROM password_reset_tokens WHERE user_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(|e| storage("delete user reset tokens", &e))?;

        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(|e| storage("delete user", &e))?;

        if result.rows_affected() == 0 {
            tx.rollback()
                .await
                .map_err(|e| storage("rollback delete user", &e))?;
            return Err(RepositoryError::NotFound(format!("user {id}")));
        }

        tx.commit()
            .await
            .map_err(|e| storage("commit delete user", &e))?;
        tracing::debug!(user_id = id, "deleted user and owned records");
        Ok(())
    }
}
