//! MySQL implementation of the `UserRepository` trait.

use async_trait::async_trait;
use sqlx::MySqlPool;

use veil_core::RepositoryError;
use veil_core::domain::user::{NewUser, User};
use veil_core::gdpr::mask_email;
use veil_core::ports::user_repository::UserRepository;

use super::row_mappers::{USER_SELECT_COLUMNS, UserRow};
use crate::classify::{duplicate_or_storage, storage};

/// MySQL implementation of the `UserRepository` trait.
///
/// Case-insensitive username/email semantics come from the columns'
/// case-insensitive collation, so lookups use plain equality and stay
/// index-backed.
pub struct MySqlUserRepository {
    pool: MySqlPool,
}

impl MySqlUserRepository {
    /// Create a new MySQL user repository.
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    async fn fetch_by_id(&self, id: i64) -> Result<Option<UserRow>, RepositoryError> {
        let query = format!("SELECT {USER_SELECT_COLUMNS} FROM users WHERE id = ?");
        sqlx::query_as::<_, UserRow>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| storage("get user by id", &e))
    }
}

#[async_trait]
impl UserRepository for MySqlUserRepository {
    async fn create(&self, user: &NewUser) -> Result<User, RepositoryError> {
        let result = sqlx::query(
            "INSERT INTO users (username, email, password_hash, salt) VALUES (?, ?, ?, ?)",
        )
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.salt)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            duplicate_or_storage(
                "create user",
                &e,
                &[("username", &user.username), ("email", &user.email)],
            )
        })?;

        let id = result.last_insert_id() as i64;
        let row = self
            .fetch_by_id(id)
            .await?
            .ok_or_else(|| RepositoryError::Storage(format!("user {id} vanished after insert")))?;

        tracing::debug!(user_id = id, email = %mask_email(&user.email), "created user");
        Ok(row.into())
    }

    async fn get_by_id(&self, id: i64) -> Result<User, RepositoryError> {
        let row = self
            .fetch_by_id(id)
            .await?
            .ok_or_else(|| RepositoryError::NotFound(format!("user {id}")))?;
        Ok(row.into())
    }

    async fn get_by_username(&self, username: &str) -> Result<User, RepositoryError> {
        let query = format!("SELECT {USER_SELECT_COLUMNS} FROM users WHERE username = ?");
        let row = sqlx::query_as::<_, UserRow>(&query)
            .bind(username)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| storage("get user by username", &e))?
            .ok_or_else(|| RepositoryError::NotFound(format!("user '{username}'")))?;
        Ok(row.into())
    }

    async fn get_by_email(&self, email: &str) -> Result<User, RepositoryError> {
        let query = format!("SELECT {USER_SELECT_COLUMNS} FROM users WHERE email = ?");
        let row = sqlx::query_as::<_, UserRow>(&query)
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| storage("get user by email", &e))?
            .ok_or_else(|| RepositoryError::NotFound(format!("user {}", mask_email(email))))?;
        Ok(row.into())
    }

    async fn exists_by_username(&self, username: &str) -> Result<bool, RepositoryError> {
        let present: i64 =
            sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM users WHERE username = ?)")
                .bind(username)
                .fetch_one(&self.pool)
                .await
                .map_err(|e| storage("probe username", &e))?;
        Ok(present != 0)
    }

    async fn exists_by_email(&self, email: &str) -> Result<bool, RepositoryError> {
        let present: i64 =
            sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM users WHERE email = ?)")
                .bind(email)
                .fetch_one(&self.pool)
                .await
                .map_err(|e| storage("probe email", &e))?;
        Ok(present != 0)
    }

    async fn update(&self, user: &User) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            "UPDATE users SET username = ?, email = ?, updated_at = UTC_TIMESTAMP(6) WHERE id = ?",
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
            "UPDATE users SET password_hash = ?, salt = ?, updated_at = UTC_TIMESTAMP(6)
             WHERE id = ?",
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
             WHERE document_id IN (SELECT id FROM documents WHERE user_id = ?)",
        )
        .bind(id)
        .execute(&mut *tx)
        .await
        .map_err(|e| storage("delete user document entities", &e))?;

        sqlx::query("DELETE FROM documents WHERE user_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(|e| storage("delete user documents", &e))?;

        sqlx::query("DELETE FROM sessions WHERE user_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(|e| storage("delete user sessions", &e))?;

        sqlx::query("DELETE FROM password_reset_tokens WHERE user_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(|e| storage("delete user reset tokens", &e))?;

        let result = sqlx::query("DELETE FROM users WHERE id = ?")
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
