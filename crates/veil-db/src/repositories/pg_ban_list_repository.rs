//! PostgreSQL implementation of the `BanListRepository` trait.

use async_trait::async_trait;
use sqlx::PgPool;

use veil_core::RepositoryError;
use veil_core::domain::ban_list::BanList;
use veil_core::ports::ban_list_repository::BanListRepository;

use super::row_mappers::BanListRow;
use crate::classify::{duplicate_or_storage, storage};

/// PostgreSQL implementation of the `BanListRepository` trait.
pub struct PgBanListRepository {
    pool: PgPool,
}

impl PgBanListRepository {
    /// Create a new PostgreSQL ban list repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BanListRepository for PgBanListRepository {
    async fn create(&self, setting_id: i64) -> Result<BanList, RepositoryError> {
        let setting = setting_id.to_string();
        let row = sqlx::query_as::<_, BanListRow>(
            "INSERT INTO ban_lists (setting_id) VALUES ($1) RETURNING id, setting_id",
        )
        .bind(setting_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            duplicate_or_storage("create ban list", &e, &[("setting_id", setting.as_str())])
        })?;

        tracing::debug!(ban_list_id = row.id, setting_id, "created ban list");
        Ok(row.into())
    }

    async fn get_by_id(&self, id: i64) -> Result<BanList, RepositoryError> {
        sqlx::query_as::<_, BanListRow>("SELECT id, setting_id FROM ban_lists WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| storage("get ban list", &e))?
            .map(BanList::from)
            .ok_or_else(|| RepositoryError::NotFound(format!("ban list {id}")))
    }

    async fn get_by_setting_id(&self, setting_id: i64) -> Result<BanList, RepositoryError> {
        sqlx::query_as::<_, BanListRow>(
            "SELECT id, setting_id FROM ban_lists WHERE setting_id = $1",
        )
        .bind(setting_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| storage("get ban list by setting", &e))?
        .map(BanList::from)
        .ok_or_else(|| RepositoryError::NotFound(format!("ban list for setting {setting_id}")))
    }

    async fn delete(&self, id: i64) -> Result<(), RepositoryError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| storage("begin delete ban list", &e))?;

        sqlx::query("DELETE FROM ban_list_words WHERE ban_list_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(|e| storage("delete ban list words", &e))?;

        let result = sqlx::query("DELETE FROM ban_lists WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(|e| storage("delete ban list", &e))?;

        if result.rows_affected() == 0 {
            tx.rollback()
                .await
                .map_err(|e| storage("rollback delete ban list", &e))?;
            return Err(RepositoryError::NotFound(format!("ban list {id}")));
        }

        tx.commit()
            .await
            .map_err(|e| storage("commit delete ban list", &e))?;
        tracing::debug!(ban_list_id = id, "deleted ban list and words");
        Ok(())
    }

    async fn add_words(&self, ban_list_id: i64, words: &[String]) -> Result<(), RepositoryError> {
        if words.is_empty() {
            return Ok(());
        }

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| storage("begin add words", &e))?;

        for word in words {
            sqlx::query(
                "INSERT INTO ban_list_words (ban_list_id, word) VALUES ($1, $2)
                 ON CONFLICT (ban_list_id, word) DO NOTHING",
            )
            .bind(ban_list_id)
            .bind(word)
            .execute(&mut *tx)
            .await
            .map_err(|e| storage("add word", &e))?;
        }

        tx.commit()
            .await
            .map_err(|e| storage("commit add words", &e))?;
        tracing::debug!(ban_list_id, count = words.len(), "added ban list words");
        Ok(())
    }

    async fn remove_words(
        &self,
        ban_list_id: i64,
        words: &[String],
    ) -> Result<(), RepositoryError> {
        if words.is_empty() {
            return Ok(());
        }

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| storage("begin remove words", &e))?;

        for word in words {
            sqlx::query("DELETE FROM ban_list_words WHERE ban_list_id = $1 AND word = $2")
                .bind(ban_list_id)
                .bind(word)
                .execute(&mut *tx)
                .await
                .map_err(|e| storage("remove word", &e))?;
        }

        tx.commit()
            .await
            .map_err(|e| storage("commit remove words", &e))?;
        tracing::debug!(ban_list_id, count = words.len(), "removed ban list words");
        Ok(())
    }

    async fn get_words(&self, ban_list_id: i64) -> Result<Vec<String>, RepositoryError> {
        sqlx::query_scalar(
            "SELECT word FROM ban_list_words WHERE ban_list_id = $1 ORDER BY word",
        )
        .bind(ban_list_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| storage("list ban list words", &e))
    }

    async fn word_exists(&self, ban_list_id: i64, word: &str) -> Result<bool, RepositoryError> {
        sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM ban_list_words WHERE ban_list_id = $1 AND word = $2)",
        )
        .bind(ban_list_id)
        .bind(word)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| storage("probe ban list word", &e))
    }
}
