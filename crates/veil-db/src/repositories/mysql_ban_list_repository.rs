//! MySQL implementation of the `BanListRepository` trait.

use async_trait::async_trait;
use sqlx::MySqlPool;

use veil_core::RepositoryError;
use veil_core::domain::ban_list::BanList;
use veil_core::ports::ban_list_repository::BanListRepository;

use super::row_mappers::BanListRow;
use crate::classify::{duplicate_or_storage, storage};

/// MySQL implementation of the `BanListRepository` trait.
pub struct MySqlBanListRepository {
    pool: MySqlPool,
}

impl MySqlBanListRepository {
    /// Create a new MySQL ban list repository.
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BanListRepository for MySqlBanListRepository {
    async fn create(&self, setting_id: i64) -> Result<BanList, RepositoryError> {
        let setting = setting_id.to_string();
        let result = sqlx::query("INSERT INTO ban_lists (setting_id) VALUES (?)")
            .bind(setting_id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                duplicate_or_storage("create ban list", &e, &[("setting_id", setting.as_str())])
            })?;

        let id = result.last_insert_id() as i64;
        tracing::debug!(ban_list_id = id, setting_id, "created ban list");
        Ok(BanList { id, setting_id })
    }

    async fn get_by_id(&self, id: i64) -> Result<BanList, RepositoryError> {
        sqlx::query_as::<_, BanListRow>("SELECT id, setting_id FROM ban_lists WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| storage("get ban list", &e))?
            .map(BanList::from)
            .ok_or_else(|| RepositoryError::NotFound(format!("ban list {id}")))
    }

    async fn get_by_setting_id(&self, setting_id: i64) -> Result<BanList, RepositoryError> {
        sqlx::query_as::<_, BanListRow>(
            "SELECT id, setting_id FROM ban_lists WHERE setting_id = ?",
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

        sqlx::query("DELETE FROM ban_list_words WHERE ban_list_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(|e| storage("delete ban list words", &e))?;

        let result = sqlx::query("DELETE FROM ban_lists WHERE id = ?")
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
            // ON DUPLICATE KEY keeps foreign-key failures fatal, unlike INSERT IGNORE.
            sqlx::query(
                "INSERT INTO ban_list_words (ban_list_id, word) VALUES (?, ?)
                 ON DUPLICATE KEY UPDATE word = word",
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
            sqlx::query("DELETE FROM ban_list_words WHERE ban_list_id = ? AND word = ?")
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
        sqlx::query_scalar("SELECT word FROM ban_list_words WHERE ban_list_id = ? ORDER BY word")
            .bind(ban_list_id)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| storage("list ban list words", &e))
    }

    async fn word_exists(&self, ban_list_id: i64, word: &str) -> Result<bool, RepositoryError> {
        let exists: i64 = sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM ban_list_words WHERE ban_list_id = ? AND word = ?)",
        )
        .bind(ban_list_id)
        .bind(word)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| storage("probe ban list word", &e))?;
        Ok(exists != 0)
    }
}
