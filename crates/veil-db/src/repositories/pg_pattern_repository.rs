//! PostgreSQL implementation of the `PatternRepository` trait.

use async_trait::async_trait;
use sqlx::PgPool;

use veil_core::RepositoryError;
use veil_core::domain::pattern::{NewSearchPattern, SearchPattern};
use veil_core::ports::pattern_repository::PatternRepository;

use super::row_mappers::{PATTERN_SELECT_COLUMNS, SearchPatternRow, row_to_pattern};
use crate::classify::storage;

/// PostgreSQL implementation of the `PatternRepository` trait.
pub struct PgPatternRepository {
    pool: PgPool,
}

impl PgPatternRepository {
    /// Create a new PostgreSQL search pattern repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PatternRepository for PgPatternRepository {
    async fn create(&self, pattern: &NewSearchPattern) -> Result<SearchPattern, RepositoryError> {
        let query = format!(
            "INSERT INTO search_patterns (setting_id, pattern_type, pattern_text)
             VALUES ($1, $2, $3)
             RETURNING {PATTERN_SELECT_COLUMNS}"
        );
        let row = sqlx::query_as::<_, SearchPatternRow>(&query)
            .bind(pattern.setting_id)
            .bind(pattern.pattern_type.as_str())
            .bind(&pattern.pattern_text)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| storage("create search pattern", &e))?;

        tracing::debug!(
            pattern_id = row.id,
            setting_id = pattern.setting_id,
            pattern_type = pattern.pattern_type.as_str(),
            "created search pattern"
        );
        row_to_pattern(row)
    }

    async fn get_by_setting_id(
        &self,
        setting_id: i64,
    ) -> Result<Vec<SearchPattern>, RepositoryError> {
        let query = format!(
            "SELECT {PATTERN_SELECT_COLUMNS} FROM search_patterns
             WHERE setting_id = $1
             ORDER BY id"
        );
        let rows = sqlx::query_as::<_, SearchPatternRow>(&query)
            .bind(setting_id)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| storage("list search patterns", &e))?;

        rows.into_iter().map(row_to_pattern).collect()
    }

    async fn update(&self, pattern: &SearchPattern) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            "UPDATE search_patterns SET pattern_type = $1, pattern_text = $2 WHERE id = $3",
        )
        .bind(pattern.pattern_type.as_str())
        .bind(&pattern.pattern_text)
        .bind(pattern.id)
        .execute(&self.pool)
        .await
        .map_err(|e| storage("update search pattern", &e))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(format!(
                "search pattern {}",
                pattern.id
            )));
        }
        Ok(())
    }

    async fn delete(&self, id: i64) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM search_patterns WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| storage("delete search pattern", &e))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(format!("search pattern {id}")));
        }
        tracing::debug!(pattern_id = id, "deleted search pattern");
        Ok(())
    }

    async fn delete_by_setting_id(&self, setting_id: i64) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM search_patterns WHERE setting_id = $1")
            .bind(setting_id)
            .execute(&self.pool)
            .await
            .map_err(|e| storage("delete search patterns by setting", &e))?;

        let removed = result.rows_affected();
        if removed > 0 {
            tracing::debug!(setting_id, removed, "deleted search patterns");
        }
        Ok(())
    }
}
