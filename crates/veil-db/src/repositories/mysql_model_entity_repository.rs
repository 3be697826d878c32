//! MySQL implementation of the `ModelEntityRepository` trait.

use async_trait::async_trait;
use sqlx::MySqlPool;

use veil_core::RepositoryError;
use veil_core::domain::model_entity::{ModelEntity, NewModelEntity};
use veil_core::ports::model_entity_repository::ModelEntityRepository;

use super::row_mappers::{MODEL_ENTITY_SELECT_COLUMNS, ModelEntityRow};
use crate::classify::{duplicate_or_storage, storage};

/// MySQL implementation of the `ModelEntityRepository` trait.
///
/// Reads LEFT JOIN `detection_methods` so entities whose method row has not
/// been seeded yet still come back, with `method_name` unset.
pub struct MySqlModelEntityRepository {
    pool: MySqlPool,
}

impl MySqlModelEntityRepository {
    /// Create a new MySQL model entity repository.
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    fn joined_select(filter: &str) -> String {
        format!(
            "SELECT {MODEL_ENTITY_SELECT_COLUMNS}
             FROM model_entities e
             LEFT JOIN detection_methods m ON m.id = e.method_id
             WHERE {filter}"
        )
    }
}

#[async_trait]
impl ModelEntityRepository for MySqlModelEntityRepository {
    async fn create(&self, entity: &NewModelEntity) -> Result<ModelEntity, RepositoryError> {
        let result = sqlx::query(
            "INSERT INTO model_entities (setting_id, method_id, entity_text) VALUES (?, ?, ?)",
        )
        .bind(entity.setting_id)
        .bind(entity.method_id)
        .bind(&entity.entity_text)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            duplicate_or_storage(
                "create model entity",
                &e,
                &[("entity_text", &entity.entity_text)],
            )
        })?;

        let id = result.last_insert_id() as i64;
        let query = Self::joined_select("e.id = ?");
        let row = sqlx::query_as::<_, ModelEntityRow>(&query)
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| storage("get model entity after insert", &e))?;

        tracing::debug!(entity_id = id, setting_id = entity.setting_id, "created model entity");
        Ok(row.into())
    }

    async fn create_many(
        &self,
        entities: &[NewModelEntity],
    ) -> Result<Vec<ModelEntity>, RepositoryError> {
        if entities.is_empty() {
            return Ok(Vec::new());
        }

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| storage("begin create model entities", &e))?;

        let query = Self::joined_select("e.id = ?");
        let mut created = Vec::with_capacity(entities.len());
        for entity in entities {
            let result = sqlx::query(
                "INSERT INTO model_entities (setting_id, method_id, entity_text) VALUES (?, ?, ?)",
            )
            .bind(entity.setting_id)
            .bind(entity.method_id)
            .bind(&entity.entity_text)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                duplicate_or_storage(
                    "create model entity",
                    &e,
                    &[("entity_text", &entity.entity_text)],
                )
            })?;

            let id = result.last_insert_id() as i64;
            let row = sqlx::query_as::<_, ModelEntityRow>(&query)
                .bind(id)
                .fetch_one(&mut *tx)
                .await
                .map_err(|e| storage("get model entity after insert", &e))?;
            created.push(row.into());
        }

        tx.commit()
            .await
            .map_err(|e| storage("commit create model entities", &e))?;
        tracing::debug!(count = created.len(), "created model entities");
        Ok(created)
    }

    async fn get_by_setting_id(
        &self,
        setting_id: i64,
    ) -> Result<Vec<ModelEntity>, RepositoryError> {
        let query = format!("{} ORDER BY e.id", Self::joined_select("e.setting_id = ?"));
        let rows = sqlx::query_as::<_, ModelEntityRow>(&query)
            .bind(setting_id)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| storage("list model entities", &e))?;

        Ok(rows.into_iter().map(ModelEntity::from).collect())
    }

    async fn delete(&self, id: i64) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM model_entities WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| storage("delete model entity", &e))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(format!("model entity {id}")));
        }
        tracing::debug!(entity_id = id, "deleted model entity");
        Ok(())
    }

    async fn delete_by_setting_id(&self, setting_id: i64) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM model_entities WHERE setting_id = ?")
            .bind(setting_id)
            .execute(&self.pool)
            .await
            .map_err(|e| storage("delete model entities by setting", &e))?;

        let removed = result.rows_affected();
        if removed > 0 {
            tracing::debug!(setting_id, removed, "deleted model entities");
        }
        Ok(())
    }
}
