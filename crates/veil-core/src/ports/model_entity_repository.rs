//! Model entity repository port definition.

use async_trait::async_trait;

use super::RepositoryError;
use crate::domain::model_entity::{ModelEntity, NewModelEntity};

/// Port for model entity persistence.
#[async_trait]
pub trait ModelEntityRepository: Send + Sync {
    /// Create a new model entity. Re-adding the same text for the same
    /// setting and method yields [`RepositoryError::Duplicate`] on
    /// `entity_text`.
    async fn create(&self, entity: &NewModelEntity) -> Result<ModelEntity, RepositoryError>;

    /// Create several model entities in one transaction, one insert per row;
    /// a failure part-way rolls the whole batch back. The empty slice is a
    /// success that never touches storage.
    async fn create_many(
        &self,
        entities: &[NewModelEntity],
    ) -> Result<Vec<ModelEntity>, RepositoryError>;

    /// All model entities of a settings profile in insertion (id) order,
    /// with method names joined in where available.
    async fn get_by_setting_id(
        &self,
        setting_id: i64,
    ) -> Result<Vec<ModelEntity>, RepositoryError>;

    /// Delete a model entity by id. `NotFound` when no such entity exists.
    async fn delete(&self, id: i64) -> Result<(), RepositoryError>;

    /// Delete all model entities of a settings profile. Succeeds when there
    /// are none.
    async fn delete_by_setting_id(&self, setting_id: i64) -> Result<(), RepositoryError>;
}
