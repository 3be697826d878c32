//! Search pattern repository port definition.

use async_trait::async_trait;

use super::RepositoryError;
use crate::domain::pattern::{NewSearchPattern, SearchPattern};

/// Port for search pattern persistence.
#[async_trait]
pub trait PatternRepository: Send + Sync {
    /// Create a new search pattern and return it with its generated id.
    async fn create(&self, pattern: &NewSearchPattern) -> Result<SearchPattern, RepositoryError>;

    /// All patterns of a settings profile, in insertion (id) order.
    async fn get_by_setting_id(
        &self,
        setting_id: i64,
    ) -> Result<Vec<SearchPattern>, RepositoryError>;

    /// Update a pattern's type and text. `NotFound` on zero rows.
    async fn update(&self, pattern: &SearchPattern) -> Result<(), RepositoryError>;

    /// Delete a pattern by id. `NotFound` when no such pattern exists.
    async fn delete(&self, id: i64) -> Result<(), RepositoryError>;

    /// Delete all patterns of a settings profile. Succeeds when there are
    /// none.
    async fn delete_by_setting_id(&self, setting_id: i64) -> Result<(), RepositoryError>;
}
