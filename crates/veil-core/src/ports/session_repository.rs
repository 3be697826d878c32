//! Session repository port definition.

use async_trait::async_trait;

use super::RepositoryError;
use crate::domain::session::{NewSession, Session};

/// Port for authentication session persistence.
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Persist a new session. The JWT id is unique; a collision yields
    /// [`RepositoryError::Duplicate`].
    async fn create(&self, session: &NewSession) -> Result<Session, RepositoryError>;

    /// Get a session by its JWT id.
    async fn get_by_jwt_id(&self, jwt_id: &str) -> Result<Session, RepositoryError>;

    /// Whether a session with this JWT id exists and has not expired.
    async fn is_valid(&self, jwt_id: &str) -> Result<bool, RepositoryError>;

    /// Delete a session by id. `NotFound` when no such session exists.
    async fn delete(&self, id: &str) -> Result<(), RepositoryError>;

    /// Delete all sessions belonging to a user. Succeeds when there are none.
    async fn delete_by_user_id(&self, user_id: i64) -> Result<(), RepositoryError>;

    /// Remove sessions whose expiry lies strictly in the past. Returns the
    /// number of rows removed.
    async fn delete_expired(&self) -> Result<u64, RepositoryError>;
}
