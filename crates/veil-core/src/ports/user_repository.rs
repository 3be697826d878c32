//! User repository port definition.

use async_trait::async_trait;

use super::RepositoryError;
use crate::domain::user::{NewUser, User};

/// Port for user account persistence.
///
/// Username and email are unique case-insensitively: lookups and existence
/// probes fold case, and collisions on write surface as
/// [`RepositoryError::Duplicate`] naming the offending field.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Create a new user and return it with its generated id and timestamps.
    async fn create(&self, user: &NewUser) -> Result<User, RepositoryError>;

    /// Get a user by id.
    async fn get_by_id(&self, id: i64) -> Result<User, RepositoryError>;

    /// Get a user by username (case-insensitive).
    async fn get_by_username(&self, username: &str) -> Result<User, RepositoryError>;

    /// Get a user by email (case-insensitive).
    async fn get_by_email(&self, email: &str) -> Result<User, RepositoryError>;

    /// Whether a user with this username exists (case-insensitive).
    async fn exists_by_username(&self, username: &str) -> Result<bool, RepositoryError>;

    /// Whether a user with this email exists (case-insensitive).
    async fn exists_by_email(&self, email: &str) -> Result<bool, RepositoryError>;

    /// Update a user's username and email, refreshing `updated_at`.
    async fn update(&self, user: &User) -> Result<(), RepositoryError>;

    /// Replace the stored password hash and salt, refreshing `updated_at`.
    /// Neither argument may appear in logs or error messages.
    async fn change_password(
        &self,
        id: i64,
        password_hash: &str,
        salt: &str,
    ) -> Result<(), RepositoryError>;

    /// Delete a user account and everything it owns.
    ///
    /// Runs as one transaction removing the detected entities of the user's
    /// documents, the documents, the user's sessions and reset tokens, then
    /// the user row itself. If the user row does not exist the transaction is
    /// rolled back and nothing is removed.
    async fn delete(&self, id: i64) -> Result<(), RepositoryError>;
}
