//! Password-reset token repository port definition.
//!
//! This port hashes incoming plaintext itself (via
//! [`crate::domain::reset_token::hash_token`]) so callers hand over the token
//! a user presented and never deal in digests. Token material must not appear
//! in logs or error output, which is why the error variant carries no value.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::reset_token::{NewResetToken, ResetToken};

/// Errors that can occur in reset token operations.
#[derive(Debug, Error)]
pub enum ResetTokenError {
    /// No live token matches the presented plaintext. Covers both absent and
    /// expired tokens so callers cannot distinguish the two.
    #[error("Reset token not found or expired")]
    TokenNotFound,

    #[error("Storage error: {0}")]
    Storage(String),
}

/// Port for password-reset token persistence.
#[async_trait]
pub trait ResetTokenRepository: Send + Sync {
    /// Persist a freshly minted token record.
    async fn create(&self, token: &NewResetToken) -> Result<(), ResetTokenError>;

    /// Look up a live token by the plaintext a user presented. Expired and
    /// absent tokens both yield [`ResetTokenError::TokenNotFound`].
    async fn find_valid(&self, plaintext: &str) -> Result<ResetToken, ResetTokenError>;

    /// Look up a live token and delete it in one transaction, enforcing
    /// single use. Returns the consumed record.
    async fn consume(&self, plaintext: &str) -> Result<ResetToken, ResetTokenError>;

    /// Delete all tokens belonging to a user. Succeeds when there are none.
    async fn delete_by_user_id(&self, user_id: i64) -> Result<(), ResetTokenError>;

    /// Remove tokens whose expiry lies strictly in the past. Returns the
    /// number of rows removed.
    async fn delete_expired(&self) -> Result<u64, ResetTokenError>;
}
