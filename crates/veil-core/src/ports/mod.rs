//! Port definitions (trait abstractions) for the persistence layer.
//!
//! Ports define the interfaces the domain expects from infrastructure. They
//! contain no implementation details and use only domain types.
//!
//! # Design Rules
//!
//! - No `sqlx` types in any signature
//! - Traits are minimal and CRUD-focused for repositories
//! - Sensitive values (password hashes, salts, token plaintext) never appear
//!   in error messages produced behind these interfaces

pub mod ban_list_repository;
pub mod document_repository;
pub mod field_cipher;
pub mod ip_ban_repository;
pub mod model_entity_repository;
pub mod pattern_repository;
pub mod reset_token_repository;
pub mod session_repository;
pub mod user_repository;

use std::sync::Arc;
use thiserror::Error;

// Re-export repository traits for convenience
pub use ban_list_repository::BanListRepository;
pub use document_repository::DocumentRepository;
pub use field_cipher::{CipherError, FieldCipher, NoopCipher};
pub use ip_ban_repository::IpBanRepository;
pub use model_entity_repository::ModelEntityRepository;
pub use pattern_repository::PatternRepository;
pub use reset_token_repository::{ResetTokenError, ResetTokenRepository};
pub use session_repository::SessionRepository;
pub use user_repository::UserRepository;

/// Container for all repository trait objects.
///
/// This struct provides a consistent way to wire repositories across adapters
/// without coupling consumers to concrete implementations. It lives in
/// `veil-core` so the service layer can accept it without depending on
/// `veil-db`.
#[derive(Clone)]
pub struct Repos {
    /// User account repository.
    pub users: Arc<dyn UserRepository>,
    /// Authentication session repository.
    pub sessions: Arc<dyn SessionRepository>,
    /// Document and detected-entity repository.
    pub documents: Arc<dyn DocumentRepository>,
    /// Ban list and banned-word repository.
    pub ban_lists: Arc<dyn BanListRepository>,
    /// Search pattern repository.
    pub patterns: Arc<dyn PatternRepository>,
    /// Model entity repository.
    pub model_entities: Arc<dyn ModelEntityRepository>,
    /// IP ban repository.
    pub ip_bans: Arc<dyn IpBanRepository>,
    /// Password-reset token repository.
    pub reset_tokens: Arc<dyn ResetTokenRepository>,
}

/// Domain-specific errors for repository operations.
///
/// This error type abstracts away storage implementation details (driver
/// errors, constraint names) and provides a clean interface for services to
/// handle storage failures.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// The requested entity was not found, or an update/delete matched no
    /// rows.
    #[error("Not found: {0}")]
    NotFound(String),

    /// A uniqueness constraint rejected the write. `field` names the domain
    /// field (e.g. `"username"`), `value` carries the offending input.
    #[error("Duplicate {field}: {value}")]
    Duplicate { field: &'static str, value: String },

    /// Storage backend error (driver, row scan, transaction control).
    #[error("Storage error: {0}")]
    Storage(String),

    /// Serialization or deserialization of a stored payload failed.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Field encryption or decryption failed. Distinct from [`Self::NotFound`]
    /// so an undecryptable row is never mistaken for an absent one.
    #[error("Cipher error: {0}")]
    Cipher(String),
}
