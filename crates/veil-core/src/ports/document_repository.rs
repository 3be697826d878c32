//! Document repository port definition.
//!
//! Spans documents and their detected entities, since the two change
//! together: entity writes always happen in the context of a document, and
//! document deletion must take its entities with it.

use async_trait::async_trait;

use super::RepositoryError;
use crate::domain::document::{DetectedEntity, Document, NewDetectedEntity, NewDocument};
use crate::domain::pagination::{Paged, PageRequest};

/// Port for document and detected-entity persistence.
///
/// Implementations encrypt document names and entity redaction schemas at
/// rest; the domain types on this interface always carry plaintext. A row
/// that cannot be decrypted surfaces as [`RepositoryError::Cipher`], never as
/// `NotFound`.
#[async_trait]
pub trait DocumentRepository: Send + Sync {
    /// Create a new document and return it with generated id and timestamps.
    async fn create(&self, doc: &NewDocument) -> Result<Document, RepositoryError>;

    /// Get a document by id.
    async fn get_by_id(&self, id: i64) -> Result<Document, RepositoryError>;

    /// List a user's documents, most recently uploaded first, with the total
    /// count for the same user.
    async fn list_by_user(
        &self,
        user_id: i64,
        page: &PageRequest,
    ) -> Result<Paged<Document>, RepositoryError>;

    /// Update a document's name and redaction schema, refreshing
    /// `last_modified`. `NotFound` on zero rows.
    async fn update(&self, doc: &Document) -> Result<(), RepositoryError>;

    /// Delete a document and its detected entities in one transaction.
    /// If the document does not exist the transaction is rolled back and
    /// nothing is removed.
    async fn delete(&self, id: i64) -> Result<(), RepositoryError>;

    /// Delete all of a user's documents and their detected entities in one
    /// transaction. Succeeds when the user has none.
    async fn delete_by_user_id(&self, user_id: i64) -> Result<(), RepositoryError>;

    /// Record a detected entity. The returned value carries the method name
    /// and highlight color joined from the detection-methods lookup.
    async fn add_entity(
        &self,
        entity: &NewDetectedEntity,
    ) -> Result<DetectedEntity, RepositoryError>;

    /// All detected entities of a document in detection order.
    async fn entities_for_document(
        &self,
        document_id: i64,
    ) -> Result<Vec<DetectedEntity>, RepositoryError>;

    /// Delete all detected entities of a document. Succeeds when there are
    /// none.
    async fn delete_entities_for_document(&self, document_id: i64)
    -> Result<(), RepositoryError>;
}
