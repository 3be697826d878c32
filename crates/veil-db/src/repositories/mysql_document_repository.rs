//! MySQL implementation of the `DocumentRepository` trait.

use std::sync::Arc;

use async_trait::async_trait;
use sqlx::MySqlPool;

use veil_core::RepositoryError;
use veil_core::domain::document::{DetectedEntity, Document, NewDetectedEntity, NewDocument};
use veil_core::domain::pagination::{Paged, PageRequest};
use veil_core::ports::document_repository::DocumentRepository;
use veil_core::ports::field_cipher::FieldCipher;

use super::row_mappers::{
    DOCUMENT_SELECT_COLUMNS, DetectedEntityRow, DocumentRow, ENTITY_SELECT_COLUMNS,
    count_to_total, encrypt_field, row_to_document, row_to_entity, schema_to_json, sql_page,
};
use crate::classify::storage;

/// MySQL implementation of the `DocumentRepository` trait.
///
/// Document names and detected-entity redaction schemas pass through the
/// injected cipher on every write and read.
pub struct MySqlDocumentRepository {
    pool: MySqlPool,
    cipher: Arc<dyn FieldCipher>,
}

impl MySqlDocumentRepository {
    /// Create a new MySQL document repository.
    pub fn new(pool: MySqlPool, cipher: Arc<dyn FieldCipher>) -> Self {
        Self { pool, cipher }
    }

    async fn fetch_by_id(&self, id: i64, op: &str) -> Result<DocumentRow, RepositoryError> {
        let query = format!("SELECT {DOCUMENT_SELECT_COLUMNS} FROM documents WHERE id = ?");
        sqlx::query_as::<_, DocumentRow>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| storage(op, &e))?
            .ok_or_else(|| RepositoryError::NotFound(format!("document {id}")))
    }
}

#[async_trait]
impl DocumentRepository for MySqlDocumentRepository {
    async fn create(&self, doc: &NewDocument) -> Result<Document, RepositoryError> {
        let name = encrypt_field(&self.cipher, &doc.name)?;
        let schema = doc
            .redaction_schema
            .as_ref()
            .map(schema_to_json)
            .transpose()?;

        let result = sqlx::query(
            "INSERT INTO documents (user_id, name, redaction_schema) VALUES (?, ?, ?)",
        )
        .bind(doc.user_id)
        .bind(&name)
        .bind(&schema)
        .execute(&self.pool)
        .await
        .map_err(|e| storage("create document", &e))?;

        let id = result.last_insert_id() as i64;
        let row = self.fetch_by_id(id, "get document after insert").await?;

        tracing::debug!(document_id = id, user_id = doc.user_id, "created document");
        row_to_document(row, &self.cipher)
    }

    async fn get_by_id(&self, id: i64) -> Result<Document, RepositoryError> {
        let row = self.fetch_by_id(id, "get document").await?;
        row_to_document(row, &self.cipher)
    }

    async fn list_by_user(
        &self,
        user_id: i64,
        page: &PageRequest,
    ) -> Result<Paged<Document>, RepositoryError> {
        let (limit, offset) = sql_page(page);
        let query = format!(
            "SELECT {DOCUMENT_SELECT_COLUMNS} FROM documents
             WHERE user_id = ?
             ORDER BY uploaded_at DESC, id DESC
             LIMIT ? OFFSET ?"
        );
        let rows = sqlx::query_as::<_, DocumentRow>(&query)
            .bind(user_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| storage("list documents", &e))?;

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM documents WHERE user_id = ?")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| storage("count documents", &e))?;

        let items = rows
            .into_iter()
            .map(|row| row_to_document(row, &self.cipher))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Paged {
            items,
            total: count_to_total(count),
        })
    }

    async fn update(&self, doc: &Document) -> Result<(), RepositoryError> {
        let name = encrypt_field(&self.cipher, &doc.name)?;
        let schema = doc
            .redaction_schema
            .as_ref()
            .map(schema_to_json)
            .transpose()?;

        let result = sqlx::query(
            "UPDATE documents SET name = ?, redaction_schema = ?, last_modified = UTC_TIMESTAMP(6)
             WHERE id = ?",
        )
        .bind(&name)
        .bind(&schema)
        .bind(doc.id)
        .execute(&self.pool)
        .await
        .map_err(|e| storage("update document", &e))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(format!("document {}", doc.id)));
        }
        Ok(())
    }

    async fn delete(&self, id: i64) -> Result<(), RepositoryError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| storage("begin delete document", &e))?;

        sqlx::query("DELETE FROM detected_entities WHERE document_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(|e| storage("delete document entities", &e))?;

        let result = sqlx::query("DELETE FROM documents WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(|e| storage("delete document", &e))?;

        if result.rows_affected() == 0 {
            tx.rollback()
                .await
                .map_err(|e| storage("rollback delete document", &e))?;
            return Err(RepositoryError::NotFound(format!("document {id}")));
        }

        tx.commit()
            .await
            .map_err(|e| storage("commit delete document", &e))?;
        tracing::debug!(document_id = id, "deleted document and entities");
        Ok(())
    }

    async fn delete_by_user_id(&self, user_id: i64) -> Result<(), RepositoryError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| storage("begin delete user documents", &e))?;

        let ids: Vec<i64> = sqlx::query_scalar("SELECT id FROM documents WHERE user_id = ?")
            .bind(user_id)
            .fetch_all(&mut *tx)
            .await
            .map_err(|e| storage("list documents for delete", &e))?;

        for id in &ids {
            sqlx::query("DELETE FROM detected_entities WHERE document_id = ?")
                .bind(id)
                .execute(&mut *tx)
                .await
                .map_err(|e| storage("delete document entities", &e))?;
        }

        sqlx::query("DELETE FROM documents WHERE user_id = ?")
            .bind(user_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| storage("delete documents by user", &e))?;

        tx.commit()
            .await
            .map_err(|e| storage("commit delete user documents", &e))?;
        tracing::debug!(user_id, removed = ids.len(), "deleted user documents");
        Ok(())
    }

    async fn add_entity(
        &self,
        entity: &NewDetectedEntity,
    ) -> Result<DetectedEntity, RepositoryError> {
        let schema_json = schema_to_json(&entity.redaction_schema)?;
        let stored_schema = encrypt_field(&self.cipher, &schema_json)?;

        let result = sqlx::query(
            "INSERT INTO detected_entities (document_id, method_id, entity_name, redaction_schema)
             VALUES (?, ?, ?, ?)",
        )
        .bind(entity.document_id)
        .bind(entity.method_id)
        .bind(&entity.entity_name)
        .bind(&stored_schema)
        .execute(&self.pool)
        .await
        .map_err(|e| storage("add detected entity", &e))?;

        let id = result.last_insert_id() as i64;
        let query = format!(
            "SELECT {ENTITY_SELECT_COLUMNS}
             FROM detected_entities e
             JOIN detection_methods m ON m.id = e.method_id
             WHERE e.id = ?"
        );
        let row = sqlx::query_as::<_, DetectedEntityRow>(&query)
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| storage("get detected entity after insert", &e))?;

        row_to_entity(row, &self.cipher)
    }

    async fn entities_for_document(
        &self,
        document_id: i64,
    ) -> Result<Vec<DetectedEntity>, RepositoryError> {
        let query = format!(
            "SELECT {ENTITY_SELECT_COLUMNS}
             FROM detected_entities e
             JOIN detection_methods m ON m.id = e.method_id
             WHERE e.document_id = ?
             ORDER BY e.detected_at, e.id"
        );
        let rows = sqlx::query_as::<_, DetectedEntityRow>(&query)
            .bind(document_id)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| storage("list detected entities", &e))?;

        rows.into_iter()
            .map(|row| row_to_entity(row, &self.cipher))
            .collect()
    }

    async fn delete_entities_for_document(
        &self,
        document_id: i64,
    ) -> Result<(), RepositoryError> {
        sqlx::query("DELETE FROM detected_entities WHERE document_id = ?")
            .bind(document_id)
            .execute(&self.pool)
            .await
            .map_err(|e| storage("delete entities by document", &e))?;
        Ok(())
    }
}
