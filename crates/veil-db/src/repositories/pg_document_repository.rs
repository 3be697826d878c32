//! PostgreSQL implementation of the `DocumentRepository` trait.

use std::sync::Arc;

use async_trait::async_trait;
use sqlx::PgPool;

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

/// PostgreSQL implementation of the `DocumentRepository` trait.
///
/// Document names and detected-entity redaction schemas pass through the
/// injected cipher on every write and read.
pub struct PgDocumentRepository {
    pool: PgPool,
    cipher: Arc<dyn FieldCipher>,
}

impl PgDocumentRepository {
    /// Create a new PostgreSQL document repository.
    pub fn new(pool: PgPool, cipher: Arc<dyn FieldCipher>) -> Self {
        Self { pool, cipher }
    }
}

#[async_trait]
impl DocumentRepository for PgDocumentRepository {
    async fn create(&self, doc: &NewDocument) -> Result<Document, RepositoryError> {
        let name = encrypt_field(&self.cipher, &doc.name)?;
        let schema = doc
            .redaction_schema
            .as_ref()
            .map(schema_to_json)
            .transpose()?;

        let query = format!(
            "INSERT INTO documents (user_id, name, redaction_schema)
             VALUES ($1, $2, $3)
             RETURNING {DOCUMENT_SELECT_COLUMNS}"
        );
        let row = sqlx::query_as::<_, DocumentRow>(&query)
            .bind(doc.user_id)
            .bind(&name)
            .bind(&schema)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| storage("create document", &e))?;

        tracing::debug!(document_id = row.id, user_id = doc.user_id, "created document");
        row_to_document(row, &self.cipher)
    }

    async fn get_by_id(&self, id: i64) -> Result<Document, RepositoryError> {
        let query = format!("SELECT {DOCUMENT_SELECT_COLUMNS} FROM documents WHERE id = $1");
        let row = sqlx::query_as::<_, DocumentRow>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| storage("get document", &e))?
            .ok_or_else(|| RepositoryError::NotFound(format!("document {id}")))?;
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
             WHERE user_id = $1
             ORDER BY uploaded_at DESC, id DESC
             LIMIT $2 OFFSET $3"
        );
        let rows = sqlx::query_as::<_, DocumentRow>(&query)
            .bind(user_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| storage("list documents", &e))?;

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM documents WHERE user_id = $1")
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
            "UPDATE documents SET name = $1, redaction_schema = $2, last_modified = now()
             WHERE id = $3",
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

        sqlx::query("DELETE FROM detected_entities WHERE document_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(|e| storage("delete document entities", &e))?;

        let result = sqlx::query("DELETE FROM documents WHERE id = $1")
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

        let ids: Vec<i64> = sqlx::query_scalar("SELECT id FROM documents WHERE user_id = $1")
            .bind(user_id)
            .fetch_all(&mut *tx)
            .await
            .map_err(|e| storage("list documents for delete", &e))?;

        for id in &ids {
            sqlx::query("DELETE FROM detected_entities WHERE document_id = $1")
                .bind(id)
                .execute(&mut *tx)
                .await
                .map_err(|e| storage("delete document entities", &e))?;
        }

        sqlx::query("DELETE FROM documents WHERE user_id = $1")
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

        let id: i64 = sqlx::query_scalar(
            "INSERT INTO detected_entities (document_id, method_id, entity_name, redaction_schema)
             VALUES ($1, $2, $3, $4)
             RETURNING id",
        )
        .bind(entity.document_id)
        .bind(entity.method_id)
        .bind(&entity.entity_name)
        .bind(&stored_schema)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| storage("add detected entity", &e))?;

        let query = format!(
            "SELECT {ENTITY_SELECT_COLUMNS}
             FROM detected_entities e
             JOIN detection_methods m ON m.id = e.method_id
             WHERE e.id = $1"
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
             WHERE e.document_id = $1
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
        sqlx::query("DELETE FROM detected_entities WHERE document_id = $1")
            .bind(document_id)
            .execute(&self.pool)
            .await
            .map_err(|e| storage("delete entities by document", &e))?;
        Ok(())
    }
}
