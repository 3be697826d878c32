//! Row types and conversions shared by the PostgreSQL and MySQL adapters.
//!
//! Both drivers decode the same column shapes, so each entity gets one
//! `FromRow` struct here plus a conversion into its domain type. Conversions
//! that touch the field cipher or stored JSON are fallible and translate
//! their failures into the domain error taxonomy.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use veil_core::domain::document::{DetectedEntity, Document};
use veil_core::domain::pagination::PageRequest;
use veil_core::domain::pattern::{PatternType, SearchPattern};
use veil_core::ports::field_cipher::FieldCipher;
use veil_core::{BanList, IpBan, ModelEntity, RepositoryError, ResetToken, Session, User};

// ─────────────────────────────────────────────────────────────────────────────
// Shared SELECT column lists
// ─────────────────────────────────────────────────────────────────────────────

pub const USER_SELECT_COLUMNS: &str =
    "id, username, email, password_hash, salt, created_at, updated_at";

pub const SESSION_SELECT_COLUMNS: &str = "id, user_id, jwt_id, expires_at, created_at";

pub const DOCUMENT_SELECT_COLUMNS: &str =
    "id, user_id, name, uploaded_at, last_modified, redaction_schema";

/// Detected-entity columns; queries alias `detected_entities` as `e` and
/// `detection_methods` as `m`.
pub const ENTITY_SELECT_COLUMNS: &str = "e.id, e.document_id, e.method_id, e.entity_name, \
     e.redaction_schema, e.detected_at, m.method_name, m.highlight_color";

pub const PATTERN_SELECT_COLUMNS: &str = "id, setting_id, pattern_type, pattern_text";

/// Model-entity columns; queries alias `model_entities` as `e` and LEFT JOIN
/// `detection_methods` as `m`.
pub const MODEL_ENTITY_SELECT_COLUMNS: &str =
    "e.id, e.setting_id, e.method_id, e.entity_text, m.method_name";

pub const IP_BAN_SELECT_COLUMNS: &str =
    "id, ip_address, reason, expires_at, created_at, created_by";

pub const RESET_TOKEN_SELECT_COLUMNS: &str = "token_hash, user_id, expires_at, created_at";

// ─────────────────────────────────────────────────────────────────────────────
// Row types
// ─────────────────────────────────────────────────────────────────────────────

#[derive(sqlx::FromRow)]
pub struct UserRow {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub salt: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        Self {
            id: row.id,
            username: row.username,
            email: row.email,
            password_hash: row.password_hash,
            salt: row.salt,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
pub struct SessionRow {
    pub id: String,
    pub user_id: i64,
    pub jwt_id: String,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl From<SessionRow> for Session {
    fn from(row: SessionRow) -> Self {
        Self {
            id: row.id,
            user_id: row.user_id,
            jwt_id: row.jwt_id,
            expires_at: row.expires_at,
            created_at: row.created_at,
        }
    }
}

/// Raw document row; `name` is ciphertext, `redaction_schema` JSON text.
#[derive(sqlx::FromRow)]
pub struct DocumentRow {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    pub uploaded_at: DateTime<Utc>,
    pub last_modified: DateTime<Utc>,
    pub redaction_schema: Option<String>,
}

/// Raw detected-entity row; `redaction_schema` is ciphertext.
#[derive(sqlx::FromRow)]
pub struct DetectedEntityRow {
    pub id: i64,
    pub document_id: i64,
    pub method_id: i64,
    pub entity_name: String,
    pub redaction_schema: String,
    pub detected_at: DateTime<Utc>,
    pub method_name: String,
    pub highlight_color: String,
}

#[derive(sqlx::FromRow)]
pub struct BanListRow {
    pub id: i64,
    pub setting_id: i64,
}

impl From<BanListRow> for BanList {
    fn from(row: BanListRow) -> Self {
        Self {
            id: row.id,
            setting_id: row.setting_id,
        }
    }
}

#[derive(sqlx::FromRow)]
pub struct SearchPatternRow {
    pub id: i64,
    pub setting_id: i64,
    pub pattern_type: String,
    pub pattern_text: String,
}

#[derive(sqlx::FromRow)]
pub struct ModelEntityRow {
    pub id: i64,
    pub setting_id: i64,
    pub method_id: i64,
    pub entity_text: String,
    pub method_name: Option<String>,
}

impl From<ModelEntityRow> for ModelEntity {
    fn from(row: ModelEntityRow) -> Self {
        Self {
            id: row.id,
            setting_id: row.setting_id,
            method_id: row.method_id,
            entity_text: row.entity_text,
            method_name: row.method_name,
        }
    }
}

#[derive(sqlx::FromRow)]
pub struct IpBanRow {
    pub id: i64,
    pub ip_address: String,
    pub reason: String,
    pub expires_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub created_by: i64,
}

impl From<IpBanRow> for IpBan {
    fn from(row: IpBanRow) -> Self {
        Self {
            id: row.id,
            ip_address: row.ip_address,
            reason: row.reason,
            expires_at: row.expires_at,
            created_at: row.created_at,
            created_by: row.created_by,
        }
    }
}

#[derive(sqlx::FromRow)]
pub struct ResetTokenRow {
    pub token_hash: String,
    pub user_id: i64,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl From<ResetTokenRow> for ResetToken {
    fn from(row: ResetTokenRow) -> Self {
        Self {
            token_hash: row.token_hash,
            user_id: row.user_id,
            expires_at: row.expires_at,
            created_at: row.created_at,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Fallible conversions and field helpers
// ─────────────────────────────────────────────────────────────────────────────

/// Decrypt a document row into its domain type.
pub fn row_to_document(
    row: DocumentRow,
    cipher: &Arc<dyn FieldCipher>,
) -> Result<Document, RepositoryError> {
    let name = cipher
        .decrypt(&row.name)
        .map_err(|e| RepositoryError::Cipher(e.to_string()))?;
    let redaction_schema = row
        .redaction_schema
        .map(|raw| {
            serde_json::from_str(&raw).map_err(|e| RepositoryError::Serialization(e.to_string()))
        })
        .transpose()?;

    Ok(Document {
        id: row.id,
        user_id: row.user_id,
        name,
        uploaded_at: row.uploaded_at,
        last_modified: row.last_modified,
        redaction_schema,
    })
}

/// Decrypt a detected-entity row into its domain type.
pub fn row_to_entity(
    row: DetectedEntityRow,
    cipher: &Arc<dyn FieldCipher>,
) -> Result<DetectedEntity, RepositoryError> {
    let schema_json = cipher
        .decrypt(&row.redaction_schema)
        .map_err(|e| RepositoryError::Cipher(e.to_string()))?;
    let redaction_schema = serde_json::from_str(&schema_json)
        .map_err(|e| RepositoryError::Serialization(e.to_string()))?;

    Ok(DetectedEntity {
        id: row.id,
        document_id: row.document_id,
        method_id: row.method_id,
        entity_name: row.entity_name,
        redaction_schema,
        detected_at: row.detected_at,
        method_name: row.method_name,
        highlight_color: row.highlight_color,
    })
}

/// Parse a stored pattern row. The column is CHECK-constrained, so an
/// unknown value means corrupted data, reported as a serialization failure.
pub fn row_to_pattern(row: SearchPatternRow) -> Result<SearchPattern, RepositoryError> {
    let pattern_type = PatternType::parse(&row.pattern_type).ok_or_else(|| {
        RepositoryError::Serialization(format!("unknown pattern type '{}'", row.pattern_type))
    })?;
    Ok(SearchPattern {
        id: row.id,
        setting_id: row.setting_id,
        pattern_type,
        pattern_text: row.pattern_text,
    })
}

/// Encrypt a field value, mapping failures into the domain error.
pub fn encrypt_field(
    cipher: &Arc<dyn FieldCipher>,
    plaintext: &str,
) -> Result<String, RepositoryError> {
    cipher
        .encrypt(plaintext)
        .map_err(|e| RepositoryError::Cipher(e.to_string()))
}

/// Serialize a redaction schema for storage.
pub fn schema_to_json(schema: &serde_json::Value) -> Result<String, RepositoryError> {
    serde_json::to_string(schema).map_err(|e| RepositoryError::Serialization(e.to_string()))
}

/// LIMIT/OFFSET binds for a page request, clamped into the signed range the
/// drivers expect.
#[must_use]
pub fn sql_page(page: &PageRequest) -> (i64, i64) {
    let limit = i64::try_from(page.limit()).unwrap_or(i64::MAX);
    let offset = i64::try_from(page.offset()).unwrap_or(i64::MAX);
    (limit, offset)
}

/// A non-negative COUNT(*) as u64.
#[must_use]
pub fn count_to_total(count: i64) -> u64 {
    u64::try_from(count).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use veil_core::NoopCipher;

    fn noop() -> Arc<dyn FieldCipher> {
        Arc::new(NoopCipher)
    }

    #[test]
    fn document_row_parses_schema_json() {
        let row = DocumentRow {
            id: 3,
            user_id: 9,
            name: "report.pdf".to_string(),
            uploaded_at: Utc::now(),
            last_modified: Utc::now(),
            redaction_schema: Some(r#"{"fields":["ssn"]}"#.to_string()),
        };
        let doc = row_to_document(row, &noop()).unwrap();
        assert_eq!(doc.name, "report.pdf");
        assert_eq!(doc.redaction_schema.unwrap()["fields"][0], "ssn");
    }

    #[test]
    fn document_row_with_bad_schema_is_a_serialization_error() {
        let row = DocumentRow {
            id: 3,
            user_id: 9,
            name: "report.pdf".to_string(),
            uploaded_at: Utc::now(),
            last_modified: Utc::now(),
            redaction_schema: Some("{not json".to_string()),
        };
        assert!(matches!(
            row_to_document(row, &noop()),
            Err(RepositoryError::Serialization(_))
        ));
    }

    #[test]
    fn pattern_row_with_unknown_type_is_a_serialization_error() {
        let row = SearchPatternRow {
            id: 1,
            setting_id: 2,
            pattern_type: "glob".to_string(),
            pattern_text: "x".to_string(),
        };
        assert!(matches!(
            row_to_pattern(row),
            Err(RepositoryError::Serialization(_))
        ));
    }

    #[test]
    fn sql_page_clamps_into_signed_range() {
        let page = PageRequest::new(u64::MAX, PageRequest::MAX_PAGE_SIZE);
        let (limit, offset) = sql_page(&page);
        assert_eq!(limit, 100);
        assert_eq!(offset, i64::MAX);
    }
}
