//! Document and detected-entity types.
//!
//! Documents carry a name and an optional redaction schema; detected entities
//! record what a detection method found inside a document. Names and entity
//! schemas are plaintext in the domain model and AES-encrypted at rest by the
//! repository adapters.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A document uploaded by a user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    pub uploaded_at: DateTime<Utc>,
    pub last_modified: DateTime<Utc>,
    /// Redaction choices for the whole document, if any have been saved.
    pub redaction_schema: Option<serde_json::Value>,
}

/// Data for creating a new document.
#[derive(Debug, Clone)]
pub struct NewDocument {
    pub user_id: i64,
    pub name: String,
    pub redaction_schema: Option<serde_json::Value>,
}

/// An entity found in a document by a detection method.
///
/// `method_name` and `highlight_color` are joined in from the
/// `detection_methods` lookup table for display; this layer never writes
/// that table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectedEntity {
    pub id: i64,
    pub document_id: i64,
    pub method_id: i64,
    pub entity_name: String,
    pub redaction_schema: serde_json::Value,
    pub detected_at: DateTime<Utc>,
    pub method_name: String,
    pub highlight_color: String,
}

/// Data for recording a newly detected entity.
#[derive(Debug, Clone)]
pub struct NewDetectedEntity {
    pub document_id: i64,
    pub method_id: i64,
    pub entity_name: String,
    pub redaction_schema: serde_json::Value,
}
