//! Model entity types.

use serde::{Deserialize, Serialize};

/// An entity a detection model learned for a settings profile.
///
/// Unique on `(setting_id, method_id, entity_text)`; re-adding the same text
/// for the same method surfaces as a duplicate error rather than a second
/// row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelEntity {
    pub id: i64,
    pub setting_id: i64,
    pub method_id: i64,
    pub entity_text: String,
    /// Joined from `detection_methods` for display; `None` when the method
    /// row is gone.
    pub method_name: Option<String>,
}

/// Data for creating a new model entity.
#[derive(Debug, Clone)]
pub struct NewModelEntity {
    pub setting_id: i64,
    pub method_id: i64,
    pub entity_text: String,
}
