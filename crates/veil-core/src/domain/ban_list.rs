//! Ban list types.

use serde::{Deserialize, Serialize};

/// A per-setting list of words excluded from detection.
///
/// Each settings profile owns at most one ban list. Words are child rows
/// keyed `(ban_list_id, word)` and surface as plain strings through the
/// repository; they have no struct of their own.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BanList {
    pub id: i64,
    pub setting_id: i64,
}
