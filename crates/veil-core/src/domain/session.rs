//! Authentication session types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An authenticated session bound to a JWT.
///
/// A session is valid while its `jwt_id` row exists and `expires_at` lies in
/// the future; logout deletes the row, so presence doubles as a revocation
/// check.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    /// Caller-supplied identifier (uuid-shaped string).
    pub id: String,
    pub user_id: i64,
    pub jwt_id: String,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

/// Data for creating a new session. `created_at` is assigned by the store.
#[derive(Debug, Clone)]
pub struct NewSession {
    pub id: String,
    pub user_id: i64,
    pub jwt_id: String,
    pub expires_at: DateTime<Utc>,
}
