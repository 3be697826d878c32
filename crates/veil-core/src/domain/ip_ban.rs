//! IP ban types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A ban on a source IP address.
///
/// `expires_at = None` is a permanent ban. A ban is active while it has no
/// expiry or its expiry lies in the future; expired rows linger until a
/// `delete_expired` sweep removes them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IpBan {
    pub id: i64,
    pub ip_address: String,
    pub reason: String,
    pub expires_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    /// Id of the administrator who placed the ban.
    pub created_by: i64,
}

/// Data for creating a new IP ban.
#[derive(Debug, Clone)]
pub struct NewIpBan {
    pub ip_address: String,
    pub reason: String,
    pub expires_at: Option<DateTime<Utc>>,
    pub created_by: i64,
}
