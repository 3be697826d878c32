//! IP ban repository port definition.

use async_trait::async_trait;

use super::RepositoryError;
use crate::domain::ip_ban::{IpBan, NewIpBan};
use crate::domain::pagination::{Paged, PageRequest};

/// Port for IP ban persistence.
///
/// A ban is active while `expires_at` is `NULL` (permanent) or lies in the
/// future. Multiple bans may exist for one address; probes consider the set.
#[async_trait]
pub trait IpBanRepository: Send + Sync {
    /// Record a new ban and return it with generated id and timestamp.
    async fn create(&self, ban: &NewIpBan) -> Result<IpBan, RepositoryError>;

    /// The most recent active ban for an address. `NotFound` when the
    /// address has no active ban.
    async fn get_active_by_ip(&self, ip_address: &str) -> Result<IpBan, RepositoryError>;

    /// Whether an address has any active ban.
    async fn is_banned(&self, ip_address: &str) -> Result<bool, RepositoryError>;

    /// Page through all bans, newest first, with the total count.
    async fn list(&self, page: &PageRequest) -> Result<Paged<IpBan>, RepositoryError>;

    /// Delete a ban by id. `NotFound` when no such ban exists.
    async fn delete(&self, id: i64) -> Result<(), RepositoryError>;

    /// Remove bans whose expiry lies strictly in the past. Permanent bans
    /// (`expires_at IS NULL`) are never removed. Returns the number of rows
    /// removed.
    async fn delete_expired(&self) -> Result<u64, RepositoryError>;
}
