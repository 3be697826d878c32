//! MySQL implementation of the `IpBanRepository` trait.

use async_trait::async_trait;
use sqlx::MySqlPool;

use veil_core::RepositoryError;
use veil_core::domain::ip_ban::{IpBan, NewIpBan};
use veil_core::domain::pagination::{Paged, PageRequest};
use veil_core::ports::ip_ban_repository::IpBanRepository;

use super::row_mappers::{IP_BAN_SELECT_COLUMNS, IpBanRow, count_to_total, sql_page};
use crate::classify::storage;

/// MySQL implementation of the `IpBanRepository` trait.
///
/// Log lines carry ban ids, never the banned address itself.
pub struct MySqlIpBanRepository {
    pool: MySqlPool,
}

impl MySqlIpBanRepository {
    /// Create a new MySQL IP ban repository.
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl IpBanRepository for MySqlIpBanRepository {
    async fn create(&self, ban: &NewIpBan) -> Result<IpBan, RepositoryError> {
        let result = sqlx::query(
            "INSERT INTO ip_bans (ip_address, reason, expires_at, created_by)
             VALUES (?, ?, ?, ?)",
        )
        .bind(&ban.ip_address)
        .bind(&ban.reason)
        .bind(ban.expires_at)
        .bind(ban.created_by)
        .execute(&self.pool)
        .await
        .map_err(|e| storage("create ip ban", &e))?;

        let id = result.last_insert_id() as i64;
        let query = format!("SELECT {IP_BAN_SELECT_COLUMNS} FROM ip_bans WHERE id = ?");
        let row = sqlx::query_as::<_, IpBanRow>(&query)
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| storage("get ip ban after insert", &e))?;

        tracing::debug!(ban_id = id, created_by = ban.created_by, "created ip ban");
        Ok(row.into())
    }

    async fn get_active_by_ip(&self, ip_address: &str) -> Result<IpBan, RepositoryError> {
        let query = format!(
            "SELECT {IP_BAN_SELECT_COLUMNS} FROM ip_bans
             WHERE ip_address = ? AND (expires_at IS NULL OR expires_at > UTC_TIMESTAMP(6))
             ORDER BY created_at DESC, id DESC
             LIMIT 1"
        );
        sqlx::query_as::<_, IpBanRow>(&query)
            .bind(ip_address)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| storage("get active ip ban", &e))?
            .map(IpBan::from)
            .ok_or_else(|| RepositoryError::NotFound(format!("active ban for {ip_address}")))
    }

    async fn is_banned(&self, ip_address: &str) -> Result<bool, RepositoryError> {
        let exists: i64 = sqlx::query_scalar(
            "SELECT EXISTS (
                 SELECT 1 FROM ip_bans
                 WHERE ip_address = ? AND (expires_at IS NULL OR expires_at > UTC_TIMESTAMP(6))
             )",
        )
        .bind(ip_address)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| storage("probe ip ban", &e))?;
        Ok(exists != 0)
    }

    async fn list(&self, page: &PageRequest) -> Result<Paged<IpBan>, RepositoryError> {
        let (limit, offset) = sql_page(page);
        let query = format!(
            "SELECT {IP_BAN_SELECT_COLUMNS} FROM ip_bans
             ORDER BY created_at DESC, id DESC
             LIMIT ? OFFSET ?"
        );
        let rows = sqlx::query_as::<_, IpBanRow>(&query)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| storage("list ip bans", &e))?;

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM ip_bans")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| storage("count ip bans", &e))?;

        Ok(Paged {
            items: rows.into_iter().map(IpBan::from).collect(),
            total: count_to_total(count),
        })
    }

    async fn delete(&self, id: i64) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM ip_bans WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| storage("delete ip ban", &e))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(format!("ip ban {id}")));
        }
        tracing::debug!(ban_id = id, "deleted ip ban");
        Ok(())
    }

    async fn delete_expired(&self) -> Result<u64, RepositoryError> {
        let result = sqlx::query(
            "DELETE FROM ip_bans WHERE expires_at IS NOT NULL AND expires_at < UTC_TIMESTAMP(6)",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| storage("sweep expired ip bans", &e))?;

        let removed = result.rows_affected();
        if removed > 0 {
            tracing::debug!(removed, "swept expired ip bans");
        }
        Ok(removed)
    }
}
