//! Composition utilities for building repository sets over PostgreSQL or
//! MySQL.
//!
//! This module is focused purely on construction: opening pools, applying
//! the schema, selecting the field cipher, and wiring repositories into a
//! `Repos`. It should not contain any domain logic.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use sqlx::mysql::MySqlPoolOptions;
use sqlx::postgres::PgPoolOptions;
use sqlx::{MySqlPool, PgPool};

use veil_core::ports::field_cipher::FieldCipher;
use veil_core::{NoopCipher, Repos};

use crate::cipher::AesGcmCipher;
use crate::config::{DatabaseConfig, Dialect};
use crate::repositories::{
    MySqlBanListRepository, MySqlDocumentRepository, MySqlIpBanRepository,
    MySqlModelEntityRepository, MySqlPatternRepository, MySqlResetTokenRepository,
    MySqlSessionRepository, MySqlUserRepository, PgBanListRepository, PgDocumentRepository,
    PgIpBanRepository, PgModelEntityRepository, PgPatternRepository, PgResetTokenRepository,
    PgSessionRepository, PgUserRepository,
};
use crate::setup::{setup_mysql, setup_postgres};

/// The pool a [`StoreFactory::connect`] call opened, handed back alongside
/// the repositories so callers can close it or run ad-hoc queries in tests.
pub enum StorePool {
    Postgres(PgPool),
    MySql(MySqlPool),
}

/// Factory for creating repository instances over PostgreSQL or MySQL.
///
/// This struct provides composition utilities only, no domain logic.
pub struct StoreFactory;

impl StoreFactory {
    /// Create a PostgreSQL connection pool from configuration.
    pub async fn create_pg_pool(config: &DatabaseConfig) -> anyhow::Result<PgPool> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
            .connect(&config.url)
            .await
            .context("connecting to PostgreSQL")?;
        Ok(pool)
    }

    /// Create a MySQL connection pool from configuration.
    pub async fn create_mysql_pool(config: &DatabaseConfig) -> anyhow::Result<MySqlPool> {
        let pool = MySqlPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
            .connect(&config.url)
            .await
            .context("connecting to MySQL")?;
        Ok(pool)
    }

    /// Build all PostgreSQL repositories from a pool and field cipher.
    ///
    /// Returns a `Repos` struct from `veil-core` containing
    /// trait-object-wrapped repositories.
    pub fn pg_repos(pool: PgPool, cipher: Arc<dyn FieldCipher>) -> Repos {
        Repos {
            users: Arc::new(PgUserRepository::new(pool.clone())),
            sessions: Arc::new(PgSessionRepository::new(pool.clone())),
            documents: Arc::new(PgDocumentRepository::new(pool.clone(), cipher)),
            ban_lists: Arc::new(PgBanListRepository::new(pool.clone())),
            patterns: Arc::new(PgPatternRepository::new(pool.clone())),
            model_entities: Arc::new(PgModelEntityRepository::new(pool.clone())),
            ip_bans: Arc::new(PgIpBanRepository::new(pool.clone())),
            reset_tokens: Arc::new(PgResetTokenRepository::new(pool)),
        }
    }

    /// Build all MySQL repositories from a pool and field cipher.
    pub fn mysql_repos(pool: MySqlPool, cipher: Arc<dyn FieldCipher>) -> Repos {
        Repos {
            users: Arc::new(MySqlUserRepository::new(pool.clone())),
            sessions: Arc::new(MySqlSessionRepository::new(pool.clone())),
            documents: Arc::new(MySqlDocumentRepository::new(pool.clone(), cipher)),
            ban_lists: Arc::new(MySqlBanListRepository::new(pool.clone())),
            patterns: Arc::new(MySqlPatternRepository::new(pool.clone())),
            model_entities: Arc::new(MySqlModelEntityRepository::new(pool.clone())),
            ip_bans: Arc::new(MySqlIpBanRepository::new(pool.clone())),
            reset_tokens: Arc::new(MySqlResetTokenRepository::new(pool)),
        }
    }

    /// Connect to the configured database, apply the schema, and build the
    /// full repository set.
    ///
    /// The dialect is chosen from the URL scheme. When the configuration
    /// carries an encryption key, document names and detected-entity schemas
    /// are stored AES-256-GCM encrypted; without one they are stored as
    /// given.
    ///
    /// # Example
    ///
    /// ```ignore
    /// use veil_db::{DatabaseConfig, StoreFactory};
    ///
    /// let config = DatabaseConfig::from_env()?;
    /// let (repos, _pool) = StoreFactory::connect(&config).await?;
    /// let user = repos.users.get_by_id(1).await?;
    /// ```
    pub async fn connect(config: &DatabaseConfig) -> anyhow::Result<(Repos, StorePool)> {
        let cipher = cipher_from_config(config)?;
        match Dialect::from_url(&config.url)? {
            Dialect::Postgres => {
                let pool = Self::create_pg_pool(config).await?;
                setup_postgres(&pool).await?;
                Ok((
                    Self::pg_repos(pool.clone(), cipher),
                    StorePool::Postgres(pool),
                ))
            }
            Dialect::MySql => {
                let pool = Self::create_mysql_pool(config).await?;
                setup_mysql(&pool).await?;
                Ok((
                    Self::mysql_repos(pool.clone(), cipher),
                    StorePool::MySql(pool),
                ))
            }
        }
    }
}

fn cipher_from_config(config: &DatabaseConfig) -> anyhow::Result<Arc<dyn FieldCipher>> {
    match &config.encryption_key {
        Some(key) => {
            let cipher = AesGcmCipher::from_base64(key).context("loading field encryption key")?;
            Ok(Arc::new(cipher))
        }
        None => {
            tracing::warn!("no encryption key configured, storing document fields as plaintext");
            Ok(Arc::new(NoopCipher))
        }
    }
}
