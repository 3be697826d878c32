#![doc = include_str!("../README.md")]
#![deny(unsafe_code)]

pub mod cipher;
pub mod classify;
pub mod config;
pub mod factory;
pub mod repositories;
pub mod setup;

// Re-export the composition surface for convenient access
pub use cipher::AesGcmCipher;
pub use config::{DatabaseConfig, Dialect};
pub use factory::{StoreFactory, StorePool};
pub use setup::{setup_mysql, setup_postgres};

// Re-export repository implementations
pub use repositories::{
    MySqlBanListRepository, MySqlDocumentRepository, MySqlIpBanRepository,
    MySqlModelEntityRepository, MySqlPatternRepository, MySqlResetTokenRepository,
    MySqlSessionRepository, MySqlUserRepository, PgBanListRepository, PgDocumentRepository,
    PgIpBanRepository, PgModelEntityRepository, PgPatternRepository, PgResetTokenRepository,
    PgSessionRepository, PgUserRepository,
};
