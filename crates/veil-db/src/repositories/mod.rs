//! Repository implementations for PostgreSQL and MySQL.
//!
//! These implementations encapsulate all SQL queries and database access.
//! The sqlx pool types are confined to this crate and never exposed through
//! the port trait signatures. Each entity has one file per backend; the two
//! differ only in placeholders, generated-id retrieval, upsert syntax, and
//! the database clock function.

mod mysql_ban_list_repository;
mod mysql_document_repository;
mod mysql_ip_ban_repository;
mod mysql_model_entity_repository;
mod mysql_pattern_repository;
mod mysql_reset_token_repository;
mod mysql_session_repository;
mod mysql_user_repository;
mod pg_ban_list_repository;
mod pg_document_repository;
mod pg_ip_ban_repository;
mod pg_model_entity_repository;
mod pg_pattern_repository;
mod pg_reset_token_repository;
mod pg_session_repository;
mod pg_user_repository;
mod row_mappers;

pub use mysql_ban_list_repository::MySqlBanListRepository;
pub use mysql_document_repository::MySqlDocumentRepository;
pub use mysql_ip_ban_repository::MySqlIpBanRepository;
pub use mysql_model_entity_repository::MySqlModelEntityRepository;
pub use mysql_pattern_repository::MySqlPatternRepository;
pub use mysql_reset_token_repository::MySqlResetTokenRepository;
pub use mysql_session_repository::MySqlSessionRepository;
pub use mysql_user_repository::MySqlUserRepository;
pub use pg_ban_list_repository::PgBanListRepository;
pub use pg_document_repository::PgDocumentRepository;
pub use pg_ip_ban_repository::PgIpBanRepository;
pub use pg_model_entity_repository::PgModelEntityRepository;
pub use pg_pattern_repository::PgPatternRepository;
pub use pg_reset_token_repository::PgResetTokenRepository;
pub use pg_session_repository::PgSessionRepository;
pub use pg_user_repository::PgUserRepository;
