//! Database setup and initialization.
//!
//! This module provides idempotent schema creation for both supported
//! backends. Entry points call `setup_postgres` / `setup_mysql` (directly or
//! through `StoreFactory::connect`) with an already-connected pool.
//!
//! Unique constraints carry stable names (`uq_users_username`, ...) because
//! error classification maps those names back to domain fields. Foreign keys
//! are plain integrity guards: cascading deletes are issued explicitly by the
//! repositories, never delegated to `ON DELETE CASCADE`.

use anyhow::Result;
use sqlx::{MySqlPool, PgPool};

/// Creates the complete PostgreSQL schema.
///
/// Safe to call repeatedly; every statement uses IF NOT EXISTS. Username and
/// email uniqueness is case-insensitive via unique indexes over `lower()`,
/// which the lookup queries match.
pub async fn setup_postgres(pool: &PgPool) -> Result<()> {
    // Create the users table
    sqlx::query(
        r"
        CREATE TABLE IF NOT EXISTS users (
            id BIGSERIAL PRIMARY KEY,
            username TEXT NOT NULL,
            email TEXT NOT NULL,
            password_hash TEXT NOT NULL,
            salt TEXT NOT NULL,
            created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
            updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
        )
        ",
    )
    .execute(pool)
    .await?;

    // Case-insensitive uniqueness for usernames and emails
    sqlx::query("CREATE UNIQUE INDEX IF NOT EXISTS uq_users_username ON users (lower(username))")
        .execute(pool)
        .await?;
    sqlx::query("CREATE UNIQUE INDEX IF NOT EXISTS uq_users_email ON users (lower(email))")
        .execute(pool)
        .await?;

    // Create the sessions table
    sqlx::query(
        r"
        CREATE TABLE IF NOT EXISTS sessions (
            id TEXT PRIMARY KEY,
            user_id BIGINT NOT NULL REFERENCES users(id),
            jwt_id TEXT NOT NULL,
            expires_at TIMESTAMPTZ NOT NULL,
            created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
            CONSTRAINT uq_sessions_jwt_id UNIQUE (jwt_id)
        )
        ",
    )
    .execute(pool)
    .await?;
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_sessions_user ON sessions (user_id)")
        .execute(pool)
        .await?;

    // Create the detection methods lookup table. Rows are owned and seeded
    // by the detection service; this layer only joins against it.
    sqlx::query(
        r"
        CREATE TABLE IF NOT EXISTS detection_methods (
            id BIGSERIAL PRIMARY KEY,
            method_name TEXT NOT NULL,
            highlight_color TEXT NOT NULL
        )
        ",
    )
    .execute(pool)
    .await?;

    // Create the documents table (name is stored encrypted, redaction_schema
    // as JSON text)
    sqlx::query(
        r"
        CREATE TABLE IF NOT EXISTS documents (
            id BIGSERIAL PRIMARY KEY,
            user_id BIGINT NOT NULL REFERENCES users(id),
            name TEXT NOT NULL,
            uploaded_at TIMESTAMPTZ NOT NULL DEFAULT now(),
            last_modified TIMESTAMPTZ NOT NULL DEFAULT now(),
            redaction_schema TEXT
        )
        ",
    )
    .execute(pool)
    .await?;
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_documents_user ON documents (user_id)")
        .execute(pool)
        .await?;

    // Create the detected entities table
    sqlx::query(
        r"
        CREATE TABLE IF NOT EXISTS detected_entities (
            id BIGSERIAL PRIMARY KEY,
            document_id BIGINT NOT NULL REFERENCES documents(id),
            method_id BIGINT NOT NULL REFERENCES detection_methods(id),
            entity_name TEXT NOT NULL,
            redaction_schema TEXT NOT NULL,
            detected_at TIMESTAMPTZ NOT NULL DEFAULT now()
        )
        ",
    )
    .execute(pool)
    .await?;
    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_detected_entities_document
         ON detected_entities (document_id)",
    )
    .execute(pool)
    .await?;

    // Create the ban lists table (one per settings profile)
    sqlx::query(
        r"
        CREATE TABLE IF NOT EXISTS ban_lists (
            id BIGSERIAL PRIMARY KEY,
            setting_id BIGINT NOT NULL,
            CONSTRAINT uq_ban_lists_setting_id UNIQUE (setting_id)
        )
        ",
    )
    .execute(pool)
    .await?;

    // Create the ban list words table
    sqlx::query(
        r"
        CREATE TABLE IF NOT EXISTS ban_list_words (
            ban_list_id BIGINT NOT NULL REFERENCES ban_lists(id),
            word TEXT NOT NULL,
            PRIMARY KEY (ban_list_id, word)
        )
        ",
    )
    .execute(pool)
    .await?;

    // Create the search patterns table
    sqlx::query(
        r"
        CREATE TABLE IF NOT EXISTS search_patterns (
            id BIGSERIAL PRIMARY KEY,
            setting_id BIGINT NOT NULL,
            pattern_type TEXT NOT NULL
                CHECK (pattern_type IN ('exact', 'partial', 'regex')),
            pattern_text TEXT NOT NULL
        )
        ",
    )
    .execute(pool)
    .await?;
    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_search_patterns_setting
         ON search_patterns (setting_id)",
    )
    .execute(pool)
    .await?;

    // Create the model entities table
    sqlx::query(
        r"
        CREATE TABLE IF NOT EXISTS model_entities (
            id BIGSERIAL PRIMARY KEY,
            setting_id BIGINT NOT NULL,
            method_id BIGINT NOT NULL REFERENCES detection_methods(id),
            entity_text TEXT NOT NULL,
            CONSTRAINT uq_model_entities_entity
                UNIQUE (setting_id, method_id, entity_text)
        )
        ",
    )
    .execute(pool)
    .await?;

    // Create the IP bans table. created_by carries the administrator's user
    // id without a foreign key so bans survive account deletion.
    sqlx::query(
        r"
        CREATE TABLE IF NOT EXISTS ip_bans (
            id BIGSERIAL PRIMARY KEY,
            ip_address TEXT NOT NULL,
            reason TEXT NOT NULL,
            expires_at TIMESTAMPTZ,
            created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
            created_by BIGINT NOT NULL
        )
        ",
    )
    .execute(pool)
    .await?;
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_ip_bans_address ON ip_bans (ip_address)")
        .execute(pool)
        .await?;

    // Create the password reset tokens table (digest-keyed)
    sqlx::query(
        r"
        CREATE TABLE IF NOT EXISTS password_reset_tokens (
            token_hash TEXT PRIMARY KEY,
            user_id BIGINT NOT NULL REFERENCES users(id),
            expires_at TIMESTAMPTZ NOT NULL,
            created_at TIMESTAMPTZ NOT NULL DEFAULT now()
        )
        ",
    )
    .execute(pool)
    .await?;
    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_reset_tokens_user ON password_reset_tokens (user_id)",
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// Creates the complete MySQL schema.
///
/// Safe to call repeatedly. Tables default to the binary collation so string
/// comparisons match PostgreSQL's case-sensitive TEXT; `username` and
/// `email` override to a case-insensitive collation, which makes their
/// unique keys and lookups fold case. Timestamps are DATETIME(6) in UTC
/// (sqlx pins the session time zone to +00:00).
pub async fn setup_mysql(pool: &MySqlPool) -> Result<()> {
    // Create the users table
    sqlx::query(
        r"
        CREATE TABLE IF NOT EXISTS users (
            id BIGINT AUTO_INCREMENT PRIMARY KEY,
            username VARCHAR(255) COLLATE utf8mb4_general_ci NOT NULL,
            email VARCHAR(255) COLLATE utf8mb4_general_ci NOT NULL,
            password_hash TEXT NOT NULL,
            salt TEXT NOT NULL,
            created_at DATETIME(6) NOT NULL DEFAULT CURRENT_TIMESTAMP(6),
            updated_at DATETIME(6) NOT NULL DEFAULT CURRENT_TIMESTAMP(6),
            UNIQUE KEY uq_users_username (username),
            UNIQUE KEY uq_users_email (email)
        ) ENGINE=InnoDB DEFAULT CHARSET=utf8mb4 COLLATE=utf8mb4_bin
        ",
    )
    .execute(pool)
    .await?;

    // Create the sessions table
    sqlx::query(
        r"
        CREATE TABLE IF NOT EXISTS sessions (
            id VARCHAR(64) PRIMARY KEY,
            user_id BIGINT NOT NULL,
            jwt_id VARCHAR(255) NOT NULL,
            expires_at DATETIME(6) NOT NULL,
            created_at DATETIME(6) NOT NULL DEFAULT CURRENT_TIMESTAMP(6),
            UNIQUE KEY uq_sessions_jwt_id (jwt_id),
            KEY idx_sessions_user (user_id),
            CONSTRAINT fk_sessions_user FOREIGN KEY (user_id) REFERENCES users (id)
        ) ENGINE=InnoDB DEFAULT CHARSET=utf8mb4 COLLATE=utf8mb4_bin
        ",
    )
    .execute(pool)
    .await?;

    // Create the detection methods lookup table. Rows are owned and seeded
    // by the detection service; this layer only joins against it.
    sqlx::query(
        r"
        CREATE TABLE IF NOT EXISTS detection_methods (
            id BIGINT AUTO_INCREMENT PRIMARY KEY,
            method_name VARCHAR(255) NOT NULL,
            highlight_color VARCHAR(32) NOT NULL
        ) ENGINE=InnoDB DEFAULT CHARSET=utf8mb4 COLLATE=utf8mb4_bin
        ",
    )
    .execute(pool)
    .await?;

    // Create the documents table (name is stored encrypted, redaction_schema
    // as JSON text)
    sqlx::query(
        r"
        CREATE TABLE IF NOT EXISTS documents (
            id BIGINT AUTO_INCREMENT PRIMARY KEY,
            user_id BIGINT NOT NULL,
            name TEXT NOT NULL,
            uploaded_at DATETIME(6) NOT NULL DEFAULT CURRENT_TIMESTAMP(6),
            last_modified DATETIME(6) NOT NULL DEFAULT CURRENT_TIMESTAMP(6),
            redaction_schema TEXT,
            KEY idx_documents_user (user_id),
            CONSTRAINT fk_documents_user FOREIGN KEY (user_id) REFERENCES users (id)
        ) ENGINE=InnoDB DEFAULT CHARSET=utf8mb4 COLLATE=utf8mb4_bin
        ",
    )
    .execute(pool)
    .await?;

    // Create the detected entities table
    sqlx::query(
        r"
        CREATE TABLE IF NOT EXISTS detected_entities (
            id BIGINT AUTO_INCREMENT PRIMARY KEY,
            document_id BIGINT NOT NULL,
            method_id BIGINT NOT NULL,
            entity_name VARCHAR(255) NOT NULL,
            redaction_schema TEXT NOT NULL,
            detected_at DATETIME(6) NOT NULL DEFAULT CURRENT_TIMESTAMP(6),
            KEY idx_detected_entities_document (document_id),
            CONSTRAINT fk_detected_entities_document
                FOREIGN KEY (document_id) REFERENCES documents (id),
            CONSTRAINT fk_detected_entities_method
                FOREIGN KEY (method_id) REFERENCES detection_methods (id)
        ) ENGINE=InnoDB DEFAULT CHARSET=utf8mb4 COLLATE=utf8mb4_bin
        ",
    )
    .execute(pool)
    .await?;

    // Create the ban lists table (one per settings profile)
    sqlx::query(
        r"
        CREATE TABLE IF NOT EXISTS ban_lists (
            id BIGINT AUTO_INCREMENT PRIMARY KEY,
            setting_id BIGINT NOT NULL,
            UNIQUE KEY uq_ban_lists_setting_id (setting_id)
        ) ENGINE=InnoDB DEFAULT CHARSET=utf8mb4 COLLATE=utf8mb4_bin
        ",
    )
    .execute(pool)
    .await?;

    // Create the ban list words table
    sqlx::query(
        r"
        CREATE TABLE IF NOT EXISTS ban_list_words (
            ban_list_id BIGINT NOT NULL,
            word VARCHAR(255) NOT NULL,
            PRIMARY KEY (ban_list_id, word),
            CONSTRAINT fk_ban_list_words_list
                FOREIGN KEY (ban_list_id) REFERENCES ban_lists (id)
        ) ENGINE=InnoDB DEFAULT CHARSET=utf8mb4 COLLATE=utf8mb4_bin
        ",
    )
    .execute(pool)
    .await?;

    // Create the search patterns table
    sqlx::query(
        r"
        CREATE TABLE IF NOT EXISTS search_patterns (
            id BIGINT AUTO_INCREMENT PRIMARY KEY,
            setting_id BIGINT NOT NULL,
            pattern_type VARCHAR(16) NOT NULL
                CHECK (pattern_type IN ('exact', 'partial', 'regex')),
            pattern_text TEXT NOT NULL,
            KEY idx_search_patterns_setting (setting_id)
        ) ENGINE=InnoDB DEFAULT CHARSET=utf8mb4 COLLATE=utf8mb4_bin
        ",
    )
    .execute(pool)
    .await?;

    // Create the model entities table
    sqlx::query(
        r"
        CREATE TABLE IF NOT EXISTS model_entities (
            id BIGINT AUTO_INCREMENT PRIMARY KEY,
            setting_id BIGINT NOT NULL,
            method_id BIGINT NOT NULL,
            entity_text VARCHAR(255) NOT NULL,
            UNIQUE KEY uq_model_entities_entity (setting_id, method_id, entity_text),
            CONSTRAINT fk_model_entities_method
                FOREIGN KEY (method_id) REFERENCES detection_methods (id)
        ) ENGINE=InnoDB DEFAULT CHARSET=utf8mb4 COLLATE=utf8mb4_bin
        ",
    )
    .execute(pool)
    .await?;

    // Create the IP bans table. created_by carries the administrator's user
    // id without a foreign key so bans survive account deletion.
    sqlx::query(
        r"
        CREATE TABLE IF NOT EXISTS ip_bans (
            id BIGINT AUTO_INCREMENT PRIMARY KEY,
            ip_address VARCHAR(64) NOT NULL,
            reason TEXT NOT NULL,
            expires_at DATETIME(6),
            created_at DATETIME(6) NOT NULL DEFAULT CURRENT_TIMESTAMP(6),
            created_by BIGINT NOT NULL,
            KEY idx_ip_bans_address (ip_address)
        ) ENGINE=InnoDB DEFAULT CHARSET=utf8mb4 COLLATE=utf8mb4_bin
        ",
    )
    .execute(pool)
    .await?;

    // Create the password reset tokens table (digest-keyed)
    sqlx::query(
        r"
        CREATE TABLE IF NOT EXISTS password_reset_tokens (
            token_hash VARCHAR(64) PRIMARY KEY,
            user_id BIGINT NOT NULL,
            expires_at DATETIME(6) NOT NULL,
            created_at DATETIME(6) NOT NULL DEFAULT CURRENT_TIMESTAMP(6),
            KEY idx_reset_tokens_user (user_id),
            CONSTRAINT fk_reset_tokens_user FOREIGN KEY (user_id) REFERENCES users (id)
        ) ENGINE=InnoDB DEFAULT CHARSET=utf8mb4 COLLATE=utf8mb4_bin
        ",
    )
    .execute(pool)
    .await?;

    Ok(())
}
