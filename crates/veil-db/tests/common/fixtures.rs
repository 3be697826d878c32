//! Builders for unique test data.
//!
//! Every value that lands in a uniquely-constrained column carries a random
//! suffix so the suites can run repeatedly, and in parallel, against the same
//! database without colliding with earlier rows.

use chrono::{DateTime, Duration, Utc};
use serde_json::json;
use uuid::Uuid;

use veil_core::{
    NewDetectedEntity, NewDocument, NewIpBan, NewModelEntity, NewSearchPattern, NewSession,
    NewUser, PatternType,
};

/// Random 32-char hex suffix.
pub fn unique() -> String {
    Uuid::new_v4().simple().to_string()
}

/// Random non-negative id for `setting_id`-shaped columns.
pub fn unique_setting_id() -> i64 {
    let bytes = Uuid::new_v4().into_bytes();
    i64::from_be_bytes(bytes[..8].try_into().unwrap()) & i64::MAX
}

/// An address in the IPv6 documentation range no other test will reuse.
pub fn unique_ip() -> String {
    let s = unique();
    format!("2001:db8:{}:{}::1", &s[..4], &s[4..8])
}

pub fn new_user() -> NewUser {
    let suffix = unique();
    NewUser {
        username: format!("user_{suffix}"),
        email: format!("{suffix}@example.com"),
        password_hash: format!("$argon2id$v=19$m=65536,t=3,p=4${suffix}"),
        salt: unique(),
    }
}

pub fn new_session(user_id: i64) -> NewSession {
    NewSession {
        id: format!("sess_{}", unique()),
        user_id,
        jwt_id: format!("jti_{}", unique()),
        expires_at: Utc::now() + Duration::hours(1),
    }
}

pub fn expired_session(user_id: i64) -> NewSession {
    NewSession {
        expires_at: Utc::now() - Duration::hours(1),
        ..new_session(user_id)
    }
}

pub fn new_document(user_id: i64) -> NewDocument {
    NewDocument {
        user_id,
        name: format!("tax-return-{}.pdf", &unique()[..8]),
        redaction_schema: Some(json!({"fields": ["ssn", "dob"], "mode": "mask"})),
    }
}

pub fn new_entity(document_id: i64, method_id: i64) -> NewDetectedEntity {
    NewDetectedEntity {
        document_id,
        method_id,
        entity_name: "PERSON".to_string(),
        redaction_schema: json!({"start": 14, "end": 29, "replacement": "█"}),
    }
}

pub fn new_pattern(setting_id: i64) -> NewSearchPattern {
    NewSearchPattern {
        setting_id,
        pattern_type: PatternType::Exact,
        pattern_text: format!("ACME-{}", &unique()[..8]),
    }
}

pub fn new_model_entity(setting_id: i64, method_id: i64) -> NewModelEntity {
    NewModelEntity {
        setting_id,
        method_id,
        entity_text: format!("Jane Doe {}", &unique()[..8]),
    }
}

pub fn permanent_ban(created_by: i64) -> NewIpBan {
    NewIpBan {
        ip_address: unique_ip(),
        reason: "credential stuffing".to_string(),
        expires_at: None,
        created_by,
    }
}

pub fn expiring_ban(created_by: i64, expires_at: DateTime<Utc>) -> NewIpBan {
    NewIpBan {
        expires_at: Some(expires_at),
        ..permanent_ban(created_by)
    }
}
