//! Password-reset token types.
//!
//! Only the SHA-256 digest of a token ever reaches storage. The plaintext is
//! minted here, handed to the caller for out-of-band delivery, and is not
//! recoverable from the persisted record.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

/// A persisted password-reset token record, keyed by digest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResetToken {
    /// Hex-encoded SHA-256 digest of the token plaintext.
    pub token_hash: String,
    pub user_id: i64,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

/// Data for persisting a freshly minted reset token. `created_at` is
/// assigned by the store.
#[derive(Debug, Clone)]
pub struct NewResetToken {
    pub token_hash: String,
    pub user_id: i64,
    pub expires_at: DateTime<Utc>,
}

impl NewResetToken {
    /// Mint a token for `user_id` valid for `ttl`.
    ///
    /// Returns the plaintext to deliver to the user alongside the record to
    /// persist.
    #[must_use]
    pub fn generate(user_id: i64, ttl: Duration) -> (String, Self) {
        let plaintext = Uuid::new_v4().simple().to_string();
        let record = Self {
            token_hash: hash_token(&plaintext),
            user_id,
            expires_at: Utc::now() + ttl,
        };
        (plaintext, record)
    }
}

/// Hex-encoded SHA-256 digest of a token plaintext.
#[must_use]
pub fn hash_token(plaintext: &str) -> String {
    let digest = Sha256::digest(plaintext.as_bytes());
    digest.iter().map(|b| format!("{b:02x}")).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_token_matches_known_vector() {
        // SHA-256("abc")
        assert_eq!(
            hash_token("abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn generate_returns_plaintext_matching_stored_hash() {
        let (plaintext, record) = NewResetToken::generate(7, Duration::minutes(30));
        assert_eq!(plaintext.len(), 32);
        assert_eq!(hash_token(&plaintext), record.token_hash);
        assert_eq!(record.user_id, 7);
        assert!(record.expires_at > Utc::now());
    }

    #[test]
    fn generate_mints_distinct_tokens() {
        let (a, _) = NewResetToken::generate(1, Duration::hours(1));
        let (b, _) = NewResetToken::generate(1, Duration::hours(1));
        assert_ne!(a, b);
    }
}
