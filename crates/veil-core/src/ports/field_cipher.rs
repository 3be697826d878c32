//! Field cipher port definition.
//!
//! Abstracts at-rest encryption of individual column values (document names,
//! detected-entity redaction schemas) so repositories can encrypt without
//! knowing the algorithm. The AES-256-GCM implementation lives in `veil-db`;
//! this port only defines the trait, its error type, and a passthrough stub.

use thiserror::Error;

/// Errors that can occur during field encryption or decryption.
#[derive(Debug, Error)]
pub enum CipherError {
    #[error("Encryption failed: {0}")]
    Encrypt(String),

    /// Wrong key, truncated ciphertext, or corrupted data. The message never
    /// echoes the ciphertext itself.
    #[error("Decryption failed: {0}")]
    Decrypt(String),

    #[error("Invalid cipher key: {0}")]
    InvalidKey(String),
}

/// Port for encrypting and decrypting individual field values.
///
/// Implementations must be deterministic only in the round-trip sense:
/// `decrypt(encrypt(x)) == x`. Repeated encryptions of the same plaintext
/// may (and with a nonce-based cipher will) differ, so encrypted columns
/// cannot be compared for equality in SQL.
pub trait FieldCipher: Send + Sync {
    /// Encrypt a plaintext field value into its stored representation.
    fn encrypt(&self, plaintext: &str) -> Result<String, CipherError>;

    /// Decrypt a stored representation back to the plaintext field value.
    fn decrypt(&self, stored: &str) -> Result<String, CipherError>;
}

/// A passthrough cipher that stores plaintext unchanged.
///
/// Useful for tests and for deployments that delegate at-rest encryption to
/// the storage engine.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopCipher;

impl FieldCipher for NoopCipher {
    fn encrypt(&self, plaintext: &str) -> Result<String, CipherError> {
        Ok(plaintext.to_string())
    }

    fn decrypt(&self, stored: &str) -> Result<String, CipherError> {
        Ok(stored.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn noop_cipher_round_trips_unchanged() {
        let cipher = NoopCipher;
        let stored = cipher.encrypt("quarterly-report.pdf").unwrap();
        assert_eq!(stored, "quarterly-report.pdf");
        assert_eq!(cipher.decrypt(&stored).unwrap(), "quarterly-report.pdf");
    }
}
