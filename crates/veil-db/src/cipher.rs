//! AES-256-GCM implementation of the `FieldCipher` port.
//!
//! Stored representation: a fresh 96-bit nonce prepended to the GCM
//! ciphertext+tag, the whole thing base64-encoded so it fits in a TEXT
//! column. The nonce is random per encryption, so encrypting the same
//! plaintext twice yields different stored values and encrypted columns
//! cannot be compared for equality in SQL.

use aes_gcm::aead::{Aead, AeadCore, KeyInit, OsRng};
use aes_gcm::{Aes256Gcm, Key, Nonce};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use veil_core::ports::field_cipher::{CipherError, FieldCipher};

/// GCM standard nonce length in bytes.
const NONCE_LEN: usize = 12;

/// AES-256-GCM field cipher.
pub struct AesGcmCipher {
    key: Key<Aes256Gcm>,
}

impl AesGcmCipher {
    /// Create a cipher from a raw 32-byte key.
    #[must_use]
    pub fn new(key: [u8; 32]) -> Self {
        Self { key: key.into() }
    }

    /// Create a cipher from a base64-encoded 32-byte key, the form keys
    /// arrive in from configuration.
    pub fn from_base64(encoded: &str) -> Result<Self, CipherError> {
        let bytes = STANDARD
            .decode(encoded.trim())
            .map_err(|e| CipherError::InvalidKey(e.to_string()))?;
        let key: [u8; 32] = bytes
            .try_into()
            .map_err(|_| CipherError::InvalidKey("key must decode to exactly 32 bytes".into()))?;
        Ok(Self::new(key))
    }
}

impl FieldCipher for AesGcmCipher {
    fn encrypt(&self, plaintext: &str) -> Result<String, CipherError> {
        let cipher = Aes256Gcm::new(&self.key);
        let nonce = Aes256Gcm::generate_nonce(&mut OsRng);
        let ciphertext = cipher
            .encrypt(&nonce, plaintext.as_bytes())
            .map_err(|e| CipherError::Encrypt(e.to_string()))?;

        let mut stored = Vec::with_capacity(NONCE_LEN + ciphertext.len());
        stored.extend_from_slice(&nonce);
        stored.extend_from_slice(&ciphertext);
        Ok(STANDARD.encode(stored))
    }

    fn decrypt(&self, stored: &str) -> Result<String, CipherError> {
        let bytes = STANDARD
            .decode(stored)
            .map_err(|_| CipherError::Decrypt("stored value is not valid base64".into()))?;
        if bytes.len() < NONCE_LEN {
            return Err(CipherError::Decrypt("stored value too short".into()));
        }

        let (nonce, ciphertext) = bytes.split_at(NONCE_LEN);
        let cipher = Aes256Gcm::new(&self.key);
        let plaintext = cipher
            .decrypt(Nonce::from_slice(nonce), ciphertext)
            .map_err(|_| CipherError::Decrypt("authentication failed".into()))?;

        String::from_utf8(plaintext)
            .map_err(|_| CipherError::Decrypt("plaintext is not valid UTF-8".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_cipher() -> AesGcmCipher {
        AesGcmCipher::new([7u8; 32])
    }

    #[test]
    fn round_trips_plaintext() {
        let cipher = test_cipher();
        let stored = cipher.encrypt("tax-return-2025.pdf").unwrap();
        assert_ne!(stored, "tax-return-2025.pdf");
        assert_eq!(cipher.decrypt(&stored).unwrap(), "tax-return-2025.pdf");
    }

    #[test]
    fn round_trips_empty_and_multibyte_strings() {
        let cipher = test_cipher();
        for input in ["", "ørsted søknad.docx", r#"{"fields":["name","dob"]}"#] {
            let stored = cipher.encrypt(input).unwrap();
            assert_eq!(cipher.decrypt(&stored).unwrap(), input);
        }
    }

    #[test]
    fn same_plaintext_encrypts_differently_each_time() {
        let cipher = test_cipher();
        let a = cipher.encrypt("contract.docx").unwrap();
        let b = cipher.encrypt("contract.docx").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn tampered_ciphertext_fails_authentication() {
        let cipher = test_cipher();
        let stored = cipher.encrypt("payroll.xlsx").unwrap();
        let mut bytes = STANDARD.decode(&stored).unwrap();
        let last = bytes.len() - 1;
        bytes[last] ^= 0x01;
        let tampered = STANDARD.encode(bytes);
        assert!(matches!(
            cipher.decrypt(&tampered),
            Err(CipherError::Decrypt(_))
        ));
    }

    #[test]
    fn wrong_key_fails_authentication() {
        let stored = test_cipher().encrypt("medical-record.pdf").unwrap();
        let other = AesGcmCipher::new([8u8; 32]);
        assert!(matches!(
            other.decrypt(&stored),
            Err(CipherError::Decrypt(_))
        ));
    }

    #[test]
    fn garbage_stored_values_are_rejected() {
        let cipher = test_cipher();
        assert!(matches!(
            cipher.decrypt("not base64!!!"),
            Err(CipherError::Decrypt(_))
        ));
        assert!(matches!(
            cipher.decrypt(&STANDARD.encode([1u8; 4])),
            Err(CipherError::Decrypt(_))
        ));
    }

    #[test]
    fn from_base64_validates_key_length() {
        let good = STANDARD.encode([9u8; 32]);
        assert!(AesGcmCipher::from_base64(&good).is_ok());

        let short = STANDARD.encode([9u8; 16]);
        assert!(matches!(
            AesGcmCipher::from_base64(&short),
            Err(CipherError::InvalidKey(_))
        ));
        assert!(matches!(
            AesGcmCipher::from_base64("///not-base64///"),
            Err(CipherError::InvalidKey(_))
        ));
    }

    #[test]
    fn keys_round_trip_through_base64_config_form() {
        let encoded = STANDARD.encode([42u8; 32]);
        let from_config = AesGcmCipher::from_base64(&encoded).unwrap();
        let direct = AesGcmCipher::new([42u8; 32]);
        let stored = from_config.encrypt("shared.txt").unwrap();
        assert_eq!(direct.decrypt(&stored).unwrap(), "shared.txt");
    }
}
