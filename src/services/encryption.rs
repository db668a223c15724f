// src/services/encryption.rs
//! Entry content encryption at the storage edge.
//!
//! Content is sealed with AES-256-GCM under a random 96-bit nonce and stored as
//! base64(nonce || ciphertext). The rest of the service only ever sees plaintext.

use aes_gcm::{
    aead::{Aead, KeyInit, OsRng},
    Aes256Gcm, Nonce,
};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use rand::RngCore;
use std::env;
use thiserror::Error;
use tracing::warn;

const NONCE_LEN: usize = 12;

#[derive(Debug, Error)]
pub enum EncryptionError {
    #[error("Encryption key not configured")]
    KeyNotConfigured,

    #[error("Invalid encryption key format")]
    InvalidKeyFormat,

    #[error("Encryption failed: {0}")]
    EncryptionFailed(String),

    #[error("Decryption failed: {0}")]
    DecryptionFailed(String),

    #[error("Invalid encrypted data format")]
    InvalidDataFormat,
}

pub struct EncryptionService {
    cipher: Aes256Gcm,
}

impl std::fmt::Debug for EncryptionService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EncryptionService")
            .field("cipher", &"<encrypted>")
            .finish()
    }
}

impl EncryptionService {
    /// Initialize encryption service from the `ENCRYPTION_KEY` environment variable
    pub fn from_env() -> Result<Self, EncryptionError> {
        let key_str = env::var("ENCRYPTION_KEY").map_err(|_| EncryptionError::KeyNotConfigured)?;

        Self::from_key(&key_str)
    }

    /// Initialize encryption service from a base64-encoded 32-byte key
    pub fn from_key(key_str: &str) -> Result<Self, EncryptionError> {
        let key_bytes = BASE64
            .decode(key_str.trim().as_bytes())
            .map_err(|_| EncryptionError::InvalidKeyFormat)?;

        if key_bytes.len() != 32 {
            return Err(EncryptionError::InvalidKeyFormat);
        }

        let cipher =
            Aes256Gcm::new_from_slice(&key_bytes).map_err(|_| EncryptionError::InvalidKeyFormat)?;

        Ok(Self { cipher })
    }

    /// Generate a new random encryption key (base64-encoded)
    pub fn generate_key() -> String {
        let mut key = [0u8; 32];
        OsRng.fill_bytes(&mut key);
        BASE64.encode(key)
    }

    /// Encrypt a plaintext string and return base64-encoded ciphertext with nonce
    pub fn encrypt(&self, plaintext: &str) -> Result<String, EncryptionError> {
        let mut nonce_bytes = [0u8; NONCE_LEN];
        OsRng.fill_bytes(&mut nonce_bytes);
        let nonce = Nonce::from_slice(&nonce_bytes);

        let ciphertext = self
            .cipher
            .encrypt(nonce, plaintext.as_bytes())
            .map_err(|e| EncryptionError::EncryptionFailed(e.to_string()))?;

        let mut combined = nonce_bytes.to_vec();
        combined.extend_from_slice(&ciphertext);

        Ok(BASE64.encode(combined))
    }

    /// Decrypt a base64-encoded ciphertext (with nonce) and return plaintext
    pub fn decrypt(&self, encrypted: &str) -> Result<String, EncryptionError> {
        let combined = BASE64
            .decode(encrypted.as_bytes())
            .map_err(|_| EncryptionError::InvalidDataFormat)?;

        if combined.len() < NONCE_LEN {
            return Err(EncryptionError::InvalidDataFormat);
        }

        let (nonce_bytes, ciphertext) = combined.split_at(NONCE_LEN);
        let nonce = Nonce::from_slice(nonce_bytes);

        let plaintext_bytes = self
            .cipher
            .decrypt(nonce, ciphertext)
            .map_err(|e| EncryptionError::DecryptionFailed(e.to_string()))?;

        String::from_utf8(plaintext_bytes)
            .map_err(|_| EncryptionError::DecryptionFailed("invalid UTF-8".to_string()))
    }

    /// Decrypt stored content, returning it untouched when it is not ciphertext.
    ///
    /// Freshly created daily entries hold an empty string and older rows may predate
    /// encryption; both are returned as stored.
    pub fn reveal(&self, stored: &str) -> String {
        if stored.is_empty() {
            return String::new();
        }

        match self.decrypt(stored) {
            Ok(plaintext) => plaintext,
            Err(e) => {
                warn!(error = %e, "Stored content is not decryptable, returning as stored");
                stored.to_string()
            }
        }
    }
}
