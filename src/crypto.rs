// ABOUTME: Password hashing and symmetric encryption for stored third-party API keys
// ABOUTME: bcrypt for passwords; AES-256-GCM with a random nonce for Hevy keys
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use aes_gcm::aead::generic_array::GenericArray;
use aes_gcm::aead::Aead;
use aes_gcm::{Aes256Gcm, KeyInit};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use rand::{Rng, RngCore};

use crate::constants::auth::BCRYPT_COST;
use crate::constants::storage::{KEY_LEN, NONCE_LEN};
use crate::errors::{AppError, AppResult};

/// Generate a random AES-256 key
#[must_use]
pub fn generate_encryption_key() -> [u8; KEY_LEN] {
    let mut key = [0u8; KEY_LEN];
    rand::thread_rng().fill(&mut key);
    key
}

/// Decode a base64 AES-256 key
///
/// # Errors
///
/// Returns `CONFIG_ERROR` if the value is not base64 or not 32 bytes long
pub fn decode_encryption_key(encoded: &str) -> AppResult<[u8; KEY_LEN]> {
    let bytes = STANDARD
        .decode(encoded.trim())
        .map_err(|e| AppError::config(format!("Encryption key is not valid base64: {e}")))?;
    bytes.try_into().map_err(|bytes: Vec<u8>| {
        AppError::config(format!(
            "Encryption key must be {KEY_LEN} bytes, got {}",
            bytes.len()
        ))
    })
}

/// Encode a key for storage in the environment
#[must_use]
pub fn encode_encryption_key(key: &[u8; KEY_LEN]) -> String {
    STANDARD.encode(key)
}

/// Encrypts short secrets such as Hevy API keys
#[derive(Clone)]
pub struct ApiKeyCipher {
    key: [u8; KEY_LEN],
}

impl std::fmt::Debug for ApiKeyCipher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("ApiKeyCipher([REDACTED])")
    }
}

impl ApiKeyCipher {
    /// Create a cipher from raw key bytes
    #[must_use]
    pub const fn new(key: [u8; KEY_LEN]) -> Self {
        Self { key }
    }

    /// Encrypt and encode as base64(nonce || ciphertext)
    ///
    /// # Errors
    ///
    /// Returns an error if encryption fails
    pub fn encrypt(&self, plaintext: &str) -> AppResult<String> {
        let cipher = Aes256Gcm::new(GenericArray::from_slice(&self.key));

        let mut nonce_bytes = [0u8; NONCE_LEN];
        rand::thread_rng().fill_bytes(&mut nonce_bytes);
        let nonce = GenericArray::from_slice(&nonce_bytes);

        let ciphertext = cipher
            .encrypt(nonce, plaintext.as_bytes())
            .map_err(|e| AppError::internal(format!("Encryption failed: {e}")))?;

        let mut combined = Vec::with_capacity(NONCE_LEN + ciphertext.len());
        combined.extend_from_slice(&nonce_bytes);
        combined.extend_from_slice(&ciphertext);
        Ok(STANDARD.encode(combined))
    }

    /// Decode and decrypt a value produced by [`Self::encrypt`]
    ///
    /// # Errors
    ///
    /// Returns an error if the value is malformed or was encrypted with another key
    pub fn decrypt(&self, encoded: &str) -> AppResult<String> {
        let combined = STANDARD
            .decode(encoded)
            .map_err(|e| AppError::internal(format!("Encrypted value is not base64: {e}")))?;
        if combined.len() <= NONCE_LEN {
            return Err(AppError::internal("Encrypted value too short"));
        }

        let cipher = Aes256Gcm::new(GenericArray::from_slice(&self.key));
        let (nonce_bytes, ciphertext) = combined.split_at(NONCE_LEN);
        let plaintext = cipher
            .decrypt(GenericArray::from_slice(nonce_bytes), ciphertext)
            .map_err(|e| AppError::internal(format!("Decryption failed: {e}")))?;

        String::from_utf8(plaintext)
            .map_err(|e| AppError::internal(format!("Decrypted value is not UTF-8: {e}")))
    }
}

/// Hash a password for storage
///
/// # Errors
///
/// Returns an error if bcrypt hashing fails
pub fn hash_password(password: &str) -> AppResult<String> {
    bcrypt::hash(password, BCRYPT_COST)
        .map_err(|e| AppError::internal(format!("Failed to hash password: {e}")))
}

/// Check a password against its stored hash
///
/// # Errors
///
/// Returns an error if the stored hash is malformed
pub fn verify_password(password: &str, hash: &str) -> AppResult<bool> {
    bcrypt::verify(password, hash)
        .map_err(|e| AppError::internal(format!("Failed to verify password: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encrypt_decrypt() {
        let cipher = ApiKeyCipher::new(generate_encryption_key());
        let encrypted = cipher.encrypt("hevy-secret-key").unwrap();

        assert_ne!(encrypted, "hevy-secret-key");
        assert_eq!(cipher.decrypt(&encrypted).unwrap(), "hevy-secret-key");
    }

    #[test]
    fn test_nonce_makes_ciphertexts_differ() {
        let cipher = ApiKeyCipher::new(generate_encryption_key());
        assert_ne!(cipher.encrypt("same").unwrap(), cipher.encrypt("same").unwrap());
    }

    #[test]
    fn test_wrong_key_fails() {
        let encrypted = ApiKeyCipher::new(generate_encryption_key())
            .encrypt("secret")
            .unwrap();
        assert!(ApiKeyCipher::new(generate_encryption_key())
            .decrypt(&encrypted)
            .is_err());
    }

    #[test]
    fn test_key_encoding() {
        let key = generate_encryption_key();
        let decoded = decode_encryption_key(&encode_encryption_key(&key)).unwrap();
        assert_eq!(decoded, key);
        assert!(decode_encryption_key("c2hvcnQ=").is_err());
    }

    #[test]
    fn test_password_hashing() {
        let hash = hash_password("correct horse").unwrap();
        assert!(verify_password("correct horse", &hash).unwrap());
        assert!(!verify_password("wrong horse", &hash).unwrap());
    }
}
