//! AES-256-GCM encryption for stored OAuth credentials.
//!
//! Ciphertexts travel as opaque base64 strings so they can live in ordinary
//! TEXT columns next to the rest of the user record. The key is provisioned
//! through configuration and must be exactly 32 bytes.

use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Nonce};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use rand::rngs::OsRng;
use rand::RngCore;
use serde::{Deserialize, Serialize};

use crate::error::{CommonError, CommonResult};

/// Serializable encrypted payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncryptedData {
    pub nonce: Vec<u8>,
    pub ciphertext: Vec<u8>,
    pub algorithm: String,
}

const ALGORITHM: &str = "AES-256-GCM";

/// AES-256-GCM encryption service.
pub struct EncryptionService {
    cipher: Aes256Gcm,
}

impl std::fmt::Debug for EncryptionService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EncryptionService").field("key", &"[REDACTED]").finish()
    }
}

impl EncryptionService {
    /// Create a new encryption service from a raw 32-byte key.
    pub fn new(key: &[u8]) -> CommonResult<Self> {
        if key.len() != 32 {
            return Err(CommonError::invalid_input("encryption key must be exactly 32 bytes"));
        }

        let cipher = Aes256Gcm::new_from_slice(key)
            .map_err(|e| CommonError::internal(format!("failed to create cipher: {e}")))?;

        Ok(Self { cipher })
    }

    /// Encrypt bytes into an [`EncryptedData`] payload.
    pub fn encrypt(&self, data: &[u8]) -> CommonResult<EncryptedData> {
        let nonce_bytes = generate_nonce();
        let ciphertext = self
            .cipher
            .encrypt(&Nonce::from(nonce_bytes), data)
            .map_err(|e| CommonError::internal(format!("encryption failed: {e}")))?;

        Ok(EncryptedData {
            nonce: nonce_bytes.to_vec(),
            ciphertext,
            algorithm: ALGORITHM.to_string(),
        })
    }

    /// Decrypt an [`EncryptedData`] payload back into raw bytes.
    pub fn decrypt(&self, encrypted: &EncryptedData) -> CommonResult<Vec<u8>> {
        if encrypted.algorithm != ALGORITHM {
            return Err(CommonError::invalid_input(format!(
                "unsupported algorithm: {}",
                encrypted.algorithm
            )));
        }

        let nonce_array: [u8; 12] = encrypted.nonce.as_slice().try_into().map_err(|_| {
            CommonError::invalid_input("invalid nonce length for AES-256-GCM")
        })?;

        self.cipher
            .decrypt(&Nonce::from(nonce_array), encrypted.ciphertext.as_ref())
            .map_err(|e| CommonError::internal(format!("decryption failed: {e}")))
    }

    /// Encrypt a string and encode the payload as base64.
    pub fn encrypt_to_string(&self, plaintext: &str) -> CommonResult<String> {
        let encrypted = self.encrypt(plaintext.as_bytes())?;
        let serialized = serde_json::to_vec(&encrypted)?;
        Ok(BASE64.encode(serialized))
    }

    /// Decode a base64 string and decrypt the contained payload.
    pub fn decrypt_from_string(&self, encoded: &str) -> CommonResult<String> {
        let decoded = BASE64
            .decode(encoded)
            .map_err(|e| CommonError::invalid_input(format!("base64 decode failed: {e}")))?;
        let encrypted: EncryptedData = serde_json::from_slice(&decoded)?;
        let plaintext = self.decrypt(&encrypted)?;
        String::from_utf8(plaintext)
            .map_err(|e| CommonError::invalid_input(format!("invalid UTF-8 in plaintext: {e}")))
    }
}

fn generate_nonce() -> [u8; 12] {
    let mut nonce = [0u8; 12];
    OsRng.fill_bytes(&mut nonce);
    nonce
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_key() -> Vec<u8> {
        (0u8..32).collect()
    }

    #[test]
    fn rejects_short_key() {
        assert!(EncryptionService::new(&[0u8; 16]).is_err());
    }

    #[test]
    fn encrypt_and_decrypt_round_trip() {
        let service = EncryptionService::new(&test_key()).unwrap();

        let encrypted = service.encrypt(b"ya29.a0AfH6SMB-token").unwrap();
        let decrypted = service.decrypt(&encrypted).unwrap();

        assert_eq!(decrypted, b"ya29.a0AfH6SMB-token");
    }

    #[test]
    fn string_round_trip() {
        let service = EncryptionService::new(&test_key()).unwrap();

        let encoded = service.encrypt_to_string("refresh-token-value").unwrap();
        let decoded = service.decrypt_from_string(&encoded).unwrap();

        assert_eq!(decoded, "refresh-token-value");
    }

    #[test]
    fn nonces_differ_between_calls() {
        let service = EncryptionService::new(&test_key()).unwrap();

        let a = service.encrypt(b"same input").unwrap();
        let b = service.encrypt(b"same input").unwrap();

        assert_ne!(a.nonce, b.nonce);
        assert_ne!(a.ciphertext, b.ciphertext);
    }

    #[test]
    fn tampered_ciphertext_fails() {
        let service = EncryptionService::new(&test_key()).unwrap();

        let mut encrypted = service.encrypt(b"secret").unwrap();
        encrypted.ciphertext[0] ^= 0xff;

        assert!(service.decrypt(&encrypted).is_err());
    }

    #[test]
    fn wrong_key_fails() {
        let service = EncryptionService::new(&test_key()).unwrap();
        let other = EncryptionService::new(&[7u8; 32]).unwrap();

        let encoded = service.encrypt_to_string("secret").unwrap();
        assert!(other.decrypt_from_string(&encoded).is_err());
    }

    #[test]
    fn malformed_payload_fails() {
        let service = EncryptionService::new(&test_key()).unwrap();
        assert!(service.decrypt_from_string("not-base64!!!").is_err());
        assert!(service.decrypt_from_string(&BASE64.encode(b"not json")).is_err());
    }
}
