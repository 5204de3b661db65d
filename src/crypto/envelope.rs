//! Envelope codec
//!
//! The envelope is the at-rest form of an encrypted config file: a JSON
//! object with the base64 `nonce`, `ciphertext` and `salt` of one AES-GCM
//! seal. Files carry no magic bytes or version, so detection is the
//! [`is_envelope`] heuristic; changing it is a breaking format change.

use base64::{engine::general_purpose::STANDARD, Engine};
use serde::{Deserialize, Serialize};

use crate::error::{CmdbError, CmdbResult};

use super::key_derivation::SALT_SIZE;

/// Size of the AES-GCM nonce in bytes (96 bits)
pub const NONCE_SIZE: usize = 12;

/// One encrypted payload, as stored on disk
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope {
    /// The nonce used for this encryption (base64 encoded)
    pub nonce: String,
    /// The encrypted ciphertext with authentication tag (base64 encoded)
    pub ciphertext: String,
    /// The key derivation salt (base64 encoded)
    pub salt: String,
}

/// Check whether file content looks like an envelope
///
/// True iff the trimmed content starts with `{` and mentions `ciphertext`
/// somewhere. Plaintext such as `{"note":"ciphertext please"}` is a known
/// false positive and must stay one for compatibility with existing files.
pub fn is_envelope(content: &[u8]) -> bool {
    let text = String::from_utf8_lossy(content);
    let trimmed = text.trim();
    trimmed.starts_with('{') && trimmed.contains("ciphertext")
}

impl Envelope {
    pub(crate) fn from_parts(
        nonce: &[u8; NONCE_SIZE],
        ciphertext: &[u8],
        salt: &[u8; SALT_SIZE],
    ) -> Self {
        Self {
            nonce: STANDARD.encode(nonce),
            ciphertext: STANDARD.encode(ciphertext),
            salt: STANDARD.encode(salt),
        }
    }

    /// Parse an envelope from its JSON record
    pub fn from_json(content: &[u8]) -> CmdbResult<Self> {
        serde_json::from_slice(content)
            .map_err(|e| CmdbError::Format(format!("Invalid envelope: {}", e)))
    }

    /// Serialize the envelope to its JSON record
    pub fn to_json(&self) -> CmdbResult<String> {
        serde_json::to_string(self)
            .map_err(|e| CmdbError::Format(format!("Failed to serialize envelope: {}", e)))
    }

    pub(crate) fn decode_nonce(&self) -> CmdbResult<[u8; NONCE_SIZE]> {
        decode_fixed("nonce", &self.nonce)
    }

    pub(crate) fn decode_salt(&self) -> CmdbResult<[u8; SALT_SIZE]> {
        decode_fixed("salt", &self.salt)
    }

    pub(crate) fn decode_ciphertext(&self) -> CmdbResult<Vec<u8>> {
        STANDARD
            .decode(&self.ciphertext)
            .map_err(|e| CmdbError::Format(format!("Invalid ciphertext encoding: {}", e)))
    }
}

fn decode_fixed<const N: usize>(field: &str, encoded: &str) -> CmdbResult<[u8; N]> {
    let bytes = STANDARD
        .decode(encoded)
        .map_err(|e| CmdbError::Format(format!("Invalid {} encoding: {}", field, e)))?;

    bytes.as_slice().try_into().map_err(|_| {
        CmdbError::Format(format!(
            "Invalid {} size: expected {}, got {}",
            field,
            N,
            bytes.len()
        ))
    })
}
