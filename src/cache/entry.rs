//! Password cache record
//!
//! The record is stored as JSON:
//! `{"password_hash": "<password>", "last_access": <unix seconds>}`.
//! Despite its name the `password_hash` field holds the cleartext password,
//! because the cache exists to re-derive keys without prompting. The file's
//! owner-only permissions are its only protection.

use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::crypto::SecureString;
use crate::error::{CmdbError, CmdbResult};

/// A cached session password and its last use time
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, Zeroize, ZeroizeOnDrop)]
pub struct CacheEntry {
    #[serde(rename = "password_hash")]
    password: String,
    /// Unix seconds of the last successful use
    pub last_access: i64,
}

impl CacheEntry {
    /// Create an entry for a password used at `last_access`
    pub fn new(password: &str, last_access: i64) -> Self {
        Self {
            password: password.to_string(),
            last_access,
        }
    }

    /// The cached password
    pub fn password(&self) -> SecureString {
        SecureString::new(self.password.as_str())
    }

    /// Seconds elapsed between the last use and `now`
    pub fn age(&self, now: i64) -> i64 {
        now - self.last_access
    }

    /// Parse a cache record
    pub fn from_json(record: &[u8]) -> CmdbResult<Self> {
        serde_json::from_slice(record)
            .map_err(|e| CmdbError::Format(format!("Invalid password cache record: {}", e)))
    }

    /// Serialize the cache record
    pub fn to_json(&self) -> CmdbResult<Vec<u8>> {
        serde_json::to_vec(self)
            .map_err(|e| CmdbError::Format(format!("Failed to serialize password cache: {}", e)))
    }
}

impl std::fmt::Debug for CacheEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheEntry")
            .field("password", &"[REDACTED]")
            .field("last_access", &self.last_access)
            .finish()
    }
}
