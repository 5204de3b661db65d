//! Custom error types for cmdb
//!
//! This module defines the error hierarchy for the library using thiserror
//! for ergonomic error definitions.

use thiserror::Error;

/// The main error type for cmdb operations
#[derive(Error, Debug)]
pub enum CmdbError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Malformed envelope or cache record
    #[error("Format error: {0}")]
    Format(String),

    /// AEAD integrity check failed.
    ///
    /// Covers both a wrong password and tampered data; the two are never
    /// reported differently.
    #[error("Authentication failed: wrong password or corrupted data")]
    Authentication,

    /// No cached password is available
    #[error("Password cache not found")]
    CacheNotFound,

    /// The cached password is older than the expiry window
    #[error("Password cache expired")]
    CacheExpired,

    /// Password confirmation did not match
    #[error("Passwords do not match")]
    Mismatch,

    /// Reading a password from the terminal failed
    #[error("Password prompt failed: {0}")]
    Prompt(String),

    /// TOML parse or serialize errors
    #[error("Document error: {0}")]
    Document(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// Invalid command input
    #[error("Validation error: {0}")]
    Validation(String),

    /// Entity not found errors
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: &'static str,
        identifier: String,
    },

    /// `encrypt` was asked to encrypt an encrypted file
    #[error("File is already encrypted: {0}")]
    AlreadyEncrypted(String),

    /// `decrypt` was asked to decrypt a plaintext file
    #[error("File is not encrypted: {0}")]
    NotEncrypted(String),
}

impl CmdbError {
    /// Create a "not found" error for document keys
    pub fn key_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Key",
            identifier: identifier.into(),
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Check if the password cache had nothing usable
    pub fn is_cache_miss(&self) -> bool {
        matches!(self, Self::CacheNotFound | Self::CacheExpired)
    }

    /// Check if this is an authentication failure
    pub fn is_authentication(&self) -> bool {
        matches!(self, Self::Authentication)
    }
}

impl From<std::io::Error> for CmdbError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for CmdbError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

impl From<toml::de::Error> for CmdbError {
    fn from(err: toml::de::Error) -> Self {
        Self::Document(err.to_string())
    }
}

impl From<toml::ser::Error> for CmdbError {
    fn from(err: toml::ser::Error) -> Self {
        Self::Document(err.to_string())
    }
}

/// Result type alias for cmdb operations
pub type CmdbResult<T> = Result<T, CmdbError>;
