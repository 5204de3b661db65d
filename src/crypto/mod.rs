//! Cryptographic functions for cmdb
//!
//! Provides AES-256-GCM encryption with PBKDF2-HMAC-SHA256 key derivation
//! for optional at-rest encryption of the config file.

pub mod encryption;
pub mod envelope;
pub mod key_derivation;
pub mod secure_memory;

pub use encryption::{decrypt, encrypt};
pub use envelope::{is_envelope, Envelope, NONCE_SIZE};
pub use key_derivation::{derive_key, DerivedKey, KEY_SIZE, PBKDF2_ITERATIONS, SALT_SIZE};
pub use secure_memory::SecureString;
