//! Key derivation using PBKDF2
//!
//! Derives AES-256 keys from passwords with PBKDF2-HMAC-SHA256. The
//! iteration count is part of the on-disk format: files encrypted by one
//! build must open with another, so it is a constant and not a setting.

use pbkdf2::pbkdf2_hmac;
use sha2::Sha256;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Size of the key derivation salt in bytes
pub const SALT_SIZE: usize = 16;

/// Size of the derived key in bytes (AES-256)
pub const KEY_SIZE: usize = 32;

/// PBKDF2 iteration count. Lowering it weakens every encrypted file
/// against offline guessing.
pub const PBKDF2_ITERATIONS: u32 = 100_000;

/// A derived encryption key, wiped when dropped
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct DerivedKey {
    key: [u8; KEY_SIZE],
}

impl DerivedKey {
    /// Get the key bytes
    pub fn as_bytes(&self) -> &[u8; KEY_SIZE] {
        &self.key
    }
}

/// Derive an encryption key from a password and salt
pub fn derive_key(password: &[u8], salt: &[u8; SALT_SIZE]) -> DerivedKey {
    let mut key = [0u8; KEY_SIZE];
    pbkdf2_hmac::<Sha256>(password, salt, PBKDF2_ITERATIONS, &mut key);
    DerivedKey { key }
}
