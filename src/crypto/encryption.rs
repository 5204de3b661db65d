//! AES-256-GCM encryption/decryption
//!
//! Seals config bytes under a password-derived key. Every call draws a
//! fresh salt and nonce, so encrypting the same content twice never yields
//! the same envelope.

use aes_gcm::aead::rand_core::RngCore;
use aes_gcm::{
    aead::{Aead, KeyInit, OsRng},
    Aes256Gcm, Nonce,
};

use crate::error::{CmdbError, CmdbResult};

use super::envelope::{Envelope, NONCE_SIZE};
use super::key_derivation::{derive_key, SALT_SIZE};

/// Encrypt plaintext under a password
pub fn encrypt(plaintext: &[u8], password: &str) -> CmdbResult<Envelope> {
    let salt: [u8; SALT_SIZE] = random_bytes();
    let nonce_bytes: [u8; NONCE_SIZE] = random_bytes();

    let key = derive_key(password.as_bytes(), &salt);
    let cipher = Aes256Gcm::new_from_slice(key.as_bytes())
        .map_err(|e| CmdbError::Format(format!("Failed to create cipher: {}", e)))?;

    let ciphertext = cipher
        .encrypt(Nonce::from_slice(&nonce_bytes), plaintext)
        .map_err(|e| CmdbError::Format(format!("Encryption failed: {}", e)))?;

    Ok(Envelope::from_parts(&nonce_bytes, &ciphertext, &salt))
}

/// Decrypt an envelope with a password
///
/// A wrong password and a tampered envelope both fail with
/// [`CmdbError::Authentication`].
pub fn decrypt(envelope: &Envelope, password: &str) -> CmdbResult<Vec<u8>> {
    let nonce_bytes = envelope.decode_nonce()?;
    let salt = envelope.decode_salt()?;
    let ciphertext = envelope.decode_ciphertext()?;

    let key = derive_key(password.as_bytes(), &salt);
    let cipher = Aes256Gcm::new_from_slice(key.as_bytes())
        .map_err(|e| CmdbError::Format(format!("Failed to create cipher: {}", e)))?;

    cipher
        .decrypt(Nonce::from_slice(&nonce_bytes), ciphertext.as_ref())
        .map_err(|_| CmdbError::Authentication)
}

fn random_bytes<const N: usize>() -> [u8; N] {
    let mut bytes = [0u8; N];
    OsRng.fill_bytes(&mut bytes);
    bytes
}
