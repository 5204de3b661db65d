//! Transparent encryption around config file reads and writes
//!
//! [`TransparentStore::load`] hands back plaintext whether or not the file
//! on disk is encrypted, and [`TransparentStore::save`] keeps an encrypted
//! target encrypted. An explicit password (flag or environment) is used
//! as given; otherwise the cache is tried first and the password source
//! only when the cache has nothing usable.

use std::path::Path;

use tracing::{debug, warn};

use crate::cache::{CacheStore, PasswordCache};
use crate::crypto::{decrypt, encrypt, is_envelope, Envelope, SecureString};
use crate::error::{CmdbError, CmdbResult};
use crate::prompt::PasswordSource;

use super::file_io::{read_optional, read_required, write_atomic, CONFIG_FILE_MODE};

/// Where an unlock password came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PasswordOrigin {
    Cache,
    Source,
}

/// Config file access with transparent decryption and re-encryption
pub struct TransparentStore<S, P> {
    cache: PasswordCache<S>,
    source: P,
}

impl<S: CacheStore, P: PasswordSource> TransparentStore<S, P> {
    /// Create a store over a password cache and a password source
    pub fn new(cache: PasswordCache<S>, source: P) -> Self {
        Self { cache, source }
    }

    /// Get the password cache
    pub fn cache(&self) -> &PasswordCache<S> {
        &self.cache
    }

    /// Check whether the file at `path` is encrypted
    ///
    /// A missing file counts as not encrypted.
    pub fn is_encrypted(&self, path: &Path) -> CmdbResult<bool> {
        Ok(read_optional(path)?.is_some_and(|content| is_envelope(&content)))
    }

    /// Read a config file, decrypting it if needed
    ///
    /// A password entered at the prompt starts a new cache window; a cached
    /// password has its window slid forward. A failed decryption leaves the
    /// cache untouched.
    pub fn load(&self, path: &Path) -> CmdbResult<Vec<u8>> {
        let raw = read_required(path)?;
        if !is_envelope(&raw) {
            debug!(path = %path.display(), "loaded plaintext config");
            return Ok(raw);
        }

        let envelope = Envelope::from_json(&raw)?;
        let (password, origin) = self.unlock_password()?;
        let plaintext = decrypt(&envelope, &password)?;

        match origin {
            PasswordOrigin::Cache => self.cache.touch(),
            PasswordOrigin::Source => {
                if let Err(e) = self.cache.save(&password) {
                    warn!(error = %e, "failed to cache password");
                }
            }
        }

        debug!(path = %path.display(), ?origin, "decrypted config");
        Ok(plaintext)
    }

    /// Write a config file, re-encrypting it if the target is encrypted
    ///
    /// The target is `out` when given, else `path`. An encrypted target
    /// needs a cached password; without one the save fails rather than
    /// writing plaintext over it.
    pub fn save(&self, path: &Path, plaintext: &[u8], out: Option<&Path>) -> CmdbResult<()> {
        let target = out.unwrap_or(path);

        let content = if self.is_encrypted(target)? {
            let entry = self.cache.read()?;
            let envelope = encrypt(plaintext, &entry.password())?;
            debug!(path = %target.display(), "re-encrypting config");
            envelope.to_json()?.into_bytes()
        } else {
            plaintext.to_vec()
        };

        write_atomic(target, &content, CONFIG_FILE_MODE, false)
    }

    /// Encrypt a plaintext file in place
    ///
    /// The password is asked for twice and cached afterwards.
    pub fn encrypt_file(&self, path: &Path) -> CmdbResult<()> {
        let content = read_required(path)?;
        if is_envelope(&content) {
            return Err(CmdbError::AlreadyEncrypted(path.display().to_string()));
        }

        let password = self.source.password(true)?;
        let envelope = encrypt(&content, &password)?;
        write_atomic(path, envelope.to_json()?.as_bytes(), CONFIG_FILE_MODE, false)?;

        if let Err(e) = self.cache.save(&password) {
            warn!(error = %e, "failed to cache password");
        }
        Ok(())
    }

    /// Decrypt an encrypted file in place
    ///
    /// Unlocks the same way as [`load`](Self::load), so a password entered
    /// at the prompt is cached for the usual window.
    pub fn decrypt_file(&self, path: &Path) -> CmdbResult<()> {
        if !self.is_encrypted(path)? {
            return Err(CmdbError::NotEncrypted(path.display().to_string()));
        }

        let plaintext = self.load(path)?;
        write_atomic(path, &plaintext, CONFIG_FILE_MODE, false)
    }

    fn unlock_password(&self) -> CmdbResult<(SecureString, PasswordOrigin)> {
        if self.source.is_explicit() {
            return Ok((self.source.password(false)?, PasswordOrigin::Source));
        }

        match self.cache.read() {
            Ok(entry) => Ok((entry.password(), PasswordOrigin::Cache)),
            Err(e) if e.is_cache_miss() || matches!(e, CmdbError::Format(_)) => {
                debug!(reason = %e, "no usable cached password");
                Ok((self.source.password(false)?, PasswordOrigin::Source))
            }
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{CacheEntry, MemoryCacheStore};
    use crate::prompt::FixedPassword;
    use base64::{engine::general_purpose::STANDARD, Engine};
    use chrono::Utc;
    use std::cell::Cell;
    use std::fs;
    use tempfile::TempDir;

    /// Password source that counts how often it was asked
    struct CountingSource {
        password: &'static str,
        calls: Cell<usize>,
    }

    impl CountingSource {
        fn new(password: &'static str) -> Self {
            Self {
                password,
                calls: Cell::new(0),
            }
        }
    }

    impl PasswordSource for &CountingSource {
        fn password(&self, _confirm: bool) -> CmdbResult<SecureString> {
            self.calls.set(self.calls.get() + 1);
            Ok(SecureString::from(self.password))
        }
    }

    /// Password source that fails the test if it is ever asked
    struct NoPrompt;

    impl PasswordSource for NoPrompt {
        fn password(&self, _confirm: bool) -> CmdbResult<SecureString> {
            panic!("unexpected password prompt");
        }
    }

    fn now() -> i64 {
        Utc::now().timestamp()
    }

    fn cached(password: &str, age: i64) -> PasswordCache<MemoryCacheStore> {
        let entry = CacheEntry::new(password, now() - age);
        PasswordCache::new(MemoryCacheStore::with_record(entry.to_json().unwrap()))
    }

    fn write_encrypted(path: &Path, plaintext: &[u8], password: &str) -> Envelope {
        let envelope = encrypt(plaintext, password).unwrap();
        fs::write(path, envelope.to_json().unwrap()).unwrap();
        envelope
    }

    #[test]
    fn test_load_plaintext_passthrough() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("cmdb.toml");
        fs::write(&path, "key = \"value\"\n").unwrap();

        let store = TransparentStore::new(PasswordCache::new(MemoryCacheStore::new()), NoPrompt);
        assert_eq!(store.load(&path).unwrap(), b"key = \"value\"\n");
        assert!(!store.cache().store().has_record());
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let temp_dir = TempDir::new().unwrap();
        let store = TransparentStore::new(PasswordCache::new(MemoryCacheStore::new()), NoPrompt);
        let err = store.load(&temp_dir.path().join("missing.toml")).unwrap_err();
        assert!(matches!(err, CmdbError::Io(_)));
    }

    #[test]
    fn test_load_prompts_and_caches() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("cmdb.toml");
        write_encrypted(&path, b"title = \"hi\"", "pw123");

        let source = CountingSource::new("pw123");
        let store = TransparentStore::new(PasswordCache::new(MemoryCacheStore::new()), &source);

        assert_eq!(store.load(&path).unwrap(), b"title = \"hi\"");
        assert_eq!(source.calls.get(), 1);
        assert_eq!(store.cache().read().unwrap().password().as_str(), "pw123");

        // Second load is served from the cache
        assert_eq!(store.load(&path).unwrap(), b"title = \"hi\"");
        assert_eq!(source.calls.get(), 1);
    }

    #[test]
    fn test_load_prompts_when_cache_expired() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("cmdb.toml");
        write_encrypted(&path, b"title = \"hi\"", "pw123");

        let source = CountingSource::new("pw123");
        let store = TransparentStore::new(cached("stale", 601), &source);

        assert_eq!(store.load(&path).unwrap(), b"title = \"hi\"");
        assert_eq!(source.calls.get(), 1);
        assert_eq!(store.cache().read().unwrap().password().as_str(), "pw123");
    }

    #[test]
    fn test_cached_load_refreshes_last_access() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("cmdb.toml");
        write_encrypted(&path, b"title = \"hi\"", "pw123");

        let store = TransparentStore::new(cached("pw123", 300), NoPrompt);
        store.load(&path).unwrap();

        let entry = store.cache().read().unwrap();
        assert!(entry.age(now()) <= 1);
    }

    #[test]
    fn test_wrong_prompted_password_is_not_cached() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("cmdb.toml");
        write_encrypted(&path, b"title = \"hi\"", "pw123");

        let source = CountingSource::new("wrong");
        let store = TransparentStore::new(PasswordCache::new(MemoryCacheStore::new()), &source);

        let err = store.load(&path).unwrap_err();
        assert!(err.is_authentication());
        assert!(!store.cache().store().has_record());
    }

    #[test]
    fn test_wrong_cached_password_leaves_cache_alone() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("cmdb.toml");
        write_encrypted(&path, b"title = \"hi\"", "pw123");

        let store = TransparentStore::new(cached("wrong", 300), NoPrompt);
        let before = store.cache().read().unwrap().last_access;

        assert!(store.load(&path).unwrap_err().is_authentication());
        assert_eq!(store.cache().read().unwrap().last_access, before);
    }

    #[test]
    fn test_false_positive_plaintext_fails_to_load() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("cmdb.toml");
        fs::write(&path, r#"{"note":"ciphertext please"}"#).unwrap();

        let store = TransparentStore::new(PasswordCache::new(MemoryCacheStore::new()), NoPrompt);
        assert!(matches!(store.load(&path), Err(CmdbError::Format(_))));
    }

    #[test]
    fn test_corrupt_cache_falls_back_to_prompt() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("cmdb.toml");
        write_encrypted(&path, b"title = \"hi\"", "pw123");

        let source = CountingSource::new("pw123");
        let cache = PasswordCache::new(MemoryCacheStore::with_record("{garbage"));
        let store = TransparentStore::new(cache, &source);

        assert_eq!(store.load(&path).unwrap(), b"title = \"hi\"");
        assert_eq!(source.calls.get(), 1);
        assert!(store.cache().read().is_ok());
    }

    #[test]
    fn test_save_plaintext_target() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("cmdb.toml");
        fs::write(&path, "a = 1\n").unwrap();

        let store = TransparentStore::new(PasswordCache::new(MemoryCacheStore::new()), NoPrompt);
        store.save(&path, b"a = 2\n", None).unwrap();
        assert_eq!(fs::read(&path).unwrap(), b"a = 2\n");
    }

    #[test]
    fn test_save_new_target_is_plaintext() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("cmdb.toml");
        let out = temp_dir.path().join("out.toml");
        write_encrypted(&path, b"a = 1", "pw123");

        let store = TransparentStore::new(cached("pw123", 1), NoPrompt);
        store.save(&path, b"a = 2\n", Some(out.as_path())).unwrap();

        assert_eq!(fs::read(&out).unwrap(), b"a = 2\n");
        // the source file is not touched
        assert!(store.is_encrypted(&path).unwrap());
    }

    #[test]
    fn test_save_reencrypts_with_cached_password() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("cmdb.toml");
        let original = write_encrypted(&path, b"title = \"hi\"", "pw123");

        let store = TransparentStore::new(cached("pw123", 5), NoPrompt);
        store.save(&path, b"title = \"bye\"", None).unwrap();

        let written = Envelope::from_json(&fs::read(&path).unwrap()).unwrap();
        assert_ne!(written.nonce, original.nonce);
        assert_ne!(written.salt, original.salt);
        assert_eq!(decrypt(&written, "pw123").unwrap(), b"title = \"bye\"");
    }

    #[test]
    fn test_save_without_cache_refuses_downgrade() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("cmdb.toml");
        write_encrypted(&path, b"title = \"hi\"", "pw123");
        let before = fs::read(&path).unwrap();

        let store = TransparentStore::new(PasswordCache::new(MemoryCacheStore::new()), NoPrompt);
        let err = store.save(&path, b"title = \"bye\"", None).unwrap_err();
        assert!(matches!(err, CmdbError::CacheNotFound));
        assert_eq!(fs::read(&path).unwrap(), before);

        let store = TransparentStore::new(cached("pw123", 601), NoPrompt);
        let err = store.save(&path, b"title = \"bye\"", None).unwrap_err();
        assert!(matches!(err, CmdbError::CacheExpired));
        assert_eq!(fs::read(&path).unwrap(), before);
    }

    #[test]
    fn test_scenario_a() {
        let envelope = encrypt(b"title = \"hi\"", "pw123").unwrap();
        assert_eq!(STANDARD.decode(&envelope.salt).unwrap().len(), 16);
        assert_eq!(STANDARD.decode(&envelope.nonce).unwrap().len(), 12);
        assert!(STANDARD.decode(&envelope.ciphertext).is_ok());

        assert_eq!(decrypt(&envelope, "pw123").unwrap(), b"title = \"hi\"");
        assert!(decrypt(&envelope, "wrong").unwrap_err().is_authentication());
    }

    #[test]
    fn test_scenario_b() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("cmdb.toml");
        let original = write_encrypted(&path, b"title = \"hi\"", "pw123");

        let store = TransparentStore::new(cached("pw123", 30), NoPrompt);
        let plaintext = store.load(&path).unwrap();
        assert_eq!(plaintext, b"title = \"hi\"");

        store.save(&path, b"title = \"new\"\n", None).unwrap();
        let written = Envelope::from_json(&fs::read(&path).unwrap()).unwrap();
        assert_ne!(written.nonce, original.nonce);
        assert_ne!(written.salt, original.salt);
        assert_eq!(decrypt(&written, "pw123").unwrap(), b"title = \"new\"\n");
    }

    #[test]
    fn test_encrypt_file_and_decrypt_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("cmdb.toml");
        fs::write(&path, "title = \"hi\"\n").unwrap();

        let source = CountingSource::new("pw123");
        let store = TransparentStore::new(PasswordCache::new(MemoryCacheStore::new()), &source);

        store.encrypt_file(&path).unwrap();
        assert!(store.is_encrypted(&path).unwrap());
        assert!(matches!(
            store.encrypt_file(&path),
            Err(CmdbError::AlreadyEncrypted(_))
        ));

        // the password entered for encryption was cached
        store.decrypt_file(&path).unwrap();
        assert_eq!(source.calls.get(), 1);
        assert_eq!(fs::read(&path).unwrap(), b"title = \"hi\"\n");
        assert!(matches!(
            store.decrypt_file(&path),
            Err(CmdbError::NotEncrypted(_))
        ));
    }

    #[test]
    fn test_explicit_password_wins_over_cache() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("other.toml");
        write_encrypted(&path, b"title = \"hi\"\n", "right");

        let store = TransparentStore::new(
            cached("password-for-another-file", 5),
            FixedPassword::new("right"),
        );
        store.decrypt_file(&path).unwrap();

        assert_eq!(fs::read(&path).unwrap(), b"title = \"hi\"\n");
        assert_eq!(store.cache().read().unwrap().password().as_str(), "right");
    }

    #[test]
    fn test_explicit_password_load_recaches() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("cmdb.toml");
        write_encrypted(&path, b"title = \"hi\"", "pw123");

        let store = TransparentStore::new(cached("stale", 30), FixedPassword::new("pw123"));
        assert_eq!(store.load(&path).unwrap(), b"title = \"hi\"");

        // the follow-up save re-encrypts under the explicit password
        store.save(&path, b"title = \"bye\"", None).unwrap();
        let written = Envelope::from_json(&fs::read(&path).unwrap()).unwrap();
        assert_eq!(decrypt(&written, "pw123").unwrap(), b"title = \"bye\"");
    }

    #[test]
    fn test_wrong_explicit_password_keeps_cache() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("cmdb.toml");
        write_encrypted(&path, b"title = \"hi\"", "pw123");

        let store = TransparentStore::new(cached("pw123", 30), FixedPassword::new("wrong"));
        assert!(store.load(&path).unwrap_err().is_authentication());
        assert_eq!(store.cache().read().unwrap().password().as_str(), "pw123");
    }
}
