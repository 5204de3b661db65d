//! cmdb - TOML config manager with transparent at-rest encryption
//!
//! The config file is an ordinary TOML document that can be encrypted in
//! place. Once encrypted, every command still reads and writes it as TOML:
//! the storage layer decrypts on load and re-encrypts on save, and a
//! short-lived password cache keeps consecutive commands from prompting.
//!
//! # Architecture
//!
//! - `crypto`: PBKDF2 key derivation, AES-256-GCM, the envelope format
//! - `cache`: sliding-expiry password cache and its backing stores
//! - `prompt`: password sources (terminal, fixed)
//! - `storage`: atomic file I/O and the transparent encryption wrapper
//! - `document`: the TOML entry tree
//! - `config`: path resolution
//! - `cli` / `display`: command handlers and output formatting
//!
//! # Example
//!
//! ```rust,ignore
//! use cmdb::cache::{FileCacheStore, PasswordCache};
//! use cmdb::config::CmdbPaths;
//! use cmdb::prompt::TerminalPrompt;
//! use cmdb::storage::TransparentStore;
//!
//! let paths = CmdbPaths::new()?;
//! let cache = PasswordCache::new(FileCacheStore::new(paths.cache_file()));
//! let store = TransparentStore::new(cache, TerminalPrompt);
//! let plaintext = store.load(paths.config_file())?;
//! ```

pub mod cache;
pub mod cli;
pub mod config;
pub mod crypto;
pub mod display;
pub mod document;
pub mod error;
pub mod prompt;
pub mod storage;

pub use error::{CmdbError, CmdbResult};
