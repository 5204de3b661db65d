//! CLI command handlers
//!
//! This module contains the implementation of CLI commands, bridging the
//! clap argument parsing with the document and storage layers.

pub mod encrypt;
pub mod entries;

pub use encrypt::{handle_encrypt_command, EncryptCommands};
pub use entries::{handle_entry_command, EntryCommands};

use std::path::{Path, PathBuf};

use crate::cache::{CacheStore, PasswordCache};
use crate::document::Document;
use crate::error::CmdbResult;
use crate::prompt::PasswordSource;
use crate::storage::TransparentStore;

/// The config file a command operates on, and how to read and write it
pub struct Session<S, P> {
    path: PathBuf,
    store: TransparentStore<S, P>,
}

impl<S: CacheStore, P: PasswordSource> Session<S, P> {
    /// Create a session for the config file at `path`
    pub fn new(path: PathBuf, cache: PasswordCache<S>, source: P) -> Self {
        Self {
            path,
            store: TransparentStore::new(cache, source),
        }
    }

    /// Get the config file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Get the transparent store
    pub fn store(&self) -> &TransparentStore<S, P> {
        &self.store
    }

    /// Load and parse the config file
    pub fn open_document(&self) -> CmdbResult<Document> {
        let plaintext = self.store.load(&self.path)?;
        Document::parse(&plaintext)
    }

    /// Serialize and save the document to the config file or `out`
    pub fn save_document(&self, document: &Document, out: Option<&Path>) -> CmdbResult<()> {
        let text = document.to_toml()?;
        self.store.save(&self.path, text.as_bytes(), out)
    }
}
