//! Backing stores for the password cache
//!
//! A [`CacheStore`] holds at most one raw record. The file store is what
//! the CLI uses; the memory store lets the cache and the transparent
//! wrapper run without touching the user's home directory.

use std::cell::RefCell;
use std::path::PathBuf;

use crate::error::CmdbResult;
use crate::storage::file_io::{read_optional, remove_if_exists, write_atomic, PRIVATE_FILE_MODE};

/// Read / replace / delete access to a single cache record
pub trait CacheStore {
    /// Read the record, `None` if there is none
    fn read(&self) -> CmdbResult<Option<Vec<u8>>>;

    /// Replace the record wholesale
    fn replace(&self, record: &[u8]) -> CmdbResult<()>;

    /// Delete the record; succeeds if there is none
    fn delete(&self) -> CmdbResult<()>;
}

/// Cache record kept in one owner-only file
#[derive(Debug, Clone)]
pub struct FileCacheStore {
    path: PathBuf,
}

impl FileCacheStore {
    /// Create a store backed by `path`
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Get the backing file path
    pub fn path(&self) -> &PathBuf {
        &self.path
    }
}

impl CacheStore for FileCacheStore {
    fn read(&self) -> CmdbResult<Option<Vec<u8>>> {
        read_optional(&self.path)
    }

    fn replace(&self, record: &[u8]) -> CmdbResult<()> {
        write_atomic(&self.path, record, PRIVATE_FILE_MODE, true)
    }

    fn delete(&self) -> CmdbResult<()> {
        remove_if_exists(&self.path)
    }
}

/// Cache record kept in memory
#[derive(Debug, Default)]
pub struct MemoryCacheStore {
    record: RefCell<Option<Vec<u8>>>,
}

impl MemoryCacheStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding `record`
    pub fn with_record(record: impl Into<Vec<u8>>) -> Self {
        Self {
            record: RefCell::new(Some(record.into())),
        }
    }

    /// Check whether a record is present
    pub fn has_record(&self) -> bool {
        self.record.borrow().is_some()
    }
}

impl CacheStore for MemoryCacheStore {
    fn read(&self) -> CmdbResult<Option<Vec<u8>>> {
        Ok(self.record.borrow().clone())
    }

    fn replace(&self, record: &[u8]) -> CmdbResult<()> {
        *self.record.borrow_mut() = Some(record.to_vec());
        Ok(())
    }

    fn delete(&self) -> CmdbResult<()> {
        self.record.borrow_mut().take();
        Ok(())
    }
}
