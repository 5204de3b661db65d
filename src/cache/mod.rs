//! Password cache for cmdb
//!
//! Remembers the session password for a sliding window so that editing an
//! encrypted config doesn't prompt on every command.

pub mod entry;
pub mod password_cache;
pub mod store;

pub use entry::CacheEntry;
pub use password_cache::{PasswordCache, CACHE_EXPIRY_MINUTES};
pub use store::{CacheStore, FileCacheStore, MemoryCacheStore};
