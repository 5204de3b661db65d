//! Path management for cmdb
//!
//! ## Path Resolution Order
//!
//! 1. `CMDB_HOME` environment variable (if set) replaces the home directory
//! 2. Otherwise the user's home directory
//!
//! Under that home, the config file defaults to `.config/cmdb/cmdb.toml`
//! and the password cache lives in `.cmdbrc`.

use std::fs;
use std::path::{Path, PathBuf};

use directories::BaseDirs;

use crate::error::{CmdbError, CmdbResult};

/// Environment variable overriding the home directory
pub const HOME_ENV: &str = "CMDB_HOME";

/// File name of the password cache
pub const CACHE_FILE_NAME: &str = ".cmdbrc";

/// Manages all paths used by cmdb
#[derive(Debug, Clone)]
pub struct CmdbPaths {
    home_dir: PathBuf,
    config_file: PathBuf,
}

impl CmdbPaths {
    /// Create a new CmdbPaths instance
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory cannot be determined.
    pub fn new() -> CmdbResult<Self> {
        let home_dir = match std::env::var_os(HOME_ENV) {
            Some(custom) if !custom.is_empty() => PathBuf::from(custom),
            _ => BaseDirs::new()
                .map(|dirs| dirs.home_dir().to_path_buf())
                .ok_or_else(|| CmdbError::Config("Could not determine home directory".into()))?,
        };
        Ok(Self::with_home_dir(home_dir))
    }

    /// Create CmdbPaths with a custom home directory (useful for testing)
    pub fn with_home_dir(home_dir: PathBuf) -> Self {
        let config_file = home_dir.join(".config").join("cmdb").join("cmdb.toml");
        Self {
            home_dir,
            config_file,
        }
    }

    /// Use `path` as the config file instead of the default
    pub fn with_config_file(mut self, path: PathBuf) -> Self {
        self.config_file = path;
        self
    }

    /// Get the home directory
    pub fn home_dir(&self) -> &Path {
        &self.home_dir
    }

    /// Get the config file path
    pub fn config_file(&self) -> &Path {
        &self.config_file
    }

    /// Get the password cache file path
    pub fn cache_file(&self) -> PathBuf {
        self.home_dir.join(CACHE_FILE_NAME)
    }

    /// Create an empty config file (and its directory) if none exists
    ///
    /// Returns true if the file was created.
    pub fn ensure_config_file(&self) -> CmdbResult<bool> {
        if self.config_file.exists() {
            return Ok(false);
        }

        if let Some(parent) = self.config_file.parent().filter(|p| !p.as_os_str().is_empty()) {
            create_private_dir(parent)?;
        }
        fs::write(&self.config_file, b"").map_err(|e| {
            CmdbError::Io(format!(
                "Failed to create config file {}: {}",
                self.config_file.display(),
                e
            ))
        })?;
        Ok(true)
    }
}

#[cfg(unix)]
fn create_private_dir(dir: &Path) -> CmdbResult<()> {
    use std::os::unix::fs::DirBuilderExt;

    fs::DirBuilder::new()
        .recursive(true)
        .mode(0o700)
        .create(dir)
        .map_err(|e| CmdbError::Io(format!("Failed to create directory {}: {}", dir.display(), e)))
}

#[cfg(not(unix))]
fn create_private_dir(dir: &Path) -> CmdbResult<()> {
    fs::create_dir_all(dir)
        .map_err(|e| CmdbError::Io(format!("Failed to create directory {}: {}", dir.display(), e)))
}
