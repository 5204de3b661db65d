//! File I/O utilities with atomic writes
//!
//! Provides safe file operations that won't corrupt data on failure.

use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};

use crate::error::{CmdbError, CmdbResult};

/// Default mode for newly created config files
pub const CONFIG_FILE_MODE: u32 = 0o644;

/// Mode for files that hold secrets (owner read/write only)
pub const PRIVATE_FILE_MODE: u32 = 0o600;

/// Read a file's bytes, returning `None` if it doesn't exist
pub fn read_optional<P: AsRef<Path>>(path: P) -> CmdbResult<Option<Vec<u8>>> {
    let path = path.as_ref();
    match fs::read(path) {
        Ok(bytes) => Ok(Some(bytes)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(CmdbError::Io(format!(
            "Failed to read {}: {}",
            path.display(),
            e
        ))),
    }
}

/// Read a file's bytes, returning an error if it doesn't exist
pub fn read_required<P: AsRef<Path>>(path: P) -> CmdbResult<Vec<u8>> {
    let path = path.as_ref();
    fs::read(path).map_err(|e| CmdbError::Io(format!("Failed to read {}: {}", path.display(), e)))
}

/// Write bytes to a file atomically (write to temp, then rename)
///
/// The file is either completely written or not modified at all. A new
/// file gets `mode` (Unix only); an existing file keeps its permissions
/// unless `force_mode` is set, in which case `mode` is always applied.
pub fn write_atomic<P: AsRef<Path>>(
    path: P,
    data: &[u8],
    mode: u32,
    force_mode: bool,
) -> CmdbResult<()> {
    let path = path.as_ref();

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| {
            CmdbError::Io(format!(
                "Failed to create directory {}: {}",
                parent.display(),
                e
            ))
        })?;
    }

    let existing = fs::metadata(path).ok().map(|m| m.permissions());

    // Temp file in the same directory so the rename stays on one filesystem
    let temp_path = temp_path_for(path);
    let file = create_with_mode(&temp_path, mode)
        .map_err(|e| CmdbError::Io(format!("Failed to create temp file: {}", e)))?;

    let result = (|| -> CmdbResult<()> {
        let mut writer = BufWriter::new(file);
        writer
            .write_all(data)
            .map_err(|e| CmdbError::Io(format!("Failed to write data: {}", e)))?;
        writer
            .flush()
            .map_err(|e| CmdbError::Io(format!("Failed to flush data: {}", e)))?;
        writer
            .get_ref()
            .sync_all()
            .map_err(|e| CmdbError::Io(format!("Failed to sync data: {}", e)))?;

        if let (Some(permissions), false) = (existing, force_mode) {
            fs::set_permissions(&temp_path, permissions)
                .map_err(|e| CmdbError::Io(format!("Failed to copy permissions: {}", e)))?;
        }

        fs::rename(&temp_path, path)
            .map_err(|e| CmdbError::Io(format!("Failed to rename temp file: {}", e)))
    })();

    if result.is_err() {
        let _ = fs::remove_file(&temp_path);
    }
    result
}

/// Remove a file, treating a missing file as success
pub fn remove_if_exists<P: AsRef<Path>>(path: P) -> CmdbResult<()> {
    let path = path.as_ref();
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(CmdbError::Io(format!(
            "Failed to remove {}: {}",
            path.display(),
            e
        ))),
    }
}

fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

#[cfg(unix)]
fn create_with_mode(path: &Path, mode: u32) -> std::io::Result<File> {
    use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};

    let file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(mode)
        .open(path)?;
    // A stale temp file keeps its old mode; open() only applies it on create
    file.set_permissions(fs::Permissions::from_mode(mode))?;
    Ok(file)
}

#[cfg(not(unix))]
fn create_with_mode(path: &Path, _mode: u32) -> std::io::Result<File> {
    OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)
}
