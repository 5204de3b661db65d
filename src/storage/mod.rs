//! Storage layer for cmdb
//!
//! Raw file access with atomic writes, and the transparent encryption
//! wrapper the CLI reads and writes the config file through.

pub mod file_io;
pub mod transparent;

pub use file_io::{read_optional, read_required, write_atomic};
pub use transparent::TransparentStore;
