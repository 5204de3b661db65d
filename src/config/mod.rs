//! Configuration module for cmdb
//!
//! Resolves where the config file and the password cache live.

pub mod paths;

pub use paths::CmdbPaths;
