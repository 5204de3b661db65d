//! Display formatting for terminal output

pub mod entry;

pub use entry::{format_entry, format_list, format_namespaces};
