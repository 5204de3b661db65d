//! Entry CLI commands
//!
//! Implements the commands that query and edit config entries.

use std::path::PathBuf;

use clap::{Subcommand, ValueEnum};
use toml::Value;

use crate::cache::CacheStore;
use crate::display::{format_entry, format_list, format_namespaces};
use crate::document::{import_json, Document};
use crate::error::{CmdbError, CmdbResult};
use crate::prompt::PasswordSource;

use super::Session;

/// Output format for `dump`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum DumpFormat {
    #[default]
    Toml,
    Json,
}

/// Entry subcommands
#[derive(Subcommand)]
pub enum EntryCommands {
    /// Show an entry
    #[command(alias = "q")]
    Get {
        /// Entry key
        key: String,
    },
    /// Set one or more attributes of an entry
    #[command(alias = "s")]
    Set {
        /// Entry key
        key: String,
        /// Attribute/value pairs: ATTR VALUE [ATTR VALUE ...]
        #[arg(required = true, num_args = 2..)]
        pairs: Vec<String>,
        /// Write the result to this file instead of the config file
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// Delete attributes of an entry
    #[command(alias = "d")]
    Del {
        /// Entry key
        key: String,
        /// Attributes to delete
        #[arg(required = true)]
        attrs: Vec<String>,
    },
    /// Remove an entry
    Clear {
        /// Entry key
        key: String,
    },
    /// Rename an entry
    Rename {
        /// Current key
        old: String,
        /// New key
        new: String,
    },
    /// List entries whose key contains QUERY
    #[command(aliases = ["l", "ls"])]
    List {
        /// Case-insensitive key filter
        query: Option<String>,
    },
    /// Show how many entries each namespace has
    Ns,
    /// Show entries whose key starts with PREFIX
    #[command(alias = "f")]
    Finger {
        /// Key prefix
        prefix: String,
    },
    /// Show entries whose key or attributes contain QUERY
    Scan {
        /// Case-insensitive search text
        query: String,
    },
    /// Print the whole config as TOML or JSON
    Dump {
        #[arg(value_enum, default_value_t = DumpFormat::Toml)]
        format: DumpFormat,
    },
    /// Convert a JSON object file to TOML entries and print them
    Import {
        /// JSON file to read
        file: PathBuf,
        /// Namespace prefix for the imported keys
        prefix: String,
    },
}

/// Handle entry commands
pub fn handle_entry_command<S: CacheStore, P: PasswordSource>(
    session: &Session<S, P>,
    cmd: EntryCommands,
) -> CmdbResult<()> {
    match cmd {
        EntryCommands::Get { key } => {
            let document = session.open_document()?;
            let value = document
                .get(&key)
                .ok_or_else(|| CmdbError::key_not_found(&key))?;
            print!("{}", format_entry(&key, value));
        }
        EntryCommands::Set { key, pairs, out } => {
            let mut document = session.open_document()?;
            apply_pairs(&mut document, &key, &pairs)?;
            session.save_document(&document, out.as_deref())?;
            print_if_present(&document, &key);
        }
        EntryCommands::Del { key, attrs } => {
            let mut document = session.open_document()?;
            for attr in &attrs {
                document.delete(&key, attr);
            }
            session.save_document(&document, None)?;
            print_if_present(&document, &key);
        }
        EntryCommands::Clear { key } => {
            let mut document = session.open_document()?;
            document.clear(&key);
            session.save_document(&document, None)?;
        }
        EntryCommands::Rename { old, new } => {
            let mut document = session.open_document()?;
            document.rename(&old, &new)?;
            session.save_document(&document, None)?;
            print_if_present(&document, &new);
        }
        EntryCommands::List { query } => {
            let document = session.open_document()?;
            print!("{}", format_list(&document.list(query.as_deref().unwrap_or(""))));
        }
        EntryCommands::Ns => {
            let document = session.open_document()?;
            print!("{}", format_namespaces(&document.namespaces()));
        }
        EntryCommands::Finger { prefix } => {
            let document = session.open_document()?;
            for key in document.finger(&prefix) {
                print_if_present(&document, key);
            }
        }
        EntryCommands::Scan { query } => {
            let document = session.open_document()?;
            for key in document.scan(&query) {
                print_if_present(&document, key);
            }
        }
        EntryCommands::Dump { format } => {
            let document = session.open_document()?;
            let output = match format {
                DumpFormat::Toml => document.to_toml()?,
                DumpFormat::Json => document.to_json()?,
            };
            println!("{}", output);
        }
        EntryCommands::Import { file, prefix } => {
            let json = std::fs::read_to_string(&file).map_err(|e| {
                CmdbError::Io(format!("Failed to read {}: {}", file.display(), e))
            })?;
            print!("{}", import_json(&json, &prefix)?);
        }
    }

    Ok(())
}

/// Apply `ATTR VALUE` pairs to an entry
fn apply_pairs(document: &mut Document, key: &str, pairs: &[String]) -> CmdbResult<()> {
    if pairs.len() % 2 != 0 {
        return Err(CmdbError::Validation(format!(
            "Attribute '{}' has no value",
            pairs[pairs.len() - 1]
        )));
    }

    for pair in pairs.chunks(2) {
        document.set(key, &pair[0], Value::String(pair[1].clone()));
    }
    Ok(())
}

fn print_if_present(document: &Document, key: &str) {
    if let Some(value) = document.get(key) {
        print!("{}", format_entry(key, value));
    }
}
