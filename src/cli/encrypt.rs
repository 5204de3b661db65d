//! Encryption CLI commands
//!
//! Provides commands for encrypting and decrypting a config file and for
//! forgetting the cached password.

use std::path::PathBuf;

use clap::Subcommand;

use crate::cache::CacheStore;
use crate::error::CmdbResult;
use crate::prompt::PasswordSource;

use super::Session;

/// Encryption management commands
#[derive(Subcommand)]
pub enum EncryptCommands {
    /// Encrypt a config file in place
    Encrypt {
        /// File to encrypt (defaults to the config file)
        file: Option<PathBuf>,
    },
    /// Decrypt a config file in place
    Decrypt {
        /// File to decrypt (defaults to the config file)
        file: Option<PathBuf>,
    },
    /// Forget the cached password
    #[command(alias = "lock")]
    Logout,
}

/// Handle encryption commands
pub fn handle_encrypt_command<S: CacheStore, P: PasswordSource>(
    session: &Session<S, P>,
    cmd: EncryptCommands,
) -> CmdbResult<()> {
    match cmd {
        EncryptCommands::Encrypt { file } => {
            let path = file.unwrap_or_else(|| session.path().to_path_buf());
            session.store().encrypt_file(&path)?;
            println!("File '{}' has been encrypted successfully", path.display());
        }
        EncryptCommands::Decrypt { file } => {
            let path = file.unwrap_or_else(|| session.path().to_path_buf());
            session.store().decrypt_file(&path)?;
            println!("File '{}' has been decrypted successfully", path.display());
        }
        EncryptCommands::Logout => {
            session.store().cache().clear()?;
            println!("Cached password cleared");
        }
    }

    Ok(())
}
