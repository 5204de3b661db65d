use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use cmdb::cache::{FileCacheStore, PasswordCache};
use cmdb::cli::{handle_encrypt_command, handle_entry_command, Session};
use cmdb::config::CmdbPaths;
use cmdb::prompt::{FixedPassword, PasswordSource, TerminalPrompt};

#[derive(Parser)]
#[command(
    name = "cm",
    version,
    about = "Edit and query a TOML config file, optionally encrypted at rest",
    long_about = "cm manages a TOML config file of host entries. The file can be \
                  encrypted with AES-256-GCM; once encrypted, every command keeps \
                  working on it transparently, prompting for the password at most \
                  once every ten minutes."
)]
struct Cli {
    /// Config file path (defaults to ~/.config/cmdb/cmdb.toml)
    #[arg(short, long, global = true, env = "CMDB_CONFIG")]
    config: Option<PathBuf>,

    /// Use this password instead of prompting
    #[arg(long, global = true, env = "CMDB_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(flatten)]
    Entry(cmdb::cli::EntryCommands),

    #[command(flatten)]
    Encrypt(cmdb::cli::EncryptCommands),
}

fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();

    let mut paths = CmdbPaths::new()?;
    if let Some(config) = cli.config {
        paths = paths.with_config_file(config);
    }
    if paths.ensure_config_file()? {
        info!(path = %paths.config_file().display(), "created empty config file");
    }

    let cache = PasswordCache::new(FileCacheStore::new(paths.cache_file()));
    let source: Box<dyn PasswordSource> = match cli.password {
        Some(password) => Box::new(FixedPassword::new(password)),
        None => Box::new(TerminalPrompt),
    };
    let session = Session::new(paths.config_file().to_path_buf(), cache, source);

    match cli.command {
        Commands::Entry(cmd) => handle_entry_command(&session, cmd)?,
        Commands::Encrypt(cmd) => handle_encrypt_command(&session, cmd)?,
    }

    Ok(())
}

/// Log to stderr, filtered by `CMDB_LOG` (default: warnings only)
fn init_logging() {
    let filter = EnvFilter::try_from_env("CMDB_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
