//! SoundCloud Playlist CLI Library
//!
//! This library keeps a SoundCloud OAuth credential fresh in a local SQLite
//! store and uses it to reorder, rename and download playlist tracks.
//!
//! # Modules
//!
//! - `cli` - Command-line interface implementations
//! - `config` - Configuration management and environment variables
//! - `error` - Error taxonomy shared by every layer
//! - `soundcloud` - Lazily authenticated SoundCloud API client
//! - `store` - Credential persistence
//! - `types` - Data structures and type definitions
//!
//! # Example
//!
//! ```
//! use scplcli::{config, soundcloud::SoundCloudClient, store::SqliteCredentialStore};
//!
//! fn main() -> scplcli::Result<()> {
//!     config::load_env()?;
//!     let settings = config::Settings::from_env()?;
//!     let store = SqliteCredentialStore::new(&settings.database);
//!     let mut client = SoundCloudClient::new(settings, store)?;
//!     let ids = client.list_track_ids(123)?;
//!     client.update_playlist(123, &ids.into_iter().rev().collect::<Vec<_>>())?;
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod soundcloud;
pub mod store;
pub mod types;

pub use error::{Error, Result};

// Console output for the CLI. Library code logs through `tracing` instead.

/// `[o] message` in blue, on stdout.
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// `[✓] message` in green, on stdout.
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// `[!] message` in red on stderr, then exits with status 1.
///
/// Only for failures the CLI cannot recover from; nothing after the call runs.
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    eprintln!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// `[!] message` in yellow, on stderr.
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    eprintln!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}
