//! Party Vote Backend Library
//!
//! Backend for a collaborative music-party application. Hosts log in through
//! Spotify, start a party with a track queue, and guests vote on the queued
//! tracks. The crate exposes the host data model, the storage boundary, the
//! repository that mediates every host mutation, and the HTTP layer on top.
//!
//! # Modules
//!
//! - `api` - HTTP route handlers and error mapping
//! - `cli` - Operator commands (serve, inspect hosts and parties)
//! - `config` - Environment based configuration
//! - `management` - The host repository and its error taxonomy
//! - `server` - Router assembly and server lifecycle
//! - `spotify` - Spotify OAuth and profile calls
//! - `store` - Document storage boundary and the JSON file store
//! - `types` - Host, party, playlist and track records
//! - `utils` - Small helpers
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use partyvote::{management::HostRepository, store::JsonFileStore, types::NewHost};
//!
//! #[tokio::main]
//! async fn main() -> partyvote::Res<()> {
//!     let repo = HostRepository::new(Arc::new(JsonFileStore::in_memory()));
//!     repo.create(NewHost::new("host-1")).await?;
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod cli;
pub mod config;
pub mod management;
pub mod server;
pub mod spotify;
pub mod store;
pub mod types;
pub mod utils;

/// Result alias for process level plumbing (startup, CLI commands).
///
/// Library code returns the typed errors of its module; this alias is for
/// the places that only need to report a failure and stop.
pub type Res<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Prints an informational message with a blue bullet point.
///
/// # Example
///
/// ```
/// info!("Listening on {}", addr);
/// ```
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a success message with a green checkmark.
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints an error message with a red exclamation mark and exits the program.
///
/// Only for fatal startup or CLI failures. Request handlers must never call
/// this; they report through [`warning!`] and return an error response.
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    eprintln!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// Prints a warning message with a yellow exclamation mark.
///
/// Used for recoverable failures: a storage write that was rolled back, an
/// identity provider that answered with an error, a rejected OAuth callback.
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    eprintln!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}
