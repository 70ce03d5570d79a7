//! Configuration management for the party backend.
//!
//! Values come from environment variables, optionally seeded from `.env`
//! files. Lookup order:
//! 1. Environment variables (highest priority)
//! 2. `.env` in the working directory
//! 3. `.env` in the local data directory (`partyvote/.env`)
//! 4. Application defaults (where applicable)
//!
//! Everything is read once into a [`Config`] value at startup and passed down
//! explicitly; nothing below `main` reads the environment on its own.

use std::{env, net::SocketAddr, path::PathBuf, str::FromStr};

use thiserror::Error;

pub const DEFAULT_SERVER_ADDRESS: &str = "127.0.0.1:1000";
pub const DEFAULT_CORS_ORIGIN: &str = "http://localhost:3000";
pub const DEFAULT_SPOTIFY_SCOPE: &str = "user-read-email user-read-private";
pub const DEFAULT_SPOTIFY_AUTH_URL: &str = "https://accounts.spotify.com/authorize";
pub const DEFAULT_SPOTIFY_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
pub const DEFAULT_SPOTIFY_API_URL: &str = "https://api.spotify.com/v1";

/// `PARTY_STORE_PATH` value selecting a store that lives only in memory.
pub const IN_MEMORY_STORE: &str = ":memory:";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{name} is invalid: {reason}")]
    Invalid { name: &'static str, reason: String },
}

/// Where the host collection lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreLocation {
    InMemory,
    File(PathBuf),
}

impl StoreLocation {
    /// Reads `PARTY_STORE_PATH`, defaulting to `partyvote/hosts.json` in the
    /// local data directory.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        match lookup("PARTY_STORE_PATH").filter(|v| !v.trim().is_empty()) {
            Some(v) if v == IN_MEMORY_STORE => StoreLocation::InMemory,
            Some(v) => StoreLocation::File(PathBuf::from(v)),
            None => StoreLocation::File(default_store_path()),
        }
    }
}

impl std::fmt::Display for StoreLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreLocation::InMemory => write!(f, "in-memory"),
            StoreLocation::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Client credentials and endpoints of the Spotify accounts service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpotifyConfig {
    pub client_id: String,
    pub client_secret: String,
    /// Must match the redirect URI registered with the Spotify application.
    pub redirect_uri: String,
    pub scope: String,
    pub auth_url: String,
    pub token_url: String,
    pub api_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub server_addr: SocketAddr,
    pub cors_origin: String,
    pub store: StoreLocation,
    pub spotify: SpotifyConfig,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds the configuration from an arbitrary variable source.
    ///
    /// Blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let required = |name: &'static str| var(name).ok_or(ConfigError::Missing(name));
        let or_default = |name: &str, default: &str| var(name).unwrap_or_else(|| default.into());

        let server_addr = or_default("SERVER_ADDRESS", DEFAULT_SERVER_ADDRESS);
        let server_addr =
            SocketAddr::from_str(&server_addr).map_err(|e| ConfigError::Invalid {
                name: "SERVER_ADDRESS",
                reason: e.to_string(),
            })?;

        Ok(Self {
            server_addr,
            cors_origin: or_default("CORS_ALLOWED_ORIGIN", DEFAULT_CORS_ORIGIN),
            store: StoreLocation::from_lookup(&lookup),
            spotify: SpotifyConfig {
                client_id: required("SPOTIFY_CLIENT_ID")?,
                client_secret: required("SPOTIFY_CLIENT_SECRET")?,
                redirect_uri: required("SPOTIFY_CALLBACK_URL")?,
                scope: or_default("SPOTIFY_API_AUTH_SCOPE", DEFAULT_SPOTIFY_SCOPE),
                auth_url: or_default("SPOTIFY_API_AUTH_URL", DEFAULT_SPOTIFY_AUTH_URL),
                token_url: or_default("SPOTIFY_API_TOKEN_URL", DEFAULT_SPOTIFY_TOKEN_URL),
                api_url: or_default("SPOTIFY_API_URL", DEFAULT_SPOTIFY_API_URL),
            },
        })
    }
}

/// Loads `.env` files into the process environment.
///
/// The working directory file is read first so a checkout can override the
/// per-user file in the local data directory. Variables already present in
/// the environment are never overwritten, and missing files are skipped.
///
/// # Errors
///
/// Fails when the data directory cannot be created or a present `.env` file
/// cannot be parsed.
pub async fn load_env() -> Result<(), String> {
    let local = PathBuf::from(".env");
    if local.is_file() {
        dotenv::from_path(&local).map_err(|e| format!("{}: {}", local.display(), e))?;
    }

    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("partyvote/.env");
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent)
            .await
            .map_err(|e| e.to_string())?;
    }

    if path.is_file() {
        dotenv::from_path(&path).map_err(|e| format!("{}: {}", path.display(), e))?;
    }
    Ok(())
}

fn default_store_path() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("partyvote/hosts.json");
    path
}
