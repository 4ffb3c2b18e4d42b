//! Configuration management for the genre playlist organizer.
//!
//! Configuration values come from environment variables and a `.env` file in
//! the local data directory. The lookup order is:
//! 1. Environment variables (highest priority)
//! 2. `.env` file in the local data directory
//! 3. Application defaults (everything except the client credentials)

use std::{env, net::SocketAddr, path::PathBuf, str::FromStr};

use crate::error::ConfigError;

pub const CLIENT_ID_KEY: &str = "SPOTIFY_API_AUTH_CLIENT_ID";
pub const CLIENT_SECRET_KEY: &str = "SPOTIFY_API_AUTH_CLIENT_SECRET";
pub const REDIRECT_URI_KEY: &str = "SPOTIFY_API_REDIRECT_URI";
pub const SCOPE_KEY: &str = "SPOTIFY_API_AUTH_SCOPE";
pub const AUTH_URL_KEY: &str = "SPOTIFY_API_AUTH_URL";
pub const TOKEN_URL_KEY: &str = "SPOTIFY_API_TOKEN_URL";
pub const API_URL_KEY: &str = "SPOTIFY_API_URL";
pub const SERVER_ADDRESS_KEY: &str = "SERVER_ADDRESS";

pub const DEFAULT_REDIRECT_URI: &str = "http://127.0.0.1:8888/callback";
pub const DEFAULT_AUTH_URL: &str = "https://accounts.spotify.com/authorize";
pub const DEFAULT_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
pub const DEFAULT_API_URL: &str = "https://api.spotify.com/v1";
pub const DEFAULT_SERVER_ADDRESS: &str = "127.0.0.1:8888";

/// Permissions needed to read the library and write playlists.
pub const DEFAULT_SCOPES: [&str; 5] = [
    "user-read-private",
    "user-read-email",
    "user-library-read",
    "playlist-modify-public",
    "playlist-modify-private",
];

const CLIENT_ID_PLACEHOLDER: &str = "your_spotify_client_id";
const CLIENT_SECRET_PLACEHOLDER: &str = "your_spotify_client_secret";

/// Loads environment variables from a `.env` file in the local data directory.
///
/// The file lives in:
/// - Linux: `~/.local/share/splister/.env`
/// - macOS: `~/Library/Application Support/splister/.env`
/// - Windows: `%LOCALAPPDATA%/splister/.env`
///
/// A missing file is not an error because every value can also come from the
/// process environment. Variables that are already set are not overridden.
///
/// # Errors
///
/// Returns an error if the directory cannot be created or the file exists but
/// cannot be parsed.
pub async fn load_env() -> Result<(), String> {
    let path = env_file_path();
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent)
            .await
            .map_err(|e| e.to_string())?;
    }

    if !path.is_file() {
        return Ok(());
    }

    dotenv::from_path(&path).map_err(|e| format!("{}: {}", path.display(), e))
}

/// Location of the user's `.env` file.
pub fn env_file_path() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("splister/.env");
    path
}

/// Runtime configuration for talking to Spotify.
#[derive(Debug, Clone)]
pub struct Config {
    /// Client ID of the registered Spotify application
    pub client_id: String,
    /// Client secret of the registered Spotify application
    pub client_secret: String,
    /// Callback URL registered in the Spotify application settings
    pub redirect_uri: String,
    /// Space separated list of requested permissions
    pub scope: String,
    /// Authorization endpoint the browser is sent to
    pub auth_url: String,
    /// Endpoint for exchanging and refreshing tokens
    pub token_url: String,
    /// Base URL of the Web API
    pub api_url: String,
    /// Where the local callback server listens
    pub server_address: SocketAddr,
}

impl Config {
    /// Builds the configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    ///
    /// Empty values are treated like unset ones.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let value = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let or_default = |key: &str, default: &str| value(key).unwrap_or_else(|| default.to_string());

        let client_id = value(CLIENT_ID_KEY).ok_or(ConfigError::Missing(CLIENT_ID_KEY))?;
        if client_id == CLIENT_ID_PLACEHOLDER {
            return Err(ConfigError::Placeholder(CLIENT_ID_KEY));
        }

        let client_secret =
            value(CLIENT_SECRET_KEY).ok_or(ConfigError::Missing(CLIENT_SECRET_KEY))?;
        if client_secret == CLIENT_SECRET_PLACEHOLDER {
            return Err(ConfigError::Placeholder(CLIENT_SECRET_KEY));
        }

        let server_address = or_default(SERVER_ADDRESS_KEY, DEFAULT_SERVER_ADDRESS);
        let server_address =
            SocketAddr::from_str(&server_address).map_err(|e| ConfigError::Invalid {
                key: SERVER_ADDRESS_KEY,
                reason: e.to_string(),
            })?;

        Ok(Self {
            client_id,
            client_secret,
            redirect_uri: or_default(REDIRECT_URI_KEY, DEFAULT_REDIRECT_URI),
            scope: or_default(SCOPE_KEY, &DEFAULT_SCOPES.join(" ")),
            auth_url: or_default(AUTH_URL_KEY, DEFAULT_AUTH_URL),
            token_url: or_default(TOKEN_URL_KEY, DEFAULT_TOKEN_URL),
            api_url: or_default(API_URL_KEY, DEFAULT_API_URL),
            server_address,
        })
    }
}
