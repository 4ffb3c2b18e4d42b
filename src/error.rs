//! Error types for the Spotify client, configuration and local caches.

use thiserror::Error;

/// Errors that can occur when talking to the Spotify Web API or the
/// Spotify accounts service.
#[derive(Error, Debug)]
pub enum SpotifyError {
    /// HTTP request failed or the response body could not be decoded
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Spotify answered with a non-success status
    #[error("Spotify API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// The access token was rejected
    #[error("Access token rejected by Spotify. Please run splister auth")]
    Unauthorized,

    /// Spotify asked us to back off for longer than we are willing to wait
    #[error("Rate limited, retry after {retry_after_secs} seconds")]
    RateLimited { retry_after_secs: u64 },

    /// Token exchange or refresh failed
    #[error("Token request failed: {0}")]
    Token(String),

    /// The local callback server could not listen on its address
    #[error("Cannot listen on {address}: {source}. Check SERVER_ADDRESS")]
    CallbackServer {
        address: std::net::SocketAddr,
        #[source]
        source: std::io::Error,
    },

    /// Request body could not be encoded
    #[error("cannot encode request body: {0}")]
    Encode(#[from] serde_json::Error),

    /// A URL could not be built
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

/// Errors raised while reading the configuration from the environment.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error(
        "{0} is not set. Create a Spotify app at developer.spotify.com and add its credentials to the .env file"
    )]
    Missing(&'static str),

    #[error(
        "{0} still holds the placeholder value. Replace it with the credentials of your Spotify app"
    )]
    Placeholder(&'static str),

    #[error("{key} is invalid: {reason}")]
    Invalid { key: &'static str, reason: String },
}

/// Errors raised by the on-disk caches.
#[derive(Error, Debug)]
pub enum CacheError {
    #[error("cache I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("cache content is invalid: {0}")]
    Serde(#[from] serde_json::Error),
}
