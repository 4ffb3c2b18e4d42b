//! # Spotify Integration Module
//!
//! Thin client for the parts of the Spotify Web API the organizer needs. Each
//! submodule covers one domain of the API:
//!
//! ```text
//! Pipeline / CLI
//!          ↓
//! Spotify Integration Layer
//!     ├── Authentication (authorization code flow)
//!     ├── Profile (current user)
//!     ├── Tracks (liked songs, audio features)
//!     ├── Artists (genre tags)
//!     └── Playlist Operations (list, create, add tracks)
//!          ↓
//! HTTP Layer (reqwest, JSON)
//! ```
//!
//! ## Error Handling
//!
//! All requests go through [`SpotifyClient`], which applies one retry policy:
//!
//! - **502 Bad Gateway / 503 Service Unavailable**: wait `retry_delay`, retry
//! - **429 Too Many Requests**: wait for `Retry-After` seconds if that is at
//!   most two minutes, otherwise give up with [`SpotifyError::RateLimited`]
//! - **401 Unauthorized**: [`SpotifyError::Unauthorized`], the user has to
//!   authenticate again
//! - anything else: [`SpotifyError::Api`] with Spotify's error message
//!
//! ## API Coverage
//!
//! - `GET /me` - Profile of the current user
//! - `GET /me/tracks` - Liked songs with pagination
//! - `GET /audio-features` - Audio features for up to 100 tracks
//! - `GET /artists/{id}` - Artist including genre tags
//! - `GET /me/playlists` - Playlists of the current user
//! - `POST /users/{user_id}/playlists` - Create new playlists
//! - `POST /playlists/{playlist_id}/tracks` - Add tracks to playlists
//! - `POST /api/token` - Token exchange and refresh operations

use std::time::Duration;

use reqwest::{Client, Method, Response, StatusCode, header::HeaderMap};
use serde::{Serialize, de::DeserializeOwned};
use tokio::time::sleep;
use tracing::{debug, warn};

use crate::{error::SpotifyError, types::ApiErrorResponse};

pub mod artists;
pub mod auth;
pub mod playlist;
pub mod profile;
pub mod tracks;

/// Longest `Retry-After` we are willing to sleep through.
pub const MAX_RETRY_AFTER_SECS: u64 = 120;

const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(10);
const DEFAULT_MAX_RETRIES: u32 = 3;

/// Authenticated handle on the Spotify Web API.
#[derive(Debug, Clone)]
pub struct SpotifyClient {
    http: Client,
    api_url: String,
    access_token: String,
    retry_delay: Duration,
    max_retries: u32,
}

impl SpotifyClient {
    pub fn new(api_url: impl Into<String>, access_token: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            api_url: api_url.into().trim_end_matches('/').to_string(),
            access_token: access_token.into(),
            retry_delay: DEFAULT_RETRY_DELAY,
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }

    /// Delay before retrying after a 502 or 503.
    pub fn with_retry_delay(mut self, retry_delay: Duration) -> Self {
        self.retry_delay = retry_delay;
        self
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// Resolves `path` against the API base URL.
    ///
    /// Absolute URLs, like the `next` links of paginated responses, are
    /// returned unchanged.
    pub fn endpoint(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }

        format!(
            "{base}/{path}",
            base = self.api_url,
            path = path.trim_start_matches('/')
        )
    }

    pub(crate) async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, SpotifyError> {
        let url = self.endpoint(path);
        let response = self.send(Method::GET, &url, None).await?;
        Ok(response.json::<T>().await?)
    }

    pub(crate) async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, SpotifyError>
    where
        B: Serialize,
        T: DeserializeOwned,
    {
        let url = self.endpoint(path);
        let body = serde_json::to_value(body)?;
        let response = self.send(Method::POST, &url, Some(&body)).await?;
        Ok(response.json::<T>().await?)
    }

    async fn send(
        &self,
        method: Method,
        url: &str,
        body: Option<&serde_json::Value>,
    ) -> Result<Response, SpotifyError> {
        let mut attempt = 0;

        loop {
            let mut request = self
                .http
                .request(method.clone(), url)
                .bearer_auth(&self.access_token);
            if let Some(body) = body {
                request = request.json(body);
            }

            debug!(%method, url, attempt, "Sending Spotify request");
            let response = request.send().await?;
            let status = response.status();
            if status.is_success() {
                return Ok(response);
            }

            attempt += 1;
            let retries_left = attempt <= self.max_retries;

            match status {
                StatusCode::BAD_GATEWAY | StatusCode::SERVICE_UNAVAILABLE if retries_left => {
                    warn!(%status, url, "Spotify unavailable, retrying");
                    sleep(self.retry_delay).await;
                }
                StatusCode::TOO_MANY_REQUESTS => {
                    let retry_after_secs = retry_after(response.headers()).unwrap_or(1);
                    if retry_after_secs > MAX_RETRY_AFTER_SECS || !retries_left {
                        return Err(SpotifyError::RateLimited { retry_after_secs });
                    }
                    warn!(retry_after_secs, url, "Rate limited by Spotify");
                    sleep(Duration::from_secs(retry_after_secs)).await;
                }
                StatusCode::UNAUTHORIZED => return Err(SpotifyError::Unauthorized),
                _ => return Err(api_error(response).await),
            }
        }
    }
}

/// Seconds from a `Retry-After` header, if present and numeric.
pub fn retry_after(headers: &HeaderMap) -> Option<u64> {
    headers
        .get(reqwest::header::RETRY_AFTER)?
        .to_str()
        .ok()?
        .trim()
        .parse::<u64>()
        .ok()
}

async fn api_error(response: Response) -> SpotifyError {
    let status = response.status().as_u16();
    let text = response.text().await.unwrap_or_default();
    let message = match serde_json::from_str::<ApiErrorResponse>(&text) {
        Ok(body) => body.error.message,
        Err(_) if text.is_empty() => "no error details".to_string(),
        Err(_) => text,
    };

    SpotifyError::Api { status, message }
}
