use std::path::{Path, PathBuf};

use chrono::Utc;
use tracing::{debug, warn};

use crate::{
    config::Config,
    error::{CacheError, SpotifyError},
    spotify,
    types::Token,
};

/// Seconds before the real expiry at which a token is treated as expired.
const EXPIRY_BUFFER_SECS: u64 = 240;

pub struct TokenManager {
    token: Token,
    path: PathBuf,
}

impl TokenManager {
    pub fn new(token: Token) -> Self {
        Self::with_path(token, Self::token_path())
    }

    pub fn with_path(token: Token, path: impl Into<PathBuf>) -> Self {
        TokenManager {
            token,
            path: path.into(),
        }
    }

    pub async fn load() -> Result<Self, CacheError> {
        Self::load_from(Self::token_path()).await
    }

    pub async fn load_from(path: impl AsRef<Path>) -> Result<Self, CacheError> {
        let path = path.as_ref();
        let token: Token = super::read_json(path).await?;
        Ok(Self::with_path(token, path))
    }

    pub async fn persist(&self) -> Result<(), CacheError> {
        super::write_json(&self.path, &self.token).await
    }

    /// Access token that is valid for at least a few more minutes.
    ///
    /// Refreshes and persists the token when it is about to expire. A failed
    /// persist is only logged since the fresh token is still usable.
    pub async fn get_valid_token(&mut self, config: &Config) -> Result<String, SpotifyError> {
        if self.is_expired_at(Utc::now().timestamp() as u64) {
            if self.token.refresh_token.is_empty() {
                return Err(SpotifyError::Token(
                    "token expired and no refresh token is available".to_string(),
                ));
            }

            debug!("Access token expired, refreshing");
            self.token = spotify::auth::refresh_token(config, &self.token).await?;
            if let Err(e) = self.persist().await {
                warn!(error = %e, "Cannot cache refreshed token");
            }
        }

        Ok(self.token.access_token.clone())
    }

    pub fn is_expired_at(&self, now: u64) -> bool {
        now + EXPIRY_BUFFER_SECS >= self.token.obtained_at + self.token.expires_in
    }

    pub fn current_token(&self) -> &Token {
        &self.token
    }

    /// Removes the cached token. Returns `false` when none was cached.
    pub async fn clear() -> Result<bool, CacheError> {
        super::remove_file(&Self::token_path()).await
    }

    fn token_path() -> PathBuf {
        super::data_path("cache/token.json")
    }
}
