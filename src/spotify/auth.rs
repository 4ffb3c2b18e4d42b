use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use chrono::Utc;
use reqwest::{Client, Url, header::AUTHORIZATION};
use tokio::{net::TcpListener, sync::Mutex};
use tracing::debug;

use crate::{
    config::Config,
    error::SpotifyError,
    server::start_api_server,
    types::{AuthSession, Token, TokenResponse},
    utils, warning,
};

/// How long the user gets to confirm access in the browser.
pub const AUTH_TIMEOUT: Duration = Duration::from_secs(120);

/// Runs the authorization code flow and returns the obtained token.
///
/// 1. Generates a random `state` and stores it in `shared_state`
/// 2. Binds the local callback server on `config.server_address`
/// 3. Opens the authorization URL in the default browser
/// 4. Waits until the callback handler stored a token or an error
///
/// Persisting the token is left to the caller.
///
/// # Errors
///
/// - The callback server cannot bind its address
/// - The user denied access or the state did not match
/// - No callback arrived within [`AUTH_TIMEOUT`]
pub async fn auth(
    config: Arc<Config>,
    shared_state: Arc<Mutex<Option<AuthSession>>>,
) -> Result<Token, SpotifyError> {
    let state = utils::generate_state();
    let auth_url = authorize_url(&config, &state)?;

    // Store state before the browser can hit the callback
    {
        let mut lock = shared_state.lock().await;
        *lock = Some(AuthSession {
            state,
            token: None,
            error: None,
        });
    }

    let listener = TcpListener::bind(config.server_address)
        .await
        .map_err(|source| SpotifyError::CallbackServer {
            address: config.server_address,
            source,
        })?;

    let server_state = Arc::clone(&shared_state);
    let server_config = Arc::clone(&config);
    let server = tokio::spawn(async move {
        if let Err(e) = start_api_server(listener, server_config, server_state).await {
            warning!("Callback server stopped: {}", e);
        }
    });

    if webbrowser::open(&auth_url).is_err() {
        warning!(
            "Failed to open browser. Please navigate to the following URL manually:\n{}",
            auth_url
        )
    }

    let result = wait_for_token(shared_state, AUTH_TIMEOUT).await;
    server.abort();
    result
}

/// URL the user has to visit to grant access.
pub fn authorize_url(config: &Config, state: &str) -> Result<String, SpotifyError> {
    let url = Url::parse_with_params(
        &config.auth_url,
        &[
            ("response_type", "code"),
            ("client_id", config.client_id.as_str()),
            ("scope", config.scope.as_str()),
            ("redirect_uri", config.redirect_uri.as_str()),
            ("state", state),
        ],
    )
    .map_err(|e| SpotifyError::InvalidUrl(format!("{}: {}", config.auth_url, e)))?;

    Ok(url.to_string())
}

/// Polls `shared_state` until the callback stored a token or an error.
pub async fn wait_for_token(
    shared_state: Arc<Mutex<Option<AuthSession>>>,
    max_wait: Duration,
) -> Result<Token, SpotifyError> {
    let start = Instant::now();

    while start.elapsed() < max_wait {
        let lock = shared_state.lock().await;
        if let Some(session) = lock.as_ref() {
            if let Some(token) = &session.token {
                return Ok(token.clone());
            }
            if let Some(error) = &session.error {
                return Err(SpotifyError::Token(error.clone()));
            }
        }
        drop(lock);
        tokio::time::sleep(Duration::from_millis(250)).await;
    }

    Err(SpotifyError::Token(
        "authentication timed out, no callback received".to_string(),
    ))
}

/// Exchanges the authorization code from the callback for a token.
pub async fn exchange_code(config: &Config, code: &str) -> Result<Token, SpotifyError> {
    request_token(
        config,
        &[
            ("grant_type", "authorization_code"),
            ("code", code),
            ("redirect_uri", config.redirect_uri.as_str()),
        ],
        None,
    )
    .await
}

/// Exchanges the refresh token of `previous` for a fresh access token.
///
/// Spotify may or may not rotate the refresh token and usually omits the
/// scope on refresh. Whatever the response leaves out is kept from
/// `previous`.
pub async fn refresh_token(config: &Config, previous: &Token) -> Result<Token, SpotifyError> {
    request_token(
        config,
        &[
            ("grant_type", "refresh_token"),
            ("refresh_token", previous.refresh_token.as_str()),
        ],
        Some(previous),
    )
    .await
}

async fn request_token(
    config: &Config,
    form: &[(&str, &str)],
    previous: Option<&Token>,
) -> Result<Token, SpotifyError> {
    debug!(url = %config.token_url, grant = ?form.first(), "Requesting token");

    let response = Client::new()
        .post(&config.token_url)
        .header(
            AUTHORIZATION,
            utils::basic_auth_header(&config.client_id, &config.client_secret),
        )
        .form(form)
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(SpotifyError::Token(format!("{status}: {body}")));
    }

    let body = response.json::<TokenResponse>().await?;

    Ok(Token {
        access_token: body.access_token,
        refresh_token: body
            .refresh_token
            .or_else(|| previous.map(|t| t.refresh_token.clone()))
            .unwrap_or_default(),
        scope: body
            .scope
            .or_else(|| previous.map(|t| t.scope.clone()))
            .unwrap_or_default(),
        expires_in: body.expires_in,
        obtained_at: Utc::now().timestamp() as u64,
    })
}
