use std::sync::Arc;

use axum::{Extension, Router, routing::get};
use reqwest::Url;
use tokio::{net::TcpListener, sync::Mutex};

use crate::{api, config::Config, types::AuthSession};

const DEFAULT_CALLBACK_PATH: &str = "/callback";

pub fn router(config: Arc<Config>, state: Arc<Mutex<Option<AuthSession>>>) -> Router {
    let path = callback_path(&config.redirect_uri);

    Router::new()
        .route(&path, get(api::callback))
        .layer(Extension(state))
        .layer(Extension(config))
}

pub async fn start_api_server(
    listener: TcpListener,
    config: Arc<Config>,
    state: Arc<Mutex<Option<AuthSession>>>,
) -> std::io::Result<()> {
    axum::serve(listener, router(config, state)).await
}

/// Path component of the redirect URI the callback has to be served on.
pub fn callback_path(redirect_uri: &str) -> String {
    match Url::parse(redirect_uri) {
        Ok(url) if url.path() != "/" => url.path().to_string(),
        _ => DEFAULT_CALLBACK_PATH.to_string(),
    }
}
