use std::{collections::HashMap, sync::Arc};

use axum::{Extension, extract::Query, response::Html};
use tokio::sync::Mutex;

use crate::{config::Config, spotify, types::AuthSession, warning};

pub async fn callback(
    Query(params): Query<HashMap<String, String>>,
    Extension(shared_state): Extension<Arc<Mutex<Option<AuthSession>>>>,
    Extension(config): Extension<Arc<Config>>,
) -> Html<&'static str> {
    let mut state = shared_state.lock().await;
    let Some(session) = state.as_mut() else {
        return Html("<h4>No login in progress.</h4>");
    };

    if let Some(error) = params.get("error") {
        session.error = Some(format!("Authorization failed: {error}"));
        return Html("<h4>Login failed.</h4><p>Access was not granted.</p>");
    }

    if params.get("state") != Some(&session.state) {
        session.error = Some("Authorization failed: state mismatch".to_string());
        return Html("<h4>Login failed.</h4><p>Invalid state.</p>");
    }

    let Some(code) = params.get("code") else {
        session.error = Some("Authorization failed: missing authorization code".to_string());
        return Html("<h4>Missing authorization code.</h4>");
    };

    match spotify::auth::exchange_code(&config, code).await {
        Ok(token) => {
            session.token = Some(token);
            Html("<h2>Authentication successful.</h2><p>Close browser window.</p>")
        }
        Err(e) => {
            warning!("Token exchange failed: {}", e);
            session.error = Some(e.to_string());
            Html("<h4>Login failed.</h4>")
        }
    }
}
