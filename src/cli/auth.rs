use std::sync::Arc;

use tokio::sync::Mutex;

use crate::{error, info, management::TokenManager, spotify, success};

pub async fn auth() {
    let config = Arc::new(super::load_config());
    let shared_state = Arc::new(Mutex::new(None));

    info!("Waiting for authorization in the browser...");

    match spotify::auth::auth(Arc::clone(&config), shared_state).await {
        Ok(token) => {
            if let Err(e) = TokenManager::new(token).persist().await {
                error!("Failed to save token to cache: {}", e);
            }
            success!("Authentication successful!");
        }
        Err(e) => error!("Authentication failed: {}", e),
    }
}
