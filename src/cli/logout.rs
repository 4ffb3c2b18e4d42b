use crate::{
    error::CacheError,
    management::{GenreManager, LibraryManager, TokenManager},
    success, warning,
};

pub async fn logout() {
    report("token", TokenManager::clear().await);
    report("liked songs", LibraryManager::clear().await);
    report("genre groups", GenreManager::clear().await);
    success!("Logged out.");
}

fn report(what: &str, result: Result<bool, CacheError>) {
    match result {
        Ok(true) => success!("Removed cached {}.", what),
        Ok(false) => {}
        Err(e) => warning!("Cannot remove cached {}. Err: {}", what, e),
    }
}
