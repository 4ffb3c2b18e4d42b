use std::path::{Path, PathBuf};

use serde::{Serialize, de::DeserializeOwned};

use crate::error::CacheError;

mod auth;
mod genres;
mod library;

pub use auth::TokenManager;
pub use genres::GenreManager;
pub use library::LibraryManager;

/// Resolves `relative` inside the application's local data directory.
pub fn data_path(relative: &str) -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("splister");
    path.push(relative);
    path
}

async fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, CacheError> {
    let content = async_fs::read_to_string(path).await?;
    Ok(serde_json::from_str(&content)?)
}

async fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), CacheError> {
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent).await?;
    }

    let json = serde_json::to_string_pretty(value)?;
    async_fs::write(path, json).await?;
    Ok(())
}

/// Deletes a cache file. Returns `false` when there was nothing to delete.
async fn remove_file(path: &Path) -> Result<bool, CacheError> {
    match async_fs::remove_file(path).await {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(CacheError::Io(e)),
    }
}
