use std::path::{Path, PathBuf};

use crate::{error::CacheError, types::EnrichedTrack, utils};

/// Cache of the enriched liked songs from the last `library update`.
pub struct LibraryManager {
    tracks: Vec<EnrichedTrack>,
    path: PathBuf,
}

impl LibraryManager {
    pub fn new(tracks: Vec<EnrichedTrack>) -> Self {
        Self::with_path(tracks, Self::cache_path())
    }

    pub fn with_path(tracks: Vec<EnrichedTrack>, path: impl Into<PathBuf>) -> Self {
        Self {
            tracks,
            path: path.into(),
        }
    }

    pub async fn load() -> Result<Self, CacheError> {
        Self::load_from(Self::cache_path()).await
    }

    pub async fn load_from(path: impl AsRef<Path>) -> Result<Self, CacheError> {
        let path = path.as_ref();
        let tracks: Vec<EnrichedTrack> = super::read_json(path).await?;
        Ok(Self::with_path(tracks, path))
    }

    pub async fn persist(&self) -> Result<(), CacheError> {
        super::write_json(&self.path, &self.tracks).await
    }

    pub fn tracks(&self) -> &[EnrichedTrack] {
        &self.tracks
    }

    pub fn into_tracks(self) -> Vec<EnrichedTrack> {
        self.tracks
    }

    pub fn count(&self) -> usize {
        self.tracks.len()
    }

    pub fn count_with_features(&self) -> usize {
        self.tracks
            .iter()
            .filter(|t| t.audio_features.is_some())
            .count()
    }

    pub fn count_with_genres(&self) -> usize {
        self.tracks.iter().filter(|t| !t.genres.is_empty()).count()
    }

    /// Tracks whose name, album or any artist contains `term`, ignoring case.
    pub fn search(&self, term: &str) -> Vec<&EnrichedTrack> {
        self.tracks
            .iter()
            .filter(|t| utils::track_matches(&t.track, term))
            .collect()
    }

    pub async fn clear() -> Result<bool, CacheError> {
        super::remove_file(&Self::cache_path()).await
    }

    fn cache_path() -> PathBuf {
        super::data_path("cache/library.json")
    }
}
