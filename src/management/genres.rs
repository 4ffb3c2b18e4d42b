use std::path::{Path, PathBuf};

use crate::{
    error::CacheError,
    pipeline::classify::{Genre, GenreGroups},
    types::EnrichedTrack,
};

/// Cache of the genre groups from the last `genres analyze`.
pub struct GenreManager {
    groups: GenreGroups,
    path: PathBuf,
}

impl GenreManager {
    pub fn new(groups: GenreGroups) -> Self {
        Self::with_path(groups, Self::cache_path())
    }

    pub fn with_path(groups: GenreGroups, path: impl Into<PathBuf>) -> Self {
        Self {
            groups,
            path: path.into(),
        }
    }

    pub async fn load() -> Result<Self, CacheError> {
        Self::load_from(Self::cache_path()).await
    }

    pub async fn load_from(path: impl AsRef<Path>) -> Result<Self, CacheError> {
        let path = path.as_ref();
        let groups: GenreGroups = super::read_json(path).await?;
        Ok(Self::with_path(groups, path))
    }

    pub async fn persist(&self) -> Result<(), CacheError> {
        super::write_json(&self.path, &self.groups).await
    }

    pub fn groups(&self) -> &GenreGroups {
        &self.groups
    }

    pub fn into_groups(self) -> GenreGroups {
        self.groups
    }

    pub fn tracks_for(&self, genre: Genre) -> Option<&[EnrichedTrack]> {
        self.groups.get(&genre).map(Vec::as_slice)
    }

    pub fn count_genres(&self) -> usize {
        self.groups.len()
    }

    pub fn count_tracks(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }

    pub async fn clear() -> Result<bool, CacheError> {
        super::remove_file(&Self::cache_path()).await
    }

    fn cache_path() -> PathBuf {
        super::data_path("cache/genres.json")
    }
}
