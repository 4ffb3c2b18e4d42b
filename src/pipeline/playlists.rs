use std::collections::HashMap;

use indicatif::ProgressBar;
use tracing::{debug, warn};

use crate::{
    error::SpotifyError,
    pipeline::classify::{Genre, GenreGroups},
    spotify::{self, SpotifyClient, playlist::ADD_TRACKS_BATCH_SIZE},
    types::{CreatePlaylistRequest, EnrichedTrack},
    utils,
};

pub const PLAYLIST_NAME_PREFIX: &str = "AI Generated";

pub fn playlist_name(genre: Genre) -> String {
    format!("{PLAYLIST_NAME_PREFIX} - {genre}")
}

pub fn playlist_description(genre: Genre) -> String {
    format!("Auto-generated {genre} playlist from your liked songs")
}

#[derive(Debug, Clone, Default)]
pub struct PlaylistOptions {
    /// Create playlists even if one with the same name exists
    pub force: bool,
    /// Only report what would be created
    pub dry_run: bool,
    /// Restrict to these genres; empty means all
    pub genres: Vec<Genre>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaylistStatus {
    Created {
        id: String,
        tracks_added: usize,
        failed_chunks: usize,
    },
    Skipped {
        id: String,
    },
    Planned {
        tracks: usize,
    },
    Failed(String),
}

#[derive(Debug, Clone)]
pub struct PlaylistOutcome {
    pub genre: Genre,
    pub name: String,
    pub status: PlaylistStatus,
}

impl PlaylistOutcome {
    pub fn is_failure(&self) -> bool {
        match &self.status {
            PlaylistStatus::Failed(_) => true,
            PlaylistStatus::Created { failed_chunks, .. } => *failed_chunks > 0,
            _ => false,
        }
    }
}

/// Creates the private playlist for `genre` and fills it with `tracks`.
///
/// Tracks are added in chunks of [`ADD_TRACKS_BATCH_SIZE`]. A failing chunk
/// is counted and skipped, the remaining chunks are still added.
pub async fn create_genre_playlist(
    client: &SpotifyClient,
    user_id: &str,
    genre: Genre,
    tracks: &[EnrichedTrack],
) -> Result<PlaylistStatus, SpotifyError> {
    let request = CreatePlaylistRequest {
        name: playlist_name(genre),
        description: playlist_description(genre),
        public: false,
        collaborative: false,
    };

    let playlist = spotify::playlist::create(client, user_id, &request).await?;
    debug!(id = %playlist.id, name = %playlist.name, "Playlist created");

    let uris = utils::playable_uris(tracks.iter().map(|t| &t.track));
    let mut tracks_added = 0;
    let mut failed_chunks = 0;

    for chunk in uris.chunks(ADD_TRACKS_BATCH_SIZE) {
        match spotify::playlist::add_tracks(client, &playlist.id, chunk).await {
            Ok(_) => tracks_added += chunk.len(),
            Err(e) => {
                warn!(playlist = %playlist.id, error = %e, "Failed to add tracks to playlist");
                failed_chunks += 1;
            }
        }
    }

    Ok(PlaylistStatus::Created {
        id: playlist.id,
        tracks_added,
        failed_chunks,
    })
}

/// Groups selected by the genre filter of `options`, in genre order.
fn selected<'a>(
    groups: &'a GenreGroups,
    options: &PlaylistOptions,
) -> Vec<(&'a Genre, &'a Vec<EnrichedTrack>)> {
    groups
        .iter()
        .filter(|(genre, _)| options.genres.is_empty() || options.genres.contains(*genre))
        .collect()
}

/// What a dry run would create, without talking to Spotify.
pub fn plan_all(groups: &GenreGroups, options: &PlaylistOptions) -> Vec<PlaylistOutcome> {
    selected(groups, options)
        .into_iter()
        .map(|(genre, tracks)| PlaylistOutcome {
            genre: *genre,
            name: playlist_name(*genre),
            status: PlaylistStatus::Planned {
                tracks: utils::playable_uris(tracks.iter().map(|t| &t.track)).len(),
            },
        })
        .collect()
}

/// Creates one playlist per genre group.
///
/// A failure for one genre is recorded in its outcome and does not stop the
/// others. Unless `options.force` is set, genres whose playlist already
/// exists are skipped. With `options.dry_run` this is [`plan_all`].
pub async fn create_all(
    client: &SpotifyClient,
    user_id: &str,
    groups: &GenreGroups,
    options: &PlaylistOptions,
    pb: &ProgressBar,
) -> Vec<PlaylistOutcome> {
    if options.dry_run {
        return plan_all(groups, options);
    }

    let selected = selected(groups, options);
    pb.set_length(selected.len() as u64);
    pb.set_position(0);

    let existing: HashMap<String, String> = if options.force {
        HashMap::new()
    } else {
        match spotify::playlist::list_current_user_playlists(client).await {
            Ok(playlists) => playlists.into_iter().map(|p| (p.name, p.id)).collect(),
            Err(e) => {
                warn!(error = %e, "Failed to check for existing playlists");
                HashMap::new()
            }
        }
    };

    let mut outcomes = Vec::with_capacity(selected.len());

    for (genre, tracks) in selected {
        let name = playlist_name(*genre);
        pb.set_message(format!("Creating {genre} playlist..."));

        let status = match existing.get(&name) {
            Some(id) => PlaylistStatus::Skipped { id: id.clone() },
            None => match create_genre_playlist(client, user_id, *genre, tracks).await {
                Ok(status) => status,
                Err(e) => PlaylistStatus::Failed(e.to_string()),
            },
        };

        outcomes.push(PlaylistOutcome {
            genre: *genre,
            name,
            status,
        });
        pb.inc(1);
    }

    outcomes
}
