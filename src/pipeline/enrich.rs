use std::collections::HashMap;

use indicatif::ProgressBar;
use tracing::{debug, warn};

use crate::{
    error::SpotifyError,
    spotify::{self, SpotifyClient, tracks::AUDIO_FEATURES_BATCH_SIZE},
    types::{AudioFeatures, EnrichedTrack, SavedTrack},
};

/// Fetches every liked song, following the `next` links.
///
/// A failing page aborts the whole fetch since a partial library would
/// silently produce incomplete playlists.
pub async fn fetch_saved_tracks(
    client: &SpotifyClient,
    pb: &ProgressBar,
) -> Result<Vec<SavedTrack>, SpotifyError> {
    pb.set_message("Fetching liked songs...");
    pb.set_position(0);

    let mut songs: Vec<SavedTrack> = Vec::new();
    let mut next: Option<String> = None;

    loop {
        let page = spotify::tracks::get_saved_tracks_page(client, next.as_deref()).await?;
        songs.extend(page.items);

        pb.set_length(page.total);
        pb.set_position(songs.len() as u64);

        match page.next {
            // A `next` pointing at the page just fetched would loop forever
            Some(url) if next.as_deref() == Some(url.as_str()) => {
                warn!(url = %url, "Liked songs page links to itself, stopping");
                break;
            }
            Some(url) => next = Some(url),
            None => break,
        }
    }

    debug!(count = songs.len(), "Fetched liked songs");
    Ok(songs)
}

/// Fetches audio features for `ids` in batches, keyed by track ID.
///
/// A failing batch is logged and skipped; its tracks simply end up without
/// features.
pub async fn fetch_audio_features(
    client: &SpotifyClient,
    ids: &[String],
    pb: &ProgressBar,
) -> HashMap<String, AudioFeatures> {
    pb.set_message("Fetching audio features in batches...");
    pb.set_length(ids.len() as u64);
    pb.set_position(0);

    let mut features_by_id = HashMap::new();

    for (index, batch) in ids.chunks(AUDIO_FEATURES_BATCH_SIZE).enumerate() {
        match spotify::tracks::get_audio_features(client, batch).await {
            Ok(features) => {
                for f in features {
                    features_by_id.insert(f.id.clone(), f);
                }
            }
            Err(e) => warn!(batch = index, error = %e, "Skipping audio features batch"),
        }

        pb.inc(batch.len() as u64);
    }

    features_by_id
}

/// Genre tags of the first artist of every track, in track order.
///
/// Each distinct artist is requested once. Tracks without an artist ID and
/// artists that cannot be fetched get no tags.
pub async fn fetch_artist_genres(
    client: &SpotifyClient,
    tracks: &[SavedTrack],
    pb: &ProgressBar,
) -> Vec<Vec<String>> {
    pb.set_message("Fetching genres for each song...");
    pb.set_length(tracks.len() as u64);
    pb.set_position(0);

    let mut genres_by_artist: HashMap<String, Vec<String>> = HashMap::new();
    let mut genres = Vec::with_capacity(tracks.len());

    for saved in tracks {
        let artist_id = saved.track.artists.first().and_then(|a| a.id.as_deref());

        let track_genres = match artist_id {
            Some(id) => match genres_by_artist.get(id) {
                Some(cached) => cached.clone(),
                None => {
                    let fetched = match spotify::artists::get_artist(client, id).await {
                        Ok(artist) => artist.genres,
                        Err(e) => {
                            warn!(artist = id, error = %e, "Cannot fetch artist genres");
                            Vec::new()
                        }
                    };
                    genres_by_artist.insert(id.to_string(), fetched.clone());
                    fetched
                }
            },
            None => Vec::new(),
        };

        debug!(
            track = %saved.track.name,
            genres = %track_genres.join(", "),
            "Processed song"
        );
        genres.push(track_genres);
        pb.inc(1);
    }

    genres
}

/// Runs the whole enrichment: liked songs, audio features, artist genres.
///
/// The result keeps library order, one entry per liked song.
pub async fn enrich_library(
    client: &SpotifyClient,
    pb: &ProgressBar,
) -> Result<Vec<EnrichedTrack>, SpotifyError> {
    let songs = fetch_saved_tracks(client, pb).await?;

    let ids: Vec<String> = songs
        .iter()
        .filter_map(|s| s.track.id.clone())
        .collect();
    let features = fetch_audio_features(client, &ids, pb).await;
    let genres = fetch_artist_genres(client, &songs, pb).await;

    let enriched = songs
        .into_iter()
        .zip(genres)
        .map(|(saved, genres)| {
            let audio_features = saved
                .track
                .id
                .as_ref()
                .and_then(|id| features.get(id).cloned());
            EnrichedTrack {
                added_at: saved.added_at,
                track: saved.track,
                genres,
                audio_features,
            }
        })
        .collect();

    Ok(enriched)
}
