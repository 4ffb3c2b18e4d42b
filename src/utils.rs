use std::collections::HashSet;

use base64::{Engine, engine::general_purpose::STANDARD};
use rand::{Rng, distr::Alphanumeric};

use crate::types::{AudioFeatures, SimpleArtist, Track};

const LOCAL_URI_PREFIX: &str = "spotify:local:";

/// Random value for the OAuth `state` parameter.
pub fn generate_state() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(16)
        .map(char::from)
        .collect()
}

/// `Authorization` header value for the accounts service.
pub fn basic_auth_header(client_id: &str, client_secret: &str) -> String {
    let credentials = STANDARD.encode(format!("{client_id}:{client_secret}"));
    format!("Basic {credentials}")
}

pub fn join_artist_names(artists: &[SimpleArtist]) -> String {
    artists
        .iter()
        .map(|a| a.name.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Cuts `value` to at most `max` characters, marking the cut with an ellipsis.
pub fn truncate(value: &str, max: usize) -> String {
    if value.chars().count() <= max {
        return value.to_string();
    }

    let mut cut: String = value.chars().take(max.saturating_sub(1)).collect();
    cut.push('…');
    cut
}

pub fn format_features(features: Option<&AudioFeatures>) -> String {
    match features {
        Some(f) => format!(
            "{:.2}/{:.2}/{:.2}/{:.2}",
            f.danceability, f.energy, f.valence, f.acousticness
        ),
        None => "-".to_string(),
    }
}

/// Local files cannot be added to playlists through the Web API.
pub fn is_local_uri(uri: &str) -> bool {
    uri.starts_with(LOCAL_URI_PREFIX)
}

/// URIs of `tracks` that can be added to a playlist, first occurrence wins.
pub fn playable_uris<'a, I>(tracks: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a Track>,
{
    let mut seen = HashSet::new();
    tracks
        .into_iter()
        .map(|t| t.uri.as_str())
        .filter(|uri| !uri.is_empty() && !is_local_uri(uri))
        .filter(|uri| seen.insert(*uri))
        .map(str::to_string)
        .collect()
}

/// Case-insensitive match of `term` against track, artist and album names.
pub fn track_matches(track: &Track, term: &str) -> bool {
    let term = term.to_lowercase();
    track.name.to_lowercase().contains(&term)
        || track.album.name.to_lowercase().contains(&term)
        || track
            .artists
            .iter()
            .any(|a| a.name.to_lowercase().contains(&term))
}
