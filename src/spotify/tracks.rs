use crate::{
    error::SpotifyError,
    spotify::SpotifyClient,
    types::{AudioFeatures, AudioFeaturesResponse, SavedTracksPage},
};

/// Largest page the saved tracks endpoint hands out.
pub const SAVED_TRACKS_PAGE_LIMIT: u32 = 50;

/// Most track IDs the audio features endpoint accepts at once.
pub const AUDIO_FEATURES_BATCH_SIZE: usize = 100;

/// Retrieves one page of the user's liked songs.
///
/// Pass `None` for the first page and the `next` link of the previous page
/// afterwards. The last page has no `next` link.
///
/// # Example
///
/// ```
/// let mut next = None;
/// loop {
///     let page = get_saved_tracks_page(&client, next.as_deref()).await?;
///     // ...
///     match page.next {
///         Some(url) => next = Some(url),
///         None => break,
///     }
/// }
/// ```
pub async fn get_saved_tracks_page(
    client: &SpotifyClient,
    next: Option<&str>,
) -> Result<SavedTracksPage, SpotifyError> {
    let url = match next {
        Some(url) => url.to_string(),
        None => format!(
            "me/tracks?limit={limit}&offset=0",
            limit = SAVED_TRACKS_PAGE_LIMIT
        ),
    };

    client.get_json::<SavedTracksPage>(&url).await
}

/// Retrieves audio features for up to [`AUDIO_FEATURES_BATCH_SIZE`] tracks.
///
/// Spotify answers with `null` for tracks it has no analysis for; those are
/// left out of the result, so the result may be shorter than `ids`.
pub async fn get_audio_features(
    client: &SpotifyClient,
    ids: &[String],
) -> Result<Vec<AudioFeatures>, SpotifyError> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }

    let url = format!("audio-features?ids={ids}", ids = ids.join(","));
    let response = client.get_json::<AudioFeaturesResponse>(&url).await?;

    Ok(response.audio_features.into_iter().flatten().collect())
}
