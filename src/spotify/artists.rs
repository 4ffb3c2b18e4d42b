use crate::{error::SpotifyError, spotify::SpotifyClient, types::Artist};

/// Retrieves a single artist including its genre tags.
///
/// # Arguments
///
/// * `client` - Authenticated Spotify client
/// * `artist_id` - Spotify ID of the artist
///
/// # Returns
///
/// - `Ok(Artist)` - The artist; `genres` is empty for artists Spotify has not tagged
/// - `Err(SpotifyError)` - Network error, unknown artist or other API error
///
/// # Example
///
/// ```
/// let artist = get_artist(&client, "4NHQUGzhtTLFvgF5SZesLK").await?;
/// println!("{} plays {}", artist.name, artist.genres.join(", "));
/// ```
pub async fn get_artist(client: &SpotifyClient, artist_id: &str) -> Result<Artist, SpotifyError> {
    client
        .get_json::<Artist>(&format!("artists/{id}", id = artist_id))
        .await
}
