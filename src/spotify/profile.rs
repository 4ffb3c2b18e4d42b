use crate::{error::SpotifyError, spotify::SpotifyClient, types::UserProfile};

/// Retrieves the profile of the user the access token belongs to.
///
/// The profile ID is the owner ID used when creating playlists.
pub async fn get_current_user(client: &SpotifyClient) -> Result<UserProfile, SpotifyError> {
    client.get_json::<UserProfile>("me").await
}
