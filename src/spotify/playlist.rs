use crate::{
    error::SpotifyError,
    spotify::SpotifyClient,
    types::{AddTracksRequest, CreatePlaylistRequest, Playlist, PlaylistsPage, SnapshotResponse},
};

/// Most URIs a single add-tracks request may carry.
pub const ADD_TRACKS_BATCH_SIZE: usize = 100;

/// Creates a playlist owned by `user_id`.
pub async fn create(
    client: &SpotifyClient,
    user_id: &str,
    request: &CreatePlaylistRequest,
) -> Result<Playlist, SpotifyError> {
    client
        .post_json::<_, Playlist>(&format!("users/{user_id}/playlists"), request)
        .await
}

/// Appends up to [`ADD_TRACKS_BATCH_SIZE`] track URIs to a playlist.
pub async fn add_tracks(
    client: &SpotifyClient,
    playlist_id: &str,
    uris: &[String],
) -> Result<SnapshotResponse, SpotifyError> {
    let request = AddTracksRequest {
        uris: uris.to_vec(),
    };

    client
        .post_json::<_, SnapshotResponse>(&format!("playlists/{playlist_id}/tracks"), &request)
        .await
}

/// Retrieves every playlist of the current user, following pagination.
pub async fn list_current_user_playlists(
    client: &SpotifyClient,
) -> Result<Vec<Playlist>, SpotifyError> {
    let mut playlists = Vec::new();
    let mut url = "me/playlists?limit=50".to_string();

    loop {
        let page = client.get_json::<PlaylistsPage>(&url).await?;
        playlists.extend(page.items.into_iter().flatten());

        match page.next {
            Some(next) => url = next,
            None => break,
        }
    }

    Ok(playlists)
}

/// Looks up a playlist of the current user by its exact name.
pub async fn find_by_name(
    client: &SpotifyClient,
    name: &str,
) -> Result<Option<Playlist>, SpotifyError> {
    let playlists = list_current_user_playlists(client).await?;
    Ok(playlists.into_iter().find(|p| p.name == name))
}
