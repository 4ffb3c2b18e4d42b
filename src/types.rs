use serde::{Deserialize, Serialize};
use tabled::Tabled;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    pub access_token: String,
    pub refresh_token: String,
    pub scope: String,
    pub expires_in: u64,
    pub obtained_at: u64,
}

/// Wire shape of the accounts service token endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub scope: Option<String>,
    pub expires_in: u64,
}

/// State shared between the auth flow and the callback handler.
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub state: String,
    pub token: Option<Token>,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub display_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub product: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedTracksPage {
    pub items: Vec<SavedTrack>,
    pub next: Option<String>,
    pub total: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedTrack {
    pub added_at: String,
    pub track: Track,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    /// Local files carry no Spotify ID.
    pub id: Option<String>,
    pub name: String,
    pub uri: String,
    pub artists: Vec<SimpleArtist>,
    pub album: SimpleAlbum,
    #[serde(default)]
    pub duration_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimpleArtist {
    pub id: Option<String>,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimpleAlbum {
    pub id: Option<String>,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Artist {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub genres: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioFeatures {
    pub id: String,
    #[serde(default)]
    pub danceability: f64,
    #[serde(default)]
    pub energy: f64,
    #[serde(default)]
    pub valence: f64,
    #[serde(default)]
    pub acousticness: f64,
    #[serde(default)]
    pub instrumentalness: f64,
    #[serde(default)]
    pub liveness: f64,
    #[serde(default)]
    pub speechiness: f64,
    #[serde(default)]
    pub tempo: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AudioFeaturesResponse {
    pub audio_features: Vec<Option<AudioFeatures>>,
}

/// A liked song together with everything the classifiers look at.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedTrack {
    pub added_at: String,
    pub track: Track,
    pub genres: Vec<String>,
    pub audio_features: Option<AudioFeatures>,
}

impl EnrichedTrack {
    pub fn first_artist_name(&self) -> &str {
        self.track
            .artists
            .first()
            .map(|a| a.name.as_str())
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePlaylistRequest {
    pub name: String,
    pub description: String,
    pub public: bool,
    pub collaborative: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Playlist {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub public: Option<bool>,
    #[serde(default)]
    pub snapshot_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlaylistsPage {
    pub items: Vec<Option<Playlist>>,
    pub next: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddTracksRequest {
    pub uris: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotResponse {
    pub snapshot_id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorResponse {
    pub error: ApiErrorBody,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub status: Option<u16>,
    pub message: String,
}

#[derive(Tabled)]
pub struct ProfileTableRow {
    pub id: String,
    pub name: String,
    pub email: String,
    pub country: String,
    pub product: String,
}

#[derive(Tabled)]
pub struct TrackTableRow {
    pub name: String,
    pub artists: String,
    pub album: String,
    pub genres: String,
    #[tabled(rename = "dance/energy/valence/acoustic")]
    pub features: String,
}

#[derive(Tabled)]
pub struct GenreTableRow {
    pub genre: String,
    pub songs: usize,
    pub preview: String,
}

#[derive(Tabled)]
pub struct PlaylistTableRow {
    pub genre: String,
    pub playlist: String,
    pub status: String,
}
