//! # CLI Module
//!
//! User-facing commands. Each command loads what it needs from the local
//! caches, talks to Spotify through [`crate::spotify`] and the
//! [`crate::pipeline`], and reports progress with spinners, tables and the
//! colored status macros.
//!
//! ## Commands
//!
//! - [`auth`] - Authorize with Spotify and cache the token
//! - [`me`] - Show the profile the cached token belongs to
//! - [`update_library`] / [`list_library`] - Fetch and enrich liked songs, list them
//! - [`analyze_genres`] / [`list_genres`] - Classify the cached library, show the groups
//! - [`playlist`] - Create one playlist per cached genre group
//! - [`organize`] - All of the above in one run
//! - [`logout`] - Remove every cached file
//!
//! ## Usage Patterns
//!
//! ```bash
//! splister auth                       # Authenticate with Spotify
//! splister library update             # Fetch liked songs with features and genres
//! splister genres analyze             # Sort them into genres
//! splister playlist --dry-run         # Preview the playlists
//! splister playlist                   # Create them
//! ```
//!
//! Fatal problems (missing configuration, no token) end the process through
//! the `error!` macro with a hint how to fix them.

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

use crate::{
    config::{self, Config},
    error,
    management::TokenManager,
    spotify::SpotifyClient,
    types::{EnrichedTrack, TrackTableRow},
    utils,
};

mod auth;
mod genres;
mod library;
mod logout;
mod me;
mod organize;
mod playlist;

pub use auth::auth;
pub use genres::analyze_genres;
pub use genres::list_genres;
pub use library::list_library;
pub use library::update_library;
pub use logout::logout;
pub use me::me;
pub use organize::organize;
pub use playlist::playlist;

fn load_config() -> Config {
    match Config::from_env() {
        Ok(config) => config,
        Err(e) => error!(
            "Configuration required. {}\nSettings are read from the environment and {}",
            e,
            config::env_file_path().display()
        ),
    }
}

async fn connect(config: &Config) -> SpotifyClient {
    let mut token_mgr = match TokenManager::load().await {
        Ok(manager) => manager,
        Err(e) => error!(
            "Failed to load token. Please run splister auth\n Error: {}",
            e
        ),
    };

    match token_mgr.get_valid_token(config).await {
        Ok(token) => SpotifyClient::new(config.api_url.as_str(), token),
        Err(e) => error!(
            "Cannot get a valid access token. Please run splister auth\n Error: {}",
            e
        ),
    }
}

fn progress_bar() -> ProgressBar {
    let pb = ProgressBar::new(0);
    let style = ProgressStyle::with_template(
        "{spinner:.blue} {msg} [{bar:30.green/white}] {pos}/{len}",
    )
    .unwrap_or_else(|_| ProgressStyle::default_bar())
    .progress_chars("=> ")
    .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏");
    pb.set_style(style);
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

fn track_row(t: &EnrichedTrack) -> TrackTableRow {
    TrackTableRow {
        name: utils::truncate(&t.track.name, 40),
        artists: utils::truncate(&utils::join_artist_names(&t.track.artists), 30),
        album: utils::truncate(&t.track.album.name, 30),
        genres: utils::truncate(&t.genres.join(", "), 40),
        features: utils::format_features(t.audio_features.as_ref()),
    }
}
