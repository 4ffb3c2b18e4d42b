use crate::{
    error,
    management::{GenreManager, LibraryManager},
    pipeline::{self, classify::Strategy, playlists::PlaylistOptions},
    warning,
};

/// Runs every stage in one go: fetch and enrich the library, classify it and
/// create the playlists. The intermediate results are cached like the single
/// commands do.
pub async fn organize(strategy: Strategy, seed: Option<u64>, force: bool, dry_run: bool) {
    let config = super::load_config();
    let client = super::connect(&config).await;

    let pb = super::progress_bar();
    let tracks = match pipeline::enrich::enrich_library(&client, &pb).await {
        Ok(tracks) => tracks,
        Err(e) => {
            pb.finish_and_clear();
            error!("Failed to fetch liked songs: {}", e);
        }
    };
    pb.finish_and_clear();

    let library_mgr = LibraryManager::new(tracks);
    super::library::report_enrichment(&library_mgr);
    if let Err(e) = library_mgr.persist().await {
        warning!("Failed to cache liked songs. Err: {}", e);
    }

    if library_mgr.count() == 0 {
        warning!("No liked songs found, nothing to organize.");
        return;
    }

    let groups = super::genres::classify_library(library_mgr.tracks(), strategy, seed);
    super::genres::print_genre_summary(&groups);

    let genre_mgr = GenreManager::new(groups);
    if let Err(e) = genre_mgr.persist().await {
        warning!("Failed to cache genre groups. Err: {}", e);
    }

    let options = PlaylistOptions {
        force,
        dry_run,
        genres: Vec::new(),
    };
    let outcomes = super::playlist::create_playlists(&client, genre_mgr.groups(), &options).await;
    super::playlist::print_outcomes(&outcomes, dry_run);
}
