use tabled::Table;

use crate::{
    error, info,
    management::LibraryManager,
    pipeline, success,
    types::{EnrichedTrack, TrackTableRow},
    warning,
};

pub async fn update_library() {
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
    report_enrichment(&library_mgr);

    if let Err(e) = library_mgr.persist().await {
        error!("Failed to cache liked songs. Err: {}", e);
    }
}

pub async fn list_library(search: Option<String>, limit: Option<usize>) {
    let library_mgr = match LibraryManager::load().await {
        Ok(mgr) => mgr,
        Err(e) => {
            warning!(
                "Failed to load liked songs. Err: {}\nRun splister library update.",
                e
            );
            return;
        }
    };

    let tracks: Vec<&EnrichedTrack> = match &search {
        Some(term) => library_mgr.search(term),
        None => library_mgr.tracks().iter().collect(),
    };

    let shown = limit.unwrap_or(tracks.len()).min(tracks.len());
    let rows: Vec<TrackTableRow> = tracks
        .iter()
        .take(shown)
        .map(|t| super::track_row(t))
        .collect();

    println!("{}", Table::new(rows));
    if shown < tracks.len() {
        info!("Showing {} of {} songs.", shown, tracks.len());
    }
}

pub(crate) fn report_enrichment(library_mgr: &LibraryManager) {
    success!("Fetched {} liked songs!", library_mgr.count());
    info!(
        "{} songs with audio features, {} songs with artist genres.",
        library_mgr.count_with_features(),
        library_mgr.count_with_genres()
    );
}
