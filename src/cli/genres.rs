use tabled::Table;

use crate::{
    error, info,
    management::{GenreManager, LibraryManager},
    pipeline::classify::{self, Genre, GenreGroups, Strategy},
    success,
    types::{EnrichedTrack, GenreTableRow, TrackTableRow},
    utils, warning,
};

/// Songs listed per genre before the rest is summarized.
const PREVIEW_TRACKS: usize = 5;

pub async fn analyze_genres(strategy: Strategy, seed: Option<u64>) {
    let library_mgr = match LibraryManager::load().await {
        Ok(mgr) => mgr,
        Err(e) => error!(
            "Failed to load liked songs. Err: {}\nRun splister library update.",
            e
        ),
    };

    if library_mgr.count() == 0 {
        warning!("No liked songs cached. Run splister library update.");
        return;
    }

    let groups = classify_library(library_mgr.tracks(), strategy, seed);
    print_genre_summary(&groups);

    if let Err(e) = GenreManager::new(groups).persist().await {
        error!("Failed to cache genre groups. Err: {}", e);
    }
}

pub async fn list_genres(genre: Option<Genre>) {
    let genre_mgr = match GenreManager::load().await {
        Ok(mgr) => mgr,
        Err(e) => {
            warning!(
                "Failed to load genre groups. Err: {}\nRun splister genres analyze.",
                e
            );
            return;
        }
    };

    let Some(genre) = genre else {
        print_genre_summary(genre_mgr.groups());
        return;
    };

    match genre_mgr.tracks_for(genre) {
        Some(tracks) => {
            let rows: Vec<TrackTableRow> = tracks
                .iter()
                .map(super::track_row)
                .collect();
            println!("Genre: {genre}\n{}", Table::new(rows));
        }
        None => info!("No songs in genre {}.", genre),
    }
}

pub(crate) fn classify_library(
    tracks: &[EnrichedTrack],
    strategy: Strategy,
    seed: Option<u64>,
) -> GenreGroups {
    let mut classifier = classify::classifier(strategy, seed);
    let pb = super::progress_bar();
    let groups = classify::group_by_genre(tracks, classifier.as_mut(), &pb);
    pb.finish_and_clear();

    success!(
        "Sorted {} songs into {} genres using the {} strategy.",
        tracks.len(),
        groups.len(),
        strategy
    );
    groups
}

pub(crate) fn print_genre_summary(groups: &GenreGroups) {
    let rows: Vec<GenreTableRow> = groups
        .iter()
        .map(|(genre, tracks)| GenreTableRow {
            genre: genre.to_string(),
            songs: tracks.len(),
            preview: preview(tracks),
        })
        .collect();

    println!("{}", Table::new(rows));
}

fn preview(tracks: &[EnrichedTrack]) -> String {
    let mut lines: Vec<String> = tracks
        .iter()
        .take(PREVIEW_TRACKS)
        .map(|t| {
            format!(
                "{} - {}",
                utils::truncate(&t.track.name, 40),
                t.first_artist_name()
            )
        })
        .collect();

    if tracks.len() > PREVIEW_TRACKS {
        lines.push(format!("+{} more songs", tracks.len() - PREVIEW_TRACKS));
    }

    lines.join("\n")
}
