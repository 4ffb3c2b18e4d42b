use tabled::Table;

use crate::{
    error, info,
    management::GenreManager,
    pipeline::{
        classify::{Genre, GenreGroups},
        playlists::{self, PlaylistOptions, PlaylistOutcome, PlaylistStatus},
    },
    spotify::{self, SpotifyClient},
    success,
    types::PlaylistTableRow,
    warning,
};

pub async fn playlist(genres: Vec<Genre>, force: bool, dry_run: bool) {
    let genre_mgr = match GenreManager::load().await {
        Ok(mgr) => mgr,
        Err(e) => error!(
            "Failed to load genre groups. Err: {}\nRun splister genres analyze.",
            e
        ),
    };

    if genre_mgr.count_genres() == 0 {
        warning!("No genre groups cached. Run splister genres analyze.");
        return;
    }

    let options = PlaylistOptions {
        force,
        dry_run,
        genres,
    };

    if dry_run {
        print_outcomes(&playlists::plan_all(genre_mgr.groups(), &options), true);
        return;
    }

    let config = super::load_config();
    let client = super::connect(&config).await;
    let outcomes = create_playlists(&client, genre_mgr.groups(), &options).await;
    print_outcomes(&outcomes, dry_run);
}

pub(crate) async fn create_playlists(
    client: &SpotifyClient,
    groups: &GenreGroups,
    options: &PlaylistOptions,
) -> Vec<PlaylistOutcome> {
    if options.dry_run {
        return playlists::plan_all(groups, options);
    }

    let user = match spotify::profile::get_current_user(client).await {
        Ok(user) => user,
        Err(e) => error!("Failed to fetch user profile: {}", e),
    };

    let pb = super::progress_bar();
    let outcomes = playlists::create_all(client, &user.id, groups, options, &pb).await;
    pb.finish_and_clear();
    outcomes
}

pub(crate) fn print_outcomes(outcomes: &[PlaylistOutcome], dry_run: bool) {
    if outcomes.is_empty() {
        info!("No genre matched, nothing to do.");
        return;
    }

    let rows: Vec<PlaylistTableRow> = outcomes
        .iter()
        .map(|o| PlaylistTableRow {
            genre: o.genre.to_string(),
            playlist: o.name.clone(),
            status: describe(&o.status),
        })
        .collect();
    println!("{}", Table::new(rows));

    let failed = outcomes.iter().filter(|o| o.is_failure()).count();
    if dry_run {
        info!("Dry run, {} playlists would be created.", outcomes.len());
    } else if failed == 0 {
        success!("All {} genre playlists are in place!", outcomes.len());
    } else {
        warning!(
            "{} of {} playlists had problems, see the table above.",
            failed,
            outcomes.len()
        );
    }
}

fn describe(status: &PlaylistStatus) -> String {
    match status {
        PlaylistStatus::Created {
            tracks_added,
            failed_chunks: 0,
            ..
        } => format!("created, {tracks_added} songs"),
        PlaylistStatus::Created {
            tracks_added,
            failed_chunks,
            ..
        } => format!("created, {tracks_added} songs, {failed_chunks} batches failed"),
        PlaylistStatus::Skipped { .. } => "exists, skipped".to_string(),
        PlaylistStatus::Planned { tracks } => format!("would add {tracks} songs"),
        PlaylistStatus::Failed(reason) => format!("failed: {reason}"),
    }
}
