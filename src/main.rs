use std::str::FromStr;

use clap::{
    ArgAction, CommandFactory, Parser, Subcommand,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use clap_complete::{Shell, generate};
use tracing_subscriber::EnvFilter;

use splister::{
    cli, config, error,
    pipeline::classify::{Genre, Strategy},
};

fn styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::White.on_default() | Effects::BOLD)
        .usage(AnsiColor::White.on_default() | Effects::BOLD)
        .literal(AnsiColor::BrightBlue.on_default())
        .placeholder(AnsiColor::BrightGreen.on_default())
}

#[derive(Parser, Debug, Clone)]
#[clap(
  version = env!("CARGO_PKG_VERSION"),
  name=env!("CARGO_PKG_NAME"),
  bin_name=env!("CARGO_PKG_NAME"),
  author=env!("CARGO_PKG_AUTHORS"),
  about=env!("CARGO_PKG_DESCRIPTION"),
  styles=styles(),
)]
struct Cli {
    /// Print debug logs of the API client and pipeline to stderr
    #[clap(long, short, global = true)]
    verbose: bool,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Authorize with Spotify API
    Auth,

    /// Show the authorized Spotify profile
    Me,

    /// Handle liked songs
    Library(LibraryOptions),

    /// Handle genre groups
    Genres(GenresOptions),

    #[clap(about = "Create one playlist per genre group")]
    Playlist(PlaylistOptions),

    /// Fetch, classify and create playlists in one run
    Organize(OrganizeOptions),

    /// Remove cached token, liked songs and genre groups
    Logout,

    /// Get shell completions
    Completions(CompletionsOption),
}

#[derive(Parser, Debug, Clone)]
#[command(
    about = "Handle liked songs",
    args_conflicts_with_subcommands = true // disallow mixing --search with subcommands
)]
pub struct LibraryOptions {
    /// Only list songs whose name, album or artist contains this text
    #[clap(long)]
    pub search: Option<String>,

    /// Maximum number of songs to list
    #[clap(long)]
    pub limit: Option<usize>,

    /// Subcommands under `library` (e.g., `update`)
    #[command(subcommand)]
    pub command: Option<LibrarySubcommand>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum LibrarySubcommand {
    /// Fetch liked songs with audio features and artist genres
    Update,
}

#[derive(Parser, Debug, Clone)]
#[command(
    about = "Handle genre groups",
    args_conflicts_with_subcommands = true // disallow mixing --genre with `analyze`
)]
pub struct GenresOptions {
    /// Show the songs of a single genre
    #[clap(long, value_parser = Genre::from_str)]
    pub genre: Option<Genre>,

    /// Subcommands under `genres` (e.g., `analyze`)
    #[command(subcommand)]
    pub command: Option<GenresSubcommand>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum GenresSubcommand {
    /// Sort the cached liked songs into genres
    Analyze(ClassifyOpts),
}

#[derive(Parser, Debug, Clone)]
pub struct ClassifyOpts {
    /// How songs are assigned to genres
    #[clap(long, value_enum, default_value_t = Strategy::default())]
    pub strategy: Strategy,

    /// Seed for the random audio profiles, makes runs repeatable
    #[clap(long)]
    pub seed: Option<u64>,
}

#[derive(Parser, Debug, Clone)]
pub struct PlaylistOptions {
    /// Genre(s) to create playlists for; can be repeated, defaults to all
    #[clap(
        long,
        value_parser = Genre::from_str,
        action = ArgAction::Append,
        num_args = 1
    )]
    genre: Vec<Genre>,

    /// Create playlists even if one with the same name exists
    #[clap(long)]
    force: bool,

    /// Only show what would be created
    #[clap(long)]
    dry_run: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct OrganizeOptions {
    #[clap(flatten)]
    classify: ClassifyOpts,

    /// Create playlists even if one with the same name exists
    #[clap(long)]
    force: bool,

    /// Only show what would be created
    #[clap(long)]
    dry_run: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct CompletionsOption {
    shell: Shell,
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(if verbose { "splister=debug" } else { "warn" })
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() {
    if let Err(e) = config::load_env().await {
        error!("Cannot load environment. Err: {}", e);
    }

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Auth => cli::auth().await,
        Command::Me => cli::me().await,

        Command::Library(opt) => match opt.command {
            Some(LibrarySubcommand::Update) => cli::update_library().await,
            None => cli::list_library(opt.search, opt.limit).await,
        },

        Command::Genres(opt) => match opt.command {
            Some(GenresSubcommand::Analyze(c)) => cli::analyze_genres(c.strategy, c.seed).await,
            None => cli::list_genres(opt.genre).await,
        },

        Command::Playlist(opt) => cli::playlist(opt.genre, opt.force, opt.dry_run).await,
        Command::Organize(opt) => {
            cli::organize(
                opt.classify.strategy,
                opt.classify.seed,
                opt.force,
                opt.dry_run,
            )
            .await
        }
        Command::Logout => cli::logout().await,
        Command::Completions(opt) => {
            let mut cmd = Cli::command_for_update();
            let name = cmd.get_name().to_string();
            generate(opt.shell, &mut cmd, name, &mut std::io::stdout())
        }
    }
}
