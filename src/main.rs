use std::path::PathBuf;

use clap::{
    ArgAction, CommandFactory, Parser, Subcommand,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use clap_complete::{Shell, generate};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use scplcli::{
    cli,
    config::{self, Settings},
    error,
    soundcloud::SoundCloudClient,
    store::SqliteCredentialStore,
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
  about=env!("CARGO_PKG_DESCRIPTION"),
  styles=styles(),
)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[clap(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Read and reorder playlists
    #[command(subcommand)]
    Playlist(PlaylistCommand),

    /// Work with single tracks
    #[command(subcommand)]
    Track(TrackCommand),

    /// Inspect and refresh the stored OAuth token
    #[command(subcommand)]
    Auth(AuthCommand),

    /// Provision credential records
    #[command(subcommand)]
    Creds(CredsCommand),

    /// Get shell completions
    Completions(CompletionsOption),
}

#[derive(Subcommand, Debug, Clone)]
pub enum PlaylistCommand {
    /// Show title and tracks of a playlist
    Show { playlist_id: u64 },

    /// Print the track ids of a playlist in order
    Tracks { playlist_id: u64 },

    /// Replace the track order with the given comma-separated ids
    Reorder {
        playlist_id: u64,
        #[clap(value_delimiter = ',', num_args = 1.., required = true)]
        track_ids: Vec<u64>,
    },

    /// Move the track at one position to another (1-based)
    Move {
        playlist_id: u64,
        #[clap(long)]
        from: usize,
        #[clap(long)]
        to: usize,
    },

    /// Change the playlist title
    Rename { playlist_id: u64, title: String },
}

#[derive(Subcommand, Debug, Clone)]
pub enum TrackCommand {
    /// Download a downloadable track
    Download {
        track_id: u64,
        /// Target directory
        #[clap(long, short, default_value = ".")]
        output: PathBuf,
    },
}

#[derive(Subcommand, Debug, Clone)]
pub enum AuthCommand {
    /// List stored credentials and their expiry
    Status,
    /// Force a token refresh
    Refresh,
    /// Check the token against SoundCloud
    Verify,
}

#[derive(Subcommand, Debug, Clone)]
pub enum CredsCommand {
    /// Store a new credential record from a JSON file
    Import {
        #[clap(long)]
        file: PathBuf,
        /// Logical token name (defaults to SCPLCLI_TOKEN_NAME)
        #[clap(long)]
        name: Option<String>,
    },
}

#[derive(Parser, Debug, Clone)]
pub struct CompletionsOption {
    shell: Shell,
}

fn init_tracing(verbose: u8) {
    let fallback = match verbose {
        0 => "warn",
        1 => "scplcli=debug,warn",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Command::Completions(opt) = &cli.command {
        let mut cmd = Cli::command();
        let name = cmd.get_name().to_string();
        generate(opt.shell, &mut cmd, name, &mut std::io::stdout());
        return;
    }

    if let Err(e) = config::load_env() {
        error!("Cannot load environment. Err: {}", e);
    }

    let settings = match Settings::from_env() {
        Ok(s) => s,
        Err(e) => error!("{}", e),
    };
    let store = SqliteCredentialStore::new(&settings.database);

    match cli.command {
        Command::Auth(AuthCommand::Status) => cli::auth_status(&store),
        Command::Creds(CredsCommand::Import { file, name }) => {
            let name = name.unwrap_or_else(|| settings.token_name.clone());
            cli::import_credentials(&store, &name, &file)
        }
        command => {
            let mut client = match SoundCloudClient::new(settings, store) {
                Ok(c) => c,
                Err(e) => error!("Cannot build SoundCloud client. Err: {}", e),
            };
            run(&mut client, command);
        }
    }
}

fn run(client: &mut SoundCloudClient, command: Command) {
    match command {
        Command::Playlist(PlaylistCommand::Show { playlist_id }) => {
            cli::show_playlist(client, playlist_id)
        }
        Command::Playlist(PlaylistCommand::Tracks { playlist_id }) => {
            cli::playlist_tracks(client, playlist_id)
        }
        Command::Playlist(PlaylistCommand::Reorder {
            playlist_id,
            track_ids,
        }) => cli::reorder_playlist(client, playlist_id, &track_ids),
        Command::Playlist(PlaylistCommand::Move {
            playlist_id,
            from,
            to,
        }) => cli::move_playlist_track(client, playlist_id, from, to),
        Command::Playlist(PlaylistCommand::Rename { playlist_id, title }) => {
            cli::rename_playlist(client, playlist_id, &title)
        }
        Command::Track(TrackCommand::Download { track_id, output }) => {
            cli::download_track(client, track_id, &output)
        }
        Command::Auth(AuthCommand::Refresh) => cli::auth_refresh(client),
        Command::Auth(AuthCommand::Verify) => cli::auth_verify(client),
        Command::Auth(AuthCommand::Status)
        | Command::Creds(_)
        | Command::Completions(_) => unreachable!("handled before the client is built"),
    }
}
