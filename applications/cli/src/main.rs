/// Cave - command-line music player client
use anyhow::{bail, Context};
use cave_cli::CliConfig;
use cave_core::{CredentialStore, LibraryService, SignupRequest, Track, TrackId, TokenClaims};
use cave_playback::{format_time, MemoryEngine, PlaybackEvent, PlayerController};
use cave_server_client::{CaveServerClient, FileCredentialStore};
use chrono::Utc;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "cave")]
#[command(about = "Cave Player command-line client", long_about = None)]
struct Cli {
    /// Configuration file path (default: ./cave.toml if present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Server URL, overriding the configuration
    #[arg(long, global = true)]
    server: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Store a bearer token issued by the server
    Login {
        /// JWT issued at login
        #[arg(long, env = "CAVE_TOKEN")]
        token: String,
    },
    /// Forget the stored token
    Logout,
    /// Create an account
    Signup {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Show the signed-in profile
    Profile,
    /// List the catalog
    Tracks {
        /// Only tracks whose title or artist contains this text
        #[arg(short, long)]
        search: Option<String>,
    },
    /// List favorite tracks
    Favorites,
    /// Toggle the favorite status of a track
    Favorite {
        /// Track id
        track_id: String,
    },
    /// List playlists
    Playlists,
    /// Add a track to a playlist, creating the playlist if needed
    AddToPlaylist {
        /// Track id
        track_id: String,
        /// Playlist name (matched case-insensitively)
        name: String,
    },
    /// Walk through the catalog with the in-memory engine
    Play {
        /// Number of tracks to step through
        #[arg(short = 'n', long, default_value_t = 3)]
        tracks: usize,
        #[arg(long)]
        shuffle: bool,
        #[arg(long)]
        repeat: bool,
    },
    /// Play local files without a server
    Local {
        /// Audio files
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },
}

/// Length assumed when the server does not report one
const DEFAULT_TRACK_SECS: f64 = 180.0;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "cave_cli=info,cave_playback=info,cave_server_client=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let mut config = CliConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;
    if let Some(server) = cli.server {
        config.server.url = server;
    }

    let credentials = Arc::new(FileCredentialStore::new(config.credentials.path.clone()));
    let client = Arc::new(
        CaveServerClient::new(config.client_config(), credentials.clone())
            .context("Invalid server configuration")?,
    );

    tracing::debug!(server = %client.base_url(), "Using server");

    match cli.command {
        Commands::Login { token } => login(&credentials, &token)?,
        Commands::Logout => {
            credentials.clear()?;
            println!("Logged out");
        }
        Commands::Signup {
            name,
            email,
            password,
        } => {
            let message = client
                .signup(&SignupRequest::new(name, email, password))
                .await?;
            println!("{}", message);
        }
        Commands::Profile => show_profile(client.as_ref()).await?,
        Commands::Tracks { search } => list_tracks(client.as_ref(), search.as_deref()).await?,
        Commands::Favorites => {
            let favorites = client.fetch_favorites().await?;
            print_tracks(favorites.iter());
        }
        Commands::Favorite { track_id } => {
            let mut player = controller(&config, client, credentials);
            toggle_favorite(&mut player, &TrackId::new(track_id)).await?;
        }
        Commands::Playlists => {
            for playlist in client.fetch_playlists().await? {
                println!(
                    "{:>6}  {} ({} tracks)",
                    playlist.id,
                    playlist.name,
                    playlist.tracks.len()
                );
            }
        }
        Commands::AddToPlaylist { track_id, name } => {
            let mut player = controller(&config, client, credentials);
            add_to_playlist(&mut player, &TrackId::new(track_id), &name).await?;
        }
        Commands::Play {
            tracks,
            shuffle,
            repeat,
        } => {
            config.player.shuffle |= shuffle;
            config.player.repeat |= repeat;
            let engine = MemoryEngine::new();
            let mut player = PlayerController::new(
                Box::new(engine.clone()),
                client,
                credentials,
                config.player.clone(),
            );
            player.initialize().await?;
            report_events(&mut player);
            walk(&mut player, &engine, tracks)?;
        }
        Commands::Local { paths } => {
            let engine = MemoryEngine::new();
            let mut player = PlayerController::new(
                Box::new(engine.clone()),
                client,
                credentials,
                config.player.clone(),
            );
            player.set_catalog(paths.iter().map(|p| Track::local_file(p)).collect())?;
            report_events(&mut player);
            let count = player.catalog().len();
            walk(&mut player, &engine, count)?;
        }
    }

    Ok(())
}

fn controller(
    config: &CliConfig,
    client: Arc<CaveServerClient>,
    credentials: Arc<FileCredentialStore>,
) -> PlayerController {
    PlayerController::new(
        Box::new(MemoryEngine::new()),
        client,
        credentials,
        config.player.clone(),
    )
}

fn login(credentials: &FileCredentialStore, token: &str) -> anyhow::Result<()> {
    let claims = TokenClaims::decode_unverified(token).context("Token is not a JWT")?;
    let Some(email) = claims.email() else {
        bail!("Token has no subject claim");
    };
    if claims.is_expired_at(Utc::now()) {
        tracing::warn!(email = %email, "Token is already expired");
    }

    credentials.set(token)?;
    println!("Logged in as {}", email);
    Ok(())
}

async fn show_profile(client: &CaveServerClient) -> anyhow::Result<()> {
    let profile = client.fetch_profile().await?;

    println!("{} <{}>", profile.name, profile.email);
    if let Some(joined) = profile.joined_at {
        println!("Member since {}", joined.format("%B %-d, %Y"));
    }
    println!(
        "{} favorites, {} playlists",
        profile.favorites.len(),
        profile.playlists.len()
    );
    Ok(())
}

async fn list_tracks(client: &CaveServerClient, search: Option<&str>) -> anyhow::Result<()> {
    let tracks = client.fetch_tracks().await?;
    let query = search.unwrap_or_default();
    print_tracks(tracks.iter().filter(|t| t.matches_query(query)));
    Ok(())
}

fn print_tracks<'a>(tracks: impl Iterator<Item = &'a Track>) {
    for track in tracks {
        let length = track.duration.map(format_time).unwrap_or_default();
        println!("{:>6}  {} - {}  {}", track.id, track.artist, track.title, length);
    }
}

async fn toggle_favorite(player: &mut PlayerController, track_id: &TrackId) -> anyhow::Result<()> {
    player.refresh_favorites().await?;
    player.toggle_favorite_track(track_id).await?;
    report_events(player);

    if player.is_favorite(track_id) {
        println!("Added {} to favorites", track_id);
    } else {
        println!("Removed {} from favorites", track_id);
    }
    Ok(())
}

async fn add_to_playlist(
    player: &mut PlayerController,
    track_id: &TrackId,
    name: &str,
) -> anyhow::Result<()> {
    player.load_catalog().await?;
    player.refresh_playlists().await?;

    let track = player
        .catalog()
        .iter()
        .find(|t| &t.id == track_id)
        .cloned()
        .with_context(|| format!("Track {} is not in the catalog", track_id))?;
    player.select_track(track, None)?;

    let playlist_id = player.add_current_track_to_playlist(name).await?;
    report_events(player);

    println!("Added {} to playlist {} ({})", track_id, name.trim(), playlist_id);
    Ok(())
}

/// Step through `count` tracks, driving the engine to the end of each
fn walk(player: &mut PlayerController, engine: &MemoryEngine, count: usize) -> anyhow::Result<()> {
    if player.current_track().is_none() {
        println!("Nothing to play");
        return Ok(());
    }

    player.toggle_play()?;
    for _ in 0..count {
        let Some(track) = player.current_track().cloned() else {
            break;
        };
        let length = track.duration.unwrap_or(DEFAULT_TRACK_SECS);
        engine.set_duration(length);
        player.pump_engine_events();

        let state = player.state();
        println!(
            "▶ {} - {}  [{}]{}{}",
            track.artist,
            track.title,
            format_time(state.duration),
            if state.is_shuffle { "  shuffle" } else { "" },
            if state.is_repeat { "  repeat" } else { "" },
        );

        engine.advance(length);
        player.pump_engine_events();
        report_events(player);
    }

    player.shutdown();
    Ok(())
}

fn report_events(player: &mut PlayerController) {
    for event in player.drain_events() {
        match event {
            PlaybackEvent::Error { message } => eprintln!("error: {}", message),
            PlaybackEvent::AuthRequired => eprintln!("Not logged in. Run `cave login --token <TOKEN>`."),
            other => tracing::debug!(event = ?other, "Player event"),
        }
    }
}
