/// Crowdlist Server - companion backend for voted playlists
use anyhow::Context;
use clap::{Parser, Subcommand};
use crowdlist_core::{rank, HostSession, PlaylistId, PlaylistStore, VoteStore};
use crowdlist_server::{api, config::ServerConfig, state::AppState};
use crowdlist_spotify_client::SpotifyClient;
use crowdlist_storage::SqliteStore;
use std::{net::SocketAddr, path::PathBuf, sync::Arc};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "crowdlist-server")]
#[command(about = "Crowdlist voting and playlist sync server", long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true, env = "CROWDLIST_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve,
    /// Apply database migrations and exit
    Migrate,
    /// Print a playlist's tracks in ranked order
    Rank {
        /// Playlist id
        playlist_id: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "crowdlist_server=info,crowdlist_sync=info,tower_http=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let config = ServerConfig::load(cli.config.as_deref())?;
    config.validate()?;

    match cli.command {
        Commands::Serve => serve(config).await?,
        Commands::Migrate => migrate(&config).await?,
        Commands::Rank { playlist_id } => print_ranking(&config, &playlist_id).await?,
    }

    Ok(())
}

async fn open_store(config: &ServerConfig) -> anyhow::Result<SqliteStore> {
    let pool = crowdlist_storage::create_pool(&config.storage.database_url)
        .await
        .context("failed to open database")?;
    crowdlist_storage::run_migrations(&pool).await?;
    Ok(SqliteStore::new(pool))
}

async fn serve(config: ServerConfig) -> anyhow::Result<()> {
    tracing::info!("Starting Crowdlist Server");
    tracing::info!("Host: {}", config.server.host);
    tracing::info!("Port: {}", config.server.port);

    // Initialize database
    let store = Arc::new(open_store(&config).await?);
    tracing::info!("Database connected");

    // External service
    let spotify = Arc::new(SpotifyClient::new(config.spotify_config())?);
    tracing::info!("Spotify client targeting {}", spotify.base_url());

    let session = Arc::new(match &config.spotify.access_token {
        Some(token) => HostSession::with_token(token.clone()),
        None => HostSession::new(),
    });

    // Build application state
    let app_state = AppState::new(
        store,
        spotify.clone(),
        spotify,
        session,
        config.sync_config(),
        config.playback_config(),
    );

    // Background retry of playlists whose reconciliation failed
    let retry_loop = app_state.sync.spawn_retry_loop();

    // Once shutdown starts, stop retries and release requests waiting for a device
    let shutdown = CancellationToken::new();
    let sync = Arc::clone(&app_state.sync);
    let player = Arc::clone(&app_state.player);
    let stopping = shutdown.clone();
    tokio::spawn(async move {
        stopping.cancelled().await;
        player.shutdown();
        sync.shutdown();
    });

    let app = api::router(app_state);

    let addr = SocketAddr::from((
        config.server.host.parse::<std::net::IpAddr>()?,
        config.server.port,
    ));

    tracing::info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown.clone()))
        .await?;

    shutdown.cancel();
    retry_loop.await?;
    tracing::info!("Server stopped");

    Ok(())
}

async fn shutdown_signal(shutdown: CancellationToken) {
    tokio::select! {
        result = tokio::signal::ctrl_c() => {
            if let Err(e) = result {
                tracing::error!("Failed to listen for shutdown signal: {}", e);
            }
            tracing::info!("Shutdown signal received");
            shutdown.cancel();
        }
        () = shutdown.cancelled() => {}
    }
}

async fn migrate(config: &ServerConfig) -> anyhow::Result<()> {
    open_store(config).await?;
    tracing::info!("Migrations applied to {}", config.storage.database_url);
    Ok(())
}

async fn print_ranking(config: &ServerConfig, playlist_id: &str) -> anyhow::Result<()> {
    let store = open_store(config).await?;
    let playlist_id = PlaylistId::new(playlist_id);

    let playlist = store
        .get_playlist(&playlist_id)
        .await?
        .with_context(|| format!("playlist {playlist_id} not found"))?;
    let counts = store.counts_for(&playlist_id).await?;
    let order = rank(&playlist_id, &playlist.tracks, &counts);

    println!("{} ({} tracks)", playlist.title, order.len());
    for (position, ranked) in order.tracks.iter().enumerate() {
        let label = ranked
            .track
            .title
            .as_deref()
            .unwrap_or(&ranked.track.external_uri);
        println!("  {:>3}. [{:>3}] {}", position + 1, ranked.votes, label);
    }

    Ok(())
}
