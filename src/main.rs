use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use starchart::{
    config::Config,
    database::{
        Database,
        migrations::{CacheMigrator, StorageMigrator},
        repositories::{CacheEntrySeaOrmRepository, StarmapSeaOrmRepository},
    },
    render::ChartRenderer,
    services::{CacheRetentionSweeper, ChartCacheService, StarChartGenerator, StarmapService},
    sky::SkyDataProvider,
    web::{AppState, WebServer},
};

#[derive(Parser)]
#[command(name = "starchart")]
#[command(version)]
#[command(about = "Renders night-sky charts with a chart cache and permanent storage")]
#[command(long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "config.toml")]
    config: String,

    /// Listening IP address
    #[arg(short = 'H', long, value_name = "IP")]
    host: Option<String>,

    /// Listening port
    #[arg(short, long, value_name = "PORT")]
    port: Option<u16>,

    /// Cache database URL (overrides config file)
    #[arg(long, value_name = "URL")]
    cache_database_url: Option<String>,

    /// Permanent storage database URL (overrides config file)
    #[arg(long, value_name = "URL")]
    storage_database_url: Option<String>,

    /// Log level
    #[arg(short = 'v', long, default_value = "info")]
    log_level: String,

    /// Load the star catalog lazily on the first chart instead of at startup
    #[arg(long)]
    no_preload: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_filter = format!("starchart={},tower_http={}", cli.log_level, cli.log_level);
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| log_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting starchart v{}", env!("CARGO_PKG_VERSION"));

    let mut config = Config::load_from_file(&cli.config)?;
    info!("Configuration loaded from: {}", cli.config);

    if let Some(host) = cli.host {
        config.web.host = host;
    }
    if let Some(port) = cli.port {
        config.web.port = port;
    }
    if let Some(url) = cli.cache_database_url {
        config.cache_database.url = url;
    }
    if let Some(url) = cli.storage_database_url {
        config.storage_database.url = url;
    }
    let config = Arc::new(config);

    let cache_database = Database::new(&config.cache_database)
        .await
        .context("Failed to open cache database")?;
    cache_database.migrate::<CacheMigrator>().await?;

    let storage_database = Database::new(&config.storage_database)
        .await
        .context("Failed to open storage database")?;
    storage_database.migrate::<StorageMigrator>().await?;

    let provider = Arc::new(SkyDataProvider::new(config.sky.clone()));
    if !cli.no_preload {
        let data = provider
            .get()
            .await
            .context("Failed to load star catalog and ephemeris")?;
        info!(stars = data.catalog.len(), "Sky reference data preloaded");
    }

    let renderer = Arc::new(ChartRenderer::new(config.render.clone()));
    info!(captions = renderer.has_captions(), "Chart renderer ready");
    let generator = Arc::new(StarChartGenerator::new(provider, renderer));

    let cache_repository = CacheEntrySeaOrmRepository::new(cache_database.connection.clone());
    let storage_repository = StarmapSeaOrmRepository::new(storage_database.connection.clone());

    let state = AppState {
        config: config.clone(),
        chart_cache: ChartCacheService::new(cache_repository.clone(), generator),
        starmaps: StarmapService::new(cache_repository.clone(), storage_repository),
        cache_backend: cache_database.database_type,
        storage_backend: storage_database.database_type,
    };

    let shutdown = CancellationToken::new();
    let sweeper = CacheRetentionSweeper::new(
        cache_repository,
        config.cache.max_age,
        config.cache.sweep_interval,
    );
    let sweeper_handle = tokio::spawn(sweeper.run(shutdown.child_token()));

    tokio::spawn(shutdown_on_signal(shutdown.clone()));

    let server = WebServer::new(state)?;
    info!("Starting web server on {}:{}", server.host(), server.port());
    let served = server.serve_with_cancellation(shutdown.clone()).await;

    shutdown.cancel();
    if let Err(e) = sweeper_handle.await {
        error!("Cache retention sweeper task failed: {}", e);
    }

    served?;
    info!("starchart stopped");
    Ok(())
}

/// Cancel `token` on SIGINT or SIGTERM
async fn shutdown_on_signal(token: CancellationToken) {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        let (mut sigterm, mut sigint) = match (
            signal(SignalKind::terminate()),
            signal(SignalKind::interrupt()),
        ) {
            (Ok(sigterm), Ok(sigint)) => (sigterm, sigint),
            (Err(e), _) | (_, Err(e)) => {
                error!("Failed to install signal handlers: {}", e);
                return;
            }
        };

        tokio::select! {
            _ = sigterm.recv() => info!("Received SIGTERM, shutting down gracefully"),
            _ = sigint.recv() => info!("Received SIGINT (Ctrl+C), shutting down gracefully"),
        }
    }

    #[cfg(not(unix))]
    {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            return;
        }
        info!("Received Ctrl+C, shutting down gracefully");
    }

    token.cancel();
}
