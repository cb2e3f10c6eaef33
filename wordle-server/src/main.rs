use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::Utc;
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use wordle_core::{Blocklist, DailyWordProvider, WordValidator};
use wordle_persistence::{StatsRepository, connect_and_migrate};
use wordle_server::{
    config::Config, create_routes, game_manager::GameManager, websocket::ConnectionManager,
    word_source::NytWordSource,
};

#[tokio::main]
async fn main() {
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Invalid configuration: {e}");
            std::process::exit(1);
        }
    };

    // RUST_LOG wins over the configured level
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("Starting Wordle server...");

    if let Err(e) = run(config).await {
        error!("Server failed: {:#}", e);
        std::process::exit(1);
    }
}

async fn run(config: Config) -> Result<()> {
    info!("Loading words from directory: {}", config.words_directory);
    let dictionary = WordValidator::from_directory(&config.words_directory).with_context(|| {
        format!(
            "The server requires word files; set WORDS_DIRECTORY to a directory of .txt word lists (tried '{}')",
            config.words_directory
        )
    })?;

    let db = connect_and_migrate(&config.database_url)
        .await
        .context("Failed to connect to database and run migrations")?;
    let stats = Arc::new(StatsRepository::new(db));

    let result = serve(&config, dictionary, stats.clone()).await;
    close_stats(stats).await;
    result
}

async fn serve(config: &Config, dictionary: WordValidator, stats: Arc<StatsRepository>) -> Result<()> {
    let source = NytWordSource::new(config.word_source_url.clone(), config.word_fetch_timeout())?;
    let daily_word = Arc::new(DailyWordProvider::new(
        Arc::new(source),
        config.puzzle_offset(),
    ));

    let today = daily_word
        .current_word(Utc::now())
        .await
        .context("Failed to fetch today's word")?;
    info!("Puzzle for {} is ready", today.date_key());

    let blocklist = Blocklist::with_defaults(&config.blocked_usernames);
    info!("Blocking {} usernames", blocklist.len());

    let game_manager = Arc::new(GameManager::new(
        stats.clone(),
        daily_word,
        Arc::new(dictionary),
        Arc::new(blocklist),
        config.motd.clone(),
    ));
    let connection_manager = Arc::new(ConnectionManager::new());

    let routes = create_routes(connection_manager.clone(), game_manager, stats);

    // Drop connections that went quiet
    let cleanup_connection_manager = connection_manager.clone();
    let connection_timeout = config.connection_timeout();
    let cleanup = tokio::spawn(async move {
        let mut interval = tokio::time::interval(std::time::Duration::from_secs(30));
        loop {
            interval.tick().await;
            cleanup_connection_manager
                .cleanup_inactive_connections(connection_timeout)
                .await;
        }
    });

    let addr = SocketAddr::new(config.host, config.port);
    let (addr, server) = warp::serve(routes)
        .try_bind_with_graceful_shutdown(addr, shutdown_signal())
        .with_context(|| format!("Failed to bind {addr}"))?;

    info!("Server started successfully on {}. Press Ctrl+C to stop.", addr);
    server.await;

    cleanup.abort();
    info!("Server shutdown complete.");
    Ok(())
}

/// Resolves on SIGINT or SIGTERM.
async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use signal::unix::{SignalKind, signal};

        match (signal(SignalKind::interrupt()), signal(SignalKind::terminate())) {
            (Ok(mut sigint), Ok(mut sigterm)) => {
                tokio::select! {
                    _ = sigint.recv() => {
                        info!("Received SIGINT, shutting down gracefully...");
                    }
                    _ = sigterm.recv() => {
                        info!("Received SIGTERM, shutting down gracefully...");
                    }
                }
                return;
            }
            (Err(e), _) | (_, Err(e)) => {
                warn!("Failed to install signal handlers, falling back to Ctrl+C: {}", e);
            }
        }
    }

    match signal::ctrl_c().await {
        Ok(()) => info!("Received Ctrl+C, shutting down gracefully..."),
        Err(e) => {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    }
}

async fn close_stats(stats: Arc<StatsRepository>) {
    // Upgraded sockets can still hold the repository; closing reaches them too
    match stats.close().await {
        Ok(()) => info!("Statistics store closed"),
        Err(e) => error!("Failed to close statistics store: {}", e),
    }
}
