use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use bibliofind_core::{
    load_config, validate_config, BookSearchProvider, Clock, KeyValueStore, OpenLibraryProvider,
    ProviderBackend, SqliteKeyValueStore, SystemClock,
};

use bibliofind_server::api::create_router;
use bibliofind_server::metrics;
use bibliofind_server::state::AppState;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Determine config path
    let config_path = std::env::var("BIBLIOFIND_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("config.toml"));

    // Load configuration
    info!("Loading configuration from {:?}", config_path);
    let config = load_config(&config_path)
        .with_context(|| format!("Failed to load config from {:?}", config_path))?;

    validate_config(&config).context("Configuration validation failed")?;

    info!("Configuration loaded successfully");
    info!("Provider backend: {:?}", config.provider.backend);
    info!("Database path: {:?}", config.database.path);

    // Create search provider
    let provider: Arc<dyn BookSearchProvider> = match config.provider.backend {
        ProviderBackend::OpenLibrary => {
            info!(
                "Initializing Open Library provider at {}",
                config.provider.open_library.url
            );
            Arc::new(
                OpenLibraryProvider::new(config.provider.open_library.clone())
                    .context("Failed to create Open Library provider")?,
            )
        }
    };

    // Create persistent client store
    let store: Arc<dyn KeyValueStore> = Arc::new(
        SqliteKeyValueStore::new(&config.database.path)
            .context("Failed to open persistent store")?,
    );
    info!("Persistent store initialized");

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);

    // Touch the registry so core metrics are registered before first scrape
    let _ = &*metrics::REGISTRY;

    // Create app state and router
    let state = Arc::new(AppState::new(config.clone(), provider, store, clock));
    let app = create_router(state);

    // Start server
    let addr = SocketAddr::new(config.server.host, config.server.port);
    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shut down");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
