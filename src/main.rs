//! Agrirent Server - Farm Equipment Rental Marketplace
//!
//! A Rust REST API server for equipment listings and rentals.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use agrirent_server::{
    api,
    config::{AppConfig, StoreBackend},
    store::{FileStore, MemoryStore, RecordStore},
    AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let config = AppConfig::load().context("Failed to load configuration")?;

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("agrirent_server={},tower_http=debug", config.logging.level).into());

    let registry = tracing_subscriber::registry().with(filter);
    if config.logging.format == "json" {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    tracing::info!("Starting Agrirent Server v{}", env!("CARGO_PKG_VERSION"));

    let store: Arc<dyn RecordStore> = match config.store.backend {
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory record store; data is lost on exit");
            Arc::new(MemoryStore::new())
        }
        StoreBackend::File => {
            let store = FileStore::open(&config.store.path)
                .await
                .with_context(|| format!("Failed to open record store at {}", config.store.path.display()))?;
            tracing::info!("Record store opened at {}", store.path().display());
            Arc::new(store)
        }
    };

    let addr = SocketAddr::new(
        config.server.host.parse().context("Invalid host address")?,
        config.server.port,
    );

    let state = AppState::new(config, store);
    let app = api::router(state);

    tracing::info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
