mod config;
mod editor;
mod errors;
mod export;
mod layout;
mod models;
mod render;
mod routes;
mod session;
mod state;
mod store_client;
mod templates;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::routes::build_router;
use crate::state::AppState;
use crate::store_client::{HttpResumeStore, MemoryStore, ResumeStore};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on malformed values)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Vitae API v{}", env!("CARGO_PKG_VERSION"));

    // Persistence: remote résumé API when configured, in-memory otherwise
    let store: Arc<dyn ResumeStore> = match &config.store_url {
        Some(url) => {
            let store = HttpResumeStore::new(url, config.store_timeout)
                .context("Failed to build store HTTP client")?;
            info!("Using remote resume store at {url}");
            Arc::new(store)
        }
        None => {
            info!("STORE_URL not set, using in-memory resume store");
            Arc::new(MemoryStore::new())
        }
    };

    if config.autosave_delay.is_zero() {
        info!("Autosave disabled");
    } else {
        info!("Autosave delay: {}ms", config.autosave_delay.as_millis());
    }

    // Build app state
    let state = AppState::new(config.clone(), store);

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
