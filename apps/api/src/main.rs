mod analysis;
mod config;
mod db;
mod errors;
mod files;
mod jobs;
mod models;
mod routes;
mod state;
mod validator;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::analysis::AnalysisClient;
use crate::config::Config;
use crate::db::create_pool;
use crate::files::FileStore;
use crate::jobs::repository::PgJobRepository;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (panics on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.rust_log.clone())),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting FairPost API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL
    let pool = create_pool(&config.database_url).await?;
    let repo = Arc::new(PgJobRepository::new(pool));

    // Initialize the upload store
    tokio::fs::create_dir_all(&config.upload_dir)
        .await
        .with_context(|| format!("Failed to create upload dir '{}'", config.upload_dir))?;
    let files = FileStore::new(&config.upload_dir);
    info!("File store rooted at {}", config.upload_dir);

    // Initialize the analysis engine client
    let analyzer = Arc::new(AnalysisClient::new(
        config.analysis_api_url.clone(),
        config.analysis_api_key.clone(),
        config.analysis_timeout_secs,
    ));
    info!(
        "Analysis client initialized ({}s timeout)",
        config.analysis_timeout_secs
    );

    // Build app state
    let state = AppState {
        repo,
        analyzer,
        files,
        config: config.clone(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: tighten CORS in production

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
