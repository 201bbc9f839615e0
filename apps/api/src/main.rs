mod config;
mod db;
mod errors;
mod mailer;
mod models;
mod routes;
mod search;
mod state;
mod store;
mod verification;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::db::create_pool;
use crate::mailer::SmtpMailer;
use crate::routes::build_router;
use crate::state::AppState;
use crate::store::postgres::PgJobStore;
use crate::verification::store::RedisCodeStore;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting job-board API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL (job postings)
    let pool = create_pool(&config).await?;

    // Initialize Redis (verification codes)
    let redis = redis::Client::open(config.redis_url.clone())?;
    info!("Redis client initialized");

    // Initialize SMTP transport (verification emails)
    let mailer = SmtpMailer::from_config(&config)?;
    info!("SMTP transport initialized (relay: {})", config.smtp_server);

    // Build app state; every port is an explicit dependency, never a global
    let state = AppState {
        jobs: Arc::new(PgJobStore::new(pool)),
        codes: Arc::new(RedisCodeStore::new(redis)),
        mailer: Arc::new(mailer),
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
