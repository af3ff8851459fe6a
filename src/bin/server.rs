//! YapYard HTTP server binary.
//!
//! # Environment Variables
//!
//! - `PORT`: HTTP port (default: 8080)
//! - `DEFAULT_USERNAME`, `DEFAULT_PASSWORD`: login credentials
//! - `YAPYARD_MODEL`: model string (default: `groq/llama3-70b-8192`)
//! - `GROQ_BASE_URL`: provider endpoint override
//! - `YAPYARD_LLM_TIMEOUT_SECS`: per-call generation timeout (default: 45)
//! - `YAPYARD_TEMPERATURE`: sampling temperature
//! - `YAPYARD_STRIP_FILLER`: strip "Comment:"-style labels (default: false)
//! - `YAPYARD_SESSION_TTL_SECS`: session lifetime (default: 43200)
//! - `YAPYARD_MAX_SESSIONS`: live session cap (default: 1000)
//! - `RUST_LOG`: tracing filter (default: "info,yapyard=debug")
//!
//! A `.env` file in the working directory is loaded first if present.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin server
//! ```

use std::time::Duration;

use anyhow::Context;
use yapyard::server::{app_router, AppState};
use yapyard::utilities::config::AppConfig;

const SESSION_SWEEP_INTERVAL: Duration = Duration::from_secs(60);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let dotenv = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,yapyard=debug".into()),
        )
        .init();

    if let Ok(path) = dotenv {
        tracing::debug!("Loaded environment from {}", path.display());
    }

    let config = AppConfig::from_env().context("Invalid configuration")?;
    let bind_addr = format!("0.0.0.0:{}", config.port);

    let state = AppState::new(config);
    if !state.auth.is_configured() {
        tracing::warn!("DEFAULT_USERNAME / DEFAULT_PASSWORD not set, every login will be rejected");
    }
    tracing::info!("Model: {}", state.config.model);

    let sweeper = state.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(SESSION_SWEEP_INTERVAL);
        loop {
            interval.tick().await;
            sweeper.prune_expired(chrono::Utc::now());
        }
    });

    let app = app_router(state);

    tracing::info!("yapyard server starting on {}", bind_addr);
    tracing::info!("Endpoints:");
    tracing::info!("  GET  /health      liveness probe");
    tracing::info!("  POST /login       start a session");
    tracing::info!("  POST /comments    generate a comment thread");

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", bind_addr))?;

    axum::serve(listener, app).await.context("Server failed")?;
    Ok(())
}
