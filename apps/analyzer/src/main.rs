mod analysis;
mod config;
mod errors;
mod extraction;
mod llm_client;
mod routes;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::analysis::engine::ResumeAnalyzer;
use crate::analysis::recommendations::{EnrichmentSettings, RecommendationGenerator};
use crate::config::Config;
use crate::llm_client::build_strategy;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails fast on malformed env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting resume analyzer v{}", env!("CARGO_PKG_VERSION"));

    // Initialize AI enrichment (None falls back to rule-based recommendations)
    let strategy = build_strategy(&config.ai_provider, config.ai_timeout);
    let settings = EnrichmentSettings {
        timeout: config.ai_timeout,
        prompt_chars: config.ai_prompt_chars,
    };
    let analyzer = Arc::new(ResumeAnalyzer::new(RecommendationGenerator::new(
        strategy, settings,
    )));
    info!("Analyzer ready (AI enrichment: {})", analyzer.ai_enabled());

    // Build app state
    let state = AppState { analyzer };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict CORS origins to the web client

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
