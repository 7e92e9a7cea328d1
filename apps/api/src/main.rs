mod clients;
mod config;
mod db;
mod errors;
mod evaluation;
mod history;
mod models;
mod render;
mod routes;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::clients::scoring::HttpMatchScorer;
use crate::clients::social::HttpSocialEvaluator;
use crate::config::Config;
use crate::db::create_pool;
use crate::evaluation::pipeline::EvaluationPipeline;
use crate::evaluation::validation::ValidationLimits;
use crate::history::HistoryStore;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting screening API v{}", env!("CARGO_PKG_VERSION"));

    let pool = create_pool(&config.database_url).await?;
    let history = HistoryStore::new(pool, config.history_capacity);
    info!(capacity = config.history_capacity, "History store ready");

    let scorer = HttpMatchScorer::new(config.scoring_api_url.clone(), config.scoring_timeout_secs)
        .context("building scoring client")?;
    info!(
        endpoint = %config.scoring_api_url,
        timeout_secs = config.scoring_timeout_secs,
        "Scoring client initialized"
    );

    let social =
        HttpSocialEvaluator::new(config.social_api_url.clone(), config.social_timeout_secs)
            .context("building social evaluation client")?;
    info!(
        endpoint = %config.social_api_url,
        timeout_secs = config.social_timeout_secs,
        "Social evaluation client initialized"
    );

    let pipeline = EvaluationPipeline::new(
        Arc::new(scorer),
        Arc::new(social),
        history.clone(),
        ValidationLimits {
            min_cv_length: config.min_cv_length,
            min_jd_length: config.min_jd_length,
        },
    );

    let state = AppState {
        pipeline: Arc::new(pipeline),
        history,
        config: config.clone(),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
