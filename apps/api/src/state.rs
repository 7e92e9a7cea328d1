use std::sync::Arc;

use crate::config::Config;
use crate::evaluation::pipeline::EvaluationPipeline;
use crate::history::HistoryStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<EvaluationPipeline>,
    pub history: HistoryStore,
    pub config: Config,
}
