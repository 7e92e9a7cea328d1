pub mod health;

use axum::{
    routing::{delete, get, post},
    Router,
};

use crate::evaluation::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/evaluations", post(handlers::handle_evaluate))
        .route(
            "/api/v1/history",
            get(handlers::handle_list_history).delete(handlers::handle_purge_history),
        )
        .route(
            "/api/v1/history/:id",
            get(handlers::handle_get_record).delete(handlers::handle_delete_record),
        )
        .route(
            "/api/v1/history/:id/export",
            post(handlers::handle_export_record),
        )
        .with_state(state)
}
