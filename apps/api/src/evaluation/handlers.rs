use std::path::Path;

use axum::{
    extract::{Path as UrlPath, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::errors::AppError;
use crate::evaluation::pipeline::PipelineOutcome;
use crate::history::export::{export_record, ExportFormat};
use crate::models::record::EvaluationRecord;
use crate::models::request::EvaluationRequest;
use crate::state::AppState;

/// POST /api/v1/evaluations
///
/// The three pipeline outcomes map to three distinct responses so clients can
/// tell "fix your input" (422) from "upstream failed, try later" (502) from
/// "completed" (200, possibly with a persistence warning inside).
pub async fn handle_evaluate(
    State(state): State<AppState>,
    Json(request): Json<EvaluationRequest>,
) -> Response {
    match state.pipeline.run(&request).await {
        PipelineOutcome::Rejected { errors } => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({
                "outcome": "rejected",
                "validation_errors": errors
            })),
        )
            .into_response(),
        PipelineOutcome::ScoringFailed { error } => (
            StatusCode::BAD_GATEWAY,
            Json(json!({
                "outcome": "scoring_failed",
                "error": {
                    "kind": error.kind(),
                    "message": error.to_string()
                }
            })),
        )
            .into_response(),
        PipelineOutcome::Completed(report) => (
            StatusCode::OK,
            Json(json!({
                "outcome": "completed",
                // Pre-ranked views so the UI does not re-implement the
                // magnitude ordering: top 5 for the summary card, top 12
                // for the analysis pane.
                "top_features": report.brief_features(),
                "feature_analysis": report.detailed_features(),
                "report": *report
            })),
        )
            .into_response(),
    }
}

/// GET /api/v1/history
pub async fn handle_list_history(
    State(state): State<AppState>,
) -> Result<Json<Vec<EvaluationRecord>>, AppError> {
    Ok(Json(state.history.list().await?))
}

/// GET /api/v1/history/:id
pub async fn handle_get_record(
    State(state): State<AppState>,
    UrlPath(id): UrlPath<i64>,
) -> Result<Json<EvaluationRecord>, AppError> {
    let record = state
        .history
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Record {id} not found")))?;
    Ok(Json(record))
}

#[derive(Serialize)]
pub struct DeleteResponse {
    pub deleted: bool,
}

/// DELETE /api/v1/history/:id
/// Deleting a nonexistent id is not an error; the flag says what happened.
pub async fn handle_delete_record(
    State(state): State<AppState>,
    UrlPath(id): UrlPath<i64>,
) -> Result<Json<DeleteResponse>, AppError> {
    let deleted = state.history.delete(id).await?;
    Ok(Json(DeleteResponse { deleted }))
}

/// DELETE /api/v1/history
pub async fn handle_purge_history(
    State(state): State<AppState>,
) -> Result<StatusCode, AppError> {
    state.history.purge().await?;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Deserialize)]
pub struct ExportQuery {
    pub format: ExportFormat,
}

#[derive(Serialize)]
pub struct ExportResponse {
    pub path: String,
}

/// POST /api/v1/history/:id/export?format=json|html|csv
pub async fn handle_export_record(
    State(state): State<AppState>,
    UrlPath(id): UrlPath<i64>,
    Query(query): Query<ExportQuery>,
) -> Result<Json<ExportResponse>, AppError> {
    let record = state
        .history
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Record {id} not found")))?;

    let path = export_record(&record, query.format, Path::new(&state.config.export_dir))?;
    Ok(Json(ExportResponse {
        path: path.to_string_lossy().into_owned(),
    }))
}
