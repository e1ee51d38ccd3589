//! JSON status handler.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use super::super::types::{AppState, FailureCounts, StatusResponse};
use crate::error_handling::ExportErrorKind;

/// JSON status endpoint with export counters
pub async fn status_handler(State(state): State<AppState>) -> Response {
    let stats = &state.stats;

    let response = StatusResponse {
        uptime_seconds: state.start_time.elapsed().as_secs_f64(),
        batch_size: state.pipeline.batch_size(),
        batch_concurrency: state.pipeline.batch_concurrency(),
        exports_completed: stats.completed(),
        rows_exported: stats.rows_exported(),
        batches_run: stats.batches_run(),
        failures: FailureCounts {
            total: stats.total_failures(),
            invalid_request: stats.get_failure_count(ExportErrorKind::InvalidRequest),
            not_found: stats.get_failure_count(ExportErrorKind::NotFound),
            upstream_failure: stats.get_failure_count(ExportErrorKind::UpstreamFailure),
            serialization: stats.get_failure_count(ExportErrorKind::Serialization),
        },
    };

    let json = match serde_json::to_string_pretty(&response) {
        Ok(json) => json,
        Err(e) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to serialize status: {}", e),
            )
                .into_response();
        }
    };

    (StatusCode::OK, [("content-type", "application/json")], json).into_response()
}
