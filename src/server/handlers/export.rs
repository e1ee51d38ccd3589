//! CSV export handler.

use axum::{
    body::Bytes,
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use log::{error, info, warn};

use super::super::types::{AppState, ErrorBody};
use crate::error_handling::ExportError;
use crate::export::{write_csv, ExportRequest};

/// `POST /api/export-ads`: body `{ "ids": [...] }`, responds with a CSV
/// attachment.
///
/// The body is parsed as JSON whatever the request's content type. A body
/// that is not valid JSON, or has no ids, is answered with 400.
pub async fn export_handler(State(state): State<AppState>, body: Bytes) -> Response {
    let request: ExportRequest = match serde_json::from_slice(&body) {
        Ok(request) => request,
        Err(e) => {
            warn!("Rejected export request body: {}", e);
            return error_response(&state, ExportError::InvalidRequest);
        }
    };

    let result = match state.pipeline.fetch(&request.ids).await {
        Ok(result) => result,
        Err(e) => return error_response(&state, e),
    };

    let body = match write_csv(&result) {
        Ok(body) => body,
        Err(e) => return error_response(&state, ExportError::from(e)),
    };

    state.stats.record_success(result.len(), result.batches);
    info!(
        "Exported {} rows for {} requested ids",
        result.len(),
        request.ids.len()
    );

    let filename = format!(
        "{}_{}.csv",
        state.pipeline.profile().filename_prefix,
        Utc::now().format("%Y-%m-%d")
    );

    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/csv".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", filename),
            ),
        ],
        body,
    )
        .into_response()
}

/// Logs the failure, counts it, and renders `{"error": "..."}` with the
/// mapped status. Upstream causes stay in the log.
fn error_response(state: &AppState, err: ExportError) -> Response {
    state.stats.increment_failure(err.kind());

    match &err {
        ExportError::UpstreamFailure(_) | ExportError::Serialization(_) => {
            error!("Error generating CSV: {}", err)
        }
        _ => info!("Export request rejected: {}", err),
    }

    (
        err.status_code(),
        Json(ErrorBody {
            error: err.public_message(),
        }),
    )
        .into_response()
}
