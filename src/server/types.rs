//! Server state and response types.

use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;

use crate::error_handling::ExportStats;
use crate::export::ExportPipeline;

/// Shared state for the HTTP handlers
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<ExportPipeline>,
    pub stats: Arc<ExportStats>,
    pub start_time: Arc<Instant>,
}

impl AppState {
    pub fn new(pipeline: ExportPipeline) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
            stats: Arc::new(ExportStats::new()),
            start_time: Arc::new(Instant::now()),
        }
    }
}

/// JSON response for `/status` endpoint
#[derive(Serialize)]
pub struct StatusResponse {
    pub uptime_seconds: f64,
    pub batch_size: usize,
    pub batch_concurrency: usize,
    pub exports_completed: usize,
    pub rows_exported: usize,
    pub batches_run: usize,
    pub failures: FailureCounts,
}

#[derive(Serialize)]
pub struct FailureCounts {
    pub total: usize,
    pub invalid_request: usize,
    pub not_found: usize,
    pub upstream_failure: usize,
    pub serialization: usize,
}

/// JSON body of every error response
#[derive(Serialize)]
pub struct ErrorBody {
    pub error: &'static str,
}
