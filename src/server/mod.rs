//! HTTP server.
//!
//! Provides two endpoints:
//! - `POST /api/export-ads` - CSV export of the requested ids
//! - `GET /status` - JSON status endpoint with export counters

mod handlers;
mod types;

use axum::routing::{get, post};
use axum::Router;
use log::info;
use tokio::net::TcpListener;

use crate::config::{EXPORT_ROUTE, STATUS_ROUTE};
use handlers::{export_handler, status_handler};
pub use types::AppState;

/// Builds the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route(EXPORT_ROUTE, post(export_handler))
        .route(STATUS_ROUTE, get(status_handler))
        .with_state(state)
}

/// Serves the router on an already bound listener until Ctrl-C.
pub async fn serve(listener: TcpListener, state: AppState) -> Result<(), anyhow::Error> {
    let addr = listener.local_addr()?;
    info!("Export server listening on http://{}/", addr);
    info!("  - Export: POST http://{}{}", addr, EXPORT_ROUTE);
    info!("  - Status: GET http://{}{}", addr, STATUS_ROUTE);

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| anyhow::anyhow!("Export server error: {}", e))?;

    info!("Export server stopped");
    Ok(())
}

/// Binds `bind` and serves until Ctrl-C.
pub async fn start_server(bind: &str, state: AppState) -> Result<(), anyhow::Error> {
    let listener = TcpListener::bind(bind)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to bind export server to {}: {}", bind, e))?;
    serve(listener, state).await
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_err() {
        // No signal handler available; run until the process is killed
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
