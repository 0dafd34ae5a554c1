//! Axum HTTP/WebSocket transport: binds the External Interfaces surface over
//! the orchestration core.

mod debug_file;
mod errors;
mod handlers;
pub mod state;
mod ws;

use axum::routing::{delete, get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

pub use state::AppState;

#[must_use]
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/crawl/single", post(handlers::crawl_single))
        .route("/crawl/bulk", post(handlers::crawl_bulk))
        .route("/crawl/smart", post(handlers::crawl_smart))
        .route("/crawl/unified", post(handlers::crawl_unified))
        .route("/jobs/{id}/status", get(handlers::job_status))
        .route("/jobs/{id}/results", get(handlers::job_results))
        .route("/jobs/{id}/download", get(handlers::job_download))
        .route("/jobs/{id}", delete(handlers::job_cancel))
        .route("/engines/status", get(handlers::engines_status))
        .route("/healthz", get(handlers::healthz))
        .route("/ws/{connection_id}", get(ws::ws_upgrade))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
