pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::analysis::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.max_upload_bytes();

    Router::new()
        .route("/health", get(health::health_handler))
        // Pages
        .route("/", get(handlers::handle_upload_page))
        .route("/analyze", post(handlers::handle_analyze_page))
        // Analysis API
        .route("/api/v1/analyze", post(handlers::handle_analyze))
        .route("/api/v1/analyze/csv", post(handlers::handle_analyze_csv))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}
