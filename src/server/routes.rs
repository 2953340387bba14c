//! Router configuration for the web server.

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;

use super::handlers;
use super::AppState;

/// Create the main router with all routes.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        // Analysis
        .route("/api/data-analysis", post(handlers::api_data_analysis))
        .route(
            "/api/data-analysis/stream",
            post(handlers::api_data_analysis_stream),
        )
        .route("/api/image-analysis", post(handlers::api_image_analysis))
        // Export and display
        .route(
            "/api/document-generation",
            post(handlers::api_document_generation),
        )
        .route("/api/outline", post(handlers::api_outline))
        .route("/api/recent-analyses", get(handlers::api_recent_analyses))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
