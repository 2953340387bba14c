//! Health and dashboard listing endpoints.

use axum::{extract::Query, http::StatusCode, response::IntoResponse, Json};

use super::helpers::RecentQuery;
use crate::models::recent_analyses;

/// Health check endpoint for container orchestration.
pub async fn health() -> impl IntoResponse {
    StatusCode::OK
}

/// Recent analyses, filtered by `type` and ordered by `sort`.
pub async fn api_recent_analyses(Query(params): Query<RecentQuery>) -> impl IntoResponse {
    Json(recent_analyses(params.kind, params.sort))
}
