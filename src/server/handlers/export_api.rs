//! Document generation and outline endpoints.

use axum::{
    extract::rejection::JsonRejection,
    response::{IntoResponse, Response},
    Json,
};

use super::helpers::{error_response, rejection_response, DocumentRequest, OutlineRequest};
use crate::export::generate_document;
use crate::services::outline;

/// Convert an analysis into a downloadable data URL.
pub async fn api_document_generation(
    body: Result<Json<DocumentRequest>, JsonRejection>,
) -> Response {
    let Json(req) = match body {
        Ok(body) => body,
        Err(rejection) => return rejection_response(rejection),
    };
    match generate_document(&req.analysis_result, &req.format) {
        Ok(document) => Json(document).into_response(),
        Err(e) => error_response(&e),
    }
}

/// Sections the dashboard renders for a result or bare markdown.
pub async fn api_outline(body: Result<Json<OutlineRequest>, JsonRejection>) -> Response {
    match body {
        Ok(Json(req)) => Json(outline(&req.analysis_result.into())).into_response(),
        Err(rejection) => rejection_response(rejection),
    }
}
