//! Helper types and utility functions for handlers.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::AnalysisError;
use crate::models::{AnalysisResult, KindFilter, SortOrder};

/// Body of the text analysis endpoints.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataAnalysisRequest {
    #[serde(default)]
    pub input_data: Option<String>,
}

/// Body of the image analysis endpoint.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageAnalysisRequest {
    #[serde(default)]
    pub image_base64: Option<String>,
    #[serde(default)]
    pub instructions: Option<String>,
}

/// Body of the document generation endpoint.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentRequest {
    #[serde(default)]
    pub analysis_result: Value,
    #[serde(default)]
    pub format: String,
}

/// Body of the outline endpoint.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutlineRequest {
    pub analysis_result: OutlineSource,
}

/// What the outline endpoint accepts: a result object or bare markdown.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum OutlineSource {
    Text(String),
    Result(AnalysisResult),
}

impl From<OutlineSource> for AnalysisResult {
    fn from(source: OutlineSource) -> Self {
        match source {
            OutlineSource::Text(text) => AnalysisResult::narrative(text),
            OutlineSource::Result(result) => result,
        }
    }
}

/// Query params for the recent analyses list.
#[derive(Debug, Default, Deserialize)]
pub struct RecentQuery {
    #[serde(rename = "type", default)]
    pub kind: KindFilter,
    #[serde(default)]
    pub sort: SortOrder,
}

/// HTTP status reported for an error.
pub fn status_for(err: &AnalysisError) -> StatusCode {
    match err {
        AnalysisError::Input(_) => StatusCode::BAD_REQUEST,
        AnalysisError::Upstream { .. } => StatusCode::BAD_GATEWAY,
        AnalysisError::Timeout | AnalysisError::Cancelled => StatusCode::GATEWAY_TIMEOUT,
        AnalysisError::Parse(_) | AnalysisError::Export(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Flatten an error into `{"error": "..."}`.
pub fn error_response(err: &AnalysisError) -> Response {
    let status = status_for(err);
    if status.is_server_error() {
        tracing::warn!("Request failed ({}): {}", status, err);
    } else {
        tracing::debug!("Rejected request: {}", err);
    }
    (status, Json(json!({ "error": err.to_string() }))).into_response()
}

/// Report a body that failed to parse as `{"error": ...}`.
pub fn rejection_response(rejection: JsonRejection) -> Response {
    error_response(&AnalysisError::input(rejection.body_text()))
}
