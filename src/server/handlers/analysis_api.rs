//! Analysis endpoints: text, streamed text and image.

use axum::{
    body::Body,
    extract::{rejection::JsonRejection, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use bytes::Bytes;
use futures::StreamExt;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::warn;

use super::super::AppState;
use super::helpers::{
    error_response, rejection_response, DataAnalysisRequest, ImageAnalysisRequest,
};
use crate::error::AnalysisError;

/// Structured text analysis with summary stats.
pub async fn api_data_analysis(
    State(state): State<AppState>,
    body: Result<Json<DataAnalysisRequest>, JsonRejection>,
) -> Response {
    let Json(req) = match body {
        Ok(body) => body,
        Err(rejection) => return rejection_response(rejection),
    };
    let input = req.input_data.unwrap_or_default();
    match state.analysis.analyze_text(&input).await {
        Ok(outcome) => Json(outcome).into_response(),
        Err(e) => error_response(&e),
    }
}

/// Progress of a streamed analysis, as seen by the response body.
enum StreamEvent {
    /// Text appended since the previous event.
    Delta(String),
    Failed(AnalysisError),
}

fn into_chunk(event: StreamEvent) -> Result<Bytes, std::io::Error> {
    match event {
        StreamEvent::Delta(text) => Ok(Bytes::from(text)),
        StreamEvent::Failed(e) => {
            warn!("Aborting streamed response: {}", e);
            Err(std::io::Error::other(e.to_string()))
        }
    }
}

/// Streamed narrative analysis as a chunked `text/plain` body.
///
/// Failures before any text arrives are reported as a JSON error; later
/// failures abort the body. The upstream request is cancelled when the
/// client goes away.
pub async fn api_data_analysis_stream(
    State(state): State<AppState>,
    body: Result<Json<DataAnalysisRequest>, JsonRejection>,
) -> Response {
    let Json(req) = match body {
        Ok(body) => body,
        Err(rejection) => return rejection_response(rejection),
    };
    let input = req.input_data.unwrap_or_default();
    let (tx, mut rx) = mpsc::unbounded_channel();
    let cancel = CancellationToken::new();

    let service = state.analysis.clone();
    let task_cancel = cancel.clone();
    tokio::spawn(async move {
        let chunk_tx = tx.clone();
        let mut sent = 0;
        let result = service
            .stream_text(&input, &task_cancel, |text| {
                let delta = text[sent..].to_string();
                sent = text.len();
                if chunk_tx.send(StreamEvent::Delta(delta)).is_err() {
                    task_cancel.cancel();
                }
            })
            .await;

        match result {
            Ok(_) | Err(AnalysisError::Cancelled) => {}
            Err(e) => {
                let _ = tx.send(StreamEvent::Failed(e));
            }
        }
    });

    let first = match rx.recv().await {
        Some(StreamEvent::Failed(e)) => return error_response(&e),
        first => first,
    };

    let guard = cancel.drop_guard();
    let rest = futures::stream::unfold((rx, guard), |(mut rx, guard)| async move {
        let event = rx.recv().await?;
        Some((into_chunk(event), (rx, guard)))
    });
    let body = futures::stream::iter(first.map(into_chunk)).chain(rest);

    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        Body::from_stream(body),
    )
        .into_response()
}

/// Image analysis.
pub async fn api_image_analysis(
    State(state): State<AppState>,
    body: Result<Json<ImageAnalysisRequest>, JsonRejection>,
) -> Response {
    let Json(req) = match body {
        Ok(body) => body,
        Err(rejection) => return rejection_response(rejection),
    };
    let image = req.image_base64.unwrap_or_default();
    match state
        .analysis
        .analyze_image(&image, req.instructions.as_deref())
        .await
    {
        Ok(result) => Json(result).into_response(),
        Err(e) => error_response(&e),
    }
}
