//! End-to-end tests: the dashboard API served over TCP, talking to a fake
//! completion endpoint that is also served locally.

use std::convert::Infallible;
use std::net::SocketAddr;
use std::time::Duration;

use axum::{
    body::Body,
    http::{header, StatusCode},
    routing::post,
    Json, Router,
};
use bytes::Bytes;
use futures::StreamExt;
use serde_json::{json, Value};

use insightboard::config::Settings;
use insightboard::llm::LlmConfig;
use insightboard::server::{create_router, AppState};

async fn spawn(app: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

/// Fake OpenAI-compatible endpoint.
///
/// Text requests get a fenced JSON answer, streaming requests an SSE body
/// delivered in several chunks, vision requests echo what they received.
async fn completions(Json(body): Json<Value>) -> axum::response::Response {
    use axum::response::IntoResponse;

    let prompt = body["messages"][0]["content"].clone();
    if prompt.as_str().is_some_and(|p| p.contains("SLOW")) {
        tokio::time::sleep(Duration::from_secs(5)).await;
    }

    if body["stream"] == json!(true) {
        let frames = [
            "data: {\"choices\":[{\"delta\":{\"content\":\"# Executive \"}}]}\n\n",
            "data: {\"choices\":[{\"delta\":{\"content\":\"Summary\\nRevenue gr",
            "ew.\"}}]}\n\ndata: {\"choices\":[{\"delta\":{\"content\":\" Café ☕\"}}]}\n\n",
            "data: [DONE]\n\n",
        ];
        let stream = futures::stream::iter(frames).then(|frame| async move {
            tokio::time::sleep(Duration::from_millis(10)).await;
            Ok::<_, Infallible>(Bytes::from_static(frame.as_bytes()))
        });
        return (
            [(header::CONTENT_TYPE, "text/event-stream")],
            Body::from_stream(stream),
        )
            .into_response();
    }

    if let Some(parts) = prompt.as_array() {
        let url = parts[1]["image_url"]["url"].as_str().unwrap_or_default();
        let content = format!(
            "## Description\nimage {}\n### Tokens\n{}",
            url,
            body["max_tokens"]
        );
        return Json(json!({"choices": [{"message": {"content": content}}]})).into_response();
    }

    let content = "```json\n{\"summary\":\"Revenue grew. Costs fell.\",\"key_points\":[\"growth\"],\"recommendations\":[\"hire\"]}\n```";
    Json(json!({"choices": [{"message": {"content": content}}]})).into_response()
}

async fn setup(timeout_secs: u64) -> String {
    let upstream = spawn(Router::new().route("/v1/chat/completions", post(completions))).await;

    let mut llm = LlmConfig::default().with_endpoint(&format!(
        "http://{}/v1/chat/completions",
        upstream
    ));
    llm.timeout_secs = timeout_secs;
    let settings = Settings {
        llm,
        ..Settings::default()
    };

    let app = create_router(AppState::new(&settings).unwrap());
    format!("http://{}", spawn(app).await)
}

#[tokio::test]
async fn test_text_analysis_round_trip() {
    let base = setup(30).await;
    let response = reqwest::Client::new()
        .post(format!("{}/api/data-analysis", base))
        .json(&json!({"inputData": "Q1: revenue 10, costs 5"}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["summary"], "Revenue grew. Costs fell.");
    assert_eq!(body["key_points"], json!(["growth"]));
    assert_eq!(body["recommendations"], json!(["hire"]));
    assert_eq!(body["stats"]["total_points"], 2);
}

#[tokio::test]
async fn test_streamed_analysis_round_trip() {
    let base = setup(30).await;
    let response = reqwest::Client::new()
        .post(format!("{}/api/data-analysis/stream", base))
        .json(&json!({"inputData": "Q1 numbers"}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let mut chunks = Vec::new();
    let mut stream = response.bytes_stream();
    while let Some(chunk) = stream.next().await {
        chunks.push(chunk.unwrap());
    }
    let text = String::from_utf8(chunks.concat()).unwrap();
    assert_eq!(text, "# Executive Summary\nRevenue grew. Café ☕");
}

#[tokio::test]
async fn test_image_analysis_round_trip() {
    let base = setup(30).await;
    let response = reqwest::Client::new()
        .post(format!("{}/api/image-analysis", base))
        .json(&json!({"imageBase64": "QUJD\nREVG", "instructions": "Read the labels"}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["imageUrl"], "data:image/jpeg;base64,QUJDREVG");
    assert_eq!(
        body["analysis"],
        "# Description\nimage data:image/jpeg;base64,QUJDREVG\n# Tokens\n4000"
    );
    assert_eq!(
        body["message"],
        "Comprehensive image analysis completed successfully."
    );
}

#[tokio::test]
async fn test_upstream_timeout_maps_to_gateway_timeout() {
    let base = setup(1).await;
    let response = reqwest::Client::new()
        .post(format!("{}/api/data-analysis", base))
        .json(&json!({"inputData": "SLOW please"}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::GATEWAY_TIMEOUT);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Upstream request timed out");
}

#[tokio::test]
async fn test_csv_export_is_readable() {
    let base = setup(30).await;
    let analysis = "# Findings\nSales said \"great\"\n- north, south\n## Next\nhire";
    let response = reqwest::Client::new()
        .post(format!("{}/api/document-generation", base))
        .json(&json!({"analysisResult": analysis, "format": "Excel"}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = response.json().await.unwrap();
    let url = body["downloadUrl"].as_str().unwrap();
    let encoded = url
        .strip_prefix("data:text/csv;charset=utf-8,")
        .unwrap();
    let csv_text = urlencoding::decode(encoded).unwrap().into_owned();

    let mut reader = csv::Reader::from_reader(csv_text.as_bytes());
    let rows: Vec<Vec<String>> = reader
        .records()
        .map(|r| r.unwrap().iter().map(str::to_string).collect())
        .collect();
    assert_eq!(
        rows,
        vec![
            vec!["Findings", "1", "Sales said \"great\""],
            vec!["Findings", "1", "- north, south"],
            vec!["Next", "2", "hire"],
        ]
    );
}
