//! HTTP client for OpenAI-compatible chat-completion endpoints.
//!
//! Text analysis and image analysis may point at different endpoints
//! (and models); both speak the same request/response shape.

mod config;
mod prompts;

use async_trait::async_trait;
use futures::StreamExt;
use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

pub use config::LlmConfig;
pub use prompts::{
    DEFAULT_IMAGE_PROMPT, IMAGE_THOROUGHNESS_SUFFIX, STREAMING_ANALYSIS_PROMPT,
    TEXT_ANALYSIS_PROMPT,
};

use super::backend::{ByteStream, ChatMessage, CompletionBackend};
use crate::error::AnalysisError;

/// Message used when a text completion has no `choices[0].message`.
const INVALID_TEXT_RESPONSE: &str = "Received invalid response format from the analysis API";

/// Message used when a vision completion has no `choices[0].message`.
const INVALID_VISION_RESPONSE: &str =
    "Received invalid response format from the image analysis API";

/// Chat-completions request body.
#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    model: Option<&'a str>,
    messages: &'a [ChatMessage],
    #[serde(skip_serializing_if = "Option::is_none")]
    stream: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
    error: Option<ApiErrorBody>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Option<ResponseMessage>,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

/// Completion client backed by `reqwest`.
pub struct LlmClient {
    config: LlmConfig,
    client: Client,
}

impl LlmClient {
    /// Create a client. The configured timeout covers each whole request,
    /// including a streamed body.
    pub fn new(config: LlmConfig) -> Result<Self, AnalysisError> {
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| {
                AnalysisError::upstream(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self { config, client })
    }

    pub fn config(&self) -> &LlmConfig {
        &self.config
    }

    async fn post(
        &self,
        url: &str,
        request: &CompletionRequest<'_>,
    ) -> Result<Response, AnalysisError> {
        debug!("POST {} ({} messages)", url, request.messages.len());

        let mut builder = self.client.post(url).json(request);
        if let Some(key) = &self.config.api_key {
            builder = builder.bearer_auth(key);
        }
        let response = builder.send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("Completion endpoint returned {}: {}", status, body);
            return Err(AnalysisError::Upstream {
                status: Some(status.as_u16()),
                message: format!(
                    "API error: {} {}. {}",
                    status.as_u16(),
                    status.canonical_reason().unwrap_or(""),
                    body
                ),
            });
        }

        Ok(response)
    }

    async fn post_for_content(
        &self,
        url: &str,
        request: &CompletionRequest<'_>,
        invalid_message: &str,
    ) -> Result<String, AnalysisError> {
        let response = self.post(url, request).await?;
        // Errors below come from a response the endpoint did send.
        let status = Some(response.status().as_u16());
        let invalid = || AnalysisError::Upstream {
            status,
            message: invalid_message.to_string(),
        };

        let body: CompletionResponse = response.json().await.map_err(|e| {
            warn!("Undecodable completion response: {}", e);
            invalid()
        })?;

        if let Some(error) = body.error {
            return Err(AnalysisError::Upstream {
                status,
                message: format!("API error: {}", error.message),
            });
        }

        body.choices
            .into_iter()
            .next()
            .and_then(|c| c.message)
            .map(|m| m.content.unwrap_or_default())
            .ok_or_else(invalid)
    }
}

#[async_trait]
impl CompletionBackend for LlmClient {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, AnalysisError> {
        let request = CompletionRequest {
            model: self.config.model.as_deref(),
            messages,
            stream: None,
            max_tokens: None,
            temperature: None,
        };
        let content = self
            .post_for_content(&self.config.endpoint, &request, INVALID_TEXT_RESPONSE)
            .await?;
        info!("Text completion returned {} chars", content.len());
        Ok(content)
    }

    async fn open_stream(&self, messages: &[ChatMessage]) -> Result<ByteStream, AnalysisError> {
        let request = CompletionRequest {
            model: self.config.model.as_deref(),
            messages,
            stream: Some(true),
            max_tokens: None,
            temperature: None,
        };
        let response = self.post(&self.config.endpoint, &request).await?;
        info!("Streaming completion opened");

        Ok(response
            .bytes_stream()
            .map(|chunk| chunk.map_err(AnalysisError::from))
            .boxed())
    }

    async fn complete_vision(&self, messages: &[ChatMessage]) -> Result<String, AnalysisError> {
        let request = CompletionRequest {
            model: self.config.vision_model(),
            messages,
            stream: None,
            max_tokens: Some(self.config.max_tokens),
            temperature: Some(self.config.temperature),
        };
        let content = self
            .post_for_content(
                self.config.vision_endpoint(),
                &request,
                INVALID_VISION_RESPONSE,
            )
            .await?;
        info!("Vision completion returned {} chars", content.len());
        Ok(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{http::StatusCode, routing::post, Json, Router};
    use serde_json::{json, Value};

    async fn spawn_upstream(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}/v1/chat/completions", addr)
    }

    #[test]
    fn test_vision_request_shape() {
        let messages = [ChatMessage::user_with_image("look", "data:image/jpeg;base64,AA")];
        let request = CompletionRequest {
            model: Some("vision"),
            messages: &messages,
            stream: None,
            max_tokens: Some(4000),
            temperature: Some(0.5),
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["model"], "vision");
        assert_eq!(value["max_tokens"], 4000);
        assert_eq!(value["temperature"], 0.5);
        assert_eq!(value["messages"][0]["content"][1]["type"], "image_url");
        assert!(value.get("stream").is_none());
    }

    #[test]
    fn test_text_request_omits_unset_fields() {
        let messages = [ChatMessage::user("x")];
        let request = CompletionRequest {
            model: None,
            messages: &messages,
            stream: Some(true),
            max_tokens: None,
            temperature: None,
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value,
            json!({"messages": [{"role": "user", "content": "x"}], "stream": true})
        );
    }

    #[tokio::test]
    async fn test_complete_reads_first_choice() {
        let app = Router::new().route(
            "/v1/chat/completions",
            post(|Json(body): Json<Value>| async move {
                assert_eq!(body["messages"][0]["content"], "hello");
                Json(json!({"choices": [{"message": {"role": "assistant", "content": "world"}}]}))
            }),
        );
        let endpoint = spawn_upstream(app).await;

        let client = LlmClient::new(LlmConfig::default().with_endpoint(&endpoint)).unwrap();
        let content = client.complete(&[ChatMessage::user("hello")]).await.unwrap();
        assert_eq!(content, "world");
    }

    #[tokio::test]
    async fn test_non_success_status_becomes_upstream_error() {
        let app = Router::new().route(
            "/v1/chat/completions",
            post(|| async { (StatusCode::TOO_MANY_REQUESTS, "slow down") }),
        );
        let endpoint = spawn_upstream(app).await;

        let client = LlmClient::new(LlmConfig::default().with_vision_endpoint(&endpoint)).unwrap();
        let err = client
            .complete_vision(&[ChatMessage::user_with_image("x", "data:image/jpeg;base64,AA")])
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "API error: 429 Too Many Requests. slow down");
        assert!(matches!(
            err,
            AnalysisError::Upstream {
                status: Some(429),
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_missing_choices_is_invalid_format() {
        let app = Router::new().route(
            "/v1/chat/completions",
            post(|| async { Json(json!({"choices": []})) }),
        );
        let endpoint = spawn_upstream(app).await;

        let client = LlmClient::new(LlmConfig::default().with_vision_endpoint(&endpoint)).unwrap();
        let err = client
            .complete_vision(&[ChatMessage::user("x")])
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), INVALID_VISION_RESPONSE);
    }

    #[tokio::test]
    async fn test_api_key_sent_as_bearer() {
        let app = Router::new().route(
            "/v1/chat/completions",
            post(|headers: axum::http::HeaderMap| async move {
                let auth = headers
                    .get("authorization")
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or_default()
                    .to_string();
                Json(json!({"choices": [{"message": {"content": auth}}]}))
            }),
        );
        let endpoint = spawn_upstream(app).await;

        let mut config = LlmConfig::default().with_endpoint(&endpoint);
        config.api_key = Some("sk-local".into());
        let client = LlmClient::new(config).unwrap();
        let content = client.complete(&[ChatMessage::user("x")]).await.unwrap();
        assert_eq!(content, "Bearer sk-local");
    }
}
