//! Chat message types and the completion backend trait.

use std::pin::Pin;

use async_trait::async_trait;
use bytes::Bytes;
use futures::Stream;
use serde::Serialize;

use crate::error::AnalysisError;

/// Body of a streaming completion, chunk by chunk.
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, AnalysisError>> + Send>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
}

/// One message of a chat-completions request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: MessageContent,
}

/// Plain text, or a list of typed parts for vision requests.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum MessageContent {
    Text(String),
    Parts(Vec<ContentPart>),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum ContentPart {
    #[serde(rename = "text")]
    Text { text: String },
    #[serde(rename = "image_url")]
    ImageUrl { image_url: ImageUrl },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImageUrl {
    pub url: String,
}

impl ChatMessage {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: MessageContent::Text(text.into()),
        }
    }

    /// A user message carrying a prompt and one image (as a data URL).
    pub fn user_with_image(text: impl Into<String>, image_url: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: MessageContent::Parts(vec![
                ContentPart::Text { text: text.into() },
                ContentPart::ImageUrl {
                    image_url: ImageUrl {
                        url: image_url.into(),
                    },
                },
            ]),
        }
    }

    /// Text of the message, ignoring image parts.
    pub fn text(&self) -> String {
        match &self.content {
            MessageContent::Text(text) => text.clone(),
            MessageContent::Parts(parts) => parts
                .iter()
                .filter_map(|p| match p {
                    ContentPart::Text { text } => Some(text.as_str()),
                    ContentPart::ImageUrl { .. } => None,
                })
                .collect::<Vec<_>>()
                .join("\n"),
        }
    }
}

/// Something that answers chat-completion requests.
///
/// [`LlmClient`](super::LlmClient) talks to real endpoints; tests substitute
/// canned responses.
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    /// Non-streaming completion on the text endpoint; returns
    /// `choices[0].message.content`.
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, AnalysisError>;

    /// Streaming completion on the text endpoint; returns the raw body.
    async fn open_stream(&self, messages: &[ChatMessage]) -> Result<ByteStream, AnalysisError>;

    /// Completion on the vision endpoint.
    async fn complete_vision(&self, messages: &[ChatMessage]) -> Result<String, AnalysisError>;
}
