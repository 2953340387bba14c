//! LLM client configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Configuration for the completion endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Text completion endpoint (full URL, OpenAI chat-completions shape)
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// Vision completion endpoint; the text endpoint is used when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vision_endpoint: Option<String>,
    /// Bearer token sent to both endpoints
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Model for text analysis; omitted from requests when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    /// Model for image analysis; falls back to `model`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vision_model: Option<String>,
    /// Maximum tokens for image analysis responses
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// Temperature for image analysis (0.0 - 1.0)
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    /// Request timeout in seconds, covering the whole response body
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_endpoint() -> String {
    "http://localhost:11434/v1/chat/completions".to_string()
}

fn default_max_tokens() -> u32 {
    4000
}

fn default_temperature() -> f32 {
    0.7
}

fn default_timeout_secs() -> u64 {
    120
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            vision_endpoint: None,
            api_key: None,
            model: None,
            vision_model: None,
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl LlmConfig {
    /// Apply environment variable overrides.
    ///
    /// Supported env vars:
    /// - `LLM_ENDPOINT`: text completion URL
    /// - `LLM_VISION_ENDPOINT`: vision completion URL
    /// - `LLM_API_KEY`: bearer token (falls back to `OPENAI_API_KEY`)
    /// - `LLM_MODEL`: text model name
    /// - `LLM_VISION_MODEL`: vision model name
    /// - `LLM_MAX_TOKENS`: maximum tokens for image analysis
    /// - `LLM_TEMPERATURE`: temperature for image analysis
    /// - `LLM_TIMEOUT_SECS`: request timeout
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary key lookup.
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(val) = lookup("LLM_ENDPOINT") {
            self.endpoint = val;
        }
        if let Some(val) = lookup("LLM_VISION_ENDPOINT") {
            self.vision_endpoint = Some(val);
        }
        if let Some(val) = lookup("LLM_API_KEY").or_else(|| lookup("OPENAI_API_KEY")) {
            self.api_key = Some(val);
        }
        if let Some(val) = lookup("LLM_MODEL") {
            self.model = Some(val);
        }
        if let Some(val) = lookup("LLM_VISION_MODEL") {
            self.vision_model = Some(val);
        }
        if let Some(n) = lookup("LLM_MAX_TOKENS").and_then(|v| v.parse().ok()) {
            self.max_tokens = n;
        }
        if let Some(t) = lookup("LLM_TEMPERATURE").and_then(|v| v.parse().ok()) {
            self.temperature = t;
        }
        if let Some(n) = lookup("LLM_TIMEOUT_SECS").and_then(|v| v.parse().ok()) {
            self.timeout_secs = n;
        }
        self
    }

    pub fn with_endpoint(mut self, endpoint: &str) -> Self {
        self.endpoint = endpoint.to_string();
        self
    }

    pub fn with_vision_endpoint(mut self, endpoint: &str) -> Self {
        self.vision_endpoint = Some(endpoint.to_string());
        self
    }

    /// The endpoint image analysis requests go to.
    pub fn vision_endpoint(&self) -> &str {
        self.vision_endpoint.as_deref().unwrap_or(&self.endpoint)
    }

    /// The model image analysis requests name, if any.
    pub fn vision_model(&self) -> Option<&str> {
        self.vision_model.as_deref().or(self.model.as_deref())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
