//! Analysis orchestration.
//!
//! Validates input, builds prompts, calls the completion backend and shapes
//! the answer into an [`AnalysisResult`]. Separated from transport concerns
//! so the server and the CLI share it.

use std::sync::Arc;
use std::time::Instant;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::image::{image_prompt, normalize_headings, normalize_image_data_url};
use crate::error::AnalysisError;
use crate::llm::{
    ChatMessage, CompletionBackend, LineFrames, LlmClient, LlmConfig, StreamAggregator,
    STREAMING_ANALYSIS_PROMPT, TEXT_ANALYSIS_PROMPT,
};
use crate::markdown::{segment_or_default, Section, DEFAULT_SECTION_TITLE};
use crate::models::{
    AnalysisOutcome, AnalysisResult, NarrativeAnalysis, StructuredAnalysis, SummaryStats,
};

const EMPTY_INPUT: &str = "Please enter data to analyze.";
const EMPTY_IMAGE: &str = "No image data provided.";
const IMAGE_SUCCESS: &str = "Comprehensive image analysis completed successfully.";

/// Service running text and image analyses against a completion backend.
#[derive(Clone)]
pub struct AnalysisService {
    backend: Arc<dyn CompletionBackend>,
}

impl AnalysisService {
    /// Create a service talking to the configured endpoints.
    pub fn new(config: LlmConfig) -> Result<Self, AnalysisError> {
        Ok(Self::with_backend(Arc::new(LlmClient::new(config)?)))
    }

    pub fn with_backend(backend: Arc<dyn CompletionBackend>) -> Self {
        Self { backend }
    }

    /// Ask for structured insights (summary, key points, recommendations).
    pub async fn analyze_text(&self, input: &str) -> Result<AnalysisOutcome, AnalysisError> {
        let input = non_blank(input, EMPTY_INPUT)?;
        let prompt = TEXT_ANALYSIS_PROMPT.replace("{content}", input);

        info!("Analyzing {} chars of text", input.len());
        let started = Instant::now();
        let content = self
            .backend
            .complete(&[ChatMessage::user(prompt)])
            .await
            .map_err(|e| with_prefix(e, "Failed to process input data: "))?;
        let elapsed = started.elapsed();

        let result = AnalysisResult::Structured(StructuredAnalysis::from_completion(&content));
        let stats = SummaryStats::for_result(&result, elapsed);
        debug!(
            "Text analysis finished in {}ms with {} key points",
            stats.processing_time_ms, stats.key_insights
        );
        Ok(AnalysisOutcome { result, stats })
    }

    /// Stream a narrative analysis, reporting the cumulative text as it grows.
    ///
    /// Cancelling `cancel` aborts the upstream request; `on_chunk` is then
    /// not called again and the partial text is dropped.
    pub async fn stream_text(
        &self,
        input: &str,
        cancel: &CancellationToken,
        on_chunk: impl FnMut(&str) + Send,
    ) -> Result<AnalysisResult, AnalysisError> {
        let input = non_blank(input, EMPTY_INPUT)?;
        let prompt = STREAMING_ANALYSIS_PROMPT.replace("{content}", input);
        let messages = [ChatMessage::user(prompt)];

        info!("Streaming analysis of {} chars of text", input.len());
        let started = Instant::now();
        let stream = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(AnalysisError::Cancelled),
            stream = self.backend.open_stream(&messages) => {
                stream.map_err(|e| with_prefix(e, "Failed to analyze data: "))?
            }
        };

        let analysis = StreamAggregator::new(LineFrames::default())
            .on_chunk(on_chunk)
            .on_finish(|text| {
                info!(
                    "Stream complete: {} chars in {}ms",
                    text.len(),
                    started.elapsed().as_millis()
                )
            })
            .run(stream, cancel)
            .await
            .map_err(|e| with_prefix(e, "Failed to analyze data: "))?;

        Ok(AnalysisResult::narrative(analysis))
    }

    /// Describe an image, optionally steered by `instructions`.
    pub async fn analyze_image(
        &self,
        image: &str,
        instructions: Option<&str>,
    ) -> Result<AnalysisResult, AnalysisError> {
        if image.is_empty() {
            return Err(AnalysisError::input(EMPTY_IMAGE));
        }

        let image_url = normalize_image_data_url(image);
        let prompt = image_prompt(instructions);

        info!("Analyzing image ({} bytes encoded)", image_url.len());
        let content = self
            .backend
            .complete_vision(&[ChatMessage::user_with_image(prompt, image_url.clone())])
            .await
            .map_err(|e| match e {
                // Endpoint responses are reported as they came back.
                AnalysisError::Upstream { status: Some(_), .. } => e,
                e => with_prefix(e, "Failed to analyze image: "),
            })?;

        Ok(AnalysisResult::Narrative(NarrativeAnalysis {
            analysis: normalize_headings(&content),
            image_url: Some(image_url),
            message: Some(IMAGE_SUCCESS.to_string()),
        }))
    }
}

/// Sections to display for a result.
///
/// Narrative text without headings becomes one section titled
/// [`DEFAULT_SECTION_TITLE`]; structured results are shown as their JSON.
pub fn outline(result: &AnalysisResult) -> Vec<Section> {
    match result {
        AnalysisResult::Narrative(n) => segment_or_default(&n.analysis, DEFAULT_SECTION_TITLE),
        AnalysisResult::Structured(s) => match serde_json::to_string_pretty(s) {
            Ok(json) => segment_or_default(&json, DEFAULT_SECTION_TITLE),
            Err(e) => {
                warn!("Failed to render structured analysis: {}", e);
                Vec::new()
            }
        },
        AnalysisResult::Failure(_) => Vec::new(),
    }
}

fn non_blank<'a>(input: &'a str, message: &str) -> Result<&'a str, AnalysisError> {
    if input.trim().is_empty() {
        return Err(AnalysisError::input(message));
    }
    Ok(input)
}

/// Prefix the user-facing message of an upstream failure.
fn with_prefix(err: AnalysisError, prefix: &str) -> AnalysisError {
    match err {
        AnalysisError::Upstream { status, message } => AnalysisError::Upstream {
            status,
            message: format!("{}{}", prefix, message),
        },
        other => other,
    }
}
