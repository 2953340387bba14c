//! Analysis result shapes.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::AnalysisError;

/// Outcome of a single analysis round-trip.
///
/// Serialized untagged so each variant keeps the flat wire shape the
/// dashboard expects: `{summary, key_points, recommendations}`,
/// `{analysis, ...}` or `{error}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnalysisResult {
    Failure(Failure),
    Narrative(NarrativeAnalysis),
    Structured(StructuredAnalysis),
}

/// Structured insights produced by the text analysis call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructuredAnalysis {
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub key_points: Vec<String>,
    #[serde(default)]
    pub recommendations: Vec<String>,
}

/// Free-form markdown analysis (streamed text or image analysis).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NarrativeAnalysis {
    pub analysis: String,
    #[serde(
        rename = "imageUrl",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// A request that failed; carries only the message shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Failure {
    pub error: String,
}

impl AnalysisResult {
    pub fn narrative(analysis: impl Into<String>) -> Self {
        Self::Narrative(NarrativeAnalysis {
            analysis: analysis.into(),
            ..Default::default()
        })
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self::Failure(Failure {
            error: error.into(),
        })
    }
}

/// Strip a surrounding fenced code block (```json ... ```), if any.
fn strip_code_fence(content: &str) -> &str {
    let trimmed = content.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let Some(body) = rest.strip_suffix("```") else {
        return trimmed;
    };
    // Drop the info string ("json") on the opening fence line.
    match body.split_once('\n') {
        Some((_, inner)) => inner.trim(),
        None => body.trim(),
    }
}

impl StructuredAnalysis {
    /// Parse completion content that was asked to be a JSON object.
    pub fn parse(content: &str) -> Result<Self, AnalysisError> {
        serde_json::from_str(strip_code_fence(content))
            .map_err(|e| AnalysisError::Parse(e.to_string()))
    }

    /// Parse completion content, falling back to the raw text as summary.
    pub fn from_completion(content: &str) -> Self {
        match Self::parse(content) {
            Ok(analysis) => analysis,
            Err(e) => {
                warn!("Failed to parse JSON: {}", e);
                Self {
                    summary: content.to_string(),
                    key_points: Vec::new(),
                    recommendations: Vec::new(),
                }
            }
        }
    }
}

/// Headline numbers shown next to an analysis.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SummaryStats {
    /// Sentences in the summary, counted by periods.
    pub total_points: usize,
    /// Number of key points.
    pub key_insights: usize,
    /// Wall time of the upstream call.
    pub processing_time_ms: u64,
}

impl SummaryStats {
    pub fn for_result(result: &AnalysisResult, elapsed: Duration) -> Self {
        let (total_points, key_insights) = match result {
            AnalysisResult::Structured(s) => (s.summary.matches('.').count(), s.key_points.len()),
            _ => (0, 0),
        };
        Self {
            total_points,
            key_insights,
            processing_time_ms: elapsed.as_millis() as u64,
        }
    }
}

/// An analysis result together with its stats.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisOutcome {
    #[serde(flatten)]
    pub result: AnalysisResult,
    pub stats: SummaryStats,
}
