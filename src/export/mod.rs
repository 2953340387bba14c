//! Document export: converts an analysis into a downloadable file.
//!
//! The file never touches disk; its content is percent-encoded into a
//! `data:` URL that the browser (or the CLI) can save directly.

mod csv_table;
mod html;
mod plain_text;

pub use csv_table::to_csv;
pub use html::{to_html, to_html_at};
pub use plain_text::to_plain_text;

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info};

use crate::error::AnalysisError;

/// Output formats offered by the export operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    /// CSV that spreadsheet applications open.
    Excel,
    /// Standalone HTML that word processors open.
    Word,
    /// The markdown as-is.
    Markdown,
    /// Markdown rendered to plain text.
    Text,
    /// Fallback for unrecognized formats: the content unchanged, as text.
    Raw,
}

impl DocumentFormat {
    /// Parse a format name. Unknown names fall back to [`DocumentFormat::Raw`].
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "excel" => Self::Excel,
            "word" => Self::Word,
            "markdown" => Self::Markdown,
            "text" => Self::Text,
            _ => Self::Raw,
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            Self::Excel => "text/csv",
            Self::Word => "text/html",
            Self::Markdown => "text/markdown",
            Self::Text | Self::Raw => "text/plain",
        }
    }

    pub fn file_name(self) -> &'static str {
        match self {
            Self::Excel => "analysis_report.csv",
            Self::Word => "analysis_report.html",
            Self::Markdown => "analysis_report.md",
            Self::Text => "analysis_report.txt",
            Self::Raw => "analysis_result.txt",
        }
    }

    /// Render markdown content into this format.
    pub fn render(self, markdown: &str) -> String {
        match self {
            Self::Excel => to_csv(markdown),
            Self::Word => to_html(markdown),
            Self::Text => to_plain_text(markdown),
            Self::Markdown | Self::Raw => markdown.to_string(),
        }
    }
}

/// A generated document, ready for download.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedDocument {
    pub download_url: String,
    pub file_name: String,
    pub message: String,
}

impl GeneratedDocument {
    /// Decode the file content back out of the data URL.
    pub fn content(&self) -> Result<String, AnalysisError> {
        let (_, encoded) = self
            .download_url
            .split_once(',')
            .ok_or_else(|| AnalysisError::Export("malformed data URL".to_string()))?;
        urlencoding::decode(encoded)
            .map(|c| c.into_owned())
            .map_err(|e| AnalysisError::Export(e.to_string()))
    }
}

/// Build a `data:` URL carrying `content` as UTF-8 text.
pub fn data_url(mime_type: &str, content: &str) -> String {
    format!(
        "data:{};charset=utf-8,{}",
        mime_type,
        urlencoding::encode(content)
    )
}

/// Extract the markdown to export from a loosely-shaped analysis value.
///
/// Strings are used as-is, objects with an `analysis` string contribute that
/// string, and anything else is pretty-printed as JSON.
pub fn analysis_content(analysis: &Value) -> Result<String, AnalysisError> {
    let missing = || AnalysisError::input("No analysis result provided.");
    match analysis {
        Value::Null | Value::Bool(false) => Err(missing()),
        Value::String(s) if s.is_empty() => Err(missing()),
        Value::String(s) => Ok(s.clone()),
        Value::Object(map) => match map.get("analysis").and_then(Value::as_str) {
            Some(text) if !text.is_empty() => Ok(text.to_string()),
            _ => serde_json::to_string_pretty(analysis)
                .map_err(|e| AnalysisError::Export(e.to_string())),
        },
        other => serde_json::to_string_pretty(other)
            .map_err(|e| AnalysisError::Export(e.to_string())),
    }
}

/// Convert an analysis into a downloadable document of the requested format.
pub fn generate_document(
    analysis: &Value,
    format: &str,
) -> Result<GeneratedDocument, AnalysisError> {
    let content = analysis_content(analysis)?;
    let document_format = DocumentFormat::parse(format);
    info!("Generating {} document for analysis result", format);

    let rendered = document_format.render(&content);
    debug!(
        "Rendered {} bytes as {}",
        rendered.len(),
        document_format.mime_type()
    );

    Ok(GeneratedDocument {
        download_url: data_url(document_format.mime_type(), &rendered),
        file_name: document_format.file_name().to_string(),
        message: format!("{} document generated successfully.", capitalize(format)),
    })
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
