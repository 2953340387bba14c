//! Error taxonomy shared by the orchestrator, the exporters and the server.

use thiserror::Error;

/// Errors that can occur while analyzing input or exporting a result.
///
/// None of these cross the external boundary as-is: handlers and the CLI
/// flatten them into a result object carrying only an `error` message.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// Missing or empty required input.
    #[error("{0}")]
    Input(String),

    /// Non-2xx or malformed response from a completion endpoint.
    #[error("{message}")]
    Upstream {
        status: Option<u16>,
        message: String,
    },

    /// Completion content was not the JSON that was asked for.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Format conversion or encoding failed.
    #[error("Failed to generate document: {0}")]
    Export(String),

    /// The caller cancelled an in-flight request.
    #[error("Request cancelled")]
    Cancelled,

    /// The upstream endpoint did not answer in time.
    #[error("Upstream request timed out")]
    Timeout,
}

impl AnalysisError {
    pub fn input(msg: impl Into<String>) -> Self {
        Self::Input(msg.into())
    }

    pub fn upstream(msg: impl Into<String>) -> Self {
        Self::Upstream {
            status: None,
            message: msg.into(),
        }
    }
}

impl From<reqwest::Error> for AnalysisError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            return Self::Timeout;
        }
        Self::Upstream {
            status: e.status().map(|s| s.as_u16()),
            message: format!("Connection error: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_error_displays_message_only() {
        let err = AnalysisError::input("Please enter data to analyze.");
        assert_eq!(err.to_string(), "Please enter data to analyze.");
    }

    #[test]
    fn test_export_error_prefix() {
        let err = AnalysisError::Export("bad encoding".into());
        assert_eq!(err.to_string(), "Failed to generate document: bad encoding");
    }
}
