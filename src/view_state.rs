//! Dashboard view state.
//!
//! One value describes what the dashboard shows, so combinations such as
//! "loading with an error" or "download without a result" cannot occur.

use thiserror::Error;

use crate::export::GeneratedDocument;
use crate::models::AnalysisResult;

/// Input tab.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Tab {
    #[default]
    Text,
    Image,
}

/// Where the current request is.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Phase {
    #[default]
    Idle,
    /// Request sent, nothing received yet.
    Loading,
    /// Streaming; `partial` is the text received so far.
    Streaming { partial: String },
    /// Finished; `download` is set once the result has been exported.
    Ready {
        result: AnalysisResult,
        download: Option<GeneratedDocument>,
    },
    Failed { error: String },
}

impl Phase {
    fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Loading => "loading",
            Self::Streaming { .. } => "streaming",
            Self::Ready { .. } => "ready",
            Self::Failed { .. } => "failed",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cannot {action} while {phase}")]
pub struct InvalidTransition {
    pub action: &'static str,
    pub phase: &'static str,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewState {
    tab: Tab,
    phase: Phase,
}

impl ViewState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tab(&self) -> Tab {
        self.tab
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    /// A request is in flight.
    pub fn is_busy(&self) -> bool {
        matches!(self.phase, Phase::Loading | Phase::Streaming { .. })
    }

    pub fn result(&self) -> Option<&AnalysisResult> {
        match &self.phase {
            Phase::Ready { result, .. } => Some(result),
            _ => None,
        }
    }

    pub fn download(&self) -> Option<&GeneratedDocument> {
        match &self.phase {
            Phase::Ready { download, .. } => download.as_ref(),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match &self.phase {
            Phase::Failed { error } => Some(error),
            _ => None,
        }
    }

    /// Text to show right now: the streamed partial text, or the final
    /// narrative analysis.
    pub fn visible_text(&self) -> Option<&str> {
        match &self.phase {
            Phase::Streaming { partial } => Some(partial),
            Phase::Ready {
                result: AnalysisResult::Narrative(n),
                ..
            } => Some(&n.analysis),
            _ => None,
        }
    }

    /// Start a request; any previous result, download or error is cleared.
    pub fn submit(&mut self) -> Result<(), InvalidTransition> {
        self.phase = Phase::Loading;
        Ok(())
    }

    /// Streamed text arrived; `text` is the cumulative text so far.
    pub fn chunk(&mut self, text: &str) -> Result<(), InvalidTransition> {
        match &mut self.phase {
            Phase::Loading => {
                self.phase = Phase::Streaming {
                    partial: text.to_string(),
                };
                Ok(())
            }
            Phase::Streaming { partial } => {
                text.clone_into(partial);
                Ok(())
            }
            other => Err(reject("receive a chunk", other)),
        }
    }

    /// The request finished. A failure result moves to `Failed`.
    pub fn finish(&mut self, result: AnalysisResult) -> Result<(), InvalidTransition> {
        if !self.is_busy() {
            return Err(reject("finish", &self.phase));
        }
        self.phase = match result {
            AnalysisResult::Failure(f) => Phase::Failed { error: f.error },
            result => Phase::Ready {
                result,
                download: None,
            },
        };
        Ok(())
    }

    /// The request failed; partial text is discarded.
    pub fn fail(&mut self, error: impl Into<String>) -> Result<(), InvalidTransition> {
        self.phase = Phase::Failed {
            error: error.into(),
        };
        Ok(())
    }

    /// The current result was exported.
    pub fn exported(&mut self, document: GeneratedDocument) -> Result<(), InvalidTransition> {
        match &mut self.phase {
            Phase::Ready { download, .. } => {
                *download = Some(document);
                Ok(())
            }
            other => Err(reject("attach a download", other)),
        }
    }

    /// Switch input tabs. Not allowed mid-request; otherwise resets to idle.
    pub fn select_tab(&mut self, tab: Tab) -> Result<(), InvalidTransition> {
        if self.is_busy() {
            return Err(reject("switch tabs", &self.phase));
        }
        self.tab = tab;
        self.phase = Phase::Idle;
        Ok(())
    }
}

fn reject(action: &'static str, phase: &Phase) -> InvalidTransition {
    InvalidTransition {
        action,
        phase: phase.name(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn document() -> GeneratedDocument {
        GeneratedDocument {
            download_url: "data:text/plain;charset=utf-8,x".into(),
            file_name: "analysis_report.txt".into(),
            message: "Text document generated successfully.".into(),
        }
    }

    #[test]
    fn test_streaming_lifecycle() {
        let mut state = ViewState::new();
        state.submit().unwrap();
        assert!(state.is_busy());

        state.chunk("Hel").unwrap();
        state.chunk("Hello").unwrap();
        assert_eq!(state.visible_text(), Some("Hello"));

        state.finish(AnalysisResult::narrative("Hello")).unwrap();
        assert!(!state.is_busy());
        assert_eq!(state.visible_text(), Some("Hello"));

        state.exported(document()).unwrap();
        assert_eq!(state.download().unwrap().file_name, "analysis_report.txt");
    }

    #[test]
    fn test_failure_result_moves_to_failed() {
        let mut state = ViewState::new();
        state.submit().unwrap();
        state.chunk("partial").unwrap();
        state.finish(AnalysisResult::failure("boom")).unwrap();
        assert_eq!(state.error(), Some("boom"));
        assert!(state.result().is_none());
        assert!(state.visible_text().is_none());
    }

    #[test]
    fn test_submit_clears_previous_outcome() {
        let mut state = ViewState::new();
        state.submit().unwrap();
        state.finish(AnalysisResult::narrative("x")).unwrap();
        state.exported(document()).unwrap();

        state.submit().unwrap();
        assert_eq!(state.phase(), &Phase::Loading);
        assert!(state.download().is_none());
    }

    #[test]
    fn test_invalid_transitions_leave_state_untouched() {
        let mut state = ViewState::new();
        let before = state.clone();

        let err = state.chunk("x").unwrap_err();
        assert_eq!(err.to_string(), "cannot receive a chunk while idle");
        assert!(state.finish(AnalysisResult::narrative("x")).is_err());
        assert!(state.exported(document()).is_err());
        assert_eq!(state, before);

        state.submit().unwrap();
        let busy = state.clone();
        assert!(state.select_tab(Tab::Image).is_err());
        assert_eq!(state, busy);
    }

    #[test]
    fn test_select_tab_resets_to_idle() {
        let mut state = ViewState::new();
        state.fail("network down").unwrap();
        state.select_tab(Tab::Image).unwrap();
        assert_eq!(state.tab(), Tab::Image);
        assert_eq!(state.phase(), &Phase::Idle);
    }
}
