//! Text analysis command.

use std::path::PathBuf;

use console::style;
use tokio_util::sync::CancellationToken;

use super::super::helpers::{
    print_delta, print_json, print_result, print_stats, read_stdin, read_text_file,
};
use super::export::{export_current, ExportTarget};
use crate::config::Settings;
use crate::services::AnalysisService;
use crate::view_state::ViewState;

/// Where the text to analyze comes from.
pub struct AnalyzeInput {
    pub text: Option<String>,
    pub file: Option<PathBuf>,
}

impl AnalyzeInput {
    async fn read(self) -> anyhow::Result<String> {
        match (self.text, self.file) {
            (Some(text), _) => Ok(text),
            (None, Some(path)) => read_text_file(&path).await,
            (None, None) => read_stdin(),
        }
    }
}

/// Analyze text, structured or streamed.
pub async fn cmd_analyze(
    settings: &Settings,
    input: AnalyzeInput,
    stream: bool,
    json: bool,
    export: Option<ExportTarget>,
) -> anyhow::Result<()> {
    let text = input.read().await?;
    let service = AnalysisService::new(settings.llm.clone())?;
    let mut view = ViewState::new();

    view.submit()?;
    eprintln!(
        "{} Analyzing {} chars with {}",
        style("→").cyan(),
        text.len(),
        settings.llm.endpoint
    );

    if stream {
        stream_analysis(&service, &text, &mut view, json).await?;
    } else {
        match service.analyze_text(&text).await {
            Ok(outcome) => {
                view.finish(outcome.result.clone())?;
                if json {
                    print_json(&outcome)?;
                } else {
                    print_result(&outcome.result);
                    print_stats(&outcome);
                }
            }
            Err(e) => view.fail(e.to_string())?,
        }
    }

    if let Some(error) = view.error() {
        eprintln!("{} {}", style("✗").red(), error);
        anyhow::bail!("{}", error);
    }

    if let Some(target) = export {
        export_current(&mut view, &target).await?;
    }
    Ok(())
}

/// Stream a narrative analysis, echoing text as it arrives. Ctrl+C cancels.
async fn stream_analysis(
    service: &AnalysisService,
    text: &str,
    view: &mut ViewState,
    json: bool,
) -> anyhow::Result<()> {
    let cancel = CancellationToken::new();
    let ctrl_c = cancel.clone();
    let watcher = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            ctrl_c.cancel();
        }
    });

    let mut printed = 0;
    let mut chunk_error = None;
    let result = service
        .stream_text(text, &cancel, |partial| {
            if !json {
                print_delta(&partial[printed..]);
                printed = partial.len();
            }
            if let Err(e) = view.chunk(partial) {
                chunk_error.get_or_insert(e);
            }
        })
        .await;
    watcher.abort();

    if let Some(e) = chunk_error {
        return Err(e.into());
    }

    match result {
        Ok(result) => {
            if !json {
                println!();
            }
            view.finish(result)?;
            if json {
                if let Some(result) = view.result() {
                    print_json(result)?;
                }
            }
        }
        Err(e) => {
            if printed > 0 {
                println!();
            }
            view.fail(e.to_string())?;
        }
    }
    Ok(())
}
