//! Image analysis command.

use std::path::Path;

use base64::Engine;
use console::style;

use super::super::helpers::{print_json, print_result};
use super::export::{export_current, ExportTarget};
use crate::config::Settings;
use crate::services::AnalysisService;
use crate::view_state::{Tab, ViewState};

/// Analyze an image file.
pub async fn cmd_image(
    settings: &Settings,
    path: &Path,
    instructions: Option<&str>,
    json: bool,
    export: Option<ExportTarget>,
) -> anyhow::Result<()> {
    let data_url = image_data_url(path).await?;
    let service = AnalysisService::new(settings.llm.clone())?;

    let mut view = ViewState::new();
    view.select_tab(Tab::Image)?;
    view.submit()?;
    eprintln!(
        "{} Analyzing {} with {}",
        style("→").cyan(),
        path.display(),
        settings.llm.vision_endpoint()
    );

    match service.analyze_image(&data_url, instructions).await {
        Ok(result) => view.finish(result)?,
        Err(e) => view.fail(e.to_string())?,
    }

    if let Some(error) = view.error() {
        eprintln!("{} {}", style("✗").red(), error);
        anyhow::bail!("{}", error);
    }

    if let Some(result) = view.result() {
        if json {
            print_json(result)?;
        } else {
            print_result(result);
        }
    }

    if let Some(target) = export {
        export_current(&mut view, &target).await?;
    }
    Ok(())
}

/// Read an image into a base64 data URL, typed by file extension.
async fn image_data_url(path: &Path) -> anyhow::Result<String> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", path.display(), e))?;
    let mime_type = mime_guess::from_path(path)
        .first()
        .filter(|m| m.type_() == mime_guess::mime::IMAGE)
        .map(|m| m.essence_str().to_string())
        .unwrap_or_else(|| "image/jpeg".to_string());

    let encoded = base64::engine::general_purpose::STANDARD.encode(&bytes);
    Ok(format!("data:{};base64,{}", mime_type, encoded))
}
