//! Document export command.

use std::path::{Path, PathBuf};

use console::style;
use serde_json::Value;

use super::super::helpers::{read_stdin, read_text_file};
use crate::export::{generate_document, GeneratedDocument};
use crate::view_state::ViewState;

/// Export requested alongside an analysis.
pub struct ExportTarget {
    pub format: String,
    pub output: Option<PathBuf>,
}

/// Convert an analysis read from a file or stdin.
///
/// JSON input is treated as a result object; anything else as markdown.
pub async fn cmd_export(
    input: Option<&Path>,
    format: &str,
    output: Option<&Path>,
) -> anyhow::Result<()> {
    let text = match input {
        Some(path) => read_text_file(path).await?,
        None => read_stdin()?,
    };
    let analysis = serde_json::from_str::<Value>(&text).unwrap_or(Value::String(text));

    let document = generate_document(&analysis, format)?;
    deliver(&document, output).await
}

/// Export the finished result held by `view`.
pub async fn export_current(view: &mut ViewState, target: &ExportTarget) -> anyhow::Result<()> {
    let Some(result) = view.result() else {
        return Ok(());
    };
    let analysis = serde_json::to_value(result)?;
    let document = generate_document(&analysis, &target.format)?;
    view.exported(document)?;

    if let Some(document) = view.download() {
        deliver(document, target.output.as_deref()).await?;
    }
    Ok(())
}

/// Write the document to `output`, or print its data URL.
async fn deliver(document: &GeneratedDocument, output: Option<&Path>) -> anyhow::Result<()> {
    match output {
        Some(path) => {
            tokio::fs::write(path, document.content()?).await?;
            println!(
                "{} {} ({})",
                style("✓").green(),
                document.message,
                path.display()
            );
        }
        None => {
            eprintln!(
                "{} {} ({})",
                style("✓").green(),
                document.message,
                document.file_name
            );
            println!("{}", document.download_url);
        }
    }
    Ok(())
}
