//! Shared helper functions for CLI commands.

use std::io::{Read, Write};
use std::path::Path;

use console::style;

use crate::models::{AnalysisOutcome, AnalysisResult};
use crate::services::outline;

/// Read all of stdin as UTF-8.
pub fn read_stdin() -> anyhow::Result<String> {
    let mut buf = String::new();
    std::io::stdin().read_to_string(&mut buf)?;
    Ok(buf)
}

/// Read a file as UTF-8, naming the file on failure.
pub async fn read_text_file(path: &Path) -> anyhow::Result<String> {
    tokio::fs::read_to_string(path)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", path.display(), e))
}

/// Print an analysis for a terminal.
pub fn print_result(result: &AnalysisResult) {
    match result {
        AnalysisResult::Structured(s) => {
            println!("{}", style("Summary").bold());
            println!("  {}", s.summary);
            print_list("Key points", &s.key_points);
            print_list("Recommendations", &s.recommendations);
        }
        AnalysisResult::Narrative(_) => {
            for section in outline(result) {
                if let Some(title) = &section.title {
                    println!("{}", style(title).bold().cyan());
                }
                for line in &section.lines {
                    println!("  {}", line);
                }
            }
        }
        AnalysisResult::Failure(f) => {
            eprintln!("{} {}", style("✗").red(), f.error);
        }
    }
}

fn print_list(heading: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    println!("{}", style(heading).bold());
    for item in items {
        println!("  • {}", item);
    }
}

/// Print the stats line under a structured analysis.
pub fn print_stats(outcome: &AnalysisOutcome) {
    println!(
        "{}",
        style(format!(
            "{} key insights, {} points, {}ms",
            outcome.stats.key_insights,
            outcome.stats.total_points,
            outcome.stats.processing_time_ms
        ))
        .dim()
    );
}

/// Print JSON, pretty.
pub fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Write streamed text to stdout as it arrives.
pub fn print_delta(delta: &str) {
    let mut stdout = std::io::stdout().lock();
    let _ = stdout.write_all(delta.as_bytes());
    let _ = stdout.flush();
}
