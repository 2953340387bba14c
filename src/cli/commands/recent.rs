//! Recent analyses listing.

use console::style;

use crate::models::{recent_analyses, AnalysisKind, KindFilter, SortOrder};

/// List recent analyses.
pub fn cmd_recent(kind: KindFilter, sort: SortOrder) -> anyhow::Result<()> {
    let analyses = recent_analyses(kind, sort);
    if analyses.is_empty() {
        println!("{} No analyses found", style("!").yellow());
        return Ok(());
    }

    for analysis in analyses {
        let kind = match analysis.kind {
            AnalysisKind::Text => style("text ").blue(),
            AnalysisKind::Image => style("image").magenta(),
        };
        println!(
            "{:>3}  {}  {}  {}  {}",
            analysis.id,
            kind,
            style(analysis.timestamp.replace('T', " ")).dim(),
            analysis.title,
            style(analysis.status).green()
        );
    }
    Ok(())
}
