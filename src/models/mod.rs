//! Data models.

mod analysis;
mod recent;

pub use analysis::{
    AnalysisOutcome, AnalysisResult, Failure, NarrativeAnalysis, StructuredAnalysis, SummaryStats,
};
pub use recent::{recent_analyses, AnalysisKind, KindFilter, RecentAnalysis, SortOrder};
