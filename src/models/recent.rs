//! Recent analyses shown on the dashboard.
//!
//! Nothing is persisted, so this is a fixed sample list.

use serde::{Deserialize, Serialize};

/// Kind of input an analysis was run on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisKind {
    Text,
    Image,
}

/// One row of the recent analyses list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecentAnalysis {
    pub id: u32,
    #[serde(rename = "type")]
    pub kind: AnalysisKind,
    pub title: &'static str,
    /// ISO-8601 local timestamp; lexical order is chronological.
    pub timestamp: &'static str,
    pub status: &'static str,
}

/// Filter on analysis kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum KindFilter {
    #[default]
    All,
    Text,
    Image,
}

impl KindFilter {
    fn matches(self, kind: AnalysisKind) -> bool {
        match self {
            Self::All => true,
            Self::Text => kind == AnalysisKind::Text,
            Self::Image => kind == AnalysisKind::Image,
        }
    }
}

/// Sort order by timestamp.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Newest,
    Oldest,
}

const SAMPLE: [RecentAnalysis; 5] = [
    RecentAnalysis {
        id: 1,
        kind: AnalysisKind::Text,
        title: "Market Research Data",
        timestamp: "2025-03-15T14:30:00",
        status: "completed",
    },
    RecentAnalysis {
        id: 2,
        kind: AnalysisKind::Image,
        title: "Product Image Analysis",
        timestamp: "2025-03-14T10:15:00",
        status: "completed",
    },
    RecentAnalysis {
        id: 3,
        kind: AnalysisKind::Text,
        title: "Customer Feedback",
        timestamp: "2025-03-12T16:45:00",
        status: "completed",
    },
    RecentAnalysis {
        id: 4,
        kind: AnalysisKind::Text,
        title: "Sales Performance",
        timestamp: "2025-03-10T09:20:00",
        status: "completed",
    },
    RecentAnalysis {
        id: 5,
        kind: AnalysisKind::Image,
        title: "Competitor Product",
        timestamp: "2025-03-08T11:30:00",
        status: "completed",
    },
];

/// List recent analyses, filtered by kind and sorted by timestamp.
pub fn recent_analyses(filter: KindFilter, order: SortOrder) -> Vec<RecentAnalysis> {
    let mut list: Vec<RecentAnalysis> = SAMPLE
        .iter()
        .filter(|a| filter.matches(a.kind))
        .cloned()
        .collect();

    match order {
        SortOrder::Newest => list.sort_by(|a, b| b.timestamp.cmp(a.timestamp)),
        SortOrder::Oldest => list.sort_by(|a, b| a.timestamp.cmp(b.timestamp)),
    }
    list
}
