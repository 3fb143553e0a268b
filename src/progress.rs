//! Annotation progress derived from server summary snapshots.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Server-computed aggregate counts for one task. The engine only reads
/// these; it never mutates a summary optimistically.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnnotationSummary {
    pub total: u64,
    pub labeled: u64,
    pub skipped: u64,
    pub unlabeled: u64,
    #[serde(default)]
    pub by_user: HashMap<String, u64>,
}

/// Percent of items labeled, floored. An empty dataset reads 0 rather
/// than dividing by zero.
pub fn progress_percent(summary: &AnnotationSummary) -> u32 {
    if summary.total > 0 && summary.labeled >= summary.total {
        return 100;
    }
    (summary.labeled * 100 / summary.total.max(1)) as u32
}

/// Holds the latest summary snapshot for display.
#[derive(Debug, Default)]
pub struct ProgressTracker {
    summary: AnnotationSummary,
}

impl ProgressTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(&mut self, summary: AnnotationSummary) {
        self.summary = summary;
    }

    pub fn summary(&self) -> &AnnotationSummary {
        &self.summary
    }

    pub fn percent(&self) -> u32 {
        progress_percent(&self.summary)
    }
}
