//! Packaging a match set into the response the requester sees.

use serde::{Deserialize, Serialize};

use crate::types::{LocationRecord, MatchSet};

/// Number of candidates shown when a query is ambiguous.
pub const PREVIEW_LIMIT: usize = 3;

/// Appended to the preview when more than `PREVIEW_LIMIT` records matched.
pub const TRUNCATION_MARKER: &str = "...";

/// Result of one resolver lookup. Built fresh for every request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ResolutionOutcome {
    NoMatch,
    SingleMatch {
        record: LocationRecord,
        display: String,
    },
    MultipleMatches(MultipleMatches),
}

/// An ambiguous result: the full match set plus a short preview.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultipleMatches {
    pub records: MatchSet,
    pub total_count: usize,
    /// `"[{index}] {summary}"` for the first `PREVIEW_LIMIT` records.
    pub preview: Vec<String>,
    pub truncated: bool,
}

impl MultipleMatches {
    fn from_records(records: MatchSet) -> Self {
        let preview = records
            .iter()
            .take(PREVIEW_LIMIT)
            .enumerate()
            .map(|(i, record)| format!("[{}] {}", i + 1, record.summary()))
            .collect();

        Self {
            total_count: records.len(),
            truncated: records.len() > PREVIEW_LIMIT,
            preview,
            records,
        }
    }

    /// Pick a previewed candidate by its 1-based index.
    ///
    /// Indexes into the match set itself; only the previewed positions are
    /// selectable.
    pub fn select(&self, index: usize) -> Option<&LocationRecord> {
        if index == 0 || index > PREVIEW_LIMIT {
            return None;
        }
        self.records.get(index - 1)
    }

    /// Preview lines ready to print, including the truncation marker.
    pub fn preview_lines(&self) -> Vec<String> {
        let mut lines = self.preview.clone();
        if self.truncated {
            lines.push(TRUNCATION_MARKER.to_string());
        }
        lines
    }
}

impl ResolutionOutcome {
    pub fn from_matches(mut matches: MatchSet) -> Self {
        match matches.len() {
            0 => Self::NoMatch,
            1 => {
                let record = matches.remove(0);
                Self::SingleMatch {
                    display: record.summary(),
                    record,
                }
            }
            _ => Self::MultipleMatches(MultipleMatches::from_records(matches)),
        }
    }

    pub fn match_count(&self) -> usize {
        match self {
            Self::NoMatch => 0,
            Self::SingleMatch { .. } => 1,
            Self::MultipleMatches(m) => m.total_count,
        }
    }
}
