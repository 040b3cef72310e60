//! Exact-match filtering of the location dataset.
//!
//! Every call is a full linear scan; no index is built. Results keep dataset
//! order so positional selection on the requester side is stable.

use crate::types::{Dataset, MatchSet, QueryFilters};

/// Collect every record in `dataset` that satisfies `filters`.
pub fn find_matches(dataset: &Dataset, filters: &QueryFilters) -> MatchSet {
    dataset
        .records()
        .iter()
        .filter(|record| record.matches(filters))
        .cloned()
        .collect()
}
