//! Ranking and highlight selection.
//!
//! Sorts scored listings by total score (descending, stable) and splits
//! the ranking into the top [`HIGHLIGHT_COUNT`] highlights and the rest.

use crate::types::{ScoredListing, SearchResult};

/// Maximum number of listings surfaced as highlights.
pub const HIGHLIGHT_COUNT: usize = 3;

/// Rank scored listings and split them into highlights and rest.
///
/// The sort is stable: listings with equal totals keep their input
/// order, so identical input always produces identical output.
pub fn rank(mut scored: Vec<ScoredListing>) -> SearchResult {
    scored.sort_by(|a, b| b.score.total.total_cmp(&a.score.total));

    let split = scored.len().min(HIGHLIGHT_COUNT);
    let rest = scored.split_off(split);
    SearchResult {
        highlights: scored,
        rest,
    }
}
