//! Score Aggregator: unweighted mean of the six section scores.

use crate::analysis::models::Sections;

/// `round(mean)` with halves rounded up, computed in integer arithmetic so
/// the result is exact: `(sum + n/2) / n` for `n = 6`.
pub fn overall_score(sections: &Sections) -> u32 {
    let entries = sections.entries();
    let count = entries.len() as u32;
    let sum: u32 = entries.iter().map(|(_, finding)| finding.score).sum();
    (sum + count / 2) / count
}
