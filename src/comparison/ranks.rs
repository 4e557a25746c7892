//! Average ranks across instances
//!
//! Each instance row of the aggregated center matrix is ranked across
//! algorithms (same tie and direction rules as the Friedman test), then
//! ranks are averaged per algorithm. An algorithm that is best on every
//! instance lands at exactly 1.0.

use serde::Serialize;

use crate::comparison::aggregation::AggregatedStat;
use crate::error::ComparisonError;
use crate::stats::ranking::directed_ranks;

/// One algorithm's average rank.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankEntry {
    pub algorithm: String,
    pub average_rank: f64,
}

/// Average ranks in first-seen algorithm order.
#[derive(Debug, Clone, Serialize)]
pub struct RankTable {
    pub entries: Vec<RankEntry>,
}

impl RankTable {
    /// Entries sorted ascending by average rank (best first). Sorting is
    /// stable, so tied algorithms keep their column order.
    pub fn sorted(&self) -> Vec<RankEntry> {
        let mut sorted = self.entries.clone();
        sorted.sort_by(|a, b| {
            a.average_rank
                .partial_cmp(&b.average_rank)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        sorted
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Rank the center matrix row by row and average per algorithm.
///
/// Needs at least 2 algorithms and 1 instance, and a complete matrix: a NaN
/// cell (an algorithm without measurements on some instance) cannot be
/// ranked against the others.
pub fn average_rank_table(
    stat: &AggregatedStat,
    maximize: bool,
) -> Result<RankTable, ComparisonError> {
    let k = stat.algorithms.len();
    let n = stat.instances.len();
    if k < 2 {
        return Err(ComparisonError::InsufficientData(format!(
            "rank aggregation needs at least 2 algorithms, got {k}"
        )));
    }
    if n == 0 {
        return Err(ComparisonError::InsufficientData(
            "rank aggregation needs at least 1 instance".to_string(),
        ));
    }

    let mut sums = vec![0.0; k];
    for (row, instance) in stat.center.iter().zip(&stat.instances) {
        if row.iter().any(|v| v.is_nan()) {
            return Err(ComparisonError::InsufficientData(format!(
                "instance '{instance}' is missing measurements for some algorithm"
            )));
        }
        for (j, r) in directed_ranks(row, maximize).into_iter().enumerate() {
            sums[j] += r;
        }
    }

    let entries = stat
        .algorithms
        .iter()
        .zip(&sums)
        .map(|(algorithm, sum)| RankEntry {
            algorithm: algorithm.clone(),
            average_rank: sum / n as f64,
        })
        .collect();

    Ok(RankTable { entries })
}
