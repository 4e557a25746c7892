//! Nemenyi critical distance and clique grouping
//!
//! CD = q_alpha(k) * sqrt(k(k+1) / 6N) with q_alpha from the tabulated
//! studentized-range constants (already divided by sqrt(2)) for the post-hoc
//! Nemenyi test. Algorithms whose average-rank gaps stay below CD merge
//! into cliques: statistically indistinguishable groups for the
//! critical-difference diagram.

use serde::Serialize;

use crate::comparison::ranks::RankTable;
use crate::error::ComparisonError;

// Critical values for k = 2..=20 at each supported significance level.
const Q_ALPHA_001: [f64; 19] = [
    2.575829, 2.913494, 3.113250, 3.254686, 3.363740, 3.452213, 3.526471, 3.590338, 3.646292,
    3.696021, 3.740733, 3.781318, 3.818459, 3.852680, 3.884395, 3.913952, 3.941627, 3.967642,
    3.992181,
];
const Q_ALPHA_005: [f64; 19] = [
    1.959964, 2.343701, 2.569032, 2.727774, 2.849705, 2.948320, 3.030879, 3.101730, 3.163684,
    3.218654, 3.268004, 3.312739, 3.353618, 3.391230, 3.426041, 3.458425, 3.488685, 3.517073,
    3.543799,
];
const Q_ALPHA_010: [f64; 19] = [
    1.644854, 2.052293, 2.291341, 2.459516, 2.588521, 2.692732, 2.779884, 2.854606, 2.919889,
    2.977768, 3.029694, 3.076733, 3.119693, 3.159199, 3.195743, 3.229723, 3.261461, 3.291224,
    3.319233,
];

fn q_alpha(alpha: f64, algorithms: usize) -> Result<f64, ComparisonError> {
    let table = if (alpha - 0.01).abs() < 1e-9 {
        &Q_ALPHA_001
    } else if (alpha - 0.05).abs() < 1e-9 {
        &Q_ALPHA_005
    } else if (alpha - 0.10).abs() < 1e-9 {
        &Q_ALPHA_010
    } else {
        return Err(ComparisonError::TestComputation(format!(
            "no studentized-range table for alpha = {alpha}"
        )));
    };

    if !(2..=20).contains(&algorithms) {
        return Err(ComparisonError::TestComputation(format!(
            "studentized-range table covers 2..=20 algorithms, got {algorithms}"
        )));
    }
    Ok(table[algorithms - 2])
}

/// Minimum average-rank gap that counts as significant for `algorithms`
/// compared over `instances` blocks at level `alpha`.
pub fn nemenyi_critical_distance(
    alpha: f64,
    algorithms: usize,
    instances: usize,
) -> Result<f64, ComparisonError> {
    if algorithms < 2 {
        return Err(ComparisonError::InsufficientData(format!(
            "critical distance needs at least 2 algorithms, got {algorithms}"
        )));
    }
    if instances < 2 {
        return Err(ComparisonError::InsufficientData(format!(
            "critical distance needs at least 2 instances, got {instances}"
        )));
    }

    let k = algorithms as f64;
    let n = instances as f64;
    Ok(q_alpha(alpha, algorithms)? * (k * (k + 1.0) / (6.0 * n)).sqrt())
}

/// A maximal group of mutually indistinguishable algorithms, in ascending
/// rank order. Singletons are algorithms significantly different from all
/// others.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Clique {
    pub algorithms: Vec<String>,
    pub min_rank: f64,
    pub max_rank: f64,
}

impl Clique {
    pub fn is_singleton(&self) -> bool {
        self.algorithms.len() == 1
    }
}

/// Group algorithms whose pairwise average-rank gaps stay below `cd`.
///
/// Candidate spans run from each algorithm to the farthest one less than
/// `cd` ahead of it; adjacent spans whose upper bound does not strictly
/// increase are collapsed. Algorithms covered by no span come out as
/// singleton cliques, interleaved in rank order.
pub fn clique_groups(table: &RankTable, cd: f64) -> Vec<Clique> {
    let sorted = table.sorted();
    let k = sorted.len();

    // Candidate spans as (start, end) indices into the sorted order
    let mut spans: Vec<(usize, usize)> = Vec::new();
    for i in 0..k {
        let mut farthest = None;
        for j in (i + 1)..k {
            let gap = sorted[j].average_rank - sorted[i].average_rank;
            if gap > 0.0 && gap < cd {
                farthest = Some(j);
            }
        }
        if let Some(j) = farthest {
            spans.push((i, j));
        }
    }

    // Collapse spans subsumed by their predecessor
    let mut kept: Vec<(usize, usize)> = Vec::new();
    for (idx, span) in spans.iter().enumerate() {
        if idx == 0 || spans[idx - 1].1 < span.1 {
            kept.push(*span);
        }
    }

    let mut covered = vec![false; k];
    for &(start, end) in &kept {
        for flag in covered.iter_mut().take(end + 1).skip(start) {
            *flag = true;
        }
    }

    // Emit kept spans and uncovered singletons in rank order
    let mut cliques = Vec::new();
    let mut span_iter = kept.iter().peekable();
    let mut i = 0;
    while i < k {
        if let Some(&&(start, end)) = span_iter.peek() {
            if start == i {
                cliques.push(make_clique(&sorted, start, end));
                span_iter.next();
                i += 1;
                continue;
            }
        }
        if !covered[i] {
            cliques.push(make_clique(&sorted, i, i));
        }
        i += 1;
    }

    cliques
}

fn make_clique(sorted: &[crate::comparison::ranks::RankEntry], start: usize, end: usize) -> Clique {
    Clique {
        algorithms: sorted[start..=end]
            .iter()
            .map(|e| e.algorithm.clone())
            .collect(),
        min_rank: sorted[start].average_rank,
        max_rank: sorted[end].average_rank,
    }
}
