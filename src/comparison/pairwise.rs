//! Pairwise two-sample comparisons
//!
//! The test is Mann-Whitney U on execution-aligned samples: alignment picks
//! which runs enter the comparison, but the test itself treats the two
//! samples as independent, matching the established usage for this kind of
//! benchmark data. A significant p-value turns into Better/Worse by
//! direction-adjusted median comparison; everything else, including
//! degenerate samples and unalignable pairs, is a tie.
//!
//! Two layouts are produced: a pivot table (every algorithm against the
//! last one in column order, with a per-algorithm win/loss/tie tally) and
//! an all-pairs table (each unordered pair once, verdict symbols
//! concatenated in instance order).

use serde::Serialize;

use crate::comparison::config::ComparisonConfig;
use crate::dataset::MetricData;
use crate::error::ComparisonError;
use crate::stats::describe::median;
use crate::stats::mann_whitney::mann_whitney_u;

/// Direction-normalized outcome of a pairwise comparison, describing the
/// first sample relative to the second.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Verdict {
    Better,
    Worse,
    Tie,
}

impl Verdict {
    /// Table symbol: "+" better, "-" worse, "=" tie.
    pub fn symbol(&self) -> char {
        match self {
            Verdict::Better => '+',
            Verdict::Worse => '-',
            Verdict::Tie => '=',
        }
    }

    /// The same comparison seen from the other side.
    pub fn invert(&self) -> Verdict {
        match self {
            Verdict::Better => Verdict::Worse,
            Verdict::Worse => Verdict::Better,
            Verdict::Tie => Verdict::Tie,
        }
    }
}

/// Verdict plus the p-value that produced it (`None` when the test could
/// not run and the tie is a policy default).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PairwiseOutcome {
    pub verdict: Verdict,
    pub p_value: Option<f64>,
}

/// Compare two aligned replicate samples.
///
/// Significant difference and a higher-is-better metric: the sample with
/// the larger median wins. Equal medians stay a tie even when the rank test
/// is significant.
pub fn compare_pair(first: &[f64], second: &[f64], maximize: bool, alpha: f64) -> PairwiseOutcome {
    let result = match mann_whitney_u(first, second) {
        Ok(result) => result,
        Err(_) => {
            // Degenerate or empty samples: neutral verdict, keep going
            return PairwiseOutcome {
                verdict: Verdict::Tie,
                p_value: None,
            };
        }
    };

    if result.p_value > alpha {
        return PairwiseOutcome {
            verdict: Verdict::Tie,
            p_value: Some(result.p_value),
        };
    }

    let m1 = median(first);
    let m2 = median(second);
    let verdict = if m1 == m2 {
        Verdict::Tie
    } else if (maximize && m1 > m2) || (!maximize && m1 < m2) {
        Verdict::Better
    } else {
        Verdict::Worse
    };

    PairwiseOutcome {
        verdict,
        p_value: Some(result.p_value),
    }
}

/// A pair that fell back to a tie, and why.
#[derive(Debug, Clone)]
pub struct SkippedPair {
    pub instance: String,
    pub first: String,
    pub second: String,
    pub reason: ComparisonError,
}

/// Per-algorithm win/loss/tie counts against the pivot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PivotTally {
    pub algorithm: String,
    pub better: usize,
    pub worse: usize,
    pub ties: usize,
}

/// Every algorithm compared against the pivot (last algorithm in column
/// order) on every instance.
#[derive(Debug, Clone)]
pub struct PivotComparison {
    pub pivot: String,
    /// Candidate algorithms, i.e. every algorithm except the pivot.
    pub candidates: Vec<String>,
    /// `verdicts[instance][candidate]`: the candidate's verdict vs the
    /// pivot, in first-seen orders.
    pub verdicts: Vec<Vec<Verdict>>,
    pub tallies: Vec<PivotTally>,
    pub skipped: Vec<SkippedPair>,
}

/// Compare every non-pivot algorithm against the pivot on every instance.
///
/// Fails only when fewer than 2 algorithms exist; per-pair problems are
/// recovered as ties and recorded in `skipped`.
pub fn pivot_comparison(
    data: &MetricData,
    config: &ComparisonConfig,
) -> Result<PivotComparison, ComparisonError> {
    let algorithms = data.algorithms();
    if algorithms.len() < 2 {
        return Err(ComparisonError::InsufficientData(format!(
            "pivot comparison needs at least 2 algorithms, got {}",
            algorithms.len()
        )));
    }

    let pivot = algorithms[algorithms.len() - 1].clone();
    let candidates: Vec<String> = algorithms[..algorithms.len() - 1].to_vec();

    let mut verdicts = Vec::with_capacity(data.instances().len());
    let mut skipped = Vec::new();
    let mut tallies: Vec<PivotTally> = candidates
        .iter()
        .map(|algorithm| PivotTally {
            algorithm: algorithm.clone(),
            better: 0,
            worse: 0,
            ties: 0,
        })
        .collect();

    for instance in data.instances() {
        let mut row = Vec::with_capacity(candidates.len());
        for (ci, candidate) in candidates.iter().enumerate() {
            let verdict = match aligned_outcome(data, instance, candidate, &pivot, config) {
                Ok(outcome) => outcome.verdict,
                Err(reason) => {
                    skipped.push(SkippedPair {
                        instance: instance.clone(),
                        first: candidate.clone(),
                        second: pivot.clone(),
                        reason,
                    });
                    Verdict::Tie
                }
            };
            match verdict {
                Verdict::Better => tallies[ci].better += 1,
                Verdict::Worse => tallies[ci].worse += 1,
                Verdict::Tie => tallies[ci].ties += 1,
            }
            row.push(verdict);
        }
        verdicts.push(row);
    }

    Ok(PivotComparison {
        pivot,
        candidates,
        verdicts,
        tallies,
        skipped,
    })
}

/// One unordered pair with its verdict symbols, one per instance in
/// first-seen order, read as the first algorithm vs the second.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PairSequence {
    pub first: String,
    pub second: String,
    pub symbols: String,
}

/// Every unordered pair of algorithms, each computed exactly once.
#[derive(Debug, Clone)]
pub struct AllPairsComparison {
    pub pairs: Vec<PairSequence>,
    pub skipped: Vec<SkippedPair>,
}

/// Compare every unordered algorithm pair on every instance.
pub fn all_pairs_comparison(
    data: &MetricData,
    config: &ComparisonConfig,
) -> Result<AllPairsComparison, ComparisonError> {
    let algorithms = data.algorithms();
    if algorithms.len() < 2 {
        return Err(ComparisonError::InsufficientData(format!(
            "all-pairs comparison needs at least 2 algorithms, got {}",
            algorithms.len()
        )));
    }

    let mut pairs = Vec::new();
    let mut skipped = Vec::new();

    for (i, first) in algorithms.iter().enumerate() {
        for second in &algorithms[i + 1..] {
            let mut symbols = String::with_capacity(data.instances().len());
            for instance in data.instances() {
                let verdict = match aligned_outcome(data, instance, first, second, config) {
                    Ok(outcome) => outcome.verdict,
                    Err(reason) => {
                        skipped.push(SkippedPair {
                            instance: instance.clone(),
                            first: first.clone(),
                            second: second.clone(),
                            reason,
                        });
                        Verdict::Tie
                    }
                };
                symbols.push(verdict.symbol());
            }
            pairs.push(PairSequence {
                first: first.clone(),
                second: second.clone(),
                symbols,
            });
        }
    }

    Ok(AllPairsComparison { pairs, skipped })
}

fn aligned_outcome(
    data: &MetricData,
    instance: &str,
    first: &str,
    second: &str,
    config: &ComparisonConfig,
) -> Result<PairwiseOutcome, ComparisonError> {
    let (xs, ys) = data.aligned_pair(instance, first, second)?;
    if xs.len() < config.min_executions {
        return Err(ComparisonError::InsufficientData(format!(
            "{} aligned execution(s) between '{first}' and '{second}' on '{instance}', need {}",
            xs.len(),
            config.min_executions
        )));
    }
    Ok(compare_pair(
        &xs,
        &ys,
        data.metric.maximize,
        config.significance_level,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{Measurement, MetricDescriptor, MetricsTable};

    fn dataset(maximize: bool, groups: &[(&str, &str, &[f64])]) -> MetricData {
        let mut measurements = Vec::new();
        for (algorithm, instance, values) in groups {
            for (eid, &value) in values.iter().enumerate() {
                measurements.push(Measurement {
                    algorithm: algorithm.to_string(),
                    instance: instance.to_string(),
                    metric: "M".to_string(),
                    execution_id: eid as u32,
                    value,
                });
            }
        }
        let table = MetricsTable::new(vec![MetricDescriptor {
            name: "M".to_string(),
            maximize,
        }]);
        MetricData::filter(&measurements, &table, "M").unwrap()
    }

    #[test]
    fn test_identical_samples_tie() {
        let outcome = compare_pair(&[1.0, 2.0, 3.0], &[1.0, 2.0, 3.0], false, 0.05);
        assert_eq!(outcome.verdict, Verdict::Tie);
    }

    #[test]
    fn test_constant_distinct_samples_minimize() {
        // Zero-variance samples still produce a verdict via the tie-corrected test
        let outcome = compare_pair(&[1.0, 1.0, 1.0], &[5.0, 5.0, 5.0], false, 0.05);
        assert_eq!(outcome.verdict, Verdict::Better);
    }

    #[test]
    fn test_direction_flips_verdict() {
        let low = [1.0, 2.0, 3.0, 4.0, 5.0];
        let high = [10.0, 11.0, 12.0, 13.0, 14.0];
        assert_eq!(compare_pair(&low, &high, false, 0.05).verdict, Verdict::Better);
        assert_eq!(compare_pair(&low, &high, true, 0.05).verdict, Verdict::Worse);
    }

    #[test]
    fn test_fully_tied_samples_fall_back_to_tie() {
        let outcome = compare_pair(&[3.0, 3.0, 3.0], &[3.0, 3.0, 3.0], false, 0.05);
        assert_eq!(outcome.verdict, Verdict::Tie);
        assert_eq!(outcome.p_value, None);
    }

    #[test]
    fn test_verdict_invert() {
        assert_eq!(Verdict::Better.invert(), Verdict::Worse);
        assert_eq!(Verdict::Tie.invert(), Verdict::Tie);
    }

    #[test]
    fn test_pivot_is_last_algorithm() {
        let a: &[f64] = &[1.0, 1.1, 0.9, 1.0, 1.05];
        let b: &[f64] = &[5.0, 5.1, 4.9, 5.0, 5.05];
        let data = dataset(false, &[("A", "I1", a), ("B", "I1", b)]);
        let pivot = pivot_comparison(&data, &ComparisonConfig::default()).unwrap();
        assert_eq!(pivot.pivot, "B");
        assert_eq!(pivot.candidates, ["A"]);
        // A has the smaller values on a minimized metric
        assert_eq!(pivot.verdicts[0][0], Verdict::Better);
        assert_eq!(
            pivot.tallies[0],
            PivotTally {
                algorithm: "A".to_string(),
                better: 1,
                worse: 0,
                ties: 0
            }
        );
    }

    #[test]
    fn test_pivot_tallies_across_instances() {
        let low: &[f64] = &[1.0, 1.1, 0.9, 1.0, 1.05];
        let high: &[f64] = &[5.0, 5.1, 4.9, 5.0, 5.05];
        let data = dataset(
            false,
            &[
                ("A", "I1", low),
                ("A", "I2", high),
                ("B", "I1", high),
                ("B", "I2", low),
            ],
        );
        let pivot = pivot_comparison(&data, &ComparisonConfig::default()).unwrap();
        assert_eq!(pivot.tallies[0].better, 1);
        assert_eq!(pivot.tallies[0].worse, 1);
        assert_eq!(pivot.tallies[0].ties, 0);
    }

    #[test]
    fn test_pivot_single_algorithm_fails() {
        let data = dataset(false, &[("A", "I1", &[1.0, 2.0, 3.0])]);
        assert!(matches!(
            pivot_comparison(&data, &ComparisonConfig::default()),
            Err(ComparisonError::InsufficientData(_))
        ));
    }

    #[test]
    fn test_all_pairs_each_pair_once() {
        let s: &[f64] = &[1.0, 1.1, 0.9, 1.0, 1.05];
        let data = dataset(
            false,
            &[("A", "I1", s), ("B", "I1", s), ("C", "I1", s)],
        );
        let all = all_pairs_comparison(&data, &ComparisonConfig::default()).unwrap();
        let keys: Vec<(&str, &str)> = all
            .pairs
            .iter()
            .map(|p| (p.first.as_str(), p.second.as_str()))
            .collect();
        assert_eq!(keys, vec![("A", "B"), ("A", "C"), ("B", "C")]);
    }

    #[test]
    fn test_all_pairs_symbols_follow_instance_order() {
        let low: &[f64] = &[1.0, 1.1, 0.9, 1.0, 1.05];
        let high: &[f64] = &[5.0, 5.1, 4.9, 5.0, 5.05];
        let data = dataset(
            false,
            &[
                ("A", "I1", low),
                ("A", "I2", high),
                ("B", "I1", high),
                ("B", "I2", low),
            ],
        );
        let all = all_pairs_comparison(&data, &ComparisonConfig::default()).unwrap();
        // A vs B: better on I1, worse on I2
        assert_eq!(all.pairs[0].symbols, "+-");
    }

    #[test]
    fn test_unaligned_pair_recorded_and_tied() {
        // B only has executions 10..12 on I1; no overlap with A's 0..2
        let mut measurements = Vec::new();
        for eid in 0..3u32 {
            measurements.push(Measurement {
                algorithm: "A".to_string(),
                instance: "I1".to_string(),
                metric: "M".to_string(),
                execution_id: eid,
                value: 1.0 + eid as f64,
            });
            measurements.push(Measurement {
                algorithm: "B".to_string(),
                instance: "I1".to_string(),
                metric: "M".to_string(),
                execution_id: eid + 10,
                value: 5.0 + eid as f64,
            });
        }
        let table = MetricsTable::new(vec![MetricDescriptor {
            name: "M".to_string(),
            maximize: false,
        }]);
        let data = MetricData::filter(&measurements, &table, "M").unwrap();

        let all = all_pairs_comparison(&data, &ComparisonConfig::default()).unwrap();
        assert_eq!(all.pairs[0].symbols, "=");
        assert_eq!(all.skipped.len(), 1);
        assert_eq!(all.skipped[0].first, "A");
    }
}
