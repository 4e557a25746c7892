//! Friedman rank sum test per instance
//!
//! For one instance the execution×algorithm matrix is ranked row by row
//! (average-method ties, best value gets rank 1 under the metric
//! direction), and the chi-squared statistic
//! 12n/(k(k+1)) * (sum R_j^2 - k(k+1)^2/4) is tested against k-1 degrees of
//! freedom. The per-instance verdict column marks significant instances
//! with "+" and everything else, including skipped instances, with "=".

use crate::comparison::config::ComparisonConfig;
use crate::dataset::{ExecutionMatrix, MetricData};
use crate::error::ComparisonError;
use crate::stats::distributions::chi_squared_sf;
use crate::stats::ranking::directed_ranks;

/// Friedman statistic and p-value for one instance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FriedmanOutcome {
    pub statistic: f64,
    pub p_value: f64,
    pub significant: bool,
}

impl FriedmanOutcome {
    /// Verdict column symbol.
    pub fn symbol(&self) -> &'static str {
        if self.significant {
            "+"
        } else {
            "="
        }
    }
}

/// Per-instance verdicts for a whole metric, with skipped instances kept as
/// explicit records instead of log lines.
#[derive(Debug, Clone)]
pub struct FriedmanSummary {
    /// (instance, outcome) in first-seen instance order; `None` when the
    /// instance was skipped.
    pub rows: Vec<(String, Option<FriedmanOutcome>)>,
    /// Instances that could not be tested and the reason.
    pub skipped: Vec<(String, ComparisonError)>,
}

impl FriedmanSummary {
    /// Symbol of one instance, "=" when skipped.
    pub fn symbol(&self, instance: &str) -> &'static str {
        self.rows
            .iter()
            .find(|(name, _)| name == instance)
            .and_then(|(_, outcome)| outcome.as_ref())
            .map_or("=", FriedmanOutcome::symbol)
    }
}

/// Run the Friedman test on one execution-aligned matrix.
pub fn friedman_test(
    matrix: &ExecutionMatrix,
    maximize: bool,
    alpha: f64,
) -> Result<FriedmanOutcome, ComparisonError> {
    let n = matrix.executions();
    let k = matrix.algorithm_count();
    if k < 2 {
        return Err(ComparisonError::InsufficientData(format!(
            "Friedman test needs at least 2 algorithms, got {k}"
        )));
    }
    if n == 0 {
        return Err(ComparisonError::InsufficientData(
            "Friedman test needs at least 1 execution".to_string(),
        ));
    }

    // Column-wise mean ranks over per-execution rankings
    let mut rank_sums = vec![0.0; k];
    for row in &matrix.rows {
        for (j, r) in directed_ranks(row, maximize).into_iter().enumerate() {
            rank_sums[j] += r;
        }
    }
    let nf = n as f64;
    let kf = k as f64;
    let rank_sum_squared: f64 = rank_sums.iter().map(|s| (s / nf) * (s / nf)).sum();

    let statistic = (12.0 * nf) / (kf * (kf + 1.0))
        * (rank_sum_squared - kf * (kf + 1.0) * (kf + 1.0) / 4.0);
    let p_value = chi_squared_sf(statistic, kf - 1.0);

    Ok(FriedmanOutcome {
        statistic,
        p_value,
        significant: p_value < alpha,
    })
}

/// Test every instance of a metric, recovering per-instance failures with a
/// neutral verdict.
pub fn friedman_column(data: &MetricData, config: &ComparisonConfig) -> FriedmanSummary {
    let mut rows = Vec::new();
    let mut skipped = Vec::new();

    for instance in data.instances() {
        let outcome = data
            .execution_matrix(instance)
            .and_then(|m| friedman_test(&m, data.metric.maximize, config.significance_level));
        match outcome {
            Ok(outcome) => rows.push((instance.clone(), Some(outcome))),
            Err(reason) => {
                rows.push((instance.clone(), None));
                skipped.push((instance.clone(), reason));
            }
        }
    }

    FriedmanSummary { rows, skipped }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{Measurement, MetricDescriptor, MetricsTable};

    fn matrix(rows: Vec<Vec<f64>>) -> ExecutionMatrix {
        let k = rows[0].len();
        ExecutionMatrix {
            algorithms: (0..k).map(|i| format!("A{i}")).collect(),
            rows,
        }
    }

    #[test]
    fn test_statistic_matches_formula_for_dominance() {
        // One algorithm dominates every execution: R = [1, 2], stat = n
        let m = matrix(vec![vec![1.0, 5.0]; 5]);
        let outcome = friedman_test(&m, false, 0.05).unwrap();
        assert!((outcome.statistic - 5.0).abs() < 1e-12);
        assert!(outcome.p_value < 0.05);
        assert!(outcome.significant);
        assert_eq!(outcome.symbol(), "+");
    }

    #[test]
    fn test_three_executions_not_significant_with_two_algorithms() {
        // chi2_sf(3, 1) ~ 0.083: dominance over 3 executions is not enough
        let m = matrix(vec![vec![1.0, 5.0]; 3]);
        let outcome = friedman_test(&m, false, 0.05).unwrap();
        assert!(!outcome.significant);
        assert_eq!(outcome.symbol(), "=");
    }

    #[test]
    fn test_maximize_flips_ranks_not_statistic_under_symmetry() {
        let m = matrix(vec![vec![1.0, 5.0]; 5]);
        let min = friedman_test(&m, false, 0.05).unwrap();
        let max = friedman_test(&m, true, 0.05).unwrap();
        // Complete dominance either way: same statistic
        assert!((min.statistic - max.statistic).abs() < 1e-12);
    }

    #[test]
    fn test_all_tied_rows_give_zero_statistic() {
        let m = matrix(vec![vec![2.0, 2.0, 2.0]; 4]);
        let outcome = friedman_test(&m, false, 0.05).unwrap();
        assert!(outcome.statistic.abs() < 1e-12);
        assert!((outcome.p_value - 1.0).abs() < 1e-12);
        assert!(!outcome.significant);
    }

    #[test]
    fn test_single_algorithm_is_insufficient() {
        let m = ExecutionMatrix {
            algorithms: vec!["A".to_string()],
            rows: vec![vec![1.0]],
        };
        assert!(matches!(
            friedman_test(&m, false, 0.05),
            Err(ComparisonError::InsufficientData(_))
        ));
    }

    #[test]
    fn test_no_executions_is_insufficient() {
        let m = ExecutionMatrix {
            algorithms: vec!["A".to_string(), "B".to_string()],
            rows: vec![],
        };
        assert!(matches!(
            friedman_test(&m, false, 0.05),
            Err(ComparisonError::InsufficientData(_))
        ));
    }

    #[test]
    fn test_column_records_skip_and_continues() {
        // I1 is complete, I2 has no aligned executions
        let mut measurements = Vec::new();
        for eid in 0..5 {
            measurements.push(Measurement {
                algorithm: "A".to_string(),
                instance: "I1".to_string(),
                metric: "IGD".to_string(),
                execution_id: eid,
                value: 1.0 + eid as f64,
            });
            measurements.push(Measurement {
                algorithm: "B".to_string(),
                instance: "I1".to_string(),
                metric: "IGD".to_string(),
                execution_id: eid,
                value: 10.0 + eid as f64,
            });
        }
        measurements.push(Measurement {
            algorithm: "A".to_string(),
            instance: "I2".to_string(),
            metric: "IGD".to_string(),
            execution_id: 0,
            value: 1.0,
        });
        measurements.push(Measurement {
            algorithm: "B".to_string(),
            instance: "I2".to_string(),
            metric: "IGD".to_string(),
            execution_id: 1,
            value: 2.0,
        });
        let table = MetricsTable::new(vec![MetricDescriptor {
            name: "IGD".to_string(),
            maximize: false,
        }]);
        let data = MetricData::filter(&measurements, &table, "IGD").unwrap();

        let summary = friedman_column(&data, &ComparisonConfig::default());
        assert_eq!(summary.rows.len(), 2);
        assert_eq!(summary.symbol("I1"), "+");
        assert_eq!(summary.symbol("I2"), "=");
        assert_eq!(summary.skipped.len(), 1);
        assert_eq!(summary.skipped[0].0, "I2");
    }
}
