//! Dataset-wide normality decision
//!
//! Every (instance, algorithm) replicate group takes a Shapiro-Wilk test;
//! the dataset counts as normal only when every single group passes. One
//! failing or degenerate group forces the non-parametric summarization for
//! the whole metric, so a report never mixes means and medians across cells.

use crate::dataset::MetricData;
use crate::stats::shapiro::shapiro_wilk;

/// Normality vote of one replicate group.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupNormality {
    pub instance: String,
    pub algorithm: String,
    /// Shapiro-Wilk p-value; 0.0 for degenerate groups.
    pub p_value: f64,
    /// Set when the group was too small or had no spread and the test was
    /// not invoked.
    pub degenerate: bool,
}

/// Per-group p-values plus the dataset-wide conjunction.
#[derive(Debug, Clone)]
pub struct NormalityReport {
    pub normal: bool,
    pub groups: Vec<GroupNormality>,
}

/// Threshold for the per-group normality votes. Fixed rather than taken
/// from the comparison config: the aggregation kind must not shift with the
/// confidence level chosen for the rank tests.
const NORMALITY_ALPHA: f64 = 0.05;

/// Test every (instance, algorithm) group at the fixed 0.05 level.
///
/// A group with fewer than 3 samples, fewer than 3 distinct values, or zero
/// variance is assigned p = 0 without invoking the test. An empty dataset
/// is non-normal.
pub fn check_normality(data: &MetricData) -> NormalityReport {
    let mut groups = Vec::new();
    let mut normal = !data.is_empty();

    for (instance, algorithm, sample) in data.groups() {
        let (p_value, degenerate) = if is_degenerate(&sample) {
            (0.0, true)
        } else {
            match shapiro_wilk(&sample) {
                Ok(result) => (result.p_value, false),
                Err(_) => (0.0, true),
            }
        };

        if p_value <= NORMALITY_ALPHA {
            normal = false;
        }

        groups.push(GroupNormality {
            instance: instance.to_string(),
            algorithm: algorithm.to_string(),
            p_value,
            degenerate,
        });
    }

    NormalityReport { normal, groups }
}

fn is_degenerate(sample: &[f64]) -> bool {
    if sample.len() < 3 {
        return true;
    }
    let mut distinct: Vec<f64> = sample.to_vec();
    distinct.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    distinct.dedup();
    distinct.len() < 3
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{Measurement, MetricDescriptor, MetricsTable};

    fn dataset(groups: &[(&str, &str, &[f64])]) -> MetricData {
        let mut measurements = Vec::new();
        for (instance, algorithm, values) in groups {
            for (eid, &value) in values.iter().enumerate() {
                measurements.push(Measurement {
                    algorithm: algorithm.to_string(),
                    instance: instance.to_string(),
                    metric: "IGD".to_string(),
                    execution_id: eid as u32,
                    value,
                });
            }
        }
        let table = MetricsTable::new(vec![MetricDescriptor {
            name: "IGD".to_string(),
            maximize: false,
        }]);
        MetricData::filter(&measurements, &table, "IGD").unwrap()
    }

    #[test]
    fn test_zero_variance_group_forces_non_normal() {
        let bell: &[f64] = &[-1.2, -0.8, -0.4, 0.0, 0.4, 0.8, 1.2];
        let flat: &[f64] = &[5.0, 5.0, 5.0, 5.0, 5.0, 5.0, 5.0];
        let report = check_normality(&dataset(&[("I1", "A", bell), ("I1", "B", flat)]));
        assert!(!report.normal);
        let flat_group = report.groups.iter().find(|g| g.algorithm == "B").unwrap();
        assert!(flat_group.degenerate);
        assert_eq!(flat_group.p_value, 0.0);
    }

    #[test]
    fn test_small_group_is_degenerate() {
        let report = check_normality(&dataset(&[("I1", "A", &[1.0, 2.0])]));
        assert!(!report.normal);
        assert!(report.groups[0].degenerate);
    }

    #[test]
    fn test_two_distinct_values_are_degenerate() {
        // Enough samples but only two distinct values
        let report = check_normality(&dataset(&[("I1", "A", &[1.0, 1.0, 2.0, 2.0, 1.0])]));
        assert!(!report.normal);
        assert!(report.groups[0].degenerate);
    }

    #[test]
    fn test_all_groups_normal() {
        let bell: &[f64] = &[-1.2, -0.8, -0.4, -0.1, 0.0, 0.1, 0.4, 0.8, 1.2];
        let shifted: Vec<f64> = bell.iter().map(|v| v + 10.0).collect();
        let report = check_normality(&dataset(&[("I1", "A", bell), ("I1", "B", &shifted)]));
        assert!(report.normal);
        assert!(report.groups.iter().all(|g| !g.degenerate));
    }

    #[test]
    fn test_single_failing_group_wins() {
        let bell: &[f64] = &[-1.2, -0.8, -0.4, -0.1, 0.0, 0.1, 0.4, 0.8, 1.2];
        let skewed: &[f64] = &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 100.0];
        let report = check_normality(&dataset(&[("I1", "A", bell), ("I1", "B", skewed)]));
        assert!(!report.normal);
    }

    #[test]
    fn test_empty_dataset_non_normal() {
        let report = check_normality(&dataset(&[]));
        assert!(!report.normal);
        assert!(report.groups.is_empty());
    }

    #[test]
    fn test_deterministic() {
        let bell: &[f64] = &[-1.2, -0.8, -0.4, 0.0, 0.4, 0.8, 1.2];
        let data = dataset(&[("I1", "A", bell)]);
        let first = check_normality(&data);
        let second = check_normality(&data);
        assert_eq!(first.normal, second.normal);
        assert_eq!(first.groups, second.groups);
    }
}
