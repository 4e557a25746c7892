//! End-to-end pipeline tests over the CSV fixtures
//!
//! The fixture dataset has three algorithms (NSGAII best, SMPSO close,
//! MOEAD clearly worst) on three ZDT instances with five executions each,
//! under a minimized IGD metric (with one outlier group forcing the
//! non-parametric path) and a maximized HV metric (well-behaved, taking the
//! parametric path).

use cotejar::comparison::{AggregationKind, ComparisonConfig};
use cotejar::csv_input::{parse_measurements, parse_metrics};
use cotejar::dataset::MetricData;
use cotejar::error::ComparisonError;
use cotejar::report::{
    build_critical_difference, build_friedman, build_pairwise_all, build_pairwise_pivot,
    build_summary,
};

const MEASUREMENTS: &str = include_str!("fixtures/measurements.csv");
const METRICS: &str = include_str!("fixtures/metrics.csv");

fn metric_data(metric: &str) -> MetricData {
    let measurements = parse_measurements(MEASUREMENTS).unwrap();
    let metrics = parse_metrics(METRICS).unwrap();
    MetricData::filter(&measurements, &metrics, metric).unwrap()
}

#[test]
fn test_unknown_metric_is_fatal() {
    let measurements = parse_measurements(MEASUREMENTS).unwrap();
    let metrics = parse_metrics(METRICS).unwrap();
    let err = MetricData::filter(&measurements, &metrics, "SPREAD").unwrap_err();
    assert_eq!(err, ComparisonError::MetricNotFound("SPREAD".to_string()));
}

#[test]
fn test_igd_takes_the_non_parametric_path() {
    // The MOEAD outlier execution on every instance fails Shapiro-Wilk
    let report = build_summary(&metric_data("IGD"));
    assert!(!report.normal);
    assert_eq!(report.aggregation.kind, AggregationKind::MedianIqr);
    assert_eq!(report.aggregation.algorithms, ["NSGAII", "SMPSO", "MOEAD"]);
    assert_eq!(report.aggregation.instances, ["ZDT1", "ZDT2", "ZDT3"]);
}

#[test]
fn test_hv_takes_the_parametric_path() {
    let report = build_summary(&metric_data("HV"));
    assert!(report.normal);
    assert_eq!(report.aggregation.kind, AggregationKind::MeanStd);
}

#[test]
fn test_igd_median_cells() {
    let report = build_summary(&metric_data("IGD"));
    let row = report.aggregation.center_row("ZDT1").unwrap();
    // NSGAII executions on ZDT1: median of the five raw values
    assert!((row[0] - 0.0104).abs() < 1e-12);
    assert!((row[1] - 0.0154).abs() < 1e-12);
}

#[test]
fn test_friedman_column_all_significant() {
    for metric in ["IGD", "HV"] {
        let report = build_friedman(&metric_data(metric), &ComparisonConfig::default());
        assert_eq!(report.verdicts.len(), 3);
        for verdict in &report.verdicts {
            assert_eq!(verdict.symbol, "+", "{metric} on {}", verdict.instance);
            assert!(verdict.p_value.unwrap() < 0.05);
        }
        assert!(report.skipped.is_empty());
    }
}

#[test]
fn test_pivot_mode_tallies() {
    let report =
        build_pairwise_pivot(&metric_data("IGD"), &ComparisonConfig::default()).unwrap();
    assert_eq!(report.pivot, "MOEAD");
    assert_eq!(report.candidates, ["NSGAII", "SMPSO"]);
    // Both candidates beat the pivot on all three instances
    for tally in &report.tallies {
        assert_eq!(tally.better, 3, "{}", tally.algorithm);
        assert_eq!(tally.worse, 0);
        assert_eq!(tally.ties, 0);
    }
}

#[test]
fn test_pivot_mode_direction_on_maximized_metric() {
    let report = build_pairwise_pivot(&metric_data("HV"), &ComparisonConfig::default()).unwrap();
    // Candidates have the higher hypervolume, so they still win
    for tally in &report.tallies {
        assert_eq!(tally.better, 3, "{}", tally.algorithm);
    }
}

#[test]
fn test_all_pairs_sequences() {
    let report = build_pairwise_all(&metric_data("IGD"), &ComparisonConfig::default()).unwrap();
    let keys: Vec<(&str, &str)> = report
        .pairs
        .iter()
        .map(|p| (p.first.as_str(), p.second.as_str()))
        .collect();
    assert_eq!(
        keys,
        vec![
            ("NSGAII", "SMPSO"),
            ("NSGAII", "MOEAD"),
            ("SMPSO", "MOEAD")
        ]
    );
    for pair in &report.pairs {
        assert_eq!(pair.symbols, "+++", "{} vs {}", pair.first, pair.second);
    }
}

#[test]
fn test_critical_difference_chain() {
    let report =
        build_critical_difference(&metric_data("IGD"), &ComparisonConfig::default()).unwrap();
    // Perfect ordering over 3 instances: ranks exactly 1, 2, 3
    let ranks: Vec<f64> = report.ranks.iter().map(|e| e.average_rank).collect();
    assert_eq!(ranks, vec![1.0, 2.0, 3.0]);
    assert_eq!(report.ranks[0].algorithm, "NSGAII");

    // CD ~ 1.91 for k = 3, N = 3: adjacent algorithms are indistinguishable
    // but the extremes are not, so the cliques chain and overlap
    assert!((report.critical_distance - 1.9137).abs() < 1e-3);
    assert_eq!(report.cliques.len(), 2);
    assert_eq!(report.cliques[0].algorithms, ["NSGAII", "SMPSO"]);
    assert_eq!(report.cliques[1].algorithms, ["SMPSO", "MOEAD"]);
}

#[test]
fn test_hv_rank_table_direction() {
    let report =
        build_critical_difference(&metric_data("HV"), &ComparisonConfig::default()).unwrap();
    // Highest hypervolume wins under maximize
    assert_eq!(report.ranks[0].algorithm, "NSGAII");
    assert_eq!(report.ranks[0].average_rank, 1.0);
    assert_eq!(report.ranks[2].algorithm, "MOEAD");
    assert_eq!(report.ranks[2].average_rank, 3.0);
}

#[test]
fn test_reports_are_deterministic() {
    let config = ComparisonConfig::default();
    let data = metric_data("IGD");
    let a = serde_json::to_string(&build_friedman(&data, &config)).unwrap();
    let b = serde_json::to_string(&build_friedman(&data, &config)).unwrap();
    assert_eq!(a, b);
}
