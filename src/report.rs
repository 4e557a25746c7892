//! Report assembly over the comparison pipeline
//!
//! One tagged [`ComparisonKind`] selects which tests a report embeds; free
//! build functions produce plain serializable structs that the text, CSV,
//! JSON, and LaTeX renderers all consume. Skipped instances and pairs are
//! carried as records inside the reports so callers decide how to surface
//! them.

use serde::Serialize;

use crate::comparison::{
    aggregate, all_pairs_comparison, check_normality, clique_groups, friedman_column,
    nemenyi_critical_distance, pivot_comparison, Clique, ComparisonConfig, PairSequence,
    PivotTally, RankEntry,
};
use crate::comparison::{average_rank_table, AggregatedStat};
use crate::dataset::MetricData;
use crate::error::ComparisonError;

/// The report variants, one per table layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ComparisonKind {
    /// Center/spread matrices only.
    Summary,
    /// Summary plus the per-instance Friedman verdict column.
    Friedman,
    /// Summary plus verdicts of every algorithm against the pivot.
    PairwisePivot,
    /// Per-pair verdict sequences over all instances.
    PairwiseAll,
}

/// Center/spread matrices with their aggregation-kind label.
#[derive(Debug, Clone, Serialize)]
pub struct SummaryReport {
    pub metric: String,
    pub maximize: bool,
    /// Dataset-wide normality decision that picked the aggregation kind.
    pub normal: bool,
    pub aggregation: AggregatedStat,
}

/// Friedman verdict for one instance; p-value and statistic are absent when
/// the instance was skipped.
#[derive(Debug, Clone, Serialize)]
pub struct InstanceVerdict {
    pub instance: String,
    pub symbol: String,
    pub statistic: Option<f64>,
    pub p_value: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FriedmanReport {
    pub summary: SummaryReport,
    pub verdicts: Vec<InstanceVerdict>,
    /// Instances that fell back to "=", with the reason.
    pub skipped: Vec<String>,
}

/// One pivot-table row: a verdict symbol per candidate algorithm.
#[derive(Debug, Clone, Serialize)]
pub struct PivotRow {
    pub instance: String,
    pub symbols: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PivotReport {
    pub summary: SummaryReport,
    pub pivot: String,
    pub candidates: Vec<String>,
    pub rows: Vec<PivotRow>,
    pub tallies: Vec<PivotTally>,
    pub skipped: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AllPairsReport {
    pub summary: SummaryReport,
    /// Instance order the symbol sequences follow.
    pub instances: Vec<String>,
    pub pairs: Vec<PairSequence>,
    pub skipped: Vec<String>,
}

/// Everything a critical-difference diagram needs: sorted average ranks,
/// the CD scalar, and the cliques.
#[derive(Debug, Clone, Serialize)]
pub struct CriticalDifferenceReport {
    pub metric: String,
    pub ranks: Vec<RankEntry>,
    pub critical_distance: f64,
    pub cliques: Vec<Clique>,
}

/// A built report, tagged by its kind.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum MetricReport {
    Summary(SummaryReport),
    Friedman(FriedmanReport),
    PairwisePivot(PivotReport),
    PairwiseAll(AllPairsReport),
}

impl MetricReport {
    pub fn kind(&self) -> ComparisonKind {
        match self {
            MetricReport::Summary(_) => ComparisonKind::Summary,
            MetricReport::Friedman(_) => ComparisonKind::Friedman,
            MetricReport::PairwisePivot(_) => ComparisonKind::PairwisePivot,
            MetricReport::PairwiseAll(_) => ComparisonKind::PairwiseAll,
        }
    }

    /// Skip records carried by the report; empty for the summary kind.
    pub fn skipped(&self) -> &[String] {
        match self {
            MetricReport::Summary(_) => &[],
            MetricReport::Friedman(r) => &r.skipped,
            MetricReport::PairwisePivot(r) => &r.skipped,
            MetricReport::PairwiseAll(r) => &r.skipped,
        }
    }

    pub fn to_report_string(&self) -> String {
        match self {
            MetricReport::Summary(r) => r.to_report_string(),
            MetricReport::Friedman(r) => r.to_report_string(),
            MetricReport::PairwisePivot(r) => r.to_report_string(),
            MetricReport::PairwiseAll(r) => r.to_report_string(),
        }
    }
}

/// Build one report of the requested kind.
pub fn build(
    data: &MetricData,
    config: &ComparisonConfig,
    kind: ComparisonKind,
) -> Result<MetricReport, ComparisonError> {
    Ok(match kind {
        ComparisonKind::Summary => MetricReport::Summary(build_summary(data)),
        ComparisonKind::Friedman => MetricReport::Friedman(build_friedman(data, config)),
        ComparisonKind::PairwisePivot => {
            MetricReport::PairwisePivot(build_pairwise_pivot(data, config)?)
        }
        ComparisonKind::PairwiseAll => {
            MetricReport::PairwiseAll(build_pairwise_all(data, config)?)
        }
    })
}

/// Build the summary every other report embeds. The normality gate is fixed
/// at 0.05, so the summary needs no configuration.
pub fn build_summary(data: &MetricData) -> SummaryReport {
    let normality = check_normality(data);
    let aggregation = aggregate(data, normality.normal);
    SummaryReport {
        metric: data.metric.name.clone(),
        maximize: data.metric.maximize,
        normal: normality.normal,
        aggregation,
    }
}

/// Summary plus the per-instance Friedman verdict column.
pub fn build_friedman(data: &MetricData, config: &ComparisonConfig) -> FriedmanReport {
    let summary = build_summary(data);
    let column = friedman_column(data, config);

    let verdicts = column
        .rows
        .iter()
        .map(|(instance, outcome)| InstanceVerdict {
            instance: instance.clone(),
            symbol: outcome.map_or("=", |o| o.symbol()).to_string(),
            statistic: outcome.map(|o| o.statistic),
            p_value: outcome.map(|o| o.p_value),
        })
        .collect();
    let skipped = column
        .skipped
        .iter()
        .map(|(instance, reason)| format!("{instance}: {reason}"))
        .collect();

    FriedmanReport {
        summary,
        verdicts,
        skipped,
    }
}

/// Summary plus pivot-mode pairwise verdicts and the tally row.
pub fn build_pairwise_pivot(
    data: &MetricData,
    config: &ComparisonConfig,
) -> Result<PivotReport, ComparisonError> {
    let summary = build_summary(data);
    let pivot = pivot_comparison(data, config)?;

    let rows = data
        .instances()
        .iter()
        .zip(&pivot.verdicts)
        .map(|(instance, verdicts)| PivotRow {
            instance: instance.clone(),
            symbols: verdicts.iter().map(|v| v.symbol().to_string()).collect(),
        })
        .collect();
    let skipped = pivot
        .skipped
        .iter()
        .map(|s| format!("{} vs {} on {}: {}", s.first, s.second, s.instance, s.reason))
        .collect();

    Ok(PivotReport {
        summary,
        pivot: pivot.pivot,
        candidates: pivot.candidates,
        rows,
        tallies: pivot.tallies,
        skipped,
    })
}

/// All-pairs symbol sequences.
pub fn build_pairwise_all(
    data: &MetricData,
    config: &ComparisonConfig,
) -> Result<AllPairsReport, ComparisonError> {
    let summary = build_summary(data);
    let all = all_pairs_comparison(data, config)?;

    let skipped = all
        .skipped
        .iter()
        .map(|s| format!("{} vs {} on {}: {}", s.first, s.second, s.instance, s.reason))
        .collect();

    Ok(AllPairsReport {
        summary,
        instances: data.instances().to_vec(),
        pairs: all.pairs,
        skipped,
    })
}

/// Average ranks, Nemenyi CD, and cliques for the CD diagram.
pub fn build_critical_difference(
    data: &MetricData,
    config: &ComparisonConfig,
) -> Result<CriticalDifferenceReport, ComparisonError> {
    let summary = build_summary(data);
    let table = average_rank_table(&summary.aggregation, data.metric.maximize)?;
    let cd = nemenyi_critical_distance(
        config.significance_level,
        table.len(),
        summary.aggregation.instances.len(),
    )?;
    let cliques = clique_groups(&table, cd);

    Ok(CriticalDifferenceReport {
        metric: data.metric.name.clone(),
        ranks: table.sorted(),
        critical_distance: cd,
        cliques,
    })
}

impl SummaryReport {
    /// Center matrix as CSV, instances down, algorithms across.
    pub fn center_csv(&self) -> String {
        matrix_csv(
            &self.aggregation.instances,
            &self.aggregation.algorithms,
            &self.aggregation.center,
        )
    }

    /// Spread matrix as CSV.
    pub fn spread_csv(&self) -> String {
        matrix_csv(
            &self.aggregation.instances,
            &self.aggregation.algorithms,
            &self.aggregation.spread,
        )
    }

    /// Human-readable report.
    pub fn to_report_string(&self) -> String {
        let mut out = format!(
            "{} ({} / {})\n",
            self.metric,
            self.aggregation.kind.center_label(),
            self.aggregation.kind.spread_label()
        );
        for (ii, instance) in self.aggregation.instances.iter().enumerate() {
            out.push_str(&format!("  {instance}:"));
            for (ai, algorithm) in self.aggregation.algorithms.iter().enumerate() {
                out.push_str(&format!(
                    " {algorithm}={:.4e}({:.2e})",
                    self.aggregation.center[ii][ai], self.aggregation.spread[ii][ai]
                ));
            }
            out.push('\n');
        }
        out
    }
}

impl FriedmanReport {
    pub fn to_report_string(&self) -> String {
        let mut out = self.summary.to_report_string();
        out.push_str("Friedman verdicts:\n");
        for v in &self.verdicts {
            match v.p_value {
                Some(p) => out.push_str(&format!("  {} {} (p={:.4})\n", v.instance, v.symbol, p)),
                None => out.push_str(&format!("  {} {} (skipped)\n", v.instance, v.symbol)),
            }
        }
        out
    }
}

impl PivotReport {
    pub fn to_report_string(&self) -> String {
        let mut out = self.summary.to_report_string();
        out.push_str(&format!("Pairwise verdicts vs pivot '{}':\n", self.pivot));
        for row in &self.rows {
            out.push_str(&format!("  {}:", row.instance));
            for (algorithm, symbol) in self.candidates.iter().zip(&row.symbols) {
                out.push_str(&format!(" {algorithm}{symbol}"));
            }
            out.push('\n');
        }
        out.push_str("  + / - / =:");
        for tally in &self.tallies {
            out.push_str(&format!(
                " {}={}/{}/{}",
                tally.algorithm, tally.better, tally.worse, tally.ties
            ));
        }
        out.push('\n');
        out
    }
}

impl AllPairsReport {
    pub fn to_report_string(&self) -> String {
        let mut out = self.summary.to_report_string();
        out.push_str(&format!(
            "Pairwise verdicts per instance ({}):\n",
            self.instances.join(", ")
        ));
        for pair in &self.pairs {
            out.push_str(&format!(
                "  {} vs {}: {}\n",
                pair.first, pair.second, pair.symbols
            ));
        }
        out
    }
}

impl CriticalDifferenceReport {
    /// Diagram data as CSV: one row per algorithm with its rank and clique
    /// memberships marked by index.
    pub fn to_csv(&self) -> String {
        let mut out = String::from("Algorithm,AverageRank,Cliques\n");
        for entry in &self.ranks {
            let memberships: Vec<String> = self
                .cliques
                .iter()
                .enumerate()
                .filter(|(_, c)| c.algorithms.contains(&entry.algorithm))
                .map(|(i, _)| i.to_string())
                .collect();
            out.push_str(&format!(
                "{},{},{}\n",
                escape_field(&entry.algorithm),
                entry.average_rank,
                memberships.join(";")
            ));
        }
        out
    }

    pub fn to_report_string(&self) -> String {
        let mut out = format!(
            "{}: CD = {:.4} over {} algorithms\n",
            self.metric,
            self.critical_distance,
            self.ranks.len()
        );
        for entry in &self.ranks {
            out.push_str(&format!("  {} @ {:.3}\n", entry.algorithm, entry.average_rank));
        }
        out.push_str("Cliques:\n");
        for clique in &self.cliques {
            out.push_str(&format!("  {{{}}}\n", clique.algorithms.join(", ")));
        }
        out
    }
}

fn matrix_csv(instances: &[String], algorithms: &[String], matrix: &[Vec<f64>]) -> String {
    let mut out = String::from("Instance");
    for algorithm in algorithms {
        out.push(',');
        out.push_str(&escape_field(algorithm));
    }
    out.push('\n');
    for (instance, row) in instances.iter().zip(matrix) {
        out.push_str(&escape_field(instance));
        for value in row {
            out.push(',');
            out.push_str(&value.to_string());
        }
        out.push('\n');
    }
    out
}

/// Escape a CSV field (handle commas, quotes, newlines).
fn escape_field(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{Measurement, MetricDescriptor, MetricsTable};

    fn dataset() -> MetricData {
        let mut measurements = Vec::new();
        for (algorithm, base) in [("A", 1.0), ("B", 5.0), ("C", 9.0)] {
            for instance in ["I1", "I2"] {
                for eid in 0..5u32 {
                    measurements.push(Measurement {
                        algorithm: algorithm.to_string(),
                        instance: instance.to_string(),
                        metric: "IGD".to_string(),
                        execution_id: eid,
                        value: base + eid as f64 * 0.1,
                    });
                }
            }
        }
        let table = MetricsTable::new(vec![MetricDescriptor {
            name: "IGD".to_string(),
            maximize: false,
        }]);
        MetricData::filter(&measurements, &table, "IGD").unwrap()
    }

    #[test]
    fn test_build_dispatches_by_kind() {
        let config = ComparisonConfig::default();
        let data = dataset();
        for kind in [
            ComparisonKind::Summary,
            ComparisonKind::Friedman,
            ComparisonKind::PairwisePivot,
            ComparisonKind::PairwiseAll,
        ] {
            let built = build(&data, &config, kind).unwrap();
            assert_eq!(built.kind(), kind);
            assert!(!built.to_report_string().is_empty());
            assert!(built.skipped().is_empty());
        }
    }

    #[test]
    fn test_summary_report_shape() {
        let report = build_summary(&dataset());
        assert_eq!(report.metric, "IGD");
        assert_eq!(report.aggregation.algorithms, ["A", "B", "C"]);
        assert_eq!(report.aggregation.instances, ["I1", "I2"]);
    }

    #[test]
    fn test_friedman_report_has_one_verdict_per_instance() {
        let report = build_friedman(&dataset(), &ComparisonConfig::default());
        assert_eq!(report.verdicts.len(), 2);
        assert!(report.verdicts.iter().all(|v| v.symbol == "+"));
        assert!(report.skipped.is_empty());
    }

    #[test]
    fn test_pivot_report_layout() {
        let report = build_pairwise_pivot(&dataset(), &ComparisonConfig::default()).unwrap();
        assert_eq!(report.pivot, "C");
        assert_eq!(report.candidates, ["A", "B"]);
        assert_eq!(report.rows.len(), 2);
        assert_eq!(report.rows[0].symbols, ["+", "+"]);
        assert_eq!(report.tallies[0].better, 2);
    }

    #[test]
    fn test_all_pairs_report_layout() {
        let report = build_pairwise_all(&dataset(), &ComparisonConfig::default()).unwrap();
        assert_eq!(report.pairs.len(), 3);
        assert_eq!(report.pairs[0].symbols.len(), 2);
    }

    #[test]
    fn test_critical_difference_report() {
        let report = build_critical_difference(&dataset(), &ComparisonConfig::default()).unwrap();
        assert_eq!(report.ranks[0].algorithm, "A");
        assert_eq!(report.ranks[0].average_rank, 1.0);
        assert!(report.critical_distance > 0.0);
        assert!(!report.cliques.is_empty());
    }

    #[test]
    fn test_center_csv_round_layout() {
        let report = build_summary(&dataset());
        let csv = report.center_csv();
        let mut lines = csv.lines();
        assert_eq!(lines.next().unwrap(), "Instance,A,B,C");
        assert!(lines.next().unwrap().starts_with("I1,"));
    }

    #[test]
    fn test_cd_csv_marks_memberships() {
        let report = build_critical_difference(&dataset(), &ComparisonConfig::default()).unwrap();
        let csv = report.to_csv();
        assert!(csv.starts_with("Algorithm,AverageRank,Cliques\n"));
        assert!(csv.lines().count() == report.ranks.len() + 1);
    }

    #[test]
    fn test_reports_serialize_to_json() {
        let config = ComparisonConfig::default();
        let data = dataset();
        let json = serde_json::to_string(&build_friedman(&data, &config)).unwrap();
        assert!(json.contains("\"verdicts\""));
        let json = serde_json::to_string(&build_critical_difference(&data, &config).unwrap())
            .unwrap();
        assert!(json.contains("\"critical_distance\""));
    }

    #[test]
    fn test_report_strings_contain_key_facts() {
        let config = ComparisonConfig::default();
        let data = dataset();
        let text = build_friedman(&data, &config).to_report_string();
        assert!(text.contains("Friedman"));
        assert!(text.contains("I1"));
        let text = build_critical_difference(&data, &config)
            .unwrap()
            .to_report_string();
        assert!(text.contains("CD ="));
        assert!(text.contains("Cliques"));
    }
}
