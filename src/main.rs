use anyhow::{Context, Result};
use clap::Parser;
use cotejar::cli::{Cli, OutputFormat, ReportKind};
use cotejar::comparison::ComparisonConfig;
use cotejar::csv_input::{parse_measurements, parse_metrics};
use cotejar::dataset::{Measurement, MetricData, MetricsTable};
use cotejar::latex;
use cotejar::report::{self, build_critical_difference, ComparisonKind, MetricReport};
use std::path::Path;
use tracing_subscriber::EnvFilter;

/// Initialize tracing subscriber for debug output
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::from_default_env().add_directive(tracing::Level::DEBUG.into())
    } else {
        EnvFilter::from_default_env().add_directive(tracing::Level::WARN.into())
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Table report kinds selected by the CLI flag.
fn table_kinds(report: ReportKind) -> Vec<ComparisonKind> {
    match report {
        ReportKind::Summary => vec![ComparisonKind::Summary],
        ReportKind::Friedman => vec![ComparisonKind::Friedman],
        ReportKind::PairwisePivot => vec![ComparisonKind::PairwisePivot],
        ReportKind::Pairwise => vec![ComparisonKind::PairwiseAll],
        ReportKind::CriticalDistance => vec![],
        ReportKind::All => vec![
            ComparisonKind::Summary,
            ComparisonKind::Friedman,
            ComparisonKind::PairwisePivot,
            ComparisonKind::PairwiseAll,
        ],
    }
}

fn write_artifact(dir: &Path, name: &str, content: &str) -> Result<()> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("failed to create output directory {}", dir.display()))?;
    let path = dir.join(name);
    std::fs::write(&path, content)
        .with_context(|| format!("failed to write {}", path.display()))?;
    tracing::info!("wrote {}", path.display());
    Ok(())
}

fn write_table_artifacts(dir: &Path, metric: &str, built: &MetricReport) -> Result<()> {
    match built {
        MetricReport::Summary(r) => {
            let agg = r.aggregation.kind.center_label().to_lowercase();
            write_artifact(dir, &format!("data_{agg}_{metric}.csv"), &r.center_csv())?;
            write_artifact(dir, &format!("data_spread_{agg}_{metric}.csv"), &r.spread_csv())?;
            write_artifact(dir, &format!("summary_{metric}.tex"), &latex::summary_table(r))
        }
        MetricReport::Friedman(r) => write_artifact(
            dir,
            &format!("friedman_{metric}.tex"),
            &latex::friedman_table(r),
        ),
        MetricReport::PairwisePivot(r) => write_artifact(
            dir,
            &format!("pairwise_pivot_{metric}.tex"),
            &latex::pivot_table(r),
        ),
        MetricReport::PairwiseAll(r) => write_artifact(
            dir,
            &format!("pairwise_{metric}.tex"),
            &latex::all_pairs_table(r),
        ),
    }
}

fn emit(cli: &Cli, text: String, json: serde_json::Value) {
    match cli.format {
        OutputFormat::Text => println!("{text}"),
        OutputFormat::Json => println!("{json:#}"),
    }
}

/// Run the selected report(s) for one metric. Only a metric-level lookup
/// failure aborts; per-instance and per-pair problems have already been
/// recovered inside the engine.
fn process_metric(
    cli: &Cli,
    measurements: &[Measurement],
    metrics: &MetricsTable,
    metric: &str,
    config: &ComparisonConfig,
) -> Result<()> {
    let data = MetricData::filter(measurements, metrics, metric)?;

    for kind in table_kinds(cli.report) {
        match report::build(&data, config, kind) {
            Ok(built) => {
                for skip in built.skipped() {
                    tracing::warn!("{metric}: skipped {skip}");
                }
                if let Some(dir) = &cli.output {
                    write_table_artifacts(dir, metric, &built)?;
                }
                emit(cli, built.to_report_string(), serde_json::to_value(&built)?);
            }
            Err(err) => tracing::warn!("{metric}: {kind:?} report skipped: {err}"),
        }
    }

    if cli.report == ReportKind::CriticalDistance || cli.report == ReportKind::All {
        match build_critical_difference(&data, config) {
            Ok(built) => {
                if let Some(dir) = &cli.output {
                    write_artifact(
                        dir,
                        &format!("critical_distance_{metric}.csv"),
                        &built.to_csv(),
                    )?;
                }
                emit(cli, built.to_report_string(), serde_json::to_value(&built)?);
            }
            Err(err) => tracing::warn!("{metric}: critical distance skipped: {err}"),
        }
    }

    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = ComparisonConfig {
        significance_level: cli.alpha,
        min_executions: cli.min_executions,
    };
    config.validate().map_err(|e| anyhow::anyhow!(e))?;

    let measurements_csv = std::fs::read_to_string(&cli.data)
        .with_context(|| format!("failed to read {}", cli.data.display()))?;
    let metrics_csv = std::fs::read_to_string(&cli.metrics)
        .with_context(|| format!("failed to read {}", cli.metrics.display()))?;

    let measurements = parse_measurements(&measurements_csv)
        .with_context(|| format!("failed to parse {}", cli.data.display()))?;
    let metrics = parse_metrics(&metrics_csv)
        .with_context(|| format!("failed to parse {}", cli.metrics.display()))?;

    let selected: Vec<String> = match &cli.metric {
        Some(metric) => vec![metric.clone()],
        None => metrics.names().iter().map(|n| n.to_string()).collect(),
    };
    if selected.is_empty() {
        anyhow::bail!("metrics table is empty");
    }

    // A single metric failing its lookup must not stop the batch
    let mut failures = 0usize;
    for metric in &selected {
        if let Err(err) = process_metric(&cli, &measurements, &metrics, metric, &config) {
            tracing::error!("{metric}: {err}");
            failures += 1;
        }
    }

    if failures == selected.len() {
        anyhow::bail!("all {} metric(s) failed", failures);
    }
    Ok(())
}
