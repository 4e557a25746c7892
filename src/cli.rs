//! CLI argument parsing for Cotejar

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

/// Output format for comparison reports
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text format (default)
    Text,
    /// JSON format for machine parsing
    Json,
}

/// Which report(s) to generate for each metric
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportKind {
    /// Center/spread table only
    Summary,
    /// Summary with the per-instance Friedman verdict column
    Friedman,
    /// Every algorithm against the pivot (last column), with a tally row
    PairwisePivot,
    /// Every unordered algorithm pair, one verdict symbol per instance
    Pairwise,
    /// Average ranks, Nemenyi critical distance, and cliques
    CriticalDistance,
    /// All of the above
    All,
}

#[derive(Parser, Debug)]
#[command(name = "cotejar")]
#[command(version)]
#[command(about = "Statistical comparison of algorithm benchmark results", long_about = None)]
pub struct Cli {
    /// Measurements CSV (Algorithm,Instance,MetricName,ExecutionId,MetricValue)
    #[arg(short = 'd', long = "data", value_name = "FILE")]
    pub data: PathBuf,

    /// Metrics CSV (MetricName,Maximize)
    #[arg(short = 'm', long = "metrics", value_name = "FILE")]
    pub metrics: PathBuf,

    /// Restrict processing to one metric (default: every metric in the table)
    #[arg(long = "metric", value_name = "NAME")]
    pub metric: Option<String>,

    /// Report kind to generate
    #[arg(short = 'r', long = "report", value_enum, default_value = "all")]
    pub report: ReportKind,

    /// Output format for stdout
    #[arg(long = "format", value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Directory for LaTeX and CSV artifacts (skipped when absent)
    #[arg(short = 'o', long = "output", value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// Significance level for the rank tests (0.01, 0.05, or 0.10); the
    /// normality gate stays at 0.05
    #[arg(long = "alpha", value_name = "ALPHA", default_value = "0.05")]
    pub alpha: f64,

    /// Minimum aligned executions for a pairwise test
    #[arg(long = "min-executions", value_name = "N", default_value = "3")]
    pub min_executions: usize,

    /// Enable verbose tracing output
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}
