//! Error taxonomy for the comparison engine
//!
//! Only `MetricNotFound` escapes to callers of the per-metric entry points.
//! The other variants are recovered locally: a failing instance or pair is
//! recorded with a neutral verdict and processing continues.

use thiserror::Error;

/// Errors raised while comparing algorithm performance data
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ComparisonError {
    /// Requested metric is missing from the metrics table. Fatal for that
    /// metric; the caller decides whether to continue with the remaining
    /// metrics.
    #[error("metric '{0}' not found in the metrics table")]
    MetricNotFound(String),

    /// Fewer than 2 algorithms, 0 aligned executions, or fewer than 2
    /// instances for a computation that requires them. Recovered by skipping
    /// the affected instance or pair with a neutral verdict.
    #[error("insufficient data: {0}")]
    InsufficientData(String),

    /// Zero-variance or too-small replicate group. Forces a non-normal vote
    /// for that group and a tie for pairwise comparisons on it.
    #[error("degenerate distribution: {0}")]
    DegenerateDistribution(String),

    /// The underlying rank-test routine could not produce a statistic
    /// (e.g. fully tied samples). Converted to a neutral verdict at the
    /// call site.
    #[error("test computation failed: {0}")]
    TestComputation(String),
}
