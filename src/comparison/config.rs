//! Configuration for the comparison pipeline

use serde::{Deserialize, Serialize};

/// Significance settings shared by the rank tests.
///
/// One significance level drives the Friedman verdict column, the pairwise
/// verdicts, and the Nemenyi critical distance, so a report never mixes
/// confidence levels across its tables. The normality gate that picks the
/// aggregation kind is fixed at 0.05 and deliberately not configurable.
///
/// # Example
/// ```
/// use cotejar::comparison::ComparisonConfig;
///
/// let config = ComparisonConfig::default();
/// assert_eq!(config.significance_level, 0.05); // 95% confidence
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonConfig {
    /// Statistical significance level (alpha) for hypothesis testing
    ///
    /// - 0.05 (default): 95% confidence
    /// - 0.01: 99% confidence, fewer false positives
    /// - 0.10: 90% confidence, more sensitive
    ///
    /// Restricted to the three levels above because the Nemenyi critical
    /// distance uses tabulated studentized-range constants.
    pub significance_level: f64,

    /// Minimum aligned executions for a pairwise test
    ///
    /// A pair of samples with fewer aligned executions is recorded as a tie
    /// instead of producing an unreliable p-value.
    ///
    /// Default: 3
    pub min_executions: usize,
}

impl Default for ComparisonConfig {
    fn default() -> Self {
        Self {
            significance_level: 0.05,
            min_executions: 3,
        }
    }
}

impl ComparisonConfig {
    /// Strict configuration: 99% confidence, more executions required.
    pub fn strict() -> Self {
        Self {
            significance_level: 0.01,
            min_executions: 5,
        }
    }

    /// Permissive configuration: 90% confidence, minimum viable samples.
    pub fn permissive() -> Self {
        Self {
            significance_level: 0.10,
            min_executions: 1,
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        const SUPPORTED: [f64; 3] = [0.01, 0.05, 0.10];
        if !SUPPORTED
            .iter()
            .any(|a| (a - self.significance_level).abs() < 1e-9)
        {
            return Err(format!(
                "significance_level must be one of 0.01, 0.05, 0.10, got {}",
                self.significance_level
            ));
        }

        if self.min_executions < 1 {
            return Err(format!(
                "min_executions must be >= 1, got {}",
                self.min_executions
            ));
        }

        Ok(())
    }
}
