//! Normality-dispatched summarization into instance×algorithm matrices
//!
//! Normal data takes mean and sample standard deviation, non-normal data
//! takes median and interquartile range. The kind is chosen once for the
//! whole metric; both matrices share the first-seen row and column orders
//! of the dataset.

use serde::Serialize;

use crate::dataset::MetricData;
use crate::stats::describe::{iqr, mean, median, sample_std};

/// Which summarization the normality check selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AggregationKind {
    MeanStd,
    MedianIqr,
}

impl AggregationKind {
    /// Label of the center statistic, as shown in table captions.
    pub fn center_label(&self) -> &'static str {
        match self {
            AggregationKind::MeanStd => "Mean",
            AggregationKind::MedianIqr => "Median",
        }
    }

    /// Label of the spread statistic.
    pub fn spread_label(&self) -> &'static str {
        match self {
            AggregationKind::MeanStd => "Std",
            AggregationKind::MedianIqr => "IQR",
        }
    }
}

/// Center and spread matrices over instances (rows) and algorithms
/// (columns), both in first-seen order. Cells without measurements are NaN.
#[derive(Debug, Clone, Serialize)]
pub struct AggregatedStat {
    pub kind: AggregationKind,
    pub algorithms: Vec<String>,
    pub instances: Vec<String>,
    pub center: Vec<Vec<f64>>,
    pub spread: Vec<Vec<f64>>,
}

impl AggregatedStat {
    /// Center row of one instance, in algorithm order.
    pub fn center_row(&self, instance: &str) -> Option<&[f64]> {
        self.instances
            .iter()
            .position(|i| i == instance)
            .map(|ii| self.center[ii].as_slice())
    }

    /// Spread row of one instance, in algorithm order.
    pub fn spread_row(&self, instance: &str) -> Option<&[f64]> {
        self.instances
            .iter()
            .position(|i| i == instance)
            .map(|ii| self.spread[ii].as_slice())
    }
}

/// Summarize every (instance, algorithm) group according to the dataset's
/// normality. Pure transform; consumers render the matrices as tables.
pub fn aggregate(data: &MetricData, normal: bool) -> AggregatedStat {
    let kind = if normal {
        AggregationKind::MeanStd
    } else {
        AggregationKind::MedianIqr
    };

    let algorithms = data.algorithms().to_vec();
    let instances = data.instances().to_vec();

    let mut center = Vec::with_capacity(instances.len());
    let mut spread = Vec::with_capacity(instances.len());
    for instance in &instances {
        let mut center_row = Vec::with_capacity(algorithms.len());
        let mut spread_row = Vec::with_capacity(algorithms.len());
        for algorithm in &algorithms {
            let sample = data.sample(instance, algorithm);
            if sample.is_empty() {
                center_row.push(f64::NAN);
                spread_row.push(f64::NAN);
            } else {
                match kind {
                    AggregationKind::MeanStd => {
                        center_row.push(mean(&sample));
                        spread_row.push(sample_std(&sample));
                    }
                    AggregationKind::MedianIqr => {
                        center_row.push(median(&sample));
                        spread_row.push(iqr(&sample));
                    }
                }
            }
        }
        center.push(center_row);
        spread.push(spread_row);
    }

    AggregatedStat {
        kind,
        algorithms,
        instances,
        center,
        spread,
    }
}
