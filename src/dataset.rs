//! Tabular measurement data and per-metric filtered views
//!
//! The engine consumes two tables: measurements
//! (`Algorithm,Instance,MetricName,ExecutionId,MetricValue`) and metric
//! descriptors (`MetricName,Maximize`). [`MetricData`] is the read-only view
//! of one metric's measurements with the first-seen algorithm and instance
//! orders fixed at construction time; every downstream matrix uses those
//! orders.

use std::collections::{BTreeMap, HashMap};

use crate::error::ComparisonError;

/// One replicate observation: a single execution of an algorithm on an
/// instance, measured under one metric.
#[derive(Debug, Clone, PartialEq)]
pub struct Measurement {
    pub algorithm: String,
    pub instance: String,
    pub metric: String,
    pub execution_id: u32,
    pub value: f64,
}

/// Metric descriptor fixing the comparison direction.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricDescriptor {
    pub name: String,
    /// true if larger values are better
    pub maximize: bool,
}

/// The metrics table in first-seen order.
#[derive(Debug, Clone, Default)]
pub struct MetricsTable {
    metrics: Vec<MetricDescriptor>,
}

impl MetricsTable {
    pub fn new(metrics: Vec<MetricDescriptor>) -> Self {
        Self { metrics }
    }

    /// Look up a metric by name.
    pub fn lookup(&self, name: &str) -> Result<&MetricDescriptor, ComparisonError> {
        self.metrics
            .iter()
            .find(|m| m.name == name)
            .ok_or_else(|| ComparisonError::MetricNotFound(name.to_string()))
    }

    /// Metric names in table order.
    pub fn names(&self) -> Vec<&str> {
        self.metrics.iter().map(|m| m.name.as_str()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.metrics.is_empty()
    }
}

/// Execution-aligned instance slice: rows are executions present for every
/// algorithm, columns follow the dataset's algorithm order.
#[derive(Debug, Clone)]
pub struct ExecutionMatrix {
    pub algorithms: Vec<String>,
    /// `rows[e][a]` is the value of algorithm `a` on aligned execution `e`.
    pub rows: Vec<Vec<f64>>,
}

impl ExecutionMatrix {
    pub fn executions(&self) -> usize {
        self.rows.len()
    }

    pub fn algorithm_count(&self) -> usize {
        self.algorithms.len()
    }
}

/// All measurements of one metric, with fixed algorithm/instance orders.
#[derive(Debug, Clone)]
pub struct MetricData {
    pub metric: MetricDescriptor,
    algorithms: Vec<String>,
    instances: Vec<String>,
    /// (instance index, algorithm index) -> ordered (execution id, value)
    samples: HashMap<(usize, usize), Vec<(u32, f64)>>,
}

impl MetricData {
    /// Filter the measurement table down to one metric. The metric must be
    /// present in the metrics table; rows for other metrics are dropped.
    pub fn filter(
        measurements: &[Measurement],
        metrics: &MetricsTable,
        metric_name: &str,
    ) -> Result<Self, ComparisonError> {
        let metric = metrics.lookup(metric_name)?.clone();

        let mut algorithms: Vec<String> = Vec::new();
        let mut instances: Vec<String> = Vec::new();
        let mut samples: HashMap<(usize, usize), Vec<(u32, f64)>> = HashMap::new();

        for m in measurements.iter().filter(|m| m.metric == metric.name) {
            let ai = index_of_or_push(&mut algorithms, &m.algorithm);
            let ii = index_of_or_push(&mut instances, &m.instance);
            samples
                .entry((ii, ai))
                .or_default()
                .push((m.execution_id, m.value));
        }

        Ok(Self {
            metric,
            algorithms,
            instances,
            samples,
        })
    }

    /// Algorithms in first-seen order.
    pub fn algorithms(&self) -> &[String] {
        &self.algorithms
    }

    /// Instances in first-seen order.
    pub fn instances(&self) -> &[String] {
        &self.instances
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Replicate sample for one (instance, algorithm) group, in input order.
    /// Empty when the group has no measurements.
    pub fn sample(&self, instance: &str, algorithm: &str) -> Vec<f64> {
        match (self.instance_index(instance), self.algorithm_index(algorithm)) {
            (Some(ii), Some(ai)) => self
                .samples
                .get(&(ii, ai))
                .map(|s| s.iter().map(|&(_, v)| v).collect())
                .unwrap_or_default(),
            _ => Vec::new(),
        }
    }

    /// Iterate every (instance, algorithm, replicate sample) group in
    /// instance-major order.
    pub fn groups(&self) -> Vec<(&str, &str, Vec<f64>)> {
        let mut out = Vec::new();
        for (ii, instance) in self.instances.iter().enumerate() {
            for (ai, algorithm) in self.algorithms.iter().enumerate() {
                if let Some(s) = self.samples.get(&(ii, ai)) {
                    out.push((
                        instance.as_str(),
                        algorithm.as_str(),
                        s.iter().map(|&(_, v)| v).collect(),
                    ));
                }
            }
        }
        out
    }

    /// Pivot one instance to an execution×algorithm matrix. Only execution
    /// ids present for every algorithm survive; rows are ordered by
    /// execution id. Fails when fewer than 2 algorithms or 0 aligned
    /// executions remain.
    pub fn execution_matrix(&self, instance: &str) -> Result<ExecutionMatrix, ComparisonError> {
        let ii = self.instance_index(instance).ok_or_else(|| {
            ComparisonError::InsufficientData(format!("instance '{instance}' has no measurements"))
        })?;

        if self.algorithms.len() < 2 {
            return Err(ComparisonError::InsufficientData(format!(
                "instance '{instance}' has {} algorithm(s), need at least 2",
                self.algorithms.len()
            )));
        }

        // execution id -> per-algorithm values, keyed in id order
        let mut by_execution: BTreeMap<u32, Vec<Option<f64>>> = BTreeMap::new();
        for (ai, _) in self.algorithms.iter().enumerate() {
            if let Some(s) = self.samples.get(&(ii, ai)) {
                for &(eid, value) in s {
                    by_execution
                        .entry(eid)
                        .or_insert_with(|| vec![None; self.algorithms.len()])[ai] = Some(value);
                }
            }
        }

        let rows: Vec<Vec<f64>> = by_execution
            .values()
            .filter(|cells| cells.iter().all(Option::is_some))
            .map(|cells| cells.iter().copied().flatten().collect())
            .collect();

        if rows.is_empty() {
            return Err(ComparisonError::InsufficientData(format!(
                "instance '{instance}' has no executions aligned across all algorithms"
            )));
        }

        Ok(ExecutionMatrix {
            algorithms: self.algorithms.clone(),
            rows,
        })
    }

    /// Extract the two execution-aligned replicate samples for a pair of
    /// algorithms on one instance. Only execution ids present in both
    /// samples survive, in id order.
    pub fn aligned_pair(
        &self,
        instance: &str,
        first: &str,
        second: &str,
    ) -> Result<(Vec<f64>, Vec<f64>), ComparisonError> {
        let ii = self.instance_index(instance).ok_or_else(|| {
            ComparisonError::InsufficientData(format!("instance '{instance}' has no measurements"))
        })?;
        let ai = self.algorithm_index(first).ok_or_else(|| {
            ComparisonError::InsufficientData(format!("algorithm '{first}' has no measurements"))
        })?;
        let bi = self.algorithm_index(second).ok_or_else(|| {
            ComparisonError::InsufficientData(format!("algorithm '{second}' has no measurements"))
        })?;

        let a: HashMap<u32, f64> = self
            .samples
            .get(&(ii, ai))
            .map(|s| s.iter().copied().collect())
            .unwrap_or_default();
        let b: HashMap<u32, f64> = self
            .samples
            .get(&(ii, bi))
            .map(|s| s.iter().copied().collect())
            .unwrap_or_default();

        let mut shared: Vec<u32> = a.keys().filter(|eid| b.contains_key(eid)).copied().collect();
        shared.sort_unstable();

        if shared.is_empty() {
            return Err(ComparisonError::InsufficientData(format!(
                "no executions aligned between '{first}' and '{second}' on instance '{instance}'"
            )));
        }

        let xs = shared.iter().map(|eid| a[eid]).collect();
        let ys = shared.iter().map(|eid| b[eid]).collect();
        Ok((xs, ys))
    }

    fn algorithm_index(&self, algorithm: &str) -> Option<usize> {
        self.algorithms.iter().position(|a| a == algorithm)
    }

    fn instance_index(&self, instance: &str) -> Option<usize> {
        self.instances.iter().position(|i| i == instance)
    }
}

fn index_of_or_push(names: &mut Vec<String>, name: &str) -> usize {
    match names.iter().position(|n| n == name) {
        Some(i) => i,
        None => {
            names.push(name.to_string());
            names.len() - 1
        }
    }
}
