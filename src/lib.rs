//! Cotejar - Statistical comparison of algorithm benchmark results
//!
//! This library decides, for a set of algorithms evaluated over repeated
//! executions on multiple benchmark instances, whether observed performance
//! differences are statistically significant and which algorithms are
//! mutually indistinguishable: normality-dispatched summarization, Friedman
//! and Mann-Whitney rank tests, average-rank aggregation, Nemenyi critical
//! distance, and clique grouping, plus CSV/JSON/LaTeX report rendering.

pub mod cli;
pub mod comparison;
pub mod csv_input;
pub mod dataset;
pub mod error;
pub mod latex;
pub mod report;
pub mod stats;
