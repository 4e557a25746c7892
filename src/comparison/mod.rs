// Per-metric statistical comparison pipeline
//
// Normality dispatch decides the summarization (mean/std vs median/IQR),
// Friedman ranks algorithms per instance, Mann-Whitney settles pairwise
// verdicts, and average ranks feed the Nemenyi critical distance and clique
// grouping. Every step is a pure function over a MetricData snapshot; local
// failures (degenerate groups, unaligned executions) are recovered as
// neutral verdicts and recorded in the result structs rather than logged
// from inside the engine.

mod aggregation;
mod config;
mod critical_distance;
mod friedman;
mod normality;
mod pairwise;
mod ranks;

pub use aggregation::{aggregate, AggregatedStat, AggregationKind};
pub use config::ComparisonConfig;
pub use critical_distance::{clique_groups, nemenyi_critical_distance, Clique};
pub use friedman::{friedman_column, friedman_test, FriedmanOutcome, FriedmanSummary};
pub use normality::{check_normality, GroupNormality, NormalityReport};
pub use pairwise::{
    all_pairs_comparison, compare_pair, pivot_comparison, AllPairsComparison, PairSequence,
    PairwiseOutcome, PivotComparison, PivotTally, SkippedPair, Verdict,
};
pub use ranks::{average_rank_table, RankEntry, RankTable};
