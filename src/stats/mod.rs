//! Statistical primitives: distribution functions, ranking, and the rank
//! tests the comparison pipeline is built from.
//!
//! Everything here operates on plain `f64` slices and is deterministic; the
//! comparison layer owns direction handling and verdict policy.

pub mod describe;
pub mod distributions;
pub mod mann_whitney;
pub mod ranking;
pub mod shapiro;

pub use mann_whitney::{mann_whitney_u, MannWhitneyResult};
pub use ranking::{average_ranks, directed_ranks};
pub use shapiro::{shapiro_wilk, ShapiroResult};
