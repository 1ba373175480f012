//! Benchmark parameter types.
//!
//! Rendered through [`fmt::Display`] as Criterion benchmark ids.

use std::fmt;

/// Parameters for an RR-set generation benchmark run.
#[derive(Clone, Debug)]
pub struct GenerationBenchParams {
    /// Number of graph nodes.
    pub node_count: usize,
    /// Number of RR sets sampled per iteration.
    pub theta: usize,
    /// Sampling workers.
    pub workers: usize,
}

impl fmt::Display for GenerationBenchParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "n={},theta={},workers={}",
            self.node_count, self.theta, self.workers
        )
    }
}

/// Parameters for a spread-estimation benchmark run.
#[derive(Clone, Debug)]
pub struct EstimationBenchParams {
    /// Number of RR sets in the pool.
    pub theta: usize,
    /// Size of the queried seed set.
    pub seed_count: usize,
}

impl fmt::Display for EstimationBenchParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "theta={},seeds={}", self.theta, self.seed_count)
    }
}
