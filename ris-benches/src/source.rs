//! Synthetic influence graphs for benchmarking.
//!
//! Graphs are seeded for reproducibility across benchmark runs.

use rand::{Rng, SeedableRng, rngs::SmallRng};
use ris_core::{DirectedGraph, EdgeRecord};

/// Errors that may occur during synthetic graph generation.
#[derive(Clone, Debug, thiserror::Error, PartialEq)]
pub enum SyntheticError {
    /// The requested node count was zero.
    #[error("node count must be greater than zero")]
    ZeroNodes,
    /// The probability ceiling was outside `[0, 1]`.
    #[error("maximum probability must lie in [0, 1] (got {got})")]
    InvalidProbability {
        /// The rejected ceiling.
        got: f64,
    },
}

/// Configuration for a random directed graph.
#[derive(Clone, Debug)]
pub struct SyntheticGraphConfig {
    /// Number of nodes, labelled `0..node_count`.
    pub node_count: usize,
    /// Out-edges drawn per node; self-loops and repeats are skipped.
    pub out_degree: usize,
    /// Edge probabilities are drawn uniformly from `[0, max_probability]`.
    pub max_probability: f64,
    /// RNG seed for reproducibility.
    pub seed: u64,
}

/// Generates a random influence graph from `config`.
///
/// # Errors
///
/// Returns [`SyntheticError::ZeroNodes`] if `node_count` is zero, or
/// [`SyntheticError::InvalidProbability`] if `max_probability` is not in
/// `[0, 1]`.
///
/// # Examples
///
/// ```
/// use ris_benches::source::{SyntheticGraphConfig, generate_graph};
/// use ris_core::InfluenceGraph;
///
/// let config = SyntheticGraphConfig {
///     node_count: 10,
///     out_degree: 3,
///     max_probability: 0.2,
///     seed: 42,
/// };
/// let graph = generate_graph(&config).expect("valid config");
/// assert_eq!(graph.node_count(), 10);
/// ```
pub fn generate_graph(config: &SyntheticGraphConfig) -> Result<DirectedGraph, SyntheticError> {
    if config.node_count == 0 {
        return Err(SyntheticError::ZeroNodes);
    }
    if !(0.0..=1.0).contains(&config.max_probability) {
        return Err(SyntheticError::InvalidProbability {
            got: config.max_probability,
        });
    }

    let mut rng = SmallRng::seed_from_u64(config.seed);
    let mut graph = DirectedGraph::new().with_name("synthetic");
    for node in 0..config.node_count {
        graph.add_node(node);
    }
    for source in 0..config.node_count {
        for _ in 0..config.out_degree {
            let target = rng.gen_range(0..config.node_count);
            if target == source {
                continue;
            }
            let prob = rng.gen_range(0.0..=config.max_probability);
            graph.add_edge(EdgeRecord::new(source, target).with_influence_prob(prob));
        }
    }
    Ok(graph)
}

#[cfg(test)]
mod tests {
    use super::*;

    use ris_core::InfluenceGraph;
    use rstest::{fixture, rstest};

    #[fixture]
    fn config() -> SyntheticGraphConfig {
        SyntheticGraphConfig {
            node_count: 50,
            out_degree: 4,
            max_probability: 0.3,
            seed: 7,
        }
    }

    #[rstest]
    fn generator_respects_shape(config: SyntheticGraphConfig) {
        let graph = generate_graph(&config).expect("generation should succeed");
        assert_eq!(graph.node_count(), 50);
        assert!(graph.edge_count() <= 200);
        assert!(graph.edges().all(|edge| edge.source != edge.target));
        assert!(
            graph
                .edges()
                .filter_map(|edge| edge.influence_prob)
                .all(|prob| (0.0..=0.3).contains(&prob))
        );
    }

    #[rstest]
    fn generator_is_deterministic(config: SyntheticGraphConfig) {
        let left = generate_graph(&config).expect("first generation should succeed");
        let right = generate_graph(&config).expect("second generation should succeed");
        let left_edges: Vec<_> = left.edges().collect();
        let right_edges: Vec<_> = right.edges().collect();
        assert_eq!(left_edges, right_edges);
    }

    #[rstest]
    fn generator_rejects_zero_nodes(config: SyntheticGraphConfig) {
        let error = generate_graph(&SyntheticGraphConfig {
            node_count: 0,
            ..config
        })
        .expect_err("zero nodes must fail");
        assert_eq!(error, SyntheticError::ZeroNodes);
    }

    #[rstest]
    #[case(1.5)]
    #[case(-0.1)]
    #[case(f64::NAN)]
    fn generator_rejects_invalid_ceiling(config: SyntheticGraphConfig, #[case] ceiling: f64) {
        let error = generate_graph(&SyntheticGraphConfig {
            max_probability: ceiling,
            ..config
        })
        .expect_err("ceiling outside [0, 1] must fail");
        assert!(matches!(error, SyntheticError::InvalidProbability { .. }));
    }
}
