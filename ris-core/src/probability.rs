//! Precomputed, sanitised edge activation probabilities.

use std::collections::HashMap;

use crate::graph::{EdgeRecord, InfluenceGraph, NodeId};

/// Probability used when an edge carries no usable attribute or is absent
/// from the table.
pub const DEFAULT_EDGE_PROBABILITY: f64 = 0.1;

/// Maps each directed edge to an activation probability in `[0, 1]`.
///
/// Built once per generator so sampling never inspects raw attributes.
///
/// # Examples
/// ```
/// use ris_core::{DirectedGraph, EdgeProbabilityTable, EdgeRecord};
///
/// let graph = DirectedGraph::from_edges([
///     EdgeRecord::new(0, 1).with_influence_prob(1.7),
///     EdgeRecord::new(1, 2).with_weight(0.4),
///     EdgeRecord::new(2, 3),
/// ]);
/// let table = EdgeProbabilityTable::from_graph(&graph);
/// assert_eq!(table.get(0, 1), 1.0);
/// assert_eq!(table.get(1, 2), 0.4);
/// assert_eq!(table.get(2, 3), 0.1);
/// assert_eq!(table.get(3, 0), 0.1);
/// ```
#[derive(Clone, Debug, Default)]
pub struct EdgeProbabilityTable {
    probabilities: HashMap<(NodeId, NodeId), f64>,
}

impl EdgeProbabilityTable {
    /// Builds the table from every edge of `graph` in a single pass.
    #[must_use]
    pub fn from_graph<G: InfluenceGraph + ?Sized>(graph: &G) -> Self {
        let probabilities = graph
            .edges()
            .map(|edge| ((edge.source, edge.target), resolve_probability(&edge)))
            .collect();
        Self { probabilities }
    }

    /// Returns the activation probability of `source -> target`.
    ///
    /// Pairs missing from the table resolve to
    /// [`DEFAULT_EDGE_PROBABILITY`].
    #[must_use]
    pub fn get(&self, source: NodeId, target: NodeId) -> f64 {
        self.probabilities
            .get(&(source, target))
            .copied()
            .unwrap_or(DEFAULT_EDGE_PROBABILITY)
    }

    /// Returns the number of stored edges.
    #[must_use]
    pub fn len(&self) -> usize {
        self.probabilities.len()
    }

    /// Returns whether the table holds no edges.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.probabilities.is_empty()
    }
}

/// Picks the first usable attribute and clamps it into `[0, 1]`.
///
/// NaN is treated as an absent attribute.
fn resolve_probability(edge: &EdgeRecord) -> f64 {
    [edge.influence_prob, edge.weight]
        .into_iter()
        .flatten()
        .find(|value| !value.is_nan())
        .unwrap_or(DEFAULT_EDGE_PROBABILITY)
        .clamp(0.0, 1.0)
}
