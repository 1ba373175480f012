use std::sync::Arc;

use ris_core::{DirectedGraph, EdgeRecord, GraphError, InfluenceGraph, NodeId};

/// Four-node graph used by the end-to-end scenarios.
#[must_use]
pub fn scenario_graph() -> DirectedGraph {
    DirectedGraph::from_edges([
        EdgeRecord::new(0, 1).with_influence_prob(0.1),
        EdgeRecord::new(1, 2).with_influence_prob(0.2),
        EdgeRecord::new(0, 2).with_influence_prob(0.15),
        EdgeRecord::new(2, 3).with_influence_prob(0.1),
    ])
    .with_name("scenario")
}

/// Graph whose predecessor lookup fails for one node.
pub struct FaultyGraph {
    inner: DirectedGraph,
    faulty: NodeId,
}

impl FaultyGraph {
    #[must_use]
    pub fn new(inner: DirectedGraph, faulty: NodeId) -> Self {
        Self { inner, faulty }
    }
}

impl InfluenceGraph for FaultyGraph {
    fn name(&self) -> &str {
        "faulty"
    }

    fn nodes(&self) -> &[NodeId] {
        self.inner.nodes()
    }

    fn edges(&self) -> impl Iterator<Item = EdgeRecord> + '_ {
        self.inner.edges()
    }

    fn predecessors(&self, node: NodeId) -> Result<&[NodeId], GraphError> {
        if node == self.faulty {
            return Err(GraphError::LookupFailed {
                node,
                reason: Arc::from("injected failure"),
            });
        }
        self.inner.predecessors(node)
    }
}
