//! Graph abstractions consumed by the sampler.
//!
//! The sampler only reads from the graph: it needs the node list to draw
//! roots, the edge list to build the probability table, and predecessor
//! lookups for the reverse traversal.

use std::collections::{HashMap, hash_map::Entry};

use crate::error::GraphError;

/// Identifier of a graph node.
pub type NodeId = usize;

/// A directed edge together with its optional activation attributes.
///
/// # Examples
/// ```
/// use ris_core::EdgeRecord;
///
/// let edge = EdgeRecord::new(0, 1).with_influence_prob(0.25);
/// assert_eq!(edge.source, 0);
/// assert_eq!(edge.influence_prob, Some(0.25));
/// assert_eq!(edge.weight, None);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EdgeRecord {
    /// Tail of the edge.
    pub source: NodeId,
    /// Head of the edge.
    pub target: NodeId,
    /// Explicit activation probability, preferred over `weight`.
    pub influence_prob: Option<f64>,
    /// Generic weight used when no explicit probability is present.
    pub weight: Option<f64>,
}

impl EdgeRecord {
    /// Creates an edge without attributes.
    #[must_use]
    pub const fn new(source: NodeId, target: NodeId) -> Self {
        Self {
            source,
            target,
            influence_prob: None,
            weight: None,
        }
    }

    /// Sets the explicit activation probability.
    #[must_use]
    pub const fn with_influence_prob(mut self, prob: f64) -> Self {
        self.influence_prob = Some(prob);
        self
    }

    /// Sets the generic weight attribute.
    #[must_use]
    pub const fn with_weight(mut self, weight: f64) -> Self {
        self.weight = Some(weight);
        self
    }
}

/// Read-only view of a directed graph with probabilistic edges.
///
/// # Examples
/// ```
/// use ris_core::{DirectedGraph, EdgeRecord, GraphError, InfluenceGraph};
///
/// let mut graph = DirectedGraph::new();
/// graph.add_edge(EdgeRecord::new(0, 1));
/// graph.add_edge(EdgeRecord::new(2, 1));
///
/// assert_eq!(graph.node_count(), 3);
/// assert_eq!(graph.predecessors(1)?, &[0, 2]);
/// assert!(graph.predecessors(0)?.is_empty());
/// # Ok::<(), GraphError>(())
/// ```
pub trait InfluenceGraph {
    /// Returns a human-readable identifier for diagnostics.
    fn name(&self) -> &str;

    /// Returns every node identifier, without duplicates.
    fn nodes(&self) -> &[NodeId];

    /// Returns the number of nodes.
    fn node_count(&self) -> usize {
        self.nodes().len()
    }

    /// Returns the number of directed edges.
    fn edge_count(&self) -> usize {
        self.edges().count()
    }

    /// Iterates over every directed edge with its attributes.
    fn edges(&self) -> impl Iterator<Item = EdgeRecord> + '_;

    /// Returns the tails of all edges ending at `node`.
    ///
    /// # Errors
    /// Returns [`GraphError`] when the node is unknown or the lookup fails.
    fn predecessors(&self, node: NodeId) -> Result<&[NodeId], GraphError>;
}

impl<G: InfluenceGraph + ?Sized> InfluenceGraph for &G {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn nodes(&self) -> &[NodeId] {
        (**self).nodes()
    }

    fn node_count(&self) -> usize {
        (**self).node_count()
    }

    fn edge_count(&self) -> usize {
        (**self).edge_count()
    }

    fn edges(&self) -> impl Iterator<Item = EdgeRecord> + '_ {
        (**self).edges()
    }

    fn predecessors(&self, node: NodeId) -> Result<&[NodeId], GraphError> {
        (**self).predecessors(node)
    }
}

/// In-memory directed simple graph.
///
/// Nodes keep their insertion order. Adding an edge that already exists
/// replaces its attributes instead of creating a parallel edge.
#[derive(Clone, Debug, Default)]
pub struct DirectedGraph {
    name: String,
    nodes: Vec<NodeId>,
    positions: HashMap<NodeId, usize>,
    predecessors: Vec<Vec<NodeId>>,
    edges: Vec<EdgeRecord>,
    edge_positions: HashMap<(NodeId, NodeId), usize>,
}

impl DirectedGraph {
    /// Creates an empty graph named `graph`.
    #[must_use]
    pub fn new() -> Self {
        Self::default().with_name("graph")
    }

    /// Renames the graph.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Builds a graph from an edge list.
    ///
    /// # Examples
    /// ```
    /// use ris_core::{DirectedGraph, EdgeRecord, InfluenceGraph};
    ///
    /// let graph = DirectedGraph::from_edges([EdgeRecord::new(0, 1), EdgeRecord::new(1, 2)]);
    /// assert_eq!(graph.nodes(), &[0, 1, 2]);
    /// assert_eq!(graph.edge_count(), 2);
    /// ```
    #[must_use]
    pub fn from_edges(edges: impl IntoIterator<Item = EdgeRecord>) -> Self {
        let mut graph = Self::new();
        for edge in edges {
            graph.add_edge(edge);
        }
        graph
    }

    /// Adds an isolated node. Returns `false` when it already existed.
    pub fn add_node(&mut self, node: NodeId) -> bool {
        match self.positions.entry(node) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(self.nodes.len());
                self.nodes.push(node);
                self.predecessors.push(Vec::new());
                true
            }
        }
    }

    /// Adds a directed edge, inserting missing endpoints.
    ///
    /// Re-adding an existing `(source, target)` pair overwrites its
    /// attributes.
    pub fn add_edge(&mut self, edge: EdgeRecord) {
        self.add_node(edge.source);
        self.add_node(edge.target);
        match self.edge_positions.entry((edge.source, edge.target)) {
            Entry::Occupied(slot) => {
                if let Some(existing) = self.edges.get_mut(*slot.get()) {
                    *existing = edge;
                }
            }
            Entry::Vacant(slot) => {
                slot.insert(self.edges.len());
                self.edges.push(edge);
                let tails = self
                    .positions
                    .get(&edge.target)
                    .and_then(|&position| self.predecessors.get_mut(position));
                if let Some(tails) = tails {
                    tails.push(edge.source);
                }
            }
        }
    }

    /// Returns whether `node` is part of the graph.
    #[must_use]
    pub fn contains_node(&self, node: NodeId) -> bool {
        self.positions.contains_key(&node)
    }
}

impl InfluenceGraph for DirectedGraph {
    fn name(&self) -> &str {
        &self.name
    }

    fn nodes(&self) -> &[NodeId] {
        &self.nodes
    }

    fn edge_count(&self) -> usize {
        self.edges.len()
    }

    fn edges(&self) -> impl Iterator<Item = EdgeRecord> + '_ {
        self.edges.iter().copied()
    }

    fn predecessors(&self, node: NodeId) -> Result<&[NodeId], GraphError> {
        self.positions
            .get(&node)
            .and_then(|&position| self.predecessors.get(position))
            .map(Vec::as_slice)
            .ok_or(GraphError::UnknownNode { node })
    }
}
