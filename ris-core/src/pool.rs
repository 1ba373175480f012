//! Reverse-reachable sets and the pool that owns them.

use std::collections::HashSet;

use crate::graph::NodeId;

/// The nodes that could have activated `root` in one diffusion sample.
///
/// The node list is sorted and unique, always contains the root, and
/// never changes after construction.
///
/// # Examples
/// ```
/// use ris_core::RrSet;
///
/// let set = RrSet::new(2, [5, 2, 5, 0]);
/// assert_eq!(set.root(), 2);
/// assert_eq!(set.nodes(), &[0, 2, 5]);
/// assert_eq!(set.size(), 3);
/// assert!(set.contains(5));
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct RrSet {
    root: NodeId,
    nodes: Vec<NodeId>,
}

impl RrSet {
    /// Creates an RR set rooted at `root` from the supplied members.
    ///
    /// Duplicates are discarded and the root is inserted when missing.
    #[must_use]
    pub fn new(root: NodeId, members: impl IntoIterator<Item = NodeId>) -> Self {
        let mut nodes: Vec<NodeId> = members.into_iter().collect();
        nodes.push(root);
        nodes.sort_unstable();
        nodes.dedup();
        Self { root, nodes }
    }

    pub(crate) fn from_visited(root: NodeId, visited: HashSet<NodeId>) -> Self {
        Self::new(root, visited)
    }

    /// Returns the root node the set was sampled from.
    #[must_use]
    #[rustfmt::skip]
    pub fn root(&self) -> NodeId { self.root }

    /// Returns the members in ascending order.
    #[must_use]
    #[rustfmt::skip]
    pub fn nodes(&self) -> &[NodeId] { &self.nodes }

    /// Returns the number of members.
    #[must_use]
    #[rustfmt::skip]
    pub fn size(&self) -> usize { self.nodes.len() }

    /// Returns whether `node` is a member.
    #[must_use]
    pub fn contains(&self, node: NodeId) -> bool {
        self.nodes.binary_search(&node).is_ok()
    }
}

/// Immutable collection of RR sets produced by one generation run.
///
/// Order carries no meaning for estimation. The pool remembers how many
/// sets were requested so dropped tasks can be reported.
///
/// # Examples
/// ```
/// use ris_core::{RrSet, RrSetPool};
///
/// let pool = RrSetPool::new(vec![RrSet::new(0, [1]), RrSet::new(1, [])], 3);
/// assert_eq!(pool.len(), 2);
/// assert_eq!(pool.requested(), 3);
/// assert_eq!(pool.failed_tasks(), 1);
/// assert_eq!(pool.total_size(), 3);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RrSetPool {
    sets: Vec<RrSet>,
    requested: usize,
}

impl RrSetPool {
    /// Wraps `sets` produced for a request of `requested` tasks.
    ///
    /// `requested` is raised to `sets.len()` if it is smaller.
    #[must_use]
    pub fn new(sets: Vec<RrSet>, requested: usize) -> Self {
        let requested = requested.max(sets.len());
        Self { sets, requested }
    }

    /// Returns an empty pool for a request of `requested` tasks.
    #[must_use]
    pub fn empty(requested: usize) -> Self {
        Self::new(Vec::new(), requested)
    }

    /// Returns the RR sets.
    #[must_use]
    pub fn sets(&self) -> &[RrSet] {
        &self.sets
    }

    /// Iterates over the RR sets.
    pub fn iter(&self) -> std::slice::Iter<'_, RrSet> {
        self.sets.iter()
    }

    /// Returns the number of RR sets held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sets.len()
    }

    /// Returns whether the pool holds no RR sets.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }

    /// Returns the number of tasks the pool was generated for.
    #[must_use]
    pub fn requested(&self) -> usize {
        self.requested
    }

    /// Returns how many requested tasks produced no RR set.
    #[must_use]
    pub fn failed_tasks(&self) -> usize {
        self.requested - self.sets.len()
    }

    /// Returns the sum of all RR-set sizes.
    #[must_use]
    pub fn total_size(&self) -> usize {
        self.sets.iter().map(RrSet::size).sum()
    }
}

impl<'a> IntoIterator for &'a RrSetPool {
    type Item = &'a RrSet;
    type IntoIter = std::slice::Iter<'a, RrSet>;

    fn into_iter(self) -> Self::IntoIter {
        self.sets.iter()
    }
}
