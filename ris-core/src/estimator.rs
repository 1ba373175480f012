//! Influence-spread estimation over a fixed RR-set pool.
//!
//! A seed set's expected spread is estimated as the fraction of RR sets it
//! intersects, scaled by the number of graph nodes. The estimator indexes
//! the pool once so it can be queried repeatedly as a fitness function.

use std::{
    borrow::Borrow,
    collections::{BTreeMap, HashMap, HashSet},
};

use crate::{
    graph::{InfluenceGraph, NodeId},
    pool::{RrSet, RrSetPool},
};

/// Answers spread and coverage queries for one pool.
///
/// # Examples
/// ```
/// use ris_core::{DirectedGraph, EdgeRecord, RrSet, RrSetPool, SpreadEstimator};
///
/// let graph = DirectedGraph::from_edges([EdgeRecord::new(0, 1), EdgeRecord::new(1, 2)]);
/// let pool = RrSetPool::new(
///     vec![RrSet::new(1, [0]), RrSet::new(2, []), RrSet::new(0, [])],
///     3,
/// );
/// let estimator = SpreadEstimator::new(&graph, &pool);
///
/// assert!((estimator.estimate_spread([0]) - 2.0).abs() < 1e-12);
/// assert_eq!(estimator.coverage_of(0), 2);
/// assert_eq!(estimator.node_coverage().values().sum::<usize>(), pool.total_size());
/// ```
#[derive(Debug, Clone)]
pub struct SpreadEstimator<'p> {
    pool: &'p RrSetPool,
    total_nodes: usize,
    memberships: HashMap<NodeId, Vec<usize>>,
    coverage: BTreeMap<NodeId, usize>,
}

impl<'p> SpreadEstimator<'p> {
    /// Indexes `pool` against the node set of `graph`.
    #[must_use]
    pub fn new<G: InfluenceGraph + ?Sized>(graph: &G, pool: &'p RrSetPool) -> Self {
        let mut memberships: HashMap<NodeId, Vec<usize>> = HashMap::new();
        for (index, set) in pool.iter().enumerate() {
            for &node in set.nodes() {
                memberships.entry(node).or_default().push(index);
            }
        }

        let mut coverage: BTreeMap<NodeId, usize> =
            graph.nodes().iter().map(|&node| (node, 0)).collect();
        for (&node, sets) in &memberships {
            coverage.insert(node, sets.len());
        }

        Self {
            pool,
            total_nodes: graph.node_count(),
            memberships,
            coverage,
        }
    }

    /// Returns the pool being queried.
    #[must_use]
    pub fn pool(&self) -> &'p RrSetPool {
        self.pool
    }

    /// Returns the node count used to scale estimates.
    #[must_use]
    pub fn total_nodes(&self) -> usize {
        self.total_nodes
    }

    /// Estimates the expected influence spread of `seeds`.
    ///
    /// Computes `covered / |pool| * total_nodes`, where `covered` counts the
    /// RR sets containing at least one seed. Returns `0.0` for an empty pool.
    /// Duplicate seeds and seeds unknown to the pool are harmless.
    pub fn estimate_spread<I>(&self, seeds: I) -> f64
    where
        I: IntoIterator,
        I::Item: Borrow<NodeId>,
    {
        if self.pool.is_empty() {
            return 0.0;
        }
        let covered = self.covered_sets(seeds);
        covered as f64 / self.pool.len() as f64 * self.total_nodes as f64
    }

    /// Counts the RR sets intersecting `seeds`.
    pub fn covered_sets<I>(&self, seeds: I) -> usize
    where
        I: IntoIterator,
        I::Item: Borrow<NodeId>,
    {
        let mut hit = vec![false; self.pool.len()];
        let mut covered = 0_usize;
        for seed in seeds {
            let Some(sets) = self.memberships.get(seed.borrow()) else {
                continue;
            };
            for &index in sets {
                if let Some(slot) = hit.get_mut(index) {
                    if !*slot {
                        *slot = true;
                        covered += 1;
                    }
                }
            }
        }
        covered
    }

    /// Returns, for every node, how many RR sets contain it.
    ///
    /// Graph nodes that appear in no RR set map to zero.
    #[must_use]
    pub fn node_coverage(&self) -> &BTreeMap<NodeId, usize> {
        &self.coverage
    }

    /// Returns how many RR sets contain `node`.
    #[must_use]
    pub fn coverage_of(&self, node: NodeId) -> usize {
        self.coverage.get(&node).copied().unwrap_or(0)
    }

    /// Returns up to `k` nodes with the highest coverage.
    ///
    /// Ties are broken by ascending node id.
    #[must_use]
    pub fn top_covered(&self, k: usize) -> Vec<(NodeId, usize)> {
        let mut ranked: Vec<(NodeId, usize)> = self
            .coverage
            .iter()
            .map(|(&node, &count)| (node, count))
            .collect();
        ranked.sort_by(|left, right| right.1.cmp(&left.1).then(left.0.cmp(&right.0)));
        ranked.truncate(k);
        ranked
    }

    /// Summarises the RR-set sizes of the pool.
    #[must_use]
    pub fn pool_statistics(&self) -> PoolStatistics {
        PoolStatistics::from_pool(self.pool)
    }
}

/// Descriptive statistics over the RR-set sizes of a pool.
///
/// Every field is zero for an empty pool.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PoolStatistics {
    /// Number of RR sets.
    pub count: usize,
    /// Mean RR-set size.
    pub mean_size: f64,
    /// Population standard deviation of RR-set sizes.
    pub std_size: f64,
    /// Smallest RR-set size.
    pub min_size: usize,
    /// Largest RR-set size.
    pub max_size: usize,
    /// Number of distinct nodes appearing in any RR set.
    pub distinct_nodes: usize,
}

impl PoolStatistics {
    /// Computes statistics for `pool`.
    ///
    /// # Examples
    /// ```
    /// use ris_core::{PoolStatistics, RrSet, RrSetPool};
    ///
    /// let pool = RrSetPool::new(vec![RrSet::new(0, [1, 2]), RrSet::new(3, [])], 2);
    /// let stats = PoolStatistics::from_pool(&pool);
    /// assert_eq!(stats.count, 2);
    /// assert_eq!(stats.mean_size, 2.0);
    /// assert_eq!(stats.std_size, 1.0);
    /// assert_eq!((stats.min_size, stats.max_size), (1, 3));
    /// assert_eq!(stats.distinct_nodes, 4);
    ///
    /// assert_eq!(PoolStatistics::from_pool(&RrSetPool::default()), PoolStatistics::default());
    /// ```
    #[must_use]
    pub fn from_pool(pool: &RrSetPool) -> Self {
        if pool.is_empty() {
            return Self::default();
        }
        let count = pool.len();
        let sizes: Vec<usize> = pool.iter().map(RrSet::size).collect();
        let mean_size = sizes.iter().sum::<usize>() as f64 / count as f64;
        let variance = sizes
            .iter()
            .map(|&size| {
                let delta = size as f64 - mean_size;
                delta * delta
            })
            .sum::<f64>()
            / count as f64;
        let distinct: HashSet<NodeId> = pool
            .iter()
            .flat_map(|set| set.nodes().iter().copied())
            .collect();

        Self {
            count,
            mean_size,
            std_size: variance.sqrt(),
            min_size: sizes.iter().copied().min().unwrap_or(0),
            max_size: sizes.iter().copied().max().unwrap_or(0),
            distinct_nodes: distinct.len(),
        }
    }
}
