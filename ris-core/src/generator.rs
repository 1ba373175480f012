//! RR-set generation entry point.
//!
//! Provides [`RrSetGenerator`], which ties a graph, its probability table, a
//! diffusion kernel and a scheduler together and turns a sampling budget
//! into an [`RrSetPool`].

use std::num::NonZeroUsize;

use tracing::{info, instrument, warn};

use crate::{
    diffusion::{DiffusionModel, ModelKernel},
    estimator::SpreadEstimator,
    graph::InfluenceGraph,
    pool::RrSetPool,
    probability::EdgeProbabilityTable,
    rng::MasterStream,
    scheduler::SamplingScheduler,
};

/// Samples reverse-reachable sets from a fixed graph and configuration.
///
/// Each call to [`Self::generate`] restarts the master stream from the
/// configured seed, so equal budgets yield equal pools.
///
/// # Examples
/// ```
/// use ris_core::{DirectedGraph, EdgeRecord, RrSetGeneratorBuilder};
///
/// let graph = DirectedGraph::from_edges([
///     EdgeRecord::new(0, 1).with_influence_prob(0.1),
///     EdgeRecord::new(1, 2).with_influence_prob(0.2),
///     EdgeRecord::new(0, 2).with_influence_prob(0.15),
///     EdgeRecord::new(2, 3).with_influence_prob(0.1),
/// ]);
/// let generator = RrSetGeneratorBuilder::new()
///     .with_workers(1)
///     .with_seed(42)
///     .build(graph)?;
///
/// let pool = generator.generate(10);
/// assert_eq!(pool.len(), 10);
/// assert!(pool.iter().all(|set| set.contains(set.root())));
///
/// let spread = generator.estimator(&pool).estimate_spread([0, 1]);
/// assert!((0.0..=4.0).contains(&spread));
/// # Ok::<(), ris_core::RisError>(())
/// ```
#[derive(Debug)]
pub struct RrSetGenerator<G> {
    graph: G,
    probabilities: EdgeProbabilityTable,
    kernel: ModelKernel,
    scheduler: SamplingScheduler,
    seed: u64,
}

impl<G> RrSetGenerator<G>
where
    G: InfluenceGraph + Sync,
{
    pub(crate) fn new(
        graph: G,
        kernel: ModelKernel,
        scheduler: SamplingScheduler,
        seed: u64,
    ) -> Self {
        let probabilities = EdgeProbabilityTable::from_graph(&graph);
        info!(
            graph = graph.name(),
            nodes = graph.node_count(),
            edges = probabilities.len(),
            model = %kernel.model(),
            workers = scheduler.workers().get(),
            "rr set generator initialised"
        );
        Self {
            graph,
            probabilities,
            kernel,
            scheduler,
            seed,
        }
    }

    /// Returns the graph being sampled.
    #[must_use]
    pub fn graph(&self) -> &G {
        &self.graph
    }

    /// Returns the precomputed edge probabilities.
    #[must_use]
    pub fn probabilities(&self) -> &EdgeProbabilityTable {
        &self.probabilities
    }

    /// Returns the kernel used for every task.
    #[must_use]
    pub fn kernel(&self) -> &ModelKernel {
        &self.kernel
    }

    /// Returns the diffusion model in use.
    #[must_use]
    pub fn model(&self) -> DiffusionModel {
        self.kernel.model()
    }

    /// Returns the worker count.
    #[must_use]
    pub fn workers(&self) -> NonZeroUsize {
        self.scheduler.workers()
    }

    /// Returns the master seed.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Samples `theta` RR sets.
    ///
    /// Tasks whose traversal fails are logged and omitted, so the pool may
    /// hold fewer than `theta` sets. An empty graph yields an empty pool.
    #[instrument(
        name = "core.generate",
        skip(self),
        fields(
            graph = %self.graph.name(),
            model = %self.kernel.model(),
            workers = self.scheduler.workers().get(),
            seed = self.seed,
        ),
    )]
    pub fn generate(&self, theta: usize) -> RrSetPool {
        if theta == 0 {
            return RrSetPool::empty(0);
        }
        if self.graph.node_count() == 0 {
            warn!(theta, "graph has no nodes, returning an empty pool");
            return RrSetPool::empty(theta);
        }

        let tasks = MasterStream::new(self.seed).derive_tasks(self.graph.nodes(), theta);
        let sets = self
            .scheduler
            .run(&self.graph, &self.probabilities, &self.kernel, &tasks);
        let pool = RrSetPool::new(sets, theta);
        info!(
            generated = pool.len(),
            failed = pool.failed_tasks(),
            "rr set generation completed"
        );
        pool
    }

    /// Builds a spread estimator over `pool` for this generator's graph.
    #[must_use]
    pub fn estimator<'p>(&self, pool: &'p RrSetPool) -> SpreadEstimator<'p> {
        SpreadEstimator::new(&self.graph, pool)
    }
}
