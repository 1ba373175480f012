//! Dispatches sampling tasks sequentially or across a bounded worker pool.
//!
//! Tasks share the graph and probability table read-only and own a private
//! RNG each. Outcomes are gathered back on the calling thread, where failed
//! tasks are logged and dropped; one failure never aborts the batch.

use std::num::NonZeroUsize;

#[cfg(feature = "parallel")]
use std::sync::Arc;

#[cfg(feature = "parallel")]
use rayon::{ThreadPool, ThreadPoolBuilder, prelude::*};
use tracing::{debug, instrument, warn};

use crate::{
    Result,
    diffusion::DiffusionKernel,
    error::{RisError, SampleError},
    graph::InfluenceGraph,
    pool::RrSet,
    probability::EdgeProbabilityTable,
    rng::WorkerTask,
};

type TaskOutcome = core::result::Result<RrSet, SampleError>;

/// Executes [`WorkerTask`]s with a fixed degree of parallelism.
///
/// One worker runs every task in order on the calling thread. More workers
/// fan tasks out over a dedicated thread pool of exactly that size.
///
/// # Examples
/// ```
/// use std::num::NonZeroUsize;
///
/// use ris_core::{
///     DirectedGraph, EdgeProbabilityTable, EdgeRecord, IndependentCascade, MasterStream,
///     InfluenceGraph, SamplingScheduler,
/// };
///
/// let graph = DirectedGraph::from_edges([EdgeRecord::new(0, 1), EdgeRecord::new(1, 2)]);
/// let table = EdgeProbabilityTable::from_graph(&graph);
/// let tasks = MasterStream::new(42).derive_tasks(graph.nodes(), 8);
///
/// let scheduler = SamplingScheduler::new(NonZeroUsize::MIN)?;
/// let sets = scheduler.run(&graph, &table, &IndependentCascade, &tasks);
/// assert_eq!(sets.len(), 8);
/// # Ok::<(), ris_core::RisError>(())
/// ```
#[derive(Debug)]
pub struct SamplingScheduler {
    workers: NonZeroUsize,
    #[cfg(feature = "parallel")]
    pool: Option<ThreadPool>,
}

impl SamplingScheduler {
    /// Creates a scheduler with `workers` threads.
    ///
    /// # Errors
    /// Returns [`RisError::WorkerPool`] when the thread pool cannot be built
    /// and [`RisError::ParallelUnavailable`] when more than one worker is
    /// requested without the `parallel` feature.
    pub fn new(workers: NonZeroUsize) -> Result<Self> {
        Self::with_workers(workers)
    }

    #[cfg(feature = "parallel")]
    fn with_workers(workers: NonZeroUsize) -> Result<Self> {
        let pool = if workers.get() > 1 {
            let pool = ThreadPoolBuilder::new()
                .num_threads(workers.get())
                .thread_name(|index| format!("ris-sampler-{index}"))
                .build()
                .map_err(|error| RisError::WorkerPool {
                    workers,
                    message: Arc::from(error.to_string()),
                })?;
            Some(pool)
        } else {
            None
        };
        Ok(Self { workers, pool })
    }

    #[cfg(not(feature = "parallel"))]
    fn with_workers(workers: NonZeroUsize) -> Result<Self> {
        if workers.get() > 1 {
            return Err(RisError::ParallelUnavailable { requested: workers });
        }
        Ok(Self { workers })
    }

    /// Returns the configured worker count.
    #[must_use]
    pub fn workers(&self) -> NonZeroUsize {
        self.workers
    }

    /// Runs every task and returns the RR sets of those that succeeded.
    ///
    /// Returns only after all tasks have finished. Failed tasks are logged
    /// with their root node and omitted.
    #[instrument(
        name = "core.schedule",
        skip_all,
        fields(tasks = tasks.len(), workers = self.workers.get()),
    )]
    pub fn run<G, K>(
        &self,
        graph: &G,
        probabilities: &EdgeProbabilityTable,
        kernel: &K,
        tasks: &[WorkerTask],
    ) -> Vec<RrSet>
    where
        G: InfluenceGraph + Sync + ?Sized,
        K: DiffusionKernel,
    {
        let outcomes = self.dispatch(graph, probabilities, kernel, tasks);
        collect_outcomes(outcomes)
    }

    #[cfg(feature = "parallel")]
    fn dispatch<G, K>(
        &self,
        graph: &G,
        probabilities: &EdgeProbabilityTable,
        kernel: &K,
        tasks: &[WorkerTask],
    ) -> Vec<TaskOutcome>
    where
        G: InfluenceGraph + Sync + ?Sized,
        K: DiffusionKernel,
    {
        match &self.pool {
            Some(pool) => sample_parallel(pool, graph, probabilities, kernel, tasks),
            None => sample_sequential(graph, probabilities, kernel, tasks),
        }
    }

    #[cfg(not(feature = "parallel"))]
    fn dispatch<G, K>(
        &self,
        graph: &G,
        probabilities: &EdgeProbabilityTable,
        kernel: &K,
        tasks: &[WorkerTask],
    ) -> Vec<TaskOutcome>
    where
        G: InfluenceGraph + Sync + ?Sized,
        K: DiffusionKernel,
    {
        sample_sequential(graph, probabilities, kernel, tasks)
    }
}

#[instrument(name = "core.sample_sequential", skip_all, fields(tasks = tasks.len()))]
fn sample_sequential<G, K>(
    graph: &G,
    probabilities: &EdgeProbabilityTable,
    kernel: &K,
    tasks: &[WorkerTask],
) -> Vec<TaskOutcome>
where
    G: InfluenceGraph + ?Sized,
    K: DiffusionKernel,
{
    tasks
        .iter()
        .map(|task| run_task(graph, probabilities, kernel, *task))
        .collect()
}

#[cfg(feature = "parallel")]
#[cfg_attr(docsrs, doc(cfg(feature = "parallel")))]
#[instrument(
    name = "core.sample_parallel",
    skip_all,
    fields(tasks = tasks.len(), threads = pool.current_num_threads()),
)]
fn sample_parallel<G, K>(
    pool: &ThreadPool,
    graph: &G,
    probabilities: &EdgeProbabilityTable,
    kernel: &K,
    tasks: &[WorkerTask],
) -> Vec<TaskOutcome>
where
    G: InfluenceGraph + Sync + ?Sized,
    K: DiffusionKernel,
{
    pool.install(|| {
        tasks
            .par_iter()
            .map(|task| run_task(graph, probabilities, kernel, *task))
            .collect()
    })
}

fn run_task<G, K>(
    graph: &G,
    probabilities: &EdgeProbabilityTable,
    kernel: &K,
    task: WorkerTask,
) -> TaskOutcome
where
    G: InfluenceGraph + ?Sized,
    K: DiffusionKernel,
{
    let mut rng = task.rng();
    kernel
        .sample(graph, probabilities, task.root, &mut rng)
        .map_err(|error| SampleError::Graph {
            root: task.root,
            error,
        })
}

fn collect_outcomes(outcomes: Vec<TaskOutcome>) -> Vec<RrSet> {
    let mut sets = Vec::with_capacity(outcomes.len());
    let mut failures = 0_usize;
    for outcome in outcomes {
        match outcome {
            Ok(set) => {
                record_set(&set);
                sets.push(set);
            }
            Err(error) => {
                failures += 1;
                warn!(
                    root = error.root(),
                    code = %error.code(),
                    error = %error,
                    "rr set sampling failed, dropping task"
                );
            }
        }
    }
    record_failures(failures);
    debug!(completed = sets.len(), failures, "sampling tasks joined");
    sets
}

#[cfg(feature = "metrics")]
fn record_set(set: &RrSet) {
    metrics::counter!("rr_sets_generated").increment(1);
    metrics::histogram!("rr_set_size").record(set.size() as f64);
}

#[cfg(not(feature = "metrics"))]
fn record_set(_set: &RrSet) {}

#[cfg(feature = "metrics")]
fn record_failures(failures: usize) {
    metrics::counter!("rr_set_failures").increment(failures as u64);
}

#[cfg(not(feature = "metrics"))]
fn record_failures(_failures: usize) {}
