//! Deterministic task derivation from a master seed.
//!
//! Every generator owns its own master stream; each task receives a seed
//! drawn from it and samples with a private RNG, so results never depend on
//! which worker runs a task.

use rand::{Rng, SeedableRng, rngs::SmallRng};

use crate::graph::NodeId;

/// Exclusive upper bound for per-task seeds.
const TASK_SEED_BOUND: u64 = 1 << 31;

/// One unit of sampling work: a root node and the seed of its private RNG.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct WorkerTask {
    /// Node the reverse traversal starts from.
    pub root: NodeId,
    /// Seed for the task's private random stream.
    pub seed: u64,
}

impl WorkerTask {
    /// Creates the private random stream for this task.
    ///
    /// # Examples
    /// ```
    /// use rand::Rng;
    /// use ris_core::WorkerTask;
    ///
    /// let task = WorkerTask { root: 3, seed: 11 };
    /// let a: f64 = task.rng().r#gen();
    /// let b: f64 = task.rng().r#gen();
    /// assert_eq!(a, b);
    /// ```
    #[must_use]
    pub fn rng(&self) -> SmallRng {
        SmallRng::seed_from_u64(self.seed)
    }
}

/// Master random stream that forks reproducible task lists.
///
/// # Examples
/// ```
/// use ris_core::MasterStream;
///
/// let nodes = [10, 20, 30];
/// let first = MasterStream::new(42).derive_tasks(&nodes, 5);
/// let second = MasterStream::new(42).derive_tasks(&nodes, 5);
/// assert_eq!(first, second);
/// assert!(first.iter().all(|task| nodes.contains(&task.root)));
/// ```
#[derive(Debug)]
pub struct MasterStream {
    rng: SmallRng,
}

impl MasterStream {
    /// Seeds a fresh master stream.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    /// Draws `theta` tasks over `nodes`.
    ///
    /// All task seeds are drawn first, then all roots (uniformly, with
    /// replacement), so the assignment is fixed by the master seed alone.
    /// Returns no tasks when `nodes` is empty.
    pub fn derive_tasks(&mut self, nodes: &[NodeId], theta: usize) -> Vec<WorkerTask> {
        if nodes.is_empty() {
            return Vec::new();
        }
        let seeds: Vec<u64> = (0..theta)
            .map(|_| self.rng.gen_range(0..TASK_SEED_BOUND))
            .collect();
        seeds
            .into_iter()
            .filter_map(|seed| {
                let index = self.rng.gen_range(0..nodes.len());
                nodes.get(index).map(|&root| WorkerTask { root, seed })
            })
            .collect()
    }
}
