//! Builder utilities for configuring RR-set generation.
//!
//! Collects the diffusion model, worker count, and master seed, and
//! validates them before constructing an [`RrSetGenerator`].

use std::{num::NonZeroUsize, sync::Arc};

use crate::{
    Result,
    diffusion::{DiffusionModel, LinearThresholdMode, ModelKernel},
    error::RisError,
    generator::RrSetGenerator,
    graph::InfluenceGraph,
    scheduler::SamplingScheduler,
};

/// Worker count used when none is configured.
pub const DEFAULT_WORKERS: usize = 4;

/// Master seed used when none is configured.
pub const DEFAULT_MASTER_SEED: u64 = 42;

#[derive(Debug, Clone, PartialEq, Eq)]
enum ModelSelection {
    Model(DiffusionModel),
    Identifier(Arc<str>),
}

/// Configures and constructs [`RrSetGenerator`] instances.
///
/// # Examples
/// ```
/// use ris_core::{DiffusionModel, DirectedGraph, EdgeRecord, RrSetGeneratorBuilder};
///
/// let graph = DirectedGraph::from_edges([EdgeRecord::new(0, 1)]);
/// let generator = RrSetGeneratorBuilder::new()
///     .with_model(DiffusionModel::LinearThreshold)
///     .with_workers(1)
///     .with_seed(7)
///     .build(graph)
///     .expect("builder configuration is valid");
/// assert_eq!(generator.model(), DiffusionModel::LinearThreshold);
/// assert_eq!(generator.workers().get(), 1);
/// assert_eq!(generator.seed(), 7);
/// ```
#[derive(Debug, Clone)]
pub struct RrSetGeneratorBuilder {
    model: ModelSelection,
    threshold_mode: LinearThresholdMode,
    workers: usize,
    seed: u64,
}

impl Default for RrSetGeneratorBuilder {
    fn default() -> Self {
        Self {
            model: ModelSelection::Model(DiffusionModel::IndependentCascade),
            threshold_mode: LinearThresholdMode::CascadeEquivalent,
            workers: DEFAULT_WORKERS,
            seed: DEFAULT_MASTER_SEED,
        }
    }
}

impl RrSetGeneratorBuilder {
    /// Creates a builder populated with default parameters.
    ///
    /// # Examples
    /// ```
    /// use ris_core::{DiffusionModel, RrSetGeneratorBuilder};
    ///
    /// let builder = RrSetGeneratorBuilder::new();
    /// assert_eq!(builder.model(), Some(DiffusionModel::IndependentCascade));
    /// assert_eq!(builder.workers(), 4);
    /// assert_eq!(builder.seed(), 42);
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Selects the diffusion model.
    #[must_use]
    pub fn with_model(mut self, model: DiffusionModel) -> Self {
        self.model = ModelSelection::Model(model);
        self
    }

    /// Selects the diffusion model by identifier (`IC` or `LT`).
    ///
    /// The identifier is validated by [`Self::build`].
    ///
    /// # Examples
    /// ```
    /// use ris_core::{DirectedGraph, RisError, RrSetGeneratorBuilder};
    ///
    /// let err = RrSetGeneratorBuilder::new()
    ///     .with_model_identifier("SIR")
    ///     .build(DirectedGraph::new())
    ///     .expect_err("SIR is not a supported model");
    /// assert!(matches!(err, RisError::UnknownDiffusionModel { .. }));
    /// ```
    #[must_use]
    pub fn with_model_identifier(mut self, identifier: &str) -> Self {
        self.model = ModelSelection::Identifier(Arc::from(identifier));
        self
    }

    /// Returns the configured model, or `None` when an identifier has not
    /// been validated yet.
    #[must_use]
    pub fn model(&self) -> Option<DiffusionModel> {
        match &self.model {
            ModelSelection::Model(model) => Some(*model),
            ModelSelection::Identifier(raw) => raw.parse().ok(),
        }
    }

    /// Chooses how the Linear Threshold kernel behaves.
    #[must_use]
    pub fn with_threshold_mode(mut self, mode: LinearThresholdMode) -> Self {
        self.threshold_mode = mode;
        self
    }

    /// Returns the configured Linear Threshold behaviour.
    #[must_use]
    pub fn threshold_mode(&self) -> LinearThresholdMode {
        self.threshold_mode
    }

    /// Overrides the worker count.
    #[must_use]
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    /// Returns the configured worker count.
    #[must_use]
    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Overrides the master seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Returns the configured master seed.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Validates the configuration and constructs a generator over `graph`.
    ///
    /// # Errors
    /// Returns [`RisError::UnknownDiffusionModel`] for an unrecognised model
    /// identifier, [`RisError::InvalidWorkerCount`] for zero workers, and
    /// the scheduler errors of [`SamplingScheduler::new`].
    pub fn build<G>(self, graph: G) -> Result<RrSetGenerator<G>>
    where
        G: InfluenceGraph + Sync,
    {
        let model = match self.model {
            ModelSelection::Model(model) => model,
            ModelSelection::Identifier(raw) => raw.parse()?,
        };
        let workers = NonZeroUsize::new(self.workers)
            .ok_or(RisError::InvalidWorkerCount { got: self.workers })?;
        let scheduler = SamplingScheduler::new(workers)?;
        let kernel = ModelKernel::new(model, self.threshold_mode);

        Ok(RrSetGenerator::new(graph, kernel, scheduler, self.seed))
    }
}
