//! Diffusion kernels producing one RR set per invocation.
//!
//! A kernel walks the graph backwards from a root, deciding with its own
//! random stream which in-neighbours join the set. The scheduler is generic
//! over [`DiffusionKernel`], so new semantics plug in without touching it.

use std::{
    collections::{HashSet, VecDeque},
    fmt,
    str::FromStr,
    sync::Arc,
};

use rand::{Rng, distributions::Standard};

use crate::{
    error::{GraphError, RisError},
    graph::{InfluenceGraph, NodeId},
    pool::RrSet,
    probability::EdgeProbabilityTable,
};

/// Produces one RR set from a root and a private random stream.
///
/// Implementations must be deterministic in `(graph, probabilities, root,
/// rng state)` and must not mutate shared state.
pub trait DiffusionKernel: Send + Sync {
    /// Samples the RR set rooted at `root`.
    ///
    /// # Errors
    /// Returns [`GraphError`] when the graph rejects a predecessor lookup,
    /// including when `root` itself is unknown.
    fn sample<G, R>(
        &self,
        graph: &G,
        probabilities: &EdgeProbabilityTable,
        root: NodeId,
        rng: &mut R,
    ) -> Result<RrSet, GraphError>
    where
        G: InfluenceGraph + ?Sized,
        R: Rng + ?Sized;
}

/// Diffusion semantics selectable at generator construction.
///
/// # Examples
/// ```
/// use ris_core::DiffusionModel;
///
/// let model: DiffusionModel = "ic".parse().expect("IC is a known model");
/// assert_eq!(model, DiffusionModel::IndependentCascade);
/// assert_eq!(model.to_string(), "IC");
/// assert!("SIR".parse::<DiffusionModel>().is_err());
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum DiffusionModel {
    /// Independent coin flip per edge.
    #[default]
    IndependentCascade,
    /// Threshold-based accumulation of incoming influence.
    LinearThreshold,
}

impl DiffusionModel {
    /// Returns the short identifier (`IC` or `LT`).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::IndependentCascade => "IC",
            Self::LinearThreshold => "LT",
        }
    }
}

impl fmt::Display for DiffusionModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DiffusionModel {
    type Err = RisError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match normalise_identifier(raw).as_str() {
            "ic" | "independent_cascade" => Ok(Self::IndependentCascade),
            "lt" | "linear_threshold" => Ok(Self::LinearThreshold),
            _ => Err(RisError::UnknownDiffusionModel {
                provided: Arc::from(raw),
            }),
        }
    }
}

/// Behaviour of the [`LinearThreshold`] kernel.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum LinearThresholdMode {
    /// Flip one coin per in-edge, exactly like Independent Cascade.
    #[default]
    CascadeEquivalent,
    /// Reverse random walk that selects at most one in-neighbour per step
    /// with probability equal to its edge weight.
    Threshold,
}

impl LinearThresholdMode {
    /// Returns the identifier accepted by [`FromStr`].
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CascadeEquivalent => "cascade",
            Self::Threshold => "threshold",
        }
    }
}

impl fmt::Display for LinearThresholdMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LinearThresholdMode {
    type Err = RisError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match normalise_identifier(raw).as_str() {
            "cascade" | "cascade_equivalent" => Ok(Self::CascadeEquivalent),
            "threshold" => Ok(Self::Threshold),
            _ => Err(RisError::UnknownThresholdMode {
                provided: Arc::from(raw),
            }),
        }
    }
}

fn normalise_identifier(raw: &str) -> String {
    raw.trim().to_ascii_lowercase().replace(['-', ' '], "_")
}

/// Reverse breadth-first cascade with one coin flip per unvisited in-edge.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct IndependentCascade;

impl DiffusionKernel for IndependentCascade {
    fn sample<G, R>(
        &self,
        graph: &G,
        probabilities: &EdgeProbabilityTable,
        root: NodeId,
        rng: &mut R,
    ) -> Result<RrSet, GraphError>
    where
        G: InfluenceGraph + ?Sized,
        R: Rng + ?Sized,
    {
        reverse_cascade(graph, probabilities, root, rng)
    }
}

/// Linear Threshold kernel; see [`LinearThresholdMode`] for its two
/// behaviours.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LinearThreshold {
    mode: LinearThresholdMode,
}

impl LinearThreshold {
    /// Creates a kernel running in `mode`.
    #[must_use]
    pub const fn new(mode: LinearThresholdMode) -> Self {
        Self { mode }
    }

    /// Returns the configured behaviour.
    #[must_use]
    pub const fn mode(&self) -> LinearThresholdMode {
        self.mode
    }
}

impl DiffusionKernel for LinearThreshold {
    fn sample<G, R>(
        &self,
        graph: &G,
        probabilities: &EdgeProbabilityTable,
        root: NodeId,
        rng: &mut R,
    ) -> Result<RrSet, GraphError>
    where
        G: InfluenceGraph + ?Sized,
        R: Rng + ?Sized,
    {
        match self.mode {
            LinearThresholdMode::CascadeEquivalent => {
                reverse_cascade(graph, probabilities, root, rng)
            }
            LinearThresholdMode::Threshold => reverse_walk(graph, probabilities, root, rng),
        }
    }
}

/// Kernel selected from a [`DiffusionModel`] at generator construction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ModelKernel {
    /// Independent Cascade semantics.
    IndependentCascade(IndependentCascade),
    /// Linear Threshold semantics.
    LinearThreshold(LinearThreshold),
}

impl ModelKernel {
    /// Builds the kernel for `model`; `mode` only affects Linear Threshold.
    ///
    /// # Examples
    /// ```
    /// use ris_core::{DiffusionModel, LinearThresholdMode, ModelKernel};
    ///
    /// let kernel = ModelKernel::new(
    ///     DiffusionModel::LinearThreshold,
    ///     LinearThresholdMode::Threshold,
    /// );
    /// assert_eq!(kernel.model(), DiffusionModel::LinearThreshold);
    /// ```
    #[must_use]
    pub const fn new(model: DiffusionModel, mode: LinearThresholdMode) -> Self {
        match model {
            DiffusionModel::IndependentCascade => Self::IndependentCascade(IndependentCascade),
            DiffusionModel::LinearThreshold => Self::LinearThreshold(LinearThreshold::new(mode)),
        }
    }

    /// Returns the diffusion model this kernel implements.
    #[must_use]
    pub const fn model(&self) -> DiffusionModel {
        match self {
            Self::IndependentCascade(_) => DiffusionModel::IndependentCascade,
            Self::LinearThreshold(_) => DiffusionModel::LinearThreshold,
        }
    }
}

impl DiffusionKernel for ModelKernel {
    fn sample<G, R>(
        &self,
        graph: &G,
        probabilities: &EdgeProbabilityTable,
        root: NodeId,
        rng: &mut R,
    ) -> Result<RrSet, GraphError>
    where
        G: InfluenceGraph + ?Sized,
        R: Rng + ?Sized,
    {
        match self {
            Self::IndependentCascade(kernel) => kernel.sample(graph, probabilities, root, rng),
            Self::LinearThreshold(kernel) => kernel.sample(graph, probabilities, root, rng),
        }
    }
}

fn reverse_cascade<G, R>(
    graph: &G,
    probabilities: &EdgeProbabilityTable,
    root: NodeId,
    rng: &mut R,
) -> Result<RrSet, GraphError>
where
    G: InfluenceGraph + ?Sized,
    R: Rng + ?Sized,
{
    let mut visited = HashSet::from([root]);
    let mut frontier = VecDeque::from([root]);

    while let Some(current) = frontier.pop_front() {
        for &predecessor in graph.predecessors(current)? {
            if visited.contains(&predecessor) {
                continue;
            }
            let draw: f64 = rng.sample(Standard);
            if draw < probabilities.get(predecessor, current) {
                visited.insert(predecessor);
                frontier.push_back(predecessor);
            }
        }
    }

    Ok(RrSet::from_visited(root, visited))
}

// Each step adds a new node or stops, so the walk is bounded by the node count.
fn reverse_walk<G, R>(
    graph: &G,
    probabilities: &EdgeProbabilityTable,
    root: NodeId,
    rng: &mut R,
) -> Result<RrSet, GraphError>
where
    G: InfluenceGraph + ?Sized,
    R: Rng + ?Sized,
{
    let mut visited = HashSet::from([root]);
    let mut current = root;

    loop {
        let predecessors = graph.predecessors(current)?;
        let incoming: f64 = predecessors
            .iter()
            .map(|&predecessor| probabilities.get(predecessor, current))
            .sum();
        if incoming <= 0.0 {
            break;
        }

        let draw: f64 = rng.sample(Standard);
        let threshold = draw * incoming.max(1.0);
        let mut cumulative = 0.0;
        let picked = predecessors.iter().copied().find(|&predecessor| {
            cumulative += probabilities.get(predecessor, current);
            threshold < cumulative
        });

        match picked {
            Some(next) if visited.insert(next) => current = next,
            _ => break,
        }
    }

    Ok(RrSet::from_visited(root, visited))
}
