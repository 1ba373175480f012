//! Error types for the RR-set sampling library.
//!
//! Construction failures surface as [`RisError`]; per-task sampling failures
//! surface as [`SampleError`] and are absorbed by the scheduler.

use std::{fmt, num::NonZeroUsize, sync::Arc};

use thiserror::Error;

use crate::graph::NodeId;

macro_rules! define_error_codes {
    (
        $(#[$enum_meta:meta])*
        enum $CodeTy:ident for $ErrTy:ident {
            $(
                $(#[$variant_meta:meta])*
                $CodeVariant:ident => $ErrVariant:ident $( { $($pattern:tt)* } )? => $code:expr
            ),+ $(,)?
        }
    ) => {
        $(#[$enum_meta])*
        #[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
        #[non_exhaustive]
        pub enum $CodeTy {
            $(
                $(#[$variant_meta])*
                $CodeVariant,
            )+
        }

        impl $CodeTy {
            /// Return the stable machine-readable representation of this error code.
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$CodeVariant => $code,)+
                }
            }
        }

        impl fmt::Display for $CodeTy {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl $ErrTy {
            #[doc = concat!(
                "Retrieve the stable [`",
                stringify!($CodeTy),
                "`] for this error."
            )]
            #[must_use]
            pub const fn code(&self) -> $CodeTy {
                match self {
                    $(Self::$ErrVariant $( { $($pattern)* } )? => $CodeTy::$CodeVariant,)+
                }
            }
        }
    };
}

/// An error produced by [`crate::InfluenceGraph`] lookups.
#[non_exhaustive]
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum GraphError {
    /// The requested node is not part of the graph.
    #[error("node {node} is not present in the graph")]
    UnknownNode {
        /// The node that could not be found.
        node: NodeId,
    },
    /// The graph could not answer a predecessor query for another reason.
    #[error("predecessor lookup for node {node} failed: {reason}")]
    LookupFailed {
        /// The node whose predecessors were requested.
        node: NodeId,
        /// Human-readable description supplied by the graph implementation.
        reason: Arc<str>,
    },
}

define_error_codes! {
    /// Stable codes describing [`GraphError`] variants.
    enum GraphErrorCode for GraphError {
        /// The requested node is not part of the graph.
        UnknownNode => UnknownNode { .. } => "GRAPH_UNKNOWN_NODE",
        /// The graph could not answer a predecessor query.
        LookupFailed => LookupFailed { .. } => "GRAPH_LOOKUP_FAILED",
    }
}

/// Failure of a single sampling task.
///
/// These never escape [`crate::RrSetGenerator::generate`]; the scheduler logs
/// them and drops the affected task.
#[non_exhaustive]
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum SampleError {
    /// The graph rejected a lookup during the reverse traversal.
    #[error("sampling from root {root} failed: {error}")]
    Graph {
        /// Root node of the failed task.
        root: NodeId,
        #[source]
        /// Underlying graph error.
        error: GraphError,
    },
}

define_error_codes! {
    /// Stable codes describing [`SampleError`] variants.
    enum SampleErrorCode for SampleError {
        /// The graph rejected a lookup during the reverse traversal.
        GraphFailure => Graph { .. } => "SAMPLE_GRAPH_FAILURE",
    }
}

impl SampleError {
    /// Returns the root node of the task that failed.
    #[must_use]
    pub const fn root(&self) -> NodeId {
        match self {
            Self::Graph { root, .. } => *root,
        }
    }

    /// Retrieve the inner [`GraphErrorCode`] when the failure came from the graph.
    #[must_use]
    pub const fn graph_code(&self) -> Option<GraphErrorCode> {
        match self {
            Self::Graph { error, .. } => Some(error.code()),
        }
    }
}

/// Error type produced when configuring an [`crate::RrSetGenerator`].
#[non_exhaustive]
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum RisError {
    /// The diffusion model identifier was not recognised.
    #[error("unknown diffusion model `{provided}`; expected `IC` or `LT`")]
    UnknownDiffusionModel {
        /// Identifier supplied by the caller.
        provided: Arc<str>,
    },
    /// The linear-threshold behaviour identifier was not recognised.
    #[error("unknown linear threshold mode `{provided}`; expected `cascade` or `threshold`")]
    UnknownThresholdMode {
        /// Identifier supplied by the caller.
        provided: Arc<str>,
    },
    /// The worker pool must contain at least one worker.
    #[error("worker count must be at least 1 (got {got})")]
    InvalidWorkerCount {
        /// The invalid worker count supplied by the caller.
        got: usize,
    },
    /// Parallel sampling was requested but the `parallel` feature is disabled.
    #[error("{requested} workers requested but parallel sampling is not available in this build")]
    ParallelUnavailable {
        /// Worker count that could not be satisfied.
        requested: NonZeroUsize,
    },
    /// The dedicated worker pool could not be created.
    #[error("failed to build worker pool with {workers} threads: {message}")]
    WorkerPool {
        /// Requested pool size.
        workers: NonZeroUsize,
        /// Message reported by the thread pool builder.
        message: Arc<str>,
    },
}

define_error_codes! {
    /// Stable codes describing [`RisError`] variants.
    enum RisErrorCode for RisError {
        /// The diffusion model identifier was not recognised.
        UnknownDiffusionModel => UnknownDiffusionModel { .. } => "RIS_UNKNOWN_DIFFUSION_MODEL",
        /// The linear-threshold behaviour identifier was not recognised.
        UnknownThresholdMode => UnknownThresholdMode { .. } => "RIS_UNKNOWN_THRESHOLD_MODE",
        /// The worker pool must contain at least one worker.
        InvalidWorkerCount => InvalidWorkerCount { .. } => "RIS_INVALID_WORKER_COUNT",
        /// Parallel sampling is not compiled into this build.
        ParallelUnavailable => ParallelUnavailable { .. } => "RIS_PARALLEL_UNAVAILABLE",
        /// The dedicated worker pool could not be created.
        WorkerPool => WorkerPool { .. } => "RIS_WORKER_POOL",
    }
}

/// Convenient alias for results returned by the configuration API.
pub type Result<T> = core::result::Result<T, RisError>;
