//! Reverse-reachable set sampling and influence-spread estimation.
//!
//! The crate samples a pool of reverse-reachable (RR) sets from a directed
//! graph with probabilistic edges and answers spread queries for candidate
//! seed sets by counting how many RR sets they intersect.
#![cfg_attr(docsrs, feature(doc_cfg))]

mod builder;
mod diffusion;
mod error;
mod estimator;
mod generator;
mod graph;
mod pool;
mod probability;
mod rng;
mod scheduler;

pub use crate::{
    builder::{DEFAULT_MASTER_SEED, DEFAULT_WORKERS, RrSetGeneratorBuilder},
    diffusion::{
        DiffusionKernel, DiffusionModel, IndependentCascade, LinearThreshold, LinearThresholdMode,
        ModelKernel,
    },
    error::{
        GraphError, GraphErrorCode, Result, RisError, RisErrorCode, SampleError, SampleErrorCode,
    },
    estimator::{PoolStatistics, SpreadEstimator},
    generator::RrSetGenerator,
    graph::{DirectedGraph, EdgeRecord, InfluenceGraph, NodeId},
    pool::{RrSet, RrSetPool},
    probability::{DEFAULT_EDGE_PROBABILITY, EdgeProbabilityTable},
    rng::{MasterStream, WorkerTask},
    scheduler::SamplingScheduler,
};
