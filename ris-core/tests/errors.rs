use std::{num::NonZeroUsize, sync::Arc};

use ris_core::{
    DiffusionModel, GraphError, GraphErrorCode, LinearThresholdMode, RisError, RisErrorCode,
    SampleError, SampleErrorCode,
};
use rstest::rstest;

#[rstest]
#[case(GraphError::UnknownNode { node: 4 }, GraphErrorCode::UnknownNode)]
#[case(
    GraphError::LookupFailed { node: 1, reason: Arc::from("offline") },
    GraphErrorCode::LookupFailed,
)]
fn returns_expected_graph_code(#[case] error: GraphError, #[case] expected: GraphErrorCode) {
    assert_eq!(error.code(), expected);
    assert_eq!(error.code().as_str(), expected.as_str());
}

#[rstest]
#[case(
    RisError::UnknownDiffusionModel { provided: Arc::from("SIR") },
    RisErrorCode::UnknownDiffusionModel,
    "RIS_UNKNOWN_DIFFUSION_MODEL",
)]
#[case(
    RisError::UnknownThresholdMode { provided: Arc::from("soft") },
    RisErrorCode::UnknownThresholdMode,
    "RIS_UNKNOWN_THRESHOLD_MODE",
)]
#[case(
    RisError::InvalidWorkerCount { got: 0 },
    RisErrorCode::InvalidWorkerCount,
    "RIS_INVALID_WORKER_COUNT",
)]
#[case(
    RisError::ParallelUnavailable { requested: NonZeroUsize::MIN },
    RisErrorCode::ParallelUnavailable,
    "RIS_PARALLEL_UNAVAILABLE",
)]
#[case(
    RisError::WorkerPool { workers: NonZeroUsize::MIN, message: Arc::from("no threads") },
    RisErrorCode::WorkerPool,
    "RIS_WORKER_POOL",
)]
fn returns_expected_ris_code(
    #[case] error: RisError,
    #[case] expected: RisErrorCode,
    #[case] rendered: &str,
) {
    assert_eq!(error.code(), expected);
    assert_eq!(error.code().to_string(), rendered);
}

#[rstest]
fn sample_error_exposes_root_and_graph_code() {
    let error = SampleError::Graph {
        root: 7,
        error: GraphError::UnknownNode { node: 7 },
    };
    assert_eq!(error.code(), SampleErrorCode::GraphFailure);
    assert_eq!(error.root(), 7);
    assert_eq!(error.graph_code(), Some(GraphErrorCode::UnknownNode));
    let source = std::error::Error::source(&error).expect("graph error is the source");
    assert_eq!(source.to_string(), "node 7 is not present in the graph");
}

#[rstest]
#[case("SIR")]
#[case("")]
#[case("cascade")]
fn unknown_models_fail_fast(#[case] raw: &str) {
    let err = raw
        .parse::<DiffusionModel>()
        .expect_err("identifier must be rejected");
    assert_eq!(
        err,
        RisError::UnknownDiffusionModel {
            provided: Arc::from(raw)
        }
    );
}

#[rstest]
fn unknown_threshold_modes_fail_fast() {
    let err = "soft"
        .parse::<LinearThresholdMode>()
        .expect_err("mode must be rejected");
    assert_eq!(err.code(), RisErrorCode::UnknownThresholdMode);
}
