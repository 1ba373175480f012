//! Unit tests for the CLI commands and edge-list loading.

use super::commands::{derive_graph_name, run_sample};
use super::test_helpers::{create_edge_file, run_cli_expecting_error, sample_cli, temp_dir};
use super::{
    Cli, CliError, Command, EdgeListError, ExecutionSummary, SampleCommand, SpreadReport,
    render_summary, run_cli,
};

use std::io::Cursor;
use std::path::Path;

use clap::Parser;
use ris_core::{DiffusionModel, LinearThresholdMode, PoolStatistics, RisError};
use rstest::rstest;
use tracing_subscriber::layer::SubscriberExt;

use ris_test_support::tracing::RecordingLayer;

type TestResult = Result<(), Box<dyn std::error::Error>>;

const CERTAIN_CHAIN: &str = "# chain\n0 1 1.0\n1 2 1.0\n";

#[rstest]
#[case::override_name("/tmp/social.edges", Some("override"), "override")]
#[case::stem_with_extension("/tmp/social.edges", None, "social")]
#[case::stem_without_extension("/tmp/social", None, "social")]
#[case::missing_stem("", None, "graph")]
fn derive_graph_name_selects_expected_name(
    #[case] raw_path: &str,
    #[case] override_name: Option<&'static str>,
    #[case] expected: &str,
) {
    let name = derive_graph_name(Path::new(raw_path), override_name);
    assert_eq!(name, expected);
}

#[rstest]
fn sample_reports_spread_and_coverage() -> TestResult {
    let dir = temp_dir();
    let path = create_edge_file(&dir, "chain.txt", CERTAIN_CHAIN)?;
    let mut command = SampleCommand::new(path);
    command.theta = 30;
    command.workers = 1;
    command.seed_set = vec![0];
    command.top = Some(2);

    let summary = run_cli(sample_cli(command))?;
    assert_eq!(summary.graph, "chain");
    assert_eq!((summary.nodes, summary.edges), (3, 2));
    assert_eq!(summary.model, DiffusionModel::IndependentCascade);
    assert_eq!((summary.requested, summary.generated, summary.failed), (30, 30, 0));
    assert_eq!(
        summary.spread,
        Some(SpreadReport {
            seeds: vec![0],
            spread: 3.0,
        })
    );
    assert_eq!(summary.top_covered.first(), Some(&(0, 30)));
    assert_eq!(summary.top_covered.len(), 2);
    assert_eq!(summary.statistics.count, 30);
    Ok(())
}

#[rstest]
#[case::sequential(1)]
#[case::parallel(3)]
fn worker_count_does_not_change_results(#[case] workers: usize) -> TestResult {
    let dir = temp_dir();
    let path = create_edge_file(&dir, "mixed.txt", "0 1 0.4\n1 2 0.6\n2 0 0.3\n0 3\n")?;
    let run = |workers| {
        let mut command = SampleCommand::new(path.clone());
        command.theta = 64;
        command.workers = workers;
        command.top = Some(4);
        run_sample(command)
    };
    assert_eq!(run(workers)?, run(1)?);
    Ok(())
}

#[rstest]
fn empty_edge_list_yields_empty_pool() -> TestResult {
    let dir = temp_dir();
    let path = create_edge_file(&dir, "empty.txt", "# nothing here\n\n")?;
    let mut command = SampleCommand::new(path);
    command.theta = 10;
    command.workers = 1;
    command.seed_set = vec![0];

    let summary = run_sample(command)?;
    assert_eq!(summary.nodes, 0);
    assert_eq!((summary.requested, summary.generated), (10, 0));
    assert_eq!(summary.statistics, PoolStatistics::default());
    assert_eq!(summary.spread.map(|report| report.spread), Some(0.0));
    Ok(())
}

#[rstest]
fn missing_file_reports_io_error() {
    let dir = temp_dir();
    let path = dir.path().join("absent.txt");
    let err = run_cli_expecting_error(
        sample_cli(SampleCommand::new(path.clone())),
        "missing files must fail",
    );
    match err {
        CliError::Io { path: reported, .. } => assert_eq!(reported, path),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[rstest]
fn malformed_edge_list_reports_line() -> TestResult {
    let dir = temp_dir();
    let path = create_edge_file(&dir, "bad.txt", "0 1\n\n1 two\n")?;
    let err = run_cli_expecting_error(sample_cli(SampleCommand::new(path)), "line 3 is invalid");
    match err {
        CliError::EdgeList { source, .. } => {
            assert_eq!(source.line(), 3);
            assert!(matches!(source, EdgeListError::InvalidNode { ref token, .. } if token == "two"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    Ok(())
}

#[rstest]
fn zero_workers_surface_core_error() -> TestResult {
    let dir = temp_dir();
    let path = create_edge_file(&dir, "chain.txt", CERTAIN_CHAIN)?;
    let mut command = SampleCommand::new(path);
    command.workers = 0;
    let err = run_cli_expecting_error(sample_cli(command), "zero workers must fail");
    assert!(matches!(
        err,
        CliError::Core(RisError::InvalidWorkerCount { got: 0 })
    ));
    Ok(())
}

#[rstest]
fn parses_every_sample_flag() {
    let cli = Cli::try_parse_from([
        "ris",
        "sample",
        "graph.txt",
        "--name",
        "social",
        "--theta",
        "250",
        "--model",
        "lt",
        "--lt-mode",
        "threshold",
        "--workers",
        "2",
        "--seed",
        "9",
        "--seed-set",
        "0,4,7",
        "--top",
        "3",
    ])
    .expect("arguments must parse");
    let Command::Sample(command) = cli.command;
    assert_eq!(command.edges, Path::new("graph.txt"));
    assert_eq!(command.name.as_deref(), Some("social"));
    assert_eq!(command.theta, 250);
    assert_eq!(command.model, DiffusionModel::LinearThreshold);
    assert_eq!(command.lt_mode, LinearThresholdMode::Threshold);
    assert_eq!(command.workers, 2);
    assert_eq!(command.seed, 9);
    assert_eq!(command.seed_set, vec![0, 4, 7]);
    assert_eq!(command.top, Some(3));
}

#[rstest]
fn defaults_match_generator_defaults() {
    let cli = Cli::try_parse_from(["ris", "sample", "graph.txt"]).expect("arguments must parse");
    let Command::Sample(command) = cli.command;
    let expected = SampleCommand::new("graph.txt");
    assert_eq!(command.theta, expected.theta);
    assert_eq!(command.model, expected.model);
    assert_eq!(command.lt_mode, expected.lt_mode);
    assert_eq!(command.workers, expected.workers);
    assert_eq!(command.seed, expected.seed);
    assert!(command.seed_set.is_empty());
    assert_eq!(command.top, None);
}

#[rstest]
#[case::model(["ris", "sample", "g.txt", "--model", "SIR"])]
#[case::lt_mode(["ris", "sample", "g.txt", "--lt-mode", "fuzzy"])]
#[case::seed_set(["ris", "sample", "g.txt", "--seed-set", "0,x"])]
fn rejects_invalid_flags(#[case] args: [&str; 5]) {
    assert!(Cli::try_parse_from(args).is_err());
}

#[rstest]
fn render_summary_lists_every_section() -> TestResult {
    let summary = ExecutionSummary {
        graph: "demo".into(),
        nodes: 3,
        edges: 2,
        model: DiffusionModel::LinearThreshold,
        requested: 4,
        generated: 3,
        failed: 1,
        statistics: PoolStatistics {
            count: 3,
            mean_size: 2.0,
            std_size: 0.5,
            min_size: 1,
            max_size: 3,
            distinct_nodes: 3,
        },
        spread: Some(SpreadReport {
            seeds: vec![0, 2],
            spread: 2.25,
        }),
        top_covered: vec![(0, 3), (2, 1)],
    };
    let mut buffer = Cursor::new(Vec::new());
    render_summary(&summary, &mut buffer)?;
    let text = String::from_utf8(buffer.into_inner())?;
    assert_eq!(
        text,
        "graph: demo\n\
         nodes: 3\n\
         edges: 2\n\
         model: LT\n\
         rr sets: requested 4 generated 3 failed 1\n\
         size: mean 2.000 std 0.500 min 1 max 3\n\
         distinct nodes: 3\n\
         spread [0,2]: 2.250\n\
         top coverage:\n\
         0\t3\n\
         2\t1\n"
    );
    Ok(())
}

#[rstest]
fn sample_span_records_path_and_configuration() -> TestResult {
    let dir = temp_dir();
    let path = create_edge_file(&dir, "chain.txt", CERTAIN_CHAIN)?;
    let mut command = SampleCommand::new(path.clone());
    command.theta = 5;
    command.workers = 1;

    let layer = RecordingLayer::default();
    let subscriber = tracing_subscriber::registry().with(layer.clone());
    tracing::subscriber::with_default(subscriber, || run_cli(sample_cli(command)))?;

    let span = layer.span("cli.sample").expect("cli.sample span must exist");
    assert_eq!(span.field("path"), Some(path.display().to_string().as_str()));
    assert_eq!(span.field("theta"), Some("5"));
    assert_eq!(span.field("model"), Some("IC"));
    let run = layer.span("cli.run").expect("cli.run span must exist");
    assert_eq!(run.field("command"), Some("sample"));
    assert!(layer.span("core.generate").is_some());
    Ok(())
}
