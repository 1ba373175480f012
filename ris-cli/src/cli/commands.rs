//! Command implementations and argument parsing for the `ris` binary.

use std::fs::File;
use std::io::{self, BufReader, Write};
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use ris_core::{
    DEFAULT_MASTER_SEED, DEFAULT_WORKERS, DiffusionModel, InfluenceGraph, LinearThresholdMode,
    NodeId, PoolStatistics, RisError, RrSetGeneratorBuilder,
};
use thiserror::Error;
use tracing::{Span, field, info, instrument};

use super::edges::{EdgeListError, read_edge_list};

const DEFAULT_THETA: usize = 1000;

/// Top-level CLI options parsed by [`clap`].
#[derive(Debug, Parser, Clone)]
#[command(
    name = "ris",
    about = "Sample reverse-reachable sets and estimate influence spread."
)]
pub struct Cli {
    /// Command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported CLI commands.
#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Sample an RR-set pool from an edge list.
    Sample(SampleCommand),
}

/// Options accepted by the `sample` command.
#[derive(Debug, Args, Clone)]
pub struct SampleCommand {
    /// Edge list with one `source target [probability]` triple per line.
    pub edges: PathBuf,

    /// Override name for the graph (defaults to the file name).
    #[arg(long)]
    pub name: Option<String>,

    /// Number of RR sets to sample.
    #[arg(long, default_value_t = DEFAULT_THETA)]
    pub theta: usize,

    /// Diffusion model (`IC` or `LT`).
    #[arg(long, default_value_t = DiffusionModel::IndependentCascade)]
    pub model: DiffusionModel,

    /// Linear Threshold behaviour (`cascade` or `threshold`).
    #[arg(long = "lt-mode", default_value_t = LinearThresholdMode::CascadeEquivalent)]
    pub lt_mode: LinearThresholdMode,

    /// Number of sampling workers.
    #[arg(long, default_value_t = DEFAULT_WORKERS)]
    pub workers: usize,

    /// Master seed for task derivation.
    #[arg(long, default_value_t = DEFAULT_MASTER_SEED)]
    pub seed: u64,

    /// Comma-separated seed nodes whose spread should be estimated.
    #[arg(long = "seed-set", value_delimiter = ',')]
    pub seed_set: Vec<NodeId>,

    /// Report the `K` nodes contained in the most RR sets.
    #[arg(long, value_name = "K")]
    pub top: Option<usize>,
}

impl SampleCommand {
    /// Creates a command for `edges` with every option at its default.
    #[must_use]
    pub fn new(edges: impl Into<PathBuf>) -> Self {
        Self {
            edges: edges.into(),
            name: None,
            theta: DEFAULT_THETA,
            model: DiffusionModel::IndependentCascade,
            lt_mode: LinearThresholdMode::CascadeEquivalent,
            workers: DEFAULT_WORKERS,
            seed: DEFAULT_MASTER_SEED,
            seed_set: Vec::new(),
            top: None,
        }
    }
}

/// Errors surfaced while executing CLI commands.
#[derive(Debug, Error)]
pub enum CliError {
    /// The edge list could not be opened.
    #[error("failed to open `{path}`: {source}")]
    Io {
        /// Path that triggered the failure.
        path: PathBuf,
        /// Underlying operating system error.
        #[source]
        source: io::Error,
    },
    /// The edge list was malformed.
    #[error("failed to parse `{path}`: {source}")]
    EdgeList {
        /// Path of the edge list.
        path: PathBuf,
        /// Parse failure with its line number.
        #[source]
        source: EdgeListError,
    },
    /// Generator configuration failed.
    #[error(transparent)]
    Core(#[from] RisError),
}

/// Spread estimate for the requested seed set.
#[derive(Debug, Clone, PartialEq)]
pub struct SpreadReport {
    /// Seed nodes as supplied on the command line.
    pub seeds: Vec<NodeId>,
    /// Estimated expected number of influenced nodes.
    pub spread: f64,
}

/// Summarises the outcome of executing a CLI command.
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutionSummary {
    /// Graph name.
    pub graph: String,
    /// Number of graph nodes.
    pub nodes: usize,
    /// Number of graph edges.
    pub edges: usize,
    /// Diffusion model used for sampling.
    pub model: DiffusionModel,
    /// RR sets requested.
    pub requested: usize,
    /// RR sets produced.
    pub generated: usize,
    /// Tasks dropped after a sampling failure.
    pub failed: usize,
    /// Size statistics of the pool.
    pub statistics: PoolStatistics,
    /// Spread estimate, present when a seed set was supplied.
    pub spread: Option<SpreadReport>,
    /// Most covered nodes with their RR-set counts.
    pub top_covered: Vec<(NodeId, usize)>,
}

/// Executes the CLI command represented by `cli`.
///
/// # Errors
/// Returns [`CliError`] when loading the graph or configuring the generator
/// fails.
///
/// # Examples
/// ```
/// # use std::error::Error;
/// # use ris_cli::cli::{Cli, Command, SampleCommand, run_cli};
/// # use tempfile::NamedTempFile;
/// #
/// # fn main() -> Result<(), Box<dyn Error>> {
/// let file = NamedTempFile::new()?;
/// std::fs::write(file.path(), "0 1 0.5\n1 2 0.5\n")?;
/// let mut command = SampleCommand::new(file.path());
/// command.theta = 20;
/// command.workers = 1;
/// command.seed_set = vec![0];
/// let summary = run_cli(Cli { command: Command::Sample(command) })?;
/// assert_eq!(summary.generated, 20);
/// assert!(summary.spread.is_some());
/// # Ok(())
/// # }
/// ```
#[instrument(
    name = "cli.run",
    err,
    skip(cli),
    fields(command = field::Empty),
)]
pub fn run_cli(cli: Cli) -> Result<ExecutionSummary, CliError> {
    match cli.command {
        Command::Sample(sample) => {
            Span::current().record("command", field::display("sample"));
            run_sample(sample)
        }
    }
}

#[instrument(
    name = "cli.sample",
    err,
    skip(command),
    fields(path = field::Empty, theta = command.theta, model = %command.model),
)]
pub(super) fn run_sample(command: SampleCommand) -> Result<ExecutionSummary, CliError> {
    let SampleCommand {
        edges,
        name,
        theta,
        model,
        lt_mode,
        workers,
        seed,
        seed_set,
        top,
    } = command;
    Span::current().record("path", field::display(edges.display()));

    let graph_name = derive_graph_name(&edges, name.as_deref());
    let reader = open_edge_list(&edges)?;
    let graph = read_edge_list(graph_name, reader).map_err(|source| CliError::EdgeList {
        path: edges,
        source,
    })?;

    let generator = RrSetGeneratorBuilder::new()
        .with_model(model)
        .with_threshold_mode(lt_mode)
        .with_workers(workers)
        .with_seed(seed)
        .build(graph)?;
    let pool = generator.generate(theta);
    let estimator = generator.estimator(&pool);

    let spread = (!seed_set.is_empty()).then(|| SpreadReport {
        spread: estimator.estimate_spread(&seed_set),
        seeds: seed_set,
    });
    let top_covered = top.map_or_else(Vec::new, |k| estimator.top_covered(k));

    let graph = generator.graph();
    let summary = ExecutionSummary {
        graph: graph.name().to_owned(),
        nodes: graph.node_count(),
        edges: graph.edge_count(),
        model: generator.model(),
        requested: pool.requested(),
        generated: pool.len(),
        failed: pool.failed_tasks(),
        statistics: estimator.pool_statistics(),
        spread,
        top_covered,
    };
    info!(
        graph = summary.graph.as_str(),
        generated = summary.generated,
        failed = summary.failed,
        "sample command completed"
    );
    Ok(summary)
}

#[instrument(name = "cli.open_edge_list", err, fields(path = field::Empty))]
pub(super) fn open_edge_list(path: &Path) -> Result<BufReader<File>, CliError> {
    Span::current().record("path", field::display(path.display()));
    let file = File::open(path).map_err(|source| CliError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(BufReader::new(file))
}

pub(super) fn derive_graph_name(path: &Path, override_name: Option<&str>) -> String {
    if let Some(name) = override_name {
        return name.to_owned();
    }

    path.file_stem()
        .and_then(|value| value.to_str())
        .map(ToOwned::to_owned)
        .unwrap_or_else(|| "graph".to_owned())
}

/// Renders `summary` to `writer` in a human-readable text format.
///
/// # Errors
/// Returns [`io::Error`] if writing to the supplied writer fails.
///
/// # Examples
/// ```
/// # use std::error::Error;
/// # use std::io::Cursor;
/// # use ris_cli::cli::{ExecutionSummary, render_summary};
/// # use ris_core::{DiffusionModel, PoolStatistics};
/// #
/// # fn main() -> Result<(), Box<dyn Error>> {
/// let summary = ExecutionSummary {
///     graph: "demo".into(),
///     nodes: 2,
///     edges: 1,
///     model: DiffusionModel::IndependentCascade,
///     requested: 0,
///     generated: 0,
///     failed: 0,
///     statistics: PoolStatistics::default(),
///     spread: None,
///     top_covered: vec![],
/// };
/// let mut buffer = Cursor::new(Vec::new());
/// render_summary(&summary, &mut buffer)?;
/// let text = String::from_utf8(buffer.into_inner())?;
/// assert!(text.starts_with("graph: demo\n"));
/// # Ok(())
/// # }
/// ```
pub fn render_summary(summary: &ExecutionSummary, mut writer: impl Write) -> io::Result<()> {
    let stats = &summary.statistics;
    writeln!(writer, "graph: {}", summary.graph)?;
    writeln!(writer, "nodes: {}", summary.nodes)?;
    writeln!(writer, "edges: {}", summary.edges)?;
    writeln!(writer, "model: {}", summary.model)?;
    writeln!(
        writer,
        "rr sets: requested {} generated {} failed {}",
        summary.requested, summary.generated, summary.failed
    )?;
    writeln!(
        writer,
        "size: mean {:.3} std {:.3} min {} max {}",
        stats.mean_size, stats.std_size, stats.min_size, stats.max_size
    )?;
    writeln!(writer, "distinct nodes: {}", stats.distinct_nodes)?;
    if let Some(report) = &summary.spread {
        let seeds: Vec<String> = report.seeds.iter().map(ToString::to_string).collect();
        writeln!(writer, "spread [{}]: {:.3}", seeds.join(","), report.spread)?;
    }
    if !summary.top_covered.is_empty() {
        writeln!(writer, "top coverage:")?;
        for (node, count) in &summary.top_covered {
            writeln!(writer, "{node}\t{count}")?;
        }
    }
    Ok(())
}
