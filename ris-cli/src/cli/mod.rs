//! Command-line interface orchestration for the `ris` binary.
//!
//! The `sample` command loads an edge list, samples an RR-set pool and
//! reports pool statistics, an optional spread estimate and the most
//! covered nodes.

mod commands;
mod edges;

pub use commands::{
    Cli, CliError, Command, ExecutionSummary, SampleCommand, SpreadReport, render_summary,
    run_cli,
};
pub use edges::{EdgeListError, read_edge_list};

#[cfg(test)]
mod test_helpers;
#[cfg(test)]
mod tests;
