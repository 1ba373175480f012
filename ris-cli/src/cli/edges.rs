//! Whitespace-separated edge-list reader.
//!
//! Each non-blank line holds `source target [probability]`. Text after `#`
//! is ignored.

use std::io::{self, BufRead};

use ris_core::{DirectedGraph, EdgeRecord, NodeId};
use thiserror::Error;

/// Errors raised while reading an edge list.
#[derive(Debug, Error)]
pub enum EdgeListError {
    /// Reading from the underlying source failed.
    #[error("failed to read line {line}: {source}")]
    Read {
        /// 1-based line number.
        line: usize,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
    /// A line had fewer than two columns.
    #[error("line {line}: expected `source target [probability]`")]
    MissingTarget {
        /// 1-based line number.
        line: usize,
    },
    /// A node column was not a non-negative integer.
    #[error("line {line}: invalid node id `{token}`")]
    InvalidNode {
        /// 1-based line number.
        line: usize,
        /// Offending token.
        token: String,
    },
    /// The probability column was not a number.
    #[error("line {line}: invalid probability `{token}`")]
    InvalidProbability {
        /// 1-based line number.
        line: usize,
        /// Offending token.
        token: String,
    },
    /// A line had more than three columns.
    #[error("line {line}: unexpected trailing column `{token}`")]
    TrailingColumn {
        /// 1-based line number.
        line: usize,
        /// First unexpected token.
        token: String,
    },
}

impl EdgeListError {
    /// Returns the 1-based line number the error refers to.
    #[must_use]
    pub fn line(&self) -> usize {
        match self {
            Self::Read { line, .. }
            | Self::MissingTarget { line }
            | Self::InvalidNode { line, .. }
            | Self::InvalidProbability { line, .. }
            | Self::TrailingColumn { line, .. } => *line,
        }
    }
}

/// Reads an edge list into a graph called `name`.
///
/// # Errors
/// Returns [`EdgeListError`] for the first unreadable or malformed line.
///
/// # Examples
/// ```
/// use ris_cli::cli::read_edge_list;
/// use ris_core::InfluenceGraph;
///
/// let input = "# social graph\n0 1 0.5\n1 2\n\n2 0 # back edge\n";
/// let graph = read_edge_list("demo", input.as_bytes())?;
/// assert_eq!(graph.name(), "demo");
/// assert_eq!(graph.node_count(), 3);
/// assert_eq!(graph.edge_count(), 3);
/// # Ok::<(), ris_cli::cli::EdgeListError>(())
/// ```
pub fn read_edge_list(
    name: impl Into<String>,
    reader: impl BufRead,
) -> Result<DirectedGraph, EdgeListError> {
    let mut graph = DirectedGraph::new().with_name(name);
    for (index, line) in reader.lines().enumerate() {
        let line_number = index + 1;
        let line = line.map_err(|source| EdgeListError::Read {
            line: line_number,
            source,
        })?;
        if let Some(edge) = parse_line(line_number, &line)? {
            graph.add_edge(edge);
        }
    }
    Ok(graph)
}

fn parse_line(line: usize, raw: &str) -> Result<Option<EdgeRecord>, EdgeListError> {
    let content = raw.split_once('#').map_or(raw, |(head, _)| head);
    let mut tokens = content.split_whitespace();
    let Some(source) = tokens.next() else {
        return Ok(None);
    };
    let target = tokens.next().ok_or(EdgeListError::MissingTarget { line })?;
    let mut edge = EdgeRecord::new(parse_node(line, source)?, parse_node(line, target)?);

    if let Some(token) = tokens.next() {
        let prob = token
            .parse::<f64>()
            .map_err(|_| EdgeListError::InvalidProbability {
                line,
                token: token.to_owned(),
            })?;
        edge = edge.with_influence_prob(prob);
    }
    if let Some(token) = tokens.next() {
        return Err(EdgeListError::TrailingColumn {
            line,
            token: token.to_owned(),
        });
    }
    Ok(Some(edge))
}

fn parse_node(line: usize, token: &str) -> Result<NodeId, EdgeListError> {
    token.parse().map_err(|_| EdgeListError::InvalidNode {
        line,
        token: token.to_owned(),
    })
}
