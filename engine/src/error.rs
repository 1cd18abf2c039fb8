//! Error type shared by graph construction, preprocessing and queries.

use crate::datastr::graph::{EdgeId, NodeId};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("node {node} out of range, graph has {num_nodes} nodes")]
    NodeOutOfRange { node: NodeId, num_nodes: usize },
    #[error("edge {edge} out of range, graph has {num_edges} edges")]
    EdgeOutOfRange { edge: EdgeId, num_edges: usize },
    #[error("partition {0} out of range, at most 64 regions are supported")]
    PartitionOutOfRange(u32),
    #[error("edge {from} -> {to} references a node outside of [0, {num_nodes})")]
    InvalidEdge { from: NodeId, to: NodeId, num_nodes: usize },
    #[error("malformed graph: {0}")]
    MalformedGraph(String),
    #[error("expected {expected} partition entries, got {actual}")]
    PartitionCount { expected: usize, actual: usize },
    #[error("partition depth {0} would produce more than 64 regions")]
    PartitionDepth(u8),
    #[error("parse error in line {line}: {message}")]
    Parse { line: usize, message: String },
    #[error("arc flag preprocessing failed: {0}")]
    Preprocessing(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
