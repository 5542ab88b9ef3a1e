//! Error types for graph construction and snapshots.

use crate::edge::EdgeKind;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, GraphError>;

#[derive(Error, Debug)]
pub enum GraphError {
    #[error("Unknown edge kind: {0}")]
    UnknownEdgeKind(String),

    /// An edge names a node that is not in the graph.
    #[error("Edge {from} -[{kind}]-> {to} references missing node {missing}")]
    InvalidReference {
        from: String,
        to: String,
        kind: EdgeKind,
        missing: String,
    },

    #[error("Failed to serialize graph: {0}")]
    Serialize(#[source] serde_json::Error),

    #[error("Malformed graph snapshot: {0}")]
    MalformedSnapshot(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
