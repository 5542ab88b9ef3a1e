//! Error types for the core crate.

use std::path::PathBuf;
use thiserror::Error;

/// Result alias used throughout larder-core.
pub type Result<T> = std::result::Result<T, CoreError>;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Unknown node kind: {0}")]
    UnknownNodeKind(String),

    #[error("Invalid configuration in {path}: {source}")]
    Config {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
