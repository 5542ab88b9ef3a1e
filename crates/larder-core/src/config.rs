//! Engine configuration.
//!
//! Every field has a default, so a config file only needs the keys it
//! wants to override.

use crate::error::{CoreError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Tunables shared by the builder, store, query and recommendation layers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Directory holding the persisted snapshot.
    pub storage_dir: PathBuf,

    /// Minimum number of shared dishes before two ingredients pair.
    pub min_cooccurrence_threshold: usize,

    /// Dish similarity must exceed this to become a SimilarTo edge.
    pub similarity_threshold: f64,

    /// Search limit used when resolving names inside composite queries.
    pub max_search_results: usize,

    pub max_recommendations: usize,

    /// Default threshold for trending ingredient combinations.
    pub trending_min_cooccurrence: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            storage_dir: PathBuf::from("graph_storage"),
            min_cooccurrence_threshold: 2,
            similarity_threshold: 0.3,
            max_search_results: 10,
            max_recommendations: 10,
            trending_min_cooccurrence: 3,
        }
    }
}

impl EngineConfig {
    /// Loads a configuration from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path)?;
        let config: EngineConfig = serde_json::from_str(&raw).map_err(|source| CoreError::Config {
            path: path.to_path_buf(),
            source,
        })?;
        debug!("Loaded engine config from {}", path.display());
        Ok(config)
    }

    /// Writes the configuration as pretty JSON.
    pub fn write_json_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let raw = serde_json::to_string_pretty(self).map_err(|source| CoreError::Config {
            path: path.to_path_buf(),
            source,
        })?;
        fs::write(path, raw)?;
        Ok(())
    }
}
