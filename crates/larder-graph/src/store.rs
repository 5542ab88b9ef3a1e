//! Snapshot persistence.
//!
//! A snapshot is two artifacts kept side by side in a sled database: the
//! JSON graph export and the bincode-encoded `GraphIndex`. Both are
//! written in one transaction. The index is a cache: if it is missing,
//! undecodable or built for another graph, loading rebuilds it.

use crate::error::GraphError;
use crate::export::GraphExport;
use crate::graph::RecipeGraph;
use crate::index::{GraphIndex, IndexedGraph};
use larder_core::EngineConfig;
use sled::transaction::{TransactionError, TransactionResult};
use sled::Db;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info, warn};

const GRAPH_KEY: &str = "recipe_graph";
const INDEX_KEY: &str = "graph_index";

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Sled(#[from] sled::Error),
    #[error("Serialization error: {0}")]
    Bincode(#[from] bincode::Error),
    #[error(transparent)]
    Graph(#[from] GraphError),
    #[error("Snapshot transaction aborted")]
    TransactionAborted,
}

pub struct GraphStore {
    db: Db,
}

impl GraphStore {
    /// Opens or creates a graph store at the specified path.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let db = sled::open(path)?;
        Ok(Self { db })
    }

    /// Opens the store in the configured storage directory.
    pub fn open_configured(config: &EngineConfig) -> Result<Self, StoreError> {
        Self::open(&config.storage_dir)
    }

    /// Saves the graph and its indices.
    ///
    /// Either both artifacts are replaced or, on error, the previous
    /// snapshot stays as it was.
    pub fn save(&self, indexed: &IndexedGraph) -> Result<(), StoreError> {
        let graph_bytes = indexed.graph().to_export().to_json_bytes()?;
        let index_bytes = bincode::serialize(indexed.index())?;

        let result: TransactionResult<()> = self.db.transaction(|tx| {
            tx.insert(GRAPH_KEY, graph_bytes.as_slice())?;
            tx.insert(INDEX_KEY, index_bytes.as_slice())?;
            Ok(())
        });
        result.map_err(transaction_error)?;
        self.db.flush()?;

        info!(
            "Saved graph snapshot: {} nodes, {} edges ({} + {} bytes)",
            indexed.graph().node_count(),
            indexed.graph().edge_count(),
            graph_bytes.len(),
            index_bytes.len()
        );
        Ok(())
    }

    /// Loads the last saved snapshot.
    ///
    /// Returns `Ok(None)` when nothing has been saved yet, which tells the
    /// caller to build the graph from source data.
    pub fn load(&self) -> Result<Option<IndexedGraph>, StoreError> {
        let Some(graph_bytes) = self.db.get(GRAPH_KEY)? else {
            debug!("No graph snapshot present");
            return Ok(None);
        };

        let export = GraphExport::from_json_slice(&graph_bytes)?;
        let graph = RecipeGraph::from_export(export)?;

        let indexed = match self.load_index(&graph) {
            Some(index) => IndexedGraph::from_parts(graph, index),
            None => graph.freeze(),
        };

        info!(
            "Loaded graph snapshot: {} nodes, {} edges",
            indexed.graph().node_count(),
            indexed.graph().edge_count()
        );
        Ok(Some(indexed))
    }

    /// Returns true if a graph snapshot is present.
    pub fn has_snapshot(&self) -> Result<bool, StoreError> {
        Ok(self.db.contains_key(GRAPH_KEY)?)
    }

    /// Clears the stored snapshot. Both artifacts go in one transaction.
    pub fn clear(&self) -> Result<(), StoreError> {
        let result: TransactionResult<()> = self.db.transaction(|tx| {
            tx.remove(GRAPH_KEY)?;
            tx.remove(INDEX_KEY)?;
            Ok(())
        });
        result.map_err(transaction_error)?;
        self.db.flush()?;

        debug!("Cleared graph snapshot");
        Ok(())
    }

    /// Reads the index artifact, or `None` if it cannot be used with `graph`.
    fn load_index(&self, graph: &RecipeGraph) -> Option<GraphIndex> {
        let bytes = match self.db.get(INDEX_KEY) {
            Ok(Some(bytes)) => bytes,
            Ok(None) => {
                warn!("Graph index missing, rebuilding");
                return None;
            }
            Err(e) => {
                warn!("Graph index unreadable ({}), rebuilding", e);
                return None;
            }
        };

        match bincode::deserialize::<GraphIndex>(&bytes) {
            Ok(index) if index.matches(graph) => Some(index),
            Ok(_) => {
                warn!("Graph index does not match the stored graph, rebuilding");
                None
            }
            Err(e) => {
                warn!("Graph index corrupt ({}), rebuilding", e);
                None
            }
        }
    }
}

fn transaction_error(e: TransactionError<()>) -> StoreError {
    match e {
        TransactionError::Abort(()) => StoreError::TransactionAborted,
        TransactionError::Storage(e) => StoreError::Sled(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::edge::{EdgeKind, RecipeEdge};
    use larder_core::{NodeKind, RecipeNode};
    use tempfile::tempdir;

    fn sample() -> IndexedGraph {
        let mut graph = RecipeGraph::new();
        graph.add_node(RecipeNode::new(NodeKind::Dish, "omelette"));
        graph.add_node(RecipeNode::new(NodeKind::Ingredient, "egg"));
        graph.add_edge(RecipeEdge::new("dish_omelette", "ingredient_egg", EdgeKind::Contains));
        graph.freeze()
    }

    #[test]
    fn test_load_empty_store() {
        let dir = tempdir().unwrap();
        let store = GraphStore::open(dir.path()).unwrap();

        assert!(store.load().unwrap().is_none());
        assert!(!store.has_snapshot().unwrap());
    }

    #[test]
    fn test_save_load_graph() {
        let dir = tempdir().unwrap();
        let store = GraphStore::open(dir.path()).unwrap();
        let original = sample();

        store.save(&original).unwrap();

        let loaded = store.load().unwrap().unwrap();
        assert_eq!(loaded.graph().node_count(), 2);
        assert_eq!(loaded.graph().edge_count(), 1);
        assert_eq!(loaded.index(), original.index());
    }

    #[test]
    fn test_snapshot_survives_reopen() {
        let dir = tempdir().unwrap();
        {
            let store = GraphStore::open(dir.path()).unwrap();
            store.save(&sample()).unwrap();
        }

        let store = GraphStore::open(dir.path()).unwrap();
        assert!(store.has_snapshot().unwrap());
        assert_eq!(store.load().unwrap().unwrap().graph().node_count(), 2);
    }

    #[test]
    fn test_missing_index_is_rebuilt() {
        let dir = tempdir().unwrap();
        let store = GraphStore::open(dir.path()).unwrap();
        let original = sample();
        store.save(&original).unwrap();
        store.db.remove(INDEX_KEY).unwrap();

        let loaded = store.load().unwrap().unwrap();
        assert_eq!(loaded.index(), original.index());
    }

    #[test]
    fn test_corrupt_index_is_rebuilt() {
        let dir = tempdir().unwrap();
        let store = GraphStore::open(dir.path()).unwrap();
        let original = sample();
        store.save(&original).unwrap();
        store.db.insert(INDEX_KEY, &b"\xff\x00garbage"[..]).unwrap();

        let loaded = store.load().unwrap().unwrap();
        assert_eq!(loaded.index(), original.index());
    }

    #[test]
    fn test_stale_index_is_rebuilt() {
        let dir = tempdir().unwrap();
        let store = GraphStore::open(dir.path()).unwrap();
        store.save(&sample()).unwrap();

        let stale = bincode::serialize(&GraphIndex::build(&RecipeGraph::new())).unwrap();
        store.db.insert(INDEX_KEY, stale).unwrap();

        let loaded = store.load().unwrap().unwrap();
        assert!(loaded.index().matches(loaded.graph()));
        assert!(loaded.index().ids_of_kind(NodeKind::Dish).is_some());
    }

    #[test]
    fn test_malformed_graph_is_an_error() {
        let dir = tempdir().unwrap();
        let store = GraphStore::open(dir.path()).unwrap();
        store.db.insert(GRAPH_KEY, &b"not json"[..]).unwrap();

        assert!(matches!(
            store.load(),
            Err(StoreError::Graph(GraphError::MalformedSnapshot(_)))
        ));
    }

    #[test]
    fn test_save_replaces_previous_snapshot() {
        let dir = tempdir().unwrap();
        let store = GraphStore::open(dir.path()).unwrap();
        store.save(&sample()).unwrap();

        let mut bigger = sample().into_graph();
        bigger.add_node(RecipeNode::new(NodeKind::Tool, "pan"));
        store.save(&bigger.freeze()).unwrap();

        assert_eq!(store.load().unwrap().unwrap().graph().node_count(), 3);
    }

    #[test]
    fn test_open_configured() {
        let dir = tempdir().unwrap();
        let config = EngineConfig {
            storage_dir: dir.path().join("graph_storage"),
            ..EngineConfig::default()
        };

        let store = GraphStore::open_configured(&config).unwrap();
        store.save(&sample()).unwrap();
        assert!(config.storage_dir.exists());
    }

    #[test]
    fn test_clear() {
        let dir = tempdir().unwrap();
        let store = GraphStore::open(dir.path()).unwrap();
        store.save(&sample()).unwrap();
        store.clear().unwrap();

        assert!(store.load().unwrap().is_none());
        assert!(!store.has_snapshot().unwrap());
        assert!(!store.db.contains_key(INDEX_KEY).unwrap());

        // clearing an empty store is fine, and the store stays usable
        store.clear().unwrap();
        store.save(&sample()).unwrap();
        assert_eq!(store.load().unwrap().unwrap().graph().node_count(), 2);
    }
}
