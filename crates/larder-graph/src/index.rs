//! Derived lookup indices.
//!
//! `GraphIndex` is a cache over a `RecipeGraph`: a coarse name index, a
//! kind index and a reverse adjacency. It is built in one pass when a
//! graph is frozen and is never patched afterwards; a new graph gets a new
//! index.

use crate::edge::{EdgeKind, RecipeEdge};
use crate::graph::RecipeGraph;
use larder_core::NodeKind;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// Bumped whenever the serialized layout of `GraphIndex` changes.
pub const INDEX_FORMAT_VERSION: u32 = 1;

/// Name tokens must be longer than this many characters to be indexed.
const MIN_TOKEN_CHARS: usize = 1;

/// Lookup indices for one specific graph.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphIndex {
    format_version: u32,

    /// Size of the graph this index was built from.
    node_count: usize,
    edge_count: usize,

    /// Lowercased full names and whitespace tokens → node ids.
    ///
    /// This only narrows candidates; ranking happens in the query layer.
    name_index: HashMap<String, HashSet<String>>,

    kind_index: HashMap<NodeKind, HashSet<String>>,

    /// target id → source id → positions in the graph's edge list.
    reverse_adjacency: HashMap<String, HashMap<String, Vec<usize>>>,
}

impl GraphIndex {
    /// Builds every index from scratch.
    pub fn build(graph: &RecipeGraph) -> Self {
        let mut name_index: HashMap<String, HashSet<String>> = HashMap::new();
        let mut kind_index: HashMap<NodeKind, HashSet<String>> = HashMap::new();

        for node in graph.nodes() {
            for key in name_keys(&node.name) {
                name_index.entry(key).or_default().insert(node.id.clone());
            }
            kind_index.entry(node.kind).or_default().insert(node.id.clone());
        }

        let index = Self {
            format_version: INDEX_FORMAT_VERSION,
            node_count: graph.node_count(),
            edge_count: graph.edge_count(),
            name_index,
            kind_index,
            reverse_adjacency: graph.reverse_adjacency().clone(),
        };

        debug!(
            "Built graph index: {} name keys, {} kinds, {} reverse entries",
            index.name_index.len(),
            index.kind_index.len(),
            index.reverse_adjacency.len()
        );
        index
    }

    /// Returns true if this index was built for a graph shaped like `graph`
    /// by a compatible version of this code.
    pub fn matches(&self, graph: &RecipeGraph) -> bool {
        self.format_version == INDEX_FORMAT_VERSION
            && self.node_count == graph.node_count()
            && self.edge_count == graph.edge_count()
    }

    /// Returns ids of every node whose name-index key contains `query`,
    /// case-insensitively.
    pub fn name_candidates(&self, query: &str) -> HashSet<&str> {
        let needle = query.to_lowercase();

        self.name_index
            .iter()
            .filter(|(key, _)| key.contains(&needle))
            .flat_map(|(_, ids)| ids.iter().map(String::as_str))
            .collect()
    }

    /// Returns the ids of all nodes of one kind.
    pub fn ids_of_kind(&self, kind: NodeKind) -> Option<&HashSet<String>> {
        self.kind_index.get(&kind)
    }

    /// Returns edges arriving at `target`, optionally of one kind, in edge
    /// list order.
    pub fn incoming<'g>(
        &self,
        graph: &'g RecipeGraph,
        target: &str,
        kind: Option<EdgeKind>,
    ) -> Vec<&'g RecipeEdge> {
        let Some(sources) = self.reverse_adjacency.get(target) else {
            return Vec::new();
        };

        let mut positions: Vec<usize> = sources.values().flatten().copied().collect();
        positions.sort_unstable();

        positions
            .into_iter()
            .filter_map(|p| graph.edge(p))
            .filter(|e| e.target == target && kind.map_or(true, |k| e.kind == k))
            .collect()
    }

    /// Returns the number of distinct name keys.
    pub fn name_key_count(&self) -> usize {
        self.name_index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.node_count == 0
    }
}

/// Keys under which a name is indexed: the full name plus every
/// whitespace-separated token longer than one character, lowercased.
fn name_keys(name: &str) -> HashSet<String> {
    let lower = name.to_lowercase();
    let mut keys: HashSet<String> = lower
        .split_whitespace()
        .filter(|token| token.chars().count() > MIN_TOKEN_CHARS)
        .map(str::to_string)
        .collect();
    keys.insert(lower);
    keys
}

/// A graph frozen together with its indices, ready to serve queries.
///
/// Nothing here is mutable after construction, so an `IndexedGraph` can be
/// shared between threads behind an `Arc` without locking.
#[derive(Debug, Clone)]
pub struct IndexedGraph {
    graph: RecipeGraph,
    index: GraphIndex,
}

impl IndexedGraph {
    /// Indexes a freshly built graph.
    pub fn new(graph: RecipeGraph) -> Self {
        let index = GraphIndex::build(&graph);
        Self { graph, index }
    }

    /// Pairs a graph with an index restored from storage. The caller has
    /// checked `index.matches(&graph)`.
    pub(crate) fn from_parts(graph: RecipeGraph, index: GraphIndex) -> Self {
        Self { graph, index }
    }

    pub fn graph(&self) -> &RecipeGraph {
        &self.graph
    }

    pub fn index(&self) -> &GraphIndex {
        &self.index
    }

    /// Gives the graph back, dropping the indices.
    pub fn into_graph(self) -> RecipeGraph {
        self.graph
    }
}

impl RecipeGraph {
    /// Ends the build phase: indexes the graph and hands it over for
    /// querying.
    pub fn freeze(self) -> IndexedGraph {
        IndexedGraph::new(self)
    }
}
