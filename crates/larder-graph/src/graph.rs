//! Core graph data structure.
//!
//! `RecipeGraph` owns every node and edge. It keeps a forward adjacency
//! (source → target → edge positions) and its mirror reverse adjacency,
//! both updated from `add_edge` only, so neighbour lookups cost the degree
//! of the node rather than a scan of the edge list.

use crate::edge::{EdgeKey, EdgeKind, RecipeEdge};
use crate::error::{GraphError, Result};
use larder_core::{NodeKind, RecipeNode};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};

/// node id → neighbour id → positions in the edge list.
pub(crate) type Adjacency = HashMap<String, HashMap<String, Vec<usize>>>;

/// The recipe knowledge graph.
///
/// Nodes and edges are added once during a build and never removed. A
/// rebuild produces a fresh graph.
#[derive(Debug, Clone, Default)]
pub struct RecipeGraph {
    nodes: HashMap<String, RecipeNode>,

    /// Edges in insertion order.
    edges: Vec<RecipeEdge>,

    /// Identities of the edges above, for idempotent insertion.
    edge_keys: HashSet<EdgeKey>,

    forward: Adjacency,
    reverse: Adjacency,
}

impl RecipeGraph {
    /// Creates a new empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a node, replacing any node with the same id.
    pub fn add_node(&mut self, node: RecipeNode) {
        self.nodes.insert(node.id.clone(), node);
    }

    /// Adds an edge unless one with the same (source, target, kind) exists.
    ///
    /// Returns whether the edge was inserted. A duplicate keeps the
    /// original's weight and properties.
    pub fn add_edge(&mut self, edge: RecipeEdge) -> bool {
        if !self.edge_keys.insert(edge.key()) {
            return false;
        }

        let position = self.edges.len();
        self.forward
            .entry(edge.source.clone())
            .or_default()
            .entry(edge.target.clone())
            .or_default()
            .push(position);
        self.reverse
            .entry(edge.target.clone())
            .or_default()
            .entry(edge.source.clone())
            .or_default()
            .push(position);
        self.edges.push(edge);

        true
    }

    /// Gets a node by id.
    pub fn node(&self, id: &str) -> Option<&RecipeNode> {
        self.nodes.get(id)
    }

    pub fn contains_node(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    /// Gets an edge by its position in the edge list.
    pub fn edge(&self, position: usize) -> Option<&RecipeEdge> {
        self.edges.get(position)
    }

    /// Returns the nodes connected to `id` by an edge of `kind` (any kind
    /// when `None`), following outgoing and incoming edges alike.
    ///
    /// Each neighbour appears once, ordered by id.
    pub fn neighbors(&self, id: &str, kind: Option<EdgeKind>) -> Vec<&RecipeNode> {
        let mut ids: HashSet<&str> = HashSet::new();

        for adjacency in [&self.forward, &self.reverse] {
            if let Some(targets) = adjacency.get(id) {
                for (other, positions) in targets {
                    if self.any_of_kind(positions, kind) {
                        ids.insert(other.as_str());
                    }
                }
            }
        }

        let mut neighbors: Vec<&RecipeNode> = ids.into_iter().filter_map(|id| self.node(id)).collect();
        neighbors.sort_by(|a, b| a.id.cmp(&b.id));
        neighbors
    }

    /// Returns edges leaving `source`, optionally restricted to one target
    /// and one kind.
    pub fn edges_from(
        &self,
        source: &str,
        target: Option<&str>,
        kind: Option<EdgeKind>,
    ) -> Vec<&RecipeEdge> {
        self.collect_edges(&self.forward, source, target, kind)
    }

    /// Returns edges arriving at `target`, optionally restricted to one
    /// source and one kind.
    pub fn edges_into(
        &self,
        target: &str,
        source: Option<&str>,
        kind: Option<EdgeKind>,
    ) -> Vec<&RecipeEdge> {
        self.collect_edges(&self.reverse, target, source, kind)
    }

    /// Returns every edge between `a` and `b`, in either direction.
    pub fn edges_between(&self, a: &str, b: &str) -> Vec<&RecipeEdge> {
        let mut edges = self.edges_from(a, Some(b), None);
        if a != b {
            edges.extend(self.edges_from(b, Some(a), None));
        }
        edges
    }

    /// Finds all nodes of a kind. Linear scan; see `GraphIndex` for the
    /// indexed version.
    pub fn find_nodes_by_kind(&self, kind: NodeKind) -> Vec<&RecipeNode> {
        let mut nodes: Vec<&RecipeNode> = self.nodes.values().filter(|n| n.kind == kind).collect();
        nodes.sort_by(|a, b| a.id.cmp(&b.id));
        nodes
    }

    /// Finds nodes whose name contains `name`, case-insensitively.
    pub fn find_nodes_by_name(&self, name: &str, kind: Option<NodeKind>) -> Vec<&RecipeNode> {
        let needle = name.to_lowercase();
        let mut nodes: Vec<&RecipeNode> = self
            .nodes
            .values()
            .filter(|n| kind.map_or(true, |k| n.kind == k))
            .filter(|n| n.name.to_lowercase().contains(&needle))
            .collect();
        nodes.sort_by(|a, b| a.id.cmp(&b.id));
        nodes
    }

    /// Checks that every edge endpoint is a node of this graph.
    pub fn validate(&self) -> Result<()> {
        for edge in &self.edges {
            for endpoint in [&edge.source, &edge.target] {
                if !self.contains_node(endpoint) {
                    return Err(GraphError::InvalidReference {
                        from: edge.source.clone(),
                        to: edge.target.clone(),
                        kind: edge.kind,
                        missing: endpoint.clone(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Returns the number of nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Returns the number of edges.
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Iterates over all nodes in no particular order.
    pub fn nodes(&self) -> impl Iterator<Item = &RecipeNode> {
        self.nodes.values()
    }

    /// All edges in insertion order.
    pub fn edges(&self) -> &[RecipeEdge] {
        &self.edges
    }

    pub(crate) fn reverse_adjacency(&self) -> &Adjacency {
        &self.reverse
    }

    fn any_of_kind(&self, positions: &[usize], kind: Option<EdgeKind>) -> bool {
        match kind {
            None => !positions.is_empty(),
            Some(kind) => positions
                .iter()
                .filter_map(|&p| self.edges.get(p))
                .any(|e| e.kind == kind),
        }
    }

    fn collect_edges(
        &self,
        adjacency: &Adjacency,
        from: &str,
        other: Option<&str>,
        kind: Option<EdgeKind>,
    ) -> Vec<&RecipeEdge> {
        let Some(targets) = adjacency.get(from) else {
            return Vec::new();
        };

        let mut positions: Vec<usize> = targets
            .iter()
            .filter(|(id, _)| other.map_or(true, |o| o == id.as_str()))
            .flat_map(|(_, positions)| positions.iter().copied())
            .collect();
        positions.sort_unstable();

        positions
            .into_iter()
            .filter_map(|p| self.edges.get(p))
            .filter(|e| kind.map_or(true, |k| e.kind == k))
            .collect()
    }
}

/// Node and edge counts, overall and per kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphStatistics {
    pub total_nodes: usize,
    pub total_edges: usize,
    pub nodes_by_kind: BTreeMap<NodeKind, usize>,
    pub edges_by_kind: BTreeMap<EdgeKind, usize>,
}

impl RecipeGraph {
    /// Returns graph statistics.
    pub fn statistics(&self) -> GraphStatistics {
        let mut nodes_by_kind = BTreeMap::new();
        for node in self.nodes.values() {
            *nodes_by_kind.entry(node.kind).or_insert(0) += 1;
        }

        let mut edges_by_kind = BTreeMap::new();
        for edge in &self.edges {
            *edges_by_kind.entry(edge.kind).or_insert(0) += 1;
        }

        GraphStatistics {
            total_nodes: self.node_count(),
            total_edges: self.edge_count(),
            nodes_by_kind,
            edges_by_kind,
        }
    }
}
