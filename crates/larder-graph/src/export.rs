//! Structured export of the whole graph.
//!
//! The export is the interchange format between the builder and the
//! engine, and the graph half of a persisted snapshot. Importing an export
//! reproduces the same node ids, edge identities and weights.

use crate::edge::{default_weight, EdgeKind, RecipeEdge};
use crate::error::{GraphError, Result};
use crate::graph::RecipeGraph;
use larder_core::{NodeKind, Properties, RecipeNode};
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeRecord {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    pub name: String,
    #[serde(default)]
    pub properties: Properties,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeRecord {
    pub source: String,
    pub target: String,
    #[serde(rename = "type")]
    pub kind: EdgeKind,
    #[serde(default = "default_weight")]
    pub weight: f64,
    #[serde(default)]
    pub properties: Properties,
}

/// Ordered lists of nodes and edges.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphExport {
    pub nodes: Vec<NodeRecord>,
    pub edges: Vec<EdgeRecord>,
}

impl From<&RecipeNode> for NodeRecord {
    fn from(node: &RecipeNode) -> Self {
        Self {
            id: node.id.clone(),
            kind: node.kind,
            name: node.name.clone(),
            properties: node.properties.clone(),
        }
    }
}

impl From<NodeRecord> for RecipeNode {
    fn from(record: NodeRecord) -> Self {
        let mut node = RecipeNode::with_id(record.id, record.kind, record.name);
        node.properties = record.properties;
        node
    }
}

impl From<&RecipeEdge> for EdgeRecord {
    fn from(edge: &RecipeEdge) -> Self {
        Self {
            source: edge.source.clone(),
            target: edge.target.clone(),
            kind: edge.kind,
            weight: edge.weight,
            properties: edge.properties.clone(),
        }
    }
}

impl From<EdgeRecord> for RecipeEdge {
    fn from(record: EdgeRecord) -> Self {
        let mut edge = RecipeEdge::new(record.source, record.target, record.kind).with_weight(record.weight);
        edge.properties = record.properties;
        edge
    }
}

impl GraphExport {
    pub fn to_json_bytes(&self) -> Result<Vec<u8>> {
        serde_json::to_vec_pretty(self).map_err(GraphError::Serialize)
    }

    pub fn from_json_slice(bytes: &[u8]) -> Result<Self> {
        Ok(serde_json::from_slice(bytes)?)
    }

    /// Writes the export as JSON.
    ///
    /// The data goes to a sibling temporary file first and is renamed into
    /// place, so readers see either the old file or the complete new one.
    /// The temporary file is removed if any step fails.
    pub fn write_json_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let bytes = self.to_json_bytes()?;

        let temp_path = path.with_extension("json.tmp");
        let written = File::create(&temp_path).and_then(|mut file| {
            file.write_all(&bytes)?;
            file.sync_all()?;
            drop(file);
            fs::rename(&temp_path, path)
        });
        if let Err(e) = written {
            let _ = fs::remove_file(&temp_path);
            return Err(e.into());
        }

        debug!(
            "Wrote graph export ({} nodes, {} edges) to {}",
            self.nodes.len(),
            self.edges.len(),
            path.display()
        );
        Ok(())
    }

    pub fn read_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let bytes = fs::read(path.as_ref())?;
        Self::from_json_slice(&bytes)
    }
}

impl RecipeGraph {
    /// Exports the graph. Nodes are ordered by id, edges by insertion.
    pub fn to_export(&self) -> GraphExport {
        let mut nodes: Vec<NodeRecord> = self.nodes().map(NodeRecord::from).collect();
        nodes.sort_by(|a, b| a.id.cmp(&b.id));

        GraphExport {
            nodes,
            edges: self.edges().iter().map(EdgeRecord::from).collect(),
        }
    }

    /// Rebuilds a graph from an export.
    ///
    /// Fails with `InvalidReference` if an edge names a node the export
    /// does not contain.
    pub fn from_export(export: GraphExport) -> Result<Self> {
        let mut graph = RecipeGraph::new();

        for record in export.nodes {
            graph.add_node(record.into());
        }
        for record in export.edges {
            graph.add_edge(record.into());
        }

        graph.validate()?;
        Ok(graph)
    }
}
