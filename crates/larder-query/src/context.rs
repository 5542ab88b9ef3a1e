//! Graph context handed to an external answer generator.
//!
//! The generator sees the original question, the nodes a query touched,
//! the edges among those nodes and a few statistics. Rendering is plain
//! text; nothing in this crate talks to a generator.

use crate::engine::QueryEngine;
use larder_core::RecipeNode;
use larder_graph::RecipeEdge;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::fmt::Write;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnswerContext {
    pub query: String,
    pub nodes: Vec<RecipeNode>,
    /// Every edge between two of `nodes`, in either direction.
    pub edges: Vec<RecipeEdge>,
    pub statistics: Map<String, Value>,
}

impl AnswerContext {
    /// Renders the context as the plain-text listing the generator reads.
    pub fn render(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Question: {}", self.query);

        if !self.nodes.is_empty() {
            let _ = writeln!(out, "\nEntities:");
            for node in &self.nodes {
                let _ = writeln!(out, "- {} ({})", node.name, node.kind);
            }
        }

        if !self.edges.is_empty() {
            let _ = writeln!(out, "\nRelationships:");
            for edge in &self.edges {
                let _ = writeln!(
                    out,
                    "- {} {} {} (weight {:.2})",
                    self.display_name(&edge.source),
                    edge.kind.describe(),
                    self.display_name(&edge.target),
                    edge.weight
                );
            }
        }

        if !self.statistics.is_empty() {
            let _ = writeln!(out, "\nStatistics:");
            for (key, value) in &self.statistics {
                match value {
                    Value::String(s) => {
                        let _ = writeln!(out, "- {}: {}", key, s);
                    }
                    other => {
                        let _ = writeln!(out, "- {}: {}", key, other);
                    }
                }
            }
        }

        out
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn display_name<'a>(&'a self, id: &'a str) -> &'a str {
        self.nodes
            .iter()
            .find(|n| n.id == id)
            .map_or(id, |n| n.name.as_str())
    }
}

impl<'g> QueryEngine<'g> {
    /// Collects the nodes with the given ids (unknown ids and repeats are
    /// skipped) and every edge between them.
    pub fn answer_context<S: AsRef<str>>(
        &self,
        query: &str,
        node_ids: &[S],
        statistics: Map<String, Value>,
    ) -> AnswerContext {
        let graph = self.graph();

        let mut seen = HashSet::new();
        let nodes: Vec<&RecipeNode> = node_ids
            .iter()
            .filter_map(|id| graph.node(id.as_ref()))
            .filter(|node| seen.insert(node.id.as_str()))
            .collect();

        let mut edges = Vec::new();
        for (i, first) in nodes.iter().enumerate() {
            for second in &nodes[i + 1..] {
                edges.extend(graph.edges_between(&first.id, &second.id).into_iter().cloned());
            }
        }

        AnswerContext {
            query: query.to_string(),
            nodes: nodes.into_iter().cloned().collect(),
            edges,
            statistics,
        }
    }
}
