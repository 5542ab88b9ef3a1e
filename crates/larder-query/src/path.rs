//! Shortest paths between ingredients.
//!
//! Breadth-first search over the undirected neighbour relation, bounded by
//! a hop count. Neighbours are visited in node id order, so among several
//! shortest paths the one through the lowest ids wins. That choice is
//! arbitrary; callers should not rely on which shortest path they get.

use crate::engine::QueryEngine;
use larder_core::{NodeKind, RecipeNode};
use larder_graph::RecipeGraph;
use std::collections::{HashMap, HashSet, VecDeque};
use tracing::debug;

impl<'g> QueryEngine<'g> {
    /// Finds a shortest path between every pair of nodes the two names
    /// resolve to, walking at most `max_depth` edges.
    ///
    /// Pairs with no path within the bound are left out. When both names
    /// resolve to the same node the path is that node alone.
    pub fn find_paths_between_ingredients(
        &self,
        from: &str,
        to: &str,
        max_depth: usize,
    ) -> Vec<Vec<&'g RecipeNode>> {
        let starts = self.resolve(from, NodeKind::Ingredient);
        let ends = self.resolve(to, NodeKind::Ingredient);

        let mut paths = Vec::new();
        for &start in &starts {
            for &end in &ends {
                if let Some(path) = shortest_path(self.graph(), start, end, max_depth) {
                    paths.push(path);
                }
            }
        }

        debug!(
            "find_paths_between_ingredients({:?}, {:?}, depth={}) -> {} paths",
            from,
            to,
            max_depth,
            paths.len()
        );
        paths
    }
}

/// BFS from `start` to `end`. Returns the nodes along the path, both ends
/// included.
pub(crate) fn shortest_path<'g>(
    graph: &'g RecipeGraph,
    start: &'g RecipeNode,
    end: &'g RecipeNode,
    max_depth: usize,
) -> Option<Vec<&'g RecipeNode>> {
    if start.id == end.id {
        return Some(vec![start]);
    }

    let mut visited: HashSet<&'g str> = HashSet::new();
    let mut parents: HashMap<&'g str, &'g RecipeNode> = HashMap::new();
    let mut queue: VecDeque<(&'g RecipeNode, usize)> = VecDeque::new();

    visited.insert(start.id.as_str());
    queue.push_back((start, 0));

    while let Some((current, depth)) = queue.pop_front() {
        if depth >= max_depth {
            continue;
        }

        for neighbor in graph.neighbors(&current.id, None) {
            if !visited.insert(neighbor.id.as_str()) {
                continue;
            }
            parents.insert(neighbor.id.as_str(), current);

            if neighbor.id == end.id {
                return Some(walk_back(&parents, end));
            }
            queue.push_back((neighbor, depth + 1));
        }
    }

    None
}

fn walk_back<'g>(parents: &HashMap<&'g str, &'g RecipeNode>, end: &'g RecipeNode) -> Vec<&'g RecipeNode> {
    let mut path = vec![end];
    let mut current = end;
    while let Some(&parent) = parents.get(current.id.as_str()) {
        path.push(parent);
        current = parent;
    }
    path.reverse();
    path
}
