//! Graph builder for constructing the recipe graph from extracted records.
//!
//! The builder works in two passes:
//! 1. `add_recipe` turns each record into a dish node, its entity nodes
//!    and the edges between them.
//! 2. `build` derives the relationships that need the whole corpus:
//!    ingredient pairings and dish similarity.

use crate::edge::{EdgeKind, RecipeEdge};
use crate::graph::RecipeGraph;
use larder_core::{jaccard, EngineConfig, NodeKind, RecipeNode, RecipeRecord};
use std::collections::{BTreeMap, HashSet};
use tracing::{debug, info};

/// Builds a `RecipeGraph` from recipe records.
pub struct GraphBuilder {
    graph: RecipeGraph,
    min_cooccurrence: usize,
    similarity_threshold: f64,
}

impl Default for GraphBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl GraphBuilder {
    /// Creates a builder with the default thresholds.
    pub fn new() -> Self {
        Self::with_config(&EngineConfig::default())
    }

    pub fn with_config(config: &EngineConfig) -> Self {
        Self {
            graph: RecipeGraph::new(),
            min_cooccurrence: config.min_cooccurrence_threshold,
            similarity_threshold: config.similarity_threshold,
        }
    }

    /// Adds one recipe. Returns the dish id, or `None` if the record has
    /// no name.
    ///
    /// Entity nodes shared between recipes are created once; the first
    /// recipe to mention an entity decides its display name.
    pub fn add_recipe(&mut self, record: &RecipeRecord) -> Option<String> {
        let dish_name = record.name.trim();
        if dish_name.is_empty() {
            return None;
        }

        let mut dish = RecipeNode::new(NodeKind::Dish, dish_name);
        dish.properties.extend(record.properties.clone());
        if let Some(category) = &record.category {
            dish = dish.with_property("category", category.as_str());
        }
        if let Some(difficulty) = &record.difficulty {
            dish = dish.with_property("difficulty", difficulty.as_str());
        }
        let dish_id = dish.id.clone();
        self.graph.add_node(dish);

        let links = [
            (NodeKind::Ingredient, EdgeKind::Contains, &record.ingredients),
            (NodeKind::CookingMethod, EdgeKind::UsesMethod, &record.cooking_methods),
            (NodeKind::Tool, EdgeKind::RequiresTool, &record.tools),
            (NodeKind::Seasoning, EdgeKind::UsesSeasoning, &record.seasonings),
        ];
        for (node_kind, edge_kind, names) in links {
            for name in names {
                self.link(&dish_id, node_kind, edge_kind, name);
            }
        }
        if let Some(category) = &record.category {
            self.link(&dish_id, NodeKind::Category, EdgeKind::BelongsTo, category);
        }

        debug!("Added recipe {}", dish_id);
        Some(dish_id)
    }

    /// Adds many recipes.
    pub fn add_recipes<'r>(&mut self, records: impl IntoIterator<Item = &'r RecipeRecord>) {
        for record in records {
            self.add_recipe(record);
        }
    }

    /// Derives pairings and similarities and returns the finished graph.
    pub fn build(mut self) -> RecipeGraph {
        let pairings = self.derive_pairings();
        let similarities = self.derive_similarities();

        info!(
            "Built recipe graph: {} nodes, {} edges ({} pairings, {} similarities)",
            self.graph.node_count(),
            self.graph.edge_count(),
            pairings,
            similarities
        );
        self.graph
    }

    fn link(&mut self, dish_id: &str, node_kind: NodeKind, edge_kind: EdgeKind, name: &str) {
        let name = name.trim();
        if name.is_empty() {
            return;
        }

        let id = RecipeNode::make_id(node_kind, name);
        if !self.graph.contains_node(&id) {
            self.graph.add_node(RecipeNode::with_id(id.clone(), node_kind, name));
        }
        self.graph.add_edge(RecipeEdge::new(dish_id, id, edge_kind));
    }

    /// Sorted ingredient ids of every dish, dishes in id order.
    fn dish_ingredients(&self) -> Vec<(String, Vec<String>)> {
        self.graph
            .find_nodes_by_kind(NodeKind::Dish)
            .into_iter()
            .map(|dish| {
                let ingredients = self
                    .graph
                    .neighbors(&dish.id, Some(EdgeKind::Contains))
                    .into_iter()
                    .filter(|n| n.kind == NodeKind::Ingredient)
                    .map(|n| n.id.clone())
                    .collect();
                (dish.id.clone(), ingredients)
            })
            .collect()
    }

    /// Adds a PairsWith edge for every ingredient pair sharing enough
    /// dishes. Weight is the number of shared dishes.
    fn derive_pairings(&mut self) -> usize {
        let mut cooccurrence: BTreeMap<(String, String), usize> = BTreeMap::new();

        for (_, ingredients) in self.dish_ingredients() {
            for (i, first) in ingredients.iter().enumerate() {
                for second in &ingredients[i + 1..] {
                    *cooccurrence.entry((first.clone(), second.clone())).or_insert(0) += 1;
                }
            }
        }

        let mut added = 0;
        for ((first, second), count) in cooccurrence {
            if count >= self.min_cooccurrence
                && self.graph.add_edge(
                    RecipeEdge::new(first, second, EdgeKind::PairsWith).with_weight(count as f64),
                )
            {
                added += 1;
            }
        }
        added
    }

    /// Adds a SimilarTo edge between dishes whose ingredient sets overlap
    /// by more than the threshold. Weight is the Jaccard similarity.
    fn derive_similarities(&mut self) -> usize {
        let dishes: Vec<(String, HashSet<String>)> = self
            .dish_ingredients()
            .into_iter()
            .map(|(id, ingredients)| (id, ingredients.into_iter().collect()))
            .collect();

        let mut added = 0;
        for (i, (first, first_set)) in dishes.iter().enumerate() {
            for (second, second_set) in &dishes[i + 1..] {
                let similarity = jaccard(first_set, second_set);
                if similarity > self.similarity_threshold
                    && self.graph.add_edge(
                        RecipeEdge::new(first.as_str(), second.as_str(), EdgeKind::SimilarTo)
                            .with_weight(similarity),
                    )
                {
                    added += 1;
                }
            }
        }
        added
    }
}
