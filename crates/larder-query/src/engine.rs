//! Read-only analytic primitives over an indexed recipe graph.
//!
//! Every primitive that takes a name first resolves it to nodes with
//! `search_nodes`, so results for one query may aggregate over several
//! matching nodes. Counting goes through ordered maps and sorts are
//! stable, so equal scores come back in node id order.

use larder_core::{jaccard, EngineConfig, NodeKind, RecipeNode};
use larder_graph::{EdgeKind, GraphIndex, IndexedGraph, RecipeGraph};
use std::collections::{BTreeMap, HashSet};
use tracing::debug;

pub const DEFAULT_SEARCH_LIMIT: usize = 10;
pub const DEFAULT_MIN_COOCCURRENCE: usize = 2;
pub const DEFAULT_SIMILAR_LIMIT: usize = 5;
pub const DEFAULT_MAX_DEPTH: usize = 3;

/// Substitutes must score above this.
const SUBSTITUTION_THRESHOLD: f64 = 0.1;
const MAX_SUBSTITUTIONS: usize = 10;

/// Query engine over one frozen graph.
#[derive(Debug, Clone, Copy)]
pub struct QueryEngine<'g> {
    graph: &'g RecipeGraph,
    index: &'g GraphIndex,
    /// How many nodes a name may resolve to inside composite queries.
    resolve_limit: usize,
}

impl<'g> QueryEngine<'g> {
    pub fn new(indexed: &'g IndexedGraph) -> Self {
        Self {
            graph: indexed.graph(),
            index: indexed.index(),
            resolve_limit: DEFAULT_SEARCH_LIMIT,
        }
    }

    /// Creates an engine that resolves names with the configured search
    /// limit.
    pub fn with_config(indexed: &'g IndexedGraph, config: &EngineConfig) -> Self {
        Self {
            resolve_limit: config.max_search_results,
            ..Self::new(indexed)
        }
    }

    pub fn graph(&self) -> &'g RecipeGraph {
        self.graph
    }

    pub fn index(&self) -> &'g GraphIndex {
        self.index
    }

    /// Searches nodes by name.
    ///
    /// Candidates come from the name index (any key containing `query`),
    /// optionally restricted to one kind, then ranked by
    /// [`name_similarity`]. Returns at most `limit` nodes. An empty query
    /// is a substring of every key, so it ranks every node.
    pub fn search_nodes(&self, query: &str, kind: Option<NodeKind>, limit: usize) -> Vec<&'g RecipeNode> {
        let mut candidates = self.index.name_candidates(query);
        if let Some(kind) = kind {
            match self.index.ids_of_kind(kind) {
                Some(ids) => candidates.retain(|id| ids.contains(*id)),
                None => candidates.clear(),
            }
        }

        let mut ranked: Vec<(&'g RecipeNode, f64)> = candidates
            .into_iter()
            .filter_map(|id| self.graph.node(id))
            .map(|node| (node, name_similarity(query, &node.name)))
            .collect();
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.id.cmp(&b.0.id)));
        ranked.truncate(limit);

        debug!("search_nodes({:?}, {:?}) -> {} nodes", query, kind, ranked.len());
        ranked.into_iter().map(|(node, _)| node).collect()
    }

    /// Resolves a name to nodes of one kind, best match first.
    pub fn resolve(&self, name: &str, kind: NodeKind) -> Vec<&'g RecipeNode> {
        self.search_nodes(name, Some(kind), self.resolve_limit)
    }

    /// Finds ingredients that share dishes with the named ingredient.
    ///
    /// Counts are summed over every node the name resolves to; pairs below
    /// `min_cooccurrence` are dropped. Highest count first.
    pub fn find_ingredient_pairs(&self, name: &str, min_cooccurrence: usize) -> Vec<(&'g RecipeNode, usize)> {
        let mut counts: BTreeMap<&'g str, usize> = BTreeMap::new();
        for ingredient in self.resolve(name, NodeKind::Ingredient) {
            self.count_cooccurrences(ingredient, &mut counts);
        }

        let pairs = self.ranked_counts(counts, min_cooccurrence);
        debug!("find_ingredient_pairs({:?}) -> {} pairs", name, pairs.len());
        pairs
    }

    /// Same as [`find_ingredient_pairs`](Self::find_ingredient_pairs) for a
    /// single, already resolved ingredient node.
    pub fn pairs_for_node(&self, ingredient: &RecipeNode, min_cooccurrence: usize) -> Vec<(&'g RecipeNode, usize)> {
        let mut counts = BTreeMap::new();
        self.count_cooccurrences(ingredient, &mut counts);
        self.ranked_counts(counts, min_cooccurrence)
    }

    /// Finds dishes containing the named ingredients.
    ///
    /// A dish's match count is the number of distinct resolved ingredient
    /// nodes it contains, so one name may match several ingredients of the
    /// same dish. With `require_all`, dishes that miss any input name are
    /// dropped.
    pub fn find_dishes_by_ingredients<S: AsRef<str>>(
        &self,
        names: &[S],
        require_all: bool,
    ) -> Vec<(&'g RecipeNode, usize)> {
        let names = distinct_names(names);

        // dish id -> (matched ingredient ids, names covered)
        let mut matches: BTreeMap<&'g str, (HashSet<&'g str>, usize)> = BTreeMap::new();
        for name in &names {
            let mut covered: HashSet<&'g str> = HashSet::new();
            for ingredient in self.resolve(name, NodeKind::Ingredient) {
                for dish in self.dishes_containing(ingredient) {
                    let entry = matches.entry(dish.id.as_str()).or_default();
                    entry.0.insert(ingredient.id.as_str());
                    if covered.insert(dish.id.as_str()) {
                        entry.1 += 1;
                    }
                }
            }
        }

        let counts: BTreeMap<&'g str, usize> = matches
            .into_iter()
            .filter(|(_, (_, covered))| !require_all || *covered == names.len())
            .map(|(dish, (ingredients, _))| (dish, ingredients.len()))
            .collect();
        let dishes = self.ranked_counts(counts, 1);
        debug!(
            "find_dishes_by_ingredients({:?}, require_all={}) -> {} dishes",
            names,
            require_all,
            dishes.len()
        );
        dishes
    }

    /// Finds dishes linked to the named dish by a SimilarTo edge, in either
    /// direction. Keeps the highest weight per dish, best first.
    pub fn find_similar_dishes(&self, name: &str, limit: usize) -> Vec<(&'g RecipeNode, f64)> {
        let mut similar = Vec::new();
        for dish in self.resolve(name, NodeKind::Dish) {
            similar.extend(self.similar_to(dish));
        }

        let mut similar = keep_best_by_name(similar);
        similar.truncate(limit);
        debug!("find_similar_dishes({:?}) -> {} dishes", name, similar.len());
        similar
    }

    /// Counts the cooking methods of dishes that contain the ingredient.
    pub fn find_cooking_methods_for_ingredient(&self, name: &str) -> Vec<(&'g RecipeNode, usize)> {
        let methods = self.two_hop(
            name,
            (NodeKind::Ingredient, EdgeKind::Contains),
            (NodeKind::CookingMethod, EdgeKind::UsesMethod),
        );
        debug!("find_cooking_methods_for_ingredient({:?}) -> {} methods", name, methods.len());
        methods
    }

    /// Counts the ingredients of dishes cooked with the method.
    pub fn find_ingredients_by_cooking_method(&self, name: &str) -> Vec<(&'g RecipeNode, usize)> {
        let ingredients = self.two_hop(
            name,
            (NodeKind::CookingMethod, EdgeKind::UsesMethod),
            (NodeKind::Ingredient, EdgeKind::Contains),
        );
        debug!("find_ingredients_by_cooking_method({:?}) -> {} ingredients", name, ingredients.len());
        ingredients
    }

    /// Suggests substitutes for an ingredient.
    ///
    /// Candidates are the ingredient's pairing partners. A candidate scores
    /// the Jaccard similarity of the two ingredients' pairing partner sets.
    pub fn ingredient_substitutions(&self, name: &str) -> Vec<(&'g RecipeNode, f64)> {
        let mut suggestions = Vec::new();
        for ingredient in self.resolve(name, NodeKind::Ingredient) {
            suggestions.extend(self.substitutions_for_node(ingredient));
        }

        let mut suggestions = keep_best_by_name(suggestions);
        suggestions.truncate(MAX_SUBSTITUTIONS);
        debug!("ingredient_substitutions({:?}) -> {} suggestions", name, suggestions.len());
        suggestions
    }

    /// Substitutes for one resolved ingredient node, unsorted.
    pub(crate) fn substitutions_for_node(&self, ingredient: &RecipeNode) -> Vec<(&'g RecipeNode, f64)> {
        let partners = self.pairing_partners(&ingredient.id);
        self.graph
            .neighbors(&ingredient.id, Some(EdgeKind::PairsWith))
            .into_iter()
            .map(|candidate| (candidate, jaccard(&partners, &self.pairing_partners(&candidate.id))))
            .filter(|(_, score)| *score > SUBSTITUTION_THRESHOLD)
            .collect()
    }

    /// Cooking methods of the dishes containing one resolved ingredient
    /// node, with counts.
    pub(crate) fn methods_for_node(&self, ingredient: &RecipeNode) -> Vec<(&'g RecipeNode, usize)> {
        let mut counts = BTreeMap::new();
        self.count_two_hop(
            ingredient,
            EdgeKind::Contains,
            (NodeKind::CookingMethod, EdgeKind::UsesMethod),
            &mut counts,
        );
        self.ranked_counts(counts, 1)
    }

    /// Dishes linked to `dish` by SimilarTo edges, with the edge weight.
    pub(crate) fn similar_to(&self, dish: &RecipeNode) -> Vec<(&'g RecipeNode, f64)> {
        let outgoing = self
            .graph
            .edges_from(&dish.id, None, Some(EdgeKind::SimilarTo))
            .into_iter()
            .map(|edge| (edge.target.as_str(), edge.weight));
        let incoming = self
            .index
            .incoming(self.graph, &dish.id, Some(EdgeKind::SimilarTo))
            .into_iter()
            .map(|edge| (edge.source.as_str(), edge.weight));

        outgoing
            .chain(incoming)
            .filter(|(id, _)| *id != dish.id)
            .filter_map(|(id, weight)| self.graph.node(id).map(|node| (node, weight)))
            .collect()
    }

    /// Dish nodes holding a Contains edge to `ingredient`.
    pub(crate) fn dishes_containing(&self, ingredient: &RecipeNode) -> Vec<&'g RecipeNode> {
        self.linked(&ingredient.id, EdgeKind::Contains, NodeKind::Dish)
    }

    /// Ingredient nodes of a dish.
    pub(crate) fn ingredients_of(&self, dish: &RecipeNode) -> Vec<&'g RecipeNode> {
        self.linked(&dish.id, EdgeKind::Contains, NodeKind::Ingredient)
    }

    /// Neighbours over one edge kind, restricted to one node kind.
    pub(crate) fn linked(&self, id: &str, edge: EdgeKind, kind: NodeKind) -> Vec<&'g RecipeNode> {
        self.graph
            .neighbors(id, Some(edge))
            .into_iter()
            .filter(|node| node.kind == kind)
            .collect()
    }

    fn pairing_partners(&self, id: &str) -> HashSet<&'g str> {
        self.graph
            .neighbors(id, Some(EdgeKind::PairsWith))
            .into_iter()
            .map(|node| node.id.as_str())
            .collect()
    }

    fn count_cooccurrences(&self, ingredient: &RecipeNode, counts: &mut BTreeMap<&'g str, usize>) {
        for dish in self.dishes_containing(ingredient) {
            for other in self.ingredients_of(dish) {
                if other.id != ingredient.id {
                    *counts.entry(other.id.as_str()).or_insert(0) += 1;
                }
            }
        }
    }

    /// Resolves `name` as `start.0`, walks `start.1` edges to dishes, then
    /// counts the `end.0` nodes reached over `end.1` edges.
    fn two_hop(
        &self,
        name: &str,
        start: (NodeKind, EdgeKind),
        end: (NodeKind, EdgeKind),
    ) -> Vec<(&'g RecipeNode, usize)> {
        let mut counts: BTreeMap<&'g str, usize> = BTreeMap::new();
        for node in self.resolve(name, start.0) {
            self.count_two_hop(node, start.1, end, &mut counts);
        }
        self.ranked_counts(counts, 1)
    }

    fn count_two_hop(
        &self,
        node: &RecipeNode,
        to_dish: EdgeKind,
        end: (NodeKind, EdgeKind),
        counts: &mut BTreeMap<&'g str, usize>,
    ) {
        for dish in self.linked(&node.id, to_dish, NodeKind::Dish) {
            for reached in self.linked(&dish.id, end.1, end.0) {
                *counts.entry(reached.id.as_str()).or_insert(0) += 1;
            }
        }
    }

    /// Turns id counts into nodes, keeping counts of at least `min`,
    /// highest count first.
    fn ranked_counts(&self, counts: BTreeMap<&'g str, usize>, min: usize) -> Vec<(&'g RecipeNode, usize)> {
        let mut ranked: Vec<(&'g RecipeNode, usize)> = counts
            .into_iter()
            .filter(|(_, count)| *count >= min)
            .filter_map(|(id, count)| self.graph.node(id).map(|node| (node, count)))
            .collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked
    }
}

/// Scores how well `name` matches `query`, case-insensitively.
///
/// 1.0 for an exact match, 0.8 when `query` is a substring of `name`,
/// otherwise the Jaccard similarity of the two character sets (0.0 when
/// either is empty). An empty query is a substring of any name.
pub fn name_similarity(query: &str, name: &str) -> f64 {
    let query = query.to_lowercase();
    let name = name.to_lowercase();

    if query == name {
        return 1.0;
    }
    if name.contains(&query) {
        return 0.8;
    }

    let query_chars: HashSet<char> = query.chars().collect();
    let name_chars: HashSet<char> = name.chars().collect();
    jaccard(&query_chars, &name_chars)
}

/// Trimmed, non-empty names with case-insensitive duplicates removed, in
/// input order.
fn distinct_names<S: AsRef<str>>(names: &[S]) -> Vec<String> {
    let mut seen = HashSet::new();
    names
        .iter()
        .map(|name| name.as_ref().trim())
        .filter(|name| !name.is_empty() && seen.insert(name.to_lowercase()))
        .map(str::to_string)
        .collect()
}

/// Keeps the highest score per node name at the position of its first
/// occurrence, then sorts by score, highest first.
pub(crate) fn keep_best_by_name<'g>(scored: Vec<(&'g RecipeNode, f64)>) -> Vec<(&'g RecipeNode, f64)> {
    let mut best: Vec<(&'g RecipeNode, f64)> = Vec::with_capacity(scored.len());
    for (node, score) in scored {
        match best.iter_mut().find(|(kept, _)| kept.name == node.name) {
            Some(entry) if score > entry.1 => *entry = (node, score),
            Some(_) => {}
            None => best.push((node, score)),
        }
    }
    best.sort_by(|a, b| b.1.total_cmp(&a.1));
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{eggy, pantry, scenario};

    fn names<T>(results: &[(&RecipeNode, T)]) -> Vec<String> {
        results.iter().map(|(node, _)| node.name.clone()).collect()
    }

    #[test]
    fn test_name_similarity() {
        assert_eq!(name_similarity("Tomato", "tomato"), 1.0);
        assert_eq!(name_similarity("egg", "tomato egg soup"), 0.8);
        assert!((name_similarity("abc", "abd") - 0.5).abs() < 1e-9);
        assert_eq!(name_similarity("", "tomato"), 0.8);
        assert_eq!(name_similarity("tomato", ""), 0.0);
    }

    #[test]
    fn test_search_ranks_exact_match_first() {
        let indexed = scenario();
        let engine = QueryEngine::new(&indexed);

        let results = engine.search_nodes("tomato", None, 10);
        assert_eq!(results[0].id, "ingredient_tomato");
        // ingredient + three dish names
        assert_eq!(results.len(), 4);
    }

    #[test]
    fn test_search_filters_by_kind_and_limit() {
        let indexed = scenario();
        let engine = QueryEngine::new(&indexed);

        let dishes = engine.search_nodes("tomato", Some(NodeKind::Dish), 10);
        assert_eq!(dishes.len(), 3);
        assert!(dishes.iter().all(|n| n.kind == NodeKind::Dish));

        assert_eq!(engine.search_nodes("tomato", Some(NodeKind::Dish), 2).len(), 2);
        assert!(engine.search_nodes("tomato", Some(NodeKind::Tool), 10).is_empty());
    }

    #[test]
    fn test_search_empty_query_matches_everything() {
        let indexed = scenario();
        let engine = QueryEngine::new(&indexed);

        let total = indexed.graph().node_count();
        assert_eq!(engine.search_nodes("", None, 100).len(), total);
        assert_eq!(engine.search_nodes("", Some(NodeKind::Dish), 100).len(), 3);
        assert_eq!(engine.search_nodes("", None, 2).len(), 2);
    }

    #[test]
    fn test_resolve_limit_from_config() {
        let indexed = scenario();
        let config = EngineConfig {
            max_search_results: 1,
            ..EngineConfig::default()
        };
        let engine = QueryEngine::with_config(&indexed, &config);
        assert_eq!(engine.resolve("tomato", NodeKind::Dish).len(), 1);
    }

    #[test]
    fn test_ingredient_pairs() {
        let indexed = scenario();
        let engine = QueryEngine::new(&indexed);

        let pairs = engine.find_ingredient_pairs("tomato", 2);
        assert_eq!(names(&pairs), vec!["egg", "onion"]);
        assert!(pairs.iter().all(|(_, count)| *count == 2));

        let egg = engine.find_ingredient_pairs("egg", 1);
        assert_eq!(names(&egg), vec!["tomato", "onion"]);
        assert_eq!(egg[1].1, 1);
    }

    #[test]
    fn test_pairs_for_unknown_ingredient() {
        let indexed = scenario();
        let engine = QueryEngine::new(&indexed);
        assert!(engine.find_ingredient_pairs("saffron", 1).is_empty());
    }

    #[test]
    fn test_dishes_by_ingredients() {
        let indexed = scenario();
        let engine = QueryEngine::new(&indexed);

        let any = engine.find_dishes_by_ingredients(&["tomato", "egg"], false);
        assert_eq!(any.len(), 3);
        assert_eq!(any[2].0.name, "tomato onion salad");
        assert_eq!(any[2].1, 1);

        let all = engine.find_dishes_by_ingredients(&["tomato", "egg"], true);
        assert_eq!(names(&all), vec!["tomato egg soup", "tomato egg stir fry"]);
        assert!(all.iter().all(|(_, count)| *count == 2));
    }

    #[test]
    fn test_dishes_by_ingredients_ignores_duplicate_names() {
        let indexed = scenario();
        let engine = QueryEngine::new(&indexed);

        let all = engine.find_dishes_by_ingredients(&["egg", "Egg", " "], true);
        assert_eq!(all.len(), 2);
        assert!(engine.find_dishes_by_ingredients::<&str>(&[], false).is_empty());
    }

    #[test]
    fn test_match_count_covers_every_resolved_ingredient() {
        let indexed = eggy();
        let engine = QueryEngine::new(&indexed);

        // "egg" resolves to both egg and eggplant
        let dishes = engine.find_dishes_by_ingredients(&["egg"], false);
        assert_eq!(names(&dishes), vec!["eggy bake"]);
        assert_eq!(dishes[0].1, 2);

        assert_eq!(engine.find_dishes_by_ingredients(&["egg"], true)[0].1, 2);
        // two matched ingredients still cover only one of two names
        assert!(engine.find_dishes_by_ingredients(&["egg", "rice"], true).is_empty());
        let both = engine.find_dishes_by_ingredients(&["egg", "cheese"], true);
        assert_eq!(both[0].1, 3);
    }

    #[test]
    fn test_similar_dishes_follow_both_directions() {
        let indexed = scenario();
        let engine = QueryEngine::new(&indexed);

        // stir fry only has an incoming edge from soup and an outgoing one to salad
        let similar = engine.find_similar_dishes("stir fry", 5);
        assert_eq!(names(&similar), vec!["tomato egg soup", "tomato onion salad"]);
        assert!((similar[0].1 - 2.0 / 3.0).abs() < 1e-9);
        assert!((similar[1].1 - 1.0 / 3.0).abs() < 1e-9);

        assert_eq!(engine.find_similar_dishes("stir fry", 1).len(), 1);
    }

    #[test]
    fn test_two_hop_counts() {
        let indexed = scenario();
        let engine = QueryEngine::new(&indexed);

        let methods = engine.find_cooking_methods_for_ingredient("tomato");
        assert_eq!(methods.len(), 3);
        assert!(methods.iter().all(|(n, c)| n.kind == NodeKind::CookingMethod && *c == 1));

        let ingredients = engine.find_ingredients_by_cooking_method("boil");
        assert_eq!(names(&ingredients), vec!["egg", "onion", "tomato"]);
    }

    #[test]
    fn test_substitutions() {
        let indexed = pantry();
        let engine = QueryEngine::new(&indexed);

        let subs = engine.ingredient_substitutions("egg");
        assert_eq!(names(&subs), vec!["milk", "butter", "flour"]);
        assert!((subs[0].1 - 0.5).abs() < 1e-9);
        assert!((subs[1].1 - 0.4).abs() < 1e-9);
        assert!(subs.iter().all(|(_, s)| *s > 0.1 && *s <= 1.0));
    }

    #[test]
    fn test_keep_best_by_name() {
        let a = RecipeNode::new(NodeKind::Dish, "a");
        let b = RecipeNode::new(NodeKind::Dish, "b");

        let merged = keep_best_by_name(vec![(&a, 0.2), (&b, 0.5), (&a, 0.7), (&b, 0.1)]);
        assert_eq!(names(&merged), vec!["a", "b"]);
        assert_eq!(merged[0].1, 0.7);
        assert_eq!(merged[1].1, 0.5);
    }
}
