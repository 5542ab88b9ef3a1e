//! Recommendation strategies built on the query primitives.
//!
//! Each strategy returns `Recommendation`s with a score, a templated
//! reason and strategy-specific metadata. Lists never hold two entries for
//! the same item name and are ordered by score, highest first; equal
//! scores keep the order the underlying primitive produced.

mod dishes;
mod ingredients;
mod trending;

pub use trending::TrendingCombination;

use crate::engine::QueryEngine;
use larder_core::{EngineConfig, RecipeNode};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

/// The strategy that produced a recommendation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationKind {
    ByIngredients,
    PairingIngredient,
    SimilarDish,
    ByCookingMethod,
    ByCategory,
    Substitution,
}

impl RecommendationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ByIngredients => "by_ingredients",
            Self::PairingIngredient => "pairing_ingredient",
            Self::SimilarDish => "similar_dish",
            Self::ByCookingMethod => "by_cooking_method",
            Self::ByCategory => "by_category",
            Self::Substitution => "substitution",
        }
    }
}

impl std::fmt::Display for RecommendationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A scored suggestion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recommendation {
    pub item: RecipeNode,
    pub score: f64,
    /// Short templated explanation of the score.
    pub reason: String,
    #[serde(default)]
    pub metadata: Map<String, Value>,
    pub strategy: RecommendationKind,
}

impl Recommendation {
    fn new(item: &RecipeNode, score: f64, reason: String, strategy: RecommendationKind) -> Self {
        Self {
            item: item.clone(),
            score,
            reason,
            metadata: Map::new(),
            strategy,
        }
    }

    fn with_meta(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.metadata.insert(key.to_string(), value.into());
        self
    }
}

/// What a user has and likes. Strategies run only for the fields that are
/// set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    pub available_ingredients: Option<Vec<String>>,
    pub preferred_cooking_methods: Option<Vec<String>>,
    pub preferred_categories: Option<Vec<String>>,
    pub favorite_dishes: Option<Vec<String>>,
}

/// Recommendation engine over one frozen graph.
#[derive(Debug, Clone, Copy)]
pub struct RecommendationEngine<'g> {
    query: QueryEngine<'g>,
    max_recommendations: usize,
    trending_min_cooccurrence: usize,
}

impl<'g> RecommendationEngine<'g> {
    pub fn new(query: QueryEngine<'g>) -> Self {
        Self::with_config(query, &EngineConfig::default())
    }

    pub fn with_config(query: QueryEngine<'g>, config: &EngineConfig) -> Self {
        Self {
            query,
            max_recommendations: config.max_recommendations,
            trending_min_cooccurrence: config.trending_min_cooccurrence,
        }
    }

    pub fn query(&self) -> &QueryEngine<'g> {
        &self.query
    }

    /// The configured default for the `max` argument of every strategy.
    pub fn max_recommendations(&self) -> usize {
        self.max_recommendations
    }

    /// Runs the strategies selected by `preferences`, then merges the
    /// results keeping the best score per item.
    pub fn hybrid(&self, preferences: &Preferences, max: usize) -> Vec<Recommendation> {
        let mut all = Vec::new();

        if let Some(available) = &preferences.available_ingredients {
            all.extend(self.dishes_by_ingredients(available.as_slice(), max));
        }
        for method in preferences.preferred_cooking_methods.iter().flatten() {
            all.extend(self.by_cooking_method(method, max));
        }
        for category in preferences.preferred_categories.iter().flatten() {
            all.extend(self.by_category(category, max));
        }
        for dish in preferences.favorite_dishes.iter().flatten() {
            all.extend(self.similar_dishes(dish, max));
        }

        let merged = merge(all, max);
        debug!("hybrid recommendation -> {} items", merged.len());
        merged
    }

    /// [`hybrid`](Self::hybrid) capped at the configured
    /// `max_recommendations`.
    pub fn hybrid_default(&self, preferences: &Preferences) -> Vec<Recommendation> {
        self.hybrid(preferences, self.max_recommendations)
    }
}

/// Keeps the best-scoring recommendation per item name, at the position
/// of the name's first appearance, then orders by score and truncates.
pub(crate) fn merge(recommendations: Vec<Recommendation>, max: usize) -> Vec<Recommendation> {
    let mut merged: Vec<Recommendation> = Vec::with_capacity(recommendations.len());
    for rec in recommendations {
        match merged.iter_mut().find(|kept| kept.item.name == rec.item.name) {
            Some(kept) if rec.score > kept.score => *kept = rec,
            Some(_) => {}
            None => merged.push(rec),
        }
    }
    merged.sort_by(|a, b| b.score.total_cmp(&a.score));
    merged.truncate(max);
    merged
}

/// Names of the first `limit` nodes, for metadata.
fn names(nodes: &[&RecipeNode], limit: usize) -> Vec<Value> {
    nodes
        .iter()
        .take(limit)
        .map(|n| Value::String(n.name.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::scenario;
    use larder_core::NodeKind;

    fn rec(name: &str, score: f64) -> Recommendation {
        Recommendation::new(
            &RecipeNode::new(NodeKind::Dish, name),
            score,
            String::new(),
            RecommendationKind::ByCategory,
        )
    }

    #[test]
    fn test_merge_keeps_best_per_name() {
        let merged = merge(
            vec![rec("a", 0.3), rec("b", 0.9), rec("a", 0.6), rec("c", 0.6)],
            10,
        );

        let summary: Vec<(&str, f64)> = merged.iter().map(|r| (r.item.name.as_str(), r.score)).collect();
        assert_eq!(summary, vec![("b", 0.9), ("a", 0.6), ("c", 0.6)]);
        assert_eq!(merge(merged, 1).len(), 1);
    }

    #[test]
    fn test_hybrid_without_preferences() {
        let indexed = scenario();
        let engine = RecommendationEngine::new(QueryEngine::new(&indexed));
        assert!(engine.hybrid(&Preferences::default(), 10).is_empty());
    }

    #[test]
    fn test_hybrid_merges_strategies() {
        let indexed = scenario();
        let engine = RecommendationEngine::new(QueryEngine::new(&indexed));

        let preferences = Preferences {
            available_ingredients: Some(vec!["tomato".into(), "egg".into()]),
            preferred_categories: Some(vec!["salad".into()]),
            ..Preferences::default()
        };
        let recs = engine.hybrid(&preferences, 10);

        assert_eq!(recs.len(), 3);
        assert_eq!(recs[0].item.name, "tomato egg stir fry");

        // the salad scores 0.5 by ingredients but 0.8 as a small salad
        let salad = recs.iter().find(|r| r.item.name == "tomato onion salad").unwrap();
        assert_eq!(salad.strategy, RecommendationKind::ByCategory);
        assert!((salad.score - 0.8).abs() < 1e-9);

        assert_eq!(engine.hybrid(&preferences, 2).len(), 2);
    }

    #[test]
    fn test_hybrid_default_uses_configured_limit() {
        let indexed = scenario();
        let preferences = Preferences {
            available_ingredients: Some(vec!["tomato".into()]),
            ..Preferences::default()
        };

        let engine = RecommendationEngine::new(QueryEngine::new(&indexed));
        assert_eq!(engine.max_recommendations(), 10);
        assert_eq!(engine.hybrid_default(&preferences).len(), 3);

        let config = EngineConfig {
            max_recommendations: 2,
            ..EngineConfig::default()
        };
        let limited = RecommendationEngine::with_config(QueryEngine::new(&indexed), &config);
        assert_eq!(limited.max_recommendations(), 2);
        assert_eq!(limited.hybrid_default(&preferences).len(), 2);
    }

    #[test]
    fn test_preferences_from_json() {
        let preferences: Preferences =
            serde_json::from_str(r#"{"favorite_dishes": ["tomato egg soup"]}"#).unwrap();
        assert!(preferences.available_ingredients.is_none());
        assert_eq!(preferences.favorite_dishes, Some(vec!["tomato egg soup".to_string()]));
    }
}
