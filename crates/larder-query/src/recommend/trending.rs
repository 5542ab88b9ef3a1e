//! Ingredient combinations that recur across many dishes.
//!
//! Counting enumerates every ingredient pair of every dish, which is
//! quadratic in the ingredients per dish. That is fine for a few thousand
//! dishes; larger corpora should count pairs once at build time.

use super::RecommendationEngine;
use larder_core::NodeKind;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

const MAX_TRENDING: usize = 20;

/// Two ingredient names, in lexical order, and how many dishes use both.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrendingCombination {
    pub ingredients: [String; 2],
    pub count: usize,
}

impl<'g> RecommendationEngine<'g> {
    /// Ingredient pairs shared by at least `min_cooccurrence` dishes, most
    /// common first, at most twenty.
    pub fn trending_combinations(&self, min_cooccurrence: usize) -> Vec<TrendingCombination> {
        let mut counts: BTreeMap<(&'g str, &'g str), usize> = BTreeMap::new();

        for dish in self.query.graph().find_nodes_by_kind(NodeKind::Dish) {
            let ingredients = self.query.ingredients_of(dish);
            for (i, first) in ingredients.iter().enumerate() {
                for second in &ingredients[i + 1..] {
                    let (a, b) = (first.name.as_str(), second.name.as_str());
                    let pair = if a <= b { (a, b) } else { (b, a) };
                    *counts.entry(pair).or_insert(0) += 1;
                }
            }
        }

        let mut trending: Vec<TrendingCombination> = counts
            .into_iter()
            .filter(|(_, count)| *count >= min_cooccurrence)
            .map(|((a, b), count)| TrendingCombination {
                ingredients: [a.to_string(), b.to_string()],
                count,
            })
            .collect();
        trending.sort_by(|a, b| b.count.cmp(&a.count));
        trending.truncate(MAX_TRENDING);

        debug!("trending_combinations(min={}) -> {} pairs", min_cooccurrence, trending.len());
        trending
    }

    /// Trending combinations at the configured threshold.
    pub fn trending(&self) -> Vec<TrendingCombination> {
        self.trending_combinations(self.trending_min_cooccurrence)
    }
}
