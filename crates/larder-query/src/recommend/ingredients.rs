//! Ingredient recommendations.

use super::{merge, names, Recommendation, RecommendationEngine, RecommendationKind};
use crate::engine::DEFAULT_MIN_COOCCURRENCE;
use larder_core::NodeKind;
use std::collections::HashSet;
use tracing::debug;

const MAX_PAIRINGS_LISTED: usize = 5;

impl<'g> RecommendationEngine<'g> {
    /// Recommends ingredients to add to the named dish: partners of the
    /// dish's ingredients that it does not already contain.
    ///
    /// Score grows with the logarithm of the co-occurrence count and caps
    /// at 1.0.
    pub fn ingredients_for_dish(&self, dish_name: &str, max: usize) -> Vec<Recommendation> {
        let mut recommendations = Vec::new();

        for dish in self.query.resolve(dish_name, NodeKind::Dish) {
            let ingredients = self.query.ingredients_of(dish);
            let own: HashSet<&str> = ingredients.iter().map(|i| i.id.as_str()).collect();

            for base in &ingredients {
                for (partner, count) in self.query.pairs_for_node(base, DEFAULT_MIN_COOCCURRENCE) {
                    if own.contains(partner.id.as_str()) {
                        continue;
                    }

                    recommendations.push(
                        Recommendation::new(
                            partner,
                            pairing_score(count),
                            format!("Pairs with {} in {} dishes", base.name, count),
                            RecommendationKind::PairingIngredient,
                        )
                        .with_meta("base_ingredient", base.name.as_str())
                        .with_meta("cooccurrence_count", count)
                        .with_meta("target_dish", dish.name.as_str()),
                    );
                }
            }
        }

        let recommendations = merge(recommendations, max);
        debug!("ingredients_for_dish({:?}) -> {} ingredients", dish_name, recommendations.len());
        recommendations
    }

    /// Recommends substitutes for an ingredient, scored by how alike their
    /// pairing partners are.
    pub fn substitutions(&self, ingredient: &str, max: usize) -> Vec<Recommendation> {
        let recommendations = self
            .query
            .ingredient_substitutions(ingredient)
            .into_iter()
            .map(|(substitute, score)| {
                let pairings: Vec<_> = self
                    .query
                    .pairs_for_node(substitute, DEFAULT_MIN_COOCCURRENCE)
                    .into_iter()
                    .map(|(partner, _)| partner)
                    .collect();

                Recommendation::new(
                    substitute,
                    score,
                    format!("Pairs like {} ({:.2})", ingredient, score),
                    RecommendationKind::Substitution,
                )
                .with_meta("original_ingredient", ingredient)
                .with_meta("substitution_score", score)
                .with_meta("common_pairings", names(&pairings, MAX_PAIRINGS_LISTED))
            })
            .collect();

        merge(recommendations, max)
    }
}

/// ln(count + 1) / 5, capped at 1.0.
fn pairing_score(cooccurrence: usize) -> f64 {
    ((cooccurrence as f64 + 1.0).ln() / 5.0).min(1.0)
}
