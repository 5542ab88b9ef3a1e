//! Dish recommendations.

use super::{merge, names, Recommendation, RecommendationEngine, RecommendationKind};
use larder_core::{NodeKind, RecipeNode};
use larder_graph::EdgeKind;
use std::collections::{BTreeMap, HashSet};
use tracing::debug;

const MAX_MISSING_LISTED: usize = 5;
const MAX_METHODS_LISTED: usize = 3;

impl<'g> RecommendationEngine<'g> {
    /// Recommends dishes that use the available ingredients.
    ///
    /// Score is the share of the dish's ingredients that are available,
    /// boosted for dishes with a moderate ingredient count and damped for
    /// long ingredient lists.
    pub fn dishes_by_ingredients<S: AsRef<str>>(&self, available: &[S], max: usize) -> Vec<Recommendation> {
        let available_ids: HashSet<&str> = available
            .iter()
            .map(|name| name.as_ref().trim())
            .filter(|name| !name.is_empty())
            .flat_map(|name| self.query.resolve(name, NodeKind::Ingredient))
            .map(|node| node.id.as_str())
            .collect();

        let mut recommendations = Vec::new();
        for (dish, match_count) in self.query.find_dishes_by_ingredients(available, false) {
            let ingredients = self.query.ingredients_of(dish);
            let total = ingredients.len();
            let missing: Vec<&RecipeNode> = ingredients
                .iter()
                .copied()
                .filter(|i| !available_ids.contains(i.id.as_str()))
                .collect();
            let completion_rate = if total == 0 {
                0.0
            } else {
                match_count as f64 / total as f64
            };

            recommendations.push(
                Recommendation::new(
                    dish,
                    ingredient_match_score(match_count, total),
                    format!("Uses {} of your ingredients", match_count),
                    RecommendationKind::ByIngredients,
                )
                .with_meta("match_count", match_count)
                .with_meta("total_ingredients", total)
                .with_meta("completion_rate", completion_rate)
                .with_meta("missing_ingredients", names(&missing, MAX_MISSING_LISTED)),
            );
        }

        let recommendations = merge(recommendations, max);
        debug!("dishes_by_ingredients -> {} dishes", recommendations.len());
        recommendations
    }

    /// Recommends dishes similar to the named dish, scored by similarity.
    pub fn similar_dishes(&self, dish_name: &str, max: usize) -> Vec<Recommendation> {
        let recommendations = self
            .query
            .find_similar_dishes(dish_name, max)
            .into_iter()
            .map(|(dish, similarity)| {
                let methods = self.methods_of(dish);
                Recommendation::new(
                    dish,
                    similarity,
                    format!("Similar to {} ({:.2})", dish_name, similarity),
                    RecommendationKind::SimilarDish,
                )
                .with_meta("similarity_score", similarity)
                .with_meta("ingredient_count", self.query.ingredients_of(dish).len())
                .with_meta("cooking_methods", names(&methods, MAX_METHODS_LISTED))
            })
            .collect();

        merge(recommendations, max)
    }

    /// Recommends dishes built from ingredients typically cooked with the
    /// named method.
    ///
    /// Score is the share of the dish's ingredients that are typical for
    /// the method.
    pub fn by_cooking_method(&self, method: &str, max: usize) -> Vec<Recommendation> {
        let typical: Vec<&'g RecipeNode> = self
            .query
            .find_ingredients_by_cooking_method(method)
            .into_iter()
            .map(|(ingredient, _)| ingredient)
            .collect();
        let typical_ids: HashSet<&str> = typical.iter().map(|i| i.id.as_str()).collect();

        let mut dishes: BTreeMap<&str, &'g RecipeNode> = BTreeMap::new();
        for ingredient in &typical {
            for dish in self.query.dishes_containing(ingredient) {
                dishes.insert(dish.id.as_str(), dish);
            }
        }

        let mut recommendations = Vec::new();
        for dish in dishes.into_values() {
            let ingredients = self.query.ingredients_of(dish);
            let common = ingredients
                .iter()
                .filter(|i| typical_ids.contains(i.id.as_str()))
                .count();
            if common == 0 {
                continue;
            }

            recommendations.push(
                Recommendation::new(
                    dish,
                    common as f64 / ingredients.len() as f64,
                    format!("Has {} ingredients suited to {}", common, method),
                    RecommendationKind::ByCookingMethod,
                )
                .with_meta("cooking_method", method)
                .with_meta("common_ingredient_count", common)
                .with_meta("total_ingredients", ingredients.len()),
            );
        }

        let recommendations = merge(recommendations, max);
        debug!("by_cooking_method({:?}) -> {} dishes", method, recommendations.len());
        recommendations
    }

    /// Recommends dishes in the best-matching category, preferring dishes
    /// of moderate complexity.
    pub fn by_category(&self, category: &str, max: usize) -> Vec<Recommendation> {
        let Some(category_node) = self.query.resolve(category, NodeKind::Category).into_iter().next() else {
            return Vec::new();
        };

        let recommendations = self
            .query
            .linked(&category_node.id, EdgeKind::BelongsTo, NodeKind::Dish)
            .into_iter()
            .map(|dish| {
                let ingredient_count = self.query.ingredients_of(dish).len();
                let methods = self.methods_of(dish);
                Recommendation::new(
                    dish,
                    complexity_score(ingredient_count + methods.len()),
                    format!("In the {} category", category_node.name),
                    RecommendationKind::ByCategory,
                )
                .with_meta("category", category_node.name.as_str())
                .with_meta("ingredient_count", ingredient_count)
                .with_meta("cooking_methods", names(&methods, MAX_METHODS_LISTED))
                .with_meta("difficulty", dish.property_str("difficulty").unwrap_or("unknown"))
            })
            .collect();

        merge(recommendations, max)
    }

    fn methods_of(&self, dish: &RecipeNode) -> Vec<&'g RecipeNode> {
        self.query.linked(&dish.id, EdgeKind::UsesMethod, NodeKind::CookingMethod)
    }
}

/// (matched / total) times 1.2 for 3 to 8 ingredients, 0.8 above 10,
/// 1.0 otherwise.
fn ingredient_match_score(match_count: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }

    let factor = match total {
        3..=8 => 1.2,
        t if t > 10 => 0.8,
        _ => 1.0,
    };
    match_count as f64 / total as f64 * factor
}

/// 1.0 for 4 to 10 ingredients plus methods, 0.8 below, 0.6 above.
fn complexity_score(complexity: usize) -> f64 {
    match complexity {
        4..=10 => 1.0,
        0..=3 => 0.8,
        _ => 0.6,
    }
}
