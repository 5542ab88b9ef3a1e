//! Neighbourhood summaries for a single ingredient, dish or cooking method.

use crate::engine::{keep_best_by_name, QueryEngine, DEFAULT_MIN_COOCCURRENCE};
use larder_core::{NodeKind, RecipeNode};
use larder_graph::EdgeKind;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

const TOP_PAIRINGS: usize = 10;
const TOP_METHODS: usize = 10;
const TOP_INGREDIENTS: usize = 10;
const TOP_SUBSTITUTIONS: usize = 5;

/// Pair counts at or above this score 1.0 in the compatibility matrix.
const FULL_COMPATIBILITY_COUNT: f64 = 10.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngredientProfile {
    pub ingredient: String,
    /// Dishes containing any matching ingredient.
    pub total_dishes: usize,
    pub common_pairings: Vec<(String, usize)>,
    pub cooking_methods: Vec<(String, usize)>,
    pub categories: Vec<String>,
    pub substitutions: Vec<(String, f64)>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DishProfile {
    pub dish: String,
    pub total_ingredients: usize,
    pub cooking_methods: Vec<String>,
    pub categories: Vec<String>,
    /// Similar dishes with their similarity, most similar first.
    pub similar_dishes: Vec<(String, f64)>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodProfile {
    pub method: String,
    pub total_dishes: usize,
    pub common_ingredients: Vec<(String, usize)>,
    pub categories: Vec<String>,
}

impl<'g> QueryEngine<'g> {
    /// Summarizes how an ingredient is used. `None` if the name matches no
    /// ingredient.
    ///
    /// Categories come from the ingredient's own `category` property and
    /// from the categories of the dishes that contain it.
    pub fn analyze_ingredient(&self, name: &str) -> Option<IngredientProfile> {
        let ingredients = self.resolve(name, NodeKind::Ingredient);
        if ingredients.is_empty() {
            return None;
        }

        let mut total_dishes = 0;
        let mut pairings = BTreeMap::new();
        let mut methods = BTreeMap::new();
        let mut substitutions: Vec<(&RecipeNode, f64)> = Vec::new();
        let mut categories = BTreeSet::new();

        for ingredient in ingredients {
            let dishes = self.dishes_containing(ingredient);
            total_dishes += dishes.len();

            merge_max(&mut pairings, self.pairs_for_node(ingredient, DEFAULT_MIN_COOCCURRENCE));
            merge_max(&mut methods, self.methods_for_node(ingredient));
            substitutions.extend(self.substitutions_for_node(ingredient));

            if let Some(category) = ingredient.property_str("category") {
                categories.insert(category.to_string());
            }
            for dish in dishes {
                categories.extend(self.category_names(dish));
            }
        }

        let substitutions = keep_best_by_name(substitutions);

        debug!("analyze_ingredient({:?}): {} dishes", name, total_dishes);
        Some(IngredientProfile {
            ingredient: name.to_string(),
            total_dishes,
            common_pairings: top_counts(pairings, TOP_PAIRINGS),
            cooking_methods: top_counts(methods, TOP_METHODS),
            categories: categories.into_iter().collect(),
            substitutions: substitutions
                .into_iter()
                .take(TOP_SUBSTITUTIONS)
                .map(|(node, score)| (node.name.clone(), score))
                .collect(),
        })
    }

    /// Summarizes a dish. `None` if the name matches no dish.
    pub fn analyze_dish(&self, name: &str) -> Option<DishProfile> {
        let dishes = self.resolve(name, NodeKind::Dish);
        if dishes.is_empty() {
            return None;
        }

        let mut total_ingredients = 0;
        let mut methods = BTreeSet::new();
        let mut categories = BTreeSet::new();
        let mut similar = Vec::new();

        for dish in dishes {
            total_ingredients += self.ingredients_of(dish).len();
            methods.extend(
                self.linked(&dish.id, EdgeKind::UsesMethod, NodeKind::CookingMethod)
                    .into_iter()
                    .map(|m| m.name.clone()),
            );
            categories.extend(self.category_names(dish));
            similar.extend(self.similar_to(dish));
        }

        let similar_dishes = keep_best_by_name(similar)
            .into_iter()
            .map(|(node, weight)| (node.name.clone(), weight))
            .collect();

        Some(DishProfile {
            dish: name.to_string(),
            total_ingredients,
            cooking_methods: methods.into_iter().collect(),
            categories: categories.into_iter().collect(),
            similar_dishes,
        })
    }

    /// Summarizes a cooking method. `None` if the name matches no method.
    pub fn analyze_cooking_method(&self, name: &str) -> Option<MethodProfile> {
        let methods = self.resolve(name, NodeKind::CookingMethod);
        if methods.is_empty() {
            return None;
        }

        let mut total_dishes = 0;
        let mut ingredients: BTreeMap<String, usize> = BTreeMap::new();
        let mut categories = BTreeSet::new();

        for method in methods {
            let dishes = self.linked(&method.id, EdgeKind::UsesMethod, NodeKind::Dish);
            total_dishes += dishes.len();

            for dish in dishes {
                for ingredient in self.ingredients_of(dish) {
                    *ingredients.entry(ingredient.name.clone()).or_insert(0) += 1;
                }
                categories.extend(self.category_names(dish));
            }
        }

        Some(MethodProfile {
            method: name.to_string(),
            total_dishes,
            common_ingredients: top_counts(ingredients, TOP_INGREDIENTS),
            categories: categories.into_iter().collect(),
        })
    }

    /// Pairwise compatibility of ingredients: 1.0 with itself, otherwise
    /// the pairing count divided by ten, capped at 1.0.
    pub fn compatibility_matrix<S: AsRef<str>>(&self, names: &[S]) -> BTreeMap<String, BTreeMap<String, f64>> {
        let mut matrix = BTreeMap::new();

        for first in names {
            let first = first.as_ref();
            let counts: BTreeMap<&str, usize> = self
                .find_ingredient_pairs(first, DEFAULT_MIN_COOCCURRENCE)
                .into_iter()
                .map(|(node, count)| (node.name.as_str(), count))
                .collect();

            let row = names
                .iter()
                .map(|second| {
                    let second = second.as_ref();
                    let score = if first == second {
                        1.0
                    } else {
                        let count = counts.get(second).copied().unwrap_or(0) as f64;
                        (count / FULL_COMPATIBILITY_COUNT).min(1.0)
                    };
                    (second.to_string(), score)
                })
                .collect();
            matrix.insert(first.to_string(), row);
        }

        matrix
    }

    fn category_names(&self, dish: &RecipeNode) -> Vec<String> {
        self.linked(&dish.id, EdgeKind::BelongsTo, NodeKind::Category)
            .into_iter()
            .map(|c| c.name.clone())
            .collect()
    }
}

/// Adds counts keyed by node name, keeping the larger count on collision.
fn merge_max(into: &mut BTreeMap<String, usize>, counts: Vec<(&RecipeNode, usize)>) {
    for (node, count) in counts {
        let entry = into.entry(node.name.clone()).or_insert(0);
        *entry = (*entry).max(count);
    }
}

/// Highest counts first, names ascending among equals.
fn top_counts(counts: BTreeMap<String, usize>, limit: usize) -> Vec<(String, usize)> {
    let mut ranked: Vec<(String, usize)> = counts.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked.truncate(limit);
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{eggy, pantry, scenario};

    #[test]
    fn test_analyze_ingredient() {
        let indexed = scenario();
        let engine = QueryEngine::new(&indexed);

        let profile = engine.analyze_ingredient("egg").unwrap();
        assert_eq!(profile.total_dishes, 2);
        assert_eq!(profile.common_pairings, vec![("tomato".to_string(), 2)]);
        assert_eq!(profile.cooking_methods.len(), 2);
        assert_eq!(profile.categories, vec!["home style", "soup"]);
    }

    #[test]
    fn test_analyze_ingredient_counts_each_node_once() {
        let indexed = eggy();
        let engine = QueryEngine::new(&indexed);

        // "egg" resolves to egg and eggplant, both in the one bake
        let profile = engine.analyze_ingredient("egg").unwrap();
        assert_eq!(profile.total_dishes, 2);
        assert_eq!(profile.cooking_methods, vec![("bake".to_string(), 1)]);

        let eggplant = engine.analyze_ingredient("eggplant").unwrap();
        assert_eq!(eggplant.cooking_methods, vec![("bake".to_string(), 1)]);
        assert_eq!(eggplant.categories, vec!["baking"]);
    }

    #[test]
    fn test_analyze_ingredient_substitutions() {
        let indexed = pantry();
        let engine = QueryEngine::new(&indexed);

        let profile = engine.analyze_ingredient("egg").unwrap();
        assert_eq!(profile.substitutions[0], ("milk".to_string(), 0.5));
        assert_eq!(profile.categories, vec!["breakfast"]);
    }

    #[test]
    fn test_analyze_dish() {
        let indexed = scenario();
        let engine = QueryEngine::new(&indexed);

        let profile = engine.analyze_dish("tomato egg soup").unwrap();
        assert_eq!(profile.total_ingredients, 3);
        assert_eq!(profile.cooking_methods, vec!["boil"]);
        assert_eq!(profile.categories, vec!["soup"]);
        assert_eq!(profile.similar_dishes.len(), 2);
    }

    #[test]
    fn test_analyze_cooking_method() {
        let indexed = pantry();
        let engine = QueryEngine::new(&indexed);

        let profile = engine.analyze_cooking_method("bake").unwrap();
        assert_eq!(profile.total_dishes, 2);
        assert_eq!(profile.common_ingredients[0].1, 2);
        assert_eq!(profile.common_ingredients.len(), 3);
        assert_eq!(profile.categories, vec!["baking"]);
    }

    #[test]
    fn test_unknown_names() {
        let indexed = scenario();
        let engine = QueryEngine::new(&indexed);

        assert!(engine.analyze_ingredient("saffron").is_none());
        assert!(engine.analyze_dish("lasagne").is_none());
        assert!(engine.analyze_cooking_method("sous vide").is_none());
    }

    #[test]
    fn test_compatibility_matrix() {
        let indexed = scenario();
        let engine = QueryEngine::new(&indexed);

        let matrix = engine.compatibility_matrix(&["tomato", "egg", "onion"]);
        assert_eq!(matrix["tomato"]["tomato"], 1.0);
        assert!((matrix["tomato"]["egg"] - 0.2).abs() < 1e-9);
        assert!((matrix["egg"]["tomato"] - 0.2).abs() < 1e-9);
        assert_eq!(matrix["egg"]["onion"], 0.0);
    }
}
