//! Larder Query - Analytic primitives and recommendations
//!
//! Everything here reads a frozen `IndexedGraph` and never mutates it.
//! Names are resolved to nodes through the name index, so a query for
//! "tomato" also reaches "cherry tomato". A name that resolves to nothing
//! yields an empty result, never an error.
//!
//! # Example
//!
//! ```
//! use larder_core::RecipeRecord;
//! use larder_graph::GraphBuilder;
//! use larder_query::{QueryEngine, RecommendationEngine};
//!
//! let mut builder = GraphBuilder::new();
//! builder.add_recipe(&RecipeRecord::new("tomato egg stir fry").ingredients(["tomato", "egg"]));
//! builder.add_recipe(&RecipeRecord::new("tomato egg soup").ingredients(["tomato", "egg", "onion"]));
//! let indexed = builder.build().freeze();
//!
//! let engine = QueryEngine::new(&indexed);
//! let pairs = engine.find_ingredient_pairs("tomato", 2);
//! assert_eq!(pairs[0].0.name, "egg");
//!
//! let recommender = RecommendationEngine::new(engine);
//! let dishes = recommender.dishes_by_ingredients(&["tomato", "egg"], 5);
//! assert_eq!(dishes[0].item.name, "tomato egg stir fry");
//! ```

mod analysis;
mod context;
mod engine;
mod path;
mod recommend;

#[cfg(test)]
mod testing;

pub use analysis::{DishProfile, IngredientProfile, MethodProfile};
pub use context::AnswerContext;
pub use engine::{
    name_similarity, QueryEngine, DEFAULT_MAX_DEPTH, DEFAULT_MIN_COOCCURRENCE,
    DEFAULT_SEARCH_LIMIT, DEFAULT_SIMILAR_LIMIT,
};
pub use recommend::{
    Preferences, Recommendation, RecommendationEngine, RecommendationKind, TrendingCombination,
};
