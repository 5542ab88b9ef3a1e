//! Larder Core - Recipe entity model
//!
//! This crate defines the entities that make up the recipe knowledge
//! graph: dishes, ingredients, cooking methods, categories, tools and
//! seasonings. It also carries the structured recipe records handed over
//! by extractors and the engine configuration shared by the other crates.
//!
//! # Example
//!
//! ```
//! use larder_core::{NodeKind, RecipeNode};
//!
//! let node = RecipeNode::new(NodeKind::Ingredient, "tomato");
//! assert_eq!(node.id, "ingredient_tomato");
//! ```

pub mod config;
pub mod error;
pub mod node;
pub mod recipe;
pub mod similarity;

pub use config::EngineConfig;
pub use error::{CoreError, Result};
pub use node::{NodeKind, Properties, RecipeNode};
pub use recipe::RecipeRecord;
pub use similarity::jaccard;
