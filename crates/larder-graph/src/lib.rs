//! Larder Graph - Recipe relationship management
//!
//! This crate owns the recipe knowledge graph: typed edges between
//! entities, the graph container, the builder that turns recipe records
//! into a graph, and the indices and storage that let a built graph be
//! served and reloaded.
//!
//! # Architecture
//!
//! `RecipeGraph` keeps nodes, an ordered edge list and a forward plus a
//! reverse adjacency. Freezing a graph builds a `GraphIndex` with:
//! - Name-based lookups
//! - Kind-based filtering
//! - Incoming-edge lookups
//!
//! # Example
//!
//! ```
//! use larder_core::RecipeRecord;
//! use larder_graph::{EdgeKind, GraphBuilder};
//!
//! let mut builder = GraphBuilder::new();
//! builder.add_recipe(&RecipeRecord::new("tomato egg stir fry").ingredients(["tomato", "egg"]));
//! let indexed = builder.build().freeze();
//!
//! let egg = indexed.graph().neighbors("ingredient_egg", Some(EdgeKind::Contains));
//! assert_eq!(egg[0].name, "tomato egg stir fry");
//! ```

mod builder;
mod edge;
mod error;
mod export;
mod graph;
mod index;
mod store;

pub use builder::GraphBuilder;
pub use edge::{EdgeKey, EdgeKind, RecipeEdge};
pub use error::{GraphError, Result};
pub use export::{EdgeRecord, GraphExport, NodeRecord};
pub use graph::{GraphStatistics, RecipeGraph};
pub use index::{GraphIndex, IndexedGraph, INDEX_FORMAT_VERSION};
pub use store::{GraphStore, StoreError};
