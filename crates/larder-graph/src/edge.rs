//! Edge types for the recipe graph.
//!
//! Edges are directed as extracted (a dish contains an ingredient), but
//! queries traverse them in both directions.

use crate::error::GraphError;
use larder_core::Properties;
use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};
use std::str::FromStr;

/// The type of relationship between two recipe entities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeKind {
    /// Dish contains an ingredient.
    Contains,

    /// Dish is prepared with a cooking method.
    UsesMethod,

    /// Dish belongs to a category.
    BelongsTo,

    /// Two ingredients co-occur often. Weight is the co-occurrence count.
    PairsWith,

    /// Two dishes share ingredients. Weight is their Jaccard similarity.
    SimilarTo,

    RequiresTool,

    UsesSeasoning,
}

impl EdgeKind {
    pub const ALL: [EdgeKind; 7] = [
        EdgeKind::Contains,
        EdgeKind::UsesMethod,
        EdgeKind::BelongsTo,
        EdgeKind::PairsWith,
        EdgeKind::SimilarTo,
        EdgeKind::RequiresTool,
        EdgeKind::UsesSeasoning,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Contains => "contains",
            Self::UsesMethod => "uses_method",
            Self::BelongsTo => "belongs_to",
            Self::PairsWith => "pairs_with",
            Self::SimilarTo => "similar_to",
            Self::RequiresTool => "requires_tool",
            Self::UsesSeasoning => "uses_seasoning",
        }
    }

    /// Human phrasing of the relationship, read as `source <phrase> target`.
    pub fn describe(&self) -> &'static str {
        match self {
            Self::Contains => "contains",
            Self::UsesMethod => "is cooked by",
            Self::BelongsTo => "belongs to",
            Self::PairsWith => "pairs with",
            Self::SimilarTo => "is similar to",
            Self::RequiresTool => "requires",
            Self::UsesSeasoning => "is seasoned with",
        }
    }
}

impl std::fmt::Display for EdgeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for EdgeKind {
    type Err = GraphError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EdgeKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| GraphError::UnknownEdgeKind(s.to_string()))
    }
}

/// Identity of an edge: weight and properties are not part of it.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EdgeKey {
    pub source: String,
    pub target: String,
    pub kind: EdgeKind,
}

pub(crate) fn default_weight() -> f64 {
    1.0
}

/// A weighted, typed, directed relationship between two nodes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeEdge {
    pub source: String,
    pub target: String,
    pub kind: EdgeKind,

    /// Co-occurrence count or similarity score, depending on the kind.
    #[serde(default = "default_weight")]
    pub weight: f64,

    #[serde(default)]
    pub properties: Properties,
}

impl RecipeEdge {
    /// Creates an edge with the default weight of 1.0.
    pub fn new(source: impl Into<String>, target: impl Into<String>, kind: EdgeKind) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            kind,
            weight: default_weight(),
            properties: Properties::new(),
        }
    }

    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }

    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    pub fn key(&self) -> EdgeKey {
        EdgeKey {
            source: self.source.clone(),
            target: self.target.clone(),
            kind: self.kind,
        }
    }

    /// Returns the endpoint opposite to `id`, if the edge touches `id`.
    pub fn other_end(&self, id: &str) -> Option<&str> {
        if self.source == id {
            Some(&self.target)
        } else if self.target == id {
            Some(&self.source)
        } else {
            None
        }
    }
}

impl PartialEq for RecipeEdge {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source && self.target == other.target && self.kind == other.kind
    }
}

impl Eq for RecipeEdge {}

impl Hash for RecipeEdge {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.source.hash(state);
        self.target.hash(state);
        self.kind.hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_ignores_weight() {
        let a = RecipeEdge::new("ingredient_egg", "ingredient_tomato", EdgeKind::PairsWith).with_weight(2.0);
        let b = RecipeEdge::new("ingredient_egg", "ingredient_tomato", EdgeKind::PairsWith).with_weight(7.0);
        assert_eq!(a, b);
        assert_eq!(a.key(), b.key());
    }

    #[test]
    fn test_kind_is_part_of_identity() {
        let a = RecipeEdge::new("dish_a", "ingredient_b", EdgeKind::Contains);
        let b = RecipeEdge::new("dish_a", "ingredient_b", EdgeKind::UsesSeasoning);
        assert_ne!(a, b);
    }

    #[test]
    fn test_other_end() {
        let edge = RecipeEdge::new("dish_a", "ingredient_b", EdgeKind::Contains);
        assert_eq!(edge.other_end("dish_a"), Some("ingredient_b"));
        assert_eq!(edge.other_end("ingredient_b"), Some("dish_a"));
        assert_eq!(edge.other_end("tool_wok"), None);
    }

    #[test]
    fn test_kind_round_trip() {
        for kind in EdgeKind::ALL {
            assert_eq!(kind.to_string().parse::<EdgeKind>().unwrap(), kind);
        }
        assert!(matches!(
            "cooks".parse::<EdgeKind>(),
            Err(GraphError::UnknownEdgeKind(_))
        ));
    }

    #[test]
    fn test_default_weight_on_deserialize() {
        let edge: RecipeEdge =
            serde_json::from_str(r#"{"source": "dish_a", "target": "category_b", "kind": "belongs_to"}"#)
                .unwrap();
        assert_eq!(edge.weight, 1.0);
        assert_eq!(edge.kind, EdgeKind::BelongsTo);
    }
}
