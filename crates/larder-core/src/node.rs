//! Node types for the recipe graph.
//!
//! Every entity pulled out of a recipe becomes a node. The set of kinds is
//! closed so that kind-specific logic gets exhaustiveness checks.

use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

/// Open property bag attached to nodes and edges.
pub type Properties = HashMap<String, serde_json::Value>;

/// The kind of recipe entity a node represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    /// A finished dish, the hub every other entity hangs off.
    Dish,
    Ingredient,
    CookingMethod,
    Category,
    Tool,
    Seasoning,
}

impl NodeKind {
    /// Every kind, in declaration order.
    pub const ALL: [NodeKind; 6] = [
        NodeKind::Dish,
        NodeKind::Ingredient,
        NodeKind::CookingMethod,
        NodeKind::Category,
        NodeKind::Tool,
        NodeKind::Seasoning,
    ];

    /// Returns the serialized name, also used as the node id prefix.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Dish => "dish",
            Self::Ingredient => "ingredient",
            Self::CookingMethod => "cooking_method",
            Self::Category => "category",
            Self::Tool => "tool",
            Self::Seasoning => "seasoning",
        }
    }
}

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for NodeKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NodeKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| CoreError::UnknownNodeKind(s.to_string()))
    }
}

/// A typed entity in the recipe graph.
///
/// Identity is the `id` alone: two nodes with the same id are equal no
/// matter what their names or properties say.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeNode {
    /// Globally unique id, `"<kind>_<name>"` by convention.
    pub id: String,

    pub kind: NodeKind,

    /// Display name as it appeared in the source recipe.
    pub name: String,

    /// Free-form attributes such as category, difficulty or source text.
    #[serde(default)]
    pub properties: Properties,
}

impl RecipeNode {
    /// Creates a node whose id follows the `"<kind>_<name>"` convention.
    pub fn new(kind: NodeKind, name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            id: Self::make_id(kind, &name),
            kind,
            name,
            properties: Properties::new(),
        }
    }

    /// Creates a node with an explicit id.
    pub fn with_id(id: impl Into<String>, kind: NodeKind, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind,
            name: name.into(),
            properties: Properties::new(),
        }
    }

    /// Builds the conventional id for a kind and name.
    pub fn make_id(kind: NodeKind, name: &str) -> String {
        format!("{}_{}", kind, name)
    }

    /// Sets a property, returning the node for chaining.
    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    /// Returns a string property, if present and a string.
    pub fn property_str(&self, key: &str) -> Option<&str> {
        self.properties.get(key).and_then(|v| v.as_str())
    }
}

impl PartialEq for RecipeNode {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for RecipeNode {}

impl Hash for RecipeNode {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}
