//! Structured recipe records.
//!
//! Extractors turn source documents into `RecipeRecord`s; the graph
//! builder turns records into nodes and edges. Nothing here parses text.

use crate::node::Properties;
use serde::{Deserialize, Serialize};

/// One recipe after entity extraction.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecipeRecord {
    /// Dish name.
    pub name: String,
    pub category: Option<String>,
    pub difficulty: Option<String>,
    pub ingredients: Vec<String>,
    pub cooking_methods: Vec<String>,
    pub tools: Vec<String>,
    pub seasonings: Vec<String>,
    /// Extra dish properties, e.g. raw source text.
    pub properties: Properties,
}

impl RecipeRecord {
    /// Creates a record with only a dish name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn difficulty(mut self, difficulty: impl Into<String>) -> Self {
        self.difficulty = Some(difficulty.into());
        self
    }

    pub fn ingredients<I, S>(mut self, items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ingredients.extend(items.into_iter().map(Into::into));
        self
    }

    pub fn cooking_methods<I, S>(mut self, items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.cooking_methods.extend(items.into_iter().map(Into::into));
        self
    }

    pub fn tools<I, S>(mut self, items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tools.extend(items.into_iter().map(Into::into));
        self
    }

    pub fn seasonings<I, S>(mut self, items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.seasonings.extend(items.into_iter().map(Into::into));
        self
    }

    pub fn property(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }
}
