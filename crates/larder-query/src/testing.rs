//! Shared graphs for unit tests.

use larder_core::RecipeRecord;
use larder_graph::{GraphBuilder, IndexedGraph};

/// Three tomato dishes:
/// stir fry {tomato, egg}, soup {tomato, egg, onion}, salad {tomato, onion}.
pub(crate) fn scenario() -> IndexedGraph {
    let mut builder = GraphBuilder::new();
    builder.add_recipes(&[
        RecipeRecord::new("tomato egg stir fry")
            .category("home style")
            .difficulty("easy")
            .ingredients(["tomato", "egg"])
            .cooking_methods(["stir fry"]),
        RecipeRecord::new("tomato egg soup")
            .category("soup")
            .difficulty("easy")
            .ingredients(["tomato", "egg", "onion"])
            .cooking_methods(["boil"]),
        RecipeRecord::new("tomato onion salad")
            .category("salad")
            .ingredients(["tomato", "onion"])
            .cooking_methods(["toss"]),
    ]);
    builder.build().freeze()
}

/// Batter and dough recipes where every ingredient pair shares at least
/// two dishes, except egg and milk with sugar.
pub(crate) fn pantry() -> IndexedGraph {
    let batter = ["flour", "egg", "milk", "butter"];
    let dough = ["flour", "butter", "sugar"];

    let mut builder = GraphBuilder::new();
    builder.add_recipes(&[
        RecipeRecord::new("pancake")
            .category("breakfast")
            .ingredients(batter)
            .cooking_methods(["pan fry"]),
        RecipeRecord::new("crepe")
            .category("breakfast")
            .ingredients(batter)
            .cooking_methods(["pan fry"]),
        RecipeRecord::new("shortbread")
            .category("baking")
            .ingredients(dough)
            .cooking_methods(["bake"]),
        RecipeRecord::new("sugar cookie")
            .category("baking")
            .ingredients(dough)
            .cooking_methods(["bake"]),
    ]);
    builder.build().freeze()
}

/// A dish where "egg" names two of its ingredients: eggy bake {egg,
/// eggplant, cheese}, plus cheese toast {cheese, bread}.
pub(crate) fn eggy() -> IndexedGraph {
    let mut builder = GraphBuilder::new();
    builder.add_recipes(&[
        RecipeRecord::new("eggy bake")
            .category("baking")
            .ingredients(["egg", "eggplant", "cheese"])
            .cooking_methods(["bake"]),
        RecipeRecord::new("cheese toast")
            .category("breakfast")
            .ingredients(["cheese", "bread"])
            .cooking_methods(["toast"]),
    ]);
    builder.build().freeze()
}
