//! Recipes, ingredient slots, requirements, and the recipe book.
//!
//! A [`Recipe`] maps a result item and yield count to a set of
//! [`IngredientSlot`]s. A slot may accept any of several item ids -- "any
//! planks" is a slot listing every plank variant. Recipes optionally require
//! a physical [`Station`] (a 3x3 grid needs a crafting table; small recipes
//! craft from personal inventory alone).
//!
//! Recipes are static per-version game data. The built-in
//! [`RecipeBook::vanilla_subset`] covers the portion of that table the
//! worker professions exercise.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::item::{ItemCatalog, ItemId};

/// A physical world object a recipe may require.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Station {
    /// The 3x3 crafting grid block.
    CraftingTable,
    /// The smelting station.
    Furnace,
}

impl Station {
    /// The block name to search for in the world.
    pub const fn block_name(self) -> &'static str {
        match self {
            Self::CraftingTable => "crafting_table",
            Self::Furnace => "furnace",
        }
    }
}

/// One ingredient slot of a recipe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngredientSlot {
    /// Item ids this slot accepts (any one of them satisfies the slot).
    pub acceptable: Vec<ItemId>,
    /// Units consumed per craft.
    pub count: u32,
}

impl IngredientSlot {
    /// A slot accepting exactly one item kind.
    pub fn single(id: ItemId, count: u32) -> Self {
        Self {
            acceptable: vec![id],
            count,
        }
    }

    /// A slot accepting any of several item kinds.
    pub const fn any_of(acceptable: Vec<ItemId>, count: u32) -> Self {
        Self { acceptable, count }
    }
}

/// A crafting recipe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipe {
    /// The item produced.
    pub result: ItemId,
    /// Units produced per craft.
    pub yield_count: u32,
    /// Station required to perform the craft, if any.
    pub station: Option<Station>,
    /// Ingredient slots consumed per craft.
    pub slots: Vec<IngredientSlot>,
}

/// A computed shortfall: how much of an acceptable-id set is still missing.
///
/// Produced by the Recipe Resolver and consumed by the Logistics Engine
/// (which withdraws against it) and the Crafting Engine (which manufactures
/// against it).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngredientRequirement {
    /// Item ids that satisfy this requirement, in preference order.
    pub acceptable: Vec<ItemId>,
    /// Units still needed.
    pub count: u32,
}

impl IngredientRequirement {
    /// Build a requirement from its parts.
    pub const fn new(acceptable: Vec<ItemId>, count: u32) -> Self {
        Self { acceptable, count }
    }

    /// The preferred concrete item for this requirement.
    pub fn representative(&self) -> Option<ItemId> {
        self.acceptable.first().copied()
    }

    /// Whether the requirement has been fully satisfied.
    pub const fn is_met(&self) -> bool {
        self.count == 0
    }
}

/// All known recipes, indexed by result item.
///
/// Multiple recipes for the same result are kept in insertion order; the
/// Crafting Engine tries them as alternatives.
#[derive(Debug, Clone, Default)]
pub struct RecipeBook {
    by_result: BTreeMap<ItemId, Vec<Recipe>>,
}

impl RecipeBook {
    /// Create an empty book.
    pub const fn new() -> Self {
        Self {
            by_result: BTreeMap::new(),
        }
    }

    /// Add a recipe.
    pub fn add(&mut self, recipe: Recipe) {
        self.by_result.entry(recipe.result).or_default().push(recipe);
    }

    /// All recipes producing the given item (empty when none exist --
    /// the "no recipe" signal, distinct from "missing materials").
    pub fn recipes_for(&self, result: ItemId) -> &[Recipe] {
        self.by_result.get(&result).map_or(&[], Vec::as_slice)
    }

    /// Number of result kinds with at least one recipe.
    pub fn len(&self) -> usize {
        self.by_result.len()
    }

    /// Whether the book is empty.
    pub fn is_empty(&self) -> bool {
        self.by_result.is_empty()
    }

    /// Build the built-in vanilla-subset recipe book against a catalog.
    ///
    /// Items missing from the catalog simply do not get recipes; the book
    /// never invents ids.
    pub fn vanilla_subset(catalog: &ItemCatalog) -> Self {
        let mut book = Self::new();
        let planks_family = catalog.ids_with_suffix("_planks");

        // Logs -> planks, per wood variant (yield 4, inventory craft).
        const WOODS: &[&str] = &[
            "oak", "birch", "spruce", "jungle", "acacia", "dark_oak", "cherry", "mangrove",
        ];
        for wood in WOODS {
            let log = catalog.id_of(&format!("{wood}_log"));
            let planks = catalog.id_of(&format!("{wood}_planks"));
            if let (Some(log), Some(planks)) = (log, planks) {
                book.add(Recipe {
                    result: planks,
                    yield_count: 4,
                    station: None,
                    slots: vec![IngredientSlot::single(log, 1)],
                });
            }
        }

        // Sticks: 2 of any planks -> 4.
        if let Some(stick) = catalog.id_of("stick") {
            book.add(Recipe {
                result: stick,
                yield_count: 4,
                station: None,
                slots: vec![IngredientSlot::any_of(planks_family.clone(), 2)],
            });
        }

        // Crafting table: 4 of any planks -> 1.
        if let Some(table) = catalog.id_of("crafting_table") {
            book.add(Recipe {
                result: table,
                yield_count: 1,
                station: None,
                slots: vec![IngredientSlot::any_of(planks_family.clone(), 4)],
            });
        }

        // Chest: 8 of any planks -> 1, needs the 3x3 grid.
        if let Some(chest) = catalog.id_of("chest") {
            book.add(Recipe {
                result: chest,
                yield_count: 1,
                station: Some(Station::CraftingTable),
                slots: vec![IngredientSlot::any_of(planks_family.clone(), 8)],
            });
        }

        // Furnace: 8 cobblestone -> 1, needs the 3x3 grid.
        if let (Some(furnace), Some(cobble)) =
            (catalog.id_of("furnace"), catalog.id_of("cobblestone"))
        {
            book.add(Recipe {
                result: furnace,
                yield_count: 1,
                station: Some(Station::CraftingTable),
                slots: vec![IngredientSlot::single(cobble, 8)],
            });
        }

        // Torches: coal or charcoal plus a stick -> 4.
        if let (Some(torch), Some(stick)) = (catalog.id_of("torch"), catalog.id_of("stick")) {
            let fuels: Vec<ItemId> = ["coal", "charcoal"]
                .iter()
                .filter_map(|name| catalog.id_of(name))
                .collect();
            if !fuels.is_empty() {
                book.add(Recipe {
                    result: torch,
                    yield_count: 4,
                    station: None,
                    slots: vec![
                        IngredientSlot::any_of(fuels, 1),
                        IngredientSlot::single(stick, 1),
                    ],
                });
            }
        }

        // Tool grid. Head-material count per kind, plus stick handles.
        // (head count, stick count)
        const TOOL_SHAPES: &[(&str, u32, u32)] = &[
            ("pickaxe", 3, 2),
            ("axe", 3, 2),
            ("sword", 2, 1),
            ("shovel", 1, 2),
            ("hoe", 2, 2),
        ];
        // Tier -> head material item name; wooden tools take any planks.
        const TOOL_HEADS: &[(&str, Option<&str>)] = &[
            ("wooden", None),
            ("stone", Some("cobblestone")),
            ("iron", Some("iron_ingot")),
            ("golden", Some("gold_ingot")),
            ("diamond", Some("diamond")),
        ];

        let Some(stick) = catalog.id_of("stick") else {
            return book;
        };
        for (tier, head_name) in TOOL_HEADS {
            let head: Vec<ItemId> = match head_name {
                Some(name) => catalog.id_of(name).into_iter().collect(),
                None => planks_family.clone(),
            };
            if head.is_empty() {
                continue;
            }
            for (kind, head_count, stick_count) in TOOL_SHAPES {
                if let Some(result) = catalog.id_of(&format!("{tier}_{kind}")) {
                    book.add(Recipe {
                        result,
                        yield_count: 1,
                        station: Some(Station::CraftingTable),
                        slots: vec![
                            IngredientSlot::any_of(head.clone(), *head_count),
                            IngredientSlot::single(stick, *stick_count),
                        ],
                    });
                }
            }
        }

        book
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn book() -> (ItemCatalog, RecipeBook) {
        let catalog = ItemCatalog::vanilla_subset();
        let book = RecipeBook::vanilla_subset(&catalog);
        (catalog, book)
    }

    #[test]
    fn every_wood_variant_has_a_planks_recipe() {
        let (catalog, book) = book();
        for wood in ["oak", "birch", "spruce", "dark_oak"] {
            let planks = catalog.id_of(&format!("{wood}_planks"));
            assert!(planks.is_some());
            let recipes = planks.map(|id| book.recipes_for(id)).unwrap_or_default();
            assert_eq!(recipes.len(), 1, "{wood}_planks should have one recipe");
            assert_eq!(recipes.first().map(|r| r.yield_count), Some(4));
        }
    }

    #[test]
    fn stick_recipe_accepts_any_planks() {
        let (catalog, book) = book();
        let stick = catalog.id_of("stick");
        let recipes = stick.map(|id| book.recipes_for(id)).unwrap_or_default();
        let slot = recipes.first().and_then(|r| r.slots.first());
        assert!(slot.is_some());
        assert_eq!(slot.map(|s| s.acceptable.len()), Some(8));
        assert_eq!(slot.map(|s| s.count), Some(2));
    }

    #[test]
    fn wooden_pickaxe_shape() {
        let (catalog, book) = book();
        let pick = catalog.id_of("wooden_pickaxe");
        let recipes = pick.map(|id| book.recipes_for(id)).unwrap_or_default();
        let recipe = recipes.first();
        assert!(recipe.is_some());
        let recipe = match recipe {
            Some(r) => r,
            None => return,
        };
        assert_eq!(recipe.station, Some(Station::CraftingTable));
        assert_eq!(recipe.slots.len(), 2);
        assert_eq!(recipe.slots.first().map(|s| s.count), Some(3));
        assert_eq!(recipe.slots.get(1).map(|s| s.count), Some(2));
    }

    #[test]
    fn raw_materials_have_no_recipes() {
        let (catalog, book) = book();
        for raw in ["oak_log", "cobblestone", "diamond", "iron_ingot"] {
            let id = catalog.id_of(raw);
            assert!(id.is_some());
            assert!(id.map(|id| book.recipes_for(id).is_empty()).unwrap_or(false));
        }
    }

    #[test]
    fn unknown_result_yields_empty_slice() {
        let (_, book) = book();
        assert!(book.recipes_for(ItemId(9999)).is_empty());
    }

    #[test]
    fn requirement_helpers() {
        let req = IngredientRequirement::new(vec![ItemId(3), ItemId(4)], 2);
        assert_eq!(req.representative(), Some(ItemId(3)));
        assert!(!req.is_met());
        let done = IngredientRequirement::new(vec![ItemId(3)], 0);
        assert!(done.is_met());
    }
}
