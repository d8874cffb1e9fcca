//! Recipe resolution: deciding what is missing for a desired item count.
//!
//! Pure integer math over an inventory snapshot. Batch sizing uses ceiling
//! division so a partial final yield still covers the requested amount, and
//! deficits are clamped at zero (holding more than needed is never a
//! negative shortfall).

use std::collections::BTreeMap;

use overseer_types::{IngredientRequirement, ItemId, Recipe, RecipeBook};

/// The outcome of evaluating an item request against current holdings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Evaluation {
    /// Already held in sufficient count; nothing to craft.
    Satisfied,
    /// No recipe produces the item. Distinct from "missing materials": the
    /// caller must source the item externally.
    NoRecipe,
    /// A recipe exists; crafting `crafts_needed` batches would satisfy the
    /// request once `deficits` are sourced (empty deficits means craftable
    /// right now).
    Craftable {
        /// Index of the evaluated recipe among the item's alternatives.
        recipe_index: usize,
        /// Batches to craft, `ceil(shortfall / yield)`.
        crafts_needed: u32,
        /// Outstanding ingredient shortfalls, merged by acceptable-id set.
        deficits: Vec<IngredientRequirement>,
    },
}

/// Held count summed across any of the acceptable ids.
pub fn held_count(inventory: &BTreeMap<ItemId, u32>, acceptable: &[ItemId]) -> u32 {
    acceptable.iter().fold(0u32, |acc, id| {
        acc.saturating_add(inventory.get(id).copied().unwrap_or(0))
    })
}

/// Evaluate a desired count of an item against holdings, using the item's
/// first recipe. The engine iterates recipe alternatives itself via
/// [`deficits_for_recipe`].
pub fn evaluate(
    book: &RecipeBook,
    inventory: &BTreeMap<ItemId, u32>,
    item: ItemId,
    desired: u32,
) -> Evaluation {
    let held = inventory.get(&item).copied().unwrap_or(0);
    if held >= desired {
        return Evaluation::Satisfied;
    }
    let shortfall = desired.saturating_sub(held);

    let recipes = book.recipes_for(item);
    let Some(recipe) = recipes.first() else {
        return Evaluation::NoRecipe;
    };

    let (crafts_needed, deficits) = deficits_for_recipe(recipe, inventory, shortfall);
    Evaluation::Craftable {
        recipe_index: 0,
        crafts_needed,
        deficits,
    }
}

/// Compute batch count and ingredient deficits for one recipe.
///
/// `shortfall` is the outstanding amount to produce. Slots with identical
/// acceptable-id sets merge before the comparison. Multi-id slots order
/// their acceptable list so variants already held come first, keeping
/// generic-family requirements ("any planks") on the wood type the agent
/// is already working with.
pub fn deficits_for_recipe(
    recipe: &Recipe,
    inventory: &BTreeMap<ItemId, u32>,
    shortfall: u32,
) -> (u32, Vec<IngredientRequirement>) {
    let yield_count = recipe.yield_count.max(1);
    let crafts_needed = shortfall.div_ceil(yield_count);

    // Merge slots by acceptable set.
    let mut merged: Vec<(Vec<ItemId>, u32)> = Vec::new();
    for slot in &recipe.slots {
        if let Some(entry) = merged.iter_mut().find(|(ids, _)| *ids == slot.acceptable) {
            entry.1 = entry.1.saturating_add(slot.count);
        } else {
            merged.push((slot.acceptable.clone(), slot.count));
        }
    }

    let mut deficits = Vec::new();
    for (acceptable, per_craft) in merged {
        let required = per_craft.saturating_mul(crafts_needed);
        let held = held_count(inventory, &acceptable);
        let missing = required.saturating_sub(held);
        if missing > 0 {
            deficits.push(IngredientRequirement::new(
                prefer_held(acceptable, inventory),
                missing,
            ));
        }
    }

    (crafts_needed, deficits)
}

/// Stable-sort acceptable ids so held variants come first.
fn prefer_held(mut acceptable: Vec<ItemId>, inventory: &BTreeMap<ItemId, u32>) -> Vec<ItemId> {
    acceptable.sort_by_key(|id| usize::from(inventory.get(id).copied().unwrap_or(0) == 0));
    acceptable
}
