//! Item identity, stacks, and the read-only item catalog.
//!
//! Game items are identified by a stable numeric [`ItemId`] paired with a
//! display name. The [`ItemCatalog`] is the read-only registry mapping names
//! to ids and carrying per-item stack limits; it stands in for the
//! per-version game data table the connected client exposes. All quantities
//! are non-negative integers.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Default maximum stack size for items without an explicit limit.
pub const DEFAULT_STACK_SIZE: u32 = 64;

/// Stable numeric identifier for an item kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ItemId(pub u32);

impl core::fmt::Display for ItemId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A catalog entry: identity plus stack limit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemDef {
    /// The stable numeric id.
    pub id: ItemId,
    /// The canonical item name (e.g. `"oak_log"`).
    pub name: String,
    /// Maximum count a single inventory slot can hold.
    pub stack_size: u32,
}

/// A quantity of one item kind held in an inventory or container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemStack {
    /// The item kind.
    pub id: ItemId,
    /// The item's display name (kept alongside the id; name-based filters
    /// such as "anything containing `pickaxe`" operate on it).
    pub name: String,
    /// Units held. Always non-negative; zero-count stacks are never stored.
    pub count: u32,
}

impl ItemStack {
    /// Create a stack from its parts.
    pub fn new(id: ItemId, name: impl Into<String>, count: u32) -> Self {
        Self {
            id,
            name: name.into(),
            count,
        }
    }
}

/// Read-only registry of known item kinds.
///
/// Ids are assigned sequentially at registration, so a catalog built from
/// the same table is stable across runs.
#[derive(Debug, Clone, Default)]
pub struct ItemCatalog {
    by_name: BTreeMap<String, ItemId>,
    by_id: BTreeMap<ItemId, ItemDef>,
}

impl ItemCatalog {
    /// Create an empty catalog.
    pub const fn new() -> Self {
        Self {
            by_name: BTreeMap::new(),
            by_id: BTreeMap::new(),
        }
    }

    /// Register an item kind, returning its assigned id.
    ///
    /// Registering a name twice returns the existing id unchanged.
    pub fn register(&mut self, name: &str, stack_size: u32) -> ItemId {
        if let Some(existing) = self.by_name.get(name) {
            return *existing;
        }
        let id = ItemId(u32::try_from(self.by_id.len()).unwrap_or(u32::MAX));
        self.by_name.insert(name.to_owned(), id);
        self.by_id.insert(
            id,
            ItemDef {
                id,
                name: name.to_owned(),
                stack_size,
            },
        );
        id
    }

    /// Look up an item id by name.
    pub fn id_of(&self, name: &str) -> Option<ItemId> {
        self.by_name.get(name).copied()
    }

    /// Look up an item name by id.
    pub fn name_of(&self, id: ItemId) -> Option<&str> {
        self.by_id.get(&id).map(|def| def.name.as_str())
    }

    /// Full definition for an id.
    pub fn def(&self, id: ItemId) -> Option<&ItemDef> {
        self.by_id.get(&id)
    }

    /// Stack limit for an id (default when unknown).
    pub fn stack_size_of(&self, id: ItemId) -> u32 {
        self.by_id
            .get(&id)
            .map_or(DEFAULT_STACK_SIZE, |def| def.stack_size)
    }

    /// All ids whose name ends with the given suffix.
    ///
    /// Used to resolve generic families such as "any planks" or "any log".
    pub fn ids_with_suffix(&self, suffix: &str) -> Vec<ItemId> {
        self.by_name
            .iter()
            .filter(|(name, _)| name.ends_with(suffix))
            .map(|(_, id)| *id)
            .collect()
    }

    /// Number of registered item kinds.
    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    /// Whether the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    /// Build the built-in vanilla-subset catalog.
    ///
    /// Covers the item kinds the worker professions and the built-in recipe
    /// book touch: wood in every variant, basic terrain blocks, ores and
    /// refined materials, crops, stations, and the full tool/armor grid.
    pub fn vanilla_subset() -> Self {
        let mut catalog = Self::new();

        // (name, stack limit)
        const TABLE: &[(&str, u32)] = &[
            // Wood, per variant
            ("oak_log", 64),
            ("birch_log", 64),
            ("spruce_log", 64),
            ("jungle_log", 64),
            ("acacia_log", 64),
            ("dark_oak_log", 64),
            ("cherry_log", 64),
            ("mangrove_log", 64),
            ("oak_planks", 64),
            ("birch_planks", 64),
            ("spruce_planks", 64),
            ("jungle_planks", 64),
            ("acacia_planks", 64),
            ("dark_oak_planks", 64),
            ("cherry_planks", 64),
            ("mangrove_planks", 64),
            ("stick", 64),
            // Terrain
            ("cobblestone", 64),
            ("stone", 64),
            ("deepslate", 64),
            ("andesite", 64),
            ("diorite", 64),
            ("granite", 64),
            ("dirt", 64),
            ("sand", 64),
            ("gravel", 64),
            // Ores and refined materials
            ("coal", 64),
            ("charcoal", 64),
            ("raw_iron", 64),
            ("iron_ingot", 64),
            ("iron_nugget", 64),
            ("raw_gold", 64),
            ("gold_ingot", 64),
            ("raw_copper", 64),
            ("copper_ingot", 64),
            ("diamond", 64),
            ("emerald", 64),
            ("redstone", 64),
            ("lapis_lazuli", 64),
            // Crops and food
            ("wheat", 64),
            ("wheat_seeds", 64),
            ("bread", 64),
            // Stations and utility blocks
            ("crafting_table", 64),
            ("furnace", 64),
            ("chest", 64),
            ("torch", 64),
        ];

        for (name, stack) in TABLE {
            catalog.register(name, *stack);
        }

        // Tool grid: every tier of every kind, unstackable.
        const TOOL_TIERS: &[&str] = &["wooden", "stone", "iron", "golden", "diamond"];
        const TOOL_KINDS: &[&str] = &["pickaxe", "axe", "sword", "shovel", "hoe"];
        for tier in TOOL_TIERS {
            for kind in TOOL_KINDS {
                catalog.register(&format!("{tier}_{kind}"), 1);
            }
        }

        // Armor grid, unstackable.
        const ARMOR_TIERS: &[&str] = &["leather", "golden", "iron", "diamond"];
        const ARMOR_PIECES: &[&str] = &["helmet", "chestplate", "leggings", "boots"];
        for tier in ARMOR_TIERS {
            for piece in ARMOR_PIECES {
                catalog.register(&format!("{tier}_{piece}"), 1);
            }
        }

        catalog
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_assigns_sequential_ids() {
        let mut catalog = ItemCatalog::new();
        let a = catalog.register("oak_log", 64);
        let b = catalog.register("stick", 64);
        assert_eq!(a, ItemId(0));
        assert_eq!(b, ItemId(1));
    }

    #[test]
    fn register_is_idempotent() {
        let mut catalog = ItemCatalog::new();
        let first = catalog.register("oak_log", 64);
        let second = catalog.register("oak_log", 64);
        assert_eq!(first, second);
        assert_eq!(catalog.len(), 1);
    }

    #[test]
    fn lookups_roundtrip() {
        let catalog = ItemCatalog::vanilla_subset();
        let id = catalog.id_of("diamond_pickaxe");
        assert!(id.is_some());
        assert_eq!(
            id.and_then(|id| catalog.name_of(id)),
            Some("diamond_pickaxe")
        );
    }

    #[test]
    fn tools_are_unstackable() {
        let catalog = ItemCatalog::vanilla_subset();
        let pick = catalog.id_of("wooden_pickaxe");
        assert!(pick.is_some());
        assert_eq!(pick.map(|id| catalog.stack_size_of(id)), Some(1));
    }

    #[test]
    fn unknown_id_uses_default_stack_size() {
        let catalog = ItemCatalog::new();
        assert_eq!(catalog.stack_size_of(ItemId(999)), DEFAULT_STACK_SIZE);
    }

    #[test]
    fn plank_family_by_suffix() {
        let catalog = ItemCatalog::vanilla_subset();
        let planks = catalog.ids_with_suffix("_planks");
        assert_eq!(planks.len(), 8);
    }
}
