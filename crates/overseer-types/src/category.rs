//! The configurable storage category taxonomy.
//!
//! The stock-keeper sorts items into chests by category. Categories are
//! resolved by substring matching against an ordered rule list: the first
//! rule with a matching pattern wins, so narrower categories (redstone)
//! must precede broader ones (stone). Items matching no rule fall into
//! [`OTHER_CATEGORY`].
//!
//! The exact taxonomy membership is a product decision, not a correctness
//! contract, so the table is loaded from configuration with the default
//! below as fallback.

use serde::{Deserialize, Serialize};

/// The fallback category for items matching no rule.
pub const OTHER_CATEGORY: &str = "other";

/// One category with its substring patterns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRule {
    /// Category name (e.g. `"wood"`).
    pub name: String,
    /// Substring patterns; an item whose name contains any pattern belongs
    /// to this category.
    pub patterns: Vec<String>,
}

/// Ordered category rules plus the priority-item list.
///
/// Priority items are deposited first when claiming an empty chest, so
/// common bulk materials anchor chest categories before oddments do.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryTable {
    #[serde(default)]
    rules: Vec<CategoryRule>,
    #[serde(default)]
    priority_items: Vec<String>,
}

impl CategoryTable {
    /// Build a table from explicit rules.
    pub const fn new(rules: Vec<CategoryRule>, priority_items: Vec<String>) -> Self {
        Self {
            rules,
            priority_items,
        }
    }

    /// The category an item name belongs to.
    pub fn category_of(&self, item_name: &str) -> &str {
        for rule in &self.rules {
            if rule
                .patterns
                .iter()
                .any(|pattern| item_name.contains(pattern.as_str()))
            {
                return rule.name.as_str();
            }
        }
        OTHER_CATEGORY
    }

    /// Whether an item is on the priority list.
    pub fn is_priority(&self, item_name: &str) -> bool {
        self.priority_items
            .iter()
            .any(|name| name == item_name)
    }

    /// The configured rules, in match order.
    pub fn rules(&self) -> &[CategoryRule] {
        &self.rules
    }
}

impl Default for CategoryTable {
    fn default() -> Self {
        fn rule(name: &str, patterns: &[&str]) -> CategoryRule {
            CategoryRule {
                name: name.to_owned(),
                patterns: patterns.iter().map(|p| (*p).to_owned()).collect(),
            }
        }

        // Order matters: narrower categories first.
        let rules = vec![
            rule(
                "tools",
                &[
                    "pickaxe",
                    "_axe",
                    "shovel",
                    "hoe",
                    "sword",
                    "shears",
                    "fishing_rod",
                    "flint_and_steel",
                ],
            ),
            rule(
                "armor",
                &["helmet", "chestplate", "leggings", "boots", "shield"],
            ),
            rule(
                "redstone",
                &[
                    "redstone", "repeater", "comparator", "piston", "observer", "hopper",
                    "dropper", "dispenser", "lever", "_button", "tripwire",
                ],
            ),
            rule(
                "nether",
                &["nether", "quartz", "blaze", "ghast", "magma", "soul_"],
            ),
            rule(
                "end",
                &["end_", "ender_eye", "chorus", "purpur", "shulker", "dragon"],
            ),
            rule(
                "ores",
                &[
                    "_ore",
                    "raw_",
                    "_ingot",
                    "_nugget",
                    "coal",
                    "diamond",
                    "emerald",
                    "lapis",
                    "amethyst",
                ],
            ),
            rule(
                "wood",
                &["_log", "_planks", "_wood", "stick", "sapling", "bamboo", "_stem"],
            ),
            rule(
                "food",
                &[
                    "bread", "apple", "beef", "steak", "porkchop", "chicken", "mutton",
                    "carrot", "potato", "beetroot", "melon_slice", "cookie", "stew",
                ],
            ),
            rule(
                "drops",
                &[
                    "rotten_flesh",
                    "bone",
                    "arrow",
                    "spider_eye",
                    "gunpowder",
                    "string",
                    "slime_ball",
                    "ender_pearl",
                    "feather",
                    "leather",
                    "egg",
                ],
            ),
            rule(
                "nature",
                &[
                    "seeds", "wheat", "dirt", "sand", "flower", "grass", "fern", "leaves",
                    "sugar_cane", "cactus", "pumpkin", "vine", "moss",
                ],
            ),
            rule(
                "building",
                &[
                    "bricks",
                    "glass",
                    "terracotta",
                    "concrete",
                    "wool",
                    "_slab",
                    "_stairs",
                    "_fence",
                    "_door",
                    "trapdoor",
                ],
            ),
            rule(
                "stone",
                &[
                    "cobblestone",
                    "stone",
                    "deepslate",
                    "andesite",
                    "diorite",
                    "granite",
                    "tuff",
                    "gravel",
                ],
            ),
        ];

        // Bulk materials and common mob drops anchor empty chests first.
        let priority_items = [
            "oak_log",
            "birch_log",
            "spruce_log",
            "jungle_log",
            "acacia_log",
            "dark_oak_log",
            "cherry_log",
            "mangrove_log",
            "cobblestone",
            "stone",
            "andesite",
            "diorite",
            "granite",
            "tuff",
            "deepslate",
            "dirt",
            "sand",
            "gravel",
            "grass_block",
            "rotten_flesh",
            "bone",
            "arrow",
            "spider_eye",
            "gunpowder",
        ]
        .iter()
        .map(|name| (*name).to_owned())
        .collect();

        Self::new(rules, priority_items)
    }
}
