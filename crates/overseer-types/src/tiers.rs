//! Tool and armor tier candidate lists, ore aliases, and material ranking.
//!
//! A player asking for "an axe" means "the best axe you can make". Aliases
//! expand to ordered candidate lists, best tier first; the Crafting Engine
//! walks the list and takes the first success. Aliases are accepted in
//! English and Portuguese, matching the chat conventions the bots answer to.

/// Material tiers from best to worst, as used by `equip_best_tool`.
pub const MATERIAL_ORDER: &[&str] = &[
    "netherite", "diamond", "iron", "golden", "stone", "wooden", "leather",
];

/// Rank of an item name by its material prefix; lower is better.
///
/// Names with no recognized material prefix rank below everything.
pub fn material_rank(item_name: &str) -> usize {
    MATERIAL_ORDER
        .iter()
        .position(|material| item_name.starts_with(material))
        .unwrap_or(MATERIAL_ORDER.len())
}

/// Build the tiered candidate list for a tool kind, best first.
fn tool_tiers(kind: &str) -> Vec<String> {
    ["diamond", "iron", "golden", "stone", "wooden"]
        .iter()
        .map(|tier| format!("{tier}_{kind}"))
        .collect()
}

/// Build the tiered candidate list for an armor piece, best first.
fn armor_tiers(piece: &str) -> Vec<String> {
    ["diamond", "iron", "golden", "leather"]
        .iter()
        .map(|tier| format!("{tier}_{piece}"))
        .collect()
}

/// Expand a tier alias to its ordered candidate list.
///
/// Returns `None` when the name is not an alias (the caller then treats it
/// as a concrete item name).
pub fn expand_alias(alias: &str) -> Option<Vec<String>> {
    match alias.to_ascii_lowercase().as_str() {
        "pickaxe" | "picareta" => Some(tool_tiers("pickaxe")),
        "axe" | "machado" => Some(tool_tiers("axe")),
        "sword" | "espada" => Some(tool_tiers("sword")),
        "shovel" | "pa" | "p\u{e1}" => Some(tool_tiers("shovel")),
        "hoe" | "enxada" => Some(tool_tiers("hoe")),
        "helmet" | "capacete" => Some(armor_tiers("helmet")),
        "chestplate" | "peitoral" => Some(armor_tiers("chestplate")),
        "leggings" | "calca" | "cal\u{e7}a" => Some(armor_tiers("leggings")),
        "boots" | "botas" => Some(armor_tiers("boots")),
        _ => None,
    }
}

/// Resolve an ore alias to the block kinds it matches.
///
/// Used by the "mine ore by alias and direction" command surface.
pub fn ore_alias(alias: &str) -> Option<&'static [&'static str]> {
    match alias.to_ascii_lowercase().as_str() {
        "iron" | "ferro" => Some(&["iron_ore", "deepslate_iron_ore", "raw_iron_block"]),
        "coal" | "carvao" | "carv\u{e3}o" => {
            Some(&["coal_ore", "deepslate_coal_ore", "coal_block"])
        }
        "diamond" | "diamante" => Some(&["diamond_ore", "deepslate_diamond_ore"]),
        "gold" | "ouro" => Some(&["gold_ore", "deepslate_gold_ore", "nether_gold_ore"]),
        "copper" | "cobre" => Some(&["copper_ore", "deepslate_copper_ore"]),
        "lapis" => Some(&["lapis_ore", "deepslate_lapis_ore"]),
        "redstone" => Some(&["redstone_ore", "deepslate_redstone_ore"]),
        "emerald" | "esmeralda" => Some(&["emerald_ore", "deepslate_emerald_ore"]),
        "stone" | "pedra" => Some(&[
            "stone",
            "cobblestone",
            "deepslate",
            "diorite",
            "andesite",
            "granite",
        ]),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn axe_alias_expands_best_first() {
        let tiers = expand_alias("axe");
        assert_eq!(
            tiers,
            Some(vec![
                "diamond_axe".to_owned(),
                "iron_axe".to_owned(),
                "golden_axe".to_owned(),
                "stone_axe".to_owned(),
                "wooden_axe".to_owned(),
            ])
        );
    }

    #[test]
    fn portuguese_aliases_match_english() {
        assert_eq!(expand_alias("picareta"), expand_alias("pickaxe"));
        assert_eq!(expand_alias("machado"), expand_alias("axe"));
        assert_eq!(expand_alias("botas"), expand_alias("boots"));
    }

    #[test]
    fn armor_uses_leather_not_wood() {
        let tiers = expand_alias("helmet").unwrap_or_default();
        assert_eq!(tiers.last().map(String::as_str), Some("leather_helmet"));
        assert_eq!(tiers.len(), 4);
    }

    #[test]
    fn concrete_names_are_not_aliases() {
        assert_eq!(expand_alias("stone_axe"), None);
        assert_eq!(expand_alias("oak_log"), None);
    }

    #[test]
    fn ore_aliases_resolve() {
        assert_eq!(
            ore_alias("ferro"),
            Some(&["iron_ore", "deepslate_iron_ore", "raw_iron_block"][..])
        );
        assert!(ore_alias("mithril").is_none());
    }

    #[test]
    fn material_ranking_orders_tiers() {
        assert!(material_rank("diamond_pickaxe") < material_rank("iron_pickaxe"));
        assert!(material_rank("iron_pickaxe") < material_rank("stone_pickaxe"));
        assert!(material_rank("stone_pickaxe") < material_rank("wooden_pickaxe"));
        // Unrecognized material sorts last.
        assert_eq!(material_rank("mystery_pickaxe"), MATERIAL_ORDER.len());
    }
}
