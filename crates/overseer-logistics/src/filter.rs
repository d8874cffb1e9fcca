//! Declarative item filters for deposit passes.
//!
//! Each profession deposits a different slice of its inventory: the farmer
//! stores only its crop, the miner stores everything except its working
//! gear. Filters are data rather than closures so they can be logged and
//! unit-tested on their own.

use overseer_types::ItemStack;

/// Selects which held items a deposit pass should move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemFilter {
    /// Every held item.
    All,
    /// Items whose name equals the given name.
    NameIs(String),
    /// Items whose name equals any of the given names.
    AnyOf(Vec<String>),
    /// Everything except items whose name contains any of the given
    /// patterns (the "keep my gear" filter).
    Excluding(Vec<String>),
}

impl ItemFilter {
    /// Whether a stack passes the filter.
    pub fn matches(&self, stack: &ItemStack) -> bool {
        match self {
            Self::All => true,
            Self::NameIs(name) => stack.name == *name,
            Self::AnyOf(names) => names.iter().any(|name| stack.name == *name),
            Self::Excluding(patterns) => {
                !patterns.iter().any(|pattern| stack.name.contains(pattern.as_str()))
            }
        }
    }
}
