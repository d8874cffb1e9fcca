//! The shared tool-acquisition protocol.
//!
//! When a role discovers its required tool is missing it first tries to
//! retrieve one from the stockpile, best tier first. Failing that it emits
//! exactly one externally-visible craft-request signal -- a flag suppresses
//! re-emission on every subsequent cycle -- and the role waits or degrades,
//! re-checking each cycle. The flag resets the moment a tool is acquired.

use tracing::debug;

use overseer_types::{expand_alias, IngredientRequirement};
use overseer_world::{World, STOCK_ZONE};

use overseer_logistics::{LogisticsEngine, LogisticsError};

use crate::error::ProfessionError;

/// Whether any held item matches the tool kind.
pub fn holds_tool<W: World>(world: &W, kind: &str) -> bool {
    world
        .inventory()
        .iter()
        .any(|stack| stack.name.contains(kind))
}

/// Per-role tool acquisition state.
#[derive(Debug)]
pub struct ToolQuest {
    kind: String,
    requested: bool,
}

impl ToolQuest {
    /// Quest for a tool kind (`"pickaxe"`, `"axe"`, ...).
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            requested: false,
        }
    }

    /// Whether the craft-request signal has been emitted and not yet
    /// cleared by an acquisition.
    pub const fn has_requested(&self) -> bool {
        self.requested
    }

    /// Clear all quest state.
    pub fn reset(&mut self) {
        self.requested = false;
    }

    /// One acquisition attempt: storage first, then the one-shot craft
    /// request. Returns whether a tool is now held.
    pub async fn try_acquire<W: World>(
        &mut self,
        world: &W,
        logistics: &LogisticsEngine<W>,
    ) -> Result<bool, ProfessionError> {
        if holds_tool(world, &self.kind) {
            self.requested = false;
            return Ok(true);
        }

        // Tiered retrieval from the stockpile, best tier first.
        let tiers = expand_alias(&self.kind).unwrap_or_else(|| vec![self.kind.clone()]);
        let wanted: Vec<IngredientRequirement> = tiers
            .iter()
            .filter_map(|name| logistics.catalog().id_of(name))
            .map(|id| IngredientRequirement::new(vec![id], 1))
            .collect();
        if !wanted.is_empty() {
            match logistics.retrieve_items_from_zone(STOCK_ZONE, &wanted).await {
                Ok(_) => {}
                // No stockpile configured: the craft request is the only
                // avenue left, not a reason to kill the role.
                Err(LogisticsError::ZoneNotFound(_)) => {
                    debug!(tool = %self.kind, "no stockpile zone for tool retrieval");
                }
                Err(err) => return Err(err.into()),
            }
        }

        if holds_tool(world, &self.kind) {
            self.requested = false;
            world.say(&format!("Found a {} in storage.", self.kind));
            return Ok(true);
        }

        if !self.requested {
            world.say(&format!("craft request: {}", self.kind));
            world.say(&format!("Out of {}s, waiting for a delivery.", self.kind));
            self.requested = true;
        }
        Ok(false)
    }
}
