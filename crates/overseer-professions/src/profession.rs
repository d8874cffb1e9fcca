//! Role identities and the common profession interface.

use std::future::Future;

use crate::error::ProfessionError;

/// The work roles an agent can take on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RoleKind {
    /// Staircase mining and ore extraction.
    Miner,
    /// Tree felling.
    Woodcutter,
    /// Crop harvesting and replanting.
    Farmer,
    /// Stockpile collection and sorting.
    Stockkeeper,
    /// The crafting service (order queue).
    Crafter,
}

impl RoleKind {
    /// All roles, in tick order.
    pub const ALL: &[Self] = &[
        Self::Miner,
        Self::Woodcutter,
        Self::Farmer,
        Self::Stockkeeper,
        Self::Crafter,
    ];

    /// Canonical role name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Miner => "miner",
            Self::Woodcutter => "woodcutter",
            Self::Farmer => "farmer",
            Self::Stockkeeper => "stockkeeper",
            Self::Crafter => "crafter",
        }
    }

    /// Parse a role name. Accepts English and Portuguese forms.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "miner" | "minerador" => Some(Self::Miner),
            "woodcutter" | "lenhador" => Some(Self::Woodcutter),
            "farmer" | "fazendeiro" | "agricultor" => Some(Self::Farmer),
            "stockkeeper" | "estoquista" => Some(Self::Stockkeeper),
            "crafter" | "artesao" | "artes\u{e3}o" => Some(Self::Crafter),
            _ => None,
        }
    }
}

impl core::fmt::Display for RoleKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

/// The interface every profession exposes to the manager and the command
/// layer.
///
/// A cycle is one state-machine step: evaluate the world, derive an event,
/// transition, act. Drivers suspend at navigation, container transactions,
/// and tick waits, so at most one step per agent is ever in flight.
#[allow(async_fn_in_trait)]
pub trait Profession {
    /// The role this machine implements.
    fn role(&self) -> RoleKind;

    /// Whether the role is currently enabled.
    fn is_enabled(&self) -> bool;

    /// Enable or disable the role.
    ///
    /// Disabling cancels in-flight navigation and resets transient context
    /// (request flags, failure counters) so a later re-enable starts clean;
    /// the last work position survives so work resumes nearby.
    fn set_enabled(&mut self, enabled: bool);

    /// Run one state-machine cycle.
    fn run_cycle(&mut self) -> impl Future<Output = Result<(), ProfessionError>> + Send;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_names_roundtrip() {
        for role in RoleKind::ALL {
            assert_eq!(RoleKind::from_name(role.name()), Some(*role));
        }
    }

    #[test]
    fn portuguese_aliases() {
        assert_eq!(RoleKind::from_name("lenhador"), Some(RoleKind::Woodcutter));
        assert_eq!(RoleKind::from_name("estoquista"), Some(RoleKind::Stockkeeper));
        assert_eq!(RoleKind::from_name("minerador"), Some(RoleKind::Miner));
        assert_eq!(RoleKind::from_name("agricultor"), Some(RoleKind::Farmer));
        assert_eq!(RoleKind::from_name("blacksmith"), None);
    }
}
