//! The [`World`] trait: everything the runtime does to the game world.
//!
//! The connected game client (connection, physics, window transactions) is
//! an external collaborator. This trait is the seam: professions and engines
//! are generic over `W: World`, so every one of them runs unchanged against
//! the in-memory [`crate::SimWorld`].
//!
//! Contract notes:
//! - `open_container`/`close_container` bracket every container
//!   interaction; callers must close on every exit path.
//! - `craft` releases any station interaction it opens on every exit path,
//!   success or failure.
//! - `say` is the chat side channel; it must never carry control flow.

use std::future::Future;

use overseer_types::{BlockPos, ItemId, ItemStack, Recipe};

use crate::error::WorldError;

/// A navigation target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavGoal {
    /// Arrive within `range` blocks of the position.
    Near {
        /// The target position.
        pos: BlockPos,
        /// Acceptable distance in blocks.
        range: u32,
    },
    /// Stand exactly on the position.
    Exact {
        /// The target position.
        pos: BlockPos,
    },
}

impl NavGoal {
    /// Goal of arriving within `range` blocks.
    pub const fn near(pos: BlockPos, range: u32) -> Self {
        Self::Near { pos, range }
    }

    /// Goal of standing exactly on the position.
    pub const fn exact(pos: BlockPos) -> Self {
        Self::Exact { pos }
    }

    /// The goal's target position.
    pub const fn pos(&self) -> BlockPos {
        match self {
            Self::Near { pos, .. } | Self::Exact { pos } => *pos,
        }
    }
}

/// Movement constraints for a navigation attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveProfile {
    /// May break blocks to open a path.
    pub can_dig: bool,
    /// May parkour-jump across gaps.
    pub allow_parkour: bool,
    /// May sprint.
    pub allow_sprint: bool,
    /// Move crouched (slower, never falls off edges, never tramples crops).
    pub sneak: bool,
}

impl MoveProfile {
    /// Unrestricted travel: dig, parkour, and sprint allowed.
    pub const fn free() -> Self {
        Self {
            can_dig: true,
            allow_parkour: true,
            allow_sprint: true,
            sneak: false,
        }
    }

    /// Travel without terrain damage: no digging, parkour and sprint allowed.
    ///
    /// The default for moving around bases and storage areas.
    pub const fn no_dig() -> Self {
        Self {
            can_dig: false,
            allow_parkour: true,
            allow_sprint: true,
            sneak: false,
        }
    }

    /// Crop-safe travel: no digging, no parkour, no sprint, sneaking.
    pub const fn careful() -> Self {
        Self {
            can_dig: false,
            allow_parkour: false,
            allow_sprint: false,
            sneak: true,
        }
    }
}

impl Default for MoveProfile {
    fn default() -> Self {
        Self::no_dig()
    }
}

/// The game world as seen and acted on by one agent.
///
/// Implementations are expected to serialize access internally; callers
/// issue one operation at a time per agent.
#[allow(async_fn_in_trait)]
pub trait World: Send + Sync {
    // --- Perception ---

    /// The agent's current block position.
    fn position(&self) -> BlockPos;

    /// Snapshot of the agent's inventory, one stack per held item kind.
    fn inventory(&self) -> Vec<ItemStack>;

    /// Total held count summed across any of the given item ids.
    fn count_items(&self, acceptable: &[ItemId]) -> u32 {
        self.inventory()
            .iter()
            .filter(|stack| acceptable.contains(&stack.id))
            .fold(0, |acc, stack| acc.saturating_add(stack.count))
    }

    /// Number of free inventory slots.
    fn empty_slots(&self) -> u32;

    /// Positions of blocks matching any of the given kind names, within
    /// `max_distance` of the agent, at most `cap` results.
    fn find_blocks(&self, kinds: &[&str], max_distance: u32, cap: usize) -> Vec<BlockPos>;

    /// The kind name of the block at a position (`None` for air/unknown).
    fn block_name_at(&self, pos: BlockPos) -> Option<String>;

    /// The block's state value at a position (crop growth stage and the
    /// like), when the block has one.
    fn block_state_at(&self, pos: BlockPos) -> Option<u8>;

    /// Positions of dropped-item entities within `max_distance` of the
    /// agent.
    fn item_drops(&self, max_distance: u32) -> Vec<BlockPos>;

    // --- Movement ---

    /// Travel toward the goal under the given constraints. Resolves when
    /// the goal is reached; fails on unreachable goals or cancellation.
    fn navigate(
        &self,
        goal: NavGoal,
        profile: MoveProfile,
    ) -> impl Future<Output = Result<(), WorldError>> + Send;

    /// Cancel any in-flight navigation goal.
    fn cancel_navigation(&self);

    /// Toggle crouching outside of navigation.
    fn set_sneak(&self, on: bool);

    // --- Containers ---

    /// Open the container at `pos` and return a snapshot of its contents.
    fn open_container(
        &self,
        pos: BlockPos,
    ) -> impl Future<Output = Result<Vec<ItemStack>, WorldError>> + Send;

    /// Deposit `count` of `item` into the open container at `pos`.
    fn deposit(
        &self,
        pos: BlockPos,
        item: ItemId,
        count: u32,
    ) -> impl Future<Output = Result<(), WorldError>> + Send;

    /// Withdraw `count` of `item` from the open container at `pos`.
    fn withdraw(
        &self,
        pos: BlockPos,
        item: ItemId,
        count: u32,
    ) -> impl Future<Output = Result<(), WorldError>> + Send;

    /// Close the container interaction at `pos`. Must be called on every
    /// exit path after a successful `open_container`.
    fn close_container(&self, pos: BlockPos) -> impl Future<Output = ()> + Send;

    // --- Actions ---

    /// Perform `batches` repetitions of the recipe, using the station block
    /// at `station` when the recipe requires one.
    fn craft(
        &self,
        recipe: &Recipe,
        batches: u32,
        station: Option<BlockPos>,
    ) -> impl Future<Output = Result<(), WorldError>> + Send;

    /// Equip the held item into the hand slot.
    fn equip(&self, item: ItemId) -> impl Future<Output = Result<(), WorldError>> + Send;

    /// Break the block at `pos`, collecting its drop.
    fn dig(&self, pos: BlockPos) -> impl Future<Output = Result<(), WorldError>> + Send;

    /// Place one unit of the held `item` as a block at `pos`.
    fn place_block(
        &self,
        pos: BlockPos,
        item: ItemId,
    ) -> impl Future<Output = Result<(), WorldError>> + Send;

    // --- Timing and narration ---

    /// Suspend for `ticks` simulation ticks.
    fn wait_ticks(&self, ticks: u32) -> impl Future<Output = ()> + Send;

    /// Emit a chat message (human-readable narration only).
    fn say(&self, message: &str);
}
