//! Excavation mechanics shared by the mining role.
//!
//! Individual block breaks carry safety checks: liquids (and blocks
//! adjacent to liquids) are never dug, and unbreakable blocks abort the
//! attempt. On top of that sit two strategies: the descending staircase
//! step (a 1x2 tunnel dropping one block per step) and the flood-fill vein
//! miner that follows connected ore blocks.

use std::collections::{BTreeSet, VecDeque};

use tracing::debug;

use overseer_types::{BlockPos, Direction};
use overseer_world::{MoveProfile, NavGoal, World};

/// How close the agent must get before digging a block.
const DIG_REACH: u32 = 4;

/// Whether a block name is a liquid (still or flowing).
fn is_liquid(name: &str) -> bool {
    name.contains("water") || name.contains("lava") || name.contains("flowing_")
}

/// The six face-adjacent offsets.
const FACES: &[(i32, i32, i32)] = &[
    (0, 1, 0),
    (0, -1, 0),
    (1, 0, 0),
    (-1, 0, 0),
    (0, 0, 1),
    (0, 0, -1),
];

/// Break one block safely, walking into reach first.
///
/// Returns true when the position ends up clear (including "it was already
/// air"). Liquids, blocks touching liquids, unbreakable blocks, and
/// navigation or dig failures all report false without raising.
pub async fn mine_block_at<W: World>(world: &W, pos: BlockPos) -> bool {
    let Some(name) = world.block_name_at(pos) else {
        return true;
    };
    if is_liquid(&name) || name == "bedrock" {
        return false;
    }

    // Neighbor scan: breaking a block next to liquid floods the tunnel.
    for (dx, dy, dz) in FACES {
        let neighbor = pos.offset(*dx, *dy, *dz);
        if let Some(neighbor_name) = world.block_name_at(neighbor) {
            if is_liquid(&neighbor_name) {
                debug!(block = %pos, "liquid adjacent, refusing to dig");
                return false;
            }
        }
    }

    if world
        .navigate(NavGoal::near(pos, DIG_REACH), MoveProfile::free())
        .await
        .is_err()
    {
        return false;
    }
    world.dig(pos).await.is_ok()
}

/// Dig one staircase step in the given direction: clear the head space
/// ahead, then the head and feet of the next (one lower) standing spot,
/// then walk down onto it.
pub async fn dig_staircase_step<W: World>(world: &W, direction: Direction) -> bool {
    let (dx, dz) = direction.step();
    let standing = world.position();
    let next_stand = standing.offset(dx, -1, dz);
    let next_head = next_stand.offset(0, 1, 0);
    let front_head = standing.offset(dx, 1, dz);

    if !mine_block_at(world, front_head).await {
        return false;
    }
    if !mine_block_at(world, next_head).await {
        return false;
    }
    if !mine_block_at(world, next_stand).await {
        return false;
    }

    world
        .navigate(NavGoal::exact(next_stand), MoveProfile::free())
        .await
        .is_ok()
}

/// Flood-fill a vein: mine the starting block and every connected block of
/// the same kinds, following face and diagonal adjacency.
///
/// Returns how many blocks were actually mined.
pub async fn mine_vein<W: World>(world: &W, start: BlockPos, kinds: &[&str]) -> u32 {
    let mut visited: BTreeSet<BlockPos> = BTreeSet::new();
    let mut frontier: VecDeque<BlockPos> = VecDeque::from([start]);
    let mut mined = 0u32;

    while let Some(pos) = frontier.pop_front() {
        if !visited.insert(pos) {
            continue;
        }
        let Some(name) = world.block_name_at(pos) else {
            continue;
        };
        if !kinds.contains(&name.as_str()) {
            continue;
        }
        if !mine_block_at(world, pos).await {
            continue;
        }
        mined = mined.saturating_add(1);

        // Veins snake diagonally, so scan the full 3x3x3 neighborhood.
        for dx in -1..=1 {
            for dy in -1..=1 {
                for dz in -1..=1 {
                    if dx == 0 && dy == 0 && dz == 0 {
                        continue;
                    }
                    let neighbor = pos.offset(dx, dy, dz);
                    if visited.contains(&neighbor) {
                        continue;
                    }
                    if let Some(neighbor_name) = world.block_name_at(neighbor) {
                        if kinds.contains(&neighbor_name.as_str()) {
                            frontier.push_back(neighbor);
                        }
                    }
                }
            }
        }
    }

    mined
}
