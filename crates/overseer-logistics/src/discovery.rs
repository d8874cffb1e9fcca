//! Container discovery inside a zone's bounding box.
//!
//! Discovery is a spatial filter over a capped nearby-block query, not a
//! full world scan: the world is asked for container-kind blocks within a
//! fixed radius (bounded result count), and the hits are filtered to the
//! zone's inclusive box and sorted nearest-first so transaction passes
//! minimize travel.

use overseer_types::{BlockPos, Zone};
use overseer_world::World;

/// Block kinds treated as storage containers.
pub const CONTAINER_KINDS: &[&str] = &["chest", "barrel", "trapped_chest"];

/// Search radius for the nearby-block query, in blocks.
pub const CONTAINER_SEARCH_RADIUS: u32 = 32;

/// Result cap for the nearby-block query.
pub const CONTAINER_SEARCH_CAP: usize = 50;

/// Containers inside the zone, sorted by distance to the agent.
pub fn containers_in_zone<W: World>(world: &W, zone: &Zone) -> Vec<BlockPos> {
    let origin = world.position();
    let mut found: Vec<BlockPos> = world
        .find_blocks(CONTAINER_KINDS, CONTAINER_SEARCH_RADIUS, CONTAINER_SEARCH_CAP)
        .into_iter()
        .filter(|pos| zone.contains(*pos))
        .collect();
    found.sort_by_key(|pos| origin.distance_sq(*pos));
    found
}
