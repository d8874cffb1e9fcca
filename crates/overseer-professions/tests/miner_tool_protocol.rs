//! End-to-end miner scenario: losing the pickaxe mid-cycle routes through
//! the tool-acquisition protocol with a single craft-request signal.

use std::sync::Arc;

use overseer_types::{BlockPos, CategoryTable, Place};
use overseer_world::{LocationStore, SimWorld, World, STOCK_ZONE};

use overseer_logistics::LogisticsEngine;
use overseer_professions::miner::{Miner, MinerConfig, MinerState};
use overseer_professions::Profession;

fn temp_store(tag: &str) -> Arc<LocationStore> {
    let unique = uuid::Uuid::new_v4();
    let path = std::env::temp_dir().join(format!("overseer-miner-{tag}-{unique}.json"));
    Arc::new(LocationStore::new(path))
}

async fn rig(tag: &str) -> (Arc<SimWorld>, Arc<LocationStore>, Miner<SimWorld>) {
    let world = Arc::new(SimWorld::vanilla());
    world.set_position(BlockPos::new(0, 64, 0));
    let locations = temp_store(tag);
    let set = locations
        .set(STOCK_ZONE, Place::region(0, 64, 0, 5, 5))
        .await;
    assert!(set.is_ok());
    let catalog = Arc::clone(world.catalog());
    let logistics = Arc::new(LogisticsEngine::new(
        Arc::clone(&world),
        Arc::clone(&locations),
        catalog,
        Arc::new(CategoryTable::default()),
    ));
    let miner = Miner::new(Arc::clone(&world), logistics, MinerConfig::default());
    (world, locations, miner)
}

#[tokio::test]
async fn lost_pickaxe_emits_one_craft_request_until_resupplied() {
    let (world, _locations, mut miner) = rig("protocol").await;
    world.give("stone_pickaxe", 1);
    miner.set_site(BlockPos::new(0, 64, 0), BlockPos::new(-10, 64, 0));
    miner.set_enabled(true);
    assert_eq!(miner.state(), MinerState::TravelToMine);

    // Travel, then one working cycle with the pickaxe in hand.
    assert!(miner.run_cycle().await.is_ok());
    assert_eq!(miner.state(), MinerState::Mining);
    assert!(miner.run_cycle().await.is_ok());

    // The pickaxe vanishes mid-cycle.
    world.clear_inventory();
    assert!(miner.run_cycle().await.is_ok());
    assert_eq!(miner.state(), MinerState::ReturnToBase);

    // Back home, the empty deposit pass notices the missing tool.
    assert!(miner.run_cycle().await.is_ok());
    assert_eq!(miner.state(), MinerState::Depositing);
    assert!(miner.run_cycle().await.is_ok());
    assert_eq!(miner.state(), MinerState::AwaitTool);

    // Several waiting cycles emit exactly one craft-request signal.
    for _ in 0..3 {
        assert!(miner.run_cycle().await.is_ok());
        assert_eq!(miner.state(), MinerState::AwaitTool);
    }
    let requests = world
        .chat_log()
        .into_iter()
        .filter(|line| line.starts_with("craft request:"))
        .count();
    assert_eq!(requests, 1);

    // A pickaxe shows up in the stockpile; the next cycle grabs it, the
    // flag resets, and mining resumes.
    world.add_container(BlockPos::new(1, 64, 1), &[("iron_pickaxe", 1)]);
    assert!(miner.run_cycle().await.is_ok());
    assert_eq!(miner.state(), MinerState::TravelToMine);
    assert_eq!(world.held("iron_pickaxe"), 1);
}

#[tokio::test]
async fn full_stone_haul_is_banked_and_gear_kept() {
    let (world, _locations, mut miner) = rig("haul").await;
    world.give("stone_pickaxe", 1);
    world.give("cobblestone", 300);
    let chest = BlockPos::new(1, 64, 1);
    world.add_container(chest, &[]);

    miner.set_site(BlockPos::new(0, 64, 0), BlockPos::new(-10, 64, 0));
    miner.set_enabled(true);

    // Travel, then the capacity check fires immediately.
    assert!(miner.run_cycle().await.is_ok());
    assert!(miner.run_cycle().await.is_ok());
    assert_eq!(miner.state(), MinerState::ReturnToBase);

    assert!(miner.run_cycle().await.is_ok());
    assert!(miner.run_cycle().await.is_ok());

    // The stone went into the stockpile; the pickaxe stayed in hand.
    assert_eq!(world.held("cobblestone"), 0);
    assert_eq!(world.held("stone_pickaxe"), 1);
    assert_eq!(
        world.container_contents(chest),
        vec![("cobblestone".to_owned(), 300)]
    );
    assert_eq!(miner.state(), MinerState::TravelToMine);
}

#[tokio::test]
async fn disable_and_reenable_resumes_near_last_dig() {
    let (world, _locations, mut miner) = rig("resume").await;
    world.give("stone_pickaxe", 1);
    miner.set_site(BlockPos::new(0, 64, 0), BlockPos::new(-10, 64, 0));
    miner.set_enabled(true);

    assert!(miner.run_cycle().await.is_ok());
    assert!(miner.run_cycle().await.is_ok());
    let dig_site = world.position();

    miner.set_enabled(false);
    assert_eq!(miner.state(), MinerState::Idle);

    // Wander off, re-enable: the first travel cycle heads back to the dig
    // site, not the mine entrance.
    world.set_position(BlockPos::new(40, 64, 40));
    miner.set_enabled(true);
    assert!(miner.run_cycle().await.is_ok());
    assert!(world.position().within(dig_site, 2));
}
