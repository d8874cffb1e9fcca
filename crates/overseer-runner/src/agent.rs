//! Agent assembly and command dispatch.
//!
//! One [`BotAgent`] owns one world handle and one profession manager,
//! wired together with explicit dependency injection -- no globals. The
//! agent alternates between draining its command channel and ticking the
//! enabled professions; both happen on one task, so at most one step per
//! agent is ever in flight.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tracing::{debug, info};

use overseer_types::{ore_alias, CategoryTable, ItemCatalog, Place, RecipeBook};
use overseer_world::{LocationStore, MoveProfile, NavGoal, SimWorld, World};

use overseer_professions::{digging, ProfessionManager, RoleKind};

use crate::commands::Command;

/// Ticks between profession cycles when idle.
const TICK_WAIT: u32 = 10;

/// Search radius for one-shot ore commands.
const ORE_SEARCH_RADIUS: u32 = 32;

/// One launched agent: world handle, profession manager, command inbox.
pub struct BotAgent {
    name: String,
    world: Arc<SimWorld>,
    locations: Arc<LocationStore>,
    manager: ProfessionManager<SimWorld>,
    command_timeout: Duration,
}

impl BotAgent {
    /// Assemble an agent over a fresh simulated world.
    pub fn new(
        name: impl Into<String>,
        locations: Arc<LocationStore>,
        categories: Arc<CategoryTable>,
        command_timeout: Duration,
    ) -> Self {
        let catalog = Arc::new(ItemCatalog::vanilla_subset());
        let book = Arc::new(RecipeBook::vanilla_subset(&catalog));
        let world = Arc::new(SimWorld::new(Arc::clone(&catalog)));
        let manager = ProfessionManager::new(
            Arc::clone(&world),
            Arc::clone(&locations),
            catalog,
            book,
            categories,
        );
        Self {
            name: name.into(),
            world,
            locations,
            manager,
            command_timeout,
        }
    }

    /// The agent's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The agent's world handle (the dry-run harness inspects it).
    pub const fn world(&self) -> &Arc<SimWorld> {
        &self.world
    }

    /// The profession manager (exposed for startup profession enabling).
    pub const fn manager_mut(&mut self) -> &mut ProfessionManager<SimWorld> {
        &mut self.manager
    }

    /// Drive the agent until its command channel closes.
    pub async fn run(mut self, mut commands: mpsc::Receiver<Command>) {
        info!(agent = %self.name, "agent loop started");
        loop {
            let world = Arc::clone(&self.world);
            tokio::select! {
                maybe_command = commands.recv() => {
                    match maybe_command {
                        Some(command) => self.dispatch(command).await,
                        None => break,
                    }
                }
                () = world.wait_ticks(TICK_WAIT) => {
                    self.manager.tick().await;
                }
            }
        }
        info!(agent = %self.name, "agent loop finished");
    }

    /// Apply one command.
    pub async fn dispatch(&mut self, command: Command) {
        debug!(agent = %self.name, ?command, "dispatching command");
        match command {
            Command::Profession { role, on } => self.toggle_profession(&role, on),
            Command::Craft { item, amount } => {
                // The crafting service picks the order up on its next cycle.
                self.manager.enable(RoleKind::Crafter);
                let _ = self.manager.crafter_mut().add_order(&item, amount);
            }
            Command::Mine { ore, direction } => self.mine_vein(&ore, direction).await,
            Command::Goto { location } => self.goto(&location).await,
            Command::SetLocation { name, width, depth } => {
                self.set_location(&name, width, depth).await;
            }
            Command::Status => self.report_status(),
            Command::Stop => self.stop_everything(),
        }
    }

    fn toggle_profession(&mut self, role: &str, on: bool) {
        let Some(kind) = RoleKind::from_name(role) else {
            self.world.say(&format!("Unknown profession '{role}'."));
            return;
        };
        let changed = if on {
            self.manager.enable(kind)
        } else {
            self.manager.disable(kind)
        };
        if !changed {
            let state = if on { "enabled" } else { "disabled" };
            self.world.say(&format!("{kind} is already {state}."));
        }
    }

    /// One-shot vein mining: find the nearest aliased ore block and
    /// flood-fill it, racing the command timeout.
    async fn mine_vein(&mut self, ore: &str, direction: overseer_types::Direction) {
        let Some(kinds) = ore_alias(ore) else {
            self.world.say(&format!("Unknown ore '{ore}'."));
            return;
        };

        let found = self.world.find_blocks(kinds, ORE_SEARCH_RADIUS, 16);
        let start = match found.first() {
            Some(pos) => *pos,
            None => {
                // Nothing exposed nearby: open a staircase step toward it
                // instead of failing silently.
                self.world
                    .say(&format!("No {ore} in sight, digging {direction}."));
                let world = Arc::clone(&self.world);
                let dug = tokio::time::timeout(self.command_timeout, async move {
                    digging::dig_staircase_step(world.as_ref(), direction).await
                })
                .await;
                match dug {
                    Ok(true) => self.world.say("Dug one step."),
                    Ok(false) => self.world.say("Could not dig here."),
                    Err(_) => self.world.say("Digging timed out."),
                }
                return;
            }
        };

        let world = Arc::clone(&self.world);
        let mined = tokio::time::timeout(self.command_timeout, async move {
            digging::mine_vein(world.as_ref(), start, kinds).await
        })
        .await;
        match mined {
            Ok(count) => self.world.say(&format!("Mined {count}x {ore}.")),
            Err(_) => self.world.say(&format!("Mining {ore} timed out.")),
        }
    }

    async fn goto(&mut self, location: &str) {
        let place = match self.locations.get(location).await {
            Ok(Some(place)) => place,
            Ok(None) => {
                self.world.say(&format!("Location '{location}' not found."));
                return;
            }
            Err(err) => {
                self.world.say(&format!("Location store failed: {err}."));
                return;
            }
        };

        let world = Arc::clone(&self.world);
        let goal = NavGoal::near(place.anchor(), 1);
        let walked = tokio::time::timeout(self.command_timeout, async move {
            world.navigate(goal, MoveProfile::no_dig()).await
        })
        .await;
        match walked {
            Ok(Ok(())) => self.world.say(&format!("Arrived at '{location}'.")),
            Ok(Err(err)) => {
                self.world
                    .say(&format!("Could not reach '{location}': {err}."));
            }
            Err(_) => {
                self.world.cancel_navigation();
                self.world
                    .say(&format!("Travel to '{location}' timed out."));
            }
        }
    }

    async fn set_location(&mut self, name: &str, width: Option<u32>, depth: Option<u32>) {
        let pos = self.world.position();
        let place = match (width, depth) {
            (Some(width), Some(depth)) => Place::region(pos.x, pos.y, pos.z, width, depth),
            _ => Place::point(pos.x, pos.y, pos.z),
        };
        match self.locations.set(name, place).await {
            Ok(()) => self.world.say(&format!("Saved location '{name}' at {pos}.")),
            Err(err) => self.world.say(&format!("Could not save '{name}': {err}.")),
        }
    }

    fn report_status(&mut self) {
        let enabled = self.manager.list_enabled();
        let roles = if enabled.is_empty() {
            "none".to_owned()
        } else {
            enabled
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", ")
        };
        let pos = self.world.position();
        let queued = self.manager.crafter_mut().queue_len();
        self.world.say(&format!(
            "{}: at {pos}, roles [{roles}], {queued} craft orders queued.",
            self.name
        ));
    }

    fn stop_everything(&mut self) {
        for role in RoleKind::ALL {
            let _ = self.manager.disable(*role);
        }
        self.world.cancel_navigation();
        self.world.say("All work stopped.");
    }
}

#[cfg(test)]
mod tests {
    use overseer_types::BlockPos;

    use super::*;

    fn agent(tag: &str) -> BotAgent {
        let unique = uuid::Uuid::new_v4();
        let path = std::env::temp_dir().join(format!("overseer-agent-{tag}-{unique}.json"));
        BotAgent::new(
            "tester",
            Arc::new(LocationStore::new(path)),
            Arc::new(CategoryTable::default()),
            Duration::from_secs(5),
        )
    }

    #[tokio::test]
    async fn profession_toggle_via_command() {
        let mut agent = agent("toggle");
        agent
            .dispatch(Command::Profession {
                role: "lenhador".to_owned(),
                on: true,
            })
            .await;
        assert!(agent.manager_mut().is_enabled(RoleKind::Woodcutter));

        agent
            .dispatch(Command::Profession {
                role: "woodcutter".to_owned(),
                on: false,
            })
            .await;
        assert!(!agent.manager_mut().is_enabled(RoleKind::Woodcutter));
    }

    #[tokio::test]
    async fn unknown_profession_is_acknowledged() {
        let mut agent = agent("unknown");
        agent
            .dispatch(Command::Profession {
                role: "astronaut".to_owned(),
                on: true,
            })
            .await;
        assert!(agent
            .world()
            .chat_log()
            .iter()
            .any(|line| line.contains("Unknown profession")));
    }

    #[tokio::test]
    async fn set_then_goto_location() {
        let mut agent = agent("goto");
        agent.world().set_position(BlockPos::new(7, 64, -3));
        agent
            .dispatch(Command::SetLocation {
                name: "base".to_owned(),
                width: None,
                depth: None,
            })
            .await;

        agent.world().set_position(BlockPos::new(0, 64, 0));
        agent
            .dispatch(Command::Goto {
                location: "base".to_owned(),
            })
            .await;
        assert_eq!(agent.world().position(), BlockPos::new(7, 64, -3));
        assert!(agent
            .world()
            .chat_log()
            .iter()
            .any(|line| line.contains("Arrived at 'base'")));
    }

    #[tokio::test]
    async fn craft_command_queues_and_enables_the_crafter() {
        let mut agent = agent("craft");
        agent
            .dispatch(Command::Craft {
                item: "axe".to_owned(),
                amount: 1,
            })
            .await;
        assert!(agent.manager_mut().is_enabled(RoleKind::Crafter));
        assert_eq!(agent.manager_mut().crafter_mut().queue_len(), 1);
    }

    #[tokio::test]
    async fn mine_command_clears_a_vein() {
        let mut agent = agent("vein");
        agent.world().set_position(BlockPos::new(0, 60, 0));
        agent.world().set_block(BlockPos::new(2, 60, 0), "iron_ore");
        agent.world().set_block(BlockPos::new(3, 60, 0), "iron_ore");

        agent
            .dispatch(Command::Mine {
                ore: "iron".to_owned(),
                direction: overseer_types::Direction::North,
            })
            .await;
        assert_eq!(
            agent.world().block_name_at(BlockPos::new(2, 60, 0)),
            None
        );
        assert!(agent
            .world()
            .chat_log()
            .iter()
            .any(|line| line.contains("Mined 2x iron")));
    }

    #[tokio::test]
    async fn status_reports_roles_and_position() {
        let mut agent = agent("status");
        agent.dispatch(Command::Status).await;
        assert!(agent
            .world()
            .chat_log()
            .iter()
            .any(|line| line.contains("tester") && line.contains("roles [none]")));
    }

    #[tokio::test]
    async fn stop_disables_everything() {
        let mut agent = agent("stop");
        agent.manager_mut().enable(RoleKind::Woodcutter);
        agent.manager_mut().enable(RoleKind::Crafter);
        agent.dispatch(Command::Stop).await;
        assert!(agent.manager_mut().list_enabled().is_empty());
    }
}
