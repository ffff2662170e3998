#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Data Farm.

mod farm;

use std::time::Duration;

use data_farm_core::{
    Command, Event, FacingDirection, NasaData, PlayerSnapshot, Position, TileIndex, Tool,
    WELCOME_BANNER,
};

use self::farm::Farm;

pub use self::farm::ActiveExperiment;

const DEFAULT_TILE_COUNT: u32 = 40;

/// Represents the authoritative Data Farm world state.
#[derive(Debug)]
pub struct World {
    banner: &'static str,
    player: PlayerSnapshot,
    farm: Farm,
    selected_tool: Option<Tool>,
    conditions: NasaData,
    tick_index: u64,
    elapsed: Duration,
}

impl World {
    /// Creates a new Data Farm world with the farmer at the starting position.
    #[must_use]
    pub fn new() -> Self {
        Self {
            banner: WELCOME_BANNER,
            player: PlayerSnapshot::default(),
            farm: Farm::new(DEFAULT_TILE_COUNT),
            selected_tool: None,
            conditions: NasaData::default(),
            tick_index: 0,
            elapsed: Duration::ZERO,
        }
    }

    fn move_player(
        &mut self,
        position: Position,
        facing: FacingDirection,
        out_events: &mut Vec<Event>,
    ) {
        let from = self.player.position;
        if from != position {
            self.player.position = position;
            out_events.push(Event::PlayerMoved { from, to: position });
        }

        if self.player.facing != facing {
            self.player.facing = facing;
            out_events.push(Event::FacingChanged { facing });
        }
    }

    fn set_active_tile(&mut self, tile: Option<TileIndex>, out_events: &mut Vec<Event>) {
        let tile = tile.filter(|index| {
            let known = index.get() < self.farm.tile_count();
            if !known {
                log::debug!(
                    "ignoring active tile {} outside farm of {} tiles",
                    index.get(),
                    self.farm.tile_count()
                );
            }
            known
        });

        let previous = self.player.active_tile;
        if previous == tile {
            return;
        }

        self.player.active_tile = tile;
        out_events.push(Event::ActiveTileChanged {
            previous,
            current: tile,
        });
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::ConfigureFarm { tile_count } => {
            world.farm.resize(tile_count);
            log::debug!("farm configured with {tile_count} tiles");
            out_events.push(Event::FarmConfigured { tile_count });
            let active = world.player.active_tile;
            world.set_active_tile(active, out_events);
        }
        Command::Tick { dt } => {
            world.tick_index = world.tick_index.saturating_add(1);
            world.elapsed = world.elapsed.saturating_add(dt);
            out_events.push(Event::TimeAdvanced { dt });
        }
        Command::MovePlayer { position, facing } => {
            world.move_player(position, facing, out_events);
        }
        Command::SetActiveTile { tile } => {
            world.set_active_tile(tile, out_events);
        }
        Command::SelectTool { tool } => {
            if world.selected_tool != tool {
                world.selected_tool = tool;
                out_events.push(Event::ToolSelected { tool });
            }
        }
        Command::UseTool { tool, tile } => {
            world.farm.use_tool(tool, tile, out_events);
        }
        Command::SetConditions { conditions } => {
            world.conditions = conditions;
            out_events.push(Event::ConditionsChanged { conditions });
        }
        Command::SelectSeed { crop } => {
            world.farm.select_seed(crop, out_events);
        }
        Command::EndDay => {
            let conditions = world.conditions;
            world.farm.end_day(&conditions, out_events);
        }
        Command::StartExperiment {
            experiment,
            cost,
            duration_days,
        } => {
            world
                .farm
                .start_experiment(experiment, cost, duration_days, out_events);
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use std::time::Duration;

    use super::{ActiveExperiment, World};
    use data_farm_core::{Crop, NasaData, PlayerSnapshot, Resources, TileIndex, TileState, Tool};

    /// Retrieves the welcome banner that adapters may display to players.
    #[must_use]
    pub fn welcome_banner(world: &World) -> &'static str {
        world.banner
    }

    /// Captures the farmer's position, facing direction and active tile.
    #[must_use]
    pub fn player(world: &World) -> PlayerSnapshot {
        world.player
    }

    /// Tile currently within interaction range, if any.
    #[must_use]
    pub fn active_tile(world: &World) -> Option<TileIndex> {
        world.player.active_tile
    }

    /// Number of tiles composing the farm.
    #[must_use]
    pub fn tile_count(world: &World) -> u32 {
        world.farm.tile_count()
    }

    /// State of every farm tile in index order.
    #[must_use]
    pub fn tiles(world: &World) -> &[TileState] {
        world.farm.tiles()
    }

    /// State of a single farm tile, or `None` outside the farm.
    #[must_use]
    pub fn tile(world: &World, tile: TileIndex) -> Option<TileState> {
        world.farm.tiles().get(tile.get() as usize).copied()
    }

    /// Farmer supplies, experience and calendar.
    #[must_use]
    pub fn resources(world: &World) -> Resources {
        world.farm.resources()
    }

    /// Crop sown by the plant tool.
    #[must_use]
    pub fn seed(world: &World) -> Crop {
        world.farm.seed()
    }

    /// Research experiments that are still running.
    #[must_use]
    pub fn active_experiments(world: &World) -> &[ActiveExperiment] {
        world.farm.experiments()
    }

    /// Number of days ended since the world was created.
    #[must_use]
    pub fn days_elapsed(world: &World) -> u32 {
        world.farm.days_elapsed()
    }

    /// Tool the farmer currently holds, if any.
    #[must_use]
    pub fn selected_tool(world: &World) -> Option<Tool> {
        world.selected_tool
    }

    /// Satellite conditions currently observed over the farm.
    #[must_use]
    pub fn conditions(world: &World) -> NasaData {
        world.conditions
    }

    /// Number of ticks processed since the world was created.
    #[must_use]
    pub fn tick_index(world: &World) -> u64 {
        world.tick_index
    }

    /// Total time accumulated across every processed tick.
    #[must_use]
    pub fn elapsed(world: &World) -> Duration {
        world.elapsed
    }
}
