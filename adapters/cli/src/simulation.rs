use std::time::Duration;

use data_farm_core::{
    Command, Event, NasaData, PlayerSnapshot, Position, Resources, TileState, PLAYER_START,
    PLAYER_START_FACING,
};
use data_farm_rendering::{FarmLayout, FrameInput};
use data_farm_system_actions::{ActionInput, Actions};
use data_farm_system_climate::find_experiment;
use data_farm_system_input::InputSampler;
use data_farm_system_motion::{Motion, MotionConfig};
use data_farm_world::{self as world, query, World};

/// Owns the world and every system for one mounted farm view.
#[derive(Debug)]
pub(crate) struct Simulation {
    world: World,
    sampler: InputSampler,
    motion: Motion,
    actions: Actions,
    layout: FarmLayout,
}

impl Simulation {
    /// Mounts a farm view: configures the world and starts listening for keys.
    pub(crate) fn new(
        layout: FarmLayout,
        motion: MotionConfig,
        start: Position,
        conditions: NasaData,
    ) -> Self {
        let mut simulation = Self {
            world: World::new(),
            sampler: InputSampler::new(),
            motion: Motion::new(motion),
            actions: Actions::new(),
            layout,
        };

        let mut setup = vec![
            Command::ConfigureFarm {
                tile_count: simulation.layout.tile_count(),
            },
            Command::SetConditions { conditions },
        ];
        if start != PLAYER_START {
            setup.push(Command::MovePlayer {
                position: start,
                facing: PLAYER_START_FACING,
            });
        }
        let _ = simulation.execute(setup);

        simulation.sampler.attach();
        log::info!("{}", query::welcome_banner(&simulation.world));
        log::info!(
            "farm mounted with {} tiles, farmer at ({}, {})",
            simulation.layout.tile_count(),
            start.x(),
            start.y()
        );
        simulation
    }

    /// Advances the simulation by one rendered frame and returns the resulting events.
    ///
    /// A frame requesting to quit tears the view down instead of ticking.
    /// Frames after [`Simulation::teardown`] are ignored.
    pub(crate) fn advance_frame(&mut self, dt: Duration, input: FrameInput) -> Vec<Event> {
        if !self.sampler.is_attached() {
            return Vec::new();
        }
        if input.quit_requested {
            self.teardown();
            return Vec::new();
        }

        self.sampler.handle_all(&input.key_events);

        let mut frame_events = Vec::new();
        world::apply(&mut self.world, Command::Tick { dt }, &mut frame_events);
        if let Some(crop) = input.select_seed {
            world::apply(
                &mut self.world,
                Command::SelectSeed { crop },
                &mut frame_events,
            );
        }

        let mut commands = Vec::new();
        self.motion.handle(
            &frame_events,
            self.sampler.keys(),
            &self.layout,
            query::player(&self.world),
            &mut commands,
        );
        let mut pending = self.execute(commands);

        let mut action_input = ActionInput {
            select_tool: input.select_tool,
            put_away: input.put_away,
            use_tool: input.use_tool,
        };
        loop {
            let mut commands = Vec::new();
            self.actions.handle(
                &pending,
                action_input,
                &query::player(&self.world),
                &mut commands,
            );
            frame_events.append(&mut pending);
            if commands.is_empty() {
                break;
            }

            pending = self.execute(commands);
            action_input = ActionInput::default();
        }

        let mut farm_commands = Vec::new();
        if let Some(id) = input.start_experiment.as_deref() {
            match find_experiment(id) {
                Some(experiment) => farm_commands.push(experiment.start_command()),
                None => log::warn!("ignoring unknown experiment `{id}`"),
            }
        }
        if input.end_day {
            farm_commands.push(Command::EndDay);
        }
        frame_events.extend(self.execute(farm_commands));

        frame_events
    }

    /// Stops listening for input; later frames become no-ops.
    pub(crate) fn teardown(&mut self) {
        if self.sampler.is_attached() {
            log::info!("farm view torn down after {} ticks", self.tick_index());
        }
        self.sampler.detach();
    }

    fn execute(&mut self, commands: Vec<Command>) -> Vec<Event> {
        let mut events = Vec::new();
        for command in commands {
            world::apply(&mut self.world, command, &mut events);
        }
        events
    }

    pub(crate) fn player(&self) -> PlayerSnapshot {
        query::player(&self.world)
    }

    pub(crate) fn layout(&self) -> &FarmLayout {
        &self.layout
    }

    pub(crate) fn motion_config(&self) -> &MotionConfig {
        self.motion.config()
    }

    pub(crate) fn tick_index(&self) -> u64 {
        query::tick_index(&self.world)
    }

    pub(crate) fn resources(&self) -> Resources {
        query::resources(&self.world)
    }

    pub(crate) fn tiles(&self) -> &[TileState] {
        query::tiles(&self.world)
    }

    /// Status line with the score, the farmer's surroundings and the weather.
    pub(crate) fn hud_line(&self) -> String {
        let player = self.player();
        let resources = self.resources();
        let conditions = query::conditions(&self.world);
        let tool = query::selected_tool(&self.world).map_or("none", |tool| tool.label());
        let tile = match player.active_tile {
            None => "-".to_owned(),
            Some(index) => match query::tile(&self.world, index).and_then(|plot| {
                plot.crop.map(|crop| (crop, plot.growth))
            }) {
                Some((crop, growth)) => format!("{} ({} {growth}%)", index.get(), crop.label()),
                None => index.get().to_string(),
            },
        };

        format!(
            "${}  Lvl {} ({} xp)  Water {}/{}  Energy {}/{}  {} - Day {}  Seed: {}  Tool: {tool}  Tile: {tile}  NDVI {:.2}  Moisture {:.0}%  {:.0}°C",
            resources.money,
            resources.level,
            resources.xp,
            resources.water,
            resources.max_water,
            resources.energy,
            resources.max_energy,
            resources.season.label(),
            resources.day,
            query::seed(&self.world).label(),
            conditions.ndvi,
            conditions.soil_moisture,
            conditions.temperature,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use data_farm_core::{
        Crop, ExperimentError, FacingDirection, KeyEvent, TileIndex, Tool, ToolError,
    };

    const FRAME: Duration = Duration::from_millis(16);

    fn simulation() -> Simulation {
        Simulation::new(
            FarmLayout::default(),
            MotionConfig::default(),
            PLAYER_START,
            NasaData::default(),
        )
    }

    fn hold(key: &str) -> FrameInput {
        FrameInput {
            key_events: vec![KeyEvent::Pressed(key.to_owned())],
            ..FrameInput::default()
        }
    }

    #[test]
    fn holding_down_for_ten_frames_moves_fifty_units() {
        let mut simulation = simulation();
        let _ = simulation.advance_frame(FRAME, hold("s"));
        for _ in 1..10 {
            let _ = simulation.advance_frame(FRAME, FrameInput::default());
        }

        let player = simulation.player();
        assert_eq!(player.position, Position::new(300.0, 250.0));
        assert_eq!(player.facing, FacingDirection::Down);
        assert_eq!(simulation.tick_index(), 10);
    }

    #[test]
    fn first_step_activates_nearby_plot() {
        let mut simulation = simulation();
        let events = simulation.advance_frame(FRAME, hold("ArrowUp"));

        // Feet at (316, 235) sit 39 units from the center of plot 10.
        assert_eq!(simulation.player().active_tile, Some(TileIndex::new(10)));
        assert!(events.contains(&Event::ActiveTileChanged {
            previous: None,
            current: Some(TileIndex::new(10)),
        }));
    }

    fn release(key: &str) -> FrameInput {
        FrameInput {
            key_events: vec![KeyEvent::Released(key.to_owned())],
            ..FrameInput::default()
        }
    }

    fn apply_tool(tool: Tool) -> FrameInput {
        FrameInput {
            select_tool: Some(tool),
            use_tool: true,
            ..FrameInput::default()
        }
    }

    #[test]
    fn tool_is_used_on_active_plot() {
        let mut simulation = simulation();
        let _ = simulation.advance_frame(FRAME, hold("w"));
        let events = simulation.advance_frame(
            FRAME,
            FrameInput {
                key_events: vec![KeyEvent::Released("w".to_owned())],
                select_tool: Some(Tool::Plant),
                use_tool: true,
                ..FrameInput::default()
            },
        );

        assert!(events.contains(&Event::ToolSelected {
            tool: Some(Tool::Plant)
        }));
        assert!(events.contains(&Event::ToolUsed {
            tool: Tool::Plant,
            tile: TileIndex::new(10),
        }));
        assert!(simulation.tiles()[10].is_planted());
        let hud = simulation.hud_line();
        assert!(hud.contains("Tool: Plant"), "{hud}");
        assert!(hud.contains("Tile: 10 (Wheat 0%)"), "{hud}");
        assert!(hud.contains("$85"), "{hud}");
    }

    #[test]
    fn watering_an_empty_plot_is_rejected() {
        let mut simulation = simulation();
        let _ = simulation.advance_frame(FRAME, hold("w"));
        let _ = simulation.advance_frame(FRAME, release("w"));
        let events = simulation.advance_frame(FRAME, apply_tool(Tool::Water));

        assert!(events.contains(&Event::ToolRejected {
            tool: Tool::Water,
            tile: TileIndex::new(10),
            reason: ToolError::NotPlanted,
        }));
    }

    #[test]
    fn seed_choice_and_days_drive_a_harvest() {
        let mut simulation = Simulation::new(
            FarmLayout::default(),
            MotionConfig::default(),
            PLAYER_START,
            NasaData {
                precipitation: 0.0,
                ..NasaData::default()
            },
        );
        let _ = simulation.advance_frame(FRAME, hold("w"));
        let _ = simulation.advance_frame(
            FRAME,
            FrameInput {
                select_seed: Some(Crop::Lettuce),
                ..release("w")
            },
        );
        let _ = simulation.advance_frame(FRAME, apply_tool(Tool::Plant));
        for _ in 0..Crop::Lettuce.days_to_maturity() {
            let _ = simulation.advance_frame(FRAME, apply_tool(Tool::Water));
            let _ = simulation.advance_frame(
                FRAME,
                FrameInput {
                    end_day: true,
                    ..FrameInput::default()
                },
            );
        }

        let events = simulation.advance_frame(FRAME, apply_tool(Tool::Harvest));

        assert!(events.contains(&Event::CropHarvested {
            tile: TileIndex::new(10),
            crop: Crop::Lettuce,
            earnings: 20,
        }));
        let resources = simulation.resources();
        assert_eq!(resources.money, 100 - 5 + 20);
        assert_eq!(resources.day, 5);
        assert!(simulation.hud_line().contains("Spring - Day 5"));
    }

    #[test]
    fn known_experiments_are_funded_and_unknown_ones_ignored() {
        let mut simulation = simulation();
        let events = simulation.advance_frame(
            FRAME,
            FrameInput {
                start_experiment: Some("cover_crops".to_owned()),
                ..FrameInput::default()
            },
        );
        assert!(events
            .iter()
            .all(|event| !matches!(event, Event::ExperimentStarted { .. })));
        assert!(events.contains(&Event::ExperimentRejected {
            experiment: "cover_crops",
            reason: ExperimentError::NotEnoughMoney,
        }));

        let events = simulation.advance_frame(
            FRAME,
            FrameInput {
                start_experiment: Some("cold_fusion".to_owned()),
                ..FrameInput::default()
            },
        );
        assert!(events
            .iter()
            .all(|event| !matches!(event, Event::ExperimentRejected { .. })));
    }

    #[test]
    fn tool_without_plot_in_reach_is_ignored() {
        let mut simulation = Simulation::new(
            FarmLayout::default(),
            MotionConfig::default(),
            Position::new(0.0, 0.0),
            NasaData::default(),
        );
        let events = simulation.advance_frame(
            FRAME,
            FrameInput {
                select_tool: Some(Tool::Plant),
                use_tool: true,
                ..FrameInput::default()
            },
        );

        assert!(!events
            .iter()
            .any(|event| matches!(event, Event::ToolUsed { .. })));
    }

    #[test]
    fn teardown_stops_future_frames() {
        let mut simulation = simulation();
        let _ = simulation.advance_frame(FRAME, hold("d"));
        simulation.teardown();
        let before = simulation.player();

        let events = simulation.advance_frame(FRAME, hold("d"));

        assert!(events.is_empty());
        assert_eq!(simulation.player(), before);
        assert_eq!(simulation.tick_index(), 1);
    }

    #[test]
    fn quit_request_tears_the_view_down() {
        let mut simulation = simulation();
        let _ = simulation.advance_frame(FRAME, hold("d"));

        let events = simulation.advance_frame(
            FRAME,
            FrameInput {
                quit_requested: true,
                ..FrameInput::default()
            },
        );

        assert!(events.is_empty());
        assert_eq!(simulation.tick_index(), 1);
        assert!(simulation.advance_frame(FRAME, hold("d")).is_empty());
        assert_eq!(simulation.player().position, Position::new(305.0, 200.0));
    }

    #[test]
    fn custom_start_position_is_applied() {
        let simulation = Simulation::new(
            FarmLayout::default(),
            MotionConfig::default(),
            Position::new(40.0, 50.0),
            NasaData::default(),
        );

        assert_eq!(simulation.player().position, Position::new(40.0, 50.0));
        assert_eq!(simulation.player().facing, FacingDirection::Down);
    }
}
