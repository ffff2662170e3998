use std::time::Duration;

use data_farm_core::{
    Command, Event, GeometryProvider, KeyEvent, PlayerSnapshot, Position, Rect, Size, TileBox,
    TileIndex,
};
use data_farm_system_input::InputSampler;
use data_farm_system_motion::Motion;
use data_farm_world::{self as world, query, World};

const FRAME: Duration = Duration::from_millis(16);

struct Grid {
    tiles: Vec<TileBox>,
}

impl Grid {
    fn three_by_two() -> Self {
        let mut tiles = Vec::new();
        for row in 0..2u32 {
            for column in 0..3u32 {
                let origin = Position::new(100.0 + column as f32 * 80.0, 300.0 + row as f32 * 80.0);
                tiles.push(TileBox::new(
                    TileIndex::new(row * 3 + column),
                    Rect::from_origin_and_size(origin, Size::new(64.0, 64.0)),
                ));
            }
        }
        Self { tiles }
    }
}

impl GeometryProvider for Grid {
    fn playfield(&self) -> Option<Size> {
        Some(Size::new(800.0, 600.0))
    }

    fn tiles(&self) -> &[TileBox] {
        &self.tiles
    }
}

enum Step {
    Key(KeyEvent),
    Frames(usize),
}

fn script() -> Vec<Step> {
    vec![
        Step::Key(KeyEvent::Pressed("s".to_owned())),
        Step::Frames(12),
        Step::Key(KeyEvent::Pressed("a".to_owned())),
        Step::Frames(30),
        Step::Key(KeyEvent::Released("s".to_owned())),
        Step::Frames(9),
        Step::Key(KeyEvent::Released("a".to_owned())),
        Step::Frames(5),
        Step::Key(KeyEvent::Pressed("ArrowUp".to_owned())),
        Step::Frames(4),
        Step::Key(KeyEvent::Released("ArrowUp".to_owned())),
    ]
}

fn replay(steps: &[Step]) -> (PlayerSnapshot, Vec<Event>) {
    let mut world = World::new();
    let mut sampler = InputSampler::new();
    let motion = Motion::default();
    let grid = Grid::three_by_two();
    let mut log = Vec::new();

    let mut events = Vec::new();
    world::apply(
        &mut world,
        Command::ConfigureFarm { tile_count: 6 },
        &mut events,
    );
    log.append(&mut events);
    sampler.attach();

    for step in steps {
        match step {
            Step::Key(event) => sampler.handle(event),
            Step::Frames(count) => {
                for _ in 0..*count {
                    let mut tick_events = Vec::new();
                    world::apply(&mut world, Command::Tick { dt: FRAME }, &mut tick_events);

                    let mut commands = Vec::new();
                    motion.handle(
                        &tick_events,
                        sampler.keys(),
                        &grid,
                        query::player(&world),
                        &mut commands,
                    );
                    for command in commands {
                        world::apply(&mut world, command, &mut log);
                    }
                }
            }
        }
    }

    sampler.detach();
    (query::player(&world), log)
}

#[test]
fn replay_is_deterministic() {
    let first = replay(&script());
    let second = replay(&script());

    assert_eq!(first, second, "replay diverged between runs");
}

#[test]
fn replay_reaches_expected_tile() {
    let (player, log) = replay(&script());

    // 12 frames down, 30 frames down-left, 9 frames left, idle, 4 frames up.
    assert_eq!(player.position, Position::new(105.0, 390.0));
    assert_eq!(player.active_tile, Some(TileIndex::new(3)));

    let activations: Vec<_> = log
        .iter()
        .filter_map(|event| match event {
            Event::ActiveTileChanged { current, .. } => Some(*current),
            _ => None,
        })
        .collect();
    assert_eq!(activations.last().copied(), Some(Some(TileIndex::new(3))));
}

#[test]
fn idle_frames_emit_no_movement_events() {
    let steps = vec![Step::Frames(20)];
    let (player, log) = replay(&steps);

    assert_eq!(player, PlayerSnapshot::default());
    assert_eq!(log, vec![Event::FarmConfigured { tile_count: 6 }]);
}
