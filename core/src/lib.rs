#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Data Farm engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values for systems to
//! react to deterministically. Systems consume event streams, query immutable
//! snapshots, and respond exclusively with new command batches.
//!
//! Geometry is never measured by the engine itself. Adapters expose the
//! playfield and the farm tiles through a [`GeometryProvider`], which keeps
//! every system testable without a rendering surface.

use std::{collections::BTreeMap, time::Duration};

use serde::{Deserialize, Serialize};

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to NASA Data Farm.";

/// Coordinate the farmer occupies when a new session starts.
pub const PLAYER_START: Position = Position::new(300.0, 200.0);

/// Direction the farmer faces when a new session starts.
pub const PLAYER_START_FACING: FacingDirection = FacingDirection::Down;

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Resets the farm to the provided number of plots.
    ConfigureFarm {
        /// Number of farm tiles exposed by the rendered grid.
        tile_count: u32,
    },
    /// Advances the simulation clock by the provided delta time.
    Tick {
        /// Duration of wall-clock time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Relocates the farmer and updates the facing direction.
    MovePlayer {
        /// Top-left anchor of the farmer's bounding box after the move.
        position: Position,
        /// Direction the farmer faces after the move.
        facing: FacingDirection,
    },
    /// Records which tile, if any, the farmer is standing next to.
    SetActiveTile {
        /// Tile within interaction range or `None` when no tile qualifies.
        tile: Option<TileIndex>,
    },
    /// Selects the tool applied by subsequent interactions.
    SelectTool {
        /// Tool to hold or `None` to put the current tool away.
        tool: Option<Tool>,
    },
    /// Applies a tool to a farm tile.
    UseTool {
        /// Tool being applied.
        tool: Tool,
        /// Tile targeted by the interaction.
        tile: TileIndex,
    },
    /// Replaces the satellite conditions observed over the farm.
    SetConditions {
        /// Observations that become active for the farm.
        conditions: NasaData,
    },
    /// Chooses the crop sown by the plant tool.
    SelectSeed {
        /// Crop planted from now on.
        crop: Crop,
    },
    /// Ends the current day: crops grow, supplies refill, experiments progress.
    EndDay,
    /// Funds a research experiment that runs for a number of days.
    StartExperiment {
        /// Catalogue identifier of the experiment.
        experiment: &'static str,
        /// Money paid up front.
        cost: u32,
        /// Number of days until the experiment completes.
        duration_days: u32,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Confirms that the farm was reset with a new number of tiles.
    FarmConfigured {
        /// Number of tiles now known to the world.
        tile_count: u32,
    },
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of time that elapsed in the tick.
        dt: Duration,
    },
    /// Confirms that the farmer changed position.
    PlayerMoved {
        /// Position occupied before the move.
        from: Position,
        /// Position occupied after the move.
        to: Position,
    },
    /// Confirms that the farmer turned to face a new direction.
    FacingChanged {
        /// Direction the farmer now faces.
        facing: FacingDirection,
    },
    /// Announces that the tile within interaction range changed.
    ActiveTileChanged {
        /// Tile that was active before the change.
        previous: Option<TileIndex>,
        /// Tile that is active after the change.
        current: Option<TileIndex>,
    },
    /// Confirms that the farmer picked up or put away a tool.
    ToolSelected {
        /// Tool now held, if any.
        tool: Option<Tool>,
    },
    /// Confirms that a tool was applied to a farm tile.
    ToolUsed {
        /// Tool that was applied.
        tool: Tool,
        /// Tile that received the interaction.
        tile: TileIndex,
    },
    /// Reports that a tool interaction was rejected.
    ToolRejected {
        /// Tool the farmer attempted to use.
        tool: Tool,
        /// Tile referenced by the request.
        tile: TileIndex,
        /// Specific reason the interaction failed.
        reason: ToolError,
    },
    /// Announces that new satellite conditions became active.
    ConditionsChanged {
        /// Observations now active for the farm.
        conditions: NasaData,
    },
    /// Confirms the crop sown by the plant tool.
    SeedSelected {
        /// Crop planted from now on.
        crop: Crop,
    },
    /// Reports the new state of a farm tile.
    TileChanged {
        /// Tile whose state changed.
        tile: TileIndex,
        /// State after the change.
        state: TileState,
    },
    /// Reports the farmer's supplies and progress after a change.
    ResourcesChanged {
        /// Supplies and progress after the change.
        resources: Resources,
    },
    /// Confirms that a mature crop was sold.
    CropHarvested {
        /// Tile the crop was taken from.
        tile: TileIndex,
        /// Crop that was harvested.
        crop: Crop,
        /// Money earned by the sale.
        earnings: u32,
    },
    /// Announces that a neglected crop died.
    CropWithered {
        /// Tile that lost its crop.
        tile: TileIndex,
        /// Crop that died.
        crop: Crop,
    },
    /// Announces that accumulated experience reached a new level.
    LeveledUp {
        /// Level reached.
        level: u32,
    },
    /// Announces the start of a new day.
    DayStarted {
        /// Day number within the season, starting at one.
        day: u32,
        /// Season the day belongs to.
        season: Season,
    },
    /// Confirms that a research experiment was funded.
    ExperimentStarted {
        /// Catalogue identifier of the experiment.
        experiment: &'static str,
        /// Day count at which the experiment completes.
        completes_after: u32,
    },
    /// Reports that a research experiment could not start.
    ExperimentRejected {
        /// Catalogue identifier of the experiment.
        experiment: &'static str,
        /// Specific reason the experiment was refused.
        reason: ExperimentError,
    },
    /// Announces that a research experiment finished.
    ExperimentCompleted {
        /// Catalogue identifier of the experiment.
        experiment: &'static str,
        /// Experience awarded for the results.
        xp: u32,
    },
}

/// Point in playfield space measured in pixel-equivalent units.
#[derive(Clone, Copy, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    x: f32,
    y: f32,
}

impl Position {
    /// Creates a new position from horizontal and vertical components.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Horizontal component, growing to the right.
    #[must_use]
    pub const fn x(&self) -> f32 {
        self.x
    }

    /// Vertical component, growing downwards.
    #[must_use]
    pub const fn y(&self) -> f32 {
        self.y
    }

    /// Returns a copy of the position shifted by the provided deltas.
    #[must_use]
    pub fn offset(self, dx: f32, dy: f32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    /// Euclidean distance between two positions.
    #[must_use]
    pub fn distance_to(self, other: Position) -> f32 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Width and height of an axis-aligned box.
#[derive(Clone, Copy, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    width: f32,
    height: f32,
}

impl Size {
    /// Creates a new size descriptor with explicit dimensions.
    #[must_use]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Horizontal extent.
    #[must_use]
    pub const fn width(&self) -> f32 {
        self.width
    }

    /// Vertical extent.
    #[must_use]
    pub const fn height(&self) -> f32 {
        self.height
    }
}

/// Axis-aligned rectangle expressed in playfield space.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    origin: Position,
    size: Size,
}

impl Rect {
    /// Constructs a rectangle from its top-left corner and size.
    #[must_use]
    pub const fn from_origin_and_size(origin: Position, size: Size) -> Self {
        Self { origin, size }
    }

    /// Top-left corner of the rectangle.
    #[must_use]
    pub const fn origin(&self) -> Position {
        self.origin
    }

    /// Dimensions of the rectangle.
    #[must_use]
    pub const fn size(&self) -> Size {
        self.size
    }

    /// Geometric center of the rectangle.
    #[must_use]
    pub fn center(&self) -> Position {
        self.origin
            .offset(self.size.width() / 2.0, self.size.height() / 2.0)
    }
}

/// Cardinal directions the farmer can face.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FacingDirection {
    /// Towards decreasing vertical coordinates.
    Up,
    /// Towards increasing vertical coordinates.
    Down,
    /// Towards decreasing horizontal coordinates.
    Left,
    /// Towards increasing horizontal coordinates.
    Right,
}

impl FacingDirection {
    /// Order in which held movement keys are applied during a tick.
    ///
    /// When several keys are held the last one in this order decides the
    /// facing direction for the tick.
    pub const EVALUATION_ORDER: [FacingDirection; 4] = [
        FacingDirection::Up,
        FacingDirection::Down,
        FacingDirection::Left,
        FacingDirection::Right,
    ];

    /// Normalized key identifiers that steer the farmer in this direction.
    #[must_use]
    pub const fn key_bindings(self) -> [&'static str; 2] {
        match self {
            Self::Up => ["w", "arrowup"],
            Self::Down => ["s", "arrowdown"],
            Self::Left => ["a", "arrowleft"],
            Self::Right => ["d", "arrowright"],
        }
    }

    /// Unit displacement along each axis for one step in this direction.
    #[must_use]
    pub const fn unit_delta(self) -> (f32, f32) {
        match self {
            Self::Up => (0.0, -1.0),
            Self::Down => (0.0, 1.0),
            Self::Left => (-1.0, 0.0),
            Self::Right => (1.0, 0.0),
        }
    }
}

/// Stable index identifying a farm tile within the rendered grid.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct TileIndex(u32);

impl TileIndex {
    /// Creates a new tile index wrapper.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the underlying index.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Bounding box of a single farm tile as exposed by the rendered grid.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TileBox {
    /// Index published by the tile, or `None` when it could not be read.
    pub index: Option<TileIndex>,
    /// Bounds of the tile in playfield space.
    pub rect: Rect,
}

impl TileBox {
    /// Creates a tile box carrying a valid index.
    #[must_use]
    pub const fn new(index: TileIndex, rect: Rect) -> Self {
        Self {
            index: Some(index),
            rect,
        }
    }
}

/// Source of the live geometry the motion engine reads every tick.
///
/// Adapters implement this on top of whatever surface renders the farm.
/// Returning `None` from [`GeometryProvider::playfield`] signals that the
/// playfield has not been measured yet; the engine then skips clamping and
/// proximity resolution for that tick instead of failing.
pub trait GeometryProvider {
    /// Measured size of the playfield container, if available.
    fn playfield(&self) -> Option<Size>;

    /// Tile boxes in stable iteration order.
    fn tiles(&self) -> &[TileBox];
}

/// Keyboard transition reported by an adapter.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum KeyEvent {
    /// A key went down. Auto-repeat may deliver this several times.
    Pressed(String),
    /// A key was released.
    Released(String),
}

/// Snapshot of the keys currently held down.
///
/// Identifiers are normalized to lower case on both write and read, so
/// `"W"` and `"w"` address the same entry.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct KeyState {
    keys: BTreeMap<String, bool>,
}

impl KeyState {
    /// Creates an empty key state with nothing held.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks the key as held.
    pub fn press(&mut self, key: &str) {
        let _ = self.keys.insert(normalize_key(key), true);
    }

    /// Marks the key as released.
    pub fn release(&mut self, key: &str) {
        let _ = self.keys.insert(normalize_key(key), false);
    }

    /// Reports whether the key is currently held.
    #[must_use]
    pub fn is_held(&self, key: &str) -> bool {
        self.keys
            .get(&normalize_key(key))
            .copied()
            .unwrap_or(false)
    }

    /// Reports whether any key bound to the direction is held.
    #[must_use]
    pub fn is_direction_held(&self, direction: FacingDirection) -> bool {
        direction
            .key_bindings()
            .iter()
            .any(|key| self.is_held(key))
    }

    /// Releases every key.
    pub fn clear(&mut self) {
        self.keys.clear();
    }

    /// Iterator over the normalized identifiers of held keys.
    pub fn held(&self) -> impl Iterator<Item = &str> {
        self.keys
            .iter()
            .filter(|(_, held)| **held)
            .map(|(key, _)| key.as_str())
    }
}

fn normalize_key(key: &str) -> String {
    key.to_lowercase()
}

/// Immutable representation of the farmer used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlayerSnapshot {
    /// Top-left anchor of the farmer's bounding box.
    pub position: Position,
    /// Direction the farmer currently faces.
    pub facing: FacingDirection,
    /// Tile within interaction range, if any.
    pub active_tile: Option<TileIndex>,
}

impl Default for PlayerSnapshot {
    fn default() -> Self {
        Self {
            position: PLAYER_START,
            facing: PLAYER_START_FACING,
            active_tile: None,
        }
    }
}

/// Farming tools the player can apply to the active tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tool {
    /// Sows a crop into an empty plot.
    Plant,
    /// Irrigates the plot.
    Water,
    /// Adds nutrients to the plot.
    Fertilize,
    /// Collects a mature crop.
    Harvest,
    /// Opens the educational crop profile for the plot.
    Inspect,
}

impl Tool {
    /// Every tool in toolbar order.
    pub const ALL: [Tool; 5] = [
        Tool::Plant,
        Tool::Water,
        Tool::Fertilize,
        Tool::Harvest,
        Tool::Inspect,
    ];

    /// Human-readable label used by adapters.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Plant => "Plant",
            Self::Water => "Water",
            Self::Fertilize => "Fertilize",
            Self::Harvest => "Harvest",
            Self::Inspect => "Inspect",
        }
    }
}

/// Reasons a tool interaction may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ToolError {
    /// The referenced tile is not part of the configured farm.
    UnknownTile,
    /// The tile already carries a crop.
    AlreadyPlanted,
    /// The tool needs a crop on the tile.
    NotPlanted,
    /// The crop was already watered today.
    AlreadyWatered,
    /// The crop was already fertilized.
    AlreadyFertilized,
    /// The crop has not finished growing.
    NotReady,
    /// Not enough money for seeds or fertilizer.
    NotEnoughMoney,
    /// The water tank is too low.
    NotEnoughWater,
    /// The farmer is too tired.
    NotEnoughEnergy,
}

/// Reasons a research experiment may be refused by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExperimentError {
    /// The same experiment is still running.
    AlreadyRunning,
    /// Not enough money to fund the experiment.
    NotEnoughMoney,
}

/// Crops the farmer can sow.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Crop {
    /// Fast leafy crop.
    Lettuce,
    /// Fruiting vine.
    Tomato,
    /// Tall cereal.
    Corn,
    /// Slow staple grain.
    Wheat,
}

impl Crop {
    /// Every crop in seed catalogue order.
    pub const ALL: [Crop; 4] = [Crop::Lettuce, Crop::Tomato, Crop::Corn, Crop::Wheat];

    /// Human-readable name of the crop.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Lettuce => "Lettuce",
            Self::Tomato => "Tomato",
            Self::Corn => "Corn",
            Self::Wheat => "Wheat",
        }
    }

    /// Price of the seeds for one tile.
    #[must_use]
    pub const fn seed_cost(self) -> u32 {
        match self {
            Self::Lettuce => 5,
            Self::Tomato => 10,
            Self::Corn => 12,
            Self::Wheat => 15,
        }
    }

    /// Watered days needed to reach full growth without fertilizer.
    #[must_use]
    pub const fn days_to_maturity(self) -> u32 {
        match self {
            Self::Lettuce => 4,
            Self::Tomato => 6,
            Self::Corn => 8,
            Self::Wheat => 10,
        }
    }

    /// Sale price of a fully healthy harvest.
    #[must_use]
    pub const fn sale_price(self) -> u32 {
        match self {
            Self::Lettuce => 20,
            Self::Tomato => 35,
            Self::Corn => 45,
            Self::Wheat => 55,
        }
    }

    /// Next crop in catalogue order, wrapping around.
    #[must_use]
    pub const fn next(self) -> Self {
        match self {
            Self::Lettuce => Self::Tomato,
            Self::Tomato => Self::Corn,
            Self::Corn => Self::Wheat,
            Self::Wheat => Self::Lettuce,
        }
    }
}

/// Growth reached by a crop ready for harvest.
pub const FULL_GROWTH: u8 = 100;

/// Health of a freshly planted crop.
pub const FULL_HEALTH: u8 = 100;

/// State of a single farm plot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TileState {
    /// Crop growing on the plot, if any.
    pub crop: Option<Crop>,
    /// Whether the plot was watered today.
    pub watered: bool,
    /// Whether fertilizer was applied since planting.
    pub fertilized: bool,
    /// Growth percentage in `0..=100`.
    pub growth: u8,
    /// Health percentage in `0..=100`; the crop dies at zero.
    pub health: u8,
}

impl TileState {
    /// Freshly sown plot carrying `crop`.
    #[must_use]
    pub const fn sown(crop: Crop) -> Self {
        Self {
            crop: Some(crop),
            watered: false,
            fertilized: false,
            growth: 0,
            health: FULL_HEALTH,
        }
    }

    /// Reports whether a crop grows on the plot.
    #[must_use]
    pub const fn is_planted(&self) -> bool {
        self.crop.is_some()
    }

    /// Reports whether the crop can be harvested.
    #[must_use]
    pub const fn is_ready(&self) -> bool {
        self.crop.is_some() && self.growth >= FULL_GROWTH
    }
}

/// Seasons of the farming year.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Season {
    /// First season of the year.
    Spring,
    /// Second season.
    Summer,
    /// Third season.
    Fall,
    /// Last season of the year.
    Winter,
}

impl Season {
    /// Human-readable name of the season.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Spring => "Spring",
            Self::Summer => "Summer",
            Self::Fall => "Fall",
            Self::Winter => "Winter",
        }
    }

    /// Season that follows this one.
    #[must_use]
    pub const fn next(self) -> Self {
        match self {
            Self::Spring => Self::Summer,
            Self::Summer => Self::Fall,
            Self::Fall => Self::Winter,
            Self::Winter => Self::Spring,
        }
    }
}

/// Number of days in each season.
pub const DAYS_PER_SEASON: u32 = 28;

/// Experience needed to reach each level, starting with level one.
pub const LEVEL_THRESHOLDS: [u32; 6] = [0, 100, 250, 500, 1_000, 2_000];

/// Level reached with `xp` experience points.
#[must_use]
pub fn level_for_xp(xp: u32) -> u32 {
    LEVEL_THRESHOLDS
        .iter()
        .filter(|threshold| xp >= **threshold)
        .count() as u32
}

/// Farmer supplies and progress shown in the score bar.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resources {
    /// Money available for seeds, fertilizer and research.
    pub money: u32,
    /// Accumulated experience points.
    pub xp: u32,
    /// Level derived from experience.
    pub level: u32,
    /// Litres left in the water tank.
    pub water: u32,
    /// Capacity of the water tank.
    pub max_water: u32,
    /// Energy left for today.
    pub energy: u32,
    /// Energy restored every morning.
    pub max_energy: u32,
    /// Day within the current season, starting at one.
    pub day: u32,
    /// Current season.
    pub season: Season,
}

impl Default for Resources {
    fn default() -> Self {
        Self {
            money: 100,
            xp: 0,
            level: 1,
            water: 100,
            max_water: 100,
            energy: 100,
            max_energy: 100,
            day: 1,
            season: Season::Spring,
        }
    }
}

/// Satellite-style observations describing growing conditions.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct NasaData {
    /// Volumetric soil moisture as a percentage.
    pub soil_moisture: f32,
    /// Air temperature in degrees Celsius.
    pub temperature: f32,
    /// Daily precipitation in millimetres.
    pub precipitation: f32,
    /// Solar irradiance in watts per square metre.
    pub solar_irradiance: f32,
    /// Wind speed in kilometres per hour.
    pub wind_speed: f32,
    /// Normalized Difference Vegetation Index in `0.0..=1.0`.
    pub ndvi: f32,
    /// Relative humidity as a percentage.
    pub relative_humidity: f32,
}

impl Default for NasaData {
    fn default() -> Self {
        Self {
            soil_moisture: 45.0,
            temperature: 28.0,
            precipitation: 2.0,
            solar_irradiance: 750.0,
            wind_speed: 12.0,
            ndvi: 0.65,
            relative_humidity: 35.0,
        }
    }
}
