#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Data Farm adapters.

use anyhow::Result as AnyResult;
use data_farm_core::{
    Crop, FacingDirection, GeometryProvider, KeyEvent, PlayerSnapshot, Position, Rect, Size,
    TileBox, TileIndex, TileState, Tool,
};
use glam::Vec2;
use std::time::Duration;
use thiserror::Error;

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }

    /// Returns a new color lightened towards white by the provided amount.
    #[must_use]
    pub fn lighten(self, amount: f32) -> Self {
        let amount = amount.clamp(0.0, 1.0);

        Self {
            red: lighten_channel(self.red, amount),
            green: lighten_channel(self.green, amount),
            blue: lighten_channel(self.blue, amount),
            alpha: self.alpha,
        }
    }
}

fn lighten_channel(channel: f32, amount: f32) -> f32 {
    channel + (1.0 - channel) * amount
}

/// Converts a playfield position into a glam vector.
#[must_use]
pub fn to_vec2(position: Position) -> Vec2 {
    Vec2::new(position.x(), position.y())
}

/// Converts a playfield size into a glam vector.
#[must_use]
pub fn size_to_vec2(size: Size) -> Vec2 {
    Vec2::new(size.width(), size.height())
}

/// Input snapshot gathered by adapters before updating the scene.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct FrameInput {
    /// Keyboard transitions observed since the previous frame, in arrival order.
    pub key_events: Vec<KeyEvent>,
    /// Tool requested through its shortcut on this frame.
    pub select_tool: Option<Tool>,
    /// Whether the farmer asked to put the held tool away.
    pub put_away: bool,
    /// Whether the farmer asked to use the held tool on the active tile.
    pub use_tool: bool,
    /// Crop requested for future planting.
    pub select_seed: Option<Crop>,
    /// Catalogue identifier of a research experiment to fund.
    pub start_experiment: Option<String>,
    /// Whether the farmer asked to end the day.
    pub end_day: bool,
    /// Whether the view is closing; no tick runs on such a frame.
    pub quit_requested: bool,
}

/// Grid of farm plots centered within the playfield.
///
/// Tiles are indexed in row-major order starting from the top-left plot.
#[derive(Clone, Debug, PartialEq)]
pub struct FarmLayout {
    columns: u32,
    rows: u32,
    tile_length: f32,
    gap: f32,
    field: Size,
    tiles: Vec<TileBox>,
}

impl FarmLayout {
    /// Default number of plot columns.
    pub const DEFAULT_COLUMNS: u32 = 8;

    /// Default number of plot rows.
    pub const DEFAULT_ROWS: u32 = 5;

    /// Default side length of a plot.
    pub const DEFAULT_TILE_LENGTH: f32 = 64.0;

    /// Default spacing between neighbouring plots.
    pub const DEFAULT_GAP: f32 = 16.0;

    /// Default playfield dimensions.
    pub const DEFAULT_FIELD: Size = Size::new(800.0, 600.0);

    /// Creates a new farm layout.
    ///
    /// Returns an error when the grid is empty, the tile length or gap is not
    /// usable, or the plots do not fit inside the field.
    pub fn new(
        columns: u32,
        rows: u32,
        tile_length: f32,
        gap: f32,
        field: Size,
    ) -> Result<Self, RenderingError> {
        if columns == 0 || rows == 0 {
            return Err(RenderingError::EmptyGrid { columns, rows });
        }
        if !tile_length.is_finite() || tile_length <= 0.0 {
            return Err(RenderingError::InvalidTileLength { tile_length });
        }
        if !gap.is_finite() || gap < 0.0 {
            return Err(RenderingError::InvalidGap { gap });
        }
        if !(field.width().is_finite() && field.height().is_finite())
            || field.width() <= 0.0
            || field.height() <= 0.0
        {
            return Err(RenderingError::InvalidField { field });
        }

        let required = Size::new(
            span(columns, tile_length, gap),
            span(rows, tile_length, gap),
        );
        if required.width() > field.width() || required.height() > field.height() {
            return Err(RenderingError::GridExceedsField { required, field });
        }

        Ok(Self::build(columns, rows, tile_length, gap, field))
    }

    fn build(columns: u32, rows: u32, tile_length: f32, gap: f32, field: Size) -> Self {
        let left = (field.width() - span(columns, tile_length, gap)) / 2.0;
        let top = (field.height() - span(rows, tile_length, gap)) / 2.0;
        let pitch = tile_length + gap;
        let tile_size = Size::new(tile_length, tile_length);

        let mut tiles = Vec::with_capacity((columns * rows) as usize);
        for row in 0..rows {
            for column in 0..columns {
                let origin = Position::new(left + column as f32 * pitch, top + row as f32 * pitch);
                tiles.push(TileBox::new(
                    TileIndex::new(row * columns + column),
                    Rect::from_origin_and_size(origin, tile_size),
                ));
            }
        }

        Self {
            columns,
            rows,
            tile_length,
            gap,
            field,
            tiles,
        }
    }

    /// Number of plot columns.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of plot rows.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Side length of a single plot.
    #[must_use]
    pub const fn tile_length(&self) -> f32 {
        self.tile_length
    }

    /// Spacing between neighbouring plots.
    #[must_use]
    pub const fn gap(&self) -> f32 {
        self.gap
    }

    /// Dimensions of the playfield hosting the farm.
    #[must_use]
    pub const fn field(&self) -> Size {
        self.field
    }

    /// Total number of plots.
    #[must_use]
    pub const fn tile_count(&self) -> u32 {
        self.columns * self.rows
    }
}

impl Default for FarmLayout {
    fn default() -> Self {
        Self::build(
            Self::DEFAULT_COLUMNS,
            Self::DEFAULT_ROWS,
            Self::DEFAULT_TILE_LENGTH,
            Self::DEFAULT_GAP,
            Self::DEFAULT_FIELD,
        )
    }
}

impl GeometryProvider for FarmLayout {
    fn playfield(&self) -> Option<Size> {
        Some(self.field)
    }

    fn tiles(&self) -> &[TileBox] {
        &self.tiles
    }
}

fn span(count: u32, tile_length: f32, gap: f32) -> f32 {
    count as f32 * tile_length + count.saturating_sub(1) as f32 * gap
}

/// Plot drawn by adapters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SceneTile {
    /// Index of the plot within the farm.
    pub index: TileIndex,
    /// Top-left corner of the plot in playfield units.
    pub origin: Vec2,
    /// Side length of the plot.
    pub length: f32,
    /// Whether the plot is within the farmer's reach.
    pub highlighted: bool,
    /// Crop and care state of the plot.
    pub plot: TileState,
}

/// Farmer drawn by adapters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlayerPresentation {
    /// Top-left corner of the farmer's box.
    pub origin: Vec2,
    /// Width and height of the farmer's box.
    pub size: Vec2,
    /// Direction the farmer faces.
    pub facing: FacingDirection,
}

/// Everything an adapter needs to draw one frame.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    /// Dimensions of the playfield.
    pub field: Vec2,
    /// Plots in row-major order.
    pub tiles: Vec<SceneTile>,
    /// The farmer.
    pub player: PlayerPresentation,
    /// Status line drawn above the playfield.
    pub hud: String,
}

impl Scene {
    /// Creates a scene showing the farm with the farmer at `player`.
    #[must_use]
    pub fn new(layout: &FarmLayout, player: &PlayerSnapshot, player_size: Size) -> Self {
        let tiles = layout
            .tiles()
            .iter()
            .filter_map(|tile| {
                let index = tile.index?;
                Some(SceneTile {
                    index,
                    origin: to_vec2(tile.rect.origin()),
                    length: tile.rect.size().width(),
                    highlighted: false,
                    plot: TileState::default(),
                })
            })
            .collect();

        let mut scene = Self {
            field: size_to_vec2(layout.field()),
            tiles,
            player: PlayerPresentation {
                origin: to_vec2(player.position),
                size: size_to_vec2(player_size),
                facing: player.facing,
            },
            hud: String::new(),
        };
        scene.sync_player(player);
        scene
    }

    /// Mirrors the farmer's latest snapshot into the scene.
    pub fn sync_player(&mut self, player: &PlayerSnapshot) {
        self.player.origin = to_vec2(player.position);
        self.player.facing = player.facing;
        for tile in &mut self.tiles {
            tile.highlighted = Some(tile.index) == player.active_tile;
        }
    }

    /// Mirrors the world's plot states, given in index order, into the scene.
    pub fn sync_tiles(&mut self, plots: &[TileState]) {
        for tile in &mut self.tiles {
            tile.plot = plots
                .get(tile.index.get() as usize)
                .copied()
                .unwrap_or_default();
        }
    }

    /// Plot currently highlighted, if any.
    #[must_use]
    pub fn highlighted_tile(&self) -> Option<TileIndex> {
        self.tiles
            .iter()
            .find(|tile| tile.highlighted)
            .map(|tile| tile.index)
    }
}

/// Presentation descriptor consumed by rendering backends.
#[derive(Clone, Debug, PartialEq)]
pub struct Presentation {
    /// Title used by the created window.
    pub window_title: String,
    /// Solid color used to clear each frame.
    pub clear_color: Color,
    /// Scene content that should be displayed.
    pub scene: Scene,
}

impl Presentation {
    /// Constructs a new presentation descriptor.
    #[must_use]
    pub fn new<T>(window_title: T, clear_color: Color, scene: Scene) -> Self
    where
        T: Into<String>,
    {
        Self {
            window_title: window_title.into(),
            clear_color,
            scene,
        }
    }
}

/// Rendering backend capable of presenting Data Farm scenes.
pub trait RenderingBackend {
    /// Runs the rendering backend until it is requested to exit.
    ///
    /// The provided `update_scene` closure receives the frame delta and the
    /// input captured by the adapter, and may mutate the scene before it is
    /// rendered.
    fn run<F>(self, presentation: Presentation, update_scene: F) -> AnyResult<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) + 'static;
}

/// Errors that can occur when constructing rendering descriptors.
#[derive(Debug, Error, PartialEq)]
pub enum RenderingError {
    /// The farm must contain at least one plot.
    #[error("farm grid must have at least one column and row (received {columns}x{rows})")]
    EmptyGrid {
        /// Provided column count.
        columns: u32,
        /// Provided row count.
        rows: u32,
    },
    /// Plots need a finite, positive side length.
    #[error("tile_length must be a finite positive number (received {tile_length})")]
    InvalidTileLength {
        /// Provided side length that failed validation.
        tile_length: f32,
    },
    /// The spacing between plots must be finite and cannot be negative.
    #[error("gap must be a finite non-negative number (received {gap})")]
    InvalidGap {
        /// Provided gap that failed validation.
        gap: f32,
    },
    /// The playfield needs a finite, positive area.
    #[error("field must have a finite positive area (received {}x{})", .field.width(), .field.height())]
    InvalidField {
        /// Provided playfield dimensions.
        field: Size,
    },
    /// The plots do not fit inside the playfield.
    #[error(
        "farm grid needs {}x{} but the field is {}x{}",
        .required.width(),
        .required.height(),
        .field.width(),
        .field.height()
    )]
    GridExceedsField {
        /// Space occupied by the plots and gaps.
        required: Size,
        /// Space available in the playfield.
        field: Size,
    },
}
