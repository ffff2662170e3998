#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic motion system that moves the farmer and resolves tile proximity.
//!
//! Each tick reads the held keys, integrates the farmer's position by a fixed
//! per-tick increment, clamps it to the playfield and then looks for the farm
//! tile nearest to the farmer's feet. Ticks without a held movement key do no
//! work at all: no position write, no proximity scan, no commands.

use data_farm_core::{
    Command, Event, FacingDirection, GeometryProvider, KeyState, PlayerSnapshot, Position, Size,
    TileBox, TileIndex,
};
use serde::{Deserialize, Serialize};

/// Tuning knobs controlling farmer movement and tile interaction.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MotionConfig {
    /// Distance travelled along an axis per tick while its key is held.
    pub speed: f32,
    /// Dimensions of the farmer's bounding box.
    pub player_size: Size,
    /// Vertical offset from the top of the box to the farmer's feet.
    pub feet_offset: f32,
    /// Side length of a farm tile; the interaction radius derives from it.
    pub tile_size: f32,
}

impl MotionConfig {
    /// Maximum feet-to-center distance for a tile to count as in range.
    #[must_use]
    pub fn interaction_radius(&self) -> f32 {
        self.tile_size / 1.5
    }

    /// Interaction anchor for a farmer whose box starts at `position`.
    ///
    /// The anchor sits on the horizontal center of the box but near its
    /// bottom edge, so proximity follows where the farmer stands rather
    /// than the middle of the sprite.
    #[must_use]
    pub fn feet_point(&self, position: Position) -> Position {
        position.offset(self.player_size.width() / 2.0, self.feet_offset)
    }
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            speed: 5.0,
            player_size: Size::new(32.0, 48.0),
            feet_offset: 40.0,
            tile_size: 64.0,
        }
    }
}

/// Farmer state produced by a single tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Advance {
    /// Position after integration and clamping.
    pub position: Position,
    /// Facing direction after the tick.
    pub facing: FacingDirection,
    /// Tile within interaction range after the tick.
    pub active_tile: Option<TileIndex>,
    /// Whether any movement key was held during the tick.
    pub moved: bool,
}

impl Advance {
    fn unchanged(player: &PlayerSnapshot) -> Self {
        Self {
            position: player.position,
            facing: player.facing,
            active_tile: player.active_tile,
            moved: false,
        }
    }
}

/// Advances the farmer by one tick.
///
/// Held keys are applied in [`FacingDirection::EVALUATION_ORDER`]; each adds
/// one speed increment on its axis and claims the facing direction, so
/// opposing keys cancel out while the later one still decides facing. When
/// the playfield has not been measured clamping is skipped and the active
/// tile is left as it was.
#[must_use]
pub fn advance<G>(
    keys: &KeyState,
    geometry: &G,
    player: &PlayerSnapshot,
    config: &MotionConfig,
) -> Advance
where
    G: GeometryProvider + ?Sized,
{
    let mut x = player.position.x();
    let mut y = player.position.y();
    let mut facing = player.facing;
    let mut moved = false;

    for direction in FacingDirection::EVALUATION_ORDER {
        if !keys.is_direction_held(direction) {
            continue;
        }

        let (dx, dy) = direction.unit_delta();
        x += dx * config.speed;
        y += dy * config.speed;
        facing = direction;
        moved = true;
    }

    if !moved {
        return Advance::unchanged(player);
    }

    let Some(playfield) = geometry.playfield() else {
        return Advance {
            position: Position::new(x, y),
            facing,
            active_tile: player.active_tile,
            moved,
        };
    };

    let position = clamp_to_playfield(Position::new(x, y), playfield, config.player_size);
    let active_tile = nearest_tile(
        config.feet_point(position),
        geometry.tiles(),
        config.interaction_radius(),
    );

    Advance {
        position,
        facing,
        active_tile,
        moved,
    }
}

/// Keeps the farmer's box inside the playfield.
///
/// A playfield smaller than the box pins the farmer to the origin.
#[must_use]
pub fn clamp_to_playfield(position: Position, playfield: Size, player_size: Size) -> Position {
    let max_x = playfield.width() - player_size.width();
    let max_y = playfield.height() - player_size.height();
    Position::new(
        position.x().min(max_x).max(0.0),
        position.y().min(max_y).max(0.0),
    )
}

/// Finds the tile whose center is closest to `point` and strictly within `radius`.
///
/// Ties keep the tile encountered first. Tiles without a readable index are
/// never matched.
#[must_use]
pub fn nearest_tile(point: Position, tiles: &[TileBox], radius: f32) -> Option<TileIndex> {
    let mut closest: Option<(TileIndex, f32)> = None;

    for tile in tiles {
        let Some(index) = tile.index else {
            continue;
        };

        let distance = point.distance_to(tile.rect.center());
        let closer = match closest {
            Some((_, best)) => distance < best,
            None => true,
        };
        if closer {
            closest = Some((index, distance));
        }
    }

    closest
        .filter(|(_, distance)| *distance < radius)
        .map(|(index, _)| index)
}

/// Pure system that turns clock ticks and held keys into movement commands.
#[derive(Debug, Default)]
pub struct Motion {
    config: MotionConfig,
}

impl Motion {
    /// Creates a motion system using the provided tuning.
    #[must_use]
    pub const fn new(config: MotionConfig) -> Self {
        Self { config }
    }

    /// Tuning applied by the system.
    #[must_use]
    pub const fn config(&self) -> &MotionConfig {
        &self.config
    }

    /// Consumes world events and the current key snapshot to emit movement commands.
    ///
    /// Every [`Event::TimeAdvanced`] in the batch is one tick. Ticks with no
    /// movement key held emit nothing.
    pub fn handle<G>(
        &self,
        events: &[Event],
        keys: &KeyState,
        geometry: &G,
        player: PlayerSnapshot,
        out: &mut Vec<Command>,
    ) where
        G: GeometryProvider + ?Sized,
    {
        let mut player = player;

        for event in events {
            if !matches!(event, Event::TimeAdvanced { .. }) {
                continue;
            }

            let step = advance(keys, geometry, &player, &self.config);
            if !step.moved {
                continue;
            }

            out.push(Command::MovePlayer {
                position: step.position,
                facing: step.facing,
            });
            if step.active_tile != player.active_tile {
                out.push(Command::SetActiveTile {
                    tile: step.active_tile,
                });
            }

            player = PlayerSnapshot {
                position: step.position,
                facing: step.facing,
                active_tile: step.active_tile,
            };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use data_farm_core::Rect;

    #[test]
    fn default_radius_is_two_thirds_of_a_tile() {
        let config = MotionConfig::default();
        assert!((config.interaction_radius() - 64.0 / 1.5).abs() < 1e-5);
    }

    #[test]
    fn feet_point_sits_near_bottom_center() {
        let config = MotionConfig::default();
        assert_eq!(
            config.feet_point(Position::new(94.0, 100.0)),
            Position::new(110.0, 140.0)
        );
    }

    #[test]
    fn clamp_pins_undersized_playfield_to_origin() {
        let clamped = clamp_to_playfield(
            Position::new(10.0, 10.0),
            Size::new(16.0, 16.0),
            Size::new(32.0, 48.0),
        );
        assert_eq!(clamped, Position::new(0.0, 0.0));
    }

    #[test]
    fn nearest_tile_prefers_first_on_ties() {
        let size = Size::new(10.0, 10.0);
        let tiles = [
            TileBox::new(
                TileIndex::new(4),
                Rect::from_origin_and_size(Position::new(-15.0, -5.0), size),
            ),
            TileBox::new(
                TileIndex::new(2),
                Rect::from_origin_and_size(Position::new(5.0, -5.0), size),
            ),
        ];

        assert_eq!(
            nearest_tile(Position::new(0.0, 0.0), &tiles, 20.0),
            Some(TileIndex::new(4))
        );
    }

    #[test]
    fn nearest_tile_skips_unindexed_tiles() {
        let size = Size::new(10.0, 10.0);
        let tiles = [
            TileBox {
                index: None,
                rect: Rect::from_origin_and_size(Position::new(-5.0, -5.0), size),
            },
            TileBox::new(
                TileIndex::new(1),
                Rect::from_origin_and_size(Position::new(25.0, -5.0), size),
            ),
        ];

        assert_eq!(
            nearest_tile(Position::new(0.0, 0.0), &tiles, 40.0),
            Some(TileIndex::new(1))
        );
        assert_eq!(nearest_tile(Position::new(0.0, 0.0), &tiles, 30.0), None);
    }

    #[test]
    fn nearest_tile_without_tiles_is_none() {
        assert_eq!(nearest_tile(Position::new(0.0, 0.0), &[], 100.0), None);
    }
}
