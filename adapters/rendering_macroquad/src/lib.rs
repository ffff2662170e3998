#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Macroquad-backed rendering adapter for Data Farm.
//!
//! Macroquad's optional audio stack depends on native ALSA development
//! libraries, which are unavailable in the containerised CI environment.
//! To keep `cargo test` usable everywhere we depend on macroquad without its
//! default `audio` feature.

use anyhow::{bail, Result};
use data_farm_core::{Crop, FacingDirection, KeyEvent, Tool, FULL_GROWTH};
use data_farm_rendering::{Color, FrameInput, Presentation, RenderingBackend, Scene};
use glam::Vec2;
use macroquad::input::{is_key_pressed, is_key_released, KeyCode};
use std::time::Duration;

const HUD_HEIGHT: f32 = 32.0;
const HUD_FONT_SIZE: f32 = 22.0;

const MOVEMENT_KEYS: [KeyCode; 8] = [
    KeyCode::W,
    KeyCode::A,
    KeyCode::S,
    KeyCode::D,
    KeyCode::Up,
    KeyCode::Down,
    KeyCode::Left,
    KeyCode::Right,
];

const TOOL_KEYS: [KeyCode; 5] = [
    KeyCode::Key1,
    KeyCode::Key2,
    KeyCode::Key3,
    KeyCode::Key4,
    KeyCode::Key5,
];

const SEED_KEYS: [KeyCode; 4] = [KeyCode::F1, KeyCode::F2, KeyCode::F3, KeyCode::F4];

/// Browser-style key name reported for a movement key, if `key` is one.
#[must_use]
pub fn movement_key_name(key: KeyCode) -> Option<&'static str> {
    let name = match key {
        KeyCode::W => "w",
        KeyCode::A => "a",
        KeyCode::S => "s",
        KeyCode::D => "d",
        KeyCode::Up => "ArrowUp",
        KeyCode::Down => "ArrowDown",
        KeyCode::Left => "ArrowLeft",
        KeyCode::Right => "ArrowRight",
        _ => return None,
    };
    Some(name)
}

/// Tool bound to a number key, if `key` is one of `1` through `5`.
#[must_use]
pub fn tool_for_key(key: KeyCode) -> Option<Tool> {
    TOOL_KEYS
        .iter()
        .position(|candidate| *candidate == key)
        .map(|slot| Tool::ALL[slot])
}

/// Crop bound to a function key, if `key` is one of `F1` through `F4`.
#[must_use]
pub fn crop_for_key(key: KeyCode) -> Option<Crop> {
    SEED_KEYS
        .iter()
        .position(|candidate| *candidate == key)
        .map(|slot| Crop::ALL[slot])
}

/// Translates keyboard transitions into key events in a stable order.
///
/// Releases are reported before presses so a key tapped and re-pressed
/// within one frame ends up held.
#[must_use]
pub fn translate_transitions(released: &[KeyCode], pressed: &[KeyCode]) -> Vec<KeyEvent> {
    let releases = released
        .iter()
        .filter_map(|key| movement_key_name(*key))
        .map(|name| KeyEvent::Released(name.to_owned()));
    let presses = pressed
        .iter()
        .filter_map(|key| movement_key_name(*key))
        .map(|name| KeyEvent::Pressed(name.to_owned()));
    releases.chain(presses).collect()
}

/// Snapshot of edge-triggered keyboard shortcuts observed during a single frame.
#[derive(Clone, Debug, Default)]
struct KeyboardSnapshot {
    /// `Q` or `Escape` to quit the game loop.
    quit_requested: bool,
    /// Movement transitions in arrival order.
    key_events: Vec<KeyEvent>,
    /// `1` to `5` pick a tool.
    select_tool: Option<Tool>,
    /// `0` puts the held tool away.
    put_away: bool,
    /// `Space` or `E` uses the held tool.
    use_tool: bool,
    /// `F1` to `F4` pick the crop to sow.
    select_seed: Option<Crop>,
    /// `N` ends the day.
    end_day: bool,
}

impl KeyboardSnapshot {
    fn poll() -> Self {
        let released: Vec<KeyCode> = MOVEMENT_KEYS
            .iter()
            .copied()
            .filter(|key| is_key_released(*key))
            .collect();
        let pressed: Vec<KeyCode> = MOVEMENT_KEYS
            .iter()
            .copied()
            .filter(|key| is_key_pressed(*key))
            .collect();

        Self {
            quit_requested: is_key_pressed(KeyCode::Escape) || is_key_pressed(KeyCode::Q),
            key_events: translate_transitions(&released, &pressed),
            select_tool: TOOL_KEYS
                .iter()
                .copied()
                .filter(|key| is_key_pressed(*key))
                .find_map(tool_for_key),
            put_away: is_key_pressed(KeyCode::Key0),
            use_tool: is_key_pressed(KeyCode::Space) || is_key_pressed(KeyCode::E),
            select_seed: SEED_KEYS
                .iter()
                .copied()
                .filter(|key| is_key_pressed(*key))
                .find_map(crop_for_key),
            end_day: is_key_pressed(KeyCode::N),
        }
    }

    fn into_frame_input(self) -> FrameInput {
        FrameInput {
            key_events: self.key_events,
            select_tool: self.select_tool,
            put_away: self.put_away,
            use_tool: self.use_tool,
            select_seed: self.select_seed,
            start_experiment: None,
            end_day: self.end_day,
            quit_requested: self.quit_requested,
        }
    }
}

/// Rendering backend implemented on top of macroquad.
#[derive(Debug, Default)]
pub struct MacroquadBackend {
    swap_interval: Option<i32>,
    show_fps: bool,
}

impl MacroquadBackend {
    /// Returns a backend that requests the platform's default swap interval.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the backend to either synchronise presentation with the display refresh rate
    /// or render as fast as possible.
    #[must_use]
    pub fn with_vsync(mut self, enabled: bool) -> Self {
        self.swap_interval = Some(i32::from(enabled));
        self
    }

    /// Configures whether the backend prints frame rate once per second.
    #[must_use]
    pub fn with_show_fps(mut self, show: bool) -> Self {
        self.show_fps = show;
        self
    }
}

#[derive(Debug, Default)]
struct FpsCounter {
    elapsed: Duration,
    frames: u32,
}

impl FpsCounter {
    /// Records a rendered frame and returns the frame rate once a second has elapsed.
    fn record_frame(&mut self, frame: Duration) -> Option<f32> {
        self.elapsed += frame;
        self.frames = self.frames.saturating_add(1);
        if self.elapsed < Duration::from_secs(1) {
            return None;
        }

        let per_second = self.frames as f32 / self.elapsed.as_secs_f32();
        self.elapsed = Duration::ZERO;
        self.frames = 0;
        Some(per_second)
    }
}

impl RenderingBackend for MacroquadBackend {
    fn run<F>(self, presentation: Presentation, mut update_scene: F) -> Result<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) + 'static,
    {
        let Self {
            swap_interval,
            show_fps,
        } = self;

        let Presentation {
            window_title,
            clear_color,
            scene,
        } = presentation;

        if scene.field.x <= 0.0 || scene.field.y <= 0.0 {
            bail!(
                "scene field must have a positive area (received {}x{})",
                scene.field.x,
                scene.field.y
            );
        }

        let mut config = macroquad::window::Conf {
            window_title,
            window_width: scene.field.x.round() as i32,
            window_height: (scene.field.y + HUD_HEIGHT).round() as i32,
            ..macroquad::window::Conf::default()
        };
        if let Some(swap_interval) = swap_interval {
            config.platform.swap_interval = Some(swap_interval);
        }

        log::info!(
            "opening {}x{} window",
            config.window_width,
            config.window_height
        );

        macroquad::Window::from_config(config, async move {
            let mut scene = scene;
            let background = to_macroquad_color(clear_color);
            let mut fps_counter = FpsCounter::default();

            loop {
                let keyboard = KeyboardSnapshot::poll();
                let quit_requested = keyboard.quit_requested;

                let dt_seconds = macroquad::time::get_frame_time();
                let frame_dt = Duration::from_secs_f32(dt_seconds.max(0.0));
                update_scene(frame_dt, keyboard.into_frame_input(), &mut scene);
                if quit_requested {
                    log::info!("quit requested");
                    break;
                }

                macroquad::window::clear_background(background);
                let metrics = SceneMetrics::new(
                    scene.field,
                    macroquad::window::screen_width(),
                    macroquad::window::screen_height(),
                );
                draw_field(&scene, &metrics);
                draw_tiles(&scene, &metrics);
                draw_player(&scene, &metrics);
                draw_hud(&scene.hud);

                if let Some(per_second) = fps_counter.record_frame(frame_dt) {
                    if show_fps {
                        println!("FPS: {per_second:.2}");
                    }
                }

                macroquad::window::next_frame().await;
            }
        });

        Ok(())
    }
}

/// Maps playfield coordinates onto the window below the HUD strip.
#[derive(Clone, Copy, Debug, PartialEq)]
struct SceneMetrics {
    scale: f32,
    offset: Vec2,
}

impl SceneMetrics {
    fn new(field: Vec2, screen_width: f32, screen_height: f32) -> Self {
        let available = Vec2::new(screen_width, (screen_height - HUD_HEIGHT).max(0.0));
        let scale = if field.x <= f32::EPSILON || field.y <= f32::EPSILON {
            1.0
        } else {
            (available.x / field.x).min(available.y / field.y)
        };
        let scaled = field * scale;
        let offset = Vec2::new(
            ((available.x - scaled.x) * 0.5).max(0.0),
            HUD_HEIGHT + ((available.y - scaled.y) * 0.5).max(0.0),
        );

        Self { scale, offset }
    }

    fn to_screen(&self, point: Vec2) -> Vec2 {
        self.offset + point * self.scale
    }
}

fn draw_field(scene: &Scene, metrics: &SceneMetrics) {
    let origin = metrics.to_screen(Vec2::ZERO);
    let size = scene.field * metrics.scale;
    macroquad::shapes::draw_rectangle(
        origin.x,
        origin.y,
        size.x,
        size.y,
        to_macroquad_color(Color::from_rgb_u8(106, 153, 78)),
    );
}

fn draw_tiles(scene: &Scene, metrics: &SceneMetrics) {
    let soil = Color::from_rgb_u8(121, 85, 61);
    let wet_soil = Color::from_rgb_u8(84, 58, 42);
    let crop = Color::from_rgb_u8(76, 153, 0);
    let highlight = Color::from_rgb_u8(255, 214, 10);

    for tile in &scene.tiles {
        let origin = metrics.to_screen(tile.origin);
        let length = tile.length * metrics.scale;
        let base = if tile.plot.watered { wet_soil } else { soil };
        let fill = if tile.highlighted {
            base.lighten(0.3)
        } else {
            base
        };
        macroquad::shapes::draw_rectangle(
            origin.x,
            origin.y,
            length,
            length,
            to_macroquad_color(fill),
        );
        if tile.plot.is_planted() {
            let ripeness = f32::from(tile.plot.growth) / f32::from(FULL_GROWTH);
            let sprout = length * (0.2 + 0.6 * ripeness);
            let inset = (length - sprout) / 2.0;
            let wilt = 1.0 - f32::from(tile.plot.health) / 100.0;
            macroquad::shapes::draw_rectangle(
                origin.x + inset,
                origin.y + inset,
                sprout,
                sprout,
                to_macroquad_color(crop.lighten(wilt * 0.6)),
            );
        }
        if tile.highlighted {
            macroquad::shapes::draw_rectangle_lines(
                origin.x,
                origin.y,
                length,
                length,
                3.0,
                to_macroquad_color(highlight),
            );
        }
    }
}

fn draw_player(scene: &Scene, metrics: &SceneMetrics) {
    let player = scene.player;
    let origin = metrics.to_screen(player.origin);
    let size = player.size * metrics.scale;
    macroquad::shapes::draw_rectangle(
        origin.x,
        origin.y,
        size.x,
        size.y,
        to_macroquad_color(Color::from_rgb_u8(33, 150, 243)),
    );

    let marker = (size.x.min(size.y) * 0.25).max(1.0);
    let anchor = facing_marker_anchor(origin, size, marker, player.facing);
    macroquad::shapes::draw_rectangle(
        anchor.x,
        anchor.y,
        marker,
        marker,
        to_macroquad_color(Color::from_rgb_u8(255, 255, 255)),
    );
}

fn facing_marker_anchor(origin: Vec2, size: Vec2, marker: f32, facing: FacingDirection) -> Vec2 {
    let center = origin + (size - Vec2::splat(marker)) * 0.5;
    match facing {
        FacingDirection::Up => Vec2::new(center.x, origin.y),
        FacingDirection::Down => Vec2::new(center.x, origin.y + size.y - marker),
        FacingDirection::Left => Vec2::new(origin.x, center.y),
        FacingDirection::Right => Vec2::new(origin.x + size.x - marker, center.y),
    }
}

fn draw_hud(text: &str) {
    let _ = macroquad::text::draw_text(
        text,
        8.0,
        HUD_HEIGHT * 0.7,
        HUD_FONT_SIZE,
        macroquad::color::WHITE,
    );
}

fn to_macroquad_color(color: Color) -> macroquad::color::Color {
    macroquad::color::Color::new(color.red, color.green, color.blue, color.alpha)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metrics_letterbox_wide_window() {
        let metrics = SceneMetrics::new(Vec2::new(800.0, 600.0), 1600.0, 632.0);

        assert!((metrics.scale - 1.0).abs() < 1e-6);
        assert_eq!(metrics.offset, Vec2::new(400.0, HUD_HEIGHT));
        assert_eq!(
            metrics.to_screen(Vec2::new(10.0, 20.0)),
            Vec2::new(410.0, 52.0)
        );
    }

    #[test]
    fn metrics_scale_down_small_window() {
        let metrics = SceneMetrics::new(Vec2::new(800.0, 600.0), 400.0, 332.0);

        assert!((metrics.scale - 0.5).abs() < 1e-6);
        assert_eq!(metrics.offset, Vec2::new(0.0, HUD_HEIGHT));
    }

    #[test]
    fn facing_marker_sits_on_leading_edge() {
        let origin = Vec2::new(0.0, 0.0);
        let size = Vec2::new(32.0, 48.0);

        assert_eq!(
            facing_marker_anchor(origin, size, 8.0, FacingDirection::Down),
            Vec2::new(12.0, 40.0)
        );
        assert_eq!(
            facing_marker_anchor(origin, size, 8.0, FacingDirection::Left),
            Vec2::new(0.0, 20.0)
        );
    }

    #[test]
    fn fps_counter_reports_after_one_second() {
        let mut counter = FpsCounter::default();
        for _ in 0..59 {
            assert!(counter.record_frame(Duration::from_millis(16)).is_none());
        }
        let rate = counter
            .record_frame(Duration::from_millis(56))
            .expect("one second elapsed");

        assert!((rate - 60.0).abs() < 1e-3);
    }
}
