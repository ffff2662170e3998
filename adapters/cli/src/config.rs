//! Optional TOML configuration overriding movement tuning and the farm layout.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use data_farm_core::{Position, Size, PLAYER_START};
use data_farm_rendering::{FarmLayout, RenderingError};
use data_farm_system_motion::MotionConfig;
use serde::Deserialize;
use thiserror::Error;

/// Fully resolved configuration for a Data Farm session.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct FarmConfig {
    /// Movement and proximity tuning.
    pub(crate) motion: MotionConfig,
    /// Farm plot arrangement.
    pub(crate) layout: LayoutConfig,
    /// Farmer spawn settings.
    pub(crate) player: PlayerConfig,
    /// Window presentation settings.
    pub(crate) window: WindowConfig,
}

/// Farm plot arrangement as written in the configuration file.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct LayoutConfig {
    pub(crate) columns: u32,
    pub(crate) rows: u32,
    pub(crate) tile_length: f32,
    pub(crate) gap: f32,
    pub(crate) field_width: f32,
    pub(crate) field_height: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            columns: FarmLayout::DEFAULT_COLUMNS,
            rows: FarmLayout::DEFAULT_ROWS,
            tile_length: FarmLayout::DEFAULT_TILE_LENGTH,
            gap: FarmLayout::DEFAULT_GAP,
            field_width: FarmLayout::DEFAULT_FIELD.width(),
            field_height: FarmLayout::DEFAULT_FIELD.height(),
        }
    }
}

impl LayoutConfig {
    /// Builds the geometry described by this configuration.
    pub(crate) fn build(&self) -> Result<FarmLayout, RenderingError> {
        FarmLayout::new(
            self.columns,
            self.rows,
            self.tile_length,
            self.gap,
            Size::new(self.field_width, self.field_height),
        )
    }
}

/// Farmer spawn settings.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct PlayerConfig {
    pub(crate) start: Position,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            start: PLAYER_START,
        }
    }
}

/// Window presentation settings; command-line flags take precedence.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct WindowConfig {
    pub(crate) title: String,
    pub(crate) vsync: bool,
    pub(crate) show_fps: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "NASA Data Farm".to_owned(),
            vsync: true,
            show_fps: false,
        }
    }
}

/// Errors raised while loading or validating configuration.
#[derive(Debug, Error)]
pub(crate) enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read config file {}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// The configuration file is not valid TOML for this schema.
    #[error("failed to parse config")]
    Parse(#[from] toml::de::Error),
    /// A tuning value that must be finite and positive was not.
    #[error("{field} must be a finite positive number (received {value})")]
    NonPositive { field: &'static str, value: f32 },
    /// A coordinate was infinite or NaN.
    #[error("{field} must be a finite number (received {value})")]
    NotFinite { field: &'static str, value: f32 },
    /// The farm layout does not describe a usable grid.
    #[error("invalid farm layout")]
    Layout(#[from] RenderingError),
}

impl FarmConfig {
    /// Loads configuration from `path`, or returns defaults when no path is given.
    pub(crate) fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let Some(path) = path else {
            log::debug!("no config file provided, using defaults");
            return Ok(Self::default());
        };

        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&text)?;
        log::info!("loaded config from {}", path.display());
        Ok(config)
    }

    /// Parses and validates configuration from TOML text.
    pub(crate) fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let motion = &self.motion;
        let checks = [
            ("motion.speed", motion.speed),
            ("motion.player_size.width", motion.player_size.width()),
            ("motion.player_size.height", motion.player_size.height()),
            ("motion.feet_offset", motion.feet_offset),
            ("motion.tile_size", motion.tile_size),
        ];
        for (field, value) in checks {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::NonPositive { field, value });
            }
        }

        let start = self.player.start;
        for (field, value) in [("player.start.x", start.x()), ("player.start.y", start.y())] {
            if !value.is_finite() {
                return Err(ConfigError::NotFinite { field, value });
            }
        }

        let _ = self.layout.build()?;

        if (self.layout.tile_length - motion.tile_size).abs() > f32::EPSILON {
            log::warn!(
                "layout tile_length {} differs from motion tile_size {}; interaction radius follows tile_size",
                self.layout.tile_length,
                motion.tile_size
            );
        }
        if motion.feet_offset > motion.player_size.height() {
            log::warn!(
                "feet_offset {} lies below the farmer's box of height {}",
                motion.feet_offset,
                motion.player_size.height()
            );
        }

        Ok(())
    }
}
