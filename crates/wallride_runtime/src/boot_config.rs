//! Boot Configuration
//!
//! # Configuration Sources (in priority order)
//!
//! 1. First positional command line argument: `wallride path/to/config.toml`
//! 2. Environment variable: `WALLRIDE_CONFIG=path/to/config.toml`
//! 3. `wallride.toml` in the working directory
//! 4. Built-in defaults
//!
//! # Example Config File
//!
//! ```toml
//! [run]
//! frames = 600
//! frame_time = 0.016666
//!
//! [controller.movement]
//! jump_speed = 9.0
//! wall_angle_tolerance = 1.0
//!
//! [controller.weapon]
//! bullet_speed = 120.0
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use wallride_controller::{ControllerConfig, ControllerError};

/// Errors raised while loading the boot configuration
#[derive(Debug, Error)]
pub enum BootError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error(transparent)]
    Controller(#[from] ControllerError),
}

/// How long the scripted run lasts
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Rendered frames to simulate
    pub frames: u32,
    /// Seconds per rendered frame
    pub frame_time: f32,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            frames: 600,
            frame_time: 1.0 / 60.0,
        }
    }
}

/// Complete boot configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BootConfig {
    pub run: RunConfig,
    pub controller: ControllerConfig,

    /// Where the config was loaded from
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl BootConfig {
    /// Load from the first available source
    pub fn load() -> Result<Self, BootError> {
        let explicit = std::env::args()
            .skip(1)
            .find(|arg| !arg.starts_with("--"))
            .or_else(|| std::env::var("WALLRIDE_CONFIG").ok().filter(|v| !v.is_empty()));

        let config = match explicit {
            // An explicit path has to exist
            Some(path) => Self::load_from_file(Path::new(&path))?,
            None if Path::new("wallride.toml").exists() => {
                Self::load_from_file(Path::new("wallride.toml"))?
            }
            None => {
                log::info!("No config file found, using defaults");
                Self::default()
            }
        };

        config.controller.validate()?;
        Ok(config)
    }

    /// Parse a TOML file
    pub fn load_from_file(path: &Path) -> Result<Self, BootError> {
        let content = std::fs::read_to_string(path).map_err(|source| BootError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config = Self::from_toml(&content).map_err(|source| BootError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.config_path = Some(path.to_path_buf());
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Parse TOML text; missing sections keep their defaults
    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Log the settings that matter for the run
    pub fn print_summary(&self) {
        let movement = &self.controller.movement;
        log::info!("=== Wallride Configuration ===");
        if let Some(path) = &self.config_path {
            log::info!("Config file: {}", path.display());
        }
        log::info!(
            "Run: {} frames at {:.4}s, physics step {:.4}s",
            self.run.frames,
            self.run.frame_time,
            self.controller.physics.timestep
        );
        log::info!(
            "Movement: jump {} / wall boost {} / wall jump {}, slope limit {}°, wall tolerance {}°",
            movement.jump_speed,
            movement.wall_boost_speed,
            movement.wall_jump_speed,
            movement.slope_limit,
            movement.wall_angle_tolerance
        );
        log::info!(
            "Weapon: speed {} delay {}s display threshold {}",
            self.controller.weapon.bullet_speed,
            self.controller.weapon.firing_delay,
            self.controller.weapon.display_spawn_threshold
        );
        log::info!("==============================");
    }
}
