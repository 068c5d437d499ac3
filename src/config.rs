//! Game tuning configuration
//!
//! Every tunable the simulation reads lives here and is passed explicitly
//! into constructors and `tick`. Defaults reproduce the shipped balance.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while loading or validating a configuration file
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error(
        "layer thresholds must satisfy mantle_start > crust_start > surface_start (got {mantle}, {crust}, {surface})"
    )]
    InvalidLayerThresholds { mantle: f32, crust: f32, surface: f32 },
    #[error("{field} must be positive (got {value})")]
    NonPositive { field: &'static str, value: f32 },
}

/// Visible playfield size (the world scrolls vertically behind it)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    pub width: f32,
    pub height: f32,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
        }
    }
}

/// Ambient physical targets of one geological band
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayerProperties {
    pub viscosity: f32,
    pub pressure: f32,
    pub temperature: f32,
    pub density: f32,
}

/// World column geometry and layer table.
///
/// y grows downward: 0 is the top of the world, `total_height` the bottom.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    pub total_height: f32,
    pub mantle_start: f32,
    pub crust_start: f32,
    pub surface_start: f32,
    pub mantle: LayerProperties,
    pub crust: LayerProperties,
    pub surface: LayerProperties,
    /// How far below the world bottom the magma may sink before the run is lost
    pub fall_margin: f32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            total_height: 5000.0,
            mantle_start: 4500.0,
            crust_start: 2000.0,
            surface_start: 500.0,
            mantle: LayerProperties {
                viscosity: 0.05,
                pressure: 1.5,
                temperature: 1200.0,
                density: 0.8,
            },
            crust: LayerProperties {
                viscosity: 0.25,
                pressure: 0.7,
                temperature: 800.0,
                density: 1.2,
            },
            surface: LayerProperties {
                viscosity: 0.4,
                pressure: 0.3,
                temperature: 400.0,
                density: 1.5,
            },
            fall_margin: 200.0,
        }
    }
}

/// Magma body and composition tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MagmaConfig {
    pub radius: f32,
    pub density: f32,
    /// Speed cap before viscosity scaling
    pub max_speed: f32,
    pub silica: f32,
    pub water: f32,
    pub gas: f32,
    pub temperature: f32,
    pub pressure: f32,
    pub melting_point: f32,
    pub min_pressure: f32,
    /// Gas-to-buoyancy factor inside the composition model
    pub buoyancy_factor: f32,
    /// Scale applied to buoyancy when it is turned into vertical force
    pub buoyancy_force_scale: f32,
    /// Ambient pressure that produces no gradient force
    pub reference_pressure: f32,
    pub density_force_scale: f32,
    /// Seconds to show a solidified magma before the run ends
    pub solidify_grace_secs: f32,
    /// Spawn distance above the world bottom
    pub spawn_offset: f32,
}

impl Default for MagmaConfig {
    fn default() -> Self {
        Self {
            radius: 10.0,
            density: 2.5,
            max_speed: 200.0,
            silica: 0.5,
            water: 0.02,
            gas: 0.01,
            temperature: 1000.0,
            pressure: 1.0,
            melting_point: 600.0,
            min_pressure: 0.4,
            buoyancy_factor: 8.0,
            buoyancy_force_scale: 10.0,
            reference_pressure: 0.3,
            density_force_scale: 0.5,
            solidify_grace_secs: 2.0,
            spawn_offset: 50.0,
        }
    }
}

/// Player control forces
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlsConfig {
    pub horizontal_force: f32,
    pub space_boost_force: f32,
    pub space_boost_cooldown_secs: f32,
    /// Horizontal force multiplier while pressed against a resistant rock
    pub blocked_multiplier: f32,
    /// Horizontal force multiplier while close to a resistant rock
    pub near_multiplier: f32,
}

impl Default for ControlsConfig {
    fn default() -> Self {
        Self {
            horizontal_force: 8.0,
            space_boost_force: 20.0,
            space_boost_cooldown_secs: 0.2,
            blocked_multiplier: 4.0,
            near_multiplier: 2.0,
        }
    }
}

/// Water and gas pocket tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PocketConfig {
    pub water_content: f32,
    pub gas_content: f32,
    /// Gas pockets are dropped once they float this far above the world top
    pub gas_escape_margin: f32,
}

impl Default for PocketConfig {
    fn default() -> Self {
        Self {
            water_content: 0.2,
            gas_content: 0.3,
            gas_escape_margin: 100.0,
        }
    }
}

/// Geological fault tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FaultConfig {
    pub temperature_boost: f32,
    pub pressure_boost: f32,
    pub upward_kick: f32,
    pub active_secs: f32,
    pub speed_boost_multiplier: f32,
    pub speed_boost_secs: f32,
    pub shape_transform_secs: f32,
    /// Chance per update that an active fault sheds an ember
    pub ember_chance: f32,
}

impl Default for FaultConfig {
    fn default() -> Self {
        Self {
            temperature_boost: 400.0,
            pressure_boost: 1.5,
            upward_kick: 15.0,
            active_secs: 3.0,
            speed_boost_multiplier: 1.5,
            speed_boost_secs: 2.0,
            shape_transform_secs: 1.5,
            ember_chance: 0.4,
        }
    }
}

/// Plain and resistant rock tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RockConfig {
    /// Fraction of velocity removed per second of contact
    pub resistance: f32,
    /// Degrees lost per second of contact
    pub cooling: f32,
    pub resistant_integrity: f32,
    /// Damage per unit of impact speed times magma pressure
    pub resistant_damage_factor: f32,
    pub resistant_tolerance: f32,
    pub resistant_near_margin: f32,
}

impl Default for RockConfig {
    fn default() -> Self {
        Self {
            resistance: 0.3,
            cooling: 10.0,
            resistant_integrity: 1.0,
            resistant_damage_factor: 0.01,
            resistant_tolerance: 2.0,
            resistant_near_margin: 30.0,
        }
    }
}

/// Volcano and eruption tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VolcanoConfig {
    /// Base of the cone, measured from the world top
    pub base_y: f32,
    pub width: f32,
    pub height: f32,
    pub crater_radius: f32,
    pub eruption_secs: f32,
}

impl Default for VolcanoConfig {
    fn default() -> Self {
        Self {
            base_y: 100.0,
            width: 200.0,
            height: 150.0,
            crater_radius: 40.0,
            eruption_secs: 5.0,
        }
    }
}

/// Camera follow tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Fraction of the remaining distance covered each frame
    pub smoothing: f32,
    pub offset_y: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            smoothing: 0.25,
            offset_y: 150.0,
        }
    }
}

/// Complete tuning set
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub canvas: CanvasConfig,
    pub world: WorldConfig,
    pub magma: MagmaConfig,
    pub controls: ControlsConfig,
    pub pockets: PocketConfig,
    pub faults: FaultConfig,
    pub rocks: RockConfig,
    pub volcano: VolcanoConfig,
    pub camera: CameraConfig,
}

impl GameConfig {
    /// Parse and validate a JSON config. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read a JSON config file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Read a JSON config file, falling back to defaults on any error
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                log::warn!("Using default config: {}", e);
                Self::default()
            }
        }
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check the invariants the simulation relies on
    pub fn validate(&self) -> Result<(), ConfigError> {
        let w = &self.world;
        if !(w.mantle_start > w.crust_start && w.crust_start > w.surface_start) {
            return Err(ConfigError::InvalidLayerThresholds {
                mantle: w.mantle_start,
                crust: w.crust_start,
                surface: w.surface_start,
            });
        }

        let positive = [
            ("world.total_height", w.total_height),
            ("canvas.width", self.canvas.width),
            ("canvas.height", self.canvas.height),
            ("magma.radius", self.magma.radius),
            ("magma.density", self.magma.density),
            ("magma.max_speed", self.magma.max_speed),
            ("volcano.crater_radius", self.volcano.crater_radius),
        ];
        for (field, value) in positive {
            if !(value > 0.0) {
                return Err(ConfigError::NonPositive { field, value });
            }
        }

        Ok(())
    }
}
