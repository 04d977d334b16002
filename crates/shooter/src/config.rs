//! Character tuning (look rates, camera, combat, crosshair, movement). Loaded from
//! `shooter.ron` at startup.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::ammo::AmmoType;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not access {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config in {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: ron::error::SpannedError,
    },
    #[error("could not serialize config: {0}")]
    Serialize(#[from] ron::Error),
}

/// Full character tuning. Missing fields fall back to their defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShooterConfig {
    #[serde(default)]
    pub look: LookConfig,
    #[serde(default)]
    pub camera: CameraConfig,
    #[serde(default)]
    pub combat: CombatConfig,
    #[serde(default)]
    pub spread: SpreadConfig,
    #[serde(default)]
    pub movement: MovementConfig,
}

/// Turn/look-up rates in degrees per second, and mouse sensitivity scales.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LookConfig {
    pub hip_turn_rate: f32,
    pub hip_look_up_rate: f32,
    pub aiming_turn_rate: f32,
    pub aiming_look_up_rate: f32,
    pub mouse_hip_turn_scale: f32,
    pub mouse_hip_look_up_scale: f32,
    pub mouse_aiming_turn_scale: f32,
    pub mouse_aiming_look_up_scale: f32,
}

impl Default for LookConfig {
    fn default() -> Self {
        Self {
            hip_turn_rate: 45.0,
            hip_look_up_rate: 41.0,
            aiming_turn_rate: 20.0,
            aiming_look_up_rate: 20.0,
            mouse_hip_turn_scale: 1.0,
            mouse_hip_look_up_scale: 1.0,
            mouse_aiming_turn_scale: 0.6,
            mouse_aiming_look_up_scale: 0.6,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Field of view when not aiming, in degrees.
    pub default_fov: f32,
    /// Field of view while aiming, in degrees.
    pub zoomed_fov: f32,
    pub zoom_interp_speed: f32,
    /// Distance the camera boom holds behind the character.
    pub boom_arm_length: f32,
    /// Offset of the camera at the end of the boom as (forward, right, up) in the boom's frame.
    pub boom_socket_offset: [f32; 3],
    /// How far in front of the camera a picked-up item floats.
    pub pickup_interp_distance: f32,
    /// How far above the camera line a picked-up item floats.
    pub pickup_interp_elevation: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            default_fov: 90.0,
            zoomed_fov: 35.0,
            zoom_interp_speed: 22.0,
            boom_arm_length: 180.0,
            boom_socket_offset: [0.0, 50.0, 70.0],
            pickup_interp_distance: 250.0,
            pickup_interp_elevation: 65.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatConfig {
    /// Cooldown between automatic shots, in seconds.
    pub automatic_fire_rate: f32,
    /// How long a shot keeps the crosshair shooting factor active, in seconds.
    pub crosshair_shooting_duration: f32,
    /// Reserve ammo granted at spawn, per ammo type.
    pub starting_ammo: Vec<(AmmoType, u32)>,
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self {
            automatic_fire_rate: 0.1,
            crosshair_shooting_duration: 0.05,
            starting_ammo: vec![(AmmoType::NineMillimeter, 80), (AmmoType::AssaultRifle, 120)],
        }
    }
}

/// Targets and convergence rates for the four crosshair spread factors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpreadConfig {
    pub base: f32,
    /// Horizontal speed at which the velocity factor saturates at 1.
    pub max_walk_speed: f32,
    pub in_air_target: f32,
    pub in_air_rate: f32,
    pub grounded_rate: f32,
    pub aiming_target: f32,
    pub aiming_rate: f32,
    pub shooting_target: f32,
    pub shooting_rate: f32,
}

impl Default for SpreadConfig {
    fn default() -> Self {
        Self {
            base: 0.5,
            max_walk_speed: 600.0,
            in_air_target: 2.25,
            in_air_rate: 2.25,
            grounded_rate: 35.0,
            aiming_target: 0.5,
            aiming_rate: 30.0,
            shooting_target: 0.3,
            shooting_rate: 60.0,
        }
    }
}

/// Movement parameters handed to the host's character mover.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MovementConfig {
    pub jump_z_velocity: f32,
    pub air_control: f32,
    /// Yaw rotation rate toward movement, degrees per second.
    pub rotation_rate: f32,
}

impl Default for MovementConfig {
    fn default() -> Self {
        Self {
            jump_z_velocity: 600.0,
            air_control: 0.1,
            rotation_rate: 540.0,
        }
    }
}

impl ShooterConfig {
    /// Load config from `shooter.ron`. If the file is missing or invalid, returns default config.
    pub fn load() -> Self {
        let path = config_path();
        if !path.exists() {
            return Self::default();
        }
        match Self::load_from(&path) {
            Ok(c) => c,
            Err(e) => {
                log::warn!("{}, using defaults", e);
                Self::default()
            }
        }
    }

    /// Load config from an explicit path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let data = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        ron::from_str(&data).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Save config to an explicit path.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let s = ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())?;
        std::fs::write(path, s).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}

fn config_path() -> PathBuf {
    std::env::current_dir()
        .unwrap_or_else(|_| PathBuf::from("."))
        .join("shooter.ron")
}
