//! Crosshair spread: a scalar that widens the reticle while moving, airborne or
//! firing and tightens it while aiming.

use engine_core::{interp_to, map_range_clamped};

use crate::config::SpreadConfig;

/// What the spread model reads each frame.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SpreadInputs {
    /// Horizontal speed of the character.
    pub speed: f32,
    pub airborne: bool,
    pub aiming: bool,
    /// A shot was fired within the crosshair shooting duration.
    pub shooting: bool,
}

/// Per-frame spread factors and their sum.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CrosshairSpread {
    tuning: SpreadConfig,
    velocity_factor: f32,
    in_air_factor: f32,
    aiming_factor: f32,
    shooting_factor: f32,
    multiplier: f32,
}

impl CrosshairSpread {
    pub fn new(tuning: SpreadConfig) -> Self {
        Self {
            tuning,
            ..Default::default()
        }
    }

    /// Recompute every factor for a frame of `dt` seconds.
    pub fn update(&mut self, dt: f32, inputs: SpreadInputs) {
        let t = &self.tuning;

        self.velocity_factor = map_range_clamped((0.0, t.max_walk_speed), (0.0, 1.0), inputs.speed);

        // Spread slowly in the air, snap back on landing.
        self.in_air_factor = if inputs.airborne {
            interp_to(self.in_air_factor, t.in_air_target, dt, t.in_air_rate)
        } else {
            interp_to(self.in_air_factor, 0.0, dt, t.grounded_rate)
        };

        let aiming_target = if inputs.aiming { t.aiming_target } else { 0.0 };
        self.aiming_factor = interp_to(self.aiming_factor, aiming_target, dt, t.aiming_rate);

        let shooting_target = if inputs.shooting { t.shooting_target } else { 0.0 };
        self.shooting_factor = interp_to(self.shooting_factor, shooting_target, dt, t.shooting_rate);

        self.multiplier = t.base + self.velocity_factor + self.in_air_factor - self.aiming_factor
            + self.shooting_factor;
    }

    /// Combined spread. Not clamped; the renderer decides how to bound it.
    pub fn multiplier(&self) -> f32 {
        self.multiplier
    }

    pub fn velocity_factor(&self) -> f32 {
        self.velocity_factor
    }

    pub fn in_air_factor(&self) -> f32 {
        self.in_air_factor
    }

    pub fn aiming_factor(&self) -> f32 {
        self.aiming_factor
    }

    pub fn shooting_factor(&self) -> f32 {
        self.shooting_factor
    }
}
