//! Movement intent from input axes, and the per-frame movement sample the host reports
//! back from its character mover.

use engine_core::{Rotator, Vec3};

/// What the host's character mover reports each frame.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MovementSample {
    pub velocity: Vec3,
    pub acceleration: Vec3,
    /// In the air (jumping or falling).
    pub falling: bool,
}

impl MovementSample {
    /// Speed ignoring the vertical component.
    pub fn lateral_speed(&self) -> f32 {
        Vec3::new(self.velocity.x, 0.0, self.velocity.z).length()
    }
}

/// Movement requested this frame, to be consumed by the host's character mover.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MovementIntent {
    /// Accumulated world-space input direction (not normalized).
    pub input: Vec3,
    pub jump: bool,
    pub stop_jumping: bool,
}

impl MovementIntent {
    /// Add forward/backward input along the control yaw.
    pub fn move_forward(&mut self, control: Rotator, value: f32) {
        if value != 0.0 {
            self.input += control.yaw_only().forward() * value;
        }
    }

    /// Add right/left input along the control yaw.
    pub fn move_right(&mut self, control: Rotator, value: f32) {
        if value != 0.0 {
            self.input += control.yaw_only().right() * value;
        }
    }
}
