//! Values the host's animation graph reads from the character each frame.

use engine_core::Rotator;

use crate::movement::MovementSample;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AnimationProperties {
    /// Lateral speed.
    pub speed: f32,
    pub is_in_air: bool,
    pub is_accelerating: bool,
    /// Yaw between where the character is moving and where it is aiming, for strafing.
    pub movement_offset_yaw: f32,
    /// Offset from the last frame the character was moving, for stop animations.
    pub last_movement_offset_yaw: f32,
    pub aiming: bool,
}

impl AnimationProperties {
    pub fn update(&mut self, sample: &MovementSample, aim_rotation: Rotator, aiming: bool) {
        self.speed = sample.lateral_speed();
        self.is_in_air = sample.falling;
        self.is_accelerating = sample.acceleration.length() > 0.0;

        let movement_rotation = Rotator::from_direction(sample.velocity);
        self.movement_offset_yaw = movement_rotation.normalized_delta(aim_rotation).yaw;
        if sample.velocity.length() > 0.0 {
            self.last_movement_offset_yaw = self.movement_offset_yaw;
        }

        self.aiming = aiming;
    }
}
