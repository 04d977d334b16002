//! Transform and rotator types for spatial positioning.
//!
//! Conventions: right-handed, Y up, a zero rotation faces -Z. Rotator angles are in
//! degrees; positive yaw turns right, positive pitch looks up.

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::math::normalize_degrees;

/// A 3D transform representing position, rotation, and scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    /// Create a new transform at the given position.
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Create a new transform with position and rotation.
    pub fn from_position_rotation(position: Vec3, rotation: Quat) -> Self {
        Self {
            position,
            rotation,
            ..Default::default()
        }
    }

    /// Get the forward direction (negative Z in right-handed coordinates).
    pub fn forward(&self) -> Vec3 {
        self.rotation * -Vec3::Z
    }

    /// Get the right direction (positive X).
    pub fn right(&self) -> Vec3 {
        self.rotation * Vec3::X
    }

    /// Get the up direction (positive Y).
    pub fn up(&self) -> Vec3 {
        self.rotation * Vec3::Y
    }

    /// Translate the transform by a delta.
    pub fn translate(&mut self, delta: Vec3) {
        self.position += delta;
    }
}

/// Yaw/pitch/roll in degrees, as used for control rotation and animation offsets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rotator {
    pub pitch: f32,
    pub yaw: f32,
    pub roll: f32,
}

impl Rotator {
    pub const ZERO: Self = Self {
        pitch: 0.0,
        yaw: 0.0,
        roll: 0.0,
    };

    pub fn new(pitch: f32, yaw: f32, roll: f32) -> Self {
        Self { pitch, yaw, roll }
    }

    /// Rotator whose forward vector points along `direction`. Zero vectors give `ZERO`.
    pub fn from_direction(direction: Vec3) -> Self {
        if direction.length_squared() <= f32::EPSILON {
            return Self::ZERO;
        }
        let horizontal = (direction.x * direction.x + direction.z * direction.z).sqrt();
        Self {
            pitch: direction.y.atan2(horizontal).to_degrees(),
            yaw: direction.x.atan2(-direction.z).to_degrees(),
            roll: 0.0,
        }
    }

    /// Keep only the yaw component.
    pub fn yaw_only(self) -> Self {
        Self::new(0.0, self.yaw, 0.0)
    }

    pub fn to_quat(self) -> Quat {
        Quat::from_rotation_y(-self.yaw.to_radians())
            * Quat::from_rotation_x(self.pitch.to_radians())
            * Quat::from_rotation_z(-self.roll.to_radians())
    }

    /// Forward unit vector.
    pub fn forward(self) -> Vec3 {
        self.to_quat() * -Vec3::Z
    }

    /// Right unit vector.
    pub fn right(self) -> Vec3 {
        self.to_quat() * Vec3::X
    }

    /// Each axis wrapped into `(-180, 180]`.
    pub fn normalized(self) -> Self {
        Self {
            pitch: normalize_degrees(self.pitch),
            yaw: normalize_degrees(self.yaw),
            roll: normalize_degrees(self.roll),
        }
    }

    /// Shortest signed rotation from `other` to `self`, per axis.
    pub fn normalized_delta(self, other: Self) -> Self {
        Self {
            pitch: self.pitch - other.pitch,
            yaw: self.yaw - other.yaw,
            roll: self.roll - other.roll,
        }
        .normalized()
    }
}
