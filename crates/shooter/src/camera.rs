//! Follow camera: aiming zoom, look sensitivity and the spot picked-up items float to.

use engine_core::{interp_to, Transform, Vec3};

use crate::config::{CameraConfig, LookConfig};

/// Field of view, look rates and pickup interp target for the over-the-shoulder camera.
#[derive(Debug, Clone, PartialEq)]
pub struct CameraRig {
    camera: CameraConfig,
    look: LookConfig,
    current_fov: f32,
    /// Active turn rate for rate-based input, degrees per second.
    base_turn_rate: f32,
    /// Active look-up rate for rate-based input, degrees per second.
    base_look_up_rate: f32,
}

impl CameraRig {
    pub fn new(camera: CameraConfig, look: LookConfig) -> Self {
        Self {
            current_fov: camera.default_fov,
            base_turn_rate: look.hip_turn_rate,
            base_look_up_rate: look.hip_look_up_rate,
            camera,
            look,
        }
    }

    pub fn current_fov(&self) -> f32 {
        self.current_fov
    }

    pub fn base_turn_rate(&self) -> f32 {
        self.base_turn_rate
    }

    pub fn base_look_up_rate(&self) -> f32 {
        self.base_look_up_rate
    }

    pub fn boom_arm_length(&self) -> f32 {
        self.camera.boom_arm_length
    }

    pub fn boom_socket_offset(&self) -> Vec3 {
        Vec3::from_array(self.camera.boom_socket_offset)
    }

    /// Ease the field of view toward the zoomed or default value.
    pub fn interp_zoom(&mut self, dt: f32, aiming: bool) {
        let target = if aiming {
            self.camera.zoomed_fov
        } else {
            self.camera.default_fov
        };
        self.current_fov = interp_to(self.current_fov, target, dt, self.camera.zoom_interp_speed);
    }

    /// Switch rate-based look speeds between hip and aiming values.
    pub fn set_look_rates(&mut self, aiming: bool) {
        if aiming {
            self.base_turn_rate = self.look.aiming_turn_rate;
            self.base_look_up_rate = self.look.aiming_look_up_rate;
        } else {
            self.base_turn_rate = self.look.hip_turn_rate;
            self.base_look_up_rate = self.look.hip_look_up_rate;
        }
    }

    /// Yaw delta in degrees for a rate input in `[-1, 1]` over `dt` seconds.
    pub fn turn_at_rate(&self, rate: f32, dt: f32) -> f32 {
        rate * self.base_turn_rate * dt
    }

    /// Pitch delta in degrees for a rate input in `[-1, 1]` over `dt` seconds.
    pub fn look_up_at_rate(&self, rate: f32, dt: f32) -> f32 {
        rate * self.base_look_up_rate * dt
    }

    /// Yaw delta for a direct mouse input.
    pub fn turn(&self, value: f32, aiming: bool) -> f32 {
        let scale = if aiming {
            self.look.mouse_aiming_turn_scale
        } else {
            self.look.mouse_hip_turn_scale
        };
        value * scale
    }

    /// Pitch delta for a direct mouse input.
    pub fn look_up(&self, value: f32, aiming: bool) -> f32 {
        let scale = if aiming {
            self.look.mouse_aiming_look_up_scale
        } else {
            self.look.mouse_hip_look_up_scale
        };
        value * scale
    }

    /// Where a selected item floats while it interpolates to the camera:
    /// camera location + forward × distance, raised by the elevation.
    pub fn pickup_interp_target(&self, camera: &Transform) -> Vec3 {
        camera.position
            + camera.forward() * self.camera.pickup_interp_distance
            + Vec3::Y * self.camera.pickup_interp_elevation
    }
}
