//! Core engine-neutral types shared by the shooter crates.
//!
//! This crate provides the foundational pieces a host loop hands to gameplay code:
//! - Transform and rotator types
//! - Frame clock and one-shot timers
//! - Scalar interpolation helpers

pub mod math;
pub mod time;
pub mod timer;
pub mod transform;

pub use math::*;
pub use time::*;
pub use timer::*;
pub use transform::*;

// Re-export commonly used types
pub use glam::{Quat, Vec2, Vec3};
pub use hecs::{Entity, World};
