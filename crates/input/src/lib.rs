//! Input handling for keyboard and mouse, plus the named axis/action binding layer.

pub mod bindings;

pub use bindings::*;

use glam::Vec2;
use std::collections::HashSet;
use std::hash::Hash;

/// Held state and this frame's edges for one kind of button.
#[derive(Debug)]
struct ButtonSet<T> {
    held: HashSet<T>,
    pressed: HashSet<T>,
    released: HashSet<T>,
}

impl<T> Default for ButtonSet<T> {
    fn default() -> Self {
        Self {
            held: HashSet::new(),
            pressed: HashSet::new(),
            released: HashSet::new(),
        }
    }
}

impl<T: Copy + Eq + Hash> ButtonSet<T> {
    /// Key repeat does not produce a second press; a release needs a prior hold.
    fn apply(&mut self, button: T, state: ElementState) {
        match state {
            ElementState::Pressed => {
                if self.held.insert(button) {
                    self.pressed.insert(button);
                }
            }
            ElementState::Released => {
                if self.held.remove(&button) {
                    self.released.insert(button);
                }
            }
        }
    }

    fn clear_edges(&mut self) {
        self.pressed.clear();
        self.released.clear();
    }
}

/// Raw keyboard and mouse state. Events accumulate between frames; `begin_frame`
/// clears edges and publishes the mouse motion gathered since the last call.
#[derive(Debug, Default)]
pub struct InputState {
    keys: ButtonSet<KeyCode>,
    mouse: ButtonSet<MouseButton>,
    mouse_delta: Vec2,
    accumulated_delta: Vec2,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin_frame(&mut self) {
        self.keys.clear_edges();
        self.mouse.clear_edges();
        self.mouse_delta = std::mem::take(&mut self.accumulated_delta);
    }

    pub fn process_keyboard(&mut self, key: KeyCode, state: ElementState) {
        self.keys.apply(key, state);
    }

    pub fn process_mouse_button(&mut self, button: MouseButton, state: ElementState) {
        self.mouse.apply(button, state);
    }

    /// Raw device motion in counts; positive y is down the screen.
    pub fn process_mouse_motion(&mut self, delta: (f64, f64)) {
        self.accumulated_delta += Vec2::new(delta.0 as f32, delta.1 as f32);
    }

    pub fn is_key_held(&self, key: KeyCode) -> bool {
        self.keys.held.contains(&key)
    }

    pub fn is_key_pressed(&self, key: KeyCode) -> bool {
        self.keys.pressed.contains(&key)
    }

    pub fn is_key_released(&self, key: KeyCode) -> bool {
        self.keys.released.contains(&key)
    }

    pub fn is_mouse_held(&self, button: MouseButton) -> bool {
        self.mouse.held.contains(&button)
    }

    pub fn is_mouse_pressed(&self, button: MouseButton) -> bool {
        self.mouse.pressed.contains(&button)
    }

    pub fn is_mouse_released(&self, button: MouseButton) -> bool {
        self.mouse.released.contains(&button)
    }

    /// Mouse motion published by the last `begin_frame`.
    pub fn mouse_delta(&self) -> Vec2 {
        self.mouse_delta
    }
}

pub use winit::event::{ElementState, MouseButton};
pub use winit::keyboard::KeyCode;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn press_is_reported_once_per_hold() {
        let mut input = InputState::new();
        input.process_keyboard(KeyCode::KeyR, ElementState::Pressed);
        assert!(input.is_key_pressed(KeyCode::KeyR));
        input.begin_frame();
        input.process_keyboard(KeyCode::KeyR, ElementState::Pressed);
        assert!(!input.is_key_pressed(KeyCode::KeyR));
        assert!(input.is_key_held(KeyCode::KeyR));
    }

    #[test]
    fn release_without_press_is_ignored() {
        let mut input = InputState::new();
        input.process_mouse_button(MouseButton::Left, ElementState::Released);
        assert!(!input.is_mouse_released(MouseButton::Left));
    }

    #[test]
    fn mouse_delta_published_on_next_frame() {
        let mut input = InputState::new();
        input.process_mouse_motion((3.0, -2.0));
        input.process_mouse_motion((1.0, 0.5));
        assert_eq!(input.mouse_delta(), Vec2::ZERO);
        input.begin_frame();
        assert_eq!(input.mouse_delta(), Vec2::new(4.0, -1.5));
        input.begin_frame();
        assert_eq!(input.mouse_delta(), Vec2::ZERO);
    }
}
