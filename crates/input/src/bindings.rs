//! Named input bindings: continuous axes and pressed/released action edges.
//!
//! Devices are read through `InputState`; gameplay only ever sees an `InputFrame`,
//! which names what happened (`Axis::Turn = 0.4`, `Action::Fire` pressed) rather
//! than which key did it.

use std::collections::HashMap;

use crate::{InputState, KeyCode, MouseButton};

/// Continuous inputs sampled every frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    MoveForward,
    MoveRight,
    /// Rate-based yaw input (gamepad stick or keys), scaled by turn rate and delta time.
    TurnRate,
    /// Rate-based pitch input, scaled by look-up rate and delta time.
    LookUpRate,
    /// Direct yaw input from the mouse.
    Turn,
    /// Direct pitch input from the mouse.
    LookUp,
}

/// Discrete inputs reported as edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Jump,
    Fire,
    Aim,
    Select,
    Drop,
    Reload,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionEdge {
    Pressed,
    Released,
}

/// A button that can drive an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonSource {
    Key(KeyCode),
    Mouse(MouseButton),
}

/// Something that produces an axis value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AxisSource {
    /// Contributes `scale` while the key is held.
    Key(KeyCode),
    /// Horizontal mouse delta this frame.
    MouseX,
    /// Vertical mouse delta this frame.
    MouseY,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisBinding {
    pub axis: Axis,
    pub source: AxisSource,
    pub scale: f32,
}

/// Everything gameplay needs from input for one frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InputFrame {
    axes: HashMap<Axis, f32>,
    edges: Vec<(Action, ActionEdge)>,
}

impl InputFrame {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set an axis value (summed with anything already there).
    pub fn with_axis(mut self, axis: Axis, value: f32) -> Self {
        *self.axes.entry(axis).or_insert(0.0) += value;
        self
    }

    /// Append an action edge.
    pub fn with_edge(mut self, action: Action, edge: ActionEdge) -> Self {
        self.edges.push((action, edge));
        self
    }

    pub fn pressed(self, action: Action) -> Self {
        self.with_edge(action, ActionEdge::Pressed)
    }

    pub fn released(self, action: Action) -> Self {
        self.with_edge(action, ActionEdge::Released)
    }

    /// Value of an axis this frame; unbound axes read 0.
    pub fn axis(&self, axis: Axis) -> f32 {
        self.axes.get(&axis).copied().unwrap_or(0.0)
    }

    /// Action edges in the order they were collected.
    pub fn edges(&self) -> &[(Action, ActionEdge)] {
        &self.edges
    }
}

/// Maps device inputs to named axes and actions.
#[derive(Debug, Clone, Default)]
pub struct InputBindings {
    actions: Vec<(Action, ButtonSource)>,
    axes: Vec<AxisBinding>,
}

impl InputBindings {
    /// Empty binding table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Keyboard + mouse layout: WASD move, mouse look, arrow-key rate look, LMB fire,
    /// RMB aim, E select, Q drop, R reload, Space jump.
    pub fn default_layout() -> Self {
        let mut b = Self::new();
        b.bind_axis(Axis::MoveForward, AxisSource::Key(KeyCode::KeyW), 1.0);
        b.bind_axis(Axis::MoveForward, AxisSource::Key(KeyCode::KeyS), -1.0);
        b.bind_axis(Axis::MoveRight, AxisSource::Key(KeyCode::KeyD), 1.0);
        b.bind_axis(Axis::MoveRight, AxisSource::Key(KeyCode::KeyA), -1.0);
        b.bind_axis(Axis::TurnRate, AxisSource::Key(KeyCode::ArrowRight), 1.0);
        b.bind_axis(Axis::TurnRate, AxisSource::Key(KeyCode::ArrowLeft), -1.0);
        b.bind_axis(Axis::LookUpRate, AxisSource::Key(KeyCode::ArrowUp), 1.0);
        b.bind_axis(Axis::LookUpRate, AxisSource::Key(KeyCode::ArrowDown), -1.0);
        b.bind_axis(Axis::Turn, AxisSource::MouseX, 1.0);
        // Screen Y grows downward.
        b.bind_axis(Axis::LookUp, AxisSource::MouseY, -1.0);

        b.bind_action(Action::Jump, ButtonSource::Key(KeyCode::Space));
        b.bind_action(Action::Fire, ButtonSource::Mouse(MouseButton::Left));
        b.bind_action(Action::Aim, ButtonSource::Mouse(MouseButton::Right));
        b.bind_action(Action::Select, ButtonSource::Key(KeyCode::KeyE));
        b.bind_action(Action::Drop, ButtonSource::Key(KeyCode::KeyQ));
        b.bind_action(Action::Reload, ButtonSource::Key(KeyCode::KeyR));
        b
    }

    pub fn bind_axis(&mut self, axis: Axis, source: AxisSource, scale: f32) {
        self.axes.push(AxisBinding { axis, source, scale });
    }

    pub fn bind_action(&mut self, action: Action, source: ButtonSource) {
        self.actions.push((action, source));
    }

    /// Sum of every binding's contribution to `axis`.
    pub fn axis_value(&self, input: &InputState, axis: Axis) -> f32 {
        self.axes
            .iter()
            .filter(|b| b.axis == axis)
            .map(|b| {
                let raw = match b.source {
                    AxisSource::Key(key) => {
                        if input.is_key_held(key) {
                            1.0
                        } else {
                            0.0
                        }
                    }
                    AxisSource::MouseX => input.mouse_delta().x,
                    AxisSource::MouseY => input.mouse_delta().y,
                };
                raw * b.scale
            })
            .sum()
    }

    /// Whether any source bound to `action` is held.
    pub fn is_action_held(&self, input: &InputState, action: Action) -> bool {
        self.actions
            .iter()
            .filter(|(a, _)| *a == action)
            .any(|(_, source)| match *source {
                ButtonSource::Key(key) => input.is_key_held(key),
                ButtonSource::Mouse(button) => input.is_mouse_held(button),
            })
    }

    /// Collect this frame's axes and action edges.
    ///
    /// An action bound to several buttons reports at most one edge of each kind per frame.
    pub fn sample(&self, input: &InputState) -> InputFrame {
        let mut frame = InputFrame::new();
        for binding in &self.axes {
            frame.axes.entry(binding.axis).or_insert(0.0);
        }
        for axis in frame.axes.keys().copied().collect::<Vec<_>>() {
            frame.axes.insert(axis, self.axis_value(input, axis));
        }

        for (action, source) in &self.actions {
            let (pressed, released) = match *source {
                ButtonSource::Key(key) => (input.is_key_pressed(key), input.is_key_released(key)),
                ButtonSource::Mouse(button) => {
                    (input.is_mouse_pressed(button), input.is_mouse_released(button))
                }
            };
            if pressed && !frame.edges.contains(&(*action, ActionEdge::Pressed)) {
                frame.edges.push((*action, ActionEdge::Pressed));
            }
            if released && !frame.edges.contains(&(*action, ActionEdge::Released)) {
                frame.edges.push((*action, ActionEdge::Released));
            }
        }
        if !frame.edges.is_empty() {
            log::trace!("input edges: {:?}", frame.edges);
        }
        frame
    }
}
