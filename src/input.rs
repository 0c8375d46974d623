//! Explicit input state.
//!
//! Winit delivers events one at a time; [`InputState`] remembers what is
//! currently held down and which mouse drags happened since the camera
//! controller last looked. The frame loop owns one instance and feeds it
//! every window event.

use std::collections::HashSet;

use winit::{
    dpi::PhysicalPosition,
    event::{ElementState, MouseButton, WindowEvent},
    keyboard::{KeyCode, PhysicalKey},
};

#[derive(Debug, Clone, Default)]
pub struct InputState {
    keys_down: HashSet<KeyCode>,
    buttons_down: HashSet<MouseButton>,
    cursor: PhysicalPosition<f64>,
    last_mouse: PhysicalPosition<f64>,
    drags: Vec<(f64, f64)>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn key_pressed(&mut self, key: KeyCode) {
        self.keys_down.insert(key);
    }

    pub fn key_released(&mut self, key: KeyCode) {
        self.keys_down.remove(&key);
    }

    pub fn is_key_down(&self, key: KeyCode) -> bool {
        self.keys_down.contains(&key)
    }

    pub fn button_pressed(&mut self, button: MouseButton) {
        self.buttons_down.insert(button);
        self.last_mouse = self.cursor;
    }

    pub fn button_released(&mut self, button: MouseButton) {
        self.buttons_down.remove(&button);
        self.last_mouse = self.cursor;
    }

    pub fn is_button_down(&self, button: MouseButton) -> bool {
        self.buttons_down.contains(&button)
    }

    /// Track the cursor. While the left button is held every move is
    /// recorded as a drag relative to the previous mouse position.
    pub fn cursor_moved(&mut self, position: PhysicalPosition<f64>) {
        self.cursor = position;
        if self.is_button_down(MouseButton::Left) {
            let delta = (position.x - self.last_mouse.x, position.y - self.last_mouse.y);
            if delta != (0.0, 0.0) {
                self.drags.push(delta);
            }
            self.last_mouse = position;
        }
    }

    pub fn last_mouse(&self) -> PhysicalPosition<f64> {
        self.last_mouse
    }

    /// Drags recorded since the previous call, oldest first.
    pub fn take_drags(&mut self) -> Vec<(f64, f64)> {
        std::mem::take(&mut self.drags)
    }

    /// Drop everything that is held down, e.g. when the window loses focus
    /// and release events would go missing.
    pub fn clear(&mut self) {
        self.keys_down.clear();
        self.buttons_down.clear();
        self.drags.clear();
    }

    pub fn handle_window_event(&mut self, event: &WindowEvent) {
        match event {
            WindowEvent::KeyboardInput { event, .. } => {
                if let PhysicalKey::Code(code) = event.physical_key {
                    match event.state {
                        ElementState::Pressed => self.key_pressed(code),
                        ElementState::Released => self.key_released(code),
                    }
                }
            }
            WindowEvent::MouseInput { state, button, .. } => match state {
                ElementState::Pressed => self.button_pressed(*button),
                ElementState::Released => self.button_released(*button),
            },
            WindowEvent::CursorMoved { position, .. } => self.cursor_moved(*position),
            WindowEvent::Focused(false) => self.clear(),
            _ => (),
        }
    }
}
