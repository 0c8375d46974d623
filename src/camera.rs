//! Camera projection and the input-driven camera controller.
//!
//! The scene's camera is a camera-to-world transform. The controller edits it
//! in the camera's own frame, so "forward" is always the direction the camera
//! is looking at (its local -Z axis). Rendering uses the inverse of that
//! transform as the view matrix.

use cgmath::{Deg, Matrix4, Rad, Vector3, perspective};
use winit::keyboard::KeyCode;

use crate::{data_structures::transform::LocalTransform, input::InputState};

#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: cgmath::Matrix4<f32> = cgmath::Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.0,
    0.0, 0.0, 0.5, 1.0,
);

/// Perspective projection for a surface of a given size.
#[derive(Debug, Clone, Copy)]
pub struct Projection {
    aspect: f32,
    fovy: Rad<f32>,
    znear: f32,
    zfar: f32,
}

impl Projection {
    pub fn new<F: Into<Rad<f32>>>(width: u32, height: u32, fovy: F, znear: f32, zfar: f32) -> Self {
        Self {
            aspect: aspect(width, height).unwrap_or(1.0),
            fovy: fovy.into(),
            znear,
            zfar,
        }
    }

    /// Adapt to a new surface size. A zero height keeps the previous aspect.
    pub fn resize(&mut self, width: u32, height: u32) {
        if let Some(aspect) = aspect(width, height) {
            self.aspect = aspect;
        }
    }

    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    pub fn calc_matrix(&self) -> Matrix4<f32> {
        OPENGL_TO_WGPU_MATRIX * perspective(self.fovy, self.aspect, self.znear, self.zfar)
    }
}

fn aspect(width: u32, height: u32) -> Option<f32> {
    (height > 0).then(|| width as f32 / height as f32)
}

/// Moves and turns the camera from held keys and mouse drags.
///
/// - `A`/`D` move left/right, `E`/`Q` up/down, `W`/`S` forward/back
/// - the arrow keys turn the camera
/// - dragging with the left mouse button looks in the drag direction
#[derive(Debug, Clone, Copy)]
pub struct CameraController {
    /// Distance moved per tick while a movement key is held.
    pub speed: f32,
    /// Angle turned per tick while an arrow key is held.
    pub turn: Rad<f32>,
    /// Degrees turned per pixel of mouse drag.
    pub mouse_sensitivity: f32,
}

impl CameraController {
    pub fn new<F: Into<Rad<f32>>>(speed: f32, turn: F, mouse_sensitivity: f32) -> Self {
        Self {
            speed,
            turn: turn.into(),
            mouse_sensitivity,
        }
    }

    /// Apply everything held or dragged since the last tick to `camera`.
    pub fn update(&self, input: &mut InputState, camera: &mut Matrix4<f32>) {
        self.apply_keys(input, camera);
        for (dx, dy) in input.take_drags() {
            self.apply_drag(dx, dy, camera);
        }
    }

    pub fn apply_keys(&self, input: &InputState, camera: &mut Matrix4<f32>) {
        let speed = self.speed;
        let moves = [
            (KeyCode::KeyA, Vector3::new(-speed, 0.0, 0.0)),
            (KeyCode::KeyD, Vector3::new(speed, 0.0, 0.0)),
            (KeyCode::KeyE, Vector3::new(0.0, speed, 0.0)),
            (KeyCode::KeyQ, Vector3::new(0.0, -speed, 0.0)),
            (KeyCode::KeyW, Vector3::new(0.0, 0.0, -speed)),
            (KeyCode::KeyS, Vector3::new(0.0, 0.0, speed)),
        ];
        for (key, offset) in moves {
            if input.is_key_down(key) {
                camera.translate(offset);
            }
        }

        let turn = self.turn;
        let turns = [
            (KeyCode::ArrowLeft, turn, Vector3::unit_y()),
            (KeyCode::ArrowRight, -turn, Vector3::unit_y()),
            (KeyCode::ArrowUp, turn, Vector3::unit_x()),
            (KeyCode::ArrowDown, -turn, Vector3::unit_x()),
        ];
        for (key, angle, axis) in turns {
            if input.is_key_down(key) {
                camera.rotate(angle, axis);
            }
        }
    }

    /// Turn the camera for a drag of (`dx`, `dy`) pixels.
    ///
    /// The rotation axis is perpendicular to the drag in the camera plane and
    /// the angle grows with the drag length.
    pub fn apply_drag(&self, dx: f64, dy: f64, camera: &mut Matrix4<f32>) {
        let axis = Vector3::new(dy as f32, dx as f32, 0.0);
        let length = (dx * dx + dy * dy).sqrt() as f32;
        camera.rotate(Deg(-length * self.mouse_sensitivity), axis);
    }
}

impl Default for CameraController {
    fn default() -> Self {
        Self::new(0.2, Deg(1.0), 0.1)
    }
}
