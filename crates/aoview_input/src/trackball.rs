//! Trackball rotation controller
//!
//! Dragging the pointer rotates the object about an axis perpendicular to
//! the drag direction in view space. Rotations accumulate in a quaternion
//! which is renormalized after every change.

use aoview_math::{Quat, Vec3};

/// Maps pointer drags to 3D rotations
#[derive(Debug, Clone)]
pub struct Trackball {
    rotation: Quat,
    dragging: bool,
    last_cursor: Option<(f64, f64)>,
    /// Radians of rotation per pixel of drag
    pub rotate_speed: f32,
}

impl Default for Trackball {
    fn default() -> Self {
        Self::new()
    }
}

impl Trackball {
    pub fn new() -> Self {
        Self {
            rotation: Quat::IDENTITY,
            dragging: false,
            last_cursor: None,
            rotate_speed: 0.01,
        }
    }

    /// Builder: set rotation speed in radians per pixel
    pub fn with_rotate_speed(mut self, speed: f32) -> Self {
        self.rotate_speed = speed;
        self
    }

    /// Current accumulated rotation
    pub fn rotation(&self) -> Quat {
        self.rotation
    }

    /// Check if a drag is in progress
    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    /// Start or stop a drag
    pub fn set_dragging(&mut self, dragging: bool) {
        self.dragging = dragging;
    }

    /// Rotate as if the pointer was dragged by (dx, dy) pixels
    ///
    /// Screen y grows downward. Returns true if the rotation changed.
    pub fn spin(&mut self, dx: f32, dy: f32) -> bool {
        let distance = (dx * dx + dy * dy).sqrt();
        if distance == 0.0 {
            return false;
        }

        // Dragging right turns about +Y, dragging down turns about +X
        let axis = Vec3::new(dy, dx, 0.0);
        let delta = Quat::from_axis_angle(axis, distance * self.rotate_speed);
        self.rotation = delta.compose(&self.rotation).normalize();
        true
    }

    /// Track pointer movement, spinning while a drag is active
    ///
    /// Motion without a drag only updates the cursor position.
    /// Returns true if the rotation changed.
    pub fn process_cursor_moved(&mut self, x: f64, y: f64) -> bool {
        let previous = self.last_cursor.replace((x, y));
        match previous {
            Some((px, py)) if self.dragging => self.spin((x - px) as f32, (y - py) as f32),
            _ => false,
        }
    }

    /// Forget the cursor position (e.g. when it leaves the window)
    pub fn clear_cursor(&mut self) {
        self.last_cursor = None;
    }

    /// Replace the rotation
    pub fn set_rotation(&mut self, rotation: Quat) {
        self.rotation = rotation.normalize();
    }
}
