//! Orbit camera controller
//!
//! Controls:
//! - Left drag: trackball rotation
//! - Wheel away from the user: zoom in (distance x0.9)
//! - Wheel toward the user: zoom out (distance x1.1)

use aoview_math::Quat;
use winit::event::{ElementState, MouseButton, MouseScrollDelta};

use crate::Trackball;

/// Camera state the controller writes into
pub trait CameraControl {
    fn set_orientation(&mut self, orientation: Quat);
    fn set_zoom(&mut self, zoom: f32);
}

/// Normalize a winit wheel event to a signed delta
///
/// Negative means the wheel rolled away from the user, positive toward.
/// Pixel deltas from touchpads keep their sign but not their magnitude.
pub fn wheel_delta(delta: MouseScrollDelta) -> f32 {
    match delta {
        MouseScrollDelta::LineDelta(_, y) => -y,
        MouseScrollDelta::PixelDelta(pos) if pos.y != 0.0 => -(pos.y.signum() as f32),
        MouseScrollDelta::PixelDelta(_) => 0.0,
    }
}

/// Turns pointer input into orientation and zoom changes
#[derive(Debug, Clone)]
pub struct CameraController {
    trackball: Trackball,
    zoom: f32,
    initial_zoom: f32,
    initial_rotation: Quat,

    // Configuration
    pub min_zoom: f32,
    pub max_zoom: f32,
    pub zoom_in_factor: f32,
    pub zoom_out_factor: f32,
}

impl Default for CameraController {
    fn default() -> Self {
        Self::new()
    }
}

impl CameraController {
    pub const DEFAULT_ZOOM: f32 = 192.0;
    pub const MIN_ZOOM: f32 = 10.0;
    pub const MAX_ZOOM: f32 = 512.0;

    pub fn new() -> Self {
        Self {
            trackball: Trackball::new(),
            zoom: Self::DEFAULT_ZOOM,
            initial_zoom: Self::DEFAULT_ZOOM,
            initial_rotation: Quat::IDENTITY,
            min_zoom: Self::MIN_ZOOM,
            max_zoom: Self::MAX_ZOOM,
            zoom_in_factor: 0.9,
            zoom_out_factor: 1.1,
        }
    }

    /// Builder: set the starting camera distance
    pub fn with_zoom(mut self, zoom: f32) -> Self {
        self.zoom = zoom.clamp(self.min_zoom, self.max_zoom);
        self.initial_zoom = self.zoom;
        self
    }

    /// Builder: set the allowed camera distance range
    pub fn with_zoom_range(mut self, min: f32, max: f32) -> Self {
        self.min_zoom = min;
        self.max_zoom = max;
        self.zoom = self.zoom.clamp(min, max);
        self.initial_zoom = self.initial_zoom.clamp(min, max);
        self
    }

    /// Builder: set trackball speed in radians per pixel
    pub fn with_rotate_speed(mut self, speed: f32) -> Self {
        self.trackball.rotate_speed = speed;
        self
    }

    /// Builder: start from a programmatic drag of (dx, dy) pixels
    ///
    /// Uses the current rotate speed; `reset` returns to this rotation.
    pub fn with_initial_spin(mut self, dx: f32, dy: f32) -> Self {
        self.trackball.spin(dx, dy);
        self.initial_rotation = self.trackball.rotation();
        self
    }

    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    pub fn rotation(&self) -> Quat {
        self.trackball.rotation()
    }

    /// Process mouse button input
    pub fn process_mouse_button(&mut self, button: MouseButton, state: ElementState) {
        if button == MouseButton::Left {
            self.trackball.set_dragging(state == ElementState::Pressed);
        }
    }

    /// Process cursor movement. Returns true if the rotation changed.
    pub fn process_cursor_moved(&mut self, x: f64, y: f64) -> bool {
        self.trackball.process_cursor_moved(x, y)
    }

    /// Cursor left the window
    pub fn process_cursor_left(&mut self) {
        self.trackball.clear_cursor();
    }

    /// Process a normalized wheel delta (see [`wheel_delta`])
    ///
    /// Each event scales the distance by one factor regardless of magnitude.
    /// Returns true if the event was consumed (delta was non-zero).
    pub fn process_scroll(&mut self, delta: f32) -> bool {
        if delta == 0.0 || delta.is_nan() {
            return false;
        }
        let factor = if delta < 0.0 { self.zoom_in_factor } else { self.zoom_out_factor };
        self.zoom = (self.zoom * factor).clamp(self.min_zoom, self.max_zoom);
        true
    }

    /// Apply a programmatic drag of (dx, dy) pixels
    pub fn spin(&mut self, dx: f32, dy: f32) -> bool {
        self.trackball.spin(dx, dy)
    }

    /// Back to the starting rotation and zoom
    pub fn reset(&mut self) {
        self.trackball.set_rotation(self.initial_rotation);
        self.zoom = self.initial_zoom;
    }

    /// Write the current orientation and zoom into a camera
    pub fn apply<C: CameraControl>(&self, camera: &mut C) {
        camera.set_orientation(self.trackball.rotation());
        camera.set_zoom(self.zoom);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use winit::dpi::PhysicalPosition;

    #[derive(Default)]
    struct MockCamera {
        orientation: Option<Quat>,
        zoom: Option<f32>,
    }

    impl CameraControl for MockCamera {
        fn set_orientation(&mut self, orientation: Quat) {
            self.orientation = Some(orientation);
        }

        fn set_zoom(&mut self, zoom: f32) {
            self.zoom = Some(zoom);
        }
    }

    #[test]
    fn test_default_zoom() {
        let controller = CameraController::new();
        assert_eq!(controller.zoom(), 192.0);
    }

    #[test]
    fn test_wheel_away_zooms_in() {
        let mut controller = CameraController::new();
        assert!(controller.process_scroll(-1.0));
        assert!((controller.zoom() - 172.8).abs() < 1e-3);
    }

    #[test]
    fn test_wheel_toward_zooms_out() {
        let mut controller = CameraController::new();
        assert!(controller.process_scroll(3.0));
        assert!((controller.zoom() - 211.2).abs() < 1e-3);
    }

    #[test]
    fn test_six_wheel_events_away() {
        let mut controller = CameraController::new();
        for _ in 0..6 {
            controller.process_scroll(-1.0);
        }
        // 192 * 0.9^6
        assert!((controller.zoom() - 102.036).abs() < 0.01, "zoom = {}", controller.zoom());
    }

    #[test]
    fn test_zoom_clamped_low() {
        let mut controller = CameraController::new();
        for _ in 0..200 {
            controller.process_scroll(-1.0);
        }
        assert_eq!(controller.zoom(), 10.0);
    }

    #[test]
    fn test_zoom_clamped_high() {
        let mut controller = CameraController::new();
        for _ in 0..200 {
            controller.process_scroll(1.0);
        }
        assert_eq!(controller.zoom(), 512.0);
    }

    #[test]
    fn test_zero_delta_ignored() {
        let mut controller = CameraController::new();
        assert!(!controller.process_scroll(0.0));
        assert_eq!(controller.zoom(), 192.0);
    }

    #[test]
    fn test_custom_zoom_range() {
        let mut controller = CameraController::new().with_zoom_range(50.0, 100.0);
        assert_eq!(controller.zoom(), 100.0);
        for _ in 0..20 {
            controller.process_scroll(-1.0);
        }
        assert_eq!(controller.zoom(), 50.0);
    }

    #[test]
    fn test_wheel_delta_sign() {
        assert_eq!(wheel_delta(MouseScrollDelta::LineDelta(0.0, 1.0)), -1.0);
        assert_eq!(wheel_delta(MouseScrollDelta::LineDelta(0.0, -2.0)), 2.0);
        assert_eq!(wheel_delta(MouseScrollDelta::PixelDelta(PhysicalPosition::new(0.0, 40.0))), -1.0);
        assert_eq!(wheel_delta(MouseScrollDelta::PixelDelta(PhysicalPosition::new(0.0, 0.0))), 0.0);
    }

    #[test]
    fn test_left_drag_rotates() {
        let mut controller = CameraController::new();
        controller.process_cursor_moved(100.0, 100.0);
        assert!(!controller.process_cursor_moved(120.0, 100.0));

        controller.process_mouse_button(MouseButton::Left, ElementState::Pressed);
        assert!(controller.process_cursor_moved(140.0, 100.0));

        controller.process_mouse_button(MouseButton::Left, ElementState::Released);
        let after = controller.rotation();
        assert!(!controller.process_cursor_moved(200.0, 100.0));
        assert_eq!(controller.rotation(), after);
    }

    #[test]
    fn test_right_button_does_not_drag() {
        let mut controller = CameraController::new();
        controller.process_cursor_moved(0.0, 0.0);
        controller.process_mouse_button(MouseButton::Right, ElementState::Pressed);
        assert!(!controller.process_cursor_moved(50.0, 0.0));
    }

    #[test]
    fn test_reset_restores_start() {
        let mut controller = CameraController::new().with_zoom(150.0);
        controller.spin(30.0, 10.0);
        controller.process_scroll(1.0);
        controller.reset();
        assert_eq!(controller.rotation(), Quat::IDENTITY);
        assert_eq!(controller.zoom(), 150.0);
    }

    #[test]
    fn test_reset_keeps_initial_spin() {
        let mut controller = CameraController::new().with_initial_spin(13.0, 0.0);
        let start = controller.rotation();
        assert_ne!(start, Quat::IDENTITY);
        controller.spin(-40.0, 25.0);
        controller.reset();
        let q = controller.rotation();
        assert!((q.w - start.w).abs() < 1e-6 && (q.y - start.y).abs() < 1e-6);
    }

    #[test]
    fn test_apply_writes_camera() {
        let mut controller = CameraController::new();
        controller.spin(13.0, 0.0);
        let mut camera = MockCamera::default();
        controller.apply(&mut camera);
        assert_eq!(camera.orientation, Some(controller.rotation()));
        assert_eq!(camera.zoom, Some(192.0));
    }
}
