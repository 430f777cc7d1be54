//! Orbit camera looking at the origin
//!
//! The camera sits on the +Z axis at distance `zoom` and looks at the origin
//! with +Y up. The mesh is turned by `orientation` instead of moving the eye,
//! so the trackball rotation becomes the model matrix.

use std::f32::consts::FRAC_PI_4;

use aoview_input::CameraControl;
use aoview_math::{mat4, Mat4, Quat, Vec3};

/// Camera state for the viewer
#[derive(Debug, Clone, PartialEq)]
pub struct OrbitCamera {
    /// Rotation applied to the mesh
    pub orientation: Quat,
    zoom: f32,
    viewport: (u32, u32),

    // Zoom limits
    pub min_zoom: f32,
    pub max_zoom: f32,

    // Projection
    pub fov_y: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self::new()
    }
}

impl OrbitCamera {
    pub const DEFAULT_ZOOM: f32 = 192.0;
    pub const MIN_ZOOM: f32 = 10.0;
    pub const MAX_ZOOM: f32 = 512.0;
    pub const FOV_Y: f32 = FRAC_PI_4;
    pub const NEAR: f32 = 0.1;
    pub const FAR: f32 = 1000.0;

    pub fn new() -> Self {
        Self {
            orientation: Quat::IDENTITY,
            zoom: Self::DEFAULT_ZOOM,
            viewport: (1, 1),
            min_zoom: Self::MIN_ZOOM,
            max_zoom: Self::MAX_ZOOM,
            fov_y: Self::FOV_Y,
            near: Self::NEAR,
            far: Self::FAR,
        }
    }

    /// Builder: override the projection (vertical fov in radians)
    pub fn with_projection(mut self, fov_y: f32, near: f32, far: f32) -> Self {
        self.fov_y = fov_y;
        self.near = near;
        self.far = far;
        self
    }

    /// Builder: override the zoom limits
    pub fn with_zoom_range(mut self, min: f32, max: f32) -> Self {
        self.min_zoom = min;
        self.max_zoom = max;
        self.zoom = self.zoom.clamp(min, max);
        self
    }

    /// Distance from the eye to the origin
    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    /// Set distance from the origin, clamped to the allowed range
    pub fn set_zoom(&mut self, zoom: f32) {
        self.zoom = zoom.clamp(self.min_zoom, self.max_zoom);
    }

    /// Viewport size in pixels
    pub fn viewport(&self) -> (u32, u32) {
        self.viewport
    }

    /// Resynchronize the viewport to the window's inner size
    pub fn set_viewport(&mut self, width: u32, height: u32) {
        self.viewport = (width, height);
    }

    /// Width over height (1.0 for a degenerate viewport)
    pub fn aspect_ratio(&self) -> f32 {
        let (w, h) = self.viewport;
        if w == 0 || h == 0 {
            1.0
        } else {
            w as f32 / h as f32
        }
    }

    /// Eye position in world space
    pub fn eye(&self) -> Vec3 {
        Vec3::new(0.0, 0.0, self.zoom)
    }

    /// Rotation of the mesh
    pub fn model_matrix(&self) -> Mat4 {
        mat4::from_quat(self.orientation)
    }

    pub fn view_matrix(&self) -> Mat4 {
        mat4::look_at(self.eye(), Vec3::ZERO, Vec3::Y)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        mat4::perspective(self.fov_y, self.aspect_ratio(), self.near, self.far)
    }
}

impl CameraControl for OrbitCamera {
    fn set_orientation(&mut self, orientation: Quat) {
        self.orientation = orientation;
    }

    fn set_zoom(&mut self, zoom: f32) {
        OrbitCamera::set_zoom(self, zoom);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 0.0001;

    #[test]
    fn test_defaults() {
        let camera = OrbitCamera::new();
        assert_eq!(camera.zoom(), 192.0);
        assert_eq!(camera.orientation, Quat::IDENTITY);
        assert_eq!(camera.eye(), Vec3::new(0.0, 0.0, 192.0));
    }

    #[test]
    fn test_zoom_clamped() {
        let mut camera = OrbitCamera::new();
        camera.set_zoom(1.0);
        assert_eq!(camera.zoom(), 10.0);
        camera.set_zoom(10_000.0);
        assert_eq!(camera.zoom(), 512.0);
    }

    #[test]
    fn test_view_maps_origin_in_front() {
        let camera = OrbitCamera::new();
        let p = mat4::transform_point(camera.view_matrix(), Vec3::ZERO);
        assert!((p.z + 192.0).abs() < EPSILON);
        assert!(p.x.abs() < EPSILON && p.y.abs() < EPSILON);
    }

    #[test]
    fn test_aspect_follows_viewport() {
        let mut camera = OrbitCamera::new();
        camera.set_viewport(1600, 800);
        assert!((camera.aspect_ratio() - 2.0).abs() < EPSILON);
        let proj = camera.projection_matrix();
        assert!((proj[1][1] / proj[0][0] - 2.0).abs() < EPSILON);
    }

    #[test]
    fn test_degenerate_viewport() {
        let mut camera = OrbitCamera::new();
        camera.set_viewport(640, 0);
        assert_eq!(camera.aspect_ratio(), 1.0);
    }

    #[test]
    fn test_model_is_orientation() {
        let mut camera = OrbitCamera::new();
        camera.orientation = Quat::from_axis_angle(Vec3::Y, 0.5);
        assert_eq!(camera.model_matrix(), camera.orientation.to_matrix());
    }

    #[test]
    fn test_camera_control() {
        let mut camera = OrbitCamera::new();
        let q = Quat::from_axis_angle(Vec3::X, 0.3);
        CameraControl::set_orientation(&mut camera, q);
        CameraControl::set_zoom(&mut camera, 5.0);
        assert_eq!(camera.orientation, q);
        assert_eq!(camera.zoom(), 10.0);
    }
}
