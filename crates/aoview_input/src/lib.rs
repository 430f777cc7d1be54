//! Trackball camera input
//!
//! This crate turns pointer drags into trackball rotations and wheel events
//! into clamped zoom steps.

mod trackball;
mod camera_controller;

pub use trackball::Trackball;
pub use camera_controller::{CameraController, CameraControl, wheel_delta};
