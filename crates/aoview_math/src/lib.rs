//! 3D Mathematics Library
//!
//! This crate provides the vector, rotation, and matrix types used by aoview.
//!
//! ## Core Types
//!
//! - [`Vec3`] - 3D vector with x, y, z components
//! - [`Quat`] - Unit quaternion for 3D rotations
//! - [`Mat4`] - 4x4 column-major matrix for transformations

mod vec3;
mod quat;
pub mod mat4;

pub use vec3::Vec3;
pub use quat::Quat;
pub use mat4::Mat4;
