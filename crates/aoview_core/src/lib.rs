//! Core mesh types for aoview
//!
//! This crate provides the indexed triangle mesh and the preparation steps
//! that run before ambient occlusion is sampled:
//!
//! - [`Mesh`] - Indexed triangle mesh (positions + cells)
//! - [`MeshError`] - Validation and loading errors
//! - [`ShapeTemplate`] - Serializable description of a generated or loaded mesh
//! - [`MeshFile`] - RON mesh file format

mod mesh;
mod mesh_error;
mod shapes;
mod mesh_file;

pub use mesh::Mesh;
pub use mesh_error::MeshError;
pub use shapes::{ShapeTemplate, icosphere, torus, cuboid};
pub use mesh_file::MeshFile;

// Re-export commonly used types from aoview_math for convenience
pub use aoview_math::{Vec3, Quat, Mat4};
