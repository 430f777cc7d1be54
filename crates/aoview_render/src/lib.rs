//! Ambient occlusion rendering
//!
//! This crate provides the wgpu-based pipeline that draws a mesh shaded by
//! its per-vertex occlusion values.
//!
//! ## Key Components
//!
//! - [`context::RenderContext`] - WGPU device, queue, and surface management
//! - [`camera::OrbitCamera`] - Orientation, zoom, and viewport of the viewer
//! - [`pipeline::AoPipeline`] - Depth-tested, back-face culled mesh pipeline
//! - [`draw::DrawHandle`] - GPU buffers for one mesh plus its occlusion values

pub mod context;
pub mod camera;
pub mod pipeline;
pub mod draw;
mod render_error;

pub use camera::OrbitCamera;
pub use draw::{frame_uniforms, prepare_vertices, DrawHandle};
pub use render_error::RenderError;

// Re-export core types for convenience
pub use aoview_core::{Mesh, Quat, Vec3};
