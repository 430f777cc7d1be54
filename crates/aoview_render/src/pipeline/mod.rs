//! Rendering pipeline components

pub mod types;
pub mod ao_pipeline;

pub use types::{AoVertex, MeshUniforms};
pub use ao_pipeline::AoPipeline;
