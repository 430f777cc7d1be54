//! Scene construction utilities
//!
//! This module assembles the single mesh that gets sampled and rendered.

mod mesh_builder;

pub use mesh_builder::{MeshBuilder, build_scene_mesh, rigid_transform};
