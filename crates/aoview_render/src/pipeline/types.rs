//! GPU-compatible data types for the occlusion pipeline
//!
//! These types are designed to match the shader layouts exactly.
//! All types derive Pod and Zeroable for safe GPU buffer operations.

use bytemuck::{Pod, Zeroable};

use aoview_math::mat4;

/// A mesh vertex with its occlusion value
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct AoVertex {
    /// Position in model space
    pub position: [f32; 3],
    /// Ambient occlusion in [0, 1] (1 = fully occluded)
    pub occlusion: f32,
}

impl AoVertex {
    pub fn new(position: [f32; 3], occlusion: f32) -> Self {
        Self { position, occlusion }
    }
}

/// Per-frame uniforms for the mesh pass
/// Layout: 208 bytes total (must match ao.wgsl MeshUniforms)
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct MeshUniforms {
    /// Model matrix (64 bytes)
    pub model: [[f32; 4]; 4],
    /// View matrix (64 bytes)
    pub view: [[f32; 4]; 4],
    /// Projection matrix (64 bytes)
    pub projection: [[f32; 4]; 4],
    /// Surface tint, alpha unused (16 bytes)
    pub tint: [f32; 4],
}

impl Default for MeshUniforms {
    fn default() -> Self {
        Self {
            model: mat4::IDENTITY,
            view: mat4::IDENTITY,
            projection: mat4::IDENTITY,
            tint: [1.0; 4],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::mem::size_of;

    #[test]
    fn test_ao_vertex_size() {
        // 3 floats position + 1 float occlusion = 16 bytes
        assert_eq!(size_of::<AoVertex>(), 16);
    }

    #[test]
    fn test_mesh_uniforms_size() {
        // 3 matrices * 64 bytes + 16 bytes tint
        assert_eq!(size_of::<MeshUniforms>(), 208);
        assert_eq!(size_of::<MeshUniforms>() % 16, 0);
    }

    #[test]
    fn test_alignment() {
        assert_eq!(std::mem::align_of::<AoVertex>(), 4);
        assert_eq!(std::mem::align_of::<MeshUniforms>(), 4);
    }
}
