//! Mesh draw handle
//!
//! A `DrawHandle` is configured once from a mesh and its occlusion values.
//! After that, rendering only depends on the camera: every frame rebuilds the
//! uniforms from scratch and issues the same indexed draw.

use wgpu::util::DeviceExt;

use aoview_core::Mesh;

use crate::camera::OrbitCamera;
use crate::context::RenderContext;
use crate::pipeline::{AoPipeline, AoVertex, MeshUniforms};
use crate::RenderError;

/// Neutral grey used when no tint is configured
pub const DEFAULT_TINT: [f32; 3] = [0.92, 0.92, 0.92];

/// Opaque white
pub const CLEAR_COLOR: wgpu::Color = wgpu::Color::WHITE;

/// Check the inputs and interleave positions with occlusion values
///
/// Fails before touching the GPU if `ao` does not hold one value per vertex
/// or a triangle refers to a missing vertex.
pub fn prepare_vertices(
    positions: &[[f32; 3]],
    cells: &[[u32; 3]],
    ao: &[f32],
) -> Result<Vec<AoVertex>, RenderError> {
    if ao.len() != positions.len() {
        return Err(RenderError::ScalarCountMismatch {
            expected: positions.len(),
            actual: ao.len(),
        });
    }

    for (cell, tri) in cells.iter().enumerate() {
        if let Some(&index) = tri.iter().find(|&&i| i as usize >= positions.len()) {
            return Err(RenderError::IndexOutOfRange {
                cell,
                index,
                vertex_count: positions.len(),
            });
        }
    }

    Ok(positions
        .iter()
        .zip(ao)
        .map(|(&p, &a)| AoVertex::new(p, a))
        .collect())
}

/// Uniforms for one frame, computed from the camera alone
pub fn frame_uniforms(camera: &OrbitCamera, tint: [f32; 3]) -> MeshUniforms {
    MeshUniforms {
        model: camera.model_matrix(),
        view: camera.view_matrix(),
        projection: camera.projection_matrix(),
        tint: [tint[0], tint[1], tint[2], 1.0],
    }
}

/// GPU buffers and pipeline for one occlusion-shaded mesh
pub struct DrawHandle {
    pipeline: AoPipeline,
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
    vertex_count: usize,
    tint: [f32; 3],
}

impl DrawHandle {
    /// Upload the mesh and its occlusion values
    pub fn build(
        ctx: &RenderContext,
        pipeline: AoPipeline,
        mesh: &Mesh,
        ao: &[f32],
    ) -> Result<Self, RenderError> {
        let vertices = prepare_vertices(mesh.positions(), mesh.cells(), ao)?;
        let indices: Vec<u32> = mesh.cells().iter().flatten().copied().collect();

        let vertex_buffer = ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("AO Vertex Buffer"),
            contents: bytemuck::cast_slice(&vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let index_buffer = ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("AO Index Buffer"),
            contents: bytemuck::cast_slice(&indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        log::info!(
            "Uploaded {} vertices and {} triangles",
            vertices.len(),
            mesh.triangle_count()
        );

        Ok(Self {
            pipeline,
            vertex_buffer,
            index_buffer,
            index_count: indices.len() as u32,
            vertex_count: vertices.len(),
            tint: DEFAULT_TINT,
        })
    }

    /// Builder: set the surface tint
    pub fn with_tint(mut self, tint: [f32; 3]) -> Self {
        self.tint = tint;
        self
    }

    pub fn vertex_count(&self) -> usize {
        self.vertex_count
    }

    pub fn index_count(&self) -> u32 {
        self.index_count
    }

    /// Uniforms this handle would use for `camera`
    pub fn frame_uniforms(&self, camera: &OrbitCamera) -> MeshUniforms {
        frame_uniforms(camera, self.tint)
    }

    /// Draw one frame
    ///
    /// Clears to white and draws every triangle. Rendering twice with equal
    /// cameras produces the same image.
    pub fn render(&mut self, ctx: &RenderContext, camera: &OrbitCamera) -> Result<(), RenderError> {
        if !ctx.is_drawable() {
            return Ok(());
        }

        let (width, height) = camera.viewport();
        self.pipeline.ensure_depth_texture(&ctx.device, ctx.config.width, ctx.config.height);
        self.pipeline.update_uniforms(&ctx.queue, &self.frame_uniforms(camera));

        let output = ctx.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = ctx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("AO Render Encoder"),
            });

        self.pipeline.render(
            &mut encoder,
            &view,
            &self.vertex_buffer,
            &self.index_buffer,
            self.index_count,
            (width.min(ctx.config.width), height.min(ctx.config.height)),
            CLEAR_COLOR,
        )?;

        ctx.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aoview_math::{Quat, Vec3};

    fn triangle() -> (Vec<[f32; 3]>, Vec<[u32; 3]>) {
        (
            vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
            vec![[0, 1, 2]],
        )
    }

    #[test]
    fn test_prepare_interleaves() {
        let (positions, cells) = triangle();
        let vertices = prepare_vertices(&positions, &cells, &[0.0, 0.5, 1.0]).unwrap();
        assert_eq!(vertices.len(), 3);
        assert_eq!(vertices[1], AoVertex::new([1.0, 0.0, 0.0], 0.5));
    }

    #[test]
    fn test_prepare_rejects_short_ao() {
        let (positions, cells) = triangle();
        let err = prepare_vertices(&positions, &cells, &[0.0, 0.5]).unwrap_err();
        assert!(matches!(err, RenderError::ScalarCountMismatch { expected: 3, actual: 2 }));
    }

    #[test]
    fn test_prepare_rejects_bad_index() {
        let (positions, _) = triangle();
        let cells = vec![[0, 1, 2], [2, 1, 3]];
        let err = prepare_vertices(&positions, &cells, &[0.0; 3]).unwrap_err();
        assert!(matches!(
            err,
            RenderError::IndexOutOfRange { cell: 1, index: 3, vertex_count: 3 }
        ));
    }

    #[test]
    fn test_prepare_empty_mesh() {
        let vertices = prepare_vertices(&[], &[], &[]).unwrap();
        assert!(vertices.is_empty());
    }

    #[test]
    fn test_frame_uniforms_idempotent() {
        let mut camera = OrbitCamera::new();
        camera.orientation = Quat::from_axis_angle(Vec3::Y, 0.13);
        camera.set_viewport(800, 600);

        let a = frame_uniforms(&camera, DEFAULT_TINT);
        let b = frame_uniforms(&camera, DEFAULT_TINT);
        assert_eq!(a, b);
    }

    #[test]
    fn test_frame_uniforms_follow_camera() {
        let mut camera = OrbitCamera::new();
        camera.set_viewport(800, 600);
        let before = frame_uniforms(&camera, DEFAULT_TINT);

        camera.set_zoom(100.0);
        let after = frame_uniforms(&camera, DEFAULT_TINT);
        assert_eq!(before.model, after.model);
        assert_ne!(before.view, after.view);
        assert_eq!(after.view[3][2], -100.0);
    }

    #[test]
    fn test_frame_uniforms_tint_opaque() {
        let camera = OrbitCamera::new();
        let u = frame_uniforms(&camera, [0.5, 0.6, 0.7]);
        assert_eq!(u.tint, [0.5, 0.6, 0.7, 1.0]);
    }
}
