//! GPU rendering system
//!
//! Manages GPU rendering including:
//! - Render context and surface
//! - The occlusion draw handle, built once the samples are in
//! - Frame rendering with a viewport synced to the window

use std::sync::Arc;
use winit::dpi::PhysicalSize;
use winit::window::Window;
use aoview_core::Mesh;
use aoview_render::{
    context::RenderContext,
    draw::CLEAR_COLOR,
    pipeline::AoPipeline,
    DrawHandle, OrbitCamera, RenderError,
};
use crate::config::{CameraConfig, RenderingConfig};

/// Manages GPU rendering
pub struct RenderSystem {
    context: RenderContext,
    draw: Option<DrawHandle>,
    camera: OrbitCamera,
    render_config: RenderingConfig,
}

impl RenderSystem {
    /// Create render system from window and config
    pub fn new(
        window: Arc<Window>,
        render_config: RenderingConfig,
        camera_config: &CameraConfig,
        vsync: bool,
    ) -> Result<Self, RenderError> {
        let context = pollster::block_on(RenderContext::with_vsync(window, vsync))?;

        let camera = OrbitCamera::new()
            .with_zoom_range(camera_config.min_zoom, camera_config.max_zoom)
            .with_projection(
                camera_config.fov.to_radians(),
                camera_config.near,
                camera_config.far,
            );

        Ok(Self {
            context,
            draw: None,
            camera,
            render_config,
        })
    }

    /// Handle window resize
    pub fn resize(&mut self, width: u32, height: u32) {
        self.context.resize(PhysicalSize::new(width, height));
    }

    /// Upload the mesh with its occlusion values
    pub fn upload(&mut self, mesh: &Mesh, ao: &[f32]) -> Result<(), RenderError> {
        let pipeline = AoPipeline::new(&self.context.device, self.context.config.format);
        let handle = DrawHandle::build(&self.context, pipeline, mesh, ao)?
            .with_tint(self.render_config.tint);
        self.draw = Some(handle);
        Ok(())
    }

    pub fn camera_mut(&mut self) -> &mut OrbitCamera {
        &mut self.camera
    }

    /// Render a single frame
    ///
    /// The surface and camera viewport are resynchronized to the window size
    /// first, whether or not a resize event arrived. Before the mesh is
    /// uploaded the frame is only cleared.
    pub fn render_frame(&mut self, size: (u32, u32)) -> Result<(), RenderError> {
        self.context.sync_to(PhysicalSize::new(size.0, size.1));
        self.camera.set_viewport(size.0, size.1);
        match &mut self.draw {
            Some(draw) => draw.render(&self.context, &self.camera),
            None => self.clear_frame(),
        }
    }

    /// Present an empty white frame
    fn clear_frame(&self) -> Result<(), RenderError> {
        if !self.context.is_drawable() {
            return Ok(());
        }

        let output = self.context.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .context
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Clear Encoder"),
            });

        {
            let _pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Clear Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(CLEAR_COLOR),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });
        }

        self.context.queue.submit(std::iter::once(encoder.finish()));
        output.present();
        Ok(())
    }

    /// Reconfigure the surface at its current size (after a lost surface)
    pub fn reconfigure(&mut self) {
        let size = self.context.size;
        self.context.resize(size);
    }
}
