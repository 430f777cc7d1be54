//! GPU context: device, queue, and window surface

use std::sync::Arc;

use winit::dpi::PhysicalSize;
use winit::window::Window;

use crate::RenderError;

/// Owns the wgpu device and the surface of one window
pub struct RenderContext {
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub surface: wgpu::Surface<'static>,
    pub config: wgpu::SurfaceConfiguration,
    pub size: PhysicalSize<u32>,
}

impl RenderContext {
    /// Create a context for the given window
    ///
    /// Prefers an sRGB surface format. The surface is configured immediately.
    pub async fn with_vsync(window: Arc<Window>, vsync: bool) -> Result<Self, RenderError> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor::default());

        let size = window.inner_size();
        // The surface holds an Arc of the window, so it cannot outlive it
        let surface = instance.create_surface(window)?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or(RenderError::NoAdapter)?;

        log::info!("Using adapter: {}", adapter.get_info().name);

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("AO Device"),
                    ..Default::default()
                },
                None,
            )
            .await?;

        let caps = surface.get_capabilities(&adapter);
        let format = caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .or_else(|| caps.formats.first().copied())
            .ok_or(RenderError::NoSurfaceFormat)?;

        let present_mode = if vsync {
            wgpu::PresentMode::AutoVsync
        } else {
            wgpu::PresentMode::AutoNoVsync
        };

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode,
            desired_maximum_frame_latency: 2,
            alpha_mode: caps.alpha_modes.first().copied().unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
        };
        surface.configure(&device, &config);

        Ok(Self {
            device,
            queue,
            surface,
            config,
            size,
        })
    }

    /// Reconfigure the surface for a new size
    ///
    /// Zero-sized surfaces (minimized windows) are recorded but not configured.
    pub fn resize(&mut self, new_size: PhysicalSize<u32>) {
        self.size = new_size;
        if new_size.width == 0 || new_size.height == 0 {
            return;
        }
        self.config.width = new_size.width;
        self.config.height = new_size.height;
        self.surface.configure(&self.device, &self.config);
    }

    /// Resize the surface if it no longer matches the window
    ///
    /// Returns `true` when the surface was resized.
    pub fn sync_to(&mut self, window_size: PhysicalSize<u32>) -> bool {
        if !needs_resync(self.size, window_size) {
            return false;
        }
        log::debug!(
            "Surface resync {}x{} -> {}x{}",
            self.size.width,
            self.size.height,
            window_size.width,
            window_size.height
        );
        self.resize(window_size);
        true
    }

    /// Check whether the surface currently has an area to draw into
    pub fn is_drawable(&self) -> bool {
        self.size.width > 0 && self.size.height > 0
    }
}

/// Check whether a surface of `surface_size` must be reconfigured for a window of `window_size`
pub fn needs_resync(surface_size: PhysicalSize<u32>, window_size: PhysicalSize<u32>) -> bool {
    surface_size != window_size
}
