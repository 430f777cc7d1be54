//! Render error types

use std::fmt;

/// Errors from GPU setup, geometry upload, and frame rendering
#[derive(Debug)]
pub enum RenderError {
    /// No GPU adapter compatible with the window surface
    NoAdapter,
    /// The adapter refused to create a device
    Device(wgpu::RequestDeviceError),
    /// The window surface could not be created
    Surface(wgpu::CreateSurfaceError),
    /// The surface reported no usable texture format
    NoSurfaceFormat,
    /// Number of occlusion values differs from the number of vertices
    ScalarCountMismatch { expected: usize, actual: usize },
    /// A triangle refers to a vertex that does not exist
    IndexOutOfRange { cell: usize, index: u32, vertex_count: usize },
    /// Surface was lost (window resized, minimized, etc.)
    SurfaceLost,
    /// GPU out of memory
    OutOfMemory,
    /// Other surface error
    Other(String),
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderError::NoAdapter => write!(f, "No compatible GPU adapter"),
            RenderError::Device(e) => write!(f, "Failed to create device: {}", e),
            RenderError::Surface(e) => write!(f, "Failed to create surface: {}", e),
            RenderError::NoSurfaceFormat => write!(f, "Surface reported no supported formats"),
            RenderError::ScalarCountMismatch { expected, actual } => {
                write!(f, "Expected {} occlusion values, got {}", expected, actual)
            }
            RenderError::IndexOutOfRange { cell, index, vertex_count } => write!(
                f,
                "Triangle {} refers to vertex {} but mesh has {} vertices",
                cell, index, vertex_count
            ),
            RenderError::SurfaceLost => write!(f, "Surface lost"),
            RenderError::OutOfMemory => write!(f, "Out of memory"),
            RenderError::Other(msg) => write!(f, "Render error: {}", msg),
        }
    }
}

impl std::error::Error for RenderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RenderError::Device(e) => Some(e),
            RenderError::Surface(e) => Some(e),
            _ => None,
        }
    }
}

impl From<wgpu::RequestDeviceError> for RenderError {
    fn from(e: wgpu::RequestDeviceError) -> Self {
        RenderError::Device(e)
    }
}

impl From<wgpu::CreateSurfaceError> for RenderError {
    fn from(e: wgpu::CreateSurfaceError) -> Self {
        RenderError::Surface(e)
    }
}

impl From<wgpu::SurfaceError> for RenderError {
    fn from(e: wgpu::SurfaceError) -> Self {
        match e {
            wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated => RenderError::SurfaceLost,
            wgpu::SurfaceError::OutOfMemory => RenderError::OutOfMemory,
            other => RenderError::Other(format!("{:?}", other)),
        }
    }
}
