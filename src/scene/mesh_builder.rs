//! MeshBuilder - Declarative scene mesh construction
//!
//! Every part is centered on its own bounding box, moved by a rigid
//! transform, and merged into one indexed mesh.

use aoview_core::{Mesh, MeshError};
use aoview_math::{mat4, Mat4, Quat, Vec3};

use crate::config::MeshConfig;

/// Builder that merges centered, transformed parts into one mesh
///
/// # Example
/// ```ignore
/// let mesh = MeshBuilder::new()
///     .add(&torus(30.0, 12.0, 48, 24), &rigid_transform([60.0, 0.0, 0.0], [0.0; 3]))
///     .add(&ground, &mat4::translation(Vec3::new(0.0, -46.0, 0.0)))
///     .build();
/// ```
#[derive(Debug, Default)]
pub struct MeshBuilder {
    mesh: Mesh,
    parts: usize,
}

impl MeshBuilder {
    /// Create an empty builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Center `part`, apply `transform`, and append it
    pub fn add(mut self, part: &Mesh, transform: &Mat4) -> Self {
        let placed = part.centered().transformed(transform);
        self.mesh = Mesh::merge(&self.mesh, &placed);
        self.parts += 1;
        self
    }

    /// Number of parts added so far
    pub fn part_count(&self) -> usize {
        self.parts
    }

    /// Get the merged mesh
    pub fn build(self) -> Mesh {
        self.mesh
    }
}

/// Rotation by XYZ angles in degrees (X applied first), then translation
pub fn rigid_transform(rotation_deg: [f32; 3], offset: [f32; 3]) -> Mat4 {
    let [rx, ry, rz] = rotation_deg.map(f32::to_radians);
    let rotation = Quat::from_axis_angle(Vec3::Z, rz)
        .compose(&Quat::from_axis_angle(Vec3::Y, ry))
        .compose(&Quat::from_axis_angle(Vec3::X, rx));
    mat4::mul(mat4::translation(Vec3::from_array(offset)), mat4::from_quat(rotation))
}

/// Build the configured scene mesh
pub fn build_scene_mesh(config: &MeshConfig) -> Result<Mesh, MeshError> {
    let subject = config.subject.build()?;
    let mut builder = MeshBuilder::new().add(
        &subject,
        &rigid_transform(config.subject_rotation, config.subject_offset),
    );

    if config.ground_enabled {
        let ground = config.ground.build()?;
        builder = builder.add(
            &ground,
            &mat4::translation(Vec3::from_array(config.ground_offset)),
        );
    }

    log::info!("Scene mesh built from {} part(s)", builder.part_count());
    let mesh = builder.build();
    log::info!(
        "Scene mesh: {} vertices, {} triangles",
        mesh.vertex_count(),
        mesh.triangle_count()
    );
    Ok(mesh)
}
