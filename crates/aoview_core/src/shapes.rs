//! Mesh generators and serializable shape templates
//!
//! ShapeTemplate provides a serializable description of the meshes that
//! make up a scene. Each variant stores the parameters needed to build it.
//!
//! All generated shapes are created in **local space** centered at the origin
//! with counter-clockwise winding on the outward side.

use std::collections::HashMap;
use std::f32::consts::TAU;

use serde::{Serialize, Deserialize};
use aoview_math::Vec3;

use crate::{Mesh, MeshError, MeshFile};

/// Serializable shape template
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ShapeTemplate {
    /// A subdivided icosahedron approximating a sphere
    Icosphere {
        radius: f32,
        /// Each subdivision splits every triangle into four
        subdivisions: u32,
    },
    /// A torus lying in the XZ plane
    Torus {
        /// Distance from the center to the middle of the tube
        major_radius: f32,
        /// Radius of the tube
        minor_radius: f32,
        /// Segments around the main ring
        rings: u32,
        /// Segments around the tube
        segments: u32,
    },
    /// A box with each face split into a grid
    Cuboid {
        /// Full side lengths [x, y, z]
        size: [f32; 3],
        /// Grid cells along each face edge
        subdivisions: u32,
    },
    /// A mesh loaded from a RON mesh file
    File {
        path: String,
    },
}

impl ShapeTemplate {
    /// Build the mesh described by this template
    ///
    /// Generated meshes are validated like loaded ones, so parameters such as
    /// a NaN radius fail with `MeshError::NonFinitePosition`.
    pub fn build(&self) -> Result<Mesh, MeshError> {
        let mesh = match self {
            ShapeTemplate::Icosphere { radius, subdivisions } => icosphere(*radius, *subdivisions),
            ShapeTemplate::Torus { major_radius, minor_radius, rings, segments } => {
                torus(*major_radius, *minor_radius, *rings, *segments)
            }
            ShapeTemplate::Cuboid { size, subdivisions } => {
                cuboid(Vec3::from_array(*size), *subdivisions)
            }
            ShapeTemplate::File { path } => return MeshFile::load(path)?.into_mesh(),
        };
        Mesh::validate(mesh.positions(), mesh.cells())?;
        Ok(mesh)
    }

    /// Create a torus template
    pub fn torus(major_radius: f32, minor_radius: f32, rings: u32, segments: u32) -> Self {
        ShapeTemplate::Torus { major_radius, minor_radius, rings, segments }
    }

    /// Create a cuboid template
    pub fn cuboid(size: [f32; 3], subdivisions: u32) -> Self {
        ShapeTemplate::Cuboid { size, subdivisions }
    }
}

/// Generate an icosphere
pub fn icosphere(radius: f32, subdivisions: u32) -> Mesh {
    let t = (1.0 + 5.0f32.sqrt()) / 2.0;

    let mut vertices: Vec<Vec3> = [
        [-1.0, t, 0.0], [1.0, t, 0.0], [-1.0, -t, 0.0], [1.0, -t, 0.0],
        [0.0, -1.0, t], [0.0, 1.0, t], [0.0, -1.0, -t], [0.0, 1.0, -t],
        [t, 0.0, -1.0], [t, 0.0, 1.0], [-t, 0.0, -1.0], [-t, 0.0, 1.0],
    ]
    .iter()
    .map(|&p| Vec3::from_array(p).normalized())
    .collect();

    let mut faces: Vec<[u32; 3]> = vec![
        [0, 11, 5], [0, 5, 1], [0, 1, 7], [0, 7, 10], [0, 10, 11],
        [1, 5, 9], [5, 11, 4], [11, 10, 2], [10, 7, 6], [7, 1, 8],
        [3, 9, 4], [3, 4, 2], [3, 2, 6], [3, 6, 8], [3, 8, 9],
        [4, 9, 5], [2, 4, 11], [6, 2, 10], [8, 6, 7], [9, 8, 1],
    ];

    for _ in 0..subdivisions {
        // Midpoints are shared between the two triangles of an edge
        let mut midpoints: HashMap<(u32, u32), u32> = HashMap::new();
        let mut midpoint = |a: u32, b: u32, vertices: &mut Vec<Vec3>| -> u32 {
            let key = (a.min(b), a.max(b));
            *midpoints.entry(key).or_insert_with(|| {
                let m = ((vertices[a as usize] + vertices[b as usize]) * 0.5).normalized();
                vertices.push(m);
                (vertices.len() - 1) as u32
            })
        };

        let mut next = Vec::with_capacity(faces.len() * 4);
        for [a, b, c] in faces {
            let ab = midpoint(a, b, &mut vertices);
            let bc = midpoint(b, c, &mut vertices);
            let ca = midpoint(c, a, &mut vertices);
            next.push([a, ab, ca]);
            next.push([b, bc, ab]);
            next.push([c, ca, bc]);
            next.push([ab, bc, ca]);
        }
        faces = next;
    }

    let positions = vertices.iter().map(|v| (*v * radius).to_array()).collect();
    Mesh::from_parts(positions, faces)
}

/// Generate a torus around the Y axis
pub fn torus(major_radius: f32, minor_radius: f32, rings: u32, segments: u32) -> Mesh {
    let rings = rings.max(3);
    let segments = segments.max(3);

    let mut positions = Vec::with_capacity((rings * segments) as usize);
    for i in 0..rings {
        let u = TAU * i as f32 / rings as f32;
        for j in 0..segments {
            let v = TAU * j as f32 / segments as f32;
            let ring = major_radius + minor_radius * v.cos();
            positions.push([ring * u.cos(), minor_radius * v.sin(), ring * u.sin()]);
        }
    }

    let index = |i: u32, j: u32| (i % rings) * segments + (j % segments);
    let mut cells = Vec::with_capacity((rings * segments * 2) as usize);
    for i in 0..rings {
        for j in 0..segments {
            let a = index(i, j);
            let b = index(i + 1, j);
            let c = index(i + 1, j + 1);
            let d = index(i, j + 1);
            cells.push([a, d, b]);
            cells.push([b, d, c]);
        }
    }

    Mesh::from_parts(positions, cells)
}

/// Generate a box centered at the origin
///
/// Faces do not share vertices, so normals stay flat across each face.
pub fn cuboid(size: Vec3, subdivisions: u32) -> Mesh {
    let n = subdivisions.max(1);
    let h = size * 0.5;

    // (origin, u edge, v edge) with u x v pointing outward
    let faces = [
        (Vec3::new(h.x, -h.y, h.z), Vec3::new(0.0, 0.0, -size.z), Vec3::new(0.0, size.y, 0.0)),
        (Vec3::new(-h.x, -h.y, -h.z), Vec3::new(0.0, 0.0, size.z), Vec3::new(0.0, size.y, 0.0)),
        (Vec3::new(-h.x, h.y, h.z), Vec3::new(size.x, 0.0, 0.0), Vec3::new(0.0, 0.0, -size.z)),
        (Vec3::new(-h.x, -h.y, -h.z), Vec3::new(size.x, 0.0, 0.0), Vec3::new(0.0, 0.0, size.z)),
        (Vec3::new(-h.x, -h.y, h.z), Vec3::new(size.x, 0.0, 0.0), Vec3::new(0.0, size.y, 0.0)),
        (Vec3::new(h.x, -h.y, -h.z), Vec3::new(-size.x, 0.0, 0.0), Vec3::new(0.0, size.y, 0.0)),
    ];

    let per_face = ((n + 1) * (n + 1)) as usize;
    let mut positions = Vec::with_capacity(per_face * 6);
    let mut cells = Vec::with_capacity((n * n * 2 * 6) as usize);

    for (origin, u, v) in faces {
        let base = positions.len() as u32;
        for t in 0..=n {
            for s in 0..=n {
                let p = origin + u * (s as f32 / n as f32) + v * (t as f32 / n as f32);
                positions.push(p.to_array());
            }
        }

        let index = |s: u32, t: u32| base + t * (n + 1) + s;
        for t in 0..n {
            for s in 0..n {
                let a = index(s, t);
                let b = index(s + 1, t);
                let c = index(s + 1, t + 1);
                let d = index(s, t + 1);
                cells.push([a, b, c]);
                cells.push([a, c, d]);
            }
        }
    }

    Mesh::from_parts(positions, cells)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Every face normal must point away from `inside(face_centroid)`
    fn assert_outward(mesh: &Mesh, inside: impl Fn(Vec3) -> Vec3) {
        let p = |i: u32| Vec3::from_array(mesh.positions()[i as usize]);
        for (k, &[a, b, c]) in mesh.cells().iter().enumerate() {
            let (pa, pb, pc) = (p(a), p(b), p(c));
            let normal = (pb - pa).cross(pc - pa);
            let centroid = (pa + pb + pc) * (1.0 / 3.0);
            let outward = centroid - inside(centroid);
            assert!(normal.dot(outward) > 0.0, "face {} winds inward", k);
        }
    }

    #[test]
    fn test_icosahedron_counts() {
        let mesh = icosphere(1.0, 0);
        assert_eq!(mesh.vertex_count(), 12);
        assert_eq!(mesh.triangle_count(), 20);
    }

    #[test]
    fn test_icosphere_subdivision_counts() {
        // V = 10 * 4^n + 2, F = 20 * 4^n
        let mesh = icosphere(1.0, 2);
        assert_eq!(mesh.vertex_count(), 162);
        assert_eq!(mesh.triangle_count(), 320);
    }

    #[test]
    fn test_icosphere_radius_and_winding() {
        let mesh = icosphere(30.0, 1);
        for p in mesh.positions() {
            assert!((Vec3::from_array(*p).length() - 30.0).abs() < 1e-3);
        }
        assert_outward(&mesh, |_| Vec3::ZERO);
    }

    #[test]
    fn test_torus_counts_and_winding() {
        let mesh = torus(30.0, 10.0, 24, 12);
        assert_eq!(mesh.vertex_count(), 24 * 12);
        assert_eq!(mesh.triangle_count(), 24 * 12 * 2);
        assert_outward(&mesh, |c| {
            // Nearest point on the tube's center circle
            let radial = Vec3::new(c.x, 0.0, c.z).normalized();
            radial * 30.0
        });
    }

    #[test]
    fn test_cuboid_counts_and_winding() {
        let mesh = cuboid(Vec3::new(4.0, 1.0, 2.0), 3);
        assert_eq!(mesh.vertex_count(), 6 * 16);
        assert_eq!(mesh.triangle_count(), 6 * 9 * 2);
        assert_outward(&mesh, |_| Vec3::ZERO);

        let (min, max) = mesh.bounds().unwrap();
        assert_eq!(min, Vec3::new(-2.0, -0.5, -1.0));
        assert_eq!(max, Vec3::new(2.0, 0.5, 1.0));
    }

    #[test]
    fn test_template_build() {
        let mesh = ShapeTemplate::cuboid([1.0, 1.0, 1.0], 1).build().unwrap();
        assert_eq!(mesh.triangle_count(), 12);
    }

    #[test]
    fn test_nan_radius_template_is_rejected() {
        let template = ShapeTemplate::Icosphere { radius: f32::NAN, subdivisions: 1 };
        assert!(matches!(template.build(), Err(MeshError::NonFinitePosition(_))));

        let template = ShapeTemplate::torus(f32::NAN, 10.0, 8, 6);
        assert!(matches!(template.build(), Err(MeshError::NonFinitePosition(_))));
    }

    #[test]
    fn test_infinite_cuboid_template_is_rejected() {
        let template = ShapeTemplate::cuboid([f32::INFINITY, 1.0, 1.0], 1);
        assert!(matches!(template.build(), Err(MeshError::NonFinitePosition(_))));
    }

    #[test]
    fn test_missing_file_template_is_io_error() {
        let template = ShapeTemplate::File { path: "does/not/exist.ron".to_string() };
        assert!(matches!(template.build(), Err(MeshError::Io(_))));
    }

    #[test]
    fn test_template_serialization() {
        let template = ShapeTemplate::torus(30.0, 12.0, 64, 32);
        let serialized = ron::to_string(&template).unwrap();
        let deserialized: ShapeTemplate = ron::from_str(&serialized).unwrap();
        assert_eq!(deserialized, template);
    }
}
