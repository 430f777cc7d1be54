//! Indexed triangle mesh
//!
//! A [`Mesh`] is built once during startup and never mutated afterwards.
//! Every preparation step (centering, transforming, merging) returns a new
//! mesh so the vertex ids of the final mesh stay stable for the session.

use aoview_math::{mat4, Mat4, Vec3};

use crate::MeshError;

/// Indexed triangle mesh
///
/// Invariant: every index in `cells` is `< positions.len()`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Mesh {
    positions: Vec<[f32; 3]>,
    cells: Vec<[u32; 3]>,
}

impl Mesh {
    /// Create a mesh, validating that every cell index is in range
    pub fn new(positions: Vec<[f32; 3]>, cells: Vec<[u32; 3]>) -> Result<Self, MeshError> {
        Self::validate(&positions, &cells)?;
        Ok(Self { positions, cells })
    }

    /// Create a mesh from parts already known to be valid
    pub(crate) fn from_parts(positions: Vec<[f32; 3]>, cells: Vec<[u32; 3]>) -> Self {
        debug_assert!(cells.iter().flatten().all(|&i| (i as usize) < positions.len()));
        Self { positions, cells }
    }

    /// Check the index and position invariants of a position/cell pair
    pub fn validate(positions: &[[f32; 3]], cells: &[[u32; 3]]) -> Result<(), MeshError> {
        if let Some(vertex) = positions
            .iter()
            .position(|p| p.iter().any(|c| !c.is_finite()))
        {
            return Err(MeshError::NonFinitePosition(vertex));
        }

        let vertex_count = positions.len();
        for (cell, tri) in cells.iter().enumerate() {
            if let Some(&index) = tri.iter().find(|&&i| i as usize >= vertex_count) {
                return Err(MeshError::IndexOutOfRange { cell, index, vertex_count });
            }
        }
        Ok(())
    }

    /// Vertex positions, indexed by vertex id
    pub fn positions(&self) -> &[[f32; 3]] {
        &self.positions
    }

    /// Triangles as triples of vertex ids
    pub fn cells(&self) -> &[[u32; 3]] {
        &self.cells
    }

    /// Number of vertices
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Number of triangles
    pub fn triangle_count(&self) -> usize {
        self.cells.len()
    }

    /// Check if the mesh has no triangles
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Axis-aligned bounds as (min, max)
    ///
    /// Returns `None` for a mesh without vertices.
    pub fn bounds(&self) -> Option<(Vec3, Vec3)> {
        let mut iter = self.positions.iter().map(|&p| Vec3::from_array(p));
        let first = iter.next()?;
        Some(iter.fold((first, first), |(min, max), p| {
            (min.min_components(p), max.max_components(p))
        }))
    }

    /// Return a copy translated so its bounding-box center is at the origin
    pub fn centered(&self) -> Self {
        let Some((min, max)) = self.bounds() else {
            return self.clone();
        };
        let center = (min + max) * 0.5;
        let positions = self
            .positions
            .iter()
            .map(|&p| (Vec3::from_array(p) - center).to_array())
            .collect();
        Self::from_parts(positions, self.cells.clone())
    }

    /// Return a copy with every position transformed by `matrix`
    pub fn transformed(&self, matrix: &Mat4) -> Self {
        let positions = self
            .positions
            .iter()
            .map(|&p| mat4::transform_point(*matrix, Vec3::from_array(p)).to_array())
            .collect();
        Self::from_parts(positions, self.cells.clone())
    }

    /// Merge two meshes into one
    ///
    /// Positions of `b` are appended after those of `a`, and every index of
    /// `b`'s cells is offset by `a.vertex_count()`.
    pub fn merge(a: &Mesh, b: &Mesh) -> Mesh {
        let offset = a.positions.len() as u32;

        let mut positions = Vec::with_capacity(a.positions.len() + b.positions.len());
        positions.extend_from_slice(&a.positions);
        positions.extend_from_slice(&b.positions);

        let mut cells = Vec::with_capacity(a.cells.len() + b.cells.len());
        cells.extend_from_slice(&a.cells);
        cells.extend(b.cells.iter().map(|c| [c[0] + offset, c[1] + offset, c[2] + offset]));

        Self::from_parts(positions, cells)
    }

    /// Area-weighted vertex normals (unit length, zero for isolated vertices)
    ///
    /// Counter-clockwise winding defines the outward side.
    pub fn vertex_normals(&self) -> Vec<Vec3> {
        let mut normals = vec![Vec3::ZERO; self.positions.len()];

        for cell in &self.cells {
            let [a, b, c] = cell.map(|i| Vec3::from_array(self.positions[i as usize]));
            // Cross product length is twice the triangle area
            let n = (b - a).cross(c - a);
            for &i in cell {
                normals[i as usize] += n;
            }
        }

        normals.into_iter().map(Vec3::normalized).collect()
    }
}
