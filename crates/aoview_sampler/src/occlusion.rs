//! Depth-map ambient occlusion sampler
//!
//! Every step picks one direction on the sphere, rasterizes the whole mesh
//! into an orthographic depth map seen from that direction, and tests each
//! vertex facing the direction against the map. A vertex that is the nearest
//! surface along the direction receives light from it.
//!
//! Samples are cosine weighted, so `ao = 1 - lit / total` where both sums are
//! weighted by `n . d` over the vertex's hemisphere.

use std::fmt;

use aoview_core::{Mesh, MeshError};
use aoview_math::Vec3;

use crate::engine::IncrementalEngine;
use crate::sequence::sphere_direction;

/// Upper bound on the slope factor of the depth bias
const MAX_SLOPE: f32 = 8.0;

/// Largest accepted depth map width and height in texels
pub const MAX_RESOLUTION: u32 = 8192;

/// Sampler construction options
#[derive(Debug, Clone)]
pub struct SamplerOptions {
    /// Triangles as triples of vertex ids
    pub cells: Vec<[u32; 3]>,
    /// Depth map width and height in texels
    pub resolution: u32,
    /// Depth tolerance in texels when comparing a vertex against the map
    pub bias: f32,
}

impl SamplerOptions {
    pub fn new(cells: Vec<[u32; 3]>) -> Self {
        Self {
            cells,
            resolution: 512,
            bias: 1.5,
        }
    }

    /// Builder: set depth map resolution
    pub fn with_resolution(mut self, resolution: u32) -> Self {
        self.resolution = resolution;
        self
    }

    /// Builder: set depth bias in texels
    pub fn with_bias(mut self, bias: f32) -> Self {
        self.bias = bias;
        self
    }
}

/// Sampler error
#[derive(Debug)]
pub enum SamplerError {
    /// Positions and cells do not form a valid mesh
    InvalidMesh(MeshError),
    /// Depth map resolution must be in `1..=MAX_RESOLUTION`
    InvalidResolution(u32),
    /// `step` or `collect` called after `release`
    Released,
}

impl fmt::Display for SamplerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SamplerError::InvalidMesh(e) => write!(f, "Invalid sampler mesh: {}", e),
            SamplerError::InvalidResolution(r) => write!(f, "Invalid depth map resolution: {}", r),
            SamplerError::Released => write!(f, "Sampler used after release"),
        }
    }
}

impl std::error::Error for SamplerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SamplerError::InvalidMesh(e) => Some(e),
            _ => None,
        }
    }
}

impl From<MeshError> for SamplerError {
    fn from(e: MeshError) -> Self {
        SamplerError::InvalidMesh(e)
    }
}

/// CPU ambient occlusion sampler
pub struct OcclusionSampler {
    positions: Vec<Vec3>,
    cells: Vec<[u32; 3]>,
    normals: Vec<Vec3>,
    /// Bounding sphere of the mesh
    center: Vec3,
    radius: f32,
    resolution: u32,
    bias: f32,
    /// Depth map, larger values are closer to the light
    depth: Vec<f32>,
    /// Cosine-weighted lit samples per vertex
    lit: Vec<f32>,
    /// Cosine-weighted hemisphere samples per vertex
    total: Vec<f32>,
    samples_taken: u32,
    released: bool,
}

impl OcclusionSampler {
    /// Create a sampler for a mesh
    ///
    /// Fails fast if the cells reference missing vertices or the resolution
    /// is zero or above [`MAX_RESOLUTION`].
    pub fn new(positions: &[[f32; 3]], options: SamplerOptions) -> Result<Self, SamplerError> {
        if options.resolution == 0 || options.resolution > MAX_RESOLUTION {
            return Err(SamplerError::InvalidResolution(options.resolution));
        }

        let mesh = Mesh::new(positions.to_vec(), options.cells)?;
        let normals = mesh.vertex_normals();

        let (center, radius) = match mesh.bounds() {
            Some((min, max)) => {
                let center = (min + max) * 0.5;
                let radius = mesh
                    .positions()
                    .iter()
                    .map(|&p| (Vec3::from_array(p) - center).length())
                    .fold(0.0f32, f32::max);
                (center, radius.max(f32::EPSILON))
            }
            None => (Vec3::ZERO, 1.0),
        };

        let vertex_count = mesh.vertex_count();
        let texels = options.resolution as usize * options.resolution as usize;

        log::info!(
            "Occlusion sampler: {} vertices, {} triangles, {}x{} depth map",
            vertex_count,
            mesh.triangle_count(),
            options.resolution,
            options.resolution
        );

        Ok(Self {
            positions: mesh.positions().iter().map(|&p| Vec3::from_array(p)).collect(),
            cells: mesh.cells().to_vec(),
            normals,
            center,
            radius,
            resolution: options.resolution,
            bias: options.bias,
            depth: vec![f32::NEG_INFINITY; texels],
            lit: vec![0.0; vertex_count],
            total: vec![0.0; vertex_count],
            samples_taken: 0,
            released: false,
        })
    }

    /// Number of directions sampled so far
    pub fn samples_taken(&self) -> u32 {
        self.samples_taken
    }

    /// Number of vertices in the sampled mesh
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Size of one depth map texel in world units
    fn texel_size(&self) -> f32 {
        2.0 * self.radius / self.resolution as f32
    }

    /// Project a point into depth map space: (column, row, depth)
    fn project(&self, p: Vec3, basis: &Basis) -> Vec3 {
        let rel = p - self.center;
        let scale = self.resolution as f32 / (2.0 * self.radius);
        Vec3::new(
            (rel.dot(basis.u) + self.radius) * scale,
            (rel.dot(basis.v) + self.radius) * scale,
            rel.dot(basis.d),
        )
    }

    /// Rasterize every triangle into the depth map, keeping the nearest depth
    fn rasterize(&mut self, basis: &Basis) {
        self.depth.fill(f32::NEG_INFINITY);
        let res = self.resolution as i64;

        for c in 0..self.cells.len() {
            let [a, b, cc] = self.cells[c].map(|i| self.project(self.positions[i as usize], basis));

            let area = edge(a, b, cc);
            if area.abs() < f32::EPSILON {
                continue;
            }

            let min_x = (a.x.min(b.x).min(cc.x).floor() as i64).max(0);
            let max_x = (a.x.max(b.x).max(cc.x).ceil() as i64).min(res - 1);
            let min_y = (a.y.min(b.y).min(cc.y).floor() as i64).max(0);
            let max_y = (a.y.max(b.y).max(cc.y).ceil() as i64).min(res - 1);

            for y in min_y..=max_y {
                for x in min_x..=max_x {
                    let p = Vec3::new(x as f32 + 0.5, y as f32 + 0.5, 0.0);
                    let w0 = edge(b, cc, p) / area;
                    let w1 = edge(cc, a, p) / area;
                    let w2 = edge(a, b, p) / area;
                    if w0 < 0.0 || w1 < 0.0 || w2 < 0.0 {
                        continue;
                    }
                    let z = w0 * a.z + w1 * b.z + w2 * cc.z;
                    let texel = &mut self.depth[(y * res + x) as usize];
                    if z > *texel {
                        *texel = z;
                    }
                }
            }
        }
    }
}

/// Orthonormal frame looking along `-d`
struct Basis {
    u: Vec3,
    v: Vec3,
    d: Vec3,
}

impl Basis {
    fn from_direction(d: Vec3) -> Self {
        let helper = if d.y.abs() < 0.9 { Vec3::Y } else { Vec3::X };
        let u = helper.cross(d).normalized();
        let v = d.cross(u);
        Self { u, v, d }
    }
}

/// Twice the signed area of triangle (a, b, p) in the XY plane
fn edge(a: Vec3, b: Vec3, p: Vec3) -> f32 {
    (b.x - a.x) * (p.y - a.y) - (b.y - a.y) * (p.x - a.x)
}

impl IncrementalEngine for OcclusionSampler {
    type Error = SamplerError;

    fn step(&mut self) -> Result<(), SamplerError> {
        if self.released {
            return Err(SamplerError::Released);
        }

        let d = sphere_direction(self.samples_taken);
        let basis = Basis::from_direction(d);
        self.rasterize(&basis);

        let texel_bias = self.bias * self.texel_size();
        let res = self.resolution as i64;
        for i in 0..self.positions.len() {
            let weight = self.normals[i].dot(d);
            if weight <= 0.0 {
                continue;
            }
            self.total[i] += weight;

            // Slope-scaled: grazing directions tolerate larger depth error
            let slope = ((1.0 - weight * weight).max(0.0).sqrt() / weight).min(MAX_SLOPE);
            let bias = texel_bias * (1.0 + slope);

            let p = self.project(self.positions[i], &basis);
            let x = (p.x.floor() as i64).clamp(0, res - 1);
            let y = (p.y.floor() as i64).clamp(0, res - 1);
            if p.z + bias >= self.depth[(y * res + x) as usize] {
                self.lit[i] += weight;
            }
        }

        self.samples_taken += 1;
        Ok(())
    }

    fn collect(&mut self) -> Result<Vec<f32>, SamplerError> {
        if self.released {
            return Err(SamplerError::Released);
        }

        Ok(self
            .lit
            .iter()
            .zip(&self.total)
            .map(|(&lit, &total)| {
                if total > 0.0 {
                    (1.0 - lit / total).clamp(0.0, 1.0)
                } else {
                    0.0
                }
            })
            .collect())
    }

    fn release(&mut self) {
        self.depth = Vec::new();
        self.lit = Vec::new();
        self.total = Vec::new();
        self.released = true;
        log::debug!("Occlusion sampler released after {} samples", self.samples_taken);
    }
}
