//! Low-discrepancy sample directions
//!
//! Directions come from a Halton (2, 3) sequence mapped onto the unit
//! sphere, so any prefix of the sequence covers the sphere evenly. This keeps
//! partial results meaningful and makes runs deterministic.

use std::f32::consts::TAU;

use aoview_math::Vec3;

/// Radical inverse of `index` in the given base
pub fn halton(mut index: u32, base: u32) -> f32 {
    let mut result = 0.0f32;
    let mut f = 1.0f32 / base as f32;
    while index > 0 {
        result += f * (index % base) as f32;
        index /= base;
        f /= base as f32;
    }
    result
}

/// The `index`-th sample direction (uniform over the unit sphere)
pub fn sphere_direction(index: u32) -> Vec3 {
    // Skip index 0, which maps to a pole
    let i = index + 1;
    let z = 1.0 - 2.0 * halton(i, 2);
    let phi = TAU * halton(i, 3);
    let r = (1.0 - z * z).max(0.0).sqrt();
    Vec3::new(r * phi.cos(), r * phi.sin(), z)
}
