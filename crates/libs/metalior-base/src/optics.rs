//! Geometric and physical optics related computations and data structures.

pub mod fresnel;
pub mod ior;

use crate::math::DVec3;

/// Builds the incident direction for a given cosine of the incident angle.
///
/// The surface normal is the +Z axis and the direction lies in the XZ plane,
/// pointing towards the surface (ends up on the point of incidence). The
/// cosine is clamped to [0, 1].
pub fn incident_dir_from_cos(cos_i: f64) -> DVec3 {
    let cos_i = cos_i.clamp(0.0, 1.0);
    DVec3::new((1.0 - cos_i * cos_i).max(0.0).sqrt(), 0.0, -cos_i)
}
