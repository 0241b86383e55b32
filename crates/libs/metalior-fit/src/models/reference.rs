//! Artist-friendly metallic Fresnel (Gulbrandsen, 2014).
//!
//! The complex index of refraction of a metal is re-parameterised by its
//! reflectivity `r` at normal incidence and an edge tint `g`, then the exact
//! conductor Fresnel formula is evaluated with the recovered `(n, k)`.

use crate::models::FresnelModel;
use base::{math::sqr, Rgb};

/// Upper bound of the reflectivity, keeps `1 - r` away from zero.
pub const MAX_REFLECTIVITY: f64 = 0.99;

/// Smallest real IOR reachable for the reflectivity `r`.
#[inline]
pub fn n_min(r: f64) -> f64 { (1.0 - r) / (1.0 + r) }

/// Largest real IOR reachable for the reflectivity `r`.
#[inline]
pub fn n_max(r: f64) -> f64 {
    let sqrt_r = r.sqrt();
    (1.0 + sqrt_r) / (1.0 - sqrt_r)
}

/// Real part of the IOR interpolated by the edge tint.
#[inline]
pub fn eta_from_rg(r: f64, g: f64) -> f64 { g * n_min(r) + (1.0 - g) * n_max(r) }

/// Squared extinction coefficient matching the reflectivity `r` for the real
/// part `eta`.
#[inline]
pub fn k_sqr_from_r_eta(r: f64, eta: f64) -> f64 {
    (sqr(eta + 1.0) * r - sqr(eta - 1.0)) / (1.0 - r)
}

/// Reflectivity at normal incidence of a conductor.
pub fn reflectivity_from_nk(eta: f64, k: f64) -> f64 {
    let k2 = k * k;
    (sqr(eta - 1.0) + k2) / (sqr(eta + 1.0) + k2)
}

/// Edge tint of a conductor; inverse of [`eta_from_rg`] for the reflectivity
/// returned by [`reflectivity_from_nk`].
pub fn edge_tint_from_nk(eta: f64, k: f64) -> f64 {
    let r = reflectivity_from_nk(eta, k);
    (n_max(r) - eta) / (n_max(r) - n_min(r))
}

/// Evaluates the reference model for one channel.
///
/// `r` is clamped to `[0, MAX_REFLECTIVITY]`; `g` is used as given. The
/// result is not clamped.
pub fn reference_approx_channel(r: f64, g: f64, cos_theta: f64) -> f64 {
    let r = r.clamp(0.0, MAX_REFLECTIVITY);
    let c = cos_theta;
    let n = eta_from_rg(r, g);
    let k2 = k_sqr_from_r_eta(r, n);

    let a = n * n + k2;
    let rs = (a - 2.0 * n * c + c * c) / (a + 2.0 * n * c + c * c);
    let rp = (a * c * c - 2.0 * n * c + 1.0) / (a * c * c + 2.0 * n * c + 1.0);
    0.5 * (rs + rp)
}

/// Evaluates the reference model per channel.
pub fn reference_approx(r: Rgb, g: Rgb, cos_theta: f64) -> Rgb {
    Rgb::new(
        reference_approx_channel(r.x, g.x, cos_theta),
        reference_approx_channel(r.y, g.y, cos_theta),
        reference_approx_channel(r.z, g.z, cos_theta),
    )
}

/// Recovers `(r, g)` of each channel from a complex refractive index.
pub fn rg_from_nk(eta: Rgb, k: Rgb) -> (Rgb, Rgb) {
    let r = Rgb::new(
        reflectivity_from_nk(eta.x, k.x),
        reflectivity_from_nk(eta.y, k.y),
        reflectivity_from_nk(eta.z, k.z),
    );
    let g = Rgb::new(
        edge_tint_from_nk(eta.x, k.x),
        edge_tint_from_nk(eta.y, k.y),
        edge_tint_from_nk(eta.z, k.z),
    );
    (r, g)
}

/// [`reference_approx`] with its parameters bundled.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReferenceFresnel {
    /// Reflectivity at normal incidence.
    pub reflectivity: Rgb,
    /// Edge tint.
    pub edge_tint: Rgb,
}

impl ReferenceFresnel {
    /// Creates the model.
    pub fn new(reflectivity: Rgb, edge_tint: Rgb) -> Self {
        Self {
            reflectivity,
            edge_tint,
        }
    }
}

impl FresnelModel for ReferenceFresnel {
    fn eval(&self, cos_theta: f64) -> Rgb {
        reference_approx(self.reflectivity, self.edge_tint, cos_theta)
    }
}
