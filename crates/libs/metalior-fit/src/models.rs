//! Reflectance models compared by the fitter.

mod production;
mod reference;

pub use production::*;
pub use reference::*;

use base::{
    optics::{fresnel::reflectance_conductor_rgb, ior::ComplexIor},
    Rgb,
};
use std::fmt::Debug;

/// A reflectance curve of a metal as a function of the cosine of the angle
/// between the viewing direction and the surface normal.
pub trait FresnelModel: Debug + Send + Sync {
    /// Evaluates the reflectance for the given cosine (0 is grazing, 1 is
    /// normal incidence).
    fn eval(&self, cos_theta: f64) -> Rgb;
}

/// Physical reflectance of a metal computed from its complex refractive
/// index.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ComplexFresnel {
    /// Complex refractive index of the metal.
    pub ior: ComplexIor,
}

impl ComplexFresnel {
    /// Creates the physical model of the given metal.
    pub fn new(ior: ComplexIor) -> Self { Self { ior } }

    /// Reflectance at normal incidence.
    pub fn base(&self) -> Rgb { self.eval(1.0) }

    /// Reflectance at grazing incidence.
    pub fn grazing(&self) -> Rgb { self.eval(0.0) }
}

impl FresnelModel for ComplexFresnel {
    fn eval(&self, cos_theta: f64) -> Rgb {
        reflectance_conductor_rgb(self.ior.eta, self.ior.k, cos_theta)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn physical_base_and_grazing() {
        let model = ComplexFresnel::new(ComplexIor::new(
            Rgb::new(0.15557, 0.42415, 1.3831),
            Rgb::new(3.6024, 2.4721, 1.9155),
        ));
        let base = model.base();
        assert!(base.x > base.y && base.y > base.z, "gold is yellow: {}", base);
        assert!(model.grazing().abs_diff_eq(Rgb::ONE, 1e-12));
        assert_eq!(model.eval(0.3), model.eval(0.3));
    }
}
