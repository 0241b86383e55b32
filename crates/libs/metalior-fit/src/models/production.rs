use crate::models::FresnelModel;
use base::{
    math::DVec3,
    optics::{
        fresnel::{reflectance_dielectric_coeff, refract},
        incident_dir_from_cos,
    },
    Rgb,
};

/// Metallic Fresnel of the renderer for one colour pair and IOR.
///
/// The surface is seen from outside (air, IOR 1) so the relative refraction
/// index is `1 / ior`. For `ior > 1` the ray can never be totally internally
/// reflected; for `0 < ior < 1` the mirrored direction makes the coefficient
/// saturate to 1. A non-positive or non-finite `ior` is treated as 1 (no
/// interface), which yields `base`.
///
/// # Arguments
///
/// * `base` - Reflectance colour at normal incidence.
/// * `grazing` - Reflectance colour at grazing incidence.
/// * `ior` - Index of refraction driving the dielectric coefficient.
/// * `cos_theta` - Cosine of the viewing angle, clamped to [0, 1].
pub fn production_approx(base: Rgb, grazing: Rgb, ior: f64, cos_theta: f64) -> Rgb {
    let ior = if ior.is_finite() && ior > 0.0 { ior } else { 1.0 };
    let wi = incident_dir_from_cos(cos_theta);
    let refracted = refract(wi, DVec3::Z, 1.0, ior);
    let f = reflectance_dielectric_coeff(wi, DVec3::Z, refracted.dir_t, ior);
    base * (1.0 - f) + grazing * f
}

/// [`production_approx`] with its parameters bundled.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProductionFresnel {
    /// Reflectance colour at normal incidence.
    pub base: Rgb,
    /// Reflectance colour at grazing incidence.
    pub grazing: Rgb,
    /// IOR of the dielectric coefficient.
    pub ior: f64,
}

impl ProductionFresnel {
    /// Creates the model.
    pub fn new(base: Rgb, grazing: Rgb, ior: f64) -> Self { Self { base, grazing, ior } }
}

impl FresnelModel for ProductionFresnel {
    fn eval(&self, cos_theta: f64) -> Rgb {
        production_approx(self.base, self.grazing, self.ior, cos_theta)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use proptest::prelude::*;

    const BASE: Rgb = Rgb::new(0.9, 0.6, 0.3);
    const GRAZING: Rgb = Rgb::ONE;

    #[test]
    fn normal_incidence_uses_schlick_r0() {
        let ior: f64 = 1.5;
        let f = ((ior - 1.0) / (ior + 1.0)).powi(2);
        let expected = BASE * (1.0 - f) + GRAZING * f;
        assert!(production_approx(BASE, GRAZING, ior, 1.0).abs_diff_eq(expected, 1e-12));
    }

    #[test]
    fn grazing_incidence_returns_grazing() {
        for ior in [1.001, 1.5, 3.0, 9.999] {
            assert!(production_approx(BASE, GRAZING, ior, 0.0).abs_diff_eq(GRAZING, 1e-12));
        }
    }

    #[test]
    fn unit_ior_returns_base() {
        for cos in [0.0, 0.25, 0.5, 1.0] {
            assert_eq!(production_approx(BASE, GRAZING, 1.0, cos), BASE);
        }
        assert_eq!(production_approx(BASE, GRAZING, f64::NAN, 0.5), BASE);
        assert_eq!(production_approx(BASE, GRAZING, -2.0, 0.5), BASE);
    }

    #[test]
    fn equal_colours_give_constant_curve() {
        for cos in [0.01, 0.3, 0.7, 1.0] {
            let r = production_approx(BASE, BASE, 2.5, cos);
            assert_abs_diff_eq!(r.x, BASE.x, epsilon = 1e-12);
            assert_abs_diff_eq!(r.y, BASE.y, epsilon = 1e-12);
            assert_abs_diff_eq!(r.z, BASE.z, epsilon = 1e-12);
        }
    }

    #[test]
    fn model_matches_free_function() {
        let model = ProductionFresnel::new(BASE, GRAZING, 2.0);
        assert_eq!(model.eval(0.4), production_approx(BASE, GRAZING, 2.0, 0.4));
    }

    #[test]
    fn repeated_evaluation_is_identical() {
        let model = ProductionFresnel::new(BASE, GRAZING, 3.7);
        let first: Vec<Rgb> = (0..=64).map(|i| model.eval(i as f64 / 64.0)).collect();
        let second: Vec<Rgb> = (0..=64).map(|i| model.eval(i as f64 / 64.0)).collect();
        assert_eq!(first, second);
    }

    proptest! {
        #[test]
        fn stays_between_base_and_grazing(ior in 1.001f64..10.0, cos in 0.0f64..=1.0) {
            let r = production_approx(BASE, GRAZING, ior, cos);
            prop_assert!(r.cmpge(BASE - 1e-12).all() && r.cmple(GRAZING + 1e-12).all());
        }
    }
}
