//! Fresnel equations and related functions.
//!
//! # Refraction
//!
//! See [`refract_cos`] for computing the refraction of a vector with respect
//! to a surface normal knowing the cosine of the incident angle and the
//! relative index of refraction, and [`refract`] when only the refractive
//! indices of both media are known.
//!
//! # Fresnel equations
//!
//! Fresnel equations describe the amount of light reflected from a smooth
//! surface. Given the index of refraction and the angle which the incident
//! ray makes with the surface normal, they specify the reflectance for two
//! polarisation states of the incident light. For un-polarised light the
//! reflectance is the average of the "s" (perpendicular) and "p" (parallel)
//! terms.
//!
//! ## Dielectric
//!
//! $$r_\perp = \frac{\eta_i\cos\theta_i - \eta_t\cos\theta_t}
//! {\eta_i\cos\theta_i + \eta_t\cos\theta_t}$$
//!
//! $$r_\parallel = \frac{\eta_t\cos\theta_i - \eta_i\cos\theta_t}
//! {\eta_t\cos\theta_i + \eta_i\cos\theta_t}$$
//!
//! See [`reflectance_dielectric_coeff`].
//!
//! ## Conductor
//!
//! Conductors have a complex-valued index of refraction $\eta + ik$. For
//! light coming from vacuum (or air) the commonly used approximation of the
//! power reflectance is
//!
//! $$R_s = \frac{(\eta^2+k^2) - 2\eta\cos\theta + \cos^2\theta}
//! {(\eta^2+k^2) + 2\eta\cos\theta + \cos^2\theta}$$
//!
//! $$R_p = \frac{(\eta^2+k^2)\cos^2\theta - 2\eta\cos\theta + 1}
//! {(\eta^2+k^2)\cos^2\theta + 2\eta\cos\theta + 1}$$
//!
//! and the un-polarised reflectance is $\frac{1}{2}(R_s + R_p)$.
//!
//! See [`reflectance_conductor`] and [`reflectance_conductor_rgb`].

use crate::math::{sqr, DVec3, Rgb};

/// Denominators below this value are treated as zero.
const DENOM_EPSILON: f64 = 1e-12;

/// Result of a refraction computation.
///
/// The refraction always produces a direction; in the case of total internal
/// reflection the direction is the mirrored one and `tir` is set so that
/// callers can decide what to do with it.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Refracted {
    /// Direction of the transmitted ray, or of the reflected ray in case of
    /// total internal reflection.
    pub dir_t: DVec3,
    /// Cosine of the transmitted angle, the angle between the refracted
    /// direction and the inverse of the normal. Zero in case of total
    /// internal reflection.
    pub cos_t: f64,
    /// Whether total internal reflection occurred.
    pub tir: bool,
}

/// Reflects a vector `wi` about a normal `n` with the cosine of incident angle
/// already known.
///
/// # Arguments
///
/// * `wi` - Vector to be reflected (normalised), ends up on the point of
///   incidence.
/// * `n` - Normal vector (normalised).
/// * `cos_abs` - Absolute value of the cosine of the angle between `wi` and
///   `n`.
#[inline(always)]
pub fn reflect_cos_abs(wi: DVec3, n: DVec3, cos_abs: f64) -> DVec3 { wi + 2.0 * cos_abs * n }

/// Refracts an incident vector `wi` at the surface with a normal `n` using the
/// relative refraction index.
///
/// # Arguments
///
/// * `wi` - Incident vector (normalised), ends up on the point of incidence.
/// * `n` - Normal vector (normalised), pointing towards the incident medium.
/// * `eta` - Relative refraction index, `eta_i / eta_t`.
/// * `cos_i` - Cosine of the incident angle, NOT the angle between `wi` and
///   `n`. Should always be positive.
///
/// # Notes
///
/// Total internal reflection can only happen when `eta > 1`, i.e. when the
/// light leaves an optically denser medium.
pub fn refract_cos(wi: DVec3, n: DVec3, eta: f64, cos_i: f64) -> Refracted {
    debug_assert!(
        (0.0..=1.0).contains(&cos_i),
        "cos_i should be the cosine of the incident angle and should be positive."
    );
    let cos_t_sqr = 1.0 - eta * eta * (1.0 - cos_i * cos_i);
    if cos_t_sqr < 0.0 {
        Refracted {
            dir_t: reflect_cos_abs(wi, n, cos_i),
            cos_t: 0.0,
            tir: true,
        }
    } else {
        let cos_t = cos_t_sqr.sqrt();
        Refracted {
            dir_t: (eta * cos_i - cos_t) * n + eta * wi,
            cos_t,
            tir: false,
        }
    }
}

/// Refracts `wi` with respect to a given surface normal `n` and the refractive
/// indices of the incident and transmitted media.
///
/// Assumes that `wi` points towards the opposite side of the surface as the
/// normal `n`, i.e. the ray comes from the medium `n` points into.
///
/// # Arguments
///
/// * `wi` - Incident vector (normalised), ends up on the point of incidence.
/// * `n` - Normal vector (normalised).
/// * `eta_i` - Refractive index of the incident medium.
/// * `eta_t` - Refractive index of the transmitted medium.
pub fn refract(wi: DVec3, n: DVec3, eta_i: f64, eta_t: f64) -> Refracted {
    debug_assert!(
        eta_i > 0.0 && eta_t > 0.0,
        "The refractive indices should be positive and non-zero."
    );
    let cos_i = (-n.dot(wi)).clamp(0.0, 1.0);
    refract_cos(wi, n, eta_i / eta_t, cos_i)
}

/// Computes the un-polarised Fresnel reflection coefficient of a dielectric
/// interface from the incident and transmitted directions.
///
/// # Arguments
///
/// * `wi` - Incident direction (normalised), ends up on the point of
///   incidence.
/// * `n` - Normal vector (normalised), pointing towards the incident medium.
/// * `wt` - Transmitted direction (normalised), see [`refract`].
/// * `ior` - Refractive index of the transmitted medium relative to the
///   incident one.
///
/// # Returns
///
/// The reflection coefficient in [0, 1]. Normal incidence falls back to
/// $((\eta - 1) / (\eta + 1))^2$ and grazing incidence (or a degenerate
/// transmitted direction) to 1.
pub fn reflectance_dielectric_coeff(wi: DVec3, n: DVec3, wt: DVec3, ior: f64) -> f64 {
    if ior == 1.0 {
        return 0.0;
    }
    let cos_i = -wi.dot(n);
    let cos_t = -wt.dot(n);
    if cos_i > 1.0 - DENOM_EPSILON || cos_t > 1.0 - DENOM_EPSILON {
        return sqr((ior - 1.0) / (ior + 1.0)).clamp(0.0, 1.0);
    }
    if cos_i < DENOM_EPSILON || cos_t < DENOM_EPSILON {
        return 1.0;
    }
    let ks = cos_t / cos_i * ior;
    let fs = sqr((ks - 1.0) / (ks + 1.0));
    let kp = cos_i / cos_t * ior;
    let fp = sqr((kp - 1.0) / (kp + 1.0));
    let f = 0.5 * (fs + fp);
    if f.is_finite() {
        f.clamp(0.0, 1.0)
    } else {
        1.0
    }
}

/// Un-polarised Fresnel reflectance of light coming from vacuum onto a
/// conductor, for one wavelength.
///
/// # Arguments
///
/// * `eta` - Real part of the refractive index of the conductor.
/// * `k` - Extinction coefficient (imaginary part) of the conductor.
/// * `cos` - Cosine of the angle between the viewing direction and the
///   surface normal; 0 is grazing, 1 is normal incidence.
///
/// # Returns
///
/// The reflectance clamped to [0, 1]. The function is total: negative `eta`
/// or `k` are clamped to zero, the cosine is clamped to [0, 1], a vanishing
/// denominator counts as full reflection and any non-finite input or result
/// yields 1.
pub fn reflectance_conductor(eta: f64, k: f64, cos: f64) -> f64 {
    if !(eta.is_finite() && k.is_finite()) || cos.is_nan() {
        return 1.0;
    }
    let eta = eta.max(0.0);
    let k = k.max(0.0);
    let c = cos.clamp(0.0, 1.0);

    let a = eta * eta + k * k;
    let c2 = c * c;
    let two_eta_c = 2.0 * eta * c;

    let rs_den = a + two_eta_c + c2;
    let rs = if rs_den < DENOM_EPSILON {
        1.0
    } else {
        (a - two_eta_c + c2) / rs_den
    };

    let rp_den = a * c2 + two_eta_c + 1.0;
    let rp = if rp_den < DENOM_EPSILON {
        1.0
    } else {
        (a * c2 - two_eta_c + 1.0) / rp_den
    };

    let r = 0.5 * (rs + rp);
    if r.is_finite() {
        r.clamp(0.0, 1.0)
    } else {
        1.0
    }
}

/// Un-polarised Fresnel reflectance of a conductor for three wavelengths.
///
/// Applies [`reflectance_conductor`] independently per channel.
pub fn reflectance_conductor_rgb(eta: Rgb, k: Rgb, cos: f64) -> Rgb {
    Rgb::new(
        reflectance_conductor(eta.x, k.x, cos),
        reflectance_conductor(eta.y, k.y, cos),
        reflectance_conductor(eta.z, k.z, cos),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optics::incident_dir_from_cos;
    use approx::abs_diff_eq;
    use proptest::prelude::*;

    #[test]
    fn conductor_normal_incidence_closed_form() {
        let pairs = [
            (0.052_225, 4.4094),
            (0.155_57, 3.6024),
            (1.558, 7.7124),
            (3.1071, 3.3314),
            (1.5, 0.0),
            (2.0733, 5.3383),
        ];
        for (eta, k) in pairs {
            let expected = (sqr(eta - 1.0) + k * k) / (sqr(eta + 1.0) + k * k);
            let r = reflectance_conductor(eta, k, 1.0);
            assert!(
                abs_diff_eq!(r, expected, epsilon = 1e-12),
                "eta: {}, k: {}, r: {}, expected: {}",
                eta,
                k,
                r,
                expected
            );
        }
    }

    #[test]
    fn conductor_grazing_is_total() {
        assert!(abs_diff_eq!(
            reflectance_conductor(0.155_57, 3.6024, 0.0),
            1.0,
            epsilon = 1e-12
        ));
    }

    #[test]
    fn conductor_degenerate_inputs() {
        // eta = k = 0 at grazing makes the s term 0/0.
        assert_eq!(reflectance_conductor(0.0, 0.0, 0.0), 1.0);
        assert_eq!(reflectance_conductor(f64::NAN, 1.0, 0.5), 1.0);
        assert_eq!(reflectance_conductor(1.0, f64::INFINITY, 0.5), 1.0);
        assert_eq!(reflectance_conductor(1.0, 1.0, f64::NAN), 1.0);
        // Negative absorption is clamped to zero.
        assert_eq!(
            reflectance_conductor(1.5, -2.0, 0.3),
            reflectance_conductor(1.5, 0.0, 0.3)
        );
    }

    #[test]
    fn conductor_rgb_is_per_channel() {
        let eta = Rgb::new(0.155_57, 0.424_15, 1.3831);
        let k = Rgb::new(3.6024, 2.4721, 1.9155);
        let rgb = reflectance_conductor_rgb(eta, k, 0.4);
        assert_eq!(rgb.x, reflectance_conductor(eta.x, k.x, 0.4));
        assert_eq!(rgb.y, reflectance_conductor(eta.y, k.y, 0.4));
        assert_eq!(rgb.z, reflectance_conductor(eta.z, k.z, 0.4));
        assert_eq!(rgb, reflectance_conductor_rgb(eta, k, 0.4));
    }

    #[test]
    fn refraction_from_air_never_reflects_totally() {
        for i in 0..=100 {
            let cos_i = i as f64 / 100.0;
            let wi = incident_dir_from_cos(cos_i);
            let refracted = refract(wi, DVec3::Z, 1.0, 1.5);
            assert!(!refracted.tir);
            assert!(abs_diff_eq!(refracted.dir_t.length(), 1.0, epsilon = 1e-9));
            assert!(abs_diff_eq!(
                -refracted.dir_t.dot(DVec3::Z),
                refracted.cos_t,
                epsilon = 1e-9
            ));
            // Snell's law.
            let sin_i = (1.0 - cos_i * cos_i).sqrt();
            let sin_t = (1.0 - refracted.cos_t * refracted.cos_t).sqrt();
            assert!(abs_diff_eq!(sin_i, 1.5 * sin_t, epsilon = 1e-9));
        }
    }

    #[test]
    fn refraction_into_air_reflects_totally_past_critical_angle() {
        let wi = incident_dir_from_cos(0.2);
        let refracted = refract(wi, DVec3::Z, 1.5, 1.0);
        assert!(refracted.tir);
        assert_eq!(refracted.cos_t, 0.0);
        assert!(abs_diff_eq!(refracted.dir_t.z, 0.2, epsilon = 1e-12));

        let wi = incident_dir_from_cos(0.95);
        assert!(!refract(wi, DVec3::Z, 1.5, 1.0).tir);
    }

    #[test]
    fn dielectric_coeff_matches_closed_forms() {
        let ior = 1.5;
        let wi = incident_dir_from_cos(1.0);
        let wt = refract(wi, DVec3::Z, 1.0, ior).dir_t;
        assert!(abs_diff_eq!(
            reflectance_dielectric_coeff(wi, DVec3::Z, wt, ior),
            0.04,
            epsilon = 1e-12
        ));

        let wi = incident_dir_from_cos(0.0);
        let wt = refract(wi, DVec3::Z, 1.0, ior).dir_t;
        assert_eq!(reflectance_dielectric_coeff(wi, DVec3::Z, wt, ior), 1.0);

        let wi = incident_dir_from_cos(0.5);
        let wt = refract(wi, DVec3::Z, 1.0, 1.0).dir_t;
        assert_eq!(reflectance_dielectric_coeff(wi, DVec3::Z, wt, 1.0), 0.0);
    }

    #[test]
    fn dielectric_coeff_increases_towards_grazing() {
        let ior = 2.5;
        let coeff = |cos: f64| {
            let wi = incident_dir_from_cos(cos);
            let wt = refract(wi, DVec3::Z, 1.0, ior).dir_t;
            reflectance_dielectric_coeff(wi, DVec3::Z, wt, ior)
        };
        let r0 = sqr((ior - 1.0) / (ior + 1.0));
        assert!(abs_diff_eq!(coeff(1.0), r0, epsilon = 1e-12));
        assert!(coeff(0.5) > r0);
        assert!(coeff(0.1) > coeff(0.5));
        assert!(coeff(0.01) > coeff(0.1));
    }

    proptest! {
        #[test]
        fn conductor_reflectance_in_unit_range(
            eta in 0.0f64..10.0,
            k in 0.0f64..10.0,
            cos in 0.0f64..=1.0,
        ) {
            let r = reflectance_conductor(eta, k, cos);
            prop_assert!((0.0..=1.0).contains(&r));
            prop_assert_eq!(r, reflectance_conductor(eta, k, cos));
        }

        #[test]
        fn dielectric_coeff_in_unit_range(ior in 1.0f64..10.0, cos in 0.0f64..=1.0) {
            let wi = incident_dir_from_cos(cos);
            let wt = refract(wi, DVec3::Z, 1.0, ior).dir_t;
            let f = reflectance_dielectric_coeff(wi, DVec3::Z, wt, ior);
            prop_assert!((0.0..=1.0).contains(&f));
        }
    }
}
