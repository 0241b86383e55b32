//! Dense sampling of the three reflectance curves of a metal.

use crate::{
    fitting::{curve_rmse, reference_params, AngleSamples, FitError},
    models::{ComplexFresnel, FresnelModel, ProductionFresnel, ReferenceFresnel},
};
use base::{optics::ior::ComplexIor, Rgb};
use serde::Serialize;

/// Default number of divisions of the cosine range for exported curves.
pub const DEFAULT_CURVE_DIVISIONS: u32 = 1600;

/// The three reflectances at one cosine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CurveSample {
    /// Cosine of the viewing angle.
    pub cos_theta: f64,
    /// Physical reflectance.
    pub physical: Rgb,
    /// Production model with the fitted IOR.
    pub production: Rgb,
    /// Reference model.
    pub reference: Rgb,
}

/// Reflectance curves of a metal sampled at `i / divisions`.
#[derive(Debug, Clone, PartialEq)]
pub struct Curves {
    /// Samples in increasing cosine order.
    pub samples: Vec<CurveSample>,
    /// RMSE of the production model over the samples.
    pub production_rmse: f64,
    /// RMSE of the reference model over the samples.
    pub reference_rmse: f64,
}

/// Samples the physical, production and reference curves of a metal.
pub fn sample_curves(ior: &ComplexIor, fitted_ior: f64, divisions: u32) -> Result<Curves, FitError> {
    if divisions < 2 {
        return Err(FitError::InvalidConfig(format!(
            "at least 2 curve divisions are required, got {}",
            divisions
        )));
    }
    if !(fitted_ior.is_finite() && fitted_ior > 1.0) {
        return Err(FitError::InvalidConfig(format!(
            "the production IOR must be a finite value above 1, got {}",
            fitted_ior
        )));
    }
    let physical = ComplexFresnel::new(*ior);
    let production = ProductionFresnel::new(physical.base(), physical.grazing(), fitted_ior);
    let (r, g) = reference_params(&physical);
    let reference = ReferenceFresnel::new(r, g);
    let angles = AngleSamples::new(divisions);

    let samples = angles
        .iter()
        .map(|c| CurveSample {
            cos_theta: c,
            physical: physical.eval(c),
            production: production.eval(c),
            reference: reference.eval(c),
        })
        .collect();

    Ok(Curves {
        samples,
        production_rmse: curve_rmse(&production, &physical, &angles),
        reference_rmse: curve_rmse(&reference, &physical, &angles),
    })
}
