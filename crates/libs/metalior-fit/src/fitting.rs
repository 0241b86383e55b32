//! Brute force search of the IOR of the production model.

use crate::models::{ComplexFresnel, FresnelModel, ProductionFresnel, ReferenceFresnel};
use base::{
    math::{rgb_dist_sqr, Rgb},
    optics::ior::ComplexIor,
    range::StepRangeExcl,
};
use rayon::prelude::{IndexedParallelIterator, ParallelIterator, ParallelSliceMut};
use serde::{Deserialize, Serialize};

/// Errors reported by the fitter.
#[derive(Debug, thiserror::Error)]
pub enum FitError {
    /// The search grid or the angular sampling cannot produce any sample.
    #[error("invalid fitting configuration: {0}")]
    InvalidConfig(String),
    /// There is nothing to fit.
    #[error("the preset table is empty")]
    EmptyPresetTable,
}

/// Parameters of the IOR search.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FitParams {
    /// Candidate IORs, `start + i * step_size` while below `stop`.
    pub ior: StepRangeExcl,
    /// Number of divisions of the cosine range; the samples are the interior
    /// points `i / angle_divisions`.
    pub angle_divisions: u32,
    /// Evaluates the candidates on the rayon thread pool.
    pub parallel: bool,
}

impl FitParams {
    /// Default candidate IORs: `1.001 .. 10.0 / 0.001`.
    pub const DEFAULT_IOR_GRID: StepRangeExcl = StepRangeExcl::new(1.001, 10.0, 0.001);

    /// Default number of divisions of the cosine range.
    pub const DEFAULT_ANGLE_DIVISIONS: u32 = 200;

    /// Largest number of candidate IORs a search may visit.
    pub const MAX_CANDIDATES: usize = 100_000_000;

    /// Checks that the search visits at least one candidate with at least one
    /// sample.
    pub fn validate(&self) -> Result<(), FitError> {
        let StepRangeExcl {
            start,
            stop,
            step_size,
        } = self.ior;
        if !(start.is_finite() && stop.is_finite() && step_size.is_finite()) {
            return Err(FitError::InvalidConfig(format!(
                "IOR grid '{}' has non-finite bounds",
                self.ior
            )));
        }
        if step_size <= 0.0 {
            return Err(FitError::InvalidConfig(format!(
                "IOR step size must be positive, got {}",
                step_size
            )));
        }
        if start <= 1.0 {
            return Err(FitError::InvalidConfig(format!(
                "IOR grid '{}' must start above 1",
                self.ior
            )));
        }
        if start >= stop {
            return Err(FitError::InvalidConfig(format!(
                "IOR grid '{}' is empty",
                self.ior
            )));
        }
        match self.ior.step_count() {
            Some(count) if count <= Self::MAX_CANDIDATES => {},
            _ => {
                return Err(FitError::InvalidConfig(format!(
                    "IOR grid '{}' has more than {} candidates",
                    self.ior,
                    Self::MAX_CANDIDATES
                )))
            },
        }
        if self.angle_divisions < 2 {
            return Err(FitError::InvalidConfig(format!(
                "at least 2 angle divisions are required, got {}",
                self.angle_divisions
            )));
        }
        Ok(())
    }

    /// The cosine samples at which the curves are compared.
    pub fn angle_samples(&self) -> AngleSamples { AngleSamples::new(self.angle_divisions) }
}

impl Default for FitParams {
    fn default() -> Self {
        Self {
            ior: Self::DEFAULT_IOR_GRID,
            angle_divisions: Self::DEFAULT_ANGLE_DIVISIONS,
            parallel: true,
        }
    }
}

/// Cosines `i / divisions` for `i` in `1..divisions`.
///
/// Normal and grazing incidence are excluded: both models agree there by
/// construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AngleSamples {
    divisions: u32,
}

impl AngleSamples {
    /// Creates the samples for the given number of divisions.
    pub const fn new(divisions: u32) -> Self { Self { divisions } }

    /// Number of samples.
    pub fn len(&self) -> usize { self.divisions.saturating_sub(1) as usize }

    /// Whether there is no sample at all.
    pub fn is_empty(&self) -> bool { self.len() == 0 }

    /// Iterates over the cosines in increasing order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = f64> {
        let d = self.divisions as f64;
        (1..self.divisions.max(1)).map(move |i| i as f64 / d)
    }
}

/// Adds the squared errors, a non-finite term counts as `f64::MAX` and the
/// sum saturates there.
fn accumulate_sqr_err(errs: impl Iterator<Item = f64>) -> f64 {
    errs.fold(0.0, |sum, e| {
        let e = if e.is_finite() { e } else { f64::MAX };
        (sum + e).min(f64::MAX)
    })
}

/// Sum over the samples of the squared RGB distance between two models.
pub fn curve_sqr_err(a: &dyn FresnelModel, b: &dyn FresnelModel, samples: &AngleSamples) -> f64 {
    accumulate_sqr_err(samples.iter().map(|c| rgb_dist_sqr(a.eval(c), b.eval(c))))
}

/// Root mean squared RGB distance between two models over the samples.
pub fn curve_rmse(a: &dyn FresnelModel, b: &dyn FresnelModel, samples: &AngleSamples) -> f64 {
    rmse(curve_sqr_err(a, b, samples), samples.len())
}

fn rmse(sum: f64, count: usize) -> f64 {
    if count == 0 {
        0.0
    } else {
        (sum / count as f64).sqrt()
    }
}

/// Summed squared error of every candidate IOR of a search.
#[derive(Debug, Clone, PartialEq)]
pub struct IorSweep {
    /// The candidates.
    pub grid: StepRangeExcl,
    /// Number of cosine samples per candidate.
    pub sample_count: usize,
    /// Summed squared error of the candidate `i` at index `i`.
    pub errs: Box<[f64]>,
}

impl IorSweep {
    /// Index of the first candidate with the smallest error.
    pub fn best_index(&self) -> Option<usize> {
        self.errs
            .iter()
            .enumerate()
            .fold(None, |best: Option<(usize, f64)>, (i, &e)| match best {
                Some((_, b)) if e >= b => best,
                _ => Some((i, e)),
            })
            .map(|(i, _)| i)
    }

    /// RMSE of the candidate at `i`.
    pub fn rmse_at(&self, i: usize) -> f64 { rmse(self.errs[i], self.sample_count) }
}

/// Result of the search for one metal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct IorFit {
    /// Reflectance at normal incidence of the physical model.
    pub base: Rgb,
    /// Reflectance at grazing incidence of the physical model.
    pub grazing: Rgb,
    /// The best IOR.
    pub ior: f64,
    /// RMSE of the production model with the best IOR.
    pub production_rmse: f64,
    /// RMSE of the reference model.
    pub reference_rmse: f64,
}

/// Evaluates the error of every candidate IOR against the physical model of
/// the metal.
pub fn sweep_ior(ior: &ComplexIor, params: &FitParams) -> Result<IorSweep, FitError> {
    params.validate()?;
    if !ior.is_valid() {
        log::warn!("{:?} is out of the physical domain, its reflectance is clamped", ior);
    } else if !ior.is_conductor() {
        log::warn!("{:?} does not absorb in every channel", ior);
    }
    let physical = ComplexFresnel::new(*ior);
    let base = physical.base();
    let grazing = physical.grazing();
    let samples = params.angle_samples();
    let expected: Box<[(f64, Rgb)]> = samples.iter().map(|c| (c, physical.eval(c))).collect();

    let grid = params.ior;
    let count = grid.step_count().unwrap_or(0);
    if count == 0 {
        return Err(FitError::InvalidConfig(format!(
            "IOR grid '{}' has no candidate",
            grid
        )));
    }

    let candidate_err = |i: usize| -> f64 {
        let model = ProductionFresnel::new(base, grazing, grid.value_at(i));
        accumulate_sqr_err(
            expected
                .iter()
                .map(|&(c, phys)| rgb_dist_sqr(model.eval(c), phys)),
        )
    };

    log::debug!(
        "sweeping {} IOR candidates over {} angle samples",
        count,
        samples.len()
    );
    let mut errs = vec![0.0; count].into_boxed_slice();
    if params.parallel {
        const CHUNK_SIZE: usize = 64;
        errs.par_chunks_mut(CHUNK_SIZE)
            .enumerate()
            .for_each(|(i, chunk)| {
                for (j, err) in chunk.iter_mut().enumerate() {
                    *err = candidate_err(i * CHUNK_SIZE + j);
                }
            });
    } else {
        for (i, err) in errs.iter_mut().enumerate() {
            *err = candidate_err(i);
        }
    }

    let saturated = errs.iter().filter(|&&e| e == f64::MAX).count();
    if saturated > 0 {
        log::warn!(
            "{} of {} IOR candidates produced non-finite reflectance for {:?}",
            saturated,
            count,
            ior
        );
    }
    log::debug!("sweep finished");

    Ok(IorSweep {
        grid,
        sample_count: samples.len(),
        errs,
    })
}

/// Finds the IOR for which the production model is closest to the physical
/// reflectance of the metal.
///
/// Every candidate of `params.ior` is evaluated; ties resolve to the smallest
/// candidate. The result does not depend on `params.parallel`.
pub fn fit_ior(ior: &ComplexIor, params: &FitParams) -> Result<IorFit, FitError> {
    let sweep = sweep_ior(ior, params)?;
    let best = sweep
        .best_index()
        .ok_or_else(|| FitError::InvalidConfig(format!("IOR grid '{}' has no candidate", sweep.grid)))?;

    let physical = ComplexFresnel::new(*ior);
    let base = physical.base();
    let grazing = physical.grazing();
    let (r, g) = reference_params(&physical);
    let reference = ReferenceFresnel::new(r, g);
    let samples = params.angle_samples();

    let fit = IorFit {
        base,
        grazing,
        ior: sweep.grid.value_at(best),
        production_rmse: sweep.rmse_at(best),
        reference_rmse: curve_rmse(&reference, &physical, &samples),
    };
    log::debug!(
        "{:?}: best IOR {} at candidate {}/{}, RMSE {} (reference {})",
        ior,
        fit.ior,
        best,
        sweep.errs.len(),
        fit.production_rmse,
        fit.reference_rmse
    );
    Ok(fit)
}

/// Reflectivity and edge tint handed to the reference model: the physical
/// reflectance at normal and at grazing incidence.
pub fn reference_params(physical: &ComplexFresnel) -> (Rgb, Rgb) {
    (physical.base(), physical.grazing())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn copper() -> ComplexIor {
        ComplexIor::new(
            Rgb::new(0.27105, 0.67693, 1.31640),
            Rgb::new(3.60920, 2.62480, 2.29210),
        )
    }

    fn coarse() -> FitParams {
        FitParams {
            ior: StepRangeExcl::new(1.01, 10.0, 0.01),
            angle_divisions: 50,
            parallel: false,
        }
    }

    #[test]
    fn default_params() {
        let params = FitParams::default();
        assert_eq!(params.ior.step_count(), Some(8999));
        assert_eq!(params.angle_samples().len(), 199);
        assert!(params.parallel);
        assert!(params.validate().is_ok());
    }

    #[test]
    fn angle_samples_exclude_endpoints() {
        let samples = AngleSamples::new(4);
        assert_eq!(samples.iter().collect::<Vec<_>>(), vec![0.25, 0.5, 0.75]);
        assert_eq!(samples.len(), 3);
        assert!(AngleSamples::new(1).is_empty());
        assert_eq!(AngleSamples::new(0).iter().count(), 0);
    }

    #[test]
    fn invalid_configs_are_rejected() {
        let base = FitParams::default();
        let cases = [
            FitParams { ior: StepRangeExcl::new(2.0, 1.0, 0.1), ..base },
            FitParams { ior: StepRangeExcl::new(1.0, 2.0, 0.0), ..base },
            FitParams { ior: StepRangeExcl::new(1.0, 2.0, -0.1), ..base },
            FitParams { ior: StepRangeExcl::new(1.5, f64::INFINITY, 0.1), ..base },
            FitParams { ior: StepRangeExcl::new(0.05, 10.0, 0.05), ..base },
            FitParams { ior: StepRangeExcl::new(1.0, 10.0, 0.001), ..base },
            FitParams { ior: StepRangeExcl::new(1.001, 1e300, 1e-300), ..base },
            FitParams { ior: StepRangeExcl::new(1.001, 10.0, 1e-9), ..base },
            FitParams { angle_divisions: 1, ..base },
            FitParams { angle_divisions: 0, ..base },
        ];
        for params in cases {
            assert!(
                matches!(fit_ior(&copper(), &params), Err(FitError::InvalidConfig(_))),
                "{:?} should be rejected",
                params
            );
        }
    }

    #[test]
    fn saturating_sum() {
        let sum = accumulate_sqr_err([1.0, f64::NAN, 2.0, f64::INFINITY].into_iter());
        assert_eq!(sum, f64::MAX);
        assert_eq!(accumulate_sqr_err([1.0, 2.0].into_iter()), 3.0);
    }

    #[test]
    fn ties_resolve_to_first_candidate() {
        let sweep = IorSweep {
            grid: StepRangeExcl::new(1.0, 2.0, 0.25),
            sample_count: 1,
            errs: vec![3.0, 1.0, 2.0, 1.0].into_boxed_slice(),
        };
        assert_eq!(sweep.best_index(), Some(1));
        let empty = IorSweep {
            errs: Box::new([]),
            ..sweep
        };
        assert_eq!(empty.best_index(), None);
    }

    #[test]
    fn fit_is_the_sweep_minimum() {
        let params = coarse();
        let sweep = sweep_ior(&copper(), &params).unwrap();
        let fit = fit_ior(&copper(), &params).unwrap();
        let min = sweep.errs.iter().cloned().fold(f64::INFINITY, f64::min);
        assert_abs_diff_eq!(fit.production_rmse, (min / 49.0).sqrt(), epsilon = 1e-15);
        for i in 0..sweep.errs.len() {
            assert!(sweep.rmse_at(i) >= fit.production_rmse, "{} beats the fit", i);
        }
        assert!(fit.ior >= 1.01 && fit.ior < 10.0);
    }

    #[test]
    fn parallel_sweep_is_identical() {
        let sequential = sweep_ior(&copper(), &coarse()).unwrap();
        let parallel = sweep_ior(&copper(), &FitParams { parallel: true, ..coarse() }).unwrap();
        assert_eq!(sequential, parallel);
    }

    #[test]
    fn reference_rmse_matches_curve_rmse() {
        let params = coarse();
        let fit = fit_ior(&copper(), &params).unwrap();
        let physical = ComplexFresnel::new(copper());
        let (r, g) = reference_params(&physical);
        let rmse = curve_rmse(
            &ReferenceFresnel::new(r, g),
            &physical,
            &params.angle_samples(),
        );
        assert_eq!(fit.reference_rmse, rmse);
        assert_eq!(fit.base, physical.base());
        assert_eq!(fit.grazing, Rgb::ONE);
    }

    #[test]
    fn exact_reference_reproduces_physical() {
        let physical = ComplexFresnel::new(copper());
        let (r, g) = crate::models::rg_from_nk(copper().eta, copper().k);
        let rmse = curve_rmse(
            &ReferenceFresnel::new(r, g),
            &physical,
            &AngleSamples::new(100),
        );
        assert!(rmse < 1e-9, "rmse = {}", rmse);
    }
}
