//! Runs the fit over a table of metal presets.

use crate::fitting::{fit_ior, FitError, FitParams, IorFit};
use base::optics::ior::{MetalPreset, PresetTable};
use rayon::prelude::*;

/// Fit of one preset.
#[derive(Debug, Clone, PartialEq)]
pub struct PresetFit {
    /// Name of the metal.
    pub name: String,
    /// Result of the search.
    pub fit: IorFit,
}

/// Fits one preset.
pub fn fit_preset(preset: &MetalPreset, params: &FitParams) -> Result<PresetFit, FitError> {
    log::trace!("fitting {}: {:?}", preset.name, preset.ior);
    let fit = fit_ior(&preset.ior, params)?;
    log::trace!("{}: IOR = {}", preset.name, fit.ior);
    Ok(PresetFit {
        name: preset.name.clone(),
        fit,
    })
}

/// Fits every preset of the table, keeping the table order.
pub fn fit_presets(table: &PresetTable, params: &FitParams) -> Result<Vec<PresetFit>, FitError> {
    if table.is_empty() {
        return Err(FitError::EmptyPresetTable);
    }
    params.validate()?;
    let presets: &[MetalPreset] = table;
    if params.parallel {
        presets.par_iter().map(|p| fit_preset(p, params)).collect()
    } else {
        presets.iter().map(|p| fit_preset(p, params)).collect()
    }
}
