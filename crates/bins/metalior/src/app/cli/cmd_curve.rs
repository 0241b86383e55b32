use crate::{
    app::{
        args::CurveOptions,
        cli::{ansi, open_output, resolve_fit_params},
        Config,
    },
    error::RuntimeError,
    report::write_curves,
};
use base::error::MetaliorError;

/// Exports the reflectance curves of one preset.
pub fn curve(opts: CurveOptions, config: Config, quiet: bool) -> Result<(), MetaliorError> {
    let table = config.load_presets(opts.search.presets.as_deref())?;
    let preset = table.find(&opts.name).ok_or_else(|| {
        MetaliorError::new(
            "Failed to export curves",
            Some(Box::new(RuntimeError::UnknownPreset(opts.name.clone()))),
        )
    })?;
    let fit_err = |err: fit::FitError| {
        MetaliorError::new(
            format!("Failed to compute the curves of {}", preset.name),
            Some(Box::new(RuntimeError::from(err))),
        )
    };

    let ior = match opts.fixed_ior {
        Some(ior) => ior,
        None => {
            let params = resolve_fit_params(&opts.search, &config);
            fit::fit_ior(&preset.ior, &params).map_err(fit_err)?.ior
        },
    };
    let curves = fit::sample_curves(&preset.ior, ior, opts.divisions).map_err(fit_err)?;
    log::info!(
        "{}: IOR = {}, dense RMSE = {} (reference {})",
        preset.name,
        ior,
        curves.production_rmse,
        curves.reference_rmse
    );

    let writer = open_output(opts.output.as_deref(), &config)?;
    write_curves(writer, &curves).map_err(|err| {
        MetaliorError::new(
            "Failed to write the curves",
            Some(Box::new(RuntimeError::from(err))),
        )
    })?;

    if !quiet && opts.output.is_some() {
        println!(
            "  {} {} with IOR {:.3}: RMSE = {:.6} (reference {:.6}) over {} samples",
            ansi::CYAN_CHECK,
            preset.name,
            ior,
            curves.production_rmse,
            curves.reference_rmse,
            curves.samples.len(),
        );
    }
    Ok(())
}
