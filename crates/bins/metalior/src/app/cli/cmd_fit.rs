use crate::{
    app::{
        args::FitOptions,
        cli::{ansi, open_output, resolve_fit_params},
        Config,
    },
    error::RuntimeError,
    report::write_fit_report,
};
use base::error::MetaliorError;

/// Fits the IOR of the selected presets and writes the report.
pub fn fit(opts: FitOptions, config: Config, quiet: bool) -> Result<(), MetaliorError> {
    let params = resolve_fit_params(&opts.search, &config);
    let table = config.load_presets(opts.search.presets.as_deref())?;
    let table = if opts.names.is_empty() {
        table
    } else {
        table.select(&opts.names).map_err(|name| {
            MetaliorError::new(
                "Failed to select presets",
                Some(Box::new(RuntimeError::UnknownPreset(name))),
            )
        })?
    };
    // Status lines would end up in the report when it goes to stdout.
    let verbose = !quiet && opts.output.is_some();

    if verbose {
        println!(
            "  {} Fitting {}{}{} presets over IOR {} with {} angle samples",
            ansi::YELLOW_GT,
            ansi::BRIGHT_CYAN,
            table.len(),
            ansi::RESET,
            params.ior,
            params.angle_samples().len(),
        );
    }

    let start = std::time::Instant::now();
    let fits = fit::fit_presets(&table, &params).map_err(|err| {
        MetaliorError::new("Failed to fit presets", Some(Box::new(RuntimeError::from(err))))
    })?;
    let elapsed = start.elapsed();
    log::info!("Fitted {} presets in {:?}", fits.len(), elapsed);

    let writer = open_output(opts.output.as_deref(), &config)?;
    write_fit_report(writer, &fits).map_err(|err| {
        MetaliorError::new(
            "Failed to write the fit report",
            Some(Box::new(RuntimeError::from(err))),
        )
    })?;

    if verbose {
        for f in &fits {
            println!(
                "    {} {:<10} IOR = {:.3}, RMSE = {:.6} (reference {:.6})",
                ansi::CYAN_MINUS,
                f.name,
                f.fit.ior,
                f.fit.production_rmse,
                f.fit.reference_rmse,
            );
        }
        println!(
            "  {} Fitted {} presets in {}{:.3}s{}",
            ansi::CYAN_CHECK,
            fits.len(),
            ansi::BRIGHT_YELLOW,
            elapsed.as_secs_f64(),
            ansi::RESET,
        );
    }
    Ok(())
}
