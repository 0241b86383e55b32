use crate::app::{
    args::{SearchOptions, SubCommand},
    Config,
};
use base::error::MetaliorError;
use fit::FitParams;
use std::{io::Write, path::Path};

/// ANSI color codes.
pub mod ansi {
    pub const BRIGHT_CYAN: &str = "\u{001b}[36m";
    pub const BRIGHT_YELLOW: &str = "\u{001b}[33m";
    pub const RESET: &str = "\u{001b}[0m";

    pub const CYAN_CHECK: &str = "\u{001b}[36m✓\u{001b}[0m";

    pub const YELLOW_GT: &str = "\u{001b}[33m>\u{001b}[0m";

    pub const CYAN_MINUS: &str = "\u{001b}[36m-\u{001b}[0m";
}

mod cmd_curve;
mod cmd_fit;
mod cmd_presets;

/// Entry point of metalior CLI.
pub fn run(cmd: SubCommand, config: Config, quiet: bool) -> Result<(), MetaliorError> {
    match cmd {
        SubCommand::Fit(opts) => cmd_fit::fit(opts, config, quiet),
        SubCommand::Curve(opts) => cmd_curve::curve(opts, config, quiet),
        SubCommand::Presets(opts) => cmd_presets::list(opts, config),
    }
}

/// Search parameters of the configuration overridden by the command line.
fn resolve_fit_params(opts: &SearchOptions, config: &Config) -> FitParams {
    let mut params = config.fit_params();
    if let Some(ior) = opts.ior {
        params.ior = ior;
    }
    if let Some(divisions) = opts.angle_divisions {
        params.angle_divisions = divisions;
    }
    if opts.sequential {
        params.parallel = false;
    }
    params
}

/// Opens the output file, or stdout if no file is given.
fn open_output(
    output: Option<&Path>,
    config: &Config,
) -> Result<Box<dyn Write>, MetaliorError> {
    match output {
        Some(path) => {
            let path = config.resolve_output_file(path)?;
            log::info!("Writing to {}", path.display());
            let file = std::fs::File::create(&path).map_err(|err| {
                MetaliorError::from_io_error(
                    err,
                    format!("Failed to create output file {}", path.display()),
                )
            })?;
            Ok(Box::new(std::io::BufWriter::new(file)))
        },
        None => Ok(Box::new(std::io::stdout().lock())),
    }
}
