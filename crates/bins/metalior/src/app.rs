use crate::{app::args::CliArgs, error::RuntimeError};
use base::error::MetaliorError;
use std::io::Write;

mod args;
mod cli;
mod config;

pub use config::*;

/// Main entry point of the metalior program.
pub fn run() -> Result<(), MetaliorError> {
    use clap::Parser;

    let args = CliArgs::parse();
    let launch_time = std::time::SystemTime::now();

    setup_logging(&args, launch_time)?;
    log::info!(
        "metalior launched at {} on {}.",
        chrono::DateTime::<chrono::Utc>::from(launch_time),
        std::env::consts::OS
    );

    let config = Config::load_config(args.config.as_deref())?;

    cli::run(args.command, config, args.quiet)
}

/// Converts a verbosity level to a log filter.
pub fn log_filter_from_level(level: u8) -> log::LevelFilter {
    match level {
        0 => log::LevelFilter::Error,
        1 => log::LevelFilter::Warn,
        2 => log::LevelFilter::Info,
        3 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    }
}

/// Initialises the logger.
///
/// `--verbose` overrides the log level with 4 and `--quiet` lowers it to 0.
/// With `--log-timestamp`, every message is prefixed by the time elapsed
/// since `launch_time`.
pub fn setup_logging(
    args: &CliArgs,
    launch_time: std::time::SystemTime,
) -> Result<(), MetaliorError> {
    let log_level = if args.verbose {
        4
    } else if args.quiet {
        0
    } else {
        args.log_level
    };

    let timestamp = args.log_timestamp;
    env_logger::builder()
        .format(move |buf, record| {
            let top_level_module = record
                .module_path()
                .and_then(|path| path.split("::").next())
                .unwrap_or("?");
            if timestamp {
                let duration = launch_time.elapsed().unwrap_or_default();
                let millis = duration.as_millis() % 1000;
                let seconds = duration.as_secs() % 60;
                let minutes = (duration.as_secs() / 60) % 60;
                let hours = (duration.as_secs() / 60) / 60;
                writeln!(
                    buf,
                    "{}:{}:{}.{:03} {:5} [{}]: {}",
                    hours,
                    minutes,
                    seconds,
                    millis,
                    record.level(),
                    top_level_module,
                    record.args()
                )
            } else {
                writeln!(
                    buf,
                    "{:5} [{}]: {}",
                    record.level(),
                    top_level_module,
                    record.args()
                )
            }
        })
        .filter_level(log_filter_from_level(log_level))
        .try_init()
        .map_err(|err| {
            MetaliorError::new(
                "Failed to initialise the logger",
                Some(Box::new(RuntimeError::from(err))),
            )
        })
}
