use base::optics::ior::PresetFileError;
use fit::FitError;

/// Errors raised while running the program.
#[derive(Debug, thiserror::Error)]
pub enum RuntimeError {
    /// The user configuration file could not be parsed.
    #[error("configuration error: {0}")]
    Config(#[from] toml::de::Error),
    /// Reading or writing a CSV file failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    /// The preset file is invalid.
    #[error("preset file error: {0}")]
    Presets(#[from] PresetFileError),
    /// The fitter rejected its input.
    #[error(transparent)]
    Fit(#[from] FitError),
    /// The logger was already initialised.
    #[error("logger error: {0}")]
    Logger(#[from] log::SetLoggerError),
    /// A preset name given on the command line is not in the table.
    #[error("unknown preset '{0}'")]
    UnknownPreset(String),
    /// The output directory is not a directory.
    #[error("invalid output directory")]
    InvalidOutputDir,
}
