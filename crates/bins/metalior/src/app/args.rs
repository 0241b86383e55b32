use base::range::StepRangeExcl;
use std::path::PathBuf;

/// metalior command line interface arguments.
#[derive(clap::Parser, Debug)]
#[clap(
    author,
    version,
    about = "Fits the IOR of a metallic Fresnel approximation to the complex Fresnel of metals."
)]
pub struct CliArgs {
    /// Whether to print any information to stdout.
    #[clap(short, long, help = "Silent output printed to stdout")]
    pub quiet: bool,

    /// Whether to print verbose information to stdout.
    #[clap(short, long, help = "Use verbose output (log level = 4)")]
    pub verbose: bool,

    /// Whether to show the timestamp in the log.
    #[clap(
        long,
        help = "Show timestamp for each log message in seconds since\nprogram starts"
    )]
    pub log_timestamp: bool,

    /// Verbosity level for the log.
    #[clap(
        long,
        help = "Setting logging verbosity level (higher for more\ndetails)\n  0 - error\n  1 - \
                warn + error\n  2 - info + warn + error\n  3 - debug + info + warn + error\n  4 - \
                trace + debug + info + warn + error\n\x08",
        default_value_t = 1
    )]
    pub log_level: u8,

    /// Path to the user config file. If not specified, metalior looks for
    /// `metalior.toml` in the working directory and then in the system
    /// configuration directory.
    #[clap(short, long, help = "Path to the user config file")]
    pub config: Option<PathBuf>,

    /// Command to execute.
    #[clap(subcommand)]
    pub command: SubCommand,
}

/// metalior command.
#[derive(clap::Subcommand, Debug)]
pub enum SubCommand {
    /// Fits the IOR of every preset and writes the CSV report.
    Fit(FitOptions),

    /// Exports the reflectance curves of one preset.
    Curve(CurveOptions),

    /// Lists the metal presets.
    Presets(PresetsOptions),
}

/// Options shared by the commands that need a preset table and a search.
#[derive(clap::Args, Debug, Clone)]
pub struct SearchOptions {
    #[clap(
        long,
        help = "CSV file with the metal presets (columns: name, n_r, n_g, n_b,\nk_r, k_g, k_b). \
                Defaults to the built-in table."
    )]
    pub presets: Option<PathBuf>,

    #[clap(
        long,
        help = "Candidate IORs, formatted as \"start .. stop / step\", stop\nexcluded. [default: \
                1.001 .. 10 / 0.001]"
    )]
    pub ior: Option<StepRangeExcl>,

    #[clap(long, help = "Number of divisions of the cosine range. [default: 200]")]
    pub angle_divisions: Option<u32>,

    #[clap(long, help = "Evaluate the candidates on a single thread")]
    pub sequential: bool,
}

#[derive(clap::Args, Debug)]
#[clap(about = "Fit the IOR of the production model for each metal preset.")]
pub struct FitOptions {
    #[clap(flatten)]
    pub search: SearchOptions,

    #[clap(
        short,
        long,
        help = "Names of the presets to fit (case insensitive). All presets\nare fitted if none \
                is given.",
        num_args = 1..,
    )]
    pub names: Vec<String>,

    #[clap(
        short,
        long,
        help = "File to write the CSV report to. Relative paths are resolved\nagainst the output \
                directory. The report is printed to stdout\nif not given."
    )]
    pub output: Option<PathBuf>,
}

#[derive(clap::Args, Debug)]
#[clap(about = "Export the physical, production and reference reflectance curves of a preset.")]
pub struct CurveOptions {
    #[clap(flatten)]
    pub search: SearchOptions,

    #[clap(help = "Name of the preset (case insensitive)")]
    pub name: String,

    #[clap(
        long,
        help = "IOR of the production model. Fitted if not given.",
        conflicts_with = "ior"
    )]
    pub fixed_ior: Option<f64>,

    #[clap(
        short,
        long,
        help = "Number of divisions of the cosine range of the exported\ncurves.",
        default_value_t = fit::DEFAULT_CURVE_DIVISIONS
    )]
    pub divisions: u32,

    #[clap(
        short,
        long,
        help = "File to write the curves to. Relative paths are resolved\nagainst the output \
                directory. The curves are printed to stdout\nif not given."
    )]
    pub output: Option<PathBuf>,
}

#[derive(clap::Args, Debug)]
#[clap(about = "List the metal presets with their complex refractive index.")]
pub struct PresetsOptions {
    #[clap(
        long,
        help = "CSV file with the metal presets. Defaults to the built-in\ntable."
    )]
    pub presets: Option<PathBuf>,
}
