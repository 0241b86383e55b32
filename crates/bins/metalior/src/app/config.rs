use crate::error::RuntimeError;
use base::{error::MetaliorError, optics::ior::PresetTable};
use fit::FitParams;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Name of the user configuration file.
pub const CONFIG_FILE_NAME: &str = "metalior.toml";

/// metalior configuration.
#[derive(Debug)]
pub struct Config {
    /// Current working directory (where the user started the program).
    /// CWD will be used in case [`UserConfig::output_dir`] is not defined.
    pub(crate) cwd: PathBuf,

    /// User-defined configuration.
    pub(crate) user: UserConfig,
}

/// Options configured by user.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserConfig {
    /// Path to the user-defined output directory.
    /// If not set, the current working directory is used.
    pub output_dir: Option<PathBuf>,

    /// Path to a CSV file replacing the built-in presets.
    pub presets: Option<PathBuf>,

    /// Parameters of the IOR search.
    pub fit: FitParams,
}

impl UserConfig {
    /// Parses a [`UserConfig`] from TOML; relative paths are resolved against
    /// `base`.
    pub fn from_toml_str(string: &str, base: &Path) -> Result<Self, RuntimeError> {
        let mut config: UserConfig = toml::from_str(string)?;
        if let Some(output_dir) = config.output_dir {
            config.output_dir = Some(canonicalize_path(base, Some(&output_dir)));
        }
        if let Some(presets) = config.presets {
            config.presets = Some(canonicalize_path(base, Some(&presets)));
        }
        Ok(config)
    }

    /// Load [`UserConfig`] from a .toml file.
    pub fn load(path: &Path) -> Result<Self, MetaliorError> {
        let base = path.parent().unwrap_or_else(|| Path::new("."));
        let string = std::fs::read_to_string(path).map_err(|err| {
            MetaliorError::from_io_error(
                err,
                format!("Failed to read user configuration file: {}", path.display()),
            )
        })?;
        let config = Self::from_toml_str(&string, base).map_err(|err| {
            MetaliorError::new(
                format!(
                    "Failed to parse user configuration file: {}",
                    path.display()
                ),
                Some(Box::new(err)),
            )
        })?;
        log::info!("    - User output directory: {:?}", config.output_dir);
        log::info!("    - User presets: {:?}", config.presets);
        log::info!("    - IOR grid: {}", config.fit.ior);
        log::info!("    - Angle divisions: {}", config.fit.angle_divisions);
        Ok(config)
    }
}

impl Config {
    /// Loads the configuration.
    ///
    /// The user configuration is read from `filepath` if given. Otherwise
    /// `metalior.toml` is looked up in the current working directory, then in
    /// the system configuration directory (`metalior/metalior.toml`). If no
    /// file is found, defaults are used.
    ///
    /// # Default configuration directory
    ///
    /// + On *nix system: "$XDG_CONFIG_HOME" or "$HOME/.config"
    ///
    /// + On windows system: `%APPDATA%` which is usually
    ///   "C:\Users\username\AppData\Roaming"
    ///
    /// + On macos system: "$HOME/Library/Application Support"
    pub fn load_config(filepath: Option<&Path>) -> Result<Self, MetaliorError> {
        log::info!("Loading configurations...");
        let sys_config_dir = dirs::config_dir().map(|dir| dir.join("metalior"));
        match &sys_config_dir {
            Some(dir) => log::info!("  - Sys configuration directory: {}", dir.display()),
            None => log::warn!("  - System configuration directory not found"),
        }

        let cwd = std::env::current_dir().map_err(|err| {
            MetaliorError::from_io_error(err, "Failed to get current working directory.")
        })?;

        let user = match filepath {
            Some(path) => {
                let path = canonicalize_path(&cwd, Some(path));
                log::info!(
                    "  Load user specified configuration from {}",
                    path.display()
                );
                UserConfig::load(&path)?
            },
            None => {
                let config_in_cwd = cwd.join(CONFIG_FILE_NAME);
                let config_in_sys = sys_config_dir
                    .as_ref()
                    .map(|dir| dir.join(CONFIG_FILE_NAME))
                    .filter(|path| path.exists());
                if config_in_cwd.exists() {
                    log::info!("  Load configuration in CWD: {}", config_in_cwd.display());
                    UserConfig::load(&config_in_cwd)?
                } else if let Some(config_in_sys) = config_in_sys {
                    log::info!("  Loading configuration from {}", config_in_sys.display());
                    UserConfig::load(&config_in_sys)?
                } else {
                    log::info!("  No configuration file found, using defaults");
                    UserConfig::default()
                }
            },
        };

        Ok(Self { cwd, user })
    }

    /// Returns the output directory.
    /// If the output directory is not set, the current working directory will
    /// be returned.
    pub fn output_dir(&self) -> &Path {
        self.user
            .output_dir
            .as_ref()
            .map_or(self.cwd.as_path(), |output_dir| output_dir.as_path())
    }

    /// Returns the search parameters of the configuration file.
    pub fn fit_params(&self) -> FitParams { self.user.fit }

    /// Returns the path of the output file, resolved against the output
    /// directory.
    pub fn resolve_output_file(&self, path: &Path) -> Result<PathBuf, MetaliorError> {
        let output_dir = self.output_dir();
        if !output_dir.is_dir() {
            return Err(MetaliorError::new(
                format!("{} is not a directory", output_dir.display()),
                Some(Box::new(RuntimeError::InvalidOutputDir)),
            ));
        }
        Ok(canonicalize_path(output_dir, Some(path)))
    }

    /// Loads the preset table.
    ///
    /// `path` (given on the command line) takes precedence over the presets
    /// file of the configuration; the built-in table is used if neither is
    /// set.
    pub fn load_presets(&self, path: Option<&Path>) -> Result<PresetTable, MetaliorError> {
        let path = path
            .map(|p| canonicalize_path(&self.cwd, Some(p)))
            .or_else(|| self.user.presets.clone());
        match path {
            Some(path) => {
                log::info!("Loading presets from {}", path.display());
                PresetTable::read_from_csv_file(&path).map_err(|err| {
                    MetaliorError::new(
                        format!("Failed to load presets from {}", path.display()),
                        Some(Box::new(RuntimeError::from(err))),
                    )
                })
            },
            None => Ok(PresetTable::builtin()),
        }
    }
}

/// Resolves the path to canonical form even if the path doesn't exist.
///
/// # Arguments
///
/// * `base` - The base path to resolve against.
/// * `path` - The path to resolve.
///
/// # Returns
///
///   1. `path` is `None`: the `base` path.
///
///   2. `path` starts with `~/` (or `~\`): the path relative to the home
///      directory.
///
///   3. `path` is relative: `path` appended to `base`.
///
///   4. `path` is absolute: `path` as is.
pub(crate) fn canonicalize_path(base: &Path, path: Option<&Path>) -> PathBuf {
    log::trace!(
        "Canonicalizing path: base={}, path={:?}",
        base.display(),
        path
    );
    const HOME: [&str; 2] = ["~/", "~\\"];
    let resolved = match path {
        None => base.to_path_buf(),
        Some(path) => {
            let in_home = HOME.iter().find_map(|prefix| {
                let stripped = path.to_str()?.strip_prefix(prefix)?;
                dirs::home_dir().map(|home| home.join(stripped))
            });
            match in_home {
                Some(resolved) => resolved,
                None if path.is_absolute() => path.to_path_buf(),
                None => base.join(path),
            }
        },
    };
    resolved
        .canonicalize()
        .unwrap_or_else(|_| normalise_path(&resolved))
}

/// Resolves the path to canonical form even if the path does not exist.
pub(crate) fn normalise_path(path: &Path) -> PathBuf {
    use std::path::Component;
    let mut ret = PathBuf::new();
    for component in path.components() {
        match component {
            Component::Prefix(..) | Component::RootDir | Component::Normal(_) => {
                ret.push(component.as_os_str());
            },
            Component::CurDir => {},
            Component::ParentDir => {
                ret.pop();
            },
        }
    }
    ret
}

#[cfg(test)]
mod tests {
    use super::*;
    use base::range::StepRangeExcl;

    #[test]
    fn test_normalise_path() {
        let path = Path::new("/a/b/c/../../d");
        let normalised = normalise_path(path);
        assert_eq!(normalised, Path::new("/a/d"));
        assert_eq!(normalise_path(Path::new("/a/./b")), Path::new("/a/b"));
    }

    #[test]
    fn relative_paths_resolve_against_base() {
        let base = Path::new("/nonexistent/metalior");
        assert_eq!(
            canonicalize_path(base, Some(Path::new("out/../report.csv"))),
            Path::new("/nonexistent/metalior/report.csv")
        );
        assert_eq!(
            canonicalize_path(base, Some(Path::new("/nonexistent/abs.csv"))),
            Path::new("/nonexistent/abs.csv")
        );
        assert_eq!(canonicalize_path(base, None), base);
    }

    #[test]
    fn user_config_defaults() {
        let config = UserConfig::from_toml_str("", Path::new("/nonexistent")).unwrap();
        assert_eq!(config, UserConfig::default());
        assert_eq!(config.fit, FitParams::default());
    }

    #[test]
    fn user_config_overrides() {
        let toml = r#"
            output_dir = "reports"
            presets = "/nonexistent/metals.csv"

            [fit]
            ior = "1.5 .. 4.0 / 0.01"
            angle_divisions = 50
        "#;
        let config = UserConfig::from_toml_str(toml, Path::new("/nonexistent/cfg")).unwrap();
        assert_eq!(
            config.output_dir.as_deref(),
            Some(Path::new("/nonexistent/cfg/reports"))
        );
        assert_eq!(
            config.presets.as_deref(),
            Some(Path::new("/nonexistent/metals.csv"))
        );
        assert_eq!(config.fit.ior, StepRangeExcl::new(1.5, 4.0, 0.01));
        assert_eq!(config.fit.angle_divisions, 50);
        assert!(config.fit.parallel);
    }

    #[test]
    fn invalid_toml_is_reported() {
        let err = UserConfig::from_toml_str("[fit]\nior = \"oops\"", Path::new("."));
        assert!(matches!(err, Err(RuntimeError::Config(_))));
    }
}
