//! Configuration loading for bta-cli
//!
//! Three tiers, highest priority first:
//! 1. Command-line arguments (each with a `BTA_*` environment fallback)
//! 2. TOML config file (`--config`, or `<config dir>/bta/config.toml`)
//! 3. Built-in defaults
//!
//! A missing default config file is not an error; a missing file named
//! explicitly is.

use std::path::{Path, PathBuf};

use bta_common::{AnalysisParameters, Error, Result};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Bootstrap configuration loaded from TOML
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TomlConfig {
    /// Folder containing recording logs
    #[serde(default)]
    pub input_dir: Option<PathBuf>,

    /// Scan subfolders (default: false)
    #[serde(default)]
    pub recursive: bool,

    /// JSON report path (stdout if not specified)
    #[serde(default)]
    pub report: Option<PathBuf>,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Detector thresholds
    #[serde(default)]
    pub analysis: AnalysisParameters,

    /// Trimmed copy export
    #[serde(default)]
    pub export: ExportConfig,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

/// Trimmed copy export configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Folder for trimmed copies (export disabled if not specified)
    #[serde(default)]
    pub trim_dir: Option<PathBuf>,

    /// Samples kept either side of the shot (default: 20)
    #[serde(default = "default_trim_radius")]
    pub trim_radius: usize,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_trim_radius() -> usize {
    20
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            trim_dir: None,
            trim_radius: default_trim_radius(),
        }
    }
}

/// Platform config file location: `<config dir>/bta/config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("bta").join("config.toml"))
}

/// Read and validate one TOML config file
pub fn read_config(path: &Path) -> Result<TomlConfig> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("Read TOML failed ({}): {}", path.display(), e)))?;
    let config: TomlConfig = toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Parse TOML failed ({}): {}", path.display(), e)))?;

    config.analysis.validate()?;
    Ok(config)
}

/// Load configuration from an explicit path or the platform default
pub fn load_toml_config(explicit: Option<&Path>) -> Result<TomlConfig> {
    if let Some(path) = explicit {
        return read_config(path);
    }

    match default_config_path() {
        Some(path) if path.exists() => {
            info!("Loading configuration from {}", path.display());
            read_config(&path)
        }
        Some(path) => {
            warn!("No config file at {}, using defaults", path.display());
            Ok(TomlConfig::default())
        }
        None => {
            warn!("Could not determine config directory, using defaults");
            Ok(TomlConfig::default())
        }
    }
}

/// Values supplied on the command line
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub input_dir: Option<PathBuf>,
    pub recursive: bool,
    pub report: Option<PathBuf>,
    pub trim_dir: Option<PathBuf>,
    pub log_level: Option<String>,
}

/// Fully resolved run settings
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub input_dir: PathBuf,
    pub recursive: bool,
    pub report: Option<PathBuf>,
    pub log_level: String,
    pub analysis: AnalysisParameters,
    pub trim_dir: Option<PathBuf>,
    pub trim_radius: usize,
}

impl Settings {
    /// Merge command-line overrides over the TOML config
    pub fn resolve(overrides: Overrides, config: TomlConfig) -> Self {
        Self {
            input_dir: overrides
                .input_dir
                .or(config.input_dir)
                .unwrap_or_else(|| PathBuf::from(".")),
            recursive: overrides.recursive || config.recursive,
            report: overrides.report.or(config.report),
            log_level: overrides.log_level.unwrap_or(config.logging.level),
            analysis: config.analysis,
            trim_dir: overrides.trim_dir.or(config.export.trim_dir),
            trim_radius: config.export.trim_radius,
        }
    }
}
