//! Configuration loading.
//!
//! Every field has a built-in default, so the tool runs without any
//! configuration file. A `telemetry-plot.toml` in the working directory
//! overrides only the keys it names.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Configuration file looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "telemetry-plot.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid value in config file {path}: {message}")]
    Invalid { path: String, message: String },
}

/// Inputs and outputs of the power telemetry report.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct PowerConfig {
    pub log_path: PathBuf,
    pub output_path: PathBuf,
}

impl Default for PowerConfig {
    fn default() -> Self {
        Self {
            log_path: PathBuf::from("log.txt"),
            output_path: PathBuf::from("power_telemetry_graph.png"),
        }
    }
}

/// Inputs and outputs of the throttler event reports.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ThrottlerConfig {
    pub log_path: PathBuf,
    pub output_path: PathBuf,
    /// Event names compared against each other.
    pub event_names: Vec<String>,
}

impl Default for ThrottlerConfig {
    fn default() -> Self {
        Self {
            log_path: PathBuf::from("update_throttler.log"),
            output_path: PathBuf::from("throttler_plot.png"),
            event_names: vec!["1".to_string(), "2".to_string()],
        }
    }
}

/// Inputs and outputs of the CSM dump report.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct CsmConfig {
    pub dump_path: PathBuf,
    pub output_path: PathBuf,
    /// Firmware timer rate used to convert timestamps to seconds.
    pub tick_hz: f64,
}

impl Default for CsmConfig {
    fn default() -> Self {
        Self {
            dump_path: PathBuf::from("csm_telemetry.bin"),
            output_path: PathBuf::from("power_telemetry_graph.png"),
            tick_hz: 1_000_000.0,
        }
    }
}

/// Chart rendering and presentation settings shared by all reports.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct OutputConfig {
    /// Open a window showing the chart after saving it.
    pub show_window: bool,
    pub width: u32,
    pub height: u32,
    /// Draw mean/min/max text under the chart.
    pub show_stats: bool,
    /// Optional JSON summary written next to the chart.
    pub summary_path: Option<PathBuf>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            show_window: true,
            width: 1200,
            height: 800,
            show_stats: true,
            summary_path: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct PlotConfig {
    pub power: PowerConfig,
    pub throttler: ThrottlerConfig,
    pub csm: CsmConfig,
    pub output: OutputConfig,
}

impl PlotConfig {
    /// Load configuration from a TOML file.
    pub fn load(config_path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(config_path).map_err(|source| ConfigError::Read {
            path: config_path.display().to_string(),
            source,
        })?;

        let config = Self::from_toml(&content).map_err(|source| ConfigError::Parse {
            path: config_path.display().to_string(),
            source,
        })?;

        config.validate().map_err(|message| ConfigError::Invalid {
            path: config_path.display().to_string(),
            message,
        })?;
        Ok(config)
    }

    /// Check values that parse but cannot produce a chart.
    pub fn validate(&self) -> Result<(), String> {
        if !(self.csm.tick_hz.is_finite() && self.csm.tick_hz > 0.0) {
            return Err(format!("csm.tick-hz must be a positive number, got {}", self.csm.tick_hz));
        }
        if self.output.width == 0 || self.output.height == 0 {
            return Err(format!(
                "output.width and output.height must be non-zero, got {}x{}",
                self.output.width, self.output.height
            ));
        }
        Ok(())
    }

    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Load `path` if it exists, otherwise fall back to the defaults.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            log::info!("Loading configuration from {}", path.display());
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_fixed_paths() {
        let config = PlotConfig::default();
        assert_eq!(config.power.log_path, PathBuf::from("log.txt"));
        assert_eq!(config.power.output_path, PathBuf::from("power_telemetry_graph.png"));
        assert_eq!(config.throttler.log_path, PathBuf::from("update_throttler.log"));
        assert_eq!(config.throttler.output_path, PathBuf::from("throttler_plot.png"));
        assert_eq!(config.throttler.event_names, vec!["1", "2"]);
        assert!(config.output.show_window);
        assert_eq!(config.output.summary_path, None);
    }

    #[test]
    fn test_partial_override() {
        let config = PlotConfig::from_toml(
            r#"
            [power]
            log-path = "captures/run1.txt"

            [output]
            show-window = false
            summary-path = "summary.json"
            "#,
        )
        .unwrap();

        assert_eq!(config.power.log_path, PathBuf::from("captures/run1.txt"));
        assert_eq!(config.power.output_path, PathBuf::from("power_telemetry_graph.png"));
        assert!(!config.output.show_window);
        assert_eq!(config.output.width, 1200);
        assert_eq!(config.output.summary_path, Some(PathBuf::from("summary.json")));
        assert_eq!(config.throttler, ThrottlerConfig::default());
    }

    #[test]
    fn test_empty_file_is_default() {
        assert_eq!(PlotConfig::from_toml("").unwrap(), PlotConfig::default());
    }

    #[test]
    fn test_load_missing_file_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let config = PlotConfig::load_or_default(&dir.path().join(CONFIG_FILE_NAME)).unwrap();
        assert_eq!(config, PlotConfig::default());
    }

    #[test]
    fn test_defaults_are_valid() {
        assert_eq!(PlotConfig::default().validate(), Ok(()));
    }

    #[test]
    fn test_load_rejects_bad_tick_rate() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        for value in ["0.0", "-1000.0", "nan", "inf"] {
            std::fs::write(&path, format!("[csm]\ntick-hz = {}\n", value)).unwrap();

            let err = PlotConfig::load(&path).unwrap_err();
            assert!(matches!(err, ConfigError::Invalid { .. }), "tick-hz = {}", value);
            assert!(err.to_string().contains("tick-hz"));
        }
    }

    #[test]
    fn test_load_rejects_zero_output_size() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "[output]\nwidth = 0\n").unwrap();

        let err = PlotConfig::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { .. }));
        assert!(err.to_string().contains("0x800"));

        std::fs::write(&path, "[output]\nheight = 0\n").unwrap();
        assert!(matches!(PlotConfig::load(&path).unwrap_err(), ConfigError::Invalid { .. }));
    }

    #[test]
    fn test_load_invalid_file_reports_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "[csm]\ntick-hz = \"fast\"\n").unwrap();

        let err = PlotConfig::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains(CONFIG_FILE_NAME));
    }
}
