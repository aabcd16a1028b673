//! TOML-based analytics configuration and preset definitions.

use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::analytics::series::AnalysisParams;
use crate::space::SpaceInfo;
use crate::synthetic::SyntheticConfig;

/// Top-level configuration parsed from TOML.
///
/// All fields have defaults matching the baseline preset. Load from
/// TOML with [`AnalyticsConfig::from_toml_file`] or use
/// [`AnalyticsConfig::baseline`] for the built-in default.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AnalyticsConfig {
    /// History-view parameters.
    #[serde(default)]
    pub analysis: AnalysisParams,
    /// Spaces known to the store.
    #[serde(default = "default_spaces")]
    pub spaces: Vec<SpaceInfo>,
    /// Synthetic history used when no records file is supplied.
    #[serde(default)]
    pub synthetic: SyntheticConfig,
    /// HTTP API settings.
    #[serde(default)]
    pub server: ServerConfig,
}

/// HTTP API settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    /// TCP port to listen on.
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { port: 3000 }
    }
}

/// The three spaces every fresh installation starts with.
fn default_spaces() -> Vec<SpaceInfo> {
    vec![
        SpaceInfo {
            id: 1,
            name: "Main Open Space".to_string(),
            capacity: 20,
        },
        SpaceInfo {
            id: 2,
            name: "Meeting Room Alpha".to_string(),
            capacity: 6,
        },
        SpaceInfo {
            id: 3,
            name: "Quiet Zone".to_string(),
            capacity: 10,
        },
    ]
}

/// Configuration error with field path and constraint description.
#[derive(Debug)]
pub struct ConfigError {
    /// Dotted field path (e.g., `"analysis.window_size"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "config error: {}: {}", self.field, self.message)
    }
}

impl std::error::Error for ConfigError {}

impl AnalyticsConfig {
    /// Returns the baseline configuration: raw history, default spaces.
    pub fn baseline() -> Self {
        Self {
            analysis: AnalysisParams::default(),
            spaces: default_spaces(),
            synthetic: SyntheticConfig::default(),
            server: ServerConfig::default(),
        }
    }

    /// Returns the smoothed preset: 5-record window, outliers removed, and a
    /// synthetic history noisy enough to show both.
    pub fn smoothed() -> Self {
        Self {
            analysis: AnalysisParams {
                window_size: 5,
                remove_outliers: true,
            },
            synthetic: SyntheticConfig {
                noise_std: 2.5,
                outlier_rate: 0.01,
                ..SyntheticConfig::default()
            },
            ..Self::baseline()
        }
    }

    /// Available preset names.
    pub const PRESETS: &[&str] = &["baseline", "smoothed"];

    /// Loads a configuration from a named preset.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the preset name is unknown.
    pub fn from_preset(name: &str) -> Result<Self, ConfigError> {
        match name {
            "baseline" => Ok(Self::baseline()),
            "smoothed" => Ok(Self::smoothed()),
            _ => Err(ConfigError {
                field: "preset".to_string(),
                message: format!(
                    "unknown preset \"{name}\", available: {}",
                    Self::PRESETS.join(", ")
                ),
            }),
        }
    }

    /// Parses a configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError {
            field: "config".to_string(),
            message: format!("cannot read \"{}\": {e}", path.display()),
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses a configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid or contains unknown fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError {
            field: "toml".to_string(),
            message: e.to_string(),
        })
    }

    /// Validates all fields and returns a list of errors.
    ///
    /// Returns an empty vector if configuration is valid.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        if self.analysis.window_size == 0 {
            errors.push(ConfigError {
                field: "analysis.window_size".into(),
                message: "must be >= 1".into(),
            });
        }

        let mut seen = HashSet::new();
        for (i, space) in self.spaces.iter().enumerate() {
            if !seen.insert(space.id) {
                errors.push(ConfigError {
                    field: format!("spaces[{i}].id"),
                    message: format!("duplicate space id {}", space.id),
                });
            }
            if space.name.trim().is_empty() {
                errors.push(ConfigError {
                    field: format!("spaces[{i}].name"),
                    message: "must not be empty".into(),
                });
            }
        }

        let syn = &self.synthetic;
        if syn.days == 0 {
            errors.push(ConfigError {
                field: "synthetic.days".into(),
                message: "must be > 0".into(),
            });
        }
        if !(0.0..=1.0).contains(&syn.base_load) {
            errors.push(ConfigError {
                field: "synthetic.base_load".into(),
                message: "must be in [0.0, 1.0]".into(),
            });
        }
        if !(0.0..=1.0).contains(&syn.peak_load) {
            errors.push(ConfigError {
                field: "synthetic.peak_load".into(),
                message: "must be in [0.0, 1.0]".into(),
            });
        }
        if syn.peak_load < syn.base_load {
            errors.push(ConfigError {
                field: "synthetic.peak_load".into(),
                message: "must be >= synthetic.base_load".into(),
            });
        }
        if syn.noise_std.is_nan() || syn.noise_std < 0.0 {
            errors.push(ConfigError {
                field: "synthetic.noise_std".into(),
                message: "must be >= 0".into(),
            });
        }
        if !(0.0..=1.0).contains(&syn.outlier_rate) {
            errors.push(ConfigError {
                field: "synthetic.outlier_rate".into(),
                message: "must be in [0.0, 1.0]".into(),
            });
        }

        errors
    }
}
