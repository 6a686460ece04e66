//! TOML configuration: scoring parameters, dataset location, logging.

#![allow(missing_docs)]

use std::env;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::core::errors::{Result, SigError};

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "SSIG_CONFIG";

/// Full runtime configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub physical: PhysicalConfig,
    pub data: DataConfig,
    pub logging: LoggingConfig,
}

/// Parameters of the physical comfort score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicalConfig {
    pub ideal_temp_f: f64,
    pub temp_tolerance_f: f64,
    pub ideal_precip_in: f64,
    pub precip_tolerance_in: f64,
    pub temp_weight: f64,
    pub precip_weight: f64,
}

impl Default for PhysicalConfig {
    fn default() -> Self {
        Self {
            ideal_temp_f: 60.0,
            temp_tolerance_f: 30.0,
            ideal_precip_in: 35.0,
            precip_tolerance_in: 35.0,
            temp_weight: 0.6,
            precip_weight: 0.4,
        }
    }
}

impl PhysicalConfig {
    /// Reject parameter sets that cannot produce a finite score in `[0, 1]`.
    pub fn validate(&self) -> Result<()> {
        let fields = [
            ("ideal_temp_f", self.ideal_temp_f),
            ("temp_tolerance_f", self.temp_tolerance_f),
            ("ideal_precip_in", self.ideal_precip_in),
            ("precip_tolerance_in", self.precip_tolerance_in),
            ("temp_weight", self.temp_weight),
            ("precip_weight", self.precip_weight),
        ];
        if let Some((name, value)) = fields.iter().find(|(_, value)| !value.is_finite()) {
            return Err(SigError::InvalidConfig {
                details: format!("physical.{name} must be finite, got {value}"),
            });
        }
        if self.temp_tolerance_f <= 0.0 || self.precip_tolerance_in <= 0.0 {
            return Err(SigError::InvalidConfig {
                details: "physical tolerances must be positive".to_string(),
            });
        }
        if self.temp_weight < 0.0 || self.precip_weight < 0.0 {
            return Err(SigError::InvalidConfig {
                details: "physical weights must be non-negative".to_string(),
            });
        }
        if self.temp_weight + self.precip_weight <= 0.0 {
            return Err(SigError::InvalidConfig {
                details: "physical weights must not both be zero".to_string(),
            });
        }
        Ok(())
    }
}

/// Where per-state physical profiles come from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    /// External dataset (TOML or JSON). `None` uses the built-in table.
    pub path: Option<PathBuf>,
    /// Expected lowercase hex SHA-256 of the dataset file.
    pub sha256: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default tracing filter when `RUST_LOG` is unset.
    pub level: String,
    /// Append-only JSONL run log. `None` disables it.
    pub jsonl_path: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            jsonl_path: None,
        }
    }
}

impl Config {
    /// Load configuration.
    ///
    /// An explicit path must exist. Otherwise `$SSIG_CONFIG` is tried, then the
    /// per-user default location; if neither exists the defaults are used.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }
        if let Some(path) = env::var_os(CONFIG_ENV).map(PathBuf::from) {
            return Self::from_file(&path);
        }
        match default_config_path() {
            Some(path) if path.is_file() => Self::from_file(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Parse and validate a config file.
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(SigError::MissingConfig {
                path: path.to_path_buf(),
            });
        }
        let raw = std::fs::read_to_string(path).map_err(|e| SigError::io(path, e))?;
        Self::from_toml_str(&raw)
    }

    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let config: Self = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.physical.validate()?;
        if let Some(digest) = &self.data.sha256 {
            let valid = digest.len() == 64 && digest.chars().all(|c| c.is_ascii_hexdigit());
            if !valid {
                return Err(SigError::InvalidConfig {
                    details: format!("data.sha256 is not a 64-digit hex digest: {digest:?}"),
                });
            }
        }
        if self.logging.level.trim().is_empty() {
            return Err(SigError::InvalidConfig {
                details: "logging.level must not be empty".to_string(),
            });
        }
        Ok(())
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| SigError::Serialization {
            context: "toml",
            details: e.to_string(),
        })
    }
}

fn default_config_path() -> Option<PathBuf> {
    let base = env::var_os("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .or_else(|| env::var_os("HOME").map(|home| PathBuf::from(home).join(".config")))?;
    Some(base.join("ssig").join("config.toml"))
}
