//! Runtime configuration: data locations from the environment, stat weights from JSON.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::data::loader::DEFAULT_DATA_DIR;
use crate::data::price_table::{DEFAULT_EQUIPMENT_PRICES_FILE, DEFAULT_RULE_PRICES_FILE};

pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unable to read weights file '{}': {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("unable to parse weights: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("weight {name} must be finite and positive, got {value}")]
    InvalidWeight { name: &'static str, value: f64 },
}

/// Multipliers for the combat value. Attacks always count 2.0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatWeights {
    pub w_ws: f64,
    pub w_s: f64,
    pub w_t: f64,
    pub w_w: f64,
}

impl Default for StatWeights {
    fn default() -> Self {
        Self {
            w_ws: 1.5,
            w_s: 2.0,
            w_t: 2.0,
            w_w: 3.0,
        }
    }
}

impl StatWeights {
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("w_ws", self.w_ws),
            ("w_s", self.w_s),
            ("w_t", self.w_t),
            ("w_w", self.w_w),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::InvalidWeight { name, value });
            }
        }
        Ok(())
    }

    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        let weights: Self = serde_json::from_str(raw)?;
        weights.validate()?;
        Ok(weights)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&raw)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub data_dir: PathBuf,
    pub equipment_prices: PathBuf,
    pub rule_prices: PathBuf,
    pub weights_path: Option<PathBuf>,
    pub bind_addr: String,
}

impl AppConfig {
    /// Reads `WARVALUE_DATA_DIR`, `WARVALUE_EQUIPMENT_PRICES`, `WARVALUE_RULE_PRICES`,
    /// `WARVALUE_WEIGHTS` and `WARVALUE_BIND`.
    pub fn from_env() -> Self {
        let data_dir = env::var("WARVALUE_DATA_DIR").unwrap_or_else(|_| DEFAULT_DATA_DIR.to_string());
        Self::for_data_dir(data_dir)
    }

    /// Same as [`AppConfig::from_env`] but with an explicit data folder; price tables default
    /// to files inside it.
    pub fn for_data_dir(data_dir: impl Into<PathBuf>) -> Self {
        let data_dir = data_dir.into();
        let equipment_prices = env::var_os("WARVALUE_EQUIPMENT_PRICES")
            .map(PathBuf::from)
            .unwrap_or_else(|| data_dir.join(DEFAULT_EQUIPMENT_PRICES_FILE));
        let rule_prices = env::var_os("WARVALUE_RULE_PRICES")
            .map(PathBuf::from)
            .unwrap_or_else(|| data_dir.join(DEFAULT_RULE_PRICES_FILE));
        Self {
            data_dir,
            equipment_prices,
            rule_prices,
            weights_path: env::var_os("WARVALUE_WEIGHTS").map(PathBuf::from),
            bind_addr: env::var("WARVALUE_BIND").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string()),
        }
    }

    /// Weights from the configured file, or the defaults when none is set.
    pub fn weights(&self) -> Result<StatWeights, ConfigError> {
        match &self.weights_path {
            Some(path) => StatWeights::from_path(path),
            None => Ok(StatWeights::default()),
        }
    }
}
