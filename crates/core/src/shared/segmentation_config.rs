use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::constants::{
    DEFAULT_HOP_MS, DEFAULT_SEARCH_RADIUS_SEC, DEFAULT_TRIM_THRESHOLD_DB, DEFAULT_WINDOW_MS,
};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{field} must be positive and finite, got {value}")]
    NotPositive { field: &'static str, value: f64 },
    #[error("search_radius_sec must be non-negative and finite, got {0}")]
    NegativeRadius(f64),
    #[error("trim_threshold_db must be a finite dBFS value at or below 0, got {0}")]
    InvalidThreshold(f64),
    #[error("failed to parse segmentation config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Window and hop used by every energy computation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnergyWindowConfig {
    pub window_ms: f64,
    pub hop_ms: f64,
}

impl Default for EnergyWindowConfig {
    fn default() -> Self {
        Self {
            window_ms: DEFAULT_WINDOW_MS,
            hop_ms: DEFAULT_HOP_MS,
        }
    }
}

/// Tunables for one segmentation request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SegmentationConfig {
    pub search_radius_sec: f64,
    pub window_ms: f64,
    pub hop_ms: f64,
    pub trim_threshold_db: f64,
}

impl Default for SegmentationConfig {
    fn default() -> Self {
        Self {
            search_radius_sec: DEFAULT_SEARCH_RADIUS_SEC,
            window_ms: DEFAULT_WINDOW_MS,
            hop_ms: DEFAULT_HOP_MS,
            trim_threshold_db: DEFAULT_TRIM_THRESHOLD_DB,
        }
    }
}

impl SegmentationConfig {
    /// Parses and validates a JSON object. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [("window_ms", self.window_ms), ("hop_ms", self.hop_ms)] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::NotPositive { field, value });
            }
        }
        if !self.search_radius_sec.is_finite() || self.search_radius_sec < 0.0 {
            return Err(ConfigError::NegativeRadius(self.search_radius_sec));
        }
        if !self.trim_threshold_db.is_finite() || self.trim_threshold_db > 0.0 {
            return Err(ConfigError::InvalidThreshold(self.trim_threshold_db));
        }
        Ok(())
    }

    pub fn energy_window(&self) -> EnergyWindowConfig {
        EnergyWindowConfig {
            window_ms: self.window_ms,
            hop_ms: self.hop_ms,
        }
    }
}
