//! Limiter settings and file loading.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{LimiterError, Result};

/// Deserializable limiter settings.
///
/// Covers the numeric knobs only; strategy selection stays in code via
/// [`crate::ratelimit::LimiterOptions`]. Feed the settings to
/// [`crate::ratelimit::Limiter::from_settings`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LimiterSettings {
    /// Admissions allowed per window
    pub tries: u32,

    /// Window length in milliseconds
    pub window_ms: u64,

    /// Shortest ban in milliseconds
    #[serde(default = "default_min_wait_ms")]
    pub min_wait_ms: u64,

    /// Longest ban in milliseconds
    #[serde(default = "default_max_wait_ms")]
    pub max_wait_ms: u64,
}

impl Default for LimiterSettings {
    fn default() -> Self {
        Self {
            tries: 60,
            window_ms: 60_000,
            min_wait_ms: default_min_wait_ms(),
            max_wait_ms: default_max_wait_ms(),
        }
    }
}

fn default_min_wait_ms() -> u64 {
    200
}

fn default_max_wait_ms() -> u64 {
    1000 * 60 * 60 * 24
}

impl LimiterSettings {
    /// Load settings from a YAML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = std::fs::read_to_string(path.as_ref())
            .map_err(|e| LimiterError::Config(e.to_string()))?;
        Self::from_yaml(&contents)
    }

    /// Parse settings from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml)
            .map_err(|e| LimiterError::Config(format!("failed to parse limiter settings: {}", e)))
    }
}
