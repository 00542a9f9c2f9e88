//! Core runtime configuration.
//!
//! Resolved once at startup and passed into [`crate::assessment::AssessmentService`].
//! Evaluation code never reads process-wide state.

use serde::Deserialize;
use thiserror::Error;

/// Configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid configuration JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Core configuration resolved at startup.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct CoreConfig {
    /// Use the built-in demonstration data when the provider errors or has no rows
    pub fallback_enabled: bool,
    /// Keep fallback curves in the session cache (otherwise the provider is retried)
    pub cache_fallback: bool,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            fallback_enabled: true,
            cache_fallback: false,
        }
    }
}

impl CoreConfig {
    /// Create a new `CoreConfig`.
    pub fn new(fallback_enabled: bool, cache_fallback: bool) -> Self {
        Self {
            fallback_enabled,
            cache_fallback,
        }
    }

    /// Parse from JSON. Missing keys take their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Configuration that only trusts the provider.
    pub fn live_only() -> Self {
        Self::new(false, false)
    }
}
