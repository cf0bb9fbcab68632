//! Layered settings: built-in defaults, optional TOML file, environment

use config::{Config, Environment, File};
use proctor::ProctorConfig;
use risk::RiskConfig;
use serde::{Deserialize, Serialize};

use crate::ServiceError;

/// Service-level settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Per-frame inference budget; an expired frame yields no events
    pub frame_timeout_ms: Option<u64>,
    /// How often idle sessions are evicted (seconds)
    pub eviction_interval_secs: u64,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            frame_timeout_ms: Some(2000),
            eviction_interval_secs: 300,
            log_level: "info".to_string(),
        }
    }
}

/// All settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub analyzer: ProctorConfig,
    pub risk: RiskConfig,
    pub service: ServiceConfig,
}

impl Settings {
    /// Load settings from `path` (default `proctor.toml`, optional) and
    /// `PROCTOR__SECTION__KEY` environment variables
    pub fn load(path: Option<&str>) -> Result<Self, ServiceError> {
        let file = match path {
            Some(p) => File::with_name(p).required(true),
            None => File::with_name("proctor").required(false),
        };
        let settings: Settings = Config::builder()
            .add_source(file)
            .add_source(
                Environment::with_prefix("PROCTOR")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        settings
            .analyzer
            .validate()
            .map_err(|e| ServiceError::Config(e.to_string()))?;
        Ok(settings)
    }
}
