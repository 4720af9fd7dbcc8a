//! Voice session configuration
//!
//! Loaded from YAML. The path in `RVOIP_VOICE_CONFIG` overrides the built-in
//! defaults; a config that fails to load or validate falls back to defaults.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::errors::{VoiceError, VoiceResult};
use crate::logging::{parse_log_level, LoggingConfig};

/// Environment variable naming a YAML config file
pub const CONFIG_ENV_VAR: &str = "RVOIP_VOICE_CONFIG";

/// Logging section of the config file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogSettings {
    pub level: String,
    pub json: bool,
    pub file_info: bool,
    /// Trace entry and exit of every reconciliation pass
    pub reconcile_spans: bool,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
            file_info: false,
            reconcile_spans: false,
        }
    }
}

impl LogSettings {
    /// Build the subscriber configuration
    pub fn to_logging_config(&self, app_name: &str) -> VoiceResult<LoggingConfig> {
        Ok(LoggingConfig {
            level: parse_log_level(&self.level)?,
            json: self.json,
            file_info: self.file_info,
            reconcile_spans: self.reconcile_spans,
            app_name: app_name.to_string(),
        })
    }
}

/// Configuration for multi-session voice handling
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VoiceConfig {
    /// Handle `vsid`/`call_state` parameters at all
    pub enabled: bool,
    /// Transitions kept for diagnostics; 0 disables the history
    pub history_capacity: usize,
    pub logging: LogSettings,
}

impl Default for VoiceConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            history_capacity: 32,
            logging: LogSettings::default(),
        }
    }
}

impl VoiceConfig {
    pub fn from_yaml_str(yaml: &str) -> VoiceResult<Self> {
        let config: VoiceConfig = serde_yaml::from_str(yaml)
            .map_err(|e| VoiceError::config(format!("Invalid YAML: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn load_from_file(path: impl AsRef<Path>) -> VoiceResult<Self> {
        let path = path.as_ref();
        let yaml = std::fs::read_to_string(path)
            .map_err(|e| VoiceError::config(format!("Cannot read {}: {}", path.display(), e)))?;
        Self::from_yaml_str(&yaml)
    }

    /// Load from `RVOIP_VOICE_CONFIG`, falling back to defaults
    pub fn from_env_or_default() -> Self {
        match std::env::var(CONFIG_ENV_VAR) {
            Ok(path) => {
                tracing::info!("Loading voice config from: {}", path);
                match Self::load_from_file(&path) {
                    Ok(config) => config,
                    Err(e) => {
                        tracing::warn!("{}, falling back to default voice config", e);
                        Self::default()
                    }
                }
            }
            Err(_) => Self::default(),
        }
    }

    pub fn validate(&self) -> VoiceResult<()> {
        parse_log_level(&self.logging.level)?;
        Ok(())
    }

    pub fn to_yaml(&self) -> VoiceResult<String> {
        serde_yaml::to_string(self).map_err(|e| VoiceError::config(e.to_string()))
    }
}
