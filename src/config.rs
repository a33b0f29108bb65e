//! Configuration for the diagnostic tooling
//!
//! Runtime configuration loading from JSON files, so the diagnostic binary
//! can be re-pointed without recompilation. The bridge itself carries no
//! configuration; these knobs only drive the stub-backed diagnostic run.

use std::fmt;
use std::fs;
use std::path::Path;

use log::warn;
use serde::{Deserialize, Serialize};

/// Complete diagnostic configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    /// tracing-subscriber filter directive, e.g. "debug" or
    /// "engine_bridge=trace"
    pub log_filter: LogFilter,
    pub stub: StubRunConfig,
}

/// Newtype so the filter can default independently of the section
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LogFilter(pub String);

impl Default for LogFilter {
    fn default() -> Self {
        LogFilter("info".to_string())
    }
}

/// Parameters for the stub-backed diagnostic run
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StubRunConfig {
    /// Frames the run callback executes before signalling termination
    pub max_frames: u32,
    /// Event type the diagnostic handler is registered for
    pub event_type: u32,
    /// ID flags added at registration
    pub add_id_flags: u32,
    /// ID flags removed at registration
    pub remove_id_flags: u32,
}

impl Default for StubRunConfig {
    fn default() -> Self {
        Self {
            max_frames: 3,
            event_type: 0,
            add_id_flags: u32::MAX,
            remove_id_flags: 0,
        }
    }
}

/// Errors raised while loading a configuration file
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(serde_json::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(err) => write!(f, "failed to read config file: {}", err),
            ConfigError::Parse(err) => write!(f, "failed to parse config file: {}", err),
        }
    }
}

impl std::error::Error for ConfigError {}

impl BridgeConfig {
    /// Load configuration from a JSON file.
    ///
    /// # Errors
    /// - File cannot be read
    /// - JSON does not parse into the expected structure
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(ConfigError::Io)?;
        serde_json::from_str(&contents).map_err(ConfigError::Parse)
    }

    /// Load from `path` when given, falling back to defaults (with a
    /// warning) if loading fails or no path was supplied.
    pub fn load_or_default(path: Option<&Path>) -> Self {
        match path {
            Some(path) => match Self::load_from_file(path) {
                Ok(config) => config,
                Err(err) => {
                    warn!("{}; using default configuration", err);
                    Self::default()
                }
            },
            None => Self::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = BridgeConfig::default();
        assert_eq!(config.log_filter.0, "info");
        assert_eq!(config.stub.max_frames, 3);
        assert_eq!(config.stub.add_id_flags, u32::MAX);
        assert_eq!(config.stub.remove_id_flags, 0);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config: BridgeConfig =
            serde_json::from_str(r#"{"stub": {"max_frames": 10}}"#).expect("valid JSON");
        assert_eq!(config.stub.max_frames, 10);
        assert_eq!(config.stub.event_type, 0);
        assert_eq!(config.log_filter.0, "info");
    }

    #[test]
    fn test_load_missing_file_falls_back() {
        let config = BridgeConfig::load_or_default(Some(Path::new("/nonexistent/bridge.json")));
        assert_eq!(config.stub.max_frames, 3);
    }

    #[test]
    fn test_round_trip() {
        let config = BridgeConfig::default();
        let json = serde_json::to_string(&config).expect("serializable");
        let parsed: BridgeConfig = serde_json::from_str(&json).expect("parsable");
        assert_eq!(parsed.stub.max_frames, config.stub.max_frames);
    }
}
