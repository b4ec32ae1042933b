//! # Node Configuration
//!
//! - Environment variable overrides (12-factor app)
//! - YAML configuration file loading
//! - Field validation via `validator`
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `BRIDGE_RECV_PORT` | Receive TCP port | from file |
//! | `BRIDGE_UNIX_SOCKET_PATH` | Control/pool socket path | from file |
//! | `BRIDGE_READY_MARKER_PATH` | Ready-marker file path | from file |
//! | `BRIDGE_POOL_SIZE` | Send pool size | from file |
//! | `BRIDGE_LOG_LEVEL` | Log level | `info` |
//! | `BRIDGE_LOG_FORMAT` | Log format (json/pretty) | `json` |
//!
//! ## Usage
//!
//! ```rust,ignore
//! use bridge_node::config::NodeConfig;
//!
//! let config = NodeConfig::from_file(&path)?;
//! config.validate_config()?;
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use validator::Validate;

/// Configuration loading/validation errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A configuration value is invalid.
    #[error("invalid configuration: {0}")]
    Invalid(String),

    /// An environment variable could not be parsed.
    #[error("failed to parse environment variable {key}: {message}")]
    EnvParse { key: String, message: String },

    /// The configuration file could not be read or parsed.
    #[error("failed to load configuration file: {0}")]
    FileLoad(String),

    /// Field validation failed.
    #[error("validation failed: {0}")]
    Validation(String),
}

/// One channel this process hosts a chain pipeline for.
#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct ChannelConfig {
    /// The channel identifier.
    pub id: String,
    /// The batch timeout registered with the external engine, in
    /// nanoseconds.
    pub batch_timeout_ns: u64,
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    pub level: String,
    /// Log format (json, pretty).
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "json".to_string(),
        }
    }
}

/// Bridge node configuration: the channel list, send pool size, and the
/// IPC/TCP/filesystem endpoints the bootstrap coordinator dials.
#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct NodeConfig {
    /// The channel ID whose chain performs the process-wide bootstrap;
    /// must be present in `channels`.
    pub system_channel: String,

    /// Every channel this process hosts a chain for.
    #[validate(length(min = 1))]
    pub channels: Vec<ChannelConfig>,

    /// The number of send-pool connections dialed at bootstrap.
    #[validate(range(min = 1, max = 256))]
    pub pool_size: usize,

    /// The receive TCP port dialed by every chain.
    pub recv_port: u16,

    /// The control/pool Unix-domain socket path.
    pub unix_socket_path: PathBuf,

    /// The ready-marker filesystem path.
    pub ready_marker_path: PathBuf,

    /// Logging configuration.
    #[validate(nested)]
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl NodeConfig {
    /// Loads configuration from a YAML file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, ConfigError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigError::FileLoad(e.to_string()))?;
        serde_yaml::from_str(&content).map_err(|e| ConfigError::FileLoad(e.to_string()))
    }

    /// Overrides fields explicitly set via environment variables.
    pub fn merge_env(&mut self) -> Result<(), ConfigError> {
        if let Ok(port) = std::env::var("BRIDGE_RECV_PORT") {
            self.recv_port = port.parse().map_err(|_| ConfigError::EnvParse {
                key: "BRIDGE_RECV_PORT".to_string(),
                message: "invalid port".to_string(),
            })?;
        }
        if let Ok(path) = std::env::var("BRIDGE_UNIX_SOCKET_PATH") {
            self.unix_socket_path = PathBuf::from(path);
        }
        if let Ok(path) = std::env::var("BRIDGE_READY_MARKER_PATH") {
            self.ready_marker_path = PathBuf::from(path);
        }
        if let Ok(size) = std::env::var("BRIDGE_POOL_SIZE") {
            self.pool_size = size.parse().map_err(|_| ConfigError::EnvParse {
                key: "BRIDGE_POOL_SIZE".to_string(),
                message: "invalid pool size".to_string(),
            })?;
        }
        if let Ok(level) = std::env::var("BRIDGE_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(format) = std::env::var("BRIDGE_LOG_FORMAT") {
            self.logging.format = format;
        }
        Ok(())
    }

    /// Validates field constraints plus the cross-field invariants
    /// `validator` cannot express.
    pub fn validate_config(&self) -> Result<(), ConfigError> {
        self.validate()
            .map_err(|e| ConfigError::Validation(e.to_string()))?;

        if !self.channels.iter().any(|c| c.id == self.system_channel) {
            return Err(ConfigError::Invalid(format!(
                "system_channel '{}' is not among the configured channels",
                self.system_channel
            )));
        }

        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.to_lowercase().as_str()) {
            return Err(ConfigError::Invalid(format!(
                "invalid log level '{}'. valid values: {:?}",
                self.logging.level, valid_levels
            )));
        }

        let valid_formats = ["json", "pretty"];
        if !valid_formats.contains(&self.logging.format.to_lowercase().as_str()) {
            return Err(ConfigError::Invalid(format!(
                "invalid log format '{}'. valid values: {:?}",
                self.logging.format, valid_formats
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_config() -> NodeConfig {
        NodeConfig {
            system_channel: "system".to_string(),
            channels: vec![ChannelConfig {
                id: "system".to_string(),
                batch_timeout_ns: 2_000_000_000,
            }],
            pool_size: 4,
            recv_port: 7051,
            unix_socket_path: PathBuf::from("/tmp/bridge.sock"),
            ready_marker_path: PathBuf::from("/tmp/bridge.ready"),
            logging: LoggingConfig::default(),
        }
    }

    #[test]
    fn valid_config_passes() {
        assert!(sample_config().validate_config().is_ok());
    }

    #[test]
    fn system_channel_must_be_configured() {
        let mut config = sample_config();
        config.system_channel = "missing".to_string();
        assert!(config.validate_config().is_err());
    }

    #[test]
    fn invalid_log_level_fails() {
        let mut config = sample_config();
        config.logging.level = "verbose".to_string();
        assert!(config.validate_config().is_err());
    }

    #[test]
    fn from_file_roundtrips_yaml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bridge.yaml");
        let config = sample_config();
        std::fs::write(&path, serde_yaml::to_string(&config).unwrap()).unwrap();

        let loaded = NodeConfig::from_file(&path).unwrap();
        assert_eq!(loaded.system_channel, config.system_channel);
        assert_eq!(loaded.recv_port, config.recv_port);
    }
}
