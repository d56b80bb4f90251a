//! Core error types for emojigo-core.
//!
//! The engine itself has no failure modes: every command is a total function
//! over the state machine. Errors only arise at the edges, when loading
//! configuration or parsing a sample script.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for emojigo-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML serialization errors
    #[error("TOML serialization error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    /// JSON errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A sample script line could not be parsed
    #[error("Script error on line {line}: {message}")]
    Script { line: usize, message: String },
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Unknown dot-path key
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),
}

impl ConfigError {
    pub(crate) fn invalid(key: &str, message: impl Into<String>) -> Self {
        ConfigError::InvalidValue {
            key: key.to_string(),
            message: message.into(),
        }
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_converts_into_core_error() {
        let err: CoreError = ConfigError::invalid("session_secs", "must be positive").into();
        assert_eq!(
            err.to_string(),
            "Configuration error: Invalid configuration value for 'session_secs': must be positive"
        );
    }

    #[test]
    fn script_error_reports_line() {
        let err = CoreError::Script {
            line: 3,
            message: "missing label".into(),
        };
        assert_eq!(err.to_string(), "Script error on line 3: missing label");
    }
}
