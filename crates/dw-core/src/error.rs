//! Error types for the dw-core crate.
//!
//! This module provides the [`ConfigError`] type for configuration-related errors
//! that can occur across the workspace.

/// Errors that can occur during configuration loading and validation.
///
/// # Examples
///
/// ```
/// use dw_core::ConfigError;
///
/// let error = ConfigError::invalid_option("watch.channel_capacity", "must be greater than zero");
/// assert!(error.to_string().contains("watch.channel_capacity"));
/// ```
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A configuration option has an invalid value.
    #[error("invalid configuration option '{option}': {reason}")]
    InvalidOption {
        /// The name of the invalid option.
        option: String,
        /// Explanation of why the option is invalid.
        reason: String,
    },

    /// An I/O error occurred while reading configuration.
    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to parse the configuration file.
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),
}

impl ConfigError {
    /// Creates a new [`ConfigError::InvalidOption`] error.
    #[inline]
    pub fn invalid_option(option: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidOption {
            option: option.into(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_from_json() {
        let error: ConfigError = serde_json::from_str::<serde_json::Value>("{ not json")
            .unwrap_err()
            .into();
        assert!(error.to_string().starts_with("failed to parse configuration"));
    }

    #[test]
    fn test_io_error_from_missing_file() {
        let error: ConfigError = std::fs::read_to_string("/nonexistent/docwatch.json")
            .unwrap_err()
            .into();
        assert!(matches!(error, ConfigError::Io(_)));
    }

    #[test]
    fn test_invalid_option_helper() {
        let error = ConfigError::invalid_option("completion.endpoint", "must not be empty");
        let msg = error.to_string();
        assert!(msg.contains("completion.endpoint"));
        assert!(msg.contains("must not be empty"));
    }
}
