//! Configuration structures for docwatch.
//!
//! This module provides configuration types for all components of the application:
//!
//! - [`ScanConfig`] - Eligible extensions, pruned directories, artifact directory
//! - [`WatchConfig`] - File watcher settings (debouncing, recursion)
//! - [`CompletionConfig`] - Completion service endpoint and timeout
//! - [`ServerConfig`] - Local model server executable
//! - [`Config`] - Root configuration combining all settings
//!
//! All configuration types implement [`Default`], and every struct is
//! `#[serde(default)]` so a JSON file only needs the keys it overrides.

use std::time::Duration;

use camino::Utf8Path;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::types::Language;

/// Configuration for directory scanning and artifact placement.
///
/// # Examples
///
/// ```
/// use dw_core::ScanConfig;
///
/// let config = ScanConfig::default();
/// assert_eq!(config.docs_dir, "docs");
/// assert!(config.skip_dirs.iter().any(|d| d == "node_modules"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// File extensions to process (without the leading dot).
    ///
    /// Extensions missing from the language table are ignored.
    pub file_extensions: Vec<String>,

    /// Directory names whose subtrees are never scanned or watched.
    pub skip_dirs: Vec<String>,

    /// Whether to follow symbolic links while scanning.
    pub follow_links: bool,

    /// Whether `.gitignore` / `.ignore` files and hidden-file rules narrow
    /// the initial scan.
    ///
    /// Off by default: the watcher applies only the extension and skip-dir
    /// rules, and turning this on makes the initial scan stricter than that.
    pub respect_ignore_files: bool,

    /// Name of the documentation directory created under the root.
    pub docs_dir: String,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            file_extensions: Language::extensions().map(ToOwned::to_owned).collect(),
            skip_dirs: vec![
                "node_modules".to_owned(),
                ".git".to_owned(),
                "target".to_owned(),
            ],
            follow_links: false,
            respect_ignore_files: false,
            docs_dir: "docs".to_owned(),
        }
    }
}

impl ScanConfig {
    /// Directory names pruned from scanning and watching.
    ///
    /// The configured skip list plus the artifact directory, so generated
    /// documentation is never treated as source.
    pub fn excluded_dirs(&self) -> impl Iterator<Item = &str> {
        self.skip_dirs
            .iter()
            .map(String::as_str)
            .chain(std::iter::once(self.docs_dir.as_str()))
    }
}

/// Configuration for the file watcher.
///
/// # Examples
///
/// ```
/// use dw_core::WatchConfig;
///
/// let config = WatchConfig::default();
/// assert_eq!(config.debounce_ms, 100);
/// assert!(config.recursive);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct WatchConfig {
    /// Debounce window in milliseconds.
    ///
    /// Multiple raw notifications for a path within this window produce a
    /// single event.
    pub debounce_ms: u64,

    /// Whether to watch subdirectories recursively.
    pub recursive: bool,

    /// Capacity of the channel between the watcher thread and the coordinator.
    pub channel_capacity: usize,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 100,
            recursive: true,
            channel_capacity: 100,
        }
    }
}

/// Configuration for the completion service client.
///
/// # Examples
///
/// ```
/// use dw_core::CompletionConfig;
/// use std::time::Duration;
///
/// let config = CompletionConfig::default();
/// assert_eq!(config.endpoint, "http://127.0.0.1:8080");
/// assert_eq!(config.request_timeout(), Duration::from_secs(300));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompletionConfig {
    /// Base URL of the completion service. `/completion` is appended.
    pub endpoint: String,

    /// Upper bound for a single completion call, in seconds.
    pub request_timeout_secs: u64,
}

impl CompletionConfig {
    /// Returns the request timeout as a [`Duration`].
    #[inline]
    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://127.0.0.1:8080".to_owned(),
            request_timeout_secs: 300,
        }
    }
}

/// Configuration for launching the local model server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Path to the server executable.
    pub executable: String,

    /// Value passed to the server's `-t` (thread count) flag.
    pub threads: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            executable: "./m7q5".to_owned(),
            threads: 7,
        }
    }
}

/// Root configuration for docwatch.
///
/// # Examples
///
/// ```
/// use dw_core::Config;
///
/// let config = Config::default();
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Scanner configuration.
    pub scan: ScanConfig,

    /// File watcher configuration.
    pub watch: WatchConfig,

    /// Completion service configuration.
    pub completion: CompletionConfig,

    /// Local model server configuration.
    pub server: ServerConfig,
}

impl Config {
    /// Loads and validates a configuration from a JSON file.
    ///
    /// Keys absent from the file keep their default values.
    pub fn load(path: &Utf8Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks option values that would make the service unusable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.completion.endpoint.trim().is_empty() {
            return Err(ConfigError::invalid_option(
                "completion.endpoint",
                "must not be empty",
            ));
        }
        if self.completion.request_timeout_secs == 0 {
            return Err(ConfigError::invalid_option(
                "completion.request_timeout_secs",
                "must be greater than zero",
            ));
        }
        if self.watch.channel_capacity == 0 {
            return Err(ConfigError::invalid_option(
                "watch.channel_capacity",
                "must be greater than zero",
            ));
        }
        if self.scan.docs_dir.is_empty() || self.scan.docs_dir.contains(['/', '\\']) {
            return Err(ConfigError::invalid_option(
                "scan.docs_dir",
                "must be a single directory name",
            ));
        }
        Ok(())
    }
}
