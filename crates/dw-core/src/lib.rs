//! Core types, errors, and configuration for docwatch.
//!
//! This crate provides the foundational types shared across the workspace:
//!
//! - [`Config`] and its sections, loadable from JSON
//! - [`ConfigError`] for configuration failures
//! - [`Language`], the static extension-to-language table
//! - [`Fingerprint`], the content digest used for change detection
//! - [`WatchedFile`] and [`ProcessingStatus`], the per-path record owned by
//!   the change coordinator
//! - Type aliases for `FxHashMap`/`FxHashSet`

#![deny(clippy::all)]
#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod hash;
pub mod types;

pub use config::{CompletionConfig, Config, ScanConfig, ServerConfig, WatchConfig};
pub use error::ConfigError;
pub use hash::{FxHashMap, FxHashSet, fx_hash_map, fx_hash_set};
pub use types::{Fingerprint, Language, ProcessingStatus, RunDecision, WatchedFile, normalize_path};
