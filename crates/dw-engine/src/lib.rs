//! Documentation runs for docwatch.
//!
//! - [`ChangeCoordinator`]: per-path state machine for the watch service
//! - [`ArtifactSink`]: mirrored `docs/` placement of generated markdown
//! - [`document_file`] / [`document_directory`]: one-shot runs without
//!   fingerprinting
//! - [`watch`]: scan, watch and coordinate until shutdown
//!
//! # Crate Dependencies
//!
//! ```text
//! dw-engine ──► dw-client  (completion calls)
//!           ├─► dw-scanner (initial scan, directory runs)
//!           ├─► dw-watcher (file events)
//!           └─► dw-core    (registry record, fingerprint, config)
//! ```

#![deny(clippy::all)]
#![warn(missing_docs)]

pub mod coordinator;
pub mod document;
pub mod error;
pub mod service;
pub mod sink;

pub use coordinator::{ChangeCoordinator, CoordinatorStats};
pub use document::{DirectorySummary, SourceFile, document_directory, document_file, read_source};
pub use error::{ArtifactError, RunError, ServiceError};
pub use service::{resolve_root, watch};
pub use sink::ArtifactSink;
