//! Domain types for docwatch.
//!
//! # Module Organization
//!
//! - [`language`] - Extension-to-language lookup table
//! - [`fingerprint`] - Content digests used for change detection
//! - [`status`] - Per-path processing status
//! - [`file`] - The per-path registry record and path normalization
//!
//! All public types are re-exported here and at the crate root:
//!
//! ```
//! use dw_core::{Fingerprint, Language, ProcessingStatus, WatchedFile};
//! ```

mod file;
mod fingerprint;
mod language;
mod status;

pub use file::{RunDecision, WatchedFile, normalize_path};
pub use fingerprint::Fingerprint;
pub use language::Language;
pub use status::ProcessingStatus;
