//! Source file discovery for docwatch.
//!
//! This crate finds the files an initial pass (or a one-shot directory run)
//! should document. It walks the tree lazily with the `ignore` crate,
//! pruning excluded directories such as `node_modules` and keeping only
//! files whose extension appears in the language table.
//!
//! # Example
//!
//! ```no_run
//! use dw_scanner::{FileWalker, scan};
//! use dw_core::ScanConfig;
//! use camino::Utf8Path;
//!
//! let outcome = scan(Utf8Path::new("./project"), &ScanConfig::default())?;
//! println!("{} files, {} unreadable subtrees", outcome.paths.len(), outcome.errors.len());
//! # Ok::<(), dw_scanner::ScanError>(())
//! ```
//!
//! Unreadable parts of the tree surface as recoverable [`ScanError`] items
//! rather than stopping the walk.

#![deny(clippy::all)]
#![warn(missing_docs)]

pub mod error;
pub mod walker;

pub use error::ScanError;
pub use walker::{EligibleFiles, FileWalker, WalkOutcome};

use camino::Utf8Path;
use dw_core::ScanConfig;

/// Walks `root` with `config` and collects every eligible file.
///
/// # Errors
///
/// Returns [`ScanError::Config`] when `root` is not an existing directory.
/// Errors met during the walk are returned inside [`WalkOutcome::errors`].
pub fn scan(root: &Utf8Path, config: &ScanConfig) -> Result<WalkOutcome, ScanError> {
    let walker = FileWalker::from_config(root, config)?;
    let outcome = walker.collect();
    tracing::debug!(
        root = %root,
        files = outcome.paths.len(),
        errors = outcome.errors.len(),
        "Scan complete"
    );
    Ok(outcome)
}
