//! Directory traversal for documentable source files.
//!
//! This module provides [`FileWalker`], which uses the `ignore` crate to
//! walk a directory tree lazily.
//!
//! # Features
//!
//! - Extension allow-list backed by the [`Language`] table
//! - Excluded directories (`node_modules`, `.git`, `target`, ...) are pruned,
//!   never descended into
//! - Optionally respects `.gitignore` and `.ignore` patterns (off by default)
//! - An unreadable directory is reported as an error item and the walk
//!   carries on with the rest of the tree
//! - Converts paths to UTF-8 [`Utf8PathBuf`](camino::Utf8PathBuf)
//!
//! # Examples
//!
//! ```no_run
//! use dw_scanner::FileWalker;
//! use camino::Utf8Path;
//!
//! let walker = FileWalker::new(Utf8Path::new("./project"))?;
//! for item in walker.walk() {
//!     match item {
//!         Ok(path) => println!("eligible: {path}"),
//!         Err(err) => eprintln!("skipped: {err}"),
//!     }
//! }
//! # Ok::<(), dw_scanner::ScanError>(())
//! ```

use std::sync::Arc;

use camino::{Utf8Path, Utf8PathBuf};
use dw_core::{Language, ScanConfig};
use ignore::WalkBuilder;

use crate::error::ScanError;

/// A file walker that discovers documentable source files.
#[derive(Debug, Clone)]
pub struct FileWalker {
    /// The root directory to walk.
    root: Utf8PathBuf,
    /// Accepted extensions, without the leading dot.
    extensions: Arc<[String]>,
    /// Directory names whose subtrees are pruned.
    skip_dirs: Arc<[String]>,
    /// Whether to follow symbolic links.
    follow_links: bool,
    /// Whether `.gitignore` / `.ignore` / hidden-file filters apply.
    respect_ignore_files: bool,
}

impl FileWalker {
    /// Creates a new file walker with the default allow-list and exclusions.
    ///
    /// # Errors
    ///
    /// Returns [`ScanError::Config`] if the root path doesn't exist or
    /// isn't a directory.
    pub fn new(root: &Utf8Path) -> Result<Self, ScanError> {
        Self::from_config(root, &ScanConfig::default())
    }

    /// Creates a walker using the scan section of the configuration.
    pub fn from_config(root: &Utf8Path, config: &ScanConfig) -> Result<Self, ScanError> {
        Self::validate_root(root)?;

        Ok(Self {
            root: root.to_owned(),
            extensions: config.file_extensions.iter().cloned().collect(),
            skip_dirs: config.excluded_dirs().map(ToOwned::to_owned).collect(),
            follow_links: config.follow_links,
            respect_ignore_files: config.respect_ignore_files,
        })
    }

    fn validate_root(root: &Utf8Path) -> Result<(), ScanError> {
        if !root.exists() {
            return Err(ScanError::config(format!(
                "root path does not exist: {root}"
            )));
        }
        if !root.is_dir() {
            return Err(ScanError::config(format!(
                "root path is not a directory: {root}"
            )));
        }
        Ok(())
    }

    /// Starts a lazy walk of the tree.
    ///
    /// Each item is either an eligible file path or a recoverable error
    /// describing a part of the tree that could not be enumerated.
    #[must_use]
    pub fn walk(&self) -> EligibleFiles {
        EligibleFiles {
            inner: self.build_walker(),
            extensions: Arc::clone(&self.extensions),
        }
    }

    /// Drains [`walk`](Self::walk), separating paths from errors.
    #[must_use]
    pub fn collect(&self) -> WalkOutcome {
        let mut outcome = WalkOutcome::default();
        for item in self.walk() {
            match item {
                Ok(path) => outcome.paths.push(path),
                Err(error) => outcome.errors.push(error),
            }
        }
        outcome
    }

    /// Builds the ignore walker with configured settings.
    fn build_walker(&self) -> ignore::Walk {
        let skip_dirs = Arc::clone(&self.skip_dirs);
        WalkBuilder::new(&self.root)
            .standard_filters(self.respect_ignore_files)
            .follow_links(self.follow_links)
            // Don't require the root to be a git repo
            .require_git(false)
            .filter_entry(move |entry| {
                let is_dir = entry.file_type().is_some_and(|ft| ft.is_dir());
                if !is_dir || entry.depth() == 0 {
                    return true;
                }
                entry
                    .file_name()
                    .to_str()
                    .is_none_or(|name| !skip_dirs.iter().any(|d| d == name))
            })
            .build()
    }

    /// Returns the root directory being walked.
    #[inline]
    #[must_use]
    pub fn root(&self) -> &Utf8Path {
        &self.root
    }
}

fn has_accepted_extension(extensions: &[String], path: &Utf8Path) -> bool {
    path.extension().is_some_and(|ext| {
        Language::from_extension(ext).is_some() && extensions.iter().any(|e| e == ext)
    })
}

/// Lazy iterator returned by [`FileWalker::walk`].
pub struct EligibleFiles {
    inner: ignore::Walk,
    extensions: Arc<[String]>,
}

impl std::fmt::Debug for EligibleFiles {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EligibleFiles")
            .field("extensions", &self.extensions)
            .finish_non_exhaustive()
    }
}

impl Iterator for EligibleFiles {
    type Item = Result<Utf8PathBuf, ScanError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let entry = match self.inner.next()? {
                Ok(entry) => entry,
                Err(error) => {
                    tracing::warn!(error = %error, "Skipping unreadable part of the tree");
                    return Some(Err(ScanError::Walk(error)));
                }
            };

            if !entry.file_type().is_some_and(|ft| ft.is_file()) {
                continue;
            }

            let Some(path) = Utf8Path::from_path(entry.path()) else {
                tracing::warn!(path = %entry.path().display(), "Skipping non-UTF-8 path");
                return Some(Err(ScanError::NonUtf8Path(entry.into_path())));
            };

            if has_accepted_extension(&self.extensions, path) {
                return Some(Ok(path.to_owned()));
            }
        }
    }
}

/// Paths and errors gathered by [`FileWalker::collect`].
#[derive(Debug, Default)]
pub struct WalkOutcome {
    /// Eligible files, in walk order.
    pub paths: Vec<Utf8PathBuf>,
    /// Recoverable errors encountered along the way.
    pub errors: Vec<ScanError>,
}
