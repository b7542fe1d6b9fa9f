//! File filtering for watch events.
//!
//! Events are filtered in the blocking watcher thread, before they reach the
//! channel, so the change coordinator only ever sees paths it could document.
//!
//! # Examples
//!
//! ```
//! use dw_watcher::{FileFilter, SourceFileFilter};
//! use camino::Utf8Path;
//!
//! let filter = SourceFileFilter::new(Utf8Path::new("/repo"));
//!
//! assert!(filter.should_process(Utf8Path::new("/repo/src/app.ts")));
//! assert!(filter.should_process(Utf8Path::new("/repo/contracts/Token.sol")));
//!
//! // Unknown extensions and excluded subtrees are dropped
//! assert!(!filter.should_process(Utf8Path::new("/repo/docs/app.md")));
//! assert!(!filter.should_process(Utf8Path::new("/repo/node_modules/pkg/index.js")));
//! ```

use camino::{Utf8Path, Utf8PathBuf};
use dw_core::{Language, ScanConfig};
use smallvec::SmallVec;

/// A filter for determining which file events to process.
///
/// # Thread Safety
///
/// Filters must be [`Send`] and [`Sync`] because they are used from the
/// blocking watcher thread. They must also be `'static` to be moved into
/// the spawned task.
///
/// # Examples
///
/// ```
/// use dw_watcher::FileFilter;
/// use camino::Utf8Path;
///
/// struct AllFilesFilter;
///
/// impl FileFilter for AllFilesFilter {
///     fn should_process(&self, _path: &Utf8Path) -> bool {
///         true
///     }
/// }
/// ```
pub trait FileFilter: Send + Sync + 'static {
    /// Returns `true` if an event for `path` should be sent to the channel.
    fn should_process(&self, path: &Utf8Path) -> bool;

    /// Returns `true` if a removal at `path` could have taken accepted files
    /// with it.
    ///
    /// A removed directory cannot be inspected afterwards, so the watcher asks
    /// the filter whether the vanished path could have been a directory
    /// holding files it cares about. The default assumes it could not.
    fn may_contain_sources(&self, _path: &Utf8Path) -> bool {
        false
    }
}

/// A filter that accepts all files.
#[derive(Debug, Clone, Copy, Default)]
pub struct AcceptAllFilter;

impl FileFilter for AcceptAllFilter {
    #[inline]
    fn should_process(&self, _path: &Utf8Path) -> bool {
        true
    }
}

/// Accepts files the language table knows, outside excluded directories.
///
/// Directory exclusion is checked against the path relative to the watched
/// root, so a root that itself lives under e.g. `target/` still works.
#[derive(Debug, Clone)]
pub struct SourceFileFilter {
    /// Root the excluded-directory check is relative to.
    root: Utf8PathBuf,

    /// Accepted extensions (without the leading dot).
    extensions: SmallVec<[String; 8]>,

    /// Directory names whose subtrees are dropped.
    skip_dirs: SmallVec<[String; 4]>,
}

impl SourceFileFilter {
    /// Creates a filter with the default allow-list and exclusions.
    #[must_use]
    pub fn new(root: &Utf8Path) -> Self {
        Self::from_config(root, &ScanConfig::default())
    }

    /// Creates a filter from the scan section of the configuration.
    #[must_use]
    pub fn from_config(root: &Utf8Path, config: &ScanConfig) -> Self {
        Self {
            root: root.to_owned(),
            extensions: config
                .file_extensions
                .iter()
                .filter(|ext| Language::from_extension(ext).is_some())
                .cloned()
                .collect(),
            skip_dirs: config.excluded_dirs().map(ToOwned::to_owned).collect(),
        }
    }

    fn has_source_extension(&self, path: &Utf8Path) -> bool {
        path.extension()
            .is_some_and(|ext| self.extensions.iter().any(|e| e == ext))
    }

    fn is_in_skipped_dir(&self, path: &Utf8Path) -> bool {
        let relative = path.strip_prefix(&self.root).unwrap_or(path);
        // The last component is the file itself
        let Some(parent) = relative.parent() else {
            return false;
        };
        parent
            .components()
            .any(|c| self.is_skipped_name(c.as_str()))
    }

    fn is_skipped_name(&self, name: &str) -> bool {
        self.skip_dirs.iter().any(|d| d == name)
    }
}

impl FileFilter for SourceFileFilter {
    fn should_process(&self, path: &Utf8Path) -> bool {
        self.has_source_extension(path) && !self.is_in_skipped_dir(path)
    }

    fn may_contain_sources(&self, path: &Utf8Path) -> bool {
        let Ok(relative) = path.strip_prefix(&self.root) else {
            return false;
        };
        relative.components().next().is_some()
            && !self.has_source_extension(path)
            && !relative.components().any(|c| self.is_skipped_name(c.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filter() -> SourceFileFilter {
        SourceFileFilter::new(Utf8Path::new("/repo"))
    }

    #[test]
    fn test_accept_all_filter() {
        let filter = AcceptAllFilter;
        assert!(filter.should_process(Utf8Path::new("anything.txt")));
        assert!(filter.should_process(Utf8Path::new("")));
    }

    #[test]
    fn test_source_filter_accepts_table_extensions() {
        let filter = filter();
        for path in [
            "/repo/a.js",
            "/repo/a.ts",
            "/repo/lib/a.py",
            "/repo/a.sol",
            "/repo/src/main.rs",
        ] {
            assert!(filter.should_process(Utf8Path::new(path)), "{path}");
        }
    }

    #[test]
    fn test_source_filter_rejects_other_extensions() {
        let filter = filter();
        assert!(!filter.should_process(Utf8Path::new("/repo/docs/a.md")));
        assert!(!filter.should_process(Utf8Path::new("/repo/App.tsx")));
        assert!(!filter.should_process(Utf8Path::new("/repo/Makefile")));
    }

    #[test]
    fn test_source_filter_rejects_skipped_dirs() {
        let filter = filter();
        assert!(!filter.should_process(Utf8Path::new("/repo/node_modules/x/index.js")));
        assert!(!filter.should_process(Utf8Path::new("/repo/.git/hooks/pre.py")));
        assert!(!filter.should_process(Utf8Path::new("/repo/target/debug/build.rs")));
        assert!(!filter.should_process(Utf8Path::new("/repo/docs/util.rs")));
    }

    #[test]
    fn test_skip_check_is_relative_to_root() {
        let filter = SourceFileFilter::new(Utf8Path::new("/home/me/target/repo"));
        assert!(filter.should_process(Utf8Path::new("/home/me/target/repo/src/lib.rs")));
    }

    #[test]
    fn test_file_named_like_skip_dir_is_kept() {
        let config = ScanConfig {
            skip_dirs: vec!["vendor".to_owned()],
            ..ScanConfig::default()
        };
        let filter = SourceFileFilter::from_config(Utf8Path::new("/repo"), &config);
        assert!(filter.should_process(Utf8Path::new("/repo/vendor.py")));
        assert!(!filter.should_process(Utf8Path::new("/repo/vendor/lib.py")));
    }

    #[test]
    fn test_from_config_ignores_unknown_extensions() {
        let config = ScanConfig {
            file_extensions: vec!["py".to_owned(), "txt".to_owned()],
            ..ScanConfig::default()
        };
        let filter = SourceFileFilter::from_config(Utf8Path::new("/repo"), &config);
        assert!(filter.should_process(Utf8Path::new("/repo/a.py")));
        assert!(!filter.should_process(Utf8Path::new("/repo/a.txt")));
        assert!(!filter.should_process(Utf8Path::new("/repo/a.rs")));
    }

    #[test]
    fn test_removed_subtree_may_contain_sources() {
        let filter = filter();
        assert!(filter.may_contain_sources(Utf8Path::new("/repo/src")));
        assert!(filter.may_contain_sources(Utf8Path::new("/repo/src/legacy")));
        assert!(filter.may_contain_sources(Utf8Path::new("/repo/notes.txt")));
    }

    #[test]
    fn test_removed_subtree_outside_scope() {
        let filter = filter();
        // Source files are handled as files, not subtrees
        assert!(!filter.may_contain_sources(Utf8Path::new("/repo/src/main.rs")));
        assert!(!filter.may_contain_sources(Utf8Path::new("/repo")));
        assert!(!filter.may_contain_sources(Utf8Path::new("/elsewhere/src")));
        assert!(!filter.may_contain_sources(Utf8Path::new("/repo/node_modules")));
        assert!(!filter.may_contain_sources(Utf8Path::new("/repo/docs/src")));
    }

    #[test]
    fn test_accept_all_filter_assumes_no_subtrees() {
        assert!(!AcceptAllFilter.may_contain_sources(Utf8Path::new("/repo/src")));
    }
}
