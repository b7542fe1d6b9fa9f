//! Event types for file change notifications.
//!
//! # Event Flow
//!
//! ```text
//! File System Change
//!        │
//!        ▼
//! notify-debouncer-mini (100ms debounce)
//!        │
//!        ▼
//!   kind classified by path existence
//!        │
//!        ▼
//!   Sent via channel to the change coordinator
//! ```

use camino::{Utf8Path, Utf8PathBuf};

/// What happened to a path, as observed once the debounce window closed.
///
/// The debouncer folds create, modify and delete into one notification, so
/// the watcher decides the kind by checking whether the path still exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileEventKind {
    /// The file exists and its content may have changed.
    Changed,
    /// The file no longer exists.
    Removed,
}

impl FileEventKind {
    /// Classifies a path by whether it currently exists on disk.
    #[must_use]
    pub fn observe(path: &Utf8Path) -> Self {
        if path.exists() {
            Self::Changed
        } else {
            Self::Removed
        }
    }

    /// Returns a lowercase label for log lines.
    #[inline]
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Changed => "changed",
            Self::Removed => "removed",
        }
    }
}

/// A file change event with a UTF-8 path guarantee.
///
/// # Examples
///
/// ```
/// use dw_watcher::{FileEvent, FileEventKind};
/// use camino::Utf8PathBuf;
///
/// let event = FileEvent::changed(Utf8PathBuf::from("src/util.rs"));
/// assert_eq!(event.kind, FileEventKind::Changed);
/// assert_eq!(event.path.as_str(), "src/util.rs");
///
/// let gone = FileEvent::removed(Utf8PathBuf::from("src/util.rs"));
/// assert_eq!(gone.kind, FileEventKind::Removed);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEvent {
    /// The path of the file. Absolute when produced by the watcher.
    pub path: Utf8PathBuf,

    /// Whether the file changed or disappeared.
    pub kind: FileEventKind,
}

impl FileEvent {
    /// Creates an event of the given kind.
    #[inline]
    #[must_use]
    pub fn new(path: Utf8PathBuf, kind: FileEventKind) -> Self {
        Self { path, kind }
    }

    /// Creates a [`FileEventKind::Changed`] event.
    #[inline]
    #[must_use]
    pub fn changed(path: impl Into<Utf8PathBuf>) -> Self {
        Self::new(path.into(), FileEventKind::Changed)
    }

    /// Creates a [`FileEventKind::Removed`] event.
    #[inline]
    #[must_use]
    pub fn removed(path: impl Into<Utf8PathBuf>) -> Self {
        Self::new(path.into(), FileEventKind::Removed)
    }
}
