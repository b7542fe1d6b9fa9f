//! Error types for the dw-watcher crate.

use camino::Utf8PathBuf;

/// Errors that can occur while watching a source tree.
///
/// # Error Recovery Strategy
///
/// - **Notify errors** ([`WatchError::Notify`]): Fatal - the watch cannot run
/// - **Bad root** ([`WatchError::PathNotFound`], [`WatchError::NotADirectory`]):
///   Fatal - reported before any thread is spawned
/// - **Watcher task** ([`WatchError::TaskFailed`]): Fatal - the blocking task panicked
/// - **Non-UTF-8 path** ([`WatchError::NonUtf8Path`]): Recoverable - one event is skipped
/// - **I/O errors** ([`WatchError::Io`]): Fatal - the root could not be resolved
///
/// # Examples
///
/// ```
/// use dw_watcher::WatchError;
///
/// fn describe(err: &WatchError) -> String {
///     match err.path() {
///         Some(root) => format!("cannot watch {root}: {err}"),
///         None => err.to_string(),
///     }
/// }
/// ```
#[derive(Debug, thiserror::Error)]
pub enum WatchError {
    /// Failed to initialize or operate the notify watcher.
    #[error("notify watcher error: {0}")]
    Notify(#[from] notify::Error),

    /// The root to watch does not exist.
    #[error("path does not exist: {0}")]
    PathNotFound(Utf8PathBuf),

    /// The root to watch is a file.
    #[error("not a directory: {0}")]
    NotADirectory(Utf8PathBuf),

    /// The blocking watcher task ended abnormally.
    #[error("watcher task failed: {0}")]
    TaskFailed(String),

    /// A path is not valid UTF-8.
    #[error("path is not valid UTF-8: {}", _0.display())]
    NonUtf8Path(std::path::PathBuf),

    /// The root could not be canonicalized.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl WatchError {
    /// Creates a new [`WatchError::PathNotFound`] error.
    #[inline]
    pub fn path_not_found(path: impl Into<Utf8PathBuf>) -> Self {
        Self::PathNotFound(path.into())
    }

    /// Creates a new [`WatchError::NotADirectory`] error.
    #[inline]
    pub fn not_a_directory(path: impl Into<Utf8PathBuf>) -> Self {
        Self::NotADirectory(path.into())
    }

    /// Returns `true` if watching can continue after this error.
    #[inline]
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::NonUtf8Path(_))
    }

    /// Returns `true` if this error is fatal (watching should stop).
    #[inline]
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        !self.is_recoverable()
    }

    /// Returns the root path associated with this error, if any.
    #[must_use]
    pub fn path(&self) -> Option<&Utf8PathBuf> {
        match self {
            Self::PathNotFound(path) | Self::NotADirectory(path) => Some(path),
            Self::Notify(_) | Self::TaskFailed(_) | Self::NonUtf8Path(_) | Self::Io(_) => None,
        }
    }
}
