//! Error types for the dw-scanner crate.
//!
//! This module provides the [`ScanError`] type for errors that can occur
//! during directory traversal.

/// Errors that can occur during scanning operations.
///
/// # Error Recovery Strategy
///
/// - **Walker errors** ([`ScanError::Walk`]): Recoverable - the unreadable
///   subtree is skipped, the rest of the tree is still enumerated
/// - **Non-UTF-8 path** ([`ScanError::NonUtf8Path`]): Recoverable - skip the file
/// - **Config errors** ([`ScanError::Config`]): Fatal - nothing can be scanned
///
/// # Examples
///
/// ```
/// use dw_scanner::ScanError;
///
/// fn handle_error(err: ScanError) {
///     match err {
///         ScanError::Walk(e) => eprintln!("Walk error: {e}"),
///         ScanError::Config(msg) => eprintln!("Config error: {msg}"),
///         ScanError::NonUtf8Path(p) => eprintln!("Invalid path: {}", p.display()),
///     }
/// }
/// ```
#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    /// Part of the tree could not be enumerated.
    #[error("failed to walk directory: {0}")]
    Walk(#[from] ignore::Error),

    /// Invalid scanner configuration.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// A path is not valid UTF-8.
    #[error("path is not valid UTF-8: {}", _0.display())]
    NonUtf8Path(std::path::PathBuf),
}

impl ScanError {
    /// Creates a new [`ScanError::Config`] error.
    #[inline]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Returns `true` if this error is recoverable (scanning can continue).
    #[inline]
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Walk(_) | Self::NonUtf8Path(_))
    }

    /// Returns `true` if this error is fatal (scanning should stop).
    #[inline]
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        !self.is_recoverable()
    }
}
