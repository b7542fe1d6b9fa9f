//! Error types for the dw-engine crate.

use camino::Utf8PathBuf;
use dw_client::GenerateError;
use dw_scanner::ScanError;
use dw_watcher::WatchError;

/// Failure to place or remove a documentation artifact.
#[derive(Debug, thiserror::Error)]
pub enum ArtifactError {
    /// The source file does not live under the root it was documented for.
    #[error("{path} is outside root {root}")]
    OutsideRoot {
        /// Source path that was rejected.
        path: Utf8PathBuf,
        /// Root the artifact path was derived from.
        root: Utf8PathBuf,
    },

    /// Creating, writing or removing the artifact failed.
    #[error("failed to update artifact {path}: {source}")]
    Io {
        /// Artifact path being written or removed.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
}

impl ArtifactError {
    pub(crate) fn io(path: impl Into<Utf8PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Why a single documentation run for one path produced no artifact.
///
/// Every variant is confined to its path; none of them stop the service.
#[derive(Debug, thiserror::Error)]
pub enum RunError {
    /// The source vanished or became unreadable before it could be read.
    #[error("failed to read {path}: {source}")]
    SourceRead {
        /// Source path.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The path's extension is not in the language table.
    #[error("no known language for {path}")]
    UnsupportedLanguage {
        /// Source path.
        path: Utf8PathBuf,
    },

    /// The completion service call failed.
    #[error(transparent)]
    Generate(#[from] GenerateError),

    /// The artifact could not be written.
    #[error(transparent)]
    ArtifactWrite(#[from] ArtifactError),
}

impl RunError {
    /// Returns a short label for the failure kind, for log fields.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::SourceRead { .. } => "source_read",
            Self::UnsupportedLanguage { .. } => "unsupported_language",
            Self::Generate(GenerateError::Transport { .. }) => "transport",
            Self::Generate(GenerateError::ResponseFormat { .. }) => "response_format",
            Self::ArtifactWrite(_) => "artifact_write",
        }
    }
}

/// Failure to start or run the watch service.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// The root could not be resolved to an absolute directory.
    #[error("cannot use {path} as root: {source}")]
    Root {
        /// Root as given.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The file watcher failed.
    #[error(transparent)]
    Watch(#[from] WatchError),

    /// The initial scan could not start.
    #[error(transparent)]
    Scan(#[from] ScanError),

    /// The initial scan task panicked.
    #[error("initial scan task failed: {0}")]
    ScanTask(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_error_kinds() {
        let read = RunError::SourceRead {
            path: Utf8PathBuf::from("/repo/a.rs"),
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        };
        assert_eq!(read.kind(), "source_read");
        assert!(read.to_string().contains("/repo/a.rs"));

        let format = RunError::from(GenerateError::response_format("missing `content`"));
        assert_eq!(format.kind(), "response_format");
        assert!(format.to_string().contains("missing `content`"));
    }

    #[test]
    fn test_outside_root_display() {
        let err = ArtifactError::OutsideRoot {
            path: Utf8PathBuf::from("/elsewhere/a.py"),
            root: Utf8PathBuf::from("/repo"),
        };
        assert_eq!(err.to_string(), "/elsewhere/a.py is outside root /repo");
    }
}
