//! Mirrored placement of documentation artifacts.
//!
//! A source at `<root>/<relative>.<ext>` is documented at
//! `<root>/<docs_dir>/<relative>.md`. The sink creates missing directories,
//! overwrites existing artifacts, and treats deleting an absent artifact as
//! success.

use std::io::ErrorKind;

use camino::{Utf8Path, Utf8PathBuf};
use dw_core::ScanConfig;

use crate::error::ArtifactError;

/// Extension given to every artifact.
const ARTIFACT_EXTENSION: &str = "md";

/// Writes and removes documentation artifacts under a root.
///
/// # Examples
///
/// ```
/// use dw_engine::ArtifactSink;
/// use camino::Utf8Path;
///
/// let sink = ArtifactSink::default();
/// let artifact = sink
///     .artifact_path(Utf8Path::new("/repo/src/util.rs"), Utf8Path::new("/repo"))
///     .unwrap();
/// assert_eq!(artifact, "/repo/docs/src/util.md");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactSink {
    docs_dir: String,
}

impl ArtifactSink {
    /// Creates a sink that places artifacts under `<root>/<docs_dir>`.
    #[must_use]
    pub fn new(docs_dir: impl Into<String>) -> Self {
        Self {
            docs_dir: docs_dir.into(),
        }
    }

    /// Creates a sink from the scan section of the configuration.
    #[must_use]
    pub fn from_config(config: &ScanConfig) -> Self {
        Self::new(config.docs_dir.clone())
    }

    /// Derives the artifact path for `source`.
    ///
    /// # Errors
    ///
    /// Returns [`ArtifactError::OutsideRoot`] when `source` is not under `root`.
    pub fn artifact_path(
        &self,
        source: &Utf8Path,
        root: &Utf8Path,
    ) -> Result<Utf8PathBuf, ArtifactError> {
        let relative = source
            .strip_prefix(root)
            .map_err(|_| ArtifactError::OutsideRoot {
                path: source.to_owned(),
                root: root.to_owned(),
            })?;

        if relative.as_str().is_empty() {
            return Err(ArtifactError::OutsideRoot {
                path: source.to_owned(),
                root: root.to_owned(),
            });
        }

        Ok(root
            .join(&self.docs_dir)
            .join(relative)
            .with_extension(ARTIFACT_EXTENSION))
    }

    /// Writes `text` as the artifact for `source`, returning where it landed.
    pub async fn write(
        &self,
        source: &Utf8Path,
        root: &Utf8Path,
        text: &str,
    ) -> Result<Utf8PathBuf, ArtifactError> {
        let artifact = self.artifact_path(source, root)?;

        if let Some(parent) = artifact.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| ArtifactError::io(parent, e))?;
        }

        tokio::fs::write(&artifact, text)
            .await
            .map_err(|e| ArtifactError::io(&artifact, e))?;

        Ok(artifact)
    }

    /// Removes the artifact for `source`.
    ///
    /// Returns `true` if a file was removed and `false` if none existed.
    pub async fn delete(&self, source: &Utf8Path, root: &Utf8Path) -> Result<bool, ArtifactError> {
        let artifact = self.artifact_path(source, root)?;

        match tokio::fs::remove_file(&artifact).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(ArtifactError::io(artifact, e)),
        }
    }
}

impl Default for ArtifactSink {
    fn default() -> Self {
        Self::from_config(&ScanConfig::default())
    }
}
