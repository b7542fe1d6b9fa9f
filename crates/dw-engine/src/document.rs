//! One-shot documentation runs: a single file, or a whole tree.
//!
//! Neither path consults fingerprints; every eligible file is sent to the
//! completion service. The directory run is sequential and keeps going past
//! per-file failures, collecting them into a [`DirectorySummary`].

use camino::{Utf8Path, Utf8PathBuf};
use dw_client::DocumentationClient;
use dw_core::{Fingerprint, Language, ScanConfig};
use dw_scanner::{FileWalker, ScanError};

use crate::error::{RunError, ServiceError};
use crate::sink::ArtifactSink;

/// A source file as read for one documentation run.
#[derive(Debug, Clone)]
pub struct SourceFile {
    /// Content decoded as UTF-8, with invalid sequences replaced.
    pub text: String,
    /// Language resolved from the extension.
    pub language: Language,
    /// Fingerprint of the raw bytes on disk.
    pub fingerprint: Fingerprint,
}

/// Reads a source file and resolves its language.
///
/// The language is checked first so unsupported files are never read.
/// Bytes that are not valid UTF-8 are replaced rather than rejected, so
/// files with a stray Latin-1 comment are still documented.
pub async fn read_source(path: &Utf8Path) -> Result<SourceFile, RunError> {
    let language = Language::from_path(path).ok_or_else(|| RunError::UnsupportedLanguage {
        path: path.to_owned(),
    })?;

    let bytes = tokio::fs::read(path)
        .await
        .map_err(|source| RunError::SourceRead {
            path: path.to_owned(),
            source,
        })?;

    let fingerprint = Fingerprint::of(&bytes);
    let text = match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(err) => {
            tracing::debug!(path = %path, "Source is not valid UTF-8, decoding lossily");
            String::from_utf8_lossy(err.as_bytes()).into_owned()
        }
    };

    Ok(SourceFile {
        text,
        language,
        fingerprint,
    })
}

/// Generates documentation for one file and returns it without writing.
pub async fn document_file<C>(client: &C, path: &Utf8Path) -> Result<String, RunError>
where
    C: DocumentationClient + ?Sized,
{
    let source = read_source(path).await?;
    tracing::info!(path = %path, language = %source.language, "Generating documentation");
    Ok(client.generate(&source.text, source.language).await?)
}

/// Result of [`document_directory`].
#[derive(Debug, Default)]
pub struct DirectorySummary {
    /// Artifacts written, in processing order.
    pub written: Vec<Utf8PathBuf>,
    /// Source files that produced no artifact, with the reason.
    pub failures: Vec<(Utf8PathBuf, RunError)>,
    /// Parts of the tree the walk could not enumerate.
    pub scan_errors: Vec<ScanError>,
}

impl DirectorySummary {
    /// Number of source files attempted.
    #[must_use]
    pub fn attempted(&self) -> usize {
        self.written.len() + self.failures.len()
    }

    /// Returns `true` if every attempted file was documented.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Documents every eligible file under `root`, one after another.
///
/// # Errors
///
/// Only a root that cannot be walked at all is an error; per-file problems
/// land in [`DirectorySummary::failures`].
pub async fn document_directory<C>(
    root: &Utf8Path,
    scan: &ScanConfig,
    client: &C,
) -> Result<DirectorySummary, ServiceError>
where
    C: DocumentationClient + ?Sized,
{
    let walker = FileWalker::from_config(root, scan)?;
    let outcome = tokio::task::spawn_blocking(move || walker.collect())
        .await
        .map_err(|e| ServiceError::ScanTask(e.to_string()))?;

    let sink = ArtifactSink::from_config(scan);
    let mut summary = DirectorySummary {
        scan_errors: outcome.errors,
        ..DirectorySummary::default()
    };

    tracing::info!(root = %root, files = outcome.paths.len(), "Documenting directory");

    for path in outcome.paths {
        match document_one(client, &sink, root, &path).await {
            Ok(artifact) => {
                tracing::info!(path = %path, artifact = %artifact, "Documentation written");
                summary.written.push(artifact);
            }
            Err(error) => {
                tracing::warn!(path = %path, kind = error.kind(), error = %error, "Skipping file");
                summary.failures.push((path, error));
            }
        }
    }

    Ok(summary)
}

async fn document_one<C>(
    client: &C,
    sink: &ArtifactSink,
    root: &Utf8Path,
    path: &Utf8Path,
) -> Result<Utf8PathBuf, RunError>
where
    C: DocumentationClient + ?Sized,
{
    let text = document_file(client, path).await?;
    Ok(sink.write(path, root, &text).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use dw_client::GenerateError;
    use std::sync::Mutex;
    use tempfile::TempDir;

    /// Echoes the language; fails for content containing "FAIL".
    #[derive(Default)]
    struct EchoClient {
        calls: Mutex<Vec<Language>>,
    }

    #[async_trait]
    impl DocumentationClient for EchoClient {
        async fn generate(&self, content: &str, language: Language) -> Result<String, GenerateError> {
            self.calls.lock().expect("lock").push(language);
            if content.contains("FAIL") {
                return Err(GenerateError::response_format("missing `content` field"));
            }
            Ok(format!("# {language}\n"))
        }
    }

    fn temp_root() -> (TempDir, Utf8PathBuf) {
        let dir = TempDir::new().expect("Failed to create temp directory");
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("Invalid path");
        (dir, root)
    }

    #[tokio::test]
    async fn test_read_source_rejects_unknown_extension() {
        let (_dir, root) = temp_root();
        let path = root.join("notes.txt");
        std::fs::write(&path, "hello").expect("write");

        let err = read_source(&path).await.unwrap_err();
        assert!(matches!(err, RunError::UnsupportedLanguage { .. }));
    }

    #[tokio::test]
    async fn test_read_source_missing_file() {
        let (_dir, root) = temp_root();
        let err = read_source(&root.join("gone.py")).await.unwrap_err();
        assert!(matches!(err, RunError::SourceRead { .. }));
    }

    #[tokio::test]
    async fn test_read_source_decodes_invalid_utf8_lossily() {
        let (_dir, root) = temp_root();
        let path = root.join("legacy.js");
        let bytes = b"// caf\xe9\nconst a = 1;\n";
        std::fs::write(&path, bytes).expect("write");

        let source = read_source(&path).await.expect("read");
        assert_eq!(source.language, Language::JavaScript);
        assert_eq!(source.text, "// caf\u{fffd}\nconst a = 1;\n");
        assert_eq!(source.fingerprint, Fingerprint::of(bytes));
    }

    #[tokio::test]
    async fn test_document_file_returns_text() {
        let (_dir, root) = temp_root();
        let path = root.join("Token.sol");
        std::fs::write(&path, "contract Token {}").expect("write");

        let client = EchoClient::default();
        let text = document_file(&client, &path).await.expect("document");
        assert_eq!(text, "# Solidity\n");
        assert!(!root.join("docs").exists());
    }

    #[tokio::test]
    async fn test_document_directory_continues_past_failures() {
        let (_dir, root) = temp_root();
        std::fs::create_dir_all(root.join("src")).expect("mkdir");
        std::fs::create_dir_all(root.join("node_modules/dep")).expect("mkdir");
        std::fs::write(root.join("src/app.ts"), "export const a = 1;").expect("write");
        std::fs::write(root.join("src/broken.py"), "FAIL").expect("write");
        std::fs::write(root.join("main.rs"), "fn main() {}").expect("write");
        std::fs::write(root.join("node_modules/dep/index.js"), "x").expect("write");

        let client = EchoClient::default();
        let summary = document_directory(&root, &ScanConfig::default(), &client)
            .await
            .expect("document");

        assert_eq!(summary.attempted(), 3);
        assert!(!summary.is_success());
        assert_eq!(summary.failures.len(), 1);
        assert!(summary.failures[0].0.ends_with("src/broken.py"));
        assert_eq!(
            std::fs::read_to_string(root.join("docs/src/app.md")).expect("read"),
            "# TypeScript\n"
        );
        assert!(root.join("docs/main.md").exists());
        assert!(!root.join("docs/src/broken.md").exists());
        assert!(!root.join("docs/node_modules").exists());
    }

    #[tokio::test]
    async fn test_document_directory_rejects_missing_root() {
        let client = EchoClient::default();
        let result = document_directory(
            Utf8Path::new("/nonexistent/docwatch/root"),
            &ScanConfig::default(),
            &client,
        )
        .await;
        assert!(matches!(result, Err(ServiceError::Scan(ScanError::Config(_)))));
    }
}
