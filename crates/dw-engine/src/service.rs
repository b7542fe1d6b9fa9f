//! The long-running watch service.
//!
//! Starts the watcher before the initial scan so edits made while the scan
//! runs are not lost, seeds the coordinator from the scan, then hands the
//! event stream to [`ChangeCoordinator::run`].

use std::sync::Arc;

use camino::{Utf8Path, Utf8PathBuf};
use dw_client::DocumentationClient;
use dw_core::Config;
use dw_watcher::{FileWatcher, SourceFileFilter, WatchError};
use tokio_util::sync::CancellationToken;

use crate::coordinator::{ChangeCoordinator, CoordinatorStats};
use crate::error::ServiceError;
use crate::sink::ArtifactSink;

/// Resolves `root` to an absolute, symlink-free path.
///
/// Watcher events carry canonical paths, so the coordinator's root must be
/// canonical too for artifact paths to line up.
pub fn resolve_root(root: &Utf8Path) -> Result<Utf8PathBuf, ServiceError> {
    root.canonicalize_utf8().map_err(|source| ServiceError::Root {
        path: root.to_owned(),
        source,
    })
}

/// Documents `root` and keeps its documentation current until `shutdown`.
///
/// # Errors
///
/// Fails only if the root, the watcher or the initial scan cannot start.
/// Per-file failures are logged and never end the service.
pub async fn watch<C>(
    root: &Utf8Path,
    config: &Config,
    client: Arc<C>,
    shutdown: CancellationToken,
) -> Result<CoordinatorStats, ServiceError>
where
    C: DocumentationClient + ?Sized + 'static,
{
    let root = resolve_root(root)?;

    let filter = SourceFileFilter::from_config(&root, &config.scan);
    let mut watcher = FileWatcher::new(&root, &config.watch, filter).await?;
    let Some(events) = watcher.take_events() else {
        return Err(WatchError::TaskFailed("event receiver unavailable".to_owned()).into());
    };

    let scan_root = root.clone();
    let scan_config = config.scan.clone();
    let outcome = tokio::task::spawn_blocking(move || dw_scanner::scan(&scan_root, &scan_config))
        .await
        .map_err(|e| ServiceError::ScanTask(e.to_string()))??;

    for error in &outcome.errors {
        tracing::warn!(error = %error, "Initial scan skipped part of the tree");
    }

    let mut coordinator =
        ChangeCoordinator::new(root.clone(), client, ArtifactSink::from_config(&config.scan));
    let seeded = coordinator.seed(outcome.paths);
    tracing::info!(root = %root, files = seeded, "Initial scan complete, watching for changes");

    let stats = coordinator.run(events, shutdown).await;

    if let Err(error) = watcher.shutdown().await {
        tracing::warn!(error = %error, "File watcher did not stop cleanly");
    }

    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use dw_client::GenerateError;
    use dw_core::Language;
    use dw_watcher::FileFilter;
    use std::time::Duration;
    use tempfile::TempDir;

    struct FixedClient;

    #[async_trait]
    impl DocumentationClient for FixedClient {
        async fn generate(&self, _content: &str, language: Language) -> Result<String, GenerateError> {
            Ok(format!("# {language}"))
        }
    }

    #[test]
    fn test_resolve_root_missing() {
        let result = resolve_root(Utf8Path::new("/nonexistent/docwatch/root"));
        assert!(matches!(result, Err(ServiceError::Root { .. })));
    }

    #[tokio::test]
    async fn test_watch_documents_initial_scan_then_stops() {
        let dir = TempDir::new().expect("Failed to create temp directory");
        let root = Utf8Path::from_path(dir.path()).expect("Invalid path");
        std::fs::write(root.join("util.rs"), "fn a(){}").expect("write");

        let shutdown = CancellationToken::new();
        let service = tokio::spawn({
            let root = root.to_owned();
            let shutdown = shutdown.clone();
            async move { watch(&root, &Config::default(), Arc::new(FixedClient), shutdown).await }
        });

        let artifact = root.join("docs/util.md");
        for _ in 0..100 {
            if artifact.exists() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        shutdown.cancel();

        let stats = service.await.expect("join").expect("service");
        assert_eq!(std::fs::read_to_string(&artifact).expect("read"), "# Rust");
        assert!(stats.generated >= 1);
    }

    #[test]
    fn test_initial_scan_agrees_with_watch_filter() {
        let dir = TempDir::new().expect("Failed to create temp directory");
        let root = Utf8Path::from_path(dir.path()).expect("Invalid path");
        for (rel, content) in [
            (".gitignore", "dist/\n"),
            ("dist/bundle.js", "x()"),
            (".github/scripts/release.py", "pass"),
            ("node_modules/pkg/index.js", "x()"),
            ("src/lib.rs", "fn a(){}"),
        ] {
            let path = root.join(rel);
            std::fs::create_dir_all(path.parent().expect("parent")).expect("mkdir");
            std::fs::write(&path, content).expect("write");
        }

        let config = Config::default();
        let scanned = dw_scanner::scan(root, &config.scan).expect("scan").paths;
        let filter = SourceFileFilter::from_config(root, &config.scan);

        for rel in [".gitignore", "dist/bundle.js", ".github/scripts/release.py", "node_modules/pkg/index.js", "src/lib.rs"] {
            let path = root.join(rel);
            assert_eq!(
                scanned.contains(&path),
                filter.should_process(&path),
                "scan and watch disagree on {rel}"
            );
        }
        assert_eq!(scanned.len(), 3);
    }

    #[tokio::test]
    async fn test_watch_rejects_missing_root() {
        let result = watch(
            Utf8Path::new("/nonexistent/docwatch/root"),
            &Config::default(),
            Arc::new(FixedClient),
            CancellationToken::new(),
        )
        .await;
        assert!(matches!(result, Err(ServiceError::Root { .. })));
    }
}
