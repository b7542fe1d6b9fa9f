//! File watcher with async event streaming.
//!
//! This module provides the [`FileWatcher`] type that bridges the synchronous
//! `notify` file watching crate to the async tokio runtime.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                    Blocking Thread (spawn_blocking)             │
//! │  ┌──────────────────┐    ┌────────────────┐    ┌────────────┐  │
//! │  │ RecommendedWatcher│ -> │ Debouncer      │ -> │ Callback   │  │
//! │  │ (notify)         │    │ (100ms window) │    │ (filter +  │  │
//! │  │                  │    │                │    │  classify) │  │
//! │  └──────────────────┘    └────────────────┘    └─────┬──────┘  │
//! └──────────────────────────────────────────────────────│─────────┘
//!                                                        │
//!                                          blocking_send │
//!                                                        ▼
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                    Async Runtime (tokio)                        │
//! │  ┌──────────────────┐    ┌────────────────┐                     │
//! │  │ FileWatcher      │    │ mpsc::Receiver │ -> ChangeCoordinator│
//! │  │ (shutdown ctrl)  │    │ (events)       │                     │
//! │  └──────────────────┘    └────────────────┘                     │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

use std::time::Duration;

use camino::{Utf8Path, Utf8PathBuf};
use notify::RecursiveMode;
use notify_debouncer_mini::{DebounceEventResult, Debouncer, new_debouncer};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

use dw_core::WatchConfig;

use crate::error::WatchError;
use crate::events::{FileEvent, FileEventKind};
use crate::filter::FileFilter;

/// A file watcher that streams classified events to an async context.
///
/// # Lifecycle
///
/// 1. **Creation**: `FileWatcher::new()` validates the path, creates channels,
///    and spawns a blocking task with the notify watcher.
///
/// 2. **Event Reception**: Use `recv()` or take the receiver with
///    [`take_events`](Self::take_events). Events are already filtered.
///
/// 3. **Shutdown**: Call `shutdown()` for graceful shutdown, or simply drop
///    the watcher. Dropping sends the shutdown signal without waiting.
///
/// # Examples
///
/// ```no_run
/// use dw_watcher::{FileWatcher, SourceFileFilter};
/// use dw_core::WatchConfig;
/// use camino::Utf8Path;
///
/// # async fn example() -> Result<(), dw_watcher::WatchError> {
/// let root = Utf8Path::new("./project");
/// let mut watcher = FileWatcher::new(
///     root,
///     &WatchConfig::default(),
///     SourceFileFilter::new(root),
/// ).await?;
///
/// while let Some(event) = watcher.recv().await {
///     println!("{} {}", event.kind.label(), event.path);
/// }
/// # Ok(())
/// # }
/// ```
pub struct FileWatcher {
    /// Shutdown signal sender. `None` once shutdown has been initiated.
    shutdown_tx: Option<oneshot::Sender<()>>,

    /// Handle to the blocking watcher task.
    task_handle: Option<JoinHandle<Result<(), WatchError>>>,

    /// Event receiver for async consumption.
    event_rx: Option<mpsc::Receiver<FileEvent>>,

    /// The canonical path being watched.
    watch_path: Utf8PathBuf,
}

impl std::fmt::Debug for FileWatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileWatcher")
            .field("watch_path", &self.watch_path)
            .field("is_running", &self.is_running())
            .finish_non_exhaustive()
    }
}

impl FileWatcher {
    /// Creates a new file watcher for the specified path.
    ///
    /// The path is canonicalized; every emitted event carries an absolute
    /// path under [`watch_path`](Self::watch_path).
    ///
    /// # Errors
    ///
    /// Returns [`WatchError::PathNotFound`] if the path doesn't exist, and
    /// [`WatchError::NotADirectory`] if it is a file.
    /// Returns [`WatchError::Notify`] (from the blocking task, on shutdown)
    /// if the watcher fails to initialize.
    #[allow(clippy::unused_async)] // Async for API consistency with shutdown()
    pub async fn new<F: FileFilter>(
        path: &Utf8Path,
        config: &WatchConfig,
        filter: F,
    ) -> Result<Self, WatchError> {
        if !path.exists() {
            return Err(WatchError::path_not_found(path));
        }
        if !path.is_dir() {
            return Err(WatchError::not_a_directory(path));
        }

        let watch_path = path.canonicalize_utf8().map_err(WatchError::Io)?;

        let (event_tx, event_rx) = mpsc::channel(config.channel_capacity.max(1));
        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        let task_path = watch_path.clone();
        let debounce_ms = config.debounce_ms;
        let recursive = config.recursive;

        let task_handle = tokio::task::spawn_blocking(move || {
            run_watcher_loop(
                task_path,
                debounce_ms,
                recursive,
                event_tx,
                shutdown_rx,
                filter,
            )
        });

        Ok(Self {
            shutdown_tx: Some(shutdown_tx),
            task_handle: Some(task_handle),
            event_rx: Some(event_rx),
            watch_path,
        })
    }

    /// Receives the next file event asynchronously.
    ///
    /// Returns `None` when the watcher has been shut down, the channel is
    /// closed, or the receiver was taken with [`take_events`](Self::take_events).
    pub async fn recv(&mut self) -> Option<FileEvent> {
        match self.event_rx.as_mut() {
            Some(rx) => rx.recv().await,
            None => None,
        }
    }

    /// Takes the event receiver, leaving the watcher as a shutdown handle.
    ///
    /// The change coordinator consumes the receiver directly while the caller
    /// keeps the watcher alive and shuts it down afterwards.
    pub fn take_events(&mut self) -> Option<mpsc::Receiver<FileEvent>> {
        self.event_rx.take()
    }

    /// Returns the canonical path being watched.
    #[must_use]
    pub fn watch_path(&self) -> &Utf8Path {
        &self.watch_path
    }

    /// Returns `true` if the watcher is still running.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.shutdown_tx.is_some() && self.task_handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Gracefully shuts down the watcher.
    ///
    /// # Errors
    ///
    /// Returns an error if the watcher thread panicked or failed to start
    /// watching.
    pub async fn shutdown(mut self) -> Result<(), WatchError> {
        if let Some(tx) = self.shutdown_tx.take() {
            // Ignore error if receiver is already dropped
            let _ = tx.send(());
        }

        if let Some(handle) = self.task_handle.take() {
            match handle.await {
                Ok(result) => result?,
                Err(join_error) => return Err(WatchError::TaskFailed(join_error.to_string())),
            }
        }

        Ok(())
    }
}

impl Drop for FileWatcher {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        // Drop is sync; the task stops once it sees the signal.
    }
}

/// Converts one debounced notification into an event, or drops it.
fn classify<F: FileFilter>(raw: std::path::PathBuf, filter: &F) -> Option<FileEvent> {
    let path = match Utf8PathBuf::try_from(raw) {
        Ok(p) => p,
        Err(e) => {
            let invalid_path = e.into_path_buf();
            tracing::warn!(
                path = %invalid_path.display(),
                "Skipping non-UTF-8 path in file event"
            );
            return None;
        }
    };

    if filter.should_process(&path) {
        if path.is_dir() {
            return None;
        }
        let kind = FileEventKind::observe(&path);
        return Some(FileEvent::new(path, kind));
    }

    // A vanished directory only reports its own path
    if !path.exists() && filter.may_contain_sources(&path) {
        return Some(FileEvent::removed(path));
    }

    tracing::trace!(path = %path, "Filtered out file event");
    None
}

/// Runs the notify watcher loop in a blocking context.
#[allow(clippy::needless_pass_by_value)] // Path must be owned for the blocking task lifetime
fn run_watcher_loop<F: FileFilter>(
    path: Utf8PathBuf,
    debounce_ms: u64,
    recursive: bool,
    event_tx: mpsc::Sender<FileEvent>,
    shutdown_rx: oneshot::Receiver<()>,
    filter: F,
) -> Result<(), WatchError> {
    let timeout = Duration::from_millis(debounce_ms);

    let tx = event_tx;
    let debouncer_result: Result<Debouncer<notify::RecommendedWatcher>, notify::Error> =
        new_debouncer(timeout, move |res: DebounceEventResult| match res {
            Ok(events) => {
                for event in events {
                    let Some(file_event) = classify(event.path, &filter) else {
                        continue;
                    };

                    tracing::debug!(
                        path = %file_event.path,
                        kind = file_event.kind.label(),
                        "File event"
                    );

                    if tx.blocking_send(file_event).is_err() {
                        tracing::debug!("Event channel closed, stopping watcher");
                        break;
                    }
                }
            }
            Err(error) => tracing::warn!(error = %error, "Debouncer error"),
        });

    let mut debouncer = debouncer_result?;

    let mode = if recursive {
        RecursiveMode::Recursive
    } else {
        RecursiveMode::NonRecursive
    };

    debouncer.watcher().watch(path.as_std_path(), mode)?;

    tracing::info!(path = %path, recursive = recursive, "File watcher started");

    // Block until shutdown signal is received
    let _ = shutdown_rx.blocking_recv();

    tracing::info!(path = %path, "File watcher stopped");

    Ok(())
}
