//! The per-path change coordinator.
//!
//! [`ChangeCoordinator`] owns the registry of tracked files and decides, for
//! every notification, whether a documentation run starts, is folded into a
//! follow-up, or whether the path is dropped.
//!
//! # Execution model
//!
//! ```text
//!  FileEvent ──► handle_event ──► registry ──► spawn run task ─┐
//!                                    ▲                          │ read, fingerprint,
//!                                    │                          │ completion call
//!                     handle_outcome ◄── unbounded channel ◄────┘
//!                     (artifact write, fingerprint commit, follow-up)
//! ```
//!
//! All registry mutations and artifact writes/deletes happen on the task that
//! drives the coordinator, so no locks are needed and an artifact can never
//! be written for a path after its removal was handled. Runs for different
//! paths execute concurrently; a path never has more than one run in flight,
//! even across remove and re-create.

use std::fmt;
use std::sync::Arc;

use camino::{Utf8Path, Utf8PathBuf};
use dw_client::DocumentationClient;
use dw_core::{
    Fingerprint, FxHashMap, FxHashSet, Language, ProcessingStatus, RunDecision, WatchedFile,
    fx_hash_map, fx_hash_set, normalize_path,
};
use dw_watcher::{FileEvent, FileEventKind};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::document::read_source;
use crate::error::RunError;
use crate::sink::ArtifactSink;

/// What a run task found.
#[derive(Debug)]
enum RunResult {
    /// Content matches the last documented fingerprint.
    Unchanged,
    /// The completion service produced text for new content.
    Generated { fingerprint: Fingerprint, text: String },
    /// Reading or generating failed.
    Failed(RunError),
}

/// Message a run task sends back to the coordinator.
#[derive(Debug)]
struct RunOutcome {
    path: Utf8PathBuf,
    epoch: u64,
    result: RunResult,
}

/// Counters describing what the coordinator has done.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CoordinatorStats {
    /// Runs spawned, including follow-ups.
    pub runs_started: u64,
    /// Runs that ended with an artifact written.
    pub generated: u64,
    /// Runs skipped because content matched the last fingerprint.
    pub unchanged: u64,
    /// Runs that failed to read, generate or write.
    pub failed: u64,
    /// Results thrown away because their path was removed mid-run.
    pub discarded: u64,
    /// Artifacts deleted after their source was removed.
    pub artifacts_removed: u64,
}

impl fmt::Display for CoordinatorStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} runs ({} generated, {} unchanged, {} failed, {} discarded), {} artifacts removed",
            self.runs_started,
            self.generated,
            self.unchanged,
            self.failed,
            self.discarded,
            self.artifacts_removed
        )
    }
}

/// Tracks every source path and drives documentation runs for it.
///
/// # Examples
///
/// ```no_run
/// use std::sync::Arc;
/// use dw_client::CompletionClient;
/// use dw_core::CompletionConfig;
/// use dw_engine::{ArtifactSink, ChangeCoordinator};
/// use dw_watcher::FileEvent;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = Arc::new(CompletionClient::new(&CompletionConfig::default())?);
/// let mut coordinator = ChangeCoordinator::new("/repo", client, ArtifactSink::default());
///
/// coordinator.handle_event(FileEvent::changed("/repo/util.rs")).await;
/// coordinator.drain().await;
/// assert!(coordinator.last_processed("util.rs".as_ref()).is_some());
/// # Ok(())
/// # }
/// ```
pub struct ChangeCoordinator<C: ?Sized> {
    root: Utf8PathBuf,
    client: Arc<C>,
    sink: ArtifactSink,

    /// One entry per tracked path, keyed by normalized absolute path.
    registry: FxHashMap<Utf8PathBuf, WatchedFile>,

    /// Paths removed while their run was still in flight.
    orphaned: FxHashSet<Utf8PathBuf>,

    next_epoch: u64,
    in_flight: usize,

    /// Cleared on shutdown so draining does not start new work.
    follow_ups: bool,

    outcome_tx: mpsc::UnboundedSender<RunOutcome>,
    outcome_rx: mpsc::UnboundedReceiver<RunOutcome>,

    stats: CoordinatorStats,
}

impl<C: ?Sized> fmt::Debug for ChangeCoordinator<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChangeCoordinator")
            .field("root", &self.root)
            .field("tracked", &self.registry.len())
            .field("orphaned", &self.orphaned.len())
            .field("in_flight", &self.in_flight)
            .field("stats", &self.stats)
            .finish_non_exhaustive()
    }
}

impl<C> ChangeCoordinator<C>
where
    C: DocumentationClient + ?Sized + 'static,
{
    /// Creates a coordinator with an empty registry.
    ///
    /// `root` should be absolute; relative event paths are resolved against it.
    pub fn new(root: impl Into<Utf8PathBuf>, client: Arc<C>, sink: ArtifactSink) -> Self {
        let (outcome_tx, outcome_rx) = mpsc::unbounded_channel();
        Self {
            root: root.into(),
            client,
            sink,
            registry: fx_hash_map(),
            orphaned: fx_hash_set(),
            next_epoch: 0,
            in_flight: 0,
            follow_ups: true,
            outcome_tx,
            outcome_rx,
            stats: CoordinatorStats::default(),
        }
    }

    /// Returns the root artifacts are derived from.
    #[must_use]
    pub fn root(&self) -> &Utf8Path {
        &self.root
    }

    /// Returns the counters accumulated so far.
    #[must_use]
    pub const fn stats(&self) -> CoordinatorStats {
        self.stats
    }

    /// Number of run tasks whose outcome has not been handled yet.
    #[must_use]
    pub const fn in_flight(&self) -> usize {
        self.in_flight
    }

    /// Number of tracked paths.
    #[must_use]
    pub fn tracked(&self) -> usize {
        self.registry.len()
    }

    /// Returns the registry entry for `path`, if tracked.
    #[must_use]
    pub fn entry(&self, path: &Utf8Path) -> Option<&WatchedFile> {
        self.registry.get(&normalize_path(&self.root, path))
    }

    /// Returns `true` if `path` has a registry entry.
    #[must_use]
    pub fn is_tracked(&self, path: &Utf8Path) -> bool {
        self.entry(path).is_some()
    }

    /// Returns the processing status of `path`, if tracked.
    #[must_use]
    pub fn status(&self, path: &Utf8Path) -> Option<ProcessingStatus> {
        self.entry(path).map(|entry| entry.status)
    }

    /// Returns the fingerprint of the last documented content of `path`.
    #[must_use]
    pub fn last_processed(&self, path: &Utf8Path) -> Option<Fingerprint> {
        self.entry(path).and_then(|entry| entry.last_processed)
    }

    /// Feeds the initial scan into the coordinator.
    ///
    /// Each path is treated like a change notification. Returns how many
    /// paths were seeded.
    pub fn seed<I>(&mut self, paths: I) -> usize
    where
        I: IntoIterator<Item = Utf8PathBuf>,
    {
        let mut seeded = 0;
        for path in paths {
            let path = normalize_path(&self.root, &path);
            self.note_changed(path);
            seeded += 1;
        }
        tracing::debug!(seeded, "Seeded registry from initial scan");
        seeded
    }

    /// Applies one file-system notification.
    pub async fn handle_event(&mut self, event: FileEvent) {
        let path = normalize_path(&self.root, &event.path);
        match event.kind {
            FileEventKind::Changed => self.note_changed(path),
            FileEventKind::Removed => self.note_removed(path).await,
        }
    }

    /// Waits for the next run to report back and applies its outcome.
    ///
    /// Returns `false` without waiting when nothing is in flight.
    pub async fn next_outcome(&mut self) -> bool {
        if self.in_flight == 0 {
            return false;
        }
        match self.outcome_rx.recv().await {
            Some(outcome) => {
                self.handle_outcome(outcome).await;
                true
            }
            // The coordinator holds a sender, so the channel cannot close
            None => false,
        }
    }

    /// Handles outcomes until no run is in flight, follow-ups included.
    pub async fn drain(&mut self) {
        while self.next_outcome().await {}
    }

    /// Drives the coordinator until `shutdown` fires or `events` closes.
    ///
    /// In-flight runs are allowed to finish afterwards and their results are
    /// still committed, but no follow-up runs are started.
    pub async fn run(
        mut self,
        mut events: mpsc::Receiver<FileEvent>,
        shutdown: CancellationToken,
    ) -> CoordinatorStats {
        tracing::info!(root = %self.root, tracked = self.registry.len(), "Coordinator started");

        loop {
            tokio::select! {
                () = shutdown.cancelled() => {
                    tracing::info!("Shutdown requested");
                    break;
                }
                Some(outcome) = self.outcome_rx.recv() => {
                    self.handle_outcome(outcome).await;
                }
                event = events.recv() => match event {
                    Some(event) => self.handle_event(event).await,
                    None => {
                        tracing::info!("Event stream closed");
                        break;
                    }
                },
            }
        }

        self.follow_ups = false;
        if self.in_flight > 0 {
            tracing::info!(in_flight = self.in_flight, "Waiting for in-flight runs");
        }
        self.drain().await;

        tracing::info!(stats = %self.stats, "Coordinator stopped");
        self.stats
    }

    fn note_changed(&mut self, path: Utf8PathBuf) {
        if let Some(entry) = self.registry.get_mut(&path) {
            match entry.note_change() {
                RunDecision::Start => self.start_run(&path),
                RunDecision::Coalesced => {
                    tracing::debug!(path = %path, "Run in flight, follow-up scheduled");
                }
            }
            return;
        }

        let epoch = self.next_epoch;
        self.next_epoch += 1;
        let mut entry = WatchedFile::new(path.clone(), self.root.clone(), epoch);

        if self.orphaned.contains(&path) {
            // The previous incarnation's run must resolve first
            entry.hold_pending();
            self.registry.insert(path.clone(), entry);
            tracing::debug!(path = %path, "Re-created while a run is in flight, waiting");
            return;
        }

        entry.note_change();
        self.registry.insert(path.clone(), entry);
        self.start_run(&path);
    }

    async fn note_removed(&mut self, path: Utf8PathBuf) {
        if Language::from_path(&path).is_some() || self.registry.contains_key(&path) {
            self.remove_file(path).await;
            return;
        }

        // Not a source file, so possibly a directory that took files with it
        let nested: Vec<Utf8PathBuf> = self
            .registry
            .keys()
            .filter(|tracked| tracked.starts_with(&path))
            .cloned()
            .collect();
        if !nested.is_empty() {
            tracing::debug!(path = %path, files = nested.len(), "Directory removed");
        }
        for file in nested {
            self.remove_file(file).await;
        }
    }

    async fn remove_file(&mut self, path: Utf8PathBuf) {
        if let Some(entry) = self.registry.remove(&path) {
            if entry.status.is_processing() {
                self.orphaned.insert(path.clone());
            }
            tracing::debug!(path = %path, status = entry.status.label(), "Stopped tracking");
        }

        match self.sink.delete(&path, &self.root).await {
            Ok(true) => {
                self.stats.artifacts_removed += 1;
                tracing::info!(path = %path, "Documentation removed");
            }
            Ok(false) => {}
            Err(error) => {
                tracing::warn!(path = %path, error = %error, "Failed to remove documentation (non-fatal)");
            }
        }
    }

    fn start_run(&mut self, path: &Utf8Path) {
        let Some(entry) = self.registry.get(path) else {
            return;
        };

        let client = Arc::clone(&self.client);
        let tx = self.outcome_tx.clone();
        let path = entry.path.clone();
        let epoch = entry.epoch;
        let last_processed = entry.last_processed;

        self.in_flight += 1;
        self.stats.runs_started += 1;
        tracing::debug!(path = %path, epoch, "Run started");

        tokio::spawn(async move {
            let result = perform_run(client.as_ref(), &path, last_processed).await;
            // Fails only once the coordinator is gone, when nobody needs the result
            let _ = tx.send(RunOutcome {
                path,
                epoch,
                result,
            });
        });
    }

    async fn handle_outcome(&mut self, outcome: RunOutcome) {
        self.in_flight = self.in_flight.saturating_sub(1);
        let RunOutcome {
            path,
            epoch,
            result,
        } = outcome;

        if self.orphaned.remove(&path) {
            self.stats.discarded += 1;
            tracing::debug!(path = %path, "Discarding result for removed file");
            // A re-created entry may be waiting on this run
            self.finish(&path);
            return;
        }

        let root = match self.registry.get(&path) {
            Some(entry) if entry.epoch == epoch => entry.root.clone(),
            _ => {
                self.stats.discarded += 1;
                tracing::debug!(path = %path, epoch, "Discarding result for stale entry");
                return;
            }
        };

        let committed = match result {
            RunResult::Unchanged => {
                self.stats.unchanged += 1;
                tracing::debug!(path = %path, "Content unchanged, skipping");
                None
            }
            RunResult::Generated { fingerprint, text } => {
                match self.sink.write(&path, &root, &text).await {
                    Ok(artifact) => {
                        self.stats.generated += 1;
                        tracing::info!(
                            path = %path,
                            artifact = %artifact,
                            fingerprint = %fingerprint.short(),
                            "Documentation written"
                        );
                        Some(fingerprint)
                    }
                    Err(error) => {
                        let error = RunError::from(error);
                        self.stats.failed += 1;
                        tracing::warn!(path = %path, kind = error.kind(), error = %error, "Documentation run failed (non-fatal)");
                        None
                    }
                }
            }
            RunResult::Failed(error) => {
                self.stats.failed += 1;
                tracing::warn!(path = %path, kind = error.kind(), error = %error, "Documentation run failed (non-fatal)");
                None
            }
        };

        if let Some(fingerprint) = committed {
            if let Some(entry) = self.registry.get_mut(&path) {
                entry.last_processed = Some(fingerprint);
            }
        }

        self.finish(&path);
    }

    /// Resolves the run for `path` and starts the follow-up if one is owed.
    fn finish(&mut self, path: &Utf8Path) {
        let Some(entry) = self.registry.get_mut(path) else {
            return;
        };

        if !entry.finish_run() {
            return;
        }

        if self.follow_ups {
            tracing::debug!(path = %path, "Starting follow-up run");
            self.start_run(path);
        } else {
            entry.status = ProcessingStatus::Idle;
            tracing::debug!(path = %path, "Shutting down, follow-up skipped");
        }
    }
}

/// Reads fresh content and calls the client unless the content is unchanged.
async fn perform_run<C>(client: &C, path: &Utf8Path, last_processed: Option<Fingerprint>) -> RunResult
where
    C: DocumentationClient + ?Sized,
{
    let source = match read_source(path).await {
        Ok(source) => source,
        Err(error) => return RunResult::Failed(error),
    };

    let fingerprint = source.fingerprint;
    if last_processed == Some(fingerprint) {
        return RunResult::Unchanged;
    }

    match client.generate(&source.text, source.language).await {
        Ok(text) => RunResult::Generated { fingerprint, text },
        Err(error) => RunResult::Failed(error.into()),
    }
}
