//! The per-path registry record.
//!
//! [`WatchedFile`] carries the state the change coordinator keeps for every
//! tracked source file, and the status transitions it is allowed to make.

use camino::{Utf8Component, Utf8Path, Utf8PathBuf};

use super::fingerprint::Fingerprint;
use super::status::ProcessingStatus;

/// What the coordinator should do after a status transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunDecision {
    /// Start a generation run now.
    Start,
    /// A run is already in flight; the change is folded into its follow-up.
    Coalesced,
}

/// State tracked for one source path.
///
/// # Examples
///
/// ```
/// use dw_core::{RunDecision, WatchedFile, ProcessingStatus};
/// use camino::Utf8PathBuf;
///
/// let mut file = WatchedFile::new(Utf8PathBuf::from("/repo/util.rs"), Utf8PathBuf::from("/repo"), 1);
/// assert_eq!(file.note_change(), RunDecision::Start);
/// assert_eq!(file.note_change(), RunDecision::Coalesced);
/// assert_eq!(file.note_change(), RunDecision::Coalesced);
///
/// // One follow-up, no matter how many changes were coalesced.
/// assert!(file.finish_run());
/// assert!(!file.finish_run());
/// assert_eq!(file.status, ProcessingStatus::Idle);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchedFile {
    /// Normalized absolute path of the source file.
    pub path: Utf8PathBuf,

    /// Root the artifact path is derived from.
    pub root: Utf8PathBuf,

    /// Fingerprint of the last content documented and written successfully.
    pub last_processed: Option<Fingerprint>,

    /// Whether a run is in flight, and whether a follow-up is owed.
    pub status: ProcessingStatus,

    /// Identifies this incarnation of the entry.
    ///
    /// A path that is removed and re-created gets a fresh epoch, so results
    /// from runs started for the old entry can be told apart.
    pub epoch: u64,
}

impl WatchedFile {
    /// Creates an idle, never-processed entry.
    #[must_use]
    pub fn new(path: Utf8PathBuf, root: Utf8PathBuf, epoch: u64) -> Self {
        Self {
            path,
            root,
            last_processed: None,
            status: ProcessingStatus::Idle,
            epoch,
        }
    }

    /// Records a change notification.
    ///
    /// Idle entries move to [`ProcessingStatus::Processing`] and a run must be
    /// started. Entries with a run in flight only raise the pending flag.
    pub fn note_change(&mut self) -> RunDecision {
        match self.status {
            ProcessingStatus::Idle => {
                self.status = ProcessingStatus::Processing;
                RunDecision::Start
            }
            ProcessingStatus::Processing | ProcessingStatus::ProcessingWithPendingUpdate => {
                self.status = ProcessingStatus::ProcessingWithPendingUpdate;
                RunDecision::Coalesced
            }
        }
    }

    /// Parks the entry with a follow-up owed but no run of its own in flight.
    ///
    /// Used when a path is re-created while a run for its removed predecessor
    /// is still resolving; the follow-up starts once that run reports back.
    pub fn hold_pending(&mut self) {
        self.status = ProcessingStatus::ProcessingWithPendingUpdate;
    }

    /// Resolves the in-flight run.
    ///
    /// Returns `true` if a follow-up run must start immediately, in which case
    /// the entry stays in [`ProcessingStatus::Processing`] with the pending
    /// flag cleared. Otherwise the entry becomes idle.
    pub fn finish_run(&mut self) -> bool {
        if self.status.has_pending_update() {
            self.status = ProcessingStatus::Processing;
            true
        } else {
            self.status = ProcessingStatus::Idle;
            false
        }
    }
}

/// Normalizes `path` against `root` without touching the filesystem.
///
/// Relative paths are joined onto `root`; `.` components are dropped and
/// `..` components remove the preceding normal component. Two spellings of
/// the same file therefore map to one registry key.
///
/// # Examples
///
/// ```
/// use dw_core::normalize_path;
/// use camino::Utf8Path;
///
/// let root = Utf8Path::new("/repo");
/// assert_eq!(normalize_path(root, Utf8Path::new("src/./a.rs")), "/repo/src/a.rs");
/// assert_eq!(normalize_path(root, Utf8Path::new("/repo/src/../lib.rs")), "/repo/lib.rs");
/// ```
#[must_use]
pub fn normalize_path(root: &Utf8Path, path: &Utf8Path) -> Utf8PathBuf {
    let joined;
    let path = if path.is_absolute() {
        path
    } else {
        joined = root.join(path);
        &joined
    };

    let mut normalized = Utf8PathBuf::new();
    for component in path.components() {
        match component {
            Utf8Component::CurDir => {}
            Utf8Component::ParentDir => {
                if !matches!(
                    normalized.components().next_back(),
                    Some(Utf8Component::RootDir | Utf8Component::Prefix(_)) | None
                ) {
                    normalized.pop();
                }
            }
            other => normalized.push(other.as_str()),
        }
    }
    normalized
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry() -> WatchedFile {
        WatchedFile::new(
            Utf8PathBuf::from("/repo/src/util.rs"),
            Utf8PathBuf::from("/repo"),
            7,
        )
    }

    #[test]
    fn test_new_entry_is_idle_and_unprocessed() {
        let file = entry();
        assert_eq!(file.status, ProcessingStatus::Idle);
        assert!(file.last_processed.is_none());
        assert_eq!(file.epoch, 7);
    }

    #[test]
    fn test_change_while_idle_starts_run() {
        let mut file = entry();
        assert_eq!(file.note_change(), RunDecision::Start);
        assert_eq!(file.status, ProcessingStatus::Processing);
    }

    #[test]
    fn test_changes_while_processing_coalesce() {
        let mut file = entry();
        file.note_change();
        for _ in 0..5 {
            assert_eq!(file.note_change(), RunDecision::Coalesced);
        }
        assert_eq!(file.status, ProcessingStatus::ProcessingWithPendingUpdate);

        assert!(file.finish_run());
        assert_eq!(file.status, ProcessingStatus::Processing);
        assert!(!file.finish_run());
        assert_eq!(file.status, ProcessingStatus::Idle);
    }

    #[test]
    fn test_hold_pending_waits_for_finish() {
        let mut file = entry();
        file.hold_pending();
        assert_eq!(file.note_change(), RunDecision::Coalesced);
        assert!(file.finish_run());
    }

    #[test]
    fn test_normalize_relative_and_dot_segments() {
        let root = Utf8Path::new("/repo");
        assert_eq!(normalize_path(root, Utf8Path::new("util.rs")), "/repo/util.rs");
        assert_eq!(
            normalize_path(root, Utf8Path::new("./src/./mod/../util.rs")),
            "/repo/src/util.rs"
        );
    }

    #[test]
    fn test_normalize_does_not_escape_filesystem_root() {
        assert_eq!(
            normalize_path(Utf8Path::new("/"), Utf8Path::new("/../../a.py")),
            "/a.py"
        );
    }
}
