//! Processing status types.
//!
//! This module provides the [`ProcessingStatus`] enum tracking whether a
//! generation run is in flight for a path.

use serde::{Deserialize, Serialize};

/// Processing state of one tracked path.
///
/// # Examples
///
/// ```
/// use dw_core::ProcessingStatus;
///
/// let status = ProcessingStatus::Processing;
/// assert!(status.is_processing());
/// assert!(!status.has_pending_update());
///
/// assert!(ProcessingStatus::ProcessingWithPendingUpdate.has_pending_update());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessingStatus {
    /// No run is in flight.
    #[default]
    Idle,

    /// A run is in flight and no change arrived since it started.
    Processing,

    /// A run is in flight and at least one change arrived since it started.
    ///
    /// Any number of changes collapse into this single flag; exactly one
    /// follow-up run is started when the current run resolves.
    ProcessingWithPendingUpdate,
}

impl ProcessingStatus {
    /// Returns `true` if a run is in flight.
    #[inline]
    #[must_use]
    pub const fn is_processing(self) -> bool {
        matches!(self, Self::Processing | Self::ProcessingWithPendingUpdate)
    }

    /// Returns `true` if a follow-up run is owed once the current run resolves.
    #[inline]
    #[must_use]
    pub const fn has_pending_update(self) -> bool {
        matches!(self, Self::ProcessingWithPendingUpdate)
    }

    /// Returns a human-readable label for this status.
    #[inline]
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Idle => "Idle",
            Self::Processing => "Processing",
            Self::ProcessingWithPendingUpdate => "Processing (update pending)",
        }
    }
}
