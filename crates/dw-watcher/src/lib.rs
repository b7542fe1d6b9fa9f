//! Debounced source file watcher with async event streaming.
//!
//! This crate provides file change detection via the `notify` crate with
//! debouncing through `notify-debouncer-mini`, bridged to tokio so the
//! change coordinator can consume events in its `select!` loop.
//!
//! # Overview
//!
//! - Debounce rapid changes (editor save bursts) with a 100ms window
//! - Drop events for unknown extensions and excluded subtrees at the source
//! - Classify each event as [`FileEventKind::Changed`] or
//!   [`FileEventKind::Removed`] by checking whether the path still exists
//! - Stream events over a bounded channel
//!
//! # Crate Dependencies
//!
//! ```text
//! dw-cli ──► dw-engine ──► dw-watcher ──► dw-core
//!                      ├─► dw-scanner ──►
//!                      └─► dw-client ───►
//! ```
//!
//! # Usage
//!
//! ```no_run
//! use dw_watcher::{FileWatcher, SourceFileFilter};
//! use dw_core::WatchConfig;
//! use camino::Utf8Path;
//! use tokio::time::{interval, Duration};
//!
//! # async fn example() -> Result<(), dw_watcher::WatchError> {
//! let root = Utf8Path::new("./project");
//! let mut watcher = FileWatcher::new(
//!     root,
//!     &WatchConfig::default(),
//!     SourceFileFilter::new(root),
//! ).await?;
//!
//! let mut tick = interval(Duration::from_secs(30));
//!
//! loop {
//!     tokio::select! {
//!         Some(event) = watcher.recv() => {
//!             println!("{}: {}", event.kind.label(), event.path);
//!         }
//!         _ = tick.tick() => {
//!             // Periodic housekeeping
//!         }
//!     }
//! }
//! # }
//! ```
//!
//! # Error Handling
//!
//! ```
//! use dw_watcher::WatchError;
//!
//! fn handle_watch_error(err: WatchError) {
//!     if err.is_fatal() {
//!         eprintln!("Fatal watcher error: {err}");
//!     } else {
//!         eprintln!("Warning: {err}");
//!     }
//! }
//! ```

#![deny(clippy::all)]
#![warn(missing_docs)]

pub mod error;
pub mod events;
pub mod filter;
pub mod watcher;

pub use error::WatchError;
pub use events::{FileEvent, FileEventKind};
pub use filter::{AcceptAllFilter, FileFilter, SourceFileFilter};
pub use watcher::FileWatcher;
