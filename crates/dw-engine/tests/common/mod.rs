//! Shared fixtures for coordinator tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use camino::{Utf8Path, Utf8PathBuf};
use dw_client::{DocumentationClient, GenerateError};
use dw_core::Language;
use dw_engine::{ArtifactSink, ChangeCoordinator};
use tempfile::TempDir;
use tokio::sync::Semaphore;

/// One recorded completion call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    pub content: String,
    pub language: Language,
}

/// In-memory documentation client with scripted behavior.
///
/// Generated text embeds the language and the content, so tests can tell
/// which revision of a file an artifact documents.
#[derive(Default)]
pub struct ScriptedClient {
    calls: Mutex<Vec<Call>>,
    gate: Option<Semaphore>,
    fail_remaining: AtomicUsize,
    hang_marker: Option<String>,
}

impl ScriptedClient {
    /// Answers immediately.
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Blocks every call until [`release`](Self::release) hands out a permit.
    pub fn gated() -> Arc<Self> {
        Arc::new(Self {
            gate: Some(Semaphore::new(0)),
            ..Self::default()
        })
    }

    /// Never answers for content containing `marker`.
    pub fn hanging_on(marker: &str) -> Arc<Self> {
        Arc::new(Self {
            hang_marker: Some(marker.to_owned()),
            ..Self::default()
        })
    }

    /// Lets `n` blocked or future calls through the gate.
    pub fn release(&self, n: usize) {
        if let Some(gate) = &self.gate {
            gate.add_permits(n);
        }
    }

    /// Makes the next `n` calls fail with a response-format error.
    pub fn fail_next(&self, n: usize) {
        self.fail_remaining.store(n, Ordering::SeqCst);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().expect("calls lock").clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().expect("calls lock").len()
    }

    /// Waits until at least `n` calls have been made.
    pub async fn wait_for_calls(&self, n: usize) {
        tokio::time::timeout(Duration::from_secs(5), async {
            while self.call_count() < n {
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        })
        .await
        .expect("timed out waiting for completion calls");
    }
}

#[async_trait]
impl DocumentationClient for ScriptedClient {
    async fn generate(&self, content: &str, language: Language) -> Result<String, GenerateError> {
        self.calls.lock().expect("calls lock").push(Call {
            content: content.to_owned(),
            language,
        });

        if self
            .hang_marker
            .as_deref()
            .is_some_and(|marker| content.contains(marker))
        {
            std::future::pending::<()>().await;
        }

        if let Some(gate) = &self.gate {
            gate.acquire().await.expect("gate closed").forget();
        }

        if self
            .fail_remaining
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
        {
            return Err(GenerateError::response_format("scripted failure"));
        }

        Ok(render(content, language))
    }
}

/// The text [`ScriptedClient`] returns for `content`.
pub fn render(content: &str, language: Language) -> String {
    format!("# {language}\n\n{content}\n")
}

/// A temporary source tree.
pub struct Tree {
    _dir: TempDir,
    pub root: Utf8PathBuf,
}

impl Tree {
    pub fn new() -> Self {
        let dir = TempDir::new().expect("Failed to create temp directory");
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("Invalid path");
        Self { _dir: dir, root }
    }

    /// Writes `content` to `relative`, creating parents, and returns the path.
    pub fn write(&self, relative: &str, content: &str) -> Utf8PathBuf {
        let path = self.root.join(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("mkdir");
        }
        std::fs::write(&path, content).expect("write");
        path
    }

    pub fn remove(&self, relative: &str) -> Utf8PathBuf {
        let path = self.root.join(relative);
        std::fs::remove_file(&path).expect("remove");
        path
    }

    /// Reads `docs/<relative>` if it exists.
    pub fn artifact(&self, relative: &str) -> Option<String> {
        std::fs::read_to_string(self.root.join("docs").join(relative)).ok()
    }

    pub fn path(&self, relative: &str) -> Utf8PathBuf {
        self.root.join(relative)
    }

    pub fn coordinator(&self, client: &Arc<ScriptedClient>) -> ChangeCoordinator<ScriptedClient> {
        ChangeCoordinator::new(self.root.clone(), Arc::clone(client), ArtifactSink::default())
    }
}

pub fn rel(path: &str) -> &Utf8Path {
    Utf8Path::new(path)
}
