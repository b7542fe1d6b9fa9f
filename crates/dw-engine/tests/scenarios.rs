//! End-to-end walk through a single file's life: create, burst of edits,
//! identical re-save, delete, and a failed call followed by a retry.

mod common;

use std::sync::Arc;
use std::time::Duration;

use common::{ScriptedClient, Tree, rel, render};
use dw_client::CompletionClient;
use dw_core::{CompletionConfig, Fingerprint, Language, ProcessingStatus};
use dw_engine::{ArtifactSink, ChangeCoordinator};
use dw_watcher::FileEvent;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_create_documents_file() {
    let tree = Tree::new();
    let client = ScriptedClient::new();
    let mut coordinator = tree.coordinator(&client);

    let util = tree.write("util.rs", "fn a(){}");
    coordinator.handle_event(FileEvent::changed(util)).await;
    coordinator.drain().await;

    let calls = client.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].language, Language::Rust);
    assert_eq!(calls[0].language.label(), "Rust");
    assert_eq!(
        tree.artifact("util.md").as_deref(),
        Some(render("fn a(){}", Language::Rust).as_str())
    );
    assert_eq!(
        coordinator.last_processed(rel("util.rs")),
        Some(Fingerprint::of("fn a(){}"))
    );
    assert_eq!(coordinator.status(rel("util.rs")), Some(ProcessingStatus::Idle));
}

#[tokio::test]
async fn test_full_lifecycle() {
    let tree = Tree::new();
    let client = ScriptedClient::gated();
    let mut coordinator = tree.coordinator(&client);

    // 1. Create
    client.release(1);
    let util = tree.write("util.rs", "fn a(){}");
    coordinator.handle_event(FileEvent::changed(util.clone())).await;
    coordinator.drain().await;
    assert_eq!(client.call_count(), 1);
    assert!(tree.artifact("util.md").is_some());

    // 2. Two edits, the second while the first run's call is outstanding
    tree.write("util.rs", "fn a(){ 1 }");
    coordinator.handle_event(FileEvent::changed(util.clone())).await;
    client.wait_for_calls(2).await;
    assert_eq!(client.calls()[1].content, "fn a(){ 1 }");

    tree.write("util.rs", "fn a(){ 2 }");
    coordinator.handle_event(FileEvent::changed(util.clone())).await;
    assert_eq!(
        coordinator.status(&util),
        Some(ProcessingStatus::ProcessingWithPendingUpdate)
    );

    client.release(2);
    coordinator.drain().await;

    let calls = client.calls();
    assert_eq!(calls.len(), 3, "initial run plus exactly one follow-up");
    assert_eq!(calls[2].content, "fn a(){ 2 }");
    assert_eq!(
        tree.artifact("util.md").as_deref(),
        Some(render("fn a(){ 2 }", Language::Rust).as_str())
    );

    // 3. Byte-identical re-save
    client.release(1);
    tree.write("util.rs", "fn a(){ 2 }");
    coordinator.handle_event(FileEvent::changed(util.clone())).await;
    coordinator.drain().await;
    assert_eq!(client.call_count(), 3);
    assert_eq!(coordinator.stats().unchanged, 1);

    // 4. Delete
    tree.remove("util.rs");
    coordinator.handle_event(FileEvent::removed(util.clone())).await;
    assert!(tree.artifact("util.md").is_none());
    assert!(!coordinator.is_tracked(&util));
    assert_eq!(coordinator.tracked(), 0);
    assert_eq!(coordinator.stats().artifacts_removed, 1);
}

#[tokio::test]
async fn test_failed_call_is_retried_on_next_notification() {
    let tree = Tree::new();
    let client = ScriptedClient::new();
    let mut coordinator = tree.coordinator(&client);

    client.fail_next(1);
    let main = tree.write("main.py", "print('hi')");
    coordinator.handle_event(FileEvent::changed(main.clone())).await;
    coordinator.drain().await;

    assert!(tree.artifact("main.md").is_none());
    assert_eq!(coordinator.last_processed(&main), None);
    assert_eq!(coordinator.stats().failed, 1);

    // Same bytes, but nothing was recorded, so this is not skipped
    coordinator.handle_event(FileEvent::changed(main.clone())).await;
    coordinator.drain().await;

    assert_eq!(client.call_count(), 2);
    assert!(tree.artifact("main.md").is_some());
    assert_eq!(
        coordinator.last_processed(&main),
        Some(Fingerprint::of("print('hi')"))
    );
}

#[tokio::test]
async fn test_transport_failure_against_http_service() {
    let server = MockServer::start().await;
    // First call outlives the client timeout, later calls succeed
    Mock::given(method("POST"))
        .and(path("/completion"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "content": "late" }))
                .set_delay(Duration::from_secs(3)),
        )
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/completion"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "content": "# main.py" })))
        .mount(&server)
        .await;

    let config = CompletionConfig {
        endpoint: server.uri(),
        request_timeout_secs: 1,
    };
    let client = Arc::new(CompletionClient::new(&config).expect("client"));

    let tree = Tree::new();
    let mut coordinator = ChangeCoordinator::new(tree.root.clone(), client, ArtifactSink::default());

    let main = tree.write("main.py", "print('hi')");
    coordinator.handle_event(FileEvent::changed(main.clone())).await;
    coordinator.drain().await;

    assert!(tree.artifact("main.md").is_none());
    assert_eq!(coordinator.last_processed(&main), None);

    coordinator.handle_event(FileEvent::changed(main.clone())).await;
    coordinator.drain().await;

    assert_eq!(tree.artifact("main.md").as_deref(), Some("# main.py"));
    let requests = server.received_requests().await.expect("recording enabled");
    assert_eq!(requests.len(), 2);
}
