//! Integration tests for copytab-lsp
//!
//! Drives the tracking and copy pipeline the way the backend does —
//! registry mutations from editor events, then resolution and rendering
//! in tracking order — without a live LSP transport.

use std::io::Write;

use copytab_lsp::document::{DocumentStore, ResolveError};
use copytab_lsp::registry::DocumentRegistry;
use copytab_lsp::render::{render_all, render_document};
use copytab_lsp::status::{COPY_ACTIVE_COMMAND, COPY_ALL_COMMAND, STATUS_ITEMS};
use url::Url;

fn uri(s: &str) -> Url {
    Url::parse(s).unwrap()
}

/// Open document A (it becomes active): registry = [A], indicators
/// visible.
#[test]
fn test_first_focus_starts_tracking() {
    let mut registry = DocumentRegistry::new();
    assert!(registry.is_empty());

    registry.track(&uri("file:///a.rs"));

    assert_eq!(registry.snapshot(), vec![uri("file:///a.rs")]);
    assert!(!registry.is_empty());
}

/// Registry = [A, B], close B: registry = [A], indicators still visible.
/// Then close A: registry empty, indicators hidden.
#[test]
fn test_closing_documents_shrinks_tracking() {
    let mut registry = DocumentRegistry::new();
    registry.track(&uri("file:///a.rs"));
    registry.track(&uri("file:///b.rs"));

    registry.untrack(&uri("file:///b.rs"));
    assert_eq!(registry.snapshot(), vec![uri("file:///a.rs")]);
    assert!(!registry.is_empty());

    registry.untrack(&uri("file:///a.rs"));
    assert!(registry.is_empty());
}

/// Copy-active output for path `/x/y.txt` and content `hello` is
/// bit-exact, and independent of what is tracked.
#[tokio::test]
async fn test_copy_active_payload() {
    let store = DocumentStore::new();
    store.set(uri("file:///x/y.txt"), "hello".to_string());

    let document = store.resolve(&uri("file:///x/y.txt")).await.unwrap();
    let payload = render_document(&document.path, &document.text);

    assert_eq!(payload, "File: /x/y.txt:\n\nhello\n\n");
}

/// Copy-all over registry [A(/a, "1"), B(/b, "2")] with nothing extra
/// visible: records concatenate in tracking order, bit-exact.
#[tokio::test]
async fn test_copy_all_payload_in_tracking_order() {
    let mut registry = DocumentRegistry::new();
    registry.track(&uri("file:///a"));
    registry.track(&uri("file:///b"));

    let store = DocumentStore::new();
    store.set(uri("file:///a"), "1".to_string());
    store.set(uri("file:///b"), "2".to_string());

    // No visible editors beyond what is tracked.
    registry.reconcile([uri("file:///a"), uri("file:///b")].iter());

    let mut payload = String::new();
    for tracked in registry.snapshot() {
        let document = store.resolve(&tracked).await.unwrap();
        payload.push_str(&render_document(&document.path, &document.text));
    }

    assert_eq!(payload, "File: /a:\n\n1\n\nFile: /b:\n\n2\n\n");
}

/// A visible-but-never-focused editor C is folded in by the copy-all
/// reconciliation pass and appears in the payload at its append
/// position.
#[tokio::test]
async fn test_copy_all_reconciles_visible_editors() {
    let mut registry = DocumentRegistry::new();
    registry.track(&uri("file:///a"));

    let store = DocumentStore::new();
    store.set(uri("file:///a"), "1".to_string());
    store.set(uri("file:///c"), "3".to_string());

    let visible = [uri("file:///a"), uri("file:///c")];
    let added = registry.reconcile(visible.iter());
    assert_eq!(added, 1);

    let mut payload = String::new();
    for tracked in registry.snapshot() {
        let document = store.resolve(&tracked).await.unwrap();
        payload.push_str(&render_document(&document.path, &document.text));
    }

    assert_eq!(payload, "File: /a:\n\n1\n\nFile: /c:\n\n3\n\n");
}

/// An empty registry renders the empty string; the command still counts
/// as a success and still performs the (empty) clipboard write.
#[test]
fn test_copy_all_of_nothing_is_empty_success() {
    let registry = DocumentRegistry::new();
    assert!(registry.snapshot().is_empty());

    let records: Vec<(&str, &str)> = Vec::new();
    assert_eq!(render_all(records), "");
}

/// A tracked document that is closed mid-session and whose file is gone
/// fails resolution; the copy aborts with no partial payload.
#[tokio::test]
async fn test_vanished_document_aborts_copy() {
    let dir = tempfile::tempdir().unwrap();
    let keep_path = dir.path().join("keep.txt");
    std::fs::File::create(&keep_path)
        .unwrap()
        .write_all(b"kept")
        .unwrap();

    let keep = Url::from_file_path(&keep_path).unwrap();
    let gone = Url::from_file_path(dir.path().join("gone.txt")).unwrap();

    let mut registry = DocumentRegistry::new();
    registry.track(&keep);
    registry.track(&gone);

    let store = DocumentStore::new();
    let mut payload = String::new();
    let mut failure = None;
    for tracked in registry.snapshot() {
        match store.resolve(&tracked).await {
            Ok(document) => payload.push_str(&render_document(&document.path, &document.text)),
            Err(err) => {
                failure = Some(err);
                break;
            }
        }
    }

    let err = failure.expect("resolution of the vanished document must fail");
    assert!(matches!(err, ResolveError::Read { .. }));
}

/// Unsaved open text wins over what is on disk.
#[tokio::test]
async fn test_open_text_shadows_disk() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "saved").unwrap();
    let file_uri = Url::from_file_path(file.path()).unwrap();

    let store = DocumentStore::new();
    store.set(file_uri.clone(), "unsaved".to_string());

    let document = store.resolve(&file_uri).await.unwrap();
    assert_eq!(document.text, "unsaved");

    // After close, the disk copy is what remains.
    store.remove(&file_uri);
    let document = store.resolve(&file_uri).await.unwrap();
    assert_eq!(document.text, "saved");
}

/// The status items advertise exactly the two exposed commands.
#[test]
fn test_status_items_match_commands() {
    let commands: Vec<&str> = STATUS_ITEMS.iter().map(|item| item.command).collect();
    assert_eq!(commands, vec![COPY_ALL_COMMAND, COPY_ACTIVE_COMMAND]);
}
