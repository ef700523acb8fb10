//! Open-document store and document resolution
//!
//! The store holds the text of documents the host has opened, synced via
//! the standard text-document lifecycle notifications (FULL sync).
//! Resolution turns a tracked identifier back into live text plus a
//! file-system path string: open text wins, otherwise the file is read
//! from disk (the document may have been tracked and then hidden without
//! being closed in the host's sense).

use dashmap::DashMap;
use thiserror::Error;
use url::Url;

/// A document's resolved text and path string, ready for rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedDocument {
    pub path: String,
    pub text: String,
}

/// Why a tracked identifier could not be resolved to live content.
///
/// Resolution failure is fatal to the copy invocation that hit it; there
/// is no per-document skip.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("document {uri} is not open and not backed by a local file")]
    NotFileBacked { uri: Url },
    #[error("failed to read {uri}: {source}")]
    Read {
        uri: Url,
        #[source]
        source: std::io::Error,
    },
}

/// Text of documents currently open in the host, keyed by identifier.
#[derive(Debug, Default)]
pub struct DocumentStore {
    open: DashMap<Url, String>,
}

impl DocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the full text for `uri` (didOpen, or a FULL-sync change).
    pub fn set(&self, uri: Url, text: String) {
        self.open.insert(uri, text);
    }

    /// Drop the text for `uri` (didClose).
    pub fn remove(&self, uri: &Url) {
        self.open.remove(uri);
    }

    pub fn contains(&self, uri: &Url) -> bool {
        self.open.contains_key(uri)
    }

    /// Resolve `uri` to its current text and path string.
    ///
    /// Open text is authoritative (it may contain unsaved edits). A
    /// document that is no longer open is re-read from disk, which
    /// requires a `file:` identifier.
    pub async fn resolve(&self, uri: &Url) -> Result<ResolvedDocument, ResolveError> {
        if let Some(text) = self.open.get(uri) {
            return Ok(ResolvedDocument {
                path: fs_path(uri),
                text: text.value().clone(),
            });
        }

        let path = uri
            .to_file_path()
            .map_err(|()| ResolveError::NotFileBacked { uri: uri.clone() })?;
        let text = tokio::fs::read_to_string(&path)
            .await
            .map_err(|source| ResolveError::Read {
                uri: uri.clone(),
                source,
            })?;

        Ok(ResolvedDocument {
            path: fs_path(uri),
            text,
        })
    }
}

/// The path string a record carries for `uri`.
///
/// `file:` identifiers yield the platform path; anything else falls back
/// to the identifier's path component, which is whatever the host put
/// there for virtual documents.
pub fn fs_path(uri: &Url) -> String {
    uri.to_file_path()
        .map(|path| path.display().to_string())
        .unwrap_or_else(|()| uri.path().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn uri(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[tokio::test]
    async fn test_resolve_prefers_open_text() {
        let store = DocumentStore::new();
        store.set(uri("file:///x/y.txt"), "unsaved edits".to_string());

        let doc = store.resolve(&uri("file:///x/y.txt")).await.unwrap();
        assert_eq!(doc.text, "unsaved edits");
        assert_eq!(doc.path, "/x/y.txt");
    }

    #[tokio::test]
    async fn test_resolve_falls_back_to_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "on disk").unwrap();
        let file_uri = Url::from_file_path(file.path()).unwrap();

        let store = DocumentStore::new();
        let doc = store.resolve(&file_uri).await.unwrap();
        assert_eq!(doc.text, "on disk");
        assert_eq!(doc.path, file.path().display().to_string());
    }

    #[tokio::test]
    async fn test_resolve_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let gone = Url::from_file_path(dir.path().join("gone.txt")).unwrap();

        let store = DocumentStore::new();
        let err = store.resolve(&gone).await.unwrap_err();
        assert!(matches!(err, ResolveError::Read { .. }));
    }

    #[tokio::test]
    async fn test_resolve_closed_virtual_document_is_an_error() {
        let store = DocumentStore::new();
        let err = store
            .resolve(&uri("untitled:Untitled-1"))
            .await
            .unwrap_err();
        assert!(matches!(err, ResolveError::NotFileBacked { .. }));
    }

    #[tokio::test]
    async fn test_remove_drops_open_text() {
        let store = DocumentStore::new();
        let doc_uri = uri("file:///x/y.txt");
        store.set(doc_uri.clone(), "text".to_string());
        assert!(store.contains(&doc_uri));

        store.remove(&doc_uri);
        assert!(!store.contains(&doc_uri));
    }

    #[test]
    fn test_fs_path_for_virtual_documents() {
        // Non-file schemes keep whatever path the host put in the
        // identifier.
        assert_eq!(fs_path(&uri("untitled:Untitled-1")), "Untitled-1");
        assert_eq!(fs_path(&uri("file:///x/y.txt")), "/x/y.txt");
    }
}
