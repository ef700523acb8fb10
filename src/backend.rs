//! LSP backend: registry ownership, event handlers and the copy commands.

use std::sync::RwLock;

use serde_json::Value;
use tower_lsp::jsonrpc;
use tower_lsp::jsonrpc::Result;
use tower_lsp::lsp_types::*;
use tower_lsp::{Client, LanguageServer};

use crate::config::Config;
use crate::document::{DocumentStore, ResolvedDocument};
use crate::protocol::{
    ActiveEditorChangedParams, VisibleEditors, WriteClipboard, WriteClipboardParams,
};
use crate::registry::DocumentRegistry;
use crate::render::render_document;
use crate::status::{self, COPY_ACTIVE_COMMAND, COPY_ALL_COMMAND};

pub struct CopyTabBackend {
    client: Client,
    /// Configuration
    config: RwLock<Config>,
    /// Tracked-document registry; every mutation is followed by a status
    /// republish
    registry: RwLock<DocumentRegistry>,
    /// Text of documents currently open in the host
    documents: DocumentStore,
    /// Identifier last reported by the active-editor stream, if any
    active: RwLock<Option<Url>>,
}

impl CopyTabBackend {
    /// Create a new backend bound to `client`.
    ///
    /// The registry starts empty; start-up seeding happens in
    /// `initialize` once the editor has told us what is focused.
    pub fn new(client: Client) -> Self {
        Self {
            client,
            config: RwLock::new(Config::default()),
            registry: RwLock::new(DocumentRegistry::new()),
            documents: DocumentStore::new(),
            active: RwLock::new(None),
        }
    }

    /// Handler for the `copytab/activeEditorChanged` notification.
    ///
    /// Registered as a custom method on the service; a defined identifier
    /// becomes both the active document and a tracked one.
    pub async fn active_editor_changed(&self, params: ActiveEditorChangedParams) {
        match params.uri {
            Some(uri) => {
                if let Ok(mut active) = self.active.write() {
                    *active = Some(uri.clone());
                }
                let added = self
                    .registry
                    .write()
                    .map(|mut registry| registry.track(&uri))
                    .unwrap_or(false);
                if added {
                    tracing::info!("Document {uri} added to tracking");
                }
            }
            None => {
                if let Ok(mut active) = self.active.write() {
                    *active = None;
                }
                tracing::debug!("No active text editor");
            }
        }
        self.publish_status().await;
    }

    fn visibility(&self) -> bool {
        self.registry
            .read()
            .map(|registry| !registry.is_empty())
            .unwrap_or(false)
    }

    async fn publish_status(&self) {
        let enabled = self
            .config
            .read()
            .map(|config| config.status.enabled)
            .unwrap_or(true);
        if !enabled {
            return;
        }
        status::publish(&self.client, self.visibility()).await;
    }

    async fn show_info(&self, message: &str) {
        let enabled = self
            .config
            .read()
            .map(|config| config.messages.enabled)
            .unwrap_or(true);
        if enabled {
            self.client.show_message(MessageType::INFO, message).await;
        }
    }

    async fn show_warning(&self, message: &str) {
        let enabled = self
            .config
            .read()
            .map(|config| config.messages.enabled)
            .unwrap_or(true);
        if enabled {
            self.client
                .show_message(MessageType::WARNING, message)
                .await;
        }
    }

    /// Resolve one tracked identifier, surfacing failure to the user and
    /// the invoking command. Failure here aborts the whole copy; there is
    /// no partial output.
    async fn resolve(&self, uri: &Url) -> Result<ResolvedDocument> {
        match self.documents.resolve(uri).await {
            Ok(document) => Ok(document),
            Err(err) => {
                tracing::error!("Failed to resolve {uri}: {err}");
                self.client
                    .show_message(MessageType::ERROR, format!("CopyTab: {err}"))
                    .await;
                Err(copy_error(err.to_string()))
            }
        }
    }

    async fn write_clipboard(&self, text: String) -> Result<()> {
        if let Err(err) = self
            .client
            .send_request::<WriteClipboard>(WriteClipboardParams { text })
            .await
        {
            tracing::error!("Clipboard write failed: {err}");
            self.client
                .show_message(
                    MessageType::ERROR,
                    format!("CopyTab: clipboard write failed: {err}"),
                )
                .await;
            return Err(err);
        }
        Ok(())
    }

    /// Copy-all: reconcile visible editors into the registry, then render
    /// every tracked document in tracking order into one clipboard blob.
    ///
    /// An empty registry still writes an empty string and reports
    /// success.
    async fn copy_all(&self) -> Result<Option<Value>> {
        let visible = match self.client.send_request::<VisibleEditors>(()).await {
            Ok(result) => result.uris,
            Err(err) => {
                tracing::warn!("Visible-editors query failed: {err}");
                Vec::new()
            }
        };

        let added = self
            .registry
            .write()
            .map(|mut registry| registry.reconcile(visible.iter()))
            .unwrap_or(0);
        if added > 0 {
            tracing::info!("Tracked {added} visible editors during copy-all");
            self.publish_status().await;
        }

        let snapshot = self
            .registry
            .read()
            .map(|registry| registry.snapshot())
            .unwrap_or_default();

        // Sequential resolution on purpose: a failure must abort before
        // anything reaches the clipboard.
        let mut all_content = String::new();
        for uri in &snapshot {
            let document = self.resolve(uri).await?;
            all_content.push_str(&render_document(&document.path, &document.text));
        }

        self.write_clipboard(all_content).await?;
        self.show_info("Copied all open files to clipboard!").await;
        Ok(None)
    }

    /// Copy-active: render only the active document. Independent of the
    /// registry.
    async fn copy_active(&self) -> Result<Option<Value>> {
        let active = self
            .active
            .read()
            .map(|active| active.clone())
            .unwrap_or(None);

        let Some(uri) = active else {
            self.show_warning("No active tab to copy.").await;
            return Ok(None);
        };

        let document = self.resolve(&uri).await?;
        self.write_clipboard(render_document(&document.path, &document.text))
            .await?;
        self.show_info("Copied active tab to clipboard!").await;
        Ok(None)
    }
}

fn copy_error(message: String) -> jsonrpc::Error {
    jsonrpc::Error {
        code: jsonrpc::ErrorCode::InternalError,
        message: message.into(),
        data: None,
    }
}

#[tower_lsp::async_trait]
impl LanguageServer for CopyTabBackend {
    async fn initialize(&self, params: InitializeParams) -> Result<InitializeResult> {
        let config = Config::from_init_options(params.initialization_options);
        tracing::info!("Configuration: {:?}", config);

        // Seed tracking with whatever is focused at start-up.
        if let Some(uri) = config.active_document.clone() {
            if let Ok(mut active) = self.active.write() {
                *active = Some(uri.clone());
            }
            if let Ok(mut registry) = self.registry.write() {
                registry.track(&uri);
            }
            tracing::info!("Document {uri} added to tracking");
        }

        if let Ok(mut cfg) = self.config.write() {
            *cfg = config;
        }

        Ok(InitializeResult {
            server_info: Some(ServerInfo {
                name: "copytab-lsp".to_string(),
                version: Some(env!("CARGO_PKG_VERSION").to_string()),
            }),
            capabilities: ServerCapabilities {
                text_document_sync: Some(TextDocumentSyncCapability::Kind(
                    TextDocumentSyncKind::FULL,
                )),
                execute_command_provider: Some(ExecuteCommandOptions {
                    commands: vec![
                        COPY_ALL_COMMAND.to_string(),
                        COPY_ACTIVE_COMMAND.to_string(),
                    ],
                    ..Default::default()
                }),
                ..Default::default()
            },
        })
    }

    async fn initialized(&self, _: InitializedParams) {
        self.client
            .log_message(MessageType::INFO, "CopyTab LSP initialized")
            .await;

        // First visibility publication; also covers the seeded document.
        self.publish_status().await;

        tracing::info!("CopyTab LSP initialized");
    }

    async fn shutdown(&self) -> Result<()> {
        tracing::info!("CopyTab LSP shutting down");
        Ok(())
    }

    async fn did_open(&self, params: DidOpenTextDocumentParams) {
        let uri = params.text_document.uri;
        tracing::debug!("Document opened: {uri}");
        // Opening alone does not track: only focus and the copy-all
        // reconciliation pass do.
        self.documents.set(uri, params.text_document.text);
    }

    async fn did_change(&self, params: DidChangeTextDocumentParams) {
        let uri = params.text_document.uri;

        // With FULL sync, we get the entire document content
        if let Some(change) = params.content_changes.into_iter().next() {
            tracing::debug!("Document changed: {uri}");
            self.documents.set(uri, change.text);
        }
    }

    async fn did_save(&self, params: DidSaveTextDocumentParams) {
        let uri = params.text_document.uri;

        if let Some(text) = params.text {
            tracing::debug!("Document saved: {uri}");
            self.documents.set(uri, text);
        }
    }

    async fn did_close(&self, params: DidCloseTextDocumentParams) {
        let uri = params.text_document.uri;
        self.documents.remove(&uri);

        let removed = self
            .registry
            .write()
            .map(|mut registry| registry.untrack(&uri))
            .unwrap_or(false);
        if removed {
            tracing::info!("Document {uri} removed from tracking");
        }
        self.publish_status().await;
    }

    async fn execute_command(&self, params: ExecuteCommandParams) -> Result<Option<Value>> {
        match params.command.as_str() {
            COPY_ALL_COMMAND => self.copy_all().await,
            COPY_ACTIVE_COMMAND => self.copy_active().await,
            _ => {
                tracing::warn!("Unknown command: {}", params.command);
                Ok(None)
            }
        }
    }
}
