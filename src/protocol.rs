//! Protocol extensions for the host editor
//!
//! The host collaborators that plain LSP does not model — the
//! active-editor stream, the visible-editors query, clipboard access and
//! the status-bar items — travel as custom JSON-RPC methods under the
//! `copytab/` prefix. The client side of each method lives in the editor
//! integration; this module only pins down the wire contract.

use serde::{Deserialize, Serialize};
use tower_lsp::lsp_types::Url;
use tower_lsp::lsp_types::notification::Notification;
use tower_lsp::lsp_types::request::Request;

/// Client -> server notification: the active editor changed.
///
/// `uri` is absent when focus moved to something that is not a text
/// editor.
#[derive(Debug)]
pub enum ActiveEditorChanged {}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveEditorChangedParams {
    pub uri: Option<Url>,
}

impl Notification for ActiveEditorChanged {
    type Params = ActiveEditorChangedParams;
    const METHOD: &'static str = "copytab/activeEditorChanged";
}

/// Server -> client request: which editors are currently on screen.
#[derive(Debug)]
pub enum VisibleEditors {}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisibleEditorsResult {
    pub uris: Vec<Url>,
}

impl Request for VisibleEditors {
    type Params = ();
    type Result = VisibleEditorsResult;
    const METHOD: &'static str = "copytab/visibleEditors";
}

/// Server -> client request: put `text` on the system clipboard.
///
/// The write happens host-side and may fail; the server propagates that
/// failure to the command that asked for it.
#[derive(Debug)]
pub enum WriteClipboard {}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WriteClipboardParams {
    pub text: String,
}

impl Request for WriteClipboard {
    type Params = WriteClipboardParams;
    type Result = ();
    const METHOD: &'static str = "copytab/writeClipboard";
}

/// Server -> client notification: show or hide one status-bar item.
#[derive(Debug)]
pub enum StatusItemUpdate {}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusItemParams {
    /// Stable identity of the widget, so repeated updates address the
    /// same item.
    pub id: String,
    pub text: String,
    /// Command the item triggers when clicked.
    pub command: String,
    pub visible: bool,
}

impl Notification for StatusItemUpdate {
    type Params = StatusItemParams;
    const METHOD: &'static str = "copytab/statusItem";
}
