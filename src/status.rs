//! Status-bar indicators
//!
//! Two fixed widgets, one per copy command. Their visibility is a pure
//! function of the registry: shown while at least one document is
//! tracked, hidden otherwise.

use tower_lsp::Client;

use crate::protocol::{StatusItemParams, StatusItemUpdate};

/// Command identifier for copy-all. Preserved for compatibility with
/// existing keybindings and palette entries.
pub const COPY_ALL_COMMAND: &str = "extension.copyAllOpenFiles";

/// Command identifier for copy-active. Preserved for compatibility.
pub const COPY_ACTIVE_COMMAND: &str = "extension.copyActiveTab";

/// A status-bar widget definition: fixed label, bound command.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StatusItem {
    pub id: &'static str,
    pub text: &'static str,
    pub command: &'static str,
}

impl StatusItem {
    fn params(&self, visible: bool) -> StatusItemParams {
        StatusItemParams {
            id: self.id.to_string(),
            text: self.text.to_string(),
            command: self.command.to_string(),
            visible,
        }
    }
}

/// The two indicators, in display order.
pub const STATUS_ITEMS: [StatusItem; 2] = [
    StatusItem {
        id: "copytab.allTabs",
        text: "🟢 CopyTab: All tabs",
        command: COPY_ALL_COMMAND,
    },
    StatusItem {
        id: "copytab.activeTab",
        text: "🟢 CopyTab: Active tab",
        command: COPY_ACTIVE_COMMAND,
    },
];

/// Forward the current visibility to both widgets.
pub async fn publish(client: &Client, visible: bool) {
    if visible {
        tracing::debug!("Showing status bar items");
    } else {
        tracing::debug!("Hiding status bar items");
    }
    for item in &STATUS_ITEMS {
        client
            .send_notification::<StatusItemUpdate>(item.params(visible))
            .await;
    }
}
