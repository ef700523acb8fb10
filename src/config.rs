//! Configuration management for CopyTab LSP

use serde::Deserialize;
use tower_lsp::lsp_types::Url;

/// LSP configuration, parsed from initialization options.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct Config {
    /// Status-bar indicator configuration
    pub status: StatusConfig,
    /// Popup notification configuration
    pub messages: MessagesConfig,
    /// Document that is active in the editor at start-up, if any.
    ///
    /// Seeds the tracked-document registry so a session that starts with
    /// a focused editor behaves as if that editor had just been focused.
    pub active_document: Option<Url>,
}

/// Status-bar indicator configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StatusConfig {
    /// Send status-item updates to the client
    pub enabled: bool,
}

impl Default for StatusConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

/// Popup notification configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MessagesConfig {
    /// Show the success / warning popups after copy commands.
    ///
    /// Errors are always surfaced regardless of this flag.
    pub enabled: bool,
}

impl Default for MessagesConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

impl Config {
    /// Parse configuration from initialization options
    pub fn from_init_options(options: Option<serde_json::Value>) -> Self {
        match options {
            Some(value) => serde_json::from_value(value).unwrap_or_default(),
            None => Self::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.status.enabled);
        assert!(config.messages.enabled);
        assert!(config.active_document.is_none());
    }

    #[test]
    fn test_parse_from_json() {
        let json = json!({
            "status": { "enabled": false },
            "messages": { "enabled": false },
            "activeDocument": "file:///src/main.rs"
        });

        let config = Config::from_init_options(Some(json));
        assert!(!config.status.enabled);
        assert!(!config.messages.enabled);
        assert_eq!(
            config.active_document.unwrap().as_str(),
            "file:///src/main.rs"
        );
    }

    #[test]
    fn test_partial_config() {
        let json = json!({
            "status": { "enabled": false }
        });

        let config = Config::from_init_options(Some(json));
        assert!(!config.status.enabled);
        // Other fields should use defaults
        assert!(config.messages.enabled);
        assert!(config.active_document.is_none());
    }

    #[test]
    fn test_from_init_options_none() {
        let config = Config::from_init_options(None);
        assert!(config.status.enabled);
        assert!(config.messages.enabled);
    }

    #[test]
    fn test_from_init_options_invalid_json() {
        let json = json!("invalid");
        let config = Config::from_init_options(Some(json));
        assert!(config.status.enabled);
    }
}
