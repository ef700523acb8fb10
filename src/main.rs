use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tower_lsp::lsp_types::notification::Notification;
use tower_lsp::{LspService, Server};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};
use url::Url;

use copytab_lsp::backend::CopyTabBackend;
use copytab_lsp::document::DocumentStore;
use copytab_lsp::protocol::ActiveEditorChanged;
use copytab_lsp::registry::DocumentRegistry;
use copytab_lsp::render::render_document;

#[derive(Parser)]
#[command(name = "copytab-lsp")]
#[command(about = "Language server that copies open documents to the clipboard", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the LSP server (default behavior)
    Lsp,
    /// Print the copy-all clipboard payload for the given files and exit
    Render {
        /// Files to include, in tracking order (repeats collapse to the
        /// first occurrence)
        files: Vec<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match cli.command {
        Some(Commands::Render { files }) => run_render(files).await,
        Some(Commands::Lsp) | None => {
            run_lsp().await;
            ExitCode::SUCCESS
        }
    }
}

async fn run_lsp() {
    tracing::info!("Starting CopyTab LSP server");

    let stdin = tokio::io::stdin();
    let stdout = tokio::io::stdout();

    let (service, socket) = LspService::build(CopyTabBackend::new)
        .custom_method(
            ActiveEditorChanged::METHOD,
            CopyTabBackend::active_editor_changed,
        )
        .finish();
    Server::new(stdin, stdout, socket).serve(service).await;
}

async fn run_render(files: Vec<PathBuf>) -> ExitCode {
    match render_files(&files).await {
        Ok(payload) => {
            print!("{payload}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

/// Build the payload copy-all would produce if exactly `files` were
/// tracked, in the given order.
async fn render_files(files: &[PathBuf]) -> anyhow::Result<String> {
    let mut registry = DocumentRegistry::new();
    for file in files {
        let path = tokio::fs::canonicalize(file)
            .await
            .with_context(|| format!("cannot resolve {}", file.display()))?;
        let uri = Url::from_file_path(&path)
            .map_err(|()| anyhow::anyhow!("not an absolute path: {}", path.display()))?;
        registry.track(&uri);
    }

    let store = DocumentStore::new();
    let mut payload = String::new();
    for uri in registry.snapshot() {
        let document = store
            .resolve(&uri)
            .await
            .with_context(|| format!("failed to resolve {uri}"))?;
        payload.push_str(&render_document(&document.path, &document.text));
    }
    Ok(payload)
}
