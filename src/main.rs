//! `nodedocs`: help-page documentation service for node-based editor plugins.

use std::sync::Arc;

use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use nodedocs::cli::Cli;
use nodedocs::config::Settings;
use nodedocs::error::{ExitCode, Result};
use nodedocs::observability::init_logging;
use nodedocs::registry::NodeRegistry;
use nodedocs::render::{MarkdownSupport, Renderer, TemplateSet};
use nodedocs::server::{self, AppState};
use nodedocs::store::DocStore;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if !cli.quiet {
        init_logging(cli.log_format.into(), cli.verbose);
    }

    let cancel = CancellationToken::new();

    // Graceful shutdown on SIGINT/SIGTERM; a second signal forces exit.
    let shutdown = cancel.clone();
    tokio::spawn(async move {
        let mut sigterm = tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to register SIGTERM handler");

        tokio::select! {
            _ = tokio::signal::ctrl_c() => {}
            _ = sigterm.recv() => {}
        }

        shutdown.cancel();
        eprintln!("\nShutting down gracefully... (press Ctrl+C again to force)");

        tokio::select! {
            _ = tokio::signal::ctrl_c() => std::process::exit(ExitCode::INTERRUPTED),
            _ = sigterm.recv() => std::process::exit(ExitCode::TERMINATED),
        }
    });

    match run(&cli, cancel).await {
        Ok(()) => std::process::exit(ExitCode::SUCCESS),
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(e.exit_code());
        }
    }
}

async fn run(cli: &Cli, cancel: CancellationToken) -> Result<()> {
    let settings = Settings::from_cli(cli)?;

    let templates = TemplateSet::load(&settings.res_dir)?;
    let markdown = MarkdownSupport::detect();
    if !markdown.is_available() {
        info!("markdown conversion not built in; serving HTML only");
    }
    let renderer = Renderer::new(templates, markdown);
    let home = renderer.home()?;

    // A missing registry file is an empty catalog, not a startup failure:
    // per-node pages still work for any identifier the host knows.
    let registry = match NodeRegistry::load(&settings.registry_path, &settings.ignore_path()) {
        Ok(registry) => registry,
        Err(err) if settings.registry_path.exists() => return Err(err.into()),
        Err(err) => {
            warn!(error = %err, "node registry not found; starting with an empty catalog");
            NodeRegistry::default()
        }
    };

    let state = AppState {
        store: Arc::new(DocStore::new(settings.upstream.clone(), renderer)),
        registry: Arc::new(registry),
        settings: Arc::new(settings),
        home: Arc::new(home),
    };

    server::serve(state, cancel).await
}
