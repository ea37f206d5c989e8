//! The inbound HTTP surface.
//!
//! Three routes registered with the host-facing router: a static home
//! page, a bulk fetch-and-render of the whole catalog (optionally
//! exported to disk in internal mode), and a per-node help page. Every
//! route returns a well-formed body; upstream failures surface as
//! placeholder content, never as HTTP errors.

use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use axum::extract::{Path, State};
use axum::response::Html;
use axum::routing::get;
use axum::{Json, Router};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::config::Settings;
use crate::error::Result;
use crate::registry::{NodeRegistry, display_base};
use crate::schema::Document;
use crate::store::DocStore;

/// Shared state handed to every route handler.
#[derive(Clone)]
pub struct AppState {
    /// Document cache and fetcher.
    pub store: Arc<DocStore>,
    /// The node catalog.
    pub registry: Arc<NodeRegistry>,
    /// Resolved service settings.
    pub settings: Arc<Settings>,
    /// Home page, rendered once at startup.
    pub home: Arc<String>,
}

/// Builds the help router.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/jov_help", get(home_page))
        .route("/jov_help/doc", get(all_docs))
        .route("/jov_help/doc/{node}", get(node_doc))
        .with_state(state)
}

/// `GET /jov_help`: the static home document.
async fn home_page(State(state): State<AppState>) -> Html<String> {
    Html(state.home.as_str().to_string())
}

/// `GET /jov_help/doc/{node}`: one node's help page.
async fn node_doc(State(state): State<AppState>, Path(node): Path<String>) -> Html<String> {
    let document = state.store.fetch(&node).await;
    Html(document.html().to_string())
}

/// `GET /jov_help/doc`: fetch and render every registered node, then
/// return the whole cache as JSON. In internal mode each document is
/// also exported under the configured directory template.
async fn all_docs(State(state): State<AppState>) -> Json<serde_json::Value> {
    for class in state.registry.classes() {
        let document = state.store.fetch(class).await;
        if state.settings.internal {
            let display = state.registry.display_name(class);
            if let Err(err) = export_document(&state.settings.doc_dir, display, &document) {
                warn!(node = class, error = %err, "failed to export document");
            }
        }
    }
    Json(state.store.snapshot())
}

/// Writes a document under the directory template, substituting `{name}`
/// with the display-name base. Markdown is written only when present.
pub fn export_document(template: &str, display: &str, document: &Document) -> io::Result<()> {
    let base = display_base(display);
    let dir = PathBuf::from(template.replace("{name}", base));
    std::fs::create_dir_all(&dir)?;
    if let Some(markdown) = document.markdown() {
        std::fs::write(dir.join(format!("{base}.md")), markdown)?;
    }
    std::fs::write(dir.join(format!("{base}.html")), document.html())?;
    Ok(())
}

/// Binds the listener and serves until the cancellation token fires.
///
/// # Errors
///
/// Returns an error if the listener cannot bind or the server fails
/// fatally.
pub async fn serve(state: AppState, cancel: CancellationToken) -> Result<()> {
    let listener = TcpListener::bind(&state.settings.bind_addr).await?;
    let addr = listener.local_addr()?;
    info!(%addr, nodes = state.registry.len(), "help server started");

    let router = build_router(state);
    axum::serve(listener, router)
        .with_graceful_shutdown(cancel.cancelled_owned())
        .await?;

    info!("help server stopped");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{CanonicalNodeSchema, RenderedDoc};

    #[test]
    fn export_writes_html_and_markdown() {
        let dir = tempfile::tempdir().unwrap();
        let template = format!("{}/{{name}}", dir.path().display());
        let document = Document::Rendered(RenderedDoc {
            schema: CanonicalNodeSchema::default(),
            html: "<html>blend</html>".to_string(),
            markdown: Some("# blend".to_string()),
        });

        export_document(&template, "Blend (JOV)", &document).unwrap();

        let out = dir.path().join("Blend");
        assert_eq!(
            std::fs::read_to_string(out.join("Blend.html")).unwrap(),
            "<html>blend</html>"
        );
        assert_eq!(std::fs::read_to_string(out.join("Blend.md")).unwrap(), "# blend");
    }

    #[test]
    fn export_skips_markdown_when_absent() {
        let dir = tempfile::tempdir().unwrap();
        let template = format!("{}/{{name}}", dir.path().display());
        let document = Document::placeholder("No data for Ghost");

        export_document(&template, "Ghost", &document).unwrap();

        let out = dir.path().join("Ghost");
        assert!(out.join("Ghost.html").exists());
        assert!(!out.join("Ghost.md").exists());
    }
}
