//! Metadata fetching and the process-wide document cache.
//!
//! Documents are built lazily, once per node identifier, from the host's
//! introspection endpoint. Every outcome is cached, including
//! placeholders, so a broken node is not refetched for the life of the
//! process. Concurrent first requests for the same identifier may each
//! fetch and render; the duplicate request is accepted and the last
//! writer wins.

use std::sync::Arc;

use dashmap::DashMap;
use indexmap::IndexMap;
use serde_json::Value;
use tracing::{debug, error};

use crate::normalize::build_schema;
use crate::render::Renderer;
use crate::schema::{Document, RawNodeMetadata, RenderedDoc};

/// Fetches, renders, and caches node documents.
#[derive(Debug)]
pub struct DocStore {
    cache: DashMap<String, Arc<Document>>,
    client: reqwest::Client,
    upstream: String,
    renderer: Renderer,
}

impl DocStore {
    /// Builds a store fetching from `upstream` (base URL, no trailing
    /// slash) and rendering through `renderer`.
    #[must_use]
    pub fn new(upstream: String, renderer: Renderer) -> Self {
        Self {
            cache: DashMap::new(),
            client: reqwest::Client::new(),
            upstream,
            renderer,
        }
    }

    /// The cached document for `node_class`, if any.
    #[must_use]
    pub fn get(&self, node_class: &str) -> Option<Arc<Document>> {
        self.cache.get(node_class).map(|entry| Arc::clone(entry.value()))
    }

    /// Whether a document for `node_class` is cached.
    #[must_use]
    pub fn contains(&self, node_class: &str) -> bool {
        self.cache.contains_key(node_class)
    }

    /// Stores a document under `node_class`, replacing any prior entry.
    pub fn put(&self, node_class: impl Into<String>, document: Document) {
        self.cache.insert(node_class.into(), Arc::new(document));
    }

    /// Number of cached documents.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cache.len()
    }

    /// Whether the cache is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    /// The full cache as a JSON object keyed by node identifier.
    #[must_use]
    pub fn snapshot(&self) -> Value {
        let mut map = serde_json::Map::new();
        for entry in &self.cache {
            if let Ok(value) = serde_json::to_value(entry.value().as_ref()) {
                map.insert(entry.key().clone(), value);
            }
        }
        Value::Object(map)
    }

    /// The document for `node_class`, fetching and rendering on first
    /// request. Never fails: any upstream or rendering problem yields a
    /// cached placeholder instead.
    pub async fn fetch(&self, node_class: &str) -> Arc<Document> {
        if let Some(cached) = self.get(node_class) {
            debug!(node = node_class, "document cache hit");
            return cached;
        }

        let document = Arc::new(self.fetch_uncached(node_class).await);
        self.cache
            .insert(node_class.to_string(), Arc::clone(&document));
        document
    }

    async fn fetch_uncached(&self, node_class: &str) -> Document {
        let url = format!("{}/object_info/{node_class}", self.upstream);

        let response = match self.client.get(&url).send().await {
            Ok(response) => response,
            Err(err) => {
                error!(node = node_class, error = %err, "failed to get docs");
                return Document::placeholder(format!(
                    "Failed to get docs {node_class}\n{err}"
                ));
            }
        };

        let status = response.status();
        if !status.is_success() {
            let text = format!(
                "Failed to get docs {node_class}, status: {}",
                status.as_u16()
            );
            error!(node = node_class, status = status.as_u16(), "failed to get docs");
            return Document::placeholder(text);
        }

        let mut body: IndexMap<String, RawNodeMetadata> = match response.json().await {
            Ok(body) => body,
            Err(err) => {
                error!(node = node_class, error = %err, "failed to get docs");
                return Document::placeholder(format!(
                    "Failed to get docs {node_class}\n{err}"
                ));
            }
        };

        let Some(raw) = body.swap_remove(node_class) else {
            return Document::placeholder(format!("No data for {node_class}"));
        };

        let schema = build_schema(&raw);
        match self.renderer.render(&schema) {
            Ok(rendered) => Document::Rendered(RenderedDoc {
                schema,
                html: rendered.html,
                markdown: rendered.markdown,
            }),
            Err(err) => {
                error!(node = node_class, error = %err, "failed to render docs");
                Document::placeholder(format!("Failed to get docs {node_class}\n{err}"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{MarkdownSupport, TemplateSet};
    use std::path::PathBuf;

    fn store(upstream: &str) -> DocStore {
        let res = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("res");
        let renderer = Renderer::new(
            TemplateSet::load(&res).unwrap(),
            MarkdownSupport::disabled(),
        );
        DocStore::new(upstream.to_string(), renderer)
    }

    #[test]
    fn put_and_get_round_trip() {
        let store = store("http://127.0.0.1:1");
        assert!(!store.contains("X"));
        store.put("X", Document::placeholder("No data for X"));
        assert!(store.contains("X"));
        assert_eq!(store.get("X").unwrap().html(), "No data for X");
    }

    #[test]
    fn snapshot_keys_by_identifier() {
        let store = store("http://127.0.0.1:1");
        store.put("A", Document::placeholder("a"));
        store.put("B", Document::placeholder("b"));
        let snapshot = store.snapshot();
        assert_eq!(snapshot["A"][".html"], "a");
        assert_eq!(snapshot["B"][".html"], "b");
    }

    #[tokio::test]
    async fn unreachable_upstream_yields_cached_placeholder() {
        // Port 1 is never listening; the transport error becomes a
        // placeholder that embeds the identifier.
        let store = store("http://127.0.0.1:1");
        let doc = store.fetch("Ghost").await;
        assert!(doc.is_placeholder());
        assert!(doc.html().contains("Ghost"));
        assert!(store.contains("Ghost"));
    }

    #[tokio::test]
    async fn cached_entry_short_circuits_fetch() {
        let store = store("http://127.0.0.1:1");
        store.put("Blend", Document::placeholder("seeded"));
        let doc = store.fetch("Blend").await;
        assert_eq!(doc.html(), "seeded");
    }
}
