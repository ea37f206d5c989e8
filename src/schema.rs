//! Canonical node documentation schema.
//!
//! The host's introspection endpoint returns loosely-typed metadata per
//! node; this module defines that raw shape plus the canonical schema the
//! normalizer produces and the renderer consumes, and the [`Document`]
//! variant stored in the cache.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Raw node metadata as returned by `GET /object_info/{node_class}`.
///
/// Every field is defaulted: upstream nodes routinely omit parts of this
/// record, and a partial record still renders to a partial page.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawNodeMetadata {
    /// Node class name.
    #[serde(default)]
    pub name: String,

    /// Menu category path, e.g. `"image/adjust"`.
    #[serde(default)]
    pub category: String,

    /// Free-text node description. May contain raw HTML.
    #[serde(default)]
    pub description: String,

    /// Whether the node is a graph sink (no outputs consumed downstream).
    #[serde(default)]
    pub output_node: bool,

    /// Section name (`required`, `optional`, `hidden`, ...) to parameter
    /// name to descriptor. A descriptor is a 1-or-2-element sequence:
    /// `[type-or-choice-list]` or `[type-or-choice-list, options-map]`.
    /// Kept as raw values; sections other than `required`/`optional`
    /// carry arbitrary shapes and are skipped during normalization.
    #[serde(default)]
    pub input: IndexMap<String, IndexMap<String, Value>>,

    /// Output slot types: plain type names or choice lists.
    #[serde(default)]
    pub output: Vec<Value>,

    /// Output slot names, parallel to `output`.
    #[serde(default)]
    pub output_name: Vec<String>,

    /// Output slot tooltips, parallel to `output`.
    #[serde(default)]
    pub output_tooltips: Vec<String>,
}

/// A single input parameter after normalization.
///
/// Invariant: `kind` is never empty. Unclassifiable choice lists fall back
/// to `"STRING"`; descriptors with no type at all get `"UNKNOWN"`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalParameter {
    /// Comma-joined type tokens, e.g. `"INT"` or `"FLOAT,FLOAT"`.
    #[serde(rename = "type")]
    pub kind: String,

    /// Human explanation shown in the docs table. Empty when the
    /// descriptor carried no options map at all.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub tooltip: String,

    /// Default value rendered as a display string.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,

    /// Enumerated values for combo parameters, capped for display.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub choice: Option<Vec<String>>,

    /// Lower bound for numeric parameters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<String>,

    /// Upper bound for numeric parameters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<String>,
}

/// A fully normalized node, ready for rendering.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CanonicalNodeSchema {
    /// Node class identifier.
    pub class: String,

    /// Display name (same as `class` upstream).
    pub name: String,

    /// Menu category, trimmed of stray whitespace.
    pub category: String,

    /// Whether the node is a graph sink.
    pub output_node: bool,

    /// Free-text description.
    pub description: String,

    /// Section (`required`/`optional`) to parameter name to canonical
    /// parameter, in upstream declaration order, with repeated indexed
    /// families collapsed.
    pub input_parameters: IndexMap<String, IndexMap<String, CanonicalParameter>>,

    /// Output slot name (lowercased) to `"type$tooltip"` composite.
    pub output_parameters: IndexMap<String, String>,
}

/// A cached documentation entry for one node identifier.
///
/// Either a real rendered document or a placeholder substituted when the
/// metadata could not be obtained. Consumers match on the variant instead
/// of probing for fields; both serialize to the JSON shape the bulk route
/// exposes (`".html"` / `".md"` keys alongside the schema fields).
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum Document {
    /// Degenerate document carrying only an error body.
    Placeholder {
        /// Error text, always renderable as a page body.
        #[serde(rename = ".html")]
        html: String,
    },

    /// Fully rendered documentation.
    Rendered(RenderedDoc),
}

/// Payload of [`Document::Rendered`]: the schema with its rendered
/// artifacts alongside.
#[derive(Debug, Clone, Serialize)]
pub struct RenderedDoc {
    /// The canonical schema the page was rendered from.
    #[serde(flatten)]
    pub schema: CanonicalNodeSchema,

    /// Self-contained HTML page.
    #[serde(rename = ".html")]
    pub html: String,

    /// Markdown derived from the HTML, when the capability is built in.
    #[serde(rename = ".md", skip_serializing_if = "Option::is_none")]
    pub markdown: Option<String>,
}

impl Document {
    /// Builds a placeholder from error text.
    pub fn placeholder(text: impl Into<String>) -> Self {
        Self::Placeholder { html: text.into() }
    }

    /// The HTML body, regardless of variant.
    #[must_use]
    pub fn html(&self) -> &str {
        match self {
            Self::Placeholder { html } => html,
            Self::Rendered(doc) => &doc.html,
        }
    }

    /// The Markdown body, when present.
    #[must_use]
    pub fn markdown(&self) -> Option<&str> {
        match self {
            Self::Placeholder { .. } => None,
            Self::Rendered(doc) => doc.markdown.as_deref(),
        }
    }

    /// Returns `true` for the placeholder variant.
    #[must_use]
    pub const fn is_placeholder(&self) -> bool {
        matches!(self, Self::Placeholder { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholder_exposes_text_as_html() {
        let doc = Document::placeholder("No data for X");
        assert_eq!(doc.html(), "No data for X");
        assert!(doc.markdown().is_none());
        assert!(doc.is_placeholder());
    }

    #[test]
    fn placeholder_serializes_with_html_key() {
        let doc = Document::placeholder("boom");
        let json = serde_json::to_value(&doc).unwrap();
        assert_eq!(json[".html"], "boom");
    }

    #[test]
    fn rendered_serializes_schema_and_artifacts() {
        let schema = CanonicalNodeSchema {
            class: "Blend".to_string(),
            name: "Blend".to_string(),
            category: "compose".to_string(),
            output_node: false,
            description: "mix two images".to_string(),
            input_parameters: IndexMap::new(),
            output_parameters: IndexMap::new(),
        };
        let doc = Document::Rendered(RenderedDoc {
            schema,
            html: "<html></html>".to_string(),
            markdown: Some("# Blend".to_string()),
        });
        let json = serde_json::to_value(&doc).unwrap();
        assert_eq!(json["class"], "Blend");
        assert_eq!(json[".html"], "<html></html>");
        assert_eq!(json[".md"], "# Blend");
    }

    #[test]
    fn rendered_omits_md_key_without_markdown() {
        let doc = Document::Rendered(RenderedDoc {
            schema: CanonicalNodeSchema::default(),
            html: String::new(),
            markdown: None,
        });
        let json = serde_json::to_value(&doc).unwrap();
        assert!(json.get(".md").is_none());
    }

    #[test]
    fn raw_metadata_tolerates_missing_fields() {
        let raw: RawNodeMetadata = serde_json::from_str("{}").unwrap();
        assert!(raw.name.is_empty());
        assert!(raw.input.is_empty());
        assert!(!raw.output_node);
    }

    #[test]
    fn canonical_parameter_type_key_round_trips() {
        let param = CanonicalParameter {
            kind: "INT".to_string(),
            ..CanonicalParameter::default()
        };
        let json = serde_json::to_value(&param).unwrap();
        assert_eq!(json["type"], "INT");
        assert!(json.get("tooltip").is_none());
    }
}
