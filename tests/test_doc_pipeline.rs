//! Full normalize-and-render pipeline tests over realistic metadata.

use std::path::PathBuf;

use serde_json::json;

use nodedocs::normalize::build_schema;
use nodedocs::render::{MarkdownSupport, Renderer, TemplateSet};
use nodedocs::schema::RawNodeMetadata;

fn renderer(markdown: MarkdownSupport) -> Renderer {
    let res = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("res");
    Renderer::new(TemplateSet::load(&res).unwrap(), markdown)
}

fn unet_like_metadata() -> RawNodeMetadata {
    // A node with a large indexed parameter family, the shape that makes
    // collapsing worthwhile.
    let mut required = serde_json::Map::new();
    for i in 0..12 {
        required.insert(
            format!("input_blocks.{i}"),
            json!(["TENSOR", {"tooltip": "stage weights"}]),
        );
    }
    required.insert("strength".to_string(), json!(["FLOAT", {"default": 1.0}]));

    serde_json::from_value(json!({
        "name": "Patcher",
        "category": "model/patch",
        "description": "Patches model blocks.",
        "output_node": false,
        "input": {"required": required, "hidden": {"prompt": "PROMPT"}},
        "output": ["MODEL"],
        "output_name": ["MODEL"],
        "output_tooltips": ["patched model"]
    }))
    .unwrap()
}

#[test]
fn indexed_family_renders_as_single_generic_row() {
    let schema = build_schema(&unet_like_metadata());
    let required = &schema.input_parameters["required"];
    assert_eq!(required.len(), 2);
    assert!(required.contains_key("input_blocks.i"));
    assert!(required.contains_key("strength"));

    let html = renderer(MarkdownSupport::disabled())
        .render(&schema)
        .unwrap()
        .html;
    assert!(html.contains("input_blocks.i"));
    assert!(!html.contains("input_blocks.0"));
}

#[test]
fn schema_build_then_render_is_deterministic() {
    let raw = unet_like_metadata();
    let renderer = renderer(MarkdownSupport::disabled());
    let first = renderer.render(&build_schema(&raw)).unwrap().html;
    let second = renderer.render(&build_schema(&raw)).unwrap().html;
    assert_eq!(first, second);
}

#[test]
fn hostile_metadata_still_renders_escaped() {
    let raw: RawNodeMetadata = serde_json::from_value(json!({
        "name": "Odd & <Strange>",
        "category": "misc",
        "description": "uses <b>tags</b> & \"quotes\"",
        "output_node": true,
        "input": {
            "required": {
                "label<raw>": ["STRING", {"default": "say \"hi\""}]
            }
        },
        "output": [],
        "output_name": [],
        "output_tooltips": []
    }))
    .unwrap();

    let html = renderer(MarkdownSupport::disabled())
        .render(&build_schema(&raw))
        .unwrap()
        .html;

    assert!(!html.contains("Odd & <Strange>"));
    assert!(html.contains("Odd &amp; &lt;Strange&gt;"));
    assert!(!html.contains("label<raw>"));
    assert!(html.contains("label&lt;raw&gt;"));
    assert!(!html.contains("<b>tags</b>"));
    assert!(!html.contains("say \"hi\""));
}

#[cfg(feature = "markdown")]
#[test]
fn markdown_artifact_has_no_blank_lines() {
    let schema = build_schema(&unet_like_metadata());
    let document = renderer(MarkdownSupport::detect()).render(&schema).unwrap();
    let markdown = document.markdown.expect("markdown artifact");
    assert!(!markdown.is_empty());
    assert!(markdown.lines().all(|line| !line.is_empty()));
}

#[test]
fn degenerate_metadata_renders_without_panicking() {
    let raw: RawNodeMetadata = serde_json::from_str("{}").unwrap();
    let document = renderer(MarkdownSupport::disabled())
        .render(&build_schema(&raw))
        .unwrap();
    assert!(document.html.contains("<html"));
}
