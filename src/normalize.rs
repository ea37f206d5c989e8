//! Parameter normalization and repeated-parameter collapsing.
//!
//! Raw parameter descriptors are loosely typed: the first element is
//! either a type name or a choice list, and an optional second element
//! carries an options map (tooltip, default, bounds). Normalization maps
//! each descriptor onto a [`CanonicalParameter`]; a follow-up pass
//! collapses indexed parameter families (`block.0` ... `block.9`) into a
//! single representative entry so pages stay readable.

use std::collections::HashSet;
use std::sync::LazyLock;

use indexmap::IndexMap;
use regex::{Captures, Regex};
use serde_json::Value;

use crate::schema::{CanonicalNodeSchema, CanonicalParameter, RawNodeMetadata};

/// Maximum choice-list entries carried into a parameter's documentation.
pub const CHOICE_DISPLAY_MAX: usize = 25;

/// Tooltip synthesized when an options map carries none.
pub const UNKNOWN_TOOLTIP: &str = "Unknown Explanation!";

/// Sentinel default for parameters whose choices the host resolves at
/// runtime rather than enumerating statically.
const DYNAMIC_DEFAULT: &str = "dynamic";

/// Input sections that carry user-facing parameters.
const DOCUMENTED_SECTIONS: [&str; 2] = ["required", "optional"];

/// Placeholder letters substituted for numeric name segments, in order.
const PLACEHOLDER_LETTERS: [char; 26] = [
    'i', 'j', 'k', 'l', 'm', 'n', 'o', 'p', 'q', 'r', 's', 't', 'u', 'v', 'w', 'x', 'y', 'z', 'a',
    'b', 'c', 'd', 'e', 'f', 'g', 'h',
];

static NUMERIC_SEGMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\.\d+").expect("numeric segment pattern"));

/// Classifies a choice list by its first element's JSON type.
///
/// Empty or unrecognized lists classify as `"STRING"`.
#[must_use]
pub fn combo_type(list: &[Value]) -> &'static str {
    match list.first() {
        Some(Value::String(_)) | None => "STRING",
        Some(Value::Number(n)) => {
            if n.is_i64() || n.is_u64() {
                "INT"
            } else {
                "FLOAT"
            }
        }
        Some(Value::Bool(_)) => "BOOLEAN",
        Some(_) => "STRING",
    }
}

/// Renders a raw JSON value as a display string: strings verbatim,
/// everything else in compact JSON form.
fn display_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Choice values rendered for display: word separators normalized from
/// underscore to space, list truncated to [`CHOICE_DISPLAY_MAX`].
fn derive_choices(list: &[Value]) -> Vec<String> {
    list.iter()
        .take(CHOICE_DISPLAY_MAX)
        .map(|v| display_string(v).replace('_', " "))
        .collect()
}

/// Copies a whitelisted options-map value, skipping absent values and
/// empty strings.
fn scrape(options: &serde_json::Map<String, Value>, key: &str) -> Option<String> {
    options
        .get(key)
        .filter(|v| !matches!(v, Value::String(s) if s.is_empty()))
        .map(display_string)
}

/// Normalizes one raw parameter descriptor.
///
/// Descriptors are 1-or-2-element sequences. A missing options map is an
/// accepted shape, not a fault: the parameter then contributes only its
/// type classification.
#[must_use]
pub fn normalize_descriptor(descriptor: &[Value]) -> CanonicalParameter {
    let mut param = CanonicalParameter::default();

    let Some(first) = descriptor.first() else {
        param.kind = "UNKNOWN".to_string();
        return param;
    };

    let choice_list = first.as_array();
    param.kind = match choice_list {
        Some(list) => combo_type(list).to_string(),
        None => match first.as_str() {
            Some(s) if !s.is_empty() => s.to_string(),
            Some(_) => "UNKNOWN".to_string(),
            None => display_string(first),
        },
    };

    let Some(options) = descriptor.get(1).and_then(Value::as_object) else {
        return param;
    };

    // A `choice` override in the options map marks a dynamically-resolved
    // combo: the override replaces the derived list and the default
    // becomes the "dynamic" sentinel.
    if let Some(list) = choice_list {
        if let Some(explicit) = options.get("choice") {
            param.choice = Some(vec![display_string(explicit)]);
            param.default = Some(DYNAMIC_DEFAULT.to_string());
        } else {
            param.choice = Some(derive_choices(list));
        }
    }

    // Presence-based, unlike the whitelist scrape: an explicitly empty
    // tooltip stays empty rather than being synthesized.
    param.tooltip = match options.get("tooltip") {
        Some(tip) => display_string(tip),
        None => UNKNOWN_TOOLTIP.to_string(),
    };

    if param.default.is_none() {
        // For non-combo parameters `default_top` outranks `default`.
        param.default = if choice_list.is_none() {
            scrape(options, "default_top").or_else(|| scrape(options, "default"))
        } else {
            scrape(options, "default")
        };
    }
    param.min = scrape(options, "min");
    param.max = scrape(options, "max");

    param
}

/// Collapses repeating indexed parameters within each section.
///
/// Every dot-separated numeric segment in a name is replaced with
/// sequential placeholder letters (restarting at `i` per name); the first
/// parameter mapping onto each generic pattern is kept as representative
/// and later ones are dropped. Pattern state is shared across sections.
/// Names without numeric segments pass through unchanged.
#[must_use]
pub fn collapse_repeating(
    sections: IndexMap<String, IndexMap<String, CanonicalParameter>>,
) -> IndexMap<String, IndexMap<String, CanonicalParameter>> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut collapsed = IndexMap::new();

    for (section, params) in sections {
        let mut kept: IndexMap<String, CanonicalParameter> = IndexMap::new();
        for (name, param) in params {
            let mut index = 0usize;
            let generic = NUMERIC_SEGMENT.replace_all(&name, |_: &Captures<'_>| {
                let letter = PLACEHOLDER_LETTERS[index % PLACEHOLDER_LETTERS.len()];
                index += 1;
                format!(".{letter}")
            });
            if index == 0 {
                kept.insert(name, param);
            } else if seen.insert(generic.to_string()) {
                kept.insert(generic.into_owned(), param);
            }
        }
        collapsed.insert(section, kept);
    }

    collapsed
}

/// Builds the canonical schema for one node from its raw metadata.
///
/// Only the `required`/`optional` input sections are documented. Output
/// parameters zip names, types, and tooltips; the zip stops at the
/// shortest sequence, so missing tooltips shorten the output table rather
/// than failing.
#[must_use]
pub fn build_schema(raw: &RawNodeMetadata) -> CanonicalNodeSchema {
    let mut input_parameters: IndexMap<String, IndexMap<String, CanonicalParameter>> =
        IndexMap::new();

    for (section, params) in &raw.input {
        if !DOCUMENTED_SECTIONS.contains(&section.as_str()) {
            continue;
        }
        let mut normalized = IndexMap::new();
        for (name, descriptor) in params {
            let parts = descriptor.as_array().map_or(&[][..], Vec::as_slice);
            normalized.insert(name.clone(), normalize_descriptor(parts));
        }
        input_parameters.insert(section.clone(), normalized);
    }

    let return_types: Vec<String> = raw
        .output
        .iter()
        .map(|v| match v.as_array() {
            Some(list) => combo_type(list).to_string(),
            None => display_string(v),
        })
        .collect();

    let mut output_parameters = IndexMap::new();
    for ((name, kind), tooltip) in raw
        .output_name
        .iter()
        .zip(&return_types)
        .zip(&raw.output_tooltips)
    {
        output_parameters.insert(name.to_lowercase(), format!("{kind}${tooltip}"));
    }

    CanonicalNodeSchema {
        class: raw.name.clone(),
        name: raw.name.clone(),
        category: raw.category.trim_matches('\n').trim().to_string(),
        output_node: raw.output_node,
        description: raw.description.clone(),
        input_parameters: collapse_repeating(input_parameters),
        output_parameters,
    }
}
