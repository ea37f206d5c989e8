//! HTML and Markdown rendering of canonical node schemas.

pub mod markdown;
pub mod templates;

use minijinja::context;
use minijinja::value::Value;
use serde::Serialize;

use crate::error::TemplateError;
use crate::schema::CanonicalNodeSchema;

pub use markdown::MarkdownSupport;
pub use templates::TemplateSet;

/// Marker substring selecting the rich node template with external links.
pub const SOURCE_TAG: &str = " (JOV)";

/// Base URL for the rendered example pages of tagged nodes.
const EXAMPLE_DOC_BASE: &str = "https://github.com/Amorano/Jovimetrix-examples/blob/master/node";
/// Base URL for the reference images of tagged nodes.
const EXAMPLE_IMAGE_BASE: &str =
    "https://raw.githubusercontent.com/Amorano/Jovimetrix-examples/master/node";

/// The artifacts rendered for one node.
#[derive(Debug, Clone)]
pub struct RenderedDocument {
    /// Self-contained HTML page.
    pub html: String,
    /// Markdown derived from the HTML, when the capability is built in.
    pub markdown: Option<String>,
}

#[derive(Serialize)]
struct InputRowContext<'a> {
    param_key: &'a str,
    #[serde(rename = "type")]
    kind: String,
    tooltip: &'a str,
    default: String,
    choice: String,
}

#[derive(Serialize)]
struct OutputRowContext<'a> {
    name: &'a str,
    #[serde(rename = "type")]
    kind: &'a str,
    description: &'a str,
}

/// Renders canonical schemas through the loaded template set.
#[derive(Debug)]
pub struct Renderer {
    templates: TemplateSet,
    markdown: MarkdownSupport,
}

impl Renderer {
    /// Builds a renderer over a template set and markdown adapter.
    #[must_use]
    pub const fn new(templates: TemplateSet, markdown: MarkdownSupport) -> Self {
        Self {
            templates,
            markdown,
        }
    }

    /// Renders the static home page.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateError`] when the home template fails to render.
    pub fn home(&self) -> Result<String, TemplateError> {
        self.templates.home()
    }

    /// Renders a schema to HTML plus optional Markdown.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateError`] when any template in the chain fails.
    pub fn render(&self, schema: &CanonicalNodeSchema) -> Result<RenderedDocument, TemplateError> {
        let html = self.render_html(schema)?;
        let markdown = self.markdown.convert(&html);
        Ok(RenderedDocument { html, markdown })
    }

    fn render_html(&self, schema: &CanonicalNodeSchema) -> Result<String, TemplateError> {
        let name = schema.name.as_str();
        let base = name.split(SOURCE_TAG).next().unwrap_or(name).trim();
        let tagged = name.contains(SOURCE_TAG);

        let (wrapper, doc_url, image_url) = if tagged {
            let slug = urlencoding::encode(base);
            (
                templates::TEMPLATE_NODE,
                format!("{EXAMPLE_DOC_BASE}/{slug}/{slug}.md"),
                format!("{EXAMPLE_IMAGE_BASE}/{slug}/{slug}.png"),
            )
        } else {
            (templates::TEMPLATE_NODE_PLAIN, String::new(), String::new())
        };

        let mut input_content = String::new();
        for (section, params) in &schema.input_parameters {
            if params.is_empty() {
                continue;
            }
            let mut rows = String::new();
            for (key, param) in params {
                rows.push_str(&self.templates.render(
                    templates::TEMPLATE_PARAM_INPUT,
                    InputRowContext {
                        param_key: key,
                        kind: join_type_tokens(&param.kind),
                        tooltip: &param.tooltip,
                        default: param.default.clone().unwrap_or_default(),
                        choice: param.choice.as_deref().unwrap_or_default().join(", "),
                    },
                )?);
            }
            input_content.push_str(&self.templates.render(
                templates::TEMPLATE_SECTION,
                context! {
                    name => section.to_uppercase(),
                    rows => Value::from_safe_string(rows),
                },
            )?);
        }

        let mut output_content = String::new();
        for (out_name, composite) in &schema.output_parameters {
            let (kind, description) = composite
                .split_once('$')
                .unwrap_or((composite.as_str(), ""));
            output_content.push_str(&self.templates.render(
                templates::TEMPLATE_PARAM_OUTPUT,
                OutputRowContext {
                    name: out_name,
                    kind,
                    description,
                },
            )?);
        }

        self.templates.render(
            wrapper,
            context! {
                title => name,
                name => name,
                boop => base,
                root1 => doc_url,
                root2 => image_url,
                category => &schema.category,
                output_node => schema.output_node,
                documentation => Value::from_safe_string(prepare_description(&schema.description)),
                input_content => Value::from_safe_string(input_content),
                output_content => Value::from_safe_string(output_content),
            },
        )
    }
}

/// Upper-cases type tokens and re-joins them with a uniform separator.
fn join_type_tokens(kind: &str) -> String {
    kind.to_uppercase()
        .split(',')
        .map(str::trim)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Prepares the free-text description for embedding: quoted-empty-string
/// artifacts stripped, HTML escaped, newlines turned into line breaks.
fn prepare_description(raw: &str) -> String {
    let stripped = raw.replace("('", "").replace("')", "");
    escape_html(&stripped).replace('\n', "<br>")
}

fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(ch),
        }
    }
    out
}
