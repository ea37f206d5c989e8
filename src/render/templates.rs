//! Named-placeholder HTML templates.
//!
//! The presentation layer is a fixed table of minijinja templates loaded
//! from a resource directory at process start. Template text is
//! configuration, not logic: rendering goes through typed contexts and
//! the engine's HTML auto-escaping, with pre-rendered fragments passed in
//! as safe strings by the caller.

use std::fs;
use std::path::Path;

use minijinja::Environment;
use serde::Serialize;

use crate::error::TemplateError;

/// Wrapper template for nodes carrying the source tag (external links).
pub const TEMPLATE_NODE: &str = "template_node.html";
/// Wrapper template for all other nodes.
pub const TEMPLATE_NODE_PLAIN: &str = "template_node_plain.html";
/// One input section block.
pub const TEMPLATE_SECTION: &str = "template_section.html";
/// One input parameter row.
pub const TEMPLATE_PARAM_INPUT: &str = "template_param_input.html";
/// One output parameter row.
pub const TEMPLATE_PARAM_OUTPUT: &str = "template_param_output.html";
/// The service home page.
pub const TEMPLATE_HOME: &str = "home.html";

const TEMPLATE_FILES: [&str; 6] = [
    TEMPLATE_NODE,
    TEMPLATE_NODE_PLAIN,
    TEMPLATE_SECTION,
    TEMPLATE_PARAM_INPUT,
    TEMPLATE_PARAM_OUTPUT,
    TEMPLATE_HOME,
];

/// The loaded template table.
#[derive(Debug)]
pub struct TemplateSet {
    env: Environment<'static>,
}

impl TemplateSet {
    /// Loads every template file from `dir`.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateError::Unreadable`] for a missing file and
    /// [`TemplateError::Engine`] for template syntax errors.
    pub fn load(dir: &Path) -> Result<Self, TemplateError> {
        let mut sources = Vec::with_capacity(TEMPLATE_FILES.len());
        for name in TEMPLATE_FILES {
            let path = dir.join(name);
            let source = fs::read_to_string(&path)
                .map_err(|source| TemplateError::Unreadable { path, source })?;
            sources.push((name.to_string(), source));
        }
        Self::from_sources(sources)
    }

    /// Builds a set from in-memory `(name, source)` pairs.
    pub fn from_sources(
        sources: impl IntoIterator<Item = (String, String)>,
    ) -> Result<Self, TemplateError> {
        let mut env = Environment::new();
        for (name, source) in sources {
            env.add_template_owned(name.clone(), source)
                .map_err(|source| TemplateError::Engine { name, source })?;
        }
        Ok(Self { env })
    }

    /// Renders the named template with the given context.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateError::Engine`] when the template is absent from
    /// the set or fails to render.
    pub fn render<S: Serialize>(&self, name: &str, ctx: S) -> Result<String, TemplateError> {
        let template = self
            .env
            .get_template(name)
            .map_err(|source| TemplateError::Engine {
                name: name.to_string(),
                source,
            })?;
        template.render(ctx).map_err(|source| TemplateError::Engine {
            name: name.to_string(),
            source,
        })
    }

    /// Renders the static home page.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateError::Engine`] when the home template fails to
    /// render.
    pub fn home(&self) -> Result<String, TemplateError> {
        self.render(TEMPLATE_HOME, minijinja::context! {})
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use minijinja::context;
    use std::path::PathBuf;

    fn res_dir() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("res")
    }

    #[test]
    fn loads_shipped_resource_directory() {
        let set = TemplateSet::load(&res_dir()).unwrap();
        assert!(set.home().unwrap().contains("<html"));
    }

    #[test]
    fn missing_directory_is_unreadable() {
        let err = TemplateSet::load(Path::new("/nonexistent/res")).unwrap_err();
        assert!(matches!(err, TemplateError::Unreadable { .. }));
    }

    #[test]
    fn html_templates_auto_escape() {
        let set = TemplateSet::from_sources([(
            "row.html".to_string(),
            "<td>{{ value }}</td>".to_string(),
        )])
        .unwrap();
        let out = set.render("row.html", context! { value => "a<b&c" }).unwrap();
        assert_eq!(out, "<td>a&lt;b&amp;c</td>");
    }

    #[test]
    fn unknown_template_is_engine_error() {
        let set = TemplateSet::from_sources([]).unwrap();
        let err = set.render("nope.html", context! {}).unwrap_err();
        assert!(matches!(err, TemplateError::Engine { .. }));
    }

    #[test]
    fn bad_syntax_is_engine_error() {
        let err =
            TemplateSet::from_sources([("bad.html".to_string(), "{{ open".to_string())])
                .unwrap_err();
        assert!(matches!(err, TemplateError::Engine { .. }));
    }
}
