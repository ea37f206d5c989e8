//! The node name registry.
//!
//! Maps node class identifiers to display names. The catalog itself is
//! owned by the host runtime; this service consumes a JSON snapshot of
//! the mapping plus a plain-text skip-list (`ignore.txt`) of identifiers
//! that should not be documented.

use std::fs;
use std::path::Path;

use indexmap::IndexMap;

use crate::error::ConfigError;

/// Class-identifier to display-name mapping, in catalog order.
#[derive(Debug, Clone, Default)]
pub struct NodeRegistry {
    nodes: IndexMap<String, String>,
}

impl NodeRegistry {
    /// Loads the registry from a JSON object file, dropping entries named
    /// in the skip-list (one identifier per line, `#` starts a comment).
    /// A missing skip-list file means no entries are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Unreadable`] when the registry file cannot
    /// be read and [`ConfigError::MalformedRegistry`] when it is not a
    /// JSON string-to-string object.
    pub fn load(path: &Path, ignore_path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Unreadable {
            path: path.to_path_buf(),
            source,
        })?;
        let nodes: IndexMap<String, String> =
            serde_json::from_str(&raw).map_err(|source| ConfigError::MalformedRegistry {
                path: path.to_path_buf(),
                source,
            })?;

        let skipped = fs::read_to_string(ignore_path).unwrap_or_default();
        let skip: Vec<&str> = skipped
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .collect();

        Ok(Self {
            nodes: nodes
                .into_iter()
                .filter(|(class, _)| !skip.contains(&class.as_str()))
                .collect(),
        })
    }

    /// Builds a registry from `(class, display-name)` pairs.
    pub fn from_pairs(pairs: impl IntoIterator<Item = (String, String)>) -> Self {
        Self {
            nodes: pairs.into_iter().collect(),
        }
    }

    /// Iterates the known class identifiers in catalog order.
    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.nodes.keys().map(String::as_str)
    }

    /// The display name for a class, falling back to the class itself.
    #[must_use]
    pub fn display_name<'a>(&'a self, class: &'a str) -> &'a str {
        self.nodes.get(class).map_or(class, String::as_str)
    }

    /// Number of registered nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// The filesystem-safe base of a display name: everything before the
/// first parenthesized tag.
#[must_use]
pub fn display_base(display: &str) -> &str {
    display.split(" (").next().unwrap_or(display)
}
