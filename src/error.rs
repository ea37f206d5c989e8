//! Error types for `nodedocs`.
//!
//! Failures after startup are recovered into placeholder documents and
//! never surface here; this hierarchy covers the startup path (bad
//! configuration, unreadable resources) plus template rendering.

use std::path::PathBuf;
use thiserror::Error;

/// Exit codes for the `nodedocs` binary, following Unix conventions.
pub struct ExitCode;

impl ExitCode {
    /// Successful execution
    pub const SUCCESS: i32 = 0;

    /// General error
    pub const ERROR: i32 = 1;

    /// Configuration error (bad flag value, malformed registry)
    pub const CONFIG_ERROR: i32 = 2;

    /// I/O error (bind failure, unreadable resource)
    pub const IO_ERROR: i32 = 3;

    /// Interrupted by SIGINT (Ctrl+C)
    pub const INTERRUPTED: i32 = 130;

    /// Terminated by SIGTERM
    pub const TERMINATED: i32 = 143;
}

/// Top-level error type aggregating all startup failure modes.
#[derive(Debug, Error)]
pub enum NodedocsError {
    /// Configuration loading or validation error
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Template loading or rendering error
    #[error(transparent)]
    Template(#[from] TemplateError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl NodedocsError {
    /// Maps the error to its process exit code.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) | Self::Json(_) => ExitCode::CONFIG_ERROR,
            Self::Io(_) => ExitCode::IO_ERROR,
            Self::Template(_) => ExitCode::ERROR,
        }
    }
}

/// Configuration resolution errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Listen address could not be parsed
    #[error("invalid bind address \"{input}\": {message}")]
    InvalidBindAddr {
        /// The flag/environment value as given
        input: String,
        /// Parser diagnostic
        message: String,
    },

    /// A configured resource file could not be read
    #[error("cannot read {path}: {source}")]
    Unreadable {
        /// Path to the resource
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// Node registry file is not a JSON string-to-string object
    #[error("malformed node registry {path}: {source}")]
    MalformedRegistry {
        /// Path to the registry file
        path: PathBuf,
        /// Underlying parse error
        source: serde_json::Error,
    },
}

/// Template loading and rendering errors.
#[derive(Debug, Error)]
pub enum TemplateError {
    /// Template file could not be read from the resource directory
    #[error("cannot read template {path}: {source}")]
    Unreadable {
        /// Path to the template file
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// Template failed to parse or render
    #[error("template {name}: {source}")]
    Engine {
        /// Template name within the set
        name: String,
        /// Engine diagnostic
        source: minijinja::Error,
    },
}

/// Result type alias for `nodedocs` operations.
pub type Result<T> = std::result::Result<T, NodedocsError>;
