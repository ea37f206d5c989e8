//! Runtime settings, resolved once at startup.

use std::net::SocketAddr;
use std::path::PathBuf;

use crate::cli::Cli;
use crate::error::ConfigError;

/// Immutable service settings derived from CLI flags and environment.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Listen address in full `host:port` form.
    pub bind_addr: String,

    /// Host runtime base URL, no trailing slash.
    pub upstream: String,

    /// Path to the node registry JSON file.
    pub registry_path: PathBuf,

    /// Template resource directory.
    pub res_dir: PathBuf,

    /// Internal/debug mode: export rendered documents to disk.
    pub internal: bool,

    /// Output-directory template; `{name}` is substituted with the
    /// node's display-name base.
    pub doc_dir: String,
}

impl Settings {
    /// Resolves settings from parsed CLI arguments.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidBindAddr`] when the listen address
    /// cannot be parsed.
    pub fn from_cli(cli: &Cli) -> Result<Self, ConfigError> {
        Ok(Self {
            bind_addr: parse_bind_addr(&cli.bind)?,
            upstream: cli.upstream.trim_end_matches('/').to_string(),
            registry_path: cli.registry.clone(),
            res_dir: cli.res_dir.clone(),
            internal: cli.internal,
            doc_dir: cli.doc_dir.clone(),
        })
    }

    /// Path of the skip-list consumed by the registry loader.
    #[must_use]
    pub fn ignore_path(&self) -> PathBuf {
        self.res_dir.join("ignore.txt")
    }
}

/// Parses a bind address string into a full `host:port` form.
///
/// Accepts:
/// - `:8189` → `0.0.0.0:8189`
/// - `8189` → `0.0.0.0:8189`
/// - `1.2.3.4:8189` → as-is
///
/// # Errors
///
/// Returns [`ConfigError::InvalidBindAddr`] if the result cannot be
/// parsed as a socket address.
pub fn parse_bind_addr(input: &str) -> Result<String, ConfigError> {
    let addr = if input.starts_with(':') {
        format!("0.0.0.0{input}")
    } else if input.parse::<u16>().is_ok() {
        format!("0.0.0.0:{input}")
    } else {
        input.to_string()
    };
    addr.parse::<SocketAddr>()
        .map_err(|e| ConfigError::InvalidBindAddr {
            input: input.to_string(),
            message: e.to_string(),
        })?;
    Ok(addr)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn parse_bind_addr_colon_port() {
        assert_eq!(parse_bind_addr(":8189").unwrap(), "0.0.0.0:8189");
    }

    #[test]
    fn parse_bind_addr_port_only() {
        assert_eq!(parse_bind_addr("8189").unwrap(), "0.0.0.0:8189");
    }

    #[test]
    fn parse_bind_addr_full() {
        assert_eq!(parse_bind_addr("1.2.3.4:8189").unwrap(), "1.2.3.4:8189");
    }

    #[test]
    fn parse_bind_addr_invalid() {
        assert!(parse_bind_addr("not-an-address").is_err());
    }

    #[test]
    fn upstream_trailing_slash_trimmed() {
        let cli = Cli::parse_from([
            "nodedocs",
            "--upstream",
            "http://127.0.0.1:8188/",
        ]);
        let settings = Settings::from_cli(&cli).unwrap();
        assert_eq!(settings.upstream, "http://127.0.0.1:8188");
    }

    #[test]
    fn ignore_path_under_resource_dir() {
        let cli = Cli::parse_from(["nodedocs", "--res-dir", "assets"]);
        let settings = Settings::from_cli(&cli).unwrap();
        assert_eq!(settings.ignore_path(), PathBuf::from("assets/ignore.txt"));
    }
}
