//! Command-line arguments for the `nodedocs` binary.
//!
//! Every knob doubles as an environment variable so the service can be
//! configured without flags when launched by the host runtime.

use std::path::PathBuf;

use clap::{ArgAction, Parser, ValueEnum};

use crate::observability::LogFormat;

/// Help-page documentation service for node-based editor plugins.
#[derive(Parser, Debug)]
#[command(name = "nodedocs", author, version, about)]
pub struct Cli {
    /// Listen address (`host:port`, `:port`, or bare port).
    #[arg(long, default_value = ":8189", env = "NODEDOCS_BIND")]
    pub bind: String,

    /// Base URL of the host runtime's introspection endpoint.
    #[arg(long, default_value = "http://127.0.0.1:8188", env = "NODEDOCS_UPSTREAM")]
    pub upstream: String,

    /// Node registry JSON file (class identifier to display name).
    #[arg(long, default_value = "res/nodes.json", env = "NODEDOCS_REGISTRY")]
    pub registry: PathBuf,

    /// Template resource directory.
    #[arg(long, default_value = "res", env = "NODEDOCS_RES_DIR")]
    pub res_dir: PathBuf,

    /// Internal mode: export rendered documents to disk on bulk requests.
    #[arg(long, env = "NODEDOCS_INTERNAL")]
    pub internal: bool,

    /// Export directory template; `{name}` is replaced per node.
    #[arg(long, default_value = "_doc/{name}", env = "NODEDOCS_DOC_DIR")]
    pub doc_dir: String,

    /// Log output format.
    #[arg(long, default_value = "human", env = "NODEDOCS_LOG_FORMAT")]
    pub log_format: LogFormatArg,

    /// Increase verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all non-error output.
    #[arg(short, long)]
    pub quiet: bool,
}

/// CLI-facing log format choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormatArg {
    /// Human-readable output.
    Human,
    /// Newline-delimited JSON.
    Json,
}

impl From<LogFormatArg> for LogFormat {
    fn from(arg: LogFormatArg) -> Self {
        match arg {
            LogFormatArg::Human => Self::Human,
            LogFormatArg::Json => Self::Json,
        }
    }
}
