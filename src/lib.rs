//! `nodedocs`: help-page documentation service for node-based visual
//! editor plugins.
//!
//! Fetches node metadata from the host runtime's introspection endpoint,
//! normalizes it into a canonical schema, renders HTML and Markdown help
//! pages, and serves them over HTTP with a process-lifetime cache.

pub mod cli;
pub mod config;
pub mod error;
pub mod normalize;
pub mod observability;
pub mod registry;
pub mod render;
pub mod schema;
pub mod server;
pub mod store;
