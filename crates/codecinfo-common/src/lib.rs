//! Shared utilities for codecinfo: logging setup and error types.
//!
//! This crate provides common infrastructure used by the aggregator and the CLI.

#![forbid(unsafe_code)]

pub mod error;

pub use error::{Error, Result};

/// Initialize tracing with a specific default level.
///
/// Log level is controlled by the `RUST_LOG` environment variable and falls
/// back to `default_level`. Output goes to stderr so the report on stdout
/// stays clean.
pub fn init_tracing_with_default(default_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}
