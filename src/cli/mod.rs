//! CLI interface for bmpm
//!
//! Provides the `encode`, `guess` and `languages` commands.

pub mod args;
pub mod commands;

pub use args::{Cli, Commands};

use tracing_subscriber::EnvFilter;

/// Installs the stderr log subscriber.
///
/// With no `-v`, `RUST_LOG` decides and defaults to warnings only.
pub fn init_tracing(verbosity: u8) {
    let filter = match verbosity {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("bmpm=warn")),
        1 => EnvFilter::new("bmpm=debug"),
        _ => EnvFilter::new("bmpm=trace"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
