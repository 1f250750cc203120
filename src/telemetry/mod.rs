//! Tracing initialization.

use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Used when RUST_LOG is unset or unparsable.
pub const DEFAULT_FILTER: &str = "info,tower_http=info,axum=info";

/// Install the global subscriber.
///
/// Use RUST_LOG to configure, e.g.:
/// RUST_LOG=debug,bbc_casino=trace,tower_http=info
pub fn init() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(true))
        .try_init()?;
    Ok(())
}
