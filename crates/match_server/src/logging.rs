//! Tracing subscriber setup.

use anyhow::Result;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Install the global fmt subscriber. `RUST_LOG` wins over `level`.
///
/// Fails if a global subscriber is already set.
pub fn init(level: &str) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false))
        .try_init()?;

    Ok(())
}
