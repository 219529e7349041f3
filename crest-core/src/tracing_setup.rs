//! Tracing setup for hosts embedding the selector.
//!
//! Console-only: a library crate has no business owning log files. Hosts
//! with their own subscriber should skip this and just depend on the
//! `tracing` events the selector emits.

use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Initializes a console tracing subscriber at the given level.
///
/// `RUST_LOG` takes precedence over `console_level` when set.
///
/// # Errors
///
/// - `Box<dyn std::error::Error + Send + Sync>` - If a global subscriber is already installed
pub fn init_tracing(
    console_level: Level,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(console_level.to_string()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()?;

    Ok(())
}
