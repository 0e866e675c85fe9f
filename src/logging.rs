//! Diagnostic tracing for the CLI.
//!
//! The library emits `tracing` events (block processing, resolution
//! decisions, staged paths). Nothing is printed unless a subscriber is
//! installed; the binary installs one through [`init`].

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install a stderr subscriber filtered by `RUST_LOG`.
///
/// Falls back to `default_level` when `RUST_LOG` is unset or invalid.
///
/// ```bash
/// RUST_LOG=asset_flow=debug asset-flow process -f page.json
/// ```
pub fn init(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    // A subscriber may already be installed (e.g. by an embedding program).
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .try_init();
}
