//! Diagnostic tracing.
//!
//! Output always goes to stderr; stdout belongs to the JSON-RPC stream when
//! serving over stdio. Step banners (`echo_steps`) are separate and are not
//! affected by `RUST_LOG`.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Default filter when `RUST_LOG` is unset.
pub const DEFAULT_FILTER: &str = "warn";

/// Initialize the tracing subscriber.
///
/// Reads `RUST_LOG`, falling back to `default_filter`. Compact format.
///
/// # Example
/// ```bash
/// RUST_LOG=lotus=debug lotus serve
/// ```
pub fn init(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .init();
}
