//! Tracing setup for the binary.
//!
//! Library code only emits `tracing` events; installing a subscriber is left
//! to `main`.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the tracing subscriber.
///
/// `RUST_LOG` wins when set, otherwise `default_level` is used.
/// Output goes to stderr so stdout stays reserved for reports.
pub fn init(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .init();
}
