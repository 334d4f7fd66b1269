//! Tracing initialization and configuration.

use std::sync::Once;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

static INIT: Once = Once::new();

/// Initialize the tracing/logging system.
///
/// Reads the `SQLGUARD_LOG` environment variable for per-subsystem log
/// levels. Format: `SQLGUARD_LOG=classifier=debug,detect=info`.
///
/// Falls back to `sqlguard=info` if `SQLGUARD_LOG` is not set or invalid.
///
/// Idempotent — calling it multiple times is safe.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_env("SQLGUARD_LOG")
            .unwrap_or_else(|_| EnvFilter::new("sqlguard=info"));

        tracing_subscriber::registry()
            .with(fmt::layer().with_target(true).with_line_number(true))
            .with(filter)
            .init();
    });
}
