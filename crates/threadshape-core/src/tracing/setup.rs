//! Tracing initialization and configuration.

use std::sync::Once;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

static INIT: Once = Once::new();

/// Environment variable holding the log filter directives.
pub const LOG_ENV_VAR: &str = "THREADSHAPE_LOG";

/// Filter used when `THREADSHAPE_LOG` is unset or invalid.
pub const DEFAULT_FILTER: &str = "threadshape_core=info,threadshape_storage=info,threadshape_analysis=info,threadshape=info";

/// Initialize the threadshape tracing/logging system.
///
/// Reads `THREADSHAPE_LOG` for per-crate log levels.
/// Format: `THREADSHAPE_LOG=threadshape_analysis=debug,threadshape_storage=warn`
///
/// Logs go to stderr so reports written to stdout stay machine-readable.
/// Idempotent: calling it more than once is safe.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_env(LOG_ENV_VAR)
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_file(true)
                    .with_line_number(true),
            )
            .with(filter)
            .init();
    });
}
