//! Tracing setup and the default session observer.

mod events;

use std::sync::Once;

use hmb_core::config::defaults::DEFAULT_LOG_FILTER;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

pub use events::TracingObserver;

static INIT: Once = Once::new();

/// Install a global tracing subscriber for applications that do not bring
/// their own.
///
/// Reads the `HMB_LOG` environment variable for filtering, falling back to
/// `hmb_client=info`. Only the first call of any initializer has an effect.
pub fn init_tracing() {
    INIT.call_once(|| {
        // The host application may already have installed a subscriber.
        let _ = tracing_subscriber::registry()
            .with(fmt::layer().with_target(true).with_thread_ids(true))
            .with(env_filter())
            .try_init();
    });
}

/// Like [`init_tracing`], with structured JSON output.
pub fn init_tracing_json() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_file(true)
                    .with_line_number(true)
                    .json(),
            )
            .with(env_filter())
            .try_init();
    });
}

/// Initialize tracing with a custom filter string (for testing or embedding).
pub fn init_tracing_with_filter(filter: &str) {
    let filter = EnvFilter::new(filter);
    INIT.call_once(|| {
        let _ = tracing_subscriber::registry()
            .with(fmt::layer().with_target(true).with_test_writer())
            .with(filter)
            .try_init();
    });
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_env("HMB_LOG").unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER))
}
