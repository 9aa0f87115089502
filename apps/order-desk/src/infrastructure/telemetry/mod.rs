//! Tracing Setup
//!
//! Installs the global `tracing` subscriber. `RUST_LOG` is honoured; the
//! crate and `tower_http` default to `info`.
//!
//! # Usage
//!
//! ```ignore
//! use order_desk::infrastructure::telemetry;
//!
//! telemetry::init(RunMode::Development);
//! tracing::info!("Server starting");
//! ```

use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::infrastructure::config::RunMode;

/// Directives added on top of `RUST_LOG`.
const DEFAULT_DIRECTIVES: [&str; 2] = ["order_desk=info", "tower_http=info"];

/// Build the filter from `RUST_LOG` plus the default directives.
///
/// Uses static directive strings that are compile-time constants guaranteed to parse.
#[must_use]
#[allow(clippy::expect_used)]
pub fn env_filter() -> EnvFilter {
    DEFAULT_DIRECTIVES
        .iter()
        .fold(EnvFilter::from_default_env(), |filter, directive| {
            filter.add_directive(directive.parse().expect("static directive is valid"))
        })
}

/// Initialize the global subscriber.
///
/// Development gets human-readable lines, production gets one JSON object
/// per event. Calling this twice is a no-op.
pub fn init(run_mode: RunMode) {
    let registry = tracing_subscriber::registry().with(env_filter());

    let result = if run_mode.is_production() {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_current_span(false)
                    .with_target(true),
            )
            .try_init()
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_file(false)
                    .with_line_number(false),
            )
            .try_init()
    };

    if let Err(e) = result {
        tracing::debug!(error = %e, "Tracing subscriber already installed");
    }
}
