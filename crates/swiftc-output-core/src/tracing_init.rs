//! Log subscriber setup.
//!
//! Records are written to stdout, so every log line goes to stderr. ANSI
//! colour is only used when stderr is a terminal.

use std::io::IsTerminal;

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::LoggingConfig;

/// Install the global subscriber described by `logging`.
///
/// `RUST_LOG` wins over `logging.filter` when it is set.
pub fn init_tracing(logging: &LoggingConfig) {
    let rust_log = std::env::var("RUST_LOG").ok();
    let filter = EnvFilter::new(filter_directive(logging, rust_log.as_deref()));

    let (json, text) = if logging.json {
        (Some(fmt::layer().json().with_writer(std::io::stderr)), None)
    } else {
        let text = fmt::layer()
            .with_writer(std::io::stderr)
            .with_ansi(std::io::stderr().is_terminal());
        (None, Some(text))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(json)
        .with(text)
        .init();
}

fn filter_directive<'a>(logging: &'a LoggingConfig, rust_log: Option<&'a str>) -> &'a str {
    rust_log
        .filter(|v| !v.trim().is_empty())
        .unwrap_or(&logging.filter)
}
