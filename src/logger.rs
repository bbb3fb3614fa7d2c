//! Logging setup for the command line tool.
//!
//! Diagnostics go to stderr so stdout stays free for `--json` output.

pub use tracing::{debug, error, info, warn, trace, instrument};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt::{self, format::FmtSpan}};

/// Installs the global subscriber. `RUST_LOG` takes precedence over `default_level`.
pub fn init(default_level: &str) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    let span_events = span_events_for(&env_filter);
    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_timer(fmt::time::uptime())
        .with_span_events(span_events);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();
}

/// Per-phase span timings only once debug output is enabled.
fn span_events_for(filter: &EnvFilter) -> FmtSpan {
    match filter.max_level_hint() {
        Some(level) if level >= LevelFilter::DEBUG => FmtSpan::CLOSE,
        _ => FmtSpan::NONE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn span_timings_follow_the_filter_level() {
        assert_eq!(span_events_for(&EnvFilter::new("info")), FmtSpan::NONE);
        assert_eq!(span_events_for(&EnvFilter::new("warn")), FmtSpan::NONE);
        assert_eq!(span_events_for(&EnvFilter::new("debug")), FmtSpan::CLOSE);
        assert_eq!(span_events_for(&EnvFilter::new("info,streetsphere=trace")), FmtSpan::CLOSE);
    }
}
