//! Diagnostic logging.
//!
//! Diagnostics go to stderr so command output on stdout stays clean for
//! scripts and pipes. The filter comes from `STOCKROOM_LOG` using the usual
//! `EnvFilter` directive syntax (`debug`, `stockroom::codec=trace`, ...).

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

pub const LOG_ENV: &str = "STOCKROOM_LOG";
const DEFAULT_DIRECTIVE: &str = "warn";

/// Build the filter from `STOCKROOM_LOG`, falling back to `warn` when it is
/// unset or unparseable.
pub fn filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE))
}

/// Install the global subscriber. Safe to call more than once; later calls
/// are ignored.
pub fn init() {
    let _ = tracing_subscriber::registry()
        .with(filter())
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_file(false)
                .with_line_number(false),
        )
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_filter_defaults_to_warn() {
        std::env::remove_var(LOG_ENV);
        assert!(filter().to_string().contains("warn"));
    }

    #[test]
    #[serial]
    fn test_filter_reads_env() {
        std::env::set_var(LOG_ENV, "debug");
        let rendered = filter().to_string();
        std::env::remove_var(LOG_ENV);
        assert!(rendered.contains("debug"));
    }

    #[test]
    fn test_init_twice_is_harmless() {
        init();
        init();
    }
}
