// Logging configuration
//
// Verbosity is a plain value handed to each component; there is no
// process-wide flag.

use std::io::IsTerminal;
use tracing_subscriber::EnvFilter;

/// Per-component logging settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LogConfig {
    /// Emit per-run detail (each repetition, each verdict) at info level
    pub verbose: bool,
}

impl LogConfig {
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }

    /// Log a detail line: info when verbose, debug otherwise.
    pub fn detail(&self, message: impl AsRef<str>) {
        if self.verbose {
            tracing::info!("{}", message.as_ref());
        } else {
            tracing::debug!("{}", message.as_ref());
        }
    }

    /// Default filter directive for the binaries.
    pub fn default_directive(&self) -> &'static str {
        if self.verbose {
            "debug"
        } else {
            "info"
        }
    }
}

/// Install the fmt subscriber for a binary. `RUST_LOG` wins over
/// `default_directive`.
pub fn init_tracing(default_directive: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));

    // A second init (e.g. from tests) is harmless; keep the first subscriber.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(std::io::stdout().is_terminal())
        .try_init();
}
