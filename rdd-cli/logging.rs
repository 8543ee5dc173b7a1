//! Tracing subscriber setup.

use std::io;

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::error::CliError;

/// Maps `-q` and the `-v` count to a level name.
///
/// `-q` wins over any verbosity: only errors are logged.
pub fn level_for(verbosity: u8, quiet: bool) -> &'static str {
    if quiet {
        return "error";
    }
    match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Installs the global subscriber, writing to stderr.
///
/// `RUST_LOG` overrides the level derived from the flags.
///
/// # Errors
///
/// Returns [`CliError::Logging`] if a global subscriber is already set.
pub fn init_logging(verbosity: u8, quiet: bool) -> Result<(), CliError> {
    let level = level_for(verbosity, quiet);
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("rdd={level},rdd_cli={level},rdd_core={level}")));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(io::stderr)
                .with_target(verbosity >= 2)
                .with_file(verbosity >= 3)
                .with_line_number(verbosity >= 3),
        )
        .try_init()
        .map_err(|err| CliError::Logging(err.to_string()))
}
