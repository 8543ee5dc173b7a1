//! Error types for the rdd command line.

use thiserror::Error;

/// Failure of a whole invocation, tagged with the phase it happened in.
///
/// The display form is what the user sees on standard output.
#[derive(Debug, Error)]
pub enum CliError {
    /// Operands could not be turned into a transfer request
    #[error("failed to parse args: {0}")]
    Parse(#[source] rdd_core::Error),

    /// The transfer itself failed
    #[error("failed to dd: {0}")]
    Transfer(#[source] rdd_core::Error),

    /// The tracing subscriber could not be installed
    #[error("failed to initialize logging: {0}")]
    Logging(String),
}

impl CliError {
    /// The underlying transfer-layer error, if any.
    pub fn core(&self) -> Option<&rdd_core::Error> {
        match self {
            CliError::Parse(err) | CliError::Transfer(err) => Some(err),
            CliError::Logging(_) => None,
        }
    }
}
