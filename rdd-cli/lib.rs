//! Command-line front end for rdd.
//!
//! Turns dd-style operands into a [`TransferRequest`](rdd_core::TransferRequest),
//! suggests a removable device when no destination was given and drives the
//! transfer with a progress bar on stderr.

use std::io::{self, Write};

use rdd_core::{Transfer, TransferSummary};
use tracing::warn;

pub mod args;
pub mod config;
pub mod devices;
pub mod error;
pub mod logging;
pub mod progress;


pub use args::{parse_operands, Operands};
pub use config::CliConfig;
pub use devices::{DeviceEnumerator, SysfsEnumerator};
pub use error::CliError;
pub use logging::init_logging;
pub use progress::BarProgress;

/// Runs one invocation against the live system.
///
/// # Errors
///
/// Returns [`CliError::Parse`] for bad or incomplete operands and
/// [`CliError::Transfer`] when the transfer fails.
pub fn run(operands: &[String], config: &CliConfig) -> Result<TransferSummary, CliError> {
    run_with(
        operands,
        config,
        &SysfsEnumerator::default(),
        &mut io::stdout().lock(),
    )
}

/// Like [`run`], with the device list and hint output supplied by the caller.
///
/// # Errors
///
/// See [`run`].
pub fn run_with(
    operands: &[String],
    config: &CliConfig,
    devices: &dyn DeviceEnumerator,
    out: &mut dyn Write,
) -> Result<TransferSummary, CliError> {
    let operands = parse_operands(operands).map_err(CliError::Parse)?;
    if operands.needs_target() {
        suggest_devices(devices, out);
    }
    let request = operands.into_request().map_err(CliError::Parse)?;

    let mut progress = BarProgress::new(config.show_progress());
    let result = Transfer::new(request).run(&mut progress);
    if result.is_err() {
        progress.abandon();
    }
    result.map_err(CliError::Transfer)
}

/// Best effort: failing to list devices never hides the real error.
fn suggest_devices(devices: &dyn DeviceEnumerator, out: &mut dyn Write) {
    let found = devices.removable_devices().unwrap_or_else(|err| {
        warn!(error = %err, "cannot list removable devices");
        Vec::new()
    });
    if let Err(err) = devices::write_hint(out, &found).and_then(|()| out.flush()) {
        warn!(error = %err, "cannot print device hint");
    }
}
