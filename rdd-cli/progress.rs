//! Terminal progress bar.

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use rdd_core::ProgressSink;

const BAR_TEMPLATE: &str =
    "{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {bytes}/{total_bytes} ({bytes_per_sec}, {eta})";

const SPINNER_TEMPLATE: &str = "{spinner:.green} [{elapsed_precise}] {bytes} ({bytes_per_sec})";

/// [`ProgressSink`] drawing an `indicatif` bar on stderr.
///
/// A byte bar is used when the total is known, a spinner otherwise.
pub struct BarProgress {
    bar: ProgressBar,
    enabled: bool,
}

impl BarProgress {
    pub fn new(enabled: bool) -> Self {
        Self {
            bar: ProgressBar::hidden(),
            enabled,
        }
    }

    /// Leaves the bar where it stopped after a failed transfer.
    pub fn abandon(&self) {
        self.bar.abandon();
    }

    pub fn position(&self) -> u64 {
        self.bar.position()
    }
}

impl ProgressSink for BarProgress {
    fn start(&mut self, total: Option<u64>) {
        if !self.enabled {
            return;
        }
        self.bar = match total {
            Some(total) => {
                let bar = ProgressBar::new(total);
                bar.set_style(
                    ProgressStyle::with_template(BAR_TEMPLATE)
                        .unwrap_or_else(|_| ProgressStyle::default_bar())
                        .progress_chars("#>-"),
                );
                bar
            }
            None => {
                let bar = ProgressBar::new_spinner();
                bar.set_style(
                    ProgressStyle::with_template(SPINNER_TEMPLATE)
                        .unwrap_or_else(|_| ProgressStyle::default_spinner()),
                );
                bar.enable_steady_tick(Duration::from_millis(120));
                bar
            }
        };
    }

    fn update(&mut self, position: u64) {
        self.bar.set_position(position);
    }

    fn finish(&mut self) {
        self.bar.finish();
    }
}
