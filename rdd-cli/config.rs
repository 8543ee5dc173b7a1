//! Configuration for a CLI invocation.

/// Name used in diagnostics and as the logging target.
pub const PROGRAM_NAME: &str = "rdd";

/// Front-end settings, separate from the transfer itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CliConfig {
    /// Number of `-v` flags
    pub verbosity: u8,
    /// Only report errors, no progress bar
    pub quiet: bool,
    /// Draw a progress bar on stderr
    pub progress: bool,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            verbosity: 0,
            quiet: false,
            progress: true,
        }
    }
}

impl CliConfig {
    /// Whether a progress bar should be drawn.
    pub fn show_progress(&self) -> bool {
        self.progress && !self.quiet
    }
}
