//! Command line argument parsing for rdd

use clap::Parser;

use rdd_cli::CliConfig;

/// dd for disk images
///
/// Copies an image onto a device (or anywhere else), decompressing gzip,
/// bzip2 and xz images on the fly and refusing to overwrite mounted devices.
#[derive(Parser, Debug)]
#[command(
    name = "rdd",
    version = "0.1.1",
    about = "Copy disk images onto devices, safely",
    long_about = "rdd copies SOURCE to DEST like dd, but refuses to write to a mounted \
                  device, decompresses .gz, .bz2 and .xz images on the fly and keeps \
                  holes of sparse files.\n\n\
                  Operands are either `SOURCE DEST` or any of `if=SOURCE`, `of=DEST`, \
                  `bs=SIZE` (512, 4K, 1M, 5kB, ...) and `comp=auto|none|gz|bz2|xz`. \
                  `-` means standard input or output; http(s) URLs are accepted as SOURCE."
)]
pub struct RddOpts {
    /// `SOURCE DEST`, or `if=`, `of=`, `bs=` and `comp=` operands
    #[arg(value_name = "OPERAND")]
    pub operands: Vec<String>,

    /// Log more (repeat for debug and trace output)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count, conflicts_with = "quiet")]
    pub verbose: u8,

    /// Only report errors and hide the progress bar
    #[arg(short = 'q', long = "quiet", conflicts_with = "verbose")]
    pub quiet: bool,

    /// Hide the progress bar
    #[arg(long = "no-progress")]
    pub no_progress: bool,
}

impl RddOpts {
    /// Parse command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    pub fn config(&self) -> CliConfig {
        CliConfig {
            verbosity: self.verbose,
            quiet: self.quiet,
            progress: !self.no_progress,
        }
    }
}
