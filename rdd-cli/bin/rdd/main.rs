//! rdd: dd for disk images
//!
//! Copies an image onto a device, decompressing on the fly and refusing to
//! overwrite anything that is mounted.

use std::process;

mod opts;

use opts::RddOpts;

use rdd_cli::config::PROGRAM_NAME;
use rdd_cli::{init_logging, run};

fn main() {
    let opts = RddOpts::parse();
    let config = opts.config();

    if let Err(err) = init_logging(config.verbosity, config.quiet) {
        eprintln!("{PROGRAM_NAME}: {err}");
    }

    // Failures go to stdout, logs and the progress bar to stderr.
    if let Err(err) = run(&opts.operands, &config) {
        println!("{err}");
        process::exit(1);
    }
}
