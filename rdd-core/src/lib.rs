//! # rdd-core
//!
//! Transfer engine behind the `rdd` disk duplication tool.
//!
//! A transfer copies one source (a file, a block device, standard input or an
//! HTTP URL) onto one destination (a file, a block device or standard output).
//! Compressed sources are decoded on the fly, destinations that are mounted are
//! refused before anything is written, and regular-file sources are copied
//! extent by extent so that holes stay holes.
//!
//! ```no_run
//! use rdd_core::{parse_size, NoProgress, Transfer, TransferRequest};
//!
//! let request = TransferRequest::new("disk.img.xz", "/dev/sdd")
//!     .with_block_size(parse_size("1M")? as usize);
//! let summary = Transfer::new(request).run(&mut NoProgress)?;
//! println!("{} bytes copied", summary.bytes_copied);
//! # Ok::<(), rdd_core::Error>(())
//! ```

pub mod compression;
pub mod config;
pub mod engine;
pub mod error;
pub mod extents;
pub mod mount;
pub mod progress;
pub mod size;
pub mod stream;

pub use compression::{CompressionMode, ConcreteMode};
pub use config::{Locator, TransferRequest, DEFAULT_BLOCK_SIZE};
pub use engine::{CopyStrategy, Transfer, TransferState, TransferSummary};
pub use error::{Error, Result};
pub use extents::{Extent, Extents, HoleSeek};
pub use mount::{MountEntry, MountSafetyChecker};
pub use progress::{NoProgress, ProgressSink, ProgressState};
pub use size::parse_size;
pub use stream::{open_source, SourceStream};
