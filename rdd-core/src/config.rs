//! Configuration types and constants for rdd transfers.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::compression::CompressionMode;

/// Default copy buffer size (4 MiB)
pub const DEFAULT_BLOCK_SIZE: usize = 4 * 1024 * 1024;

/// Live mount information of the calling process
pub const MOUNTINFO_PATH: &str = "/proc/self/mountinfo";

/// Operand that selects standard input or standard output
pub const STDIO_MARKER: &str = "-";

/// File extension for gzip compressed images
pub const GZIP_EXTENSION: &str = "gz";

/// File extension for bzip2 compressed images
pub const BZIP2_EXTENSION: &str = "bz2";

/// File extension for XZ compressed images
pub const XZ_EXTENSION: &str = "xz";

/// Where a transfer reads from or writes to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Locator {
    /// Standard input (as a source) or standard output (as a destination)
    Stdio,
    /// HTTP(S) URL, only meaningful as a source
    Url(String),
    /// Regular file or device node
    Path(PathBuf),
}

impl Locator {
    /// Classifies a command-line operand.
    ///
    /// `-` and the empty string denote stdio, `http://` and `https://` prefixes
    /// denote URLs and everything else is a filesystem path. The command line
    /// drops empty `if=`/`of=` values before they get here.
    pub fn parse(operand: &str) -> Self {
        if operand.is_empty() || operand == STDIO_MARKER {
            Locator::Stdio
        } else if operand.starts_with("http://") || operand.starts_with("https://") {
            Locator::Url(operand.to_string())
        } else {
            Locator::Path(PathBuf::from(operand))
        }
    }

    /// Returns the filesystem path, if this locator names one.
    pub fn as_path(&self) -> Option<&Path> {
        match self {
            Locator::Path(path) => Some(path),
            Locator::Stdio | Locator::Url(_) => None,
        }
    }

    /// Name used for extension-based format detection.
    ///
    /// Query strings and fragments are stripped from URLs. Stdio has no name.
    pub fn detection_name(&self) -> Option<String> {
        match self {
            Locator::Stdio => None,
            Locator::Url(url) => {
                let end = url.find(['?', '#']).unwrap_or(url.len());
                Some(url[..end].to_string())
            }
            Locator::Path(path) => Some(path.to_string_lossy().into_owned()),
        }
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Locator::Stdio => f.write_str("(stdio)"),
            Locator::Url(url) => f.write_str(url),
            Locator::Path(path) => write!(f, "{}", path.display()),
        }
    }
}

impl From<&str> for Locator {
    fn from(operand: &str) -> Self {
        Locator::parse(operand)
    }
}

/// A single, immutable transfer description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferRequest {
    source: Locator,
    destination: Locator,
    block_size: usize,
    compression: CompressionMode,
}

impl TransferRequest {
    /// Creates a request with the default block size and automatic decompression.
    pub fn new(source: impl Into<Locator>, destination: impl Into<Locator>) -> Self {
        Self {
            source: source.into(),
            destination: destination.into(),
            block_size: DEFAULT_BLOCK_SIZE,
            compression: CompressionMode::Auto,
        }
    }

    /// Sets the copy buffer size. Zero selects [`DEFAULT_BLOCK_SIZE`].
    #[must_use]
    pub fn with_block_size(mut self, block_size: usize) -> Self {
        self.block_size = if block_size == 0 {
            DEFAULT_BLOCK_SIZE
        } else {
            block_size
        };
        self
    }

    /// Sets the compression mode.
    #[must_use]
    pub fn with_compression(mut self, compression: CompressionMode) -> Self {
        self.compression = compression;
        self
    }

    pub fn source(&self) -> &Locator {
        &self.source
    }

    pub fn destination(&self) -> &Locator {
        &self.destination
    }

    pub fn block_size(&self) -> usize {
        self.block_size
    }

    pub fn compression(&self) -> CompressionMode {
        self.compression
    }
}
