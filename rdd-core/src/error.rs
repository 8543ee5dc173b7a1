//! Error types for rdd transfer operations.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Main error type for rdd operations.
///
/// Parse-time variants (`MalformedSize`, `UnknownCompressionType`,
/// `UnknownArgument`, `MissingOperand`) are produced before any destination is
/// touched. Everything else is raised by a running transfer and is terminal for it.
#[derive(Debug, Error)]
pub enum Error {
    /// Size operand whose numeric part does not parse
    #[error("invalid size {input:?}")]
    MalformedSize {
        /// The rejected operand
        input: String,
    },

    /// Unrecognized `comp=` token
    #[error("unknown compression type {token:?}")]
    UnknownCompressionType {
        /// The rejected token
        token: String,
    },

    /// Operand with an unknown key
    #[error("unknown argument {token:?}")]
    UnknownArgument {
        /// The whole rejected operand
        token: String,
    },

    /// A required operand was not supplied
    #[error("{message}")]
    MissingOperand {
        /// Human-readable hint
        message: String,
    },

    /// The destination is, or contains, a mounted device
    #[error("{} is mounted on {}", mount_source.display(), mount_point.display())]
    DestinationMounted {
        /// Device backing the conflicting mount
        mount_source: PathBuf,
        /// Where it is mounted
        mount_point: PathBuf,
    },

    /// Mount information exists but could not be read
    #[error("{}: cannot read mount table: {source}", path.display())]
    MountTableUnreadable {
        /// Path of the mount information file
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },

    /// Failed to open the source
    #[error("{locator}: {source}")]
    SourceOpenFailed {
        /// Source as given by the caller
        locator: String,
        /// Underlying I/O or transport error
        #[source]
        source: io::Error,
    },

    /// Compressed data that the selected decoder rejects
    #[error("{locator}: unsupported stream: {message}")]
    UnsupportedStream {
        /// Source as given by the caller
        locator: String,
        /// Decoder diagnostic
        message: String,
    },

    /// Failed to create or open the destination
    #[error("{}: {source}", path.display())]
    DestinationCreateFailed {
        /// Destination path
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },

    /// Read, write, seek or sync failure during the copy
    #[error("{context} failed: {source}")]
    Io {
        /// What the engine was doing
        context: &'static str,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },
}

impl Error {
    pub(crate) fn io(context: &'static str, source: io::Error) -> Self {
        Error::Io { context, source }
    }

    /// Returns `true` for errors raised while interpreting user input.
    pub fn is_usage(&self) -> bool {
        matches!(
            self,
            Error::MalformedSize { .. }
                | Error::UnknownCompressionType { .. }
                | Error::UnknownArgument { .. }
                | Error::MissingOperand { .. }
        )
    }
}

/// Specialized `Result` type for rdd operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<Error> for io::Error {
    fn from(err: Error) -> Self {
        match &err {
            Error::MalformedSize { .. }
            | Error::UnknownCompressionType { .. }
            | Error::UnknownArgument { .. }
            | Error::MissingOperand { .. } => io::Error::new(io::ErrorKind::InvalidInput, err),
            Error::DestinationMounted { .. } => io::Error::other(err),
            Error::UnsupportedStream { .. } => io::Error::new(io::ErrorKind::InvalidData, err),
            Error::MountTableUnreadable { source, .. }
            | Error::SourceOpenFailed { source, .. }
            | Error::DestinationCreateFailed { source, .. }
            | Error::Io { source, .. } => {
                // Preserve the original error kind
                io::Error::new(source.kind(), err)
            }
        }
    }
}
