//! The transfer engine: validate, open, copy, finalize.

use std::fmt;
use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::PathBuf;

use tracing::{debug, info};

use crate::compression::ConcreteMode;
use crate::config::{Locator, TransferRequest};
use crate::error::{Error, Result};
use crate::extents::Extents;
use crate::mount::MountSafetyChecker;
use crate::progress::{ProgressSink, ProgressState};
use crate::stream::open_source;


/// How the bytes were moved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyStrategy {
    /// Only data extents were read and written; holes stayed holes.
    Sparse,
    /// Every byte went through the copy buffer.
    Plain,
}

/// Phases of a transfer, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferState {
    Validating,
    Opened,
    Copying(CopyStrategy),
    Finalized,
    Succeeded,
    Failed,
}

impl fmt::Display for TransferState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransferState::Validating => f.write_str("validating"),
            TransferState::Opened => f.write_str("opened"),
            TransferState::Copying(CopyStrategy::Sparse) => f.write_str("copying (sparse)"),
            TransferState::Copying(CopyStrategy::Plain) => f.write_str("copying (plain)"),
            TransferState::Finalized => f.write_str("finalized"),
            TransferState::Succeeded => f.write_str("succeeded"),
            TransferState::Failed => f.write_str("failed"),
        }
    }
}

/// Outcome of a successful transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferSummary {
    /// Bytes read from the (decoded) source and written to the destination.
    pub bytes_copied: u64,
    /// Declared size of an undecoded source.
    pub total: Option<u64>,
    pub strategy: CopyStrategy,
}

/// One transfer, owning its request and mount checker.
#[derive(Debug, Clone)]
pub struct Transfer {
    request: TransferRequest,
    mounts: MountSafetyChecker,
}

impl Transfer {
    pub fn new(request: TransferRequest) -> Self {
        Self {
            request,
            mounts: MountSafetyChecker::new(),
        }
    }

    /// Replaces the mount checker, e.g. to read a different mount table.
    #[must_use]
    pub fn with_mount_checker(mut self, mounts: MountSafetyChecker) -> Self {
        self.mounts = mounts;
        self
    }

    pub fn request(&self) -> &TransferRequest {
        &self.request
    }

    /// Runs the transfer to completion or to the first error.
    ///
    /// The destination is checked against the mount table before anything is
    /// opened. Regular-file sources that need no decoding are copied extent by
    /// extent into a regular-file destination pre-sized to the source, so holes
    /// are never read or written; everything else is streamed through a buffer
    /// of the requested block size. The destination is flushed and synced
    /// before it is closed, and the source is closed last.
    ///
    /// # Errors
    ///
    /// Returns the first error encountered. Data written before the error is
    /// left in place.
    pub fn run(&self, sink: &mut dyn ProgressSink) -> Result<TransferSummary> {
        let result = self.execute(sink);
        match &result {
            Ok(summary) => {
                enter(TransferState::Succeeded);
                info!(
                    source = %self.request.source(),
                    destination = %self.request.destination(),
                    bytes = summary.bytes_copied,
                    strategy = ?summary.strategy,
                    "transfer complete"
                );
            }
            Err(err) => debug!(state = %TransferState::Failed, error = %err, "transfer aborted"),
        }
        result
    }

    fn execute(&self, sink: &mut dyn ProgressSink) -> Result<TransferSummary> {
        enter(TransferState::Validating);
        if let Some(path) = self.request.destination().as_path() {
            self.mounts.check(path)?;
        }

        let source_locator = self.request.source();
        let mode = self
            .request
            .compression()
            .resolve(source_locator.detection_name().as_deref());
        let mut source = open_source(source_locator, mode)?;
        let mut destination = Destination::open(self.request.destination())?;
        enter(TransferState::Opened);

        // Decoded output has no known length.
        let total = match mode {
            ConcreteMode::None => source.declared_size(),
            ConcreteMode::Gzip | ConcreteMode::Bzip2 | ConcreteMode::Xz => None,
        };
        let mut progress = ProgressState::new(total, sink);
        let mut buf = vec![0u8; self.request.block_size()];

        let sparse = match (source.as_file(), source.declared_size(), destination.file()) {
            (Some(src), Some(size), Some(dst)) => Some((src, size, dst)),
            _ => None,
        };

        let (strategy, bytes_copied) = match sparse {
            Some((src, size, dst)) => {
                enter(TransferState::Copying(CopyStrategy::Sparse));
                let copied = copy_sparse(src, dst, size, &mut buf, &mut progress)?;
                (CopyStrategy::Sparse, copied)
            }
            None => {
                enter(TransferState::Copying(CopyStrategy::Plain));
                let copied = copy_plain(&mut source, &mut destination, &mut buf, &mut progress)
                    .map_err(|failure| match failure {
                        CopyFailure::Read(err) => source.read_error(err),
                        CopyFailure::Write(err) => Error::io("write destination", err),
                    })?;
                (CopyStrategy::Plain, copied)
            }
        };
        progress.complete();

        enter(TransferState::Finalized);
        destination.finish()?;
        drop(source);

        Ok(TransferSummary {
            bytes_copied,
            total,
            strategy,
        })
    }
}

fn enter(state: TransferState) {
    debug!(%state, "transfer state");
}

/// Which side of a plain copy failed.
#[derive(Debug)]
pub(crate) enum CopyFailure {
    Read(io::Error),
    Write(io::Error),
}

/// Streams `source` into `destination` until end of input.
pub(crate) fn copy_plain<R, W>(
    source: &mut R,
    destination: &mut W,
    buf: &mut [u8],
    progress: &mut ProgressState<'_>,
) -> std::result::Result<u64, CopyFailure>
where
    R: Read + ?Sized,
    W: Write + ?Sized,
{
    let mut copied = 0u64;
    loop {
        let n = match source.read(buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
            Err(err) => return Err(CopyFailure::Read(err)),
        };
        destination
            .write_all(&buf[..n])
            .map_err(CopyFailure::Write)?;
        copied += n as u64;
        progress.advance(n as u64);
    }
    Ok(copied)
}

/// Copies the data extents of `source` to the same offsets of `destination`.
///
/// The destination is first sized to `size`, which leaves every skipped range
/// reading back as zeros.
pub(crate) fn copy_sparse(
    source: &File,
    destination: &File,
    size: u64,
    buf: &mut [u8],
    progress: &mut ProgressState<'_>,
) -> Result<u64> {
    let mut reader = source;
    let mut writer = destination;

    writer
        .set_len(size)
        .map_err(|err| Error::io("truncate destination", err))?;

    let mut copied = 0u64;
    for extent in Extents::new(source, size) {
        let extent = extent.map_err(|err| Error::io("seek source", err))?;
        debug!(start = extent.start, end = extent.end, "copying extent");

        reader
            .seek(SeekFrom::Start(extent.start))
            .map_err(|err| Error::io("seek source", err))?;
        writer
            .seek(SeekFrom::Start(extent.start))
            .map_err(|err| Error::io("seek destination", err))?;

        let mut position = extent.start;
        while position < extent.end {
            let want = usize::try_from(extent.end - position)
                .map_or(buf.len(), |left| left.min(buf.len()));
            let n = match reader.read(&mut buf[..want]) {
                Ok(0) => {
                    return Err(Error::io(
                        "read source",
                        io::Error::new(
                            io::ErrorKind::UnexpectedEof,
                            "source ended inside a data extent",
                        ),
                    ))
                }
                Ok(n) => n,
                Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
                Err(err) => return Err(Error::io("read source", err)),
            };
            writer
                .write_all(&buf[..n])
                .map_err(|err| Error::io("write destination", err))?;
            position += n as u64;
            progress.set(position);
        }

        copied += extent.len();
        progress.set(extent.end);
    }

    Ok(copied)
}

/// The write side of a transfer.
enum Destination {
    File {
        path: PathBuf,
        file: File,
        regular: bool,
    },
    Stdout(io::StdoutLock<'static>),
}

impl Destination {
    fn open(locator: &Locator) -> Result<Self> {
        match locator {
            Locator::Stdio => Ok(Destination::Stdout(io::stdout().lock())),
            Locator::Url(url) => Err(Error::DestinationCreateFailed {
                path: PathBuf::from(url),
                source: io::Error::new(io::ErrorKind::Unsupported, "cannot write to a URL"),
            }),
            Locator::Path(path) => {
                let create_failed = |source| Error::DestinationCreateFailed {
                    path: path.clone(),
                    source,
                };
                // Truncation is a no-op for device nodes.
                let file = File::create(path).map_err(create_failed)?;
                let regular = file.metadata().map_err(create_failed)?.is_file();
                debug!(destination = %path.display(), regular, "opened destination");
                Ok(Destination::File {
                    path: path.clone(),
                    file,
                    regular,
                })
            }
        }
    }

    /// The destination file, when it is a regular file that may be sparse.
    fn file(&self) -> Option<&File> {
        match self {
            Destination::File {
                file,
                regular: true,
                ..
            } => Some(file),
            Destination::File { .. } | Destination::Stdout(_) => None,
        }
    }

    /// Flushes, syncs file destinations to stable storage and closes.
    fn finish(mut self) -> Result<()> {
        self.flush()
            .map_err(|err| Error::io("flush destination", err))?;
        if let Destination::File { path, file, .. } = &self {
            file.sync_all()
                .map_err(|err| Error::io("sync destination", err))?;
            debug!(destination = %path.display(), "destination synced");
        }
        Ok(())
    }
}

impl Write for Destination {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Destination::File { file, .. } => file.write(buf),
            Destination::Stdout(stdout) => stdout.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Destination::File { file, .. } => file.flush(),
            Destination::Stdout(stdout) => stdout.flush(),
        }
    }
}
