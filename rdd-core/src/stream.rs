//! Source stream opening and transparent decompression.

use std::fs::File;
use std::io::{self, Cursor, Read, Seek, SeekFrom};
use std::os::unix::fs::FileTypeExt;

use bzip2::read::MultiBzDecoder;
use flate2::read::MultiGzDecoder;
use liblzma::read::XzDecoder;
use tracing::debug;

use crate::compression::ConcreteMode;
use crate::config::Locator;
use crate::error::{Error, Result};

const GZIP_MAGIC: &[u8] = &[0x1f, 0x8b];
const BZIP2_MAGIC: &[u8] = b"BZh";
const XZ_MAGIC: &[u8] = &[0xfd, b'7', b'z', b'X', b'Z', 0x00];

/// Raw reader plus the file handle when the source is an undecoded file.
enum Inner {
    File(File),
    Stream(Box<dyn Read>),
}

/// An opened source positioned at offset 0.
///
/// Dropping the stream releases the underlying file or connection.
pub struct SourceStream {
    locator: String,
    mode: ConcreteMode,
    declared_size: Option<u64>,
    inner: Inner,
}

impl SourceStream {
    /// Size announced by the source before decoding, if known.
    pub fn declared_size(&self) -> Option<u64> {
        self.declared_size
    }

    /// Decoder wrapped around the raw source.
    pub fn mode(&self) -> ConcreteMode {
        self.mode
    }

    /// Source as given by the caller, for diagnostics.
    pub fn locator(&self) -> &str {
        &self.locator
    }

    /// The seekable file behind this stream, when reads hit it directly.
    pub(crate) fn as_file(&self) -> Option<&File> {
        match &self.inner {
            Inner::File(file) => Some(file),
            Inner::Stream(_) => None,
        }
    }

    /// Maps a read error, turning decoder rejections into [`Error::UnsupportedStream`].
    pub(crate) fn read_error(&self, source: io::Error) -> Error {
        let decoder_rejected = matches!(
            source.kind(),
            io::ErrorKind::InvalidData | io::ErrorKind::InvalidInput
        );
        if self.mode != ConcreteMode::None && decoder_rejected {
            Error::UnsupportedStream {
                locator: self.locator.clone(),
                message: source.to_string(),
            }
        } else {
            Error::io("read source", source)
        }
    }
}

impl Read for SourceStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match &mut self.inner {
            Inner::File(file) => file.read(buf),
            Inner::Stream(reader) => reader.read(buf),
        }
    }
}

/// Opens `locator` and wraps it in the decoder selected by `mode`.
///
/// - standard input is used as is and has no declared size;
/// - URLs are fetched with a blocking GET, the size comes from `Content-Length`;
/// - regular files keep their handle and take the size from their metadata;
/// - block devices are read as streams sized by their capacity;
/// - pipes, sockets and character devices are read as streams of unknown size.
///
/// Only a regular file is ever handed to the sparse copy.
///
/// # Errors
///
/// Returns [`Error::SourceOpenFailed`] when the source cannot be opened and
/// [`Error::UnsupportedStream`] when it does not start with the magic bytes of
/// the selected format.
pub fn open_source(locator: &Locator, mode: ConcreteMode) -> Result<SourceStream> {
    let name = locator.to_string();
    let open_failed = |source: io::Error| Error::SourceOpenFailed {
        locator: name.clone(),
        source,
    };

    let (raw, declared_size): (Inner, Option<u64>) = match locator {
        Locator::Stdio => (Inner::Stream(Box::new(io::stdin().lock())), None),
        Locator::Url(url) => {
            let (reader, size) = http_get(url).map_err(open_failed)?;
            (Inner::Stream(reader), size)
        }
        Locator::Path(path) => {
            let mut file = File::open(path).map_err(open_failed)?;
            let metadata = file.metadata().map_err(open_failed)?;
            let file_type = metadata.file_type();
            if file_type.is_file() {
                (Inner::File(file), Some(metadata.len()))
            } else if file_type.is_block_device() {
                // st_size is 0 for block devices, the end offset is the capacity
                let size = file.seek(SeekFrom::End(0)).map_err(open_failed)?;
                file.rewind().map_err(open_failed)?;
                (Inner::Stream(Box::new(file)), Some(size))
            } else {
                // pipes and character devices report no usable length
                (Inner::Stream(Box::new(file)), None)
            }
        }
    };

    debug!(source = %name, %mode, ?declared_size, "opened source");

    let inner = match mode {
        ConcreteMode::None => raw,
        ConcreteMode::Gzip => decoder(raw, GZIP_MAGIC, &name, |r| {
            Box::new(MultiGzDecoder::new(r))
        })?,
        ConcreteMode::Bzip2 => decoder(raw, BZIP2_MAGIC, &name, |r| {
            Box::new(MultiBzDecoder::new(r))
        })?,
        ConcreteMode::Xz => decoder(raw, XZ_MAGIC, &name, |r| {
            Box::new(XzDecoder::new_multi_decoder(r))
        })?,
    };

    Ok(SourceStream {
        locator: name,
        mode,
        declared_size,
        inner,
    })
}

type Prefixed = io::Chain<Cursor<Vec<u8>>, Box<dyn Read>>;

/// Checks the stream header and builds the decoder on top of it.
///
/// The peeked bytes are chained back in front of the raw reader so the decoder
/// sees the stream from offset 0.
fn decoder(
    raw: Inner,
    magic: &[u8],
    locator: &str,
    build: impl FnOnce(Prefixed) -> Box<dyn Read>,
) -> Result<Inner> {
    let mut raw: Box<dyn Read> = match raw {
        Inner::File(file) => Box::new(file),
        Inner::Stream(reader) => reader,
    };

    let mut header = Vec::with_capacity(magic.len());
    (&mut raw)
        .take(magic.len() as u64)
        .read_to_end(&mut header)
        .map_err(|source| Error::SourceOpenFailed {
            locator: locator.to_string(),
            source,
        })?;

    if header != magic {
        return Err(Error::UnsupportedStream {
            locator: locator.to_string(),
            message: "missing or invalid stream header".to_string(),
        });
    }

    Ok(Inner::Stream(build(Cursor::new(header).chain(raw))))
}

/// Issues a blocking GET and returns the body with its declared length.
fn http_get(url: &str) -> io::Result<(Box<dyn Read>, Option<u64>)> {
    let response = ureq::get(url)
        .call()
        .map_err(|err| io::Error::other(err.to_string()))?;

    let size = response
        .header("Content-Length")
        .and_then(|value| value.trim().parse::<u64>().ok());

    Ok((Box::new(response.into_reader()), size))
}
