//! Data/hole discovery for sparse sources.

use std::fs::File;
use std::io;

/// A half-open `[start, end)` run of data bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Extent {
    pub start: u64,
    pub end: u64,
}

impl Extent {
    pub fn len(&self) -> u64 {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.end == self.start
    }
}

/// Hole-aware seeking on an open file.
///
/// Implementations answer "where is the next data byte at or after `offset`"
/// and "where is the next hole at or after `offset`". End of file counts as a
/// hole.
pub trait HoleSeek {
    /// Next data offset, or `None` when only holes remain.
    fn seek_data(&self, offset: u64) -> io::Result<Option<u64>>;

    /// Next hole offset.
    fn seek_hole(&self, offset: u64) -> io::Result<u64>;
}

#[cfg(any(target_os = "linux", target_os = "android"))]
impl HoleSeek for File {
    fn seek_data(&self, offset: u64) -> io::Result<Option<u64>> {
        match lseek(self, offset, libc::SEEK_DATA) {
            Ok(pos) => Ok(Some(pos)),
            Err(err) if err.raw_os_error() == Some(libc::ENXIO) => Ok(None),
            Err(err) => Err(err),
        }
    }

    fn seek_hole(&self, offset: u64) -> io::Result<u64> {
        lseek(self, offset, libc::SEEK_HOLE)
    }
}

#[cfg(any(target_os = "linux", target_os = "android"))]
fn lseek(file: &File, offset: u64, whence: libc::c_int) -> io::Result<u64> {
    use std::os::unix::io::AsRawFd;

    let offset = libc::off_t::try_from(offset)
        .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "offset out of range"))?;
    // SAFETY: the descriptor is owned by `file` and stays open for the call.
    let pos = unsafe { libc::lseek(file.as_raw_fd(), offset, whence) };
    if pos < 0 {
        return Err(io::Error::last_os_error());
    }
    u64::try_from(pos).map_err(|_| io::Error::other("negative seek result"))
}

/// Without `SEEK_DATA`, the whole file is one data extent.
#[cfg(not(any(target_os = "linux", target_os = "android")))]
impl HoleSeek for File {
    fn seek_data(&self, offset: u64) -> io::Result<Option<u64>> {
        let len = self.metadata()?.len();
        Ok((offset < len).then_some(offset))
    }

    fn seek_hole(&self, _offset: u64) -> io::Result<u64> {
        Ok(self.metadata()?.len())
    }
}

/// Iterator over the data extents of a source of known size.
pub struct Extents<'a, S: HoleSeek + ?Sized> {
    source: &'a S,
    offset: u64,
    size: u64,
    done: bool,
}

impl<'a, S: HoleSeek + ?Sized> Extents<'a, S> {
    pub fn new(source: &'a S, size: u64) -> Self {
        Self {
            source,
            offset: 0,
            size,
            done: false,
        }
    }

    fn advance(&mut self) -> io::Result<Option<Extent>> {
        if self.offset >= self.size {
            return Ok(None);
        }
        let Some(start) = self.source.seek_data(self.offset)? else {
            return Ok(None);
        };
        if start >= self.size {
            return Ok(None);
        }
        let end = self.source.seek_hole(start)?.min(self.size);
        if end <= start {
            return Ok(None);
        }
        self.offset = end;
        Ok(Some(Extent { start, end }))
    }
}

impl<S: HoleSeek + ?Sized> Iterator for Extents<'_, S> {
    type Item = io::Result<Extent>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let item = self.advance().transpose();
        if !matches!(item, Some(Ok(_))) {
            self.done = true;
        }
        item
    }
}
