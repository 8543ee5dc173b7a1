//! Compression format selection.

use std::ffi::OsStr;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::config::{BZIP2_EXTENSION, GZIP_EXTENSION, XZ_EXTENSION};
use crate::error::Error;

/// Compression requested by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CompressionMode {
    /// Pick the format from the source name.
    #[default]
    Auto,
    /// Copy the source verbatim.
    None,
    /// gzip (`.gz`)
    Gzip,
    /// bzip2 (`.bz2`)
    Bzip2,
    /// XZ (`.xz`)
    Xz,
}

/// A resolved compression format; `Auto` never reaches the stream layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConcreteMode {
    None,
    Gzip,
    Bzip2,
    Xz,
}

impl CompressionMode {
    /// Resolves `Auto` against the source name.
    ///
    /// `.gz`, `.bz2` and `.xz` map to their formats; any other name, or no
    /// name at all (standard input), means no decompression. Explicit modes
    /// are returned unchanged.
    pub fn resolve(self, source_name: Option<&str>) -> ConcreteMode {
        match self {
            CompressionMode::None => ConcreteMode::None,
            CompressionMode::Gzip => ConcreteMode::Gzip,
            CompressionMode::Bzip2 => ConcreteMode::Bzip2,
            CompressionMode::Xz => ConcreteMode::Xz,
            CompressionMode::Auto => source_name.map_or(ConcreteMode::None, guess_from_name),
        }
    }
}

fn guess_from_name(name: &str) -> ConcreteMode {
    match Path::new(name).extension().and_then(OsStr::to_str) {
        Some(GZIP_EXTENSION) => ConcreteMode::Gzip,
        Some(BZIP2_EXTENSION) => ConcreteMode::Bzip2,
        Some(XZ_EXTENSION) => ConcreteMode::Xz,
        _ => ConcreteMode::None,
    }
}

impl FromStr for CompressionMode {
    type Err = Error;

    /// Parses a `comp=` token.
    fn from_str(token: &str) -> Result<Self, Self::Err> {
        match token {
            "auto" => Ok(CompressionMode::Auto),
            "none" => Ok(CompressionMode::None),
            "gz" | "gzip" => Ok(CompressionMode::Gzip),
            "bz2" | "bzip2" => Ok(CompressionMode::Bzip2),
            "xz" => Ok(CompressionMode::Xz),
            _ => Err(Error::UnknownCompressionType {
                token: token.to_string(),
            }),
        }
    }
}

impl fmt::Display for ConcreteMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ConcreteMode::None => "none",
            ConcreteMode::Gzip => "gzip",
            ConcreteMode::Bzip2 => "bzip2",
            ConcreteMode::Xz => "xz",
        })
    }
}
