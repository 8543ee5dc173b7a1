//! Refusal to overwrite mounted devices.
//!
//! The checker reads the kernel's per-process mount information
//! (`/proc/self/mountinfo`, see `proc(5)`). A line looks like
//!
//! ```text
//! 425 22 8:50 / /media/ubuntu/a rw,nosuid,nodev,relatime shared:442 - ext4 /dev/sdd2 rw,data=ordered
//! ```
//!
//! where field 4 is the mount point and, with one optional field as above,
//! field 9 is the mount source.

use std::fs::{self, File};
use std::io::{self, BufRead, BufReader};
use std::os::unix::ffi::OsStrExt;
use std::path::{Path, PathBuf};

use tracing::{debug, trace};

use crate::config::MOUNTINFO_PATH;
use crate::error::{Error, Result};


/// Field index of the mount point.
const MOUNT_POINT_FIELD: usize = 4;

/// Field index of the mount source when exactly one optional field is present.
const MOUNT_SOURCE_FIELD: usize = 9;

/// First field that may hold the optional-fields separator.
const FIRST_OPTIONAL_FIELD: usize = 6;

/// One mount, as read from the mount table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MountEntry {
    pub mount_point: PathBuf,
    pub mount_source: PathBuf,
}

impl MountEntry {
    /// Parses a mountinfo line; returns `None` for lines too short to carry
    /// both fields.
    pub fn parse(line: &str) -> Option<Self> {
        let fields: Vec<&str> = line.split_whitespace().collect();
        let mount_point = fields.get(MOUNT_POINT_FIELD)?;

        // The source sits two fields past the `-` that ends the optional
        // fields; that is field 9 in the common one-optional-field layout.
        let source_index = fields
            .iter()
            .skip(FIRST_OPTIONAL_FIELD)
            .position(|field| *field == "-")
            .map_or(MOUNT_SOURCE_FIELD, |pos| FIRST_OPTIONAL_FIELD + pos + 2);
        let mount_source = fields.get(source_index)?;

        Some(Self {
            mount_point: PathBuf::from(unescape(mount_point)),
            mount_source: PathBuf::from(unescape(mount_source)),
        })
    }
}

/// Decodes the `\ooo` octal escapes the kernel uses for blanks and backslashes.
fn unescape(field: &str) -> String {
    let bytes = field.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'\\' && i + 3 < bytes.len() && is_octal_escape(&bytes[i + 1..i + 4]) {
            let value = bytes[i + 1..i + 4]
                .iter()
                .fold(0u32, |acc, digit| acc * 8 + u32::from(digit - b'0'));
            if let Ok(byte) = u8::try_from(value) {
                out.push(byte);
                i += 4;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}

fn is_octal_escape(digits: &[u8]) -> bool {
    digits.len() == 3 && digits.iter().all(|d| (b'0'..=b'7').contains(d))
}

/// Checks a destination against the live mount table.
#[derive(Debug, Clone)]
pub struct MountSafetyChecker {
    mountinfo: PathBuf,
}

impl Default for MountSafetyChecker {
    fn default() -> Self {
        Self::new()
    }
}

impl MountSafetyChecker {
    /// Uses the mount information of the current process.
    pub fn new() -> Self {
        Self::with_mountinfo(MOUNTINFO_PATH)
    }

    /// Uses an alternative mountinfo-formatted file.
    pub fn with_mountinfo(path: impl Into<PathBuf>) -> Self {
        Self {
            mountinfo: path.into(),
        }
    }

    /// Fails when `destination` is a mounted device, or a prefix of one.
    ///
    /// Both the destination and every mount source are symlink-resolved
    /// before comparing. The comparison is a plain byte-prefix test, so
    /// `/dev/sdd` conflicts with a mounted `/dev/sdd2`. A missing mount
    /// table means nothing is mounted.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DestinationMounted`] for the first conflicting entry
    /// and [`Error::MountTableUnreadable`] when the table exists but cannot be
    /// read.
    pub fn check(&self, destination: &Path) -> Result<()> {
        let file = match File::open(&self.mountinfo) {
            Ok(file) => file,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                debug!(path = %self.mountinfo.display(), "no mount table, skipping check");
                return Ok(());
            }
            Err(source) => return Err(self.unreadable(source)),
        };

        let destination = resolve(destination);
        let prefix = destination.as_os_str().as_bytes();

        for line in BufReader::new(file).lines() {
            let line = line.map_err(|source| self.unreadable(source))?;
            let Some(entry) = MountEntry::parse(&line) else {
                if !line.trim().is_empty() {
                    trace!(%line, "skipping short mountinfo line");
                }
                continue;
            };

            let mount_source = resolve(&entry.mount_source);
            if mount_source.as_os_str().as_bytes().starts_with(prefix) {
                return Err(Error::DestinationMounted {
                    mount_source,
                    mount_point: entry.mount_point,
                });
            }
        }

        Ok(())
    }

    fn unreadable(&self, source: io::Error) -> Error {
        Error::MountTableUnreadable {
            path: self.mountinfo.clone(),
            source,
        }
    }
}

/// Follows symlinks, keeping the path as given when that fails.
fn resolve(path: &Path) -> PathBuf {
    fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}
