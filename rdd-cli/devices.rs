//! Removable block device discovery.
//!
//! Used only to suggest a destination when none was given.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tracing::trace;

/// Default location of the block device class in sysfs.
pub const SYSFS_BLOCK_ROOT: &str = "/sys/class/block";

/// Default location of the udev property database.
pub const UDEV_DATA_ROOT: &str = "/run/udev/data";

/// Default directory holding device nodes.
pub const DEV_ROOT: &str = "/dev";

/// Source of removable device candidates.
pub trait DeviceEnumerator {
    /// Lists device nodes of removable, non-optical block devices.
    ///
    /// # Errors
    ///
    /// Returns an error when the device list itself cannot be read.
    fn removable_devices(&self) -> io::Result<Vec<PathBuf>>;
}

/// Reads removable block devices from sysfs and the udev database.
#[derive(Debug, Clone)]
pub struct SysfsEnumerator {
    sysfs_root: PathBuf,
    udev_root: PathBuf,
    dev_root: PathBuf,
}

impl Default for SysfsEnumerator {
    fn default() -> Self {
        Self::with_roots(SYSFS_BLOCK_ROOT, UDEV_DATA_ROOT, DEV_ROOT)
    }
}

impl SysfsEnumerator {
    pub fn with_roots(
        sysfs_root: impl Into<PathBuf>,
        udev_root: impl Into<PathBuf>,
        dev_root: impl Into<PathBuf>,
    ) -> Self {
        Self {
            sysfs_root: sysfs_root.into(),
            udev_root: udev_root.into(),
            dev_root: dev_root.into(),
        }
    }

    /// A device is optical when udev tagged it with `ID_CDROM=1`.
    fn is_cdrom(&self, device_dir: &Path) -> bool {
        let Some(dev) = read_attr(device_dir, "dev") else {
            return false;
        };
        let Ok(db) = fs::read_to_string(self.udev_root.join(format!("b{dev}"))) else {
            return false;
        };
        db.lines().any(|line| line.trim_end() == "E:ID_CDROM=1")
    }
}

impl DeviceEnumerator for SysfsEnumerator {
    fn removable_devices(&self) -> io::Result<Vec<PathBuf>> {
        let mut devices = Vec::new();
        for entry in fs::read_dir(&self.sysfs_root)? {
            let entry = entry?;
            let device_dir = entry.path();
            let name = entry.file_name().to_string_lossy().into_owned();

            if read_attr(&device_dir, "removable").as_deref() != Some("1") {
                continue;
            }
            if self.is_cdrom(&device_dir) {
                trace!(device = %name, "skipping optical drive");
                continue;
            }
            // sysfs spells nested device paths with '!'
            devices.push(self.dev_root.join(name.replace('!', "/")));
        }
        devices.sort();
        Ok(devices)
    }
}

fn read_attr(device_dir: &Path, attr: &str) -> Option<String> {
    fs::read_to_string(device_dir.join(attr))
        .ok()
        .map(|value| value.trim().to_string())
}

/// Prints the removable device suggestion shown when no destination was given.
///
/// # Errors
///
/// Returns an error if writing to `out` fails.
pub fn write_hint(out: &mut dyn Write, devices: &[PathBuf]) -> io::Result<()> {
    let list = devices
        .iter()
        .map(|device| device.display().to_string())
        .collect::<Vec<_>>()
        .join("\n  ");
    write!(
        out,
        "\nNo target selected, detected the following removable device:\n  {list}\n\n"
    )
}
