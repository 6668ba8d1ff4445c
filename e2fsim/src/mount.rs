use std::{
    convert::TryFrom,
    path::{Path, PathBuf},
};

use crate::Ext2Result;

/// Where the kernel publishes the mount table.
pub const PROC_MOUNTS: &str = "/proc/self/mounts";

/// A snapshot of mounted devices and where they are mounted.
#[derive(Debug, Clone, Default)]
pub struct MountTable {
    entries: Vec<(PathBuf, PathBuf)>,
}

impl MountTable {
    /// Loads the running system's mount table.
    #[cfg(feature = "stable")]
    pub fn load() -> Ext2Result<MountTable> {
        let text = std::fs::read_to_string(PROC_MOUNTS)?;
        Ok(MountTable::parse(&text))
    }
    /// Parses text in `/proc/mounts` format. Malformed lines are skipped.
    #[cfg(feature = "stable")]
    pub fn parse(text: &str) -> MountTable {
        let entries = text
            .lines()
            .filter_map(|line| {
                let mut fields = line.split_whitespace();
                let dev = fields.next()?;
                let dir = fields.next()?;
                Some((PathBuf::from(unescape(dev)), PathBuf::from(unescape(dir))))
            })
            .collect();
        MountTable { entries }
    }
    /// The mount point of a device, if it is mounted.
    #[cfg(feature = "stable")]
    pub fn mount_point(&self, dev: &Path) -> Option<&Path> {
        let canonical = dev.canonicalize().ok();
        self.entries
            .iter()
            .find(|(d, _)| {
                d == dev || (canonical.is_some() && d.canonicalize().ok() == canonical)
            })
            .map(|(_, dir)| dir.as_path())
    }
    /// True if the device is mounted anywhere.
    #[cfg(feature = "stable")]
    pub fn is_mounted(&self, dev: &Path) -> bool {
        self.mount_point(dev).is_some()
    }
}

/// Undoes the octal escaping the kernel applies to spaces, tabs and newlines.
fn unescape(field: &str) -> String {
    let bytes = field.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        let octal = i + 3 < bytes.len() && bytes[i + 1..i + 4].iter().all(|b| (b'0'..=b'7').contains(b));
        if bytes[i] == b'\\' && octal {
            let v = bytes[i + 1..i + 4]
                .iter()
                .fold(0u32, |acc, b| acc * 8 + u32::from(b - b'0'));
            if let Ok(c) = u8::try_from(v) {
                out.push(c);
                i += 4;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}

#[test]
fn parse_proc_mounts() {
    let table = MountTable::parse(
        "proc /proc proc rw,nosuid 0 0\n\
         /dev/sda1 / ext4 rw,relatime 0 0\n\
         /dev/mapper/vg-home /mnt/my\\040home ext3 rw 0 0\n\
         garbage\n",
    );
    assert!(table.is_mounted(Path::new("/dev/sda1")));
    assert_eq!(
        table.mount_point(Path::new("/dev/mapper/vg-home")),
        Some(Path::new("/mnt/my home"))
    );
    assert!(!table.is_mounted(Path::new("/dev/sdb")));
    assert!(!table.is_mounted(Path::new("garbage")));
}
