//! Error type shared by every operation in the module.
//!
//! The engine speaks integer return codes, so each variant maps to exactly
//! one code through [`Ext2Error::to_errno`]:
//!
//! | Variant | Code |
//! |---------|------|
//! | `Io` | OS errno, `EIO` if none |
//! | `Positioning` | `FSIM_ERROR` |
//! | `ShortTransfer` | `EIO` |
//! | `InvalidArgument` | `EINVAL` |
//! | `BadMagic` / `BadRevision` | `FSIM_ERROR` |
//! | `NoSuperblock` | `FSIM_ERROR` |
//! | `Spawn` | OS errno, `EIO` if none |
//! | `ProcessFailed` | `FSIM_ERROR` |

use thiserror::Error;

use crate::FSIM_ERROR;

/// Result alias used throughout the crate.
pub type Ext2Result<T> = Result<T, Ext2Error>;

/// Everything that can go wrong while formatting, checking or probing a volume.
#[derive(Debug, Error)]
pub enum Ext2Error {
    /// Operating system I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The device could not be positioned at the requested offset.
    #[error("cannot seek to byte {offset} (device is {size} bytes)")]
    Positioning {
        /// Requested byte offset
        offset: u64,
        /// Device size in bytes
        size:   u64,
    },

    /// Fewer bytes were moved than requested.
    #[error("short transfer: {actual} of {expected} bytes")]
    ShortTransfer {
        /// Bytes requested
        expected: usize,
        /// Bytes actually moved
        actual:   usize,
    },

    /// A caller supplied an argument we cannot act on.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The superblock magic is not the ext2 magic.
    #[error("bad superblock magic {0:#06x}")]
    BadMagic(u16),

    /// The superblock revision is newer than we support.
    #[error("unsupported superblock revision {0}")]
    BadRevision(u32),

    /// The volume carries no cached superblock.
    #[error("no cached superblock for {0}")]
    NoSuperblock(String),

    /// The external tool could not be started.
    #[error("cannot run {program}: {source}")]
    Spawn {
        /// Tool that failed to start
        program: String,
        /// Why it failed
        #[source]
        source:  std::io::Error,
    },

    /// The external tool did not exit normally.
    #[error("{program} terminated abnormally: {detail}")]
    ProcessFailed {
        /// Tool that terminated
        program: String,
        /// How it terminated
        detail:  String,
    },
}

impl Ext2Error {
    /// The integer code reported to the engine for this error.
    pub fn to_errno(&self) -> i32 {
        match self {
            Ext2Error::Io(e) => e.raw_os_error().unwrap_or(libc::EIO),
            Ext2Error::Positioning { .. } => FSIM_ERROR,
            Ext2Error::ShortTransfer { .. } => libc::EIO,
            Ext2Error::InvalidArgument(_) => libc::EINVAL,
            Ext2Error::BadMagic(_) => FSIM_ERROR,
            Ext2Error::BadRevision(_) => FSIM_ERROR,
            Ext2Error::NoSuperblock(_) => FSIM_ERROR,
            Ext2Error::Spawn { source, .. } => source.raw_os_error().unwrap_or(libc::EIO),
            Ext2Error::ProcessFailed { .. } => FSIM_ERROR,
        }
    }

    /// True for the errors raised by superblock validation.
    pub fn is_validation(&self) -> bool {
        matches!(self, Ext2Error::BadMagic(_) | Ext2Error::BadRevision(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn errno_mapping() {
        assert_eq!(
            Ext2Error::ShortTransfer {
                expected: 1024,
                actual:   512,
            }
            .to_errno(),
            libc::EIO
        );
        assert_eq!(Ext2Error::InvalidArgument("x".into()).to_errno(), libc::EINVAL);
        assert_eq!(Ext2Error::BadMagic(0).to_errno(), FSIM_ERROR);
        assert_eq!(
            Ext2Error::Positioning { offset: 10, size: 5 }.to_errno(),
            FSIM_ERROR
        );
    }

    #[test]
    fn io_errors_keep_os_code() {
        let e: Ext2Error = std::io::Error::from_raw_os_error(libc::EBUSY).into();
        assert_eq!(e.to_errno(), libc::EBUSY);

        let e = Ext2Error::Spawn {
            program: "e2fsck".into(),
            source:  std::io::Error::from_raw_os_error(libc::EPERM),
        };
        assert_eq!(e.to_errno(), libc::EPERM);
        assert!(!e.is_validation());
        assert!(Ext2Error::BadRevision(2).is_validation());
    }
}
