use std::process::{Command, Stdio};

use strum_macros::{EnumIter, EnumString, FromRepr, IntoStaticStr};

use super::{exit_code, spawn_error, ArgVector, OptionArray, ToolOption};
use crate::{Ext2Result, ToolConfig, Volume};

/// The options understood when formatting, with their table indexes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, EnumString, IntoStaticStr, FromRepr)]
#[repr(u32)]
pub enum MkfsOption {
    /// Read-only bad block scan
    #[strum(serialize = "badblocks")]
    BadBlocks   = 0,
    /// Read-write bad block scan
    #[strum(serialize = "badblocks_rw")]
    BadBlocksRw = 1,
    /// Create an ext3 journal
    #[strum(serialize = "journal")]
    Journal     = 2,
    /// Volume label
    #[strum(serialize = "vollabel")]
    VolLabel    = 3,
}

impl ToolOption for MkfsOption {
    fn from_index(index: u32) -> Option<Self> {
        MkfsOption::from_repr(index)
    }
}

/// Builds the `mke2fs` command line for a volume.
///
/// Starts with `-q`, appends the flags for recognized options in list order
/// and ends with the device path. Unrecognized options are skipped.
#[cfg(feature = "stable")]
pub fn set_mkfs_options(options: &OptionArray, volume: &Volume, program: &str) -> ArgVector {
    let mut argv = ArgVector::new(program);
    argv.push("-q");

    for opt in options {
        match opt.resolve::<MkfsOption>() {
            Some(MkfsOption::BadBlocks) if opt.is_true() => argv.push("-c"),
            Some(MkfsOption::BadBlocksRw) if opt.is_true() => argv.push("-cc"),
            Some(MkfsOption::Journal) if opt.is_true() => argv.push("-j"),
            Some(MkfsOption::VolLabel) => {
                if let Some(label) = opt.as_str() {
                    argv.push("-L");
                    argv.push(label);
                }
            }
            _ => {}
        }
    }

    argv.push(volume.dev_path().to_string_lossy());
    info!("{}", argv);
    argv
}

/// Formats the volume with `mke2fs`, returning the tool's exit code.
///
/// The tool's output is discarded. A tool killed by a signal is reported
/// as [`crate::Ext2Error::ProcessFailed`].
#[cfg(feature = "unstable")]
pub fn mkfs(volume: &Volume, options: &OptionArray, tools: &ToolConfig) -> Ext2Result<i32> {
    let argv = set_mkfs_options(options, volume, &tools.mkfs.to_string_lossy());

    let status = Command::new(argv.program())
        .args(argv.args())
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map_err(|e| spawn_error(argv.program(), e))?;

    let rc = exit_code(argv.program(), status)?;
    info!("{} completed with exit code {}", argv.program(), rc);
    Ok(rc)
}
