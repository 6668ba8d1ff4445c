use std::{os::unix::process::ExitStatusExt, process::ExitStatus};

use crate::{Ext2Error, Ext2Result};

pub use self::{
    fsck::{fsck, set_fsck_options, FsckExit, FsckOption, FsckReport, FsckStatus, FSCK_MESSAGE_HEADER},
    mkfs::{mkfs, set_mkfs_options, MkfsOption},
    options::{ArgVector, OptionArray, OptionEntry, OptionKey, OptionValue, ToolOption},
};

pub mod fsck;
pub mod mkfs;
pub mod options;

/// Wraps a failure to start an external tool.
pub(crate) fn spawn_error(program: &str, source: std::io::Error) -> Ext2Error {
    error!("Cannot run {}: {}", program, source);
    Ext2Error::Spawn {
        program: program.to_string(),
        source,
    }
}

/// The exit code of a tool that exited normally.
pub(crate) fn exit_code(program: &str, status: ExitStatus) -> Ext2Result<i32> {
    match status.code() {
        Some(rc) => Ok(rc),
        None => {
            let detail = match status.signal() {
                Some(sig) => format!("killed by signal {}", sig),
                None => format!("{}", status),
            };
            warn!("{} {}", program, detail);
            Err(Ext2Error::ProcessFailed {
                program: program.to_string(),
                detail,
            })
        }
    }
}

#[test]
fn exit_statuses() {
    // Raw wait statuses: exit code in the high byte, signal in the low bits.
    assert_eq!(exit_code("t", ExitStatus::from_raw(3 << 8)).ok(), Some(3));
    assert!(matches!(
        exit_code("t", ExitStatus::from_raw(libc::SIGKILL)),
        Err(Ext2Error::ProcessFailed { .. })
    ));
}
