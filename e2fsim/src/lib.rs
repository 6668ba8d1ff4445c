#![warn(missing_docs)]
#![allow(clippy::collapsible_if)]
#![allow(clippy::collapsible_else_if)]
#![allow(clippy::new_without_default)]
#![allow(clippy::upper_case_acronyms)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::print_stdout)]
#![deny(clippy::cast_possible_truncation)]

//! e2fsim, the ext2/ext3 filesystem interface module.
//!
//! Formats, checks and inspects ext2/ext3 volumes. Formatting and checking
//! are delegated to `mke2fs` and `e2fsck`; the superblock is read straight
//! off the device.

#[macro_use]
extern crate more_asserts;

#[allow(unused_imports)]
#[cfg(test)]
#[macro_use]
extern crate serial_test;

#[macro_use]
extern crate log;

#[macro_use]
extern crate e2fsim_macros;

/// Byte offset of the primary superblock.
pub const EXT2_SUPER_LOC: u64 = 1024;

/// Size of the on-disk superblock in bytes.
pub const SIZE_OF_SUPER: usize = 1024;

/// The ext2/ext3 superblock magic number.
pub const EXT2_SUPER_MAGIC: u16 = 0xEF53;

/// Highest superblock revision level we understand.
pub const EXT2_MAX_SUPPORTED_REV: u32 = 1;

/// Generic failure code handed to the engine.
pub const FSIM_ERROR: i32 = -1;

pub use self::{
    config::ToolConfig,
    disk::{rw_diskblocks, Disk, DiskFile, DiskMem, DiskObj, IoMode},
    error::{Ext2Error, Ext2Result},
    features::{bit2set, unknown_bits, Ext2Feature, FeatureWord},
    message::{LogSink, MessageLog, MessageSink},
    mount::MountTable,
    ondisk::*,
    plugin::{plugin_records, Ext2Plugin, FsInterface},
    volume::{get_volume_limits, Volume, VolumeLimits},
};

mod config;
mod disk;
mod error;
mod features;
mod message;
mod mount;
mod ondisk;
mod plugin;
mod volume;

/// Functions useful for testing
pub mod test;

/// Front-ends for the external utilities: mkfs, fsck and their option translators
pub mod operations;

/// Documentation-only module
pub mod doc;
