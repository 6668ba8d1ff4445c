use std::{cell::RefCell, convert::TryFrom, rc::Rc};

use crate::{Ext2Error, Ext2Result};

/// A handle to a disk
#[derive(Clone)]
pub struct Disk(pub Rc<RefCell<dyn DiskObj>>);

impl std::fmt::Debug for Disk {
    #[cfg(feature = "stable")]
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "Disk")
    }
}

impl Disk {
    /// Positions the disk at a byte offset. Returns where it actually landed.
    #[cfg(feature = "stable")]
    pub fn seek(&mut self, offset: u64) -> Ext2Result<u64> {
        self.0.borrow_mut().seek(offset)
    }
    /// Reads from the current position into the buffer.
    #[cfg(feature = "stable")]
    pub fn read(&mut self, buffer: &mut [u8]) -> Ext2Result<usize> {
        self.0.borrow_mut().read(buffer)
    }
    /// Writes the buffer at the current position.
    #[cfg(feature = "stable")]
    pub fn write(&mut self, buffer: &[u8]) -> Ext2Result<usize> {
        self.0.borrow_mut().write(buffer)
    }
    /// Returns the size of the disk in bytes.
    #[cfg(feature = "stable")]
    pub fn size(&self) -> Ext2Result<u64> {
        self.0.borrow().size()
    }
    /// Flushes written data to the device.
    #[cfg(feature = "stable")]
    pub fn sync(&mut self) -> Ext2Result<()> {
        self.0.borrow_mut().sync()
    }
}

/// A disk object. Has a size, supports positioned reads and writes.
///
/// `read` and `write` move as many bytes as the device holds past the
/// current position and return the count; they never grow the device.
pub trait DiskObj {
    /// Moves to a byte offset, returning the resulting position.
    fn seek(&mut self, offset: u64) -> Ext2Result<u64>;
    /// Reads into the buffer from the current position.
    fn read(&mut self, buffer: &mut [u8]) -> Ext2Result<usize>;
    /// Writes the buffer at the current position.
    fn write(&mut self, buffer: &[u8]) -> Ext2Result<usize>;
    /// Returns the size of the disk in bytes.
    fn size(&self) -> Ext2Result<u64>;
    /// Flushes written data.
    fn sync(&mut self) -> Ext2Result<()>;
}

/// Transfer direction for [`rw_diskblocks`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IoMode {
    /// Read from the device into the buffer.
    Get,
    /// Write the buffer to the device.
    Put,
}

impl IoMode {
    /// Raw code for a read.
    pub const GET: u32 = 0;
    /// Raw code for a write.
    pub const PUT: u32 = 1;
}

impl TryFrom<u32> for IoMode {
    type Error = Ext2Error;

    fn try_from(mode: u32) -> Ext2Result<IoMode> {
        match mode {
            IoMode::GET => Ok(IoMode::Get),
            IoMode::PUT => Ok(IoMode::Put),
            _ => Err(Ext2Error::InvalidArgument(format!("transfer mode {}", mode))),
        }
    }
}

/// Reads or writes exactly `buffer.len()` bytes at `offset`.
///
/// Fails with [`Ext2Error::Positioning`] if the disk cannot be positioned at
/// `offset`, and with [`Ext2Error::ShortTransfer`] if the device ends before
/// the whole buffer is moved. Nothing is retried.
#[cfg(feature = "stable")]
pub fn rw_diskblocks(d: &mut Disk, offset: u64, buffer: &mut [u8], mode: IoMode) -> Ext2Result<()> {
    let size = d.size()?;
    let actual = d.seek(offset)?;
    if actual != offset || offset > size {
        return Err(Ext2Error::Positioning { offset, size });
    }

    let transferred = match mode {
        IoMode::Get => d.read(buffer)?,
        IoMode::Put => d.write(buffer)?,
    };
    trace!("{:?} {} bytes at {}: moved {}", mode, buffer.len(), offset, transferred);

    if transferred != buffer.len() {
        return Err(Ext2Error::ShortTransfer {
            expected: buffer.len(),
            actual:   transferred,
        });
    }
    Ok(())
}

pub use file::DiskFile;
pub use mem::DiskMem;

pub mod file;
pub mod mem;
