use std::{cell::RefCell, convert::TryFrom, rc::Rc};

use crate::{disk::DiskObj, Ext2Error, Ext2Result};

/// A disk object held in memory.
pub struct DiskMem {
    data: Vec<u8>,
    pos:  u64,
}

impl DiskMem {
    /// Creates a zero-filled in-memory disk of `size` bytes.
    #[cfg(feature = "stable")]
    pub fn open(size: usize) -> super::Disk {
        DiskMem::from_bytes(vec![0; size])
    }
    /// Creates an in-memory disk holding a copy of an image.
    #[cfg(feature = "stable")]
    pub fn from_bytes(data: Vec<u8>) -> super::Disk {
        super::Disk(Rc::new(RefCell::new(DiskMem { data, pos: 0 })))
    }
    #[cfg(feature = "stable")]
    fn window(&self, len: usize) -> Ext2Result<std::ops::Range<usize>> {
        let start = usize::try_from(self.pos)
            .or(Err(Ext2Error::InvalidArgument(format!("offset {}", self.pos))))?;
        let start = start.min(self.data.len());
        let end = start + len.min(self.data.len() - start);
        Ok(start..end)
    }
}

impl DiskObj for DiskMem {
    #[cfg(feature = "stable")]
    fn seek(&mut self, offset: u64) -> Ext2Result<u64> {
        self.pos = offset;
        Ok(self.pos)
    }
    #[cfg(feature = "stable")]
    fn read(&mut self, buffer: &mut [u8]) -> Ext2Result<usize> {
        let range = self.window(buffer.len())?;
        let n = range.len();
        buffer[..n].copy_from_slice(&self.data[range]);
        self.pos += n as u64;
        Ok(n)
    }
    #[cfg(feature = "stable")]
    fn write(&mut self, buffer: &[u8]) -> Ext2Result<usize> {
        let range = self.window(buffer.len())?;
        let n = range.len();
        self.data[range].copy_from_slice(&buffer[..n]);
        self.pos += n as u64;
        Ok(n)
    }
    #[cfg(feature = "stable")]
    fn size(&self) -> Ext2Result<u64> {
        Ok(self.data.len() as u64)
    }
    #[cfg(feature = "stable")]
    fn sync(&mut self) -> Ext2Result<()> {
        Ok(())
    }
}
