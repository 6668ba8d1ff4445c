use std::{
    cell::RefCell,
    convert::TryFrom,
    fs::{File, OpenOptions},
    io::{ErrorKind, Read, Seek, SeekFrom, Write},
    os::unix::fs::OpenOptionsExt,
    path::Path,
    rc::Rc,
};

use crate::{disk::DiskObj, Ext2Result};

/// A disk object backed by a device node or an image file.
pub struct DiskFile {
    f:    File,
    size: u64,
    pos:  u64,
}

impl DiskFile {
    /// Opens a device read-only.
    #[cfg(feature = "stable")]
    pub fn open<P: AsRef<Path>>(path: P) -> Ext2Result<super::Disk> {
        let file = OpenOptions::new().read(true).open(path)?;
        DiskFile::open_file(file)
    }
    /// Opens a device for reading and writing.
    #[cfg(feature = "stable")]
    pub fn open_rw<P: AsRef<Path>>(path: P) -> Ext2Result<super::Disk> {
        let file = OpenOptions::new().read(true).write(true).open(path)?;
        DiskFile::open_file(file)
    }
    /// Opens a device for reading and writing, failing if anyone else holds it open.
    ///
    /// On Linux block devices `O_EXCL` without `O_CREAT` refuses devices that
    /// are mounted or claimed by another opener (`EBUSY`).
    #[cfg(feature = "unstable")]
    pub fn open_exclusive<P: AsRef<Path>>(path: P) -> Ext2Result<super::Disk> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .custom_flags(libc::O_EXCL)
            .open(path)?;
        DiskFile::open_file(file)
    }
    /// Creates a disk object using an already open file.
    #[cfg(feature = "stable")]
    pub fn open_file(mut file: File) -> Ext2Result<super::Disk> {
        // metadata().len() is zero for block devices, the end offset is not.
        let size = file.seek(SeekFrom::End(0))?;
        file.seek(SeekFrom::Start(0))?;
        Ok(super::Disk(Rc::new(RefCell::new(DiskFile {
            f: file,
            size,
            pos: 0,
        }))))
    }
}

impl DiskObj for DiskFile {
    #[cfg(feature = "stable")]
    fn seek(&mut self, offset: u64) -> Ext2Result<u64> {
        self.pos = self.f.seek(SeekFrom::Start(offset))?;
        Ok(self.pos)
    }
    #[cfg(feature = "stable")]
    fn read(&mut self, buffer: &mut [u8]) -> Ext2Result<usize> {
        let mut total = 0;
        while total < buffer.len() {
            match self.f.read(&mut buffer[total..]) {
                Ok(0) => break,
                Ok(n) => total += n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }
        self.pos += total as u64;
        Ok(total)
    }
    #[cfg(feature = "stable")]
    fn write(&mut self, buffer: &[u8]) -> Ext2Result<usize> {
        // Regular files would grow; a device cannot, so neither do we.
        let room = usize::try_from(self.size.saturating_sub(self.pos)).unwrap_or(usize::MAX);
        let n = room.min(buffer.len());
        self.f.write_all(&buffer[..n])?;
        self.pos += n as u64;
        Ok(n)
    }
    #[cfg(feature = "stable")]
    fn size(&self) -> Ext2Result<u64> {
        Ok(self.size)
    }
    #[cfg(feature = "stable")]
    fn sync(&mut self) -> Ext2Result<()> {
        self.f.sync_all()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use std::io::Write;

    use super::*;
    use crate::{rw_diskblocks, Ext2Error, IoMode};

    #[test]
    fn file_semantics_match_devices() {
        let mut img = tempfile::NamedTempFile::new().unwrap();
        img.write_all(&[0u8; 1536]).unwrap();
        img.flush().unwrap();

        let mut d = DiskFile::open_rw(img.path()).unwrap();
        assert_eq!(d.size().unwrap(), 1536);

        let mut buf = [0x55u8; 1024];
        assert!(matches!(
            rw_diskblocks(&mut d, 1024, &mut buf, IoMode::Put),
            Err(Ext2Error::ShortTransfer { actual: 512, .. })
        ));
        assert!(matches!(
            rw_diskblocks(&mut d, 8192, &mut buf, IoMode::Get),
            Err(Ext2Error::Positioning { .. })
        ));
        assert_eq!(std::fs::metadata(img.path()).unwrap().len(), 1536);

        let mut head = [0u8; 512];
        rw_diskblocks(&mut d, 1024, &mut head, IoMode::Get).unwrap();
        assert!(head.iter().all(|b| *b == 0x55));
    }

    #[test]
    fn read_only_open_refuses_writes() {
        let img = tempfile::NamedTempFile::new().unwrap();
        img.as_file().set_len(4096).unwrap();

        let mut d = DiskFile::open(img.path()).unwrap();
        let mut buf = [1u8; 16];
        assert!(matches!(
            rw_diskblocks(&mut d, 0, &mut buf, IoMode::Put),
            Err(Ext2Error::Io(_))
        ));
    }

    #[test]
    fn missing_device() {
        assert!(matches!(
            DiskFile::open("/nonexistent/e2fsim-device"),
            Err(Ext2Error::Io(_))
        ));
    }
}
