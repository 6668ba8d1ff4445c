//!
//! The superblock is the only on-disk structure e2fsim reads or writes.
//!
//! The primary copy lives 1024 bytes into the device and is 1024 bytes long,
//! whatever the block size:
//! ```
//! # use e2fsim::{test::images::mem_with_superblock, Ext2Error, Superblock};
//! let disk = mem_with_superblock(8192, &Superblock::new(8, 0));
//! let sb = Superblock::read(disk)?;
//! assert_eq!(sb.magic(), 0xEF53);
//! assert_eq!(sb.block_size(), Some(1024));
//! # Ok::<(), Ext2Error>(())
//! ```
//!
//! A superblock is accepted when its magic is `0xEF53` and its revision is
//! no newer than 1. Anything else is reported as a validation error:
//! ```
//! # use e2fsim::{DiskMem, Ext2Error, Superblock};
//! let err = Superblock::read(DiskMem::open(8192)).unwrap_err();
//! assert!(matches!(err, Ext2Error::BadMagic(0)));
//! assert!(err.is_validation());
//! ```
//!
//! The feature words tell ext2 and ext3 apart. An ext3 filesystem is an ext2
//! filesystem with a journal ([has_journal](crate::Ext2Feature::HasJournal)).
//!
//! Unformatting zeroes the cached superblock and writes it back, which is
//! enough for every prober to stop recognizing the volume. Backup copies in
//! later block groups are left alone.
