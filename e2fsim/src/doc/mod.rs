//!
//! Documentation on the design of e2fsim
//!
//! e2fsim lets a volume manager treat ext2 and ext3 filesystems as just
//! another kind of volume content. It never interprets the filesystem beyond
//! its primary superblock; everything else is left to e2fsprogs.
//!
//! Creating and checking run `mke2fs` and `e2fsck` as child processes. The
//! option lists handed over by the engine are translated to command lines by
//! [set_mkfs_options](crate::operations::set_mkfs_options) and
//! [set_fsck_options](crate::operations::set_fsck_options). Both accept
//! options by table index or by name:
//! ```
//! # use e2fsim::{operations::*, Volume};
//! let opts = OptionArray::new().with_bool("journal", true).with_str("vollabel", "home");
//! let argv = set_mkfs_options(&opts, &Volume::new("/dev/sdb1"), "mke2fs");
//! assert_eq!(argv.to_string(), "'mke2fs' '-q' '-j' '-L' 'home' '/dev/sdb1'");
//! ```
//!
//! A mounted filesystem is only ever checked read-only:
//! ```
//! # use e2fsim::{operations::*, Volume};
//! let v = Volume::new("/dev/sdb1").with_mounted(true);
//! let opts = OptionArray::new().with_bool("force", true);
//! assert_eq!(set_fsck_options(&opts, &v, "e2fsck").to_string(), "'e2fsck' '-n' '/dev/sdb1'");
//! ```

pub mod superblock;
