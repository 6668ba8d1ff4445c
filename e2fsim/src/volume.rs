use std::path::{Path, PathBuf};

use crate::{DiskFile, Ext2Error, Ext2Result, MountTable, Superblock};

/// Largest block-size exponent ext2 defines (64KiB blocks).
const MAX_LOG_BLOCK_SIZE: u32 = 6;

/// A logical volume as the engine hands it to us.
#[derive(Debug, Clone)]
pub struct Volume {
    name:     String,
    dev_path: PathBuf,
    mounted:  bool,
    /// Superblock cached by [`Volume::probe`]
    private:  Option<Superblock>,
}

/// Size limits of a volume, in 512-byte sectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VolumeLimits {
    /// Smallest size the filesystem can shrink to
    pub min_size:        u64,
    /// Largest size the volume can grow to
    pub max_volume_size: u64,
    /// Largest size the underlying object may have
    pub max_object_size: u64,
}

impl Volume {
    /// A volume on `dev_path`, assumed unmounted.
    pub fn new<P: AsRef<Path>>(dev_path: P) -> Volume {
        let dev_path = dev_path.as_ref().to_path_buf();
        Volume {
            name: dev_path.display().to_string(),
            dev_path,
            mounted: false,
            private: None,
        }
    }
    /// A volume on `dev_path`, with its mount state taken from the kernel.
    #[cfg(feature = "stable")]
    pub fn open<P: AsRef<Path>>(dev_path: P) -> Volume {
        let mut res = Volume::new(dev_path);
        match MountTable::load() {
            Ok(table) => res.mounted = table.is_mounted(&res.dev_path),
            Err(e) => warn!("Cannot read mount table, assuming {} is unmounted: {}", res.name, e),
        }
        res
    }
    /// Sets the display name.
    pub fn with_name<S: Into<String>>(mut self, name: S) -> Volume {
        self.name = name.into();
        self
    }
    /// Sets the mounted flag.
    pub fn with_mounted(mut self, mounted: bool) -> Volume {
        self.mounted = mounted;
        self
    }
    /// Display name
    pub fn name(&self) -> &str {
        &self.name
    }
    /// Backing device
    pub fn dev_path(&self) -> &Path {
        &self.dev_path
    }
    /// Whether the filesystem is mounted
    pub fn is_mounted(&self) -> bool {
        self.mounted
    }
    /// The superblock cached by the last probe
    pub fn superblock(&self) -> Option<&Superblock> {
        self.private.as_ref()
    }

    /// Reads and validates the volume's superblock.
    ///
    /// The device is opened read-only and closed again before returning.
    #[cfg(feature = "stable")]
    pub fn get_superblock(&self) -> Ext2Result<Superblock> {
        let d = DiskFile::open(&self.dev_path)?;
        let res = Superblock::read(d);
        match &res {
            Ok(sb) => debug!(
                "{}: ext2 superblock rev {}, {} blocks",
                self.name,
                sb.rev_level(),
                sb.blocks_count()
            ),
            Err(e) => debug!("{}: no ext2 superblock: {}", self.name, e),
        }
        res
    }

    /// Reads the superblock and caches it on the volume.
    #[cfg(feature = "stable")]
    pub fn probe(&mut self) -> Ext2Result<&Superblock> {
        let sb = self.get_superblock()?;
        info!(
            "{}: found {} filesystem",
            self.name,
            if sb.has_journal() { "ext3" } else { "ext2" }
        );
        Ok(self.private.insert(sb))
    }

    /// Destroys the filesystem signature by zeroing the primary superblock.
    ///
    /// Opens the device exclusively, so a device that is mounted or held
    /// elsewhere fails with the open error. Requires a cached superblock.
    #[cfg(feature = "unstable")]
    pub fn unformat(&mut self) -> Ext2Result<()> {
        let d = DiskFile::open_exclusive(&self.dev_path)?;
        let name = &self.name;
        let sb = self
            .private
            .as_mut()
            .ok_or_else(|| Ext2Error::NoSuperblock(name.clone()))?;
        sb.zero_fill();
        sb.write(d)?;
        info!("{}: superblock cleared", self.name);
        Ok(())
    }

    /// Size limits derived from the cached superblock.
    #[cfg(feature = "stable")]
    pub fn limits(&self) -> Ext2Result<VolumeLimits> {
        let sb = self
            .superblock()
            .ok_or_else(|| Ext2Error::NoSuperblock(self.name.clone()))?;
        get_volume_limits(sb)
    }
}

/// Size limits for a filesystem. ext2/ext3 cannot be resized here, so all
/// three limits are the current size: `blocks_count << (1 + log_block_size)`
/// sectors.
#[cfg(feature = "stable")]
pub fn get_volume_limits(sb: &Superblock) -> Ext2Result<VolumeLimits> {
    let log = sb.log_block_size();
    assert_or_err!(
        log <= MAX_LOG_BLOCK_SIZE,
        Ext2Error::InvalidArgument(format!("block size exponent {}", log))
    );
    let fs_size = u64::from(sb.blocks_count()) << (1 + log);
    debug_assert_le!(fs_size, u64::from(u32::MAX) << (1 + MAX_LOG_BLOCK_SIZE));
    Ok(VolumeLimits {
        min_size:        fs_size,
        max_volume_size: fs_size,
        max_object_size: fs_size,
    })
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test::images::temp_image;

    #[test]
    fn limits_are_fs_size() {
        let sb = Superblock::new(8192, 0);
        let l = get_volume_limits(&sb).unwrap();
        assert_eq!(l.min_size, 8192 << 1);
        assert_eq!(l.max_volume_size, l.min_size);
        assert_eq!(l.max_object_size, l.min_size);

        let sb = Superblock::new(262144, 2);
        assert_eq!(get_volume_limits(&sb).unwrap().min_size, 262144 << 3);
    }

    #[test]
    fn absurd_block_size() {
        let mut sb = Superblock::new(1, 0);
        sb.header_mut().log_block_size = 6;
        assert_eq!(get_volume_limits(&sb).unwrap().min_size, 1 << 7);

        sb.header_mut().log_block_size = 7;
        let err = get_volume_limits(&sb).unwrap_err();
        assert!(matches!(err, Ext2Error::InvalidArgument(_)));
        assert_eq!(err.to_errno(), libc::EINVAL);

        sb.header_mut().log_block_size = 40;
        assert!(matches!(
            get_volume_limits(&sb),
            Err(Ext2Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn limits_need_probe() {
        let v = Volume::new("/dev/null");
        assert!(matches!(v.limits(), Err(Ext2Error::NoSuperblock(_))));
    }

    #[test]
    fn probe_and_unformat() {
        let mut sb = Superblock::new(64, 0);
        sb.set_label("probe");
        let img = temp_image(64 * 1024, Some(&sb));

        let mut v = Volume::new(img.path()).with_name("lvm/probe");
        assert_eq!(v.name(), "lvm/probe");
        assert_eq!(v.probe().unwrap().label(), "probe");
        assert_eq!(v.limits().unwrap().min_size, 128);

        v.unformat().unwrap();
        assert!(v.superblock().unwrap().is_zeroed());
        assert!(v.get_superblock().unwrap_err().is_validation());
    }

    #[test]
    fn unformat_without_probe() {
        let img = temp_image(4096, None);
        let mut v = Volume::new(img.path());
        assert!(matches!(v.unformat(), Err(Ext2Error::NoSuperblock(_))));
    }
}
