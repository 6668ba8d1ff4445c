use e2fsim::{Ext2Error, Ext2Plugin, FsInterface, Volume};
use e2fsim_macros::*;
use e2fsim_tests::imagegen::generators::*;

#[test_fs]
fn test_limits_1k() {
    generate_image!(1);

    let plugin = Ext2Plugin::default();
    let mut v = load_image!(1);
    plugin.probe(&mut v).unwrap();
    let l = plugin.get_limits(&v).unwrap();
    // 64 1KiB blocks are 128 sectors.
    assert_eq!(l.min_size, 128);
    assert_eq!(l.max_volume_size, 128);
    assert_eq!(l.max_object_size, 128);
}

#[test_fs]
fn test_limits_4k() {
    generate_image!(5);

    let mut v = load_image!(5);
    v.probe().unwrap();
    let l = v.limits().unwrap();
    assert_eq!(l.min_size, 16 << 3);
    assert_eq!(l.min_size, l.max_volume_size);
}

#[test_fs]
fn test_limits_unprobed() {
    let v = Volume::new("/dev/does-not-exist");
    assert!(matches!(v.limits(), Err(Ext2Error::NoSuperblock(_))));
}

#[test_fs]
fn test_probe_missing_device() {
    let mut v = Volume::new("/dev/does-not-exist");
    let err = v.probe().unwrap_err();
    assert!(matches!(err, Ext2Error::Io(_)));
    // ENOENT
    assert_eq!(err.to_errno(), 2);
}
