use std::process::Command;

use e2fsim::{test::images::temp_image, DiskFile, Ext2Error, Ext2Plugin, FsInterface, Superblock, Volume};
use e2fsim_macros::*;
use e2fsim_tests::imagegen::generators::*;

#[test_fs]
fn test_unformat() {
    generate_image!(6);

    let plugin = Ext2Plugin::default();
    let mut v = load_image!(6);
    assert_eq!(plugin.probe(&mut v).unwrap().label(), "e2fsim-test");

    plugin.unmkfs(&mut v).unwrap();
    assert!(v.superblock().unwrap().is_zeroed());

    let data = std::fs::read("test_0006.img").unwrap();
    assert_eq!(data.len(), 64 * 1024);
    assert!(data.iter().all(|b| *b == 0));

    let mut again = load_image!(6);
    assert!(matches!(plugin.probe(&mut again), Err(Ext2Error::BadMagic(0))));
}

#[test_fs]
fn test_unformat_unprobed() {
    generate_image!(1);

    let mut v = load_image!(1);
    assert!(matches!(v.unformat(), Err(Ext2Error::NoSuperblock(_))));
    // Nothing was written.
    assert!(load_image!(1).get_superblock().is_ok());
}

/// Needs root: attaches the image to a loop device with `losetup`.
#[test_fs]
#[ignore]
fn test_unformat_busy_device() {
    let img = temp_image(64 * 1024, Some(&Superblock::new(64, 0)));
    let out = Command::new("losetup")
        .arg("--find")
        .arg("--show")
        .arg(img.path())
        .output()
        .unwrap();
    assert!(out.status.success(), "losetup failed");
    let dev = String::from_utf8(out.stdout).unwrap().trim().to_string();

    let holder = DiskFile::open_exclusive(&dev).unwrap();
    let mut v = Volume::new(&dev);
    v.probe().unwrap();
    let res = v.unformat();
    let intact = v.get_superblock().is_ok();
    drop(holder);
    Command::new("losetup").arg("-d").arg(&dev).status().unwrap();

    let err = res.unwrap_err();
    assert!(matches!(err, Ext2Error::Io(_)));
    // EBUSY
    assert_eq!(err.to_errno(), 16);
    assert!(intact);
}
