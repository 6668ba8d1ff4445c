use e2fsim::{DiskFile, Ext2Error, Ext2Feature, Superblock};
use e2fsim_macros::*;
use e2fsim_tests::imagegen::generators::*;

#[test_fs]
fn test_err_zeroed() {
    generate_image!(0);

    let mut v = load_image!(0);
    assert!(matches!(v.probe(), Err(Ext2Error::BadMagic(0))));
    assert!(v.superblock().is_none());
}

#[test_fs]
fn test_okay() {
    generate_image!(1);

    let mut v = load_image!(1);
    let sb = v.probe().unwrap();
    assert_eq!(sb.magic(), 0xEF53);
    assert_eq!(sb.rev_level(), 1);
    assert_eq!(sb.blocks_count(), 64);
    assert_eq!(sb.block_size(), Some(1024));
    assert_eq!(sb.byte_size(), Some(64 * 1024));
    assert_eq!(sb.header().inodes_count, 16);
    assert_eq!(sb.header().first_data_block, 1);
    assert_eq!(sb.header().free_blocks_count, 40);
    assert_eq!(sb.label(), "e2fsim-test");
    assert_eq!(
        sb.uuid_string(),
        "01020304-0506-0708-090a-0b0c0d0e0f10"
    );
    assert!(!sb.has_journal());
    assert!(sb.features().contains(&Ext2Feature::Filetype));
    assert!(v.superblock().is_some());
}

#[test_fs]
fn test_err_magic() {
    generate_image!(2);

    let err = load_image!(2).get_superblock().unwrap_err();
    assert!(matches!(err, Ext2Error::BadMagic(0x1234)));
    assert!(err.is_validation());
    assert_eq!(err.to_errno(), e2fsim::FSIM_ERROR);
}

#[test_fs]
fn test_err_revision() {
    generate_image!(3);

    let err = load_image!(3).get_superblock().unwrap_err();
    assert!(matches!(err, Ext2Error::BadRevision(2)));

    // The raw record is still there for inspection.
    let sb = Superblock::read_unchecked(DiskFile::open("test_0003.img").unwrap()).unwrap();
    assert_eq!(sb.magic(), 0xEF53);
}

#[test_fs]
fn test_err_truncated() {
    generate_image!(4);

    let err = load_image!(4).get_superblock().unwrap_err();
    assert!(matches!(
        err,
        Ext2Error::ShortTransfer {
            expected: 1024,
            actual:   512,
        }
    ));
    // EIO
    assert_eq!(err.to_errno(), 5);
}

#[test_fs]
fn test_ext3() {
    generate_image!(5);

    let mut v = load_image!(5);
    let sb = v.probe().unwrap();
    assert!(sb.has_journal());
    assert_eq!(sb.block_size(), Some(4096));
    assert_eq!(sb.label(), "journal");
}
