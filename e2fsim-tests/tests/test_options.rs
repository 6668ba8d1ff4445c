use e2fsim::{
    operations::{set_fsck_options, set_mkfs_options, OptionArray, OptionEntry, OptionValue},
    Volume,
};
use e2fsim_macros::*;
use itertools::Itertools;

fn parse(args: &[&str]) -> OptionArray {
    args.iter().map(|a| a.parse::<OptionEntry>().unwrap()).collect()
}

#[test_fs]
fn test_mkfs_all_options() {
    let v = Volume::new("/dev/evms/data");
    let opts = parse(&["badblocks", "journal", "vollabel=data"]);
    let argv = set_mkfs_options(&opts, &v, "mke2fs");
    assert_eq!(argv.args().iter().join(" "), "-q -c -j -L data /dev/evms/data");
}

#[test_fs]
fn test_mkfs_unknown_and_false() {
    let v = Volume::new("/dev/evms/data");
    let opts = parse(&["journal=no", "inode_size=256", "badblocks_rw=off"]);
    let argv = set_mkfs_options(&opts, &v, "mke2fs");
    assert_eq!(argv.args().iter().join(" "), "-q /dev/evms/data");
}

#[test_fs]
fn test_fsck_mounted_matrix() {
    let names = ["force", "readonly", "badblocks", "badblocks_rw", "timing"];
    let v = Volume::new("/dev/evms/root").with_mounted(true);
    for n in 0..=names.len() {
        for subset in names.iter().combinations(n) {
            let opts = parse(&subset.iter().map(|s| **s).collect::<Vec<_>>());
            let argv = set_fsck_options(&opts, &v, "e2fsck");
            let args = argv.args();
            assert_eq!(args.iter().filter(|a| *a == "-n").count(), 1, "{}", argv);
            assert!(!argv.contains("-f"), "{}", argv);
            assert!(!argv.contains("-c"), "{}", argv);
            assert!(!argv.contains("-cc"), "{}", argv);
            assert!(!argv.contains("-p"), "{}", argv);
            assert_eq!(argv.contains("-tt"), subset.contains(&&"timing"), "{}", argv);
            assert_eq!(argv.last(), "/dev/evms/root");
        }
    }
}

#[test_fs]
fn test_fsck_preen_rules() {
    let v = Volume::new("/dev/evms/data");
    let cases: Vec<(Vec<&str>, &str)> = vec![
        (vec![], "-p"),
        (vec!["force"], "-f -p"),
        (vec!["timing"], "-tt -p"),
        (vec!["readonly"], "-n"),
        (vec!["badblocks"], "-c"),
        (vec!["badblocks_rw", "force"], "-cc -f"),
        (vec!["readonly=false", "badblocks=no"], "-p"),
    ];
    for (opts, expected) in &cases {
        let argv = set_fsck_options(&parse(opts), &v, "e2fsck");
        assert_eq!(
            argv.args().iter().join(" "),
            format!("{} /dev/evms/data", expected)
        );
    }
}

#[test_fs]
fn test_numbered_options() {
    let v = Volume::new("/dev/evms/data");
    let opts = OptionArray::new()
        .with_number(4, OptionValue::Bool(true))
        .with_number(1, OptionValue::Bool(true))
        .with_number(9, OptionValue::Bool(true));
    let argv = set_fsck_options(&opts, &v, "e2fsck");
    assert_eq!(argv.args().iter().join(" "), "-tt -n /dev/evms/data");
}
