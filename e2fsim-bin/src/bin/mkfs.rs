#![cfg(not(tarpaulin_include))]
#![allow(clippy::all)]

use e2fsim::{
    operations::{OptionArray, OptionEntry},
    Ext2Plugin, FsInterface, Volume,
};

fn usage() -> ! {
    eprintln!("usage: mkfs <device> [badblocks|badblocks_rw|journal|vollabel=<label>]...");
    std::process::exit(2);
}

fn main() {
    e2fsim::test::logging::init_log();

    let mut args = std::env::args().skip(1);
    let path = args.next().unwrap_or_else(|| usage());
    let options: OptionArray = match args.map(|a| a.parse::<OptionEntry>()).collect::<Result<OptionArray, _>>() {
        Ok(v) => v,
        Err(e) => {
            eprintln!("{}", e);
            usage()
        }
    };

    let volume = Volume::open(&path);
    if volume.is_mounted() {
        eprintln!("{} is mounted", path);
        std::process::exit(1);
    }
    match Ext2Plugin::default().mkfs(&volume, &options) {
        Ok(rc) => std::process::exit(rc),
        Err(e) => {
            eprintln!("{}: {}", path, e);
            std::process::exit(e.to_errno().abs());
        }
    }
}
