#![cfg(not(tarpaulin_include))]
#![allow(clippy::all)]

use e2fsim::{
    operations::{OptionArray, OptionEntry},
    Ext2Plugin, FsInterface, Volume,
};

fn usage() -> ! {
    eprintln!("usage: fsck <device> [force|readonly|badblocks|badblocks_rw|timing]...");
    std::process::exit(16);
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
    match Ext2Plugin::default().fsck(&volume, &options) {
        Ok(report) => {
            for flag in report.status.flags() {
                let name: &'static str = flag.into();
                eprintln!("{}: {}", path, name);
            }
            std::process::exit(report.status.code());
        }
        Err(e) => {
            eprintln!("{}: {}", path, e);
            std::process::exit(8);
        }
    }
}
