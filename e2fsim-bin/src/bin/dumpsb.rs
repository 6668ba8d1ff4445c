#![cfg(not(tarpaulin_include))]
#![allow(clippy::all)]

use e2fsim::*;

use strum::IntoEnumIterator;
use type_layout::TypeLayout;

use colored::*;

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.iter().any(|a| a == "--layout") {
        println!("{}", SuperblockHeader::type_layout());
        return;
    }
    let path = match args.first() {
        Some(p) => p,
        None => {
            eprintln!("usage: dumpsb <device> | --layout");
            std::process::exit(2);
        }
    };

    let d = match DiskFile::open(path) {
        Ok(d) => d,
        Err(e) => {
            eprintln!("{}: {}", path, e);
            std::process::exit(1);
        }
    };
    println!("Image is {} bytes long", d.size().unwrap_or(0));

    let sb = match Superblock::read_unchecked(d) {
        Ok(sb) => sb,
        Err(e) => {
            eprintln!("{}: {}", path, e);
            std::process::exit(1);
        }
    };

    match sb.validate() {
        Ok(()) => println!("{}", format!("magic:{:04x} rev:{}", sb.magic(), sb.rev_level()).green()),
        Err(e) => {
            println!("{}", format!("magic:{:04x} rev:{}", sb.magic(), sb.rev_level()).red());
            println!("{}", e.to_string().red());
        }
    }

    let h = sb.header();
    println!(
        "blocks:{} free:{} first:{} block size:{}",
        h.blocks_count,
        h.free_blocks_count,
        h.first_data_block,
        match sb.block_size() {
            Some(bs) => bs.to_string().normal(),
            None => format!("2^(10+{})", h.log_block_size).red(),
        }
    );
    println!(
        "inodes:{} free:{} size:{} per group:{}",
        h.inodes_count, h.free_inodes_count, h.inode_size, h.inodes_per_group
    );
    println!("uuid:{} label:{:?}", sb.uuid_string(), sb.label());

    print!("features: ");
    let features = sb.features();
    for f in Ext2Feature::iter() {
        if features.contains(&f) {
            print!("{} ", f.name().green());
        } else {
            print!("{} ", f.name().dimmed());
        }
    }
    println!();
    for (word, value) in &[
        (FeatureWord::Compat, h.feature_compat),
        (FeatureWord::Incompat, h.feature_incompat),
        (FeatureWord::RoCompat, h.feature_ro_compat),
    ] {
        let unknown = unknown_bits(*word, *value);
        if !unknown.is_empty() {
            println!("{}", format!("unknown {:?} bits: {:?}", word, unknown).red());
        }
    }

    match get_volume_limits(&sb) {
        Ok(l) => println!(
            "limits: min {} max volume {} max object {} sectors",
            l.min_size, l.max_volume_size, l.max_object_size
        ),
        Err(e) => println!("{}", format!("limits: {}", e).red()),
    }
}
