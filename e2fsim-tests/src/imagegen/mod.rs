//! Generated test images and their recorded checksums.
//!
//! Image `n` is written to `test_NNNN.img` in the package directory by
//! `generate_NNNN`; line `n` of `hashes.txt` holds its SHA-256.

pub mod generators;
mod utils;

use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use data_encoding::HEXUPPER;
use sha2::{Digest, Sha256};

static CHECKSUMS: OnceLock<Vec<String>> = OnceLock::new();

/// File name of image `n`
pub fn image_name(n: usize) -> String {
    format!("test_{:04}.img", n)
}

/// Recorded checksums, indexed by image number
pub fn get_checksums() -> &'static [String] {
    CHECKSUMS.get_or_init(load_checksums)
}

fn load_checksums() -> Vec<String> {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("hashes.txt");
    std::fs::read_to_string(path)
        .unwrap()
        .lines()
        .map(str::to_string)
        .collect()
}

/// Uppercase hex SHA-256 of a file
pub fn sha256_of(path: &Path) -> String {
    let mut file = File::open(path).unwrap();
    let mut sha256 = Sha256::new();
    std::io::copy(&mut file, &mut sha256).unwrap();
    HEXUPPER.encode(sha256.finalize().as_ref())
}

/// Panics unless image `n` matches its recorded checksum.
pub fn verify_image(n: usize) {
    let name = image_name(n);
    assert_eq!(
        sha256_of(Path::new(&name)),
        get_checksums()[n],
        "{} does not match hashes.txt",
        name
    );
}
