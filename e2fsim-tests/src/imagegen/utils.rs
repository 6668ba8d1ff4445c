use std::convert::TryInto;
use std::fs::File;
use std::os::unix::fs::FileExt;

use e2fsim::EXT2_SUPER_LOC;

pub const KIB: usize = 1024;

pub fn create_file(f: &File, n: usize) {
    f.set_len(0).unwrap();
    f.set_len((n * KIB).try_into().unwrap()).unwrap();
}

/// Writes raw bytes at an offset inside the primary superblock
pub fn put_bytes(f: &File, offset: u64, bytes: &[u8]) {
    f.write_all_at(bytes, EXT2_SUPER_LOC + offset).unwrap();
}

pub fn put_u16(f: &File, offset: u64, value: u16) {
    put_bytes(f, offset, &value.to_le_bytes());
}

pub fn put_u32(f: &File, offset: u64, value: u32) {
    put_bytes(f, offset, &value.to_le_bytes());
}
