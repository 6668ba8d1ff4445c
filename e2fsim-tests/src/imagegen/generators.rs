use std::fs::File;

use super::utils::{create_file, put_bytes, put_u16, put_u32};

/// Zero-filled 64KiB file
pub fn generate_0000(f: &File) {
    create_file(f, 64)
}

/// Valid 1KiB-block ext2 superblock
pub fn generate_0001(f: &File) {
    generate_0000(f);

    put_u32(f, 0, 16); // inodes_count
    put_u32(f, 4, 64); // blocks_count
    put_u32(f, 12, 40); // free_blocks_count
    put_u32(f, 16, 5); // free_inodes_count
    put_u32(f, 20, 1); // first_data_block
    put_u32(f, 24, 0); // log_block_size
    put_u32(f, 32, 8192); // blocks_per_group
    put_u32(f, 40, 16); // inodes_per_group
    put_u16(f, 56, 0xEF53);
    put_u16(f, 58, 1); // state
    put_u32(f, 76, 1); // rev_level
    put_u32(f, 84, 11); // first_ino
    put_u16(f, 88, 128); // inode_size
    put_u32(f, 92, 0x38);
    put_u32(f, 96, 0x2);
    put_u32(f, 100, 0x3);
    let uuid: Vec<u8> = (1..=16).collect();
    put_bytes(f, 104, &uuid);
    put_bytes(f, 120, b"e2fsim-test");
}

/// Wrong magic
pub fn generate_0002(f: &File) {
    generate_0001(f);
    put_u16(f, 56, 0x1234);
}

/// Revision newer than supported
pub fn generate_0003(f: &File) {
    generate_0001(f);
    put_u32(f, 76, 2);
}

/// Device ends in the middle of the superblock
pub fn generate_0004(f: &File) {
    generate_0001(f);
    f.set_len(1536).unwrap();
}

/// ext3 with 4KiB blocks
pub fn generate_0005(f: &File) {
    generate_0001(f);
    put_u32(f, 4, 16);
    put_u32(f, 20, 0);
    put_u32(f, 24, 2);
    put_u32(f, 92, 0x3C);
    put_bytes(f, 120, &[0u8; 16]);
    put_bytes(f, 120, b"journal");
}

/// Same as 0001, consumed by the unformat tests
pub fn generate_0006(f: &File) {
    generate_0001(f);
}
