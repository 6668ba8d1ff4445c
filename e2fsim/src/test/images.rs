use std::path::Path;

use crate::{Disk, DiskFile, DiskMem, Superblock, EXT2_SUPER_LOC, SIZE_OF_SUPER};

/// A zeroed in-memory device of `size` bytes carrying `sb` at 1024.
pub fn mem_with_superblock(size: usize, sb: &Superblock) -> Disk {
    let mut data = vec![0u8; size];
    let start = EXT2_SUPER_LOC as usize;
    data[start..start + SIZE_OF_SUPER].copy_from_slice(&sb.to_bytes());
    DiskMem::from_bytes(data)
}

/// Writes `sb` into an existing image file.
pub fn write_superblock<P: AsRef<Path>>(path: P, sb: &Superblock) {
    sb.write(DiskFile::open_rw(path).unwrap()).unwrap();
}

/// A temporary image file of `size` bytes with `sb` written into it.
pub fn temp_image(size: u64, sb: Option<&Superblock>) -> tempfile::NamedTempFile {
    let img = tempfile::NamedTempFile::new().unwrap();
    img.as_file().set_len(size).unwrap();
    if let Some(sb) = sb {
        write_superblock(img.path(), sb);
    }
    img
}
