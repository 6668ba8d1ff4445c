use std::collections::BTreeSet;

use endian_codec::{DecodeLE, EncodeLE, PackedSize};
use type_layout::TypeLayout;

use crate::{
    features, rw_diskblocks, Disk, Ext2Error, Ext2Feature, Ext2Result, IoMode,
    EXT2_MAX_SUPPORTED_REV, EXT2_SUPER_LOC, EXT2_SUPER_MAGIC, SIZE_OF_SUPER,
};

const UUID_OFFSET: usize = 104;
const LABEL_OFFSET: usize = 120;
const LABEL_LEN: usize = 16;

#[repr(C)]
#[allow(missing_docs)]
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, PackedSize, EncodeLE, DecodeLE, TypeLayout)]
/// The fixed integer prefix of the ext2 superblock, little-endian on disk.
pub struct SuperblockHeader {
    pub inodes_count:       u32,
    pub blocks_count:       u32,
    pub r_blocks_count:     u32,
    pub free_blocks_count:  u32,
    pub free_inodes_count:  u32,
    pub first_data_block:   u32,
    pub log_block_size:     u32,
    pub log_frag_size:      u32,
    pub blocks_per_group:   u32,
    pub frags_per_group:    u32,
    pub inodes_per_group:   u32,
    pub mtime:              u32,
    pub wtime:              u32,
    pub mnt_count:          u16,
    pub max_mnt_count:      u16,
    pub magic:              u16,
    pub state:              u16,
    pub errors:             u16,
    pub minor_rev_level:    u16,
    pub lastcheck:          u32,
    pub checkinterval:      u32,
    pub creator_os:         u32,
    pub rev_level:          u32,
    pub def_resuid:         u16,
    pub def_resgid:         u16,
    pub first_ino:          u32,
    pub inode_size:         u16,
    pub block_group_nr:     u16,
    pub feature_compat:     u32,
    pub feature_incompat:   u32,
    pub feature_ro_compat:  u32,
}

/// An ext2/ext3 superblock. Keeps the full on-disk block so writing it back is lossless.
#[derive(Clone)]
pub struct Superblock {
    hdr: SuperblockHeader,
    raw: Vec<u8>,
}

impl PartialEq for Superblock {
    fn eq(&self, other: &Superblock) -> bool {
        self.to_bytes() == other.to_bytes()
    }
}

impl Eq for Superblock {}

impl std::fmt::Debug for Superblock {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_struct("Superblock")
            .field("hdr", &self.hdr)
            .field("uuid", &self.uuid())
            .field("label", &self.label())
            .finish()
    }
}

impl Superblock {
    /// Creates a minimal valid revision 1 superblock.
    #[cfg(feature = "unstable")]
    pub fn new(blocks_count: u32, log_block_size: u32) -> Superblock {
        let mut sb = Superblock::zeroed();
        sb.hdr.blocks_count = blocks_count;
        sb.hdr.log_block_size = log_block_size;
        sb.hdr.first_data_block = u32::from(log_block_size == 0);
        sb.hdr.magic = EXT2_SUPER_MAGIC;
        sb.hdr.rev_level = EXT2_MAX_SUPPORTED_REV;
        sb.hdr.state = 1;
        sb
    }
    /// An all-zero superblock.
    #[cfg(feature = "stable")]
    pub fn zeroed() -> Superblock {
        Superblock {
            hdr: SuperblockHeader::default(),
            raw: vec![0; SIZE_OF_SUPER],
        }
    }
    /// Decodes a superblock from its on-disk bytes without validating it.
    #[cfg(feature = "stable")]
    pub fn from_bytes(bytes: &[u8]) -> Ext2Result<Superblock> {
        assert_or_err!(
            bytes.len() >= SIZE_OF_SUPER,
            Ext2Error::ShortTransfer {
                expected: SIZE_OF_SUPER,
                actual:   bytes.len(),
            }
        );
        let raw = bytes[..SIZE_OF_SUPER].to_vec();
        let hdr = SuperblockHeader::decode_from_le_bytes(&raw[..SuperblockHeader::PACKED_LEN]);
        Ok(Superblock { hdr, raw })
    }
    /// Encodes the superblock into its on-disk bytes.
    #[cfg(feature = "stable")]
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut raw = self.raw.clone();
        self.hdr
            .encode_as_le_bytes(&mut raw[..SuperblockHeader::PACKED_LEN]);
        raw
    }
    /// Reads and validates the primary superblock from a disk.
    #[cfg(feature = "stable")]
    pub fn read(d: Disk) -> Ext2Result<Superblock> {
        let res = Superblock::read_unchecked(d)?;
        res.validate()?;
        Ok(res)
    }
    /// Reads the primary superblock without validating it.
    #[cfg(feature = "stable")]
    pub fn read_unchecked(mut d: Disk) -> Ext2Result<Superblock> {
        let mut buf = vec![0u8; SIZE_OF_SUPER];
        rw_diskblocks(&mut d, EXT2_SUPER_LOC, &mut buf, IoMode::Get)?;
        Superblock::from_bytes(&buf)
    }
    /// Writes the superblock to the primary location.
    #[cfg(feature = "stable")]
    pub fn write(&self, mut d: Disk) -> Ext2Result<()> {
        let mut buf = self.to_bytes();
        rw_diskblocks(&mut d, EXT2_SUPER_LOC, &mut buf, IoMode::Put)?;
        d.sync()
    }
    /// Checks that this is an ext2/ext3 superblock we understand.
    #[cfg(feature = "stable")]
    pub fn validate(&self) -> Ext2Result<()> {
        assert_or_err!(self.hdr.magic == EXT2_SUPER_MAGIC, Ext2Error::BadMagic(self.hdr.magic));
        assert_or_err!(
            self.hdr.rev_level <= EXT2_MAX_SUPPORTED_REV,
            Ext2Error::BadRevision(self.hdr.rev_level)
        );
        Ok(())
    }
    /// Clears every byte of the superblock.
    #[cfg(feature = "unstable")]
    pub fn zero_fill(&mut self) {
        *self = Superblock::zeroed();
    }
    /// True if every byte is zero.
    #[cfg(feature = "stable")]
    pub fn is_zeroed(&self) -> bool {
        self.to_bytes().iter().all(|b| *b == 0)
    }
    /// The decoded integer fields
    #[cfg(feature = "stable")]
    pub fn header(&self) -> &SuperblockHeader {
        &self.hdr
    }
    /// Mutable access to the integer fields
    #[cfg(feature = "unstable")]
    pub fn header_mut(&mut self) -> &mut SuperblockHeader {
        &mut self.hdr
    }
    /// Getter for magic
    #[cfg(feature = "stable")]
    pub fn magic(&self) -> u16 {
        self.hdr.magic
    }
    /// Getter for revision level
    #[cfg(feature = "stable")]
    pub fn rev_level(&self) -> u32 {
        self.hdr.rev_level
    }
    /// Getter for block count
    #[cfg(feature = "stable")]
    pub fn blocks_count(&self) -> u32 {
        self.hdr.blocks_count
    }
    /// Getter for the block-size exponent
    #[cfg(feature = "stable")]
    pub fn log_block_size(&self) -> u32 {
        self.hdr.log_block_size
    }
    /// Block size in bytes, `None` if the exponent is absurd
    #[cfg(feature = "stable")]
    pub fn block_size(&self) -> Option<u64> {
        1024u64.checked_shl(self.hdr.log_block_size)
            .filter(|size| *size <= 1 << 16)
    }
    /// Filesystem size in bytes
    #[cfg(feature = "stable")]
    pub fn byte_size(&self) -> Option<u64> {
        self.block_size()?.checked_mul(u64::from(self.hdr.blocks_count))
    }
    /// The volume UUID
    #[cfg(feature = "stable")]
    pub fn uuid(&self) -> [u8; 16] {
        let mut uuid = [0u8; 16];
        uuid.copy_from_slice(&self.raw[UUID_OFFSET..UUID_OFFSET + 16]);
        uuid
    }
    /// The UUID in its usual hyphenated form
    #[cfg(feature = "stable")]
    pub fn uuid_string(&self) -> String {
        let u = self.uuid();
        let hex: Vec<String> = u.iter().map(|b| format!("{:02x}", b)).collect();
        format!(
            "{}-{}-{}-{}-{}",
            hex[0..4].concat(),
            hex[4..6].concat(),
            hex[6..8].concat(),
            hex[8..10].concat(),
            hex[10..16].concat()
        )
    }
    /// The volume label, up to the first NUL
    #[cfg(feature = "stable")]
    pub fn label(&self) -> String {
        let field = &self.raw[LABEL_OFFSET..LABEL_OFFSET + LABEL_LEN];
        let end = field.iter().position(|b| *b == 0).unwrap_or(LABEL_LEN);
        String::from_utf8_lossy(&field[..end]).into_owned()
    }
    /// Sets the volume label, truncating to 16 bytes
    #[cfg(feature = "unstable")]
    pub fn set_label(&mut self, label: &str) {
        let field = &mut self.raw[LABEL_OFFSET..LABEL_OFFSET + LABEL_LEN];
        field.iter_mut().for_each(|b| *b = 0);
        let bytes = label.as_bytes();
        let n = bytes.len().min(LABEL_LEN);
        field[..n].copy_from_slice(&bytes[..n]);
    }
    /// The set of known features enabled on this filesystem
    #[cfg(feature = "stable")]
    pub fn features(&self) -> BTreeSet<Ext2Feature> {
        features::bit2set(
            self.hdr.feature_compat,
            self.hdr.feature_incompat,
            self.hdr.feature_ro_compat,
        )
    }
    /// True for ext3, i.e. the filesystem has a journal
    #[cfg(feature = "stable")]
    pub fn has_journal(&self) -> bool {
        self.features().contains(&Ext2Feature::HasJournal)
    }
}

#[test]
fn header_is_packed() {
    assert_eq!(SuperblockHeader::PACKED_LEN, UUID_OFFSET);
    assert_eq!(std::mem::size_of::<SuperblockHeader>(), UUID_OFFSET);
}

#[test]
#[allow(clippy::unwrap_used)]
fn decode_known_offsets() {
    let mut raw = vec![0u8; SIZE_OF_SUPER];
    raw[4..8].copy_from_slice(&2048u32.to_le_bytes());
    raw[24..28].copy_from_slice(&2u32.to_le_bytes());
    raw[56..58].copy_from_slice(&EXT2_SUPER_MAGIC.to_le_bytes());
    raw[76..80].copy_from_slice(&1u32.to_le_bytes());
    raw[92..96].copy_from_slice(&0x4u32.to_le_bytes());
    raw[LABEL_OFFSET..LABEL_OFFSET + 4].copy_from_slice(b"home");

    let sb = Superblock::from_bytes(&raw).unwrap();
    assert_eq!(sb.blocks_count(), 2048);
    assert_eq!(sb.log_block_size(), 2);
    assert_eq!(sb.block_size(), Some(4096));
    assert_eq!(sb.byte_size(), Some(2048 * 4096));
    assert_eq!(sb.magic(), EXT2_SUPER_MAGIC);
    assert_eq!(sb.label(), "home");
    assert!(sb.has_journal());
    sb.validate().unwrap();
    assert_eq!(sb.to_bytes(), raw);
}

#[test]
fn validation_errors() {
    let mut sb = Superblock::new(64, 0);
    assert!(sb.validate().is_ok());

    sb.header_mut().rev_level = 2;
    assert!(matches!(sb.validate(), Err(Ext2Error::BadRevision(2))));

    sb.header_mut().magic = 0x1234;
    assert!(matches!(sb.validate(), Err(Ext2Error::BadMagic(0x1234))));

    assert!(matches!(
        Superblock::from_bytes(&[0u8; 100]),
        Err(Ext2Error::ShortTransfer { actual: 100, .. })
    ));
}

#[test]
#[allow(clippy::unwrap_used)]
fn disk_roundtrip_and_zero_fill() {
    let d = crate::DiskMem::open(8192);
    let mut sb = Superblock::new(8, 0);
    sb.set_label("scratch");
    sb.write(d.clone()).unwrap();

    let back = Superblock::read(d.clone()).unwrap();
    assert_eq!(back, sb);
    assert_eq!(back.label(), "scratch");

    sb.zero_fill();
    assert!(sb.is_zeroed());
    sb.write(d.clone()).unwrap();
    assert!(matches!(Superblock::read(d), Err(Ext2Error::BadMagic(0))));
}

#[test]
fn uuid_formatting() {
    let mut raw = vec![0u8; SIZE_OF_SUPER];
    for (b, v) in raw[UUID_OFFSET..UUID_OFFSET + 16].iter_mut().zip(0u8..) {
        *b = v;
    }
    let sb = Superblock::from_bytes(&raw).expect("decode");
    assert_eq!(sb.uuid_string(), "00010203-0405-0607-0809-0a0b0c0d0e0f");
}
