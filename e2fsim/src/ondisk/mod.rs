pub use self::superblock::{Superblock, SuperblockHeader};

mod superblock;
