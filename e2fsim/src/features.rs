use bitvec::prelude::*;
use std::collections::BTreeSet;
use strum::IntoEnumIterator;
use strum_macros::{EnumIter, IntoStaticStr};

/// The three feature words of the superblock.
#[derive(PartialEq, Eq, PartialOrd, Ord, Hash, Copy, Clone, Debug)]
pub enum FeatureWord {
    /// Safe to ignore if unknown
    Compat,
    /// Must be understood to mount at all
    Incompat,
    /// Must be understood to mount read-write
    RoCompat,
}

#[derive(PartialEq, Eq, PartialOrd, Ord, Copy, Clone, EnumIter, IntoStaticStr, Debug)]
#[strum(serialize_all = "snake_case")]
/// The ext2/ext3 features this module can name
pub enum Ext2Feature {
    /// Directory preallocation
    DirPrealloc,
    /// AFS server inodes
    ImagicInodes,
    /// An ext3 journal is present
    HasJournal,
    /// Extended attributes
    ExtAttr,
    /// Reserved GDT blocks for online growth
    ResizeInode,
    /// Hashed directory index
    DirIndex,
    /// Compression
    Compression,
    /// Directory entries record file type
    Filetype,
    /// The journal needs recovery
    NeedsRecovery,
    /// This is an external journal device
    JournalDev,
    /// Meta block groups
    MetaBg,
    /// Sparse superblock backups
    SparseSuper,
    /// Files larger than 2GiB
    LargeFile,
    /// B-tree sorted directories
    BtreeDir,
}

impl Ext2Feature {
    /// Which superblock word the flag lives in, and at which bit
    pub fn location(self) -> (FeatureWord, usize) {
        match self {
            Ext2Feature::DirPrealloc => (FeatureWord::Compat, 0),
            Ext2Feature::ImagicInodes => (FeatureWord::Compat, 1),
            Ext2Feature::HasJournal => (FeatureWord::Compat, 2),
            Ext2Feature::ExtAttr => (FeatureWord::Compat, 3),
            Ext2Feature::ResizeInode => (FeatureWord::Compat, 4),
            Ext2Feature::DirIndex => (FeatureWord::Compat, 5),
            Ext2Feature::Compression => (FeatureWord::Incompat, 0),
            Ext2Feature::Filetype => (FeatureWord::Incompat, 1),
            Ext2Feature::NeedsRecovery => (FeatureWord::Incompat, 2),
            Ext2Feature::JournalDev => (FeatureWord::Incompat, 3),
            Ext2Feature::MetaBg => (FeatureWord::Incompat, 4),
            Ext2Feature::SparseSuper => (FeatureWord::RoCompat, 0),
            Ext2Feature::LargeFile => (FeatureWord::RoCompat, 1),
            Ext2Feature::BtreeDir => (FeatureWord::RoCompat, 2),
        }
    }
    /// The name e2fsprogs uses for the feature
    pub fn name(self) -> &'static str {
        self.into()
    }
}

fn word_of(word: FeatureWord, compat: u32, incompat: u32, ro_compat: u32) -> u32 {
    match word {
        FeatureWord::Compat => compat,
        FeatureWord::Incompat => incompat,
        FeatureWord::RoCompat => ro_compat,
    }
}

/// Converts the three feature words to a set of known features
pub fn bit2set(compat: u32, incompat: u32, ro_compat: u32) -> BTreeSet<Ext2Feature> {
    let mut res = BTreeSet::new();
    for i in Ext2Feature::iter() {
        let (word, bit) = i.location();
        let value = word_of(word, compat, incompat, ro_compat);
        if value.view_bits::<Lsb0>()[bit] {
            res.insert(i);
        }
    }
    res
}

/// Bit positions set in a feature word that we have no name for
pub fn unknown_bits(word: FeatureWord, value: u32) -> Vec<usize> {
    let known: BTreeSet<usize> = Ext2Feature::iter()
        .map(Ext2Feature::location)
        .filter(|(w, _)| *w == word)
        .map(|(_, bit)| bit)
        .collect();
    value
        .view_bits::<Lsb0>()
        .iter_ones()
        .filter(|bit| !known.contains(bit))
        .collect()
}

#[test]
fn decode_feature_words() {
    let set = bit2set(0x3C, 0x02, 0x03);
    let expected: BTreeSet<Ext2Feature> = vec![
        Ext2Feature::HasJournal,
        Ext2Feature::ExtAttr,
        Ext2Feature::ResizeInode,
        Ext2Feature::DirIndex,
        Ext2Feature::Filetype,
        Ext2Feature::SparseSuper,
        Ext2Feature::LargeFile,
    ]
    .into_iter()
    .collect();
    assert_eq!(set, expected);
    assert!(bit2set(0, 0, 0).is_empty());
}

#[test]
fn unknown_feature_bits() {
    assert_eq!(unknown_bits(FeatureWord::Incompat, 0x40 | 0x02), vec![6]);
    assert!(unknown_bits(FeatureWord::Compat, 0x3F).is_empty());
}

#[test]
fn feature_names() {
    assert_eq!(Ext2Feature::HasJournal.name(), "has_journal");
    assert_eq!(Ext2Feature::NeedsRecovery.name(), "needs_recovery");
}

#[test]
fn feature_bits_do_not_overlap() {
    use itertools::Itertools;
    let locations = Ext2Feature::iter().map(Ext2Feature::location).collect::<Vec<_>>();
    assert_eq!(locations.iter().unique().count(), locations.len());
}
