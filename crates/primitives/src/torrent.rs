//! The `Torrent` descriptor consumed by the core. It is produced by an
//! external collaborator (the `.torrent` meta-info parser), not by this
//! crate — see `spec.md` §6.

use crate::info_hash::InfoHash;

/// A single file within a (possibly multi-file) torrent.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FileEntry {
    pub path: String,
    pub length: u64,
}

/// An immutable, externally-produced torrent descriptor.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Torrent {
    pub info_hash: InfoHash,
    pub piece_length: u32,
    pub piece_hashes: Vec<[u8; 20]>,
    pub files: Vec<FileEntry>,
}

impl Torrent {
    #[must_use]
    pub fn total_length(&self) -> u64 {
        self.files.iter().map(|f| f.length).sum()
    }

    #[must_use]
    pub fn piece_count(&self) -> usize {
        self.piece_hashes.len()
    }
}
