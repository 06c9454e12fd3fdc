//! Primitive value types shared by the tracker crates: info hashes, peer
//! ids, announce events, swarm metadata, and the `Torrent` descriptor.

pub mod announce_event;
pub mod info_hash;
pub mod peer_id;
pub mod swarm_metadata;
pub mod torrent;

pub use announce_event::AnnounceEvent;
pub use info_hash::InfoHash;
pub use peer_id::PeerId;
pub use swarm_metadata::SwarmMetadata;
pub use torrent::{FileEntry, Torrent};
