//! Errors returned by swarm and registry operations.

use thiserror::Error;

use torrent_tracker_primitives::InfoHash;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SwarmError {
    /// `COMPLETED`/`NONE` announced for a peer the swarm has never seen a
    /// `STARTED` event for (`spec.md` §4.3 edge cases).
    #[error("peer {hex_peer_id} sent a {event} event without a prior 'started' event")]
    PeerUnknown { hex_peer_id: String, event: &'static str },
}

/// The announce interval is below `MIN_ANNOUNCE_INTERVAL_SECONDS`
/// (`spec.md` I4).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("announce interval must be at least {minimum}s, got {got}s")]
pub struct InvalidInterval {
    pub got: u32,
    pub minimum: u32,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("no swarm is registered for info hash {0}")]
    UnknownTorrent(InfoHash),

    #[error(transparent)]
    InvalidInterval(#[from] InvalidInterval),
}
