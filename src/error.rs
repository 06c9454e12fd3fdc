//! Error returned by the core tracker.
//!
//! Codec and registry errors are reported back to the caller as a
//! `TrackerError` response (HTTP or UDP) rather than propagated as a Rust
//! panic — one bad request must never take down the server (`spec.md` §7).

use std::panic::Location;

use torrent_tracker_bencode::MalformedBencode;
use torrent_tracker_primitives::InfoHash;
use torrent_tracker_swarm::{InvalidInterval, RegistryError, SwarmError};

#[derive(thiserror::Error, Debug, Clone)]
pub enum TrackerError {
    #[error("malformed bencode: {0}")]
    MalformedBencode(#[from] MalformedBencode),

    #[error("invalid request frame, {location}")]
    InvalidFrame { location: &'static Location<'static> },

    #[error("torrent {info_hash} is not tracked here")]
    UnknownTorrent { info_hash: InfoHash },

    #[error("missing 'started' event")]
    PeerUnknown,

    #[error(transparent)]
    InvalidInterval(#[from] InvalidInterval),

    #[error("IPv6 peers are not supported over the UDP transport")]
    UnsupportedAddressFamily,

    #[error("internal error")]
    Internal,
}

impl From<RegistryError> for TrackerError {
    fn from(err: RegistryError) -> Self {
        match err {
            RegistryError::UnknownTorrent(info_hash) => TrackerError::UnknownTorrent { info_hash },
            RegistryError::InvalidInterval(e) => TrackerError::InvalidInterval(e),
        }
    }
}

impl From<SwarmError> for TrackerError {
    fn from(err: SwarmError) -> Self {
        match err {
            SwarmError::PeerUnknown { .. } => TrackerError::PeerUnknown,
        }
    }
}

impl TrackerError {
    /// The human-readable `failure reason` reported in a `TrackerError`
    /// response (`spec.md` §7).
    #[must_use]
    pub fn failure_reason(&self) -> String {
        self.to_string()
    }
}
