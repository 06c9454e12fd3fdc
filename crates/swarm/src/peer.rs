//! A single peer tracked by a [`crate::Swarm`].

use std::net::{IpAddr, SocketAddr};

use torrent_tracker_clock::DurationSinceUnixEpoch;
use torrent_tracker_primitives::PeerId;

/// The lifecycle state of a [`TrackedPeer`] (`spec.md` §3).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeerState {
    Unknown,
    Started,
    Completed,
    Stopped,
}

/// A peer tracked by a swarm, keyed in the swarm's map by
/// [`TrackedPeer::hex_peer_id`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackedPeer {
    pub peer_id: PeerId,
    pub ip: IpAddr,
    pub port: u16,
    pub uploaded: u64,
    pub downloaded: u64,
    pub left: u64,
    pub state: PeerState,
    pub last_announce_at: DurationSinceUnixEpoch,
}

impl TrackedPeer {
    /// The canonical lowercase hex rendering of `peer_id`, used as the map
    /// key (`spec.md` I2: a pure function of `peer_id`).
    #[must_use]
    pub fn hex_peer_id(&self) -> String {
        self.peer_id.to_hex()
    }

    #[must_use]
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.ip, self.port)
    }

    /// A peer is fresh iff its last announce is within `2 *
    /// announce_interval_s` of `now` (`spec.md` I3).
    #[must_use]
    pub fn is_fresh(&self, now: DurationSinceUnixEpoch, announce_interval_s: u32) -> bool {
        let max_age = std::time::Duration::from_secs(2 * u64::from(announce_interval_s));
        now.saturating_sub(self.last_announce_at) < max_age
    }

    #[must_use]
    pub fn is_seeder(&self) -> bool {
        self.state == PeerState::Completed
    }

    /// Same `(ip, port)` as `other`, regardless of peer id. This identifies
    /// a client that reconnected from the same endpoint with a new peer id,
    /// leaving a "zombie" entry for its old id (`spec.md` §4.4, §9).
    #[must_use]
    pub fn same_endpoint(&self, other: &TrackedPeer) -> bool {
        self.ip == other.ip && self.port == other.port
    }

    /// Same endpoint *and* the same peer id: full identity equality.
    #[must_use]
    pub fn same_identity(&self, other: &TrackedPeer) -> bool {
        self.same_endpoint(other) && self.peer_id == other.peer_id
    }
}

#[cfg(test)]
mod tests {
    use std::net::Ipv4Addr;
    use std::time::Duration;

    use super::*;

    fn peer(id: u8, ip: [u8; 4], port: u16, last_announce_at: Duration) -> TrackedPeer {
        TrackedPeer {
            peer_id: PeerId::new([id; 20]),
            ip: IpAddr::V4(Ipv4Addr::from(ip)),
            port,
            uploaded: 0,
            downloaded: 0,
            left: 0,
            state: PeerState::Started,
            last_announce_at,
        }
    }

    #[test]
    fn freshness_is_two_times_the_announce_interval() {
        let p = peer(1, [10, 0, 0, 1], 6881, Duration::from_secs(100));
        assert!(p.is_fresh(Duration::from_secs(119), 10));
        assert!(!p.is_fresh(Duration::from_secs(120), 10));
    }

    #[test]
    fn same_endpoint_ignores_peer_id() {
        let a = peer(1, [10, 0, 0, 1], 6881, Duration::ZERO);
        let b = peer(2, [10, 0, 0, 1], 6881, Duration::ZERO);
        assert!(a.same_endpoint(&b));
        assert!(!a.same_identity(&b));
    }
}
