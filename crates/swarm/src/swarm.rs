//! Per-torrent swarm state: the peer map and the operations that mutate it.

use std::net::IpAddr;
use std::sync::atomic::{AtomicU32, Ordering};

use dashmap::DashMap;
use rand::seq::SliceRandom;
use torrent_tracker_clock::{CurrentClock, DurationSinceUnixEpoch, Time};
use torrent_tracker_primitives::{AnnounceEvent, PeerId, SwarmMetadata, Torrent};

use crate::error::{InvalidInterval, SwarmError};
use crate::peer::{PeerState, TrackedPeer};

/// The default number of peers returned per announce (`spec.md` §3).
pub const DEFAULT_ANSWER_PEERS: u32 = 30;

/// The default announce interval advertised to peers, in seconds.
pub const DEFAULT_ANNOUNCE_INTERVAL_SECONDS: u32 = 10;

/// The floor below which an announce interval is rejected (`spec.md` I4).
pub const MIN_ANNOUNCE_INTERVAL_SECONDS: u32 = 5;

/// The swarm: every peer currently announcing on one torrent.
///
/// `peers` is a `DashMap` keyed by the peer's hex id (`TrackedPeer::hex_peer_id`):
/// concurrent `get`/`insert`/`remove` are per-key atomic, and no cross-key
/// transaction is required (`spec.md` §5).
#[derive(Debug)]
pub struct Swarm {
    pub torrent: Torrent,
    peers: DashMap<String, TrackedPeer>,
    answer_peers: u32,
    announce_interval_s: u32,
    downloaded: AtomicU32,
}

impl Swarm {
    #[must_use]
    pub fn new(torrent: Torrent) -> Self {
        Self {
            torrent,
            peers: DashMap::new(),
            answer_peers: DEFAULT_ANSWER_PEERS,
            announce_interval_s: DEFAULT_ANNOUNCE_INTERVAL_SECONDS,
            downloaded: AtomicU32::new(0),
        }
    }

    #[must_use]
    pub fn answer_peers(&self) -> u32 {
        self.answer_peers
    }

    #[must_use]
    pub fn announce_interval_s(&self) -> u32 {
        self.announce_interval_s
    }

    pub fn set_answer_peers(&mut self, answer_peers: u32) {
        self.answer_peers = answer_peers;
    }

    /// Sets the announce interval.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInterval` if `interval_s` is below
    /// `MIN_ANNOUNCE_INTERVAL_SECONDS` (`spec.md` I4).
    pub fn set_announce_interval(&mut self, interval_s: u32) -> Result<(), InvalidInterval> {
        if interval_s < MIN_ANNOUNCE_INTERVAL_SECONDS {
            return Err(InvalidInterval {
                got: interval_s,
                minimum: MIN_ANNOUNCE_INTERVAL_SECONDS,
            });
        }
        self.announce_interval_s = interval_s;
        Ok(())
    }

    #[must_use]
    pub fn peer_count(&self) -> usize {
        self.peers.len()
    }

    #[must_use]
    pub fn seeders_and_leechers(&self) -> (usize, usize) {
        let seeders = self.peers.iter().filter(|entry| entry.value().is_seeder()).count();
        (seeders, self.peers.len() - seeders)
    }

    /// The swarm's scrape statistics: live seeder/leecher counts plus the
    /// cumulative count of peers that have ever completed downloading
    /// (`spec.md` §4.2 supplement, BEP-48).
    #[must_use]
    pub fn metadata(&self) -> SwarmMetadata {
        let (seeders, leechers) = self.seeders_and_leechers();
        SwarmMetadata {
            downloaded: self.downloaded.load(Ordering::Relaxed),
            complete: u32::try_from(seeders).unwrap_or(u32::MAX),
            incomplete: u32::try_from(leechers).unwrap_or(u32::MAX),
        }
    }

    /// Applies an announce event to the swarm, following the transition
    /// table in `spec.md` §4.3.
    ///
    /// # Errors
    ///
    /// Returns `SwarmError::PeerUnknown` if `event` is `Completed` or `None`
    /// for a peer the swarm has not seen a prior `Started` event for.
    #[allow(clippy::too_many_arguments)]
    pub fn update(
        &self,
        event: AnnounceEvent,
        peer_id: PeerId,
        ip: IpAddr,
        port: u16,
        uploaded: u64,
        downloaded: u64,
        left: u64,
    ) -> Result<TrackedPeer, SwarmError> {
        let hex_peer_id = peer_id.to_hex();
        let now = CurrentClock::now();

        match event {
            AnnounceEvent::Started => {
                let peer = TrackedPeer {
                    peer_id,
                    ip,
                    port,
                    uploaded,
                    downloaded,
                    left,
                    state: PeerState::Started,
                    last_announce_at: now,
                };
                self.peers.insert(hex_peer_id, peer.clone());
                Ok(peer)
            }
            AnnounceEvent::Stopped => {
                // I1: a STOPPED peer is not present in `peers`.
                match self.peers.remove(&hex_peer_id) {
                    Some((_, mut peer)) => {
                        peer.uploaded = uploaded;
                        peer.downloaded = downloaded;
                        peer.left = left;
                        peer.state = PeerState::Stopped;
                        peer.last_announce_at = now;
                        Ok(peer)
                    }
                    // Stopping an unknown peer is not an error: the caller
                    // gets a synthetic reply built from the request, and
                    // nothing is inserted (`spec.md` §4.3 edge cases).
                    None => Ok(TrackedPeer {
                        peer_id,
                        ip,
                        port,
                        uploaded,
                        downloaded,
                        left,
                        state: PeerState::Stopped,
                        last_announce_at: now,
                    }),
                }
            }
            AnnounceEvent::Completed => self.refresh(&hex_peer_id, ip, port, uploaded, downloaded, left, PeerState::Completed, now, "completed"),
            AnnounceEvent::None => self.refresh(&hex_peer_id, ip, port, uploaded, downloaded, left, PeerState::Started, now, "none"),
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn refresh(
        &self,
        hex_peer_id: &str,
        ip: IpAddr,
        port: u16,
        uploaded: u64,
        downloaded: u64,
        left: u64,
        state: PeerState,
        now: DurationSinceUnixEpoch,
        event_name: &'static str,
    ) -> Result<TrackedPeer, SwarmError> {
        let Some(mut entry) = self.peers.get_mut(hex_peer_id) else {
            return Err(SwarmError::PeerUnknown {
                hex_peer_id: hex_peer_id.to_owned(),
                event: event_name,
            });
        };
        // A peer only counts toward the cumulative download count once, the
        // first time it reports completion.
        if state == PeerState::Completed && entry.state != PeerState::Completed {
            self.downloaded.fetch_add(1, Ordering::Relaxed);
        }
        entry.ip = ip;
        entry.port = port;
        entry.uploaded = uploaded;
        entry.downloaded = downloaded;
        entry.left = left;
        entry.state = state;
        entry.last_announce_at = now;
        Ok(entry.clone())
    }

    /// Produces at most `answer_peers` distinct fresh peers for an announce
    /// response, excluding `requester`, per the algorithm in `spec.md`
    /// §4.4.
    ///
    /// Stale peers and endpoint-duplicate "zombies" encountered along the
    /// way are evicted from the swarm as a side effect.
    #[must_use]
    pub fn get_some_peers(&self, requester: &TrackedPeer) -> Vec<TrackedPeer> {
        let now = CurrentClock::now();
        let interval = self.announce_interval_s;

        let mut candidates: Vec<TrackedPeer> = self.peers.iter().map(|entry| entry.value().clone()).collect();
        candidates.shuffle(&mut rand::thread_rng());

        let mut result = Vec::with_capacity(self.answer_peers as usize);

        for candidate in candidates {
            if result.len() >= self.answer_peers as usize {
                break;
            }

            if !candidate.is_fresh(now, interval) {
                self.peers.remove(&candidate.hex_peer_id());
                continue;
            }

            if candidate.same_endpoint(requester) && !candidate.same_identity(requester) {
                // A ghost left behind by a client that reconnected from the
                // same endpoint under a new peer id.
                self.peers.remove(&candidate.hex_peer_id());
                continue;
            }

            if requester.same_endpoint(&candidate) {
                continue;
            }

            result.push(candidate);
        }

        result
    }

    /// Removes every peer that is no longer fresh. The collector's only
    /// source of bulk eviction (`spec.md` §4.5).
    pub fn collect_unfresh(&self) {
        let now = CurrentClock::now();
        let interval = self.announce_interval_s;
        self.peers.retain(|_, peer| peer.is_fresh(now, interval));
    }
}

#[cfg(test)]
mod tests {
    use std::net::Ipv4Addr;
    use std::time::Duration;

    use torrent_tracker_clock::Stopped;
    use torrent_tracker_primitives::{FileEntry, InfoHash};

    use super::*;

    fn torrent() -> Torrent {
        Torrent {
            info_hash: InfoHash::new([1; 20]),
            piece_length: 16384,
            piece_hashes: vec![],
            files: vec![FileEntry {
                path: "a".into(),
                length: 1_048_576,
            }],
        }
    }

    fn ip(a: u8, b: u8, c: u8, d: u8) -> IpAddr {
        IpAddr::V4(Ipv4Addr::new(a, b, c, d))
    }

    #[test]
    fn new_peer_started() {
        Stopped::reset();
        let swarm = Swarm::new(torrent());
        let peer = swarm
            .update(AnnounceEvent::Started, PeerId::new([0xAA; 20]), ip(10, 0, 0, 1), 6881, 0, 0, 1_048_576)
            .unwrap();

        assert_eq!(swarm.peer_count(), 1);
        assert_eq!(peer.state, PeerState::Started);
        let (seeders, leechers) = swarm.seeders_and_leechers();
        assert_eq!((seeders, leechers), (0, 1));
    }

    #[test]
    fn completion_transitions_seeder_count() {
        Stopped::reset();
        let swarm = Swarm::new(torrent());
        let id = PeerId::new([0xAA; 20]);
        swarm.update(AnnounceEvent::Started, id, ip(10, 0, 0, 1), 6881, 0, 0, 1_048_576).unwrap();

        swarm.update(AnnounceEvent::Completed, id, ip(10, 0, 0, 1), 6881, 0, 1_048_576, 0).unwrap();

        assert_eq!(swarm.peer_count(), 1);
        assert_eq!(swarm.seeders_and_leechers(), (1, 0));
    }

    #[test]
    fn metadata_counts_each_peer_completion_once() {
        Stopped::reset();
        let swarm = Swarm::new(torrent());
        let id = PeerId::new([0xAA; 20]);
        swarm.update(AnnounceEvent::Started, id, ip(10, 0, 0, 1), 6881, 0, 0, 1_048_576).unwrap();

        swarm.update(AnnounceEvent::Completed, id, ip(10, 0, 0, 1), 6881, 0, 1_048_576, 0).unwrap();
        swarm.update(AnnounceEvent::Completed, id, ip(10, 0, 0, 1), 6881, 0, 1_048_576, 0).unwrap();

        let metadata = swarm.metadata();
        assert_eq!(metadata.downloaded, 1);
        assert_eq!(metadata.complete, 1);
        assert_eq!(metadata.incomplete, 0);
    }

    #[test]
    fn stop_removes_the_peer() {
        Stopped::reset();
        let swarm = Swarm::new(torrent());
        let id = PeerId::new([0xAA; 20]);
        swarm.update(AnnounceEvent::Started, id, ip(10, 0, 0, 1), 6881, 0, 0, 1_048_576).unwrap();
        swarm.update(AnnounceEvent::Completed, id, ip(10, 0, 0, 1), 6881, 0, 1_048_576, 0).unwrap();

        swarm.update(AnnounceEvent::Stopped, id, ip(10, 0, 0, 1), 6881, 0, 1_048_576, 0).unwrap();

        assert_eq!(swarm.peer_count(), 0);
        assert_eq!(swarm.seeders_and_leechers(), (0, 0));
    }

    #[test]
    fn stop_on_unknown_peer_is_a_no_op_on_the_map() {
        Stopped::reset();
        let swarm = Swarm::new(torrent());
        let id = PeerId::new([0xBB; 20]);
        let reply = swarm.update(AnnounceEvent::Stopped, id, ip(10, 0, 0, 2), 6881, 1, 2, 3).unwrap();

        assert_eq!(swarm.peer_count(), 0);
        assert_eq!(reply.state, PeerState::Stopped);
        assert_eq!(reply.uploaded, 1);
    }

    #[test]
    fn completed_on_unknown_peer_fails() {
        Stopped::reset();
        let swarm = Swarm::new(torrent());
        let id = PeerId::new([0xCC; 20]);
        let err = swarm
            .update(AnnounceEvent::Completed, id, ip(10, 0, 0, 3), 6881, 0, 0, 0)
            .unwrap_err();
        assert!(matches!(err, SwarmError::PeerUnknown { .. }));
    }

    #[test]
    fn self_exclusion() {
        Stopped::reset();
        let swarm = Swarm::new(torrent());
        let a_id = PeerId::new([0xAA; 20]);
        let b_id = PeerId::new([0xBB; 20]);
        let a = swarm.update(AnnounceEvent::Started, a_id, ip(10, 0, 0, 1), 6881, 0, 0, 1).unwrap();
        swarm.update(AnnounceEvent::Started, b_id, ip(10, 0, 0, 2), 6881, 0, 0, 1).unwrap();

        let peers = swarm.get_some_peers(&a);

        assert_eq!(peers.len(), 1);
        assert_eq!(peers[0].peer_id, b_id);
    }

    #[test]
    fn zombie_eviction_on_sample() {
        Stopped::reset();
        let swarm = Swarm::new(torrent());
        let a1 = PeerId::new([0xAA; 20]);
        let a2 = PeerId::new([0xCC; 20]);
        let a1_peer = swarm.update(AnnounceEvent::Started, a1, ip(10, 0, 0, 1), 6881, 0, 0, 1).unwrap();
        swarm.update(AnnounceEvent::Started, a2, ip(10, 0, 0, 1), 6881, 0, 0, 1).unwrap();

        assert_eq!(swarm.peer_count(), 2);

        let peers = swarm.get_some_peers(&a1_peer);

        assert!(peers.is_empty());
        assert_eq!(swarm.peer_count(), 1);
    }

    #[test]
    fn sample_cap_is_strict() {
        Stopped::reset();
        let mut swarm = Swarm::new(torrent());
        swarm.set_answer_peers(2);
        let requester = swarm
            .update(AnnounceEvent::Started, PeerId::new([0; 20]), ip(10, 0, 0, 1), 1, 0, 0, 0)
            .unwrap();
        for i in 1..=5u8 {
            swarm
                .update(AnnounceEvent::Started, PeerId::new([i; 20]), ip(10, 0, 0, i), 1, 0, 0, 0)
                .unwrap();
        }

        let peers = swarm.get_some_peers(&requester);
        assert!(peers.len() <= 2);
        assert!(!peers.iter().any(|p| p.peer_id == requester.peer_id));
    }

    #[test]
    fn collect_unfresh_evicts_stale_peers() {
        Stopped::reset();
        let swarm = Swarm::new(torrent());
        swarm.update(AnnounceEvent::Started, PeerId::new([1; 20]), ip(10, 0, 0, 1), 1, 0, 0, 0).unwrap();

        Stopped::advance(Duration::from_secs(21));
        swarm.collect_unfresh();

        assert_eq!(swarm.peer_count(), 0);
    }

    #[test]
    fn interval_validation() {
        Stopped::reset();
        let mut swarm = Swarm::new(torrent());
        assert!(swarm.set_announce_interval(0).is_err());
        assert!(swarm.set_announce_interval(5).is_ok());
        assert_eq!(swarm.announce_interval_s(), 5);
    }
}
