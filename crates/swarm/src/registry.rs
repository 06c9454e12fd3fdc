//! The registry: the mapping from info hash to [`Swarm`], and swarm
//! lifecycle (`spec.md` §3 "Lifecycles").

use dashmap::mapref::one::Ref;
use dashmap::DashMap;
use torrent_tracker_primitives::{InfoHash, SwarmMetadata, Torrent};

use crate::error::RegistryError;
use crate::swarm::Swarm;

/// Read-mostly mapping from info hash to swarm. Registration and
/// unregistration are rare and simply replace/remove a map entry; they do
/// not need an exclusive lock over the whole registry because `DashMap`
/// shards locking per key (`spec.md` §5).
#[derive(Debug, Default)]
pub struct Registry {
    swarms: DashMap<InfoHash, Swarm>,
}

impl Registry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a torrent, creating its (initially peerless) swarm. A
    /// swarm is never created implicitly by an announce for an unknown
    /// info hash (`spec.md` §3 "Lifecycles").
    pub fn register(&self, torrent: Torrent) {
        self.swarms.insert(torrent.info_hash, Swarm::new(torrent));
    }

    /// Unregisters a torrent, dropping its swarm and every peer in it.
    pub fn unregister(&self, info_hash: &InfoHash) {
        self.swarms.remove(info_hash);
    }

    #[must_use]
    pub fn get(&self, info_hash: &InfoHash) -> Option<Ref<'_, InfoHash, Swarm>> {
        self.swarms.get(info_hash)
    }

    #[must_use]
    pub fn contains(&self, info_hash: &InfoHash) -> bool {
        self.swarms.contains_key(info_hash)
    }

    /// # Errors
    ///
    /// Returns `RegistryError::UnknownTorrent` if no swarm is registered
    /// for `info_hash` (an announce never implicitly creates one).
    pub fn get_or_unknown(&self, info_hash: &InfoHash) -> Result<Ref<'_, InfoHash, Swarm>, RegistryError> {
        self.get(info_hash).ok_or(RegistryError::UnknownTorrent(*info_hash))
    }

    /// Reports scrape statistics for each requested info hash, in order. A
    /// torrent this registry has never seen reports zeroed statistics
    /// rather than an error, per BEP-48 (`spec.md` §4.2 supplement).
    #[must_use]
    pub fn scrape(&self, info_hashes: &[InfoHash]) -> Vec<(InfoHash, SwarmMetadata)> {
        info_hashes
            .iter()
            .map(|info_hash| {
                let metadata = self.get(info_hash).map_or_else(SwarmMetadata::zeroed, |swarm| swarm.metadata());
                (*info_hash, metadata)
            })
            .collect()
    }

    /// Sweeps every registered swarm for stale peers. Called by the
    /// periodic collector (`spec.md` §4.5).
    pub fn collect_unfresh(&self) {
        for swarm in &self.swarms {
            swarm.value().collect_unfresh();
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.swarms.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.swarms.is_empty()
    }
}
