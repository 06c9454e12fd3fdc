//! The swarm registry: per-torrent peer tracking, freshness, and sampling.
//!
//! A [`Swarm`] owns the concurrent peer map for one torrent and is the only
//! place the invariants in `spec.md` §3 are enforced — callers never touch
//! the map directly. A [`Registry`] owns one [`Swarm`] per info hash.

mod error;
mod peer;
mod registry;
#[allow(clippy::module_inception)]
mod swarm;

pub use error::{InvalidInterval, RegistryError, SwarmError};
pub use peer::{PeerState, TrackedPeer};
pub use registry::Registry;
pub use swarm::{Swarm, DEFAULT_ANNOUNCE_INTERVAL_SECONDS, DEFAULT_ANSWER_PEERS, MIN_ANNOUNCE_INTERVAL_SECONDS};
