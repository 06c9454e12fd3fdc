//! Swarm statistics for one torrent, as reported in announce and scrape
//! responses.
//!
//! See [BEP 48: Tracker Protocol Extension: Scrape](https://www.bittorrent.org/beps/bep_0048.html).

#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub struct SwarmMetadata {
    /// The number of peers that have ever completed downloading.
    pub downloaded: u32,
    /// The number of active peers that have completed downloading (seeders).
    pub complete: u32,
    /// The number of active peers that have not completed downloading (leechers).
    pub incomplete: u32,
}

impl SwarmMetadata {
    #[must_use]
    pub fn zeroed() -> Self {
        Self::default()
    }
}
