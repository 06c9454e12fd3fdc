//! Announce events. Described in
//! [BEP 3: The `BitTorrent` Protocol Specification](https://www.bittorrent.org/beps/bep_0003.html).

use serde::{Deserialize, Serialize};

#[derive(Hash, Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
pub enum AnnounceEvent {
    /// The peer has started downloading the torrent.
    Started,
    /// The peer has ceased downloading the torrent.
    Stopped,
    /// The peer has completed downloading the torrent.
    Completed,
    /// A regular-interval announce; no event changed.
    None,
}

impl AnnounceEvent {
    /// Maps a UDP wire event value to an `AnnounceEvent`, per BEP-15's
    /// `0=none, 1=completed, 2=started, 3=stopped`.
    #[must_use]
    pub fn from_i32(i: i32) -> Self {
        match i {
            1 => Self::Completed,
            2 => Self::Started,
            3 => Self::Stopped,
            _ => Self::None,
        }
    }

    #[must_use]
    pub fn to_i32(self) -> i32 {
        match self {
            AnnounceEvent::None => 0,
            AnnounceEvent::Completed => 1,
            AnnounceEvent::Started => 2,
            AnnounceEvent::Stopped => 3,
        }
    }

    /// Maps the HTTP `event` query parameter value to an `AnnounceEvent`.
    /// An absent or unrecognized parameter means `None`, per BEP-3.
    #[must_use]
    pub fn from_http_str(s: &str) -> Self {
        match s {
            "started" => Self::Started,
            "stopped" => Self::Stopped,
            "completed" => Self::Completed,
            _ => Self::None,
        }
    }
}

impl std::fmt::Display for AnnounceEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            AnnounceEvent::Started => "started",
            AnnounceEvent::Stopped => "stopped",
            AnnounceEvent::Completed => "completed",
            AnnounceEvent::None => "",
        };
        write!(f, "{s}")
    }
}
