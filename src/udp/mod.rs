//! The BEP-15 UDP tracker wire codec: packed big-endian binary frames
//! (`spec.md` §4.2).

mod announce;
mod connect;
mod error_frame;
mod scrape;

pub use announce::{AnnounceRequest, AnnounceResponse};
pub use connect::{ConnectRequest, ConnectResponse, PROTOCOL_MAGIC};
pub use error_frame::ErrorResponse;
pub use scrape::{ScrapeRequest, ScrapeResponse};

/// `Connect` action id.
pub const ACTION_CONNECT: i32 = 0;
/// `Announce` action id.
pub const ACTION_ANNOUNCE: i32 = 1;
/// `Scrape` action id.
pub const ACTION_SCRAPE: i32 = 2;
/// `Error` action id.
pub const ACTION_ERROR: i32 = 3;

/// One packed IPv4 peer tuple: 4-byte address, 2-byte big-endian port.
pub const PEER_TUPLE_LEN: usize = 6;
