//! Parses a raw HTTP tracker query string into an [`AnnounceRequest`].
//!
//! `info_hash` and `peer_id` are raw 20-byte strings, not UTF-8 text, so they
//! are percent-decoded directly from the query string rather than through a
//! UTF-8-assuming form decoder (`spec.md` §6).

use std::net::IpAddr;
use std::panic::Location;

use percent_encoding::percent_decode_str;
use torrent_tracker_primitives::{AnnounceEvent, InfoHash, PeerId};

use crate::error::TrackerError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnounceRequest {
    pub info_hash: InfoHash,
    pub peer_id: PeerId,
    pub port: u16,
    pub uploaded: u64,
    pub downloaded: u64,
    pub left: u64,
    pub event: AnnounceEvent,
    pub numwant: Option<u32>,
    pub compact: bool,
    pub ip_override: Option<IpAddr>,
}

/// Splits a raw query string (without the leading `?`) into `(key, value)`
/// pairs with the value percent-decoded.
fn pairs(query: &str) -> impl Iterator<Item = (&str, Vec<u8>)> {
    query.split('&').filter(|pair| !pair.is_empty()).filter_map(|pair| {
        let (key, value) = pair.split_once('=')?;
        Some((key, percent_decode_str(value).collect::<Vec<u8>>()))
    })
}

impl AnnounceRequest {
    /// # Errors
    ///
    /// Returns `TrackerError::InvalidFrame` if `info_hash`, `peer_id`, or
    /// `port` are missing or malformed.
    #[track_caller]
    pub fn parse(query: &str) -> Result<Self, TrackerError> {
        let mut info_hash = None;
        let mut peer_id = None;
        let mut port = None;
        let mut uploaded = 0u64;
        let mut downloaded = 0u64;
        let mut left = 0u64;
        let mut event = AnnounceEvent::None;
        let mut numwant = None;
        let mut compact = false;
        let mut ip_override = None;

        for (key, raw) in pairs(query) {
            match key {
                "info_hash" => info_hash = InfoHash::from_bytes(&raw).ok(),
                "peer_id" => peer_id = PeerId::from_bytes(&raw).ok(),
                "port" => port = std::str::from_utf8(&raw).ok().and_then(|s| s.parse().ok()),
                "uploaded" => uploaded = parse_u64(&raw).unwrap_or(0),
                "downloaded" => downloaded = parse_u64(&raw).unwrap_or(0),
                "left" => left = parse_u64(&raw).unwrap_or(0),
                "event" => event = std::str::from_utf8(&raw).map(AnnounceEvent::from_http_str).unwrap_or(AnnounceEvent::None),
                "numwant" => numwant = std::str::from_utf8(&raw).ok().and_then(|s| s.parse().ok()),
                "compact" => compact = raw == b"1",
                "ip" => ip_override = std::str::from_utf8(&raw).ok().and_then(|s| s.parse().ok()),
                _ => {}
            }
        }

        let (Some(info_hash), Some(peer_id), Some(port)) = (info_hash, peer_id, port) else {
            return Err(TrackerError::InvalidFrame { location: Location::caller() });
        };

        Ok(Self {
            info_hash,
            peer_id,
            port,
            uploaded,
            downloaded,
            left,
            event,
            numwant,
            compact,
            ip_override,
        })
    }
}

fn parse_u64(raw: &[u8]) -> Option<u64> {
    std::str::from_utf8(raw).ok()?.parse().ok()
}

/// A scrape request: zero or more `info_hash` query parameters, each a raw
/// 20-byte, percent-encoded info hash (`spec.md` §4.2 supplement).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrapeRequest {
    pub info_hashes: Vec<InfoHash>,
}

impl ScrapeRequest {
    #[must_use]
    pub fn parse(query: &str) -> Self {
        let info_hashes = pairs(query)
            .filter(|(key, _)| *key == "info_hash")
            .filter_map(|(_, raw)| InfoHash::from_bytes(&raw).ok())
            .collect();

        Self { info_hashes }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_the_required_fields() {
        let info_hash_raw: String = (0..20).map(|_| "%41").collect();
        let peer_id_raw: String = (0..20).map(|_| "%42").collect();
        let query = format!("info_hash={info_hash_raw}&peer_id={peer_id_raw}&port=6881&left=100&event=started&compact=1");

        let request = AnnounceRequest::parse(&query).unwrap();

        assert_eq!(request.info_hash, InfoHash::new([0x41; 20]));
        assert_eq!(request.peer_id, PeerId::new([0x42; 20]));
        assert_eq!(request.port, 6881);
        assert_eq!(request.left, 100);
        assert_eq!(request.event, AnnounceEvent::Started);
        assert!(request.compact);
    }

    #[test]
    fn rejects_a_missing_info_hash() {
        let query = "peer_id=%41&port=6881";
        assert!(AnnounceRequest::parse(query).is_err());
    }

    #[test]
    fn unknown_event_values_default_to_none() {
        let info_hash_raw: String = (0..20).map(|_| "%41").collect();
        let peer_id_raw: String = (0..20).map(|_| "%42").collect();
        let query = format!("info_hash={info_hash_raw}&peer_id={peer_id_raw}&port=6881");

        let request = AnnounceRequest::parse(&query).unwrap();
        assert_eq!(request.event, AnnounceEvent::None);
    }

    #[test]
    fn scrape_request_collects_every_info_hash_query_parameter() {
        let first: String = (0..20).map(|_| "%41").collect();
        let second: String = (0..20).map(|_| "%42").collect();
        let query = format!("info_hash={first}&info_hash={second}");

        let request = ScrapeRequest::parse(&query);

        assert_eq!(request.info_hashes, vec![InfoHash::new([0x41; 20]), InfoHash::new([0x42; 20])]);
    }

    #[test]
    fn scrape_request_with_no_info_hash_is_empty() {
        assert!(ScrapeRequest::parse("").info_hashes.is_empty());
    }
}
