//! The `Announce` request/response pair (`spec.md` §4.2).
//!
//! The response field order is **incomplete before complete**, inverting the
//! intuitive seeder-first order; this is BEP-15 and must be preserved
//! exactly (`spec.md` §9).

use std::net::Ipv4Addr;
use std::panic::Location;

use torrent_tracker_primitives::{AnnounceEvent, InfoHash, PeerId};

use crate::error::TrackerError;
use crate::udp::{ACTION_ANNOUNCE, PEER_TUPLE_LEN};

const ANNOUNCE_REQUEST_LEN: usize = 98;
const ANNOUNCE_RESPONSE_HEADER_LEN: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnnounceRequest {
    pub connection_id: i64,
    pub transaction_id: i32,
    pub info_hash: InfoHash,
    pub peer_id: PeerId,
    pub downloaded: i64,
    pub left: i64,
    pub uploaded: i64,
    pub event: AnnounceEvent,
    /// `0` means "use the packet's source address" (`spec.md` §4.2).
    pub ip: i32,
    pub key: i32,
    /// `-1` means "use the tracker's default" (`spec.md` §4.2).
    pub numwant: i32,
    pub port: u16,
}

impl AnnounceRequest {
    /// # Errors
    ///
    /// Returns `TrackerError::InvalidFrame` if `bytes` is not exactly 98
    /// bytes or declares an action other than `ACTION_ANNOUNCE`.
    #[track_caller]
    pub fn decode(bytes: &[u8]) -> Result<Self, TrackerError> {
        if bytes.len() != ANNOUNCE_REQUEST_LEN {
            return Err(TrackerError::InvalidFrame { location: Location::caller() });
        }

        let connection_id = i64::from_be_bytes(bytes[0..8].try_into().unwrap());
        let action = i32::from_be_bytes(bytes[8..12].try_into().unwrap());
        if action != ACTION_ANNOUNCE {
            return Err(TrackerError::InvalidFrame { location: Location::caller() });
        }
        let transaction_id = i32::from_be_bytes(bytes[12..16].try_into().unwrap());
        let info_hash = InfoHash::from_bytes(&bytes[16..36]).map_err(|_| TrackerError::InvalidFrame { location: Location::caller() })?;
        let peer_id = PeerId::from_bytes(&bytes[36..56]).map_err(|_| TrackerError::InvalidFrame { location: Location::caller() })?;
        let downloaded = i64::from_be_bytes(bytes[56..64].try_into().unwrap());
        let left = i64::from_be_bytes(bytes[64..72].try_into().unwrap());
        let uploaded = i64::from_be_bytes(bytes[72..80].try_into().unwrap());
        let event = AnnounceEvent::from_i32(i32::from_be_bytes(bytes[80..84].try_into().unwrap()));
        let ip = i32::from_be_bytes(bytes[84..88].try_into().unwrap());
        let key = i32::from_be_bytes(bytes[88..92].try_into().unwrap());
        let numwant = i32::from_be_bytes(bytes[92..96].try_into().unwrap());
        let port = u16::from_be_bytes(bytes[96..98].try_into().unwrap());

        Ok(Self {
            connection_id,
            transaction_id,
            info_hash,
            peer_id,
            downloaded,
            left,
            uploaded,
            event,
            ip,
            key,
            numwant,
            port,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnounceResponse {
    pub transaction_id: i32,
    pub interval: i32,
    pub incomplete: i32,
    pub complete: i32,
    /// IPv4-only (`spec.md` §9 open question, resolved as reject/skip for
    /// IPv6); each entry packs to 6 bytes (address + big-endian port).
    pub peers: Vec<(Ipv4Addr, u16)>,
}

impl AnnounceResponse {
    #[must_use]
    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(ANNOUNCE_RESPONSE_HEADER_LEN + self.peers.len() * PEER_TUPLE_LEN);
        out.extend_from_slice(&ACTION_ANNOUNCE.to_be_bytes());
        out.extend_from_slice(&self.transaction_id.to_be_bytes());
        out.extend_from_slice(&self.interval.to_be_bytes());
        out.extend_from_slice(&self.incomplete.to_be_bytes());
        out.extend_from_slice(&self.complete.to_be_bytes());
        for (ip, port) in &self.peers {
            out.extend_from_slice(&ip.octets());
            out.extend_from_slice(&port.to_be_bytes());
        }
        out
    }

    /// # Errors
    ///
    /// Returns `TrackerError::InvalidFrame` if `bytes` is shorter than the
    /// 20-byte header, declares an action other than `ACTION_ANNOUNCE`, or
    /// its trailing length is not a multiple of `PEER_TUPLE_LEN` (P3).
    #[track_caller]
    pub fn decode(bytes: &[u8]) -> Result<Self, TrackerError> {
        if bytes.len() < ANNOUNCE_RESPONSE_HEADER_LEN || (bytes.len() - ANNOUNCE_RESPONSE_HEADER_LEN) % PEER_TUPLE_LEN != 0 {
            return Err(TrackerError::InvalidFrame { location: Location::caller() });
        }

        let action = i32::from_be_bytes(bytes[0..4].try_into().unwrap());
        if action != ACTION_ANNOUNCE {
            return Err(TrackerError::InvalidFrame { location: Location::caller() });
        }
        let transaction_id = i32::from_be_bytes(bytes[4..8].try_into().unwrap());
        let interval = i32::from_be_bytes(bytes[8..12].try_into().unwrap());
        let incomplete = i32::from_be_bytes(bytes[12..16].try_into().unwrap());
        let complete = i32::from_be_bytes(bytes[16..20].try_into().unwrap());

        let peers = bytes[ANNOUNCE_RESPONSE_HEADER_LEN..]
            .chunks_exact(PEER_TUPLE_LEN)
            .map(|tuple| {
                let ip = Ipv4Addr::new(tuple[0], tuple[1], tuple[2], tuple[3]);
                let port = u16::from_be_bytes([tuple[4], tuple[5]]);
                (ip, port)
            })
            .collect();

        Ok(Self {
            transaction_id,
            interval,
            incomplete,
            complete,
            peers,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn announce_response_puts_incomplete_before_complete() {
        let response = AnnounceResponse {
            transaction_id: 0x1122_3344,
            interval: 1800,
            complete: 5,
            incomplete: 3,
            peers: vec![(Ipv4Addr::new(192, 0, 2, 1), 6881), (Ipv4Addr::new(192, 0, 2, 2), 6882)],
        };

        let bytes = response.encode();

        assert_eq!(bytes.len(), 32);
        assert_eq!(&bytes[0..4], &1i32.to_be_bytes());
        assert_eq!(&bytes[12..16], &3i32.to_be_bytes());
        assert_eq!(&bytes[16..20], &5i32.to_be_bytes());
    }

    #[test]
    fn announce_response_round_trips() {
        let response = AnnounceResponse {
            transaction_id: 0x1122_3344,
            interval: 1800,
            complete: 5,
            incomplete: 3,
            peers: vec![(Ipv4Addr::new(192, 0, 2, 1), 6881), (Ipv4Addr::new(192, 0, 2, 2), 6882)],
        };

        let bytes = response.encode();
        let decoded = AnnounceResponse::decode(&bytes).unwrap();

        assert_eq!(decoded, response);
    }

    #[test]
    fn rejects_a_length_that_fails_the_modular_check() {
        let mut bytes = vec![0u8; ANNOUNCE_RESPONSE_HEADER_LEN + 3];
        bytes[0..4].copy_from_slice(&ACTION_ANNOUNCE.to_be_bytes());
        assert!(AnnounceResponse::decode(&bytes).is_err());
    }

    #[test]
    fn decodes_a_well_formed_announce_request() {
        let mut bytes = Vec::with_capacity(98);
        bytes.extend_from_slice(&1i64.to_be_bytes());
        bytes.extend_from_slice(&ACTION_ANNOUNCE.to_be_bytes());
        bytes.extend_from_slice(&7i32.to_be_bytes());
        bytes.extend_from_slice(&[0xAA; 20]);
        bytes.extend_from_slice(&[0xBB; 20]);
        bytes.extend_from_slice(&0i64.to_be_bytes());
        bytes.extend_from_slice(&1_048_576i64.to_be_bytes());
        bytes.extend_from_slice(&0i64.to_be_bytes());
        bytes.extend_from_slice(&2i32.to_be_bytes());
        bytes.extend_from_slice(&0i32.to_be_bytes());
        bytes.extend_from_slice(&0i32.to_be_bytes());
        bytes.extend_from_slice(&(-1i32).to_be_bytes());
        bytes.extend_from_slice(&6881u16.to_be_bytes());

        let request = AnnounceRequest::decode(&bytes).unwrap();
        assert_eq!(request.event, AnnounceEvent::Started);
        assert_eq!(request.port, 6881);
        assert_eq!(request.left, 1_048_576);
    }

    #[test]
    fn rejects_a_truncated_announce_request() {
        assert!(AnnounceRequest::decode(&[0; 10]).is_err());
    }
}
