//! The BEP-15 `Scrape` request/response pair: a multi-info-hash statistics
//! query, the UDP counterpart to the HTTP scrape supplement (`spec.md` §4.2
//! supplement).

use std::panic::Location;

use torrent_tracker_primitives::{InfoHash, SwarmMetadata};

use crate::error::TrackerError;
use crate::udp::ACTION_SCRAPE;

const SCRAPE_REQUEST_HEADER_LEN: usize = 16;
const INFO_HASH_LEN: usize = 20;
const SCRAPE_RESPONSE_HEADER_LEN: usize = 8;
const SCRAPE_STATS_LEN: usize = 12;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrapeRequest {
    pub connection_id: i64,
    pub transaction_id: i32,
    pub info_hashes: Vec<InfoHash>,
}

impl ScrapeRequest {
    /// # Errors
    ///
    /// Returns `TrackerError::InvalidFrame` if `bytes` is shorter than the
    /// 16-byte header, declares an action other than `ACTION_SCRAPE`, or its
    /// trailing length is not a multiple of 20 bytes.
    #[track_caller]
    pub fn decode(bytes: &[u8]) -> Result<Self, TrackerError> {
        if bytes.len() < SCRAPE_REQUEST_HEADER_LEN || (bytes.len() - SCRAPE_REQUEST_HEADER_LEN) % INFO_HASH_LEN != 0 {
            return Err(TrackerError::InvalidFrame { location: Location::caller() });
        }

        let connection_id = i64::from_be_bytes(bytes[0..8].try_into().unwrap());
        let action = i32::from_be_bytes(bytes[8..12].try_into().unwrap());
        if action != ACTION_SCRAPE {
            return Err(TrackerError::InvalidFrame { location: Location::caller() });
        }
        let transaction_id = i32::from_be_bytes(bytes[12..16].try_into().unwrap());

        let info_hashes = bytes[SCRAPE_REQUEST_HEADER_LEN..]
            .chunks_exact(INFO_HASH_LEN)
            .map(|chunk| InfoHash::from_bytes(chunk).map_err(|_| TrackerError::InvalidFrame { location: Location::caller() }))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            connection_id,
            transaction_id,
            info_hashes,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrapeResponse {
    pub transaction_id: i32,
    /// One entry per requested info hash, in request order.
    pub torrents: Vec<SwarmMetadata>,
}

impl ScrapeResponse {
    #[must_use]
    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(SCRAPE_RESPONSE_HEADER_LEN + self.torrents.len() * SCRAPE_STATS_LEN);
        out.extend_from_slice(&ACTION_SCRAPE.to_be_bytes());
        out.extend_from_slice(&self.transaction_id.to_be_bytes());
        for stats in &self.torrents {
            out.extend_from_slice(&i32::try_from(stats.complete).unwrap_or(i32::MAX).to_be_bytes());
            out.extend_from_slice(&i32::try_from(stats.downloaded).unwrap_or(i32::MAX).to_be_bytes());
            out.extend_from_slice(&i32::try_from(stats.incomplete).unwrap_or(i32::MAX).to_be_bytes());
        }
        out
    }

    /// # Errors
    ///
    /// Returns `TrackerError::InvalidFrame` if `bytes` is shorter than the
    /// 8-byte header, declares an action other than `ACTION_SCRAPE`, or its
    /// trailing length is not a multiple of 12 bytes.
    #[track_caller]
    pub fn decode(bytes: &[u8]) -> Result<Self, TrackerError> {
        if bytes.len() < SCRAPE_RESPONSE_HEADER_LEN || (bytes.len() - SCRAPE_RESPONSE_HEADER_LEN) % SCRAPE_STATS_LEN != 0 {
            return Err(TrackerError::InvalidFrame { location: Location::caller() });
        }

        let action = i32::from_be_bytes(bytes[0..4].try_into().unwrap());
        if action != ACTION_SCRAPE {
            return Err(TrackerError::InvalidFrame { location: Location::caller() });
        }
        let transaction_id = i32::from_be_bytes(bytes[4..8].try_into().unwrap());

        let torrents = bytes[SCRAPE_RESPONSE_HEADER_LEN..]
            .chunks_exact(SCRAPE_STATS_LEN)
            .map(|chunk| SwarmMetadata {
                complete: u32::from_be_bytes(chunk[0..4].try_into().unwrap()),
                downloaded: u32::from_be_bytes(chunk[4..8].try_into().unwrap()),
                incomplete: u32::from_be_bytes(chunk[8..12].try_into().unwrap()),
            })
            .collect();

        Ok(Self { transaction_id, torrents })
    }
}
