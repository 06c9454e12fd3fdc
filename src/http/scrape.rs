//! BEP-48 scrape: `{"files": {info_hash: {complete, downloaded, incomplete}}}`.
//!
//! Supplements `spec.md`'s announce-only distillation with the natural
//! complement the original tracker also serves; it reuses the registry's
//! swarm metadata and never touches peer state.

use torrent_tracker_bencode::{dict, encode, Value};
use torrent_tracker_primitives::{InfoHash, SwarmMetadata};

/// One info hash's scrape entry, keyed by the raw 20-byte hash.
fn scrape_entry(info_hash: &InfoHash, metadata: &SwarmMetadata) -> (Vec<u8>, Value) {
    let entry = dict([
        ("complete", Value::Int(i64::from(metadata.complete))),
        ("downloaded", Value::Int(i64::from(metadata.downloaded))),
        ("incomplete", Value::Int(i64::from(metadata.incomplete))),
    ]);
    (info_hash.bytes().to_vec(), entry)
}

/// Builds the bencoded scrape response body for a set of torrents.
#[must_use]
pub fn scrape_success(torrents: &[(InfoHash, SwarmMetadata)]) -> Vec<u8> {
    let mut files = std::collections::BTreeMap::new();
    for (info_hash, metadata) in torrents {
        let (key, value) = scrape_entry(info_hash, metadata);
        files.insert(key, value);
    }

    encode(&dict([("files", Value::Dict(files))]))
}
