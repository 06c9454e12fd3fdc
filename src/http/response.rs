//! Builds the bencoded HTTP tracker response body (`spec.md` §4.2, §6).

use torrent_tracker_bencode::{dict, encode, Value};
use torrent_tracker_swarm::TrackedPeer;

/// A non-compact peer entry: `{peer id, ip, port}`.
fn peer_entry(peer: &TrackedPeer) -> Value {
    dict([
        ("peer id", Value::bytes(peer.peer_id.bytes().to_vec())),
        ("ip", Value::str(&peer.ip.to_string())),
        ("port", Value::Int(i64::from(peer.port))),
    ])
}

/// Packs peers as 6-byte IPv4+port tuples, skipping any IPv6 peer (`spec.md`
/// §9 open question, resolved as reject/skip).
fn compact_peers(peers: &[TrackedPeer]) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(peers.len() * 6);
    for peer in peers {
        if let std::net::IpAddr::V4(ip) = peer.ip {
            bytes.extend_from_slice(&ip.octets());
            bytes.extend_from_slice(&peer.port.to_be_bytes());
        }
    }
    bytes
}

/// Builds the bencoded success response body for an announce.
#[must_use]
pub fn announce_success(interval: u32, complete: usize, incomplete: usize, peers: &[TrackedPeer], compact: bool) -> Vec<u8> {
    let peers_value = if compact {
        Value::bytes(compact_peers(peers))
    } else {
        Value::List(peers.iter().map(peer_entry).collect())
    };

    let body = dict([
        ("interval", Value::Int(i64::from(interval))),
        ("complete", Value::Int(complete as i64)),
        ("incomplete", Value::Int(incomplete as i64)),
        ("peers", peers_value),
    ]);

    encode(&body)
}

/// Builds the bencoded `{"failure reason": "..."}` error response body.
#[must_use]
pub fn failure(reason: &str) -> Vec<u8> {
    encode(&dict([("failure reason", Value::str(reason))]))
}
