//! The tracker controller: dispatches parsed requests to the registry,
//! constructs responses, enforces announce interval and request validation
//! (`spec.md` §2 "Tracker controller", §6).

use std::net::{IpAddr, SocketAddr};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicI64, Ordering};

use torrent_tracker_primitives::{AnnounceEvent, InfoHash};
use torrent_tracker_swarm::Registry;
use tracing::{debug, warn};

use crate::error::TrackerError;
use crate::{http, udp};

/// The single entry point both transports dispatch through.
pub struct TrackerController {
    registry: Registry,
    next_connection_id: AtomicI64,
}

impl TrackerController {
    #[must_use]
    pub fn new(registry: Registry) -> Self {
        Self {
            registry,
            next_connection_id: AtomicI64::new(1),
        }
    }

    /// Handles a raw UDP tracker packet and returns the raw response frame
    /// to send back, dispatching on the declared action (`spec.md` §4.2,
    /// §6). `Connect`/`Announce` are handled here; any other or malformed
    /// action is reported as an `Error` frame rather than dropped, so one
    /// bad packet cannot take down the server.
    #[must_use]
    pub fn handle_udp_packet(&self, bytes: &[u8], src_addr: SocketAddr) -> Vec<u8> {
        if bytes.len() < 12 {
            return udp::ErrorResponse {
                transaction_id: 0,
                message: "packet too short to contain an action".to_owned(),
            }
            .encode();
        }

        let action = i32::from_be_bytes(bytes[8..12].try_into().unwrap());
        let transaction_id = if bytes.len() >= 16 {
            i32::from_be_bytes(bytes[12..16].try_into().unwrap())
        } else {
            0
        };

        match action {
            udp::ACTION_CONNECT => match udp::ConnectRequest::decode(bytes) {
                Ok(request) => udp::ConnectResponse {
                    transaction_id: request.transaction_id,
                    connection_id: self.next_connection_id.fetch_add(1, Ordering::Relaxed),
                }
                .encode(),
                Err(err) => udp::ErrorResponse {
                    transaction_id,
                    message: err.failure_reason(),
                }
                .encode(),
            },
            udp::ACTION_ANNOUNCE => match udp::AnnounceRequest::decode(bytes) {
                Ok(request) => match self.handle_udp_announce(&request, src_addr) {
                    Ok(response) => response.encode(),
                    Err(err) => udp::ErrorResponse {
                        transaction_id: request.transaction_id,
                        message: err.failure_reason(),
                    }
                    .encode(),
                },
                Err(err) => udp::ErrorResponse {
                    transaction_id,
                    message: err.failure_reason(),
                }
                .encode(),
            },
            udp::ACTION_SCRAPE => match udp::ScrapeRequest::decode(bytes) {
                Ok(request) => self.handle_udp_scrape(&request).encode(),
                Err(err) => udp::ErrorResponse {
                    transaction_id,
                    message: err.failure_reason(),
                }
                .encode(),
            },
            _ => udp::ErrorResponse {
                transaction_id,
                message: "unsupported action".to_owned(),
            }
            .encode(),
        }
    }

    #[must_use]
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Handles an HTTP announce and returns the bencoded response body,
    /// always with HTTP 200 — tracker-level failures are expressed in the
    /// body, not the status code (`spec.md` §6).
    #[must_use]
    pub fn handle_http_announce(&self, query: &str, remote_addr: IpAddr) -> Vec<u8> {
        let outcome = catch_unwind(AssertUnwindSafe(|| self.try_handle_http_announce(query, remote_addr)));

        match outcome {
            Ok(Ok(body)) => body,
            Ok(Err(err)) => {
                debug!(%err, "announce failed");
                http::failure(&err.failure_reason())
            }
            Err(_) => {
                warn!("internal panic while handling an HTTP announce");
                http::failure(&TrackerError::Internal.failure_reason())
            }
        }
    }

    fn try_handle_http_announce(&self, query: &str, remote_addr: IpAddr) -> Result<Vec<u8>, TrackerError> {
        let request = http::AnnounceRequest::parse(query)?;
        let ip = request.ip_override.unwrap_or(remote_addr);

        let swarm = self.registry.get_or_unknown(&request.info_hash)?;
        let requester = swarm.update(
            request.event,
            request.peer_id,
            ip,
            request.port,
            request.uploaded,
            request.downloaded,
            request.left,
        )?;

        let peers = if request.event == AnnounceEvent::Stopped {
            Vec::new()
        } else {
            swarm.get_some_peers(&requester)
        };
        let (seeders, leechers) = swarm.seeders_and_leechers();

        Ok(http::announce_success(swarm.announce_interval_s(), seeders, leechers, &peers, request.compact))
    }

    /// Handles a UDP announce packet and returns the 98-byte-request-sized
    /// binary response. `connect`/`error` framing is left to the transport
    /// caller; this handles only the `Announce` action.
    ///
    /// # Errors
    ///
    /// Propagates codec and registry errors as `TrackerError` so the
    /// transport can frame an `Error` response.
    pub fn handle_udp_announce(&self, request: &udp::AnnounceRequest, src_addr: SocketAddr) -> Result<udp::AnnounceResponse, TrackerError> {
        let ip = if request.ip == 0 {
            src_addr.ip()
        } else {
            IpAddr::V4(std::net::Ipv4Addr::from(u32::from_be_bytes(request.ip.to_be_bytes())))
        };

        let outcome = catch_unwind(AssertUnwindSafe(|| self.try_handle_udp_announce(request, ip, request.port)));

        outcome.unwrap_or(Err(TrackerError::Internal))
    }

    fn try_handle_udp_announce(&self, request: &udp::AnnounceRequest, ip: IpAddr, port: u16) -> Result<udp::AnnounceResponse, TrackerError> {
        if ip.is_ipv6() {
            return Err(TrackerError::UnsupportedAddressFamily);
        }

        let swarm = self.registry.get_or_unknown(&request.info_hash)?;
        let requester = swarm.update(request.event, request.peer_id, ip, port, u64_from_i64(request.uploaded), u64_from_i64(request.downloaded), u64_from_i64(request.left))?;

        let peers = if request.event == AnnounceEvent::Stopped {
            Vec::new()
        } else {
            swarm.get_some_peers(&requester)
        };
        let (seeders, leechers) = swarm.seeders_and_leechers();

        let ipv4_peers = peers
            .into_iter()
            .filter_map(|peer| match peer.ip {
                IpAddr::V4(v4) => Some((v4, peer.port)),
                IpAddr::V6(_) => None,
            })
            .collect();

        Ok(udp::AnnounceResponse {
            transaction_id: request.transaction_id,
            interval: i32::try_from(swarm.announce_interval_s()).unwrap_or(i32::MAX),
            incomplete: i32::try_from(leechers).unwrap_or(i32::MAX),
            complete: i32::try_from(seeders).unwrap_or(i32::MAX),
            peers: ipv4_peers,
        })
    }

    /// Handles a UDP scrape packet, reporting zeroed statistics for any
    /// info hash this registry has never seen (`spec.md` §4.2 supplement).
    #[must_use]
    pub fn handle_udp_scrape(&self, request: &udp::ScrapeRequest) -> udp::ScrapeResponse {
        let torrents = self
            .registry
            .scrape(&request.info_hashes)
            .into_iter()
            .map(|(_, metadata)| metadata)
            .collect();

        udp::ScrapeResponse {
            transaction_id: request.transaction_id,
            torrents,
        }
    }

    /// Handles an HTTP scrape and returns the bencoded response body
    /// (`spec.md` §4.2 supplement).
    #[must_use]
    pub fn handle_http_scrape(&self, query: &str) -> Vec<u8> {
        let request = http::ScrapeRequest::parse(query);
        let torrents = self.registry.scrape(&request.info_hashes);
        http::scrape_success(&torrents)
    }

    /// Registers a torrent's swarm.
    pub fn register(&self, torrent: torrent_tracker_primitives::Torrent) {
        self.registry.register(torrent);
    }

    /// Unregisters a torrent's swarm.
    pub fn unregister(&self, info_hash: &InfoHash) {
        self.registry.unregister(info_hash);
    }
}

fn u64_from_i64(n: i64) -> u64 {
    u64::try_from(n).unwrap_or(0)
}
