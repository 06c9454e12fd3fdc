//! The protocol core of a `BitTorrent` tracker: the swarm registry, the
//! piece-selection strategies, and the bencode/UDP wire codecs that define
//! its external contract.
//!
//! This crate deliberately stops short of owning a socket, a database, or a
//! CLI — see `SPEC_FULL.md` for what is and isn't in scope.

pub mod collector;
pub mod config;
pub mod controller;
pub mod error;
pub mod http;
pub mod piece_selection;
pub mod udp;

pub use config::Config;
pub use controller::TrackerController;
pub use error::TrackerError;
