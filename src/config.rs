//! Validated configuration for the tracker core.
//!
//! This configuration is a first level of validation that can be performed
//! statically without running the service: it is loaded once at startup and
//! failures are fatal (`spec.md` §7), unlike per-request errors which are
//! turned into a `TrackerError` response.

use serde::{Deserialize, Serialize};

use torrent_tracker_swarm::{DEFAULT_ANNOUNCE_INTERVAL_SECONDS, DEFAULT_ANSWER_PEERS, MIN_ANNOUNCE_INTERVAL_SECONDS};

/// Plain, not-yet-validated configuration as loaded from TOML/env.
#[derive(Serialize, Deserialize, PartialEq, Eq, Debug, Clone)]
pub struct PlainConfig {
    #[serde(default = "default_answer_peers")]
    pub answer_peers: u32,
    #[serde(default = "default_announce_interval")]
    pub announce_interval_s: u32,
    #[serde(default = "default_inactive_peer_cleanup_interval")]
    pub inactive_peer_cleanup_interval_s: u64,
}

fn default_answer_peers() -> u32 {
    DEFAULT_ANSWER_PEERS
}

fn default_announce_interval() -> u32 {
    DEFAULT_ANNOUNCE_INTERVAL_SECONDS
}

fn default_inactive_peer_cleanup_interval() -> u64 {
    u64::from(DEFAULT_ANNOUNCE_INTERVAL_SECONDS)
}

impl Default for PlainConfig {
    fn default() -> Self {
        Self {
            answer_peers: DEFAULT_ANSWER_PEERS,
            announce_interval_s: DEFAULT_ANNOUNCE_INTERVAL_SECONDS,
            inactive_peer_cleanup_interval_s: u64::from(DEFAULT_ANNOUNCE_INTERVAL_SECONDS),
        }
    }
}

/// Validated configuration: constructing one enforces I4.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    pub answer_peers: u32,
    pub announce_interval_s: u32,
    pub inactive_peer_cleanup_interval_s: u64,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("announce interval must be at least {MIN_ANNOUNCE_INTERVAL_SECONDS}s, got {got}s")]
pub struct ConfigError {
    got: u32,
}

impl TryFrom<PlainConfig> for Config {
    type Error = ConfigError;

    fn try_from(plain: PlainConfig) -> Result<Self, Self::Error> {
        if plain.announce_interval_s < MIN_ANNOUNCE_INTERVAL_SECONDS {
            return Err(ConfigError {
                got: plain.announce_interval_s,
            });
        }

        Ok(Self {
            answer_peers: plain.answer_peers,
            announce_interval_s: plain.announce_interval_s,
            inactive_peer_cleanup_interval_s: plain.inactive_peer_cleanup_interval_s,
        })
    }
}

impl Config {
    /// Loads configuration from `path`, merged with overrides from the
    /// `TORRENT_TRACKER_CONFIG` environment variable, the same two-source
    /// pattern `torrust-tracker-configuration` uses.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be parsed, or if the parsed
    /// values fail validation.
    pub fn load_from_file(path: &str) -> Result<Self, Box<dyn std::error::Error>> {
        use figment::providers::{Env, Format, Toml};
        use figment::Figment;

        let plain: PlainConfig = Figment::new()
            .merge(Toml::file(path))
            .merge(Env::prefixed("TORRENT_TRACKER_CONFIG_"))
            .extract()?;

        Ok(Self::try_from(plain)?)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::try_from(PlainConfig::default()).expect("default configuration is always valid")
    }
}
