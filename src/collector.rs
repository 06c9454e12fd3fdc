//! Periodic collector: sweeps every swarm for stale peers at a fixed
//! cadence, honoring cooperative shutdown between sweeps, never mid-sweep
//! (`spec.md` §4.5, §5).

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::task::JoinHandle;
use tracing::info;

use crate::config::Config;
use crate::controller::TrackerController;

/// Starts the collector job on `config.inactive_peer_cleanup_interval_s`.
/// The returned handle completes once `tokio::signal::ctrl_c()` fires
/// between sweeps.
#[must_use]
pub fn start_job(config: &Config, controller: &Arc<TrackerController>) -> JoinHandle<()> {
    let weak_controller = Arc::downgrade(controller);
    let interval = Duration::from_secs(config.inactive_peer_cleanup_interval_s);

    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.tick().await;

        loop {
            tokio::select! {
                () = async { tokio::signal::ctrl_c().await.ok(); } => {
                    info!("stopping the collector job");
                    break;
                }
                _ = ticker.tick() => {
                    let Some(controller) = weak_controller.upgrade() else {
                        break;
                    };
                    let started_at = Instant::now();
                    controller.registry().collect_unfresh();
                    info!(elapsed_ms = started_at.elapsed().as_millis(), "swept stale peers from every swarm");
                }
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use torrent_tracker_primitives::{FileEntry, InfoHash, Torrent};
    use torrent_tracker_swarm::Registry;

    use super::*;

    #[tokio::test]
    async fn sweeps_a_registered_swarm_without_panicking() {
        let registry = Registry::new();
        registry.register(Torrent {
            info_hash: InfoHash::new([1; 20]),
            piece_length: 16384,
            piece_hashes: vec![],
            files: vec![FileEntry {
                path: "a".into(),
                length: 1,
            }],
        });
        let controller = Arc::new(TrackerController::new(registry));
        let config = Config {
            inactive_peer_cleanup_interval_s: 1,
            ..Config::default()
        };

        let handle = start_job(&config, &controller);
        tokio::time::sleep(Duration::from_millis(1100)).await;
        handle.abort();
    }
}
