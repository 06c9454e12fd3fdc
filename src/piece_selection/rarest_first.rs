//! Rarest-first-with-jitter piece selection (`spec.md` §4.6, P8).

use std::sync::Mutex;

use rand::rngs::{OsRng, StdRng};
use rand::{Rng, SeedableRng};

use super::{Bitfield, PieceSelectionStrategy};

/// Pick among at most this many of the rarest interesting pieces, instead of
/// always the single rarest one, to avoid a thundering herd of peers racing
/// for the same piece. Part of the wire contract (`spec.md` §4.6).
pub const RAREST_PIECE_JITTER: usize = 42;

/// Seeded from OS entropy at construction, not wall-clock time: constructing
/// many strategies within the same millisecond must not correlate their
/// seeds (`spec.md` §9).
pub struct RarestFirstWithJitter {
    rng: Mutex<StdRng>,
}

impl RarestFirstWithJitter {
    #[must_use]
    pub fn new() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_rng(OsRng).expect("OS entropy source is unavailable")),
        }
    }
}

impl Default for RarestFirstWithJitter {
    fn default() -> Self {
        Self::new()
    }
}

impl PieceSelectionStrategy for RarestFirstWithJitter {
    fn choose_piece(&self, rarest_ordered: &[usize], interesting_bits: &Bitfield, _piece_count: usize) -> Option<usize> {
        let candidates: Vec<usize> = rarest_ordered
            .iter()
            .copied()
            .filter(|&index| interesting_bits.is_set(index))
            .take(RAREST_PIECE_JITTER)
            .collect();

        if candidates.is_empty() {
            return None;
        }

        let mut rng = self.rng.lock().expect("rarest-first rng poisoned");
        let pick = rng.gen_range(0..candidates.len());
        Some(candidates[pick])
    }
}
