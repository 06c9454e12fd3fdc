//! The sequential piece-selection strategy: deterministic, lowest interesting
//! index first (`spec.md` §4.6, P9).

use super::{Bitfield, PieceSelectionStrategy};

#[derive(Debug, Default)]
pub struct Sequential;

impl PieceSelectionStrategy for Sequential {
    fn choose_piece(&self, _rarest_ordered: &[usize], interesting_bits: &Bitfield, piece_count: usize) -> Option<usize> {
        (0..piece_count).find(|&index| interesting_bits.is_set(index))
    }
}
