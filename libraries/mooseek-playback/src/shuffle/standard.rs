//! Memoryless uniform shuffle
//!
//! Picks any track other than the current one. There is no history, so
//! `previous` cannot know what actually played before; it falls back to
//! queue order. This is a known limitation of the strategy.

use super::{sequential, Step};
use mooseek_core::RepeatMode;
use rand::Rng;

pub fn next<R: Rng + ?Sized>(
    len: usize,
    current: Option<usize>,
    repeat: RepeatMode,
    rng: &mut R,
) -> Step {
    match current {
        _ if len == 1 => sequential::next(len, current, repeat),
        None => Step::To(rng.gen_range(0..len)),
        Some(c) => {
            // Draw from len-1 slots and skip over the current index.
            let pick = rng.gen_range(0..len - 1);
            Step::To(if pick >= c { pick + 1 } else { pick })
        }
    }
}

pub fn previous(len: usize, current: Option<usize>, repeat: RepeatMode) -> Step {
    sequential::previous(len, current, repeat)
}
