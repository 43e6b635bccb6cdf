//! Index-mapped shuffle (Miller shuffle, "lite" variant)
//!
//! Instead of storing a permuted order, a linear cursor is mapped to a
//! queue index by a pure function of `(cursor, mix_id, len)`. Stepping back
//! is just evaluating the mapping at `cursor - 1`, so the state is a
//! cursor, a mix id, and the index the cycle started from.
//!
//! The mapping is a pseudo-permutation: for practical queue sizes every
//! index in `[0, len)` is produced exactly once per cycle, but this is not
//! guaranteed for all sizes.

use super::{sequential, Step};
use mooseek_core::RepeatMode;
use rand::Rng;

const PRIME_A: u64 = 52639;
const PRIME_B: u64 = 33703;

/// Exclusive upper bound for mix ids (31-bit)
pub const MIX_ID_LIMIT: u64 = 0x7FFF_FFFF;

/// Map `cursor` to a queue index in `[0, len)`.
pub fn miller_index(cursor: usize, mix_id: u64, len: usize) -> usize {
    if len <= 1 {
        return 0;
    }

    let n = len as u64;
    let i = cursor as u64;

    if len == 2 {
        return ((mix_id / (i / 2 + 1) + i) % n) as usize;
    }

    let rand_r = (mix_id ^ (13 * (i / n))) & 0xFFFF_FFFF;
    let mut si = (rand_r % n + i) % n;

    let r1 = rand_r % 1063;
    let r2 = rand_r % 3631;
    let rx = (rand_r / n) % n + 1;
    let rx2 = (rand_r / 131) % n + 1;

    if si % 3 == 0 {
        si = (((si / 3) * PRIME_A + r1) % ((n + 2) / 3)) * 3;
    }
    if si % 2 == 0 {
        si = (((si / 2) * PRIME_B + r2) % ((n + 1) / 2)) * 2;
    }
    if (si ^ rx2) < n {
        si ^= rx2;
    }

    si = if si < rx {
        ((rx - si - 1) * PRIME_B + r1 + r2) % rx
    } else {
        ((si - rx) * PRIME_A + r2) % (n - rx) + rx
    };

    si as usize
}

/// Draw a fresh 31-bit mix id
pub fn draw_mix_id<R: Rng + ?Sized>(rng: &mut R) -> u64 {
    rng.gen_range(0..MIX_ID_LIMIT)
}

/// Cursor and mix id for one shuffled cycle.
///
/// The track playing when the cycle began (the anchor) counts as already
/// played: the cursor steps over it, and stepping back past the first
/// cursor position lands on it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MillerState {
    mix_id: u64,
    cursor: Option<usize>,
    anchor: Option<usize>,
}

impl MillerState {
    pub fn new(mix_id: u64, anchor: Option<usize>) -> Self {
        Self {
            mix_id,
            cursor: None,
            anchor,
        }
    }

    pub fn mix_id(&self) -> u64 {
        self.mix_id
    }

    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    pub fn next<R: Rng + ?Sized>(
        &mut self,
        len: usize,
        current: Option<usize>,
        repeat: RepeatMode,
        rng: &mut R,
    ) -> Step {
        if len == 1 {
            return sequential::next(len, current, repeat);
        }

        let mut cursor = self.cursor.map_or(0, |c| c + 1);
        let mut redrawn = false;

        loop {
            if cursor >= len {
                if repeat != RepeatMode::All || redrawn {
                    return Step::End;
                }
                self.mix_id = draw_mix_id(rng);
                self.anchor = current;
                cursor = 0;
                redrawn = true;
            }

            let index = miller_index(cursor, self.mix_id, len);
            if Some(index) == self.anchor {
                cursor += 1;
                continue;
            }

            self.cursor = Some(cursor);
            return Step::To(index);
        }
    }

    pub fn previous(&mut self, len: usize) -> Step {
        let Some(mut cursor) = self.cursor else {
            return Step::End;
        };

        while cursor > 0 {
            cursor -= 1;
            let index = miller_index(cursor, self.mix_id, len);
            if Some(index) != self.anchor {
                self.cursor = Some(cursor);
                return Step::To(index);
            }
        }

        match self.anchor {
            Some(anchor) if anchor < len => {
                self.cursor = None;
                Step::To(anchor)
            }
            _ => Step::End,
        }
    }
}
