//! Shuffle engine
//!
//! Decides which queue index plays after (or before) the current one.
//! Strategies are pure state plus arithmetic; nothing here performs I/O.
//!
//! | Strategy     | State                    | `previous`                  |
//! |--------------|--------------------------|-----------------------------|
//! | `Sequential` | none                     | queue order                 |
//! | `Standard`   | none                     | queue order (no history)    |
//! | `Miller`     | mix id + cursor + anchor | mapping at `cursor - 1`     |
//! | `Cycle`      | remaining + history      | pops history                |
//! | `Weighted`   | none (queue is reordered)| queue order                 |
//!
//! Strategy state is stamped with the queue version it was built for. If
//! the queue changes underneath it, the engine resets instead of indexing
//! into a list that no longer exists.

pub mod cycle;
pub mod miller;
pub mod sequential;
pub mod standard;
pub mod weighted;

use crate::queue::Queue;
use cycle::CycleState;
use miller::MillerState;
use mooseek_core::{RepeatMode, ShuffleStrategyId, Track};
use rand::rngs::StdRng;
use rand::SeedableRng;

pub use miller::miller_index;
pub use weighted::weighted_order;

/// Outcome of a next/previous selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Move to this queue index
    To(usize),
    /// No further track in this direction (end of queue or cycle)
    End,
    /// Queue is empty
    NoOp,
}

#[derive(Debug, Clone)]
enum StrategyState {
    Stateless,
    Miller(MillerState),
    Cycle(CycleState),
}

/// Selects next/previous indices under the active strategy
#[derive(Debug)]
pub struct ShuffleEngine {
    enabled: bool,
    strategy: ShuffleStrategyId,
    state: StrategyState,
    stamp: Option<u64>,
    rng: StdRng,
}

impl ShuffleEngine {
    /// Engine with shuffle off; `seed` makes every draw reproducible
    pub fn new(strategy: ShuffleStrategyId, seed: Option<u64>) -> Self {
        let rng = seed.map_or_else(StdRng::from_entropy, StdRng::seed_from_u64);
        Self {
            enabled: false,
            strategy,
            state: StrategyState::Stateless,
            stamp: None,
            rng,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Strategy selected for when shuffle is on
    pub fn strategy(&self) -> ShuffleStrategyId {
        self.strategy
    }

    /// Strategy actually in effect: `Sequential` while shuffle is off
    pub fn active_strategy(&self) -> ShuffleStrategyId {
        if self.enabled {
            self.strategy
        } else {
            ShuffleStrategyId::Sequential
        }
    }

    /// Turn shuffle on or off. Callers rebuild the queue and `reset` afterwards.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        self.stamp = None;
    }

    /// Select a strategy. Callers rebuild the queue and `reset` afterwards.
    pub fn set_strategy(&mut self, strategy: ShuffleStrategyId) {
        self.strategy = strategy;
        self.stamp = None;
    }

    /// Rebuild strategy state for `queue`, drawing a fresh mix id where needed
    pub fn reset(&mut self, queue: &Queue, current: Option<usize>) {
        let current = current.filter(|&c| c < queue.len());
        self.state = match self.active_strategy() {
            ShuffleStrategyId::Miller => {
                StrategyState::Miller(MillerState::new(
                    miller::draw_mix_id(&mut self.rng),
                    current,
                ))
            }
            ShuffleStrategyId::Cycle => StrategyState::Cycle(CycleState::new(queue.len(), current)),
            ShuffleStrategyId::Sequential
            | ShuffleStrategyId::Standard
            | ShuffleStrategyId::Weighted => StrategyState::Stateless,
        };
        self.stamp = Some(queue.version());
    }

    /// Whether strategy state was built for this queue version
    pub fn is_fresh(&self, queue: &Queue) -> bool {
        self.stamp == Some(queue.version())
    }

    fn ensure_fresh(&mut self, queue: &Queue, current: Option<usize>) {
        if self.is_fresh(queue) {
            return;
        }
        if let Some(stamp) = self.stamp {
            tracing::warn!(
                "Shuffle state built for queue v{} but queue is v{}, resetting",
                stamp,
                queue.version()
            );
        }
        self.reset(queue, current);
    }

    /// Index to play after `current`
    pub fn next(&mut self, queue: &Queue, current: Option<usize>, repeat: RepeatMode) -> Step {
        let len = queue.len();
        if len == 0 {
            return Step::NoOp;
        }
        let current = current.filter(|&c| c < len);
        self.ensure_fresh(queue, current);

        let step = match (self.active_strategy(), &mut self.state) {
            (ShuffleStrategyId::Standard, _) => {
                standard::next(len, current, repeat, &mut self.rng)
            }
            (ShuffleStrategyId::Miller, StrategyState::Miller(state)) => {
                state.next(len, current, repeat, &mut self.rng)
            }
            (ShuffleStrategyId::Cycle, StrategyState::Cycle(state)) => {
                state.next(len, current, repeat, &mut self.rng)
            }
            _ => sequential::next(len, current, repeat),
        };

        tracing::debug!(strategy = %self.active_strategy(), ?current, ?step, "next");
        step
    }

    /// Index to play before `current`
    pub fn previous(&mut self, queue: &Queue, current: Option<usize>, repeat: RepeatMode) -> Step {
        let len = queue.len();
        if len == 0 {
            return Step::NoOp;
        }
        let current = current.filter(|&c| c < len);
        self.ensure_fresh(queue, current);

        let step = match (self.active_strategy(), &mut self.state) {
            (ShuffleStrategyId::Standard, _) => standard::previous(len, current, repeat),
            (ShuffleStrategyId::Miller, StrategyState::Miller(state)) => state.previous(len),
            (ShuffleStrategyId::Cycle, StrategyState::Cycle(state)) => state.previous(current),
            _ => sequential::previous(len, current, repeat),
        };

        tracing::debug!(strategy = %self.active_strategy(), ?current, ?step, "previous");
        step
    }

    /// Record an explicit jump (user picked a track) so history stays truthful
    pub fn jumped(&mut self, queue: &Queue, from: Option<usize>, to: usize) {
        if !self.is_fresh(queue) {
            self.reset(queue, Some(to));
            return;
        }
        if let StrategyState::Cycle(state) = &mut self.state {
            state.jumped(from.filter(|&f| f < queue.len()), to);
        }
    }

    /// Whole-queue ordering for the weighted strategy, `current` first
    pub fn weighted_order(&mut self, tracks: &[Track], current: Option<usize>) -> Vec<usize> {
        weighted::weighted_order(tracks, current, &mut self.rng)
    }
}
