//! History-based shuffle: every track plays once per cycle
//!
//! Keeps the indices not yet played this cycle in `remaining` and the
//! indices already played, in order, in `history`. Unlike the Miller
//! strategy this stores O(n) state but `previous` always returns exactly
//! what played before, even after explicit jumps.

use super::Step;
use mooseek_core::RepeatMode;
use rand::Rng;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CycleState {
    remaining: Vec<usize>,
    history: Vec<usize>,
}

impl CycleState {
    /// Fresh cycle over `len` tracks; `current` counts as already playing
    pub fn new(len: usize, current: Option<usize>) -> Self {
        Self {
            remaining: (0..len).filter(|&i| Some(i) != current).collect(),
            history: Vec::new(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.remaining.len()
    }

    pub fn history(&self) -> &[usize] {
        &self.history
    }

    pub fn next<R: Rng + ?Sized>(
        &mut self,
        len: usize,
        current: Option<usize>,
        repeat: RepeatMode,
        rng: &mut R,
    ) -> Step {
        if self.remaining.is_empty() {
            if repeat != RepeatMode::All {
                return Step::End;
            }
            *self = Self::new(len, current);
            if self.remaining.is_empty() {
                // Single track under repeat-all replays itself.
                return Step::To(current.unwrap_or(0));
            }
        }

        let pick = self.remaining.swap_remove(rng.gen_range(0..self.remaining.len()));
        if let Some(c) = current {
            self.history.push(c);
        }
        Step::To(pick)
    }

    pub fn previous(&mut self, current: Option<usize>) -> Step {
        match self.history.pop() {
            Some(prev) => {
                if let Some(c) = current {
                    self.remaining.push(c);
                }
                Step::To(prev)
            }
            None => Step::End,
        }
    }

    /// Record an explicit jump from `from` to `to`
    pub fn jumped(&mut self, from: Option<usize>, to: usize) {
        if from == Some(to) {
            return;
        }
        if let Some(f) = from {
            self.history.push(f);
        }
        self.remaining.retain(|&i| i != to);
    }
}
