//! Queue-order navigation

use super::Step;
use mooseek_core::RepeatMode;

/// Index after `current`; wraps only under `RepeatMode::All`
pub fn next(len: usize, current: Option<usize>, repeat: RepeatMode) -> Step {
    match current {
        None => Step::To(0),
        Some(c) if c + 1 < len => Step::To(c + 1),
        Some(_) if repeat == RepeatMode::All => Step::To(0),
        Some(_) => Step::End,
    }
}

/// Index before `current`; wraps to the last track only under `RepeatMode::All`
pub fn previous(len: usize, current: Option<usize>, repeat: RepeatMode) -> Step {
    match current {
        None => Step::To(0),
        Some(c) if c > 0 => Step::To(c - 1),
        Some(_) if repeat == RepeatMode::All => Step::To(len - 1),
        Some(_) => Step::End,
    }
}
