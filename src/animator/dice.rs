//! Randomness used by the animator.

use std::collections::VecDeque;

/// Source of the two random decisions the animator makes.
pub trait Dice {
    /// Pick an index in `0..len`. `len` is never zero.
    fn pick(&mut self, len: usize) -> usize;

    /// Whether this keystroke stalls, given the configured probability.
    fn stall(&mut self, probability: f64) -> bool;
}

impl<R: rand::Rng> Dice for R {
    fn pick(&mut self, len: usize) -> usize {
        self.random_range(0..len)
    }

    fn stall(&mut self, probability: f64) -> bool {
        probability > 0.0 && self.random_bool(probability.min(1.0))
    }
}

/// Replays fixed decisions. Once a queue runs dry it picks index 0 and never
/// stalls, which makes a run fully deterministic.
#[derive(Debug, Clone, Default)]
pub struct ScriptedDice {
    picks: VecDeque<usize>,
    stalls: VecDeque<bool>,
}

impl ScriptedDice {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_picks(mut self, picks: impl IntoIterator<Item = usize>) -> Self {
        self.picks.extend(picks);
        self
    }

    pub fn with_stalls(mut self, stalls: impl IntoIterator<Item = bool>) -> Self {
        self.stalls.extend(stalls);
        self
    }
}

impl Dice for ScriptedDice {
    fn pick(&mut self, len: usize) -> usize {
        self.picks.pop_front().unwrap_or(0).min(len.saturating_sub(1))
    }

    fn stall(&mut self, _probability: f64) -> bool {
        self.stalls.pop_front().unwrap_or(false)
    }
}
