//! Randomness seam for damage rolls and AI decisions.
//!
//! Every roll in the engine goes through [`BattleRng`], so a battle can be
//! replayed from a seed, scripted draw by draw in tests, or left to OS
//! entropy in production. Sessions own their generator; nothing is global.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// A source of uniform draws in `[0, 1)`.
pub trait BattleRng {
    fn next_f64(&mut self) -> f64;

    /// True with the given probability.
    fn chance(&mut self, probability: f64) -> bool {
        self.next_f64() < probability
    }

    /// Uniform index in `0..len`. `len` must be non-zero.
    fn index(&mut self, len: usize) -> usize {
        ((self.next_f64() * len as f64) as usize).min(len.saturating_sub(1))
    }
}

/// Deterministic ChaCha8 stream.
#[derive(Clone, Debug)]
pub struct SeededRng {
    inner: ChaCha8Rng,
    seed: u64,
}

impl SeededRng {
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    /// Seed from OS entropy. The chosen seed is kept so the battle can be replayed.
    pub fn from_entropy() -> Self {
        Self::new(rand::rng().random())
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl BattleRng for SeededRng {
    fn next_f64(&mut self) -> f64 {
        self.inner.random::<f64>()
    }
}

/// Replays a fixed list of draws, starting over when it runs out.
#[derive(Clone, Debug)]
pub struct ScriptedRng {
    outcomes: Vec<f64>,
    index: usize,
}

impl ScriptedRng {
    pub fn new(outcomes: Vec<f64>) -> Self {
        Self { outcomes, index: 0 }
    }

    /// Every draw returns the same value.
    pub fn constant(value: f64) -> Self {
        Self::new(vec![value])
    }

    /// Number of draws consumed so far.
    pub fn consumed(&self) -> usize {
        self.index
    }
}

impl BattleRng for ScriptedRng {
    fn next_f64(&mut self) -> f64 {
        if self.outcomes.is_empty() {
            return 0.0;
        }
        let outcome = self.outcomes[self.index % self.outcomes.len()];
        self.index += 1;
        tracing::trace!(draw = self.index, outcome, "scripted rng draw");
        outcome.clamp(0.0, 1.0 - f64::EPSILON)
    }
}
