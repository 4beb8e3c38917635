//! Randomness as an injected capability
//!
//! Everything that draws random numbers (winner choice, landing jitter, wheel
//! order) takes a `&mut dyn RandomSource` so tests can script the sequence.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, RngCore, SeedableRng};
use std::collections::VecDeque;

pub trait RandomSource: Send {
    /// Uniform float in [0, 1)
    fn next_f64(&mut self) -> f64;

    /// Raw 64 random bits, scaled from `next_f64` unless the source has its own
    fn next_u64(&mut self) -> u64 {
        (self.next_f64() * u64::MAX as f64) as u64
    }

    /// Uniform index in [0, len). `len` must be non-zero.
    fn next_index(&mut self, len: usize) -> usize {
        let idx = (self.next_f64() * len as f64).floor() as usize;
        idx.min(len.saturating_sub(1))
    }
}

/// Production source backed by the thread-local rand generator
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadRandom;

impl RandomSource for ThreadRandom {
    fn next_f64(&mut self) -> f64 {
        rand::rng().random::<f64>()
    }

    fn next_u64(&mut self) -> u64 {
        rand::rng().next_u64()
    }
}

/// Reproducible source for simulations and tests
#[derive(Debug, Clone)]
pub struct SeededRandom(StdRng);

impl SeededRandom {
    pub fn new(seed: u64) -> Self {
        Self(StdRng::seed_from_u64(seed))
    }
}

impl RandomSource for SeededRandom {
    fn next_f64(&mut self) -> f64 {
        self.0.random::<f64>()
    }

    fn next_u64(&mut self) -> u64 {
        self.0.next_u64()
    }
}

/// Replays a fixed sequence, cycling when exhausted
#[derive(Debug, Clone)]
pub struct ScriptedRandom {
    values: VecDeque<f64>,
}

impl ScriptedRandom {
    pub fn new(values: impl IntoIterator<Item = f64>) -> Self {
        let values: VecDeque<f64> = values
            .into_iter()
            .map(|v| v.clamp(0.0, 1.0 - f64::EPSILON))
            .collect();
        Self { values }
    }
}

impl RandomSource for ScriptedRandom {
    fn next_f64(&mut self) -> f64 {
        match self.values.pop_front() {
            Some(v) => {
                self.values.push_back(v);
                v
            }
            None => 0.0,
        }
    }
}

/// `RngCore` view over a `RandomSource`, so rand's slice helpers can use it
pub struct SourceRng<'a>(pub &'a mut dyn RandomSource);

impl RngCore for SourceRng<'_> {
    fn next_u32(&mut self) -> u32 {
        (self.0.next_u64() >> 32) as u32
    }

    fn next_u64(&mut self) -> u64 {
        self.0.next_u64()
    }

    fn fill_bytes(&mut self, dst: &mut [u8]) {
        for chunk in dst.chunks_mut(8) {
            let bytes = self.0.next_u64().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }
}

/// Shuffle in place, drawing from `rng`
pub fn shuffle<T>(items: &mut [T], rng: &mut dyn RandomSource) {
    items.shuffle(&mut SourceRng(rng));
}
