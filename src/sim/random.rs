//! Injectable random source for spawn draws

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

/// Uniform draws in `[0, 1)`
pub trait RandomSource {
    fn next_unit(&mut self) -> f32;

    /// Uniform index in `0..len` (`len` must be non-zero)
    fn pick(&mut self, len: usize) -> usize {
        ((self.next_unit() * len as f32) as usize).min(len.saturating_sub(1))
    }
}

/// Seeded PCG stream for reproducible runs
#[derive(Debug, Clone)]
pub struct SeededRandom(Pcg32);

impl SeededRandom {
    pub fn new(seed: u64) -> Self {
        Self(Pcg32::seed_from_u64(seed))
    }
}

impl RandomSource for SeededRandom {
    fn next_unit(&mut self) -> f32 {
        self.0.random::<f32>()
    }
}

/// Replays a fixed list of draws, cycling when exhausted
#[derive(Debug, Clone)]
pub struct ScriptedRandom {
    values: Vec<f32>,
    cursor: usize,
}

impl ScriptedRandom {
    pub fn new(values: impl Into<Vec<f32>>) -> Self {
        Self {
            values: values.into(),
            cursor: 0,
        }
    }
}

impl RandomSource for ScriptedRandom {
    fn next_unit(&mut self) -> f32 {
        if self.values.is_empty() {
            return 0.0;
        }
        let value = self.values[self.cursor % self.values.len()];
        self.cursor += 1;
        value.clamp(0.0, 1.0 - f32::EPSILON)
    }
}
