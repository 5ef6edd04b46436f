//! Difficulty curve
//!
//! Both functions depend on score only; there is no time-based ramp.

use super::random::RandomSource;
use crate::tuning::Tuning;

/// Milliseconds between spawns at the given score
pub fn spawn_interval(score: u32, tuning: &Tuning) -> u64 {
    let decay = u64::from(score).saturating_mul(tuning.interval_decay_ms);
    tuning
        .base_interval_ms
        .saturating_sub(decay)
        .max(tuning.min_interval_ms)
}

/// Speed without the random term
pub fn base_fall_speed(score: u32, tuning: &Tuning) -> f32 {
    tuning.base_speed + score as f32 * tuning.speed_growth
}

/// Per-tick fall speed of a new entity, with jitter in `[0, speed_jitter)`
pub fn fall_speed(score: u32, tuning: &Tuning, rng: &mut dyn RandomSource) -> f32 {
    base_fall_speed(score, tuning) + rng.next_unit() * tuning.speed_jitter
}
