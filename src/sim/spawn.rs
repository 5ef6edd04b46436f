//! Spawn scheduler
//!
//! Decides once per tick whether a new symbol enters the field.

use glam::Vec2;

use super::difficulty::{fall_speed, spawn_interval};
use super::random::RandomSource;
use super::state::{Entity, EntityKind, GameState};
use crate::tuning::Tuning;

/// Draw a kind, symbol, column and speed for a new entity
pub fn roll_entity(state: &mut GameState, tuning: &Tuning, rng: &mut dyn RandomSource) -> Entity {
    let kind = if rng.next_unit() < tuning.bad_probability {
        EntityKind::Bad
    } else {
        EntityKind::Good
    };
    let symbol = rng.pick(kind.symbols().len()) as u8;
    let span = tuning.field_width - 2.0 * tuning.spawn_margin;
    let x = tuning.spawn_margin + rng.next_unit() * span;
    let speed = fall_speed(state.score, tuning, rng);

    Entity {
        id: state.next_entity_id(),
        pos: Vec2::new(x, -tuning.spawn_height),
        speed,
        kind,
        symbol,
        radius: tuning.entity_radius,
    }
}

/// Spawn at most one entity if the interval has elapsed since the last spawn.
/// The first live tick of a run always spawns.
///
/// Returns the index of the new entity.
pub fn maybe_spawn(
    state: &mut GameState,
    now_ms: u64,
    tuning: &Tuning,
    rng: &mut dyn RandomSource,
) -> Option<usize> {
    if !state.is_live() {
        return None;
    }

    let interval = spawn_interval(state.score, tuning);
    let due = state
        .last_spawn_ms
        .is_none_or(|last| now_ms.saturating_sub(last) > interval);
    if !due {
        return None;
    }

    let entity = roll_entity(state, tuning, rng);
    log::debug!(
        "Spawned {:?} {} at x={:.0} speed={:.2}",
        entity.kind,
        entity.glyph(),
        entity.pos.x,
        entity.speed
    );
    state.entities.push(entity);
    state.last_spawn_ms = Some(now_ms);
    Some(state.entities.len() - 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::random::ScriptedRandom;
    use crate::sim::state::Phase;

    fn playing() -> (GameState, Tuning) {
        let tuning = Tuning::default();
        let mut state = GameState::new(&tuning);
        state.phase = Phase::Play;
        state.running = true;
        (state, tuning)
    }

    #[test]
    fn test_no_spawn_until_interval_exceeded() {
        let (mut state, tuning) = playing();
        state.last_spawn_ms = Some(0);
        let mut rng = ScriptedRandom::new([0.5]);

        // Strictly greater than the interval is required
        assert_eq!(maybe_spawn(&mut state, 1400, &tuning, &mut rng), None);
        assert_eq!(maybe_spawn(&mut state, 1401, &tuning, &mut rng), Some(0));
        assert_eq!(state.last_spawn_ms, Some(1401));

        // Same tick again: nothing
        assert_eq!(maybe_spawn(&mut state, 1401, &tuning, &mut rng), None);
        assert_eq!(maybe_spawn(&mut state, 2801, &tuning, &mut rng), None);
        assert_eq!(maybe_spawn(&mut state, 2802, &tuning, &mut rng), Some(1));
        assert_eq!(state.entities.len(), 2);
    }

    #[test]
    fn test_first_tick_of_run_spawns() {
        let (mut state, tuning) = playing();
        let mut rng = ScriptedRandom::new([0.5]);

        // Clock value does not matter for the first spawn
        assert_eq!(maybe_spawn(&mut state, 5, &tuning, &mut rng), Some(0));
        assert_eq!(maybe_spawn(&mut state, 21, &tuning, &mut rng), None);

        // Same again after a reset, late in the clock
        state.reset(&tuning);
        state.running = true;
        assert_eq!(maybe_spawn(&mut state, 90_000, &tuning, &mut rng), Some(0));
        assert_eq!(state.last_spawn_ms, Some(90_000));
    }

    #[test]
    fn test_interval_shrinks_with_score() {
        let (mut state, tuning) = playing();
        state.score = 100;
        state.last_spawn_ms = Some(10_000);
        let mut rng = ScriptedRandom::new([0.5]);
        assert_eq!(maybe_spawn(&mut state, 10_600, &tuning, &mut rng), None);
        assert!(maybe_spawn(&mut state, 10_601, &tuning, &mut rng).is_some());
    }

    #[test]
    fn test_kind_and_position_draws() {
        let (mut state, tuning) = playing();
        // kind, symbol, column, jitter
        let mut rng = ScriptedRandom::new([0.1, 0.0, 0.0, 0.0, 0.9, 0.99, 1.0, 0.5]);

        let bad = roll_entity(&mut state, &tuning, &mut rng);
        assert_eq!(bad.kind, EntityKind::Bad);
        assert_eq!(bad.symbol, 0);
        assert_eq!(bad.pos, Vec2::new(40.0, -40.0));
        assert_eq!(bad.speed, 2.0);

        let good = roll_entity(&mut state, &tuning, &mut rng);
        assert_eq!(good.kind, EntityKind::Good);
        assert_eq!(usize::from(good.symbol), EntityKind::Good.symbols().len() - 1);
        assert!(good.pos.x <= 600.0 && good.pos.x > 599.0);
        assert!((good.speed - 2.6).abs() < 1e-5);
        assert!(good.id > bad.id);
    }

    #[test]
    fn test_not_live_never_spawns() {
        let tuning = Tuning::default();
        let mut state = GameState::new(&tuning);
        let mut rng = ScriptedRandom::new([0.5]);
        assert_eq!(maybe_spawn(&mut state, 1_000_000, &tuning, &mut rng), None);
        assert!(state.entities.is_empty());
    }
}
