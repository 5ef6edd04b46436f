//! Entity simulation tick
//!
//! Advances every live entity by one step and resolves catches and misses.

use glam::Vec2;

use super::collision::is_caught;
use super::state::{EntityKind, GameState, Phase};
use crate::tuning::Tuning;

/// What happened during one tick
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickOutcome {
    pub caught_good: u32,
    pub caught_bad: u32,
    /// Entities that left the field uncaught
    pub missed: u32,
    /// Lives hit zero this tick
    pub game_over: bool,
}

/// Advance the simulation by one tick
///
/// No-op unless the state is in Play and running. A Bad catch that takes the
/// last life ends the run immediately; entities after it are left untouched.
pub fn advance(state: &mut GameState, catcher: Vec2, tuning: &Tuning) -> TickOutcome {
    let mut outcome = TickOutcome::default();
    if !state.is_live() {
        return outcome;
    }

    let exit_y = tuning.field_height + tuning.exit_margin;
    let GameState {
        entities,
        score,
        lives,
        ..
    } = state;

    entities.retain_mut(|entity| {
        if outcome.game_over {
            return true;
        }

        entity.pos.y += entity.speed;

        if is_caught(entity.pos, catcher, tuning.catch_radius) {
            match entity.kind {
                EntityKind::Bad => {
                    *lives = lives.saturating_sub(1);
                    outcome.caught_bad += 1;
                    outcome.game_over = *lives == 0;
                }
                EntityKind::Good => {
                    *score += 1;
                    outcome.caught_good += 1;
                }
            }
            log::debug!("Caught {:?} {} (#{})", entity.kind, entity.glyph(), entity.id);
            return false;
        }

        if entity.pos.y > exit_y {
            outcome.missed += 1;
            return false;
        }

        true
    });

    if outcome.game_over {
        state.running = false;
        state.phase = Phase::GameOver;
        log::info!("Out of lives, final score {}", state.score);
    }

    outcome
}
