//! Simulation core
//!
//! All gameplay logic lives here. This module must stay free of I/O:
//! - Time is passed in as clock milliseconds
//! - Randomness comes through `RandomSource`
//! - No rendering, camera or detector dependencies

pub mod collision;
pub mod difficulty;
pub mod mapper;
pub mod random;
pub mod spawn;
pub mod state;
pub mod tick;

pub use collision::{is_caught, within_catch_radius};
pub use difficulty::{base_fall_speed, fall_speed, spawn_interval};
pub use mapper::{AspectFit, CoordinateMapper};
pub use random::{RandomSource, ScriptedRandom, SeededRandom};
pub use spawn::{maybe_spawn, roll_entity};
pub use state::{Entity, EntityKind, GameState, Phase};
pub use tick::{TickOutcome, advance};
