//! Game state and core simulation types

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::{BAD_SYMBOLS, GOOD_SYMBOLS};
use crate::tuning::Tuning;

/// Macro state of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    /// Waiting for a start request
    Title,
    /// Acquiring camera and model
    Loading,
    /// Active gameplay
    Play,
    /// Lives exhausted, score frozen
    GameOver,
    /// Acquisition failed
    Error,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Title => "title",
            Phase::Loading => "loading",
            Phase::Play => "play",
            Phase::GameOver => "game over",
            Phase::Error => "error",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityKind {
    /// Catch for a point
    Good,
    /// Costs a life when caught
    Bad,
}

impl EntityKind {
    pub fn symbols(&self) -> &'static [&'static str] {
        match self {
            EntityKind::Good => &GOOD_SYMBOLS,
            EntityKind::Bad => &BAD_SYMBOLS,
        }
    }
}

/// A falling symbol
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entity {
    pub id: u32,
    pub pos: Vec2,
    /// Added to `pos.y` every tick, always positive
    pub speed: f32,
    pub kind: EntityKind,
    /// Index into the kind's symbol set
    pub symbol: u8,
    /// Visual size only
    pub radius: f32,
}

impl Entity {
    pub fn glyph(&self) -> &'static str {
        let symbols = self.kind.symbols();
        symbols[usize::from(self.symbol) % symbols.len()]
    }
}

/// Mutable state of one play run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Live entities (order carries no meaning)
    pub entities: Vec<Entity>,
    pub score: u32,
    pub lives: u8,
    /// Clock time of the last spawn (ms), `None` until the run's first spawn
    pub last_spawn_ms: Option<u64>,
    pub phase: Phase,
    pub running: bool,
    next_id: u32,
}

impl GameState {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            entities: Vec::new(),
            score: 0,
            lives: tuning.max_lives,
            last_spawn_ms: None,
            phase: Phase::Title,
            running: false,
            next_id: 1,
        }
    }

    /// Clear everything for a fresh run (phase is left to the caller)
    pub fn reset(&mut self, tuning: &Tuning) {
        self.entities.clear();
        self.score = 0;
        self.lives = tuning.max_lives;
        self.last_spawn_ms = None;
        self.running = false;
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id = self.next_id.wrapping_add(1);
        id
    }

    /// True when gameplay should advance this tick
    pub fn is_live(&self) -> bool {
        self.phase == Phase::Play && self.running
    }
}
