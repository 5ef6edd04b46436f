//! Face Catch - catch falling symbols with your face
//!
//! Core modules:
//! - `sim`: Simulation core (mapping, spawning, physics, difficulty, game state)
//! - `tracker`: Face position polling and catcher publication
//! - `session`: Phase state machine and resource lifecycle
//! - `schedule`: Cooperative timers (poll task, frame loop, clock)
//! - `platform`: Camera and detector collaborator interfaces
//! - `renderer`: Draw primitive interface and scene drawing
//! - `settings` / `tuning`: Runtime configuration and game balance

pub mod error;
pub mod platform;
pub mod renderer;
pub mod schedule;
pub mod session;
pub mod settings;
pub mod sim;
pub mod tracker;
pub mod tuning;

pub use error::{AcquireError, ConfigError, DetectionError, SessionError};
pub use session::{Session, SessionSnapshot};
pub use settings::{ReferencePoint, Settings};
pub use tuning::Tuning;

/// Game configuration constants (defaults for [`Tuning`] and [`Settings`])
pub mod consts {
    /// Play field dimensions (16:9, same aspect as the requested camera)
    pub const FIELD_W: f32 = 640.0;
    pub const FIELD_H: f32 = 360.0;

    /// Catcher collision radius
    pub const CATCH_RADIUS: f32 = 65.0;
    pub const MAX_LIVES: u8 = 3;

    /// Entity defaults
    pub const ENTITY_RADIUS: f32 = 28.0;
    pub const SPAWN_MARGIN: f32 = 40.0;
    pub const SPAWN_HEIGHT: f32 = 40.0;
    pub const EXIT_MARGIN: f32 = 50.0;
    pub const BAD_PROBABILITY: f32 = 0.22;

    /// Difficulty curve
    pub const BASE_INTERVAL_MS: u64 = 1400;
    pub const MIN_INTERVAL_MS: u64 = 500;
    pub const INTERVAL_DECAY_MS: u64 = 8;
    pub const BASE_SPEED: f32 = 2.0;
    pub const SPEED_GROWTH: f32 = 0.025;
    pub const SPEED_JITTER: f32 = 1.2;

    /// Scheduling
    pub const POLL_INTERVAL_MS: u64 = 100;
    pub const FRAME_PERIOD_MS: u64 = 16;
    pub const CAMERA_TIMEOUT_MS: u64 = 3000;
    pub const MODEL_TIMEOUT_MS: u64 = 15_000;

    pub const GOOD_SYMBOLS: [&str; 16] = [
        "🍕", "🍔", "🍣", "🍩", "🍎", "🍓", "🌮", "🍜", "🧁", "🍦", "🍒", "🥐", "🍇", "🍉", "🧆",
        "🌯",
    ];
    pub const BAD_SYMBOLS: [&str; 5] = ["💣", "☠️", "🤢", "🦠", "💩"];
}
