//! Data-driven game balance
//!
//! Field geometry, spawn parameters and the difficulty curve constants.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ConfigError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Field ===
    pub field_width: f32,
    pub field_height: f32,

    // === Catcher ===
    pub catch_radius: f32,
    pub max_lives: u8,

    // === Entities ===
    /// Visual radius of a falling symbol (collision uses the catch radius only)
    pub entity_radius: f32,
    /// Horizontal inset for spawn positions
    pub spawn_margin: f32,
    /// Entities start this far above the top edge
    pub spawn_height: f32,
    /// Entities past `field_height + exit_margin` are dropped
    pub exit_margin: f32,
    /// Chance that a spawn is a Bad symbol
    pub bad_probability: f32,

    // === Difficulty ===
    pub base_interval_ms: u64,
    pub min_interval_ms: u64,
    pub interval_decay_ms: u64,
    pub base_speed: f32,
    pub speed_growth: f32,
    pub speed_jitter: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            field_width: FIELD_W,
            field_height: FIELD_H,

            catch_radius: CATCH_RADIUS,
            max_lives: MAX_LIVES,

            entity_radius: ENTITY_RADIUS,
            spawn_margin: SPAWN_MARGIN,
            spawn_height: SPAWN_HEIGHT,
            exit_margin: EXIT_MARGIN,
            bad_probability: BAD_PROBABILITY,

            base_interval_ms: BASE_INTERVAL_MS,
            min_interval_ms: MIN_INTERVAL_MS,
            interval_decay_ms: INTERVAL_DECAY_MS,
            base_speed: BASE_SPEED,
            speed_growth: SPEED_GROWTH,
            speed_jitter: SPEED_JITTER,
        }
    }
}

impl Tuning {
    pub fn field_size(&self) -> Vec2 {
        Vec2::new(self.field_width, self.field_height)
    }

    pub fn field_center(&self) -> Vec2 {
        self.field_size() * 0.5
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
            if value > 0.0 && value.is_finite() {
                Ok(())
            } else {
                Err(ConfigError::Invalid {
                    field,
                    reason: format!("must be positive, got {value}"),
                })
            }
        }

        positive("field_width", self.field_width)?;
        positive("field_height", self.field_height)?;
        positive("catch_radius", self.catch_radius)?;
        positive("base_speed", self.base_speed)?;

        if self.max_lives == 0 {
            return Err(ConfigError::Invalid {
                field: "max_lives",
                reason: "must be at least 1".into(),
            });
        }
        if !(0.0..=1.0).contains(&self.bad_probability) {
            return Err(ConfigError::Invalid {
                field: "bad_probability",
                reason: format!("must be within [0, 1], got {}", self.bad_probability),
            });
        }
        if self.spawn_margin * 2.0 > self.field_width {
            return Err(ConfigError::Invalid {
                field: "spawn_margin",
                reason: "leaves no room to spawn".into(),
            });
        }
        if self.min_interval_ms > self.base_interval_ms {
            return Err(ConfigError::Invalid {
                field: "min_interval_ms",
                reason: "exceeds base_interval_ms".into(),
            });
        }
        if self.speed_growth < 0.0 || self.speed_jitter < 0.0 {
            return Err(ConfigError::Invalid {
                field: "speed_growth",
                reason: "speed terms must not be negative".into(),
            });
        }
        Ok(())
    }
}
