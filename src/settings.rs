//! Runtime settings
//!
//! Loaded from a JSON file named by `FACE_CATCH_SETTINGS`, defaults otherwise.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ConfigError;
use crate::tuning::Tuning;

/// Which detector landmark drives the catcher
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ReferencePoint {
    /// Mouth landmark (falls back to the box center when absent)
    #[default]
    Mouth,
    /// Center of the face bounding box
    BoxCenter,
}

impl ReferencePoint {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReferencePoint::Mouth => "mouth",
            ReferencePoint::BoxCenter => "box center",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Game balance
    pub tuning: Tuning,

    // === Scheduling ===
    /// Detector poll cadence
    pub poll_interval_ms: u64,
    /// Render tick cadence (display refresh stand-in)
    pub frame_period_ms: u64,
    /// Upper bound on camera acquisition
    pub camera_timeout_ms: u64,
    /// Upper bound on model loading
    pub model_timeout_ms: u64,

    // === Tracking ===
    pub reference_point: ReferencePoint,

    /// RNG seed; `None` seeds from the wall clock at session creation
    pub seed: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            tuning: Tuning::default(),

            poll_interval_ms: POLL_INTERVAL_MS,
            frame_period_ms: FRAME_PERIOD_MS,
            camera_timeout_ms: CAMERA_TIMEOUT_MS,
            model_timeout_ms: MODEL_TIMEOUT_MS,

            reference_point: ReferencePoint::Mouth,

            seed: None,
        }
    }
}

impl Settings {
    /// Environment variable naming a JSON settings file
    const ENV_PATH: &'static str = "FACE_CATCH_SETTINGS";

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn frame_period(&self) -> Duration {
        Duration::from_millis(self.frame_period_ms)
    }

    pub fn camera_timeout(&self) -> Duration {
        Duration::from_millis(self.camera_timeout_ms)
    }

    pub fn model_timeout(&self) -> Duration {
        Duration::from_millis(self.model_timeout_ms)
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Load from `FACE_CATCH_SETTINGS` if set, otherwise defaults
    pub fn load() -> Result<Self, ConfigError> {
        match std::env::var_os(Self::ENV_PATH) {
            Some(path) => {
                let settings = Self::load_from(&path)?;
                log::info!("Loaded settings from {}", Path::new(&path).display());
                Ok(settings)
            }
            None => {
                log::info!("Using default settings");
                Ok(Self::default())
            }
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.tuning.validate()?;
        for (field, value) in [
            ("poll_interval_ms", self.poll_interval_ms),
            ("frame_period_ms", self.frame_period_ms),
            ("camera_timeout_ms", self.camera_timeout_ms),
            ("model_timeout_ms", self.model_timeout_ms),
        ] {
            if value == 0 {
                return Err(ConfigError::Invalid {
                    field,
                    reason: "must be non-zero".into(),
                });
            }
        }
        Ok(())
    }
}
