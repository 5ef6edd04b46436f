//! Error types
//!
//! Acquisition failures end Loading in the Error phase. Detection failures are
//! only ever reported through the status line.

use std::time::Duration;

use thiserror::Error;

use crate::sim::Phase;

/// Camera or model could not be made ready
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AcquireError {
    #[error("camera permission denied: {0}")]
    CameraDenied(String),
    #[error("camera unavailable: {0}")]
    CameraUnavailable(String),
    #[error("model failed to load: {0}")]
    ModelLoad(String),
    #[error("{what} timed out after {}ms", .after.as_millis())]
    Timeout { what: &'static str, after: Duration },
}

/// A single detection call failed
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{0}")]
pub struct DetectionError(pub String);

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Acquisition(#[from] AcquireError),
    #[error("cannot {action} while in {from:?}")]
    InvalidTransition { from: Phase, action: &'static str },
    /// Teardown happened while loading
    #[error("session was torn down during loading")]
    Cancelled,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read settings: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse settings: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid setting `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}
