#![forbid(unsafe_code)]

//! Error types for the drag engine.
//!
//! None of these cross the controller boundary while a gesture is in flight.
//! Geometry that is not ready yet is deferred, malformed values degrade to
//! geometric defaults, and only setup-time APIs (strict validation, JSON
//! configuration) hand errors back to the embedder.

use thiserror::Error;

use crate::geometry::MeasureTarget;

pub type Result<T> = std::result::Result<T, MoveItError>;

#[derive(Debug, Error)]
pub enum MoveItError {
    /// The host could not measure the container or the draggable yet.
    #[error("geometry not ready: {target:?} is not measurable")]
    GeometryUnready { target: MeasureTarget },

    #[error("invalid configuration: {field}: {reason}")]
    InvalidConfig {
        field: &'static str,
        reason: String,
    },

    #[error("configuration parse error: {0}")]
    ConfigParse(#[from] serde_json::Error),
}

impl MoveItError {
    #[must_use]
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            field,
            reason: reason.into(),
        }
    }

    /// Whether the error only means "try again after layout settles".
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::GeometryUnready { .. })
    }
}
