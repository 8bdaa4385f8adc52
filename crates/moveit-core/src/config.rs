#![forbid(unsafe_code)]

//! Controller configuration.
//!
//! Every field has a default, so a host can deserialize a partial JSON object
//! (`{"column_width": 40}`) or build one with the `with_*` methods.
//! Out-of-range values are normalized at the point of use rather than
//! rejected; [`MoveItConfig::validate`] is there for hosts that prefer to
//! fail at setup.

use core::time::Duration;

use serde::{Deserialize, Serialize};

use crate::clamp::normalize_column_width;
use crate::error::{MoveItError, Result};
use crate::gesture::{DEFAULT_RESERVED_CLASS, GestureFilter};
use crate::host::Bounds;
use crate::settle::DEFAULT_SETTLE_DELAY;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MoveItConfig {
    /// Class of the sub-element drags must start on. `None` means anywhere
    /// on the draggable except the reserved control.
    pub handle: Option<String>,
    pub bounds: Bounds,
    /// Horizontal grid step in pixels; 1 disables snapping.
    pub column_width: f64,
    /// Class of the control region excluded from starting drags.
    pub reserved_class: String,
    /// Wait before the first measurement after mount.
    pub settle_delay_ms: u64,
    /// Class put on the draggable while it moves.
    pub moving_class: String,
    /// Classes put on the document body while dragging.
    pub body_classes: Vec<String>,
}

impl Default for MoveItConfig {
    fn default() -> Self {
        Self {
            handle: None,
            bounds: Bounds::Viewport,
            column_width: 1.0,
            reserved_class: DEFAULT_RESERVED_CLASS.to_string(),
            settle_delay_ms: DEFAULT_SETTLE_DELAY.as_millis() as u64,
            moving_class: "moving".to_string(),
            body_classes: vec!["no-select".to_string(), "dragging".to_string()],
        }
    }
}

impl MoveItConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a JSON configuration object; missing fields take defaults.
    pub fn from_json_str(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }

    #[must_use]
    pub fn with_handle(mut self, handle: impl Into<String>) -> Self {
        self.handle = Some(handle.into());
        self
    }

    #[must_use]
    pub fn with_bounds(mut self, bounds: Bounds) -> Self {
        self.bounds = bounds;
        self
    }

    #[must_use]
    pub fn with_column_width(mut self, column_width: f64) -> Self {
        self.column_width = column_width;
        self
    }

    #[must_use]
    pub fn with_settle_delay(mut self, delay: Duration) -> Self {
        self.settle_delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX);
        self
    }

    #[must_use]
    pub const fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    /// Column width used for snapping: invalid widths behave as 1.
    #[must_use]
    pub fn effective_column_width(&self) -> f64 {
        let width = normalize_column_width(self.column_width);
        if width != self.column_width {
            crate::warn!(
                configured = self.column_width,
                "column width is not a positive number; snapping disabled"
            );
        }
        width
    }

    /// Start filter derived from the handle and reserved-class settings.
    #[must_use]
    pub fn gesture_filter(&self) -> GestureFilter {
        GestureFilter {
            handle: self.handle.clone().filter(|h| !h.is_empty()),
            reserved_class: self.reserved_class.clone(),
        }
    }

    /// Strict check for hosts that want to reject bad input up front.
    pub fn validate(&self) -> Result<()> {
        if !(self.column_width.is_finite() && self.column_width >= 1.0) {
            return Err(MoveItError::invalid(
                "column_width",
                format!("must be a finite number >= 1, got {}", self.column_width),
            ));
        }
        if self.handle.as_deref().is_some_and(|h| h.split_ascii_whitespace().count() != 1) {
            return Err(MoveItError::invalid(
                "handle",
                "must be a single class name",
            ));
        }
        Ok(())
    }
}
