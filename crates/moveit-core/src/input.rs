#![forbid(unsafe_code)]

//! Raw pointer/touch input and its normalization.
//!
//! Mouse and touch arrive on separate device channels and are merged, not
//! chosen between: hybrid hardware may emit both. Each [`RawInput`] is
//! normalized once, at ingestion, into a [`NormalizedInput`] carrying a
//! device-independent [`PointerSample`], so nothing downstream branches on
//! the device kind again.
//!
//! Coordinates are client (viewport) coordinates as reported by the host.

use serde::{Deserialize, Serialize};

/// Phase for mouse/pointer events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointerPhase {
    Down,
    Move,
    Up,
}

/// Phase for touch events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TouchPhase {
    Start,
    Move,
    End,
    Cancel,
}

/// Mouse button, numbered like DOM `MouseEvent.button`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Primary,
    Auxiliary,
    Secondary,
    Other(u8),
}

impl MouseButton {
    #[must_use]
    pub const fn to_u8(self) -> u8 {
        match self {
            Self::Primary => 0,
            Self::Auxiliary => 1,
            Self::Secondary => 2,
            Self::Other(n) => n,
        }
    }

    #[must_use]
    pub const fn from_u8(n: u8) -> Self {
        match n {
            0 => Self::Primary,
            1 => Self::Auxiliary,
            2 => Self::Secondary,
            other => Self::Other(other),
        }
    }
}

/// The element an input event was dispatched to, described by its classes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct EventTarget {
    /// Space-separated class list, as in DOM `className`.
    pub class_name: String,
}

impl EventTarget {
    #[must_use]
    pub fn new(class_name: impl Into<String>) -> Self {
        Self {
            class_name: class_name.into(),
        }
    }

    /// Whether `class` is one of the target's own classes.
    #[must_use]
    pub fn has_class(&self, class: &str) -> bool {
        !class.is_empty() && self.class_name.split_ascii_whitespace().any(|c| c == class)
    }
}

/// A mouse/pointer event in client coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct PointerInput {
    pub phase: PointerPhase,
    pub button: MouseButton,
    pub x: f64,
    pub y: f64,
    pub target: Option<EventTarget>,
}

/// One contact point of a touch event.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TouchPoint {
    pub id: u32,
    pub x: f64,
    pub y: f64,
}

/// A touch event; `touches` lists the contacts currently on the surface.
#[derive(Debug, Clone, PartialEq)]
pub struct TouchInput {
    pub phase: TouchPhase,
    pub touches: Vec<TouchPoint>,
    pub target: Option<EventTarget>,
}

/// Device-level input as delivered by the host.
#[derive(Debug, Clone, PartialEq)]
pub enum RawInput {
    Pointer(PointerInput),
    Touch(TouchInput),
}

impl RawInput {
    #[must_use]
    pub fn pointer(phase: PointerPhase, button: MouseButton, x: f64, y: f64) -> Self {
        Self::Pointer(PointerInput {
            phase,
            button,
            x,
            y,
            target: None,
        })
    }

    /// A single-contact touch event (or a contactless one for end/cancel).
    #[must_use]
    pub fn touch(phase: TouchPhase, point: Option<(f64, f64)>) -> Self {
        Self::Touch(TouchInput {
            phase,
            touches: point
                .map(|(x, y)| vec![TouchPoint { id: 0, x, y }])
                .unwrap_or_default(),
            target: None,
        })
    }

    /// Attach the dispatch target.
    #[must_use]
    pub fn with_target(mut self, target: EventTarget) -> Self {
        match &mut self {
            Self::Pointer(p) => p.target = Some(target),
            Self::Touch(t) => t.target = Some(target),
        }
        self
    }

    /// Normalize into the device-independent form.
    #[must_use]
    pub fn normalize(&self) -> NormalizedInput {
        match self {
            Self::Pointer(p) => NormalizedInput {
                class: match p.phase {
                    PointerPhase::Down => InputClass::Start,
                    PointerPhase::Move => InputClass::Move,
                    PointerPhase::Up => InputClass::Stop(StopCause::PointerUp),
                },
                source: InputSource::Pointer,
                button: Some(p.button),
                sample: Some(PointerSample::new(p.x, p.y)),
                target: p.target.clone(),
            },
            Self::Touch(t) => NormalizedInput {
                class: match t.phase {
                    TouchPhase::Start => InputClass::Start,
                    TouchPhase::Move => InputClass::Move,
                    TouchPhase::End => InputClass::Stop(StopCause::TouchEnd),
                    TouchPhase::Cancel => InputClass::Stop(StopCause::TouchCancel),
                },
                source: InputSource::Touch,
                button: None,
                sample: t.touches.first().map(|p| PointerSample::new(p.x, p.y)),
                target: t.target.clone(),
            },
        }
    }
}

/// A single device-reported coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PointerSample {
    pub x: f64,
    pub y: f64,
}

impl PointerSample {
    #[inline]
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Device channel an input arrived on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputSource {
    Pointer,
    Touch,
}

/// What ends a gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StopCause {
    PointerUp,
    TouchEnd,
    TouchCancel,
}

impl StopCause {
    #[inline]
    #[must_use]
    pub const fn is_cancel(self) -> bool {
        matches!(self, Self::TouchCancel)
    }
}

/// Role of an input in the unified start/move/stop stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputClass {
    Start,
    Move,
    Stop(StopCause),
}

/// Device-independent input.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedInput {
    pub class: InputClass,
    pub source: InputSource,
    /// `None` for touch events, which have no buttons.
    pub button: Option<MouseButton>,
    /// `None` when a touch event carries no contact point.
    pub sample: Option<PointerSample>,
    pub target: Option<EventTarget>,
}
