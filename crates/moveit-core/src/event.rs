#![forbid(unsafe_code)]

//! Drag lifecycle events emitted to the host.

use crate::clamp::ClampedPosition;
use crate::geometry::Offset;
use crate::host::ElementId;

/// Position snapshot emitted on drag start and drag stop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragStartPosition {
    pub item: ElementId,
    /// Laid-out left of the draggable at the last measurement.
    pub init_left: f64,
    /// Laid-out top of the draggable at the last measurement.
    pub init_top: f64,
    pub offset_left: f64,
    pub offset_top: f64,
}

impl DragStartPosition {
    #[inline]
    #[must_use]
    pub const fn offset(&self) -> Offset {
        Offset::new(self.offset_left, self.offset_top)
    }
}

/// Position emitted on every move, with edge collisions for that move only.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragMovePosition {
    pub item: ElementId,
    pub init_left: f64,
    pub init_top: f64,
    pub offset_left: f64,
    pub offset_top: f64,
    pub left_edge: bool,
    pub right_edge: bool,
    pub top_edge: bool,
    pub bottom_edge: bool,
}

impl DragMovePosition {
    pub(crate) fn from_clamped(base: DragStartPosition, clamped: &ClampedPosition) -> Self {
        Self {
            item: base.item,
            init_left: base.init_left,
            init_top: base.init_top,
            offset_left: clamped.offset_left,
            offset_top: clamped.offset_top,
            left_edge: clamped.left_edge(),
            right_edge: clamped.right_edge(),
            top_edge: clamped.top_edge(),
            bottom_edge: clamped.bottom_edge(),
        }
    }

    #[inline]
    #[must_use]
    pub const fn offset(&self) -> Offset {
        Offset::new(self.offset_left, self.offset_top)
    }

    /// The start/stop view of this position (edge flags dropped).
    #[must_use]
    pub const fn position(&self) -> DragStartPosition {
        DragStartPosition {
            item: self.item,
            init_left: self.init_left,
            init_top: self.init_top,
            offset_left: self.offset_left,
            offset_top: self.offset_top,
        }
    }
}

/// One emitted lifecycle event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DragEvent {
    Start(DragStartPosition),
    Move(DragMovePosition),
    Stop(DragStartPosition),
}

impl DragEvent {
    #[must_use]
    pub const fn item(&self) -> ElementId {
        match self {
            Self::Start(p) | Self::Stop(p) => p.item,
            Self::Move(p) => p.item,
        }
    }

    #[must_use]
    pub const fn offset(&self) -> Offset {
        match self {
            Self::Start(p) | Self::Stop(p) => p.offset(),
            Self::Move(p) => p.offset(),
        }
    }
}
