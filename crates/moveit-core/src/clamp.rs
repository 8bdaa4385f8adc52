#![forbid(unsafe_code)]

//! Bounds and grid clamping.
//!
//! [`clamp`] maps a raw candidate offset to a position that is snapped to the
//! column grid horizontally and confined to the container on both axes,
//! together with edge-collision flags for the current move.
//!
//! # Invariants
//!
//! 1. `0 <= offset_left <= max_left` and `0 <= offset_top <= max_top`, where
//!    the maxima collapse to 0 when the draggable is larger than its container.
//! 2. Clamping a clamped position returns it unchanged.
//! 3. Only the horizontal axis snaps; the vertical axis is clamped as is.
//!
//! # Failure Modes
//!
//! - A column width that is zero, negative, or non-finite behaves as 1.
//! - A non-finite raw coordinate is treated as 0.

use bitflags::bitflags;

use crate::geometry::{GeometrySnapshot, Offset};

bitflags! {
    /// Container edges the clamped position touches.
    #[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Edges: u8 {
        const LEFT   = 0b0001;
        const RIGHT  = 0b0010;
        const TOP    = 0b0100;
        const BOTTOM = 0b1000;
    }
}

/// Result of one clamp: pixel offset plus edge flags.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ClampedPosition {
    pub offset_left: f64,
    pub offset_top: f64,
    pub edges: Edges,
}

impl ClampedPosition {
    #[inline]
    #[must_use]
    pub const fn offset(&self) -> Offset {
        Offset::new(self.offset_left, self.offset_top)
    }

    #[inline]
    #[must_use]
    pub const fn left_edge(&self) -> bool {
        self.edges.contains(Edges::LEFT)
    }

    #[inline]
    #[must_use]
    pub const fn right_edge(&self) -> bool {
        self.edges.contains(Edges::RIGHT)
    }

    #[inline]
    #[must_use]
    pub const fn top_edge(&self) -> bool {
        self.edges.contains(Edges::TOP)
    }

    #[inline]
    #[must_use]
    pub const fn bottom_edge(&self) -> bool {
        self.edges.contains(Edges::BOTTOM)
    }
}

/// Column width actually used for snapping.
#[inline]
#[must_use]
pub fn normalize_column_width(column_width: f64) -> f64 {
    if column_width.is_finite() && column_width > 0.0 {
        column_width
    } else {
        1.0
    }
}

/// Round `value` to the nearest multiple of `column_width`.
#[inline]
#[must_use]
pub fn snap(value: f64, column_width: f64) -> f64 {
    let column_width = normalize_column_width(column_width);
    (value / column_width).round() * column_width
}

/// Snap and confine a raw candidate offset to the container.
#[must_use]
pub fn clamp(
    raw_left: f64,
    raw_top: f64,
    column_width: f64,
    geometry: &GeometrySnapshot,
) -> ClampedPosition {
    let raw = Offset::new(raw_left, raw_top).finite_or_zero();
    let max_left = geometry.max_left();
    let max_top = geometry.max_top();

    // Pinning before snapping keeps an off-grid maximum a fixed point.
    let offset_left = if raw.x >= max_left {
        max_left
    } else {
        snap(raw.x, column_width).clamp(0.0, max_left)
    };
    let offset_top = raw.y.clamp(0.0, max_top);

    let mut edges = Edges::empty();
    edges.set(Edges::LEFT, offset_left == 0.0);
    edges.set(Edges::RIGHT, offset_left == max_left);
    edges.set(Edges::TOP, offset_top == 0.0);
    edges.set(Edges::BOTTOM, offset_top == max_top);

    ClampedPosition {
        offset_left,
        offset_top,
        edges,
    }
}

/// Snap without confining, for drags that start before geometry is known.
#[must_use]
pub fn snap_unbounded(raw_left: f64, raw_top: f64, column_width: f64) -> ClampedPosition {
    let raw = Offset::new(raw_left, raw_top).finite_or_zero();
    ClampedPosition {
        offset_left: snap(raw.x, column_width),
        offset_top: raw.y,
        edges: Edges::empty(),
    }
}
