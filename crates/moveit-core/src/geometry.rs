#![forbid(unsafe_code)]

//! Geometric primitives and the container/draggable measurement snapshot.
//!
//! [`GeometrySnapshot`] is owned by one controller. It is mutated only on
//! mount (after the settle delay), on resize, on an explicit
//! dimensions-changed signal, and when a gesture stops (ratio update).
//! Everything else reads it.
//!
//! The element's *current* pixel offset is never taken from the snapshot: it
//! is read from the host's live transform via [`current_offset`], so an
//! in-progress transform is always accounted for.

use std::ops::{Add, Sub};

use serde::{Deserialize, Serialize};

use crate::error::{MoveItError, Result};
use crate::host::{Bounds, DragHost, ElementId};

/// Pixel offset of the draggable relative to its laid-out position.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Offset {
    pub x: f64,
    pub y: f64,
}

impl Offset {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    #[inline]
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Replace non-finite components with zero.
    #[must_use]
    pub fn finite_or_zero(self) -> Self {
        Self {
            x: if self.x.is_finite() { self.x } else { 0.0 },
            y: if self.y.is_finite() { self.y } else { 0.0 },
        }
    }
}

impl Add for Offset {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Offset {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// A host-reported bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BoundingBox {
    pub width: f64,
    pub height: f64,
    pub left: f64,
    pub top: f64,
    /// Vertical scroll position of the box's content.
    #[serde(default)]
    pub scroll_top: f64,
}

impl BoundingBox {
    #[must_use]
    pub const fn new(width: f64, height: f64, left: f64, top: f64) -> Self {
        Self {
            width,
            height,
            left,
            top,
            scroll_top: 0.0,
        }
    }

    #[must_use]
    pub const fn with_scroll_top(mut self, scroll_top: f64) -> Self {
        self.scroll_top = scroll_top;
        self
    }

    /// Negative or non-finite extents read as zero.
    fn sanitized(self) -> Self {
        let clean = |v: f64| if v.is_finite() { v } else { 0.0 };
        Self {
            width: clean(self.width).max(0.0),
            height: clean(self.height).max(0.0),
            left: clean(self.left),
            top: clean(self.top),
            scroll_top: clean(self.scroll_top),
        }
    }
}

/// Which side of the measurement was unavailable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeasureTarget {
    Container,
    Draggable,
}

/// Offset expressed as a fraction of the container's dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Ratios {
    pub left: f64,
    pub top: f64,
}

impl Ratios {
    #[must_use]
    pub const fn new(left: f64, top: f64) -> Self {
        Self { left, top }
    }
}

/// Container and draggable measurements plus the last finalized ratios.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GeometrySnapshot {
    pub container: BoundingBox,
    pub draggable: BoundingBox,
    ratios: Ratios,
    measured: bool,
}

impl GeometrySnapshot {
    /// Build an already-measured snapshot (tests, replay tools).
    #[must_use]
    pub fn measured(container: BoundingBox, draggable: BoundingBox) -> Self {
        Self {
            container: container.sanitized(),
            draggable: draggable.sanitized(),
            ratios: Ratios::default(),
            measured: true,
        }
    }

    /// Re-measure container and draggable through the host.
    ///
    /// On failure the previous measurements are kept untouched so a gesture
    /// in flight keeps clamping against the last known bounds.
    pub fn refresh<H: DragHost + ?Sized>(
        &mut self,
        host: &H,
        element: ElementId,
        bounds: &Bounds,
    ) -> Result<()> {
        let container = match bounds {
            Bounds::Viewport => host.measure_viewport(),
            Bounds::Container(id) => host.measure_element(*id),
        }
        .ok_or(MoveItError::GeometryUnready {
            target: MeasureTarget::Container,
        })?;
        let draggable = host
            .measure_element(element)
            .ok_or(MoveItError::GeometryUnready {
                target: MeasureTarget::Draggable,
            })?;

        self.container = container.sanitized();
        self.draggable = draggable.sanitized();
        self.measured = true;
        Ok(())
    }

    #[inline]
    #[must_use]
    pub const fn is_measured(&self) -> bool {
        self.measured
    }

    /// Largest allowed horizontal offset; collapses to 0 when the draggable
    /// is wider than its container.
    #[inline]
    #[must_use]
    pub fn max_left(&self) -> f64 {
        (self.container.width - self.draggable.width).max(0.0)
    }

    /// Largest allowed vertical offset; collapses to 0 when the draggable is
    /// taller than its container.
    #[inline]
    #[must_use]
    pub fn max_top(&self) -> f64 {
        (self.container.height - self.draggable.height).max(0.0)
    }

    #[inline]
    #[must_use]
    pub const fn ratios(&self) -> Ratios {
        self.ratios
    }

    pub fn set_ratios(&mut self, ratios: Ratios) {
        self.ratios = ratios;
    }

    /// Express `offset` as container ratios. A zero-sized axis yields 0.
    #[must_use]
    pub fn ratios_for(&self, offset: Offset) -> Ratios {
        let ratio = |value: f64, extent: f64| {
            if extent > 0.0 && value.is_finite() {
                value / extent
            } else {
                0.0
            }
        };
        Ratios {
            left: ratio(offset.x, self.container.width),
            top: ratio(offset.y, self.container.height),
        }
    }

    /// Pixel position the stored ratios map to in the current container.
    #[must_use]
    pub fn position_for_ratios(&self) -> Offset {
        Offset::new(
            self.container.width * self.ratios.left,
            self.container.height * self.ratios.top,
        )
    }
}

/// Current pixel offset of `element`, read from the host's live transform.
///
/// An element with no transform applied sits at its laid-out position.
pub fn current_offset<H: DragHost + ?Sized>(host: &H, element: ElementId) -> Offset {
    host.current_transform(element)
        .map(Offset::finite_or_zero)
        .unwrap_or(Offset::ZERO)
}

/// Live scroll position of the bounding container.
pub fn container_scroll_top<H: DragHost + ?Sized>(host: &H, bounds: &Bounds) -> f64 {
    let scroll = match bounds {
        Bounds::Viewport => host.measure_viewport(),
        Bounds::Container(id) => host.measure_element(*id),
    }
    .map_or(0.0, |b| b.scroll_top);
    if scroll.is_finite() { scroll } else { 0.0 }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(cw: f64, ch: f64, dw: f64, dh: f64) -> GeometrySnapshot {
        GeometrySnapshot::measured(
            BoundingBox::new(cw, ch, 0.0, 0.0),
            BoundingBox::new(dw, dh, 0.0, 0.0),
        )
    }

    #[test]
    fn default_snapshot_is_unmeasured() {
        let geometry = GeometrySnapshot::default();
        assert!(!geometry.is_measured());
        assert_eq!(geometry.ratios(), Ratios::default());
    }

    #[test]
    fn max_extents_subtract_draggable_size() {
        let geometry = snapshot(300.0, 200.0, 100.0, 50.0);
        assert_eq!(geometry.max_left(), 200.0);
        assert_eq!(geometry.max_top(), 150.0);
    }

    #[test]
    fn oversized_draggable_collapses_range_to_zero() {
        let geometry = snapshot(80.0, 40.0, 100.0, 50.0);
        assert_eq!(geometry.max_left(), 0.0);
        assert_eq!(geometry.max_top(), 0.0);
    }

    #[test]
    fn ratios_for_zero_container_are_zero() {
        let geometry = snapshot(0.0, 0.0, 0.0, 0.0);
        assert_eq!(geometry.ratios_for(Offset::new(40.0, 10.0)), Ratios::new(0.0, 0.0));
    }

    #[test]
    fn ratios_round_trip_through_position() {
        let mut geometry = snapshot(800.0, 400.0, 100.0, 100.0);
        let ratios = geometry.ratios_for(Offset::new(400.0, 100.0));
        assert_eq!(ratios, Ratios::new(0.5, 0.25));
        geometry.set_ratios(ratios);
        assert_eq!(geometry.position_for_ratios(), Offset::new(400.0, 100.0));
    }

    #[test]
    fn measured_sanitizes_non_finite_boxes() {
        let geometry = GeometrySnapshot::measured(
            BoundingBox::new(f64::NAN, 100.0, 0.0, 0.0),
            BoundingBox::new(-5.0, f64::INFINITY, 0.0, 0.0),
        );
        assert_eq!(geometry.container.width, 0.0);
        assert_eq!(geometry.draggable.width, 0.0);
        assert_eq!(geometry.draggable.height, 0.0);
    }

    #[test]
    fn offset_arithmetic() {
        let a = Offset::new(10.0, 5.0);
        let b = Offset::new(3.0, 7.0);
        assert_eq!(a + b, Offset::new(13.0, 12.0));
        assert_eq!(a - b, Offset::new(7.0, -2.0));
        assert_eq!(Offset::new(f64::NAN, 2.0).finite_or_zero(), Offset::new(0.0, 2.0));
    }
}
