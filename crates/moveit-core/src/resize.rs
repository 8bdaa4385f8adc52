#![forbid(unsafe_code)]

//! Container resize handling.
//!
//! Two triggers re-measure the geometry:
//!
//! - **Resize** (window or container): a viewport-bound element is moved to
//!   `ratio * new container size` on both axes, preserving its relative
//!   placement. A container-bound element keeps its pixel position and only
//!   has its ratios re-derived.
//! - **Dimensions-changed signal**: an externally bumped counter (page count
//!   or zoom changed in the parent layout). The first value observed is the
//!   initial binding and does nothing; every later change re-measures and
//!   re-derives the ratios from the resting offset without moving anything.
//!
//! While a gesture is in flight a resize only refreshes the measurements; the
//! gesture keeps ownership of the element's position until it stops.

use crate::clamp::{ClampedPosition, clamp};
use crate::geometry::{GeometrySnapshot, Offset, Ratios};
use crate::host::{Bounds, DragHost, ElementId};

/// What a resize trigger did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ResizeOutcome {
    /// Geometry is not measurable yet; nothing changed.
    Deferred,
    /// Measurements refreshed; position and ratios untouched.
    Refreshed,
    /// Element must move to this position.
    Repositioned(ClampedPosition),
    /// Ratios re-derived from the resting offset.
    RatiosRecomputed(Ratios),
    /// Signal value seen for the first time, or unchanged.
    Unchanged,
}

/// Inputs shared by both triggers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResizeContext {
    pub element: ElementId,
    pub bounds: Bounds,
    pub column_width: f64,
    /// Offset the element rests at (last finalized position when dragging).
    pub resting: Offset,
    pub dragging: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ResizeReactor {
    last_signal: Option<u64>,
}

impl ResizeReactor {
    #[must_use]
    pub const fn new() -> Self {
        Self { last_signal: None }
    }

    #[inline]
    #[must_use]
    pub const fn last_signal(&self) -> Option<u64> {
        self.last_signal
    }

    /// Window/container resize.
    pub fn on_resize<H: DragHost + ?Sized>(
        &mut self,
        host: &H,
        ctx: &ResizeContext,
        geometry: &mut GeometrySnapshot,
    ) -> ResizeOutcome {
        if let Err(_error) = geometry.refresh(host, ctx.element, &ctx.bounds) {
            crate::debug!(error = %_error, "resize deferred");
            return ResizeOutcome::Deferred;
        }
        if ctx.dragging {
            return ResizeOutcome::Refreshed;
        }
        if ctx.bounds.is_viewport() {
            let target = geometry.position_for_ratios();
            let position = clamp(target.x, target.y, ctx.column_width, geometry);
            crate::debug!(
                left = position.offset_left,
                top = position.offset_top,
                "repositioning proportionally after resize"
            );
            ResizeOutcome::Repositioned(position)
        } else {
            let ratios = geometry.ratios_for(ctx.resting);
            geometry.set_ratios(ratios);
            ResizeOutcome::RatiosRecomputed(ratios)
        }
    }

    /// Externally bumped dimensions-changed counter.
    pub fn on_dimensions_signal<H: DragHost + ?Sized>(
        &mut self,
        value: u64,
        host: &H,
        ctx: &ResizeContext,
        geometry: &mut GeometrySnapshot,
    ) -> ResizeOutcome {
        match self.last_signal {
            None => {
                self.last_signal = Some(value);
                return ResizeOutcome::Unchanged;
            }
            Some(seen) if seen == value => return ResizeOutcome::Unchanged,
            Some(_) => {}
        }
        // A value only counts as seen once a measurement succeeds.
        if let Err(_error) = geometry.refresh(host, ctx.element, &ctx.bounds) {
            crate::debug!(error = %_error, value, "dimensions signal deferred");
            return ResizeOutcome::Deferred;
        }
        self.last_signal = Some(value);
        let ratios = geometry.ratios_for(ctx.resting);
        geometry.set_ratios(ratios);
        ResizeOutcome::RatiosRecomputed(ratios)
    }
}
