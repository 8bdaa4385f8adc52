#![forbid(unsafe_code)]

//! Drag session controller: one per draggable element.
//!
//! [`DragController`] owns the gesture composer, the geometry snapshot, the
//! settle timer and the resize reactor for a single element, and turns host
//! inputs into [`DragEvent`]s plus host side effects.
//!
//! # State Machine
//!
//! ```text
//! Idle --start--> Dragging --stop/cancel--> Idle
//! ```
//!
//! - **start**: pointer interaction on the element is disabled, the moving
//!   class goes on the element and the body classes on the document body,
//!   and a start event carries the element's live offset.
//! - **move**: the raw candidate offset (pointer minus anchor) is applied as
//!   the element's transform; the clamped position is rendered as a shadow
//!   displaced by `clamped - raw`, and a move event reports the clamped
//!   position with its edge flags.
//! - **stop** (pointer-up, touch-end or touch-cancel): styles are restored,
//!   the selection is cleared, the residual shadow offset is folded into the
//!   final transform, the stop event is emitted and the ratios are updated.
//!   The residual is carried in session state rather than read back from the
//!   rendered shadow style.
//!
//! # Invariants
//!
//! 1. Ratios only change at stop (and on explicit dimension signals); a move
//!    never touches them.
//! 2. Handle changes take effect between gestures. A change requested while
//!    dragging is applied right after the stop.
//! 3. After [`DragController::teardown`] no input, tick or resize mutates the
//!    host.
//!
//! # Failure Modes
//!
//! - Geometry not measured when a gesture starts: moves snap to the grid but
//!   are not confined until the next successful measurement.
//! - Measurement failure on the settle tick: the timer is re-armed with the
//!   same delay.

use core::time::Duration;

use crate::clamp::{ClampedPosition, clamp, snap_unbounded};
use crate::config::MoveItConfig;
use crate::event::{DragEvent, DragMovePosition, DragStartPosition};
use crate::geometry::{GeometrySnapshot, Offset, Ratios, container_scroll_top, current_offset};
use crate::gesture::{GestureComposer, GestureLogEntry, GestureSignal, InputFrame};
use crate::host::{DragHost, ElementId, StyleTarget};
use crate::input::{InputSource, RawInput, StopCause};
use crate::resize::{ResizeContext, ResizeOutcome, ResizeReactor};
use crate::settle::SettleTimer;

/// Result of feeding one input to the controller.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragDispatch {
    pub event: Option<DragEvent>,
    pub log: GestureLogEntry,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct ActiveDrag {
    base: DragStartPosition,
    /// Clamped position of the last move: the live transform plus the
    /// residual shadow offset. `None` until the first move.
    settle_at: Option<Offset>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum DragState {
    Idle,
    Dragging(ActiveDrag),
}

#[derive(Debug, Clone)]
pub struct DragController {
    element: ElementId,
    config: MoveItConfig,
    column_width: f64,
    composer: GestureComposer,
    geometry: GeometrySnapshot,
    state: DragState,
    /// Last finalized offset (after stop or proportional reposition).
    committed: Offset,
    settle: SettleTimer,
    resize: ResizeReactor,
    pending_handle: Option<Option<String>>,
    torn_down: bool,
}

impl DragController {
    #[must_use]
    pub fn new(element: ElementId, config: MoveItConfig) -> Self {
        let column_width = config.effective_column_width();
        let composer = GestureComposer::new(config.gesture_filter());
        Self {
            element,
            config,
            column_width,
            composer,
            geometry: GeometrySnapshot::default(),
            state: DragState::Idle,
            committed: Offset::ZERO,
            settle: SettleTimer::new(),
            resize: ResizeReactor::new(),
            pending_handle: None,
            torn_down: false,
        }
    }

    #[inline]
    #[must_use]
    pub const fn element(&self) -> ElementId {
        self.element
    }

    #[inline]
    #[must_use]
    pub fn config(&self) -> &MoveItConfig {
        &self.config
    }

    #[inline]
    #[must_use]
    pub fn geometry(&self) -> &GeometrySnapshot {
        &self.geometry
    }

    #[inline]
    #[must_use]
    pub const fn ratios(&self) -> Ratios {
        self.geometry.ratios()
    }

    #[inline]
    #[must_use]
    pub const fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging(_))
    }

    /// Offset the element rests at between gestures.
    #[inline]
    #[must_use]
    pub const fn committed_offset(&self) -> Offset {
        self.committed
    }

    #[inline]
    #[must_use]
    pub const fn settle_deadline(&self) -> Option<Duration> {
        self.settle.deadline()
    }

    #[inline]
    #[must_use]
    pub const fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    /// Attach to the host: opt out of native drag and arm the settle timer
    /// for the first measurement.
    pub fn mount<H: DragHost + ?Sized>(&mut self, host: &mut H, now: Duration) {
        if self.torn_down {
            return;
        }
        host.disable_native_drag(self.element);
        self.settle.schedule(now, self.config.settle_delay());
        crate::debug!(
            element = self.element.0,
            delay_ms = self.config.settle_delay_ms,
            "controller mounted; measurement scheduled"
        );
    }

    /// Advance the host clock. Returns `true` when the settle timer fired and
    /// the geometry was measured.
    pub fn tick<H: DragHost + ?Sized>(&mut self, host: &H, now: Duration) -> bool {
        if self.torn_down || !self.settle.poll(now) {
            return false;
        }
        match self.geometry.refresh(host, self.element, &self.config.bounds) {
            Ok(()) => {
                self.geometry.set_ratios(Ratios::default());
                self.committed = current_offset(host, self.element);
                crate::debug!(
                    element = self.element.0,
                    container_width = self.geometry.container.width,
                    container_height = self.geometry.container.height,
                    "initial geometry measured"
                );
                true
            }
            Err(error) => {
                let retry = error.is_retryable();
                crate::warn!(
                    element = self.element.0,
                    error = %error,
                    retry,
                    "geometry unavailable after settle delay"
                );
                if retry {
                    self.settle.schedule(now, self.config.settle_delay());
                }
                false
            }
        }
    }

    /// Feed one raw input through the gesture composer.
    pub fn handle_input<H: DragHost + ?Sized>(
        &mut self,
        host: &mut H,
        input: &RawInput,
    ) -> DragDispatch {
        let span = crate::trace_span!("moveit.input", element = self.element.0);
        let _guard = span.enter();

        let frame = InputFrame {
            element_offset: current_offset(host, self.element),
            scroll_top: container_scroll_top(host, &self.config.bounds),
        };
        let dispatch = self.composer.dispatch(input, frame);
        let event = match dispatch.signal {
            None => None,
            Some(GestureSignal::Start { source }) => {
                Some(self.begin(host, frame.element_offset, source))
            }
            Some(GestureSignal::Move { raw, .. }) => self.drag_to(host, raw),
            Some(GestureSignal::Stop { cause }) => self.finish(host, cause),
        };
        DragDispatch {
            event,
            log: dispatch.log,
        }
    }

    /// Window or container resize. Returns the move event when a
    /// viewport-bound element was repositioned.
    pub fn handle_resize<H: DragHost + ?Sized>(&mut self, host: &mut H) -> Option<DragEvent> {
        if self.torn_down {
            return None;
        }
        let ctx = self.resize_context(host);
        match self.resize.on_resize(host, &ctx, &mut self.geometry) {
            ResizeOutcome::Repositioned(position) => Some(self.reposition(host, &position)),
            _ => None,
        }
    }

    /// Externally bumped dimensions-changed counter.
    pub fn set_dimensions_signal<H: DragHost + ?Sized>(
        &mut self,
        host: &H,
        value: u64,
    ) -> ResizeOutcome {
        if self.torn_down {
            return ResizeOutcome::Unchanged;
        }
        let ctx = self.resize_context(host);
        self.resize
            .on_dimensions_signal(value, host, &ctx, &mut self.geometry)
    }

    /// Change the drag handle. Returns `false` when the change was queued
    /// behind the gesture in flight.
    pub fn set_handle(&mut self, handle: Option<String>) -> bool {
        let mut next = self.config.clone();
        next.handle = handle;
        if self.composer.set_filter(next.gesture_filter()) {
            self.config.handle = next.handle;
            self.pending_handle = None;
            true
        } else {
            crate::debug!(element = self.element.0, "handle change queued until gesture ends");
            self.pending_handle = Some(next.handle);
            false
        }
    }

    /// Change the grid step; applies from the next move.
    pub fn set_column_width(&mut self, column_width: f64) {
        self.config.column_width = column_width;
        self.column_width = self.config.effective_column_width();
    }

    /// Detach: cancel the settle timer and drop any gesture without emitting.
    ///
    /// A gesture in flight is abandoned: the element goes back to its
    /// committed offset and the drag styles are removed from the element and
    /// the document body.
    pub fn teardown<H: DragHost + ?Sized>(&mut self, host: &mut H) {
        self.settle.cancel();
        self.composer.suspend();
        if let DragState::Dragging(_) = core::mem::replace(&mut self.state, DragState::Idle) {
            host.set_pointer_events(self.element, true);
            self.toggle_drag_classes(host, false);
            host.clear_shadow(self.element);
            host.apply_transform(self.element, self.committed);
        }
        self.pending_handle = None;
        self.torn_down = true;
        crate::debug!(element = self.element.0, "controller torn down");
    }

    fn begin<H: DragHost + ?Sized>(
        &mut self,
        host: &mut H,
        offset: Offset,
        _source: InputSource,
    ) -> DragEvent {
        host.set_pointer_events(self.element, false);
        self.toggle_drag_classes(host, true);
        crate::debug!(
            element = self.element.0,
            source = ?_source,
            left = offset.x,
            top = offset.y,
            "drag started"
        );

        if !self.geometry.is_measured() {
            crate::debug!(
                element = self.element.0,
                "gesture started before geometry was measured; moves are unconfined"
            );
        }
        let base = DragStartPosition {
            item: self.element,
            init_left: self.geometry.draggable.left,
            init_top: self.geometry.draggable.top,
            offset_left: offset.x,
            offset_top: offset.y,
        };
        self.state = DragState::Dragging(ActiveDrag {
            base,
            settle_at: None,
        });
        DragEvent::Start(base)
    }

    fn drag_to<H: DragHost + ?Sized>(&mut self, host: &mut H, raw: Offset) -> Option<DragEvent> {
        let DragState::Dragging(active) = &mut self.state else {
            return None;
        };
        let clamped = if self.geometry.is_measured() {
            clamp(raw.x, raw.y, self.column_width, &self.geometry)
        } else {
            snap_unbounded(raw.x, raw.y, self.column_width)
        };
        let raw = raw.finite_or_zero();
        let residual = clamped.offset() - raw;

        host.apply_transform(self.element, raw);
        host.apply_shadow_offset(self.element, residual.x, residual.y);
        active.settle_at = Some(clamped.offset());

        crate::trace!(
            left = clamped.offset_left,
            top = clamped.offset_top,
            edges = ?clamped.edges,
            "drag move"
        );
        Some(DragEvent::Move(DragMovePosition::from_clamped(
            active.base,
            &clamped,
        )))
    }

    fn finish<H: DragHost + ?Sized>(
        &mut self,
        host: &mut H,
        _cause: StopCause,
    ) -> Option<DragEvent> {
        let DragState::Dragging(active) = core::mem::replace(&mut self.state, DragState::Idle)
        else {
            return None;
        };
        host.set_pointer_events(self.element, true);
        self.toggle_drag_classes(host, false);
        host.clear_selection();

        let final_offset = active
            .settle_at
            .unwrap_or_else(|| current_offset(host, self.element))
            .finite_or_zero();
        host.clear_shadow(self.element);
        host.apply_transform(self.element, final_offset);

        self.committed = final_offset;
        let ratios = self.geometry.ratios_for(final_offset);
        self.geometry.set_ratios(ratios);

        if let Some(handle) = self.pending_handle.take() {
            self.set_handle(handle);
        }
        crate::debug!(
            element = self.element.0,
            cause = ?_cause,
            left = final_offset.x,
            top = final_offset.y,
            "drag finished"
        );
        Some(DragEvent::Stop(DragStartPosition {
            offset_left: final_offset.x,
            offset_top: final_offset.y,
            ..active.base
        }))
    }

    fn reposition<H: DragHost + ?Sized>(
        &mut self,
        host: &mut H,
        position: &ClampedPosition,
    ) -> DragEvent {
        let offset = position.offset();
        host.clear_shadow(self.element);
        host.apply_transform(self.element, offset);
        self.committed = offset;
        let base = DragStartPosition {
            item: self.element,
            init_left: self.geometry.draggable.left,
            init_top: self.geometry.draggable.top,
            offset_left: offset.x,
            offset_top: offset.y,
        };
        DragEvent::Move(DragMovePosition::from_clamped(base, position))
    }

    fn resize_context<H: DragHost + ?Sized>(&self, host: &H) -> ResizeContext {
        let dragging = self.is_dragging();
        ResizeContext {
            element: self.element,
            bounds: self.config.bounds,
            column_width: self.column_width,
            resting: if dragging {
                self.committed
            } else {
                current_offset(host, self.element)
            },
            dragging,
        }
    }

    fn toggle_drag_classes<H: DragHost + ?Sized>(&self, host: &mut H, on: bool) {
        host.toggle_style_class(
            StyleTarget::Element(self.element),
            &self.config.moving_class,
            on,
        );
        for class in &self.config.body_classes {
            host.toggle_style_class(StyleTarget::DocumentBody, class, on);
        }
    }
}
