#![forbid(unsafe_code)]

//! Gesture composition: merges pointer and touch channels into one drag stream.
//!
//! [`GestureComposer`] turns the three unified input classes (start, move,
//! stop) into [`GestureSignal`]s for exactly one gesture at a time.
//!
//! # State Machine
//!
//! ```text
//! Idle --qualifying start--> Active{anchor} --stop/cancel--> Idle
//! ```
//!
//! A qualifying start opens a [`GestureSession`]; every move while it exists
//! is translated into an offset relative to the session's anchor; the first
//! stop-class input closes it. Moves and stops with no open session are
//! ignored.
//!
//! # Invariants
//!
//! 1. At most one session exists. A start while one is open is ignored.
//! 2. No move is forwarded after the stop that closed its session.
//! 3. Touch-cancel closes a session exactly like touch-end and pointer-up.
//! 4. Sequence numbers increase by one per forwarded signal.
//!
//! # Start Filtering
//!
//! Only the primary mouse button or any touch start qualifies. With a handle
//! class configured the target itself must carry that class (a descendant of
//! the handle does not qualify). Without a handle, targets carrying the
//! reserved control class (e.g. a resize grip) are excluded.

use crate::geometry::Offset;
use crate::input::{
    InputClass, InputSource, MouseButton, NormalizedInput, PointerSample, RawInput, StopCause,
};

/// Default class of the control region that never starts a drag.
pub const DEFAULT_RESERVED_CLASS: &str = "resize-handle";

/// Start-event filter configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GestureFilter {
    /// Class the start target must carry, if set.
    pub handle: Option<String>,
    /// Class excluded from starting a drag when no handle is set.
    pub reserved_class: String,
}

impl Default for GestureFilter {
    fn default() -> Self {
        Self {
            handle: None,
            reserved_class: DEFAULT_RESERVED_CLASS.to_string(),
        }
    }
}

/// Live values the composer needs at dispatch time.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct InputFrame {
    /// Element offset from its live transform; only read on start.
    pub element_offset: Offset,
    /// Current scroll position of the bounding container.
    pub scroll_top: f64,
}

/// The open gesture.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureSession {
    /// Pointer position at start minus the element offset, scroll adjusted.
    pub anchor: PointerSample,
    /// Channel that opened the session.
    pub source: InputSource,
}

/// Unified gesture stream item.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureSignal {
    Start {
        /// Channel that opened the gesture.
        source: InputSource,
    },
    Move {
        /// Candidate element offset: pointer position minus anchor.
        raw: Offset,
    },
    Stop {
        cause: StopCause,
    },
}

/// Why an input did not produce a signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoredReason {
    ButtonNotAllowed,
    OutsideHandle,
    ReservedControl,
    GestureInProgress,
    NoActiveGesture,
    MissingTouchPoint,
    Suspended,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureLogOutcome {
    Forwarded,
    Ignored(IgnoredReason),
}

/// Structured record of one dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GestureLogEntry {
    pub class: InputClass,
    pub source: InputSource,
    pub sequence: Option<u64>,
    pub outcome: GestureLogOutcome,
}

/// Result of one dispatch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureDispatch {
    pub signal: Option<GestureSignal>,
    pub log: GestureLogEntry,
}

impl GestureDispatch {
    fn ignored(input: &NormalizedInput, reason: IgnoredReason) -> Self {
        crate::trace!(
            class = ?input.class,
            source = ?input.source,
            reason = ?reason,
            "gesture input ignored"
        );
        Self {
            signal: None,
            log: GestureLogEntry {
                class: input.class,
                source: input.source,
                sequence: None,
                outcome: GestureLogOutcome::Ignored(reason),
            },
        }
    }

    #[inline]
    #[must_use]
    pub const fn ignored_reason(&self) -> Option<IgnoredReason> {
        match self.log.outcome {
            GestureLogOutcome::Ignored(reason) => Some(reason),
            GestureLogOutcome::Forwarded => None,
        }
    }
}

/// Merges device channels into a single-gesture stream.
#[derive(Debug, Clone)]
pub struct GestureComposer {
    filter: GestureFilter,
    session: Option<GestureSession>,
    suspended: bool,
    next_sequence: u64,
}

impl Default for GestureComposer {
    fn default() -> Self {
        Self::new(GestureFilter::default())
    }
}

impl GestureComposer {
    #[must_use]
    pub fn new(filter: GestureFilter) -> Self {
        Self {
            filter,
            session: None,
            suspended: false,
            next_sequence: 1,
        }
    }

    #[inline]
    #[must_use]
    pub fn filter(&self) -> &GestureFilter {
        &self.filter
    }

    /// Replace the start filter. Refused while a session is open.
    pub fn set_filter(&mut self, filter: GestureFilter) -> bool {
        if self.session.is_some() {
            return false;
        }
        self.filter = filter;
        true
    }

    #[inline]
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }

    #[inline]
    #[must_use]
    pub fn session(&self) -> Option<&GestureSession> {
        self.session.as_ref()
    }

    #[inline]
    #[must_use]
    pub const fn is_suspended(&self) -> bool {
        self.suspended
    }

    /// Drop any open session and ignore all further input.
    pub fn suspend(&mut self) {
        self.session = None;
        self.suspended = true;
    }

    /// Route one raw input.
    pub fn dispatch(&mut self, input: &RawInput, frame: InputFrame) -> GestureDispatch {
        let input = input.normalize();
        if self.suspended {
            return GestureDispatch::ignored(&input, IgnoredReason::Suspended);
        }
        match input.class {
            InputClass::Start => self.on_start(&input, frame),
            InputClass::Move => self.on_move(&input, frame),
            InputClass::Stop(cause) => self.on_stop(&input, cause),
        }
    }

    fn on_start(&mut self, input: &NormalizedInput, frame: InputFrame) -> GestureDispatch {
        if self.session.is_some() {
            return GestureDispatch::ignored(input, IgnoredReason::GestureInProgress);
        }
        if let Some(reason) = self.reject_start(input) {
            return GestureDispatch::ignored(input, reason);
        }
        let Some(sample) = input.sample else {
            return GestureDispatch::ignored(input, IgnoredReason::MissingTouchPoint);
        };

        let anchor = PointerSample::new(
            sample.x - frame.element_offset.x,
            sample.y - frame.element_offset.y + frame.scroll_top,
        );
        self.session = Some(GestureSession {
            anchor,
            source: input.source,
        });
        crate::debug!(
            source = ?input.source,
            x = sample.x,
            y = sample.y,
            "gesture session opened"
        );
        self.forward(
            input,
            GestureSignal::Start {
                source: input.source,
            },
        )
    }

    fn on_move(&mut self, input: &NormalizedInput, frame: InputFrame) -> GestureDispatch {
        let Some(session) = self.session else {
            return GestureDispatch::ignored(input, IgnoredReason::NoActiveGesture);
        };
        let Some(sample) = input.sample else {
            return GestureDispatch::ignored(input, IgnoredReason::MissingTouchPoint);
        };
        let raw = Offset::new(
            sample.x - session.anchor.x,
            sample.y + frame.scroll_top - session.anchor.y,
        );
        self.forward(input, GestureSignal::Move { raw })
    }

    fn on_stop(&mut self, input: &NormalizedInput, cause: StopCause) -> GestureDispatch {
        if self.session.take().is_none() {
            return GestureDispatch::ignored(input, IgnoredReason::NoActiveGesture);
        }
        crate::debug!(cause = ?cause, "gesture session closed");
        self.forward(input, GestureSignal::Stop { cause })
    }

    fn reject_start(&self, input: &NormalizedInput) -> Option<IgnoredReason> {
        if let Some(button) = input.button
            && button != MouseButton::Primary
        {
            return Some(IgnoredReason::ButtonNotAllowed);
        }
        let target = input.target.as_ref();
        match &self.filter.handle {
            Some(handle) => {
                if !target.is_some_and(|t| t.has_class(handle)) {
                    return Some(IgnoredReason::OutsideHandle);
                }
            }
            None => {
                if target.is_some_and(|t| t.has_class(&self.filter.reserved_class)) {
                    return Some(IgnoredReason::ReservedControl);
                }
            }
        }
        None
    }

    fn forward(&mut self, input: &NormalizedInput, signal: GestureSignal) -> GestureDispatch {
        let sequence = self.next_sequence;
        self.next_sequence = self.next_sequence.saturating_add(1);
        GestureDispatch {
            signal: Some(signal),
            log: GestureLogEntry {
                class: input.class,
                source: input.source,
                sequence: Some(sequence),
                outcome: GestureLogOutcome::Forwarded,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{EventTarget, PointerPhase, TouchPhase};

    fn down(x: f64, y: f64) -> RawInput {
        RawInput::pointer(PointerPhase::Down, MouseButton::Primary, x, y)
    }

    fn mv(x: f64, y: f64) -> RawInput {
        RawInput::pointer(PointerPhase::Move, MouseButton::Primary, x, y)
    }

    fn up() -> RawInput {
        RawInput::pointer(PointerPhase::Up, MouseButton::Primary, 0.0, 0.0)
    }

    fn frame() -> InputFrame {
        InputFrame::default()
    }

    #[test]
    fn start_move_stop_forwards_three_signals() {
        let mut gc = GestureComposer::default();

        let start = gc.dispatch(&down(10.0, 20.0), frame());
        assert!(matches!(start.signal, Some(GestureSignal::Start { .. })));
        assert!(gc.is_active());

        let moved = gc.dispatch(&mv(15.0, 28.0), frame());
        assert_eq!(
            moved.signal,
            Some(GestureSignal::Move {
                raw: Offset::new(5.0, 8.0),
            })
        );

        let stop = gc.dispatch(&up(), frame());
        assert_eq!(
            stop.signal,
            Some(GestureSignal::Stop {
                cause: StopCause::PointerUp
            })
        );
        assert!(!gc.is_active());
    }

    #[test]
    fn anchor_subtracts_element_offset() {
        let mut gc = GestureComposer::default();
        let frame = InputFrame {
            element_offset: Offset::new(100.0, 40.0),
            scroll_top: 0.0,
        };
        gc.dispatch(&down(110.0, 50.0), frame);
        assert_eq!(
            gc.session().map(|s| s.anchor),
            Some(PointerSample::new(10.0, 10.0))
        );

        let moved = gc.dispatch(&mv(120.0, 50.0), frame);
        assert!(matches!(
            moved.signal,
            Some(GestureSignal::Move { raw, .. }) if raw == Offset::new(110.0, 40.0)
        ));
    }

    #[test]
    fn second_start_is_ignored_while_active() {
        let mut gc = GestureComposer::default();
        gc.dispatch(&down(0.0, 0.0), frame());
        let again = gc.dispatch(&down(50.0, 50.0), frame());
        assert_eq!(again.signal, None);
        assert_eq!(again.ignored_reason(), Some(IgnoredReason::GestureInProgress));
        assert_eq!(gc.session().map(|s| s.anchor), Some(PointerSample::new(0.0, 0.0)));
    }

    #[test]
    fn moves_and_stops_without_session_are_ignored() {
        let mut gc = GestureComposer::default();
        assert_eq!(
            gc.dispatch(&mv(1.0, 1.0), frame()).ignored_reason(),
            Some(IgnoredReason::NoActiveGesture)
        );
        assert_eq!(
            gc.dispatch(&up(), frame()).ignored_reason(),
            Some(IgnoredReason::NoActiveGesture)
        );
    }

    #[test]
    fn no_move_after_stop() {
        let mut gc = GestureComposer::default();
        gc.dispatch(&down(0.0, 0.0), frame());
        gc.dispatch(&up(), frame());
        let late = gc.dispatch(&mv(30.0, 30.0), frame());
        assert_eq!(late.signal, None);
    }

    #[test]
    fn secondary_button_does_not_start() {
        let mut gc = GestureComposer::default();
        let input = RawInput::pointer(PointerPhase::Down, MouseButton::Secondary, 0.0, 0.0);
        assert_eq!(
            gc.dispatch(&input, frame()).ignored_reason(),
            Some(IgnoredReason::ButtonNotAllowed)
        );
        assert!(!gc.is_active());
    }

    #[test]
    fn touch_start_qualifies_and_cancel_stops() {
        let mut gc = GestureComposer::default();
        let start = gc.dispatch(&RawInput::touch(TouchPhase::Start, Some((4.0, 4.0))), frame());
        assert!(matches!(
            start.signal,
            Some(GestureSignal::Start {
                source: InputSource::Touch,
                ..
            })
        ));
        let stop = gc.dispatch(&RawInput::touch(TouchPhase::Cancel, None), frame());
        assert_eq!(
            stop.signal,
            Some(GestureSignal::Stop {
                cause: StopCause::TouchCancel
            })
        );
    }

    #[test]
    fn channels_merge_within_one_gesture() {
        let mut gc = GestureComposer::default();
        gc.dispatch(&down(0.0, 0.0), frame());
        let touch_move = gc.dispatch(&RawInput::touch(TouchPhase::Move, Some((3.0, 4.0))), frame());
        assert!(matches!(touch_move.signal, Some(GestureSignal::Move { .. })));
        let touch_end = gc.dispatch(&RawInput::touch(TouchPhase::End, None), frame());
        assert!(matches!(
            touch_end.signal,
            Some(GestureSignal::Stop {
                cause: StopCause::TouchEnd
            })
        ));
    }

    #[test]
    fn touch_move_without_contacts_is_ignored() {
        let mut gc = GestureComposer::default();
        gc.dispatch(&RawInput::touch(TouchPhase::Start, Some((0.0, 0.0))), frame());
        let empty = gc.dispatch(&RawInput::touch(TouchPhase::Move, None), frame());
        assert_eq!(empty.ignored_reason(), Some(IgnoredReason::MissingTouchPoint));
        assert!(gc.is_active());
    }

    #[test]
    fn handle_requires_exact_target_class() {
        let mut gc = GestureComposer::new(GestureFilter {
            handle: Some("grip".into()),
            ..GestureFilter::default()
        });
        let child = down(0.0, 0.0).with_target(EventTarget::new("grip-icon"));
        assert_eq!(
            gc.dispatch(&child, frame()).ignored_reason(),
            Some(IgnoredReason::OutsideHandle)
        );
        let untargeted = down(0.0, 0.0);
        assert_eq!(
            gc.dispatch(&untargeted, frame()).ignored_reason(),
            Some(IgnoredReason::OutsideHandle)
        );
        let handle = down(0.0, 0.0).with_target(EventTarget::new("grip"));
        assert!(gc.dispatch(&handle, frame()).signal.is_some());
    }

    #[test]
    fn reserved_control_excluded_without_handle() {
        let mut gc = GestureComposer::default();
        let grip = down(0.0, 0.0).with_target(EventTarget::new("resize-handle"));
        assert_eq!(
            gc.dispatch(&grip, frame()).ignored_reason(),
            Some(IgnoredReason::ReservedControl)
        );
        let body = down(0.0, 0.0).with_target(EventTarget::new("card-body"));
        assert!(gc.dispatch(&body, frame()).signal.is_some());
    }

    #[test]
    fn scroll_is_added_to_vertical_coordinates() {
        let mut gc = GestureComposer::default();
        gc.dispatch(&down(0.0, 0.0), frame());
        let scrolled = InputFrame {
            element_offset: Offset::ZERO,
            scroll_top: 50.0,
        };
        let moved = gc.dispatch(&mv(0.0, 10.0), scrolled);
        assert!(matches!(
            moved.signal,
            Some(GestureSignal::Move { raw, .. }) if raw == Offset::new(0.0, 60.0)
        ));
    }

    #[test]
    fn sequence_numbers_increase_per_forwarded_signal() {
        let mut gc = GestureComposer::default();
        let a = gc.dispatch(&down(0.0, 0.0), frame());
        let ignored = gc.dispatch(&down(0.0, 0.0), frame());
        let b = gc.dispatch(&mv(1.0, 0.0), frame());
        let c = gc.dispatch(&up(), frame());
        assert_eq!(a.log.sequence, Some(1));
        assert_eq!(ignored.log.sequence, None);
        assert_eq!(b.log.sequence, Some(2));
        assert_eq!(c.log.sequence, Some(3));
    }

    #[test]
    fn filter_change_refused_mid_gesture() {
        let mut gc = GestureComposer::default();
        gc.dispatch(&down(0.0, 0.0), frame());
        let grip = GestureFilter {
            handle: Some("grip".into()),
            ..GestureFilter::default()
        };
        assert!(!gc.set_filter(grip.clone()));
        gc.dispatch(&up(), frame());
        assert!(gc.set_filter(grip.clone()));
        assert_eq!(gc.filter(), &grip);
    }

    #[test]
    fn suspend_drops_session_and_ignores_everything() {
        let mut gc = GestureComposer::default();
        gc.dispatch(&down(0.0, 0.0), frame());
        gc.suspend();
        assert!(!gc.is_active());
        assert!(gc.is_suspended());
        assert_eq!(
            gc.dispatch(&mv(5.0, 5.0), frame()).ignored_reason(),
            Some(IgnoredReason::Suspended)
        );
        assert_eq!(
            gc.dispatch(&down(0.0, 0.0), frame()).ignored_reason(),
            Some(IgnoredReason::Suspended)
        );
    }
}
