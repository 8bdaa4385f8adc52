#![forbid(unsafe_code)]

//! Core: gesture composition, bounds/grid clamping, and resize-aware
//! repositioning for a single draggable element.
//!
//! # Role in MoveIt
//! `moveit-core` is the headless engine. It never touches a DOM: the embedder
//! implements [`DragHost`] to measure boxes and apply transforms, shadows and
//! classes, then feeds raw pointer/touch inputs, resize notifications and
//! clock ticks into a [`DragController`].
//!
//! # Primary responsibilities
//! - **GestureComposer**: merges pointer and touch channels into exactly one
//!   start/move/stop gesture at a time, with handle filtering.
//! - **clamp**: grid snapping, container confinement and edge flags.
//! - **DragController**: the Idle/Dragging state machine, host side effects
//!   and lifecycle events.
//! - **ResizeReactor**: proportional repositioning from the last finalized
//!   ratios.
//!
//! # How it fits in the system
//! `moveit-web` provides a CSS-flavoured [`DragHost`] and a JSONL input trace
//! for deterministic replay; both drive this crate's controller.

pub mod clamp;
pub mod config;
pub mod error;
pub mod event;
pub mod geometry;
pub mod gesture;
pub mod host;
pub mod input;
pub mod logging;
pub mod resize;
pub mod session;
pub mod settle;

// Re-export tracing macros at crate root for ergonomic use.
#[cfg(feature = "tracing")]
pub use logging::{debug, error, info, trace, trace_span, warn};

pub use clamp::{ClampedPosition, Edges, clamp};
pub use config::MoveItConfig;
pub use error::{MoveItError, Result};
pub use event::{DragEvent, DragMovePosition, DragStartPosition};
pub use geometry::{BoundingBox, GeometrySnapshot, Offset, Ratios};
pub use gesture::{GestureComposer, GestureFilter, IgnoredReason};
pub use host::{Bounds, DragHost, ElementId, StyleTarget};
pub use input::{MouseButton, PointerPhase, RawInput, TouchPhase};
pub use session::{DragController, DragDispatch};
