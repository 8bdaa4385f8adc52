#![forbid(unsafe_code)]

//! Web-flavoured host for the MoveIt drag engine.
//!
//! # Role in MoveIt
//! `moveit-web` sits between `moveit-core` and a browser embedder. It owns
//! the exact inline-style strings the engine's side effects produce and a
//! deterministic trace format for recording and replaying gestures.
//!
//! # Primary responsibilities
//! - **style**: `translateX/translateY` transforms and `drop-shadow` filter
//!   strings, formatting and lenient parsing.
//! - **CssHost**: an in-memory [`moveit_core::DragHost`] that stores inline
//!   styles, class lists and layout boxes.
//! - **trace**: JSONL input traces (`moveit-trace-v1`) with a recorder and a
//!   replay driver.

pub mod css_host;
pub mod style;
pub mod trace;

pub use css_host::{CssHost, InlineStyle};
pub use style::{
    FILTER_UNSET, SHADOW_COLOR, drop_shadow_css, parse_drop_shadow_offset, parse_transform,
    transform_css,
};
pub use trace::{
    InputJson, InputTrace, ReplayOutcome, SCHEMA_VERSION, TraceError, TraceRecord, TraceRecorder,
    replay,
};
