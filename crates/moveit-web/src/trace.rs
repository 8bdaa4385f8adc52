#![forbid(unsafe_code)]

//! Deterministic input traces: record, serialize as JSONL, replay.
//!
//! # Design
//!
//! Follows the `moveit-trace-v1` schema, one JSON object per line:
//!
//! - **header**: schema version, draggable element, controller config.
//!   Must be first and appear once.
//! - **layout**: a layout box pushed for the viewport (no `element`) or an
//!   element.
//! - **scroll**: scroll position of the viewport or a container.
//! - **input**: a pointer or touch event, encoded with a `kind` tag.
//! - **resize**: a window/container resize notification.
//! - **dimensions**: a new value of the dimensions-changed counter.
//! - **tick**: the host clock reached `ts_ms`.
//!
//! # Determinism contract
//!
//! Replaying a trace into a fresh controller and [`CssHost`] yields the same
//! events on every run: the clock only advances through tick records and
//! layout only changes through layout and scroll records.

use core::time::Duration;

use moveit_core::input::{EventTarget, PointerInput, TouchInput, TouchPoint};
use moveit_core::{
    BoundingBox, DragController, DragEvent, ElementId, MouseButton, MoveItConfig, PointerPhase,
    RawInput, TouchPhase,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::css_host::CssHost;

/// Schema version for input traces.
pub const SCHEMA_VERSION: &str = "moveit-trace-v1";

/// Errors reading, writing or replaying a trace.
#[derive(Debug, Error)]
pub enum TraceError {
    #[error("line {line}: {source}")]
    Parse {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("encode error: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("trace missing header record")]
    MissingHeader,

    #[error("line {line}: header record after the first line")]
    MisplacedHeader { line: usize },

    #[error("unsupported trace schema {found:?} (expected {SCHEMA_VERSION})")]
    UnsupportedSchema { found: String },

    #[error("line {line}: timestamp {found}ms precedes {previous}ms")]
    TimeWentBackwards { line: usize, previous: u64, found: u64 },
}

/// JSON encoding of one raw input.
///
/// A `kind` tag plus the minimum semantic fields needed for replay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InputJson {
    Pointer {
        phase: PointerPhase,
        button: u8,
        x: f64,
        y: f64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        target: Option<String>,
    },
    Touch {
        phase: TouchPhase,
        touches: Vec<TouchPoint>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        target: Option<String>,
    },
}

impl From<&RawInput> for InputJson {
    fn from(value: &RawInput) -> Self {
        match value {
            RawInput::Pointer(p) => Self::Pointer {
                phase: p.phase,
                button: p.button.to_u8(),
                x: p.x,
                y: p.y,
                target: p.target.as_ref().map(|t| t.class_name.clone()),
            },
            RawInput::Touch(t) => Self::Touch {
                phase: t.phase,
                touches: t.touches.clone(),
                target: t.target.as_ref().map(|t| t.class_name.clone()),
            },
        }
    }
}

impl From<InputJson> for RawInput {
    fn from(value: InputJson) -> Self {
        match value {
            InputJson::Pointer {
                phase,
                button,
                x,
                y,
                target,
            } => Self::Pointer(PointerInput {
                phase,
                button: MouseButton::from_u8(button),
                x,
                y,
                target: target.map(EventTarget::new),
            }),
            InputJson::Touch {
                phase,
                touches,
                target,
            } => Self::Touch(TouchInput {
                phase,
                touches,
                target: target.map(EventTarget::new),
            }),
        }
    }
}

/// A single line of a trace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TraceRecord {
    Header {
        schema: String,
        element: ElementId,
        config: MoveItConfig,
    },
    Layout {
        ts_ms: u64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        element: Option<ElementId>,
        bbox: BoundingBox,
    },
    Scroll {
        ts_ms: u64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        element: Option<ElementId>,
        scroll_top: f64,
    },
    Input {
        ts_ms: u64,
        input: InputJson,
    },
    Resize {
        ts_ms: u64,
    },
    Dimensions {
        ts_ms: u64,
        value: u64,
    },
    Tick {
        ts_ms: u64,
    },
}

impl TraceRecord {
    #[must_use]
    pub const fn ts_ms(&self) -> Option<u64> {
        match self {
            Self::Header { .. } => None,
            Self::Layout { ts_ms, .. }
            | Self::Scroll { ts_ms, .. }
            | Self::Input { ts_ms, .. }
            | Self::Resize { ts_ms }
            | Self::Dimensions { ts_ms, .. }
            | Self::Tick { ts_ms } => Some(*ts_ms),
        }
    }
}

/// A complete recorded trace.
#[derive(Debug, Clone, PartialEq)]
pub struct InputTrace {
    pub records: Vec<TraceRecord>,
}

impl InputTrace {
    /// Draggable element and configuration from the header record.
    #[must_use]
    pub fn header(&self) -> Option<(ElementId, &MoveItConfig)> {
        match self.records.first() {
            Some(TraceRecord::Header {
                element, config, ..
            }) => Some((*element, config)),
            _ => None,
        }
    }

    /// Number of input records.
    #[must_use]
    pub fn input_count(&self) -> usize {
        self.records
            .iter()
            .filter(|r| matches!(r, TraceRecord::Input { .. }))
            .count()
    }

    /// One JSON object per line, newline terminated.
    pub fn to_jsonl(&self) -> Result<String, TraceError> {
        let mut out = String::new();
        for record in &self.records {
            out.push_str(&serde_json::to_string(record)?);
            out.push('\n');
        }
        Ok(out)
    }

    /// Parse and validate a JSONL trace. Blank lines are skipped.
    pub fn from_jsonl(s: &str) -> Result<Self, TraceError> {
        let mut records = Vec::new();
        let mut previous_ts = 0u64;
        for (idx, raw) in s.lines().enumerate() {
            let line = idx + 1;
            if raw.trim().is_empty() {
                continue;
            }
            let record: TraceRecord =
                serde_json::from_str(raw).map_err(|source| TraceError::Parse { line, source })?;
            match &record {
                TraceRecord::Header { schema, .. } => {
                    if !records.is_empty() {
                        return Err(TraceError::MisplacedHeader { line });
                    }
                    if schema != SCHEMA_VERSION {
                        return Err(TraceError::UnsupportedSchema {
                            found: schema.clone(),
                        });
                    }
                }
                _ if records.is_empty() => return Err(TraceError::MissingHeader),
                _ => {}
            }
            if let Some(ts) = record.ts_ms() {
                if ts < previous_ts {
                    return Err(TraceError::TimeWentBackwards {
                        line,
                        previous: previous_ts,
                        found: ts,
                    });
                }
                previous_ts = ts;
            }
            records.push(record);
        }
        if records.is_empty() {
            return Err(TraceError::MissingHeader);
        }
        Ok(Self { records })
    }

    /// Replay into a fresh controller and host built from the header.
    pub fn replay(&self) -> Result<(ReplayOutcome, CssHost), TraceError> {
        let (element, config) = self.header().ok_or(TraceError::MissingHeader)?;
        let mut controller = DragController::new(element, config.clone());
        let mut host = CssHost::new();
        let outcome = replay(&mut controller, &mut host, self)?;
        Ok((outcome, host))
    }
}

/// Records what an embedder fed to its controller.
#[derive(Debug, Clone)]
pub struct TraceRecorder {
    records: Vec<TraceRecord>,
    last_ts_ms: u64,
}

impl TraceRecorder {
    #[must_use]
    pub fn new(element: ElementId, config: MoveItConfig) -> Self {
        Self {
            records: vec![TraceRecord::Header {
                schema: SCHEMA_VERSION.to_string(),
                element,
                config,
            }],
            last_ts_ms: 0,
        }
    }

    /// Timestamps earlier than the last recorded one are raised to it.
    fn stamp(&mut self, ts_ms: u64) -> u64 {
        if ts_ms < self.last_ts_ms {
            tracing::warn!(
                ts_ms,
                last = self.last_ts_ms,
                "non-monotonic timestamp recorded as the previous one"
            );
        }
        self.last_ts_ms = self.last_ts_ms.max(ts_ms);
        self.last_ts_ms
    }

    pub fn layout(&mut self, ts_ms: u64, element: Option<ElementId>, bbox: BoundingBox) {
        let ts_ms = self.stamp(ts_ms);
        self.records.push(TraceRecord::Layout {
            ts_ms,
            element,
            bbox,
        });
    }

    pub fn scroll(&mut self, ts_ms: u64, element: Option<ElementId>, scroll_top: f64) {
        let ts_ms = self.stamp(ts_ms);
        self.records.push(TraceRecord::Scroll {
            ts_ms,
            element,
            scroll_top,
        });
    }

    pub fn input(&mut self, ts_ms: u64, input: &RawInput) {
        let ts_ms = self.stamp(ts_ms);
        self.records.push(TraceRecord::Input {
            ts_ms,
            input: InputJson::from(input),
        });
    }

    pub fn resize(&mut self, ts_ms: u64) {
        let ts_ms = self.stamp(ts_ms);
        self.records.push(TraceRecord::Resize { ts_ms });
    }

    pub fn dimensions(&mut self, ts_ms: u64, value: u64) {
        let ts_ms = self.stamp(ts_ms);
        self.records.push(TraceRecord::Dimensions { ts_ms, value });
    }

    pub fn tick(&mut self, ts_ms: u64) {
        let ts_ms = self.stamp(ts_ms);
        self.records.push(TraceRecord::Tick { ts_ms });
    }

    #[must_use]
    pub fn finish(self) -> InputTrace {
        InputTrace {
            records: self.records,
        }
    }
}

/// What a replay produced.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ReplayOutcome {
    /// Every emitted event, in order (input and resize).
    pub events: Vec<DragEvent>,
    /// Inputs the gesture composer ignored.
    pub ignored: usize,
}

impl ReplayOutcome {
    #[must_use]
    pub fn stop_events(&self) -> impl Iterator<Item = &DragEvent> {
        self.events
            .iter()
            .filter(|e| matches!(e, DragEvent::Stop(_)))
    }
}

/// Drive `controller` and `host` through `trace`.
///
/// The header mounts the controller at time zero.
pub fn replay(
    controller: &mut DragController,
    host: &mut CssHost,
    trace: &InputTrace,
) -> Result<ReplayOutcome, TraceError> {
    let Some((element, _)) = trace.header() else {
        return Err(TraceError::MissingHeader);
    };
    if element != controller.element() {
        tracing::warn!(
            trace_element = element.0,
            controller_element = controller.element().0,
            "replaying a trace recorded for a different element"
        );
    }

    let mut outcome = ReplayOutcome::default();
    for record in &trace.records {
        match record {
            TraceRecord::Header { .. } => controller.mount(host, Duration::ZERO),
            TraceRecord::Layout {
                element: None,
                bbox,
                ..
            } => host.set_viewport(*bbox),
            TraceRecord::Layout {
                element: Some(id),
                bbox,
                ..
            } => host.set_layout(*id, *bbox),
            TraceRecord::Scroll {
                element,
                scroll_top,
                ..
            } => host.scroll_to(*element, *scroll_top),
            TraceRecord::Input { input, .. } => {
                let raw = RawInput::from(input.clone());
                let dispatch = controller.handle_input(host, &raw);
                match dispatch.event {
                    Some(event) => outcome.events.push(event),
                    None if dispatch.log.sequence.is_none() => outcome.ignored += 1,
                    None => {}
                }
            }
            TraceRecord::Resize { .. } => outcome.events.extend(controller.handle_resize(host)),
            TraceRecord::Dimensions { value, .. } => {
                controller.set_dimensions_signal(host, *value);
            }
            TraceRecord::Tick { ts_ms } => {
                controller.tick(host, Duration::from_millis(*ts_ms));
            }
        }
    }
    tracing::debug!(
        events = outcome.events.len(),
        ignored = outcome.ignored,
        "trace replayed"
    );
    Ok(outcome)
}
