//! Shared in-memory host for integration tests.

#![allow(dead_code)]

use std::collections::{BTreeSet, HashMap};
use std::time::Duration;

use moveit_core::{
    BoundingBox, DragController, DragEvent, DragHost, ElementId, MouseButton, MoveItConfig,
    Offset, PointerPhase, RawInput, StyleTarget,
};

pub const EL: ElementId = ElementId(1);
pub const SETTLED: Duration = Duration::from_millis(200);

/// Records every mutation the controller performs.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct RecordingHost {
    pub viewport: Option<BoundingBox>,
    pub boxes: HashMap<ElementId, BoundingBox>,
    pub transforms: HashMap<ElementId, Offset>,
    pub shadows: HashMap<ElementId, (f64, f64)>,
    pub element_classes: HashMap<ElementId, BTreeSet<String>>,
    pub body_classes: BTreeSet<String>,
    pub pointer_events: HashMap<ElementId, bool>,
    pub selection_clears: usize,
}

impl RecordingHost {
    pub fn viewport(width: f64, height: f64) -> Self {
        Self {
            viewport: Some(BoundingBox::new(width, height, 0.0, 0.0)),
            ..Self::default()
        }
    }

    pub fn with_element(mut self, id: ElementId, width: f64, height: f64) -> Self {
        self.boxes.insert(id, BoundingBox::new(width, height, 0.0, 0.0));
        self
    }

    pub fn resize_viewport(&mut self, width: f64, height: f64) {
        let scroll_top = self.viewport.map_or(0.0, |v| v.scroll_top);
        self.viewport = Some(BoundingBox::new(width, height, 0.0, 0.0).with_scroll_top(scroll_top));
    }

    pub fn scroll_to(&mut self, scroll_top: f64) {
        if let Some(v) = self.viewport.as_mut() {
            v.scroll_top = scroll_top;
        }
    }
}

impl DragHost for RecordingHost {
    fn measure_viewport(&self) -> Option<BoundingBox> {
        self.viewport
    }

    fn measure_element(&self, element: ElementId) -> Option<BoundingBox> {
        self.boxes.get(&element).copied()
    }

    fn current_transform(&self, element: ElementId) -> Option<Offset> {
        self.transforms.get(&element).copied()
    }

    fn apply_transform(&mut self, element: ElementId, offset: Offset) {
        self.transforms.insert(element, offset);
    }

    fn apply_shadow_offset(&mut self, element: ElementId, dx: f64, dy: f64) {
        self.shadows.insert(element, (dx, dy));
    }

    fn clear_shadow(&mut self, element: ElementId) {
        self.shadows.remove(&element);
    }

    fn toggle_style_class(&mut self, target: StyleTarget, class: &str, on: bool) {
        let set = match target {
            StyleTarget::Element(id) => self.element_classes.entry(id).or_default(),
            StyleTarget::DocumentBody => &mut self.body_classes,
        };
        if on {
            set.insert(class.to_string());
        } else {
            set.remove(class);
        }
    }

    fn set_pointer_events(&mut self, element: ElementId, enabled: bool) {
        self.pointer_events.insert(element, enabled);
    }

    fn clear_selection(&mut self) {
        self.selection_clears += 1;
    }
}

/// Mount a controller and let the settle timer fire.
pub fn settled(host: &mut RecordingHost, config: MoveItConfig) -> DragController {
    let mut ctrl = DragController::new(EL, config);
    ctrl.mount(host, Duration::ZERO);
    assert!(ctrl.tick(host, SETTLED), "geometry should be measurable");
    ctrl
}

pub fn down(x: f64, y: f64) -> RawInput {
    RawInput::pointer(PointerPhase::Down, MouseButton::Primary, x, y)
}

pub fn mv(x: f64, y: f64) -> RawInput {
    RawInput::pointer(PointerPhase::Move, MouseButton::Primary, x, y)
}

pub fn up() -> RawInput {
    RawInput::pointer(PointerPhase::Up, MouseButton::Primary, 0.0, 0.0)
}

/// Feed inputs in order and collect the emitted events.
pub fn drive(
    ctrl: &mut DragController,
    host: &mut RecordingHost,
    inputs: &[RawInput],
) -> Vec<DragEvent> {
    inputs
        .iter()
        .filter_map(|input| ctrl.handle_input(host, input).event)
        .collect()
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct EventCounts {
    pub starts: usize,
    pub moves: usize,
    pub stops: usize,
}

pub fn count(events: &[DragEvent]) -> EventCounts {
    let mut counts = EventCounts::default();
    for event in events {
        match event {
            DragEvent::Start(_) => counts.starts += 1,
            DragEvent::Move(_) => counts.moves += 1,
            DragEvent::Stop(_) => counts.stops += 1,
        }
    }
    counts
}
