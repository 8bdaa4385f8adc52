//! Benchmark: clamp and the full per-move controller path.
//!
//! Run with: `cargo bench -p moveit-core --bench clamp_bench`
//!
//! Moves arrive at pointer rate (up to a few hundred per second on high
//! refresh displays), so both the pure clamp and the controller's move
//! handling must stay well under a microsecond.

use std::collections::HashMap;
use std::hint::black_box;
use std::time::Duration;

use criterion::{Criterion, criterion_group, criterion_main};
use moveit_core::{
    BoundingBox, DragController, DragHost, ElementId, GeometrySnapshot, MouseButton, MoveItConfig,
    Offset, PointerPhase, RawInput, StyleTarget, clamp,
};

/// Host that only stores transforms; everything else is a no-op.
#[derive(Default)]
struct BenchHost {
    viewport: Option<BoundingBox>,
    boxes: HashMap<ElementId, BoundingBox>,
    transforms: HashMap<ElementId, Offset>,
}

impl DragHost for BenchHost {
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

    fn apply_shadow_offset(&mut self, _element: ElementId, _dx: f64, _dy: f64) {}

    fn clear_shadow(&mut self, _element: ElementId) {}

    fn toggle_style_class(&mut self, _target: StyleTarget, _class: &str, _on: bool) {}

    fn set_pointer_events(&mut self, _element: ElementId, _enabled: bool) {}

    fn clear_selection(&mut self) {}
}

// ===========================================================================
// Pure clamp
// ===========================================================================

fn bench_clamp(c: &mut Criterion) {
    let mut group = c.benchmark_group("clamp");
    let geometry = GeometrySnapshot::measured(
        BoundingBox::new(1920.0, 1080.0, 0.0, 0.0),
        BoundingBox::new(320.0, 240.0, 0.0, 0.0),
    );

    group.bench_function("in_range_no_snap", |b| {
        b.iter(|| clamp(black_box(640.0), black_box(360.0), 1.0, &geometry));
    });
    group.bench_function("in_range_snap_40", |b| {
        b.iter(|| clamp(black_box(654.0), black_box(360.0), 40.0, &geometry));
    });
    group.bench_function("pinned_right_bottom", |b| {
        b.iter(|| clamp(black_box(5000.0), black_box(5000.0), 40.0, &geometry));
    });
    group.finish();
}

// ===========================================================================
// Controller move path
// ===========================================================================

fn bench_controller_move(c: &mut Criterion) {
    let element = ElementId(1);
    let mut host = BenchHost {
        viewport: Some(BoundingBox::new(1920.0, 1080.0, 0.0, 0.0)),
        ..BenchHost::default()
    };
    host.boxes
        .insert(element, BoundingBox::new(320.0, 240.0, 0.0, 0.0));

    let mut ctrl = DragController::new(element, MoveItConfig::new().with_column_width(40.0));
    ctrl.mount(&mut host, Duration::ZERO);
    ctrl.tick(&host, ctrl.config().settle_delay());
    ctrl.handle_input(
        &mut host,
        &RawInput::pointer(PointerPhase::Down, MouseButton::Primary, 100.0, 100.0),
    );

    let mut x = 100.0;
    c.bench_function("controller_move", |b| {
        b.iter(|| {
            x = if x > 2000.0 { 0.0 } else { x + 7.0 };
            let input = RawInput::pointer(PointerPhase::Move, MouseButton::Primary, x, 300.0);
            black_box(ctrl.handle_input(&mut host, &input))
        });
    });
}

criterion_group!(benches, bench_clamp, bench_controller_move);
criterion_main!(benches);
