#![forbid(unsafe_code)]

//! Host binding: the narrow rendering surface the engine calls into.
//!
//! The engine never touches a DOM (or any other scene graph) directly. The
//! embedding layer implements [`DragHost`] to measure boxes, report the live
//! transform, and apply transform/shadow/class mutations. Everything is
//! synchronous and called from inside the host's own event dispatch.

use serde::{Deserialize, Serialize};

use crate::geometry::{BoundingBox, Offset};

/// Opaque handle to a host element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementId(pub u64);

/// Region the draggable is confined to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", content = "element", rename_all = "snake_case")]
pub enum Bounds {
    /// The whole document viewport. Resizes reposition proportionally.
    #[default]
    Viewport,
    /// A specific container element.
    Container(ElementId),
}

impl Bounds {
    #[inline]
    #[must_use]
    pub const fn is_viewport(&self) -> bool {
        matches!(self, Self::Viewport)
    }
}

/// Where a style class toggle lands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StyleTarget {
    Element(ElementId),
    DocumentBody,
}

/// Rendering and measurement primitives supplied by the embedder.
pub trait DragHost {
    /// Bounding box of the document viewport, `None` before first layout.
    fn measure_viewport(&self) -> Option<BoundingBox>;

    /// Bounding box of `element`, `None` while it is not mounted.
    fn measure_element(&self, element: ElementId) -> Option<BoundingBox>;

    /// Offset currently applied to `element` by its visual transform.
    fn current_transform(&self, element: ElementId) -> Option<Offset>;

    /// Overwrite the visual transform of `element`.
    fn apply_transform(&mut self, element: ElementId, offset: Offset);

    /// Render the bound-feedback shadow displaced by `(dx, dy)`.
    fn apply_shadow_offset(&mut self, element: ElementId, dx: f64, dy: f64);

    fn clear_shadow(&mut self, element: ElementId);

    fn toggle_style_class(&mut self, target: StyleTarget, class: &str, on: bool);

    /// Enable or disable native pointer interaction on `element` (and its
    /// children, e.g. images that would otherwise start a native drag).
    fn set_pointer_events(&mut self, element: ElementId, enabled: bool);

    /// Drop any text selection made while dragging.
    fn clear_selection(&mut self);

    /// Opt `element` out of the platform's native drag-and-drop.
    fn disable_native_drag(&mut self, _element: ElementId) {}
}
