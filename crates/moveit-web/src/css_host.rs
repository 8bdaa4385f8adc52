#![forbid(unsafe_code)]

//! In-memory CSS host.
//!
//! [`CssHost`] keeps the inline style of every element the engine touches as
//! the strings a browser would hold (`transform`, `filter`,
//! `pointer-events`, class list) and answers measurement queries from layout
//! boxes pushed in by the embedder. The engine's live offset is read back by
//! parsing the transform string, the same side channel a DOM embedder uses.

use std::collections::{BTreeSet, HashMap};

use moveit_core::{BoundingBox, DragHost, ElementId, Offset, StyleTarget};

use crate::style::{
    FILTER_UNSET, drop_shadow_css, parse_drop_shadow_offset, parse_transform, transform_css,
};

/// Inline style of one element.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct InlineStyle {
    pub transform: String,
    pub filter: String,
    pub pointer_events: String,
    pub classes: BTreeSet<String>,
    /// `Some(false)` once native drag-and-drop has been disabled.
    pub draggable: Option<bool>,
}

impl InlineStyle {
    #[must_use]
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.contains(class)
    }
}

#[derive(Debug, Clone, Default)]
pub struct CssHost {
    viewport: Option<BoundingBox>,
    layout: HashMap<ElementId, BoundingBox>,
    styles: HashMap<ElementId, InlineStyle>,
    body_classes: BTreeSet<String>,
    selection_clears: u64,
}

impl CssHost {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Host with a laid-out viewport of `width x height`.
    #[must_use]
    pub fn with_viewport(width: f64, height: f64) -> Self {
        Self {
            viewport: Some(BoundingBox::new(width, height, 0.0, 0.0)),
            ..Self::default()
        }
    }

    /// Replace the viewport box, keeping its scroll position.
    pub fn set_viewport(&mut self, bbox: BoundingBox) {
        let scroll_top = self.viewport.map_or(bbox.scroll_top, |v| v.scroll_top);
        self.viewport = Some(bbox.with_scroll_top(scroll_top));
    }

    /// Push a layout box for `element`, keeping its scroll position.
    pub fn set_layout(&mut self, element: ElementId, bbox: BoundingBox) {
        let scroll_top = self
            .layout
            .get(&element)
            .map_or(bbox.scroll_top, |b| b.scroll_top);
        self.layout.insert(element, bbox.with_scroll_top(scroll_top));
    }

    /// Forget `element`'s layout (unmounted).
    pub fn remove_layout(&mut self, element: ElementId) {
        self.layout.remove(&element);
    }

    /// Scroll the viewport (`None`) or a container element.
    pub fn scroll_to(&mut self, element: Option<ElementId>, scroll_top: f64) {
        let bbox = match element {
            None => self.viewport.as_mut(),
            Some(id) => self.layout.get_mut(&id),
        };
        match bbox {
            Some(bbox) => bbox.scroll_top = scroll_top,
            None => tracing::debug!(?element, "scroll on an element without layout ignored"),
        }
    }

    #[must_use]
    pub fn style(&self, element: ElementId) -> Option<&InlineStyle> {
        self.styles.get(&element)
    }

    #[must_use]
    pub fn body_classes(&self) -> &BTreeSet<String> {
        &self.body_classes
    }

    #[must_use]
    pub const fn selection_clears(&self) -> u64 {
        self.selection_clears
    }

    /// Shadow displacement currently rendered on `element`.
    #[must_use]
    pub fn residual_shadow(&self, element: ElementId) -> Offset {
        self.styles
            .get(&element)
            .map_or(Offset::ZERO, |s| parse_drop_shadow_offset(&s.filter))
    }

    fn style_mut(&mut self, element: ElementId) -> &mut InlineStyle {
        self.styles.entry(element).or_default()
    }
}

impl DragHost for CssHost {
    fn measure_viewport(&self) -> Option<BoundingBox> {
        self.viewport
    }

    fn measure_element(&self, element: ElementId) -> Option<BoundingBox> {
        self.layout.get(&element).copied()
    }

    fn current_transform(&self, element: ElementId) -> Option<Offset> {
        self.styles
            .get(&element)
            .and_then(|s| parse_transform(&s.transform))
    }

    fn apply_transform(&mut self, element: ElementId, offset: Offset) {
        self.style_mut(element).transform = transform_css(offset);
    }

    fn apply_shadow_offset(&mut self, element: ElementId, dx: f64, dy: f64) {
        self.style_mut(element).filter = drop_shadow_css(dx, dy);
    }

    fn clear_shadow(&mut self, element: ElementId) {
        self.style_mut(element).filter = FILTER_UNSET.to_string();
    }

    fn toggle_style_class(&mut self, target: StyleTarget, class: &str, on: bool) {
        let classes = match target {
            StyleTarget::Element(id) => &mut self.style_mut(id).classes,
            StyleTarget::DocumentBody => &mut self.body_classes,
        };
        if on {
            classes.insert(class.to_string());
        } else {
            classes.remove(class);
        }
    }

    fn set_pointer_events(&mut self, element: ElementId, enabled: bool) {
        self.style_mut(element).pointer_events = if enabled { "unset" } else { "none" }.to_string();
    }

    fn clear_selection(&mut self) {
        self.selection_clears += 1;
    }

    fn disable_native_drag(&mut self, element: ElementId) {
        self.style_mut(element).draggable = Some(false);
    }
}
