//! Flash elements for labeled containers (group boxes).
//!
//! Two masking modes:
//! - standard ([`container_element`]): the frame and background flash, every leaf child is
//!   masked out;
//! - inverse ([`leaf_in_container_element`]): the frame and every sibling row flash, only the
//!   title row and the changed leaf's row are masked out.

use std::rc::Rc;

use crate::element::descriptor::{ChildExclusion, FlashElement, GeometryQuery};
use crate::element::host::{ContainerWidget, WidgetGeometry, WindowHost};
use crate::foundation::core::{FlashKey, Rect, Size, SourceId, is_valid_rect};

/// Corner radius used when the container reports none.
pub const DEFAULT_CORNER_RADIUS: f64 = 6.0;

/// Slack added to half the taller row height when matching children to the leaf's row.
pub const ROW_MATCH_TOLERANCE: f64 = 5.0;

/// Container bounds below the painted-area inset.
struct ContainerGeometry {
    container: Rc<dyn ContainerWidget>,
}

impl GeometryQuery for ContainerGeometry {
    fn query(&mut self, window: &dyn WindowHost) -> Option<Rect> {
        let wid = window.id();
        if !self.container.is_alive() || !self.container.is_visible_in(wid) {
            return None;
        }
        let r = self.container.rect_in_window(wid)?;
        let inset = self.container.painted_top_inset().clamp(0.0, r.height());
        let out = Rect::new(r.x0, r.y0 + inset, r.x1, r.y1);
        is_valid_rect(out).then_some(out)
    }
}

/// Masks every leaf child. The child list is cached until the container changes size.
struct StandardMask {
    container: Rc<dyn ContainerWidget>,
    children: Option<Vec<Rc<dyn WidgetGeometry>>>,
    last_size: Option<Size>,
}

impl ChildExclusion for StandardMask {
    fn exclusion_rects(&mut self, window: &dyn WindowHost) -> Vec<Rect> {
        let wid = window.id();
        if !self.container.is_alive() || !self.container.is_visible_in(wid) {
            return Vec::new();
        }
        let Some(bounds) = self.container.rect_in_window(wid) else {
            return Vec::new();
        };

        let size = bounds.size();
        if self.last_size != Some(size) {
            self.children = None;
            self.last_size = Some(size);
        }
        let container = &self.container;
        let children = self.children.get_or_insert_with(|| {
            tracing::debug!(host = container.host_id().0, "scanning container children");
            container.leaf_children()
        });

        children
            .iter()
            .filter(|c| c.is_alive() && c.is_visible_in(wid))
            .filter_map(|c| c.rect_in_window(wid))
            .collect()
    }

    fn invalidate(&mut self) {
        self.children = None;
        self.last_size = None;
    }
}

/// Masks the title row and the leaf's own row.
struct InverseMask {
    container: Rc<dyn ContainerWidget>,
    leaf: Rc<dyn WidgetGeometry>,
}

impl ChildExclusion for InverseMask {
    fn exclusion_rects(&mut self, window: &dyn WindowHost) -> Vec<Rect> {
        let wid = window.id();
        if !self.container.is_alive() || !self.container.is_visible_in(wid) {
            return Vec::new();
        }
        if !self.leaf.is_alive() || !self.leaf.is_visible_in(wid) {
            return Vec::new();
        }
        let (Some(bounds), Some(leaf)) = (
            self.container.rect_in_window(wid),
            self.leaf.rect_in_window(wid),
        ) else {
            return Vec::new();
        };

        let title_bottom = bounds.y0 + self.container.title_height();
        let leaf_center = leaf.center().y;

        self.container
            .leaf_children()
            .iter()
            .filter(|c| c.is_alive() && c.is_visible_in(wid))
            .filter_map(|c| c.rect_in_window(wid))
            .filter(|child| {
                let in_title_row = child.y0 < title_bottom;
                let band = leaf.height().max(child.height()) / 2.0 + ROW_MATCH_TOLERANCE;
                let in_leaf_row = (child.center().y - leaf_center).abs() < band;
                in_title_row || in_leaf_row
            })
            .collect()
    }
}

fn container_radius(container: &dyn ContainerWidget) -> f64 {
    let r = container.corner_radius();
    if r > 0.0 { r } else { DEFAULT_CORNER_RADIUS }
}

/// Standard-mode element: flash the container frame, mask every leaf child.
pub fn container_element(key: impl Into<FlashKey>, container: Rc<dyn ContainerWidget>) -> FlashElement {
    let host = container.host_id();
    let radius = container_radius(&*container);
    FlashElement::new(
        key,
        SourceId::new(format!("group:{}", host.0)),
        ContainerGeometry {
            container: Rc::clone(&container),
        },
    )
    .with_exclusion(StandardMask {
        container,
        children: None,
        last_size: None,
    })
    .with_corner_radius(radius)
    .with_host(host)
}

/// Inverse-mode element: flash the container and sibling rows, mask the title and `leaf`'s row.
pub fn leaf_in_container_element(
    key: impl Into<FlashKey>,
    container: Rc<dyn ContainerWidget>,
    leaf: Rc<dyn WidgetGeometry>,
) -> FlashElement {
    let host = container.host_id();
    let radius = container_radius(&*container);
    FlashElement::new(
        key,
        SourceId::new(format!("leaf:{}:{}", host.0, leaf.host_id().0)),
        ContainerGeometry {
            container: Rc::clone(&container),
        },
    )
    .with_exclusion(InverseMask { container, leaf })
    .with_corner_radius(radius)
    .with_host(host)
}

/// Plain field element: flash the widget's own bounds.
pub fn widget_element(key: impl Into<FlashKey>, widget: Rc<dyn WidgetGeometry>) -> FlashElement {
    let host = widget.host_id();
    FlashElement::new(
        key,
        SourceId::new(format!("widget:{}", host.0)),
        move |window: &dyn WindowHost| {
            let wid = window.id();
            if !widget.is_alive() || !widget.is_visible_in(wid) {
                return None;
            }
            widget.rect_in_window(wid)
        },
    )
    .with_host(host)
}

#[cfg(test)]
#[path = "../../tests/unit/element/container.rs"]
mod tests;
