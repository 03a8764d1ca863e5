//! Flash elements for list and tree rows.
//!
//! Rows paint their own flash background from the coordinator's computed color, so the elements
//! built here are delegated and never clipped to scroll viewports. The compositor still tracks
//! their geometry for visibility culling.

use std::rc::Rc;

use crate::element::descriptor::{FlashElement, GeometryQuery, ItemLocator};
use crate::element::host::{ItemView, WindowHost};
use crate::foundation::core::{FlashKey, Rect, SourceId, is_valid_rect};

struct RowGeometry {
    view: Rc<dyn ItemView>,
    locator: Rc<dyn ItemLocator>,
    inset: f64,
}

impl GeometryQuery for RowGeometry {
    fn query(&mut self, window: &dyn WindowHost) -> Option<Rect> {
        let item = self.locator.locate()?;
        let wid = window.id();
        if !self.view.is_alive() || !self.view.is_visible_in(wid) {
            return None;
        }
        let row = self.view.item_rect_in_window(wid, item)?;
        let inset = row.inset(-self.inset);
        is_valid_rect(inset).then_some(inset)
    }
}

fn row_element(
    key: FlashKey,
    source: String,
    view: Rc<dyn ItemView>,
    locator: Rc<dyn ItemLocator>,
    inset: f64,
) -> FlashElement {
    let host = view.host_id();
    FlashElement::new(
        key,
        SourceId::new(source),
        RowGeometry {
            view: Rc::clone(&view),
            locator: Rc::clone(&locator),
            inset: inset.max(0.0),
        },
    )
    .without_viewport_clip()
    .delegated_to(view, Some(locator))
    .with_host(host)
}

/// Element for a tree row. `locator` re-resolves the row after the tree rebuilds its items.
pub fn tree_row_element(
    key: impl Into<FlashKey>,
    view: Rc<dyn ItemView>,
    locator: Rc<dyn ItemLocator>,
) -> FlashElement {
    let key = key.into();
    let source = format!("tree:{}:{key}", view.host_id().0);
    row_element(key, source, view, locator, 0.0)
}

/// Element for a list row, shrunk by `border_inset` on every side so the flash sits behind the
/// text and not behind the row's border.
pub fn list_row_element(
    key: impl Into<FlashKey>,
    view: Rc<dyn ItemView>,
    locator: Rc<dyn ItemLocator>,
    border_inset: f64,
) -> FlashElement {
    let key = key.into();
    let source = format!("list:{}:{key}", view.host_id().0);
    row_element(key, source, view, locator, border_inset)
}

#[cfg(test)]
#[path = "../../tests/unit/element/item.rs"]
mod tests;
