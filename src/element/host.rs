//! Capability traits implemented by the host UI toolkit.
//!
//! The engine never touches toolkit types. Each trait covers one group of queries the
//! coordinator and compositors need; adapters over a real toolkit are expected to be thin.
//! Every query must tolerate a destroyed host: return `false`, `None`, or an empty list.

use std::rc::Rc;

use crate::foundation::core::{HostId, ItemHandle, Rect, Size, WindowId};

/// One top-level window as seen by its compositor.
pub trait WindowHost {
    /// Stable window handle.
    fn id(&self) -> WindowId;

    /// `false` while hidden or minimized; the coordinator skips such windows.
    fn is_visible(&self) -> bool;

    /// Size of the window-wide overlay surface.
    fn size(&self) -> Size;

    /// Visible scroll viewports, in window-local coordinates.
    fn scroll_viewports(&self) -> Vec<Rect>;

    /// Schedule a repaint of the window's overlay.
    fn request_repaint(&self);

    /// Overlay bounds in window-local coordinates.
    fn bounds(&self) -> Rect {
        Rect::from_origin_size((0.0, 0.0), self.size())
    }
}

/// Any host widget a flash element can be attached to.
pub trait HostWidget {
    /// Stable widget handle.
    fn host_id(&self) -> HostId;

    /// `false` once the toolkit has destroyed the widget.
    fn is_alive(&self) -> bool;

    /// Top-level window the widget currently belongs to, if attached.
    fn window(&self) -> Option<WindowId>;
}

/// Widget that can be located inside a window.
pub trait WidgetGeometry: HostWidget {
    /// `true` when the widget is shown in `window` (e.g. not on a hidden tab page).
    fn is_visible_in(&self, window: WindowId) -> bool;

    /// Widget bounds mapped into `window`'s coordinates.
    fn rect_in_window(&self, window: WindowId) -> Option<Rect>;
}

/// Labeled container of fields (a group box).
pub trait ContainerWidget: WidgetGeometry {
    /// Margin above the painted frame that still belongs to the widget's geometry.
    fn painted_top_inset(&self) -> f64 {
        0.0
    }

    /// Height of the title row, measured from the top of the widget.
    fn title_height(&self) -> f64;

    /// Frame corner radius; `0` lets the element pick a default.
    fn corner_radius(&self) -> f64 {
        0.0
    }

    /// Leaf widgets (inputs, labels, buttons) nested anywhere inside the container.
    fn leaf_children(&self) -> Vec<Rc<dyn WidgetGeometry>>;
}

/// List or tree view whose rows paint their own flash background.
pub trait ItemView: WidgetGeometry {
    /// Row bounds mapped into `window`'s coordinates.
    fn item_rect_in_window(&self, window: WindowId, item: ItemHandle) -> Option<Rect>;

    /// Repaint a single row.
    fn request_item_repaint(&self, item: ItemHandle);

    /// Repaint the whole visible viewport.
    fn request_viewport_repaint(&self);
}
