use std::fmt;
use std::rc::Rc;

use crate::element::host::{ItemView, WindowHost};
use crate::foundation::core::{FlashKey, HostId, ItemHandle, Rect, SourceId};

/// Locates an element's bounds in a window.
pub trait GeometryQuery {
    /// Bounds in window-local coordinates, or `None` when the element is not visible to `window`
    /// (hidden tab, scrolled-away row, destroyed host).
    fn query(&mut self, window: &dyn WindowHost) -> Option<Rect>;
}

impl<F> GeometryQuery for F
where
    F: FnMut(&dyn WindowHost) -> Option<Rect>,
{
    fn query(&mut self, window: &dyn WindowHost) -> Option<Rect> {
        self(window)
    }
}

/// Computes the child regions masked out of a container's flash.
pub trait ChildExclusion {
    /// Rects to exclude, in window-local coordinates.
    fn exclusion_rects(&mut self, window: &dyn WindowHost) -> Vec<Rect>;

    /// Drop any cached child discovery.
    fn invalidate(&mut self) {}
}

/// Resolves the current per-item handle of a row, which may change when the row is recreated.
pub trait ItemLocator {
    /// Current handle, or `None` when the row no longer exists.
    fn locate(&self) -> Option<ItemHandle>;
}

impl<F> ItemLocator for F
where
    F: Fn() -> Option<ItemHandle>,
{
    fn locate(&self) -> Option<ItemHandle> {
        self()
    }
}

/// Who paints an element's flash.
#[derive(Clone, Default)]
pub enum PaintDelegation {
    /// The window compositor fills the element's rect or mask.
    #[default]
    Overlay,
    /// The view's own row renderer reads the computed color and paints it.
    Delegated {
        /// View to ask for repaints.
        view: Rc<dyn ItemView>,
        /// Row address for targeted repaints; without one the whole viewport is repainted.
        locator: Option<Rc<dyn ItemLocator>>,
    },
}

/// Repaint request for a delegated element.
#[derive(Clone)]
pub enum DelegatedRepaint {
    /// Repaint one row.
    Item(Rc<dyn ItemView>, ItemHandle),
    /// Repaint the view's visible viewport.
    Viewport(Rc<dyn ItemView>),
}

impl DelegatedRepaint {
    /// Issue the request.
    pub fn send(&self) {
        match self {
            Self::Item(view, item) => view.request_item_repaint(*item),
            Self::Viewport(view) => view.request_viewport_repaint(),
        }
    }
}

/// One paintable region bound to a flash key.
///
/// Identity within a compositor is `(key, source)`; registering a second element with the same
/// identity replaces the first.
pub struct FlashElement {
    key: FlashKey,
    source: SourceId,
    geometry: Box<dyn GeometryQuery>,
    exclusion: Option<Box<dyn ChildExclusion>>,
    corner_radius: f64,
    clip_to_viewports: bool,
    paint: PaintDelegation,
    host: Option<HostId>,
}

impl FlashElement {
    /// Overlay-painted element with square corners, clipped to scroll viewports.
    pub fn new(
        key: impl Into<FlashKey>,
        source: SourceId,
        geometry: impl GeometryQuery + 'static,
    ) -> Self {
        Self {
            key: key.into(),
            source,
            geometry: Box::new(geometry),
            exclusion: None,
            corner_radius: 0.0,
            clip_to_viewports: true,
            paint: PaintDelegation::Overlay,
            host: None,
        }
    }

    /// Mask child regions out of the fill.
    pub fn with_exclusion(mut self, exclusion: impl ChildExclusion + 'static) -> Self {
        self.exclusion = Some(Box::new(exclusion));
        self
    }

    /// Round the fill's corners.
    pub fn with_corner_radius(mut self, radius: f64) -> Self {
        self.corner_radius = radius.max(0.0);
        self
    }

    /// Skip clipping to scroll viewports.
    pub fn without_viewport_clip(mut self) -> Self {
        self.clip_to_viewports = false;
        self
    }

    /// Hand painting over to the view's own row renderer.
    pub fn delegated_to(mut self, view: Rc<dyn ItemView>, locator: Option<Rc<dyn ItemLocator>>) -> Self {
        self.paint = PaintDelegation::Delegated { view, locator };
        self
    }

    /// Record the host widget backing this element, for layout-event routing.
    pub fn with_host(mut self, host: HostId) -> Self {
        self.host = Some(host);
        self
    }

    /// Flash key.
    pub fn key(&self) -> &FlashKey {
        &self.key
    }

    /// Source identity.
    pub fn source(&self) -> &SourceId {
        &self.source
    }

    /// Corner radius of the fill.
    pub fn corner_radius(&self) -> f64 {
        self.corner_radius
    }

    /// `true` when the rect is clipped to scroll viewports.
    pub fn clips_to_viewports(&self) -> bool {
        self.clip_to_viewports
    }

    /// `true` when the compositor must not paint this element.
    pub fn delegates_paint(&self) -> bool {
        matches!(self.paint, PaintDelegation::Delegated { .. })
    }

    /// Paint delegation mode.
    pub fn paint(&self) -> &PaintDelegation {
        &self.paint
    }

    /// Host widget backing the element.
    pub fn host(&self) -> Option<HostId> {
        self.host
    }

    /// `true` when the element carries a child exclusion.
    pub fn has_mask(&self) -> bool {
        self.exclusion.is_some()
    }

    /// Current bounds in `window`, rejecting empty rects.
    pub fn query_rect(&mut self, window: &dyn WindowHost) -> Option<Rect> {
        self.geometry
            .query(window)
            .filter(|r| crate::foundation::core::is_valid_rect(*r))
    }

    /// Child regions to mask out; empty when the element has no exclusion.
    pub fn exclusion_rects(&mut self, window: &dyn WindowHost) -> Vec<Rect> {
        match self.exclusion.as_mut() {
            Some(ex) => ex.exclusion_rects(window),
            None => Vec::new(),
        }
    }

    /// Drop cached child discovery.
    pub fn invalidate(&mut self) {
        if let Some(ex) = self.exclusion.as_mut() {
            ex.invalidate();
        }
    }

    /// Repaint request for a delegated element; `None` for overlay-painted ones.
    pub fn delegated_repaint(&self) -> Option<DelegatedRepaint> {
        match &self.paint {
            PaintDelegation::Overlay => None,
            PaintDelegation::Delegated { view, locator } => {
                match locator.as_ref().and_then(|l| l.locate()) {
                    Some(item) => Some(DelegatedRepaint::Item(Rc::clone(view), item)),
                    None => Some(DelegatedRepaint::Viewport(Rc::clone(view))),
                }
            }
        }
    }
}

impl fmt::Debug for FlashElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FlashElement")
            .field("key", &self.key)
            .field("source", &self.source)
            .field("corner_radius", &self.corner_radius)
            .field("clip_to_viewports", &self.clip_to_viewports)
            .field("delegated", &self.delegates_paint())
            .field("masked", &self.has_mask())
            .field("host", &self.host)
            .finish()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/element/descriptor.rs"]
mod tests;
