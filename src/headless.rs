//! In-memory host implementations.
//!
//! Used by the preview binary and the test suite to drive the coordinator without a UI toolkit.
//! Widget rects are stored directly in window-local coordinates.

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::rc::Rc;
use std::time::Duration;

use crate::coordinator::clock::{Clock, TickTimer};
use crate::element::host::{ContainerWidget, HostWidget, ItemView, WidgetGeometry, WindowHost};
use crate::foundation::core::{HostId, ItemHandle, Rect, Size, Timestamp, WindowId};

/// Window with settable visibility, size and scroll viewports that counts repaint requests.
#[derive(Debug)]
pub struct HeadlessWindow {
    id: WindowId,
    visible: Cell<bool>,
    size: Cell<Size>,
    viewports: RefCell<Vec<Rect>>,
    repaints: Cell<u64>,
}

impl HeadlessWindow {
    /// Visible window of the given size with no scroll viewports.
    pub fn new(id: u64, size: Size) -> Rc<Self> {
        Rc::new(Self {
            id: WindowId(id),
            visible: Cell::new(true),
            size: Cell::new(size),
            viewports: RefCell::new(Vec::new()),
            repaints: Cell::new(0),
        })
    }

    /// Show or hide (minimize) the window.
    pub fn set_visible(&self, visible: bool) {
        self.visible.set(visible);
    }

    /// Resize the overlay surface.
    pub fn set_size(&self, size: Size) {
        self.size.set(size);
    }

    /// Replace the scroll viewports.
    pub fn set_viewports(&self, viewports: Vec<Rect>) {
        *self.viewports.borrow_mut() = viewports;
    }

    /// Overlay repaints requested so far.
    pub fn repaint_count(&self) -> u64 {
        self.repaints.get()
    }
}

impl WindowHost for HeadlessWindow {
    fn id(&self) -> WindowId {
        self.id
    }

    fn is_visible(&self) -> bool {
        self.visible.get()
    }

    fn size(&self) -> Size {
        self.size.get()
    }

    fn scroll_viewports(&self) -> Vec<Rect> {
        self.viewports.borrow().clone()
    }

    fn request_repaint(&self) {
        self.repaints.set(self.repaints.get() + 1);
    }
}

/// Widget usable as a plain field, a leaf child or a container.
#[derive(Debug)]
pub struct HeadlessWidget {
    id: HostId,
    window: Cell<Option<WindowId>>,
    alive: Cell<bool>,
    visible: Cell<bool>,
    rect: Cell<Rect>,
    top_inset: Cell<f64>,
    title_height: Cell<f64>,
    corner_radius: Cell<f64>,
    children: RefCell<Vec<Rc<HeadlessWidget>>>,
    child_scans: Cell<u64>,
}

impl HeadlessWidget {
    /// Detached, visible widget at `rect`.
    pub fn new(id: u64, rect: Rect) -> Rc<Self> {
        Rc::new(Self {
            id: HostId(id),
            window: Cell::new(None),
            alive: Cell::new(true),
            visible: Cell::new(true),
            rect: Cell::new(rect),
            top_inset: Cell::new(0.0),
            title_height: Cell::new(0.0),
            corner_radius: Cell::new(0.0),
            children: RefCell::new(Vec::new()),
            child_scans: Cell::new(0),
        })
    }

    /// Attach the widget and its children to `window`.
    pub fn attach(&self, window: WindowId) {
        self.window.set(Some(window));
        for child in self.children.borrow().iter() {
            child.attach(window);
        }
    }

    /// Mark the widget destroyed.
    pub fn destroy(&self) {
        self.alive.set(false);
    }

    /// Show or hide the widget.
    pub fn set_visible(&self, visible: bool) {
        self.visible.set(visible);
    }

    /// Move or resize the widget.
    pub fn set_rect(&self, rect: Rect) {
        self.rect.set(rect);
    }

    /// Current rect in window coordinates.
    pub fn rect(&self) -> Rect {
        self.rect.get()
    }

    /// Set container decoration metrics.
    pub fn set_frame(&self, top_inset: f64, title_height: f64, corner_radius: f64) {
        self.top_inset.set(top_inset);
        self.title_height.set(title_height);
        self.corner_radius.set(corner_radius);
    }

    /// Nest `child` inside this widget.
    pub fn add_child(&self, child: Rc<HeadlessWidget>) {
        if let Some(window) = self.window.get() {
            child.attach(window);
        }
        self.children.borrow_mut().push(child);
    }

    /// Times the child list has been enumerated.
    pub fn child_scan_count(&self) -> u64 {
        self.child_scans.get()
    }
}

impl HostWidget for HeadlessWidget {
    fn host_id(&self) -> HostId {
        self.id
    }

    fn is_alive(&self) -> bool {
        self.alive.get()
    }

    fn window(&self) -> Option<WindowId> {
        if !self.alive.get() {
            return None;
        }
        self.window.get()
    }
}

impl WidgetGeometry for HeadlessWidget {
    fn is_visible_in(&self, window: WindowId) -> bool {
        self.alive.get() && self.visible.get() && self.window.get() == Some(window)
    }

    fn rect_in_window(&self, window: WindowId) -> Option<Rect> {
        (self.alive.get() && self.window.get() == Some(window)).then(|| self.rect.get())
    }
}

impl ContainerWidget for HeadlessWidget {
    fn painted_top_inset(&self) -> f64 {
        self.top_inset.get()
    }

    fn title_height(&self) -> f64 {
        self.title_height.get()
    }

    fn corner_radius(&self) -> f64 {
        self.corner_radius.get()
    }

    fn leaf_children(&self) -> Vec<Rc<dyn WidgetGeometry>> {
        self.child_scans.set(self.child_scans.get() + 1);
        self.children
            .borrow()
            .iter()
            .map(|c| Rc::clone(c) as Rc<dyn WidgetGeometry>)
            .collect()
    }
}

/// List or tree view with addressable rows that records repaint requests.
#[derive(Debug)]
pub struct HeadlessItemView {
    widget: Rc<HeadlessWidget>,
    rows: RefCell<BTreeMap<ItemHandle, Rect>>,
    item_repaints: RefCell<Vec<ItemHandle>>,
    viewport_repaints: Cell<u64>,
}

impl HeadlessItemView {
    /// Detached view covering `rect`.
    pub fn new(id: u64, rect: Rect) -> Rc<Self> {
        Rc::new(Self {
            widget: HeadlessWidget::new(id, rect),
            rows: RefCell::new(BTreeMap::new()),
            item_repaints: RefCell::new(Vec::new()),
            viewport_repaints: Cell::new(0),
        })
    }

    /// Attach the view to `window`.
    pub fn attach(&self, window: WindowId) {
        self.widget.attach(window);
    }

    /// Mark the view destroyed.
    pub fn destroy(&self) {
        self.widget.destroy();
    }

    /// Show or hide the view.
    pub fn set_visible(&self, visible: bool) {
        self.widget.set_visible(visible);
    }

    /// Place row `item` at `rect`.
    pub fn set_row(&self, item: ItemHandle, rect: Rect) {
        self.rows.borrow_mut().insert(item, rect);
    }

    /// Remove row `item`.
    pub fn remove_row(&self, item: ItemHandle) {
        self.rows.borrow_mut().remove(&item);
    }

    /// Drain the targeted row repaints requested so far.
    pub fn take_item_repaints(&self) -> Vec<ItemHandle> {
        std::mem::take(&mut *self.item_repaints.borrow_mut())
    }

    /// Full viewport repaints requested so far.
    pub fn viewport_repaint_count(&self) -> u64 {
        self.viewport_repaints.get()
    }
}

impl HostWidget for HeadlessItemView {
    fn host_id(&self) -> HostId {
        self.widget.host_id()
    }

    fn is_alive(&self) -> bool {
        self.widget.is_alive()
    }

    fn window(&self) -> Option<WindowId> {
        HostWidget::window(&*self.widget)
    }
}

impl WidgetGeometry for HeadlessItemView {
    fn is_visible_in(&self, window: WindowId) -> bool {
        self.widget.is_visible_in(window)
    }

    fn rect_in_window(&self, window: WindowId) -> Option<Rect> {
        self.widget.rect_in_window(window)
    }
}

impl ItemView for HeadlessItemView {
    fn item_rect_in_window(&self, window: WindowId, item: ItemHandle) -> Option<Rect> {
        self.widget.rect_in_window(window)?;
        self.rows.borrow().get(&item).copied()
    }

    fn request_item_repaint(&self, item: ItemHandle) {
        self.item_repaints.borrow_mut().push(item);
    }

    fn request_viewport_repaint(&self) {
        self.viewport_repaints.set(self.viewport_repaints.get() + 1);
    }
}

/// Clock advanced by hand. Clones share the same time.
#[derive(Clone, Debug, Default)]
pub struct ManualClock {
    now: Rc<Cell<Duration>>,
}

impl ManualClock {
    /// Clock at the origin.
    pub fn new() -> Self {
        Self::default()
    }

    /// Jump to `ms` milliseconds after the origin.
    pub fn set_millis(&self, ms: u64) {
        self.now.set(Duration::from_millis(ms));
    }

    /// Move forward by `d`.
    pub fn advance(&self, d: Duration) {
        self.now.set(self.now.get() + d);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Timestamp {
        Timestamp(self.now.get())
    }
}

/// Timer that only records start/stop calls. Clones share state.
#[derive(Clone, Debug, Default)]
pub struct ManualTimer {
    interval: Rc<Cell<Option<Duration>>>,
    starts: Rc<Cell<u64>>,
}

impl ManualTimer {
    /// Stopped timer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Interval of the running timer.
    pub fn interval(&self) -> Option<Duration> {
        self.interval.get()
    }

    /// Number of idle-to-running transitions.
    pub fn start_count(&self) -> u64 {
        self.starts.get()
    }
}

impl TickTimer for ManualTimer {
    fn start(&mut self, interval: Duration) {
        if self.interval.get().is_none() {
            self.starts.set(self.starts.get() + 1);
        }
        self.interval.set(Some(interval));
    }

    fn stop(&mut self) {
        self.interval.set(None);
    }

    fn is_active(&self) -> bool {
        self.interval.get().is_some()
    }
}
