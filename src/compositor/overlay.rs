use std::collections::{BTreeMap, HashSet};
use std::rc::Rc;

use crate::compositor::cache::{GeometryCache, clip_to_viewports};
use crate::compositor::painter::FlashPainter;
use crate::element::descriptor::{DelegatedRepaint, FlashElement};
use crate::element::host::WindowHost;
use crate::foundation::core::{FlashColor, FlashKey, HostId, WindowId, overlap};

/// Host event that may move flash geometry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LayoutEvent {
    /// A scroll area moved its content.
    Scroll,
    /// The window or a widget inside it changed size.
    Resize,
    /// A widget asked for a new layout pass.
    Relayout(HostId),
}

/// Result of [`WindowCompositor::register`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RegisterOutcome {
    /// New `(key, source)` identity.
    Added,
    /// Replaced the element with the same identity.
    Replaced,
}

/// Result of one paint pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PaintOutcome {
    /// Nothing animating and visible; the surface was only cleared.
    Cleared,
    /// `fills` regions were painted after clearing.
    Painted {
        /// Number of rect or mask fills issued.
        fills: usize,
    },
}

/// Repaints one window needs for this tick.
#[derive(Clone, Default)]
pub struct WindowWork {
    /// Animating keys with at least one visible element.
    pub keys: Vec<FlashKey>,
    /// At least one of those keys has an overlay-painted element.
    pub overlay_repaint: bool,
    /// Row repaints for delegated elements.
    pub delegated: Vec<DelegatedRepaint>,
}

impl WindowWork {
    /// `true` when the window has nothing to repaint.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

/// Paints every active flash of one top-level window in a single pass.
pub struct WindowCompositor {
    window: Rc<dyn WindowHost>,
    elements: BTreeMap<FlashKey, Vec<FlashElement>>,
    tracked_hosts: HashSet<HostId>,
    cache: GeometryCache,
}

impl WindowCompositor {
    /// Empty compositor for `window`.
    pub fn new(window: Rc<dyn WindowHost>) -> Self {
        Self {
            window,
            elements: BTreeMap::new(),
            tracked_hosts: HashSet::new(),
            cache: GeometryCache::default(),
        }
    }

    /// Window this compositor paints.
    pub fn window(&self) -> &Rc<dyn WindowHost> {
        &self.window
    }

    /// Handle of the window.
    pub fn window_id(&self) -> WindowId {
        self.window.id()
    }

    /// Geometry cache, for diagnostics.
    pub fn cache(&self) -> &GeometryCache {
        &self.cache
    }

    /// `true` when any element is registered under `key`.
    pub fn has_key(&self, key: &FlashKey) -> bool {
        self.elements.contains_key(key)
    }

    /// Registered keys.
    pub fn keys(&self) -> impl Iterator<Item = &FlashKey> {
        self.elements.keys()
    }

    /// Elements registered under `key`.
    pub fn elements(&self, key: &FlashKey) -> &[FlashElement] {
        self.elements.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Repaint requests for every delegated element under `key`.
    pub fn delegated_repaints(&self, key: &FlashKey) -> Vec<DelegatedRepaint> {
        self.elements(key)
            .iter()
            .filter_map(FlashElement::delegated_repaint)
            .collect()
    }

    /// Total registered elements.
    pub fn element_count(&self) -> usize {
        self.elements.values().map(Vec::len).sum()
    }

    /// Add `element`, replacing any element with the same `(key, source)`.
    pub fn register(&mut self, element: FlashElement) -> RegisterOutcome {
        if let Some(host) = element.host() {
            self.tracked_hosts.insert(host);
        }
        self.cache.invalidate();

        let list = self.elements.entry(element.key().clone()).or_default();
        if let Some(slot) = list.iter_mut().find(|e| e.source() == element.source()) {
            tracing::debug!(key = %element.key(), source = %element.source(), "replaced flash element");
            *slot = element;
            return RegisterOutcome::Replaced;
        }
        tracing::debug!(key = %element.key(), source = %element.source(), "registered flash element");
        list.push(element);
        RegisterOutcome::Added
    }

    /// Remove every element registered under `key`; returns how many were removed.
    pub fn unregister_key(&mut self, key: &FlashKey) -> usize {
        let Some(removed) = self.elements.remove(key) else {
            return 0;
        };
        self.rebuild_tracked_hosts();
        self.cache.invalidate();
        removed.len()
    }

    /// Drop every element. Called synchronously when the window starts closing.
    pub fn clear(&mut self) -> usize {
        let n = self.element_count();
        self.elements.clear();
        self.tracked_hosts.clear();
        self.cache.invalidate();
        n
    }

    /// Mark all cached geometry stale.
    pub fn invalidate_geometry(&mut self) {
        self.cache.invalidate();
    }

    /// Mark geometry stale and drop cached child discovery for `key`'s elements.
    pub fn invalidate_key(&mut self, key: &FlashKey) -> bool {
        let Some(list) = self.elements.get_mut(key) else {
            return false;
        };
        for el in list.iter_mut() {
            el.invalidate();
        }
        self.cache.invalidate();
        true
    }

    /// Route a layout event; returns `true` when it invalidated the cache.
    ///
    /// Scroll and resize always invalidate. Relayout only invalidates when it comes from a host
    /// backing a registered element.
    pub fn on_layout_event(&mut self, event: LayoutEvent) -> bool {
        let invalidate = match event {
            LayoutEvent::Scroll | LayoutEvent::Resize => true,
            LayoutEvent::Relayout(host) => self.tracked_hosts.contains(&host),
        };
        if invalidate {
            tracing::trace!(window = self.window.id().0, ?event, "layout event invalidated geometry");
            self.cache.invalidate();
        }
        invalidate
    }

    /// The subset of `keys` with at least one element intersecting the window.
    ///
    /// Reads cached rects when the cache is valid and falls back to live queries otherwise.
    pub fn visible_keys_for<'a, I>(&mut self, keys: I) -> Vec<FlashKey>
    where
        I: IntoIterator<Item = &'a FlashKey>,
    {
        let bounds = self.window.bounds();
        let viewports = if self.cache.is_valid() {
            Vec::new()
        } else {
            self.window.scroll_viewports()
        };
        let mut out = Vec::new();
        for key in keys {
            let visible = if self.cache.is_valid() {
                self.cache.is_visible(key, bounds)
            } else {
                let window = &*self.window;
                match self.elements.get_mut(key) {
                    Some(list) => list.iter_mut().any(|el| {
                        let clip = el.clips_to_viewports() && !viewports.is_empty();
                        el.query_rect(window)
                            .and_then(|r| if clip { clip_to_viewports(r, &viewports) } else { Some(r) })
                            .is_some_and(|r| overlap(r, bounds).is_some())
                    }),
                    None => false,
                }
            };
            if visible {
                out.push(key.clone());
            }
        }
        out
    }

    /// Repaints needed to show `animating` keys in this window.
    pub fn work_for<'a, I>(&mut self, animating: I) -> WindowWork
    where
        I: IntoIterator<Item = &'a FlashKey>,
    {
        let registered: Vec<&FlashKey> = animating
            .into_iter()
            .filter(|k| self.elements.contains_key(*k))
            .collect();
        let keys = self.visible_keys_for(registered);

        let mut work = WindowWork::default();
        for key in &keys {
            for el in self.elements(key) {
                match el.delegated_repaint() {
                    Some(req) => work.delegated.push(req),
                    None => work.overlay_repaint = true,
                }
            }
        }
        work.keys = keys;
        work
    }

    /// Clear the surface and fill every visible element of every animating key.
    ///
    /// `colors` yields this tick's computed colors for the window. Geometry is rebuilt first when
    /// the cache is stale.
    #[tracing::instrument(level = "trace", skip_all, fields(window = self.window.id().0))]
    pub fn paint<'a, I>(&mut self, colors: I, painter: &mut dyn FlashPainter) -> PaintOutcome
    where
        I: IntoIterator<Item = (&'a FlashKey, FlashColor)>,
    {
        let bounds = self.window.bounds();
        painter.clear(bounds);

        let active: Vec<(&FlashKey, FlashColor)> = colors
            .into_iter()
            .filter(|(k, _)| self.elements.contains_key(*k))
            .collect();
        if active.is_empty() {
            return PaintOutcome::Cleared;
        }
        let visible = self.visible_keys_for(active.iter().map(|(k, _)| *k));
        if visible.is_empty() {
            return PaintOutcome::Cleared;
        }

        if !self.cache.is_valid() {
            self.cache.rebuild(&*self.window, &mut self.elements);
        }

        let mut fills = 0;
        for (key, color) in active {
            let masks = self.cache.masks(key);
            for (idx, geo) in self.cache.geometry(key).iter().enumerate() {
                let Some(geo) = geo else { continue };
                if geo.delegated || overlap(geo.rect, bounds).is_none() {
                    continue;
                }
                match masks.get(idx).and_then(Option::as_ref) {
                    Some(mask) => painter.fill_mask(mask, color),
                    None if geo.radius > 0.0 => painter.fill_rounded_rect(geo.rect, geo.radius, color),
                    None => painter.fill_rect(geo.rect, color),
                }
                fills += 1;
            }
        }

        if fills == 0 {
            PaintOutcome::Cleared
        } else {
            PaintOutcome::Painted { fills }
        }
    }

    fn rebuild_tracked_hosts(&mut self) {
        self.tracked_hosts = self
            .elements
            .values()
            .flatten()
            .filter_map(FlashElement::host)
            .collect();
    }
}

impl std::fmt::Debug for WindowCompositor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WindowCompositor")
            .field("window", &self.window.id())
            .field("keys", &self.elements.len())
            .field("elements", &self.element_count())
            .field("cache_valid", &self.cache.is_valid())
            .finish()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/compositor/overlay.rs"]
mod tests;
