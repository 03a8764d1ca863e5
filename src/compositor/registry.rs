use std::collections::BTreeMap;
use std::rc::Rc;

use crate::compositor::overlay::WindowCompositor;
use crate::element::host::WindowHost;
use crate::foundation::core::{FlashKey, WindowId};

/// Explicit `window -> compositor` map owned by the coordinator.
#[derive(Debug, Default)]
pub struct CompositorRegistry {
    compositors: BTreeMap<WindowId, WindowCompositor>,
}

impl CompositorRegistry {
    /// Compositor for `window`, created on first use.
    pub fn open(&mut self, window: Rc<dyn WindowHost>) -> &mut WindowCompositor {
        let id = window.id();
        self.compositors.entry(id).or_insert_with(|| {
            tracing::debug!(window = id.0, "created window compositor");
            WindowCompositor::new(window)
        })
    }

    /// Clear and drop the compositor for `window`; returns the number of elements cleared.
    ///
    /// Elements are cleared before the compositor is dropped, so nothing can paint a destroyed
    /// host during the host's own deferred teardown.
    pub fn close(&mut self, window: WindowId) -> Option<usize> {
        let mut comp = self.compositors.remove(&window)?;
        let cleared = comp.clear();
        tracing::debug!(window = window.0, cleared, remaining = self.compositors.len(), "closed window compositor");
        Some(cleared)
    }

    /// Compositor for `window`.
    pub fn get(&self, window: WindowId) -> Option<&WindowCompositor> {
        self.compositors.get(&window)
    }

    /// Mutable compositor for `window`.
    pub fn get_mut(&mut self, window: WindowId) -> Option<&mut WindowCompositor> {
        self.compositors.get_mut(&window)
    }

    /// `true` when `window` has a compositor.
    pub fn contains(&self, window: WindowId) -> bool {
        self.compositors.contains_key(&window)
    }

    /// Number of open compositors.
    pub fn len(&self) -> usize {
        self.compositors.len()
    }

    /// `true` when no window is open.
    pub fn is_empty(&self) -> bool {
        self.compositors.is_empty()
    }

    /// All compositors, in window order.
    pub fn iter(&self) -> impl Iterator<Item = &WindowCompositor> {
        self.compositors.values()
    }

    /// All compositors, mutably.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut WindowCompositor> {
        self.compositors.values_mut()
    }

    /// Compositors that have an element registered under `key`.
    pub fn holding<'a>(&'a mut self, key: &'a FlashKey) -> impl Iterator<Item = &'a mut WindowCompositor> + 'a {
        self.compositors.values_mut().filter(move |c| c.has_key(key))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/compositor/registry.rs"]
mod tests;
