//! Per-editor registration helper.
//!
//! A [`FlashScope`] belongs to one editing context (a form, a plate, a dialog). It prefixes every
//! key with the scope id and remembers each registration so a recreated compositor can be
//! repopulated with [`FlashScope::reregister_all`].

use std::rc::Rc;

use crate::coordinator::engine::{FlashCoordinator, Registration};
use crate::element::container::{container_element, leaf_in_container_element, widget_element};
use crate::element::descriptor::{FlashElement, ItemLocator};
use crate::element::host::{ContainerWidget, HostWidget, ItemView, WidgetGeometry};
use crate::element::item::{list_row_element, tree_row_element};
use crate::foundation::core::{FlashColor, FlashKey, HostId, WindowId};

type ElementFactory = Box<dyn Fn(FlashKey) -> FlashElement>;

struct ScopedRegistration {
    key: FlashKey,
    host: Rc<dyn HostWidget>,
    factory: ElementFactory,
}

impl ScopedRegistration {
    fn host_id(&self) -> HostId {
        self.host.host_id()
    }
}

/// Scoped view onto a [`FlashCoordinator`].
pub struct FlashScope {
    scope: String,
    records: Vec<ScopedRegistration>,
}

impl FlashScope {
    /// Scope whose keys are prefixed with `scope`.
    pub fn new(scope: impl Into<String>) -> Self {
        Self {
            scope: scope.into(),
            records: Vec::new(),
        }
    }

    /// The scope id.
    pub fn id(&self) -> &str {
        &self.scope
    }

    /// Full key for `field` in this scope.
    pub fn key(&self, field: &str) -> FlashKey {
        FlashKey::scoped(&self.scope, field)
    }

    /// Number of remembered registrations.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// `true` when nothing has been registered.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Register an element built by `factory` and remember it for replay.
    ///
    /// A second registration of the same field from the same host replaces the first.
    pub fn register<F>(
        &mut self,
        coord: &mut FlashCoordinator,
        field: &str,
        host: Rc<dyn HostWidget>,
        factory: F,
    ) -> Registration
    where
        F: Fn(FlashKey) -> FlashElement + 'static,
    {
        let key = self.key(field);
        let outcome = coord.register_element(Rc::clone(&host), factory(key.clone()));
        let record = ScopedRegistration {
            key,
            host,
            factory: Box::new(factory),
        };
        match self
            .records
            .iter_mut()
            .find(|r| r.key == record.key && r.host_id() == record.host_id())
        {
            Some(existing) => *existing = record,
            None => self.records.push(record),
        }
        outcome
    }

    /// Register a plain widget.
    pub fn register_widget<W>(&mut self, coord: &mut FlashCoordinator, field: &str, widget: Rc<W>) -> Registration
    where
        W: WidgetGeometry + 'static,
    {
        let host: Rc<dyn HostWidget> = widget.clone();
        self.register(coord, field, host, move |k| widget_element(k, widget.clone()))
    }

    /// Register a group container with its standard mask.
    pub fn register_container<W>(
        &mut self,
        coord: &mut FlashCoordinator,
        field: &str,
        container: Rc<W>,
    ) -> Registration
    where
        W: ContainerWidget + 'static,
    {
        let host: Rc<dyn HostWidget> = container.clone();
        self.register(coord, field, host, move |k| container_element(k, container.clone()))
    }

    /// Register one leaf of a container with an inverse mask.
    pub fn register_leaf<C, L>(
        &mut self,
        coord: &mut FlashCoordinator,
        field: &str,
        container: Rc<C>,
        leaf: Rc<L>,
    ) -> Registration
    where
        C: ContainerWidget + 'static,
        L: WidgetGeometry + 'static,
    {
        let host: Rc<dyn HostWidget> = leaf.clone();
        self.register(coord, field, host, move |k| {
            leaf_in_container_element(k, container.clone(), leaf.clone())
        })
    }

    /// Register a tree row that paints its own flash.
    pub fn register_tree_row<V>(
        &mut self,
        coord: &mut FlashCoordinator,
        field: &str,
        view: Rc<V>,
        locator: Rc<dyn ItemLocator>,
    ) -> Registration
    where
        V: ItemView + 'static,
    {
        let host: Rc<dyn HostWidget> = view.clone();
        self.register(coord, field, host, move |k| {
            tree_row_element(k, view.clone(), Rc::clone(&locator))
        })
    }

    /// Register a list row that paints its own flash.
    pub fn register_list_row<V>(
        &mut self,
        coord: &mut FlashCoordinator,
        field: &str,
        view: Rc<V>,
        locator: Rc<dyn ItemLocator>,
        border_inset: f64,
    ) -> Registration
    where
        V: ItemView + 'static,
    {
        let host: Rc<dyn HostWidget> = view.clone();
        self.register(coord, field, host, move |k| {
            list_row_element(k, view.clone(), Rc::clone(&locator), border_inset)
        })
    }

    /// Replay every remembered registration; records whose host is gone are forgotten.
    ///
    /// Returns the number of registrations that reached a compositor or were deferred.
    pub fn reregister_all(&mut self, coord: &mut FlashCoordinator) -> usize {
        self.records.retain(|r| r.host.is_alive());
        let mut replayed = 0;
        for r in &self.records {
            let element = (r.factory)(r.key.clone());
            if coord.register_element(Rc::clone(&r.host), element) != Registration::Dropped {
                replayed += 1;
            }
        }
        tracing::debug!(scope = %self.scope, replayed, "re-registered flash elements");
        replayed
    }

    /// Flash `field` in every window showing it.
    pub fn queue_flash(&self, coord: &mut FlashCoordinator, field: &str) {
        coord.queue_flash(self.key(field));
    }

    /// Flash `field` in `window` only.
    pub fn queue_flash_local(&self, coord: &mut FlashCoordinator, window: WindowId, field: &str) -> bool {
        coord.queue_flash_local(window, self.key(field))
    }

    /// Color computed for `field` on the last tick.
    pub fn computed_color(&self, coord: &FlashCoordinator, field: &str) -> Option<FlashColor> {
        coord.computed_color(&self.key(field))
    }

    /// Color computed for `field` as seen by `window`.
    pub fn computed_color_in(&self, coord: &FlashCoordinator, window: WindowId, field: &str) -> Option<FlashColor> {
        coord.computed_color_in(window, &self.key(field))
    }
}

impl std::fmt::Debug for FlashScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FlashScope")
            .field("scope", &self.scope)
            .field("registrations", &self.records.len())
            .finish()
    }
}

#[cfg(test)]
#[path = "../tests/unit/scope.rs"]
mod tests;
