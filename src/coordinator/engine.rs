use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::rc::Rc;

use crate::animation::timing::flash_color_at;
use crate::color::resolver::{ColorResolver, SemanticColorSource};
use crate::compositor::overlay::{LayoutEvent, PaintOutcome, RegisterOutcome};
use crate::compositor::painter::FlashPainter;
use crate::compositor::registry::CompositorRegistry;
use crate::config::FlashConfig;
use crate::coordinator::clock::{Clock, TickTimer};
use crate::coordinator::table::{AnimationScope, AnimationTable};
use crate::element::descriptor::{DelegatedRepaint, FlashElement};
use crate::element::host::{HostWidget, WindowHost};
use crate::foundation::core::{FlashColor, FlashKey, Timestamp, WindowId};

/// Ticks between perf summaries.
const PERF_LOG_INTERVAL: u64 = 30;

/// Outcome of [`FlashCoordinator::register_element`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Registration {
    /// Registered with the host's window compositor.
    Immediate(RegisterOutcome),
    /// The host is not attached to an open window yet; retried when a flash is queued.
    Deferred,
    /// The host is already destroyed.
    Dropped,
}

/// Scope of [`FlashCoordinator::invalidate_geometry`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InvalidateScope {
    /// Every element of one window.
    Window(WindowId),
    /// Every compositor holding this key.
    Key(FlashKey),
}

/// What one tick did.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Time the tick sampled.
    pub now: Timestamp,
    /// Colors computed this tick, across scopes.
    pub computed: usize,
    /// Keys whose animation expired this tick.
    pub expired: Vec<FlashKey>,
    /// Windows with animating, visible keys.
    pub active_windows: Vec<WindowId>,
    /// Windows asked for a full overlay repaint.
    pub overlay_repaints: Vec<WindowId>,
    /// Targeted single-row repaints issued.
    pub item_repaints: usize,
    /// Whole-viewport repaints issued for rows without a handle.
    pub viewport_repaints: usize,
    /// Windows given one last repaint to flush a cleared flash.
    pub clear_repaints: Vec<WindowId>,
    /// Repaints sent to delegated rows whose flash ended, so they drop their highlight.
    pub row_clears: usize,
    /// The timer was stopped at the end of this tick.
    pub timer_stopped: bool,
}

/// Snapshot of coordinator state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CoordinatorStats {
    /// Ticks processed since construction.
    pub ticks: u64,
    /// Running animations, across scopes.
    pub active_animations: usize,
    /// Colors computed by the last tick.
    pub computed_colors: usize,
    /// Open window compositors.
    pub compositors: usize,
    /// Elements registered across compositors.
    pub registered_elements: usize,
    /// Registrations waiting for their host to attach.
    pub pending_registrations: usize,
    /// Whether the tick timer is running.
    pub timer_active: bool,
}

struct PendingRegistration {
    host: Rc<dyn HostWidget>,
    element: FlashElement,
}

/// Owns the single tick clock, every running animation and the per-window compositors.
///
/// Constructed once by the UI root and passed by reference to whatever queues flashes. The host
/// timer calls [`FlashCoordinator::on_tick`]; each window's overlay paint handler calls
/// [`FlashCoordinator::paint_window`]; row renderers read [`FlashCoordinator::computed_color_in`].
pub struct FlashCoordinator {
    config: FlashConfig,
    resolver: ColorResolver,
    clock: Box<dyn Clock>,
    timer: Box<dyn TickTimer>,
    registry: CompositorRegistry,
    starts: AnimationTable<Timestamp>,
    colors: AnimationTable<FlashColor>,
    base_colors: HashMap<FlashKey, FlashColor>,
    active_windows: BTreeSet<WindowId>,
    delegated_shown: BTreeMap<WindowId, BTreeSet<FlashKey>>,
    pending: Vec<PendingRegistration>,
    ticks: u64,
}

impl FlashCoordinator {
    /// Coordinator using the palette resolver described by `config`.
    pub fn new(config: FlashConfig, clock: Box<dyn Clock>, timer: Box<dyn TickTimer>) -> Self {
        let resolver = ColorResolver::from_config(&config);
        Self {
            config,
            resolver,
            clock,
            timer,
            registry: CompositorRegistry::default(),
            starts: AnimationTable::default(),
            colors: AnimationTable::default(),
            base_colors: HashMap::new(),
            active_windows: BTreeSet::new(),
            delegated_shown: BTreeMap::new(),
            pending: Vec::new(),
            ticks: 0,
        }
    }

    /// Try `source` before the fallback palette when resolving base colors.
    pub fn with_semantic_colors(mut self, source: Rc<dyn SemanticColorSource>) -> Self {
        self.resolver = self.resolver.with_semantic(source);
        self
    }

    /// Runtime configuration.
    pub fn config(&self) -> &FlashConfig {
        &self.config
    }

    /// Window compositors.
    pub fn compositors(&self) -> &CompositorRegistry {
        &self.registry
    }

    /// Create the compositor for a newly shown window.
    pub fn open_window(&mut self, window: Rc<dyn WindowHost>) {
        self.registry.open(window);
    }

    /// Tear down a window's compositor and its local animations; returns the elements cleared.
    ///
    /// Must be called from the window's close sequence, before the host destroys its widgets.
    pub fn close_window(&mut self, window: WindowId) -> usize {
        self.starts.remove_window(window);
        self.colors.remove_window(window);
        self.active_windows.remove(&window);
        self.delegated_shown.remove(&window);
        self.registry.close(window).unwrap_or(0)
    }

    /// Register `element`, backed by `host`, with the compositor of the host's window.
    ///
    /// Hosts not yet attached to an open window are queued and retried whenever a flash is queued.
    pub fn register_element(
        &mut self,
        host: Rc<dyn HostWidget>,
        element: FlashElement,
    ) -> Registration {
        if !host.is_alive() {
            tracing::debug!(key = %element.key(), "dropped registration for destroyed host");
            return Registration::Dropped;
        }
        if let Some(comp) = host.window().and_then(|w| self.registry.get_mut(w)) {
            return Registration::Immediate(comp.register(element));
        }
        tracing::debug!(key = %element.key(), "deferred flash registration");
        self.pending.push(PendingRegistration { host, element });
        Registration::Deferred
    }

    /// Retry deferred registrations; returns how many completed.
    pub fn process_pending(&mut self) -> usize {
        if self.pending.is_empty() {
            return 0;
        }
        let mut done = 0;
        let mut still_pending = Vec::new();
        for p in std::mem::take(&mut self.pending) {
            if !p.host.is_alive() {
                tracing::debug!(key = %p.element.key(), "discarded registration for destroyed host");
                continue;
            }
            match p.host.window().and_then(|w| self.registry.get_mut(w)) {
                Some(comp) => {
                    comp.register(p.element);
                    done += 1;
                }
                None => still_pending.push(p),
            }
        }
        self.pending = still_pending;
        if done > 0 {
            tracing::debug!(done, remaining = self.pending.len(), "completed deferred registrations");
        }
        done
    }

    /// Remove every element registered under `key` in `window`.
    pub fn unregister_key(&mut self, window: WindowId, key: &FlashKey) -> usize {
        self.registry
            .get_mut(window)
            .map_or(0, |c| c.unregister_key(key))
    }

    /// Start or retrigger `key` in every window holding it.
    pub fn queue_flash(&mut self, key: impl Into<FlashKey>) {
        self.process_pending();
        let now = self.clock.now();
        self.start_broadcast(key.into(), now);
        self.ensure_timer();
    }

    /// Start or retrigger many keys with one shared start timestamp.
    pub fn queue_flash_batch<I, K>(&mut self, keys: I) -> Timestamp
    where
        I: IntoIterator<Item = K>,
        K: Into<FlashKey>,
    {
        self.process_pending();
        let now = self.clock.now();
        let mut n = 0usize;
        for key in keys {
            self.start_broadcast(key.into(), now);
            n += 1;
        }
        if n > 0 {
            self.ensure_timer();
        }
        tracing::debug!(keys = n, "queued flash batch");
        now
    }

    /// Start or retrigger `key` in `window` only.
    ///
    /// Returns `false` when the window has no compositor or no element under `key`.
    pub fn queue_flash_local(&mut self, window: WindowId, key: impl Into<FlashKey>) -> bool {
        let key = key.into();
        self.process_pending();
        let Some(comp) = self.registry.get_mut(window) else {
            tracing::debug!(%key, window = window.0, "local flash for unknown window");
            return false;
        };
        if !comp.has_key(&key) {
            tracing::debug!(%key, window = window.0, "local flash for unregistered key");
            return false;
        }
        let is_new = self.starts.get_for(window, &key).is_none();
        if is_new {
            comp.invalidate_key(&key);
        }
        let now = self.clock.now();
        self.starts.insert_local(window, key, now);
        self.ensure_timer();
        true
    }

    /// Mark geometry stale for a window or for every compositor holding a key.
    pub fn invalidate_geometry(&mut self, scope: InvalidateScope) -> usize {
        match scope {
            InvalidateScope::Window(window) => match self.registry.get_mut(window) {
                Some(comp) => {
                    comp.invalidate_geometry();
                    1
                }
                None => 0,
            },
            InvalidateScope::Key(key) => self
                .registry
                .holding(&key)
                .map(|c| c.invalidate_key(&key))
                .filter(|hit| *hit)
                .count(),
        }
    }

    /// Forward a host layout event to `window`'s compositor.
    pub fn on_layout_event(&mut self, window: WindowId, event: LayoutEvent) -> bool {
        self.registry
            .get_mut(window)
            .is_some_and(|c| c.on_layout_event(event))
    }

    /// Color computed for `key` on the last tick, preferring the broadcast animation.
    pub fn computed_color(&self, key: &FlashKey) -> Option<FlashColor> {
        self.colors.get_any(key).copied()
    }

    /// Color computed for `key` as seen by `window`.
    pub fn computed_color_in(&self, window: WindowId, key: &FlashKey) -> Option<FlashColor> {
        self.colors.get_for(window, key).copied()
    }

    /// Start timestamp of the broadcast animation for `key`.
    pub fn start_time(&self, key: &FlashKey) -> Option<Timestamp> {
        self.starts.get_broadcast(key).copied()
    }

    /// Start timestamp of the animation `window` sees for `key`.
    pub fn start_time_in(&self, window: WindowId, key: &FlashKey) -> Option<Timestamp> {
        self.starts.get_for(window, key).copied()
    }

    /// Current state snapshot.
    pub fn stats(&self) -> CoordinatorStats {
        CoordinatorStats {
            ticks: self.ticks,
            active_animations: self.starts.len(),
            computed_colors: self.colors.len(),
            compositors: self.registry.len(),
            registered_elements: self.registry.iter().map(|c| c.element_count()).sum(),
            pending_registrations: self.pending.len(),
            timer_active: self.timer.is_active(),
        }
    }

    /// Advance every animation and request the repaints this frame needs.
    #[tracing::instrument(level = "trace", skip_all, fields(tick = self.ticks + 1))]
    pub fn on_tick(&mut self) -> TickReport {
        let now = self.clock.now();
        self.ticks += 1;
        let timing = self.config.timing;
        let total = timing.total_duration();
        let full_alpha = self.config.flash_alpha;

        self.colors.clear();
        let mut expired: Vec<(AnimationScope, FlashKey)> = Vec::new();
        for (scope, key, start) in self.starts.iter() {
            if now.checked_since(*start).is_some_and(|e| e >= total) {
                expired.push((scope, key.clone()));
                continue;
            }
            let resolver = &self.resolver;
            let base = *self
                .base_colors
                .entry(key.clone())
                .or_insert_with(|| resolver.base_color(key));
            if let Some(color) = flash_color_at(*start, now, &timing, base, full_alpha)
                && color.a > 0
            {
                self.colors.insert(scope, key.clone(), color);
            }
        }

        let mut report = TickReport {
            now,
            computed: self.colors.len(),
            ..TickReport::default()
        };

        let mut needs_clear: BTreeSet<WindowId> = BTreeSet::new();
        for (scope, key) in &expired {
            self.starts.remove(*scope, key);
            if !self.starts.contains_any(key) {
                self.base_colors.remove(key);
            }
            match scope {
                AnimationScope::Local(window) => {
                    needs_clear.insert(*window);
                }
                AnimationScope::Broadcast => {
                    needs_clear.extend(self.registry.iter().filter(|c| c.has_key(key)).map(|c| c.window_id()));
                }
            }
            report.expired.push(key.clone());
        }
        if !report.expired.is_empty() {
            tracing::debug!(expired = report.expired.len(), "flash animations expired");
        }

        let mut active = BTreeSet::new();
        for comp in self.registry.iter_mut() {
            let window = Rc::clone(comp.window());
            if !window.is_visible() {
                continue;
            }
            let id = window.id();
            let work = comp.work_for(self.colors.iter_for(id).map(|(k, _)| k));

            let shown: BTreeSet<FlashKey> = work
                .keys
                .iter()
                .filter(|k| comp.elements(k).iter().any(FlashElement::delegates_paint))
                .cloned()
                .collect();
            let previously = self.delegated_shown.remove(&id).unwrap_or_default();
            for key in previously.difference(&shown) {
                for req in comp.delegated_repaints(key) {
                    req.send();
                    report.row_clears += 1;
                }
            }
            if !shown.is_empty() {
                self.delegated_shown.insert(id, shown);
            }

            if work.is_empty() {
                continue;
            }
            active.insert(id);
            if work.overlay_repaint {
                window.request_repaint();
                report.overlay_repaints.push(id);
            }
            for req in &work.delegated {
                req.send();
                match req {
                    DelegatedRepaint::Item(..) => report.item_repaints += 1,
                    DelegatedRepaint::Viewport(_) => report.viewport_repaints += 1,
                }
            }
        }

        for id in needs_clear.difference(&active) {
            let Some(comp) = self.registry.get(*id) else {
                continue;
            };
            if comp.window().is_visible() {
                comp.window().request_repaint();
                report.clear_repaints.push(*id);
            }
        }

        report.active_windows = active.iter().copied().collect();
        self.active_windows = active;

        if self.ticks % PERF_LOG_INTERVAL == 0 {
            tracing::debug!(
                tick = self.ticks,
                colors = report.computed,
                overlays_painted = report.overlay_repaints.len(),
                total_overlays = self.registry.len(),
                "flash perf"
            );
        }

        if self.starts.is_empty() && self.active_windows.is_empty() && self.timer.is_active() {
            self.timer.stop();
            report.timer_stopped = true;
            tracing::debug!(tick = self.ticks, "flash timer stopped");
        }
        report
    }

    /// Paint `window`'s overlay with this tick's colors.
    ///
    /// Returns `None` when the window has no compositor.
    pub fn paint_window(
        &mut self,
        window: WindowId,
        painter: &mut dyn FlashPainter,
    ) -> Option<PaintOutcome> {
        let comp = self.registry.get_mut(window)?;
        let colors = self.colors.iter_for(window).map(|(k, c)| (k, *c));
        Some(comp.paint(colors, painter))
    }

    fn start_broadcast(&mut self, key: FlashKey, now: Timestamp) {
        let is_new = !self.starts.contains_any(&key);
        self.starts.remove_local_entries(&key);
        if is_new {
            for comp in self.registry.holding(&key) {
                comp.invalidate_key(&key);
            }
        }
        tracing::trace!(%key, is_new, "queued flash");
        self.starts.insert_broadcast(key, now);
    }

    fn ensure_timer(&mut self) {
        if !self.timer.is_active() {
            let interval = self.config.timing.frame_interval();
            tracing::debug!(interval_ms = interval.as_millis() as u64, "flash timer started");
            self.timer.start(interval);
        }
    }
}

impl std::fmt::Debug for FlashCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FlashCoordinator")
            .field("stats", &self.stats())
            .field("registry", &self.registry)
            .finish()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/coordinator/engine.rs"]
mod tests;
