use std::time::Duration;

use super::*;
use crate::compositor::painter::DisplayList;
use crate::element::container::widget_element;
use crate::element::descriptor::ItemLocator;
use crate::element::item::list_row_element;
use crate::foundation::core::{ItemHandle, Rect, Size};
use crate::headless::{HeadlessItemView, HeadlessWidget, HeadlessWindow, ManualClock, ManualTimer};

struct Rig {
    clock: ManualClock,
    timer: ManualTimer,
    coord: FlashCoordinator,
}

fn rig() -> Rig {
    let clock = ManualClock::new();
    let timer = ManualTimer::new();
    let coord = FlashCoordinator::new(
        FlashConfig::standard(),
        Box::new(clock.clone()),
        Box::new(timer.clone()),
    );
    Rig { clock, timer, coord }
}

fn window(id: u64) -> Rc<HeadlessWindow> {
    HeadlessWindow::new(id, Size::new(400.0, 300.0))
}

fn field(id: u64, window: WindowId) -> Rc<HeadlessWidget> {
    let w = HeadlessWidget::new(id, Rect::new(10.0, 10.0, 110.0, 30.0));
    w.attach(window);
    w
}

#[test]
fn queue_flash_starts_timer_once() {
    let mut r = rig();
    r.coord.queue_flash("s::a");
    r.coord.queue_flash("s::b");
    assert_eq!(r.timer.start_count(), 1);
    assert_eq!(r.timer.interval(), Some(Duration::from_millis(17)));
    assert_eq!(r.coord.stats().active_animations, 2);
}

#[test]
fn retrigger_resets_start_time() {
    let mut r = rig();
    let key = FlashKey::from("s::a");
    r.coord.queue_flash(key.clone());
    r.clock.set_millis(300);
    r.coord.queue_flash(key.clone());
    assert_eq!(r.coord.start_time(&key), Some(Timestamp::from_millis(300)));
}

#[test]
fn batch_shares_one_timestamp() {
    let mut r = rig();
    r.clock.set_millis(42);
    let ts = r.coord.queue_flash_batch(["s::a", "s::b", "s::c"]);
    assert_eq!(ts, Timestamp::from_millis(42));
    for k in ["s::a", "s::b", "s::c"] {
        assert_eq!(r.coord.start_time(&FlashKey::from(k)), Some(ts));
    }
}

#[test]
fn registration_defers_until_window_opens() {
    let mut r = rig();
    let win = window(1);
    let w = field(5, win.id());

    let reg = r.coord.register_element(w.clone(), widget_element("s::a", w.clone()));
    assert_eq!(reg, Registration::Deferred);
    assert_eq!(r.coord.stats().pending_registrations, 1);

    r.coord.open_window(win.clone());
    r.coord.queue_flash("s::a");
    let stats = r.coord.stats();
    assert_eq!(stats.pending_registrations, 0);
    assert_eq!(stats.registered_elements, 1);
}

#[test]
fn destroyed_hosts_are_dropped() {
    let mut r = rig();
    let w = HeadlessWidget::new(5, Rect::new(0.0, 0.0, 10.0, 10.0));
    r.coord.register_element(w.clone(), widget_element("s::a", w.clone()));
    w.destroy();
    assert_eq!(r.coord.process_pending(), 0);
    assert_eq!(r.coord.stats().pending_registrations, 0);

    assert_eq!(
        r.coord.register_element(w.clone(), widget_element("s::a", w.clone())),
        Registration::Dropped
    );
}

#[test]
fn tick_computes_color_and_requests_overlay_repaint() {
    let mut r = rig();
    let win = window(1);
    r.coord.open_window(win.clone());
    let w = field(5, win.id());
    r.coord.register_element(w.clone(), widget_element("s::a", w.clone()));

    r.coord.queue_flash("s::a");
    r.clock.set_millis(100);
    let report = r.coord.on_tick();

    let key = FlashKey::from("s::a");
    let color = r.coord.computed_color(&key).expect("color during fade-in");
    assert!(color.a > 0);
    assert_eq!(report.active_windows, vec![win.id()]);
    assert_eq!(report.overlay_repaints, vec![win.id()]);
    assert_eq!(win.repaint_count(), 1);

    let mut dl = DisplayList::new();
    let out = r.coord.paint_window(win.id(), &mut dl);
    assert_eq!(out, Some(PaintOutcome::Painted { fills: 1 }));
}

#[test]
fn expiry_clears_then_stops_timer() {
    let mut r = rig();
    let win = window(1);
    r.coord.open_window(win.clone());
    let w = field(5, win.id());
    r.coord.register_element(w.clone(), widget_element("s::a", w.clone()));

    r.coord.queue_flash("s::a");
    r.clock.set_millis(100);
    r.coord.on_tick();
    assert_eq!(win.repaint_count(), 1);

    r.clock.set_millis(900);
    let report = r.coord.on_tick();
    assert_eq!(report.expired, vec![FlashKey::from("s::a")]);
    assert_eq!(report.clear_repaints, vec![win.id()]);
    assert!(report.timer_stopped);
    assert!(!r.timer.is_active());
    assert_eq!(win.repaint_count(), 2);
    assert_eq!(r.coord.computed_color(&FlashKey::from("s::a")), None);

    let mut dl = DisplayList::new();
    assert_eq!(r.coord.paint_window(win.id(), &mut dl), Some(PaintOutcome::Cleared));
}

#[test]
fn invisible_windows_get_no_repaints() {
    let mut r = rig();
    let win = window(1);
    win.set_visible(false);
    r.coord.open_window(win.clone());
    let w = field(5, win.id());
    r.coord.register_element(w.clone(), widget_element("s::a", w.clone()));

    r.coord.queue_flash("s::a");
    r.clock.set_millis(100);
    let report = r.coord.on_tick();
    assert!(report.active_windows.is_empty());
    assert_eq!(win.repaint_count(), 0);
    assert!(r.coord.computed_color(&FlashKey::from("s::a")).is_some());
}

#[test]
fn local_flash_stays_in_its_window() {
    let mut r = rig();
    let (a, b) = (window(1), window(2));
    r.coord.open_window(a.clone());
    r.coord.open_window(b.clone());
    let wa = field(5, a.id());
    let wb = field(6, b.id());
    r.coord.register_element(wa.clone(), widget_element("s::a", wa.clone()));
    r.coord.register_element(wb.clone(), widget_element("s::a", wb.clone()));

    assert!(!r.coord.queue_flash_local(WindowId(9), "s::a"));
    assert!(!r.coord.queue_flash_local(a.id(), "s::missing"));
    assert!(r.coord.queue_flash_local(a.id(), "s::a"));

    r.clock.set_millis(100);
    let report = r.coord.on_tick();
    let key = FlashKey::from("s::a");
    assert_eq!(report.active_windows, vec![a.id()]);
    assert!(r.coord.computed_color_in(a.id(), &key).is_some());
    assert_eq!(r.coord.computed_color_in(b.id(), &key), None);
    assert_eq!(b.repaint_count(), 0);

    r.coord.queue_flash(key.clone());
    assert_eq!(r.coord.start_time_in(a.id(), &key), Some(Timestamp::from_millis(100)));
    assert_eq!(r.coord.stats().active_animations, 1);
}

#[test]
fn delegated_rows_get_targeted_repaints() {
    let mut r = rig();
    let win = window(1);
    r.coord.open_window(win.clone());
    let view = HeadlessItemView::new(8, Rect::new(0.0, 0.0, 400.0, 300.0));
    view.attach(win.id());
    view.set_row(ItemHandle(3), Rect::new(0.0, 20.0, 400.0, 40.0));

    let found = Rc::new(|| Some(ItemHandle(3))) as Rc<dyn ItemLocator>;
    let lost = Rc::new(|| None::<ItemHandle>) as Rc<dyn ItemLocator>;
    r.coord.register_element(view.clone(), list_row_element("s::row", view.clone(), found, 0.0));
    r.coord.register_element(view.clone(), list_row_element("s::gone", view.clone(), lost, 0.0));

    r.coord.queue_flash_batch(["s::row", "s::gone"]);
    r.clock.set_millis(100);
    let report = r.coord.on_tick();
    assert_eq!(report.item_repaints, 1);
    assert!(report.overlay_repaints.is_empty());
    assert_eq!(view.take_item_repaints(), vec![ItemHandle(3)]);
}

#[test]
fn expired_rows_are_repainted_to_drop_their_highlight() {
    let clock = ManualClock::new();
    let timer = ManualTimer::new();
    let settings = crate::config::FlashSettings {
        fade_in_ms: 0,
        hold_ms: 100,
        fade_out_ms: 0,
        ..Default::default()
    };
    let config = settings.resolve(&crate::config::UnknownDisplay).unwrap();
    let mut coord = FlashCoordinator::new(config, Box::new(clock.clone()), Box::new(timer.clone()));

    let win = window(1);
    coord.open_window(win.clone());
    let view = HeadlessItemView::new(8, Rect::new(0.0, 0.0, 400.0, 300.0));
    view.attach(win.id());
    view.set_row(ItemHandle(2), Rect::new(0.0, 20.0, 400.0, 40.0));
    let locator = Rc::new(|| Some(ItemHandle(2))) as Rc<dyn ItemLocator>;
    coord.register_element(view.clone(), list_row_element("s::row", view.clone(), locator, 0.0));

    coord.queue_flash("s::row");
    clock.set_millis(50);
    let report = coord.on_tick();
    assert_eq!(report.item_repaints, 1);
    assert_eq!(report.row_clears, 0);
    assert_eq!(view.take_item_repaints(), vec![ItemHandle(2)]);

    clock.set_millis(120);
    let report = coord.on_tick();
    assert_eq!(report.expired, vec![FlashKey::from("s::row")]);
    assert_eq!(report.row_clears, 1);
    assert_eq!(view.take_item_repaints(), vec![ItemHandle(2)]);
    assert_eq!(coord.computed_color_in(win.id(), &FlashKey::from("s::row")), None);

    assert_eq!(coord.on_tick().row_clears, 0);
    assert!(view.take_item_repaints().is_empty());
}

#[test]
fn close_window_drops_compositor_and_local_state() {
    let mut r = rig();
    let win = window(1);
    r.coord.open_window(win.clone());
    let w = field(5, win.id());
    r.coord.register_element(w.clone(), widget_element("s::a", w.clone()));
    r.coord.queue_flash_local(win.id(), "s::a");

    assert_eq!(r.coord.close_window(win.id()), 1);
    let stats = r.coord.stats();
    assert_eq!(stats.compositors, 0);
    assert_eq!(stats.active_animations, 0);

    let mut dl = DisplayList::new();
    assert_eq!(r.coord.paint_window(win.id(), &mut dl), None);
}

#[test]
fn invalidate_by_key_touches_only_holders() {
    let mut r = rig();
    let (a, b) = (window(1), window(2));
    r.coord.open_window(a.clone());
    r.coord.open_window(b.clone());
    let wa = field(5, a.id());
    r.coord.register_element(wa.clone(), widget_element("s::a", wa.clone()));

    assert_eq!(r.coord.invalidate_geometry(InvalidateScope::Key(FlashKey::from("s::a"))), 1);
    assert_eq!(r.coord.invalidate_geometry(InvalidateScope::Window(b.id())), 1);
    assert_eq!(r.coord.invalidate_geometry(InvalidateScope::Window(WindowId(7))), 0);
    assert!(r.coord.on_layout_event(a.id(), LayoutEvent::Scroll));
}
