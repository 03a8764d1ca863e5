use super::*;
use crate::compositor::painter::{DisplayList, PaintOp};
use crate::element::container::{container_element, widget_element};
use crate::element::item::list_row_element;
use crate::foundation::core::{ItemHandle, Rect, Size, SourceId};
use crate::headless::{HeadlessItemView, HeadlessWidget, HeadlessWindow};

const RED: FlashColor = FlashColor::rgb(255, 0, 0);

fn setup() -> (Rc<HeadlessWindow>, WindowCompositor) {
    let window = HeadlessWindow::new(1, Size::new(400.0, 300.0));
    let comp = WindowCompositor::new(window.clone());
    (window, comp)
}

fn field(id: u64, rect: Rect) -> Rc<HeadlessWidget> {
    let w = HeadlessWidget::new(id, rect);
    w.attach(WindowId(1));
    w
}

#[test]
fn same_identity_replaces_in_place() {
    let (_window, mut comp) = setup();
    let w = field(3, Rect::new(0.0, 0.0, 50.0, 20.0));
    assert_eq!(comp.register(widget_element("s::a", w.clone())), RegisterOutcome::Added);
    assert_eq!(comp.register(widget_element("s::a", w.clone())), RegisterOutcome::Replaced);
    assert_eq!(comp.element_count(), 1);

    let other = FlashElement::new("s::a", SourceId::new("other"), |_: &dyn WindowHost| None::<Rect>);
    assert_eq!(comp.register(other), RegisterOutcome::Added);
    assert_eq!(comp.elements(&FlashKey::from("s::a")).len(), 2);

    assert_eq!(comp.unregister_key(&FlashKey::from("s::a")), 2);
    assert_eq!(comp.element_count(), 0);
}

#[test]
fn rebuild_happens_once_per_invalidation() {
    let (_window, mut comp) = setup();
    comp.register(widget_element("s::a", field(3, Rect::new(0.0, 0.0, 50.0, 20.0))));
    let key = FlashKey::from("s::a");
    let mut dl = DisplayList::new();

    let out = comp.paint([(&key, RED)], &mut dl);
    assert_eq!(out, PaintOutcome::Painted { fills: 1 });
    assert_eq!(comp.cache().rebuild_count(), 1);

    comp.paint([(&key, RED)], &mut dl);
    assert_eq!(comp.cache().rebuild_count(), 1);

    comp.invalidate_geometry();
    comp.paint([(&key, RED)], &mut dl);
    assert_eq!(comp.cache().rebuild_count(), 2);
}

#[test]
fn paint_always_clears_first() {
    let (window, mut comp) = setup();
    comp.register(widget_element("s::a", field(3, Rect::new(0.0, 0.0, 50.0, 20.0))));
    let mut dl = DisplayList::new();

    assert_eq!(comp.paint(Vec::<(&FlashKey, FlashColor)>::new(), &mut dl), PaintOutcome::Cleared);
    assert_eq!(dl.take(), vec![PaintOp::Clear(window.bounds())]);

    let key = FlashKey::from("s::a");
    comp.paint([(&key, RED)], &mut dl);
    let ops = dl.take();
    assert_eq!(ops[0], PaintOp::Clear(window.bounds()));
    assert_eq!(ops[1], PaintOp::Rect(Rect::new(0.0, 0.0, 50.0, 20.0), RED));
}

#[test]
fn offscreen_or_unregistered_keys_report_no_work() {
    let (_window, mut comp) = setup();
    comp.register(widget_element("s::off", field(3, Rect::new(500.0, 500.0, 550.0, 520.0))));
    let off = FlashKey::from("s::off");
    let stranger = FlashKey::from("s::nobody");
    assert!(comp.work_for([&off, &stranger]).is_empty());

    let mut dl = DisplayList::new();
    assert_eq!(comp.paint([(&off, RED)], &mut dl), PaintOutcome::Cleared);
    assert_eq!(comp.cache().rebuild_count(), 0);
}

#[test]
fn fields_outside_every_viewport_are_culled_before_a_rebuild() {
    let (window, mut comp) = setup();
    window.set_viewports(vec![Rect::new(0.0, 100.0, 400.0, 300.0)]);
    comp.register(widget_element("s::hidden", field(3, Rect::new(10.0, 10.0, 150.0, 40.0))));
    comp.register(widget_element("s::shown", field(4, Rect::new(10.0, 120.0, 150.0, 150.0))));
    let hidden = FlashKey::from("s::hidden");
    let shown = FlashKey::from("s::shown");

    assert!(comp.work_for([&hidden]).is_empty());
    assert_eq!(comp.visible_keys_for([&hidden, &shown]), vec![shown.clone()]);
    assert_eq!(comp.cache().rebuild_count(), 0);
}

#[test]
fn masked_container_fills_mask_and_rows_are_delegated() {
    let (_window, mut comp) = setup();
    let group = field(10, Rect::new(0.0, 0.0, 200.0, 100.0));
    group.add_child(HeadlessWidget::new(11, Rect::new(10.0, 30.0, 190.0, 50.0)));
    comp.register(container_element("s::g", group.clone()));

    let view = HeadlessItemView::new(20, Rect::new(200.0, 0.0, 400.0, 300.0));
    view.attach(WindowId(1));
    view.set_row(ItemHandle(4), Rect::new(200.0, 0.0, 400.0, 20.0));
    comp.register(list_row_element("s::g", view.clone(), Rc::new(|| Some(ItemHandle(4))), 0.0));

    let key = FlashKey::from("s::g");
    let work = comp.work_for([&key]);
    assert!(work.overlay_repaint);
    assert_eq!(work.delegated.len(), 1);

    let mut dl = DisplayList::new();
    assert_eq!(comp.paint([(&key, RED)], &mut dl), PaintOutcome::Painted { fills: 1 });
    match &dl.ops()[1] {
        PaintOp::Mask(mask, color) => {
            assert_eq!(*color, RED);
            assert_eq!(mask.holes(), &[Rect::new(10.0, 30.0, 190.0, 50.0)]);
        }
        other => panic!("expected mask fill, got {other:?}"),
    }
}

#[test]
fn relayout_only_invalidates_for_tracked_hosts() {
    let (_window, mut comp) = setup();
    comp.register(widget_element("s::a", field(3, Rect::new(0.0, 0.0, 50.0, 20.0))));
    let key = FlashKey::from("s::a");
    comp.paint([(&key, RED)], &mut DisplayList::new());
    assert!(comp.cache().is_valid());

    assert!(!comp.on_layout_event(LayoutEvent::Relayout(HostId(99))));
    assert!(comp.cache().is_valid());
    assert!(comp.on_layout_event(LayoutEvent::Relayout(HostId(3))));
    assert!(!comp.cache().is_valid());

    comp.paint([(&key, RED)], &mut DisplayList::new());
    assert!(comp.on_layout_event(LayoutEvent::Scroll));
    assert!(!comp.cache().is_valid());
}
