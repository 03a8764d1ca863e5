use super::*;
use crate::foundation::core::WindowId;
use crate::headless::{HeadlessWidget, HeadlessWindow};

const WIN: WindowId = WindowId(1);

struct Form {
    window: Rc<HeadlessWindow>,
    group: Rc<HeadlessWidget>,
    title: Rc<HeadlessWidget>,
    leaves: [Rc<HeadlessWidget>; 3],
}

fn form() -> Form {
    let window = HeadlessWindow::new(WIN.0, Size::new(400.0, 300.0));
    let group = HeadlessWidget::new(10, Rect::new(0.0, 0.0, 300.0, 200.0));
    group.set_frame(0.0, 20.0, 0.0);
    group.attach(WIN);
    let title = HeadlessWidget::new(11, Rect::new(10.0, 2.0, 100.0, 18.0));
    let leaves = [
        HeadlessWidget::new(21, Rect::new(10.0, 30.0, 290.0, 60.0)),
        HeadlessWidget::new(22, Rect::new(10.0, 80.0, 290.0, 110.0)),
        HeadlessWidget::new(23, Rect::new(10.0, 130.0, 290.0, 160.0)),
    ];
    Form {
        window,
        group,
        title,
        leaves,
    }
}

#[test]
fn standard_mode_masks_every_leaf() {
    let f = form();
    for leaf in &f.leaves {
        f.group.add_child(leaf.clone());
    }
    let mut el = container_element("plate::group", f.group.clone());
    let rects = el.exclusion_rects(&*f.window);
    assert_eq!(rects.len(), 3);
    for (rect, leaf) in rects.iter().zip(&f.leaves) {
        assert_eq!(Some(*rect), leaf.rect_in_window(WIN));
    }
    assert_eq!(el.source().as_str(), "group:10");
}

#[test]
fn inverse_mode_masks_title_and_leaf_row_only() {
    let f = form();
    f.group.add_child(f.title.clone());
    for leaf in &f.leaves {
        f.group.add_child(leaf.clone());
    }
    let mut el = leaf_in_container_element("plate::leaf", f.group.clone(), f.leaves[1].clone());
    let rects = el.exclusion_rects(&*f.window);

    assert_eq!(rects.len(), 2);
    assert!(rects.contains(&Rect::new(10.0, 2.0, 100.0, 18.0)));
    assert!(rects.contains(&Rect::new(10.0, 80.0, 290.0, 110.0)));
    assert!(!rects.contains(&Rect::new(10.0, 30.0, 290.0, 60.0)));
    assert!(!rects.contains(&Rect::new(10.0, 130.0, 290.0, 160.0)));
    assert_eq!(el.source().as_str(), "leaf:10:22");
}

#[test]
fn child_scan_is_cached_until_resize() {
    let f = form();
    for leaf in &f.leaves {
        f.group.add_child(leaf.clone());
    }
    let mut el = container_element("plate::group", f.group.clone());
    el.exclusion_rects(&*f.window);
    el.exclusion_rects(&*f.window);
    assert_eq!(f.group.child_scan_count(), 1);

    f.group.set_rect(Rect::new(0.0, 0.0, 320.0, 200.0));
    el.exclusion_rects(&*f.window);
    assert_eq!(f.group.child_scan_count(), 2);

    el.invalidate();
    el.exclusion_rects(&*f.window);
    assert_eq!(f.group.child_scan_count(), 3);
}

#[test]
fn geometry_applies_inset_and_default_radius() {
    let f = form();
    f.group.set_frame(8.0, 20.0, 0.0);
    let mut el = container_element("plate::group", f.group.clone());
    assert_eq!(el.corner_radius(), DEFAULT_CORNER_RADIUS);
    assert_eq!(
        el.query_rect(&*f.window),
        Some(Rect::new(0.0, 8.0, 300.0, 200.0))
    );

    f.group.set_visible(false);
    assert_eq!(el.query_rect(&*f.window), None);
    assert!(el.exclusion_rects(&*f.window).is_empty());
}

#[test]
fn destroyed_widget_is_simply_not_visible() {
    let f = form();
    let mut el = widget_element("plate::field", f.leaves[0].clone());
    assert_eq!(el.query_rect(&*f.window), None);

    f.leaves[0].attach(WIN);
    assert!(el.query_rect(&*f.window).is_some());
    f.leaves[0].destroy();
    assert_eq!(el.query_rect(&*f.window), None);
}
