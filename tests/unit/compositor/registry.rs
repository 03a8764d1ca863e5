use super::*;
use crate::element::container::widget_element;
use crate::foundation::core::{Rect, Size};
use crate::headless::{HeadlessWidget, HeadlessWindow};

#[test]
fn open_is_idempotent_and_close_clears() {
    let window = HeadlessWindow::new(4, Size::new(100.0, 100.0));
    let widget = HeadlessWidget::new(1, Rect::new(0.0, 0.0, 10.0, 10.0));
    widget.attach(WindowId(4));

    let mut reg = CompositorRegistry::default();
    reg.open(window.clone()).register(widget_element("s::a", widget.clone()));
    reg.open(window.clone());
    assert_eq!(reg.len(), 1);
    assert_eq!(reg.get(WindowId(4)).map(WindowCompositor::element_count), Some(1));

    let key = FlashKey::from("s::a");
    assert_eq!(reg.holding(&key).count(), 1);

    assert_eq!(reg.close(WindowId(4)), Some(1));
    assert!(reg.is_empty());
    assert_eq!(reg.close(WindowId(4)), None);
}
