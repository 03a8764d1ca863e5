use super::*;

#[test]
fn scoped_keys_split_into_parent_and_leaf() {
    let key = FlashKey::scoped("plate1", "step_0::threshold");
    assert_eq!(key.as_str(), "plate1::step_0::threshold");
    assert_eq!(key.parent_scope(), "plate1");
    assert_eq!(key.leaf(), "threshold");
    assert!(key.is_scoped());
}

#[test]
fn empty_scope_keeps_raw_key() {
    let key = FlashKey::scoped("", "threshold");
    assert_eq!(key.as_str(), "threshold");
    assert!(!key.is_scoped());
    assert_eq!(key.parent_scope(), "threshold");
}

#[test]
fn overlap_rejects_touching_rects() {
    let a = Rect::new(0.0, 0.0, 10.0, 10.0);
    let b = Rect::new(10.0, 0.0, 20.0, 10.0);
    assert_eq!(overlap(a, b), None);

    let c = Rect::new(5.0, 5.0, 15.0, 15.0);
    assert_eq!(overlap(a, c), Some(Rect::new(5.0, 5.0, 10.0, 10.0)));
}

#[test]
fn with_alpha_keeps_rgb() {
    let c = FlashColor::rgb(10, 20, 30).with_alpha(7);
    assert_eq!(c, FlashColor::rgba(10, 20, 30, 7));
    assert_eq!(c.rgb_array(), [10, 20, 30]);
}
