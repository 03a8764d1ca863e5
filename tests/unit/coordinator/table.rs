use super::*;

const A: WindowId = WindowId(1);
const B: WindowId = WindowId(2);

fn key(s: &str) -> FlashKey {
    FlashKey::from(s)
}

#[test]
fn local_entries_shadow_broadcast_in_their_window_only() {
    let mut t = AnimationTable::default();
    t.insert_broadcast(key("s::x"), 1);
    t.insert_local(A, key("s::x"), 2);

    assert_eq!(t.get_for(A, &key("s::x")), Some(&2));
    assert_eq!(t.get_for(B, &key("s::x")), Some(&1));
    assert_eq!(t.len(), 2);

    let in_a: Vec<_> = t.iter_for(A).collect();
    assert_eq!(in_a, vec![(&key("s::x"), &2)]);
}

#[test]
fn local_only_keys_are_invisible_elsewhere() {
    let mut t = AnimationTable::default();
    t.insert_local(A, key("s::y"), 5);
    assert_eq!(t.get_for(B, &key("s::y")), None);
    assert_eq!(t.iter_for(B).count(), 0);
    assert!(t.contains_any(&key("s::y")));
    assert_eq!(t.get_any(&key("s::y")), Some(&5));
}

#[test]
fn removal_prunes_empty_windows() {
    let mut t = AnimationTable::default();
    t.insert_local(A, key("s::y"), 5);
    t.insert(AnimationScope::Broadcast, key("s::z"), 6);
    assert_eq!(t.remove(AnimationScope::Local(A), &key("s::y")), Some(5));
    assert_eq!(t.iter().count(), 1);

    t.insert_local(B, key("s::z"), 7);
    t.remove_local_entries(&key("s::z"));
    assert_eq!(t.get_for(B, &key("s::z")), Some(&6));

    t.insert_local(B, key("s::w"), 8);
    t.remove_window(B);
    assert!(!t.contains_any(&key("s::w")));
    t.clear();
    assert!(t.is_empty());
}
