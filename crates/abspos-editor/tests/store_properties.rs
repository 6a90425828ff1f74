//! Integration tests: store invariants under sequences of mutations.
//!
//! Every test drives the public `ElementStore` API and checks the tree and
//! stacking invariants that the canvas and exporter rely on.

use abspos_core::presets::preset;
use abspos_core::tree::ElementTree;
use abspos_editor::{ElementDraft, ElementId, ElementPatch, ElementStore, MemoryStorage, ZDirection};
use std::collections::HashSet;

// ─── Helpers ─────────────────────────────────────────────────────────────

fn store() -> ElementStore<MemoryStorage> {
    ElementStore::new(MemoryStorage::new())
}

fn div() -> ElementDraft {
    ElementDraft::new("div", 0.0, 0.0, 100.0, 100.0)
}

fn assert_acyclic(store: &ElementStore<MemoryStorage>) {
    let tree = ElementTree::build(store.elements());
    assert!(tree.cycles().is_empty(), "parent graph contains a cycle");
}

// ─── Reparenting ─────────────────────────────────────────────────────────

#[test]
fn reparent_under_descendant_is_rejected() {
    let mut s = store();
    let a = s.add(div());
    let b = s.add(div().with_parent(a));
    let c = s.add(div().with_parent(b));
    let saves = s.storage().save_count();

    assert!(!s.set_parent(a, Some(c)));
    assert_eq!(s.get(a).unwrap().parent_id, None);
    assert_eq!(s.storage().save_count(), saves, "rejected reparent must not persist");
    assert_acyclic(&s);
}

#[test]
fn reparent_under_sibling_subtree_is_allowed() {
    let mut s = store();
    let a = s.add(div());
    let b = s.add(div());
    let c = s.add(div().with_parent(b));

    assert!(s.set_parent(a, Some(c)));
    assert_eq!(s.get(a).unwrap().parent_id, Some(c));
    assert_acyclic(&s);
}

#[test]
fn random_reparent_sequence_stays_acyclic() {
    let mut s = store();
    let ids: Vec<ElementId> = (0..6).map(|_| s.add(div())).collect();
    // deterministic pseudo-random pairs
    let mut seed: u32 = 7;
    for _ in 0..60 {
        seed = seed.wrapping_mul(1_103_515_245).wrapping_add(12_345);
        let child = ids[(seed >> 8) as usize % ids.len()];
        let parent = ids[(seed >> 16) as usize % ids.len()];
        s.set_parent(child, Some(parent));
        assert_acyclic(&s);
    }
}

// ─── Cascading delete ────────────────────────────────────────────────────

#[test]
fn remove_takes_whole_subtree_only() {
    let mut s = store();
    let a = s.add(div());
    let b = s.add(div().with_parent(a));
    let _c = s.add(div().with_parent(b));
    let other = s.add(div());
    let other_child = s.add(div().with_parent(other));

    s.remove(a);

    let left: HashSet<_> = s.elements().iter().map(|el| el.id).collect();
    assert_eq!(left, HashSet::from([other, other_child]));
}

#[test]
fn remove_unknown_is_noop() {
    let mut s = store();
    s.add(div());
    let saves = s.storage().save_count();
    s.remove(ElementId::intern("element-0-missing"));
    assert_eq!(s.elements().len(), 1);
    assert_eq!(s.storage().save_count(), saves);
}

// ─── Default stacking ────────────────────────────────────────────────────

#[test]
fn defaulted_z_is_above_everything() {
    let mut s = store();
    s.add(div().with_z_index(12));
    let parent = s.add(div());
    let child = s.add(div().with_parent(parent));
    assert_eq!(s.get(parent).unwrap().z_index, 13);
    // max is collection-wide, not per sibling group
    assert_eq!(s.get(child).unwrap().z_index, 14);
    assert_eq!(s.max_z_index(), 14);
}

#[test]
fn empty_store_max_z_is_zero() {
    assert_eq!(store().max_z_index(), 0);
}

// ─── Z-order boundaries ──────────────────────────────────────────────────

#[test]
fn top_and_bottom_among_three_siblings() {
    let mut s = store();
    let low = s.add(div().with_z_index(1));
    let _mid = s.add(div().with_z_index(2));
    let high = s.add(div().with_z_index(3));

    s.adjust_z(low, ZDirection::Top);
    assert_eq!(s.get(low).unwrap().z_index, 4);

    s.adjust_z(high, ZDirection::Bottom);
    assert_eq!(s.get(high).unwrap().z_index, 1);
}

#[test]
fn bottom_goes_below_lowest_sibling() {
    let mut s = store();
    s.add(div().with_z_index(1));
    s.add(div().with_z_index(2));
    let high = s.add(div().with_z_index(3));
    s.adjust_z(high, ZDirection::Bottom);
    assert_eq!(s.get(high).unwrap().z_index, 0);
}

#[test]
fn up_at_the_top_is_unchanged() {
    let mut s = store();
    s.add(div().with_z_index(1));
    let high = s.add(div().with_z_index(5));
    s.adjust_z(high, ZDirection::Up);
    assert_eq!(s.get(high).unwrap().z_index, 5);
}

// ─── Queries ─────────────────────────────────────────────────────────────

#[test]
fn children_keep_collection_order() {
    let mut s = store();
    let parent = s.add(div());
    let first = s.add(div().with_parent(parent).with_z_index(9));
    let second = s.add(div().with_parent(parent).with_z_index(2));
    let kids: Vec<_> = s.children_of(parent).iter().map(|el| el.id).collect();
    assert_eq!(kids, [first, second]);
}

#[test]
fn update_merges_and_persists() {
    let mut s = store();
    let id = s.add(preset("button").unwrap().draft());
    s.update(
        id,
        ElementPatch {
            content: Some("Save".into()),
            ..ElementPatch::position(5.0, 6.0)
        },
    );
    let el = s.get(id).unwrap();
    assert_eq!((el.x, el.y), (5.0, 6.0));
    assert_eq!(el.content.as_deref(), Some("Save"));
    assert_eq!(el.width, 120.0);
    assert_eq!(s.storage().load().unwrap(), s.elements());
}

#[test]
fn short_ids_are_unique() {
    let mut s = store();
    let ids: Vec<_> = (0..50).map(|_| s.add(div())).collect();
    let shorts: HashSet<_> = ids.iter().map(|id| id.short_id()).collect();
    assert_eq!(shorts.len(), ids.len());
}

#[test]
fn selection_is_not_persisted() {
    let mut s = store();
    let a = s.add(div());
    let saves = s.storage().save_count();
    s.set_selected(None);
    s.set_selected(Some(a));
    assert_eq!(s.storage().save_count(), saves);
    assert_eq!(s.selected_element().map(|el| el.id), Some(a));
}
