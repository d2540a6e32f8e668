//! Integration tests for relation definitions and edges.

use std::collections::BTreeSet;

use odsgraph_cache::schema::RelationDef;
use odsgraph_cache::{CacheError, ConstraintError, ModelState, NotFoundError};
use odsgraph_core::{InstanceHandle, InstanceId, RelationId, RelationRange, TypeId};

/// Test -> SubTest hierarchy, built the way schema loaders do it: relations
/// first, targets bound afterwards.
struct Hierarchy {
    state: ModelState,
    test: TypeId,
    sub: TypeId,
    children: RelationId,
    parent: RelationId,
}

fn hierarchy() -> Hierarchy {
    let mut state = ModelState::default();
    let test = state.register_type("Test", "AoTest").unwrap();
    let sub = state.register_type("SubTest", "AoSubTest").unwrap();
    let children = state.add_relation(RelationDef::new("children", "parent_test", test).with_base("children")).unwrap();
    let parent = state
        .add_relation(
            RelationDef::new("parent_test", "children", sub)
                .with_range(RelationRange::EXACTLY_ONE)
                .with_base("parent_test"),
        )
        .unwrap();
    state.bind_target(children, sub).unwrap();
    state.bind_target(parent, test).unwrap();
    state.validate_relations().unwrap();
    Hierarchy { state, test, sub, children, parent }
}

fn set(ids: &[InstanceId]) -> BTreeSet<InstanceId> {
    ids.iter().copied().collect()
}

// ============================================================================
// Definition Tests
// ============================================================================

#[test]
fn test_inverse_symmetry() {
    let h = hierarchy();
    for rel in h.state.list_all_relations() {
        let inverse = h.state.get_inverse_relation(rel.id()).unwrap();
        assert_eq!(h.state.get_inverse_relation(inverse).unwrap(), rel.id());
    }
}

#[test]
fn test_missing_inverse_is_an_error() {
    let mut state = ModelState::default();
    let a = state.register_type("A", "AoAny").unwrap();
    let b = state.register_type("B", "AoAny").unwrap();
    let rel = state.add_relation(RelationDef::new("bs", "a", a).with_target(b)).unwrap();

    let err = state.get_inverse_relation(rel).unwrap_err();
    assert!(matches!(err, CacheError::NotFound(NotFoundError::NoInverseRelation { .. })));
    assert!(state.validate_relations().is_err());
}

#[test]
fn test_relation_lookup() {
    let h = hierarchy();
    assert_eq!(h.state.relation_by_name(h.test, "children").unwrap().id(), h.children);
    assert_eq!(h.state.relation(h.parent).unwrap().base_relation(), Some("parent_test"));
    assert!(h.state.relation_by_name(h.test, "parent_test").unwrap_err().is_not_found());
    assert_eq!(h.state.list_relations(h.sub).unwrap().len(), 1);
}

#[test]
fn test_duplicate_relation_name() {
    let mut h = hierarchy();
    let err = h.state.add_relation(RelationDef::new("children", "x", h.test)).unwrap_err();
    assert!(err.is_schema_error());
}

// ============================================================================
// Edge Tests
// ============================================================================

#[test]
fn test_connect_from_either_side() {
    let mut h = hierarchy();
    let t = h.state.insert(h.test).unwrap();
    let s1 = h.state.insert(h.sub).unwrap();
    let s2 = h.state.insert(h.sub).unwrap();

    h.state.connect(h.test, t, h.children, s1).unwrap();
    h.state.connect(h.sub, s2, h.parent, t).unwrap();

    assert_eq!(h.state.query(h.test, t, h.children).unwrap(), set(&[s1, s2]));
    assert_eq!(h.state.query(h.sub, s2, h.parent).unwrap(), set(&[t]));
}

#[test]
fn test_single_valued_truncation_keeps_latest() {
    let mut h = hierarchy();
    let t1 = h.state.insert(h.test).unwrap();
    let t2 = h.state.insert(h.test).unwrap();
    let s = h.state.insert(h.sub).unwrap();

    h.state.connect(h.sub, s, h.parent, t1).unwrap();
    h.state.connect(h.sub, s, h.parent, t2).unwrap();

    assert_eq!(h.state.query(h.sub, s, h.parent).unwrap(), set(&[t2]));
    assert!(h.state.query(h.test, t1, h.children).unwrap().is_empty());
    assert_eq!(h.state.query(h.test, t2, h.children).unwrap(), set(&[s]));
}

#[test]
fn test_cascading_delete() {
    let mut h = hierarchy();
    let t = h.state.insert(h.test).unwrap();
    let subs: Vec<_> = (0..3).map(|_| h.state.insert(h.sub).unwrap()).collect();
    for s in &subs {
        h.state.connect(h.test, t, h.children, *s).unwrap();
    }

    h.state.delete(h.test, t).unwrap();

    for s in &subs {
        assert!(h.state.query(h.sub, *s, h.parent).unwrap().is_empty());
    }
    assert_eq!(h.state.graph().edge_count(), 0);
    let err = h.state.delete(h.test, t).unwrap_err();
    assert!(matches!(err, CacheError::NotFound(NotFoundError::UnknownInstance { .. })));
}

#[test]
fn test_disconnect_is_idempotent() {
    let mut h = hierarchy();
    let t = h.state.insert(h.test).unwrap();
    let s = h.state.insert(h.sub).unwrap();
    h.state.connect(h.test, t, h.children, s).unwrap();

    h.state.disconnect(h.test, t, h.children, s).unwrap();
    h.state.disconnect(h.test, t, h.children, s).unwrap();
    assert!(h.state.query(h.sub, s, h.parent).unwrap().is_empty());
}

#[test]
fn test_bounded_relation_rejects_overflow() {
    let mut h = hierarchy();
    h.state.set_relation_range(h.children, RelationRange::new(0, 2)).unwrap();
    let t = h.state.insert(h.test).unwrap();
    let subs: Vec<_> = (0..3).map(|_| h.state.insert(h.sub).unwrap()).collect();
    h.state.connect(h.test, t, h.children, subs[0]).unwrap();
    h.state.connect(h.test, t, h.children, subs[1]).unwrap();

    let err = h.state.connect(h.test, t, h.children, subs[2]).unwrap_err();
    assert!(matches!(err, CacheError::Constraint(ConstraintError::CardinalityViolation { .. })));
    // the failed call left no half edge behind
    assert!(h.state.query(h.sub, subs[2], h.parent).unwrap().is_empty());
}

#[test]
fn test_set_related() {
    let mut h = hierarchy();
    let t = h.state.insert(h.test).unwrap();
    let subs: Vec<_> = (0..4).map(|_| h.state.insert(h.sub).unwrap()).collect();

    h.state.set_related(h.test, t, h.children, subs[..3].iter().copied()).unwrap();
    h.state.set_related(h.test, t, h.children, [subs[2], subs[3]]).unwrap();

    assert_eq!(h.state.query(h.test, t, h.children).unwrap(), set(&[subs[2], subs[3]]));
    assert!(h.state.query(h.sub, subs[0], h.parent).unwrap().is_empty());
    assert_eq!(h.state.query(h.sub, subs[3], h.parent).unwrap(), set(&[t]));
}

#[test]
fn test_set_related_rejects_unknown_target() {
    let mut h = hierarchy();
    let t = h.state.insert(h.test).unwrap();
    let err = h.state.set_related(h.test, t, h.children, [InstanceId::new(9)]).unwrap_err();
    assert!(matches!(err, CacheError::NotFound(NotFoundError::UnknownInstance { .. })));
}

#[test]
fn test_connect_unbound_relation() {
    let mut state = ModelState::default();
    let a = state.register_type("A", "AoAny").unwrap();
    let rel = state.add_relation(RelationDef::new("x", "y", a)).unwrap();
    let i = state.insert(a).unwrap();
    let err = state.connect(a, i, rel, i).unwrap_err();
    assert!(matches!(err, CacheError::NotFound(NotFoundError::NoInverseRelation { .. })));
}

#[test]
fn test_query_with_foreign_relation() {
    let mut h = hierarchy();
    let s = h.state.insert(h.sub).unwrap();
    let err = h.state.query(h.sub, s, h.children).unwrap_err();
    assert!(matches!(err, CacheError::NotFound(NotFoundError::UnknownRelation(_))));
}

#[test]
fn test_remove_relation_drops_edges() {
    let mut h = hierarchy();
    let t = h.state.insert(h.test).unwrap();
    let s = h.state.insert(h.sub).unwrap();
    h.state.connect(h.test, t, h.children, s).unwrap();

    h.state.remove_relation(h.children).unwrap();
    assert!(h.state.query(h.sub, s, h.parent).unwrap().is_empty());
    assert!(h.state.relation(h.children).unwrap_err().is_not_found());
    assert!(h.state.get_inverse_relation(h.parent).is_err());
}

// ============================================================================
// Schema Evolution Tests
// ============================================================================

#[test]
fn test_rebind_to_same_target_is_noop() {
    let mut h = hierarchy();
    let t = h.state.insert(h.test).unwrap();
    let s = h.state.insert(h.sub).unwrap();
    h.state.connect(h.test, t, h.children, s).unwrap();

    h.state.bind_target(h.children, h.sub).unwrap();
    assert_eq!(h.state.query(h.test, t, h.children).unwrap(), set(&[s]));
    h.state.validate_relations().unwrap();
}

#[test]
fn test_rebind_with_edges_is_rejected() {
    let mut h = hierarchy();
    let other = h.state.register_type("OtherSubTest", "AoSubTest").unwrap();
    let t = h.state.insert(h.test).unwrap();
    let s = h.state.insert(h.sub).unwrap();
    h.state.connect(h.test, t, h.children, s).unwrap();

    let err = h.state.bind_target(h.children, other).unwrap_err();
    assert!(matches!(err, CacheError::Constraint(ConstraintError::RelationHasEdges { edges: 2, .. })));

    // the inverse side is guarded as well
    let err = h.state.bind_target(h.parent, other).unwrap_err();
    assert!(matches!(err, CacheError::Constraint(ConstraintError::RelationHasEdges { .. })));

    assert_eq!(h.state.relation(h.children).unwrap().target(), Some(h.sub));
    assert_eq!(h.state.relation(h.parent).unwrap().target(), Some(h.test));
    assert_eq!(h.state.query(h.test, t, h.children).unwrap(), set(&[s]));
    assert_eq!(h.state.graph().edge_count(), 2);
    h.state.validate_relations().unwrap();
}

#[test]
fn test_rebind_after_edges_dropped() {
    let mut h = hierarchy();
    let other = h.state.register_type("OtherSubTest", "AoSubTest").unwrap();
    let t = h.state.insert(h.test).unwrap();
    let s = h.state.insert(h.sub).unwrap();
    h.state.connect(h.test, t, h.children, s).unwrap();
    h.state.disconnect(h.test, t, h.children, s).unwrap();
    assert_eq!(h.state.graph().edge_count(), 0);

    h.state.remove_relation(h.parent).unwrap();
    h.state.bind_target(h.children, other).unwrap();
    h.state
        .add_relation(
            RelationDef::new("parent_test", "children", other)
                .with_target(h.test)
                .with_range(RelationRange::EXACTLY_ONE),
        )
        .unwrap();
    h.state.validate_relations().unwrap();

    let o = h.state.insert(other).unwrap();
    h.state.connect(h.test, t, h.children, o).unwrap();
    assert_eq!(h.state.graph().edge_count(), 2);
    assert!(!h.state.graph().references(h.state.catalog(), InstanceHandle::new(h.sub, s)));
    assert!(h.state.graph().references(h.state.catalog(), InstanceHandle::new(other, o)));
}

#[test]
fn test_remove_type_after_edges_dropped() {
    let mut h = hierarchy();
    let t = h.state.insert(h.test).unwrap();
    let s1 = h.state.insert(h.sub).unwrap();
    let s2 = h.state.insert(h.sub).unwrap();
    h.state.connect(h.test, t, h.children, s1).unwrap();
    h.state.connect(h.test, t, h.children, s2).unwrap();

    h.state.delete(h.sub, s1).unwrap();
    h.state.disconnect(h.test, t, h.children, s2).unwrap();
    h.state.delete(h.sub, s2).unwrap();
    assert_eq!(h.state.graph().edge_count(), 0);

    h.state.remove_type(h.sub).unwrap();
    assert!(h.state.list_all_relations().is_empty());
    assert!(h.state.list_relations(h.test).unwrap().is_empty());
    assert!(!h.state.graph().references(h.state.catalog(), InstanceHandle::new(h.test, t)));
    assert!(h.state.exists(h.test, t));
    h.state.validate_relations().unwrap();
}
