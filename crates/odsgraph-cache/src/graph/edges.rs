//! Mirrored relation edges.
//!
//! Edges are stored per instance handle and relation as a set of target
//! instance ids. Every edge `(s, R) -> t` has its mirror `(t, R') -> s`
//! where `R'` is the inverse of `R`; the operations here keep both sides in
//! step.

use std::collections::{BTreeSet, HashMap};

use odsgraph_core::{InstanceHandle, InstanceId, RelationId, RelationRange, TypeId};
use tracing::debug;

use crate::error::{CacheError, CacheResult, ConstraintError};
use crate::schema::{Relation, TypeCatalog};

type EdgeMap = HashMap<RelationId, BTreeSet<InstanceId>>;

/// A relation resolved together with its inverse.
#[derive(Debug, Clone, Copy)]
struct Link {
    forward: RelationId,
    inverse: RelationId,
    source: TypeId,
    target: TypeId,
    forward_range: RelationRange,
    inverse_range: RelationRange,
}

impl Link {
    fn resolve(catalog: &TypeCatalog, source: TypeId, relation: RelationId) -> CacheResult<Self> {
        let forward = catalog.relation(relation)?;
        if forward.source() != source {
            return Err(CacheError::relation_not_of_type(forward.name(), source));
        }
        let inverse_id = catalog.inverse_relation(relation)?;
        let inverse = catalog.relation(inverse_id)?;
        Ok(Self {
            forward: relation,
            inverse: inverse_id,
            source,
            target: inverse.source(),
            forward_range: forward.range(),
            inverse_range: inverse.range(),
        })
    }
}

/// The edge sets of all instances.
#[derive(Debug, Default)]
pub struct RelationGraph {
    edges: HashMap<InstanceHandle, EdgeMap>,
}

impl RelationGraph {
    /// Create an empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn set(&self, handle: InstanceHandle, relation: RelationId) -> Option<&BTreeSet<InstanceId>> {
        self.edges.get(&handle)?.get(&relation)
    }

    fn set_len(&self, handle: InstanceHandle, relation: RelationId) -> usize {
        self.set(handle, relation).map_or(0, BTreeSet::len)
    }

    fn insert_edge(&mut self, handle: InstanceHandle, relation: RelationId, target: InstanceId) {
        self.edges.entry(handle).or_default().entry(relation).or_default().insert(target);
    }

    fn remove_edge(&mut self, handle: InstanceHandle, relation: RelationId, target: InstanceId) -> bool {
        let Some(map) = self.edges.get_mut(&handle) else {
            return false;
        };
        let removed = map.get_mut(&relation).is_some_and(|set| set.remove(&target));
        map.retain(|_, set| !set.is_empty());
        if map.is_empty() {
            self.edges.remove(&handle);
        }
        removed
    }

    fn take_set(&mut self, handle: InstanceHandle, relation: RelationId) -> BTreeSet<InstanceId> {
        let Some(map) = self.edges.get_mut(&handle) else {
            return BTreeSet::new();
        };
        let taken = map.remove(&relation).unwrap_or_default();
        if map.is_empty() {
            self.edges.remove(&handle);
        }
        taken
    }

    /// Fails if one more edge does not fit a bounded range above one.
    fn check_room(
        catalog: &TypeCatalog,
        relation: RelationId,
        range: RelationRange,
        current: usize,
    ) -> CacheResult<()> {
        if range.is_single() || range.admits(current + 1) {
            return Ok(());
        }
        let name = catalog.relation(relation).map(|r| r.name().to_owned()).unwrap_or_default();
        Err(ConstraintError::CardinalityViolation { relation: name, max: range.max, requested: current + 1 }
            .into())
    }

    /// Add the edge and its mirror after all checks passed.
    ///
    /// A side whose range allows a single instance gives up its previous
    /// partner, together with that partner's mirror.
    fn link(&mut self, link: &Link, source: InstanceId, target: InstanceId) {
        let src = InstanceHandle::new(link.source, source);
        let dst = InstanceHandle::new(link.target, target);

        if link.forward_range.is_single() {
            for old in self.take_set(src, link.forward) {
                if old != target {
                    self.remove_edge(InstanceHandle::new(link.target, old), link.inverse, source);
                }
            }
        }
        if link.inverse_range.is_single() {
            for old in self.take_set(dst, link.inverse) {
                if old != source {
                    self.remove_edge(InstanceHandle::new(link.source, old), link.forward, target);
                }
            }
        }
        self.insert_edge(src, link.forward, target);
        self.insert_edge(dst, link.inverse, source);
    }

    /// Connect `source` to `target` under `relation`, mirroring the edge
    /// under the inverse relation.
    ///
    /// If a side's range allows one instance, the previous partner is
    /// replaced. If a bounded side is already full the call fails without
    /// changing anything. Instance existence is checked by the caller.
    ///
    /// # Errors
    ///
    /// - [`NotFoundError::UnknownRelation`](crate::NotFoundError::UnknownRelation) if the relation is not a relation of the source type
    /// - [`NotFoundError::NoInverseRelation`](crate::NotFoundError::NoInverseRelation) if the target is unbound or has no inverse
    /// - [`ConstraintError::CardinalityViolation`] if a bounded side is full
    pub fn connect(
        &mut self,
        catalog: &TypeCatalog,
        source: InstanceHandle,
        relation: RelationId,
        target: InstanceId,
    ) -> CacheResult<()> {
        let link = Link::resolve(catalog, source.type_id, relation)?;
        let dst = InstanceHandle::new(link.target, target);
        if self.set(source, relation).is_some_and(|s| s.contains(&target)) {
            return Ok(());
        }
        Self::check_room(catalog, link.forward, link.forward_range, self.set_len(source, link.forward))?;
        Self::check_room(catalog, link.inverse, link.inverse_range, self.set_len(dst, link.inverse))?;

        self.link(&link, source.instance_id, target);
        debug!(source = %source, relation = %relation, target = %dst, "connected");
        Ok(())
    }

    /// Remove the edge from `source` to `target` and its mirror.
    ///
    /// Removing an edge that does not exist is not an error.
    ///
    /// # Errors
    ///
    /// Fails if the relation does not belong to the source type or has no inverse.
    pub fn disconnect(
        &mut self,
        catalog: &TypeCatalog,
        source: InstanceHandle,
        relation: RelationId,
        target: InstanceId,
    ) -> CacheResult<()> {
        let link = Link::resolve(catalog, source.type_id, relation)?;
        let removed = self.remove_edge(source, link.forward, target);
        self.remove_edge(InstanceHandle::new(link.target, target), link.inverse, source.instance_id);
        if removed {
            debug!(source = %source, relation = %relation, target = %target, "disconnected");
        }
        Ok(())
    }

    /// Replace the whole edge set of `source` under `relation`.
    ///
    /// # Errors
    ///
    /// Fails like [`connect`](Self::connect); a `targets` list longer than
    /// the relation's maximum is a [`ConstraintError::CardinalityViolation`].
    pub fn set_related(
        &mut self,
        catalog: &TypeCatalog,
        source: InstanceHandle,
        relation: RelationId,
        targets: &BTreeSet<InstanceId>,
    ) -> CacheResult<()> {
        let link = Link::resolve(catalog, source.type_id, relation)?;
        if !link.forward_range.admits(targets.len()) {
            let name = catalog.relation(relation)?.name().to_owned();
            return Err(ConstraintError::CardinalityViolation {
                relation: name,
                max: link.forward_range.max,
                requested: targets.len(),
            }
            .into());
        }
        let current = self.set(source, relation).cloned().unwrap_or_default();
        for target in targets.difference(&current) {
            let dst = InstanceHandle::new(link.target, *target);
            Self::check_room(catalog, link.inverse, link.inverse_range, self.set_len(dst, link.inverse))?;
        }

        for old in current.difference(targets) {
            self.remove_edge(source, link.forward, *old);
            self.remove_edge(InstanceHandle::new(link.target, *old), link.inverse, source.instance_id);
        }
        for target in targets.difference(&current) {
            self.link(&link, source.instance_id, *target);
        }
        debug!(source = %source, relation = %relation, count = targets.len(), "replaced related instances");
        Ok(())
    }

    /// Ids related to `source` under `relation`; empty if none are recorded.
    ///
    /// # Errors
    ///
    /// Returns [`NotFoundError::UnknownRelation`](crate::NotFoundError::UnknownRelation) if the relation does not
    /// exist or is not a relation of the source type.
    pub fn query(
        &self,
        catalog: &TypeCatalog,
        source: InstanceHandle,
        relation: RelationId,
    ) -> CacheResult<BTreeSet<InstanceId>> {
        let rel = catalog.relation(relation)?;
        if rel.source() != source.type_id {
            return Err(CacheError::relation_not_of_type(rel.name(), source.type_id));
        }
        Ok(self.set(source, relation).cloned().unwrap_or_default())
    }

    /// Remove every edge in which the instance takes part, on both sides.
    pub fn drop_all_edges_for(&mut self, catalog: &TypeCatalog, handle: InstanceHandle) {
        let outgoing = self.edges.remove(&handle).unwrap_or_default();
        let mut dropped = 0usize;
        for (relation, targets) in outgoing {
            dropped += targets.len();
            let (Ok(rel), Ok(inverse)) = (catalog.relation(relation), catalog.inverse_relation(relation)) else {
                continue;
            };
            let Some(target_type) = rel.target() else {
                continue;
            };
            for target in targets {
                self.remove_edge(InstanceHandle::new(target_type, target), inverse, handle.instance_id);
            }
        }

        // Incoming edges whose mirror is missing are only reachable this way.
        let incoming: Vec<(TypeId, RelationId)> =
            catalog.relations_targeting(handle.type_id).map(|r| (r.source(), r.id())).collect();
        for (source_type, relation) in incoming {
            for (owner, map) in &mut self.edges {
                if owner.type_id != source_type {
                    continue;
                }
                if let Some(set) = map.get_mut(&relation) {
                    if set.remove(&handle.instance_id) {
                        dropped += 1;
                    }
                }
            }
        }
        self.edges.retain(|_, map| {
            map.retain(|_, set| !set.is_empty());
            !map.is_empty()
        });
        debug!(instance = %handle, edges = dropped, "dropped all edges");
    }

    /// Remove every edge recorded under a relation, and under its inverse
    /// between the same two types.
    pub fn drop_relation(&mut self, relation: &Relation, inverse: Option<RelationId>) {
        let target = relation.target();
        for (owner, map) in &mut self.edges {
            if owner.type_id == relation.source() {
                map.remove(&relation.id());
            }
            if let (Some(inverse), Some(target)) = (inverse, target) {
                if owner.type_id == target {
                    map.remove(&inverse);
                }
            }
        }
        self.edges.retain(|_, map| !map.is_empty());
    }

    /// The size of the largest edge set recorded under a relation.
    #[must_use]
    pub fn largest_set(&self, relation: RelationId) -> usize {
        self.edges.values().filter_map(|map| map.get(&relation)).map(BTreeSet::len).max().unwrap_or(0)
    }

    /// Number of edges recorded under a relation, one direction only.
    #[must_use]
    pub fn edges_under(&self, relation: RelationId) -> usize {
        self.edges.values().filter_map(|map| map.get(&relation)).map(BTreeSet::len).sum()
    }

    /// Returns `true` if the instance occurs in any edge, on either side.
    #[must_use]
    pub fn references(&self, catalog: &TypeCatalog, handle: InstanceHandle) -> bool {
        if self.edges.contains_key(&handle) {
            return true;
        }
        catalog.relations_targeting(handle.type_id).any(|rel| {
            self.edges
                .iter()
                .filter(|(owner, _)| owner.type_id == rel.source())
                .any(|(_, map)| map.get(&rel.id()).is_some_and(|set| set.contains(&handle.instance_id)))
        })
    }

    /// Total number of stored edge entries, counting both directions.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.values().flat_map(HashMap::values).map(BTreeSet::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::NotFoundError;
    use crate::schema::RelationDef;

    struct Fixture {
        catalog: TypeCatalog,
        parent: TypeId,
        child: TypeId,
        children: RelationId,
        parent_rel: RelationId,
    }

    fn fixture(children_range: RelationRange) -> Fixture {
        let mut catalog = TypeCatalog::default();
        let parent = catalog.register_type("Parent", "AoAny").unwrap();
        let child = catalog.register_type("Child", "AoAny").unwrap();
        let children = catalog
            .add_relation(RelationDef::new("children", "parent", parent).with_target(child).with_range(children_range))
            .unwrap();
        let parent_rel = catalog
            .add_relation(
                RelationDef::new("parent", "children", child).with_target(parent).with_range(RelationRange::OPTIONAL),
            )
            .unwrap();
        Fixture { catalog, parent, child, children, parent_rel }
    }

    fn ids(raw: &[u64]) -> BTreeSet<InstanceId> {
        raw.iter().copied().map(InstanceId::new).collect()
    }

    #[test]
    fn connect_mirrors_edge() {
        let f = fixture(RelationRange::MANY);
        let mut graph = RelationGraph::new();
        let p1 = InstanceHandle::new(f.parent, InstanceId::new(1));
        let c1 = InstanceHandle::new(f.child, InstanceId::new(1));
        graph.connect(&f.catalog, p1, f.children, c1.instance_id).unwrap();
        assert_eq!(graph.query(&f.catalog, p1, f.children).unwrap(), ids(&[1]));
        assert_eq!(graph.query(&f.catalog, c1, f.parent_rel).unwrap(), ids(&[1]));
        assert_eq!(graph.edge_count(), 2);
    }

    #[test]
    fn single_side_replaces_and_unmirrors() {
        let f = fixture(RelationRange::MANY);
        let mut graph = RelationGraph::new();
        let p1 = InstanceHandle::new(f.parent, InstanceId::new(1));
        let p2 = InstanceHandle::new(f.parent, InstanceId::new(2));
        let c1 = InstanceHandle::new(f.child, InstanceId::new(1));

        graph.connect(&f.catalog, c1, f.parent_rel, p1.instance_id).unwrap();
        graph.connect(&f.catalog, c1, f.parent_rel, p2.instance_id).unwrap();

        assert_eq!(graph.query(&f.catalog, c1, f.parent_rel).unwrap(), ids(&[2]));
        assert!(graph.query(&f.catalog, p1, f.children).unwrap().is_empty());
        assert_eq!(graph.query(&f.catalog, p2, f.children).unwrap(), ids(&[1]));
    }

    #[test]
    fn connecting_from_many_side_displaces_old_parent() {
        let f = fixture(RelationRange::MANY);
        let mut graph = RelationGraph::new();
        let p1 = InstanceHandle::new(f.parent, InstanceId::new(1));
        let p2 = InstanceHandle::new(f.parent, InstanceId::new(2));
        let c1 = InstanceHandle::new(f.child, InstanceId::new(1));

        graph.connect(&f.catalog, p1, f.children, c1.instance_id).unwrap();
        graph.connect(&f.catalog, p2, f.children, c1.instance_id).unwrap();

        assert!(graph.query(&f.catalog, p1, f.children).unwrap().is_empty());
        assert_eq!(graph.query(&f.catalog, c1, f.parent_rel).unwrap(), ids(&[2]));
    }

    #[test]
    fn bounded_side_rejects_when_full() {
        let f = fixture(RelationRange::new(0, 2));
        let mut graph = RelationGraph::new();
        let p1 = InstanceHandle::new(f.parent, InstanceId::new(1));
        graph.connect(&f.catalog, p1, f.children, InstanceId::new(1)).unwrap();
        graph.connect(&f.catalog, p1, f.children, InstanceId::new(2)).unwrap();

        let err = graph.connect(&f.catalog, p1, f.children, InstanceId::new(3)).unwrap_err();
        assert!(matches!(err, CacheError::Constraint(ConstraintError::CardinalityViolation { max: 2, .. })));
        assert_eq!(graph.query(&f.catalog, p1, f.children).unwrap(), ids(&[1, 2]));
        assert_eq!(graph.edge_count(), 4);
        assert_eq!(graph.edges_under(f.children), 2);
        assert_eq!(graph.edges_under(f.parent_rel), 2);
    }

    #[test]
    fn disconnect_is_idempotent() {
        let f = fixture(RelationRange::MANY);
        let mut graph = RelationGraph::new();
        let p1 = InstanceHandle::new(f.parent, InstanceId::new(1));
        graph.connect(&f.catalog, p1, f.children, InstanceId::new(1)).unwrap();
        graph.disconnect(&f.catalog, p1, f.children, InstanceId::new(1)).unwrap();
        graph.disconnect(&f.catalog, p1, f.children, InstanceId::new(1)).unwrap();
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn relation_of_other_type_is_rejected() {
        let f = fixture(RelationRange::MANY);
        let mut graph = RelationGraph::new();
        let c1 = InstanceHandle::new(f.child, InstanceId::new(1));
        let err = graph.connect(&f.catalog, c1, f.children, InstanceId::new(1)).unwrap_err();
        assert!(matches!(err, CacheError::NotFound(NotFoundError::UnknownRelation(_))));
    }

    #[test]
    fn set_related_replaces_whole_set() {
        let f = fixture(RelationRange::MANY);
        let mut graph = RelationGraph::new();
        let p1 = InstanceHandle::new(f.parent, InstanceId::new(1));
        graph.set_related(&f.catalog, p1, f.children, &ids(&[1, 2, 3])).unwrap();
        graph.set_related(&f.catalog, p1, f.children, &ids(&[3, 4])).unwrap();

        assert_eq!(graph.query(&f.catalog, p1, f.children).unwrap(), ids(&[3, 4]));
        let c1 = InstanceHandle::new(f.child, InstanceId::new(1));
        assert!(graph.query(&f.catalog, c1, f.parent_rel).unwrap().is_empty());
        assert_eq!(graph.edge_count(), 4);
    }

    #[test]
    fn drop_all_edges_clears_both_sides() {
        let f = fixture(RelationRange::MANY);
        let mut graph = RelationGraph::new();
        let p1 = InstanceHandle::new(f.parent, InstanceId::new(1));
        graph.set_related(&f.catalog, p1, f.children, &ids(&[1, 2])).unwrap();

        let c2 = InstanceHandle::new(f.child, InstanceId::new(2));
        graph.drop_all_edges_for(&f.catalog, c2);
        assert!(!graph.references(&f.catalog, c2));
        assert_eq!(graph.query(&f.catalog, p1, f.children).unwrap(), ids(&[1]));

        graph.drop_all_edges_for(&f.catalog, p1);
        assert_eq!(graph.edge_count(), 0);
    }
}
