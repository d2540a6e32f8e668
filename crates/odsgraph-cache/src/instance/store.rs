//! Per-type instance storage.
//!
//! The store holds records only. Checks that need the schema (does the
//! attribute exist, does the value fit its data type) and the edge cleanup
//! before a delete are done by [`ModelState`](crate::ModelState).

use std::collections::{BTreeMap, HashMap};

use odsgraph_core::{InstanceId, TypeId, TypedValue};
use tracing::{debug, trace};

use super::record::InstanceRecord;
use crate::error::{CacheError, CacheResult};
use crate::id_gen::next_instance_id;

/// Instance records grouped by type.
#[derive(Debug, Default)]
pub struct InstanceStore {
    by_type: HashMap<TypeId, BTreeMap<InstanceId, InstanceRecord>>,
}

impl InstanceStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start tracking instances of a type.
    pub fn add_type(&mut self, type_id: TypeId) {
        self.by_type.entry(type_id).or_default();
    }

    /// Stop tracking a type, dropping whatever it still holds.
    pub fn remove_type(&mut self, type_id: TypeId) {
        self.by_type.remove(&type_id);
    }

    fn instances(&self, type_id: TypeId) -> CacheResult<&BTreeMap<InstanceId, InstanceRecord>> {
        self.by_type.get(&type_id).ok_or_else(|| CacheError::unknown_type(type_id))
    }

    fn instances_mut(&mut self, type_id: TypeId) -> CacheResult<&mut BTreeMap<InstanceId, InstanceRecord>> {
        self.by_type.get_mut(&type_id).ok_or_else(|| CacheError::unknown_type(type_id))
    }

    /// The id the next [`insert`](Self::insert) will assign.
    ///
    /// # Errors
    ///
    /// Fails if the type is not tracked.
    pub fn next_id(&self, type_id: TypeId) -> CacheResult<InstanceId> {
        Ok(next_instance_id(self.instances(type_id)?.keys().copied()))
    }

    /// Insert an empty record and return its id.
    ///
    /// # Errors
    ///
    /// Fails if the type is not tracked.
    pub fn insert(&mut self, type_id: TypeId) -> CacheResult<InstanceId> {
        let instances = self.instances_mut(type_id)?;
        let id = next_instance_id(instances.keys().copied());
        instances.insert(id, InstanceRecord::new());
        debug!(type_id = %type_id, instance_id = %id, "inserted instance");
        Ok(id)
    }

    /// Remove a record.
    ///
    /// # Errors
    ///
    /// Returns [`NotFoundError::UnknownInstance`](crate::NotFoundError::UnknownInstance)
    /// if the record does not exist.
    pub fn remove(&mut self, type_id: TypeId, id: InstanceId) -> CacheResult<InstanceRecord> {
        let record = self
            .instances_mut(type_id)?
            .remove(&id)
            .ok_or_else(|| CacheError::unknown_instance(type_id, id))?;
        debug!(type_id = %type_id, instance_id = %id, "removed instance");
        Ok(record)
    }

    /// Get a record.
    ///
    /// # Errors
    ///
    /// Fails if the type or the instance does not exist.
    pub fn record(&self, type_id: TypeId, id: InstanceId) -> CacheResult<&InstanceRecord> {
        self.instances(type_id)?.get(&id).ok_or_else(|| CacheError::unknown_instance(type_id, id))
    }

    /// Get a record for modification.
    ///
    /// # Errors
    ///
    /// Fails if the type or the instance does not exist.
    pub fn record_mut(&mut self, type_id: TypeId, id: InstanceId) -> CacheResult<&mut InstanceRecord> {
        self.instances_mut(type_id)?.get_mut(&id).ok_or_else(|| CacheError::unknown_instance(type_id, id))
    }

    /// Store a schema value.
    ///
    /// # Errors
    ///
    /// Fails if the type or the instance does not exist.
    pub fn set_value(&mut self, type_id: TypeId, id: InstanceId, name: &str, value: TypedValue) -> CacheResult<()> {
        trace!(type_id = %type_id, instance_id = %id, attribute = name, set = value.is_set(), "set value");
        self.record_mut(type_id, id)?.set_value(name, value);
        Ok(())
    }

    /// Returns `true` if the instance exists.
    #[must_use]
    pub fn exists(&self, type_id: TypeId, id: InstanceId) -> bool {
        self.by_type.get(&type_id).is_some_and(|m| m.contains_key(&id))
    }

    /// Live instance ids of a type, ascending.
    ///
    /// # Errors
    ///
    /// Fails if the type is not tracked.
    pub fn list_ids(&self, type_id: TypeId) -> CacheResult<Vec<InstanceId>> {
        Ok(self.instances(type_id)?.keys().copied().collect())
    }

    /// Number of live instances of a type; zero for an untracked type.
    #[must_use]
    pub fn count(&self, type_id: TypeId) -> usize {
        self.by_type.get(&type_id).map_or(0, BTreeMap::len)
    }

    /// Move every stored value of attribute `old` to `new`.
    pub fn rekey_attribute(&mut self, type_id: TypeId, old: &str, new: &str) {
        if let Some(instances) = self.by_type.get_mut(&type_id) {
            for record in instances.values_mut() {
                record.rekey(old, new);
            }
        }
    }

    /// Drop every stored value of an attribute.
    pub fn remove_attribute_values(&mut self, type_id: TypeId, name: &str) {
        if let Some(instances) = self.by_type.get_mut(&type_id) {
            for record in instances.values_mut() {
                record.remove_value(name);
            }
        }
    }

    /// Returns `true` if any instance holds a set value for the attribute.
    #[must_use]
    pub fn has_values_for(&self, type_id: TypeId, name: &str) -> bool {
        self.by_type.get(&type_id).is_some_and(|m| m.values().any(|r| r.has_value(name)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::NotFoundError;

    fn store_with_type(type_id: TypeId) -> InstanceStore {
        let mut store = InstanceStore::new();
        store.add_type(type_id);
        store
    }

    #[test]
    fn first_id_is_one() {
        let t = TypeId::new(1);
        let mut store = store_with_type(t);
        assert_eq!(store.insert(t).unwrap(), InstanceId::new(1));
        assert_eq!(store.insert(t).unwrap(), InstanceId::new(2));
    }

    #[test]
    fn ids_follow_largest_live_id() {
        let t = TypeId::new(1);
        let mut store = store_with_type(t);
        for _ in 0..3 {
            store.insert(t).unwrap();
        }
        store.remove(t, InstanceId::new(2)).unwrap();
        assert_eq!(store.insert(t).unwrap(), InstanceId::new(4));

        store.remove(t, InstanceId::new(4)).unwrap();
        store.remove(t, InstanceId::new(3)).unwrap();
        assert_eq!(store.next_id(t).unwrap(), InstanceId::new(2));
    }

    #[test]
    fn remove_missing_instance_fails() {
        let t = TypeId::new(1);
        let mut store = store_with_type(t);
        let err = store.remove(t, InstanceId::new(9)).unwrap_err();
        assert!(matches!(err, CacheError::NotFound(NotFoundError::UnknownInstance { .. })));
    }

    #[test]
    fn untracked_type_is_unknown() {
        let mut store = InstanceStore::new();
        let err = store.insert(TypeId::new(5)).unwrap_err();
        assert!(matches!(err, CacheError::NotFound(NotFoundError::UnknownType(_))));
        assert_eq!(store.count(TypeId::new(5)), 0);
    }

    #[test]
    fn attribute_wide_edits() {
        let t = TypeId::new(1);
        let mut store = store_with_type(t);
        let a = store.insert(t).unwrap();
        let b = store.insert(t).unwrap();
        store.set_value(t, a, "x", TypedValue::from(1i32)).unwrap();
        store.set_value(t, b, "x", TypedValue::from(2i32)).unwrap();
        assert!(store.has_values_for(t, "x"));

        store.rekey_attribute(t, "x", "y");
        assert!(!store.has_values_for(t, "x"));
        assert_eq!(store.record(t, b).unwrap().value("y"), Some(&TypedValue::from(2i32)));

        store.remove_attribute_values(t, "y");
        assert!(!store.has_values_for(t, "y"));
    }
}
