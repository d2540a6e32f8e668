//! The combined model and its shared handle.
//!
//! [`ModelState`] holds the type catalog, the instance store and the relation
//! graph together and implements every operation that has to touch more than
//! one of them (cascading deletes, attribute renames, relation edits that
//! check instance existence). [`ModelCache`] puts a `ModelState` behind a
//! single reader-writer lock and is the handle passed to collaborators.

use std::collections::BTreeSet;
use std::sync::{Arc, RwLock};

use odsgraph_core::{
    DataKind, DataType, InstanceHandle, InstanceId, RelationId, RelationRange, TypeId, TypedValue,
};
use tracing::debug;

use crate::config::CacheConfig;
use crate::cursor::InstanceCursor;
use crate::error::{CacheError, CacheResult, ConstraintError, NotFoundError, SchemaError};
use crate::graph::RelationGraph;
use crate::instance::InstanceStore;
use crate::schema::{Attribute, AttributeDef, Relation, RelationDef, TypeCatalog, TypeDef};

/// Base element whose first instance is the environment.
const ENVIRONMENT_ELEMENT: &str = "AoEnvironment";

/// Schema, instances and edges of one application model.
///
/// All methods are synchronous and restore every invariant before they
/// return. A failed mutating call changes nothing.
#[derive(Debug)]
pub struct ModelState {
    config: CacheConfig,
    catalog: TypeCatalog,
    store: InstanceStore,
    graph: RelationGraph,
}

impl ModelState {
    /// Create an empty model.
    #[must_use]
    pub fn new(config: CacheConfig) -> Self {
        Self {
            catalog: TypeCatalog::new(&config),
            store: InstanceStore::new(),
            graph: RelationGraph::new(),
            config,
        }
    }

    /// The configuration.
    #[must_use]
    pub const fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// The type catalog.
    #[must_use]
    pub const fn catalog(&self) -> &TypeCatalog {
        &self.catalog
    }

    /// The instance store.
    #[must_use]
    pub const fn store(&self) -> &InstanceStore {
        &self.store
    }

    /// The relation graph.
    #[must_use]
    pub const fn graph(&self) -> &RelationGraph {
        &self.graph
    }

    // ========================================================================
    // Identity
    // ========================================================================

    /// The id the next [`register_type`](Self::register_type) will assign.
    #[must_use]
    pub fn next_type_id(&self) -> TypeId {
        TypeId::new(self.catalog.ids().current_type_counter())
    }

    /// The id the next [`insert`](Self::insert) into the type will assign.
    ///
    /// # Errors
    ///
    /// Fails if the type does not exist.
    pub fn next_instance_id(&self, type_id: TypeId) -> CacheResult<InstanceId> {
        self.store.next_id(type_id)
    }

    // ========================================================================
    // Types
    // ========================================================================

    /// Register a type derived from a base element.
    ///
    /// # Errors
    ///
    /// See [`TypeCatalog::register_type`].
    pub fn register_type(&mut self, name: &str, base_type: &str) -> CacheResult<TypeId> {
        let id = self.catalog.register_type(name, base_type)?;
        self.store.add_type(id);
        Ok(id)
    }

    /// Rename a type.
    ///
    /// # Errors
    ///
    /// See [`TypeCatalog::rename_type`].
    pub fn rename_type(&mut self, type_id: TypeId, new_name: &str) -> CacheResult<()> {
        self.catalog.rename_type(type_id, new_name)
    }

    /// Remove a type together with its attributes and every relation it is
    /// the source or target of.
    ///
    /// # Errors
    ///
    /// Returns [`ConstraintError::TypeHasInstances`] while instances exist.
    pub fn remove_type(&mut self, type_id: TypeId) -> CacheResult<()> {
        self.catalog.type_def(type_id)?;
        let count = self.store.count(type_id);
        if count > 0 {
            return Err(ConstraintError::TypeHasInstances { type_id, count }.into());
        }
        for relation in self.catalog.remove_type(type_id)? {
            self.graph.drop_relation(&relation, None);
        }
        self.store.remove_type(type_id);
        Ok(())
    }

    /// Get a type definition.
    ///
    /// # Errors
    ///
    /// Fails if the type does not exist.
    pub fn type_def(&self, type_id: TypeId) -> CacheResult<&TypeDef> {
        self.catalog.type_def(type_id)
    }

    /// Look up a type by name.
    #[must_use]
    pub fn type_by_name(&self, name: &str) -> Option<TypeId> {
        self.catalog.type_by_name(name)
    }

    /// The name of a type.
    ///
    /// # Errors
    ///
    /// Fails if the type does not exist.
    pub fn type_name(&self, type_id: TypeId) -> CacheResult<&str> {
        Ok(self.catalog.type_def(type_id)?.name())
    }

    /// Canonical name of the base element a type derives from.
    ///
    /// # Errors
    ///
    /// Fails if the type does not exist.
    pub fn base_type_of(&self, type_id: TypeId) -> CacheResult<&'static str> {
        Ok(self.catalog.type_def(type_id)?.base_type())
    }

    /// Ids of the types derived from a base element, ignoring case.
    #[must_use]
    pub fn types_by_base_type(&self, base_type: &str) -> Vec<TypeId> {
        self.catalog.types_by_base_type(base_type).map(TypeDef::id).collect()
    }

    /// Ids of all types, ascending.
    #[must_use]
    pub fn list_types(&self) -> Vec<TypeId> {
        self.catalog.types().map(TypeDef::id).collect()
    }

    // ========================================================================
    // Attributes
    // ========================================================================

    /// Add an attribute to a type.
    ///
    /// # Errors
    ///
    /// See [`TypeCatalog::add_attribute`].
    pub fn add_attribute(&mut self, type_id: TypeId, def: AttributeDef) -> CacheResult<()> {
        self.catalog.add_attribute(type_id, def)
    }

    /// Rename an attribute and re-key every stored value.
    ///
    /// # Errors
    ///
    /// Fails if the attribute does not exist or the new name is invalid or taken.
    pub fn rename_attribute(&mut self, type_id: TypeId, old: &str, new: &str) -> CacheResult<()> {
        self.catalog.rename_attribute(type_id, old, new)?;
        self.store.rekey_attribute(type_id, old, new);
        Ok(())
    }

    /// Remove an attribute and every value stored for it.
    ///
    /// # Errors
    ///
    /// Fails if the attribute does not exist.
    pub fn remove_attribute(&mut self, type_id: TypeId, name: &str) -> CacheResult<()> {
        self.catalog.remove_attribute(type_id, name)?;
        self.store.remove_attribute_values(type_id, name);
        Ok(())
    }

    /// Get an attribute definition.
    ///
    /// # Errors
    ///
    /// Fails if the type or the attribute does not exist.
    pub fn attribute(&self, type_id: TypeId, name: &str) -> CacheResult<&Attribute> {
        self.catalog.attribute(type_id, name)
    }

    /// Get the attribute derived from a base attribute, ignoring case.
    ///
    /// # Errors
    ///
    /// Fails if the type does not exist.
    pub fn attribute_by_base_name(&self, type_id: TypeId, base_name: &str) -> CacheResult<Option<&Attribute>> {
        self.catalog.attribute_by_base_name(type_id, base_name)
    }

    /// Attributes of a type in definition order.
    ///
    /// # Errors
    ///
    /// Fails if the type does not exist.
    pub fn list_attributes(&self, type_id: TypeId) -> CacheResult<&[Attribute]> {
        self.catalog.attributes(type_id)
    }

    /// Change the data type of an attribute.
    ///
    /// # Errors
    ///
    /// - [`SchemaError::IncompatibleDataType`] for an attribute derived from a base attribute
    /// - [`ConstraintError::HasInstanceValues`] while instances hold values for it
    pub fn set_data_type(&mut self, type_id: TypeId, name: &str, data_type: DataType) -> CacheResult<()> {
        if !self.catalog.check_data_type_change(type_id, name, data_type)? {
            return Ok(());
        }
        if self.store.has_values_for(type_id, name) {
            return Err(ConstraintError::HasInstanceValues(name.to_owned()).into());
        }
        self.catalog.set_data_type(type_id, name, data_type)
    }

    /// Set the unique flag of an attribute.
    ///
    /// # Errors
    ///
    /// Fails if the type or the attribute does not exist.
    pub fn set_unique(&mut self, type_id: TypeId, name: &str, unique: bool) -> CacheResult<()> {
        self.catalog.set_unique(type_id, name, unique)
    }

    /// Set the autogenerated flag of an attribute.
    ///
    /// # Errors
    ///
    /// Fails if the type or the attribute does not exist.
    pub fn set_autogenerated(&mut self, type_id: TypeId, name: &str, autogenerated: bool) -> CacheResult<()> {
        self.catalog.set_autogenerated(type_id, name, autogenerated)
    }

    /// Set the length of an attribute.
    ///
    /// # Errors
    ///
    /// Fails if the type or the attribute does not exist.
    pub fn set_length(&mut self, type_id: TypeId, name: &str, length: u32) -> CacheResult<()> {
        self.catalog.set_length(type_id, name, length)
    }

    /// Set the unit of an attribute.
    ///
    /// # Errors
    ///
    /// Fails if the type or the attribute does not exist.
    pub fn set_unit(&mut self, type_id: TypeId, name: &str, unit: Option<InstanceId>) -> CacheResult<()> {
        self.catalog.set_unit(type_id, name, unit)
    }

    /// Set the enumeration of an enum-typed attribute.
    ///
    /// # Errors
    ///
    /// See [`TypeCatalog::set_enum_type`].
    pub fn set_enumeration_type(&mut self, type_id: TypeId, name: &str, enum_type: Option<String>) -> CacheResult<()> {
        self.catalog.set_enum_type(type_id, name, enum_type)
    }

    /// Returns `true` if the attribute must always carry a value.
    ///
    /// # Errors
    ///
    /// Fails if the type or the attribute does not exist.
    pub fn is_obligatory(&self, type_id: TypeId, name: &str) -> CacheResult<bool> {
        self.catalog.is_obligatory(type_id, name)
    }

    /// Set the obligatory flag of an attribute.
    ///
    /// # Errors
    ///
    /// See [`TypeCatalog::set_obligatory`].
    pub fn set_obligatory(&mut self, type_id: TypeId, name: &str, obligatory: bool) -> CacheResult<()> {
        self.catalog.set_obligatory(type_id, name, obligatory)
    }

    // ========================================================================
    // Relation definitions
    // ========================================================================

    /// Add a relation definition.
    ///
    /// # Errors
    ///
    /// See [`TypeCatalog::add_relation`].
    pub fn add_relation(&mut self, def: RelationDef) -> CacheResult<RelationId> {
        self.catalog.add_relation(def)
    }

    /// Bind the target type of a relation.
    ///
    /// Binding the current target again is a no-op. A bound relation can be
    /// moved to another type only while no edge is recorded under it or its
    /// inverse.
    ///
    /// # Errors
    ///
    /// - [`NotFoundError::UnknownRelation`] / [`NotFoundError::UnknownType`]
    /// - [`ConstraintError::RelationHasEdges`] when rebinding a relation with edges
    pub fn bind_target(&mut self, relation: RelationId, target: TypeId) -> CacheResult<()> {
        let rel = self.catalog.relation(relation)?;
        match rel.target() {
            Some(current) if current == target => return Ok(()),
            Some(_) => {
                let edges = self.graph.edges_under(relation)
                    + self.catalog.inverse_relation(relation).map_or(0, |inv| self.graph.edges_under(inv));
                if edges > 0 {
                    return Err(ConstraintError::RelationHasEdges { relation: rel.name().to_owned(), edges }.into());
                }
            }
            None => {}
        }
        self.catalog.bind_target(relation, target)
    }

    /// Resolve the inverse of a relation.
    ///
    /// # Errors
    ///
    /// See [`TypeCatalog::inverse_relation`].
    pub fn get_inverse_relation(&self, relation: RelationId) -> CacheResult<RelationId> {
        self.catalog.inverse_relation(relation)
    }

    /// Get a relation definition.
    ///
    /// # Errors
    ///
    /// Fails if the relation does not exist.
    pub fn relation(&self, relation: RelationId) -> CacheResult<&Relation> {
        self.catalog.relation(relation)
    }

    /// Get a relation of a type by name.
    ///
    /// # Errors
    ///
    /// Fails if the type or the relation does not exist.
    pub fn relation_by_name(&self, type_id: TypeId, name: &str) -> CacheResult<&Relation> {
        self.catalog.relation_by_name(type_id, name)
    }

    /// Relations of a type in definition order.
    ///
    /// # Errors
    ///
    /// Fails if the type does not exist.
    pub fn list_relations(&self, type_id: TypeId) -> CacheResult<Vec<&Relation>> {
        self.catalog.relations_of(type_id)
    }

    /// Every relation, in id order.
    #[must_use]
    pub fn list_all_relations(&self) -> Vec<&Relation> {
        self.catalog.all_relations().collect()
    }

    /// Remove a relation and every edge recorded under it or its inverse.
    ///
    /// # Errors
    ///
    /// Fails if the relation does not exist.
    pub fn remove_relation(&mut self, relation: RelationId) -> CacheResult<()> {
        self.catalog.relation(relation)?;
        let inverse = self.catalog.inverse_relation(relation).ok();
        let removed = self.catalog.remove_relation(relation)?;
        self.graph.drop_relation(&removed, inverse);
        Ok(())
    }

    /// Replace the range of a relation.
    ///
    /// # Errors
    ///
    /// - [`SchemaError::InvalidRelationRange`] for an inconsistent range
    /// - [`ConstraintError::CardinalityViolation`] if an existing edge set is too large
    pub fn set_relation_range(&mut self, relation: RelationId, range: RelationRange) -> CacheResult<()> {
        let name = self.catalog.relation(relation)?.name().to_owned();
        if !range.is_valid() {
            return Err(SchemaError::InvalidRelationRange { min: range.min, max: range.max }.into());
        }
        let largest = self.graph.largest_set(relation);
        if !range.admits(largest) {
            return Err(ConstraintError::CardinalityViolation { relation: name, max: range.max, requested: largest }
                .into());
        }
        self.catalog.set_relation_range(relation, range)
    }

    /// Check that every relation has a bound target and an inverse.
    ///
    /// # Errors
    ///
    /// Returns the first violation.
    pub fn validate_relations(&self) -> CacheResult<()> {
        self.catalog.validate_relations()
    }

    // ========================================================================
    // Instances
    // ========================================================================

    /// Insert a new, empty instance.
    ///
    /// # Errors
    ///
    /// Fails if the type does not exist.
    pub fn insert(&mut self, type_id: TypeId) -> CacheResult<InstanceId> {
        self.store.insert(type_id)
    }

    /// Delete an instance after dropping every edge it takes part in.
    ///
    /// # Errors
    ///
    /// Returns [`NotFoundError::UnknownInstance`] if it does not exist.
    pub fn delete(&mut self, type_id: TypeId, id: InstanceId) -> CacheResult<()> {
        self.require_instance(type_id, id)?;
        self.graph.drop_all_edges_for(&self.catalog, InstanceHandle::new(type_id, id));
        self.store.remove(type_id, id)?;
        Ok(())
    }

    /// Returns `true` if the instance exists.
    #[must_use]
    pub fn exists(&self, type_id: TypeId, id: InstanceId) -> bool {
        self.store.exists(type_id, id)
    }

    /// Live instance ids of a type, ascending.
    ///
    /// # Errors
    ///
    /// Fails if the type does not exist.
    pub fn list_ids(&self, type_id: TypeId) -> CacheResult<Vec<InstanceId>> {
        self.store.list_ids(type_id)
    }

    /// Number of live instances of a type.
    ///
    /// # Errors
    ///
    /// Fails if the type does not exist.
    pub fn instance_count(&self, type_id: TypeId) -> CacheResult<usize> {
        self.catalog.type_def(type_id)?;
        Ok(self.store.count(type_id))
    }

    /// A cursor over the instances of a type.
    ///
    /// # Errors
    ///
    /// Fails if the type does not exist.
    pub fn cursor(&self, type_id: TypeId) -> CacheResult<InstanceCursor> {
        InstanceCursor::for_type(self, type_id)
    }

    /// The first instance of the first type derived from `AoEnvironment`.
    #[must_use]
    pub fn environment_instance(&self) -> Option<InstanceHandle> {
        let type_id = self.catalog.types_by_base_type(ENVIRONMENT_ELEMENT).next()?.id();
        let id = self.store.list_ids(type_id).ok()?.into_iter().next()?;
        Some(InstanceHandle::new(type_id, id))
    }

    fn require_instance(&self, type_id: TypeId, id: InstanceId) -> CacheResult<()> {
        self.catalog.type_def(type_id)?;
        if self.store.exists(type_id, id) {
            Ok(())
        } else {
            Err(CacheError::unknown_instance(type_id, id))
        }
    }

    // ========================================================================
    // Values
    // ========================================================================

    /// Store the value of a schema attribute.
    ///
    /// With `strict_value_types` a set value must match the attribute's data
    /// type, if that is known. Unset values are always accepted.
    ///
    /// # Errors
    ///
    /// - [`NotFoundError::UnknownInstance`] / [`NotFoundError::UnknownAttribute`]
    /// - [`SchemaError::IncompatibleDataType`] for a mismatching value
    pub fn set_value(
        &mut self,
        type_id: TypeId,
        id: InstanceId,
        name: &str,
        value: impl Into<TypedValue>,
    ) -> CacheResult<()> {
        let value = value.into();
        let attribute = self.catalog.attribute(type_id, name)?;
        self.require_instance(type_id, id)?;
        if self.config.strict_value_types && value.is_set() {
            if let Some(expected) = attribute.data_type() {
                if expected != value.data_type() {
                    return Err(SchemaError::IncompatibleDataType {
                        attribute: name.to_owned(),
                        reason: format!("expected {expected}, got {}", value.data_type()),
                    }
                    .into());
                }
            }
        }
        self.store.set_value(type_id, id, name, value)
    }

    /// Get the value of a schema attribute.
    ///
    /// An attribute without a stored value yields an unset [`TypedValue`] of
    /// the attribute's data type (a scalar string if that is not yet known).
    ///
    /// # Errors
    ///
    /// Fails if the instance or the attribute does not exist.
    pub fn get_value(&self, type_id: TypeId, id: InstanceId, name: &str) -> CacheResult<TypedValue> {
        let attribute = self.catalog.attribute(type_id, name)?;
        let record = self.store.record(type_id, id)?;
        Ok(record.value(name).cloned().unwrap_or_else(|| TypedValue::unset(unset_type(attribute))))
    }

    /// All set schema values of an instance, in attribute definition order.
    ///
    /// # Errors
    ///
    /// Fails if the instance does not exist.
    pub fn get_values(&self, type_id: TypeId, id: InstanceId) -> CacheResult<Vec<(String, TypedValue)>> {
        let attributes = self.catalog.attributes(type_id)?;
        let record = self.store.record(type_id, id)?;
        Ok(attributes
            .iter()
            .filter_map(|a| record.value(a.name()).filter(|v| v.is_set()).map(|v| (a.name().to_owned(), v.clone())))
            .collect())
    }

    /// Names of the instance attributes in insertion order.
    ///
    /// # Errors
    ///
    /// Fails if the instance does not exist.
    pub fn list_instance_attribute_names(&self, type_id: TypeId, id: InstanceId) -> CacheResult<Vec<String>> {
        Ok(self.store.record(type_id, id)?.instance_attribute_names().map(str::to_owned).collect())
    }

    /// Set an instance attribute.
    ///
    /// # Errors
    ///
    /// Fails if the instance does not exist.
    pub fn set_instance_attribute(
        &mut self,
        type_id: TypeId,
        id: InstanceId,
        name: &str,
        value: impl Into<TypedValue>,
    ) -> CacheResult<()> {
        self.store.record_mut(type_id, id)?.set_instance_attribute(name, value.into());
        Ok(())
    }

    /// Get an instance attribute.
    ///
    /// # Errors
    ///
    /// Fails if the instance or the instance attribute does not exist.
    pub fn get_instance_attribute(&self, type_id: TypeId, id: InstanceId, name: &str) -> CacheResult<TypedValue> {
        self.store
            .record(type_id, id)?
            .instance_attribute(name)
            .cloned()
            .ok_or_else(|| CacheError::unknown_attribute(type_id, name))
    }

    /// Remove an instance attribute.
    ///
    /// # Errors
    ///
    /// Fails if the instance or the instance attribute does not exist.
    pub fn remove_instance_attribute(&mut self, type_id: TypeId, id: InstanceId, name: &str) -> CacheResult<()> {
        self.store
            .record_mut(type_id, id)?
            .remove_instance_attribute(name)
            .map(|_| ())
            .ok_or_else(|| CacheError::unknown_attribute(type_id, name))
    }

    // ========================================================================
    // Edges
    // ========================================================================

    fn target_type(&self, relation: RelationId) -> CacheResult<TypeId> {
        let rel = self.catalog.relation(relation)?;
        rel.target()
            .ok_or_else(|| NotFoundError::NoInverseRelation { id: relation, relation: rel.name().to_owned() }.into())
    }

    /// Connect two instances under a relation and its inverse.
    ///
    /// # Errors
    ///
    /// - [`NotFoundError::UnknownInstance`] if either instance does not exist
    /// - see [`RelationGraph::connect`] for the rest
    pub fn connect(&mut self, type_id: TypeId, id: InstanceId, relation: RelationId, target: InstanceId) -> CacheResult<()> {
        self.require_instance(type_id, id)?;
        let target_type = self.target_type(relation)?;
        self.require_instance(target_type, target)?;
        self.graph.connect(&self.catalog, InstanceHandle::new(type_id, id), relation, target)
    }

    /// Remove the edge between two instances and its mirror. A missing edge
    /// is not an error.
    ///
    /// # Errors
    ///
    /// Fails if the source instance or the relation does not exist.
    pub fn disconnect(
        &mut self,
        type_id: TypeId,
        id: InstanceId,
        relation: RelationId,
        target: InstanceId,
    ) -> CacheResult<()> {
        self.require_instance(type_id, id)?;
        self.graph.disconnect(&self.catalog, InstanceHandle::new(type_id, id), relation, target)
    }

    /// Replace every target of an instance under a relation.
    ///
    /// # Errors
    ///
    /// Fails if any instance does not exist, or like [`RelationGraph::set_related`].
    pub fn set_related<I>(&mut self, type_id: TypeId, id: InstanceId, relation: RelationId, targets: I) -> CacheResult<()>
    where
        I: IntoIterator<Item = InstanceId>,
    {
        self.require_instance(type_id, id)?;
        let target_type = self.target_type(relation)?;
        let targets: BTreeSet<InstanceId> = targets.into_iter().collect();
        for target in &targets {
            self.require_instance(target_type, *target)?;
        }
        self.graph.set_related(&self.catalog, InstanceHandle::new(type_id, id), relation, &targets)
    }

    /// Ids related to an instance under a relation.
    ///
    /// # Errors
    ///
    /// Fails if the instance or the relation does not exist, or the relation
    /// is not a relation of the instance's type.
    pub fn query(&self, type_id: TypeId, id: InstanceId, relation: RelationId) -> CacheResult<BTreeSet<InstanceId>> {
        self.require_instance(type_id, id)?;
        self.graph.query(&self.catalog, InstanceHandle::new(type_id, id), relation)
    }
}

impl Default for ModelState {
    fn default() -> Self {
        Self::new(CacheConfig::default())
    }
}

fn unset_type(attribute: &Attribute) -> DataType {
    attribute.data_type().unwrap_or(DataType::scalar(DataKind::String))
}

/// Shared, lock-guarded handle to a [`ModelState`].
///
/// Clones share the same model. Read-only calls take the lock shared; every
/// mutating call takes it exclusively, so a relation edit is never observed
/// half done.
///
/// # Example
///
/// ```
/// use odsgraph_cache::ModelCache;
/// use odsgraph_cache::schema::{AttributeDef, RelationDef};
/// use odsgraph_core::RelationRange;
///
/// let cache = ModelCache::new();
/// let meas = cache.register_type("Measurement", "AoMeasurement").unwrap();
/// let mq = cache.register_type("Channel", "AoMeasurementQuantity").unwrap();
/// cache.add_attribute(meas, AttributeDef::new("name").with_base("name")).unwrap();
///
/// let channels = cache
///     .add_relation(RelationDef::new("channels", "measurement", meas).with_target(mq))
///     .unwrap();
/// cache
///     .add_relation(
///         RelationDef::new("measurement", "channels", mq)
///             .with_target(meas)
///             .with_range(RelationRange::EXACTLY_ONE),
///     )
///     .unwrap();
///
/// let m = cache.insert(meas).unwrap();
/// let c = cache.insert(mq).unwrap();
/// cache.connect(meas, m, channels, c).unwrap();
/// assert!(cache.query(meas, m, channels).unwrap().contains(&c));
/// ```
#[derive(Debug, Clone)]
pub struct ModelCache {
    inner: Arc<RwLock<ModelState>>,
}

impl ModelCache {
    /// Create an empty cache with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(CacheConfig::default())
    }

    /// Create an empty cache with the given configuration.
    #[must_use]
    pub fn with_config(config: CacheConfig) -> Self {
        debug!(?config, "creating model cache");
        Self { inner: Arc::new(RwLock::new(ModelState::new(config))) }
    }

    /// Run `f` under the shared lock.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::LockPoisoned`] if a writer panicked, otherwise
    /// whatever `f` returns.
    pub fn read<T>(&self, f: impl FnOnce(&ModelState) -> CacheResult<T>) -> CacheResult<T> {
        let state = self.inner.read().map_err(|e| CacheError::lock_poisoned(e.to_string()))?;
        f(&state)
    }

    /// Run `f` under the exclusive lock.
    ///
    /// Use this to group several edits so no reader sees the intermediate state.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::LockPoisoned`] if a writer panicked, otherwise
    /// whatever `f` returns.
    pub fn write<T>(&self, f: impl FnOnce(&mut ModelState) -> CacheResult<T>) -> CacheResult<T> {
        let mut state = self.inner.write().map_err(|e| CacheError::lock_poisoned(e.to_string()))?;
        f(&mut state)
    }

    /// See [`ModelState::register_type`].
    ///
    /// # Errors
    ///
    /// As for the underlying operation, or [`CacheError::LockPoisoned`].
    pub fn register_type(&self, name: &str, base_type: &str) -> CacheResult<TypeId> {
        self.write(|s| s.register_type(name, base_type))
    }

    /// See [`ModelState::add_attribute`].
    ///
    /// # Errors
    ///
    /// As for the underlying operation, or [`CacheError::LockPoisoned`].
    pub fn add_attribute(&self, type_id: TypeId, def: AttributeDef) -> CacheResult<()> {
        self.write(|s| s.add_attribute(type_id, def))
    }

    /// See [`ModelState::rename_attribute`].
    ///
    /// # Errors
    ///
    /// As for the underlying operation, or [`CacheError::LockPoisoned`].
    pub fn rename_attribute(&self, type_id: TypeId, old: &str, new: &str) -> CacheResult<()> {
        self.write(|s| s.rename_attribute(type_id, old, new))
    }

    /// See [`ModelState::remove_attribute`].
    ///
    /// # Errors
    ///
    /// As for the underlying operation, or [`CacheError::LockPoisoned`].
    pub fn remove_attribute(&self, type_id: TypeId, name: &str) -> CacheResult<()> {
        self.write(|s| s.remove_attribute(type_id, name))
    }

    /// See [`ModelState::add_relation`].
    ///
    /// # Errors
    ///
    /// As for the underlying operation, or [`CacheError::LockPoisoned`].
    pub fn add_relation(&self, def: RelationDef) -> CacheResult<RelationId> {
        self.write(|s| s.add_relation(def))
    }

    /// See [`ModelState::bind_target`].
    ///
    /// # Errors
    ///
    /// As for the underlying operation, or [`CacheError::LockPoisoned`].
    pub fn bind_target(&self, relation: RelationId, target: TypeId) -> CacheResult<()> {
        self.write(|s| s.bind_target(relation, target))
    }

    /// See [`ModelState::get_inverse_relation`].
    ///
    /// # Errors
    ///
    /// As for the underlying operation, or [`CacheError::LockPoisoned`].
    pub fn get_inverse_relation(&self, relation: RelationId) -> CacheResult<RelationId> {
        self.read(|s| s.get_inverse_relation(relation))
    }

    /// See [`ModelState::is_obligatory`].
    ///
    /// # Errors
    ///
    /// As for the underlying operation, or [`CacheError::LockPoisoned`].
    pub fn is_obligatory(&self, type_id: TypeId, name: &str) -> CacheResult<bool> {
        self.read(|s| s.is_obligatory(type_id, name))
    }

    /// See [`ModelState::set_obligatory`].
    ///
    /// # Errors
    ///
    /// As for the underlying operation, or [`CacheError::LockPoisoned`].
    pub fn set_obligatory(&self, type_id: TypeId, name: &str, obligatory: bool) -> CacheResult<()> {
        self.write(|s| s.set_obligatory(type_id, name, obligatory))
    }

    /// See [`ModelState::insert`].
    ///
    /// # Errors
    ///
    /// As for the underlying operation, or [`CacheError::LockPoisoned`].
    pub fn insert(&self, type_id: TypeId) -> CacheResult<InstanceId> {
        self.write(|s| s.insert(type_id))
    }

    /// See [`ModelState::delete`].
    ///
    /// # Errors
    ///
    /// As for the underlying operation, or [`CacheError::LockPoisoned`].
    pub fn delete(&self, type_id: TypeId, id: InstanceId) -> CacheResult<()> {
        self.write(|s| s.delete(type_id, id))
    }

    /// See [`ModelState::exists`].
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::LockPoisoned`] if a writer panicked.
    pub fn exists(&self, type_id: TypeId, id: InstanceId) -> CacheResult<bool> {
        self.read(|s| Ok(s.exists(type_id, id)))
    }

    /// See [`ModelState::list_ids`].
    ///
    /// # Errors
    ///
    /// As for the underlying operation, or [`CacheError::LockPoisoned`].
    pub fn list_ids(&self, type_id: TypeId) -> CacheResult<Vec<InstanceId>> {
        self.read(|s| s.list_ids(type_id))
    }

    /// See [`ModelState::set_value`].
    ///
    /// # Errors
    ///
    /// As for the underlying operation, or [`CacheError::LockPoisoned`].
    pub fn set_value(&self, type_id: TypeId, id: InstanceId, name: &str, value: impl Into<TypedValue>) -> CacheResult<()> {
        let value = value.into();
        self.write(|s| s.set_value(type_id, id, name, value))
    }

    /// See [`ModelState::get_value`].
    ///
    /// # Errors
    ///
    /// As for the underlying operation, or [`CacheError::LockPoisoned`].
    pub fn get_value(&self, type_id: TypeId, id: InstanceId, name: &str) -> CacheResult<TypedValue> {
        self.read(|s| s.get_value(type_id, id, name))
    }

    /// See [`ModelState::connect`].
    ///
    /// # Errors
    ///
    /// As for the underlying operation, or [`CacheError::LockPoisoned`].
    pub fn connect(&self, type_id: TypeId, id: InstanceId, relation: RelationId, target: InstanceId) -> CacheResult<()> {
        self.write(|s| s.connect(type_id, id, relation, target))
    }

    /// See [`ModelState::disconnect`].
    ///
    /// # Errors
    ///
    /// As for the underlying operation, or [`CacheError::LockPoisoned`].
    pub fn disconnect(&self, type_id: TypeId, id: InstanceId, relation: RelationId, target: InstanceId) -> CacheResult<()> {
        self.write(|s| s.disconnect(type_id, id, relation, target))
    }

    /// See [`ModelState::query`].
    ///
    /// # Errors
    ///
    /// As for the underlying operation, or [`CacheError::LockPoisoned`].
    pub fn query(&self, type_id: TypeId, id: InstanceId, relation: RelationId) -> CacheResult<BTreeSet<InstanceId>> {
        self.read(|s| s.query(type_id, id, relation))
    }

    /// See [`ModelState::next_type_id`].
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::LockPoisoned`] if a writer panicked.
    pub fn next_type_id(&self) -> CacheResult<TypeId> {
        self.read(|s| Ok(s.next_type_id()))
    }

    /// See [`ModelState::next_instance_id`].
    ///
    /// # Errors
    ///
    /// As for the underlying operation, or [`CacheError::LockPoisoned`].
    pub fn next_instance_id(&self, type_id: TypeId) -> CacheResult<InstanceId> {
        self.read(|s| s.next_instance_id(type_id))
    }

    /// Snapshot a cursor over the instances of a type.
    ///
    /// # Errors
    ///
    /// As for [`ModelState::cursor`], or [`CacheError::LockPoisoned`].
    pub fn cursor(&self, type_id: TypeId) -> CacheResult<InstanceCursor> {
        self.read(|s| s.cursor(type_id))
    }
}

impl Default for ModelCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use odsgraph_core::Value;

    use super::*;

    fn measurement_model() -> (ModelState, TypeId, TypeId, RelationId, RelationId) {
        let mut state = ModelState::default();
        let meas = state.register_type("Measurement", "AoMeasurement").unwrap();
        let channel = state.register_type("Channel", "AoMeasurementQuantity").unwrap();
        state.add_attribute(meas, AttributeDef::new("name").with_base("name")).unwrap();
        let channels =
            state.add_relation(RelationDef::new("channels", "measurement", meas).with_target(channel)).unwrap();
        let measurement = state
            .add_relation(
                RelationDef::new("measurement", "channels", channel)
                    .with_target(meas)
                    .with_range(RelationRange::EXACTLY_ONE),
            )
            .unwrap();
        (state, meas, channel, channels, measurement)
    }

    #[test]
    fn get_value_of_unset_attribute_is_unset() {
        let (mut state, meas, ..) = measurement_model();
        let m = state.insert(meas).unwrap();
        let value = state.get_value(meas, m, "name").unwrap();
        assert!(!value.is_set());
        assert_eq!(value.data_type(), DataType::scalar(DataKind::String));
    }

    #[test]
    fn set_value_checks_data_type() {
        let (mut state, meas, ..) = measurement_model();
        let m = state.insert(meas).unwrap();
        let err = state.set_value(meas, m, "name", 5i32).unwrap_err();
        assert!(matches!(err, CacheError::Schema(SchemaError::IncompatibleDataType { .. })));

        state.set_value(meas, m, "name", "run 1").unwrap();
        let value = state.get_value(meas, m, "name").unwrap();
        assert_eq!(value.value().and_then(Value::as_str), Some("run 1"));
    }

    #[test]
    fn lenient_config_accepts_any_value() {
        let mut state = ModelState::new(CacheConfig::new().strict_value_types(false));
        let t = state.register_type("Test", "AoTest").unwrap();
        state.add_attribute(t, AttributeDef::new("name").with_base("name")).unwrap();
        let i = state.insert(t).unwrap();
        state.set_value(t, i, "name", 5i32).unwrap();
    }

    #[test]
    fn set_value_unknown_attribute() {
        let (mut state, meas, ..) = measurement_model();
        let m = state.insert(meas).unwrap();
        let err = state.set_value(meas, m, "nope", "x").unwrap_err();
        assert!(matches!(err, CacheError::NotFound(NotFoundError::UnknownAttribute { .. })));
    }

    #[test]
    fn connect_requires_both_instances() {
        let (mut state, meas, _, channels, _) = measurement_model();
        let m = state.insert(meas).unwrap();
        let err = state.connect(meas, m, channels, InstanceId::new(7)).unwrap_err();
        assert!(matches!(err, CacheError::NotFound(NotFoundError::UnknownInstance { .. })));
        assert_eq!(state.graph().edge_count(), 0);
    }

    #[test]
    fn remove_type_with_instances_is_rejected() {
        let (mut state, meas, ..) = measurement_model();
        let m = state.insert(meas).unwrap();
        let err = state.remove_type(meas).unwrap_err();
        assert!(matches!(err, CacheError::Constraint(ConstraintError::TypeHasInstances { count: 1, .. })));

        state.delete(meas, m).unwrap();
        state.remove_type(meas).unwrap();
        assert!(state.type_by_name("Measurement").is_none());
        assert!(state.list_all_relations().is_empty());
    }

    #[test]
    fn set_data_type_blocked_by_values() {
        let mut state = ModelState::default();
        let t = state.register_type("Any", "AoAny").unwrap();
        state.add_attribute(t, AttributeDef::new("x").with_data_type(DataType::scalar(DataKind::Int32))).unwrap();
        let i = state.insert(t).unwrap();
        state.set_value(t, i, "x", 1i32).unwrap();

        let err = state.set_data_type(t, "x", DataType::scalar(DataKind::Float64)).unwrap_err();
        assert!(matches!(err, CacheError::Constraint(ConstraintError::HasInstanceValues(_))));

        state.set_value(t, i, "x", TypedValue::unset(DataType::scalar(DataKind::Int32))).unwrap();
        state.set_data_type(t, "x", DataType::scalar(DataKind::Float64)).unwrap();
        assert_eq!(state.attribute(t, "x").unwrap().data_type(), Some(DataType::scalar(DataKind::Float64)));
    }

    #[test]
    fn set_relation_range_respects_existing_edges() {
        let (mut state, meas, channel, channels, _) = measurement_model();
        let m = state.insert(meas).unwrap();
        for _ in 0..3 {
            let c = state.insert(channel).unwrap();
            state.connect(meas, m, channels, c).unwrap();
        }
        let err = state.set_relation_range(channels, RelationRange::new(0, 2)).unwrap_err();
        assert!(matches!(err, CacheError::Constraint(ConstraintError::CardinalityViolation { requested: 3, .. })));
        state.set_relation_range(channels, RelationRange::new(0, 3)).unwrap();
    }

    #[test]
    fn remove_relation_drops_both_directions() {
        let (mut state, meas, channel, channels, measurement) = measurement_model();
        let m = state.insert(meas).unwrap();
        let c = state.insert(channel).unwrap();
        state.connect(meas, m, channels, c).unwrap();

        state.remove_relation(channels).unwrap();
        assert_eq!(state.graph().edge_count(), 0);
        assert!(state.query(channel, c, measurement).unwrap().is_empty());
    }

    #[test]
    fn environment_instance_is_first_of_first_environment_type() {
        let mut state = ModelState::default();
        assert!(state.environment_instance().is_none());
        let env = state.register_type("Env", "AoEnvironment").unwrap();
        assert!(state.environment_instance().is_none());
        let e = state.insert(env).unwrap();
        state.insert(env).unwrap();
        assert_eq!(state.environment_instance(), Some(InstanceHandle::new(env, e)));
    }

    #[test]
    fn identity_peeks_do_not_allocate() {
        let mut state = ModelState::default();
        let next = state.next_type_id();
        assert_eq!(state.next_type_id(), next);
        let t = state.register_type("Any", "AoAny").unwrap();
        assert_eq!(t, next);
        assert_eq!(state.next_instance_id(t).unwrap(), InstanceId::new(1));
    }

    #[test]
    fn cache_handle_shares_state() {
        let cache = ModelCache::new();
        let clone = cache.clone();
        let t = cache.register_type("Any", "AoAny").unwrap();
        clone.insert(t).unwrap();
        assert_eq!(cache.list_ids(t).unwrap(), vec![InstanceId::new(1)]);
        assert!(cache.exists(t, InstanceId::new(1)).unwrap());
    }
}
