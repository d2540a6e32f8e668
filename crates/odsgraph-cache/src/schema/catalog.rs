//! The type catalog.
//!
//! The catalog owns every type definition, its attributes, and every relation
//! definition. It knows nothing about instances; edits that must also touch
//! stored values or edges are coordinated by [`ModelState`](crate::ModelState),
//! which calls into the catalog and the stores in the right order.

use std::collections::{BTreeMap, HashMap};

use odsgraph_core::base::{BaseElement, BaseModel};
use odsgraph_core::{DataType, InstanceId, RelationId, RelationRange, TypeId};
use tracing::{debug, warn};

use super::attribute::{Attribute, AttributeDef};
use super::relation::{Relation, RelationDef};
use crate::config::CacheConfig;
use crate::error::{CacheError, CacheResult, ConstraintError, NotFoundError, SchemaError};
use crate::id_gen::IdAllocator;

/// A type definition (an "application element").
#[derive(Debug, Clone)]
pub struct TypeDef {
    id: TypeId,
    name: String,
    base: &'static BaseElement,
    attributes: Vec<Attribute>,
    relations: Vec<RelationId>,
}

impl TypeDef {
    /// The type id.
    #[must_use]
    pub const fn id(&self) -> TypeId {
        self.id
    }

    /// The type name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Canonical name of the base element.
    #[must_use]
    pub const fn base_type(&self) -> &'static str {
        self.base.name
    }

    /// The base element.
    #[must_use]
    pub const fn base_element(&self) -> &'static BaseElement {
        self.base
    }

    /// Attributes in definition order.
    #[must_use]
    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    /// Ids of the relations this type is the source of, in definition order.
    #[must_use]
    pub fn relations(&self) -> &[RelationId] {
        &self.relations
    }

    fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.name == name)
    }

    fn attribute_mut(&mut self, name: &str) -> Option<&mut Attribute> {
        self.attributes.iter_mut().find(|a| a.name == name)
    }
}

/// Registry of type, attribute and relation definitions.
///
/// # Thread Safety
///
/// The catalog itself is not synchronized. It lives inside
/// [`ModelCache`](crate::ModelCache), whose lock serializes all edits.
#[derive(Debug)]
pub struct TypeCatalog {
    base: BaseModel,
    max_name_length: usize,
    ids: IdAllocator,
    types: BTreeMap<TypeId, TypeDef>,
    by_name: HashMap<String, TypeId>,
    relations: BTreeMap<RelationId, Relation>,
}

impl TypeCatalog {
    /// Create an empty catalog over the standard base model.
    #[must_use]
    pub fn new(config: &CacheConfig) -> Self {
        Self {
            base: BaseModel::standard(),
            max_name_length: config.max_name_length,
            ids: IdAllocator::new(),
            types: BTreeMap::new(),
            by_name: HashMap::new(),
            relations: BTreeMap::new(),
        }
    }

    /// The base model consulted by this catalog.
    #[must_use]
    pub const fn base_model(&self) -> &BaseModel {
        &self.base
    }

    /// The id allocator.
    #[must_use]
    pub const fn ids(&self) -> &IdAllocator {
        &self.ids
    }

    fn check_name(&self, name: &str) -> Result<(), SchemaError> {
        let reason = if name.is_empty() {
            "name must not be empty".to_owned()
        } else if name.chars().count() > self.max_name_length {
            format!("name must not be longer than {} characters", self.max_name_length)
        } else {
            return Ok(());
        };
        Err(SchemaError::InvalidName { name: name.to_owned(), reason })
    }

    // ------------------------------------------------------------------
    // types
    // ------------------------------------------------------------------

    /// Register a new type derived from `base_type`.
    ///
    /// # Errors
    ///
    /// - [`SchemaError::InvalidName`] for an empty or overlong name
    /// - [`SchemaError::UnknownBaseElement`] if `base_type` is not a base element
    /// - [`SchemaError::DuplicateName`] if a type with this name exists
    pub fn register_type(&mut self, name: &str, base_type: &str) -> CacheResult<TypeId> {
        self.check_name(name)?;
        let base = self.base.require_element(base_type).map_err(SchemaError::from)?;
        if self.by_name.contains_key(name) {
            return Err(SchemaError::DuplicateName(name.to_owned()).into());
        }

        let id = self.ids.next_type_id();
        self.by_name.insert(name.to_owned(), id);
        self.types.insert(
            id,
            TypeDef {
                id,
                name: name.to_owned(),
                base,
                attributes: Vec::new(),
                relations: Vec::new(),
            },
        );
        debug!(type_id = %id, name, base_type = base.name, "registered type");
        Ok(id)
    }

    /// Rename a type.
    ///
    /// # Errors
    ///
    /// Fails if the type is unknown, the name is invalid, or already taken.
    pub fn rename_type(&mut self, id: TypeId, new_name: &str) -> CacheResult<()> {
        let old_name = self.type_def(id)?.name.clone();
        if old_name == new_name {
            return Ok(());
        }
        self.check_name(new_name)?;
        if self.by_name.contains_key(new_name) {
            return Err(SchemaError::DuplicateName(new_name.to_owned()).into());
        }
        self.by_name.remove(&old_name);
        self.by_name.insert(new_name.to_owned(), id);
        if let Some(def) = self.types.get_mut(&id) {
            def.name = new_name.to_owned();
        }
        debug!(type_id = %id, %old_name, new_name, "renamed type");
        Ok(())
    }

    /// Remove a type and every relation it is the source or target of.
    ///
    /// Returns the removed relations so the caller can drop their edges.
    /// Instances are not checked here.
    pub(crate) fn remove_type(&mut self, id: TypeId) -> CacheResult<Vec<Relation>> {
        let def = self.types.remove(&id).ok_or_else(|| CacheError::unknown_type(id))?;
        self.by_name.remove(&def.name);

        let doomed: Vec<RelationId> = self
            .relations
            .values()
            .filter(|r| r.source == id || r.target == Some(id))
            .map(|r| r.id)
            .collect();
        let mut removed = Vec::with_capacity(doomed.len());
        for rel_id in doomed {
            if let Some(rel) = self.detach_relation(rel_id) {
                removed.push(rel);
            }
        }
        debug!(type_id = %id, name = %def.name, relations = removed.len(), "removed type");
        Ok(removed)
    }

    /// Get a type definition.
    ///
    /// # Errors
    ///
    /// Returns [`NotFoundError::UnknownType`] if no type has this id.
    pub fn type_def(&self, id: TypeId) -> CacheResult<&TypeDef> {
        self.types.get(&id).ok_or_else(|| CacheError::unknown_type(id))
    }

    fn type_def_mut(&mut self, id: TypeId) -> CacheResult<&mut TypeDef> {
        self.types.get_mut(&id).ok_or_else(|| CacheError::unknown_type(id))
    }

    /// Returns `true` if the type exists.
    #[must_use]
    pub fn contains_type(&self, id: TypeId) -> bool {
        self.types.contains_key(&id)
    }

    /// Look up a type by exact name.
    #[must_use]
    pub fn type_by_name(&self, name: &str) -> Option<TypeId> {
        self.by_name.get(name).copied()
    }

    /// All types in id order.
    pub fn types(&self) -> impl Iterator<Item = &TypeDef> {
        self.types.values()
    }

    /// Types derived from a base element, ignoring case, in id order.
    pub fn types_by_base_type<'a>(&'a self, base_type: &'a str) -> impl Iterator<Item = &'a TypeDef> {
        self.types.values().filter(move |t| t.base.name.eq_ignore_ascii_case(base_type))
    }

    // ------------------------------------------------------------------
    // attributes
    // ------------------------------------------------------------------

    /// Add an attribute to a type.
    ///
    /// If the definition names a base attribute, it is resolved (ignoring
    /// case) against the type's base element and the data type, unique flag
    /// and enumeration name are copied from it.
    ///
    /// # Errors
    ///
    /// - [`SchemaError::DuplicateName`] if the attribute name is taken
    /// - [`SchemaError::UnknownBaseAttribute`] if the base attribute is unknown
    /// - [`SchemaError::DuplicateBaseAttribute`] if another attribute derives from it
    /// - [`SchemaError::IncompatibleDataType`] if an explicit data type conflicts
    pub fn add_attribute(&mut self, type_id: TypeId, def: AttributeDef) -> CacheResult<()> {
        self.check_name(&def.name)?;
        let type_def = self.type_def(type_id)?;
        if type_def.attribute(&def.name).is_some() {
            return Err(SchemaError::DuplicateName(def.name).into());
        }
        let element = type_def.base;

        let attribute = match def.base_attribute.as_deref() {
            Some(base_name) => {
                let base_attr = element.attribute(base_name).ok_or_else(|| {
                    SchemaError::UnknownBaseAttribute {
                        attribute: base_name.to_owned(),
                        element: element.name.to_owned(),
                    }
                })?;
                if let (Some(explicit), Some(fixed)) = (def.data_type, base_attr.data_type) {
                    if explicit != fixed {
                        return Err(SchemaError::IncompatibleDataType {
                            attribute: def.name,
                            reason: format!("base attribute {} is {fixed}, not {explicit}", base_attr.name),
                        }
                        .into());
                    }
                }
                if let Some(other) =
                    type_def.attributes.iter().find(|a| a.base_attribute.as_deref() == Some(base_attr.name))
                {
                    return Err(SchemaError::DuplicateBaseAttribute(other.name.clone()).into());
                }
                let data_type = base_attr.data_type.or(def.data_type);
                Attribute {
                    length: def.length.unwrap_or_else(|| default_length(data_type)),
                    obligatory: def.obligatory || self.base.is_obligatory(base_attr.name, element.name),
                    unique: def.unique || base_attr.unique,
                    enum_type: base_attr.enum_type.map(str::to_owned).or(def.enum_type),
                    name: def.name,
                    base_attribute: Some(base_attr.name.to_owned()),
                    data_type,
                    autogenerated: def.autogenerated,
                    unit: def.unit,
                }
            }
            None => {
                if def.enum_type.is_some() && !def.data_type.is_some_and(DataType::is_enum) {
                    return Err(SchemaError::IncompatibleDataType {
                        attribute: def.name,
                        reason: "enumeration set on a non-enum attribute".to_owned(),
                    }
                    .into());
                }
                Attribute {
                    length: def.length.unwrap_or_else(|| default_length(def.data_type)),
                    name: def.name,
                    base_attribute: None,
                    data_type: def.data_type,
                    obligatory: def.obligatory,
                    unique: def.unique,
                    autogenerated: def.autogenerated,
                    enum_type: def.enum_type,
                    unit: def.unit,
                }
            }
        };

        debug!(
            type_id = %type_id,
            attribute = %attribute.name,
            base_attribute = ?attribute.base_attribute,
            "added attribute"
        );
        self.type_def_mut(type_id)?.attributes.push(attribute);
        Ok(())
    }

    /// Get an attribute by name.
    ///
    /// # Errors
    ///
    /// Returns [`NotFoundError::UnknownAttribute`] if the type has no such attribute.
    pub fn attribute(&self, type_id: TypeId, name: &str) -> CacheResult<&Attribute> {
        self.type_def(type_id)?
            .attribute(name)
            .ok_or_else(|| CacheError::unknown_attribute(type_id, name))
    }

    fn attribute_mut(&mut self, type_id: TypeId, name: &str) -> CacheResult<&mut Attribute> {
        self.type_def_mut(type_id)?
            .attribute_mut(name)
            .ok_or_else(|| CacheError::unknown_attribute(type_id, name))
    }

    /// Get the attribute derived from a base attribute, ignoring case.
    ///
    /// # Errors
    ///
    /// Returns [`NotFoundError::UnknownType`] if the type does not exist.
    pub fn attribute_by_base_name(&self, type_id: TypeId, base_name: &str) -> CacheResult<Option<&Attribute>> {
        Ok(self.type_def(type_id)?.attributes.iter().find(|a| {
            a.base_attribute.as_deref().is_some_and(|b| b.eq_ignore_ascii_case(base_name))
        }))
    }

    /// Attributes of a type in definition order.
    ///
    /// # Errors
    ///
    /// Returns [`NotFoundError::UnknownType`] if the type does not exist.
    pub fn attributes(&self, type_id: TypeId) -> CacheResult<&[Attribute]> {
        Ok(&self.type_def(type_id)?.attributes)
    }

    /// Rename an attribute definition. Stored values are re-keyed by the caller.
    pub(crate) fn rename_attribute(&mut self, type_id: TypeId, old: &str, new: &str) -> CacheResult<()> {
        self.attribute(type_id, old)?;
        if old == new {
            return Ok(());
        }
        self.check_name(new)?;
        if self.type_def(type_id)?.attribute(new).is_some() {
            return Err(SchemaError::DuplicateName(new.to_owned()).into());
        }
        self.attribute_mut(type_id, old)?.name = new.to_owned();
        debug!(type_id = %type_id, old, new, "renamed attribute");
        Ok(())
    }

    /// Remove an attribute definition. Stored values are dropped by the caller.
    pub(crate) fn remove_attribute(&mut self, type_id: TypeId, name: &str) -> CacheResult<Attribute> {
        let def = self.type_def_mut(type_id)?;
        let pos = def
            .attributes
            .iter()
            .position(|a| a.name == name)
            .ok_or_else(|| CacheError::unknown_attribute(type_id, name))?;
        let removed = def.attributes.remove(pos);
        debug!(type_id = %type_id, attribute = name, "removed attribute");
        Ok(removed)
    }

    /// Check that the data type of an attribute may become `data_type`.
    pub(crate) fn check_data_type_change(
        &self,
        type_id: TypeId,
        name: &str,
        data_type: DataType,
    ) -> CacheResult<bool> {
        let attribute = self.attribute(type_id, name)?;
        if attribute.data_type == Some(data_type) {
            return Ok(false);
        }
        if let Some(base) = attribute.base_attribute.as_deref() {
            return Err(SchemaError::IncompatibleDataType {
                attribute: name.to_owned(),
                reason: format!("derived from base attribute {base}"),
            }
            .into());
        }
        Ok(true)
    }

    /// Change the data type of a free attribute and reset its length.
    pub(crate) fn set_data_type(&mut self, type_id: TypeId, name: &str, data_type: DataType) -> CacheResult<()> {
        if !self.check_data_type_change(type_id, name, data_type)? {
            return Ok(());
        }
        let attribute = self.attribute_mut(type_id, name)?;
        attribute.data_type = Some(data_type);
        attribute.length = data_type.default_length();
        if !data_type.is_enum() {
            attribute.enum_type = None;
        }
        debug!(type_id = %type_id, attribute = name, %data_type, "changed data type");
        Ok(())
    }

    /// Set the length of an attribute.
    ///
    /// # Errors
    ///
    /// Fails if the type or attribute does not exist.
    pub fn set_length(&mut self, type_id: TypeId, name: &str, length: u32) -> CacheResult<()> {
        self.attribute_mut(type_id, name)?.length = length;
        Ok(())
    }

    /// Set the unique flag of an attribute.
    ///
    /// # Errors
    ///
    /// Fails if the type or attribute does not exist.
    pub fn set_unique(&mut self, type_id: TypeId, name: &str, unique: bool) -> CacheResult<()> {
        self.attribute_mut(type_id, name)?.unique = unique;
        Ok(())
    }

    /// Set the autogenerated flag of an attribute.
    ///
    /// # Errors
    ///
    /// Fails if the type or attribute does not exist.
    pub fn set_autogenerated(&mut self, type_id: TypeId, name: &str, autogenerated: bool) -> CacheResult<()> {
        self.attribute_mut(type_id, name)?.autogenerated = autogenerated;
        Ok(())
    }

    /// Set the unit instance of an attribute.
    ///
    /// # Errors
    ///
    /// Fails if the type or attribute does not exist.
    pub fn set_unit(&mut self, type_id: TypeId, name: &str, unit: Option<InstanceId>) -> CacheResult<()> {
        self.attribute_mut(type_id, name)?.unit = unit;
        Ok(())
    }

    /// Set the enumeration of an enum-typed, non-derived attribute.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::IncompatibleDataType`] if the attribute is not
    /// enum-typed or derives from a base attribute (which fixes the enumeration).
    pub fn set_enum_type(&mut self, type_id: TypeId, name: &str, enum_type: Option<String>) -> CacheResult<()> {
        let attribute = self.attribute_mut(type_id, name)?;
        if !attribute.data_type.is_some_and(DataType::is_enum) {
            return Err(SchemaError::IncompatibleDataType {
                attribute: name.to_owned(),
                reason: "attribute is not enum-typed".to_owned(),
            }
            .into());
        }
        if attribute.enum_type == enum_type {
            return Ok(());
        }
        if attribute.base_attribute.is_some() {
            return Err(SchemaError::IncompatibleDataType {
                attribute: name.to_owned(),
                reason: "enumeration of a derived attribute is fixed".to_owned(),
            }
            .into());
        }
        attribute.enum_type = enum_type;
        Ok(())
    }

    fn forced_obligatory(&self, type_def: &TypeDef, attribute: &Attribute) -> bool {
        attribute
            .base_attribute
            .as_deref()
            .is_some_and(|base| self.base.is_obligatory(base, type_def.base.name))
    }

    /// Returns `true` if the attribute must always carry a value.
    ///
    /// That is the case if its stored flag is set, or if it derives from a
    /// base attribute the obligatory table marks mandatory for the type's
    /// base element (or for all elements).
    ///
    /// # Errors
    ///
    /// Fails if the type or attribute does not exist.
    pub fn is_obligatory(&self, type_id: TypeId, name: &str) -> CacheResult<bool> {
        let type_def = self.type_def(type_id)?;
        let attribute = type_def.attribute(name).ok_or_else(|| CacheError::unknown_attribute(type_id, name))?;
        Ok(attribute.obligatory || self.forced_obligatory(type_def, attribute))
    }

    /// Set the obligatory flag.
    ///
    /// # Errors
    ///
    /// Returns [`ConstraintError::ObligatoryDowngradeRejected`] when clearing
    /// the flag of an attribute the base model forces obligatory.
    pub fn set_obligatory(&mut self, type_id: TypeId, name: &str, obligatory: bool) -> CacheResult<()> {
        let type_def = self.type_def(type_id)?;
        let attribute = type_def.attribute(name).ok_or_else(|| CacheError::unknown_attribute(type_id, name))?;
        if !obligatory && self.forced_obligatory(type_def, attribute) {
            return Err(ConstraintError::ObligatoryDowngradeRejected {
                attribute: name.to_owned(),
                base_attribute: attribute.base_attribute.clone().unwrap_or_default(),
            }
            .into());
        }
        self.attribute_mut(type_id, name)?.obligatory = obligatory;
        Ok(())
    }

    // ------------------------------------------------------------------
    // relations
    // ------------------------------------------------------------------

    /// Add a relation to its source type.
    ///
    /// The target may be left unset and bound later with
    /// [`bind_target`](Self::bind_target).
    ///
    /// # Errors
    ///
    /// - [`NotFoundError::UnknownType`] for an unknown source or target type
    /// - [`SchemaError::DuplicateName`] if the source type has a relation of that name
    /// - [`SchemaError::UnknownBaseRelation`] for an unknown base relation
    /// - [`SchemaError::InvalidRelationRange`] for an inconsistent range
    pub fn add_relation(&mut self, def: RelationDef) -> CacheResult<RelationId> {
        self.check_name(&def.name)?;
        let source = self.type_def(def.source)?;
        if let Some(target) = def.target {
            self.type_def(target)?;
        }
        if source.relations.iter().any(|r| self.relations.get(r).is_some_and(|r| r.name == def.name)) {
            return Err(SchemaError::DuplicateName(def.name).into());
        }
        if !def.range.is_valid() {
            return Err(SchemaError::InvalidRelationRange { min: def.range.min, max: def.range.max }.into());
        }
        let base_relation = match def.base_relation.as_deref() {
            Some(name) => Some(
                source
                    .base
                    .relation(name)
                    .ok_or_else(|| SchemaError::UnknownBaseRelation {
                        relation: name.to_owned(),
                        element: source.base.name.to_owned(),
                    })?
                    .name
                    .to_owned(),
            ),
            None => None,
        };

        let id = self.ids.next_relation_id();
        debug!(relation = %id, name = %def.name, source = %def.source, "added relation");
        self.relations.insert(
            id,
            Relation {
                id,
                name: def.name,
                inverse_name: def.inverse_name,
                source: def.source,
                target: def.target,
                range: def.range,
                base_relation,
            },
        );
        self.type_def_mut(def.source)?.relations.push(id);
        Ok(id)
    }

    /// Bind the target type of a relation.
    ///
    /// # Errors
    ///
    /// Fails if the relation or the target type does not exist.
    pub fn bind_target(&mut self, id: RelationId, target: TypeId) -> CacheResult<()> {
        self.type_def(target)?;
        let relation = self.relations.get_mut(&id).ok_or_else(|| CacheError::unknown_relation(id))?;
        relation.target = Some(target);
        debug!(relation = %id, target = %target, "bound relation target");
        Ok(())
    }

    /// Get a relation by id.
    ///
    /// # Errors
    ///
    /// Returns [`NotFoundError::UnknownRelation`] if no relation has this id.
    pub fn relation(&self, id: RelationId) -> CacheResult<&Relation> {
        self.relations.get(&id).ok_or_else(|| CacheError::unknown_relation(id))
    }

    /// Get a relation of a type by name.
    ///
    /// # Errors
    ///
    /// Fails if the type does not exist or has no relation of that name.
    pub fn relation_by_name(&self, type_id: TypeId, name: &str) -> CacheResult<&Relation> {
        self.type_def(type_id)?
            .relations
            .iter()
            .filter_map(|id| self.relations.get(id))
            .find(|r| r.name == name)
            .ok_or_else(|| NotFoundError::UnknownRelation(name.to_owned()).into())
    }

    /// Relations whose source is the type, in definition order.
    ///
    /// # Errors
    ///
    /// Returns [`NotFoundError::UnknownType`] if the type does not exist.
    pub fn relations_of(&self, type_id: TypeId) -> CacheResult<Vec<&Relation>> {
        Ok(self.type_def(type_id)?.relations.iter().filter_map(|id| self.relations.get(id)).collect())
    }

    /// Every relation in the catalog, in id order.
    pub fn all_relations(&self) -> impl Iterator<Item = &Relation> {
        self.relations.values()
    }

    /// Relations whose bound target is the type.
    pub fn relations_targeting(&self, type_id: TypeId) -> impl Iterator<Item = &Relation> {
        self.relations.values().filter(move |r| r.target == Some(type_id))
    }

    /// Resolve the inverse of a relation.
    ///
    /// The inverse is the relation on the target type whose name equals this
    /// relation's inverse name, whose own inverse name equals this relation's
    /// name, and whose target is this relation's source.
    ///
    /// # Errors
    ///
    /// Returns [`NotFoundError::NoInverseRelation`] if the target is unbound
    /// or no relation matches.
    pub fn inverse_relation(&self, id: RelationId) -> CacheResult<RelationId> {
        let relation = self.relation(id)?;
        let found = relation.target.and_then(|target| {
            self.types.get(&target)?.relations.iter().filter_map(|r| self.relations.get(r)).find(|inv| {
                inv.name == relation.inverse_name
                    && inv.inverse_name == relation.name
                    && inv.target == Some(relation.source)
            })
        });
        match found {
            Some(inverse) => Ok(inverse.id),
            None => {
                warn!(relation = %id, name = %relation.name, "unable to find inverse relation");
                Err(NotFoundError::NoInverseRelation { id, relation: relation.name.clone() }.into())
            }
        }
    }

    /// Check that every relation has a bound target and an inverse.
    ///
    /// Meant to run once a two-phase schema build is complete.
    ///
    /// # Errors
    ///
    /// Returns the first [`NotFoundError::NoInverseRelation`] encountered.
    pub fn validate_relations(&self) -> CacheResult<()> {
        for id in self.relations.keys() {
            self.inverse_relation(*id)?;
        }
        Ok(())
    }

    /// Remove a relation definition. Edges are dropped by the caller.
    pub(crate) fn remove_relation(&mut self, id: RelationId) -> CacheResult<Relation> {
        let removed = self.detach_relation(id).ok_or_else(|| CacheError::unknown_relation(id))?;
        debug!(relation = %id, name = %removed.name, "removed relation");
        Ok(removed)
    }

    fn detach_relation(&mut self, id: RelationId) -> Option<Relation> {
        let relation = self.relations.remove(&id)?;
        if let Some(source) = self.types.get_mut(&relation.source) {
            source.relations.retain(|r| *r != id);
        }
        Some(relation)
    }

    /// Replace the range of a relation. Existing edge sets are checked by the caller.
    pub(crate) fn set_relation_range(&mut self, id: RelationId, range: RelationRange) -> CacheResult<()> {
        if !range.is_valid() {
            return Err(SchemaError::InvalidRelationRange { min: range.min, max: range.max }.into());
        }
        let relation = self.relations.get_mut(&id).ok_or_else(|| CacheError::unknown_relation(id))?;
        relation.range = range;
        debug!(relation = %id, %range, "changed relation range");
        Ok(())
    }
}

impl Default for TypeCatalog {
    fn default() -> Self {
        Self::new(&CacheConfig::default())
    }
}

fn default_length(data_type: Option<DataType>) -> u32 {
    data_type.map_or(1, DataType::default_length)
}
