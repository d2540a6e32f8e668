//! Error types for the model cache.
//!
//! Errors fall into three families: [`SchemaError`] for malformed schema
//! edits, [`NotFoundError`] for references to things that do not exist, and
//! [`ConstraintError`] for edits that would break a model invariant. All of
//! them convert into the crate-level [`CacheError`].
//!
//! A failed mutating call leaves the cache exactly as it was before the call.

use odsgraph_core::{CoreError, InstanceId, RelationId, TypeId};
use thiserror::Error;

/// The schema edit is malformed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// A type, attribute or relation with this name already exists.
    #[error("duplicate name: {0}")]
    DuplicateName(String),

    /// Another attribute of the type already derives from this base attribute.
    #[error("duplicate base attribute: {0}")]
    DuplicateBaseAttribute(String),

    /// The name is empty or too long.
    #[error("invalid name '{name}': {reason}")]
    InvalidName {
        /// The rejected name.
        name: String,
        /// Why it was rejected.
        reason: String,
    },

    /// The base type names no base element.
    #[error("unknown base element: {0}")]
    UnknownBaseElement(String),

    /// The base attribute does not exist on the type's base element.
    #[error("unknown base attribute '{attribute}' for base element {element}")]
    UnknownBaseAttribute {
        /// The requested base attribute.
        attribute: String,
        /// The base element searched.
        element: String,
    },

    /// The base relation does not exist on the type's base element.
    #[error("unknown base relation '{relation}' for base element {element}")]
    UnknownBaseRelation {
        /// The requested base relation.
        relation: String,
        /// The base element searched.
        element: String,
    },

    /// The data type conflicts with the attribute or base attribute.
    #[error("incompatible data type for '{attribute}': {reason}")]
    IncompatibleDataType {
        /// The attribute concerned.
        attribute: String,
        /// What conflicted.
        reason: String,
    },

    /// The cardinality range is inconsistent.
    #[error("invalid relation range {{{min}, {max}}}")]
    InvalidRelationRange {
        /// Requested minimum.
        min: i32,
        /// Requested maximum.
        max: i32,
    },
}

/// Something referenced by the call does not exist.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NotFoundError {
    /// No type with this id or name.
    #[error("unknown type: {0}")]
    UnknownType(String),

    /// No instance with this id in the type.
    #[error("unknown instance {instance_id} of type {type_id}")]
    UnknownInstance {
        /// The type searched.
        type_id: TypeId,
        /// The missing instance.
        instance_id: InstanceId,
    },

    /// No attribute with this name on the type or instance.
    #[error("unknown attribute '{attribute}' on type {type_id}")]
    UnknownAttribute {
        /// The type searched.
        type_id: TypeId,
        /// The missing attribute.
        attribute: String,
    },

    /// No relation with this id, or it does not belong to the given type.
    #[error("unknown relation: {0}")]
    UnknownRelation(String),

    /// The relation has no unique inverse on its target type.
    #[error("no inverse relation for '{relation}' ({id})")]
    NoInverseRelation {
        /// The relation whose inverse is missing.
        id: RelationId,
        /// Its name.
        relation: String,
    },

    /// An instance cursor has no further elements.
    #[error("cursor is at the end")]
    CursorExhausted,
}

/// The edit would violate a model invariant.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConstraintError {
    /// The attribute is forced obligatory by the base model.
    #[error("attribute '{attribute}' derives from obligatory base attribute '{base_attribute}'")]
    ObligatoryDowngradeRejected {
        /// The attribute concerned.
        attribute: String,
        /// The obligatory base attribute it derives from.
        base_attribute: String,
    },

    /// The edge set would exceed the relation's maximum.
    #[error("relation '{relation}' allows at most {max} related instances, {requested} requested")]
    CardinalityViolation {
        /// The relation concerned.
        relation: String,
        /// The relation's maximum.
        max: i32,
        /// The size the edit would produce.
        requested: usize,
    },

    /// The type still has live instances.
    #[error("type {type_id} still has {count} instances")]
    TypeHasInstances {
        /// The type concerned.
        type_id: TypeId,
        /// Number of live instances.
        count: usize,
    },

    /// Instances hold values for the attribute.
    #[error("attribute '{0}' has instance values")]
    HasInstanceValues(String),

    /// Edges are recorded under the relation or its inverse.
    #[error("relation '{relation}' still has {edges} edges")]
    RelationHasEdges {
        /// The relation concerned.
        relation: String,
        /// Number of edges recorded under the relation and its inverse.
        edges: usize,
    },
}

/// Errors returned by the model cache.
#[derive(Debug, Error)]
pub enum CacheError {
    /// A schema error occurred.
    #[error("schema error: {0}")]
    Schema(#[from] SchemaError),

    /// A referenced item was not found.
    #[error("not found: {0}")]
    NotFound(#[from] NotFoundError),

    /// A model constraint was violated.
    #[error("constraint violation: {0}")]
    Constraint(#[from] ConstraintError),

    /// An error from the core crate.
    #[error("core error: {0}")]
    Core(#[from] CoreError),

    /// The model lock was poisoned (a thread panicked while holding it).
    #[error("model lock poisoned: {0}")]
    LockPoisoned(String),
}

impl CacheError {
    /// Returns `true` for the [`NotFoundError`] family.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// Returns `true` for the [`SchemaError`] family.
    #[must_use]
    pub const fn is_schema_error(&self) -> bool {
        matches!(self, Self::Schema(_))
    }

    /// Returns `true` for the [`ConstraintError`] family.
    #[must_use]
    pub const fn is_constraint_violation(&self) -> bool {
        matches!(self, Self::Constraint(_))
    }

    /// Create a lock-poisoned error.
    pub fn lock_poisoned(msg: impl Into<String>) -> Self {
        Self::LockPoisoned(msg.into())
    }

    pub(crate) fn unknown_instance(type_id: TypeId, instance_id: InstanceId) -> Self {
        NotFoundError::UnknownInstance { type_id, instance_id }.into()
    }

    pub(crate) fn unknown_attribute(type_id: TypeId, attribute: impl Into<String>) -> Self {
        NotFoundError::UnknownAttribute { type_id, attribute: attribute.into() }.into()
    }

    pub(crate) fn unknown_type(type_id: TypeId) -> Self {
        NotFoundError::UnknownType(type_id.to_string()).into()
    }

    pub(crate) fn unknown_relation(id: RelationId) -> Self {
        NotFoundError::UnknownRelation(id.to_string()).into()
    }

    pub(crate) fn relation_not_of_type(relation: &str, type_id: TypeId) -> Self {
        NotFoundError::UnknownRelation(format!("{relation} is not a relation of type {type_id}")).into()
    }
}

impl From<CoreError> for SchemaError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::UnknownBaseElement(name) => Self::UnknownBaseElement(name),
            CoreError::UnknownDataType(name) => Self::IncompatibleDataType {
                attribute: String::new(),
                reason: format!("unknown data type {name}"),
            },
        }
    }
}

/// Result type for cache operations.
pub type CacheResult<T> = Result<T, CacheError>;
