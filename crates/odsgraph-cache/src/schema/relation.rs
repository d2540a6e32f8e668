//! Relation definitions.

use odsgraph_core::{RelationId, RelationRange, TypeId};
use serde::{Deserialize, Serialize};

/// A request to add a relation to a source type.
///
/// The target type may be left open and bound later with
/// [`TypeCatalog::bind_target`](super::TypeCatalog::bind_target); schema
/// loaders declare relations before all types are known.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationDef {
    /// Relation name, unique within the source type.
    pub name: String,
    /// Name of the inverse relation on the target type.
    pub inverse_name: String,
    /// The type owning the relation.
    pub source: TypeId,
    /// The type on the other side, if already known.
    pub target: Option<TypeId>,
    /// Cardinality.
    pub range: RelationRange,
    /// Base relation to derive from, if any.
    pub base_relation: Option<String>,
}

impl RelationDef {
    /// Start a definition; the range defaults to `{0, -1}`.
    #[must_use]
    pub fn new(name: impl Into<String>, inverse_name: impl Into<String>, source: TypeId) -> Self {
        Self {
            name: name.into(),
            inverse_name: inverse_name.into(),
            source,
            target: None,
            range: RelationRange::MANY,
            base_relation: None,
        }
    }

    /// Set the target type.
    #[must_use]
    pub const fn with_target(mut self, target: TypeId) -> Self {
        self.target = Some(target);
        self
    }

    /// Set the cardinality.
    #[must_use]
    pub const fn with_range(mut self, range: RelationRange) -> Self {
        self.range = range;
        self
    }

    /// Derive from a base relation.
    #[must_use]
    pub fn with_base(mut self, base_relation: impl Into<String>) -> Self {
        self.base_relation = Some(base_relation.into());
        self
    }
}

/// A relation as stored in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relation {
    pub(crate) id: RelationId,
    pub(crate) name: String,
    pub(crate) inverse_name: String,
    pub(crate) source: TypeId,
    pub(crate) target: Option<TypeId>,
    pub(crate) range: RelationRange,
    pub(crate) base_relation: Option<String>,
}

impl Relation {
    /// The relation id.
    #[must_use]
    pub const fn id(&self) -> RelationId {
        self.id
    }

    /// The relation name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The name of the inverse relation.
    #[must_use]
    pub fn inverse_name(&self) -> &str {
        &self.inverse_name
    }

    /// The source type.
    #[must_use]
    pub const fn source(&self) -> TypeId {
        self.source
    }

    /// The target type, `None` until bound.
    #[must_use]
    pub const fn target(&self) -> Option<TypeId> {
        self.target
    }

    /// The cardinality.
    #[must_use]
    pub const fn range(&self) -> RelationRange {
        self.range
    }

    /// Canonical name of the base relation.
    #[must_use]
    pub fn base_relation(&self) -> Option<&str> {
        self.base_relation.as_deref()
    }
}
