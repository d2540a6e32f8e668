//! Identifiers for types, instances and relations.
//!
//! All identifiers are plain integers wrapped in newtypes. Instances are never
//! referenced by pointer: an [`InstanceHandle`] (type id plus instance id) is
//! the only way to name one, which keeps the relation graph free of ownership
//! cycles.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of a type definition (an "application element").
///
/// Type ids are unique for the lifetime of a cache and are never reused, even
/// after the type has been removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TypeId(u64);

impl TypeId {
    /// Create a new `TypeId` from a raw u64 value.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Get the raw u64 value.
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl From<u64> for TypeId {
    fn from(id: u64) -> Self {
        Self::new(id)
    }
}

impl fmt::Display for TypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of an instance, unique only within its type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct InstanceId(u64);

impl InstanceId {
    /// The id handed out for the first instance of an empty type.
    pub const FIRST: Self = Self(1);

    /// Create a new `InstanceId` from a raw u64 value.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Get the raw u64 value.
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }

    /// The id directly following this one.
    #[must_use]
    pub const fn successor(self) -> Self {
        Self(self.0 + 1)
    }
}

impl From<u64> for InstanceId {
    fn from(id: u64) -> Self {
        Self::new(id)
    }
}

impl fmt::Display for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a relation definition.
///
/// Edges are keyed by relation id rather than by relation name, so renaming a
/// relation never touches stored edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RelationId(u64);

impl RelationId {
    /// Create a new `RelationId` from a raw u64 value.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Get the raw u64 value.
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for RelationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A fully qualified reference to one instance.
///
/// This is the value a boundary layer maps to whatever external proxy or
/// remote object it needs. The cache itself never creates such proxies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct InstanceHandle {
    /// The type the instance belongs to.
    pub type_id: TypeId,
    /// The instance id within that type.
    pub instance_id: InstanceId,
}

impl InstanceHandle {
    /// Create a handle from its two parts.
    #[inline]
    #[must_use]
    pub const fn new(type_id: TypeId, instance_id: InstanceId) -> Self {
        Self { type_id, instance_id }
    }
}

impl fmt::Display for InstanceHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.type_id, self.instance_id)
    }
}
