//! Identity allocation for types, relations and instances.
//!
//! Type and relation ids come from monotonic counters and are never reused.
//! Instance ids are different: they are recomputed on every call as one more
//! than the largest live id of the type, so a type whose instances have all
//! been deleted hands out id 1 again.

use std::sync::atomic::{AtomicU64, Ordering};

use odsgraph_core::{InstanceId, RelationId, TypeId};

/// Issues type and relation ids.
///
/// The counters start at 1 (0 is never handed out) and only ever grow.
///
/// # Example
///
/// ```
/// use odsgraph_cache::IdAllocator;
///
/// let ids = IdAllocator::new();
/// let a = ids.next_type_id();
/// let b = ids.next_type_id();
/// assert_eq!(a.as_u64(), 1);
/// assert!(a < b);
/// ```
#[derive(Debug)]
pub struct IdAllocator {
    /// The next type id to assign.
    next_type_id: AtomicU64,
    /// The next relation id to assign.
    next_relation_id: AtomicU64,
}

impl IdAllocator {
    /// Create an allocator starting from 1.
    #[must_use]
    pub const fn new() -> Self {
        Self { next_type_id: AtomicU64::new(1), next_relation_id: AtomicU64::new(1) }
    }

    /// Generate the next type id.
    pub fn next_type_id(&self) -> TypeId {
        TypeId::new(self.next_type_id.fetch_add(1, Ordering::Relaxed))
    }

    /// Generate the next relation id.
    pub fn next_relation_id(&self) -> RelationId {
        RelationId::new(self.next_relation_id.fetch_add(1, Ordering::Relaxed))
    }

    /// The type id the next call to [`next_type_id`](Self::next_type_id) returns.
    #[must_use]
    pub fn current_type_counter(&self) -> u64 {
        self.next_type_id.load(Ordering::Relaxed)
    }
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self::new()
    }
}

/// Compute the id for a new instance from the ids currently alive in its type.
///
/// Returns [`InstanceId::FIRST`] for an empty type, otherwise the maximum
/// live id plus one.
pub fn next_instance_id<I>(live: I) -> InstanceId
where
    I: IntoIterator<Item = InstanceId>,
{
    live.into_iter().max().map_or(InstanceId::FIRST, InstanceId::successor)
}
