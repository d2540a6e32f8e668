//! Resettable enumeration over a snapshot of instances.
//!
//! A cursor copies the handles it walks over when it is created, so it never
//! holds the model lock and later edits do not affect it. Boundary layers use
//! it to mint whatever external references they need.

use odsgraph_core::{InstanceHandle, TypeId};

use crate::error::{CacheResult, NotFoundError};
use crate::model::ModelState;

/// A position cursor over a fixed list of instance handles.
///
/// # Example
///
/// ```
/// use odsgraph_cache::{InstanceCursor, ModelState};
///
/// let mut state = ModelState::default();
/// let unit = state.register_type("Unit", "AoUnit").unwrap();
/// for _ in 0..3 {
///     state.insert(unit).unwrap();
/// }
///
/// let mut cursor = InstanceCursor::for_type(&state, unit).unwrap();
/// assert_eq!(cursor.count(), 3);
/// assert_eq!(cursor.next_n(2).len(), 2);
/// assert_eq!(cursor.next_n(2).len(), 1);
/// cursor.reset();
/// assert_eq!(cursor.next_one().unwrap().instance_id.as_u64(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstanceCursor {
    handles: Vec<InstanceHandle>,
    position: usize,
}

impl InstanceCursor {
    /// Create a cursor over the given handles, in the given order.
    #[must_use]
    pub fn new(handles: Vec<InstanceHandle>) -> Self {
        Self { handles, position: 0 }
    }

    /// Snapshot the live instances of a type in ascending id order.
    ///
    /// # Errors
    ///
    /// Fails if the type does not exist.
    pub fn for_type(state: &ModelState, type_id: TypeId) -> CacheResult<Self> {
        let handles =
            state.list_ids(type_id)?.into_iter().map(|id| InstanceHandle::new(type_id, id)).collect();
        Ok(Self::new(handles))
    }

    /// Total number of handles, independent of the position.
    #[must_use]
    pub fn count(&self) -> usize {
        self.handles.len()
    }

    /// Number of handles not yet returned.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.handles.len() - self.position
    }

    /// Return up to `n` handles from the current position and advance past them.
    pub fn next_n(&mut self, n: usize) -> Vec<InstanceHandle> {
        let end = self.position.saturating_add(n).min(self.handles.len());
        let batch = self.handles[self.position..end].to_vec();
        self.position = end;
        batch
    }

    /// Return the next handle.
    ///
    /// # Errors
    ///
    /// Returns [`NotFoundError::CursorExhausted`] at the end.
    pub fn next_one(&mut self) -> CacheResult<InstanceHandle> {
        let handle = *self.handles.get(self.position).ok_or(NotFoundError::CursorExhausted)?;
        self.position += 1;
        Ok(handle)
    }

    /// Move back to the first handle.
    pub fn reset(&mut self) {
        self.position = 0;
    }
}
