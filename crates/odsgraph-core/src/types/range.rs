//! Cardinality ranges of relations.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The `{min, max}` cardinality of a relation.
///
/// A `max` of [`RelationRange::UNBOUNDED`] (−1) means "any number".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RelationRange {
    /// Minimum number of related instances.
    pub min: i32,
    /// Maximum number of related instances, or −1.
    pub max: i32,
}

impl RelationRange {
    /// Marker for an unbounded maximum.
    pub const UNBOUNDED: i32 = -1;

    /// `{0, 1}`.
    pub const OPTIONAL: Self = Self { min: 0, max: 1 };
    /// `{1, 1}`.
    pub const EXACTLY_ONE: Self = Self { min: 1, max: 1 };
    /// `{0, -1}`.
    pub const MANY: Self = Self { min: 0, max: Self::UNBOUNDED };

    /// Create a range.
    #[must_use]
    pub const fn new(min: i32, max: i32) -> Self {
        Self { min, max }
    }

    /// Returns `true` if there is no upper bound.
    #[inline]
    #[must_use]
    pub const fn is_unbounded(self) -> bool {
        self.max == Self::UNBOUNDED
    }

    /// Returns `true` if at most one instance may be related.
    #[inline]
    #[must_use]
    pub const fn is_single(self) -> bool {
        self.max == 1
    }

    /// Returns `true` if `count` related instances fit under the maximum.
    ///
    /// A malformed maximum below -1 admits nothing.
    #[inline]
    #[must_use]
    pub const fn admits(self, count: usize) -> bool {
        self.is_unbounded() || (self.max >= 0 && count <= self.max as usize)
    }

    /// Returns `true` if the bounds are consistent.
    ///
    /// `min` must be non-negative; `max` must be −1 or at least `max(min, 1)`.
    #[must_use]
    pub const fn is_valid(self) -> bool {
        if self.min < 0 {
            return false;
        }
        if self.is_unbounded() {
            return true;
        }
        self.max >= 1 && self.max >= self.min
    }
}

impl fmt::Display for RelationRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_unbounded() {
            write!(f, "{{{}, *}}", self.min)
        } else {
            write!(f, "{{{}, {}}}", self.min, self.max)
        }
    }
}
