//! Cache configuration.

use serde::{Deserialize, Serialize};

/// Configuration options for a [`ModelCache`](crate::ModelCache).
///
/// # Example
///
/// ```
/// use odsgraph_cache::CacheConfig;
///
/// let config = CacheConfig::new().max_name_length(64).strict_value_types(false);
/// assert_eq!(config.max_name_length, 64);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Longest permitted type, attribute or relation name.
    pub max_name_length: usize,
    /// Reject set values whose data type differs from the attribute's.
    pub strict_value_types: bool,
}

impl CacheConfig {
    /// Default maximum name length.
    pub const DEFAULT_MAX_NAME_LENGTH: usize = 30;

    /// Create a configuration with default values.
    #[must_use]
    pub const fn new() -> Self {
        Self { max_name_length: Self::DEFAULT_MAX_NAME_LENGTH, strict_value_types: true }
    }

    /// Set the maximum name length.
    #[must_use]
    pub const fn max_name_length(mut self, len: usize) -> Self {
        self.max_name_length = len;
        self
    }

    /// Set whether value data types are checked against attributes.
    #[must_use]
    pub const fn strict_value_types(mut self, strict: bool) -> Self {
        self.strict_value_types = strict;
        self
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self::new()
    }
}
