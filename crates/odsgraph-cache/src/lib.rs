//! `odsgraph` Model Cache
//!
//! This crate holds the in-memory application model: type definitions with
//! their attributes and relations, every instance record, and the mirrored
//! relation edges between instances. It keeps them consistent under
//! incremental, concurrent edits.
//!
//! # Overview
//!
//! - [`TypeCatalog`](schema::TypeCatalog) - types, attributes, relation
//!   definitions and inverse pairing, checked against the fixed base model
//! - [`InstanceStore`](instance::InstanceStore) - per-type instance records
//!   with schema values and ad hoc instance attributes
//! - [`RelationGraph`](graph::RelationGraph) - bidirectional,
//!   cardinality-checked edges
//! - [`IdAllocator`] - monotonic type and relation ids; instance ids follow
//!   the largest live id of their type
//! - [`InstanceCursor`] - resettable enumeration for boundary layers
//! - [`ModelState`] - all of the above, with the operations that span them
//! - [`ModelCache`] - a cloneable handle guarding one `ModelState` with a
//!   reader-writer lock
//!
//! # Example
//!
//! ```
//! use odsgraph_cache::ModelCache;
//! use odsgraph_cache::schema::{AttributeDef, RelationDef};
//! use odsgraph_core::RelationRange;
//!
//! # fn main() -> Result<(), odsgraph_cache::CacheError> {
//! let cache = ModelCache::new();
//! let test = cache.register_type("Test", "AoTest")?;
//! let sub = cache.register_type("SubTest", "AoSubTest")?;
//! cache.add_attribute(test, AttributeDef::new("name").with_base("name"))?;
//!
//! // relations may be declared before their target type is bound
//! let children = cache.add_relation(RelationDef::new("children", "parent", test))?;
//! cache.add_relation(
//!     RelationDef::new("parent", "children", sub)
//!         .with_target(test)
//!         .with_range(RelationRange::EXACTLY_ONE),
//! )?;
//! cache.bind_target(children, sub)?;
//!
//! let t = cache.insert(test)?;
//! let s = cache.insert(sub)?;
//! cache.set_value(test, t, "name", "endurance run")?;
//! cache.connect(test, t, children, s)?;
//!
//! cache.delete(sub, s)?;
//! assert!(cache.query(test, t, children)?.is_empty());
//! # Ok(())
//! # }
//! ```
//!
//! # Modules
//!
//! - [`schema`] - Type catalog and definition types
//! - [`instance`] - Instance records and store
//! - [`graph`] - Relation edges
//! - [`error`] - Error types ([`CacheError`] and its families)

// Deny unwrap in library code to ensure proper error handling
#![deny(clippy::unwrap_used)]

pub mod config;
pub mod cursor;
pub mod error;
pub mod graph;
pub mod id_gen;
pub mod instance;
pub mod model;
pub mod schema;


pub use config::CacheConfig;
pub use cursor::InstanceCursor;
pub use error::{CacheError, CacheResult, ConstraintError, NotFoundError, SchemaError};
pub use id_gen::IdAllocator;
pub use model::{ModelCache, ModelState};
