//! `odsgraph` Core
//!
//! This crate provides the value types shared by the application model cache
//! and its collaborators (model loaders, file converters, service layers).
//!
//! # Overview
//!
//! - **Identifiers**: [`TypeId`], [`InstanceId`], [`RelationId`] and the
//!   [`InstanceHandle`] pair used to name an instance from outside the cache
//! - **Data types**: [`DataKind`] and [`DataType`] (scalar or sequence)
//! - **Values**: [`Value`] and the possibly unset [`TypedValue`]
//! - **Cardinality**: [`RelationRange`]
//! - **Base model**: the fixed [`base::BaseModel`] deciding obligatory
//!   attributes and the data types of derived attributes
//!
//! # Example
//!
//! ```
//! use odsgraph_core::base::BaseModel;
//! use odsgraph_core::{DataKind, DataType, TypedValue};
//!
//! let model = BaseModel::standard();
//! let column = model.element("AoLocalColumn").unwrap();
//! let flags = column.attribute("flags").unwrap();
//! assert_eq!(flags.data_type, Some(DataType::sequence(DataKind::Short)));
//! assert!(model.is_obligatory("flags", column.name));
//!
//! let value = TypedValue::from(42i32);
//! assert!(value.is_set());
//! ```
//!
//! # Modules
//!
//! - [`types`] - Identifiers, data types and values
//! - [`base`] - The fixed base model and the obligatory-attribute table
//! - [`error`] - Error types ([`CoreError`])

// Deny unwrap in library code to ensure proper error handling
#![deny(clippy::unwrap_used)]

pub mod base;
pub mod error;
pub mod types;

pub use error::CoreError;
pub use types::{
    Blob, Complex32, Complex64, DataKind, DataType, ExternalReference, InstanceHandle, InstanceId,
    RelationId, RelationRange, Scalar, Sequence, TypeId, TypedValue, Value,
};
