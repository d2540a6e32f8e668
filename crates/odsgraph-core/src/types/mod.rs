//! Core data types for `odsgraph`.
//!
//! This module defines the identifiers and typed values shared by the schema,
//! instance and relation layers.

mod data_type;
mod id;
mod range;
mod value;

pub use data_type::{DataKind, DataType};
pub use id::{InstanceHandle, InstanceId, RelationId, TypeId};
pub use range::RelationRange;
pub use value::{Blob, Complex32, Complex64, ExternalReference, Scalar, Sequence, TypedValue, Value};
