//! Schema definitions: types, attributes and relations.
//!
//! [`TypeCatalog`] is the registry; [`AttributeDef`] and [`RelationDef`] are
//! the requests passed to it, [`Attribute`] and [`Relation`] what it stores.

mod attribute;
mod catalog;
mod relation;

pub use attribute::{Attribute, AttributeDef};
pub use catalog::{TypeCatalog, TypeDef};
pub use relation::{Relation, RelationDef};
