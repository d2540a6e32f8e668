//! The fixed base model.
//!
//! Every type in the application model derives from one base element. The base
//! model is only consulted to decide which attributes are mandatory, which
//! data type an attribute derived from a base attribute has, and which base
//! relations exist. It never changes at runtime.
//!
//! # Example
//!
//! ```
//! use odsgraph_core::base::BaseModel;
//!
//! let model = BaseModel::standard();
//! let unit = model.element("aounit").unwrap();
//! assert_eq!(unit.name, "AoUnit");
//! assert!(unit.attribute("FACTOR").is_some());
//! assert!(model.is_obligatory("factor", unit.name));
//! ```

mod model;
mod obligatory;

pub use obligatory::{Applicability, ObligatoryTable};

use crate::error::CoreError;
use crate::types::{DataType, RelationRange};

/// An attribute defined by a base element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BaseAttribute {
    /// Canonical name.
    pub name: &'static str,
    /// Data type, `None` where the base model leaves it open.
    pub data_type: Option<DataType>,
    /// Whether values must be unique.
    pub unique: bool,
    /// Name of the enumeration for enum-typed attributes.
    pub enum_type: Option<&'static str>,
}

/// A relation defined by a base element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BaseRelation {
    /// Canonical name.
    pub name: &'static str,
    /// Name of the base element on the other side.
    pub target: &'static str,
    /// Cardinality.
    pub range: RelationRange,
}

/// A base element: the fixed archetype of application types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BaseElement {
    /// Canonical name, e.g. `AoMeasurement`.
    pub name: &'static str,
    attributes: &'static [BaseAttribute],
    relations: &'static [BaseRelation],
}

impl BaseElement {
    /// Look up a base attribute, ignoring case.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&'static BaseAttribute> {
        self.attributes().find(|a| a.name.eq_ignore_ascii_case(name))
    }

    /// All base attributes, common ones first.
    pub fn attributes(&self) -> impl Iterator<Item = &'static BaseAttribute> {
        model::COMMON_ATTRIBUTES.iter().chain(self.attributes.iter())
    }

    /// Look up a base relation, ignoring case.
    #[must_use]
    pub fn relation(&self, name: &str) -> Option<&'static BaseRelation> {
        self.relations.iter().find(|r| r.name.eq_ignore_ascii_case(name))
    }

    /// All base relations.
    pub fn relations(&self) -> impl Iterator<Item = &'static BaseRelation> {
        self.relations.iter()
    }
}

/// The base model: base elements plus the obligatory-attribute table.
#[derive(Debug, Clone)]
pub struct BaseModel {
    elements: &'static [BaseElement],
    obligatory: ObligatoryTable,
}

impl BaseModel {
    /// The standard base model.
    #[must_use]
    pub fn standard() -> Self {
        Self { elements: model::ELEMENTS, obligatory: ObligatoryTable::standard() }
    }

    /// Look up a base element, ignoring case.
    #[must_use]
    pub fn element(&self, name: &str) -> Option<&'static BaseElement> {
        self.elements.iter().find(|e| e.name.eq_ignore_ascii_case(name))
    }

    /// Look up a base element, failing with [`CoreError::UnknownBaseElement`].
    ///
    /// # Errors
    ///
    /// Returns an error if no base element has this name.
    pub fn require_element(&self, name: &str) -> Result<&'static BaseElement, CoreError> {
        self.element(name).ok_or_else(|| CoreError::UnknownBaseElement(name.to_owned()))
    }

    /// All base elements.
    pub fn elements(&self) -> impl Iterator<Item = &'static BaseElement> {
        self.elements.iter()
    }

    /// The obligatory-attribute table.
    #[must_use]
    pub const fn obligatory_table(&self) -> &ObligatoryTable {
        &self.obligatory
    }

    /// Returns `true` if `base_attribute` is forced obligatory in `base_element`.
    #[must_use]
    pub fn is_obligatory(&self, base_attribute: &str, base_element: &str) -> bool {
        self.obligatory.is_obligatory(base_attribute, base_element)
    }
}

impl Default for BaseModel {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DataKind;

    #[test]
    fn element_lookup_is_case_insensitive() {
        let model = BaseModel::standard();
        assert_eq!(model.element("aomeasurement").map(|e| e.name), Some("AoMeasurement"));
        assert!(model.element("AoNothing").is_none());
        assert!(matches!(model.require_element("x"), Err(CoreError::UnknownBaseElement(_))));
    }

    #[test]
    fn common_attributes_are_everywhere() {
        let model = BaseModel::standard();
        for element in model.elements() {
            assert!(element.attribute("name").is_some(), "{} lacks name", element.name);
            assert!(element.attribute("ID").is_some_and(|a| a.unique));
        }
    }

    #[test]
    fn element_names_are_unique() {
        let model = BaseModel::standard();
        let mut names: Vec<_> = model.elements().map(|e| e.name.to_ascii_lowercase()).collect();
        names.sort();
        let before = names.len();
        names.dedup();
        assert_eq!(before, names.len());
    }

    #[test]
    fn obligatory_entries_name_real_elements() {
        let model = BaseModel::standard();
        for (_, elements) in model::OBLIGATORY {
            for element in elements.iter().flat_map(|list| list.iter()) {
                assert!(model.element(element).is_some(), "{element} is not a base element");
            }
        }
    }

    #[test]
    fn base_relation_targets_exist() {
        let model = BaseModel::standard();
        for element in model.elements() {
            for relation in element.relations() {
                assert!(model.element(relation.target).is_some(), "{}", relation.target);
            }
        }
    }

    #[test]
    fn enum_attributes_carry_enum_name() {
        let model = BaseModel::standard();
        let mq = model.element("AoMeasurementQuantity").unwrap();
        let datatype = mq.attribute("datatype").unwrap();
        assert_eq!(datatype.data_type, Some(DataType::scalar(DataKind::Enum)));
        assert_eq!(datatype.enum_type, Some("datatype_enum"));
    }
}
